//! Colors and compositing modes for the fireworks canvas.
//!
//! Every burst picks from the same fixed [`PALETTE`]. Colors are plain RGB
//! [`Vec3`] values in `0.0..=1.0`, the same convention the renderer uploads.
//!
//! # Example
//!
//! ```
//! use fireworks::visuals::{parse_hex_color, PALETTE};
//!
//! let pink = parse_hex_color("#FF3F8E").unwrap();
//! assert!((pink - PALETTE[0]).length() < 0.01);
//! ```

use glam::Vec3;

/// How a draw instruction combines with what is already on the canvas.
///
/// Colors on the canvas are stored premultiplied, so each mode maps to a
/// single fixed-function blend state on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Standard "over" compositing (default).
    ///
    /// A draw list starts in this mode. The engine switches away from it
    /// before drawing, so it only shows up for lists built by other callers.
    #[default]
    SourceOver,

    /// Additive blending ("lighter").
    ///
    /// Overlapping sparks sum their brightness instead of hiding each
    /// other, which is what makes a dense burst glow.
    Lighter,

    /// Subtractive alpha ("destination-out").
    ///
    /// Erases existing content in proportion to the source alpha while
    /// ignoring the source color. A translucent full-screen fill in this mode
    /// fades the previous frame instead of clearing it, leaving trails.
    DestinationOut,
}

impl BlendMode {
    /// All modes, in pipeline index order.
    pub const ALL: [BlendMode; 3] = [
        BlendMode::SourceOver,
        BlendMode::Lighter,
        BlendMode::DestinationOut,
    ];

    /// Index of this mode in [`BlendMode::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            BlendMode::SourceOver => 0,
            BlendMode::Lighter => 1,
            BlendMode::DestinationOut => 2,
        }
    }
}

/// Burst colors: `#FF3F8E #04C2C9 #2E5BFF #D1FF00 #FF9F00 #A100FF #00FF9D #FFEA00 #FFFFFF #FFD700`.
pub const PALETTE: [Vec3; 10] = [
    Vec3::new(1.0, 0.2471, 0.5569),
    Vec3::new(0.01569, 0.7608, 0.7882),
    Vec3::new(0.1804, 0.3569, 1.0),
    Vec3::new(0.8196, 1.0, 0.0),
    Vec3::new(1.0, 0.6235, 0.0),
    Vec3::new(0.6314, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 0.6157),
    Vec3::new(1.0, 0.9176, 0.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, 0.8431, 0.0),
];

/// Night sky behind the canvas (`#020617`).
pub const BACKGROUND: Vec3 = Vec3::new(0.007843, 0.02353, 0.0902);

/// Sparkle overlay color.
pub const WHITE: Vec3 = Vec3::ONE;

/// Parse a `#RRGGBB` (or `RRGGBB`) color string.
///
/// Returns `None` for anything that is not exactly six hex digits.
pub fn parse_hex_color(s: &str) -> Option<Vec3> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    Some(Vec3::new(r as f32, g as f32, b as f32) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE_HEX: [&str; 10] = [
        "#FF3F8E", "#04C2C9", "#2E5BFF", "#D1FF00", "#FF9F00", "#A100FF", "#00FF9D", "#FFEA00",
        "#FFFFFF", "#FFD700",
    ];

    #[test]
    fn test_palette_matches_hex() {
        for (hex, color) in PALETTE_HEX.iter().zip(PALETTE.iter()) {
            let parsed = parse_hex_color(hex).unwrap();
            assert!((parsed - *color).abs().max_element() < 0.001, "{hex}");
        }
    }

    #[test]
    fn test_parse_hex_without_hash() {
        assert_eq!(parse_hex_color("FFFFFF"), Some(Vec3::ONE));
        assert_eq!(parse_hex_color("000000"), Some(Vec3::ZERO));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#FF3F8E00"), None);
        assert_eq!(parse_hex_color("#ÿÿÿ"), None);
        assert_eq!(parse_hex_color("+F+F+F"), None);
    }

    #[test]
    fn test_blend_mode_indices_are_unique() {
        for (i, mode) in BlendMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }
}
