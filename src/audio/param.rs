//! Time-automated parameter values.
//!
//! [`AudioParam`] follows the Web Audio automation model: a default value plus
//! a timeline of events, each of which shapes the curve up to (ramps) or from
//! (set, target) its own time. Times are seconds on the voice's local clock.

/// One automation event.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    /// Jump to `value` at `time`.
    SetValue { time: f64, value: f32 },
    /// Ramp linearly from the previous event's value, arriving at `time`.
    LinearRamp { time: f64, value: f32 },
    /// Ramp exponentially from the previous event's value, arriving at `time`.
    ExponentialRamp { time: f64, value: f32 },
    /// Approach `target` from `time` on, with time constant `tau`.
    SetTarget { time: f64, target: f32, tau: f64 },
}

impl Event {
    #[inline]
    fn time(&self) -> f64 {
        match *self {
            Event::SetValue { time, .. }
            | Event::LinearRamp { time, .. }
            | Event::ExponentialRamp { time, .. }
            | Event::SetTarget { time, .. } => time,
        }
    }
}

/// A scalar whose value follows an automation timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParam {
    default: f32,
    events: Vec<Event>,
}

impl AudioParam {
    /// A parameter holding `value` until automated.
    pub fn new(value: f32) -> Self {
        Self {
            default: value,
            events: Vec::new(),
        }
    }

    /// Jump to `value` at `time`.
    pub fn set_value_at(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(Event::SetValue { time, value })
    }

    /// Ramp linearly to `value`, arriving at `time`.
    pub fn linear_ramp_to(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(Event::LinearRamp { time, value })
    }

    /// Ramp exponentially to `value`, arriving at `time`.
    ///
    /// Both ends of the ramp must be positive; otherwise the previous value
    /// is held until `time`.
    pub fn exponential_ramp_to(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(Event::ExponentialRamp { time, value })
    }

    /// Approach `target` from `time` on: `v(t) = target + (v0 - target) * e^(-(t - time) / tau)`.
    pub fn set_target_at(&mut self, target: f32, time: f64, tau: f64) -> &mut Self {
        self.insert(Event::SetTarget { time, target, tau })
    }

    /// Drop every event and hold the value the curve had at `time`.
    pub fn cancel_and_hold_at(&mut self, time: f64) -> &mut Self {
        let held = self.value_at(time);
        self.events.clear();
        self.default = held;
        self.set_value_at(held, time)
    }

    /// Number of scheduled events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    // Events at the same time keep their insertion order.
    fn insert(&mut self, event: Event) -> &mut Self {
        let at = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(at, event);
        self
    }

    /// Value of the curve at `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        let mut value = self.default;
        let mut start = 0.0;

        for (i, event) in self.events.iter().enumerate() {
            match *event {
                Event::SetValue { time, value: v } => {
                    if t < time {
                        return value;
                    }
                    value = v;
                    start = time;
                }
                Event::LinearRamp { time, value: v } => {
                    if t < time {
                        let span = time - start;
                        if span <= 0.0 {
                            return v;
                        }
                        let frac = ((t - start) / span).max(0.0) as f32;
                        return value + (v - value) * frac;
                    }
                    value = v;
                    start = time;
                }
                Event::ExponentialRamp { time, value: v } => {
                    if t < time {
                        let span = time - start;
                        if span <= 0.0 {
                            return v;
                        }
                        if value <= 0.0 || v <= 0.0 {
                            return value;
                        }
                        let frac = ((t - start) / span).max(0.0);
                        return value * ((v / value) as f64).powf(frac) as f32;
                    }
                    value = v;
                    start = time;
                }
                Event::SetTarget { time, target, tau } => {
                    if t < time {
                        return value;
                    }
                    // Runs until the next event takes over.
                    let end = self.events.get(i + 1).map_or(f64::INFINITY, Event::time);
                    let approach = |at: f64| {
                        if tau <= 0.0 {
                            target
                        } else {
                            target + (value - target) * (-(at - time) / tau).exp() as f32
                        }
                    };
                    if t < end {
                        return approach(t);
                    }
                    value = approach(end);
                    start = end;
                }
            }
        }

        value
    }
}
