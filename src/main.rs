use anyhow::Context;

use fireworks::config::ShowConfig;

const CONFIG_PATH: &str = "fireworks.toml";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ShowConfig::load_or_default(CONFIG_PATH)?;
    fireworks::window::run(config).context("fireworks show failed")?;

    Ok(())
}
