use env_logger::Env;
use orrery::{EngineConfig, presets, run_app};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let bodies = presets::sun_with_projects(&presets::default_projects(), &mut rand::rng());
    run_app(bodies, EngineConfig::default())
}
