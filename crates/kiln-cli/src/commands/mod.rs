//! CLI command implementations

pub mod inspect;
pub mod run;
pub mod validate;

use kiln_runtime::Engine;

/// Engine with every component type the CLI knows how to build
pub fn build_engine() -> Engine {
    let mut engine = Engine::new();
    kiln_animation::register(engine.registry_mut());
    engine
}

/// Reject output formats other than `text` and `json`
pub fn check_format(format: &str) -> anyhow::Result<()> {
    match format {
        "text" | "json" => Ok(()),
        other => anyhow::bail!("unknown output format '{}'; expected text or json", other),
    }
}
