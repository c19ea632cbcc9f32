pub mod mutants;
pub mod run;
pub mod targets;

pub use mutants::execute_mutants;
pub use run::execute_run;
pub use targets::execute_targets;

use log::{error, info};

use crate::core::engine::boolean::BooleanNegation;
use crate::core::engine::literal::{RandomLiteralSubstitution, SeededValues};
use crate::core::engine::operators::OperatorRegistry;
use crate::core::engine::resolver::TargetResolver;
use crate::types::config::config;
use crate::types::{Mutatee, TargetSpec};

/// The built-in operator set, with the random-literal value source seeded so
/// runs can be replayed.
pub fn default_registry(seed: u64) -> OperatorRegistry {
    let mut registry = OperatorRegistry::new();
    registry.register(BooleanNegation);
    registry.register(RandomLiteralSubstitution::new(SeededValues::with_seed(seed)));
    registry
}

pub fn resolve_seed(cli_seed: Option<u64>) -> u64 {
    match config().resolve_seed(cli_seed) {
        Some(seed) => seed,
        None => {
            let seed = fastrand::u64(..);
            info!("No seed given, using {seed} (pass --seed {seed} to replay)");
            seed
        }
    }
}

/// Resolve a batch of raw target specs. A malformed or unresolvable spec is
/// fatal to that target only; siblings continue.
pub fn resolve_batch(resolver: &TargetResolver, raw_specs: &[String]) -> Vec<Mutatee> {
    let mut mutatees = Vec::new();
    for raw in raw_specs {
        let spec = match TargetSpec::parse(raw) {
            Ok(spec) => spec,
            Err(err) => {
                error!("Skipping target '{raw}': {err}");
                continue;
            }
        };
        match resolver.resolve(&spec) {
            Ok(resolved) => {
                info!("Resolved '{spec}' to {} mutatee(s)", resolved.len());
                mutatees.extend(resolved);
            }
            Err(err) => error!("Failed to resolve '{raw}': {err}"),
        }
    }
    mutatees
}
