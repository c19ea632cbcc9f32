use log::info;

use crate::core::cli::MutantsArgs;
use crate::core::cmds::{default_registry, resolve_batch, resolve_seed};
use crate::core::engine::operators::MutationContext;
use crate::core::engine::resolver::TargetResolver;
use crate::core::engine::source::SourceSet;
use crate::types::AppResult;

/// Generate and list mutants for the given targets without running tests.
pub async fn execute_mutants(args: MutantsArgs) -> AppResult<()> {
    let sources = SourceSet::load(&args.sources)?;
    let resolver = TargetResolver::new(&sources.files);
    let mutatees = resolve_batch(&resolver, &args.targets);

    let seed = resolve_seed(args.seed);
    let registry = default_registry(seed);
    let ctx = MutationContext::new(&sources.files);
    let mutants = registry.generate_all(&ctx, &mutatees);

    if args.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&mutants).expect("mutant serialization")
        );
        return Ok(());
    }

    for mutant in &mutants {
        info!("{}", mutant.display());
    }
    info!(
        "Generated {} mutant(s) across {} mutatee(s)",
        mutants.len(),
        mutatees.len()
    );
    Ok(())
}
