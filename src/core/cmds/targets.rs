use log::info;
use serde_json::json;

use crate::core::cli::TargetsArgs;
use crate::core::engine::resolver::TargetResolver;
use crate::core::engine::source::SourceSet;
use crate::types::{AppResult, TargetSpec};

/// List the mutatees a spec resolves to, or the whole symbol table when no
/// spec is given.
pub async fn execute_targets(args: TargetsArgs) -> AppResult<()> {
    let sources = SourceSet::load(&args.sources)?;
    let resolver = TargetResolver::new(&sources.files);

    match &args.target {
        Some(raw) => {
            let spec = TargetSpec::parse(raw)?;
            let mutatees = resolver.resolve(&spec)?;
            if args.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&mutatees).expect("mutatee serialization")
                );
                return Ok(());
            }
            for mutatee in &mutatees {
                let file = &resolver.files()[mutatee.file];
                info!(
                    "{} ({}:{})",
                    mutatee.qualified_name(),
                    file.path.display(),
                    mutatee.line_offset + 1
                );
            }
            info!("'{spec}' resolves to {} mutatee(s)", mutatees.len());
        }
        None => {
            let symbols = resolver.symbols();
            if args.format == "json" {
                let table: Vec<_> = symbols
                    .class_names()
                    .iter()
                    .map(|name| json!({ "class": name, "methods": symbols.all_methods(name) }))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&table).expect("symbol serialization")
                );
                return Ok(());
            }
            for name in symbols.class_names() {
                info!("{name}");
                for method in symbols.all_methods(name) {
                    info!("  {method}");
                }
            }
        }
    }
    Ok(())
}
