use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use log::{debug, warn};

use mutor::core::cli::{Args, Commands};
use mutor::core::cmds;
use mutor::core::logging::init_logging;
use mutor::types::config::{CliOverrides, init_with_overrides};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }
    debug!("Current working directory: {}", env::current_dir()?.display());

    // Initialize configuration (file, then CLI overrides)
    init_with_overrides(&CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
    });

    // Initialize logging after config so level/color are applied
    init_logging();

    // Setup running flag to handle signals from ctrl-c
    let running = Arc::new(AtomicBool::new(true));
    let running_ctrlc = Arc::clone(&running);

    ctrlc::set_handler(move || {
        warn!("Received Ctrl-C, cleaning up..");
        running_ctrlc.store(false, Ordering::SeqCst);
    })
    .expect("Error creating a Ctrl-C handler");

    let exit_code = match args.command {
        Commands::Run(run_args) => {
            let _report = cmds::execute_run(run_args, Arc::clone(&running)).await?;
            if running.load(Ordering::SeqCst) {
                0
            } else {
                // Campaign was interrupted
                2
            }
        }
        Commands::Mutants(mutants_args) => {
            cmds::execute_mutants(mutants_args).await?;
            0
        }
        Commands::Targets(targets_args) => {
            cmds::execute_targets(targets_args).await?;
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
