use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::core::cli::RunArgs;
use crate::core::cmds::{default_registry, resolve_batch, resolve_seed};
use crate::core::engine::operators::MutationContext;
use crate::core::engine::resolver::TargetResolver;
use crate::core::engine::source::SourceSet;
use crate::core::runner::{CommandRunner, Markers, MutantExecutor};
use crate::types::config::{colors_enabled, config};
use crate::types::{AppResult, Outcome, Report, aggregate};

pub async fn execute_run(args: RunArgs, running: Arc<AtomicBool>) -> AppResult<Report> {
    let sources = SourceSet::load(&args.sources)?;

    let resolver = TargetResolver::new(&sources.files);
    let mutatees = resolve_batch(&resolver, &args.targets);

    let seed = resolve_seed(args.seed);
    let registry = default_registry(seed);
    let ctx = MutationContext::new(&sources.files);
    let mutants = registry.generate_all(&ctx, &mutatees);
    info!(
        "Generated {} mutant(s) across {} mutatee(s)",
        mutants.len(),
        mutatees.len()
    );

    if mutants.is_empty() {
        let report = aggregate(&[]);
        print_report(&report, &args.format)?;
        return Ok(report);
    }

    let test_cmd = config().resolve_test_cmd(args.test_cmd.as_deref());
    let timeout = config().resolve_test_timeout(args.test_timeout);
    let markers = Markers::new(
        config().test().pass_marker(),
        config().test().fail_marker(),
    );
    let runner = CommandRunner::new(test_cmd.clone());
    let executor = MutantExecutor::new(markers, Duration::from_secs(timeout.into()));

    if !args.no_baseline {
        info!("Running baseline test suite: {test_cmd}");
        executor.baseline(&runner).await?;
    }

    // The loaded sources become the shared live representation; each trial
    // takes the lock for its whole apply/run/revert cycle.
    let sources = Mutex::new(sources);

    let progress = ProgressBar::new(mutants.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("static progress template"),
    );

    let mut outcomes: Vec<Outcome> = Vec::new();
    for mutant in &mutants {
        if !running.load(Ordering::SeqCst) {
            warn!("Run interrupted, stopping...");
            break;
        }
        progress.set_message(mutant.mutatee.clone());
        debug!("Testing {}", mutant.display());
        let outcome = executor.execute(&sources, &runner, mutant).await;
        debug!("{}: {}", outcome.verdict, outcome.mutant.display());
        outcomes.push(outcome);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let report = aggregate(&outcomes);
    print_report(&report, &args.format)?;
    Ok(report)
}

fn print_report(report: &Report, format: &str) -> AppResult<()> {
    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(report).expect("report serialization")
        );
        return Ok(());
    }

    info!(
        "Mutants: {} total | {} killed | {} timed out | {} errored | {} survived",
        report.total,
        report.killed,
        report.timed_out,
        report.errored,
        report.survived.len()
    );
    info!("Mutation score: {:.1}%", report.score * 100.0);

    if !report.survived.is_empty() {
        info!("Surviving mutants (test gaps):");
        for mutant in &report.survived {
            let line = mutant.display();
            if colors_enabled() {
                info!("  {}", style(line).red());
            } else {
                info!("  {line}");
            }
        }
    }
    if report.errored > 0 {
        warn!(
            "{} trial(s) errored; this usually indicates test infrastructure problems, not test quality",
            report.errored
        );
    }
    Ok(())
}
