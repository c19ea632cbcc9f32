use std::process::Stdio;
use std::time::{Duration, Instant};

use log::{debug, error};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::core::engine::source::{SourceFile, SourceSet};
use crate::types::{AppResult, EngineError, Mutant, Outcome, Verdict};

/// Marker substrings scanned for in runner output when the adapter exposes
/// no structured result. The adapter's output format is a load-bearing
/// contract, not incidental logging.
#[derive(Debug, Clone)]
pub struct Markers {
    pub pass: String,
    pub fail: String,
}

impl Markers {
    pub fn new(pass: impl Into<String>, fail: impl Into<String>) -> Self {
        Self {
            pass: pass.into(),
            fail: fail.into(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new("passed", "failed")
    }
}

/// What one test-suite invocation reported.
#[derive(Debug, Clone)]
pub struct RunnerOutput {
    /// Captured textual output (stdout and stderr).
    pub text: String,
    /// Structured pass/fail signal where the runner has one (e.g. exit
    /// status). `None` falls classification back to marker scanning.
    pub status: Option<bool>,
}

/// External collaborator contract: executes the test suite once and reports
/// its output.
pub trait TestRunner: Send + Sync {
    fn run(&self, args: &[String]) -> impl Future<Output = AppResult<RunnerOutput>> + Send;
}

/// Shell-command test runner: the same command line the user would run by
/// hand, stdout and stderr captured.
pub struct CommandRunner {
    cmd: String,
}

impl CommandRunner {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }
}

impl TestRunner for CommandRunner {
    fn run(&self, args: &[String]) -> impl Future<Output = AppResult<RunnerOutput>> + Send {
        let mut full_cmd = self.cmd.clone();
        for arg in args {
            full_cmd.push(' ');
            full_cmd.push_str(arg);
        }
        async move {
            debug!("Running test command: {full_cmd}");
            let output = shell_command(&full_cmd)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                // Reap the child if the trial is cancelled or times out
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|err| EngineError::Runner(err.to_string()))?;

            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            Ok(RunnerOutput {
                text,
                status: Some(output.status.success()),
            })
        }
    }
}

#[cfg(unix)]
fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    command
}

#[cfg(windows)]
fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(cmd);
    command
}

/// Classify one runner report.
///
/// A structured status wins outright. Marker scanning applies the
/// tie-breaks: output carrying both markers is ambiguous and output carrying
/// neither is unparseable, and both classify as `errored` rather than a
/// guess.
pub fn classify(output: &RunnerOutput, markers: &Markers) -> Verdict {
    if let Some(passed) = output.status {
        return if passed {
            Verdict::Survived
        } else {
            Verdict::Killed
        };
    }
    let failed = output.text.contains(&markers.fail);
    let passed = output.text.contains(&markers.pass);
    match (failed, passed) {
        (true, false) => Verdict::Killed,
        (false, true) => Verdict::Survived,
        _ => Verdict::Errored,
    }
}

/// Restores the pristine source on drop, so the patch is reverted on every
/// exit path: success, runner crash, timeout, panic, or cancellation of the
/// trial future itself.
struct RestoreGuard<'a> {
    file: &'a SourceFile,
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.file.restore() {
            error!(
                "Failed to restore {} after mutant trial: {err}",
                self.file.path.display()
            );
        }
    }
}

/// Runs one mutant at a time against the shared sources.
///
/// Trials are serialized through the source-set lock: the on-disk sources
/// are a single logical resource, and only one mutant may occupy them for
/// the duration of its apply/run/revert cycle.
pub struct MutantExecutor {
    markers: Markers,
    timeout: Duration,
    args: Vec<String>,
}

impl MutantExecutor {
    pub fn new(markers: Markers, timeout: Duration) -> Self {
        Self {
            markers,
            timeout,
            args: Vec::new(),
        }
    }

    /// Extra arguments forwarded to every runner invocation.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Run the unmutated suite once. A failing or hanging baseline would
    /// spuriously kill every mutant, so it aborts the campaign instead.
    pub async fn baseline<R: TestRunner>(&self, runner: &R) -> AppResult<()> {
        match timeout(self.timeout, runner.run(&self.args)).await {
            Err(_) => Err(EngineError::Baseline(format!(
                "timed out after {}s",
                self.timeout.as_secs()
            ))),
            Ok(Err(err)) => Err(EngineError::Baseline(err.to_string())),
            Ok(Ok(output)) => match classify(&output, &self.markers) {
                Verdict::Survived => Ok(()),
                verdict => Err(EngineError::Baseline(format!(
                    "unmutated test suite classified as {verdict}"
                ))),
            },
        }
    }

    /// One mutant trial: apply the patch, run the suite under the timeout,
    /// classify, and revert unconditionally.
    pub async fn execute<R: TestRunner>(
        &self,
        sources: &Mutex<SourceSet>,
        runner: &R,
        mutant: &Mutant,
    ) -> Outcome {
        // Exclusive for the whole trial
        let sources = sources.lock().await;
        let file = sources.file(mutant.file);
        let started = Instant::now();

        if let Err(err) = file.apply(mutant) {
            return Outcome {
                mutant: mutant.clone(),
                verdict: Verdict::Errored,
                output: err.to_string(),
                duration_ms: started.elapsed().as_millis() as u64,
            };
        }
        let _guard = RestoreGuard { file };

        let result = timeout(self.timeout, runner.run(&self.args)).await;
        let (verdict, output) = match result {
            Err(_) => (
                Verdict::TimedOut,
                format!("test run exceeded {}s", self.timeout.as_secs()),
            ),
            Ok(Err(err)) => (Verdict::Errored, err.to_string()),
            Ok(Ok(run_output)) => (classify(&run_output, &self.markers), run_output.text),
        };

        Outcome {
            mutant: mutant.clone(),
            verdict,
            output,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}
