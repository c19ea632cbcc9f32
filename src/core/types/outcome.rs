use serde::Serialize;
use strum::Display;

use crate::types::Mutant;

/// Classification of one mutant trial.
///
/// A timeout counts as a kill for scoring: a hang is itself a detectable
/// behavioral change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Verdict {
    Killed,
    Survived,
    Errored,
    TimedOut,
}

impl Verdict {
    pub fn counts_as_kill(&self) -> bool {
        matches!(self, Verdict::Killed | Verdict::TimedOut)
    }
}

/// One mutant's trial result: the verdict plus the captured runner output.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub mutant: Mutant,
    pub verdict: Verdict,
    pub output: String,
    pub duration_ms: u64,
}

/// Aggregate over all outcomes of a run.
///
/// `errored` and `timed_out` are surfaced separately from `killed` and
/// `survived`: an elevated error count indicates infrastructure problems
/// rather than test quality.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub total: usize,
    pub killed: usize,
    pub errored: usize,
    pub timed_out: usize,
    pub survived: Vec<Mutant>,
    pub score: f64,
}

/// Fold per-mutant verdicts into a report. Pure; commutative over input
/// order. Score is `(killed + timed_out) / total`, defined as 1.0 for an
/// empty run (nothing to mutate means nothing escaped).
pub fn aggregate(outcomes: &[Outcome]) -> Report {
    let mut killed = 0;
    let mut errored = 0;
    let mut timed_out = 0;
    let mut survived: Vec<Mutant> = Vec::new();

    for outcome in outcomes {
        match outcome.verdict {
            Verdict::Killed => killed += 1,
            Verdict::Errored => errored += 1,
            Verdict::TimedOut => timed_out += 1,
            Verdict::Survived => survived.push(outcome.mutant.clone()),
        }
    }

    survived.sort_by_key(|m| m.sort_key());

    let total = outcomes.len();
    let score = if total == 0 {
        1.0
    } else {
        (killed + timed_out) as f64 / total as f64
    };

    Report {
        total,
        killed,
        errored,
        timed_out,
        survived,
        score,
    }
}
