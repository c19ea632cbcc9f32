use std::path::PathBuf;

use serde::Serialize;

/// An immutable (original, patch, operator) triple produced from one mutatee.
///
/// The patch is a byte-precise splice: replacing `old_text` at `byte_offset`
/// with `new_text`. Reverting is rewriting the pristine file text, so the
/// mutant never needs an inverse patch of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mutant {
    /// Fully-qualified name of the mutatee, e.g. `Thing#alive`.
    pub mutatee: String,
    /// Name of the operator that produced this mutant.
    pub operator: &'static str,
    /// Index of the mutated file within the loaded source set.
    pub file: usize,
    pub path: PathBuf,
    pub byte_offset: u32,
    pub line_offset: u32,
    pub old_text: String,
    pub new_text: String,
}

impl Mutant {
    /// One-line human description, e.g.
    /// `src/thing.rs:4: [boolean-negation] Thing.kind: `true` -> `false``.
    pub fn display(&self) -> String {
        format!(
            "{}:{}: [{}] {}: `{}` -> `{}`",
            self.path.display(),
            self.line_offset + 1,
            self.operator,
            self.mutatee,
            self.old_text,
            self.new_text
        )
    }

    /// Stable presentation key: mutatee, then operator, then occurrence.
    /// Completion order of trials is never meaningful, so survivor lists are
    /// re-sorted on this key before reporting.
    pub fn sort_key(&self) -> (String, &'static str, u32) {
        (self.mutatee.clone(), self.operator, self.byte_offset)
    }
}
