use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::info;
use tree_sitter::{Language as TsLanguage, Tree};

use crate::core::engine::utils::parse_source;
use crate::types::{AppResult, EngineError, Mutant};

static RUST_LANGUAGE: OnceLock<TsLanguage> = OnceLock::new();

/// The tree-sitter grammar used for every loaded file.
pub fn rust_language() -> TsLanguage {
    RUST_LANGUAGE
        .get_or_init(|| tree_sitter_rust::LANGUAGE.into())
        .clone()
}

/// One loaded source file: the pristine text, its parse tree, and the on-disk
/// path mutants are written to.
///
/// The pristine text is never modified. Applying a mutant derives a new text
/// by splicing the patch and writes that to disk; reverting rewrites the
/// pristine text. The next mutant always sees a clean baseline.
pub struct SourceFile {
    pub path: PathBuf,
    pristine: String,
    tree: Tree,
}

impl SourceFile {
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_source(path.to_path_buf(), text)
    }

    pub fn from_source(path: PathBuf, text: String) -> AppResult<Self> {
        let tree = parse_source(&text, &rust_language()).ok_or(EngineError::Parse(path.clone()))?;
        Ok(Self {
            path,
            pristine: text,
            tree,
        })
    }

    pub fn text(&self) -> &str {
        &self.pristine
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Derive the mutated text by replacing the patch range, without touching
    /// the pristine copy.
    pub fn splice(&self, mutant: &Mutant) -> io::Result<String> {
        let offset = mutant.byte_offset as usize;
        let end = offset + mutant.old_text.len();
        if end > self.pristine.len() || &self.pristine[offset..end] != mutant.old_text {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "patch does not match source at byte {} of {}",
                    offset,
                    self.path.display()
                ),
            ));
        }
        let mut mutated = String::with_capacity(self.pristine.len() + mutant.new_text.len());
        mutated.push_str(&self.pristine[..offset]);
        mutated.push_str(&mutant.new_text);
        mutated.push_str(&self.pristine[end..]);
        Ok(mutated)
    }

    /// Write the mutated text to disk.
    pub fn apply(&self, mutant: &Mutant) -> io::Result<()> {
        let mutated = self.splice(mutant)?;
        fs::write(&self.path, mutated)
    }

    /// Write the pristine text back to disk.
    pub fn restore(&self) -> io::Result<()> {
        fs::write(&self.path, &self.pristine)
    }
}

/// All sources loaded for one run. A single logical resource: only one
/// mutant may occupy it at a time (the executor serializes trials through a
/// lock over this set).
pub struct SourceSet {
    pub files: Vec<SourceFile>,
}

impl SourceSet {
    /// Load the given paths; directories are walked recursively for `.rs`
    /// files.
    pub fn load(paths: &[String]) -> AppResult<Self> {
        let mut files = Vec::new();
        for raw in paths {
            let path = PathBuf::from(raw);
            if path.is_file() {
                files.push(SourceFile::load(&path)?);
            } else if path.is_dir() {
                load_from_directory(&path, &mut files)?;
            } else {
                return Err(EngineError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file or directory: {raw}"),
                )));
            }
        }
        if files.is_empty() {
            return Err(EngineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no Rust source files found in the given paths",
            )));
        }
        Ok(Self { files })
    }

    pub fn file(&self, index: usize) -> &SourceFile {
        &self.files[index]
    }
}

fn load_from_directory(dir: &Path, files: &mut Vec<SourceFile>) -> AppResult<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            load_from_directory(&path, files)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
            files.push(SourceFile::load(&path)?);
        } else {
            info!("Skipping file {}: not a Rust source", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn mutant(offset: u32, old: &str, new: &str) -> Mutant {
        Mutant {
            mutatee: "Thing#alive".to_string(),
            operator: "boolean-negation",
            file: 0,
            path: PathBuf::from("thing.rs"),
            byte_offset: offset,
            line_offset: 0,
            old_text: old.to_string(),
            new_text: new.to_string(),
        }
    }

    #[test]
    fn splice_replaces_exact_range() {
        let source = "fn alive() -> bool { true }";
        let file = SourceFile::from_source(PathBuf::from("thing.rs"), source.to_string()).unwrap();
        let offset = source.find("true").unwrap() as u32;
        let mutated = file.splice(&mutant(offset, "true", "false")).unwrap();
        assert_eq!(mutated, "fn alive() -> bool { false }");
        // Pristine copy untouched
        assert_eq!(file.text(), source);
    }

    #[test]
    fn splice_rejects_stale_patch() {
        let file =
            SourceFile::from_source(PathBuf::from("thing.rs"), "fn alive() {}".to_string())
                .unwrap();
        assert!(file.splice(&mutant(3, "true", "false")).is_err());
    }
}
