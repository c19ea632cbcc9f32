pub mod core;

// Re-export key items for easy importing in this crate
pub use core::types;

// Re-export key items for downstream users and integration tests
pub use core::engine::operators::{MutationContext, MutationOperator, OperatorRegistry};
pub use core::engine::resolver::TargetResolver;
pub use core::engine::source::{SourceFile, SourceSet};
pub use core::engine::symbols::SymbolTable;
pub use core::runner::{CommandRunner, Markers, MutantExecutor, RunnerOutput, TestRunner};
