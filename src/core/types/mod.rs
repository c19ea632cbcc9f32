pub mod config;
mod error;
mod mutant;
mod outcome;
mod target;

pub use error::*;
pub use mutant::*;
pub use outcome::*;
pub use target::*;
