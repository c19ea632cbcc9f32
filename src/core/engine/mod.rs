pub mod boolean;
pub mod literal;
pub mod operators;
pub mod resolver;
pub mod source;
pub mod symbols;
pub mod utils;
