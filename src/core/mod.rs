pub mod cli;
pub mod cmds;
pub mod engine;
pub mod logging;
pub mod runner;
pub mod types;
