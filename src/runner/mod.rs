pub mod actions;
pub mod runner;
pub mod scheduler;
