pub mod app;
pub mod browse;
pub mod cli;
pub mod config;
pub mod normalize;
pub mod output;
pub mod roster;
pub mod runner;
pub mod utils;

#[cfg(test)]
mod tests;
