//! CLI module graph.

pub mod chains;
pub mod command;
pub mod dispatch;
pub mod health;
pub mod operator;
pub mod output;
pub mod serve;
pub mod sweep;
