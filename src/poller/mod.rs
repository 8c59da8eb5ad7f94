// src/poller/mod.rs
mod checker;
mod result;

pub use checker::Poller;
pub use result::{exit_code, failed_count, CheckError, CheckResult, CheckStatus};
