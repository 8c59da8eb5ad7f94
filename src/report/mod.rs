// src/report/mod.rs
mod console;
mod snapshot;

pub use console::{symbol, ConsoleReporter};
pub use snapshot::{read_snapshot, snapshot_file_name, write_snapshot, write_snapshot_to};
