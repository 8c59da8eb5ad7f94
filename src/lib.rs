// src/lib.rs
pub mod config;
pub mod endpoints;
pub mod poller;
pub mod report;
