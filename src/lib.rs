//! Comment-spam auditor for multi-tenant site networks. Visits every active
//! tenant in batches, computes spam signals with count-only queries, survives
//! per-tenant corruption, and produces a single ranked report.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod infrastructure;
pub mod scanner;
pub mod tasks;
