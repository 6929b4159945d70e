//! ledgerfile - bank accounts and books in flat binary record files
//!
//! Each record kind lives in one file with no index or header. Lookups scan
//! from the start, removals compact the file, and in-place saves rewrite only
//! a fixed-width block of the record.

pub mod account;
pub mod book;
pub mod cli;
pub mod config;
pub mod display;
pub mod observability;
pub mod storage;
