//! Core sync logic for sheetsync.
//!
//! This crate turns spreadsheet rows into a download plan, fetches the
//! images, writes the livestream link map, and sequences it all into a single
//! run (`pipeline::run_sync`).

pub mod fetcher;
pub mod link_map;
pub mod pipeline;
pub mod selector;
