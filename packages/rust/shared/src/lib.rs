//! Shared types, error model, and configuration for sheetsync.
//!
//! This crate is the foundation depended on by all other sheetsync crates.
//! It provides:
//! - [`SheetSyncError`] for the unified error type
//! - Row types ([`SponsorRow`], [`SponsorNewsRow`], [`YoutubeRow`]) and the
//!   values derived from them ([`DownloadEntry`], [`LinkMap`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, HttpConfig, OutputConfig, SheetsConfig, SpreadsheetConfig,
    default_config_path, init_config, load_config, load_config_from, resolve_api_key,
    validate_config,
};
pub use error::{Result, SheetSyncError};
pub use types::{
    DownloadEntry, LinkMap, PUBLISH_YES, SponsorLevel, SponsorNewsRow, SponsorRow, YoutubeRow,
};
