//! End-to-end sync run: spreadsheet → images + `link.json`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sheetsync_sheets::{SheetsClient, SpreadsheetDocument, build_client};
use sheetsync_shared::{
    AppConfig, HttpConfig, Result, SheetSyncError, SheetsConfig, SponsorNewsRow, SponsorRow,
    SpreadsheetConfig, YoutubeRow, resolve_api_key,
};
use tracing::{debug, info, instrument, warn};

use crate::fetcher::ImageFetcher;
use crate::link_map::{build_link_map, write_link_map};
use crate::selector::{select_sponsor_images, select_sponsor_news_images};

/// Configuration for [`run_sync`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Document and service settings.
    pub spreadsheet: SpreadsheetConfig,
    /// Sheet ids for the three passes.
    pub sheets: SheetsConfig,
    /// Output root, wiped at the start of the run.
    pub output_dir: PathBuf,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// API key; `None` skips the run.
    pub api_key: Option<String>,
}

impl SyncConfig {
    /// Merge the loaded config with the API key from the environment.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            spreadsheet: config.spreadsheet.clone(),
            sheets: config.sheets.clone(),
            output_dir: config.output.dir.clone(),
            http: config.http.clone(),
            api_key: resolve_api_key(config),
        }
    }

    pub fn sponsor_dir(&self) -> PathBuf {
        self.output_dir.join("images").join("sponsor")
    }

    pub fn sponsor_news_dir(&self) -> PathBuf {
        self.output_dir.join("images").join("sponsor-news")
    }

    pub fn link_map_path(&self) -> PathBuf {
        self.output_dir.join("link.json")
    }
}

/// Why a run ended before touching the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The API key env var is unset or empty.
    MissingApiKey { env_var: String },
    /// The document metadata could not be loaded.
    LoadFailed { message: String },
}

/// Counts from a completed run.
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub document_title: String,
    pub sponsor_images: usize,
    pub sponsor_news_images: usize,
    pub rooms: usize,
    pub output_dir: PathBuf,
    pub elapsed: Duration,
}

/// Result of [`run_sync`] when nothing failed.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    Skipped(SkipReason),
    Completed(SyncSummary),
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each image is written.
    fn image_saved(&self, path: &Path, current: usize, total: usize);
    /// Called once when the run ends without error.
    fn done(&self, outcome: &SyncOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn image_saved(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _outcome: &SyncOutcome) {}
}

/// Run the full sync.
///
/// 1. Load the document (skip the run if the key is missing or loading fails)
/// 2. Reset the output directory
/// 3. Sponsor logos
/// 4. Sponsor news images
/// 5. `link.json`
///
/// Errors from steps 2–5 are returned as-is; files written before the failure
/// are left in place.
#[instrument(skip_all, fields(document_id = %config.spreadsheet.document_id))]
pub async fn run_sync(config: &SyncConfig, progress: &dyn ProgressReporter) -> Result<SyncOutcome> {
    let start = Instant::now();

    // --- Phase 1: Load document ---
    let Some(api_key) = config.api_key.as_deref() else {
        warn!(
            env_var = %config.spreadsheet.api_key_env,
            "cannot load the spreadsheet: API key not set"
        );
        let outcome = SyncOutcome::Skipped(SkipReason::MissingApiKey {
            env_var: config.spreadsheet.api_key_env.clone(),
        });
        progress.done(&outcome);
        return Ok(outcome);
    };

    progress.phase("Loading spreadsheet");
    let http = build_client(&config.http)?;
    let client = SheetsClient::new(http.clone(), &config.spreadsheet.api_base_url, api_key)?;

    let doc = match client.load_document(&config.spreadsheet.document_id).await {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "cannot load the spreadsheet");
            let outcome = SyncOutcome::Skipped(SkipReason::LoadFailed {
                message: e.to_string(),
            });
            progress.done(&outcome);
            return Ok(outcome);
        }
    };

    // --- Phase 2: Reset output ---
    progress.phase("Resetting output directory");
    reset_output_dir(&config.output_dir).await?;

    let fetcher = ImageFetcher::new(http);

    // --- Phase 3: Sponsor logos ---
    progress.phase("Downloading sponsor logos");
    let sponsor_images =
        sync_sponsor_images(&doc, &fetcher, config.sheets.sponsor, &config.sponsor_dir(), progress)
            .await?;

    // --- Phase 4: Sponsor news images ---
    progress.phase("Downloading sponsor news images");
    let sponsor_news_images = sync_sponsor_news_images(
        &doc,
        &fetcher,
        config.sheets.sponsor_news,
        &config.sponsor_news_dir(),
        progress,
    )
    .await?;

    // --- Phase 5: Link map ---
    progress.phase("Writing livestream links");
    let rooms = sync_link_map(&doc, config.sheets.youtube, &config.link_map_path()).await?;

    let summary = SyncSummary {
        document_title: doc.title().to_string(),
        sponsor_images,
        sponsor_news_images,
        rooms,
        output_dir: config.output_dir.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        sponsor_images = summary.sponsor_images,
        sponsor_news_images = summary.sponsor_news_images,
        rooms = summary.rooms,
        output_dir = %summary.output_dir.display(),
        elapsed_ms = summary.elapsed.as_millis(),
        "done"
    );

    let outcome = SyncOutcome::Completed(summary);
    progress.done(&outcome);
    Ok(outcome)
}

/// Remove `dir` (a missing directory is fine) and create it again.
async fn reset_output_dir(dir: &Path) -> Result<()> {
    if let Err(e) = tokio::fs::remove_dir_all(dir).await {
        debug!(path = %dir.display(), error = %e, "output directory not removed");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| SheetSyncError::io(dir, e))
}

#[instrument(skip(doc, fetcher, progress), fields(output_dir = %output_dir.display()))]
async fn sync_sponsor_images(
    doc: &SpreadsheetDocument,
    fetcher: &ImageFetcher,
    sheet_id: u64,
    output_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<usize> {
    let rows: Vec<SponsorRow> = doc.rows(sheet_id).await?;
    for row in rows.iter().filter(|r| !r.level.is_known() && r.is_publishable()) {
        debug!(id = %row.id, level = %row.level, "unrecognised sponsor level");
    }

    let plan = select_sponsor_images(&rows);
    debug!(rows = rows.len(), images = plan.len(), "sponsor rows selected");

    let written = fetcher.download_images(&plan, output_dir, progress).await?;
    Ok(written.len())
}

#[instrument(skip(doc, fetcher, progress), fields(output_dir = %output_dir.display()))]
async fn sync_sponsor_news_images(
    doc: &SpreadsheetDocument,
    fetcher: &ImageFetcher,
    sheet_id: u64,
    output_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<usize> {
    let rows: Vec<SponsorNewsRow> = doc.rows(sheet_id).await?;
    let plan = select_sponsor_news_images(&rows);
    debug!(rows = rows.len(), images = plan.len(), "sponsor news rows selected");

    let written = fetcher.download_images(&plan, output_dir, progress).await?;
    Ok(written.len())
}

#[instrument(skip(doc), fields(path = %path.display()))]
async fn sync_link_map(doc: &SpreadsheetDocument, sheet_id: u64, path: &Path) -> Result<usize> {
    let rows: Vec<YoutubeRow> = doc.rows(sheet_id).await?;
    let map = build_link_map(&rows);
    write_link_map(&map, path).await?;
    Ok(map.len())
}
