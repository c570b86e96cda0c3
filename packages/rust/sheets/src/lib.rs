//! Read-only client for the hosted spreadsheet (Google Sheets API v4).
//!
//! A run loads the document metadata once with [`SheetsClient::load_document`],
//! then reads each sheet of interest by its numeric id. Authentication is a
//! plain API key passed as the `key` query parameter.

mod parser;

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sheetsync_shared::{HttpConfig, Result, SheetSyncError};
use tracing::{debug, instrument};
use url::Url;

pub use parser::{SheetRecord, decode_records, records_from_values};

/// User-Agent string for every outbound request.
const USER_AGENT: &str = concat!("sheetsync/", env!("CARGO_PKG_VERSION"));

/// Only the fields the sync needs from the document metadata.
const DOCUMENT_FIELDS: &str = "properties.title,sheets.properties";

/// Build the HTTP client shared by the spreadsheet reads and image downloads.
///
/// No timeout unless `opts.timeout_secs` is set.
pub fn build_client(opts: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = opts.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| SheetSyncError::Network(format!("failed to build HTTP client: {e}")))
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    #[serde(default)]
    properties: DocumentProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentProperties {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

/// Metadata of a single sheet (tab) inside the document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: u64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// SheetsClient
// ---------------------------------------------------------------------------

/// API-key client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl SheetsClient {
    /// Create a client for `base_url` (e.g. `https://sheets.googleapis.com`).
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SheetSyncError::config(format!("invalid spreadsheet API base URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SheetSyncError::config(format!(
                "spreadsheet API base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Fetch the document metadata and index its sheets by id.
    #[instrument(skip_all, fields(document_id = %document_id))]
    pub async fn load_document(&self, document_id: &str) -> Result<SpreadsheetDocument> {
        let mut url = self.endpoint(&["v4", "spreadsheets", document_id]);
        url.query_pairs_mut().append_pair("fields", DOCUMENT_FIELDS);

        let response: DocumentResponse = self.get_json(url).await?;

        let sheets_by_id: BTreeMap<u64, SheetProperties> = response
            .sheets
            .into_iter()
            .map(|s| (s.properties.sheet_id, s.properties))
            .collect();

        debug!(
            title = %response.properties.title,
            sheets = sheets_by_id.len(),
            "spreadsheet loaded"
        );

        Ok(SpreadsheetDocument {
            client: self.clone(),
            id: document_id.to_string(),
            title: response.properties.title,
            sheets_by_id,
        })
    }

    /// `{base}/{segments...}?key=...`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        // The query string carries the API key; keep it out of errors and logs.
        let shown = redact(&url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SheetSyncError::Network(format!("{shown}: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetSyncError::Http {
                url: shown,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            SheetSyncError::Network(format!("{shown}: failed to read body: {}", e.without_url()))
        })?;

        serde_json::from_str(&body)
            .map_err(|e| SheetSyncError::parse(format!("{shown}: unexpected response: {e}")))
    }
}

/// URL without its query string.
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

/// Quote a sheet title for use as an A1 range covering the whole sheet.
fn whole_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

// ---------------------------------------------------------------------------
// SpreadsheetDocument
// ---------------------------------------------------------------------------

/// A loaded document: its title and the sheets it contains.
#[derive(Debug, Clone)]
pub struct SpreadsheetDocument {
    client: SheetsClient,
    id: String,
    title: String,
    sheets_by_id: BTreeMap<u64, SheetProperties>,
}

impl SpreadsheetDocument {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sheets_by_id(&self) -> &BTreeMap<u64, SheetProperties> {
        &self.sheets_by_id
    }

    /// Look up a sheet by id.
    pub fn sheet(&self, sheet_id: u64) -> Result<&SheetProperties> {
        self.sheets_by_id
            .get(&sheet_id)
            .ok_or(SheetSyncError::SheetNotFound { sheet_id })
    }

    /// Read every data row of a sheet as header-keyed records.
    #[instrument(skip(self), fields(document_id = %self.id))]
    pub async fn records(&self, sheet_id: u64) -> Result<Vec<SheetRecord>> {
        let sheet = self.sheet(sheet_id)?;
        let range = whole_sheet_range(&sheet.title);
        let url = self
            .client
            .endpoint(&["v4", "spreadsheets", &self.id, "values", &range]);

        let value_range: ValueRange = self.client.get_json(url).await?;
        let records = records_from_values(value_range.values);

        debug!(title = %sheet.title, rows = records.len(), "sheet rows read");
        Ok(records)
    }

    /// Read every data row of a sheet decoded as `T`.
    pub async fn rows<T: DeserializeOwned>(&self, sheet_id: u64) -> Result<Vec<T>> {
        let records = self.records(sheet_id).await?;
        decode_records(&records)
    }
}
