//! Row types read from the spreadsheet and the values derived from them.
//!
//! Field names follow the sheet header strings verbatim (`name:en`,
//! `image:horizontal`, `canPublish`, ...). Every field defaults to an empty
//! string so a missing column decodes the same as a blank cell.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value of the publish flag that makes a row eligible for output.
pub const PUBLISH_YES: &str = "Y";

// ---------------------------------------------------------------------------
// SponsorLevel
// ---------------------------------------------------------------------------

/// Sponsorship tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SponsorLevel {
    Titanium,
    Diamond,
    CoOrganizer,
    Gold,
    Bronze,
    Silver,
    SpecialThanks,
    Friend,
    /// Anything the sheet holds that is not a known tier, including blank.
    Other(String),
}

impl SponsorLevel {
    /// The sheet spelling of this tier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Titanium => "titanium",
            Self::Diamond => "diamond",
            Self::CoOrganizer => "co-organizer",
            Self::Gold => "gold",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::SpecialThanks => "special-thanks",
            Self::Friend => "friend",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for SponsorLevel {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for SponsorLevel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "titanium" => Self::Titanium,
            "diamond" => Self::Diamond,
            "co-organizer" => Self::CoOrganizer,
            "gold" => Self::Gold,
            "bronze" => Self::Bronze,
            "silver" => Self::Silver,
            "special-thanks" => Self::SpecialThanks,
            "friend" => Self::Friend,
            _ => Self::Other(raw),
        }
    }
}

impl From<SponsorLevel> for String {
    fn from(level: SponsorLevel) -> Self {
        match level {
            SponsorLevel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SponsorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One row of the sponsor sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SponsorRow {
    pub id: String,
    pub level: SponsorLevel,
    #[serde(rename = "name:en")]
    pub name_en: String,
    #[serde(rename = "name:zh-TW")]
    pub name_zh_tw: String,
    #[serde(rename = "intro:en")]
    pub intro_en: String,
    #[serde(rename = "intro:zh-TW")]
    pub intro_zh_tw: String,
    pub link: String,
    /// Logo URL.
    pub image: String,
    #[serde(rename = "canPublish")]
    pub can_publish: String,
}

impl SponsorRow {
    pub fn is_publishable(&self) -> bool {
        self.can_publish == PUBLISH_YES
    }
}

/// One row of the sponsor news sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SponsorNewsRow {
    #[serde(rename = "sponsorId")]
    pub sponsor_id: String,
    #[serde(rename = "newsId")]
    pub news_id: String,
    pub description: String,
    pub link: String,
    #[serde(rename = "image:vertical")]
    pub image_vertical: String,
    #[serde(rename = "image:horizontal")]
    pub image_horizontal: String,
    /// Ordering weight, kept as the raw cell text.
    #[serde(rename = "specialWeight")]
    pub special_weight: String,
    #[serde(rename = "canPublish")]
    pub can_publish: String,
}

impl SponsorNewsRow {
    pub fn is_publishable(&self) -> bool {
        self.can_publish == PUBLISH_YES
    }
}

/// One row of the room-to-livestream sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeRow {
    pub room: String,
    pub link: String,
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// One image to fetch: saved as `{stem}.png` under the pass's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub stem: String,
    pub url: String,
}

impl DownloadEntry {
    pub fn new(stem: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            url: url.into(),
        }
    }

    /// File name the fetched bytes are written to. Always `.png`.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.stem)
    }
}

/// Room name to livestream link, in first-seen room order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkMap(IndexMap<String, String>);

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a map with `room` set to `link`. An existing room keeps its
    /// position and takes the new link.
    pub fn with(mut self, room: impl Into<String>, link: impl Into<String>) -> Self {
        self.0.insert(room.into(), link.into());
        self
    }

    pub fn get(&self, room: &str) -> Option<&str> {
        self.0.get(room).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
