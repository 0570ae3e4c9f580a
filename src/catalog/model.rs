//! Guild, emoji and sticker records.
//!
//! A [`Guild`] keeps the raw JSON object returned by the API next to the typed
//! projection the job builder needs, so the metadata snapshot can be written
//! with every field the service sent.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw JSON object for one guild, exactly as returned by the service.
pub type GuildRecord = Map<String, Value>;

/// A custom emoji; may be animated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Emoji {
    /// Snowflake id used to build the CDN URL.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Whether the CDN serves this emoji as a GIF.
    #[serde(default)]
    pub animated: bool,
}

/// A guild sticker; always fetched as PNG.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sticker {
    /// Snowflake id used to build the media URL.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct GuildProjection {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    emojis: Vec<Emoji>,
    #[serde(default)]
    stickers: Vec<Sticker>,
}

/// One guild with its assets in catalog order.
#[derive(Debug, Clone)]
pub struct Guild {
    /// Snowflake id.
    pub id: String,
    /// Display name (unsanitized).
    pub name: String,
    /// Custom emojis in the order the service listed them.
    pub emojis: Vec<Emoji>,
    /// Stickers in the order the service listed them.
    pub stickers: Vec<Sticker>,
    record: GuildRecord,
}

impl Guild {
    /// Builds a guild from its raw record, keeping the record for snapshots.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error when `id` is missing or any emoji or
    /// sticker entry lacks an `id`.
    pub fn from_record(record: GuildRecord) -> Result<Self, serde_json::Error> {
        let projection = GuildProjection::deserialize(Value::Object(record.clone()))?;
        Ok(Self {
            id: projection.id,
            name: projection.name,
            emojis: projection.emojis,
            stickers: projection.stickers,
            record,
        })
    }

    /// The full raw record.
    #[must_use]
    pub fn record(&self) -> &GuildRecord {
        &self.record
    }

    /// Total number of downloadable assets.
    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.emojis.len() + self.stickers.len()
    }
}

/// Merges a guild summary with its detail record; detail keys win.
#[must_use]
pub fn merge_records(summary: GuildRecord, detail: GuildRecord) -> GuildRecord {
    let mut merged = summary;
    merged.extend(detail);
    merged
}
