//! Lazy, single-pass guild enumeration.
//!
//! A [`GuildEnumerator`] performs its network fetches only when pulled via
//! [`GuildEnumerator::next_guild`]. It is forward-only and cannot be restarted.
//! The first error ends the sequence: subsequent calls return `Ok(None)`.

use std::collections::VecDeque;

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::client::CatalogClient;
use super::error::CatalogError;
use super::model::{Guild, GuildRecord, merge_records};

/// Which guilds to enumerate. The three strategies are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuildSelection {
    /// Every guild the authenticated user belongs to.
    Mine,
    /// Guilds by explicit id.
    ByIds(Vec<String>),
    /// Guilds that own the given emoji ids (reverse lookup).
    BySourceEmoji(Vec<String>),
}

#[derive(Debug)]
enum Pending {
    /// `Mine` before the guild listing has been fetched.
    Unlisted,
    /// `Mine` after listing: summaries awaiting their detail fetch.
    Summaries(VecDeque<GuildRecord>),
    GuildIds(VecDeque<String>),
    EmojiIds(VecDeque<String>),
    Exhausted,
}

/// Pull-based sequence of [`Guild`] records.
#[derive(Debug)]
pub struct GuildEnumerator {
    client: CatalogClient,
    pending: Pending,
    total: Option<usize>,
    fetched: usize,
}

impl GuildEnumerator {
    /// Creates an enumerator; no request is made until the first pull.
    #[must_use]
    pub fn new(client: CatalogClient, selection: GuildSelection) -> Self {
        let (pending, total) = match selection {
            GuildSelection::Mine => (Pending::Unlisted, None),
            GuildSelection::ByIds(ids) => {
                let total = ids.len();
                (Pending::GuildIds(ids.into()), Some(total))
            }
            GuildSelection::BySourceEmoji(ids) => {
                let total = ids.len();
                (Pending::EmojiIds(ids.into()), Some(total))
            }
        };
        Self {
            client,
            pending,
            total,
            fetched: 0,
        }
    }

    /// Number of guilds this enumerator will yield, once known.
    ///
    /// For [`GuildSelection::Mine`] this is `None` until the listing request
    /// has been made by the first pull.
    #[must_use]
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// Number of guilds yielded so far.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Fetches the next guild.
    ///
    /// Returns `Ok(None)` when the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the [`CatalogError`] of the first failed request. The
    /// enumerator is exhausted afterwards; no partial skip is attempted.
    #[instrument(skip(self), fields(fetched = self.fetched))]
    pub async fn next_guild(&mut self) -> Result<Option<Guild>, CatalogError> {
        match self.pull().await {
            Ok(Some(guild)) => {
                self.fetched += 1;
                debug!(guild_id = %guild.id, name = %guild.name, assets = guild.asset_count(), "fetched guild");
                Ok(Some(guild))
            }
            Ok(None) => {
                self.pending = Pending::Exhausted;
                Ok(None)
            }
            Err(error) => {
                self.pending = Pending::Exhausted;
                Err(error)
            }
        }
    }

    async fn pull(&mut self) -> Result<Option<Guild>, CatalogError> {
        if matches!(self.pending, Pending::Unlisted) {
            let summaries = self.client.list_my_guilds().await?;
            info!(guilds = summaries.len(), "listed guilds");
            self.total = Some(summaries.len());
            self.pending = Pending::Summaries(summaries.into());
        }

        let (record, url_hint) = match &mut self.pending {
            Pending::Unlisted | Pending::Exhausted => return Ok(None),
            Pending::Summaries(summaries) => {
                let Some(summary) = summaries.pop_front() else {
                    return Ok(None);
                };
                let Some(id) = summary.get("id").and_then(Value::as_str).map(str::to_string)
                else {
                    return Err(CatalogError::malformed(
                        "/v10/users/@me/guilds",
                        "guild summary without string `id`",
                    ));
                };
                let detail = self.client.guild_detail(&id).await?;
                (merge_records(summary, detail), format!("/v10/guilds/{id}"))
            }
            Pending::GuildIds(ids) => {
                let Some(id) = ids.pop_front() else {
                    return Ok(None);
                };
                (self.client.guild_detail(&id).await?, format!("/v10/guilds/{id}"))
            }
            Pending::EmojiIds(ids) => {
                let Some(id) = ids.pop_front() else {
                    return Ok(None);
                };
                (
                    self.client.guild_for_emoji(&id).await?,
                    format!("/v9/emojis/{id}/source"),
                )
            }
        };

        Guild::from_record(record)
            .map(Some)
            .map_err(|e| CatalogError::malformed(url_hint, e.to_string()))
    }
}
