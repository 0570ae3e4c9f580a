//! Expands guild records into download jobs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::error::JobError;
use super::job::DownloadJob;
use super::sanitize::clean_name_for_fs;
use crate::catalog::Guild;

/// Default host serving emoji images.
pub const DEFAULT_EMOJI_CDN_URL: &str = "https://cdn.discordapp.com";

/// Default host serving sticker images.
pub const DEFAULT_STICKER_CDN_URL: &str = "https://media.discordapp.net";

const SNAPSHOT_FILE: &str = "info.json";
const EMOJI_DIR: &str = "emojis";
const STICKER_DIR: &str = "stickers";

/// Asset URL templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrls {
    emoji_base: String,
    sticker_base: String,
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self::new(DEFAULT_EMOJI_CDN_URL, DEFAULT_STICKER_CDN_URL)
    }
}

impl AssetUrls {
    /// Creates URL templates rooted at custom hosts (mirrors, wiremock).
    #[must_use]
    pub fn new(emoji_base: &str, sticker_base: &str) -> Self {
        Self {
            emoji_base: emoji_base.trim_end_matches('/').to_string(),
            sticker_base: sticker_base.trim_end_matches('/').to_string(),
        }
    }

    /// URL of an emoji image; GIF when animated.
    #[must_use]
    pub fn emoji(&self, emoji_id: &str, animated: bool) -> String {
        let ext = if animated { "gif" } else { "png" };
        format!("{}/emojis/{emoji_id}.{ext}?v=1", self.emoji_base)
    }

    /// URL of a sticker image.
    #[must_use]
    pub fn sticker(&self, sticker_id: &str) -> String {
        format!("{}/stickers/{sticker_id}.png?size=1024", self.sticker_base)
    }
}

/// Kind of item a path is claimed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ClaimKind {
    Guild,
    Emoji,
    Sticker,
}

/// Builds jobs for one guild at a time under a fixed output root.
///
/// The builder remembers which guild, emoji, or sticker owns every path it has
/// handed out during the run. An item seen again keeps its path. A different
/// item whose sanitized name collides with an earlier one (compared without
/// case) is written to `<name>_<id>.<ext>` instead, so destinations stay
/// unique and stable across runs as long as catalog order is stable.
#[derive(Debug)]
pub struct JobBuilder {
    root: PathBuf,
    urls: AssetUrls,
    claimed: HashMap<(ClaimKind, String), PathBuf>,
    taken: HashSet<String>,
    built: HashSet<String>,
}

impl JobBuilder {
    /// Creates a builder writing under `root` with the public CDN hosts.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_urls(root, AssetUrls::default())
    }

    /// Creates a builder with custom asset URL templates.
    #[must_use]
    pub fn with_urls(root: impl Into<PathBuf>, urls: AssetUrls) -> Self {
        Self {
            root: root.into(),
            urls,
            claimed: HashMap::new(),
            taken: HashSet::new(),
            built: HashSet::new(),
        }
    }

    /// Output root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the guild directory, rewrites its `info.json`, and returns one
    /// job per emoji followed by one job per sticker.
    ///
    /// The snapshot is written unconditionally, even when every asset is
    /// already on disk. A guild already built earlier in the run keeps its
    /// directory and yields no jobs the second time.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] if the directory or snapshot cannot be written.
    #[instrument(skip(self, guild), fields(guild_id = %guild.id))]
    pub fn build(&mut self, guild: &Guild) -> Result<Vec<DownloadJob>, JobError> {
        let root = self.root.clone();
        let guild_dir = self.claim(ClaimKind::Guild, &root, &guild.name, &guild.id, None);
        std::fs::create_dir_all(&guild_dir).map_err(|e| JobError::io(&guild_dir, e))?;
        write_snapshot(&guild_dir, guild)?;

        if !self.built.insert(guild.id.clone()) {
            debug!(dir = %guild_dir.display(), "guild already built in this run");
            return Ok(Vec::new());
        }

        let emoji_dir = guild_dir.join(EMOJI_DIR);
        let sticker_dir = guild_dir.join(STICKER_DIR);
        let mut jobs = Vec::with_capacity(guild.asset_count());

        for emoji in &guild.emojis {
            let ext = if emoji.animated { "gif" } else { "png" };
            let dest = self.claim(ClaimKind::Emoji, &emoji_dir, &emoji.name, &emoji.id, Some(ext));
            jobs.push(DownloadJob::new(
                format!("{}:{}", guild.name, emoji.name),
                self.urls.emoji(&emoji.id, emoji.animated),
                dest,
            ));
        }

        for sticker in &guild.stickers {
            let dest = self.claim(
                ClaimKind::Sticker,
                &sticker_dir,
                &sticker.name,
                &sticker.id,
                Some("png"),
            );
            jobs.push(DownloadJob::new(
                format!("{}:{}", guild.name, sticker.name),
                self.urls.sticker(&sticker.id),
                dest,
            ));
        }

        debug!(
            emojis = guild.emojis.len(),
            stickers = guild.stickers.len(),
            dir = %guild_dir.display(),
            "built jobs for guild"
        );
        Ok(jobs)
    }

    /// Reserves a unique path `dir/<stem>[.ext]` for an item.
    ///
    /// The stem is the sanitized name, or the id when the name sanitizes to
    /// nothing. Collisions fall back to `<stem>_<id>` and then numeric suffixes.
    /// An item claimed before gets its earlier path back.
    fn claim(
        &mut self,
        kind: ClaimKind,
        dir: &Path,
        name: &str,
        id: &str,
        ext: Option<&str>,
    ) -> PathBuf {
        let key = (kind, id.to_string());
        if let Some(path) = self.claimed.get(&key) {
            return path.clone();
        }

        let cleaned = clean_name_for_fs(name);
        let stem = if cleaned.is_empty() { id } else { cleaned.as_str() };
        let file_name = |stem: &str| match ext {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_string(),
        };

        let preferred = dir.join(file_name(stem));
        let path = if self.reserve(&preferred) {
            preferred
        } else {
            let mut candidate = dir.join(file_name(&format!("{stem}_{id}")));
            let mut suffix = 2;
            while !self.reserve(&candidate) {
                candidate = dir.join(file_name(&format!("{stem}_{id}_{suffix}")));
                suffix += 1;
            }
            warn!(
                name,
                id,
                taken = %preferred.display(),
                using = %candidate.display(),
                "sanitized name collides with an earlier item"
            );
            candidate
        };
        self.claimed.insert(key, path.clone());
        path
    }

    /// Marks `path` as taken; false if it, or a case variant of it, already is.
    fn reserve(&mut self, path: &Path) -> bool {
        self.taken.insert(path.to_string_lossy().to_lowercase())
    }
}

fn write_snapshot(guild_dir: &Path, guild: &Guild) -> Result<(), JobError> {
    let path = guild_dir.join(SNAPSHOT_FILE);
    let sorted = sorted_keys(&Value::Object(guild.record().clone()));
    let body = serde_json::to_string_pretty(&sorted).map_err(|source| JobError::Snapshot {
        guild_id: guild.id.clone(),
        source,
    })?;
    std::fs::write(&path, body).map_err(|e| JobError::io(&path, e))
}

/// Rebuilds a JSON value with every object's keys in lexicographic order.
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}
