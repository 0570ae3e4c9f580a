//! Download job construction.
//!
//! Turns guild records into flat [`DownloadJob`]s with deterministic
//! destinations, writes each guild's `info.json` snapshot, and filters out
//! jobs whose destination already exists.
//!
//! Output layout:
//!
//! ```text
//! <root>/<guild>/info.json
//! <root>/<guild>/emojis/<emoji>.<gif|png>
//! <root>/<guild>/stickers/<sticker>.png
//! ```

mod builder;
mod dedup;
mod error;
mod job;
mod sanitize;

pub use builder::{AssetUrls, DEFAULT_EMOJI_CDN_URL, DEFAULT_STICKER_CDN_URL, JobBuilder};
pub use dedup::pending_jobs;
pub use error::JobError;
pub use job::DownloadJob;
pub use sanitize::clean_name_for_fs;
