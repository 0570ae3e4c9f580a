//! Remote guild catalog: records, API client and the lazy enumerator.
//!
//! The catalog side is read-only. Every guild is fetched individually as the
//! [`GuildEnumerator`] is pulled, and any failure is fatal for the run.
//!
//! # Example
//!
//! ```no_run
//! use emoji_downloader_core::catalog::{CatalogClient, GuildEnumerator, GuildSelection};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new("user-token")?;
//! let selection = GuildSelection::ByIds(vec!["81384788765712384".to_string()]);
//! let mut guilds = GuildEnumerator::new(client, selection);
//! while let Some(guild) = guilds.next_guild().await? {
//!     println!("{}: {} emojis", guild.name, guild.emojis.len());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod enumerator;
mod error;
mod model;

pub use client::{CatalogClient, DEFAULT_API_BASE_URL};
pub use enumerator::{GuildEnumerator, GuildSelection};
pub use error::CatalogError;
pub use model::{Emoji, Guild, GuildRecord, Sticker, merge_records};
