//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use emoji_downloader_core::GuildSelection;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0  every asset is on disk
  1  run finished, but some assets were not found
  2  fatal error (network, filesystem, configuration or usage)

The user token is read from the DISCORD_USER_TOKEN environment variable.";

/// Archive the custom emojis and stickers of Discord guilds.
///
/// Each guild gets a directory holding its metadata snapshot (`info.json`)
/// and its assets. Files already on disk are never fetched again, so the
/// same command can be re-run to pick up new assets.
#[derive(Parser, Debug)]
#[command(name = "emoji-downloader")]
#[command(author, version, about, after_help = EXIT_CODES_HELP)]
#[command(group(
    ArgGroup::new("selector")
        .required(true)
        .multiple(false)
        .args(["guild_id", "source_emoji_id", "my_guilds"])
))]
pub struct Args {
    /// Download the guilds with these ids
    #[arg(long = "guild-id", value_name = "ID", num_args = 1..)]
    pub guild_id: Vec<u64>,

    /// Download the guilds that own these emoji ids
    #[arg(long = "source-emoji-id", value_name = "ID", num_args = 1..)]
    pub source_emoji_id: Vec<u64>,

    /// Download every guild you are a member of
    #[arg(long)]
    pub my_guilds: bool,

    /// Output root directory [default: download]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads (1-32) [default: 3]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub concurrency: Option<u8>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Guild selection strategy picked by the selector flags.
    #[must_use]
    pub fn selection(&self) -> GuildSelection {
        if !self.guild_id.is_empty() {
            GuildSelection::ByIds(self.guild_id.iter().map(u64::to_string).collect())
        } else if !self.source_emoji_id.is_empty() {
            GuildSelection::BySourceEmoji(self.source_emoji_id.iter().map(u64::to_string).collect())
        } else {
            GuildSelection::Mine
        }
    }

    /// Default log level derived from `-q`/`-v`.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
