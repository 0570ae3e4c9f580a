//! Config file loading and CLI > file > default resolution.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::Url;

use emoji_downloader_core::catalog::DEFAULT_API_BASE_URL;
use emoji_downloader_core::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY, READ_TIMEOUT_SECS,
};
use emoji_downloader_core::jobs::{DEFAULT_EMOJI_CDN_URL, DEFAULT_STICKER_CDN_URL};

use crate::cli::Args;

const DEFAULT_OUTPUT_DIR: &str = "download";
const CONFIG_DIR_NAME: &str = "emoji-downloader";
const CONFIG_FILE_NAME: &str = "config.toml";

/// TOML-backed file configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    /// Output root directory.
    pub output_dir: Option<PathBuf>,
    /// Simultaneous downloads (same range as CLI).
    pub concurrency: Option<usize>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP total request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Discord API base URL, without version segment.
    pub api_base_url: Option<String>,
    /// Host serving emoji images.
    pub emoji_cdn_url: Option<String>,
    /// Host serving sticker images.
    pub sticker_cdn_url: Option<String>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency)
        {
            bail!(
                "Invalid config value for `concurrency`: {concurrency}. Expected range: {MIN_CONCURRENCY}..={MAX_CONCURRENCY}"
            );
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_url("api_base_url", self.api_base_url.as_deref())?;
        validate_url("emoji_cdn_url", self.emoji_cdn_url.as_deref())?;
        validate_url("sticker_cdn_url", self.sticker_cdn_url.as_deref())?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

fn validate_url(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let url = Url::parse(value)
        .with_context(|| format!("Invalid config value for `{field}`: '{value}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid config value for `{field}`: '{value}'. Expected an http(s) URL");
    }
    Ok(())
}

/// Parses and validates a config document.
pub(crate) fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/emoji-downloader/config.toml`
/// 2. `$HOME/.config/emoji-downloader/config.toml`
#[must_use]
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    default_config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn default_config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist; the default path is only read if present.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Option<(PathBuf, FileConfig)>> {
    if let Some(path) = explicit {
        return Ok(Some((path.to_path_buf(), load_file_config(path)?)));
    }
    let Some(path) = resolve_default_config_path() else {
        return Ok(None);
    };
    if !path.is_file() {
        return Ok(None);
    }
    let config = load_file_config(&path)?;
    Ok(Some((path, config)))
}

/// Effective runtime settings after applying precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedSettings {
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub api_base_url: String,
    pub emoji_cdn_url: String,
    pub sticker_cdn_url: String,
}

/// Merges CLI flags over file values over built-in defaults.
#[must_use]
pub(crate) fn resolve_settings(args: &Args, file: Option<&FileConfig>) -> ResolvedSettings {
    let file = file.cloned().unwrap_or_default();
    ResolvedSettings {
        output_dir: args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        concurrency: args
            .concurrency
            .map(usize::from)
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY),
        connect_timeout_secs: file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
        read_timeout_secs: file.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
        api_base_url: file
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        emoji_cdn_url: file
            .emoji_cdn_url
            .unwrap_or_else(|| DEFAULT_EMOJI_CDN_URL.to_string()),
        sticker_cdn_url: file
            .sticker_cdn_url
            .unwrap_or_else(|| DEFAULT_STICKER_CDN_URL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["emoji-downloader", "--my-guilds"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str("output_dir = \"/srv/emojis\"\nconcurrency = 8\n").unwrap();
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/srv/emojis")));
        assert_eq!(cfg.concurrency, Some(8));
        assert_eq!(cfg.read_timeout_secs, None);
    }

    #[test]
    fn test_parse_config_empty_document_is_default() {
        assert_eq!(parse_config_str("# nothing here\n").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config_str("rate_limit = 100\n").unwrap_err();
        assert!(err.to_string().contains("rate_limit"), "got: {err}");
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_concurrency() {
        let err = parse_config_str("concurrency = 64\n").unwrap_err();
        assert!(err.to_string().contains("concurrency"), "got: {err}");
        assert!(parse_config_str("concurrency = 0\n").is_err());
    }

    #[test]
    fn test_parse_config_rejects_zero_timeout() {
        let err = parse_config_str("connect_timeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("connect_timeout_secs"), "got: {err}");
    }

    #[test]
    fn test_parse_config_rejects_non_http_url() {
        assert!(parse_config_str("emoji_cdn_url = \"not a url\"\n").is_err());
        assert!(parse_config_str("api_base_url = \"ftp://discord.com/api\"\n").is_err());
        assert!(parse_config_str("sticker_cdn_url = \"http://127.0.0.1:9000\"\n").is_ok());
    }

    #[test]
    fn test_parse_config_rejects_wrong_type() {
        assert!(parse_config_str("concurrency = \"three\"\n").is_err());
    }

    #[test]
    fn test_default_config_path_prefers_xdg() {
        let path = default_config_path_from(Some("/xdg".into()), Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/xdg/emoji-downloader/config.toml"));
    }

    #[test]
    fn test_default_config_path_falls_back_to_home() {
        let path = default_config_path_from(None, Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.config/emoji-downloader/config.toml"));
        assert_eq!(default_config_path_from(None, None), None);
    }

    #[test]
    fn test_load_config_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"), "got: {err}");
    }

    #[test]
    fn test_load_config_explicit_file_is_parsed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.toml");
        std::fs::write(&path, "concurrency = 5\n").unwrap();

        let (loaded_path, cfg) = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded_path, path);
        assert_eq!(cfg.concurrency, Some(5));
    }

    #[test]
    fn test_resolve_settings_uses_defaults_without_file() {
        let settings = resolve_settings(&args(&[]), None);
        assert_eq!(settings.output_dir, PathBuf::from("download"));
        assert_eq!(settings.concurrency, 3);
        assert_eq!(settings.connect_timeout_secs, 30);
        assert_eq!(settings.read_timeout_secs, 300);
        assert_eq!(settings.api_base_url, "https://discord.com/api");
        assert_eq!(settings.emoji_cdn_url, "https://cdn.discordapp.com");
        assert_eq!(settings.sticker_cdn_url, "https://media.discordapp.net");
    }

    #[test]
    fn test_resolve_settings_file_overrides_defaults() {
        let file = parse_config_str(
            "output_dir = \"/srv/emojis\"\nconcurrency = 7\nread_timeout_secs = 60\n",
        )
        .unwrap();
        let settings = resolve_settings(&args(&[]), Some(&file));
        assert_eq!(settings.output_dir, PathBuf::from("/srv/emojis"));
        assert_eq!(settings.concurrency, 7);
        assert_eq!(settings.read_timeout_secs, 60);
    }

    #[test]
    fn test_resolve_settings_cli_overrides_file() {
        let file = parse_config_str("output_dir = \"/srv/emojis\"\nconcurrency = 7\n").unwrap();
        let settings = resolve_settings(&args(&["-o", "./mine", "-c", "2"]), Some(&file));
        assert_eq!(settings.output_dir, PathBuf::from("./mine"));
        assert_eq!(settings.concurrency, 2);
    }
}
