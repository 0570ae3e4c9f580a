use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use emoji_downloader_core::{
    AssetUrls, CatalogClient, DownloadExecutor, GuildEnumerator, HttpFetcher, JobBuilder, ProgressSink, pipeline,
};
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::{config, exit_handler, progress_manager};
use crate::cli::Args;

/// Environment variable holding the Discord user token.
pub(crate) const TOKEN_ENV_VAR: &str = "DISCORD_USER_TOKEN";

/// Log directives appended to the default level so HTTP internals stay quiet.
const QUIET_DEPENDENCIES: &str = "hyper=warn,reqwest=warn";

pub(crate) fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("{default_level},{QUIET_DEPENDENCIES}"))
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_env_filter(filter)
        .try_init();
}

fn token_from_env() -> Option<String> {
    let token = std::env::var(TOKEN_ENV_VAR).ok()?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

pub(crate) async fn run_emoji_downloader() -> Result<ProcessExit> {
    let args = Args::parse();
    init_tracing(args.default_log_level());

    let Some(token) = token_from_env() else {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                format!("the {TOKEN_ENV_VAR} environment variable must be set to your Discord user token"),
            )
            .exit();
    };

    let loaded = config::load_config(args.config.as_deref())?;
    if let Some((path, _)) = &loaded {
        info!(path = %path.display(), "Loaded config file");
    }
    let settings = config::resolve_settings(&args, loaded.as_ref().map(|(_, file)| file));
    debug!(?settings, "Settings resolved");

    let client = CatalogClient::with_base_url_and_timeouts(
        &token,
        &settings.api_base_url,
        settings.connect_timeout_secs,
        settings.read_timeout_secs,
    )
    .context("Failed to create Discord API client")?;
    let fetcher = HttpFetcher::with_timeouts(settings.connect_timeout_secs, settings.read_timeout_secs)
        .context("Failed to create download client")?;
    let executor = DownloadExecutor::new(settings.concurrency)?;

    let enumerator = GuildEnumerator::new(client, args.selection());
    let builder = JobBuilder::with_urls(
        &settings.output_dir,
        AssetUrls::new(&settings.emoji_cdn_url, &settings.sticker_cdn_url),
    );

    info!(output_dir = %settings.output_dir.display(), concurrency = settings.concurrency, "Emoji downloader starting");

    let show_progress = progress_manager::should_show_progress(
        io::stderr().is_terminal(),
        args.quiet,
        progress_manager::is_dumb_terminal(),
    );
    let progress = Arc::new(progress_manager::TerminalProgress::new(show_progress));
    let sink: Arc<dyn ProgressSink> = progress.clone();

    let result = pipeline::run(enumerator, builder, &executor, Arc::new(fetcher), sink).await;
    progress.finish();
    let summary = result?;

    info!(
        guilds = summary.guilds,
        discovered = summary.discovered,
        remaining = summary.remaining,
        downloaded = summary.report.downloaded(),
        not_found = summary.report.failed(),
        "Sync complete"
    );

    Ok(exit_handler::determine_exit_outcome(&summary.report))
}
