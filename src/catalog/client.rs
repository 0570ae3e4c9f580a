//! HTTP client for the Discord catalog endpoints.
//!
//! All requests are authenticated with the caller's user token and decoded as
//! JSON objects. Status handling is deliberately flat: anything other than a
//! 2xx response becomes [`CatalogError::HttpStatus`].

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::error::CatalogError;
use super::model::GuildRecord;
use crate::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::user_agent;

/// Default Discord API base URL (without version segment).
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api";

/// Authenticated client for guild listing, guild detail and emoji source lookup.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Creates a client against the public Discord API with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidToken`] if the token is not a valid header
    /// value, or [`CatalogError::ClientBuild`] if reqwest rejects the configuration.
    pub fn new(token: &str) -> Result<Self, CatalogError> {
        Self::with_base_url(token, DEFAULT_API_BASE_URL)
    }

    /// Creates a client against a custom API base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::new`], plus [`CatalogError::InvalidBaseUrl`].
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, CatalogError> {
        Self::with_base_url_and_timeouts(token, base_url, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit base URL and timeout values.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::with_base_url`].
    #[instrument(level = "debug", skip(token))]
    pub fn with_base_url_and_timeouts(
        token: &str,
        base_url: &str,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        Url::parse(base_url).map_err(|_| CatalogError::InvalidBaseUrl {
            url: base_url.to_string(),
        })?;

        let mut auth = HeaderValue::from_str(token).map_err(|_| CatalogError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .default_headers(headers)
            .build()
            .map_err(CatalogError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists summary records of every guild the caller belongs to.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-success status or non-array body.
    #[instrument(skip(self))]
    pub async fn list_my_guilds(&self) -> Result<Vec<GuildRecord>, CatalogError> {
        let url = format!("{}/v10/users/@me/guilds", self.base_url);
        match self.get_json(&url).await? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    _ => Err(CatalogError::malformed(&url, "guild list entry is not an object")),
                })
                .collect(),
            _ => Err(CatalogError::malformed(&url, "expected a JSON array of guilds")),
        }
    }

    /// Fetches the full detail record of one guild.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-success status or non-object body.
    #[instrument(skip(self))]
    pub async fn guild_detail(&self, guild_id: &str) -> Result<GuildRecord, CatalogError> {
        let url = format!("{}/v10/guilds/{guild_id}", self.base_url);
        self.get_object(&url).await
    }

    /// Resolves an emoji id to the guild that owns it.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-success status, or a body without a `guild` object.
    #[instrument(skip(self))]
    pub async fn guild_for_emoji(&self, emoji_id: &str) -> Result<GuildRecord, CatalogError> {
        let url = format!("{}/v9/emojis/{emoji_id}/source", self.base_url);
        let mut source = self.get_object(&url).await?;
        match source.remove("guild") {
            Some(Value::Object(guild)) => Ok(guild),
            _ => Err(CatalogError::malformed(&url, "missing `guild` object")),
        }
    }

    async fn get_object(&self, url: &str) -> Result<GuildRecord, CatalogError> {
        match self.get_json(url).await? {
            Value::Object(record) => Ok(record),
            _ => Err(CatalogError::malformed(url, "expected a JSON object")),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, CatalogError> {
        debug!(url, "fetching catalog resource");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::http_status(url, status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CatalogError::malformed(url, e.to_string()))
    }
}
