use reqwest::{RequestBuilder, Response, Url};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("invalid Supabase URL: {0}")]
    InvalidUrl(String),
    #[error("Supabase request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Supabase responded with {status}: {body}")]
    Status { status: u16, body: String },
}

/// Authenticated HTTP client for one Supabase project.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, SupabaseError> {
        let user_agent = format!("registrar/{}", env!("CARGO_PKG_VERSION"));
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build `{base_url}/{segments...}`, percent-encoding each segment.
    pub fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, SupabaseError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| SupabaseError::InvalidUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| SupabaseError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(super) fn post(&self, url: Url) -> RequestBuilder {
        self.http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Turn a non-2xx response into [`SupabaseError::Status`], keeping the body
/// for the logs.
pub(super) async fn ensure_success(response: Response) -> Result<Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SupabaseError::Status {
        status: status.as_u16(),
        body,
    })
}
