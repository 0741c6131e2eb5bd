use super::Strategy;
use crate::context::ResolutionContext;
use crate::error::{ResolutionError, Result};
use crate::secrets::SecretSet;
use http::StatusCode;
use url::Url;

/// The fixed secrets-download endpoint.
pub const DOWNLOAD_URL: &str = "https://api.doppler.com/v3/configs/config/secrets/download";

/// A completed HTTP exchange, reduced to what classification needs.
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Capability to perform one authenticated GET.
///
/// Injected so tests can classify canned responses without a network. The
/// token travels as the Basic-auth username with an empty password.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &Url, token: &str) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by a blocking reqwest client.
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for HttpClient {
    fn get(&self, url: &Url, token: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url.as_str())
            .basic_auth(token, Some(""))
            .send()?;
        let status = response.status();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Resolves secrets with one authenticated GET against the Doppler API.
///
/// Service tokens (`dp.st` prefix) carry their project/config scope; any
/// other token kind must be accompanied by explicit project and config
/// identifiers, checked before a request is sent.
pub struct ApiStrategy<'t> {
    transport: &'t dyn HttpTransport,
    endpoint: Url,
}

impl<'t> ApiStrategy<'t> {
    pub fn new(transport: &'t dyn HttpTransport) -> Self {
        Self {
            transport,
            endpoint: Url::parse(DOWNLOAD_URL).expect("static endpoint URL is valid"),
        }
    }

    /// Download URL for a context. Absent project/config encode as empty
    /// query values, which the API rejects for non-service tokens anyway.
    fn download_url(&self, ctx: &ResolutionContext) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("project", ctx.project.as_deref().unwrap_or(""))
            .append_pair("config", ctx.config.as_deref().unwrap_or(""))
            .append_pair("format", "json");
        url
    }
}

impl Strategy for ApiStrategy<'_> {
    fn resolve(&self, ctx: &ResolutionContext) -> Result<SecretSet> {
        let has_scope = ctx.project.is_some() && ctx.config.is_some();
        if !has_scope && !ctx.is_service_token() {
            return Err(ResolutionError::MissingConfiguration);
        }
        let token = ctx
            .token
            .as_deref()
            .ok_or(ResolutionError::MissingConfiguration)?;

        let response = self.transport.get(&self.download_url(ctx), token)?;

        if response.status.is_success() {
            Ok(serde_json::from_str(&response.body)?)
        } else if response.status == StatusCode::UNAUTHORIZED {
            Err(ResolutionError::Unauthorized)
        } else {
            Err(ResolutionError::RequestFailed {
                detail: format!("HTTP {}: {}", response.status, response.body.trim()),
            })
        }
    }

    fn name(&self) -> &'static str {
        "api"
    }
}
