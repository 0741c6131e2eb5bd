//! Error types for doppler-env resolution

use thiserror::Error;

/// Everything that can go wrong during one resolution attempt.
///
/// None of these are fatal to the host process: the [`Loader`](crate::Loader)
/// catches every variant at the strategy boundary, reports it through the
/// diagnostic sink, and continues with zero secrets resolved.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("The Doppler CLI is not installed. See https://docs.doppler.com/docs/install-cli.")]
    ToolNotInstalled,
    #[error("CLI failed to load secrets. Please make sure `doppler setup` has been run.")]
    ToolExecutionFailed,
    #[error(
        "DOPPLER_PROJECT and DOPPLER_CONFIG environment variables must be set if using a CLI or Personal Token."
    )]
    MissingConfiguration,
    #[error("Please make sure you're using a valid Doppler token.")]
    Unauthorized,
    #[error("A failure occurred while attempting to load secrets.")]
    RequestFailed { detail: String },
    #[error("Secrets payload was not a JSON object of strings: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A type alias for `Result<T, ResolutionError>`.
pub type Result<T> = std::result::Result<T, ResolutionError>;

impl From<reqwest::Error> for ResolutionError {
    fn from(err: reqwest::Error) -> Self {
        // Transport failures (DNS, TLS, connect) classify the same as an
        // unexpected HTTP status.
        ResolutionError::RequestFailed {
            detail: err.to_string(),
        }
    }
}
