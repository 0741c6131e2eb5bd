use crate::Result;
use crate::context::ResolutionContext;
use crate::secrets::SecretSet;

pub mod api;
pub mod cli;

#[cfg(test)]
pub(crate) mod tests;

pub use api::{ApiStrategy, HttpClient, HttpResponse, HttpTransport};
pub use cli::{CliStrategy, CommandRunner, SystemRunner};

/// An acquisition strategy: one way of turning a [`ResolutionContext`] into a
/// full [`SecretSet`].
///
/// A strategy either yields the complete set or fails; there are no partial
/// results and no retries.
pub trait Strategy {
    fn resolve(&self, ctx: &ResolutionContext) -> Result<SecretSet>;

    /// Returns the name of this strategy for display purposes
    fn name(&self) -> &'static str;
}

/// Which strategy a resolution attempt will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Authenticated call to the Doppler API. Chosen whenever a token is set.
    Api,
    /// `doppler` CLI subprocess, expecting `doppler setup` to have been run.
    Cli,
}

/// Picks the strategy for a context. Exclusive choice: the API path needs a
/// token, the CLI path is the unconditional fallback.
pub fn choose(ctx: &ResolutionContext) -> StrategyKind {
    if ctx.has_token() {
        StrategyKind::Api
    } else {
        StrategyKind::Cli
    }
}
