//! Fetch secrets from [Doppler](https://doppler.com) and inject them into the
//! process environment.
//!
//! One call at process startup resolves the active config's secrets and makes
//! them visible as environment variables:
//!
//! ```no_run
//! doppler_env::load();
//! ```
//!
//! If `DOPPLER_TOKEN` is set, secrets come from the Doppler API (service
//! tokens carry their project/config scope; CLI and Personal tokens need
//! `DOPPLER_PROJECT` and `DOPPLER_CONFIG` alongside). Without a token, the
//! locally configured `doppler` CLI is invoked instead. [`load`] leaves
//! already-set variables untouched; [`load_force`] overwrites them.
//!
//! Failure is never fatal: every error degrades to a diagnostic plus zero
//! secrets resolved, and the process continues with the environment it
//! already had.

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod inject;
pub mod secrets;
pub mod store;
pub mod strategy;

pub use context::ResolutionContext;
pub use error::{ResolutionError, Result};
pub use inject::InjectionPolicy;
pub use secrets::SecretSet;

use context::{CONFIG_VAR, ENVIRONMENT_VAR, PROJECT_VAR};
use diagnostics::{DebugInfo, Diagnostic, DiagnosticSink, StdoutSink};
use inject::inject;
use store::{EnvStore, ProcessEnv};
use strategy::{
    ApiStrategy, CliStrategy, HttpClient, HttpTransport, Strategy, StrategyKind, SystemRunner,
    choose,
};

/// One-shot secret resolution and injection engine.
///
/// [`Loader::new`] wires the real process environment, subprocess runner,
/// HTTP client, and stdout diagnostics; the `with_*` methods substitute any
/// seam, which is how the tests run the full engine against an in-memory
/// environment and canned strategy outcomes.
pub struct Loader {
    store: Box<dyn EnvStore>,
    runner: Box<dyn strategy::CommandRunner>,
    transport: Box<dyn HttpTransport>,
    sink: Box<dyn DiagnosticSink>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            store: Box::new(ProcessEnv::new()),
            runner: Box::new(SystemRunner),
            transport: Box::new(HttpClient::new()),
            sink: Box::new(StdoutSink),
        }
    }

    pub fn with_store(mut self, store: impl EnvStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_runner(mut self, runner: impl strategy::CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Resolves secrets and injects them without touching variables that are
    /// already set.
    pub fn load(&mut self) {
        self.run(InjectionPolicy::FillIfAbsent);
    }

    /// Resolves secrets and injects them over any existing values.
    pub fn load_force(&mut self) {
        self.run(InjectionPolicy::OverwriteAlways);
    }

    fn run(&mut self, policy: InjectionPolicy) {
        let ctx = ResolutionContext::from_store(self.store.as_ref());

        let resolved = match choose(&ctx) {
            StrategyKind::Api => {
                self.sink.emit(&Diagnostic::FetchingViaApi);
                ApiStrategy::new(self.transport.as_ref()).resolve(&ctx)
            }
            StrategyKind::Cli => {
                self.sink.emit(&Diagnostic::FetchingViaCli);
                CliStrategy::new(self.runner.as_ref()).resolve(&ctx)
            }
        };

        match resolved {
            Ok(secrets) => {
                inject(self.store.as_ref(), &secrets, policy);
                // Read back from the store rather than echoing the context:
                // the payload itself defines these keys, and whatever is
                // visible post-injection is what child processes will see.
                self.sink.emit(&Diagnostic::SecretsLoaded {
                    project: self.store.get(PROJECT_VAR),
                    config: self.store.get(CONFIG_VAR),
                    environment: self.store.get(ENVIRONMENT_VAR),
                });
            }
            Err(err) => {
                self.sink.emit(&Diagnostic::ResolutionFailed(err));
                self.sink.emit(&Diagnostic::Debug(DebugInfo::collect(&ctx)));
            }
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves secrets into the process environment, leaving already-set
/// variables untouched. Call once at startup, before spawning threads.
pub fn load() {
    Loader::new().load();
}

/// Resolves secrets into the process environment, overwriting any variables
/// that already exist. Call once at startup, before spawning threads.
pub fn load_force() {
    Loader::new().load_force();
}
