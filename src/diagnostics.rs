//! Structured diagnostic events and the sinks that render them.
//!
//! Resolution logic never prints. The engine emits [`Diagnostic`] values into
//! a [`DiagnosticSink`]; the default [`StdoutSink`] renders them for humans,
//! and tests capture them with [`MemorySink`].

use crate::context::ResolutionContext;
use crate::error::ResolutionError;
use colored::Colorize;
use std::env;
use std::path::PathBuf;

/// Prefix on every rendered diagnostic line.
pub const LOG_PREFIX: &str = "[doppler-env]:";

/// One event in the life of a resolution-and-injection pass.
#[derive(Debug)]
pub enum Diagnostic {
    /// A token is present; the API strategy was chosen.
    FetchingViaApi,
    /// No token; falling back to the locally configured CLI.
    FetchingViaCli,
    /// The chosen strategy failed. Zero secrets were injected.
    ResolutionFailed(ResolutionError),
    /// Injection completed; identifiers are read back from the store after
    /// injection, so they reflect what the payload actually defined.
    SecretsLoaded {
        project: Option<String>,
        config: Option<String>,
        environment: Option<String>,
    },
    /// Snapshot of the context and host, emitted after every failure.
    Debug(DebugInfo),
}

impl Diagnostic {
    /// Renders the event as the lines a sink should show, without the
    /// [`LOG_PREFIX`].
    pub fn lines(&self) -> Vec<String> {
        match self {
            Diagnostic::FetchingViaApi => vec![
                "DOPPLER_TOKEN environment variable set. Fetching secrets from Doppler API."
                    .to_string(),
            ],
            Diagnostic::FetchingViaCli => {
                vec!["Fetching secrets using Doppler CLI.".to_string()]
            }
            Diagnostic::ResolutionFailed(err) => match err {
                ResolutionError::ToolNotInstalled => {
                    vec![format!("No secrets loaded. {err}")]
                }
                ResolutionError::Unauthorized => {
                    vec![format!("Unauthorized: No secrets loaded. {err}")]
                }
                // The raw response/transport detail gets its own line ahead
                // of the generic failure message.
                ResolutionError::RequestFailed { detail } => vec![
                    detail.clone(),
                    format!("Error: No secrets loaded. {err}"),
                ],
                _ => vec![format!("Error: No secrets loaded. {err}")],
            },
            Diagnostic::SecretsLoaded {
                project,
                config,
                environment,
            } => vec![
                "Secrets loaded successfully:".to_string(),
                format!(
                    "  project={} config={} environment={}",
                    project.as_deref().unwrap_or(""),
                    config.as_deref().unwrap_or(""),
                    environment.as_deref().unwrap_or("")
                ),
            ],
            Diagnostic::Debug(info) => info.lines(),
        }
    }
}

/// Context and host details attached to failure reports. The token appears
/// only in masked form.
#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub masked_token: Option<String>,
    pub project: Option<String>,
    pub config: Option<String>,
    pub executable: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl DebugInfo {
    pub fn collect(ctx: &ResolutionContext) -> Self {
        Self {
            masked_token: ctx.masked_token(),
            project: ctx.project.clone(),
            config: ctx.config.clone(),
            executable: env::current_exe().ok(),
            working_dir: env::current_dir().ok(),
        }
    }

    fn lines(&self) -> Vec<String> {
        vec![
            format!("[DEBUG] Token: {:?}", self.masked_token),
            format!("[DEBUG] Project: {:?}", self.project),
            format!("[DEBUG] Config: {:?}", self.config),
            format!(
                "[DEBUG] Executable: {}",
                self.executable
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
            format!(
                "[DEBUG] Working directory: {}",
                self.working_dir
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
        ]
    }
}

/// Where diagnostic events go.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: &Diagnostic);
}

/// Renders diagnostics to stdout with the `[doppler-env]:` prefix.
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        for line in diagnostic.lines() {
            let line = match diagnostic {
                Diagnostic::ResolutionFailed(_) => line.red().to_string(),
                Diagnostic::SecretsLoaded { .. } => line.green().to_string(),
                Diagnostic::Debug(_) => line.dimmed().to_string(),
                _ => line,
            };
            println!("{} {}", LOG_PREFIX.cyan(), line);
        }
    }
}

/// Records rendered diagnostic lines, for tests and embedders that route
/// output elsewhere.
#[derive(Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.lines.extend(diagnostic.lines());
    }
}
