use crate::error::{ResolutionError, Result};
use crate::strategy::api::{HttpResponse, HttpTransport};
use crate::strategy::cli::CommandRunner;
use http::StatusCode;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use url::Url;

/// How a [`FakeRunner`] behaves when asked to run the CLI.
pub(crate) enum FakeRun {
    /// The executable is not on the PATH.
    NotFound,
    /// The executable ran and exited with `code`, printing `stdout`.
    Exit { code: i32, stdout: &'static str },
}

pub(crate) struct FakeRunner {
    pub outcome: FakeRun,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new(outcome: FakeRun) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Output> {
        self.calls.lock().unwrap().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        match &self.outcome {
            FakeRun::NotFound => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )),
            FakeRun::Exit { code, stdout } => Ok(Output {
                status: ExitStatus::from_raw(code << 8),
                stdout: stdout.as_bytes().to_vec(),
                stderr: Vec::new(),
            }),
        }
    }
}

/// [`HttpTransport`] that replies with one canned response and records every
/// request it sees.
pub(crate) struct FakeTransport {
    pub status: StatusCode,
    pub body: String,
    pub calls: Mutex<Vec<(Url, String)>>,
}

impl FakeTransport {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl HttpTransport for FakeTransport {
    fn get(&self, url: &Url, token: &str) -> Result<HttpResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), token.to_string()));
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// [`HttpTransport`] that fails at the transport level, as a refused
/// connection would.
pub(crate) struct ErrorTransport;

impl HttpTransport for ErrorTransport {
    fn get(&self, _url: &Url, _token: &str) -> Result<HttpResponse> {
        Err(ResolutionError::RequestFailed {
            detail: "connection refused".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResolutionContext;
    use crate::strategy::{ApiStrategy, CliStrategy, Strategy, StrategyKind, choose};

    fn ctx(token: Option<&str>, project: Option<&str>, config: Option<&str>) -> ResolutionContext {
        ResolutionContext {
            token: token.map(String::from),
            project: project.map(String::from),
            config: config.map(String::from),
        }
    }

    #[test]
    fn test_choose_prefers_api_when_token_present() {
        assert_eq!(choose(&ctx(Some("dp.st.xyz"), None, None)), StrategyKind::Api);
        assert_eq!(
            choose(&ctx(Some("personal123"), Some("backend"), Some("dev"))),
            StrategyKind::Api
        );
    }

    #[test]
    fn test_choose_falls_back_to_cli_without_token() {
        // Project/config presence plays no part in the choice.
        assert_eq!(choose(&ctx(None, None, None)), StrategyKind::Cli);
        assert_eq!(
            choose(&ctx(None, Some("backend"), Some("dev"))),
            StrategyKind::Cli
        );
    }

    #[test]
    fn test_cli_missing_executable_is_tool_not_installed() {
        let runner = FakeRunner::new(FakeRun::NotFound);
        let result = CliStrategy::new(&runner).resolve(&ctx(None, None, None));
        assert!(matches!(result, Err(ResolutionError::ToolNotInstalled)));
    }

    #[test]
    fn test_cli_nonzero_exit_is_tool_execution_failed() {
        let runner = FakeRunner::new(FakeRun::Exit {
            code: 1,
            stdout: "",
        });
        let result = CliStrategy::new(&runner).resolve(&ctx(None, None, None));
        assert!(matches!(result, Err(ResolutionError::ToolExecutionFailed)));
    }

    #[test]
    fn test_cli_success_parses_stdout_json() {
        let runner = FakeRunner::new(FakeRun::Exit {
            code: 0,
            stdout: r#"{"FOO":"bar","API_KEY":"k1"}"#,
        });
        let secrets = CliStrategy::new(&runner)
            .resolve(&ctx(None, None, None))
            .unwrap();
        assert_eq!(secrets.get("FOO"), Some("bar"));
        assert_eq!(secrets.get("API_KEY"), Some("k1"));

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "doppler");
        assert_eq!(calls[0].1, vec!["secrets", "download", "--no-file"]);
    }

    #[test]
    fn test_cli_garbage_stdout_is_invalid_payload() {
        let runner = FakeRunner::new(FakeRun::Exit {
            code: 0,
            stdout: "not json",
        });
        let result = CliStrategy::new(&runner).resolve(&ctx(None, None, None));
        assert!(matches!(result, Err(ResolutionError::InvalidPayload(_))));
    }

    #[test]
    fn test_api_service_token_skips_scope_check() {
        let transport = FakeTransport::new(StatusCode::OK, r#"{"FOO":"bar"}"#);
        let secrets = ApiStrategy::new(&transport)
            .resolve(&ctx(Some("dp.st.xyz"), None, None))
            .unwrap();
        assert_eq!(secrets.get("FOO"), Some("bar"));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_api_personal_token_without_scope_sends_nothing() {
        let transport = FakeTransport::new(StatusCode::OK, r#"{"FOO":"bar"}"#);
        let result =
            ApiStrategy::new(&transport).resolve(&ctx(Some("personal123"), None, Some("dev")));
        assert!(matches!(result, Err(ResolutionError::MissingConfiguration)));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_api_request_carries_token_and_query() {
        let transport = FakeTransport::new(StatusCode::OK, "{}");
        ApiStrategy::new(&transport)
            .resolve(&ctx(Some("personal123"), Some("backend"), Some("dev")))
            .unwrap();

        let calls = transport.calls.lock().unwrap();
        let (url, token) = &calls[0];
        assert_eq!(token, "personal123");
        assert_eq!(url.host_str(), Some("api.doppler.com"));
        assert_eq!(url.path(), "/v3/configs/config/secrets/download");
        assert_eq!(
            url.query(),
            Some("project=backend&config=dev&format=json")
        );
    }

    #[test]
    fn test_api_service_token_encodes_missing_scope_as_empty() {
        let transport = FakeTransport::new(StatusCode::OK, "{}");
        ApiStrategy::new(&transport)
            .resolve(&ctx(Some("dp.st.xyz"), None, None))
            .unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(
            calls[0].0.query(),
            Some("project=&config=&format=json")
        );
    }

    #[test]
    fn test_api_401_is_unauthorized() {
        let transport = FakeTransport::new(StatusCode::UNAUTHORIZED, "");
        let result = ApiStrategy::new(&transport).resolve(&ctx(Some("dp.st.xyz"), None, None));
        assert!(matches!(result, Err(ResolutionError::Unauthorized)));
    }

    #[test]
    fn test_api_other_status_carries_raw_response() {
        let transport = FakeTransport::new(StatusCode::INTERNAL_SERVER_ERROR, "upstream broke");
        let result = ApiStrategy::new(&transport).resolve(&ctx(Some("dp.st.xyz"), None, None));
        match result {
            Err(ResolutionError::RequestFailed { detail }) => {
                assert!(detail.contains("500"));
                assert!(detail.contains("upstream broke"));
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_api_transport_failure_is_request_failed() {
        let result = ApiStrategy::new(&ErrorTransport).resolve(&ctx(Some("dp.st.xyz"), None, None));
        assert!(matches!(result, Err(ResolutionError::RequestFailed { .. })));
    }

    #[test]
    fn test_api_malformed_body_is_invalid_payload() {
        let transport = FakeTransport::new(StatusCode::OK, "[1,2,3]");
        let result = ApiStrategy::new(&transport).resolve(&ctx(Some("dp.st.xyz"), None, None));
        assert!(matches!(result, Err(ResolutionError::InvalidPayload(_))));
    }
}
