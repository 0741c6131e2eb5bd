use crate::store::EnvStore;

/// Environment variable holding the Doppler API token.
pub const TOKEN_VAR: &str = "DOPPLER_TOKEN";
/// Environment variable holding the Doppler project identifier.
pub const PROJECT_VAR: &str = "DOPPLER_PROJECT";
/// Environment variable holding the Doppler config identifier.
pub const CONFIG_VAR: &str = "DOPPLER_CONFIG";
/// Environment variable Doppler sets to the config's environment name.
pub const ENVIRONMENT_VAR: &str = "DOPPLER_ENVIRONMENT";

/// Service tokens carry their project/config scope and start with this
/// prefix; CLI and Personal tokens do not.
pub const SERVICE_TOKEN_PREFIX: &str = "dp.st";

/// The credentials available to one resolution attempt, read once from the
/// environment store at the start of the pass.
///
/// Every field is independently optional; which ones are present drives
/// strategy selection and the API precondition check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionContext {
    pub token: Option<String>,
    pub project: Option<String>,
    pub config: Option<String>,
}

impl ResolutionContext {
    pub fn from_store(store: &dyn EnvStore) -> Self {
        Self {
            token: store.get(TOKEN_VAR),
            project: store.get(PROJECT_VAR),
            config: store.get(CONFIG_VAR),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the token is a service token (scope is implied by the token
    /// itself, so project/config may be omitted).
    pub fn is_service_token(&self) -> bool {
        self.token
            .as_deref()
            .is_some_and(|t| t.starts_with(SERVICE_TOKEN_PREFIX))
    }

    /// Token with its final dot-separated segment replaced by `*****`, safe
    /// to include in debug output. A token with no dots masks entirely.
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_deref().map(|token| {
            let mut parts: Vec<&str> = token.split('.').collect();
            parts.pop();
            parts.push("*****");
            parts.join(".")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEnv;

    #[test]
    fn test_from_store_reads_all_three_vars() {
        let store = MemoryEnv::with_vars([
            (TOKEN_VAR, "dp.st.xyz"),
            (PROJECT_VAR, "backend"),
            (CONFIG_VAR, "dev"),
        ]);
        let ctx = ResolutionContext::from_store(&store);
        assert_eq!(ctx.token.as_deref(), Some("dp.st.xyz"));
        assert_eq!(ctx.project.as_deref(), Some("backend"));
        assert_eq!(ctx.config.as_deref(), Some("dev"));
    }

    #[test]
    fn test_service_token_detection() {
        let service = ResolutionContext {
            token: Some("dp.st.xyz".into()),
            ..Default::default()
        };
        assert!(service.is_service_token());

        let personal = ResolutionContext {
            token: Some("personal123".into()),
            ..Default::default()
        };
        assert!(!personal.is_service_token());

        let absent = ResolutionContext::default();
        assert!(!absent.is_service_token());
        assert!(!absent.has_token());
    }

    #[test]
    fn test_masked_token_keeps_all_but_last_segment() {
        let ctx = ResolutionContext {
            token: Some("dp.st.abc123".into()),
            ..Default::default()
        };
        assert_eq!(ctx.masked_token().as_deref(), Some("dp.st.*****"));
    }

    #[test]
    fn test_masked_token_without_dots_masks_entirely() {
        let ctx = ResolutionContext {
            token: Some("personal123".into()),
            ..Default::default()
        };
        assert_eq!(ctx.masked_token().as_deref(), Some("*****"));
    }
}
