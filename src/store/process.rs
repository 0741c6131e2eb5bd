use super::EnvStore;
use std::env;

/// [`EnvStore`] backed by the real process environment.
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        // SAFETY: the engine's contract is one resolution-and-injection pass
        // at process startup, before any other threads are spawned.
        unsafe { env::set_var(key, value) };
    }
}
