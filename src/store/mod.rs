pub mod memory;
pub mod process;

pub use memory::MemoryEnv;
pub use process::ProcessEnv;

/// The environment namespace the engine reads configuration from and injects
/// secrets into.
///
/// The real implementation is [`ProcessEnv`]. Tests (and embedders that want
/// to stage secrets without touching global state) substitute [`MemoryEnv`].
pub trait EnvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}
