use crate::secrets::SecretSet;
use crate::store::EnvStore;

/// How resolved secrets merge into an environment that may already define
/// some of the same keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionPolicy {
    /// Write a secret only when the store has no value for its key;
    /// pre-existing values win.
    FillIfAbsent,
    /// Write every secret unconditionally; resolved values win.
    OverwriteAlways,
}

/// Applies `secrets` to `store` entry by entry under `policy`.
///
/// Per-key decisions are independent, so the final store state does not
/// depend on iteration order.
pub fn inject(store: &dyn EnvStore, secrets: &SecretSet, policy: InjectionPolicy) {
    for (name, value) in secrets.iter() {
        match policy {
            InjectionPolicy::FillIfAbsent => {
                if store.get(name).is_none() {
                    store.set(name, value);
                }
            }
            InjectionPolicy::OverwriteAlways => store.set(name, value),
        }
    }
}
