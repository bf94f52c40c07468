//! Unit tests for loopgraph-cli: env config, overrides and runs with mock clients.


use std::sync::{Mutex, MutexGuard, OnceLock};

/// Serializes tests that read or write process env vars.
pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Every var `RunConfig::from_env` reads.
pub(crate) const CONFIG_VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_API_BASE",
    "OPENAI_MODEL",
    "OPENAI_TEMPERATURE",
    "OPENAI_MAX_TOKENS",
    "OPENAI_TOOL_CHOICE",
    "TAVILY_API_KEY",
    "SEARCH_MAX_RESULTS",
    "MAX_STEPS",
    "RUN_TIMEOUT_SECS",
    "LLM_MAX_RETRIES",
    "HANDLE_TOOL_ERRORS",
];

/// Sets exactly `vars` (all other config vars removed), runs `f`, then restores the
/// previous environment.
pub(crate) fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let _guard = env_lock();
    let saved: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|name| (*name, std::env::var(name).ok()))
        .collect();
    for name in CONFIG_VARS {
        std::env::remove_var(name);
    }
    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    let out = f();

    for (name, value) in saved {
        match value {
            Some(v) => std::env::set_var(name, v),
            None => std::env::remove_var(name),
        }
    }
    out
}
