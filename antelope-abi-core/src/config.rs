//! Transaction building configuration.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

pub const DEFAULT_BLOCKS_BEHIND: u32 = 3;
pub const DEFAULT_EXPIRE_SECONDS: u32 = 30;

/// Knobs for TaPoS reference selection and resource limits.
///
/// Limits are stored wider than their wire types so oversized values can be
/// represented and rejected by [`crate::validation::validate_transaction_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    #[serde(default = "default_blocks_behind", alias = "blocksBehind")]
    pub blocks_behind: u32,
    #[serde(default = "default_expire_seconds", alias = "expireSeconds")]
    pub expire_seconds: u32,
    #[serde(default, alias = "maxNetUsageWords")]
    pub max_net_usage_words: u64,
    #[serde(default, alias = "maxCpuUsageMs")]
    pub max_cpu_usage_ms: u64,
    #[serde(default, alias = "delaySec")]
    pub delay_sec: u64,
}

fn default_blocks_behind() -> u32 {
    DEFAULT_BLOCKS_BEHIND
}

fn default_expire_seconds() -> u32 {
    DEFAULT_EXPIRE_SECONDS
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            blocks_behind: DEFAULT_BLOCKS_BEHIND,
            expire_seconds: DEFAULT_EXPIRE_SECONDS,
            max_net_usage_words: 0,
            max_cpu_usage_ms: 0,
            delay_sec: 0,
        }
    }
}

impl TransactionConfig {
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json)
            .map_err(|e| CodecError::format("TransactionConfig", e.to_string()))
    }

    /// Apply `ANTELOPE_*` environment overrides on top of `self`.
    ///
    /// Recognized: `ANTELOPE_BLOCKS_BEHIND`, `ANTELOPE_EXPIRE_SECONDS`,
    /// `ANTELOPE_MAX_NET_USAGE_WORDS`, `ANTELOPE_MAX_CPU_USAGE_MS`,
    /// `ANTELOPE_DELAY_SEC`.
    pub fn with_env_overrides(self) -> Result<Self, CodecError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::with_env_overrides`] with a pluggable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, CodecError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = read_override(&lookup, "ANTELOPE_BLOCKS_BEHIND")? {
            self.blocks_behind = narrow(v, "ANTELOPE_BLOCKS_BEHIND")?;
        }
        if let Some(v) = read_override(&lookup, "ANTELOPE_EXPIRE_SECONDS")? {
            self.expire_seconds = narrow(v, "ANTELOPE_EXPIRE_SECONDS")?;
        }
        if let Some(v) = read_override(&lookup, "ANTELOPE_MAX_NET_USAGE_WORDS")? {
            self.max_net_usage_words = v;
        }
        if let Some(v) = read_override(&lookup, "ANTELOPE_MAX_CPU_USAGE_MS")? {
            self.max_cpu_usage_ms = v;
        }
        if let Some(v) = read_override(&lookup, "ANTELOPE_DELAY_SEC")? {
            self.delay_sec = v;
        }
        Ok(self)
    }
}

fn read_override<F>(lookup: &F, key: &str) -> Result<Option<u64>, CodecError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => {
            let parsed = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| CodecError::format(key, format!("'{}': {}", raw, e)))?;
            tracing::debug!(key, value = parsed, "transaction config override");
            Ok(Some(parsed))
        }
    }
}

fn narrow(value: u64, key: &str) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| CodecError::range(key, value, "must fit in uint32"))
}
