use thiserror::Error;

use crate::domain::{ConditionId, GroupId, StrategyTag, TokenId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by the decision pipeline.
///
/// `MalformedGroup` is fatal at build time. `UnknownMarket` is fatal at build
/// time and drops the update at runtime. `StaleUpdate` and `InconsistentRead`
/// are transient: the next market update supersedes them. `TruncatedPlan` is
/// a report attached to a plan that was still emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("malformed group under parent {parent}: {reason}")]
    MalformedGroup {
        parent: ConditionId,
        reason: String,
    },

    #[error("unknown market: {id}")]
    UnknownMarket { id: String },

    #[error("stale update for token {token_id}: sequence {received} <= stored {stored}")]
    StaleUpdate {
        token_id: TokenId,
        stored: u64,
        received: u64,
    },

    #[error("inconsistent read in group {group_id}: token {token_id} moved to sequence {observed}, expected {expected}")]
    InconsistentRead {
        group_id: GroupId,
        token_id: TokenId,
        expected: u64,
        observed: u64,
    },

    #[error("plan for {group_id}/{strategy} truncated: kept {kept} orders, dropped {dropped}")]
    TruncatedPlan {
        group_id: GroupId,
        strategy: StrategyTag,
        kept: usize,
        dropped: usize,
    },
}

impl EngineError {
    pub(crate) fn malformed(parent: &ConditionId, reason: impl Into<String>) -> Self {
        Self::MalformedGroup {
            parent: parent.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(id: impl ToString) -> Self {
        Self::UnknownMarket { id: id.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, Error>;
