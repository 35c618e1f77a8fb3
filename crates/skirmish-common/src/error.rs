//! Error types for Skirmish.

use thiserror::Error;

use crate::EntityId;

/// Top-level error type for Skirmish operations.
#[derive(Debug, Error)]
pub enum SkirmishError {
    /// Behaviour could not be spawned
    #[error("Spawn error: {0}")]
    Spawn(#[from] SpawnError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal initialization errors raised while spawning a behaviour.
///
/// A behaviour that fails to spawn never activates.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// No scene object carries the requested target name
    #[error("Target not found: {0:?}")]
    TargetNotFound(String),

    /// The owning entity has no body in the scene
    #[error("Entity has no body: {0:?}")]
    MissingBody(EntityId),

    /// Configuration rejected during spawn
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config text could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is outside its allowed range
    #[error("Field `{field}` out of range: {reason}")]
    OutOfRange {
        /// Offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type alias for Skirmish operations.
pub type SkirmishResult<T> = Result<T, SkirmishError>;
