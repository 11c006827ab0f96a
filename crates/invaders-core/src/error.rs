//! Error types shared by the simulation crates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by stack and spawner operations on the ECS world.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// The entity was already despawned or never existed.
    #[error("entity {0} no longer exists")]
    StaleEntity(u64),

    /// The entity exists but is not a ship with a stack link.
    #[error("entity {0} is not part of a stack")]
    NotInStack(u64),

    /// A ship was asked to join a stack through a non-root ship.
    #[error("ship {child} cannot join through non-root ship {parent}")]
    ParentNotRoot { child: u32, parent: u32 },
}
