//! Process configuration read from environment variables.
//!
//! # Responsibility
//! - Resolve log settings and store selection for hosts such as the CLI.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Unknown values are rejected, never silently replaced.

use crate::logging::default_log_level;
use crate::store::property_graph::DIAGRAM_LABEL;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "FLOWGRAPH_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FLOWGRAPH_LOG_DIR";
pub const ENV_STORE: &str = "FLOWGRAPH_STORE";
pub const ENV_STORE_PATH: &str = "FLOWGRAPH_STORE_PATH";
pub const ENV_DIAGRAM_LABEL: &str = "FLOWGRAPH_DIAGRAM_LABEL";

const DEFAULT_FILE_STORE_PATH: &str = "diagram.tasklist";
const DEFAULT_GRAPH_STORE_PATH: &str = "diagram.sqlite3";

/// Backing store selected by `FLOWGRAPH_STORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    File,
    SqliteGraph,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::SqliteGraph => "sqlite-graph",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Some(Self::File),
            "sqlite-graph" | "graph" => Some(Self::SqliteGraph),
            _ => None,
        }
    }

    fn default_path(self) -> &'static str {
        match self {
            Self::File => DEFAULT_FILE_STORE_PATH,
            Self::SqliteGraph => DEFAULT_GRAPH_STORE_PATH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedValue { variable: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedValue { variable, value } => {
                write!(f, "unsupported value `{value}` for {variable}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub store: StoreKind,
    pub store_path: PathBuf,
    pub diagram_label: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            store: StoreKind::default(),
            store_path: PathBuf::from(StoreKind::default().default_path()),
            diagram_label: DIAGRAM_LABEL.to_string(),
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let store = match read(ENV_STORE) {
            Some(value) => StoreKind::parse(&value).ok_or(ConfigError::UnsupportedValue {
                variable: ENV_STORE,
                value,
            })?,
            None => StoreKind::default(),
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "warning" | "error" => value,
                _ => {
                    return Err(ConfigError::UnsupportedValue {
                        variable: ENV_LOG_LEVEL,
                        value,
                    })
                }
            },
            None => default_log_level().to_string(),
        };

        Ok(Self {
            log_level,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            store,
            store_path: read(ENV_STORE_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(store.default_path())),
            diagram_label: read(ENV_DIAGRAM_LABEL).unwrap_or_else(|| DIAGRAM_LABEL.to_string()),
        })
    }
}
