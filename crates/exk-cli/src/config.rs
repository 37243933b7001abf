// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading and validation for the `exk` CLI.
//!
//! [`ExkConfig`] is read from an optional TOML file, then environment
//! overrides are applied on top. Custom codes declared under `[codes]`
//! extend the built-in vocabulary for `exk codes`, `exk new` and the
//! `abort_codes` list used by `exk inspect`.

use exk_exception::ErrorCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an `exk.toml` could not become an [`ExkConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file is not TOML of the expected shape.
    #[error("config is not valid TOML")]
    Parse(#[from] toml::de::Error),

    /// Settings that parse but cannot be used.
    #[error("invalid config: {}", .problems.join("; "))]
    Invalid {
        /// One entry per rejected setting.
        problems: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory issues that do not prevent operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A custom code reuses the wire value of a built-in code.
    ShadowsBuiltin {
        /// Label of the custom code.
        label: String,
        /// Wire value it shares with the built-in.
        code: String,
    },
    /// A custom code has an empty wire value.
    EmptyCode {
        /// Label of the custom code.
        label: String,
    },
    /// An abort code is neither a built-in nor a declared custom label.
    UndeclaredAbortCode {
        /// The raw entry from `abort_codes`.
        code: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::ShadowsBuiltin { label, code } => {
                write!(f, "custom code '{label}' reuses built-in value '{code}'")
            }
            ConfigWarning::EmptyCode { label } => {
                write!(f, "custom code '{label}' has an empty value")
            }
            ConfigWarning::UndeclaredAbortCode { code } => {
                write!(f, "abort code '{code}' is not declared; matching it literally")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Top-level configuration for the `exk` CLI.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ExkConfig {
    /// Log level (`"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Extra codes that `exk inspect` treats as meaning "aborted".
    ///
    /// Entries may be built-in labels (`"EXPIRED"`), custom labels from
    /// `[codes]`, or literal wire values.
    #[serde(default)]
    pub abort_codes: Vec<String>,

    /// Custom vocabulary: label → wire value.
    #[serde(default)]
    pub codes: BTreeMap<String, String>,
}

impl Default for ExkConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".into()),
            abort_codes: Vec::new(),
            codes: BTreeMap::new(),
        }
    }
}

impl ExkConfig {
    /// Resolve a label or literal into an [`ErrorCode`].
    ///
    /// Custom labels win over built-in labels; anything unknown is taken
    /// as a literal wire value.
    pub fn resolve_code(&self, raw: &str) -> ErrorCode {
        if let Some(value) = self.codes.get(raw) {
            return ErrorCode::custom(value.clone());
        }
        builtin_by_label(raw)
            .cloned()
            .unwrap_or_else(|| ErrorCode::custom(raw))
    }

    /// The configured abort codes, resolved.
    pub fn abort_codes(&self) -> Vec<ErrorCode> {
        self.abort_codes
            .iter()
            .map(|raw| self.resolve_code(raw))
            .collect()
    }
}

fn builtin_by_label(label: &str) -> Option<&'static ErrorCode> {
    ErrorCode::builtin()
        .iter()
        .find(|code| code.builtin_label() == Some(label))
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load an [`ExkConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`ExkConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<ExkConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                path: p.to_path_buf(),
                source,
            })?;
            parse_toml(&content)?
        }
        None => ExkConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into an [`ExkConfig`].
pub fn parse_toml(content: &str) -> Result<ExkConfig, ConfigError> {
    Ok(toml::from_str::<ExkConfig>(content)?)
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `EXK_LOG_LEVEL`
/// - `EXK_ABORT_CODES` (comma separated, replaces the file's list)
pub fn apply_env_overrides(config: &mut ExkConfig) {
    apply_overrides_with(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides_with(config: &mut ExkConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("EXK_LOG_LEVEL") {
        config.log_level = Some(val);
    }
    if let Some(val) = lookup("EXK_ABORT_CODES") {
        config.abort_codes = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Hard errors (unknown log level, blank labels) are returned as a
/// [`ConfigError::Invalid`]; soft issues come back as warnings.
pub fn validate_config(config: &ExkConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref level) = config.log_level {
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!("invalid log_level '{level}'"));
        }
    }

    for (label, value) in &config.codes {
        if label.trim().is_empty() {
            errors.push("custom code label must not be empty".into());
            continue;
        }
        if value.is_empty() {
            warnings.push(ConfigWarning::EmptyCode {
                label: label.clone(),
            });
        } else if ErrorCode::custom(value.as_str()).is_builtin() {
            warnings.push(ConfigWarning::ShadowsBuiltin {
                label: label.clone(),
                code: value.clone(),
            });
        }
    }

    for raw in &config.abort_codes {
        let declared = config.codes.contains_key(raw)
            || builtin_by_label(raw).is_some()
            || ErrorCode::custom(raw.as_str()).is_builtin();
        if !declared {
            warnings.push(ConfigWarning::UndeclaredAbortCode { code: raw.clone() });
        }
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::Invalid { problems: errors })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
