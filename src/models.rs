// src/models.rs
use crate::errors::{PipelineError, Result};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// What the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    Run,
    Refactor,
    Download,
    /// Missing or unknown action: serve the page shell.
    #[default]
    Page,
}

impl<'de> Deserialize<'de> for Action {
    /// Anything other than a known action string means the page shell.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        let action = match raw.as_ref().and_then(|v| v.as_str()) {
            Some("run") => Action::Run,
            Some("refactor") => Action::Refactor,
            Some("download") => Action::Download,
            _ => Action::Page,
        };
        Ok(action)
    }
}

/// `null` is treated like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Diagnostic verbosity, ordered from most restrictive to everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ErrorReporting {
    #[default]
    None,
    Fatal,
    Warning,
    Deprecated,
    Notice,
    All,
}

// PHP error level constants.
const E_ERROR: i32 = 1;
const E_WARNING: i32 = 2;
const E_PARSE: i32 = 4;
const E_NOTICE: i32 = 8;
const E_COMPILE_ERROR: i32 = 64;
const E_DEPRECATED: i32 = 8192;
const E_USER_DEPRECATED: i32 = 16384;

impl ErrorReporting {
    /// Value for the interpreter's `error_reporting` setting.
    pub fn mask(self) -> i32 {
        let fatal = E_ERROR | E_PARSE | E_COMPILE_ERROR;
        let warning = fatal | E_WARNING;
        let deprecated = warning | E_DEPRECATED | E_USER_DEPRECATED;
        match self {
            ErrorReporting::None => 0,
            ErrorReporting::Fatal => fatal,
            ErrorReporting::Warning => warning,
            ErrorReporting::Deprecated => deprecated,
            ErrorReporting::Notice => deprecated | E_NOTICE,
            ErrorReporting::All => -1,
        }
    }
}

impl FromStr for ErrorReporting {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(ErrorReporting::None),
            "fatal" => Ok(ErrorReporting::Fatal),
            "warning" => Ok(ErrorReporting::Warning),
            "deprecated" => Ok(ErrorReporting::Deprecated),
            "notice" => Ok(ErrorReporting::Notice),
            "all" => Ok(ErrorReporting::All),
            other => Err(PipelineError::SettingsInvalid(format!(
                "error_reporting '{}'",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ErrorReporting {
    /// Unknown or non-string values fall back to the most restrictive level.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        let level = match raw {
            Some(serde_json::Value::String(s)) => s.parse::<ErrorReporting>().unwrap_or_else(|e| {
                log::warn!("{}, falling back to 'none'", e);
                ErrorReporting::None
            }),
            Some(serde_json::Value::Null) | None => ErrorReporting::None,
            Some(other) => {
                log::warn!("error_reporting {} is not a string, falling back to 'none'", other);
                ErrorReporting::None
            }
        };
        Ok(level)
    }
}

/// Per-request execution settings sent by the client.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub error_reporting: ErrorReporting,
    #[serde(deserialize_with = "null_as_true")]
    pub pre_wrap: bool,
    #[serde(deserialize_with = "null_as_true")]
    pub colorize: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            error_reporting: ErrorReporting::None,
            pre_wrap: true,
            colorize: true,
        }
    }
}

/// One decoded `runphp_data` payload.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Submission {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    pub action: Action,
    #[serde(deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(deserialize_with = "null_as_default")]
    pub settings: Settings,
    #[serde(deserialize_with = "null_as_default")]
    pub bgcolor: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
}

impl Submission {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Source as it is written to the workspace: leading whitespace removed.
    pub fn source(&self) -> &str {
        self.code.trim_start()
    }
}
