//! Declared parameter types and their value conversion.
//!
//! Each [`ParamType`] knows how to turn raw control content into a value of
//! that type, mirroring the conversion rules of the command framework:
//! booleans accept the usual yes/no spellings, numbers accept parseable
//! strings, ranges reject or clamp, choices may ignore case, and paths may be
//! checked against the filesystem.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Value;
use crate::error::ConversionError;

/// Formats tried, in order, when parsing date/time strings.
pub const DEFAULT_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Declared type of a parameter.
///
/// # Examples
///
/// ```
/// use command_form_core::{ParamType, Value};
///
/// let port = ParamType::int_range(Some(1), Some(65535));
/// assert_eq!(port.convert(&"8080".into()).unwrap(), Value::Int(8080));
/// assert!(port.convert(&"0".into()).is_err());
///
/// let format = ParamType::choice(&["json", "yaml"]);
/// assert_eq!(format.name(), "choice");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamType {
    Bool,
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        #[serde(default)]
        clamp: bool,
    },
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default)]
        clamp: bool,
    },
    #[default]
    String,
    Uuid,
    /// Passed through untouched.
    Unprocessed,
    DateTime {
        #[serde(default = "default_datetime_formats")]
        formats: Vec<String>,
    },
    Choice {
        choices: Vec<String>,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    Path {
        #[serde(default)]
        exists: bool,
        #[serde(default = "default_true")]
        file_okay: bool,
        #[serde(default = "default_true")]
        dir_okay: bool,
    },
    File {
        #[serde(default = "default_file_mode")]
        mode: String,
    },
    Tuple {
        types: Vec<ParamType>,
    },
    /// A type the form does not know; values pass through as entered.
    Custom {
        name: String,
    },
}

fn default_true() -> bool {
    true
}

fn default_file_mode() -> String {
    "r".to_string()
}

fn default_datetime_formats() -> Vec<String> {
    DEFAULT_DATETIME_FORMATS
        .iter()
        .map(|f| (*f).to_string())
        .collect()
}

impl ParamType {
    /// Unbounded integer type.
    pub fn int() -> Self {
        ParamType::Int {
            min: None,
            max: None,
            clamp: false,
        }
    }

    /// Integer type restricted to `min..=max`.
    pub fn int_range(min: Option<i64>, max: Option<i64>) -> Self {
        ParamType::Int {
            min,
            max,
            clamp: false,
        }
    }

    /// Unbounded floating point type.
    pub fn float() -> Self {
        ParamType::Float {
            min: None,
            max: None,
            clamp: false,
        }
    }

    pub fn float_range(min: Option<f64>, max: Option<f64>) -> Self {
        ParamType::Float {
            min,
            max,
            clamp: false,
        }
    }

    /// Case-sensitive choice among `choices`.
    pub fn choice(choices: &[&str]) -> Self {
        ParamType::Choice {
            choices: choices.iter().map(|c| (*c).to_string()).collect(),
            case_sensitive: true,
        }
    }

    /// Date/time accepting the default formats.
    pub fn datetime() -> Self {
        ParamType::DateTime {
            formats: default_datetime_formats(),
        }
    }

    /// Path with no existence checks.
    pub fn path() -> Self {
        ParamType::Path {
            exists: false,
            file_okay: true,
            dir_okay: true,
        }
    }

    /// File opened with `mode` (`"r"`, `"w"`, ...).
    pub fn file(mode: &str) -> Self {
        ParamType::File {
            mode: mode.to_string(),
        }
    }

    pub fn tuple(types: Vec<ParamType>) -> Self {
        ParamType::Tuple { types }
    }

    /// Human-readable type name, as used in error messages.
    pub fn name(&self) -> &str {
        match self {
            ParamType::Bool => "boolean",
            ParamType::Int { .. } => "integer",
            ParamType::Float { .. } => "float",
            ParamType::String | ParamType::Unprocessed => "text",
            ParamType::Uuid => "uuid",
            ParamType::DateTime { .. } => "datetime",
            ParamType::Choice { .. } => "choice",
            ParamType::Path { .. } => "path",
            ParamType::File { .. } => "filename",
            ParamType::Tuple { .. } => "tuple",
            ParamType::Custom { name } => name,
        }
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, ParamType::Tuple { .. })
    }

    /// Number of elements of a tuple type.
    pub fn arity(&self) -> Option<usize> {
        match self {
            ParamType::Tuple { types } => Some(types.len()),
            _ => None,
        }
    }

    pub fn choices(&self) -> Option<&[String]> {
        match self {
            ParamType::Choice { choices, .. } => Some(choices),
            _ => None,
        }
    }

    /// Declared bounds of an integer type.
    pub fn int_bounds(&self) -> (Option<i64>, Option<i64>) {
        match self {
            ParamType::Int { min, max, .. } => (*min, *max),
            _ => (None, None),
        }
    }

    /// Declared bounds of a float type.
    pub fn float_bounds(&self) -> (Option<f64>, Option<f64>) {
        match self {
            ParamType::Float { min, max, .. } => (*min, *max),
            _ => (None, None),
        }
    }

    /// Splits an environment variable into individual raw values.
    ///
    /// Path-like types split on the platform path separator, everything else
    /// on whitespace.
    pub fn split_envvar_value(&self, raw: &str) -> Vec<String> {
        match self {
            ParamType::Path { .. } | ParamType::File { .. } => std::env::split_paths(raw)
                .map(|p| p.to_string_lossy().into_owned())
                .filter(|p| !p.is_empty())
                .collect(),
            _ => raw.split_whitespace().map(String::from).collect(),
        }
    }

    /// Converts a raw value into a value of this type.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] describing why `value` is not acceptable.
    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        match self {
            ParamType::Bool => self.convert_bool(value),
            ParamType::Int { min, max, clamp } => {
                let i = self.convert_int(value)?;
                check_range(i, *min, *max, *clamp).map(Value::Int)
            }
            ParamType::Float { min, max, clamp } => {
                let x = self.convert_float(value)?;
                check_range(x, *min, *max, *clamp).map(Value::Float)
            }
            ParamType::String => match value {
                Value::List(_) => Err(self.invalid(value)),
                Value::Str(s) => Ok(Value::Str(s.clone())),
                other => Ok(Value::Str(other.to_string())),
            },
            ParamType::Uuid => match value {
                Value::Uuid(u) => Ok(Value::Uuid(*u)),
                Value::Str(s) => Uuid::parse_str(s.trim())
                    .map(Value::Uuid)
                    .map_err(|_| self.invalid(value)),
                _ => Err(self.invalid(value)),
            },
            ParamType::Unprocessed | ParamType::Custom { .. } => Ok(value.clone()),
            ParamType::DateTime { formats } => convert_datetime(value, formats),
            ParamType::Choice {
                choices,
                case_sensitive,
            } => convert_choice(value, choices, *case_sensitive),
            ParamType::Path {
                exists,
                file_okay,
                dir_okay,
            } => {
                let path = self.path_of(value)?;
                check_path(&path, *exists, *file_okay, *dir_okay)?;
                Ok(Value::Path(path))
            }
            ParamType::File { mode } => {
                let path = self.path_of(value)?;
                if path.as_os_str() != "-" && mode.starts_with('r') {
                    check_path(&path, true, true, false)?;
                }
                Ok(Value::Path(path))
            }
            ParamType::Tuple { types } => {
                let items = match value {
                    Value::List(items) => items.as_slice(),
                    other => std::slice::from_ref(other),
                };
                if items.len() != types.len() {
                    return Err(ConversionError::Arity {
                        expected: types.len(),
                        actual: items.len(),
                    });
                }
                types
                    .iter()
                    .zip(items)
                    .map(|(ty, item)| ty.convert(item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
        }
    }

    fn invalid(&self, value: &Value) -> ConversionError {
        ConversionError::Invalid {
            value: value.to_string(),
            expected: self.name().to_string(),
        }
    }

    fn convert_bool(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "t" | "yes" | "y" | "on" => Ok(Value::Bool(true)),
                "0" | "false" | "f" | "no" | "n" | "off" => Ok(Value::Bool(false)),
                _ => Err(self.invalid(value)),
            },
            _ => Err(self.invalid(value)),
        }
    }

    fn convert_int(&self, value: &Value) -> Result<i64, ConversionError> {
        match value {
            Value::Str(s) => s.trim().parse().map_err(|_| self.invalid(value)),
            other => other.as_integral().ok_or_else(|| self.invalid(value)),
        }
    }

    fn convert_float(&self, value: &Value) -> Result<f64, ConversionError> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            Value::Str(s) => s.trim().parse().map_err(|_| self.invalid(value)),
            _ => Err(self.invalid(value)),
        }
    }

    fn path_of(&self, value: &Value) -> Result<PathBuf, ConversionError> {
        match value {
            Value::Path(p) => Ok(p.clone()),
            Value::Str(s) => Ok(PathBuf::from(s)),
            _ => Err(self.invalid(value)),
        }
    }
}

fn check_range<T>(value: T, min: Option<T>, max: Option<T>, clamp: bool) -> Result<T, ConversionError>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if let Some(lo) = min {
        if value < lo {
            return if clamp {
                Ok(lo)
            } else {
                Err(out_of_range(value, min, max))
            };
        }
    }
    if let Some(hi) = max {
        if value > hi {
            return if clamp {
                Ok(hi)
            } else {
                Err(out_of_range(value, min, max))
            };
        }
    }
    Ok(value)
}

fn out_of_range<T: std::fmt::Display>(value: T, min: Option<T>, max: Option<T>) -> ConversionError {
    let range = match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo}<=x<={hi}"),
        (Some(lo), None) => format!("x>={lo}"),
        (None, Some(hi)) => format!("x<={hi}"),
        (None, None) => "x".to_string(),
    };
    ConversionError::OutOfRange {
        value: value.to_string(),
        range,
    }
}

fn convert_datetime(value: &Value, formats: &[String]) -> Result<Value, ConversionError> {
    let text = match value {
        Value::DateTime(dt) => return Ok(Value::DateTime(*dt)),
        Value::Str(s) => s.trim(),
        other => {
            return Err(ConversionError::Invalid {
                value: other.to_string(),
                expected: "datetime".to_string(),
            });
        }
    };
    formats
        .iter()
        .find_map(|format| parse_datetime(text, format))
        .map(Value::DateTime)
        .ok_or_else(|| ConversionError::DateTimeFormat {
            value: text.to_string(),
            formats: formats.join(", "),
        })
}

/// Parses `text` with `format`; date-only formats yield midnight.
fn parse_datetime(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

fn convert_choice(
    value: &Value,
    choices: &[String],
    case_sensitive: bool,
) -> Result<Value, ConversionError> {
    let text = match value {
        Value::List(_) => {
            return Err(ConversionError::Invalid {
                value: value.to_string(),
                expected: "choice".to_string(),
            });
        }
        other => other.to_string(),
    };
    choices
        .iter()
        .find(|choice| {
            if case_sensitive {
                **choice == text
            } else {
                choice.eq_ignore_ascii_case(&text)
            }
        })
        .map(|choice| Value::Str(choice.clone()))
        .ok_or_else(|| ConversionError::NotAChoice {
            value: text,
            choices: choices
                .iter()
                .map(|c| format!("'{c}'"))
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn check_path(
    path: &Path,
    exists: bool,
    file_okay: bool,
    dir_okay: bool,
) -> Result<(), ConversionError> {
    let display = path.display().to_string();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && !file_okay => Err(ConversionError::PathIsFile(display)),
        Ok(meta) if meta.is_dir() && !dir_okay => Err(ConversionError::PathIsDirectory(display)),
        Ok(_) => Ok(()),
        Err(_) if exists => Err(ConversionError::PathMissing(display)),
        Err(_) => Ok(()),
    }
}
