//! Tagged resolution errors.
//!
//! A control never lets a failure escape as a panic or an untyped error: each
//! one becomes a [`WidgetError`] carrying the kind, the originating control's
//! name and an optional diagnostic.

use command_form_core::Value;
use serde::Serialize;
use thiserror::Error;

/// What went wrong while resolving a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required, no default, nothing entered.
    Required,
    /// The entered content is not valid for the declared type.
    Conversion,
    /// The post-processing callback rejected the value.
    Processing,
    /// The user cancelled; shown as a silent cancellation.
    Aborted,
}

/// Error produced while resolving one control.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", describe(self))]
pub struct WidgetError {
    pub kind: ErrorKind,
    /// Name of the control the error originated from.
    pub widget: String,
    /// Diagnostic payload: the parameter kind for required errors, the
    /// failure message otherwise. Always `None` for aborts.
    pub detail: Option<String>,
}

fn describe(err: &WidgetError) -> String {
    match (err.kind, &err.detail) {
        (ErrorKind::Required, Some(kind)) => format!("missing {kind} '{}'", err.widget),
        (ErrorKind::Required, None) => format!("missing '{}'", err.widget),
        (ErrorKind::Aborted, _) => "aborted".to_string(),
        (_, Some(detail)) => format!("invalid value for '{}': {detail}", err.widget),
        (_, None) => format!("invalid value for '{}'", err.widget),
    }
}

impl WidgetError {
    pub fn required(widget: &str, param_type_name: &str) -> Self {
        Self {
            kind: ErrorKind::Required,
            widget: widget.to_string(),
            detail: Some(param_type_name.to_string()),
        }
    }

    pub fn conversion(widget: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Conversion,
            widget: widget.to_string(),
            detail: Some(detail.into()),
        }
    }

    /// Conversion error combining several per-position messages.
    ///
    /// One message is kept as is; several are joined and bracketed.
    pub fn conversion_batch(widget: &str, messages: &[String]) -> Self {
        let detail = match messages {
            [single] => single.clone(),
            many => format!("[{}]", many.join(", ")),
        };
        Self::conversion(widget, detail)
    }

    pub fn processing(widget: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Processing,
            widget: widget.to_string(),
            detail: Some(detail.into()),
        }
    }

    pub fn aborted(widget: &str) -> Self {
        Self {
            kind: ErrorKind::Aborted,
            widget: widget.to_string(),
            detail: None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.kind == ErrorKind::Aborted
    }
}

/// Outcome of resolving a control: the final value (`None` when nothing was
/// provided), or exactly one error.
pub type Resolution = Result<Option<Value>, WidgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            WidgetError::required("src", "argument").to_string(),
            "missing argument 'src'"
        );
        assert_eq!(
            WidgetError::conversion("n", "'x' is not a valid integer").to_string(),
            "invalid value for 'n': 'x' is not a valid integer"
        );
        assert_eq!(WidgetError::aborted("yes").to_string(), "aborted");
    }

    #[test]
    fn test_conversion_batch_brackets_several_messages() {
        let one = WidgetError::conversion_batch("n", &["a".to_string()]);
        assert_eq!(one.detail.as_deref(), Some("a"));
        let two = WidgetError::conversion_batch("n", &["a".to_string(), "b".to_string()]);
        assert_eq!(two.detail.as_deref(), Some("[a, b]"));
    }
}
