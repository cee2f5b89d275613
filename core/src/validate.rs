//! Command descriptor validation.
//!
//! Catches descriptor mistakes that would otherwise surface as confusing
//! controls: duplicate parameter names, impossible cardinalities, flags that
//! are not booleans, and defaults whose shape does not fit the parameter.
//!
//! # Examples
//!
//! ```
//! use command_form_core::*;
//!
//! let cmd = CommandDescriptor::new("deploy")
//!     .with_param(ParamDescriptor::argument("target", ParamType::String));
//! assert!(validate_command(&cmd).is_empty());
//!
//! // Invalid: choice without choices
//! let bad = CommandDescriptor::new("deploy")
//!     .with_param(ParamDescriptor::option("env", ParamType::Choice {
//!         choices: vec![],
//!         case_sensitive: true,
//!     }));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandDescriptor, ParamDefault, ParamDescriptor, ParamKind, ParamType, Value};

/// Descriptor validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// A parameter has an empty name.
    #[error("parameter name cannot be empty")]
    EmptyParamName,
    /// Two parameters share a name.
    #[error("duplicate parameter: {0}")]
    DuplicateParam(String),
    /// `nargs` is zero.
    #[error("parameter {0} must take at least one value")]
    ZeroNargs(String),
    /// A tuple type's arity disagrees with an explicit `nargs`.
    #[error("parameter {name}: tuple of {arity} does not match nargs {nargs}")]
    TupleArityMismatch {
        name: String,
        arity: usize,
        nargs: usize,
    },
    /// A choice type without any choices.
    #[error("parameter {0} has no choices")]
    EmptyChoices(String),
    /// A flag whose type is not boolean.
    #[error("flag {0} must be boolean")]
    NonBooleanFlag(String),
    /// A confirmation check on a non-boolean parameter.
    #[error("parameter {0} can only abort on a boolean value")]
    NonBooleanConfirmation(String),
    /// More than one positional argument accepts any number of values.
    #[error("only one argument may take multiple values, found another: {0}")]
    AmbiguousArguments(String),
    /// A list default on a single-valued parameter.
    #[error("parameter {0} is single-valued but its default is a list")]
    DefaultShape(String),
}

/// Validates a command descriptor.
///
/// Checks for an empty command name, then each parameter in order. Errors
/// for different parameters are all reported.
pub fn validate_command(command: &CommandDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut variadic_argument: Option<&str> = None;
    for param in &command.params {
        let name = param.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyParamName);
            continue;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateParam(name.to_string()));
            continue;
        }
        if param.kind == ParamKind::Argument && param.multiple {
            if variadic_argument.is_some() {
                errors.push(ValidationError::AmbiguousArguments(name.to_string()));
            }
            variadic_argument = Some(name);
        }
        errors.extend(validate_param(param));
    }

    errors
}

/// Validates a single parameter descriptor.
pub fn validate_param(param: &ParamDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = &param.name;

    if param.nargs == 0 {
        errors.push(ValidationError::ZeroNargs(name.clone()));
    }

    if let Some(arity) = param.param_type.arity() {
        // nargs left at 1 means "take the tuple's arity"
        if param.nargs != 1 && param.nargs != arity {
            errors.push(ValidationError::TupleArityMismatch {
                name: name.clone(),
                arity,
                nargs: param.nargs,
            });
        }
    }

    if let ParamType::Choice { choices, .. } = &param.param_type {
        if choices.is_empty() {
            errors.push(ValidationError::EmptyChoices(name.clone()));
        }
    }

    if param.is_flag && param.param_type != ParamType::Bool {
        errors.push(ValidationError::NonBooleanFlag(name.clone()));
    }

    if param.abort_if_false && param.param_type != ParamType::Bool {
        errors.push(ValidationError::NonBooleanConfirmation(name.clone()));
    }

    if let Some(ParamDefault::Value(Value::List(_))) = &param.default {
        if !param.is_multi_valued() {
            errors.push(ValidationError::DefaultShape(name.clone()));
        }
    }

    errors
}
