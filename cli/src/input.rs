//! Filling a form from `--set NAME=VALUE` assignments.

use std::sync::Arc;

use command_form_core::{ParamType, Shape, Value};
use command_form_widgets::{Form, Widget};
use tracing::debug;

/// Parses one `NAME=VALUE` assignment.
pub fn parse_assignment(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{text}'")),
    }
}

/// Writes the assigned text into the form's controls.
///
/// Repeating a name is only allowed for multiple parameters, each
/// assignment becoming one entry. Groups of several values take them
/// whitespace-separated.
pub fn apply_assignments(form: &mut Form, assignments: &[(String, String)]) -> Result<(), String> {
    let mut names: Vec<&str> = Vec::new();
    for (name, _) in assignments {
        if !names.contains(&name.as_str()) {
            names.push(name);
        }
    }

    for name in names {
        let texts: Vec<&str> = assignments
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect();
        let widget = form
            .widget_mut(name)
            .ok_or_else(|| format!("unknown parameter '{name}'"))?;
        let param = Arc::clone(widget.param());

        let raw = if param.multiple {
            let shape = param.shape().without_multiple();
            texts
                .iter()
                .map(|text| raw_value(&param.param_type, shape, text))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        } else if let [text] = texts.as_slice() {
            raw_value(&param.param_type, param.shape(), text)
        } else {
            return Err(format!("parameter '{name}' takes a single value"));
        };
        let raw = raw.map_err(|e| format!("{name}: {e}"))?;

        debug!(param = name, value = %raw, "assigned");
        widget.set_value(raw);
    }
    Ok(())
}

/// Raw content for `text` entered into a control of type `ty`.
fn raw_value(ty: &ParamType, shape: Shape, text: &str) -> Result<Value, String> {
    if shape.nargs > 1 || ty.is_tuple() {
        return text
            .split_whitespace()
            .enumerate()
            .map(|(i, piece)| {
                let slot = match ty {
                    ParamType::Tuple { types } => types.get(i).unwrap_or(ty),
                    other => other,
                };
                raw_value(slot, Shape::single(), piece)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List);
    }
    match ty {
        // check boxes only hold booleans
        ParamType::Bool => ty.convert(&Value::from(text)).map_err(|e| e.to_string()),
        _ => Ok(Value::from(text)),
    }
}
