//! The resolution algorithm shared by all controls.
//!
//! Resolution reproduces how the command framework itself treats a value:
//!
//! 1. An empty control takes the parameter's default. Without a default a
//!    required parameter fails with a required error, an optional one
//!    resolves to "not provided" (which still goes through the callback).
//! 2. Otherwise the raw content is converted through the declared type:
//!    element by element for multi-valued shapes and tuples, as a whole
//!    otherwise.
//! 3. The converted value is post-processed (required check and callback).
//!
//! The validity cue is set on every outcome except an abort.

use std::sync::Arc;

use command_form_core::{Context, ParamDescriptor, ParamType, Value};
use tracing::debug;

use crate::adapter;
use crate::error::{Resolution, WidgetError};
use crate::widget::Widget;

/// Resolves `widget` using its raw content.
pub fn resolve<W: Widget + ?Sized>(widget: &mut W, ctx: &Context) -> Resolution {
    let param = Arc::clone(widget.param());
    let default = param.default_value();
    let base = widget.base();
    let element_wise = base.shape().is_multi_path(base.value_type()) || base.value_type().is_tuple();
    let converted = if element_wise {
        resolve_elements(widget, &param, default.as_ref())
    } else {
        resolve_single(widget, &param, default.as_ref())
    };

    match converted {
        Ok(value) => finish(widget, ctx, value),
        Err(err) => {
            widget.handle_valid(false);
            Err(err)
        }
    }
}

/// Runs post-processing on an already converted value and sets the
/// validity cue accordingly.
pub(crate) fn finish<W: Widget + ?Sized>(widget: &mut W, ctx: &Context, value: Option<Value>) -> Resolution {
    let param = Arc::clone(widget.param());
    let result = adapter::process(&param, ctx, widget.name(), value);
    match &result {
        Ok(_) => widget.handle_valid(true),
        Err(err) if err.is_aborted() => {}
        Err(_) => widget.handle_valid(false),
    }
    debug!(widget = widget.name(), ok = result.is_ok(), "resolved");
    result
}

fn resolve_single<W: Widget + ?Sized>(
    widget: &mut W,
    param: &ParamDescriptor,
    default: Option<&Value>,
) -> Result<Option<Value>, WidgetError> {
    if widget.is_empty() {
        match default {
            Some(default) => widget.set_value(default.clone()),
            None if param.required => {
                return Err(WidgetError::required(widget.name(), param.param_type_name()));
            }
            None => return Ok(None),
        }
    }

    let raw = widget.widget_value();
    adapter::convert(widget.base().value_type(), &raw)
        .map(Some)
        .map_err(|err| WidgetError::conversion(widget.name(), err.to_string()))
}

/// Type of position `i`: the slot type for tuples, the value type otherwise.
fn element_type(value_type: &ParamType, i: usize) -> &ParamType {
    match value_type {
        ParamType::Tuple { types } => types.get(i).unwrap_or(value_type),
        other => other,
    }
}

fn resolve_elements<W: Widget + ?Sized>(
    widget: &mut W,
    param: &ParamDescriptor,
    default: Option<&Value>,
) -> Result<Option<Value>, WidgetError> {
    let mut raw = widget.widget_value().into_list();
    if raw.is_empty() {
        match default {
            Some(default) => {
                widget.set_value(default.clone());
                raw = widget.widget_value().into_list();
            }
            None if param.required => {
                return Err(WidgetError::required(widget.name(), param.param_type_name()));
            }
            None => return Ok(None),
        }
    }

    let defaults = default.map(|d| d.clone().into_list());
    let value_type = widget.base().value_type().clone();
    let mut values = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();
    let mut missing = false;

    for (i, item) in raw.into_iter().enumerate() {
        let item = if item.is_empty_sentinel() {
            if param.required && default.is_none() {
                return Err(WidgetError::required(widget.name(), param.param_type_name()));
            }
            match defaults.as_ref().and_then(|d| d.get(i)) {
                Some(fallback) => {
                    // only the empty position is overwritten
                    let mut current = widget.widget_value().into_list();
                    if let Some(slot) = current.get_mut(i) {
                        *slot = fallback.clone();
                    }
                    widget.set_value(Value::List(current));
                    fallback.clone()
                }
                None => {
                    missing = true;
                    break;
                }
            }
        } else {
            item
        };

        match adapter::convert(element_type(&value_type, i), &item) {
            Ok(value) => values.push(value),
            Err(err) => errors.push(format!("#{}: {err}", i + 1)),
        }
    }

    if !errors.is_empty() {
        return Err(WidgetError::conversion_batch(widget.name(), &errors));
    }
    if missing {
        return Ok(None);
    }
    Ok(Some(Value::List(values)))
}
