//! Bridge to the command framework's conversion and post-processing.
//!
//! Controls hand raw content to [`convert`] and the converted value to
//! [`process`]; framework signals come back as typed errors.

use command_form_core::{
    ConversionError, Context, ParamDescriptor, ParamType, ProcessError, Value,
};
use tracing::debug;

use crate::error::{Resolution, WidgetError};

/// Converts one raw value through `value_type`.
pub fn convert(value_type: &ParamType, raw: &Value) -> Result<Value, ConversionError> {
    value_type.convert(raw).inspect_err(|err| {
        debug!(ty = value_type.name(), raw = %raw, error = %err, "conversion failed");
    })
}

/// Converts the raw value of one occurrence of `param`.
pub fn convert_occurrence(param: &ParamDescriptor, raw: &Value) -> Result<Value, ConversionError> {
    param.convert_occurrence(raw).inspect_err(|err| {
        debug!(param = %param.name, raw = %raw, error = %err, "conversion failed");
    })
}

/// Runs `param`'s post-processing step on `value`.
///
/// An abort maps to [`ErrorKind::Aborted`](crate::ErrorKind::Aborted) with no
/// payload; any other failure to
/// [`ErrorKind::Processing`](crate::ErrorKind::Processing).
pub fn process(
    param: &ParamDescriptor,
    ctx: &Context,
    widget: &str,
    value: Option<Value>,
) -> Resolution {
    match param.process_value(ctx, value) {
        Ok(value) => Ok(value),
        Err(ProcessError::Abort) => {
            debug!(widget, command = ctx.command(), "aborted by callback");
            Err(WidgetError::aborted(widget))
        }
        Err(err) => Err(WidgetError::processing(widget, err.to_string())),
    }
}
