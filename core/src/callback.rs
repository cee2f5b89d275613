//! Callbacks and default producers attached to parameters.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;
use crate::{Context, ParamDescriptor, Value};

type CallbackFn =
    dyn Fn(&Context, &ParamDescriptor, Option<Value>) -> Result<Option<Value>, ProcessError>;

/// Post-processing hook run on a parameter's converted value.
///
/// The callback receives `None` when no value was provided and may replace
/// the value, reject it with [`ProcessError::Failed`], or cancel the whole
/// invocation with [`ProcessError::Abort`].
///
/// # Examples
///
/// ```
/// use command_form_core::{Callback, Context, ParamDescriptor, ParamType, Value};
///
/// let upper = Callback::new(|_ctx, _param, value| {
///     Ok(value.map(|v| Value::Str(v.to_string().to_uppercase())))
/// });
/// let param = ParamDescriptor::option("name", ParamType::String);
/// let out = upper.call(&Context::new("greet"), &param, Some("ada".into()));
/// assert_eq!(out, Ok(Some(Value::from("ADA"))));
/// ```
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context, &ParamDescriptor, Option<Value>) -> Result<Option<Value>, ProcessError>
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Aborts unless the value is `true`; the callback of a confirmation flag.
    pub fn abort_if_false() -> Self {
        Self::new(|_, _, value| match value {
            Some(Value::Bool(true)) => Ok(value),
            _ => Err(ProcessError::Abort),
        })
    }

    pub fn call(
        &self,
        ctx: &Context,
        param: &ParamDescriptor,
        value: Option<Value>,
    ) -> Result<Option<Value>, ProcessError> {
        (self.0)(ctx, param, value)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Zero-argument producer of a default value.
#[derive(Clone)]
pub struct DefaultFactory(Arc<dyn Fn() -> Value>);

impl DefaultFactory {
    pub fn new(f: impl Fn() -> Value + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for DefaultFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultFactory(..)")
    }
}

/// Default of a parameter: a literal, or a producer evaluated on demand.
///
/// Only literals are (de)serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamDefault {
    Value(Value),
    #[serde(skip)]
    Factory(DefaultFactory),
}

impl ParamDefault {
    /// Returns the literal, or invokes the producer.
    pub fn resolve(&self) -> Value {
        match self {
            ParamDefault::Value(v) => v.clone(),
            ParamDefault::Factory(factory) => factory.produce(),
        }
    }
}

impl From<Value> for ParamDefault {
    fn from(v: Value) -> Self {
        ParamDefault::Value(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamType;

    #[test]
    fn test_abort_if_false() {
        let cb = Callback::abort_if_false();
        let ctx = Context::new("drop");
        let param = ParamDescriptor::flag("yes");
        assert_eq!(
            cb.call(&ctx, &param, Some(Value::Bool(false))),
            Err(ProcessError::Abort)
        );
        assert_eq!(cb.call(&ctx, &param, None), Err(ProcessError::Abort));
        assert_eq!(
            cb.call(&ctx, &param, Some(Value::Bool(true))),
            Ok(Some(Value::Bool(true)))
        );
    }

    #[test]
    fn test_factory_default_is_evaluated_each_time() {
        let counter = std::rc::Rc::new(std::cell::Cell::new(0));
        let seen = counter.clone();
        let default = ParamDefault::Factory(DefaultFactory::new(move || {
            seen.set(seen.get() + 1);
            Value::Int(seen.get())
        }));
        assert_eq!(default.resolve(), Value::Int(1));
        assert_eq!(default.resolve(), Value::Int(2));
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_literal_default_roundtrips() {
        let default: ParamDefault = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(default.resolve(), Value::from(vec![1, 2]));
        let param = ParamDescriptor::option("n", ParamType::int()).with_default(3);
        assert_eq!(param.default_value(), Some(Value::Int(3)));
    }
}
