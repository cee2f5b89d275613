//! Double-entry control for values that must be typed twice.

use command_form_core::{Context, Value};
use tracing::debug;

use crate::error::{Resolution, WidgetError};
use crate::factory::build_widget;
use crate::widget::{Widget, WidgetBase, WidgetKind};

/// Two editors for the same parameter. Resolution fails unless both hold
/// the same content, then resolves the first one.
#[derive(Debug)]
pub struct ConfirmedEntry {
    base: WidgetBase,
    entry: Box<dyn Widget>,
    repeat: Box<dyn Widget>,
}

impl ConfirmedEntry {
    pub fn new(base: WidgetBase) -> Self {
        let build = || build_widget(base.value_type(), base.param(), base.shape(), true);
        let entry = build();
        let repeat = build();
        Self {
            base,
            entry,
            repeat,
        }
    }

    pub fn entry(&self) -> &dyn Widget {
        self.entry.as_ref()
    }

    pub fn entry_mut(&mut self) -> &mut (dyn Widget + 'static) {
        self.entry.as_mut()
    }

    /// The editor the value is typed into a second time.
    pub fn repeat(&self) -> &dyn Widget {
        self.repeat.as_ref()
    }

    pub fn repeat_mut(&mut self) -> &mut (dyn Widget + 'static) {
        self.repeat.as_mut()
    }
}

impl Widget for ConfirmedEntry {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::ConfirmedEntry
    }

    fn widget_value(&self) -> Value {
        self.entry.widget_value()
    }

    /// Fills both editors.
    fn set_value(&mut self, value: Value) {
        self.entry.set_value(value.clone());
        self.repeat.set_value(value);
    }

    fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }

    fn handle_valid(&mut self, valid: bool) {
        self.base.set_valid(valid);
        self.entry.handle_valid(valid);
        self.repeat.handle_valid(valid);
    }

    fn get_value(&mut self, ctx: &Context) -> Resolution {
        if self.entry.widget_value() != self.repeat.widget_value() {
            debug!(widget = self.base.name(), "entries differ");
            self.handle_valid(false);
            return Err(WidgetError::conversion(
                self.base.name(),
                "the two entered values do not match",
            ));
        }
        let result = self.entry.get_value(ctx);
        match &result {
            Ok(_) => self.handle_valid(true),
            Err(err) if err.is_aborted() => {}
            Err(_) => self.handle_valid(false),
        }
        result
    }

    fn children(&self) -> Vec<&dyn Widget> {
        vec![self.entry.as_ref(), self.repeat.as_ref()]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use command_form_core::{ParamDescriptor, ParamType};

    use super::*;
    use crate::ErrorKind;

    fn confirmed(param: ParamDescriptor) -> ConfirmedEntry {
        let ty = param.param_type.clone();
        let shape = param.shape();
        ConfirmedEntry::new(WidgetBase::new(Arc::new(param), ty, shape, false))
    }

    fn password() -> ParamDescriptor {
        ParamDescriptor::option("password", ParamType::String)
            .hidden_input()
            .with_confirmation_prompt()
    }

    #[test]
    fn test_entries_are_masked_editors() {
        let widget = confirmed(password());
        assert_eq!(widget.entry().kind(), WidgetKind::PasswordField);
        assert_eq!(widget.repeat().kind(), WidgetKind::PasswordField);
        assert_eq!(widget.children().len(), 2);
    }

    #[test]
    fn test_mismatch_is_a_conversion_error() {
        let mut widget = confirmed(password());
        widget.entry_mut().set_value("hunter2".into());
        widget.repeat_mut().set_value("hunter3".into());

        let err = widget.get_value(&Context::new("login")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conversion);
        assert_eq!(err.widget, "password");
        assert_eq!(err.detail.as_deref(), Some("the two entered values do not match"));
        assert!(!widget.is_valid());
        assert!(!widget.repeat().is_valid());
    }

    #[test]
    fn test_matching_entries_resolve_through_the_type() {
        let mut widget = confirmed(
            ParamDescriptor::option("pin", ParamType::int_range(Some(0), Some(9999)))
                .with_confirmation_prompt(),
        );
        widget.entry_mut().set_value("1234".into());
        widget.repeat_mut().set_value("1234".into());
        assert_eq!(widget.get_value(&Context::new("lock")), Ok(Some(Value::Int(1234))));
        assert!(widget.is_valid());
    }

    #[test]
    fn test_set_value_fills_both_and_default_applies_when_empty() {
        let mut widget = confirmed(password().with_default("secret"));
        assert_eq!(
            widget.get_value(&Context::new("login")),
            Ok(Some(Value::from("secret")))
        );

        let mut widget = confirmed(password());
        widget.set_value("s3cret".into());
        assert_eq!(widget.repeat().widget_value(), Value::from("s3cret"));
        assert_eq!(
            widget.get_value(&Context::new("login")),
            Ok(Some(Value::from("s3cret")))
        );
    }

    #[test]
    fn test_only_one_entry_filled_does_not_match() {
        let mut widget = confirmed(password().required());
        widget.entry_mut().set_value("hunter2".into());
        let err = widget.get_value(&Context::new("login")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conversion);
    }
}
