//! A command's controls and their collected results.

use std::sync::Arc;

use command_form_core::{CommandDescriptor, Context, Value};
use tracing::{debug, warn};

use crate::error::{Resolution, WidgetError};
use crate::factory::build_form_widget;
use crate::widget::{Widget, WidgetKind, WidgetSummary};

/// One top-level control per parameter of a command, in declaration order.
#[derive(Debug)]
pub struct Form {
    command: CommandDescriptor,
    widgets: Vec<Box<dyn Widget>>,
}

impl Form {
    /// Builds the controls for `command`, prefilling them from the
    /// environment visible through `ctx`.
    ///
    /// Variable-length groups and confirmation gates are not prefilled:
    /// groups read the environment themselves when resolved, and gates
    /// always ask.
    pub fn new(command: &CommandDescriptor, ctx: &Context) -> Self {
        let widgets = command
            .params
            .iter()
            .map(|param| {
                let mut widget = build_form_widget(param);
                prefill_from_env(widget.as_mut(), ctx);
                widget
            })
            .collect();
        debug!(command = %command.name, params = command.params.len(), "form built");
        Self {
            command: command.clone(),
            widgets,
        }
    }

    pub fn command(&self) -> &CommandDescriptor {
        &self.command
    }

    pub fn widget(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets
            .iter()
            .find(|w| w.name() == name)
            .map(|w| w.as_ref() as &dyn Widget)
    }

    pub fn widget_mut(&mut self, name: &str) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets
            .iter_mut()
            .find(|w| w.name() == name)
            .map(|w| w.as_mut())
    }

    pub fn widgets(&self) -> impl Iterator<Item = &dyn Widget> {
        self.widgets.iter().map(|w| w.as_ref() as &dyn Widget)
    }

    /// Outline of every control tree.
    pub fn summaries(&self) -> Vec<WidgetSummary> {
        self.widgets().map(WidgetSummary::of).collect()
    }

    /// Resolves every control in order.
    ///
    /// Stops at the first abort: the remaining controls are neither
    /// resolved nor reported.
    pub fn resolve(&mut self, ctx: &Context) -> FormValues {
        let mut entries = Vec::with_capacity(self.widgets.len());
        for widget in &mut self.widgets {
            let result = widget.get_value(ctx);
            let aborted = matches!(&result, Err(err) if err.is_aborted());
            entries.push((widget.name().to_string(), result));
            if aborted {
                debug!(widget = widget.name(), "resolution aborted");
                break;
            }
        }
        FormValues { entries }
    }
}

fn prefill_from_env(widget: &mut dyn Widget, ctx: &Context) {
    if matches!(
        widget.kind(),
        WidgetKind::VariableGroup | WidgetKind::Confirmation
    ) {
        return;
    }
    let param = Arc::clone(widget.param());
    let Some(mut values) = param.value_from_envvar(ctx) else {
        return;
    };
    let converted = if param.multiple {
        values
            .iter()
            .map(|raw| param.convert_occurrence(raw))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    } else if param.is_multi_valued() {
        param.convert_occurrence(&Value::List(values))
    } else {
        match values.pop() {
            Some(raw) => param.convert_occurrence(&raw),
            None => return,
        }
    };
    match converted {
        Ok(value) => {
            debug!(widget = widget.name(), value = %value, "prefilled from environment");
            widget.set_value(value);
        }
        Err(err) => warn!(
            widget = widget.name(),
            error = %err,
            "ignoring invalid environment value"
        ),
    }
}

/// Name → resolution mapping produced by [`Form::resolve`], in parameter
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    entries: Vec<(String, Resolution)>,
}

impl FormValues {
    pub fn get(&self, name: &str) -> Option<&Resolution> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the user cancelled during resolution.
    pub fn is_aborted(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, r)| matches!(r, Err(err) if err.is_aborted()))
    }

    /// Errors other than aborts.
    pub fn errors(&self) -> Vec<&WidgetError> {
        self.entries
            .iter()
            .filter_map(|(_, r)| r.as_ref().err())
            .filter(|err| !err.is_aborted())
            .collect()
    }

    /// Whether every control resolved.
    pub fn is_ok(&self) -> bool {
        self.entries.iter().all(|(_, r)| r.is_ok())
    }

    /// The resolved values, or every error (aborts included) if any
    /// control failed. Executing the command is only valid on `Ok`.
    pub fn into_values(self) -> Result<Vec<(String, Option<Value>)>, Vec<WidgetError>> {
        let mut values = Vec::with_capacity(self.entries.len());
        let mut errors = Vec::new();
        for (name, result) in self.entries {
            match result {
                Ok(value) => values.push((name, value)),
                Err(err) => errors.push(err),
            }
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}
