//! Yes/no question gating a prompted boolean flag.

use command_form_core::{Context, ParamType, Value};
use tracing::debug;

use crate::error::Resolution;
use crate::resolve::resolve;
use crate::widget::{Widget, WidgetBase, WidgetKind};

/// Not shown inline: every resolution asks the context's prompter and
/// resolves the answer like a check box's state.
#[derive(Debug, Clone)]
pub struct ConfirmationGate {
    base: WidgetBase,
    answer: bool,
}

impl ConfirmationGate {
    pub fn new(base: WidgetBase) -> Self {
        let answer = base
            .converted_default()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Self { base, answer }
    }

    /// The question asked: the prompt, or the parameter name.
    pub fn question(&self) -> &str {
        self.base.param().prompt.as_deref().unwrap_or(self.base.name())
    }

    pub fn answer(&self) -> bool {
        self.answer
    }
}

impl Widget for ConfirmationGate {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Confirmation
    }

    fn widget_value(&self) -> Value {
        Value::Bool(self.answer)
    }

    fn set_value(&mut self, value: Value) {
        if let Ok(Value::Bool(answer)) = ParamType::Bool.convert(&value) {
            self.answer = answer;
        }
    }

    fn get_value(&mut self, ctx: &Context) -> Resolution {
        self.answer = ctx.confirm(self.question());
        debug!(widget = self.base.name(), answer = self.answer, "confirmation answered");
        resolve(self, ctx)
    }
}
