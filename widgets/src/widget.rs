//! The contract every control implements.
//!
//! A control holds raw content (read with [`Widget::widget_value`], written
//! with [`Widget::set_value`]) and resolves it into a final value with
//! [`Widget::get_value`]. The default resolution is the shared algorithm in
//! [`resolve`](crate::resolve); composites and the confirmation gate
//! override it.

use std::fmt;
use std::sync::Arc;

use command_form_core::{Context, ParamDescriptor, ParamType, Shape, Value};
use serde::Serialize;

use crate::error::Resolution;
use crate::resolve::resolve;

/// Concrete control variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Checkbox,
    IntField,
    RealField,
    TextField,
    PasswordField,
    DateTimeEdit,
    ComboBox,
    CheckableComboBox,
    PathField,
    FileField,
    /// Fixed arity, one slot per tuple element type.
    Tuple,
    /// Fixed arity, every slot of the same type.
    RepeatedGroup,
    /// User-extensible list of entries.
    VariableGroup,
    /// Yes/no question asked on resolution.
    Confirmation,
    /// The same value typed into two editors.
    ConfirmedEntry,
}

/// State shared by every control.
#[derive(Debug, Clone)]
pub struct WidgetBase {
    name: String,
    param: Arc<ParamDescriptor>,
    value_type: ParamType,
    shape: Shape,
    nested: bool,
    valid: bool,
}

impl WidgetBase {
    /// Creates the base of a control for `param`, displaying values of
    /// `value_type` with the given effective `shape`.
    ///
    /// `nested` marks controls owned by a composite.
    pub fn new(param: Arc<ParamDescriptor>, value_type: ParamType, shape: Shape, nested: bool) -> Self {
        Self {
            name: param.name.clone(),
            param,
            value_type,
            shape,
            nested,
            valid: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self) -> &Arc<ParamDescriptor> {
        &self.param
    }

    /// Type of the values this control edits. Differs from the parameter's
    /// type for tuple slots.
    pub fn value_type(&self) -> &ParamType {
        &self.value_type
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Whether this control is owned by a composite.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// The parameter's default converted for this control, if it converts.
    pub(crate) fn converted_default(&self) -> Option<Value> {
        self.param
            .default_value()
            .and_then(|default| self.value_type.convert(&default).ok())
    }
}

/// Common interface of all controls.
pub trait Widget: fmt::Debug {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    fn kind(&self) -> WidgetKind;

    /// Current raw content, without validation.
    fn widget_value(&self) -> Value;

    /// Writes raw content. Values of an incompatible type are ignored.
    fn set_value(&mut self, value: Value);

    /// Whether nothing was entered. Only text-based controls and
    /// multi-selects can be empty.
    fn is_empty(&self) -> bool {
        false
    }

    /// Toggles the validity cue. Never affects resolution.
    fn handle_valid(&mut self, valid: bool) {
        self.base_mut().set_valid(valid);
    }

    /// Resolves the raw content into the final value.
    fn get_value(&mut self, ctx: &Context) -> Resolution {
        resolve(self, ctx)
    }

    /// Child controls, in display order.
    fn children(&self) -> Vec<&dyn Widget> {
        Vec::new()
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    fn param(&self) -> &Arc<ParamDescriptor> {
        self.base().param()
    }

    fn is_valid(&self) -> bool {
        self.base().is_valid()
    }
}

/// Serializable outline of a control tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetSummary {
    pub name: String,
    pub kind: WidgetKind,
    pub value_type: String,
    pub shape: Shape,
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WidgetSummary>,
}

impl WidgetSummary {
    pub fn of(widget: &dyn Widget) -> Self {
        let base = widget.base();
        Self {
            name: base.name().to_string(),
            kind: widget.kind(),
            value_type: base.value_type().name().to_string(),
            shape: base.shape(),
            value: widget.widget_value(),
            children: widget.children().into_iter().map(Self::of).collect(),
        }
    }
}
