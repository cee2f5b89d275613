//! Maps parameters to controls.
//!
//! Classification walks an ordered rule list and takes the first match:
//!
//! 1. values entered twice become a [`ConfirmedEntry`];
//! 2. prompted boolean flags become a [`ConfirmationGate`];
//! 3. multiple parameters become a [`VariableComposite`], or a
//!    [`CheckableComboBox`] for choices;
//! 4. `nargs > 1` becomes a tuple or repeated-group [`FixedComposite`];
//! 5. the declared type is looked up in the type table;
//! 6. anything else falls back to a plain [`TextField`].
//!
//! Controls owned by a composite skip the first rule.

use std::sync::Arc;

use command_form_core::{ParamDescriptor, ParamType, Shape};
use tracing::debug;

use crate::composite::FixedComposite;
use crate::confirm::ConfirmationGate;
use crate::confirmed::ConfirmedEntry;
use crate::scalar::{
    CheckBox, CheckableComboBox, ComboBox, DateTimeEdit, IntField, RealField, TextField, TextRole,
};
use crate::variable::VariableComposite;
use crate::widget::{Widget, WidgetBase, WidgetKind};

type Rule = fn(&ParamType, &ParamDescriptor, Shape) -> Option<WidgetKind>;

const RULES: &[Rule] = &[confirmed_entry, confirmation, multiple, fixed_arity, by_type];

const NESTED_RULES: &[Rule] = &[confirmation, multiple, fixed_arity, by_type];

fn confirmed_entry(_ty: &ParamType, param: &ParamDescriptor, _shape: Shape) -> Option<WidgetKind> {
    param.confirmation_prompt.then_some(WidgetKind::ConfirmedEntry)
}

fn confirmation(_ty: &ParamType, param: &ParamDescriptor, _shape: Shape) -> Option<WidgetKind> {
    param.needs_confirmation().then_some(WidgetKind::Confirmation)
}

fn multiple(ty: &ParamType, _param: &ParamDescriptor, shape: Shape) -> Option<WidgetKind> {
    if !shape.multiple {
        return None;
    }
    match ty {
        ParamType::Choice { .. } => Some(WidgetKind::CheckableComboBox),
        _ => Some(WidgetKind::VariableGroup),
    }
}

fn fixed_arity(ty: &ParamType, _param: &ParamDescriptor, shape: Shape) -> Option<WidgetKind> {
    if shape.nargs <= 1 {
        return None;
    }
    if ty.is_tuple() {
        Some(WidgetKind::Tuple)
    } else {
        Some(WidgetKind::RepeatedGroup)
    }
}

fn by_type(ty: &ParamType, param: &ParamDescriptor, _shape: Shape) -> Option<WidgetKind> {
    let kind = match ty {
        ParamType::Bool => WidgetKind::Checkbox,
        ParamType::Int { .. } => WidgetKind::IntField,
        ParamType::Float { .. } => WidgetKind::RealField,
        ParamType::String if param.hide_input => WidgetKind::PasswordField,
        ParamType::String | ParamType::Uuid | ParamType::Unprocessed => WidgetKind::TextField,
        ParamType::DateTime { .. } => WidgetKind::DateTimeEdit,
        ParamType::Tuple { .. } => WidgetKind::Tuple,
        ParamType::Choice { .. } => WidgetKind::ComboBox,
        ParamType::Path { .. } => WidgetKind::PathField,
        ParamType::File { .. } => WidgetKind::FileField,
        ParamType::Custom { .. } => return None,
    };
    Some(kind)
}

/// Picks the control for values of `ty` from `param`, with the given
/// effective shape.
///
/// # Examples
///
/// ```
/// use command_form_core::{ParamDescriptor, ParamType};
/// use command_form_widgets::{WidgetKind, classify};
///
/// let tags = ParamDescriptor::option("tag", ParamType::String).allow_multiple();
/// assert_eq!(classify(&tags.param_type, &tags, tags.shape()), WidgetKind::VariableGroup);
/// ```
pub fn classify(ty: &ParamType, param: &ParamDescriptor, shape: Shape) -> WidgetKind {
    classify_with(RULES, ty, param, shape)
}

fn classify_with(rules: &[Rule], ty: &ParamType, param: &ParamDescriptor, shape: Shape) -> WidgetKind {
    rules
        .iter()
        .find_map(|rule| rule(ty, param, shape))
        .unwrap_or(WidgetKind::TextField)
}

/// Builds the control for values of `ty` from `param` with the given shape.
///
/// Composites call this for their children with a reduced shape and
/// `nested = true`.
pub fn build_widget(
    ty: &ParamType,
    param: &Arc<ParamDescriptor>,
    shape: Shape,
    nested: bool,
) -> Box<dyn Widget> {
    let rules = if nested { NESTED_RULES } else { RULES };
    let kind = classify_with(rules, ty, param, shape);
    debug!(param = %param.name, ?kind, ?shape, nested, "building widget");
    let base = WidgetBase::new(Arc::clone(param), ty.clone(), shape, nested);
    match kind {
        WidgetKind::ConfirmedEntry => Box::new(ConfirmedEntry::new(base)),
        WidgetKind::Confirmation => Box::new(ConfirmationGate::new(base)),
        WidgetKind::VariableGroup => Box::new(VariableComposite::new(base)),
        WidgetKind::CheckableComboBox => Box::new(CheckableComboBox::new(base)),
        WidgetKind::Tuple | WidgetKind::RepeatedGroup => Box::new(FixedComposite::new(base)),
        WidgetKind::Checkbox => Box::new(CheckBox::new(base)),
        WidgetKind::IntField => Box::new(IntField::new(base)),
        WidgetKind::RealField => Box::new(RealField::new(base)),
        WidgetKind::DateTimeEdit => Box::new(DateTimeEdit::new(base)),
        WidgetKind::ComboBox => Box::new(ComboBox::new(base)),
        WidgetKind::TextField => Box::new(TextField::new(base, TextRole::Plain)),
        WidgetKind::PasswordField => Box::new(TextField::new(base, TextRole::Masked)),
        WidgetKind::PathField => Box::new(TextField::new(base, TextRole::Path)),
        WidgetKind::FileField => Box::new(TextField::new(base, TextRole::File)),
    }
}

/// Builds the top-level control of a form for `param`.
pub fn build_form_widget(param: &ParamDescriptor) -> Box<dyn Widget> {
    let param = Arc::new(param.clone());
    let shape = param.shape();
    build_widget(&param.param_type, &param, shape, false)
}
