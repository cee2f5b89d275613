//! Leaf controls for primitive parameter types.
//!
//! Each control wraps a single editor state. Setting a value of a type the
//! editor cannot show is silently ignored, the way a toolkit editor ignores
//! a value it cannot display.

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use command_form_core::{ParamType, Value};
use tracing::debug;

use crate::widget::{Widget, WidgetBase, WidgetKind};

fn ignored(base: &WidgetBase, value: &Value) {
    debug!(
        widget = base.name(),
        value_type = value.type_name(),
        "ignoring value of incompatible type"
    );
}

/// Boolean check box.
#[derive(Debug, Clone)]
pub struct CheckBox {
    base: WidgetBase,
    checked: bool,
}

impl CheckBox {
    pub fn new(base: WidgetBase) -> Self {
        let checked = base
            .converted_default()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Self { base, checked }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

impl Widget for CheckBox {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Checkbox
    }

    fn widget_value(&self) -> Value {
        Value::Bool(self.checked)
    }

    fn set_value(&mut self, value: Value) {
        match value {
            Value::Bool(b) => self.checked = b,
            other => ignored(&self.base, &other),
        }
    }
}

/// Number type edited by a [`NumericField`].
pub trait Numeric: Copy + PartialOrd + Display + FromStr + fmt::Debug {
    const ZERO: Self;
    const LOWEST: Self;
    const HIGHEST: Self;
    const KIND: WidgetKind;

    fn from_value(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
    fn bounds(ty: &ParamType) -> (Option<Self>, Option<Self>);
}

impl Numeric for i64 {
    const ZERO: Self = 0;
    const LOWEST: Self = i64::MIN;
    const HIGHEST: Self = i64::MAX;
    const KIND: WidgetKind = WidgetKind::IntField;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integral()
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn bounds(ty: &ParamType) -> (Option<Self>, Option<Self>) {
        ty.int_bounds()
    }
}

impl Numeric for f64 {
    const ZERO: Self = 0.0;
    const LOWEST: Self = f64::MIN;
    const HIGHEST: Self = f64::MAX;
    const KIND: WidgetKind = WidgetKind::RealField;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn bounds(ty: &ParamType) -> (Option<Self>, Option<Self>) {
        ty.float_bounds()
    }
}

/// Spin box for integers or reals, kept within `minimum..=maximum`.
///
/// Text that does not parse as a number stays in the editor as typed and
/// fails conversion on resolution.
#[derive(Debug, Clone)]
pub struct NumericField<N: Numeric> {
    base: WidgetBase,
    value: N,
    invalid_text: Option<String>,
    minimum: N,
    maximum: N,
}

pub type IntField = NumericField<i64>;
pub type RealField = NumericField<f64>;

impl<N: Numeric> NumericField<N> {
    /// Creates the field with the type's bounds, showing the default or zero.
    pub fn new(base: WidgetBase) -> Self {
        let (min, max) = N::bounds(base.value_type());
        let mut field = Self {
            value: N::ZERO,
            invalid_text: None,
            minimum: min.unwrap_or(N::LOWEST),
            maximum: max.unwrap_or(N::HIGHEST),
            base,
        };
        let initial = field
            .base
            .converted_default()
            .and_then(|v| N::from_value(&v))
            .unwrap_or(N::ZERO);
        field.value = field.clamp(initial);
        field
    }

    fn clamp(&self, value: N) -> N {
        if value < self.minimum {
            self.minimum
        } else if value > self.maximum {
            self.maximum
        } else {
            value
        }
    }

    pub fn value(&self) -> N {
        self.value
    }

    pub fn minimum(&self) -> N {
        self.minimum
    }

    pub fn maximum(&self) -> N {
        self.maximum
    }

    pub fn set_minimum(&mut self, minimum: N) {
        self.minimum = minimum;
        if self.maximum < minimum {
            self.maximum = minimum;
        }
        self.value = self.clamp(self.value);
    }

    pub fn set_maximum(&mut self, maximum: N) {
        self.maximum = maximum;
        if self.minimum > maximum {
            self.minimum = maximum;
        }
        self.value = self.clamp(self.value);
    }
}

impl<N: Numeric> Widget for NumericField<N> {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        N::KIND
    }

    fn widget_value(&self) -> Value {
        match &self.invalid_text {
            Some(text) => Value::Str(text.clone()),
            None => self.value.into_value(),
        }
    }

    fn set_value(&mut self, value: Value) {
        let parsed = match &value {
            Value::Str(text) => match text.trim().parse::<N>() {
                Ok(n) => Some(n),
                Err(_) => {
                    self.invalid_text = Some(text.clone());
                    return;
                }
            },
            other => N::from_value(other),
        };
        match parsed {
            Some(n) => {
                self.value = self.clamp(n);
                self.invalid_text = None;
            }
            None => ignored(&self.base, &value),
        }
    }
}

/// What a [`TextField`] edits; all roles resolve identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Plain,
    /// Hidden input, shown masked.
    Masked,
    /// Path with a browse action.
    Path,
    /// File with a browse action.
    File,
}

/// Single-line text editor.
#[derive(Debug, Clone)]
pub struct TextField {
    base: WidgetBase,
    text: String,
    role: TextRole,
}

impl TextField {
    /// Creates an empty field; defaults are applied on resolution.
    pub fn new(base: WidgetBase, role: TextRole) -> Self {
        Self {
            base,
            text: String::new(),
            role,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> TextRole {
        self.role
    }

    pub fn is_masked(&self) -> bool {
        self.role == TextRole::Masked
    }
}

impl Widget for TextField {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        match self.role {
            TextRole::Plain => WidgetKind::TextField,
            TextRole::Masked => WidgetKind::PasswordField,
            TextRole::Path => WidgetKind::PathField,
            TextRole::File => WidgetKind::FileField,
        }
    }

    fn widget_value(&self) -> Value {
        Value::Str(self.text.clone())
    }

    fn set_value(&mut self, value: Value) {
        match value {
            Value::Str(s) => self.text = s,
            Value::List(_) => ignored(&self.base, &value),
            other => self.text = other.to_string(),
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn match_choice(choices: &[String], ty: &ParamType, value: &Value) -> Option<usize> {
    let canonical = ty.convert(value).ok()?;
    let text = canonical.as_str()?;
    choices.iter().position(|c| c == text)
}

/// Drop-down with one selected choice.
#[derive(Debug, Clone)]
pub struct ComboBox {
    base: WidgetBase,
    choices: Vec<String>,
    selected: Option<usize>,
}

impl ComboBox {
    /// Creates the box with the type's choices, selecting the default or
    /// the first choice.
    pub fn new(base: WidgetBase) -> Self {
        let choices = base.value_type().choices().unwrap_or_default().to_vec();
        let selected = base
            .param()
            .default_value()
            .and_then(|d| match_choice(&choices, base.value_type(), &d))
            .or(if choices.is_empty() { None } else { Some(0) });
        Self {
            base,
            choices,
            selected,
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.choices[i].as_str())
    }
}

impl Widget for ComboBox {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::ComboBox
    }

    fn widget_value(&self) -> Value {
        Value::Str(self.selected().unwrap_or_default().to_string())
    }

    fn set_value(&mut self, value: Value) {
        match match_choice(&self.choices, self.base.value_type(), &value) {
            Some(i) => self.selected = Some(i),
            None => ignored(&self.base, &value),
        }
    }

    // Choice controls do not show a validity cue.
    fn handle_valid(&mut self, _valid: bool) {}
}

/// Drop-down where any number of choices can be checked.
#[derive(Debug, Clone)]
pub struct CheckableComboBox {
    base: WidgetBase,
    choices: Vec<String>,
    checked: Vec<bool>,
}

impl CheckableComboBox {
    /// Creates the box with the type's choices, checking the defaults.
    pub fn new(base: WidgetBase) -> Self {
        let choices = base.value_type().choices().unwrap_or_default().to_vec();
        let checked = vec![false; choices.len()];
        let default = base.param().default_value();
        let mut combo = Self {
            base,
            choices,
            checked,
        };
        if let Some(default) = default {
            combo.set_value(default);
        }
        combo
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn checked(&self) -> Vec<&str> {
        self.choices
            .iter()
            .zip(&self.checked)
            .filter(|(_, on)| **on)
            .map(|(c, _)| c.as_str())
            .collect()
    }

    /// Checks or unchecks one choice; unknown choices are ignored.
    pub fn set_checked(&mut self, choice: &str, on: bool) {
        if let Some(i) = self.choices.iter().position(|c| c == choice) {
            self.checked[i] = on;
        }
    }
}

impl Widget for CheckableComboBox {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::CheckableComboBox
    }

    fn widget_value(&self) -> Value {
        Value::List(self.checked().into_iter().map(Value::from).collect())
    }

    fn set_value(&mut self, value: Value) {
        let mut checked = vec![false; self.choices.len()];
        for item in value.into_list() {
            match match_choice(&self.choices, self.base.value_type(), &item) {
                Some(i) => checked[i] = true,
                None => ignored(&self.base, &item),
            }
        }
        self.checked = checked;
    }

    fn is_empty(&self) -> bool {
        !self.checked.iter().any(|on| *on)
    }

    // Choice controls do not show a validity cue.
    fn handle_valid(&mut self, _valid: bool) {}
}

/// Date and time editor.
#[derive(Debug, Clone)]
pub struct DateTimeEdit {
    base: WidgetBase,
    value: NaiveDateTime,
}

impl DateTimeEdit {
    /// Creates the editor showing the default, or the current local time.
    pub fn new(base: WidgetBase) -> Self {
        let value = match base.converted_default() {
            Some(Value::DateTime(dt)) => dt,
            _ => Local::now().naive_local(),
        };
        Self { base, value }
    }

    pub fn value(&self) -> NaiveDateTime {
        self.value
    }
}

impl Widget for DateTimeEdit {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::DateTimeEdit
    }

    fn widget_value(&self) -> Value {
        Value::DateTime(self.value)
    }

    fn set_value(&mut self, value: Value) {
        match self.base.value_type().convert(&value) {
            Ok(Value::DateTime(dt)) => self.value = dt,
            _ => ignored(&self.base, &value),
        }
    }
}
