//! User-extensible list of entries for parameters that may repeat.

use std::sync::Arc;

use command_form_core::{Context, Value};
use tracing::debug;

use crate::adapter;
use crate::error::{Resolution, WidgetError};
use crate::factory::build_widget;
use crate::resolve::finish;
use crate::widget::{Widget, WidgetBase, WidgetKind};

/// Identifies one entry of a [`VariableComposite`]; the key of its remove
/// action. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairId(u64);

#[derive(Debug)]
struct Pair {
    id: PairId,
    widget: Box<dyn Widget>,
}

/// Zero or more entries, each a control for one occurrence of the
/// parameter, with add and per-entry remove actions.
///
/// Entries are built for the parameter's shape without multiplicity, so an
/// entry of a `nargs = 2` parameter is itself a fixed composite.
#[derive(Debug)]
pub struct VariableComposite {
    base: WidgetBase,
    pairs: Vec<Pair>,
    next_id: u64,
}

impl VariableComposite {
    /// Creates an empty list; entries come from the user, `set_value`, or
    /// resolution.
    pub fn new(base: WidgetBase) -> Self {
        Self {
            base,
            pairs: Vec::new(),
            next_id: 0,
        }
    }

    /// Appends an entry, optionally seeded with `value`.
    pub fn add_pair(&mut self, value: Option<Value>) -> PairId {
        if self.pairs.is_empty() {
            self.base.set_valid(true);
        }
        let mut widget = build_widget(
            self.base.value_type(),
            self.base.param(),
            self.base.shape().without_multiple(),
            true,
        );
        if let Some(value) = value {
            widget.set_value(value);
        }
        let id = PairId(self.next_id);
        self.next_id += 1;
        debug!(widget = self.base.name(), entry = id.0, "entry added");
        self.pairs.push(Pair { id, widget });
        id
    }

    /// Removes an entry and discards its content. Returns `false` if the
    /// entry was already removed.
    pub fn remove_pair(&mut self, id: PairId) -> bool {
        let Some(index) = self.pairs.iter().position(|p| p.id == id) else {
            return false;
        };
        self.pairs.remove(index);
        debug!(widget = self.base.name(), entry = id.0, "entry removed");
        true
    }

    pub fn pair_ids(&self) -> Vec<PairId> {
        self.pairs.iter().map(|p| p.id).collect()
    }

    pub fn pair(&self, id: PairId) -> Option<&dyn Widget> {
        self.pairs
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.widget.as_ref() as &dyn Widget)
    }

    pub fn pair_mut(&mut self, id: PairId) -> Option<&mut (dyn Widget + 'static)> {
        self.pairs
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.widget.as_mut())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Creates entries from the environment or the default when the list
    /// is empty. Returns `false` if neither provided anything.
    fn populate(&mut self, ctx: &Context) -> bool {
        let param = Arc::clone(self.base.param());
        let values = match param.value_from_envvar(ctx) {
            Some(values) => {
                debug!(widget = self.base.name(), count = values.len(), "entries from environment");
                values
            }
            None => match param.default_value() {
                Some(default) => default.into_list(),
                None => return false,
            },
        };
        for value in values {
            self.add_pair(Some(value));
        }
        !self.pairs.is_empty()
    }
}

impl Widget for VariableComposite {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::VariableGroup
    }

    fn widget_value(&self) -> Value {
        Value::List(self.pairs.iter().map(|p| p.widget.widget_value()).collect())
    }

    /// Replaces the entries, one per element of `value`.
    fn set_value(&mut self, value: Value) {
        let items = value.into_list();
        self.pairs.truncate(items.len());
        let existing = self.pairs.len();
        for (i, item) in items.into_iter().enumerate() {
            if i < existing {
                self.pairs[i].widget.set_value(item);
            } else {
                self.add_pair(Some(item));
            }
        }
    }

    fn handle_valid(&mut self, valid: bool) {
        if self.pairs.is_empty() {
            self.base.set_valid(valid);
        } else {
            for pair in &mut self.pairs {
                pair.widget.handle_valid(valid);
            }
        }
    }

    fn get_value(&mut self, ctx: &Context) -> Resolution {
        let param = Arc::clone(self.base.param());
        if self.pairs.is_empty() && !self.populate(ctx) {
            if param.required {
                self.handle_valid(false);
                return Err(WidgetError::required(self.name(), param.param_type_name()));
            }
            return finish(self, ctx, None);
        }

        let defaults = param.default_value().map(Value::into_list);
        let mut values = Vec::with_capacity(self.pairs.len());
        let mut errors = Vec::new();
        let mut required_missing = false;
        for (i, pair) in self.pairs.iter_mut().enumerate() {
            let child = pair.widget.as_mut();
            if child.is_empty() {
                match defaults.as_ref().and_then(|d| d.get(i)) {
                    Some(default) => child.set_value(default.clone()),
                    None if param.required && defaults.is_none() => {
                        required_missing = true;
                        break;
                    }
                    None => continue,
                }
            }
            match adapter::convert_occurrence(&param, &child.widget_value()) {
                Ok(value) => {
                    child.handle_valid(true);
                    values.push(value);
                }
                Err(err) => {
                    child.handle_valid(false);
                    errors.push(format!("#{}: {err}", i + 1));
                }
            }
        }

        if required_missing {
            self.handle_valid(false);
            return Err(WidgetError::required(self.name(), param.param_type_name()));
        }
        if !errors.is_empty() {
            return Err(WidgetError::conversion_batch(self.name(), &errors));
        }
        let value = if values.is_empty() {
            None
        } else {
            Some(Value::List(values))
        };
        finish(self, ctx, value)
    }

    fn children(&self) -> Vec<&dyn Widget> {
        self.pairs
            .iter()
            .map(|p| p.widget.as_ref() as &dyn Widget)
            .collect()
    }
}
