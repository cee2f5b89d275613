//! Fixed-arity composites: tuples and repeated groups.

use command_form_core::{ParamType, Shape, Value};
use tracing::debug;

use crate::factory::build_widget;
use crate::widget::{Widget, WidgetBase, WidgetKind};

/// A row of single-valued child controls, one per position.
///
/// Tuple types get one child per element type; other types get `nargs`
/// children of the same type. Resolution converts the children's content
/// position by position.
#[derive(Debug)]
pub struct FixedComposite {
    base: WidgetBase,
    kind: WidgetKind,
    children: Vec<Box<dyn Widget>>,
}

impl FixedComposite {
    pub fn new(base: WidgetBase) -> Self {
        let (kind, slot_types) = match base.value_type() {
            ParamType::Tuple { types } => (WidgetKind::Tuple, types.clone()),
            ty => (WidgetKind::RepeatedGroup, vec![ty.clone(); base.shape().nargs]),
        };
        let children = slot_types
            .iter()
            .map(|ty| build_widget(ty, base.param(), Shape::single(), true))
            .collect();
        Self {
            base,
            kind,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        Widget::is_empty(self)
    }

    pub fn child(&self, index: usize) -> Option<&dyn Widget> {
        self.children.get(index).map(|c| c.as_ref() as &dyn Widget)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.children.get_mut(index).map(|c| c.as_mut())
    }
}

impl Widget for FixedComposite {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn widget_value(&self) -> Value {
        Value::List(self.children.iter().map(|c| c.widget_value()).collect())
    }

    fn set_value(&mut self, value: Value) {
        match value {
            Value::List(items) => {
                for (child, item) in self.children.iter_mut().zip(items) {
                    child.set_value(item);
                }
            }
            other => debug!(
                widget = self.base.name(),
                value_type = other.type_name(),
                "ignoring non-list value"
            ),
        }
    }

    fn is_empty(&self) -> bool {
        self.children.iter().all(|c| c.is_empty())
    }

    fn handle_valid(&mut self, valid: bool) {
        self.base.set_valid(valid);
        for child in &mut self.children {
            child.handle_valid(valid);
        }
    }

    fn children(&self) -> Vec<&dyn Widget> {
        self.children.iter().map(|c| c.as_ref() as &dyn Widget).collect()
    }
}
