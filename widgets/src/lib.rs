//! Form controls synthesized from command descriptors.
//!
//! For each [`ParamDescriptor`](command_form_core::ParamDescriptor) the
//! [factory](build_widget) picks a control: a scalar editor, a fixed-arity
//! composite, a user-extensible group, a double-entry field, or a
//! confirmation gate. Every control
//! implements [`Widget`]; [`Widget::get_value`] turns its raw content into
//! the value the command would have received on the command line, or a
//! tagged [`WidgetError`].
//!
//! [`Form`] ties it together for a whole command.
//!
//! # Example
//!
//! ```
//! use command_form_core::{CommandDescriptor, Context, MapEnv, ParamDescriptor, ParamType, Value};
//! use command_form_widgets::{ErrorKind, Form};
//!
//! let cmd = CommandDescriptor::new("resize")
//!     .with_param(ParamDescriptor::argument("image", ParamType::String))
//!     .with_param(ParamDescriptor::option("size", ParamType::int()).with_nargs(2));
//! let ctx = Context::for_command(&cmd).with_env(MapEnv::new());
//!
//! let mut form = Form::new(&cmd, &ctx);
//! form.widget_mut("size").unwrap().set_value(Value::from(vec![640, 480]));
//!
//! let values = form.resolve(&ctx);
//! assert_eq!(values.get("size"), Some(&Ok(Some(Value::from(vec![640, 480])))));
//! let image = values.get("image").unwrap().as_ref().unwrap_err();
//! assert_eq!(image.kind, ErrorKind::Required);
//! ```

mod adapter;
mod composite;
mod confirm;
mod confirmed;
mod error;
mod factory;
mod form;
mod resolve;
mod scalar;
mod variable;
mod widget;

pub use composite::FixedComposite;
pub use confirm::ConfirmationGate;
pub use confirmed::ConfirmedEntry;
pub use error::{ErrorKind, Resolution, WidgetError};
pub use factory::{build_form_widget, build_widget, classify};
pub use form::{Form, FormValues};
pub use resolve::resolve;
pub use scalar::{
    CheckBox, CheckableComboBox, ComboBox, DateTimeEdit, IntField, Numeric, NumericField,
    RealField, TextField, TextRole,
};
pub use variable::{PairId, VariableComposite};
pub use widget::{Widget, WidgetBase, WidgetKind, WidgetSummary};
