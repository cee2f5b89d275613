//! Command descriptors and the conversion rules a command form resolves
//! against.
//!
//! This crate models the command-line framework side of a generated form:
//!
//! - [`ParamDescriptor`]: one option or argument with its declared type,
//!   cardinality, multiplicity, required-ness, default, env var binding,
//!   prompt metadata and post-processing callback.
//! - [`ParamType`]: declared types and their [`convert`](ParamType::convert)
//!   rules.
//! - [`Value`]: raw control content and converted values.
//! - [`Context`]: environment lookup and the blocking yes/no prompt.
//! - [`CommandDescriptor`]: a command with its parameters, loadable from
//!   YAML or JSON.
//!
//! Validation ([`validate_command`]) catches structural errors such as
//! duplicate parameters and impossible cardinalities.
//!
//! # Example
//!
//! ```
//! use command_form_core::*;
//!
//! let cmd = CommandDescriptor::new("backup")
//!     .with_param(ParamDescriptor::argument("source", ParamType::path()))
//!     .with_param(
//!         ParamDescriptor::option("keep", ParamType::int_range(Some(1), None))
//!             .with_default(7),
//!     );
//! assert!(validate_command(&cmd).is_empty());
//!
//! let keep = cmd.find_param("keep").unwrap();
//! assert_eq!(keep.convert(&"30".into()).unwrap(), Value::Int(30));
//! assert!(keep.convert(&"0".into()).is_err());
//! ```

mod callback;
mod context;
mod error;
mod loader;
mod param_type;
mod types;
mod validate;
mod value;

pub use callback::{Callback, DefaultFactory, ParamDefault};
pub use context::{Context, EnvSource, MapEnv, ProcessEnv, Prompter};
pub use error::{ConversionError, LoadError, ProcessError, Result};
pub use param_type::{DEFAULT_DATETIME_FORMATS, ParamType};
pub use types::*;
pub use validate::{ValidationError, validate_command, validate_param};
pub use value::Value;
