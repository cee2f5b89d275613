//! Parameter and command descriptors.
//!
//! This module defines the metadata a form is generated from: one
//! [`ParamDescriptor`] per option or positional argument, grouped in a
//! [`CommandDescriptor`]. The types serialize with [`serde`] so descriptors
//! can be written by hand in YAML or JSON; callbacks and default producers
//! are attached in code.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConversionError, ProcessError};
use crate::{Callback, Context, DefaultFactory, ParamDefault, ParamType, Value};

/// Whether a parameter is a named option or a positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    #[default]
    Option,
    Argument,
}

/// Effective cardinality of a control.
///
/// Controls are built for a shape rather than reading it from the descriptor,
/// so composites can build their children as single-valued without touching
/// the shared descriptor.
///
/// # Examples
///
/// ```
/// use command_form_core::{ParamType, Shape};
///
/// let shape = Shape { nargs: 3, multiple: true };
/// assert!(shape.is_multi_path(&ParamType::int()));
/// assert_eq!(shape.without_multiple(), Shape { nargs: 3, multiple: false });
/// assert!(!Shape::single().is_multi_path(&ParamType::int()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    /// Number of raw values one occurrence consumes.
    pub nargs: usize,
    /// Whether the parameter may occur any number of times.
    pub multiple: bool,
}

impl Shape {
    /// One value, one occurrence.
    pub fn single() -> Self {
        Self {
            nargs: 1,
            multiple: false,
        }
    }

    pub fn without_multiple(self) -> Self {
        Self {
            multiple: false,
            ..self
        }
    }

    /// Whether values of this shape resolve element by element: multiple
    /// parameters, and fixed groups of more than one non-tuple value.
    pub fn is_multi_path(self, param_type: &ParamType) -> bool {
        self.multiple || (!param_type.is_tuple() && self.nargs != 1)
    }
}

fn default_nargs() -> usize {
    1
}

/// Metadata describing one command parameter.
///
/// # Examples
///
/// ```
/// use command_form_core::{ParamDescriptor, ParamType, Value};
///
/// let tags = ParamDescriptor::option("tag", ParamType::String)
///     .allow_multiple()
///     .with_default(vec!["dev"]);
/// assert!(tags.uses_multi_path());
/// assert_eq!(tags.default_value(), Some(Value::from(vec!["dev"])));
///
/// let point = ParamDescriptor::option("point", ParamType::tuple(vec![ParamType::int(), ParamType::int()]));
/// assert_eq!(point.shape().nargs, 2);
/// assert!(!point.uses_multi_path());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Parameter name, also the key of the resolved value.
    pub name: String,
    #[serde(default)]
    pub kind: ParamKind,
    /// Declared type of each value.
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    /// Values consumed per occurrence; tuple types always consume their arity.
    #[serde(default = "default_nargs")]
    pub nargs: usize,
    /// May occur any number of times.
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamDefault>,
    /// Environment variables consulted, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub envvar: Vec<String>,
    /// Prompt text; on a boolean flag this turns the parameter into a
    /// confirmation question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub is_flag: bool,
    /// Mask the entered text.
    #[serde(default)]
    pub hide_input: bool,
    /// Abort unless the final value is `true`.
    #[serde(default)]
    pub abort_if_false: bool,
    /// The value must be entered twice, identically.
    #[serde(default)]
    pub confirmation_prompt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Option spellings (e.g. `--out`, `-o`); derived from the name when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opts: Vec<String>,
    #[serde(skip)]
    pub callback: Option<Callback>,
}

impl ParamDescriptor {
    fn new(name: &str, kind: ParamKind, param_type: ParamType) -> Self {
        let nargs = param_type.arity().unwrap_or(1);
        Self {
            name: name.to_string(),
            kind,
            param_type,
            nargs,
            multiple: false,
            required: false,
            default: None,
            envvar: Vec::new(),
            prompt: None,
            is_flag: false,
            hide_input: false,
            abort_if_false: false,
            confirmation_prompt: false,
            help: None,
            opts: Vec::new(),
            callback: None,
        }
    }

    /// Creates an optional named option.
    pub fn option(name: &str, param_type: ParamType) -> Self {
        Self::new(name, ParamKind::Option, param_type)
    }

    /// Creates a required positional argument.
    pub fn argument(name: &str, param_type: ParamType) -> Self {
        let mut param = Self::new(name, ParamKind::Argument, param_type);
        param.required = true;
        param
    }

    /// Creates a boolean flag defaulting to `false`.
    pub fn flag(name: &str) -> Self {
        let mut param = Self::new(name, ParamKind::Option, ParamType::Bool);
        param.is_flag = true;
        param.default = Some(ParamDefault::Value(Value::Bool(false)));
        param
    }

    /// Creates a flag the user must confirm with a yes/no question before
    /// the command runs; answering "no" aborts.
    pub fn confirmation(name: &str, prompt: &str) -> Self {
        let mut param = Self::flag(name).with_prompt(prompt);
        param.abort_if_false = true;
        param
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ParamDefault::Value(value.into()));
        self
    }

    pub fn with_default_factory(mut self, f: impl Fn() -> Value + 'static) -> Self {
        self.default = Some(ParamDefault::Factory(DefaultFactory::new(f)));
        self
    }

    pub fn with_nargs(mut self, nargs: usize) -> Self {
        self.nargs = nargs;
        self
    }

    pub fn allow_multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_envvar(mut self, name: &str) -> Self {
        self.envvar.push(name.to_string());
        self
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = Some(prompt.to_string());
        self
    }

    /// Asks for the value twice; both entries must match.
    pub fn with_confirmation_prompt(mut self) -> Self {
        self.confirmation_prompt = true;
        self
    }

    pub fn hidden_input(mut self) -> Self {
        self.hide_input = true;
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn with_opt(mut self, opt: &str) -> Self {
        self.opts.push(opt.to_string());
        self
    }

    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Values consumed per occurrence, honoring tuple arity.
    pub fn effective_nargs(&self) -> usize {
        self.param_type.arity().unwrap_or(self.nargs)
    }

    /// The descriptor's own cardinality.
    pub fn shape(&self) -> Shape {
        Shape {
            nargs: self.effective_nargs(),
            multiple: self.multiple,
        }
    }

    /// Whether values resolve element by element.
    pub fn uses_multi_path(&self) -> bool {
        self.shape().is_multi_path(&self.param_type)
    }

    /// Whether one occurrence or the parameter as a whole takes several values.
    pub fn is_multi_valued(&self) -> bool {
        self.multiple || self.effective_nargs() != 1
    }

    /// A boolean flag with a prompt is asked as a yes/no question.
    pub fn needs_confirmation(&self) -> bool {
        self.is_flag && self.prompt.is_some() && self.param_type == ParamType::Bool
    }

    /// The default, invoking a producer if necessary.
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(ParamDefault::resolve)
    }

    /// `"option"` or `"argument"`.
    pub fn param_type_name(&self) -> &'static str {
        match self.kind {
            ParamKind::Option => "option",
            ParamKind::Argument => "argument",
        }
    }

    /// Option spellings, falling back to `--name` with dashes.
    pub fn option_names(&self) -> Vec<String> {
        if self.opts.is_empty() {
            vec![format!("--{}", self.name.replace('_', "-"))]
        } else {
            self.opts.clone()
        }
    }

    /// Environment variables consulted for this parameter.
    ///
    /// Explicit names win; otherwise the name is derived from the context's
    /// auto prefix as `PREFIX_NAME`.
    pub fn envvar_names(&self, ctx: &Context) -> Vec<String> {
        if !self.envvar.is_empty() {
            return self.envvar.clone();
        }
        match ctx.auto_envvar_prefix() {
            Some(prefix) => vec![format!("{prefix}_{}", self.name).to_uppercase()],
            None => Vec::new(),
        }
    }

    /// First non-empty environment value bound to this parameter.
    pub fn resolve_envvar_value(&self, ctx: &Context) -> Option<String> {
        self.envvar_names(ctx)
            .iter()
            .filter_map(|name| ctx.env_var(name))
            .find(|value| !value.is_empty())
    }

    /// Raw values taken from the environment.
    ///
    /// Single-valued parameters yield one string. Multi-valued parameters
    /// split the variable per [`ParamType::split_envvar_value`]; multiple
    /// parameters with `nargs > 1` group the pieces into lists of `nargs`
    /// and drop an incomplete trailing group.
    pub fn value_from_envvar(&self, ctx: &Context) -> Option<Vec<Value>> {
        let raw = self.resolve_envvar_value(ctx)?;
        if !self.is_multi_valued() {
            return Some(vec![Value::Str(raw)]);
        }
        let pieces: Vec<Value> = self
            .param_type
            .split_envvar_value(&raw)
            .into_iter()
            .map(Value::Str)
            .collect();
        let nargs = self.effective_nargs();
        if self.multiple && nargs > 1 {
            let groups = pieces.chunks_exact(nargs);
            if !groups.remainder().is_empty() {
                warn!(
                    param = %self.name,
                    dropped = groups.remainder().len(),
                    "ignoring incomplete trailing group in environment value"
                );
            }
            let groups: Vec<Value> = groups.map(|chunk| Value::List(chunk.to_vec())).collect();
            (!groups.is_empty()).then_some(groups)
        } else {
            Some(pieces)
        }
    }

    /// Converts one raw value through the declared type.
    pub fn convert(&self, raw: &Value) -> Result<Value, ConversionError> {
        self.param_type.convert(raw)
    }

    /// Converts the raw value of one occurrence.
    ///
    /// For non-tuple parameters with `nargs > 1` an occurrence is a group of
    /// `nargs` values, each converted on its own.
    pub fn convert_occurrence(&self, raw: &Value) -> Result<Value, ConversionError> {
        let nargs = self.effective_nargs();
        if self.param_type.is_tuple() || nargs == 1 {
            return self.convert(raw);
        }
        let items = match raw {
            Value::List(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };
        if items.len() != nargs {
            return Err(ConversionError::Arity {
                expected: nargs,
                actual: items.len(),
            });
        }
        items
            .iter()
            .map(|item| self.convert(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    /// Runs the post-processing step: the required check, the confirmation
    /// check, then the callback.
    ///
    /// # Errors
    ///
    /// [`ProcessError::Missing`] if a required parameter has no value,
    /// [`ProcessError::Abort`] if a confirmation was declined, or whatever
    /// the callback returns.
    pub fn process_value(
        &self,
        ctx: &Context,
        value: Option<Value>,
    ) -> Result<Option<Value>, ProcessError> {
        if self.required && value_is_missing(value.as_ref()) {
            return Err(ProcessError::Missing(self.name.clone()));
        }
        if self.abort_if_false && value != Some(Value::Bool(true)) {
            return Err(ProcessError::Abort);
        }
        match &self.callback {
            Some(callback) => callback.call(ctx, self, value),
            None => Ok(value),
        }
    }
}

fn value_is_missing(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::List(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// A command and the parameters its form is built from.
///
/// # Examples
///
/// ```
/// use command_form_core::{CommandDescriptor, ParamDescriptor, ParamType};
///
/// let cmd = CommandDescriptor::new("greet")
///     .with_program(&["echo"])
///     .with_param(ParamDescriptor::argument("who", ParamType::String))
///     .with_param(ParamDescriptor::flag("shout"));
/// assert_eq!(cmd.find_param("shout").unwrap().name, "shout");
/// assert_eq!(cmd.arguments().count(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Argv prefix used when executing the resolved command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub program: Vec<String>,
    /// Prefix for automatically derived env var names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_envvar_prefix: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
}

impl CommandDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_program(mut self, argv: &[&str]) -> Self {
        self.program = argv.iter().map(|a| (*a).to_string()).collect();
        self
    }

    pub fn with_param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn find_param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn options(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter().filter(|p| p.kind == ParamKind::Option)
    }

    pub fn arguments(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter().filter(|p| p.kind == ParamKind::Argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapEnv;

    #[test]
    fn test_tuple_forces_nargs() {
        let param = ParamDescriptor::option(
            "pair",
            ParamType::tuple(vec![ParamType::String, ParamType::int()]),
        );
        assert_eq!(param.nargs, 2);
        assert_eq!(param.effective_nargs(), 2);
        assert!(!param.uses_multi_path());
    }

    #[test]
    fn test_multi_path_truth_table() {
        let base = ParamDescriptor::option("n", ParamType::int());
        assert!(!base.uses_multi_path());
        assert!(base.clone().with_nargs(2).uses_multi_path());
        assert!(base.clone().allow_multiple().uses_multi_path());
        let tuple = ParamDescriptor::option("t", ParamType::tuple(vec![ParamType::int(); 2]));
        assert!(!tuple.uses_multi_path());
        assert!(tuple.allow_multiple().uses_multi_path());
    }

    #[test]
    fn test_needs_confirmation_only_for_prompted_flags() {
        assert!(ParamDescriptor::confirmation("yes", "Sure?").needs_confirmation());
        assert!(!ParamDescriptor::flag("yes").needs_confirmation());
        let prompted_text = ParamDescriptor::option("name", ParamType::String).with_prompt("Name");
        assert!(!prompted_text.needs_confirmation());
    }

    #[test]
    fn test_envvar_explicit_and_auto_prefix() {
        let env = MapEnv::new().with("APP_LEVEL", "3").with("LEVEL_OVERRIDE", "");
        let ctx = Context::new("app").with_env(env).with_auto_envvar_prefix("app");

        let auto = ParamDescriptor::option("level", ParamType::int());
        assert_eq!(auto.envvar_names(&ctx), vec!["APP_LEVEL"]);
        assert_eq!(auto.value_from_envvar(&ctx), Some(vec![Value::from("3")]));

        let explicit = ParamDescriptor::option("level", ParamType::int())
            .with_envvar("LEVEL_OVERRIDE")
            .with_envvar("APP_LEVEL");
        // empty values are skipped
        assert_eq!(explicit.resolve_envvar_value(&ctx).as_deref(), Some("3"));
    }

    #[test]
    fn test_value_from_envvar_groups_by_nargs() {
        let ctx = Context::new("app").with_env(MapEnv::new().with("POINTS", "1 2 3 4"));
        let points = ParamDescriptor::option("point", ParamType::int())
            .with_nargs(2)
            .allow_multiple()
            .with_envvar("POINTS");
        assert_eq!(
            points.value_from_envvar(&ctx),
            Some(vec![
                Value::from(vec!["1", "2"]),
                Value::from(vec!["3", "4"])
            ])
        );
    }

    #[test]
    fn test_value_from_envvar_drops_incomplete_group() {
        let points = ParamDescriptor::option("point", ParamType::int())
            .with_nargs(2)
            .allow_multiple()
            .with_envvar("POINTS");

        let ctx = Context::new("app").with_env(MapEnv::new().with("POINTS", "1 2 3"));
        assert_eq!(
            points.value_from_envvar(&ctx),
            Some(vec![Value::from(vec!["1", "2"])])
        );

        let ctx = Context::new("app").with_env(MapEnv::new().with("POINTS", "1"));
        assert_eq!(points.value_from_envvar(&ctx), None);
    }

    #[test]
    fn test_convert_occurrence_for_groups() {
        let param = ParamDescriptor::option("size", ParamType::int()).with_nargs(2);
        assert_eq!(
            param.convert_occurrence(&Value::from(vec!["3", "4"])).unwrap(),
            Value::from(vec![3, 4])
        );
        assert!(matches!(
            param.convert_occurrence(&Value::from(vec!["3"])),
            Err(ConversionError::Arity { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_process_value_required_then_callback() {
        let ctx = Context::new("app");
        let param = ParamDescriptor::argument("src", ParamType::String);
        assert_eq!(
            param.process_value(&ctx, None),
            Err(ProcessError::Missing("src".to_string()))
        );
        assert_eq!(
            param.process_value(&ctx, Some(Value::List(vec![]))),
            Err(ProcessError::Missing("src".to_string()))
        );

        let doubled = ParamDescriptor::option("n", ParamType::int()).with_callback(Callback::new(
            |_, _, value| Ok(value.and_then(|v| v.as_int()).map(|i| Value::Int(i * 2))),
        ));
        assert_eq!(doubled.process_value(&ctx, Some(Value::Int(4))), Ok(Some(Value::Int(8))));
    }

    #[test]
    fn test_declined_confirmation_aborts() {
        let ctx = Context::new("app");
        let param = ParamDescriptor::confirmation("yes", "Sure?");
        assert_eq!(param.process_value(&ctx, Some(Value::Bool(false))), Err(ProcessError::Abort));
        assert_eq!(
            param.process_value(&ctx, Some(Value::Bool(true))),
            Ok(Some(Value::Bool(true)))
        );

        let loaded: ParamDescriptor = serde_json::from_str(
            r#"{"name": "yes", "type": {"kind": "bool"}, "is_flag": true, "prompt": "Sure?", "abort_if_false": true}"#,
        )
        .unwrap();
        assert!(loaded.needs_confirmation());
        assert_eq!(loaded.process_value(&ctx, None), Err(ProcessError::Abort));
    }

    #[test]
    fn test_option_names_default_from_name() {
        let param = ParamDescriptor::option("dry_run", ParamType::Bool);
        assert_eq!(param.option_names(), vec!["--dry-run"]);
        let param = param.with_opt("-n");
        assert_eq!(param.option_names(), vec!["-n"]);
    }
}
