//! Building the command line from resolved values.

use std::fmt;
use std::process::{Command, ExitStatus};

use command_form_core::{CommandDescriptor, ParamKind, Value};
use tracing::debug;

/// Program and arguments of a resolved command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Lays out options in parameter order, then positional arguments.
    ///
    /// The argv prefix is the descriptor's `program`, or its name. Boolean
    /// flags appear only when set; parameters without a value are left out.
    /// Positionals that look like options are preceded by `--`.
    pub fn build(command: &CommandDescriptor, values: &[(String, Option<Value>)]) -> Self {
        let mut argv = if command.program.is_empty() {
            vec![command.name.clone()]
        } else {
            command.program.clone()
        };
        let program = argv.remove(0);
        let mut args = argv;
        let mut positionals = Vec::new();

        for param in &command.params {
            let Some(Some(value)) = values
                .iter()
                .find(|(name, _)| *name == param.name)
                .map(|(_, value)| value)
            else {
                continue;
            };
            let opt = param
                .option_names()
                .into_iter()
                .next()
                .unwrap_or_else(|| format!("--{}", param.name));

            match param.kind {
                ParamKind::Argument => flatten(value, &mut positionals),
                ParamKind::Option if param.is_flag => {
                    if value.as_bool() == Some(true) {
                        args.push(opt);
                    }
                }
                ParamKind::Option if param.multiple => {
                    for occurrence in value.as_list().unwrap_or_default() {
                        args.push(opt.clone());
                        flatten(occurrence, &mut args);
                    }
                }
                ParamKind::Option => {
                    args.push(opt);
                    flatten(value, &mut args);
                }
            }
        }

        if positionals.iter().any(|p| p.starts_with('-')) {
            args.push("--".to_string());
        }
        args.extend(positionals);
        Self { program, args }
    }

    /// Runs the command, inheriting stdio.
    pub fn run(&self) -> Result<ExitStatus, String> {
        debug!(program = %self.program, args = ?self.args, "spawning");
        Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| format!("failed to run '{}': {e}", self.program))
    }
}

fn flatten(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::List(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        other => out.push(other.to_string()),
    }
}

fn quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use command_form_core::{ParamDescriptor, ParamType};

    use super::*;

    fn command() -> CommandDescriptor {
        CommandDescriptor::new("archive")
            .with_program(&["tar", "-c"])
            .with_param(ParamDescriptor::argument("inputs", ParamType::String).allow_multiple())
            .with_param(ParamDescriptor::option("output", ParamType::path()).with_opt("-f"))
            .with_param(ParamDescriptor::flag("verbose").with_opt("-v"))
            .with_param(ParamDescriptor::flag("gzip").with_opt("-z"))
            .with_param(
                ParamDescriptor::option("exclude", ParamType::String).allow_multiple(),
            )
            .with_param(ParamDescriptor::option("label", ParamType::String))
    }

    #[test]
    fn test_build_orders_options_before_positionals() {
        let values = vec![
            ("inputs".to_string(), Some(Value::from(vec!["a dir", "b"]))),
            ("output".to_string(), Some(Value::from("out.tar"))),
            ("verbose".to_string(), Some(Value::Bool(true))),
            ("gzip".to_string(), Some(Value::Bool(false))),
            ("exclude".to_string(), Some(Value::from(vec!["*.o", "*.a"]))),
            ("label".to_string(), None),
        ];
        let inv = Invocation::build(&command(), &values);
        assert_eq!(inv.program, "tar");
        assert_eq!(
            inv.args,
            vec![
                "-c", "-f", "out.tar", "-v", "--exclude", "*.o", "--exclude", "*.a", "a dir", "b"
            ]
        );
        assert_eq!(
            inv.to_string(),
            "tar -c -f out.tar -v --exclude '*.o' --exclude '*.a' 'a dir' b"
        );
    }

    #[test]
    fn test_build_defaults_program_to_command_name() {
        let cmd = CommandDescriptor::new("echo")
            .with_param(ParamDescriptor::option("size", ParamType::int()).with_nargs(2));
        let values = vec![("size".to_string(), Some(Value::from(vec![3, 4])))];
        let inv = Invocation::build(&cmd, &values);
        assert_eq!(inv.to_string(), "echo --size 3 4");
    }

    #[test]
    fn test_dash_positionals_are_separated() {
        let cmd = CommandDescriptor::new("rm")
            .with_param(ParamDescriptor::argument("file", ParamType::String));
        let values = vec![("file".to_string(), Some(Value::from("-rf")))];
        assert_eq!(Invocation::build(&cmd, &values).args, vec!["--", "-rf"]);
    }
}
