//! Invocation context handed to conversion, callbacks and env lookup.
//!
//! The context is the seam between controls and the outside world: it
//! resolves environment variables through an [`EnvSource`] and asks blocking
//! yes/no questions through a [`Prompter`]. Both are trait objects so a GUI
//! toolkit, a terminal, or a test can plug in its own implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::CommandDescriptor;

/// Source of environment variable values.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` if it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment, for embedding and tests.
///
/// # Examples
///
/// ```
/// use command_form_core::{EnvSource, MapEnv};
///
/// let env = MapEnv::new().with("APP_PORT", "8080");
/// assert_eq!(env.var("APP_PORT").as_deref(), Some("8080"));
/// assert_eq!(env.var("APP_HOST"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Blocking yes/no question, answered by the user.
pub trait Prompter {
    /// Returns `true` if the user answered "yes".
    fn confirm(&self, question: &str) -> bool;
}

impl<F> Prompter for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, question: &str) -> bool {
        self(question)
    }
}

/// Context for converting and processing parameter values of one command.
#[derive(Clone)]
pub struct Context {
    command: String,
    auto_envvar_prefix: Option<String>,
    env: Arc<dyn EnvSource>,
    prompter: Option<Arc<dyn Prompter>>,
}

impl Context {
    /// Creates a context reading the process environment, with no prompter.
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            auto_envvar_prefix: None,
            env: Arc::new(ProcessEnv),
            prompter: None,
        }
    }

    /// Creates a context for `command`, taking over its env var prefix.
    pub fn for_command(command: &CommandDescriptor) -> Self {
        let mut ctx = Self::new(&command.name);
        ctx.auto_envvar_prefix = command.auto_envvar_prefix.clone();
        ctx
    }

    /// Replaces the environment source.
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Installs the prompter used for confirmation questions.
    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Some(Arc::new(prompter));
        self
    }

    /// Sets the prefix for automatically derived env var names.
    pub fn with_auto_envvar_prefix(mut self, prefix: &str) -> Self {
        self.auto_envvar_prefix = Some(prefix.to_string());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn auto_envvar_prefix(&self) -> Option<&str> {
        self.auto_envvar_prefix.as_deref()
    }

    /// Looks up an environment variable through the configured source.
    pub fn env_var(&self, name: &str) -> Option<String> {
        self.env.var(name)
    }

    /// Asks a yes/no question. Without a prompter the answer is "no".
    pub fn confirm(&self, question: &str) -> bool {
        match &self.prompter {
            Some(prompter) => prompter.confirm(question),
            None => {
                debug!(question, "no prompter installed, answering no");
                false
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command)
            .field("auto_envvar_prefix", &self.auto_envvar_prefix)
            .field("prompter", &self.prompter.is_some())
            .finish_non_exhaustive()
    }
}
