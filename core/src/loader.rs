//! Loading and saving command descriptor files.
//!
//! Descriptors are written by hand as YAML (`.yml`/`.yaml`) or JSON (any
//! other extension).
//!
//! # Example YAML
//!
//! ```yaml
//! name: deploy
//! program: [./deploy.sh]
//! auto_envvar_prefix: DEPLOY
//! params:
//!   - name: target
//!     kind: argument
//!     required: true
//!     type: { kind: choice, choices: [staging, production] }
//!   - name: replicas
//!     type: { kind: int, min: 1, max: 10 }
//!     default: 2
//!   - name: tag
//!     multiple: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::CommandDescriptor;
use crate::error::{LoadError, Result};
use crate::validate::validate_command;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    )
}

impl CommandDescriptor {
    /// Loads and validates a descriptor from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](LoadError::Io) if the file cannot be read,
    /// [`Yaml`](LoadError::Yaml) or [`Json`](LoadError::Json) if parsing
    /// fails, and [`Invalid`](LoadError::Invalid) if validation finds
    /// problems.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let command: CommandDescriptor = if is_yaml(path) {
            serde_yaml::from_reader(reader)?
        } else {
            serde_json::from_reader(reader)?
        };

        let errors = validate_command(&command);
        if !errors.is_empty() {
            return Err(LoadError::Invalid(errors));
        }
        debug!(
            command = %command.name,
            params = command.params.len(),
            path = %path.display(),
            "loaded command descriptor"
        );
        Ok(command)
    }

    /// Saves the descriptor, choosing the format from the extension.
    ///
    /// Callbacks and default producers are not written.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](LoadError::Io) if the file cannot be written, or a
    /// serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        if is_yaml(path) {
            serde_yaml::to_writer(writer, self)?;
        } else {
            serde_json::to_writer_pretty(writer, self)?;
        }
        Ok(())
    }
}
