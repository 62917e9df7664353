//! Failures of `spriteshade` commands and the exit code each one maps to.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | every requested shader assembled |
//! | 2    | bad arguments (reported by clap) |
//! | 10   | a template failed to assemble for the chosen profile |
//! | 11   | a `--profile-file` could not be read |
//! | 12   | unknown variant or profile name, or a profile file that does not validate |
//! | 13   | JSON output could not be produced |

use spriteshade_core::ShaderError;
use std::fmt;

pub enum CliError {
    /// Assembly rejected the template: bad token, missing capability, or a
    /// structural check on the assembled text.
    Shader(ShaderError),
    /// Reading a profile file from disk failed; carries path and OS error.
    Io(String),
    /// The command line named something that does not exist, or the
    /// profile it pointed at was rejected.
    Input(String),
    /// Writing the `--json` report failed.
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Shader(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Shader(e) => write!(f, "assembly failed: {e}"),
            CliError::Io(msg) | CliError::Input(msg) => f.write_str(msg),
            CliError::Serialization(msg) => write!(f, "cannot write JSON report: {msg}"),
        }
    }
}

/// Profile lookups and profile files are user input; everything else is a
/// defect in the templates or the profile's capabilities.
impl From<ShaderError> for CliError {
    fn from(e: ShaderError) -> Self {
        match e {
            ShaderError::InvalidProfile(_) | ShaderError::UnknownProfile(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Shader(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
