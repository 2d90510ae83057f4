//! Why a `tabulate` invocation failed, and how that reaches the terminal

use std::io;

use tabulator_errors::{ConfigError, Error, UserFacingError};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CliError {
    /// Flags that parse but make no sense together (clap catches the rest)
    #[error("{0}")]
    Usage(String),

    /// Config loading or the run itself stopped; findings never land here
    #[error("{}", describe(.0))]
    Tabulation(#[from] Error),

    /// The final summary could not be written to stdout
    #[error("cannot write the run summary: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// 2 matches clap's own status for bad arguments
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Tabulation(_) | CliError::Output(_) => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Tabulation(e.into())
    }
}

fn describe(err: &Error) -> String {
    let mut text = err.user_message().into_owned();
    if let Some(code) = err.user_code() {
        text.push_str(&format!("\n  Code: {code}"));
    }
    if let Some(hint) = err.user_hint() {
        text.push_str(&format!("\n  Hint: {hint}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulator_errors::PackageError;

    #[test]
    fn missing_package_names_path_and_exits_one() {
        let err = CliError::from(Error::from(PackageError::NotFound {
            path: "/data/pkg.zip".to_string(),
        }));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("/data/pkg.zip"));
    }

    #[test]
    fn usage_errors_exit_two() {
        let err = CliError::Usage("PATH is required".to_string());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "PATH is required");
    }
}
