use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("Unsupported mode argument: {0}")]
    Unsupported(String),
}

/// Operating mode selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Only orders listed in `mode.test_orders` are processed
    #[default]
    Test,
    /// Every order is processed except `mode.excluded_orders`
    Production,
}

impl RunMode {
    /// Parse the single optional mode argument.
    ///
    /// A missing argument means test mode.
    pub fn from_arg(arg: Option<&str>) -> Result<Self, ModeError> {
        match arg {
            None => Ok(RunMode::Test),
            Some(value) => value.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Test => "test",
            RunMode::Production => "production",
        }
    }
}

impl FromStr for RunMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "-t" | "t" | "test" => Ok(RunMode::Test),
            "-p" | "p" | "prod" | "production" => Ok(RunMode::Production),
            _ => Err(ModeError::Unsupported(s.to_string())),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_defaults_to_test() {
        assert_eq!(RunMode::from_arg(None).unwrap(), RunMode::Test);
    }

    #[test]
    fn test_flag_forms() {
        assert_eq!(RunMode::from_arg(Some("-t")).unwrap(), RunMode::Test);
        assert_eq!(RunMode::from_arg(Some("test")).unwrap(), RunMode::Test);
        assert_eq!(RunMode::from_arg(Some("-p")).unwrap(), RunMode::Production);
        assert_eq!(
            RunMode::from_arg(Some("PRODUCTION")).unwrap(),
            RunMode::Production
        );
    }

    #[test]
    fn test_unsupported_argument() {
        let err = RunMode::from_arg(Some("--yolo")).unwrap_err();
        assert_eq!(err, ModeError::Unsupported("--yolo".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(RunMode::Production.to_string(), "production");
    }
}
