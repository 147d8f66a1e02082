use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjectifyError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid object name: {name:?}")]
    InvalidIdentifier { name: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Malformed source at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Failed to replace {path}: {message}")]
    Persist { path: String, message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ObjectifyError {
    fn user_message(&self) -> String {
        match self {
            ObjectifyError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ObjectifyError::InvalidIdentifier { name } => {
                format!("'{}' is not a valid JavaScript identifier", name)
            }
            ObjectifyError::FileNotFound { path } => {
                format!("File not found: {}", path)
            }
            ObjectifyError::Malformed { line, message } => {
                format!("Could not convert source (line {}): {}", line, message)
            }
            ObjectifyError::Persist { path, message } => {
                format!("Could not write {}: {}", path, message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ObjectifyError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config.".to_string()
            ),
            ObjectifyError::InvalidIdentifier { .. } => Some(
                "Object names must start with a letter, '_' or '$' and contain only letters, digits, '_' or '$'.".to_string()
            ),
            ObjectifyError::FileNotFound { .. } => Some(
                "Check --base-dir and the file names listed in the configuration.".to_string()
            ),
            ObjectifyError::Malformed { .. } => Some(
                "Fix the unbalanced construct or retry with --strategy heuristic.".to_string()
            ),
            ObjectifyError::Persist { .. } => Some(
                "Ensure the service directory is writable. The original file was left unchanged.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ObjectifyError {
    fn from(error: toml::de::Error) -> Self {
        ObjectifyError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObjectifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = ObjectifyError::InvalidIdentifier {
            name: "9lives".to_string(),
        };
        assert!(error.user_message().contains("9lives"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_malformed_message_has_line() {
        let error = ObjectifyError::Malformed {
            line: 12,
            message: "unterminated template literal".to_string(),
        };
        assert!(error.to_string().contains("line 12"));
        assert!(error.user_message().contains("unterminated template literal"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = ObjectifyError::from(io_error);
        assert!(matches!(error, ObjectifyError::Io(_)));
        assert!(error.suggestion().is_none());
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let error = ObjectifyError::from(toml_error);
        assert!(matches!(error, ObjectifyError::Config { .. }));
    }
}
