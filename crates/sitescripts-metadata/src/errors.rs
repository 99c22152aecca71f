use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading installed distribution metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Distribution metadata at {} does not declare a name", .0.display())]
    MissingName(PathBuf),

    #[error("Invalid entry point '{name}' in group '{group}': cannot parse '{value}'")]
    InvalidEntryPoint {
        group: String,
        name: String,
        value: String,
    },

    #[error("Entry point '{name}' in group '{group}' has no callable: '{value}'")]
    MissingAttribute {
        group: String,
        name: String,
        value: String,
    },

    #[error("Invalid requirement '{requirement}': {reason}")]
    InvalidRequirement { requirement: String, reason: String },

    #[error("{}", not_found_message(.name, .required_by.as_deref()))]
    RequirementNotFound {
        name: String,
        required_by: Option<String>,
    },
}

fn not_found_message(name: &str, required_by: Option<&str>) -> String {
    match required_by {
        Some(parent) => format!("Requirement '{}' (required by '{}') not found", name, parent),
        None => format!("Requirement '{}' not found", name),
    }
}

impl MetadataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MetadataError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_not_found_display() {
        let err = MetadataError::RequirementNotFound {
            name: "bar".to_string(),
            required_by: Some("foo".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Requirement 'bar' (required by 'foo') not found"
        );

        let err = MetadataError::RequirementNotFound {
            name: "bar".to_string(),
            required_by: None,
        };
        assert_eq!(err.to_string(), "Requirement 'bar' not found");
    }
}
