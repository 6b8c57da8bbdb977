use std::fmt;

#[derive(Debug)]
pub enum GuideError {
    /// Reading a definition or fixture file failed
    Io { path: String, source: std::io::Error },

    /// A definition or fixture file did not parse as YAML
    Yaml { path: String, source: serde_yaml::Error },

    /// A scenario or tour id was requested that is not registered
    UnknownDefinition { id: String },
}

impl fmt::Display for GuideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuideError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            GuideError::Yaml { path, source } => {
                write!(f, "YAML parse error in '{}': {}", path, source)
            }
            GuideError::UnknownDefinition { id } => {
                write!(f, "No scenario or tour registered with id '{}'", id)
            }
        }
    }
}

impl std::error::Error for GuideError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GuideError::Io { source, .. } => Some(source),
            GuideError::Yaml { source, .. } => Some(source),
            GuideError::UnknownDefinition { .. } => None,
        }
    }
}
