use thiserror::Error;

/// Configuration errors.
///
/// Raised while reading a configuration tree or validating the parameters
/// read from it. Owners wrap the errors of their parts with
/// [`context`](Self::context), so the final message names every level that
/// failed, innermost last.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("{context}: {source}")]
    Nested {
        context: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap this error with the name of the component that was being
    /// initialized when it occurred.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all [`Nested`](Self::Nested) layers removed.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Name of the offending field, if the innermost error refers to one.
    pub fn field(&self) -> Option<&str> {
        match self.root_cause() {
            Self::MissingField(field) | Self::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Violations of a caller-side contract at sampling time.
///
/// Copy + small payload for cheap propagation in hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PreconditionError {
    #[error("Bernoulli probability must lie in [0, 1], got {p}")]
    ProbabilityOutOfRange { p: f64 },
}
