use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Only structural misuse and artifact-level absence are errors. A missing
/// entity or attribute inside a valid snapshot is an in-band outcome
/// (see [`crate::locator::Lookup`]) and never surfaces here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural misuse
    InvalidEndpoint,
    InvalidTemplateKind,
    InvalidAttributeSpec,
    InvalidLabel,
    InvalidInput,
    InvalidConfig,
    InvalidSnapshot,
    UnknownComponent,

    // Artifact absence
    NotFound,
    MissingData,
    AlreadyExists,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidEndpoint => "ERR_INVALID_ENDPOINT",
            ExErrorKind::InvalidTemplateKind => "ERR_INVALID_TEMPLATE_KIND",
            ExErrorKind::InvalidAttributeSpec => "ERR_INVALID_ATTRIBUTE_SPEC",
            ExErrorKind::InvalidLabel => "ERR_INVALID_LABEL",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::UnknownComponent => "ERR_UNKNOWN_COMPONENT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MissingData => "ERR_MISSING_DATA",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable kind for programmatic handling plus optional operation
/// and entity context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (snapshot key, template id, component name...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Structural misuse errors raised by the validation kernel
///
/// These are configuration or programming mistakes and are fatal to the
/// calling check. They convert into [`ExError`] for uniform reporting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    /// Endpoint mode is not one of the recognised collection endpoints
    #[error("Endpoints has to be one of {allowed:?}, got '{value}'")]
    InvalidEndpoint { value: String, allowed: Vec<String> },

    /// Template kind is not one of the supported kinds
    #[error("The Template Type has to be one of {allowed:?}, got '{value}'")]
    InvalidTemplateKind { value: String, allowed: Vec<String> },

    /// Snapshot label is neither preupgrade nor postupgrade
    #[error("Snapshot label has to be one of {allowed:?}, got '{value}'")]
    InvalidLabel { value: String, allowed: Vec<String> },

    /// Attribute argument has the wrong shape or does not cover the upgrade path
    #[error("Wrong attribute type provided: {reason}")]
    InvalidAttributeSpec { reason: String },

    /// Component type is not present in the snapshot
    #[error("Unable to find data for component '{component}'")]
    UnknownComponent { component: String },

    /// No key attribute is declared for the component
    #[error("No key attribute declared for component '{component}'")]
    NoKeyAttribute { component: String },

    /// No entity of the component carries a non-null value for the attribute
    #[error("no data for {attribute}")]
    NoData { attribute: String },
}

impl From<CheckError> for ExError {
    fn from(err: CheckError) -> Self {
        let message = err.to_string();
        match err {
            CheckError::InvalidEndpoint { value, .. } => {
                ExError::new(ExErrorKind::InvalidEndpoint)
                    .with_entity_id(value)
                    .with_message(message)
            }
            CheckError::InvalidTemplateKind { value, .. } => {
                ExError::new(ExErrorKind::InvalidTemplateKind)
                    .with_entity_id(value)
                    .with_message(message)
            }
            CheckError::InvalidLabel { value, .. } => ExError::new(ExErrorKind::InvalidLabel)
                .with_entity_id(value)
                .with_message(message),
            CheckError::InvalidAttributeSpec { .. } => {
                ExError::new(ExErrorKind::InvalidAttributeSpec).with_message(message)
            }
            CheckError::UnknownComponent { component } => {
                ExError::new(ExErrorKind::UnknownComponent)
                    .with_entity_id(component)
                    .with_message(message)
            }
            CheckError::NoKeyAttribute { component } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("resolve_key_attribute")
                .with_entity_id(component)
                .with_message(message),
            CheckError::NoData { attribute } => ExError::new(ExErrorKind::MissingData)
                .with_op("find_attribute")
                .with_entity_id(attribute)
                .with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to ExError
impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
