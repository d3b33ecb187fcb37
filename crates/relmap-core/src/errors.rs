use relmap_core_types::SessionId;
use thiserror::Error;

/// Result type alias using RelMapError
pub type Result<T> = std::result::Result<T, RelMapError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    ConstraintViolation,

    // Mapping
    InvalidSchema,
    UnknownEntity,
    UnknownColumn,
    ChecksumMismatch,

    // Relationship bookkeeping
    InvariantViolation,

    // Integration
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::UnknownEntity => "ERR_UNKNOWN_ENTITY",
            ExErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context for
/// debugging. Store-level code returns this type directly.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    entity_id: Option<i64>,
    session_id: Option<SessionId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            entity_id: None,
            session_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity type context (e.g. "Child")
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add primary key context
    pub fn with_entity_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Add session context
    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
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
        match (&self.entity, self.entity_id) {
            (Some(entity), Some(id)) => write!(f, " ({}#{})", entity, id)?,
            (Some(entity), None) => write!(f, " ({})", entity)?,
            (None, Some(id)) => write!(f, " (id: {})", id)?,
            (None, None) => {}
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by the in-memory mapping layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelMapError {
    /// Parent not present in the store
    #[error("Parent not found: {parent_id}")]
    ParentNotFound { parent_id: i64 },

    /// Child not present in the store
    #[error("Child not found: {child_id}")]
    ChildNotFound { child_id: i64 },

    /// An entity with the same primary key is already in the store
    #[error("{entity} already exists: {id}")]
    EntityAlreadyExists { entity: String, id: i64 },

    /// Entity type was never registered
    #[error("Unknown entity: {entity}")]
    UnknownEntity { entity: String },

    /// Column not declared on the entity
    #[error("Unknown column {column} on {entity}")]
    UnknownColumn { entity: String, column: String },

    /// Schema declarations are inconsistent
    #[error("Invalid schema for {entity}: {reason}")]
    InvalidSchema { entity: String, reason: String },

    /// The two sides of a relationship disagree
    #[error("Relationship invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl From<RelMapError> for ExError {
    fn from(err: RelMapError) -> Self {
        match err {
            RelMapError::ParentNotFound { parent_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity("Parent")
                .with_entity_id(parent_id)
                .with_message("Parent not found"),

            RelMapError::ChildNotFound { child_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity("Child")
                .with_entity_id(child_id)
                .with_message("Child not found"),

            RelMapError::EntityAlreadyExists { entity, id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity(entity)
                    .with_entity_id(id)
                    .with_message("Entity already exists")
            }

            RelMapError::UnknownEntity { entity } => ExError::new(ExErrorKind::UnknownEntity)
                .with_entity(entity.clone())
                .with_message(format!("Entity {} is not registered", entity)),

            RelMapError::UnknownColumn { entity, column } => {
                ExError::new(ExErrorKind::UnknownColumn)
                    .with_entity(entity)
                    .with_message(format!("Unknown column {}", column))
            }

            RelMapError::InvalidSchema { entity, reason } => {
                ExError::new(ExErrorKind::InvalidSchema)
                    .with_entity(entity)
                    .with_message(reason)
            }

            RelMapError::InvariantViolation { reason } => {
                ExError::new(ExErrorKind::InvariantViolation).with_message(reason)
            }
        }
    }
}
