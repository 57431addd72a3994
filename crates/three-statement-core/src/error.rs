use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Missing required assumption: {field}")]
    MissingAssumption { field: String },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Misaligned statements: {0}")]
    MisalignedStatements(String),
}

impl ModelError {
    /// True for errors raised while resolving assumptions, before any period runs.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ModelError::MissingAssumption { .. } | ModelError::InvalidInput { .. }
        )
    }
}
