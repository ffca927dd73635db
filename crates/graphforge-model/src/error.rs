use thiserror::Error;

/// Errors raised by the type graph model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate type: {name} is already registered with different contents")]
    DuplicateType { name: String },

    #[error("duplicate field: {type_name}.{field} is already defined")]
    DuplicateField { type_name: String, field: String },

    #[error("dangling reference: {type_name}.{field} refers to unknown type {target}")]
    DanglingReference {
        type_name: String,
        field: String,
        target: String,
    },

    #[error("invalid name: {0:?} does not match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidName(String),

    #[error("invalid type expression: {expression} ({reason})")]
    InvalidTypeExpression { expression: String, reason: String },

    #[error("type {type_name} is a {kind} and cannot hold fields")]
    FieldsNotSupported {
        type_name: String,
        kind: &'static str,
    },
}

impl ModelError {
    /// Create a new DuplicateType error.
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::DuplicateType { name: name.into() }
    }

    /// Create a new DuplicateField error.
    pub fn duplicate_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Create a new DanglingReference error.
    pub fn dangling_reference(
        type_name: impl Into<String>,
        field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::DanglingReference {
            type_name: type_name.into(),
            field: field.into(),
            target: target.into(),
        }
    }

    /// Create a new InvalidTypeExpression error.
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTypeExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}
