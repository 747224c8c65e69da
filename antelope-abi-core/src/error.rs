//! Structured error types for the ABI codec and the transaction builder.
//!
//! Encoding failures and network failures are kept in separate enums so a
//! caller can always tell "this data is invalid" from "the chain was
//! unreachable". Neither family is retried by the codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while building an AST or encoding data against it.
///
/// # Example
/// ```rust
/// use antelope_abi_core::error::CodecError;
///
/// fn check_cpu(ms: u64) -> Result<(), CodecError> {
///     if ms > u8::MAX as u64 {
///         return Err(CodecError::range("max_cpu_usage_ms", ms, "must fit in uint8"));
///     }
///     Ok(())
/// }
///
/// assert_eq!(check_cpu(256).unwrap_err().error_code(), 1004);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Cyclic or unknown struct base, alias cycle, unresolvable variant member
    #[error("Malformed ABI: {message}")]
    MalformedAbi {
        message: String,
    },

    /// Type name matches neither a struct nor a primitive
    #[error("Unknown type: {type_name}")]
    UnknownType {
        type_name: String,
    },

    /// Required field absent from the supplied data
    #[error("Missing field '{field}' in {struct_name}")]
    MissingField {
        struct_name: String,
        field: String,
    },

    /// More than one branch of a variant populated
    #[error("Ambiguous variant {variant}: populated branches {populated:?}")]
    AmbiguousVariant {
        variant: String,
        populated: Vec<String>,
    },

    /// Value outside the declared bounds of its wire type
    #[error("Value {value} out of range for {type_name}: {message}")]
    Range {
        type_name: String,
        value: String,
        message: String,
    },

    /// Value not in the textual form its type expects
    #[error("Invalid {type_name}: {message}")]
    Format {
        type_name: String,
        message: String,
    },

    /// Embedded ripemd160 checksum of a key or signature does not match
    #[error("Checksum mismatch for {kind}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        kind: String,
        expected: String,
        actual: String,
    },
}

impl CodecError {
    pub fn malformed(message: impl Into<String>) -> Self {
        CodecError::MalformedAbi {
            message: message.into(),
        }
    }

    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        CodecError::UnknownType {
            type_name: type_name.into(),
        }
    }

    pub fn missing(struct_name: impl Into<String>, field: impl Into<String>) -> Self {
        CodecError::MissingField {
            struct_name: struct_name.into(),
            field: field.into(),
        }
    }

    pub fn range(
        type_name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        CodecError::Range {
            type_name: type_name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    pub fn format(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Format {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Get a numeric error code for client-side handling.
    pub fn error_code(&self) -> u32 {
        match self {
            CodecError::MalformedAbi { .. } => 1000,
            CodecError::UnknownType { .. } => 1001,
            CodecError::MissingField { .. } => 1002,
            CodecError::AmbiguousVariant { .. } => 1003,
            CodecError::Range { .. } => 1004,
            CodecError::Format { .. } => 1005,
            CodecError::ChecksumMismatch { .. } => 1006,
        }
    }
}

/// Failures of the external collaborators: RPC reads, signer, push.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Chain unreachable: {message}")]
    Unreachable {
        message: String,
    },

    #[error("Invalid chain response: {message}")]
    InvalidResponse {
        message: String,
    },

    #[error("Transaction rejected: {message}")]
    Rejected {
        message: String,
    },

    #[error("Signer failed: {message}")]
    Signer {
        message: String,
    },
}

impl ChainError {
    pub fn error_code(&self) -> u32 {
        match self {
            ChainError::Unreachable { .. } => 2000,
            ChainError::InvalidResponse { .. } => 2001,
            ChainError::Rejected { .. } => 2002,
            ChainError::Signer { .. } => 2003,
        }
    }
}

/// Error returned by the transaction building entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl TransactionError {
    /// True when the failure came from the network side rather than the data.
    pub fn is_network(&self) -> bool {
        matches!(self, TransactionError::Chain(_))
    }

    pub fn error_code(&self) -> u32 {
        match self {
            TransactionError::Codec(e) => e.error_code(),
            TransactionError::Chain(e) => e.error_code(),
        }
    }
}
