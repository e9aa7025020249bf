use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("object size {size} exceeds the hash function limit of {max} bytes")]
    ObjectTooLarge { size: usize, max: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Deserialization failures. Each variant pins down the stage that
/// rejected the buffer; a failed parse never yields a usable instance.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("buffer too short: need {need} more bytes, have {have}")]
    UnexpectedEof { need: usize, have: usize },

    #[error("buffer of {declared} bytes not fully consumed ({consumed} read)")]
    TrailingBytes { declared: usize, consumed: usize },

    #[error("unknown hasher type discriminant {0}")]
    UnknownHasherTag(u8),

    #[error("hasher type discriminant mismatch: expected {expected}, found {found}")]
    TagMismatch { expected: u8, found: u8 },

    #[error("payload length mismatch: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}
