//! Error types for loading circuit graphs.

/// Errors that can occur when reading an editor project file.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The project file could not be read.
    #[error("failed to read design: {0}")]
    Io(#[from] std::io::Error),

    /// The project JSON could not be parsed.
    #[error("failed to parse design: {0}")]
    Parse(String),

    /// A block uses the primitive namespace with a type the compiler does not know.
    #[error("block '{id}' has unknown primitive type '{type_name}'")]
    UnknownPrimitive {
        /// The offending block id.
        id: String,
        /// The unrecognized type string.
        type_name: String,
    },

    /// A block's `data` payload does not match its type.
    #[error("block '{id}' has malformed data: {reason}")]
    InvalidBlockData {
        /// The offending block id.
        id: String,
        /// What failed to parse.
        reason: String,
    },
}
