//! The comment banner at the top of every generated artifact.

/// Tool identification and generation time, rendered as a comment header.
///
/// The timestamp is supplied by the caller so generation itself stays a pure
/// function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Tool name.
    pub tool: String,
    /// Tool version.
    pub version: String,
    /// Generation time, already formatted.
    pub timestamp: String,
}

impl Banner {
    /// Creates a banner.
    pub fn new(
        tool: impl Into<String>,
        version: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            version: version.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Renders the banner using the given line-comment marker, followed by a
    /// blank line.
    pub fn render(&self, comment: &str) -> String {
        format!(
            "{comment} Code generated by {} {}\n{comment} {}\n\n",
            self.tool, self.version, self.timestamp
        )
    }
}
