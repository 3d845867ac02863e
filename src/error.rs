//! Error types: structural (malformed element trees) and host-capability failures.

/// A malformed element description, detected before anything is handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// A host element was created with an empty tag.
    #[error("element kind is empty")]
    EmptyKind,
    /// A host element tag contains characters no host can name a node with.
    #[error("invalid element kind `{kind}`")]
    InvalidKind { kind: String },
    /// A property name rejected by [`PropertyPolicy::Strict`](crate::config::PropertyPolicy::Strict).
    #[error("invalid property name `{name}` on `{kind}`")]
    InvalidPropertyName { kind: String, name: String },
    /// A text element carries children; text leaves hold only a `nodeValue`.
    #[error("text element has {count} children")]
    TextWithChildren { count: usize },
}

/// A failure reported by the host document capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The node handle does not belong to this document (or was removed).
    #[error("unknown node")]
    UnknownNode,
    /// The host refused to create a node of this kind.
    #[error("host rejected node `{kind}`: {reason}")]
    RejectedNode { kind: String, reason: String },
    /// The host refused a property assignment.
    #[error("host rejected property `{name}`: {reason}")]
    RejectedProperty { name: String, reason: String },
    /// Appending would make a node its own ancestor.
    #[error("append would create a cycle")]
    CycleDetected,
    /// The parent cannot hold children (text nodes).
    #[error("node cannot contain children")]
    NotAContainer,
}

/// Everything that can stop a render.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),
    #[error("host error: {0}")]
    Host(#[from] HostError),
    /// A render was requested while another is still working.
    #[error("a render is already in progress")]
    RenderInProgress,
}

impl RenderError {
    /// Whether the element tree itself was malformed.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// Whether the host document refused an operation.
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}
