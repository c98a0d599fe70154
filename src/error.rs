use core::fmt;

use crate::sim::NodeHandle;

/// Failures reported by the scene mutator while building world geometry.
///
/// These signal a defect in the stage asset or a stale handle, never a
/// player error. The session aborts only the operation that hit them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldError {
    StageAssetUnavailable,
    MissingSpawnAnchor { stage: NodeHandle },
    UnknownNode { node: NodeHandle },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageAssetUnavailable => write!(f, "stage asset unavailable"),
            Self::MissingSpawnAnchor { stage } => {
                write!(f, "stage {stage} has no spawn anchor")
            }
            Self::UnknownNode { node } => write!(f, "unknown scene node {node}"),
        }
    }
}

impl std::error::Error for WorldError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsError {
    Io(String),
    Parse(String),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "settings io error: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid setting `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
