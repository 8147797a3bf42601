//! Errors produced while loading a scene. Every variant aborts the load.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Attribute table a face reference points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    Texcoord,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::Texcoord => "texcoord",
            AttributeKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read scene file {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed '{directive}' directive on line {line}: {reason}")]
    MalformedDirective {
        line: usize,
        directive: &'static str,
        reason: String,
    },

    #[error("Malformed face element '{token}' on line {line}")]
    MalformedFace { line: usize, token: String },

    #[error("Face on line {line} has {count} vertices, at least 3 are required")]
    DegenerateFace { line: usize, count: usize },

    #[error("{attribute} index {index} on line {line} is out of range (len={len})")]
    UnresolvedReference {
        line: usize,
        attribute: AttributeKind,
        index: i64,
        len: usize,
    },

    #[error(
        "'{directive}' on line {line} of {} takes 1 or 3 values, got {count}",
        .path.display()
    )]
    MalformedMaterial {
        path: PathBuf,
        line: usize,
        directive: &'static str,
        count: usize,
    },

    #[error("Failed to read material library {}: {source}", .path.display())]
    MaterialFileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("usemtl on line {line} names undeclared material '{name}'")]
    UnknownMaterial { line: usize, name: String },

    #[error("Scene contained no faces")]
    EmptyScene,

    #[error("Too many vertices in scene (>{})", u32::MAX)]
    TooManyVertices,
}

impl LoadError {
    /// 1-based line the error was raised on, if it belongs to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::MalformedDirective { line, .. }
            | LoadError::MalformedFace { line, .. }
            | LoadError::DegenerateFace { line, .. }
            | LoadError::UnresolvedReference { line, .. }
            | LoadError::MalformedMaterial { line, .. }
            | LoadError::UnknownMaterial { line, .. } => Some(*line),
            LoadError::FileNotFound { .. }
            | LoadError::MaterialFileNotFound { .. }
            | LoadError::EmptyScene
            | LoadError::TooManyVertices => None,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_reported_for_line_errors() {
        let err = LoadError::UnknownMaterial {
            line: 7,
            name: "ghost".into(),
        };
        assert_eq!(err.line(), Some(7));
        assert_eq!(LoadError::EmptyScene.line(), None);
    }

    #[test]
    fn messages_name_the_attribute() {
        let err = LoadError::UnresolvedReference {
            line: 3,
            attribute: AttributeKind::Normal,
            index: 5,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "normal index 5 on line 3 is out of range (len=2)"
        );
    }
}
