//! Error type for import, export and construction.
use std::fmt;
use std::io;

use crate::types::Branch;

/// Field of a node line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Field {
    Id,
    Level,
    Lo,
    Hi,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Id => "id",
            Field::Level => "level",
            Field::Lo => "lo",
            Field::Hi => "hi",
        };
        write!(f, "{}", name)
    }
}

/// What exactly is wrong with a node line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormatErrorKind {
    /// The line has fewer than four fields.
    MissingField(Field),
    /// A field is not a valid number (or terminal marker, for `lo`/`hi`).
    InvalidField { field: Field, token: String },
    /// The id was already defined on an earlier line (strict mode).
    DuplicateId(i64),
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::MissingField(field) => write!(f, "missing field `{}`", field),
            FormatErrorKind::InvalidField { field, token } => {
                write!(f, "invalid `{}` field {:?}", field, token)
            }
            FormatErrorKind::DuplicateId(id) => write!(f, "duplicate node id {}", id),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// Reading the input or writing the output failed.
    Io(io::Error),
    /// Malformed node line (1-based line number).
    Format { line: usize, kind: FormatErrorKind },
    /// A child reference names an id that no node line defines.
    MissingReference { parent: i64, branch: Branch, id: i64 },
    /// The oracle was asked about a node that is not in the table.
    UnknownNode { id: i64 },
    /// The input ended without a `.` line (strict mode).
    MissingTerminator,
    /// The root node is referenced as a child of another node (strict mode).
    RootReferenced { id: i64 },
    /// A child is not strictly below its parent.
    LevelOrder { parent_level: u32, child_level: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(line: usize, kind: FormatErrorKind) -> Self {
        Error::Format { line, kind }
    }

    /// Offending input line, for errors detected while reading lines.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Format { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Format { line, kind } => write!(f, "format error at line {}: {}", line, kind),
            Error::MissingReference { parent, branch, id } => {
                write!(f, "node {} refers to undefined node {} on its {} branch", parent, id, branch)
            }
            Error::UnknownNode { id } => write!(f, "undefined node {} queried", id),
            Error::MissingTerminator => write!(f, "format error: missing terminator line `.`"),
            Error::RootReferenced { id } => write!(f, "root node {} is referenced as a child", id),
            Error::LevelOrder {
                parent_level,
                child_level,
            } => write!(
                f,
                "child at level {} is not below its parent at level {}",
                child_level, parent_level
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_format_display() {
        let e = Error::format(3, FormatErrorKind::MissingField(Field::Hi));
        assert_eq!(e.to_string(), "format error at line 3: missing field `hi`");
        assert_eq!(e.line(), Some(3));
    }

    #[test]
    fn test_display_is_single_line() {
        let errors = [
            Error::format(
                1,
                FormatErrorKind::InvalidField {
                    field: Field::Lo,
                    token: "X".to_string(),
                },
            ),
            Error::MissingReference {
                parent: 2,
                branch: Branch::Lo,
                id: 9,
            },
            Error::UnknownNode { id: 5 },
            Error::MissingTerminator,
            Error::RootReferenced { id: 4 },
            Error::LevelOrder {
                parent_level: 1,
                child_level: 1,
            },
        ];
        for e in errors {
            assert!(!e.to_string().contains('\n'), "{}", e);
        }
    }

    #[test]
    fn test_io_source() {
        use std::error::Error as _;
        let e = Error::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(e.source().is_some());
        assert_eq!(e.line(), None);
    }
}
