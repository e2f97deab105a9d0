//! Text to diagram.
//!
//! # Format
//!
//! ```text
//! <id> <level> <lo> <hi>    # one line per node
//! .                         # terminator
//! ```
//!
//! `lo`/`hi` are either the id of another node line or a terminal marker: `B` (⊥) or
//! `T` (⊤). There is no header; the largest `level` is the number of variables.
//! The **last** node line is taken as the root, so files are expected to list nodes
//! bottom-up.
//!
//! Parsing fills a [`NodeTable`] and stops at the first malformed line. The table is
//! then handed to an engine as an [`Oracle`]; the engine does all node sharing, and
//! dangling references surface only at that point, as [`Error::MissingReference`].
//!
//! ```
//! use dd_converter::zdd::Zdd;
//!
//! let zdd = Zdd::new();
//! let f = zdd.from_text("1 1 B T\n2 2 1 B\n.\n").unwrap();
//! assert_eq!(zdd.level(f), 2);
//! assert_eq!(zdd.high(f), zdd.zero());
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};

use crate::error::{Error, Field, FormatErrorKind, Result};
use crate::oracle::{Oracle, Step};
use crate::reference::Ref;
use crate::types::Branch;
use crate::zdd::Zdd;

// Child encodings for the terminals inside the table.
const BOTTOM: i64 = -1;
const TOP: i64 = -2;

/// Configuration for reading the text format.
///
/// The default is lenient and accepts everything the format ever accepted:
/// a missing terminator, duplicate ids (the later line wins), extra fields after `hi`.
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    /// Additionally reject duplicate ids, a missing terminator, dangling references,
    /// a root that is some node's child, and children not strictly below their parent.
    pub strict: bool,
}

impl ImportConfig {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Record {
    level: u32,
    lo: i64,
    hi: i64,
}

/// Parsed node lines, keyed by their source id.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    records: HashMap<i64, Record>,
    root: Option<i64>,
    max_level: u32,
}

impl NodeTable {
    /// Reads node lines until the terminator or the end of input.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        Self::parse_with(reader, &ImportConfig::default())
    }

    pub fn parse_with<R: BufRead>(reader: R, config: &ImportConfig) -> Result<Self> {
        let mut table = NodeTable::default();
        let mut terminated = false;

        // Raw bytes: a non-UTF-8 byte is a format error on its line, not an I/O error.
        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            if line.first() == Some(&b'.') {
                terminated = true;
                break;
            }
            let line_number = index + 1;

            let (id, record) = parse_line(&line).map_err(|kind| Error::format(line_number, kind))?;
            if config.strict && table.records.contains_key(&id) {
                return Err(Error::format(line_number, FormatErrorKind::DuplicateId(id)));
            }
            debug!("line {}: node {} = {:?}", line_number, id, record);

            table.max_level = table.max_level.max(record.level);
            table.records.insert(id, record);
            table.root = Some(id);
        }

        if config.strict {
            if !terminated {
                return Err(Error::MissingTerminator);
            }
            table.validate()?;
        }

        info!(
            "Parsed {} nodes, root = {:?}, max level = {}",
            table.records.len(),
            table.root,
            table.max_level
        );
        Ok(table)
    }

    /// Number of distinct node ids.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id of the last node line, if any.
    pub fn root_id(&self) -> Option<i64> {
        self.root
    }

    /// Largest level over all node lines.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Structural checks that the lenient reader skips.
    ///
    /// Nodes are checked in ascending id order, so the reported error is deterministic.
    pub fn validate(&self) -> Result<()> {
        let mut ids: Vec<i64> = self.records.keys().copied().collect();
        ids.sort_unstable();

        for parent in ids {
            let record = self.records[&parent];
            for branch in Branch::ALL {
                let id = record.child(branch);
                if id < 0 {
                    continue;
                }
                let child = self
                    .records
                    .get(&id)
                    .ok_or(Error::MissingReference { parent, branch, id })?;
                if Some(id) == self.root {
                    return Err(Error::RootReferenced { id });
                }
                if child.level >= record.level {
                    return Err(Error::LevelOrder {
                        parent_level: record.level,
                        child_level: child.level,
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromStr for NodeTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NodeTable::parse(s.as_bytes())
    }
}

impl Record {
    fn child(&self, branch: Branch) -> i64 {
        match branch {
            Branch::Lo => self.lo,
            Branch::Hi => self.hi,
        }
    }
}

impl Oracle for NodeTable {
    type State = i64;

    /// The last parsed node, placed at the maximum level.
    fn root(&self) -> Step<i64> {
        match self.root {
            Some(id) if self.max_level > 0 => Step::Node(id, self.max_level),
            _ => Step::Bottom,
        }
    }

    fn child(&self, state: &i64, _level: u32, branch: Branch) -> Result<Step<i64>> {
        let record = self.records.get(state).ok_or(Error::UnknownNode { id: *state })?;
        match record.child(branch) {
            BOTTOM => Ok(Step::Bottom),
            TOP => Ok(Step::Top),
            id => {
                let child = self.records.get(&id).ok_or(Error::MissingReference {
                    parent: *state,
                    branch,
                    id,
                })?;
                if child.level == 0 {
                    Ok(Step::Bottom)
                } else {
                    Ok(Step::Node(id, child.level))
                }
            }
        }
    }
}

/// Splits a node line into its id and record.
///
/// Only ASCII whitespace separates fields; any other byte ends up inside a token.
fn parse_line(line: &[u8]) -> std::result::Result<(i64, Record), FormatErrorKind> {
    let mut fields = line.split(u8::is_ascii_whitespace).filter(|token| !token.is_empty());
    let mut next = |field: Field| fields.next().ok_or(FormatErrorKind::MissingField(field));

    let id = parse_number(next(Field::Id)?, Field::Id)?;
    let level = parse_number(next(Field::Level)?, Field::Level)?;
    let lo = parse_child(next(Field::Lo)?, Field::Lo)?;
    let hi = parse_child(next(Field::Hi)?, Field::Hi)?;

    Ok((id, Record { level, lo, hi }))
}

/// Non-negative integer made of ASCII digits only.
fn parse_number<T: FromStr>(token: &[u8], field: Field) -> std::result::Result<T, FormatErrorKind> {
    let invalid = || FormatErrorKind::InvalidField {
        field,
        token: String::from_utf8_lossy(token).into_owned(),
    };
    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    // Only overflow can fail here.
    std::str::from_utf8(token)
        .ok()
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(invalid)
}

fn parse_child(token: &[u8], field: Field) -> std::result::Result<i64, FormatErrorKind> {
    match token {
        b"B" => Ok(BOTTOM),
        b"T" => Ok(TOP),
        _ => parse_number(token, field),
    }
}

impl Zdd {
    /// Reads a diagram in the text format and builds it in this manager.
    pub fn read_text<R: BufRead>(&self, reader: R) -> Result<Ref> {
        self.read_text_with(reader, &ImportConfig::default())
    }

    pub fn read_text_with<R: BufRead>(&self, reader: R, config: &ImportConfig) -> Result<Ref> {
        let table = NodeTable::parse_with(reader, config)?;
        self.build(&table)
    }

    /// Parses a diagram from a string in the text format.
    pub fn from_text(&self, content: &str) -> Result<Ref> {
        self.read_text(content.as_bytes())
    }

    /// Loads a diagram from a file in the text format.
    pub fn load_text<P: AsRef<Path>>(&self, path: P) -> Result<Ref> {
        let file = File::open(path)?;
        self.read_text(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn parse(s: &str) -> Result<NodeTable> {
        s.parse()
    }

    fn parse_strict(s: &str) -> Result<NodeTable> {
        NodeTable::parse_with(s.as_bytes(), &ImportConfig::strict())
    }

    fn assert_format_error(res: Result<NodeTable>, line: usize, kind: FormatErrorKind) {
        match res {
            Err(Error::Format { line: l, kind: k }) => {
                assert_eq!(l, line);
                assert_eq!(k, kind);
            }
            other => panic!("expected format error at line {}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_parse_example() {
        let table = parse("1 1 B T\n2 2 1 B\n.\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.root_id(), Some(2));
        assert_eq!(table.max_level(), 2);

        assert_eq!(table.root(), Step::Node(2, 2));
        assert_eq!(table.child(&2, 2, Branch::Lo).unwrap(), Step::Node(1, 1));
        assert_eq!(table.child(&2, 2, Branch::Hi).unwrap(), Step::Bottom);
        assert_eq!(table.child(&1, 1, Branch::Lo).unwrap(), Step::Bottom);
        assert_eq!(table.child(&1, 1, Branch::Hi).unwrap(), Step::Top);
    }

    #[test]
    fn test_missing_hi_field() {
        assert_format_error(parse("1 2 B\n.\n"), 1, FormatErrorKind::MissingField(Field::Hi));
    }

    #[test]
    fn test_empty_line_is_error() {
        assert_format_error(parse("1 1 B T\n\n.\n"), 2, FormatErrorKind::MissingField(Field::Id));
    }

    #[test]
    fn test_stops_at_first_error() {
        let res = parse("1 1 B T\n2 1 T B\n3 x 1 2\n4 2 B\n.\n");
        assert_format_error(
            res,
            3,
            FormatErrorKind::InvalidField {
                field: Field::Level,
                token: "x".to_string(),
            },
        );
    }

    #[test]
    fn test_invalid_tokens() {
        let cases = [
            ("-1 1 B T", Field::Id, "-1"),
            ("1a 1 B T", Field::Id, "1a"),
            ("1 +1 B T", Field::Level, "+1"),
            ("1 1 b T", Field::Lo, "b"),
            ("1 1 B TT", Field::Hi, "TT"),
            ("1 1 B 1.5", Field::Hi, "1.5"),
            ("99999999999999999999 1 B T", Field::Id, "99999999999999999999"),
            ("1 4294967296 B T", Field::Level, "4294967296"),
        ];
        for (line, field, token) in cases {
            assert_format_error(
                parse(line),
                1,
                FormatErrorKind::InvalidField {
                    field,
                    token: token.to_string(),
                },
            );
        }
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let res = NodeTable::parse(&b"1 1 B T\n2 2 1 \xff\n.\n"[..]);
        assert_format_error(
            res,
            2,
            FormatErrorKind::InvalidField {
                field: Field::Hi,
                token: "\u{fffd}".to_string(),
            },
        );

        let zdd = Zdd::default();
        let err = zdd.read_text(&b"1 1 B T\n2 2 1 \xff\n.\n"[..]).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_unicode_space_is_not_separator() {
        assert_format_error(
            parse("1\u{a0}1 B T\n.\n"),
            1,
            FormatErrorKind::InvalidField {
                field: Field::Id,
                token: "1\u{a0}1".to_string(),
            },
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = parse("1 1 B T\r\n2 2 1 B\r\n.\r\n").unwrap();
        assert_eq!(table.root(), Step::Node(2, 2));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let table = parse("  1\t 1   B  T  \n2 2 1 1 extra\n.").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.child(&2, 2, Branch::Hi).unwrap(), Step::Node(1, 1));
    }

    #[test]
    fn test_terminator_stops_reading() {
        let table = parse("1 1 B T\n.\ngarbage\n").unwrap();
        assert_eq!(table.len(), 1);

        // Any line starting with a period terminates.
        let table = parse("1 1 B T\n.end\n2 2 1 B\n").unwrap();
        assert_eq!(table.root_id(), Some(1));
    }

    #[test]
    fn test_missing_terminator_lenient() {
        let table = parse("1 1 B T\n2 2 1 B").unwrap();
        assert_eq!(table.root_id(), Some(2));
    }

    #[test]
    fn test_last_line_is_root() {
        // Root listed first: the last line still wins.
        let table = parse("2 2 1 B\n1 1 B T\n.\n").unwrap();
        assert_eq!(table.root_id(), Some(1));
        assert_eq!(table.root(), Step::Node(1, 2));
    }

    #[test]
    fn test_duplicate_id_overwrites() {
        let table = parse("1 1 B T\n1 1 T T\n.\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.child(&1, 1, Branch::Lo).unwrap(), Step::Top);
    }

    #[test]
    fn test_empty_input() {
        let table = parse(".\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.root(), Step::Bottom);

        let table = parse("").unwrap();
        assert_eq!(table.root(), Step::Bottom);
    }

    #[test]
    fn test_level_zero() {
        let table = parse("1 0 B T\n.\n").unwrap();
        assert_eq!(table.root(), Step::Bottom);

        let table = parse("1 0 B T\n2 1 1 T\n.\n").unwrap();
        assert_eq!(table.child(&2, 1, Branch::Lo).unwrap(), Step::Bottom);
    }

    #[test]
    fn test_missing_reference() {
        let table = parse("2 2 7 T\n.\n").unwrap();
        let err = table.child(&2, 2, Branch::Lo).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingReference {
                parent: 2,
                branch: Branch::Lo,
                id: 7
            }
        ));
        assert!(matches!(table.child(&9, 1, Branch::Hi), Err(Error::UnknownNode { id: 9 })));
    }

    #[test]
    fn test_strict_accepts_well_formed() {
        let table = parse_strict("1 1 B T\n2 2 1 B\n.\n").unwrap();
        assert_eq!(table.root_id(), Some(2));
    }

    #[test]
    fn test_strict_rejects() {
        assert_format_error(
            parse_strict("1 1 B T\n1 1 T T\n.\n"),
            2,
            FormatErrorKind::DuplicateId(1),
        );
        assert!(matches!(parse_strict("1 1 B T\n"), Err(Error::MissingTerminator)));
        assert!(matches!(
            parse_strict("2 2 7 T\n.\n"),
            Err(Error::MissingReference { parent: 2, id: 7, .. })
        ));
        assert!(matches!(
            parse_strict("2 2 1 B\n1 1 B T\n.\n"),
            Err(Error::RootReferenced { id: 1 })
        ));
        assert!(matches!(
            parse_strict("1 2 B T\n2 2 1 B\n.\n"),
            Err(Error::LevelOrder {
                parent_level: 2,
                child_level: 2
            })
        ));
    }

    #[test]
    fn test_build_example() {
        let zdd = Zdd::default();
        let f = zdd.from_text("1 1 B T\n2 2 1 B\n.\n").unwrap();
        assert_eq!(zdd.size(f), 2);
        assert_eq!(zdd.level(f), 2);
        assert_eq!(zdd.high(f), zdd.zero());

        let g = zdd.low(f);
        assert_eq!(zdd.level(g), 1);
        assert_eq!(zdd.low(g), zdd.zero());
        assert_eq!(zdd.high(g), zdd.one());
    }

    #[test]
    fn test_build_missing_reference() {
        let zdd = Zdd::default();
        let err = zdd.from_text("1 1 B T\n2 2 1 5\n.\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingReference {
                parent: 2,
                branch: Branch::Hi,
                id: 5
            }
        ));
    }

    #[test]
    fn test_build_root_below_max_level() {
        // Root recorded at level 1, but another line raises the maximum to 3.
        let zdd = Zdd::default();
        let f = zdd.from_text("5 3 B T\n1 1 B T\n.\n").unwrap();
        assert_eq!(zdd.level(f), 3);
        assert_eq!(zdd.size(f), 1);
    }
}
