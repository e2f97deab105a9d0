//! # dd-converter: text exchange for zero-suppressed decision diagrams
//!
//! **`dd-converter`** reads and writes decision diagrams in the line-oriented text format
//! used by set-family toolkits such as Graphillion:
//!
//! ```text
//! 1 1 B T
//! 2 2 1 B
//! .
//! ```
//!
//! Each line is `<id> <level> <lo> <hi>`, where `lo`/`hi` are ids of other lines or the
//! terminals `B` (⊥) and `T` (⊤). The last node line is the root; a `.` line ends the input.
//!
//! ## Two directions
//!
//! - **[`export`]** walks any [`Diagram`] once, numbers its nodes densely in ascending
//!   level order and writes one line per node.
//! - **[`import`]** parses lines into a [`NodeTable`](import::NodeTable), failing fast on the
//!   first malformed line, and exposes it as an [`Oracle`]. The diagram itself is built by
//!   an engine that consumes the oracle.
//!
//! Both directions talk to the engine only through the traits in [`oracle`], so any engine
//! can be plugged in. The crate ships a small one, [`Zdd`](zdd::Zdd).
//!
//! ## Basic Usage
//!
//! ```rust
//! use dd_converter::zdd::Zdd;
//!
//! let zdd = Zdd::new();
//!
//! // Parse: root is node 2 at level 2.
//! let f = zdd.from_text("1 1 B T\n2 2 1 B\n.\n").unwrap();
//! assert_eq!(zdd.level(f), 2);
//!
//! // Export: ids are reassigned, structure is preserved.
//! let text = zdd.to_text(f);
//! assert_eq!(text, "1 1 B T\n2 2 1 B\n.\n");
//!
//! // Round trip in the same manager gives the very same node.
//! assert_eq!(zdd.from_text(&text).unwrap(), f);
//! ```
//!
//! Malformed input is reported with its line number:
//!
//! ```rust
//! use dd_converter::zdd::Zdd;
//!
//! let zdd = Zdd::new();
//! let err = zdd.from_text("1 2 B\n.\n").unwrap_err();
//! assert_eq!(err.line(), Some(1));
//! ```

pub mod error;
pub mod export;
pub mod import;
pub mod node;
pub mod oracle;
pub mod reference;
pub mod types;
pub mod zdd;

pub use error::{Error, Result};
pub use oracle::{Diagram, Oracle, Step};
pub use types::{Branch, Edge};
