//! # jsongrid
//!
//! The projection engine behind a JSON inspection tool: one in-memory parsed
//! document rendered three ways, with per-node view state that survives
//! edits.
//!
//! The crate covers the logic that remains when the visual layer is stripped
//! away:
//!
//! - Parsing and validating JSON text, with pretty/compact serialization
//!   that round-trips member order
//! - Computing foldable regions from the raw text lines, independent of a
//!   full parse, tolerant of malformed input
//! - Projecting a value tree into a nested grid: objects as key/value rows,
//!   arrays of objects as filterable tables, mixed arrays as indexed lists
//! - Projecting a value tree into a positioned node/edge graph with stable
//!   ids
//! - Keeping expansion, column filters and column widths keyed by structural
//!   path so they stay put while the document changes underneath
//!
//! ## Command-Line Tool
//!
//! This crate includes the `jgrid` CLI for inspecting JSON from the
//! terminal:
//!
//! ```sh
//! # Pretty-print a file
//! jgrid input.json
//!
//! # Minify
//! jgrid --compact < input.json
//!
//! # Show foldable regions or graph shape
//! jgrid --folds input.json
//! jgrid --graph input.json
//! ```
//!
//! Run `jgrid --help` for all options.
//!
//! ## Quick Start
//!
//! ```rust
//! use jsongrid::Viewer;
//!
//! let mut viewer = Viewer::with_text(r#"{"name":"Alice","scores":[95,87,92]}"#);
//! assert!(viewer.document().is_valid());
//!
//! viewer.beautify();
//! let grid = viewer.grid().unwrap();
//! let (nodes, edges) = viewer.graph().unwrap();
//! assert_eq!(nodes.len(), edges.len() + 1);
//! ```
//!
//! ## View state
//!
//! Expansion, filters and widths live in a [`StateStore`] keyed by
//! [`NodePath`], not by value identity, so re-parsing the same document
//! leaves the view where the user put it:
//!
//! ```rust
//! use jsongrid::{NodePath, Viewer};
//!
//! let mut viewer = Viewer::with_text(r#"{"rows":[{"name":"a"},{"name":"b"}]}"#);
//! let rows = NodePath::root().key("rows");
//! viewer.store_mut().set_expanded(&rows, true);
//! viewer.store_mut().set_column_filter(&rows, "name", vec!["a".into()]);
//! ```
//!
//! Errors are never fatal: invalid text keeps the last-known-good document
//! available, fold analysis degrades to fewer regions, and fetch or export
//! failures surface as notices on the viewer's event bus.

mod document;
mod error;
mod export;
mod fetch;
mod fold;
mod graph;
mod grid;
mod notify;
mod path;
mod state;
mod value;
mod viewer;

pub use crate::document::{parse, serialize, Document, SerializeMode};
pub use crate::error::{ParseError, ViewerError};
pub use crate::export::{csv_file_name, to_csv, DOCUMENT_FILE_NAME};
pub use crate::fetch::fetch_json_text;
pub use crate::fold::{
    detect_fold_regions, hidden_lines, toggle_region, toggle_top_level, unfold_all, visible_text,
    FoldKind, FoldRegion,
};
pub use crate::graph::{build_graph, GraphEdge, GraphNode, NodeKind};
pub use crate::grid::{
    column_union, distinct_values, is_match, render, render_full_view, Cell, ColumnSpec, GridNode,
    ListEntry, PrimitiveCell, TableRow,
};
pub use crate::notify::{EventBus, Notice, Severity};
pub use crate::path::{NodePath, PathStep};
pub use crate::state::{
    ColumnResize, StateStore, UiState, DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH,
};
pub use crate::value::{canonical_string, display_string, primitive_kind, PrimitiveKind};
pub use crate::viewer::{Viewer, SAMPLE_JSON};
