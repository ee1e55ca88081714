use std::collections::HashMap;

use serde_json::Value;

use crate::path::NodePath;
use crate::value;

pub const DEFAULT_COLUMN_WIDTH: u32 = 200;
pub const MIN_COLUMN_WIDTH: u32 = 100;

/// Per-path view state, created lazily on first touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub expanded: bool,
    /// Column name to allowed canonical values. An empty allow-list means no
    /// filter (show all), never "show none".
    pub column_filters: HashMap<String, Vec<String>>,
}

/// View state keyed by structural path, surviving re-renders of the same
/// document.
///
/// Column widths are keyed by column *name*, not by path: resizing a column
/// affects every occurrence of that name within this store's grid context.
/// The store is scoped to one viewer instance, so width sharing never leaks
/// across viewers.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    states: HashMap<NodePath, UiState>,
    column_widths: HashMap<String, u32>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state at `path`, created with defaults if absent.
    pub fn state_mut(&mut self, path: &NodePath) -> &mut UiState {
        self.states.entry(path.clone()).or_default()
    }

    pub fn get(&self, path: &NodePath) -> Option<&UiState> {
        self.states.get(path)
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.states.get(path).map(|s| s.expanded).unwrap_or(false)
    }

    pub fn set_expanded(&mut self, path: &NodePath, expanded: bool) {
        self.state_mut(path).expanded = expanded;
    }

    pub fn toggle_expanded(&mut self, path: &NodePath) {
        let state = self.state_mut(path);
        state.expanded = !state.expanded;
    }

    pub fn set_column_filter(&mut self, path: &NodePath, column: &str, values: Vec<String>) {
        self.state_mut(path)
            .column_filters
            .insert(column.to_string(), values);
    }

    pub fn clear_column_filter(&mut self, path: &NodePath, column: &str) {
        if let Some(state) = self.states.get_mut(path) {
            state.column_filters.remove(column);
        }
    }

    pub fn filters(&self, path: &NodePath) -> Option<&HashMap<String, Vec<String>>> {
        self.states.get(path).map(|s| &s.column_filters)
    }

    pub fn column_width(&self, column: &str) -> u32 {
        self.column_widths
            .get(column)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    pub fn set_column_width(&mut self, column: &str, width: u32) {
        self.column_widths.insert(column.to_string(), width);
    }

    /// Marks every composite path reachable from `root` as expanded.
    pub fn expand_all(&mut self, root: &Value) {
        self.expand_from(root, &NodePath::root());
    }

    fn expand_from(&mut self, value: &Value, path: &NodePath) {
        if !value::is_composite(value) {
            return;
        }
        self.state_mut(path).expanded = true;
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.expand_from(child, &path.key(key));
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.expand_from(child, &path.index(index));
                }
            }
            _ => unreachable!(),
        }
    }

    /// Clears all expansion state. Filters are untouched.
    pub fn collapse_all(&mut self) {
        for state in self.states.values_mut() {
            state.expanded = false;
        }
    }

    /// Drops entries whose path no longer resolves to a composite value.
    ///
    /// Run after a successful re-parse: a path reborn in a different shape
    /// (say, a key that now holds a primitive) must not resurrect old filter
    /// state.
    pub fn prune(&mut self, root: &Value) {
        self.states.retain(|path, _| {
            path.resolve(root)
                .map(value::is_composite)
                .unwrap_or(false)
        });
    }
}

/// An in-flight column resize drag.
///
/// `begin` captures the column's width and the pointer x at drag start; each
/// move computes `max(MIN_COLUMN_WIDTH, start_width + (x - start_x))`;
/// `finish` commits the final width and consumes the drag.
#[derive(Debug, Clone)]
pub struct ColumnResize {
    column: String,
    start_x: i64,
    start_width: u32,
}

impl ColumnResize {
    pub fn begin(store: &StateStore, column: &str, pointer_x: i64) -> Self {
        Self {
            column: column.to_string(),
            start_x: pointer_x,
            start_width: store.column_width(column),
        }
    }

    pub fn width_at(&self, pointer_x: i64) -> u32 {
        let proposed = i64::from(self.start_width) + (pointer_x - self.start_x);
        proposed.max(i64::from(MIN_COLUMN_WIDTH)) as u32
    }

    /// Drag move: applies the transient width.
    pub fn update(&self, store: &mut StateStore, pointer_x: i64) {
        store.set_column_width(&self.column, self.width_at(pointer_x));
    }

    /// Drag end: commits the final width.
    pub fn finish(self, store: &mut StateStore, pointer_x: i64) {
        store.set_column_width(&self.column, self.width_at(pointer_x));
    }
}
