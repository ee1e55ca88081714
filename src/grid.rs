use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::path::NodePath;
use crate::state::StateStore;
use crate::value::{self, PrimitiveKind};

/// Case-insensitive substring match of `term` against the value's canonical
/// string form (composites stringify to compact JSON first). An empty term
/// never matches.
pub fn is_match(value: &Value, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    value::canonical_string(value)
        .to_lowercase()
        .contains(&term.to_lowercase())
}

/// `is_match` for an already-borrowed composite, without rebuilding a
/// `Value` around it.
fn matches_serialized<T: serde::Serialize>(value: &T, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    serde_json::to_string(value)
        .map(|s| s.to_lowercase().contains(&term.to_lowercase()))
        .unwrap_or(false)
}

/// A rendered primitive: display text (strings quoted), type tag for
/// styling, and whether the active search term matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimitiveCell {
    pub text: String,
    pub kind: PrimitiveKind,
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub width: u32,
}

/// One cell of a homogeneous-array table.
#[derive(Debug, Clone, Serialize)]
pub enum Cell {
    /// The row's object has no member under this column.
    Missing,
    Primitive(PrimitiveCell),
    Nested(GridNode),
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    /// Position within the filtered row list, the index shown in the `#`
    /// column. Identity shifts as filters change.
    pub index: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub index: usize,
    pub node: GridNode,
}

/// The abstract output of the grid projection. Turning these into actual
/// widgets is the host's job.
#[derive(Debug, Clone, Serialize)]
pub enum GridNode {
    /// A lone primitive, optionally labeled with its member key.
    Primitive {
        key: Option<String>,
        cell: PrimitiveCell,
    },
    /// An object body rendered as member rows without a header: the document
    /// root and composite table cells.
    Members { members: Vec<GridNode> },
    /// An object with a header (key, member count, expand control).
    Object {
        key: String,
        path: String,
        member_count: usize,
        matched: bool,
        expanded: bool,
        members: Vec<GridNode>,
    },
    /// An empty array: header and "Empty" badge only, no expand control.
    EmptyArray { key: String },
    /// A homogeneous object-array rendered as a table. `rows` is populated
    /// only while expanded; `no_results` marks a fully filtered-out row set.
    Table {
        key: String,
        path: String,
        len: usize,
        matched: bool,
        expanded: bool,
        filtered: bool,
        columns: Vec<ColumnSpec>,
        rows: Vec<TableRow>,
        no_results: bool,
    },
    /// A mixed or array-of-arrays array rendered as an indexed list.
    List {
        key: String,
        path: String,
        len: usize,
        matched: bool,
        expanded: bool,
        entries: Vec<ListEntry>,
    },
}

struct RenderCtx<'a> {
    search: &'a str,
    store: &'a StateStore,
    force_expanded: bool,
}

/// Projects a value tree into a render tree, consulting the store for
/// expansion, filters and column widths.
pub fn render(value: &Value, path: &NodePath, search: &str, store: &StateStore) -> GridNode {
    let ctx = RenderCtx {
        search,
        store,
        force_expanded: false,
    };
    render_root(value, path, &ctx)
}

/// The isolated full view: renders `value` with every composite expanded,
/// independent of stored expansion state. Filters and widths still apply.
pub fn render_full_view(
    value: &Value,
    path: &NodePath,
    search: &str,
    store: &StateStore,
) -> GridNode {
    let ctx = RenderCtx {
        search,
        store,
        force_expanded: true,
    };
    render_root(value, path, &ctx)
}

fn render_root(value: &Value, path: &NodePath, ctx: &RenderCtx<'_>) -> GridNode {
    match value {
        Value::Array(items) => {
            let key = if path.is_root() {
                "root".to_string()
            } else {
                path.to_string()
            };
            render_array(items, key, path, ctx)
        }
        Value::Object(map) => render_members(map, path, ctx),
        primitive => GridNode::Primitive {
            key: None,
            cell: primitive_cell(primitive, ctx),
        },
    }
}

fn render_members(map: &Map<String, Value>, path: &NodePath, ctx: &RenderCtx<'_>) -> GridNode {
    let members = map
        .iter()
        .map(|(key, child)| render_value(child, key, path, ctx))
        .collect();
    GridNode::Members { members }
}

/// Dispatch for one keyed value: primitives inline, composites to their
/// array/object branch.
fn render_value(value: &Value, key: &str, parent: &NodePath, ctx: &RenderCtx<'_>) -> GridNode {
    match value {
        Value::Array(items) => render_array(items, key.to_string(), &parent.key(key), ctx),
        Value::Object(map) => render_object(map, key.to_string(), &parent.key(key), ctx),
        primitive => GridNode::Primitive {
            key: Some(key.to_string()),
            cell: primitive_cell(primitive, ctx),
        },
    }
}

fn render_object(
    map: &Map<String, Value>,
    key: String,
    path: &NodePath,
    ctx: &RenderCtx<'_>,
) -> GridNode {
    let matched = matches_serialized(map, ctx.search);
    let expanded = ctx.force_expanded || ctx.store.is_expanded(path);
    let members = if expanded {
        map.iter()
            .map(|(k, child)| render_value(child, k, path, ctx))
            .collect()
    } else {
        Vec::new()
    };
    GridNode::Object {
        key,
        path: path.to_string(),
        member_count: map.len(),
        matched,
        expanded,
        members,
    }
}

fn render_array(items: &[Value], key: String, path: &NodePath, ctx: &RenderCtx<'_>) -> GridNode {
    if items.is_empty() {
        return GridNode::EmptyArray { key };
    }

    let all_objects = items.iter().all(|item| item.is_object());
    if all_objects {
        render_table(items, key, path, ctx)
    } else {
        render_list(items, key, path, ctx)
    }
}

fn render_table(items: &[Value], key: String, path: &NodePath, ctx: &RenderCtx<'_>) -> GridNode {
    let matched = matches_serialized(&items, ctx.search);
    let expanded = ctx.force_expanded || ctx.store.is_expanded(path);

    let column_names = column_union(items);
    let columns = column_names
        .iter()
        .map(|name| ColumnSpec {
            name: name.clone(),
            width: ctx.store.column_width(name),
        })
        .collect();

    let empty = HashMap::new();
    let filters = ctx.store.filters(path).unwrap_or(&empty);
    let filtered: Vec<&Map<String, Value>> = items
        .iter()
        .filter_map(|item| item.as_object())
        .filter(|item| row_passes(item, filters))
        .collect();
    let no_results = filtered.is_empty();

    let rows = if expanded {
        filtered
            .iter()
            .enumerate()
            .map(|(index, item)| TableRow {
                index,
                cells: column_names
                    .iter()
                    .map(|column| render_cell(item, column, index, path, ctx))
                    .collect(),
            })
            .collect()
    } else {
        Vec::new()
    };

    GridNode::Table {
        key,
        path: path.to_string(),
        len: items.len(),
        matched,
        expanded,
        filtered: !filters.is_empty(),
        columns,
        rows,
        no_results,
    }
}

fn render_cell(
    item: &Map<String, Value>,
    column: &str,
    row_index: usize,
    table_path: &NodePath,
    ctx: &RenderCtx<'_>,
) -> Cell {
    match item.get(column) {
        None => Cell::Missing,
        Some(v) if value::is_composite(v) => {
            let cell_path = table_path.index(row_index).key(column);
            Cell::Nested(render_nested(v, &cell_path, ctx))
        }
        Some(primitive) => Cell::Primitive(primitive_cell(primitive, ctx)),
    }
}

/// A composite hosted inside a table cell or list entry. Objects render
/// headerless; arrays render with the full path as their header label.
fn render_nested(value: &Value, path: &NodePath, ctx: &RenderCtx<'_>) -> GridNode {
    match value {
        Value::Object(map) => render_members(map, path, ctx),
        Value::Array(items) => render_array(items, path.to_string(), path, ctx),
        primitive => GridNode::Primitive {
            key: None,
            cell: primitive_cell(primitive, ctx),
        },
    }
}

fn render_list(items: &[Value], key: String, path: &NodePath, ctx: &RenderCtx<'_>) -> GridNode {
    let matched = matches_serialized(&items, ctx.search);
    let expanded = ctx.force_expanded || ctx.store.is_expanded(path);
    let entries = if expanded {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| ListEntry {
                index,
                node: if value::is_composite(item) {
                    render_nested(item, &path.index(index), ctx)
                } else {
                    GridNode::Primitive {
                        key: None,
                        cell: primitive_cell(item, ctx),
                    }
                },
            })
            .collect()
    } else {
        Vec::new()
    };
    GridNode::List {
        key,
        path: path.to_string(),
        len: items.len(),
        matched,
        expanded,
        entries,
    }
}

fn primitive_cell(value: &Value, ctx: &RenderCtx<'_>) -> PrimitiveCell {
    PrimitiveCell {
        text: value::display_string(value),
        kind: value::primitive_kind(value).unwrap_or(PrimitiveKind::Null),
        matched: is_match(value, ctx.search),
    }
}

/// The union of member keys across all rows, in first-seen order.
pub fn column_union(items: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for item in items {
        if let Some(map) = item.as_object() {
            for key in map.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

/// Distinct canonical values under one column, in first-seen order, for
/// populating a filter dialog. Rows without the column contribute nothing.
pub fn distinct_values(items: &[Value], column: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        let Some(v) = item.as_object().and_then(|m| m.get(column)) else {
            continue;
        };
        let canonical = value::canonical_string(v);
        if !seen.iter().any(|s| s == &canonical) {
            seen.push(canonical);
        }
    }
    seen
}

fn row_passes(item: &Map<String, Value>, filters: &HashMap<String, Vec<String>>) -> bool {
    filters.iter().all(|(column, allowed)| {
        if allowed.is_empty() {
            return true;
        }
        match item.get(column) {
            None => false,
            Some(v) => {
                let canonical = value::canonical_string(v);
                allowed.iter().any(|a| *a == canonical)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expanded_store(doc: &Value) -> StateStore {
        let mut store = StateStore::new();
        store.expand_all(doc);
        store
    }

    #[test]
    fn search_matching() {
        assert!(is_match(&json!("hello world"), "WORLD"));
        assert!(is_match(&json!({"a": 1}), "a"));
        assert!(is_match(&json!(12.5), "2.5"));
        assert!(!is_match(&json!("hello"), "bye"));
        assert!(!is_match(&json!("anything"), ""));
    }

    #[test]
    fn table_columns_are_first_seen_union() {
        let doc = json!([{"a": 1, "b": 2}, {"b": 3, "c": 4}]);
        let store = expanded_store(&doc);
        let node = render(&doc, &NodePath::root(), "", &store);

        let GridNode::Table { columns, rows, .. } = node else {
            panic!("expected a table");
        };
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        // Row 0 has no "c" member: an explicit placeholder, not a blank cell.
        assert!(matches!(rows[0].cells[2], Cell::Missing));
        assert!(matches!(rows[1].cells[0], Cell::Missing));
        assert!(matches!(rows[0].cells[0], Cell::Primitive(_)));
    }

    #[test]
    fn filters_select_rows_and_clear_restores_them() {
        let doc = json!({"rows": [{"name": "Apple"}, {"name": "Pear"}]});
        let rows_path = NodePath::root().key("rows");
        let mut store = expanded_store(&doc);

        let render_rows = |store: &StateStore| {
            let node = render(&doc, &NodePath::root(), "", store);
            let GridNode::Members { members } = node else {
                panic!("expected member rows");
            };
            let GridNode::Table { rows, no_results, filtered, .. } = members[0].clone() else {
                panic!("expected a table");
            };
            (rows, no_results, filtered)
        };

        let (rows, no_results, filtered) = render_rows(&store);
        assert_eq!(rows.len(), 2);
        assert!(!no_results);
        assert!(!filtered);

        store.set_column_filter(&rows_path, "name", vec!["Apple".into()]);
        let (rows, no_results, filtered) = render_rows(&store);
        assert_eq!(rows.len(), 1);
        assert!(!no_results);
        assert!(filtered);
        assert!(
            matches!(&rows[0].cells[0], Cell::Primitive(c) if c.text == "\"Apple\"")
        );
        // Index is the position within the filtered list.
        assert_eq!(rows[0].index, 0);

        store.clear_column_filter(&rows_path, "name");
        let (rows, _, filtered) = render_rows(&store);
        assert_eq!(rows.len(), 2);
        assert!(!filtered);
    }

    #[test]
    fn fully_filtered_table_reports_no_results() {
        let doc = json!([{"name": "Apple"}]);
        let mut store = expanded_store(&doc);
        store.set_column_filter(&NodePath::root(), "name", vec!["Durian".into()]);

        let node = render(&doc, &NodePath::root(), "", &store);
        let GridNode::Table { rows, no_results, .. } = node else {
            panic!("expected a table");
        };
        assert!(rows.is_empty());
        assert!(no_results);
    }

    #[test]
    fn empty_allow_list_means_no_filter() {
        let doc = json!([{"name": "Apple"}, {"name": "Pear"}]);
        let mut store = expanded_store(&doc);
        store.set_column_filter(&NodePath::root(), "name", Vec::new());

        let node = render(&doc, &NodePath::root(), "", &store);
        let GridNode::Table { rows, filtered, .. } = node else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 2);
        // The badge still shows: a filter entry exists even though it allows
        // everything.
        assert!(filtered);
    }

    #[test]
    fn composite_filter_values_compare_canonically() {
        let doc = json!([{"loc": {"x": 1}}, {"loc": {"x": 2}}]);
        let mut store = expanded_store(&doc);
        store.set_column_filter(&NodePath::root(), "loc", vec!["{\"x\":2}".into()]);

        let node = render(&doc, &NodePath::root(), "", &store);
        let GridNode::Table { rows, .. } = node else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn mixed_array_renders_as_indexed_list() {
        let doc = json!([1, [2, 3], {"a": 4}]);
        let store = expanded_store(&doc);
        let node = render(&doc, &NodePath::root(), "", &store);

        let GridNode::List { entries, len, .. } = node else {
            panic!("expected a list");
        };
        assert_eq!(len, 3);
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[0].node, GridNode::Primitive { .. }));
        assert!(matches!(&entries[1].node, GridNode::List { .. }));
        assert!(matches!(&entries[2].node, GridNode::Members { .. }));
    }

    #[test]
    fn array_of_arrays_is_not_a_table() {
        let doc = json!([[{"a": 1}], [{"a": 2}]]);
        let store = expanded_store(&doc);
        let node = render(&doc, &NodePath::root(), "", &store);
        assert!(matches!(node, GridNode::List { .. }));
    }

    #[test]
    fn empty_array_has_header_only() {
        let doc = json!({"items": []});
        let store = expanded_store(&doc);
        let node = render(&doc, &NodePath::root(), "", &store);
        let GridNode::Members { members } = node else {
            panic!("expected member rows");
        };
        assert!(matches!(&members[0], GridNode::EmptyArray { key } if key == "items"));
    }

    #[test]
    fn object_header_and_collapse_state() {
        let doc = json!({"shop": {"name": "SuperMart", "open": true}});
        let store = StateStore::new();
        let node = render(&doc, &NodePath::root(), "", &store);

        let GridNode::Members { members } = node else {
            panic!("expected member rows");
        };
        let GridNode::Object { key, member_count, expanded, members, .. } = &members[0] else {
            panic!("expected an object header");
        };
        assert_eq!(key, "shop");
        assert_eq!(*member_count, 2);
        assert!(!expanded);
        assert!(members.is_empty());
    }

    #[test]
    fn search_flags_headers_and_cells() {
        let doc = json!({"shop": {"name": "SuperMart"}, "year": 2024});
        let store = expanded_store(&doc);
        let node = render(&doc, &NodePath::root(), "super", &store);

        let GridNode::Members { members } = node else {
            panic!("expected member rows");
        };
        let GridNode::Object { matched, members: shop_members, .. } = &members[0] else {
            panic!("expected an object header");
        };
        assert!(*matched);
        let GridNode::Primitive { cell, .. } = &shop_members[0] else {
            panic!("expected a primitive member");
        };
        assert!(cell.matched);

        let GridNode::Primitive { cell, .. } = &members[1] else {
            panic!("expected a primitive member");
        };
        assert!(!cell.matched);
    }

    #[test]
    fn full_view_forces_expansion_transitively() {
        let doc = json!({"a": {"b": {"c": 1}}});
        let store = StateStore::new();

        let node = render_full_view(&doc, &NodePath::root(), "", &store);
        let GridNode::Members { members } = node else {
            panic!("expected member rows");
        };
        let GridNode::Object { expanded, members, .. } = &members[0] else {
            panic!("expected an object header");
        };
        assert!(*expanded);
        let GridNode::Object { expanded, .. } = &members[0] else {
            panic!("expected the inner object");
        };
        assert!(*expanded);
    }

    #[test]
    fn nested_cell_composites_recurse() {
        let doc = json!([{"loc": {"x": 1}, "tags": ["a", "b"]}]);
        let store = expanded_store(&doc);
        let node = render(&doc, &NodePath::root(), "", &store);

        let GridNode::Table { rows, columns, .. } = node else {
            panic!("expected a table");
        };
        let loc_idx = columns.iter().position(|c| c.name == "loc").unwrap();
        let tags_idx = columns.iter().position(|c| c.name == "tags").unwrap();
        assert!(matches!(&rows[0].cells[loc_idx], Cell::Nested(GridNode::Members { .. })));
        let Cell::Nested(GridNode::List { key, .. }) = &rows[0].cells[tags_idx] else {
            panic!("expected a nested list");
        };
        // Nested arrays are labeled with their full path.
        assert_eq!(key, "[0].tags");
    }

    #[test]
    fn distinct_values_dedup_in_first_seen_order() {
        let items = vec![
            json!({"name": "Pear"}),
            json!({"name": "Apple"}),
            json!({"name": "Pear"}),
            json!({"other": 1}),
        ];
        assert_eq!(distinct_values(&items, "name"), ["Pear", "Apple"]);
    }

    #[test]
    fn collapsed_table_keeps_columns_but_no_rows() {
        let doc = json!([{"a": 1}]);
        let store = StateStore::new();
        let node = render(&doc, &NodePath::root(), "", &store);
        let GridNode::Table { expanded, columns, rows, .. } = node else {
            panic!("expected a table");
        };
        assert!(!expanded);
        assert_eq!(columns.len(), 1);
        assert!(rows.is_empty());
    }
}
