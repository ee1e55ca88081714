use serde::Serialize;
use serde_json::Value;

use crate::value::{self, PrimitiveKind};

/// Horizontal spacing per traversal index.
pub const COLUMN_SPACING: f64 = 250.0;
/// Vertical spacing per nesting depth.
pub const ROW_SPACING: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    Primitive,
}

/// One diagram node per JSON value.
///
/// Ids are `node-{i}` by pre-order visitation index, so identical input
/// always produces identical ids across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    /// The member key, `[index]` for array elements, `root` for the root.
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<usize>,
    /// Display form of a primitive's value, strings quoted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<PrimitiveKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Walks the value tree depth-first, producing one node per value and one
/// edge per parent-child relationship.
///
/// Each edge is emitted immediately after its child's subtree has been fully
/// processed, so edge order is child-completion order. A tree of N values
/// yields exactly N nodes and N-1 edges. The layout pass then assigns
/// positions as a function of traversal order: no two nodes share
/// coordinates, and children sit on deeper rows than their parents.
pub fn build_graph(root: &Value) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut builder = GraphBuilder::default();
    builder.visit(root, "root", 0);
    builder.layout();
    (builder.nodes, builder.edges)
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    depths: Vec<usize>,
}

impl GraphBuilder {
    fn visit(&mut self, value: &Value, label: &str, depth: usize) -> usize {
        let index = self.nodes.len();
        let id = format!("node-{}", index);
        let node = match value {
            Value::Object(map) => GraphNode {
                id,
                kind: NodeKind::Object,
                label: label.to_string(),
                x: 0.0,
                y: 0.0,
                child_count: Some(map.len()),
                value: None,
                value_type: None,
            },
            Value::Array(items) => GraphNode {
                id,
                kind: NodeKind::Array,
                label: label.to_string(),
                x: 0.0,
                y: 0.0,
                child_count: Some(items.len()),
                value: None,
                value_type: None,
            },
            primitive => GraphNode {
                id,
                kind: NodeKind::Primitive,
                label: label.to_string(),
                x: 0.0,
                y: 0.0,
                child_count: None,
                value: Some(value::display_string(primitive)),
                value_type: value::primitive_kind(primitive),
            },
        };
        self.nodes.push(node);
        self.depths.push(depth);

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_index = self.visit(child, key, depth + 1);
                    self.connect(index, child_index);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    let child_index = self.visit(child, &format!("[{}]", i), depth + 1);
                    self.connect(index, child_index);
                }
            }
            _ => {}
        }

        index
    }

    fn connect(&mut self, parent: usize, child: usize) {
        let source = format!("node-{}", parent);
        let target = format!("node-{}", child);
        self.edges.push(GraphEdge {
            id: format!("edge-{}-{}", source, target),
            source,
            target,
        });
    }

    fn layout(&mut self) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.x = i as f64 * COLUMN_SPACING;
            node.y = self.depths[i] as f64 * ROW_SPACING;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count_values(value: &Value) -> usize {
        match value {
            Value::Object(map) => 1 + map.values().map(count_values).sum::<usize>(),
            Value::Array(items) => 1 + items.iter().map(count_values).sum::<usize>(),
            _ => 1,
        }
    }

    #[test]
    fn node_and_edge_counts() {
        let docs = [
            json!(null),
            json!({"a": 1, "b": [true, "x"], "c": {"d": {"e": 2}}}),
            json!([[1, 2], [3, [4]]]),
        ];
        for doc in docs {
            let n = count_values(&doc);
            let (nodes, edges) = build_graph(&doc);
            assert_eq!(nodes.len(), n);
            assert_eq!(edges.len(), n - 1);

            // Every non-root node has exactly one incoming edge.
            for node in &nodes[1..] {
                let incoming = edges.iter().filter(|e| e.target == node.id).count();
                assert_eq!(incoming, 1, "node {}", node.id);
            }
        }
    }

    #[test]
    fn ids_are_stable_across_runs() {
        let doc = json!({"a": [1, {"b": 2}], "c": null});
        let first = build_graph(&doc);
        let second = build_graph(&doc);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn kinds_labels_and_values() {
        let doc = json!({"name": "SuperMart", "tags": [true]});
        let (nodes, _) = build_graph(&doc);

        assert_eq!(nodes[0].label, "root");
        assert_eq!(nodes[0].kind, NodeKind::Object);
        assert_eq!(nodes[0].child_count, Some(2));

        assert_eq!(nodes[1].label, "name");
        assert_eq!(nodes[1].kind, NodeKind::Primitive);
        assert_eq!(nodes[1].value.as_deref(), Some("\"SuperMart\""));
        assert_eq!(nodes[1].value_type, Some(PrimitiveKind::String));

        assert_eq!(nodes[2].label, "tags");
        assert_eq!(nodes[2].kind, NodeKind::Array);
        assert_eq!(nodes[2].child_count, Some(1));

        assert_eq!(nodes[3].label, "[0]");
        assert_eq!(nodes[3].value.as_deref(), Some("true"));
        assert_eq!(nodes[3].value_type, Some(PrimitiveKind::Boolean));
    }

    #[test]
    fn edges_emit_in_child_completion_order() {
        let doc = json!({"a": {"b": 1}, "c": 2});
        let (_, edges) = build_graph(&doc);

        // b completes before a, a before c.
        let ids: Vec<&str> = edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "edge-node-1-node-2",
                "edge-node-0-node-1",
                "edge-node-0-node-3",
            ]
        );
    }

    #[test]
    fn positions_are_distinct_and_layered() {
        let doc = json!({"a": {"b": [1, 2]}, "c": 3});
        let (nodes, edges) = build_graph(&doc);

        for (i, a) in nodes.iter().enumerate() {
            for b in nodes.iter().skip(i + 1) {
                assert!(a.x != b.x || a.y != b.y);
            }
        }

        for edge in &edges {
            let source = nodes.iter().find(|n| n.id == edge.source).unwrap();
            let target = nodes.iter().find(|n| n.id == edge.target).unwrap();
            assert!(target.y > source.y);
        }
    }
}
