//! Layout introspection.
//!
//! - [`LayoutTree::dump`]: indented text, one line per node
//! - [`LayoutTree::snapshot`]: serializable per-node records
//! - [`LayoutTree::to_dot`]: Graphviz DOT export
//!
//! Cached sizes and regions are only included while they are current.

use std::fmt::Write as _;

use mosaic_core::geometry::{Rect, Size};
use serde::Serialize;

use crate::node::{Grouping, LayoutNode, NodePath, Weight};
use crate::packing::FlexGrid;
use crate::tree::LayoutTree;
use crate::visibility;

/// Serializable view of a whole tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    pub generation: u64,
    /// Outer region of the current region pass.
    pub area: Option<Rect>,
    /// Nodes in pre-order.
    pub nodes: Vec<NodeSnapshot>,
}

/// One node of a [`LayoutSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub path: NodePath,
    /// `"leaf"` or `"group"`.
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping: Option<Grouping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub visible: bool,
    pub rendered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_tab: Option<usize>,
    pub aspect_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<FlexGrid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Rect>,
}

impl LayoutTree {
    /// Per-node records of the tree and its current pass results.
    pub fn snapshot(&self) -> LayoutSnapshot {
        let constraints = self.has_current_constraints();
        let regions = self.resolved_area().is_some();
        let mut nodes = Vec::with_capacity(self.root().node_count());
        self.root().walk(&mut |path, node| {
            nodes.push(NodeSnapshot {
                path: path.clone(),
                kind: if node.is_leaf() { "leaf" } else { "group" },
                grouping: node.grouping(),
                label: node.label().map(str::to_string),
                visible: node.is_shown(),
                rendered: visibility::is_rendered(self.root(), path.indices()).unwrap_or(false),
                selected_tab: node.selected_tab(),
                aspect_ratio: node.aspect_ratio(),
                min_size: constraints.then_some(node.cache.min_size),
                weight: constraints.then_some(node.cache.weight),
                grid: if constraints { node.cache.grid } else { None },
                region: regions.then_some(node.cache.region),
            });
        });
        LayoutSnapshot {
            generation: self.generation(),
            area: self.resolved_area(),
            nodes,
        }
    }

    /// Indented text rendering of the tree.
    pub fn dump(&self) -> String {
        let snapshot = self.snapshot();
        let mut s = String::new();
        let _ = writeln!(
            s,
            "layout generation {} ({})",
            snapshot.generation,
            match snapshot.area {
                Some(area) => format!("area {area}"),
                None => "unresolved".to_string(),
            }
        );
        for record in &snapshot.nodes {
            let node = self.root().descendant(record.path.indices());
            let _ = writeln!(
                s,
                "{:indent$}{}",
                "",
                describe(record, node),
                indent = 2 * record.path.depth()
            );
        }
        s
    }

    /// Graphviz DOT export of the tree.
    ///
    /// Hidden nodes are grey; nodes that are not rendered are dashed.
    pub fn to_dot(&self) -> String {
        let snapshot = self.snapshot();
        let mut s = String::new();
        let _ = writeln!(s, "digraph Layout {{");
        let _ = writeln!(s, "  rankdir=TB;");
        let _ = writeln!(s, "  node [shape=record];");

        for record in &snapshot.nodes {
            let id = dot_id(&record.path);
            let mut label = record
                .grouping
                .map_or("leaf", Grouping::as_str)
                .to_string();
            if let Some(name) = &record.label {
                let _ = write!(label, " '{}'", escape_dot(name));
            }
            if let Some(min) = record.min_size {
                let _ = write!(label, "|min: {min}");
            }
            if let Some(region) = record.region {
                let _ = write!(label, "|region: {region}");
            }
            let color = if record.visible { "black" } else { "grey" };
            let style = if record.rendered { "solid" } else { "dashed" };
            let _ = writeln!(
                s,
                "  {id} [label=\"{{{label}}}\", color=\"{color}\", style=\"{style}\"];"
            );
            if let Some(parent) = record.path.parent() {
                let _ = writeln!(s, "  {} -> {id};", dot_id(&parent));
            }
        }

        let _ = writeln!(s, "}}");
        s
    }
}

fn describe(record: &NodeSnapshot, node: Option<&LayoutNode>) -> String {
    let mut line = record
        .grouping
        .map_or("leaf", Grouping::as_str)
        .to_string();
    if let Some(label) = &record.label {
        let _ = write!(line, " '{label}'");
    }
    if let Some(node) = node
        && !node.is_leaf()
    {
        let _ = write!(line, " [{} children]", node.children().len());
    }
    if let Some(tab) = record.selected_tab {
        let _ = write!(line, " tab={tab}");
    }
    if !record.visible {
        line.push_str(" hidden");
    }
    if let Some(min) = record.min_size {
        let _ = write!(line, " min={min}");
    }
    if let Some(weight) = record.weight {
        let _ = write!(line, " weight=({}, {})", weight.x, weight.y);
    }
    if let Some(grid) = record.grid {
        let _ = write!(line, " grid={}x{}", grid.rows, grid.cols);
    }
    if let Some(region) = record.region {
        let _ = write!(line, " region={region}");
    }
    line
}

fn dot_id(path: &NodePath) -> String {
    let mut id = "n".to_string();
    for index in path.indices() {
        let _ = write!(id, "_{index}");
    }
    id
}

fn escape_dot(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '"' | '{' | '}' | '|' | '<' | '>' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
