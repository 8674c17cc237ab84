//! Error taxonomy for tree construction, the layout passes, and queries.

use crate::node::{Grouping, NodePath};

/// Broad class of a [`LayoutError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutErrorKind {
    /// A caller mistake in the shape of the tree, found before any region
    /// is computed. Fix the tree and re-run the passes.
    Configuration,
    /// Cached pass results do not match the current tree.
    Staleness,
    /// A path or panel that does not exist in the tree.
    Lookup,
}

/// Errors produced by combinators, the layout passes, and tree queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("cannot build a {grouping} group from an empty operand")]
    EmptyOperand { grouping: Grouping },

    #[error("{grouping} group at {path} has no children")]
    EmptyGroup { path: NodePath, grouping: Grouping },

    #[error(
        "flex group {} has inconsistent aspect ratios: child {child} declares {found}, expected {expected}",
        describe(path, label.as_deref())
    )]
    InconsistentFlexAspect {
        path: NodePath,
        label: Option<String>,
        child: usize,
        expected: f64,
        found: f64,
    },

    #[error("selected tab {selected} is out of range for tabbed group at {path} with {len} children")]
    TabOutOfRange {
        path: NodePath,
        selected: usize,
        len: usize,
    },

    #[error("node at {path} is not a tabbed group")]
    NotTabbed { path: NodePath },

    #[error(
        "layout constraints are stale: tree generation {tree_generation}, constraints computed at {}",
        describe_generation(*constraints_generation)
    )]
    StaleConstraints {
        tree_generation: u64,
        constraints_generation: Option<u64>,
    },

    #[error("no region pass has completed for the current tree")]
    RegionsNotResolved,

    #[error("no node at {path}")]
    NoSuchNode { path: NodePath },
}

impl LayoutError {
    /// Broad class of this error.
    #[must_use]
    pub fn kind(&self) -> LayoutErrorKind {
        match self {
            Self::EmptyOperand { .. }
            | Self::EmptyGroup { .. }
            | Self::InconsistentFlexAspect { .. }
            | Self::TabOutOfRange { .. }
            | Self::NotTabbed { .. } => LayoutErrorKind::Configuration,
            Self::StaleConstraints { .. } | Self::RegionsNotResolved => LayoutErrorKind::Staleness,
            Self::NoSuchNode { .. } => LayoutErrorKind::Lookup,
        }
    }

    /// Whether the caller can fix this by correcting the tree.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind() == LayoutErrorKind::Configuration
    }
}

fn describe_generation(generation: Option<u64>) -> String {
    generation.map_or_else(|| "never".to_string(), |generation| generation.to_string())
}

fn describe(path: &NodePath, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("'{label}' at {path}"),
        None => format!("at {path}"),
    }
}
