//! Bottom-up constraint pass.
//!
//! Computes every node's minimum pixel footprint and its weight on space
//! beyond that minimum, children before parents:
//!
//! | Grouping            | min size                           | weight                    |
//! |---------------------|------------------------------------|---------------------------|
//! | leaf                | [`Panel::min_size`]                | declared (default 1)      |
//! | horizontal/vertical | sum on primary axis, max on cross  | sum primary, max cross    |
//! | stacked, tabbed     | component-wise max                 | component-wise max        |
//! | flex                | grid estimate (see [`packing`])    | sum                       |
//!
//! The pass also validates the tree: empty groups, out-of-range tabs and
//! flex groups whose children disagree on aspect ratio are configuration
//! errors, reported before any region is computed.
//!
//! [`Panel::min_size`]: crate::Panel::min_size
//! [`packing`]: crate::packing

use mosaic_core::geometry::Size;
use tracing::trace;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::node::{Axis, Grouping, LayoutNode, NodeKind, NodePath, Weight};
use crate::packing;

/// Run the constraint pass over `node` and its subtree.
pub(crate) fn compute_constraints(
    node: &mut LayoutNode,
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    compute_node(node, &mut NodePath::root(), config)
}

fn compute_node(
    node: &mut LayoutNode,
    path: &mut NodePath,
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    let declared_weight = node.weight;
    let group_aspect = node.aspect_ratio;

    let group = match &mut node.kind {
        NodeKind::Leaf(panel) => {
            node.cache.min_size = panel.min_size();
            node.cache.weight = declared_weight;
            node.cache.grid = None;
            return Ok(());
        }
        NodeKind::Group(group) => group,
    };

    if group.children.is_empty() {
        return Err(LayoutError::EmptyGroup {
            path: path.clone(),
            grouping: group.grouping,
        });
    }
    if group.grouping == Grouping::Tabbed && group.selected_tab >= group.children.len() {
        return Err(LayoutError::TabOutOfRange {
            path: path.clone(),
            selected: group.selected_tab,
            len: group.children.len(),
        });
    }

    for (index, child) in group.children.iter_mut().enumerate() {
        path.push(index);
        let result = compute_node(child, path, config);
        path.pop();
        result?;
    }

    let children = &group.children;
    let (min_size, weight, grid) = match group.grouping {
        Grouping::Horizontal => {
            let (min_size, weight) = split_totals(children, Axis::Horizontal);
            (min_size, weight, None)
        }
        Grouping::Vertical => {
            let (min_size, weight) = split_totals(children, Axis::Vertical);
            (min_size, weight, None)
        }
        Grouping::Stacked | Grouping::Tabbed => {
            let (min_size, weight) = overlay_totals(children);
            (min_size, weight, None)
        }
        Grouping::Flex => {
            let cell_aspect = shared_aspect(children, path, node.label.as_deref(), config)?;
            let mins: Vec<Size> = children.iter().map(|child| child.cache.min_size).collect();
            let (grid, min_size) = packing::estimate_min_size(
                &mins,
                cell_aspect,
                group_aspect,
                config.effective_aspect_tolerance(),
            );
            trace!(
                path = %path,
                rows = grid.rows,
                cols = grid.cols,
                min_width = min_size.width,
                min_height = min_size.height,
                "flex grid estimated"
            );
            let weight = children.iter().fold(Weight::ZERO, |acc, child| Weight {
                x: acc.x + child.cache.weight.x,
                y: acc.y + child.cache.weight.y,
            });
            (min_size, weight, Some(grid))
        }
    };

    node.cache.min_size = min_size;
    node.cache.weight = weight;
    node.cache.grid = grid;
    Ok(())
}

/// Sum along the primary axis, max across it.
fn split_totals(children: &[LayoutNode], axis: Axis) -> (Size, Weight) {
    let mut primary = 0u32;
    let mut cross = 0u32;
    let mut primary_weight = 0.0;
    let mut cross_weight = 0.0_f64;
    for child in children {
        let min = child.cache.min_size;
        primary = primary.saturating_add(axis.extent(min));
        cross = cross.max(axis.cross_extent(min));
        primary_weight += child.cache.weight.along(axis);
        cross_weight = cross_weight.max(child.cache.weight.along(other_axis(axis)));
    }
    match axis {
        Axis::Horizontal => (
            Size::new(primary, cross),
            Weight {
                x: primary_weight,
                y: cross_weight,
            },
        ),
        Axis::Vertical => (
            Size::new(cross, primary),
            Weight {
                x: cross_weight,
                y: primary_weight,
            },
        ),
    }
}

/// Component-wise max: every child must fit on its own.
fn overlay_totals(children: &[LayoutNode]) -> (Size, Weight) {
    children
        .iter()
        .fold((Size::ZERO, Weight::ZERO), |(size, weight), child| {
            (size.max(child.cache.min_size), weight.max(child.cache.weight))
        })
}

/// The aspect ratio every flex child agrees on.
fn shared_aspect(
    children: &[LayoutNode],
    path: &NodePath,
    label: Option<&str>,
    config: &LayoutConfig,
) -> Result<f64, LayoutError> {
    let expected = children[0].aspect_ratio;
    for (index, child) in children.iter().enumerate().skip(1) {
        if !config.same_aspect(expected, child.aspect_ratio) {
            return Err(LayoutError::InconsistentFlexAspect {
                path: path.clone(),
                label: label.map(str::to_string),
                child: index,
                expected,
                found: child.aspect_ratio,
            });
        }
    }
    Ok(expected)
}

const fn other_axis(axis: Axis) -> Axis {
    match axis {
        Axis::Horizontal => Axis::Vertical,
        Axis::Vertical => Axis::Horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::StaticPanel;

    fn leaf(width: u32, height: u32) -> LayoutNode {
        LayoutNode::leaf(StaticPanel::new((width, height)).shared())
    }

    fn computed(mut node: LayoutNode) -> LayoutNode {
        compute_constraints(&mut node, &LayoutConfig::default()).expect("valid tree");
        node
    }

    #[test]
    fn horizontal_sums_width_and_maxes_height() {
        let node = computed(LayoutNode::group(
            Grouping::Horizontal,
            vec![leaf(50, 10), leaf(30, 40), leaf(20, 5).with_weight(2.0)],
        ));
        assert_eq!(node.cache.min_size, Size::new(100, 40));
        assert_eq!(node.cache.weight, Weight::new(4.0, 2.0));
    }

    #[test]
    fn vertical_sums_height_and_maxes_width() {
        let node = computed(LayoutNode::group(
            Grouping::Vertical,
            vec![leaf(50, 10), leaf(30, 40)],
        ));
        assert_eq!(node.cache.min_size, Size::new(50, 50));
        assert_eq!(node.cache.weight, Weight::new(1.0, 2.0));
    }

    #[test]
    fn overlays_take_component_max() {
        for grouping in [Grouping::Stacked, Grouping::Tabbed] {
            let node = computed(LayoutNode::group(
                grouping,
                vec![leaf(50, 10), leaf(30, 40).with_weight((0.5, 3.0))],
            ));
            assert_eq!(node.cache.min_size, Size::new(50, 40), "{grouping}");
            assert_eq!(node.cache.weight, Weight::new(1.0, 3.0), "{grouping}");
        }
    }

    #[test]
    fn nested_groups_aggregate_bottom_up() {
        let inner = LayoutNode::group(Grouping::Vertical, vec![leaf(20, 20), leaf(20, 20)]);
        let node = computed(LayoutNode::group(
            Grouping::Horizontal,
            vec![leaf(10, 10), inner],
        ));
        assert_eq!(node.cache.min_size, Size::new(30, 40));
        assert_eq!(node.children()[1].cache.min_size, Size::new(20, 40));
    }

    #[test]
    fn flex_estimates_grid_and_sums_weight() {
        let node = computed(LayoutNode::group(
            Grouping::Flex,
            vec![leaf(10, 10), leaf(10, 10), leaf(10, 10), leaf(20, 10)],
        ));
        assert_eq!(node.cache.grid, Some(packing::FlexGrid::new(2, 2)));
        assert_eq!(node.cache.min_size, Size::new(40, 40));
        assert_eq!(node.cache.weight, Weight::uniform(4.0));
    }

    #[test]
    fn empty_group_is_rejected_with_path() {
        let mut node = LayoutNode::group(
            Grouping::Horizontal,
            vec![leaf(1, 1), LayoutNode::group(Grouping::Stacked, Vec::new())],
        );
        let err = compute_constraints(&mut node, &LayoutConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::EmptyGroup {
                path: NodePath::from([1]),
                grouping: Grouping::Stacked,
            }
        );
    }

    #[test]
    fn tab_out_of_range_is_rejected() {
        let mut node =
            LayoutNode::group(Grouping::Tabbed, vec![leaf(1, 1), leaf(1, 1)]).with_selected_tab(2);
        let err = compute_constraints(&mut node, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::TabOutOfRange {
                selected: 2,
                len: 2,
                ..
            }
        ));
    }

    #[test]
    fn flex_rejects_mixed_aspects() {
        let mut node = LayoutNode::group(
            Grouping::Flex,
            vec![
                LayoutNode::leaf(StaticPanel::for_image((100, 100)).shared()),
                LayoutNode::leaf(StaticPanel::for_image((200, 100)).shared()),
            ],
        )
        .with_label("gallery");
        let err = compute_constraints(&mut node, &LayoutConfig::default()).unwrap_err();
        match err {
            LayoutError::InconsistentFlexAspect {
                label,
                child,
                expected,
                found,
                ..
            } => {
                assert_eq!(label.as_deref(), Some("gallery"));
                assert_eq!(child, 1);
                assert_eq!(expected, 1.0);
                assert_eq!(found, 2.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pass_is_idempotent() {
        let mut node = LayoutNode::group(
            Grouping::Horizontal,
            vec![
                leaf(10, 20),
                LayoutNode::group(Grouping::Flex, vec![leaf(5, 5), leaf(5, 5), leaf(5, 5)]),
            ],
        );
        let config = LayoutConfig::default();
        compute_constraints(&mut node, &config).expect("first pass");
        let first: Vec<_> = collect(&node);
        compute_constraints(&mut node, &config).expect("second pass");
        assert_eq!(first, collect(&node));
    }

    fn collect(node: &LayoutNode) -> Vec<(Size, Weight)> {
        let mut out = Vec::new();
        node.walk(&mut |_, n| out.push((n.cache.min_size, n.cache.weight)));
        out
    }
}
