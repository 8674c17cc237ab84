//! Top-down region pass.
//!
//! Hands each node a concrete rectangle, starting from the outer region at
//! the root. It relies on the cached minimums and weights from the
//! constraint pass. [`LayoutTree`](crate::LayoutTree) checks that those are
//! current before calling in here.
//!
//! # Split distribution
//!
//! Along the primary axis each child first receives its minimum. The
//! leftover goes out in proportion to weight. Extra shares are floored
//! cumulatively and the last child takes the remainder, so:
//!
//! - the children's extents sum to the group's extent exactly;
//! - no child receives less than its minimum when the group has room.
//!
//! When every weight is zero the configured [`ZeroWeightPolicy`] decides.
//! When the group is smaller than the sum of minimums, extents shrink in
//! proportion to the minimums under the same rounding rule.
//!
//! Offsets saturate at `u32::MAX`, matching [`Rect::right`] and
//! [`Rect::bottom`].

use mosaic_core::geometry::Rect;
use tracing::{trace, warn};

use crate::config::{LayoutConfig, YAxis, ZeroWeightPolicy};
use crate::node::{Axis, Grouping, LayoutNode, NodeKind, NodePath};
use crate::packing::{self, FlexGrid};

/// Run the region pass over `node` and its subtree.
pub(crate) fn assign_regions(node: &mut LayoutNode, area: Rect, config: &LayoutConfig) {
    assign_node(node, area, true, &mut NodePath::root(), config);
}

fn assign_node(
    node: &mut LayoutNode,
    area: Rect,
    active: bool,
    path: &mut NodePath,
    config: &LayoutConfig,
) {
    node.cache.region = area;
    node.cache.active = active;

    let group = match &mut node.kind {
        NodeKind::Leaf(panel) => {
            panel.region_assigned(area);
            return;
        }
        NodeKind::Group(group) => group,
    };

    let regions: Vec<Rect> = match group.grouping {
        Grouping::Horizontal => {
            split_regions(&group.children, area, Axis::Horizontal, active, path, config)
        }
        Grouping::Vertical => {
            split_regions(&group.children, area, Axis::Vertical, active, path, config)
        }
        Grouping::Stacked => vec![area; group.children.len()],
        Grouping::Tabbed => (0..group.children.len())
            .map(|index| {
                if index == group.selected_tab {
                    area
                } else {
                    area.collapsed()
                }
            })
            .collect(),
        Grouping::Flex => {
            let cell_aspect = group
                .children
                .first()
                .map_or(1.0, |child| child.aspect_ratio);
            let grid = packing::choose_grid(
                group.children.len(),
                cell_aspect,
                f64::from(area.width),
                f64::from(area.height),
                node.cache.grid,
                config.effective_aspect_tolerance(),
            );
            if node.cache.grid != Some(grid) {
                trace!(path = %path, rows = grid.rows, cols = grid.cols, "flex regrid");
            }
            node.cache.grid = Some(grid);
            flex_regions(group.children.len(), grid, cell_aspect, area, config.y_axis)
        }
    };

    let is_tabbed = group.grouping == Grouping::Tabbed;
    let selected = group.selected_tab;
    for (index, (child, region)) in group.children.iter_mut().zip(regions).enumerate() {
        let child_active = active && (!is_tabbed || index == selected);
        path.push(index);
        assign_node(child, region, child_active, path, config);
        path.pop();
    }
}

fn split_regions(
    children: &[LayoutNode],
    area: Rect,
    axis: Axis,
    active: bool,
    path: &NodePath,
    config: &LayoutConfig,
) -> Vec<Rect> {
    let extent = axis.extent(area.size());
    let mins: Vec<u32> = children
        .iter()
        .map(|child| axis.extent(child.cache.min_size))
        .collect();
    let weights: Vec<f64> = children
        .iter()
        .map(|child| child.cache.weight.along(axis))
        .collect();

    let total_min: u64 = mins.iter().map(|&min| u64::from(min)).sum();
    // Collapsed tabs are expected to underflow.
    if active && u64::from(extent) < total_min {
        warn!(
            path = %path,
            axis = ?axis,
            available = extent,
            required = total_min,
            "region smaller than minimum; shrinking children"
        );
    }

    let sizes = distribute(extent, &mins, &weights, config.zero_weight_policy);
    let mut offset = 0u32;
    sizes
        .into_iter()
        .map(|size| {
            let start = offset;
            offset += size;
            match axis {
                Axis::Horizontal => {
                    Rect::new(area.x.saturating_add(start), area.y, size, area.height)
                }
                Axis::Vertical => {
                    let y = match config.y_axis {
                        YAxis::Down => area.y.saturating_add(start),
                        YAxis::Up => area.y.saturating_add(area.height - offset),
                    };
                    Rect::new(area.x, y, area.width, size)
                }
            }
        })
        .collect()
}

/// Split `extent` across children with the given minimums and weights.
///
/// The result always sums to `extent`.
pub(crate) fn distribute(
    extent: u32,
    mins: &[u32],
    weights: &[f64],
    policy: ZeroWeightPolicy,
) -> Vec<u32> {
    let n = mins.len();
    if n == 0 {
        return Vec::new();
    }

    let total_min: u64 = mins.iter().map(|&min| u64::from(min)).sum();
    if u64::from(extent) < total_min {
        // Shrink in proportion to the minimums.
        let scale = f64::from(extent) / total_min as f64;
        let shares: Vec<f64> = mins.iter().map(|&min| f64::from(min) * scale).collect();
        return floor_cumulative(extent, &shares);
    }

    let leftover = extent - total_min as u32;
    let total_weight: f64 = weights.iter().sum();
    let shares: Vec<f64> = if total_weight > 0.0 {
        weights
            .iter()
            .map(|&weight| f64::from(leftover) * weight / total_weight)
            .collect()
    } else {
        match policy {
            ZeroWeightPolicy::LastChild => {
                let mut shares = vec![0.0; n];
                shares[n - 1] = f64::from(leftover);
                shares
            }
            ZeroWeightPolicy::Equal => vec![f64::from(leftover) / n as f64; n],
        }
    };

    floor_cumulative(leftover, &shares)
        .into_iter()
        .zip(mins)
        .map(|(extra, &min)| min + extra)
        .collect()
}

/// Integer parts of `shares` (which sum to `total`), floored at cumulative
/// boundaries so rounding error never accumulates; the last entry absorbs
/// whatever remains.
fn floor_cumulative(total: u32, shares: &[f64]) -> Vec<u32> {
    let mut out = Vec::with_capacity(shares.len());
    let mut cumulative = 0.0;
    let mut assigned = 0u32;
    let last = shares.len().saturating_sub(1);
    for (index, share) in shares.iter().enumerate() {
        if index == last {
            out.push(total - assigned);
            break;
        }
        cumulative += share;
        let boundary = ((cumulative + 1e-9).floor().max(0.0) as u32).clamp(assigned, total);
        out.push(boundary - assigned);
        assigned = boundary;
    }
    out
}

fn flex_regions(n: usize, grid: FlexGrid, cell_aspect: f64, area: Rect, y_axis: YAxis) -> Vec<Rect> {
    let (cell_width, cell_height) =
        grid.fitted_cell(cell_aspect, f64::from(area.width), f64::from(area.height));
    let cell_width = (cell_width + 1e-9).floor().max(0.0) as u32;
    let cell_height = (cell_height + 1e-9).floor().max(0.0) as u32;

    let block_width = cell_width * grid.cols as u32;
    let block_height = cell_height * grid.rows as u32;
    let origin_x = area.x.saturating_add(area.width.saturating_sub(block_width) / 2);
    let origin_y = area.y.saturating_add(area.height.saturating_sub(block_height) / 2);

    (0..n)
        .map(|index| {
            let (row, col) = grid.position(index);
            let row = match y_axis {
                YAxis::Down => row,
                YAxis::Up => grid.rows - 1 - row,
            };
            Rect::new(
                origin_x.saturating_add(col as u32 * cell_width),
                origin_y.saturating_add(row as u32 * cell_height),
                cell_width,
                cell_height,
            )
        })
        .collect()
}
