//! Grid search for flex groups.
//!
//! Flex children share one aspect ratio and are laid out as equal cells of
//! a `rows x cols` grid. For `n` children the search considers every column
//! count `1..=n` with the fewest rows that hold them (`rows = ceil(n / cols)`;
//! extra rows only shrink the cells). Each candidate's cell is the largest
//! cell of the shared aspect that fits `width / cols` by `height / rows`.
//!
//! # Selection
//!
//! 1. Lowest wasted area (`width * height - n * cell_area`) wins.
//! 2. Ties prefer fewer rows, then fewer columns.
//! 3. A previously chosen grid that still holds `n` children is kept unless
//!    some candidate is strictly better. This keeps the grid stable across
//!    resizes that do not change the optimum.

use mosaic_core::geometry::Size;
use serde::{Deserialize, Serialize};

/// A chosen `rows x cols` arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlexGrid {
    pub rows: usize,
    pub cols: usize,
}

impl FlexGrid {
    /// Create a grid.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of cells.
    #[must_use]
    pub const fn cells(self) -> usize {
        self.rows * self.cols
    }

    /// Whether the grid has room for `n` children.
    #[must_use]
    pub const fn holds(self, n: usize) -> bool {
        self.rows > 0 && self.cols > 0 && self.cells() >= n
    }

    /// `(row, col)` of the `index`-th child in row-major order.
    #[must_use]
    pub const fn position(self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Largest cell of aspect `cell_aspect` fitting this grid in a
    /// `width x height` region, as `(cell_width, cell_height)`.
    #[must_use]
    pub fn fitted_cell(self, cell_aspect: f64, width: f64, height: f64) -> (f64, f64) {
        let cell_width = (width / self.cols as f64).min(height / self.rows as f64 * cell_aspect);
        (cell_width, cell_width / cell_aspect)
    }

    /// Area left uncovered when `n` aspect-preserving cells are fitted.
    #[must_use]
    pub fn wasted_area(self, n: usize, cell_aspect: f64, width: f64, height: f64) -> f64 {
        let (cell_width, cell_height) = self.fitted_cell(cell_aspect, width, height);
        width * height - n as f64 * cell_width * cell_height
    }
}

/// Pick the grid for `n` children of aspect `cell_aspect` in a
/// `width x height` region.
///
/// `tolerance` is relative to the region area; candidates whose waste
/// differs by less are considered tied. `n == 0` is treated as one child.
///
/// `current` wins every tie, so the result depends on the sizes laid out
/// before: four square cells in 400x200 stay 2x2 when first laid out there
/// but stay 1x4 after an 800x100 layout.
#[must_use]
pub fn choose_grid(
    n: usize,
    cell_aspect: f64,
    width: f64,
    height: f64,
    current: Option<FlexGrid>,
    tolerance: f64,
) -> FlexGrid {
    let n = n.max(1);
    let epsilon = (width * height).abs() * tolerance.max(f64::EPSILON);

    let mut best = FlexGrid::new(n, 1);
    let mut best_waste = best.wasted_area(n, cell_aspect, width, height);
    for cols in 2..=n {
        let candidate = FlexGrid::new(n.div_ceil(cols), cols);
        let waste = candidate.wasted_area(n, cell_aspect, width, height);
        let better = waste < best_waste - epsilon
            || (waste <= best_waste + epsilon
                && (candidate.rows, candidate.cols) < (best.rows, best.cols));
        if better {
            best = candidate;
            best_waste = waste;
        }
    }

    if let Some(current) = current
        && current.holds(n)
        && current.wasted_area(n, cell_aspect, width, height) <= best_waste + epsilon
    {
        return current;
    }
    best
}

/// Smallest region holding every child's minimum in aspect-preserving cells.
///
/// Returns the chosen grid and the estimated minimum size of the group. The
/// grid is chosen for a target region of aspect `target_aspect`.
#[must_use]
pub fn estimate_min_size(
    child_min_sizes: &[Size],
    cell_aspect: f64,
    target_aspect: f64,
    tolerance: f64,
) -> (FlexGrid, Size) {
    let n = child_min_sizes.len();
    let grid = choose_grid(n, cell_aspect, target_aspect, 1.0, None, tolerance);

    let cell_width = child_min_sizes
        .iter()
        .map(|min| f64::from(min.width).max(f64::from(min.height) * cell_aspect))
        .fold(0.0_f64, f64::max);
    let cell_height = cell_width / cell_aspect;

    let size = Size::new(
        ceil_px(grid.cols as f64 * cell_width),
        ceil_px(grid.rows as f64 * cell_height),
    );
    (grid, size)
}

/// Round up to whole pixels, absorbing floating-point noise.
fn ceil_px(value: f64) -> u32 {
    let rounded = (value - 1e-9).ceil();
    if rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}
