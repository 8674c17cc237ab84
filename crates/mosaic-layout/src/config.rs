//! Layout configuration threaded through both passes.
//!
//! A [`LayoutConfig`] is owned by each [`LayoutTree`](crate::LayoutTree);
//! there is no process-wide default that passes consult behind the caller's
//! back. The type is serde-compatible so hosts can load it alongside their
//! own settings:
//!
//! ```ignore
//! let config: LayoutConfig = serde_json::from_str(r#"{ "y_axis": "up" }"#)?;
//! let tree = LayoutTree::with_config(root, config);
//! ```

use serde::{Deserialize, Serialize};

/// Default relative tolerance when comparing flex aspect ratios.
pub const DEFAULT_ASPECT_TOLERANCE: f64 = 1e-6;

/// What to do with leftover space in a split group whose children all have
/// zero weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroWeightPolicy {
    /// Give the whole leftover to the last child.
    #[default]
    LastChild,
    /// Split the leftover evenly across children.
    Equal,
}

/// Direction in which the vertical coordinate grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    /// Window coordinates: `y = 0` is the top edge.
    #[default]
    Down,
    /// Viewport coordinates: `y = 0` is the bottom edge.
    Up,
}

/// Configuration for constraint and region resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub zero_weight_policy: ZeroWeightPolicy,
    pub y_axis: YAxis,
    /// Relative tolerance used when checking that flex siblings share one
    /// aspect ratio, and when comparing grid candidates.
    pub aspect_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            zero_weight_policy: ZeroWeightPolicy::default(),
            y_axis: YAxis::default(),
            aspect_tolerance: DEFAULT_ASPECT_TOLERANCE,
        }
    }
}

impl LayoutConfig {
    /// Set the zero-weight leftover policy.
    #[must_use]
    pub fn zero_weight_policy(mut self, policy: ZeroWeightPolicy) -> Self {
        self.zero_weight_policy = policy;
        self
    }

    /// Set the vertical axis convention.
    #[must_use]
    pub fn y_axis(mut self, y_axis: YAxis) -> Self {
        self.y_axis = y_axis;
        self
    }

    /// Set the aspect comparison tolerance. Negative or non-finite values
    /// fall back to [`DEFAULT_ASPECT_TOLERANCE`].
    #[must_use]
    pub fn aspect_tolerance(mut self, tolerance: f64) -> Self {
        self.aspect_tolerance = sanitize_tolerance(tolerance);
        self
    }

    /// Tolerance the passes actually use.
    ///
    /// The field is public and may come from deserialization, so it is
    /// sanitized here as well as in the setter.
    #[must_use]
    pub fn effective_aspect_tolerance(&self) -> f64 {
        sanitize_tolerance(self.aspect_tolerance)
    }

    /// Whether two aspect ratios agree within the configured tolerance.
    #[must_use]
    pub fn same_aspect(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.effective_aspect_tolerance() * a.abs().max(b.abs())
    }
}

fn sanitize_tolerance(tolerance: f64) -> f64 {
    if tolerance.is_finite() && tolerance >= 0.0 {
        tolerance
    } else {
        DEFAULT_ASPECT_TOLERANCE
    }
}
