//! Leaf payloads.
//!
//! A [`Panel`] is the externally owned renderable at a leaf of the layout
//! tree. The engine only asks it for a minimum footprint and an optional
//! intrinsic aspect ratio, and tells it which rectangle it was given.
//! Panels are shared (`Rc`), so the same panel can also be held by input
//! handling code; notification therefore takes `&self`.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use mosaic_core::geometry::{Rect, Size, aspect_ratio, sanitize_aspect_ratio};

/// Capability a leaf payload provides to the layout passes.
pub trait Panel {
    /// Minimum pixel footprint this panel needs.
    fn min_size(&self) -> Size;

    /// Intrinsic width/height ratio, if the content has one (images, plots).
    fn aspect_ratio(&self) -> Option<f64> {
        None
    }

    /// Called by the region pass with the rectangle assigned to this panel.
    ///
    /// Panels in an unselected tab receive a zero-area rectangle.
    fn region_assigned(&self, _region: Rect) {}
}

/// Address of the panel data, ignoring any trait-object metadata.
///
/// Two `Rc`s name the same panel iff these addresses are equal.
#[inline]
pub(crate) fn panel_addr<P: ?Sized>(panel: &Rc<P>) -> *const () {
    Rc::as_ptr(panel).cast::<()>()
}

/// A panel with a fixed minimum size that records the last region it was
/// assigned.
///
/// Useful for placeholders, for content whose size never changes, and for
/// tests.
#[derive(Default)]
pub struct StaticPanel {
    name: Option<String>,
    min_size: Size,
    aspect_ratio: Option<f64>,
    region: Cell<Option<Rect>>,
    assignments: Cell<u64>,
}

impl StaticPanel {
    /// Panel with the given minimum size and no intrinsic aspect ratio.
    #[must_use]
    pub fn new(min_size: impl Into<Size>) -> Self {
        Self {
            min_size: min_size.into(),
            ..Self::default()
        }
    }

    /// Panel showing an image of the given pixel dimensions.
    ///
    /// The aspect ratio comes from the image; a zero-height image is treated
    /// as square. The panel has no minimum size since images scale.
    #[must_use]
    pub fn for_image(image_size: impl Into<Size>) -> Self {
        let image_size = image_size.into();
        Self {
            aspect_ratio: Some(aspect_ratio(
                f64::from(image_size.width),
                f64::from(image_size.height),
            )),
            ..Self::default()
        }
    }

    /// Attach a name, shown by [`fmt::Debug`] and in layout dumps.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare an intrinsic aspect ratio.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(sanitize_aspect_ratio(ratio));
        self
    }

    /// Wrap in an `Rc`, ready to be placed in a layout.
    #[must_use]
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Name given with [`named`](Self::named).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Last region assigned by a region pass.
    pub fn region(&self) -> Option<Rect> {
        self.region.get()
    }

    /// Number of times a region pass has notified this panel.
    pub fn assignment_count(&self) -> u64 {
        self.assignments.get()
    }
}

impl Panel for StaticPanel {
    fn min_size(&self) -> Size {
        self.min_size
    }

    fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    fn region_assigned(&self, region: Rect) {
        self.region.set(Some(region));
        self.assignments.set(self.assignments.get() + 1);
    }
}

impl fmt::Debug for StaticPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticPanel")
            .field("name", &self.name)
            .field("min_size", &self.min_size)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("region", &self.region.get())
            .finish()
    }
}
