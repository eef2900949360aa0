//! # GridKit Layout
//!
//! Space-allocation engine for two-dimensional grids whose rows and columns
//! carry independent, possibly unbounded, size constraints.
//!
//! ## Design Goals
//!
//! 1. **Block constraints**: per-row/per-column min/max bounds with an
//!    infinitely repeating tail pattern
//! 2. **Intrinsic aggregation**: combine item minimum/preferred/maximum
//!    sizes into per-cell tables
//! 3. **Fair distribution**: share multi-cell spans and leftover container
//!    space across blocks with an iterative fair-share algorithm
//! 4. **Fill and alignment**: derive every item's final rectangle from its
//!    fill policy and alignment fraction
//!
//! The engine is a pure function of its registry and axis models: `measure`
//! and `layout` traverse freshly allocated, pass-local tables and never keep
//! state between calls. Hosts plug in through the [`LayoutItem`] capability
//! trait and get their final rectangles through [`LayoutItem::apply_bounds`].
//!
//! Nothing here is internally synchronized; callers that share one engine
//! across threads must serialize registry mutation and passes externally.

pub mod axis;
pub mod place;

mod distribute;
mod reconcile;
mod sizing;

pub use axis::{AxisBlock, AxisSpec};
pub use place::{FillKind, FillMode, Placement};

use thiserror::Error;
use tracing::{debug, trace};

/// Hard ceiling for every stored size and cumulative position.
///
/// Keeps prefix sums comfortably inside `u32` range; sizes saturate here
/// except on the minimum-size path, which reports
/// [`LayoutError::SizeOverflow`] instead.
pub const MAX_SIZE: u32 = u32::MAX >> 7;

/// Grid axes. `X` runs across the columns, `Y` down the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// A possibly-unbounded size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBound {
    /// Concrete size in pixels.
    Px(u32),
    /// No constraint in this direction.
    Unbounded,
}

impl SizeBound {
    /// Pixel value saturated to [`MAX_SIZE`]; `Unbounded` maps to the
    /// ceiling itself.
    pub(crate) fn to_px(self) -> u32 {
        match self {
            SizeBound::Px(v) => v.min(MAX_SIZE),
            SizeBound::Unbounded => MAX_SIZE,
        }
    }
}

/// Intrinsic size categories an item reports and the engine computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Minimum,
    Preferred,
    Maximum,
}

/// A width/height pair reported by a host item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSize {
    pub width: SizeBound,
    pub height: SizeBound,
}

impl ItemSize {
    pub fn new(width: SizeBound, height: SizeBound) -> Self {
        Self { width, height }
    }

    /// Both axes fixed in pixels.
    pub fn px(width: u32, height: u32) -> Self {
        Self {
            width: SizeBound::Px(width),
            height: SizeBound::Px(height),
        }
    }
}

/// Final rectangle handed back to a host item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Host capability the engine consumes for every registered item.
///
/// The intrinsic queries must be pure: the engine may call them several
/// times per pass and expects stable answers within one pass.
pub trait LayoutItem {
    /// Intrinsic width for `class`; `Unbounded` means "as wide as offered".
    fn intrinsic_width(&self, class: SizeClass) -> SizeBound;

    /// Intrinsic height for `class`; `Unbounded` means "as tall as offered".
    fn intrinsic_height(&self, class: SizeClass) -> SizeBound;

    /// Combined query for both axes of one class.
    ///
    /// The engine calls this whenever it needs both axes of the same class,
    /// so hosts for which a single measurement yields both dimensions can
    /// override it and answer from one computation. The default simply runs
    /// the two single-axis queries.
    fn intrinsic_size(&self, class: SizeClass) -> ItemSize {
        ItemSize {
            width: self.intrinsic_width(class),
            height: self.intrinsic_height(class),
        }
    }

    /// Receive the final rectangle. Called exactly once per layout pass.
    fn apply_bounds(&mut self, bounds: Bounds);
}

/// Stable identifier a host assigns when registering an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

/// Errors the engine reports.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Block constraint whose bounded maximum is below its minimum.
    #[error("invalid block constraint: max {max} is below min {min}")]
    InvalidBlock { min: u32, max: u32 },

    /// Placement rejected at registration.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// Fill-mode factor outside the legal range of its kind.
    #[error("invalid fill factor {factor} for {kind:?}")]
    InvalidFillFactor { kind: FillKind, factor: f32 },

    /// A block index past the explicit prefix was resolved against an empty
    /// repeating tail.
    #[error("axis {axis:?} has no block at index {index}")]
    AxisExhausted { axis: Axis, index: usize },

    /// A minimum size left the representable range when inflated by the
    /// axis gap.
    #[error("minimum size overflows on axis {axis:?}")]
    SizeOverflow { axis: Axis },
}

/// One registry entry: the host item plus its placement.
pub(crate) struct Registered<I> {
    pub(crate) id: ItemId,
    pub(crate) item: I,
    pub(crate) placement: Placement,
}

/// The grid layout engine.
///
/// Owns the item registry and both axis models. The registry keeps items in
/// registration order, which is also the order multi-cell spans are
/// distributed in; re-registering an id keeps its position.
pub struct GridLayout<I> {
    x_axis: AxisSpec,
    y_axis: AxisSpec,
    items: Vec<Registered<I>>,
}

impl<I> Default for GridLayout<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> GridLayout<I> {
    /// Engine with no items, no gaps and every block defaulting to
    /// `[0, grow]` on both axes.
    pub fn new() -> Self {
        Self {
            x_axis: AxisSpec::new(Axis::X),
            y_axis: AxisSpec::new(Axis::Y),
            items: Vec::new(),
        }
    }

    /// Engine with both inter-block gaps preset.
    pub fn with_gaps(x_gap: u32, y_gap: u32) -> Self {
        let mut engine = Self::new();
        engine.set_gap(Axis::X, x_gap);
        engine.set_gap(Axis::Y, y_gap);
        engine
    }

    /// Replace one axis's explicit prefix and repeating tail.
    ///
    /// An empty repeating tail is legal; resolving a block past the explicit
    /// prefix then fails with [`LayoutError::AxisExhausted`].
    pub fn set_axis_blocks(
        &mut self,
        axis: Axis,
        explicit: Vec<AxisBlock>,
        repeating: Vec<AxisBlock>,
    ) {
        self.axis_mut(axis).set_blocks(explicit, repeating);
    }

    /// The explicit prefix and repeating tail of one axis.
    pub fn axis_blocks(&self, axis: Axis) -> (&[AxisBlock], &[AxisBlock]) {
        self.axis(axis).blocks()
    }

    /// Set the empty space inserted at every block boundary of `axis`.
    pub fn set_gap(&mut self, axis: Axis, gap: u32) {
        self.axis_mut(axis).set_gap(gap);
    }

    /// The inter-block gap of `axis`.
    pub fn gap(&self, axis: Axis) -> u32 {
        self.axis(axis).gap()
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item registered under `id`.
    pub fn item(&self, id: ItemId) -> Option<&I> {
        self.items.iter().find(|r| r.id == id).map(|r| &r.item)
    }

    /// The placement registered under `id`.
    pub fn placement(&self, id: ItemId) -> Option<&Placement> {
        self.items.iter().find(|r| r.id == id).map(|r| &r.placement)
    }

    fn axis(&self, axis: Axis) -> &AxisSpec {
        match axis {
            Axis::X => &self.x_axis,
            Axis::Y => &self.y_axis,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisSpec {
        match axis {
            Axis::X => &mut self.x_axis,
            Axis::Y => &mut self.y_axis,
        }
    }
}

impl<I: LayoutItem> GridLayout<I> {
    /// Register `item` under `id`, replacing any previous registration.
    ///
    /// The placement is validated here and never stored invalid.
    pub fn register_item(
        &mut self,
        id: ItemId,
        item: I,
        placement: Placement,
    ) -> Result<(), LayoutError> {
        placement.validate()?;
        if let Some(slot) = self.items.iter_mut().find(|r| r.id == id) {
            slot.item = item;
            slot.placement = placement;
        } else {
            self.items.push(Registered {
                id,
                item,
                placement,
            });
        }
        Ok(())
    }

    /// Remove the item registered under `id` and hand it back.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered: the caller's view of the
    /// registry no longer matches the engine's, which is a programming
    /// error, not a recoverable condition.
    pub fn unregister_item(&mut self, id: ItemId) -> I {
        match self.items.iter().position(|r| r.id == id) {
            Some(index) => self.items.remove(index).item,
            None => panic!("unregister_item: unknown item {id:?}"),
        }
    }

    /// Total grid size for one size class.
    ///
    /// Returns `(0, 0)` when no items are registered.
    pub fn measure(&self, class: SizeClass) -> Result<(u32, u32), LayoutError> {
        let Some(grid) =
            sizing::SizeGrid::build(&self.items, &self.x_axis, &self.y_axis, &[class])?
        else {
            return Ok((0, 0));
        };
        let width = reconcile::axis_total(&grid, &self.x_axis, class)?;
        let height = reconcile::axis_total(&grid, &self.y_axis, class)?;
        debug!(?class, width, height, "measured grid");
        Ok((width, height))
    }

    /// Run a full layout pass for the given available size.
    ///
    /// Every block starts at its minimum and grows toward its maximum until
    /// the available size is met, then every item receives its final
    /// rectangle through [`LayoutItem::apply_bounds`]: exactly once, and
    /// only if the whole pass succeeded.
    pub fn layout(
        &mut self,
        available_width: u32,
        available_height: u32,
    ) -> Result<(), LayoutError> {
        let Some(grid) = sizing::SizeGrid::build(
            &self.items,
            &self.x_axis,
            &self.y_axis,
            &[SizeClass::Minimum, SizeClass::Maximum],
        )?
        else {
            return Ok(());
        };
        let x_pos = reconcile::fit_axis(&grid, &self.x_axis, available_width)?;
        let y_pos = reconcile::fit_axis(&grid, &self.y_axis, available_height)?;
        trace!(?x_pos, ?y_pos, "reconciled block edges");

        let x_gap = self.x_axis.gap();
        let y_gap = self.y_axis.gap();
        for slot in &mut self.items {
            let bounds = place::place_item(&slot.item, &slot.placement, &x_pos, &y_pos, x_gap, y_gap);
            trace!(id = ?slot.id, ?bounds, "placed item");
            slot.item.apply_bounds(bounds);
        }
        debug!(
            items = self.items.len(),
            available_width, available_height, "layout pass done"
        );
        Ok(())
    }
}
