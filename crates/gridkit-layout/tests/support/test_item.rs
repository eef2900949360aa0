//! TestItem - scriptable fake host item.

use gridkit_layout::{Bounds, ItemSize, LayoutItem, SizeBound, SizeClass};

/// Fake host item with scriptable intrinsic sizes.
///
/// Records every rectangle the engine applies, so tests can assert both the
/// final geometry and the exactly-once `apply_bounds` contract.
pub struct TestItem {
    min: ItemSize,
    pref: ItemSize,
    max: ItemSize,
    applied: Vec<Bounds>,
}

impl TestItem {
    /// Item with distinct minimum / preferred / maximum sizes.
    pub fn new(min: (u32, u32), pref: (u32, u32), max: (u32, u32)) -> Self {
        Self {
            min: ItemSize::px(min.0, min.1),
            pref: ItemSize::px(pref.0, pref.1),
            max: ItemSize::px(max.0, max.1),
            applied: Vec::new(),
        }
    }

    /// Item reporting the same size for every class.
    pub fn rigid(width: u32, height: u32) -> Self {
        Self::new((width, height), (width, height), (width, height))
    }

    /// Item whose maximum is unbounded in both directions.
    pub fn stretchy(min: (u32, u32), pref: (u32, u32)) -> Self {
        Self {
            min: ItemSize::px(min.0, min.1),
            pref: ItemSize::px(pref.0, pref.1),
            max: ItemSize::new(SizeBound::Unbounded, SizeBound::Unbounded),
            applied: Vec::new(),
        }
    }

    /// The most recent rectangle the engine applied.
    pub fn bounds(&self) -> Bounds {
        *self
            .applied
            .last()
            .expect("no layout pass has placed this item yet")
    }

    /// How many times `apply_bounds` ran.
    pub fn apply_count(&self) -> usize {
        self.applied.len()
    }
}

impl LayoutItem for TestItem {
    fn intrinsic_width(&self, class: SizeClass) -> SizeBound {
        self.intrinsic_size(class).width
    }

    fn intrinsic_height(&self, class: SizeClass) -> SizeBound {
        self.intrinsic_size(class).height
    }

    fn intrinsic_size(&self, class: SizeClass) -> ItemSize {
        match class {
            SizeClass::Minimum => self.min,
            SizeClass::Preferred => self.pref,
            SizeClass::Maximum => self.max,
        }
    }

    fn apply_bounds(&mut self, bounds: Bounds) {
        self.applied.push(bounds);
    }
}
