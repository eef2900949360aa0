//! Per-axis block constraints.
//!
//! An axis (the column set or the row set) is described by a finite explicit
//! prefix of [`AxisBlock`]s plus a cyclic repeating tail used once the prefix
//! runs out. The tail covers grids whose outer rows or columns are fixed
//! while the middle repeats a pattern; the common "everything grows"
//! default is just an empty prefix with a single `[0, grow]` tail entry.

use crate::{Axis, LayoutError, SizeBound, MAX_SIZE};

/// Size constraint for a single row or column.
///
/// `min` and `max` bound the block's final size. An `Unbounded` minimum acts
/// as 0; an `Unbounded` maximum never refuses growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBlock {
    min: SizeBound,
    max: SizeBound,
}

impl AxisBlock {
    /// Validated constructor: a bounded maximum below a bounded minimum is
    /// rejected with [`LayoutError::InvalidBlock`].
    pub fn new(min: SizeBound, max: SizeBound) -> Result<Self, LayoutError> {
        if let (SizeBound::Px(lo), SizeBound::Px(hi)) = (min, max) {
            if hi < lo {
                return Err(LayoutError::InvalidBlock { min: lo, max: hi });
            }
        }
        Ok(Self { min, max })
    }

    /// Block pinned to exactly `px`.
    pub fn fixed(px: u32) -> Self {
        Self {
            min: SizeBound::Px(px),
            max: SizeBound::Px(px),
        }
    }

    /// Fully dynamic block: no minimum, no maximum.
    pub fn grow() -> Self {
        Self {
            min: SizeBound::Unbounded,
            max: SizeBound::Unbounded,
        }
    }

    pub fn min(&self) -> SizeBound {
        self.min
    }

    pub fn max(&self) -> SizeBound {
        self.max
    }

    /// Minimum in pixels; an unbounded minimum is 0.
    pub(crate) fn min_px(&self) -> u32 {
        match self.min {
            SizeBound::Px(v) => v.min(MAX_SIZE),
            SizeBound::Unbounded => 0,
        }
    }

    /// Maximum in pixels, saturated to [`MAX_SIZE`].
    pub(crate) fn max_px(&self) -> u32 {
        self.max.to_px()
    }
}

/// One axis of the grid: explicit blocks, repeating tail and inter-block
/// gap.
#[derive(Debug, Clone)]
pub struct AxisSpec {
    axis: Axis,
    explicit: Vec<AxisBlock>,
    repeating: Vec<AxisBlock>,
    gap: u32,
}

impl AxisSpec {
    /// Default axis: no explicit blocks, every index resolving to
    /// `[0, grow]`, no gap.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            explicit: Vec::new(),
            repeating: vec![AxisBlock::grow()],
            gap: 0,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Replace both block lists wholesale.
    pub fn set_blocks(&mut self, explicit: Vec<AxisBlock>, repeating: Vec<AxisBlock>) {
        self.explicit = explicit;
        self.repeating = repeating;
    }

    pub fn blocks(&self) -> (&[AxisBlock], &[AxisBlock]) {
        (&self.explicit, &self.repeating)
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    pub fn set_gap(&mut self, gap: u32) {
        self.gap = gap;
    }

    /// Resolve the constraint for block `index` in O(1).
    ///
    /// Indices past the explicit prefix wrap around the repeating tail;
    /// with an empty tail such an index has no constraint and resolution
    /// fails with [`LayoutError::AxisExhausted`].
    pub fn resolve(&self, index: usize) -> Result<AxisBlock, LayoutError> {
        if let Some(block) = self.explicit.get(index) {
            return Ok(*block);
        }
        if self.repeating.is_empty() {
            return Err(LayoutError::AxisExhausted {
                axis: self.axis,
                index,
            });
        }
        Ok(self.repeating[(index - self.explicit.len()) % self.repeating.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_rejects_inverted_bounds() {
        let err = AxisBlock::new(SizeBound::Px(30), SizeBound::Px(10)).unwrap_err();
        assert_eq!(err, LayoutError::InvalidBlock { min: 30, max: 10 });
    }

    #[test]
    fn test_block_accepts_unbounded_max() {
        let block = AxisBlock::new(SizeBound::Px(30), SizeBound::Unbounded).unwrap();
        assert_eq!(block.min_px(), 30);
        assert_eq!(block.max_px(), MAX_SIZE);
    }

    #[test]
    fn test_fixed_block_pins_both_bounds() {
        let block = AxisBlock::fixed(25);
        assert_eq!(block.min(), SizeBound::Px(25));
        assert_eq!(block.max(), SizeBound::Px(25));
    }

    #[test]
    fn test_grow_block_is_fully_dynamic() {
        let block = AxisBlock::grow();
        assert_eq!(block.min_px(), 0);
        assert_eq!(block.max_px(), MAX_SIZE);
    }

    #[test]
    fn test_bounds_saturate_at_max_size() {
        let block = AxisBlock::fixed(u32::MAX);
        assert_eq!(block.min_px(), MAX_SIZE);
        assert_eq!(block.max_px(), MAX_SIZE);
    }

    #[test]
    fn test_resolve_prefers_explicit_prefix() {
        let mut spec = AxisSpec::new(Axis::X);
        spec.set_blocks(vec![AxisBlock::fixed(10)], vec![AxisBlock::fixed(99)]);
        assert_eq!(spec.resolve(0).unwrap(), AxisBlock::fixed(10));
        assert_eq!(spec.resolve(1).unwrap(), AxisBlock::fixed(99));
    }

    #[test]
    fn test_resolve_wraps_repeating_tail() {
        let mut spec = AxisSpec::new(Axis::Y);
        spec.set_blocks(
            vec![AxisBlock::fixed(1)],
            vec![AxisBlock::fixed(2), AxisBlock::fixed(3)],
        );
        assert_eq!(spec.resolve(1).unwrap(), AxisBlock::fixed(2));
        assert_eq!(spec.resolve(2).unwrap(), AxisBlock::fixed(3));
        assert_eq!(spec.resolve(3).unwrap(), AxisBlock::fixed(2));
        assert_eq!(spec.resolve(42).unwrap(), AxisBlock::fixed(3));
    }

    #[test]
    fn test_resolve_fails_past_empty_tail() {
        let mut spec = AxisSpec::new(Axis::X);
        spec.set_blocks(vec![AxisBlock::fixed(10)], Vec::new());
        assert!(spec.resolve(0).is_ok());
        assert_eq!(
            spec.resolve(2).unwrap_err(),
            LayoutError::AxisExhausted {
                axis: Axis::X,
                index: 2
            }
        );
    }

    #[test]
    fn test_default_axis_always_resolves() {
        let spec = AxisSpec::new(Axis::X);
        assert_eq!(spec.resolve(123).unwrap(), AxisBlock::grow());
    }
}
