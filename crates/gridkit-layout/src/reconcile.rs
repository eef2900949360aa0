//! Per-axis reconciliation.
//!
//! Collapses the cell table to per-block sizes, clamps them into their
//! axis constraints, turns them into cumulative block edges and, for a
//! layout pass, stretches the axis from its minimum toward its maximum
//! until the available size is met.

use tracing::trace;

use crate::axis::{AxisBlock, AxisSpec};
use crate::distribute::fair_share;
use crate::sizing::SizeGrid;
use crate::{LayoutError, SizeBound, SizeClass, MAX_SIZE};

/// Per-block sizes of `class` along one axis, clamped into the block
/// constraints.
fn block_sizes(
    grid: &SizeGrid,
    spec: &AxisSpec,
    class: SizeClass,
) -> Result<Vec<u32>, LayoutError> {
    let len = grid.axis_len(spec.axis());
    let mut sizes = Vec::with_capacity(len);
    for index in 0..len {
        let rule = spec.resolve(index)?;
        let raw = grid.collapse(spec.axis(), index, class);
        sizes.push(clamp_block(raw, &rule, spec.gap()));
    }
    Ok(sizes)
}

/// Clamp one block value into its constraint.
///
/// Block values carry their trailing gap; the gap floors the value, and a
/// gap above the block's bounded maximum takes precedence over it.
fn clamp_block(raw: u32, rule: &AxisBlock, gap: u32) -> u32 {
    let lo = rule.min_px().max(gap).min(MAX_SIZE);
    let hi = rule.max_px().max(lo);
    raw.clamp(lo, hi)
}

/// Cumulative block edges: `edges[i]` is the leading edge of block `i`,
/// `edges[len]` the total extent. Starts at the leading gap; every entry
/// saturates at [`MAX_SIZE`].
fn edges(sizes: &[u32], gap: u32) -> Vec<u32> {
    let mut edges = Vec::with_capacity(sizes.len() + 1);
    let mut acc = gap.min(MAX_SIZE);
    edges.push(acc);
    for &size in sizes {
        acc = acc.saturating_add(size).min(MAX_SIZE);
        edges.push(acc);
    }
    edges
}

/// Total extent of `class` along `spec`'s axis.
pub(crate) fn axis_total(
    grid: &SizeGrid,
    spec: &AxisSpec,
    class: SizeClass,
) -> Result<u32, LayoutError> {
    let sizes = block_sizes(grid, spec, class)?;
    Ok(edges(&sizes, spec.gap()).last().copied().unwrap_or(0))
}

/// Fit one axis into `available`.
///
/// Every block starts at its minimum; the headroom up to each block's
/// maximum is fair-shared until the available size is met. Below the
/// minimum total the minimum edges stand as they are; items overflow the
/// container rather than shrink further.
pub(crate) fn fit_axis(
    grid: &SizeGrid,
    spec: &AxisSpec,
    available: u32,
) -> Result<Vec<u32>, LayoutError> {
    let mins = block_sizes(grid, spec, SizeClass::Minimum)?;
    let maxs = block_sizes(grid, spec, SizeClass::Maximum)?;
    let min_total = edges(&mins, spec.gap()).last().copied().unwrap_or(0);

    let mut sizes = mins;
    let spare = available.saturating_sub(min_total);
    if spare > 0 {
        let caps: Vec<SizeBound> = sizes
            .iter()
            .zip(&maxs)
            .map(|(&lo, &hi)| SizeBound::Px(hi.saturating_sub(lo)))
            .collect();
        let extra = fair_share(spare, &caps);
        for (size, add) in sizes.iter_mut().zip(extra) {
            *size += add;
        }
    }
    let edges = edges(&sizes, spec.gap());
    trace!(axis = ?spec.axis(), available, ?edges, "fitted axis");
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::Placement;
    use crate::{Axis, Bounds, ItemId, LayoutItem, Registered, SizeBound};

    struct Probe {
        min: u32,
        max: u32,
    }

    impl LayoutItem for Probe {
        fn intrinsic_width(&self, class: SizeClass) -> SizeBound {
            match class {
                SizeClass::Maximum => SizeBound::Px(self.max),
                _ => SizeBound::Px(self.min),
            }
        }

        fn intrinsic_height(&self, _class: SizeClass) -> SizeBound {
            SizeBound::Px(10)
        }

        fn apply_bounds(&mut self, _bounds: Bounds) {}
    }

    fn grid_for(items: &[Registered<Probe>], x: &AxisSpec, y: &AxisSpec) -> SizeGrid {
        SizeGrid::build(items, x, y, &[SizeClass::Minimum, SizeClass::Maximum])
            .unwrap()
            .unwrap()
    }

    fn row(id: u64, col: u32, min: u32, max: u32) -> Registered<Probe> {
        Registered {
            id: ItemId(id),
            item: Probe { min, max },
            placement: Placement::at(col, 0),
        }
    }

    #[test]
    fn test_fit_collapses_to_minimum_when_short() {
        let x = AxisSpec::new(Axis::X);
        let y = AxisSpec::new(Axis::Y);
        let items = vec![row(1, 0, 40, 80), row(2, 1, 40, 80)];
        let grid = grid_for(&items, &x, &y);
        let edges = fit_axis(&grid, &x, 10).unwrap();
        assert_eq!(edges, vec![0, 40, 80]);
    }

    #[test]
    fn test_fit_grows_to_exact_available() {
        let x = AxisSpec::new(Axis::X);
        let y = AxisSpec::new(Axis::Y);
        let items = vec![row(1, 0, 40, 80), row(2, 1, 40, 80)];
        let grid = grid_for(&items, &x, &y);
        let edges = fit_axis(&grid, &x, 120).unwrap();
        assert_eq!(*edges.last().unwrap(), 120);
    }

    #[test]
    fn test_fit_stops_at_bounded_maximum() {
        let x = AxisSpec::new(Axis::X);
        let y = AxisSpec::new(Axis::Y);
        let items = vec![row(1, 0, 40, 60), row(2, 1, 40, 60)];
        let grid = grid_for(&items, &x, &y);
        let edges = fit_axis(&grid, &x, 500).unwrap();
        assert_eq!(edges, vec![0, 60, 120]);
    }

    /// An untouched block has no cap of its own, so it absorbs what the
    /// capped blocks refuse.
    #[test]
    fn test_fit_unbounded_block_absorbs_excess() {
        let x = AxisSpec::new(Axis::X);
        let y = AxisSpec::new(Axis::Y);
        // Column 1 is covered by the table but has no occupant.
        let items = vec![row(1, 0, 40, 60), row(2, 2, 40, 60)];
        let grid = grid_for(&items, &x, &y);
        let edges = fit_axis(&grid, &x, 500).unwrap();
        assert_eq!(*edges.last().unwrap(), 500);
        // Block 1's share: everything the two capped columns cannot take.
        assert_eq!(edges[2] - edges[1], 500 - 60 - 60);
    }

    #[test]
    fn test_axis_minimum_floors_empty_block() {
        let mut x = AxisSpec::new(Axis::X);
        x.set_blocks(
            vec![AxisBlock::new(SizeBound::Px(10), SizeBound::Px(50)).unwrap()],
            vec![AxisBlock::grow()],
        );
        let y = AxisSpec::new(Axis::Y);
        let items = vec![row(1, 0, 5, 5)];
        let grid = grid_for(&items, &x, &y);
        let edges = fit_axis(&grid, &x, 5).unwrap();
        assert_eq!(edges, vec![0, 10]);
    }

    #[test]
    fn test_gap_floors_and_leads_edges() {
        let mut x = AxisSpec::new(Axis::X);
        x.set_gap(5);
        let y = AxisSpec::new(Axis::Y);
        // Column 0 occupied, column 1 empty, column 2 occupied.
        let items = vec![row(1, 0, 20, 20), row(2, 2, 20, 20)];
        let grid = grid_for(&items, &x, &y);
        let edges = fit_axis(&grid, &x, 0).unwrap();
        // Leading gap, then 20+gap blocks with the empty column held at the
        // bare gap.
        assert_eq!(edges, vec![5, 30, 35, 60]);
    }

    #[test]
    fn test_totals_saturate_at_max_size() {
        let x = AxisSpec::new(Axis::X);
        let y = AxisSpec::new(Axis::Y);
        let items = vec![row(1, 0, MAX_SIZE, MAX_SIZE), row(2, 1, MAX_SIZE, MAX_SIZE)];
        let grid = grid_for(&items, &x, &y);
        assert_eq!(axis_total(&grid, &x, SizeClass::Minimum).unwrap(), MAX_SIZE);
    }

    #[test]
    fn test_measure_totals_include_gaps() {
        let mut x = AxisSpec::new(Axis::X);
        x.set_gap(4);
        let y = AxisSpec::new(Axis::Y);
        let items = vec![row(1, 0, 20, 20), row(2, 1, 20, 20)];
        let grid = grid_for(&items, &x, &y);
        // Leading gap + two blocks carrying one trailing gap each.
        assert_eq!(axis_total(&grid, &x, SizeClass::Minimum).unwrap(), 4 + 24 + 24);
    }
}
