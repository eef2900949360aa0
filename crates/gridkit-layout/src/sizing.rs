//! Pass-local cell size tables.
//!
//! Every `measure`/`layout` call rebuilds a dense table of per-cell sizes
//! for the size classes that pass needs: single-cell items seed their own
//! cell (largest occupant wins), then multi-cell items spread their sizes
//! over the blocks they span. The table never outlives the pass.

use tracing::trace;

use crate::axis::{AxisBlock, AxisSpec};
use crate::distribute::{grow_line, shrink_line};
use crate::{Axis, LayoutError, LayoutItem, Registered, SizeClass, MAX_SIZE};

/// Upper bound on size classes computed in one pass.
const MAX_CLASSES: usize = 3;

/// Per-cell slot values; `None` marks a slot no item has touched yet.
#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    width: [Option<u32>; MAX_CLASSES],
    height: [Option<u32>; MAX_CLASSES],
}

/// Dense row-major table of per-cell sizes for one pass.
///
/// Slot `i` holds the values for `classes[i]`; only the classes the pass
/// asked for are ever computed.
#[derive(Debug)]
pub(crate) struct SizeGrid {
    cols: usize,
    rows: usize,
    classes: Vec<SizeClass>,
    cells: Vec<Cell>,
}

impl SizeGrid {
    /// Build the table for `classes`.
    ///
    /// The grid spans `(max col + col_span) × (max row + row_span)` over all
    /// placements. Returns `None` when no items are registered. Items are
    /// processed in registration order: single-cell occupants first (their
    /// sizes seed the cells), multi-cell spans second.
    pub(crate) fn build<I: LayoutItem>(
        items: &[Registered<I>],
        x_axis: &AxisSpec,
        y_axis: &AxisSpec,
        classes: &[SizeClass],
    ) -> Result<Option<Self>, LayoutError> {
        let mut cols = 0usize;
        let mut rows = 0usize;
        for reg in items {
            let p = &reg.placement;
            cols = cols.max(p.col as usize + p.col_span as usize);
            rows = rows.max(p.row as usize + p.row_span as usize);
        }
        if cols == 0 || rows == 0 {
            return Ok(None);
        }
        trace!(cols, rows, ?classes, "building size table");
        let mut grid = Self {
            cols,
            rows,
            classes: classes.to_vec(),
            cells: vec![Cell::default(); cols * rows],
        };
        for reg in items {
            if reg.placement.col_span == 1 && reg.placement.row_span == 1 {
                grid.aggregate_cell(reg, x_axis, y_axis)?;
            }
        }
        for reg in items {
            if reg.placement.col_span != 1 || reg.placement.row_span != 1 {
                grid.spread_span(reg, x_axis, y_axis)?;
            }
        }
        Ok(Some(grid))
    }

    /// Number of blocks along `axis`.
    pub(crate) fn axis_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.cols,
            Axis::Y => self.rows,
        }
    }

    /// Collapse one block's cells (the perpendicular run) to a scalar.
    ///
    /// Minimum and preferred values take the largest settled cell, with
    /// untouched cells counting zero; maximum values take the smallest, an
    /// untouched cell imposing no cap at all.
    pub(crate) fn collapse(&self, axis: Axis, index: usize, class: SizeClass) -> u32 {
        let slot = self.slot(class);
        let values = self.line_values(axis, index, slot);
        match class {
            SizeClass::Maximum => values
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(MAX_SIZE),
            _ => values
                .into_iter()
                .map(|v| v.unwrap_or(0))
                .max()
                .unwrap_or(0),
        }
    }

    fn line_values(&self, axis: Axis, index: usize, slot: usize) -> Vec<Option<u32>> {
        match axis {
            Axis::X => (0..self.rows)
                .map(|row| self.cells[row * self.cols + index].width[slot])
                .collect(),
            Axis::Y => (0..self.cols)
                .map(|col| self.cells[index * self.cols + col].height[slot])
                .collect(),
        }
    }

    fn slot(&self, class: SizeClass) -> usize {
        self.classes
            .iter()
            .position(|c| *c == class)
            .expect("size class was not computed in this pass")
    }

    /// Fold a 1×1 item into its cell: largest width and height win, per
    /// class independently.
    fn aggregate_cell<I: LayoutItem>(
        &mut self,
        reg: &Registered<I>,
        x_axis: &AxisSpec,
        y_axis: &AxisSpec,
    ) -> Result<(), LayoutError> {
        let col = reg.placement.col as usize;
        let row = reg.placement.row as usize;
        for slot in 0..self.classes.len() {
            let class = self.classes[slot];
            let (w, h) = inflated_size(&reg.item, class, x_axis, y_axis)?;
            let cell = &mut self.cells[row * self.cols + col];
            cell.width[slot] = Some(cell.width[slot].map_or(w, |v| v.max(w)));
            cell.height[slot] = Some(cell.height[slot].map_or(h, |v| v.max(h)));
        }
        Ok(())
    }

    /// Distribute a multi-cell item's sizes over its span, independently
    /// for every covered row (widths) and column (heights).
    fn spread_span<I: LayoutItem>(
        &mut self,
        reg: &Registered<I>,
        x_axis: &AxisSpec,
        y_axis: &AxisSpec,
    ) -> Result<(), LayoutError> {
        let p = &reg.placement;
        for slot in 0..self.classes.len() {
            let class = self.classes[slot];
            let (w, h) = inflated_size(&reg.item, class, x_axis, y_axis)?;
            for row in p.row as usize..(p.row as usize + p.row_span as usize) {
                self.spread_width(slot, class, row, p.col as usize, p.col_span as usize, w, x_axis)?;
            }
            for col in p.col as usize..(p.col as usize + p.col_span as usize) {
                self.spread_height(slot, class, col, p.row as usize, p.row_span as usize, h, y_axis)?;
            }
        }
        Ok(())
    }

    fn spread_width(
        &mut self,
        slot: usize,
        class: SizeClass,
        row: usize,
        col: usize,
        span: usize,
        target: u32,
        axis: &AxisSpec,
    ) -> Result<(), LayoutError> {
        let mut line: Vec<Option<u32>> = (0..span)
            .map(|i| self.cells[row * self.cols + col + i].width[slot])
            .collect();
        let mut rules = Vec::with_capacity(span);
        for i in 0..span {
            rules.push(axis.resolve(col + i)?);
        }
        spread(&mut line, &rules, class, target);
        for (i, value) in line.into_iter().enumerate() {
            self.cells[row * self.cols + col + i].width[slot] = value;
        }
        Ok(())
    }

    fn spread_height(
        &mut self,
        slot: usize,
        class: SizeClass,
        col: usize,
        row: usize,
        span: usize,
        target: u32,
        axis: &AxisSpec,
    ) -> Result<(), LayoutError> {
        let mut line: Vec<Option<u32>> = (0..span)
            .map(|i| self.cells[(row + i) * self.cols + col].height[slot])
            .collect();
        let mut rules = Vec::with_capacity(span);
        for i in 0..span {
            rules.push(axis.resolve(row + i)?);
        }
        spread(&mut line, &rules, class, target);
        for (i, value) in line.into_iter().enumerate() {
            self.cells[(row + i) * self.cols + col].height[slot] = value;
        }
        Ok(())
    }
}

fn spread(line: &mut [Option<u32>], rules: &[AxisBlock], class: SizeClass, target: u32) {
    match class {
        SizeClass::Maximum => shrink_line(line, rules, target),
        SizeClass::Minimum | SizeClass::Preferred => grow_line(line, rules, target),
    }
}

/// Query one intrinsic size and fold the inter-block gaps into it (once per
/// item, not per spanned block).
///
/// Minimum sizes must stay representable, so overflow is an error there;
/// the other classes saturate at [`MAX_SIZE`].
fn inflated_size<I: LayoutItem>(
    item: &I,
    class: SizeClass,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
) -> Result<(u32, u32), LayoutError> {
    let size = item.intrinsic_size(class);
    let w = inflate(size.width.to_px(), x_axis.gap(), class, Axis::X)?;
    let h = inflate(size.height.to_px(), y_axis.gap(), class, Axis::Y)?;
    Ok((w, h))
}

fn inflate(px: u32, gap: u32, class: SizeClass, axis: Axis) -> Result<u32, LayoutError> {
    match px.checked_add(gap) {
        Some(v) if v <= MAX_SIZE => Ok(v),
        _ if class == SizeClass::Minimum => Err(LayoutError::SizeOverflow { axis }),
        _ => Ok(MAX_SIZE),
    }
}
