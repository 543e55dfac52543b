//! Flex layout: a span-aware grid with grab/fill semantics.
//!
//! Children are placed left to right, top to bottom into a fixed number of
//! columns. Column widths and row heights are resolved from the children's
//! cached sizes, extra space is handed to grabbing columns/rows, and each
//! child is then aligned inside its (possibly spanned) cell.
//!
//! The width and height passes share the same axis-agnostic math
//! (`resolve_tracks`); only the grid traversal differs.
//!
//! Layout never fails. Negative spacing is treated as zero, spans are clamped
//! and a container with zero columns reports a zero size.

use serde::{Deserialize, Serialize};

use crate::primitives::{Point, Rect, Size, Sizes};

use super::data::{Alignment, FlexData};
use super::tree::LayoutTree;

/// Convergence tolerance for distributing space to expanding tracks.
const CONVERGENCE_EPSILON: f32 = 0.01;

/// Upper bound on redistribution passes per axis.
///
/// Each pass either converges or pins at least one track, except when float
/// rounding or spanned re-apportioning keeps the total oscillating.
pub const MAX_CONVERGENCE_PASSES: usize = 64;

/// Grid layout settings for a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flex {
    /// Number of columns. Zero lays nothing out.
    pub columns: usize,
    /// Space between columns.
    pub h_spacing: f32,
    /// Space between rows.
    pub v_spacing: f32,
    /// Placement of the whole grid when it is narrower than the container.
    pub h_align: Alignment,
    /// Placement of the whole grid when it is shorter than the container.
    pub v_align: Alignment,
    /// Force every column to the same width.
    pub equal_columns: bool,
}

impl Default for Flex {
    fn default() -> Self {
        Self {
            columns: 1,
            h_spacing: 4.0,
            v_spacing: 2.0,
            h_align: Alignment::Start,
            v_align: Alignment::Start,
            equal_columns: false,
        }
    }
}

/// A child's data plus the sizes cached for the current pass.
#[derive(Debug, Clone)]
struct Cell<Id> {
    id: Id,
    data: FlexData,
    cache_size: Size,
    min_cache_size: Size,
}

impl<Id: Copy> Cell<Id> {
    fn new(id: Id, data: FlexData) -> Self {
        Self {
            id,
            data: data.normalized(),
            cache_size: Size::ZERO,
            min_cache_size: Size::ZERO,
        }
    }

    /// Recompute the cached sizes from the child's sizer.
    fn compute_cache_size<T>(&mut self, tree: &T, mut hint: Size, use_minimum_size: bool)
    where
        T: LayoutTree<Id = Id>,
    {
        let sizes = tree.sizes(self.id, hint);
        let data = &self.data;

        // Declared minimums win over the child's own.
        self.min_cache_size = Size::new(
            if data.min_size.width > 0.0 { data.min_size.width } else { sizes.min.width },
            if data.min_size.height > 0.0 { data.min_size.height } else { sizes.min.height },
        );
        if hint.width > 0.0 {
            hint.width = hint.width.max(self.min_cache_size.width).min(sizes.max.width);
        }
        if hint.height > 0.0 {
            hint.height = hint.height.max(self.min_cache_size.height).min(sizes.max.height);
        }

        let mut cache = if use_minimum_size {
            let mut min = sizes.min;
            if data.min_size.width > 0.0 {
                min.width = data.min_size.width;
            }
            if data.min_size.height > 0.0 {
                min.height = data.min_size.height;
            }
            min
        } else {
            sizes.pref
        };

        if hint.width > 0.0 {
            cache.width = hint.width;
        }
        if data.min_size.width > 0.0 && cache.width < data.min_size.width {
            cache.width = data.min_size.width;
        }
        if data.size_hint.width > 0.0 {
            cache.width = data.size_hint.width;
        }

        if hint.height > 0.0 {
            cache.height = hint.height;
        }
        if data.min_size.height > 0.0 && cache.height < data.min_size.height {
            cache.height = data.min_size.height;
        }
        if data.size_hint.height > 0.0 {
            cache.height = data.size_hint.height;
        }

        self.cache_size = cache;
    }
}

/// Grid of indices into the pass's cells. A spanning child fills every slot
/// of its span.
type Grid = Vec<Vec<Option<usize>>>;

/// Direction a track pass resolves: columns (widths) or rows (heights).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Scratch state of one layout pass.
#[derive(Debug)]
struct Pass<Id> {
    cells: Vec<Cell<Id>>,
    grid: Grid,
    widths: Vec<f32>,
    heights: Vec<f32>,
}

impl Flex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn h_spacing(mut self, spacing: f32) -> Self {
        self.h_spacing = spacing;
        self
    }

    pub fn v_spacing(mut self, spacing: f32) -> Self {
        self.v_spacing = spacing;
        self
    }

    /// Set both spacings at once.
    pub fn spacing(mut self, h_spacing: f32, v_spacing: f32) -> Self {
        self.h_spacing = h_spacing;
        self.v_spacing = v_spacing;
        self
    }

    pub fn h_align(mut self, align: Alignment) -> Self {
        self.h_align = align;
        self
    }

    pub fn v_align(mut self, align: Alignment) -> Self {
        self.v_align = align;
        self
    }

    pub fn equal_columns(mut self, equal: bool) -> Self {
        self.equal_columns = equal;
        self
    }

    /// Minimum, preferred and maximum sizes of `target` laid out with this
    /// layout. Never moves children.
    pub fn sizes<T: LayoutTree>(&self, tree: &T, target: T::Id, mut hint: Size) -> Sizes {
        let insets = tree.border(target);
        if hint.width != 0.0 {
            hint.width -= insets.width();
        }
        if hint.height != 0.0 {
            hint.height -= insets.height();
        }

        let min = self.measure(tree, target, hint, true) + insets.size();
        let pref = self.measure(tree, target, hint, false) + insets.size();
        Sizes::new(min, pref, pref.grown_to_default_max())
    }

    /// Size and position the children of `target` within its content area.
    pub fn perform_layout<T: LayoutTree>(&self, tree: &mut T, target: T::Id) {
        let insets = tree.border(target);
        let hint = tree.frame_rect(target).inset(insets).size();

        let Some(pass) = self.arrange(&*tree, target, hint, false) else {
            return;
        };
        let total = self.total_size(&pass);

        let mut location = Point::new(insets.left, insets.top);
        if total.width < hint.width {
            location.x += self.h_align.offset(hint.width, total.width);
        }
        if total.height < hint.height {
            location.y += self.v_align.offset(hint.height, total.height);
        }

        tracing::trace!(
            columns = self.columns,
            rows = pass.grid.len(),
            width = total.width,
            height = total.height,
            "flex layout"
        );
        self.position_children(tree, location, &pass);
    }

    fn measure<T: LayoutTree>(&self, tree: &T, target: T::Id, hint: Size, use_minimum_size: bool) -> Size {
        self.arrange(tree, target, hint, use_minimum_size)
            .map(|pass| self.total_size(&pass))
            .unwrap_or(Size::ZERO)
    }

    #[inline]
    fn effective_h_spacing(&self) -> f32 {
        self.h_spacing.max(0.0)
    }

    #[inline]
    fn effective_v_spacing(&self) -> f32 {
        self.v_spacing.max(0.0)
    }

    #[inline]
    fn h_span(&self, data: &FlexData) -> usize {
        data.h_span.clamp(1, self.columns.max(1))
    }

    /// Build the grid and resolve every track. `None` when there is nothing
    /// to lay out.
    fn arrange<T: LayoutTree>(
        &self,
        tree: &T,
        target: T::Id,
        hint: Size,
        use_minimum_size: bool,
    ) -> Option<Pass<T::Id>> {
        if self.columns == 0 {
            return None;
        }
        let children = tree.children_for_layout(target);
        if children.is_empty() {
            return None;
        }

        let mut cells: Vec<Cell<T::Id>> = children
            .into_iter()
            .map(|id| Cell::new(id, tree.layout_data(id)))
            .collect();
        for cell in &mut cells {
            cell.compute_cache_size(tree, Size::ZERO, use_minimum_size);
        }

        let grid = self.build_grid(&cells);
        let widths = self.adjust_column_widths(hint.width, &cells, &grid);
        self.wrap(tree, hint.width, &mut cells, &grid, &widths, use_minimum_size);
        let heights = self.adjust_row_heights(hint.height, &cells, &grid);

        Some(Pass { cells, grid, widths, heights })
    }

    fn total_size<Id>(&self, pass: &Pass<Id>) -> Size {
        let columns = pass.widths.len();
        let rows = pass.heights.len();
        let width: f32 = pass.widths.iter().sum::<f32>()
            + self.effective_h_spacing() * columns.saturating_sub(1) as f32;
        let height: f32 = pass.heights.iter().sum::<f32>()
            + self.effective_v_spacing() * rows.saturating_sub(1) as f32;
        Size::new(width, height)
    }

    /// Greedily place children into the grid, left to right, top to bottom.
    fn build_grid<Id>(&self, cells: &[Cell<Id>]) -> Grid {
        let columns = self.columns;
        let mut grid: Grid = Vec::new();
        let mut row = 0;
        let mut column = 0;
        let mut rows = 0;

        for (index, cell) in cells.iter().enumerate() {
            let h_span = self.h_span(&cell.data);
            let v_span = cell.data.v_span.max(1);

            loop {
                while grid.len() < row + v_span {
                    grid.push(vec![None; columns]);
                }
                while column < columns && grid[row][column].is_some() {
                    column += 1;
                }
                let end = column + h_span;
                if end <= columns {
                    let mut free = column;
                    while free < end && grid[row][free].is_none() {
                        free += 1;
                    }
                    if free == end {
                        break;
                    }
                    column = free;
                }
                if column + h_span >= columns {
                    column = 0;
                    row += 1;
                }
            }

            for slot_row in &mut grid[row..row + v_span] {
                for slot in &mut slot_row[column..column + h_span] {
                    *slot = Some(index);
                }
            }
            rows = rows.max(row + v_span);
            column += h_span;
        }

        grid.truncate(rows);
        grid
    }

    /// The cell whose span ends (bottom-right) at `(row, column)`.
    fn cell_at_span_end<Id>(&self, cells: &[Cell<Id>], grid: &Grid, row: usize, column: usize) -> Option<usize> {
        let index = grid[row][column]?;
        let data = &cells[index].data;
        let first_row = (row + 1).checked_sub(data.v_span.max(1))?;
        let first_column = (column + 1).checked_sub(self.h_span(data))?;
        (grid[first_row][first_column] == Some(index)).then_some(index)
    }

    /// The cell whose span starts (top-left) at `(row, column)`.
    fn cell_at_span_start<Id>(&self, cells: &[Cell<Id>], grid: &Grid, row: usize, column: usize) -> Option<usize> {
        let index = grid[row][column]?;
        let data = &cells[index].data;
        let last_row = row + data.v_span.max(1) - 1;
        let last_column = column + self.h_span(data) - 1;
        if last_row >= grid.len() || last_column >= self.columns {
            return None;
        }
        (grid[last_row][last_column] == Some(index)).then_some(index)
    }

    fn adjust_column_widths<Id>(&self, width: f32, cells: &[Cell<Id>], grid: &Grid) -> Vec<f32> {
        self.resolve_tracks(Axis::Horizontal, width, cells, grid)
    }

    fn adjust_row_heights<Id>(&self, height: f32, cells: &[Cell<Id>], grid: &Grid) -> Vec<f32> {
        self.resolve_tracks(Axis::Vertical, height, cells, grid)
    }

    /// Resolve column widths or row heights for the given available extent.
    fn resolve_tracks<Id>(&self, axis: Axis, hint: f32, cells: &[Cell<Id>], grid: &Grid) -> Vec<f32> {
        let tracks = TrackView { flex: self, axis, cells, grid };
        let slot_count = tracks.slot_count();
        let cross_count = tracks.cross_count();
        let spacing = tracks.spacing();
        let available = hint - spacing * slot_count.saturating_sub(1) as f32;

        let mut expand_count = 0;
        let mut values = vec![0.0f32; slot_count];
        let mut min_values = vec![0.0f32; slot_count];
        let mut expand = vec![false; slot_count];

        for slot in 0..slot_count {
            // Unspanned items define the natural track size.
            for cross in 0..cross_count {
                let Some(cell) = tracks.cell(slot, cross) else { continue };
                if tracks.span(cell) != 1 {
                    continue;
                }
                values[slot] = values[slot].max(tracks.extent(cell));
                if tracks.grab(cell) {
                    if !expand[slot] {
                        expand_count += 1;
                    }
                    expand[slot] = true;
                }
                min_values[slot] = min_values[slot].max(tracks.minimum_extent(cell));
            }

            // Spanned items grow the tracks they cover.
            for cross in 0..cross_count {
                let Some(cell) = tracks.cell(slot, cross) else { continue };
                let span = tracks.span(cell);
                if span <= 1 {
                    continue;
                }
                let span_value: f32 = (0..span).map(|k| values[slot - k]).sum();
                let span_min: f32 = (0..span).map(|k| min_values[slot - k]).sum();
                let span_expand = (0..span).filter(|k| expand[slot - k]).count();
                if tracks.grab(cell) && span_expand == 0 {
                    expand_count += 1;
                    expand[slot] = true;
                }

                let inner_spacing = (span - 1) as f32 * spacing;
                let extra = tracks.extent(cell) - span_value - inner_spacing;
                if extra > 0.0 {
                    if self.equal_columns && axis == Axis::Horizontal {
                        let equal = (extra + span_value) / span as f32;
                        for k in 0..span {
                            values[slot - k] = values[slot - k].max(equal);
                        }
                    } else {
                        apportion_extra(extra, slot, span_expand, span, &expand, &mut values);
                    }
                }

                let extra = tracks.minimum_extent(cell) - span_min - inner_spacing;
                if extra > 0.0 {
                    apportion_extra(extra, slot, span_expand, span, &expand, &mut min_values);
                }
            }
        }

        if self.equal_columns && axis == Axis::Horizontal {
            let min_track = min_values.iter().copied().fold(0.0f32, f32::max);
            let mut track = values.iter().copied().fold(0.0f32, f32::max);
            if hint > 0.0 && expand_count > 0 {
                track = min_track.max(available / slot_count as f32);
            }
            for slot in 0..slot_count {
                expand[slot] = expand_count > 0;
                values[slot] = track;
            }
        } else if hint > 0.0 && expand_count > 0 {
            self.converge(
                &tracks,
                available,
                expand_count,
                &mut values,
                &min_values,
                &mut expand,
                MAX_CONVERGENCE_PASSES,
            );
        }

        values
    }

    /// Repeatedly hand `available - total` to the expanding tracks until the
    /// total matches, pinning tracks that would drop below their minimum.
    fn converge<Id>(
        &self,
        tracks: &TrackView<'_, Id>,
        available: f32,
        mut count: usize,
        values: &mut [f32],
        min_values: &[f32],
        expand: &mut [bool],
        max_passes: usize,
    ) {
        let spacing = tracks.spacing();
        let mut total: f32 = values.iter().sum();
        let mut passes = 0;

        while (total - available).abs() > CONVERGENCE_EPSILON {
            if passes == max_passes {
                tracing::debug!(
                    axis = ?tracks.axis,
                    total,
                    available,
                    "flex track distribution did not converge"
                );
                break;
            }
            passes += 1;

            let delta = (available - total) / count as f32;
            for slot in 0..values.len() {
                if !expand[slot] {
                    continue;
                }
                if values[slot] + delta > min_values[slot] {
                    values[slot] += delta;
                } else {
                    values[slot] = min_values[slot];
                    expand[slot] = false;
                    count -= 1;
                }
            }

            // Pinning may have starved spanned items; give them back their minimum.
            for slot in 0..values.len() {
                for cross in 0..tracks.cross_count() {
                    let Some(cell) = tracks.cell(slot, cross) else { continue };
                    let span = tracks.span(cell);
                    if span <= 1 {
                        continue;
                    }
                    let minimum = tracks.minimum_extent(cell);
                    let span_value: f32 = (0..span).map(|k| values[slot - k]).sum();
                    let span_expand = (0..span).filter(|k| expand[slot - k]).count();
                    let extra = minimum - span_value - (span - 1) as f32 * spacing;
                    if extra > 0.0 {
                        apportion_extra(extra, slot, span_expand, span, expand, values);
                    }
                }
            }

            if count == 0 {
                break;
            }
            total = values.iter().sum();
        }
    }

    /// Re-measure children whose width changed so wrapping content can
    /// report its height for the final width.
    fn wrap<T: LayoutTree>(
        &self,
        tree: &T,
        width: f32,
        cells: &mut [Cell<T::Id>],
        grid: &Grid,
        widths: &[f32],
        use_minimum_size: bool,
    ) {
        if width <= 0.0 {
            return;
        }
        let h_spacing = self.effective_h_spacing();

        for column in 0..self.columns {
            for row in 0..grid.len() {
                let Some(index) = self.cell_at_span_end(cells, grid, row, column) else { continue };
                let cell = &mut cells[index];
                if cell.data.size_hint.height >= 1.0 {
                    continue;
                }

                let h_span = self.h_span(&cell.data);
                let current: f32 = (0..h_span).map(|k| widths[column - k]).sum::<f32>()
                    + (h_span - 1) as f32 * h_spacing;
                let fills = cell.data.h_align == Alignment::Fill;
                if (current != cell.cache_size.width && fills) || cell.cache_size.width > current {
                    let hint = Size::new(cell.min_cache_size.width.max(current), 0.0);
                    cell.compute_cache_size(tree, hint, use_minimum_size);
                    let minimum_height = cell.data.min_size.height;
                    if cell.data.v_grab && minimum_height > 0.0 && cell.cache_size.height < minimum_height {
                        cell.cache_size.height = minimum_height;
                    }
                }
            }
        }
    }

    fn position_children<T: LayoutTree>(&self, tree: &mut T, location: Point, pass: &Pass<T::Id>) {
        let h_spacing = self.effective_h_spacing();
        let v_spacing = self.effective_v_spacing();

        let mut grid_y = location.y;
        for (row, height) in pass.heights.iter().enumerate() {
            let mut grid_x = location.x;
            for (column, width) in pass.widths.iter().enumerate() {
                if let Some(index) = self.cell_at_span_start(&pass.cells, &pass.grid, row, column) {
                    let cell = &pass.cells[index];
                    let h_span = self.h_span(&cell.data);
                    let v_span = cell.data.v_span.max(1);

                    let cell_width = pass.widths[column..column + h_span].iter().sum::<f32>()
                        + h_spacing * (h_span - 1) as f32;
                    let cell_height = pass.heights[row..row + v_span].iter().sum::<f32>()
                        + v_spacing * (v_span - 1) as f32;

                    let (x, child_width) = place(cell.data.h_align, grid_x, cell_width, cell.cache_size.width);
                    let (y, child_height) = place(cell.data.v_align, grid_y, cell_height, cell.cache_size.height);
                    tree.set_frame_rect(cell.id, Rect::new(x, y, child_width, child_height));
                }
                grid_x += width + h_spacing;
            }
            grid_y += height + v_spacing;
        }
    }
}

/// Position and extent of a child of `preferred` extent aligned in a cell.
fn place(align: Alignment, origin: f32, cell: f32, preferred: f32) -> (f32, f32) {
    if align == Alignment::Fill {
        return (origin, cell);
    }
    let extent = preferred.min(cell);
    (origin + align.offset(cell, extent), extent)
}

/// Distribute `extra` across the span ending at `base` (slots `base`,
/// `base - 1`, ... `base - span + 1`).
///
/// With no expanding slot in the span everything lands on `base`. Otherwise
/// the whole units of `extra` are split evenly over the `count` expanding
/// slots and the remainder is handed out one unit at a time, in span order,
/// so repeated layouts produce identical pixels.
pub fn apportion_extra(extra: f32, base: usize, count: usize, span: usize, expand: &[bool], values: &mut [f32]) {
    let eligible: Vec<usize> = (0..span)
        .filter_map(|i| base.checked_sub(i))
        .filter(|&slot| expand[slot])
        .collect();
    if count == 0 || eligible.is_empty() {
        values[base] += extra;
        return;
    }

    let whole = extra.floor() as i64;
    let delta = whole / count as i64;
    let remainder = (whole - delta * count as i64) as usize;
    for &slot in &eligible {
        values[slot] += delta as f32;
    }
    for &slot in eligible.iter().cycle().take(remainder) {
        values[slot] += 1.0;
    }
}

/// Axis-specific view over a pass: maps (slot, cross) to grid coordinates and
/// picks the width or height components of a cell.
struct TrackView<'a, Id> {
    flex: &'a Flex,
    axis: Axis,
    cells: &'a [Cell<Id>],
    grid: &'a Grid,
}

impl<'a, Id> TrackView<'a, Id> {
    fn slot_count(&self) -> usize {
        match self.axis {
            Axis::Horizontal => self.flex.columns,
            Axis::Vertical => self.grid.len(),
        }
    }

    fn cross_count(&self) -> usize {
        match self.axis {
            Axis::Horizontal => self.grid.len(),
            Axis::Vertical => self.flex.columns,
        }
    }

    fn spacing(&self) -> f32 {
        match self.axis {
            Axis::Horizontal => self.flex.effective_h_spacing(),
            Axis::Vertical => self.flex.effective_v_spacing(),
        }
    }

    /// The cell ending at this slot, if any.
    fn cell(&self, slot: usize, cross: usize) -> Option<&'a Cell<Id>> {
        let (row, column) = match self.axis {
            Axis::Horizontal => (cross, slot),
            Axis::Vertical => (slot, cross),
        };
        self.flex
            .cell_at_span_end(self.cells, self.grid, row, column)
            .map(|index| &self.cells[index])
    }

    fn span(&self, cell: &Cell<Id>) -> usize {
        match self.axis {
            Axis::Horizontal => self.flex.h_span(&cell.data),
            Axis::Vertical => cell.data.v_span.clamp(1, self.grid.len().max(1)),
        }
    }

    fn grab(&self, cell: &Cell<Id>) -> bool {
        match self.axis {
            Axis::Horizontal => cell.data.h_grab,
            Axis::Vertical => cell.data.v_grab,
        }
    }

    fn extent(&self, cell: &Cell<Id>) -> f32 {
        match self.axis {
            Axis::Horizontal => cell.cache_size.width,
            Axis::Vertical => cell.cache_size.height,
        }
    }

    /// The extent a cell contributes to track minimums: its cached size when
    /// it does not grab, its measured minimum when it does.
    fn minimum_extent(&self, cell: &Cell<Id>) -> f32 {
        if !self.grab(cell) {
            return self.extent(cell);
        }
        match self.axis {
            Axis::Horizontal => cell.min_cache_size.width,
            Axis::Vertical => cell.min_cache_size.height,
        }
    }}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::panel::{fixed_sizer, text_sizer, PanelId, PanelTree};

    fn leaf(tree: &mut PanelTree, parent: PanelId, pref: Size, data: FlexData) -> PanelId {
        let id = tree.add_panel();
        tree.set_sizer(id, fixed_sizer(Sizes::new(pref, pref, pref.grown_to_default_max())))
            .unwrap();
        tree.set_layout_data(id, data).unwrap();
        tree.add_child(parent, id).unwrap();
        id
    }

    /// A leaf that may shrink to nothing.
    fn flexible_leaf(tree: &mut PanelTree, parent: PanelId, pref: Size, data: FlexData) -> PanelId {
        let id = tree.add_panel();
        tree.set_sizer(id, fixed_sizer(Sizes::new(Size::ZERO, pref, pref.grown_to_default_max())))
            .unwrap();
        tree.set_layout_data(id, data).unwrap();
        tree.add_child(parent, id).unwrap();
        id
    }

    fn container(flex: Flex) -> PanelTree {
        let mut tree = PanelTree::new();
        let root = tree.root();
        tree.set_layout(root, Layout::Flex(flex)).unwrap();
        tree
    }

    fn arrange(tree: &PanelTree, flex: &Flex, hint: Size) -> Pass<PanelId> {
        flex.arrange(tree, tree.root(), hint, false).unwrap()
    }

    // -------------------------------------------------------------------------
    // apportion_extra
    // -------------------------------------------------------------------------

    #[test]
    fn test_apportion_no_expanding_slots_goes_to_base() {
        let expand = [false, false, false];
        let mut values = [10.0, 10.0, 10.0];
        apportion_extra(26.5, 2, 0, 3, &expand, &mut values);
        assert_eq!(values, [10.0, 10.0, 36.5]);
    }

    #[test]
    fn test_apportion_even_split() {
        let expand = [true, true];
        let mut values = [0.0, 0.0];
        apportion_extra(26.0, 1, 2, 2, &expand, &mut values);
        assert_eq!(values, [13.0, 13.0]);
    }

    #[test]
    fn test_apportion_remainder_follows_span_order() {
        // Span order starts at base and walks backwards.
        let expand = [true, true, true];
        let mut values = [0.0, 0.0, 0.0];
        apportion_extra(11.7, 2, 3, 3, &expand, &mut values);
        assert_eq!(values, [3.0, 4.0, 4.0]);
        assert_eq!(values.iter().sum::<f32>(), 11.0);
    }

    #[test]
    fn test_apportion_skips_fixed_slots() {
        let expand = [true, false, true, false];
        let mut values = [0.0; 4];
        apportion_extra(5.0, 3, 2, 4, &expand, &mut values);
        assert_eq!(values, [2.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_apportion_is_deterministic() {
        let expand = [true, false, true, true];
        let mut first = [1.0; 4];
        let mut second = [1.0; 4];
        apportion_extra(17.9, 3, 3, 4, &expand, &mut first);
        apportion_extra(17.9, 3, 3, 4, &expand, &mut second);
        assert_eq!(first, second);
        assert_eq!(first.iter().sum::<f32>() - 4.0, 17.0);
    }

    // -------------------------------------------------------------------------
    // build_grid
    // -------------------------------------------------------------------------

    #[test]
    fn test_grid_fills_left_to_right() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        for _ in 0..3 {
            leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        }
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(pass.grid, vec![vec![Some(0), Some(1)], vec![Some(2), None]]);
    }

    #[test]
    fn test_grid_spans_and_skips_occupied_cells() {
        let flex = Flex::new().columns(3);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().v_span(2));
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().h_span(2));
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(
            pass.grid,
            vec![
                vec![Some(0), Some(1), Some(1)],
                vec![Some(0), Some(2), Some(3)],
            ]
        );
    }

    #[test]
    fn test_grid_wraps_span_that_does_not_fit() {
        let flex = Flex::new().columns(3);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().h_span(2));
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(
            pass.grid,
            vec![vec![Some(0), Some(1), None], vec![Some(2), Some(2), None]]
        );
    }

    #[test]
    fn test_grid_clamps_oversized_span() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().h_span(5));
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(pass.grid, vec![vec![Some(0), Some(0)]]);
    }

    // -------------------------------------------------------------------------
    // Column widths / row heights
    // -------------------------------------------------------------------------

    #[test]
    fn test_grab_column_takes_all_extra() {
        let flex = Flex::new().columns(2).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(50.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(100.0, 10.0), FlexData::new().h_grab(true));
        let pass = arrange(&tree, &flex, Size::new(200.0, 0.0));
        assert_eq!(pass.widths, vec![50.0, 150.0]);
    }

    #[test]
    fn test_grab_rows_share_extra_height() {
        let flex = Flex::new().columns(1).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        for _ in 0..3 {
            leaf(&mut tree, root, Size::new(10.0, 20.0), FlexData::new().v_grab(true));
        }
        let pass = arrange(&tree, &flex, Size::new(0.0, 90.0));
        assert_eq!(pass.heights, vec![30.0, 30.0, 30.0]);
    }

    #[test]
    fn test_single_span_width_covers_preferred() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(30.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(70.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(45.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(20.0, 10.0), FlexData::new());
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(pass.widths, vec![45.0, 70.0]);
    }

    #[test]
    fn test_spanned_deficit_lands_on_last_column_without_grab() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(50.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(60.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(140.0, 10.0), FlexData::new().h_span(2));
        let pass = arrange(&tree, &flex, Size::ZERO);
        // 140 - (50 + 60) - 4 = 26
        assert_eq!(pass.widths, vec![50.0, 86.0]);
    }

    #[test]
    fn test_spanned_deficit_split_across_expanding_columns() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(50.0, 10.0), FlexData::new().h_grab(true));
        leaf(&mut tree, root, Size::new(60.0, 10.0), FlexData::new().h_grab(true));
        leaf(&mut tree, root, Size::new(140.0, 10.0), FlexData::new().h_span(2));
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(pass.widths, vec![63.0, 73.0]);
    }

    #[test]
    fn test_equal_columns_share_width() {
        let flex = Flex::new().columns(3).equal_columns(true);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(80.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(30.0, 10.0), FlexData::new());
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(pass.widths, vec![80.0, 80.0, 80.0]);
    }

    #[test]
    fn test_equal_columns_expand_to_hint() {
        let flex = Flex::new().columns(2).spacing(0.0, 0.0).equal_columns(true);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().h_grab(true));
        leaf(&mut tree, root, Size::new(30.0, 10.0), FlexData::new());
        let pass = arrange(&tree, &flex, Size::new(300.0, 0.0));
        assert_eq!(pass.widths, vec![150.0, 150.0]);
    }

    #[test]
    fn test_shrinking_pins_at_minimum() {
        let flex = Flex::new().columns(2).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        flexible_leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().h_grab(true));
        flexible_leaf(&mut tree, root, Size::new(100.0, 10.0), FlexData::new().h_grab(true));
        // Non-grabbing child holds the first column at 40.
        leaf(&mut tree, root, Size::new(40.0, 10.0), FlexData::new());
        let pass = arrange(&tree, &flex, Size::new(60.0, 0.0));
        assert_eq!(pass.widths, vec![40.0, 20.0]);
    }

    #[test]
    fn test_grabbing_column_without_minimum_collapses() {
        let flex = Flex::new().columns(2).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(40.0, 10.0), FlexData::new());
        flexible_leaf(&mut tree, root, Size::new(40.0, 10.0), FlexData::new().h_grab(true));
        let pass = arrange(&tree, &flex, Size::new(20.0, 0.0));
        assert_eq!(pass.widths, vec![40.0, 0.0]);
    }

    #[test]
    fn test_grabbing_column_stops_at_declared_minimum() {
        let flex = Flex::new().columns(2).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(50.0, 10.0), FlexData::new());
        let field = flexible_leaf(
            &mut tree,
            root,
            Size::new(100.0, 10.0),
            FlexData::new()
                .h_grab(true)
                .h_align(Alignment::Fill)
                .min_size(Size::new(80.0, 0.0)),
        );
        let pass = arrange(&tree, &flex, Size::new(60.0, 0.0));
        assert_eq!(pass.widths, vec![50.0, 80.0]);

        tree.set_frame(root, Rect::new(0.0, 0.0, 60.0, 10.0)).unwrap();
        tree.validate_layout(root).unwrap();
        assert_eq!(tree.frame_rect(field), Rect::new(50.0, 0.0, 80.0, 10.0));
    }

    #[test]
    fn test_grabbing_column_stops_at_child_minimum() {
        let flex = Flex::new().columns(1);
        let mut tree = container(flex);
        let root = tree.root();
        // Fixed leaves report their preferred size as their minimum.
        leaf(&mut tree, root, Size::new(70.0, 10.0), FlexData::new().h_grab(true));
        let pass = arrange(&tree, &flex, Size::new(30.0, 0.0));
        assert_eq!(pass.widths, vec![70.0]);
    }

    #[test]
    fn test_grabbing_row_stops_at_declared_minimum() {
        let flex = Flex::new().columns(1).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        flexible_leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().v_grab(true));
        flexible_leaf(
            &mut tree,
            root,
            Size::new(10.0, 10.0),
            FlexData::new().v_grab(true).min_size(Size::new(0.0, 15.0)),
        );
        let pass = arrange(&tree, &flex, Size::new(0.0, 10.0));
        assert_eq!(pass.heights, vec![0.0, 15.0]);
    }

    #[test]
    fn test_shrinking_rows_pin_at_minimum() {
        let flex = Flex::new().columns(2).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        flexible_leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().v_grab(true));
        // Non-grabbing child holds the first row at 40.
        leaf(&mut tree, root, Size::new(10.0, 40.0), FlexData::new());
        flexible_leaf(&mut tree, root, Size::new(10.0, 100.0), FlexData::new().v_grab(true));
        let pass = arrange(&tree, &flex, Size::new(0.0, 60.0));
        assert_eq!(pass.heights, vec![40.0, 20.0]);
    }

    #[test]
    fn test_spanned_height_deficit_lands_on_last_row() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(10.0, 50.0), FlexData::new().v_span(2));
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new());
        let pass = arrange(&tree, &flex, Size::ZERO);
        // 50 - (10 + 10) - 2 = 28
        assert_eq!(pass.heights, vec![10.0, 38.0]);
    }

    #[test]
    fn test_convergence_stops_at_pass_limit() {
        let flex = Flex::new().columns(2).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        flexible_leaf(&mut tree, root, Size::new(10.0, 10.0), FlexData::new().h_grab(true));
        flexible_leaf(&mut tree, root, Size::new(100.0, 10.0), FlexData::new().h_grab(true));
        leaf(&mut tree, root, Size::new(40.0, 10.0), FlexData::new());
        let pass = arrange(&tree, &flex, Size::ZERO);
        assert_eq!(pass.widths, vec![40.0, 100.0]);

        let tracks = TrackView {
            flex: &flex,
            axis: Axis::Horizontal,
            cells: &pass.cells,
            grid: &pass.grid,
        };
        let min_values = [40.0, 0.0];

        // One pass pins the first column; the second would finish shrinking.
        let mut values = pass.widths.clone();
        let mut expand = [true, true];
        flex.converge(&tracks, 60.0, 2, &mut values, &min_values, &mut expand, 1);
        assert_eq!(values, vec![40.0, 60.0]);

        let mut values = pass.widths.clone();
        let mut expand = [true, true];
        flex.converge(&tracks, 60.0, 2, &mut values, &min_values, &mut expand, MAX_CONVERGENCE_PASSES);
        assert_eq!(values, vec![40.0, 20.0]);
    }

    // -------------------------------------------------------------------------
    // wrap
    // -------------------------------------------------------------------------

    #[test]
    fn test_wrapped_grabbing_child_keeps_minimum_height() {
        let flex = Flex::new().columns(1).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        let label = tree.add_panel();
        tree.set_sizer(label, text_sizer(100.0, 10.0, 0.0)).unwrap();
        tree.set_layout_data(
            label,
            FlexData::new()
                .h_grab(true)
                .v_grab(true)
                .h_align(Alignment::Fill)
                .min_size(Size::new(0.0, 25.0)),
        )
        .unwrap();
        tree.add_child(root, label).unwrap();

        // Two lines at width 50 are 20 tall, below the declared 25.
        let pass = arrange(&tree, &flex, Size::new(50.0, 0.0));
        assert_eq!(pass.widths, vec![50.0]);
        assert_eq!(pass.cells[0].cache_size, Size::new(50.0, 25.0));
        assert_eq!(pass.heights, vec![25.0]);
    }

    #[test]
    fn test_wrapped_child_reports_height_at_final_width() {
        let flex = Flex::new().columns(1).spacing(0.0, 0.0);
        let mut tree = container(flex);
        let root = tree.root();
        let label = tree.add_panel();
        tree.set_sizer(label, text_sizer(100.0, 10.0, 0.0)).unwrap();
        tree.set_layout_data(label, FlexData::new().h_grab(true).h_align(Alignment::Fill))
            .unwrap();
        tree.add_child(root, label).unwrap();

        let pass = arrange(&tree, &flex, Size::new(25.0, 0.0));
        assert_eq!(pass.heights, vec![40.0]);
    }

    #[test]
    fn test_convergence_within_epsilon() {
        let flex = Flex::new().columns(3).h_spacing(5.0);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(33.0, 10.0), FlexData::new().h_grab(true));
        leaf(&mut tree, root, Size::new(17.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(21.0, 10.0), FlexData::new().h_grab(true));
        let pass = arrange(&tree, &flex, Size::new(257.0, 0.0));
        let total = pass.widths.iter().sum::<f32>() + 10.0;
        assert!((total - 257.0).abs() <= CONVERGENCE_EPSILON);
        assert_eq!(pass.widths[1], 17.0);
    }

    // -------------------------------------------------------------------------
    // Sizes / positioning
    // -------------------------------------------------------------------------

    #[test]
    fn test_sizes_include_spacing_and_border() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        tree.set_border(root, crate::primitives::Insets::all(3.0)).unwrap();
        leaf(&mut tree, root, Size::new(20.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(30.0, 15.0), FlexData::new());
        leaf(&mut tree, root, Size::new(10.0, 5.0), FlexData::new());

        let sizes = flex.sizes(&tree, root, Size::ZERO);
        // width: 20 + 4 + 30 + 6, height: 15 + 2 + 5 + 6
        assert_eq!(sizes.pref, Size::new(60.0, 28.0));
        assert_eq!(sizes.max, sizes.pref.grown_to_default_max());
    }

    #[test]
    fn test_sizes_are_idempotent() {
        let flex = Flex::new().columns(2);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(20.0, 10.0), FlexData::new().h_grab(true));
        leaf(&mut tree, root, Size::new(30.0, 15.0), FlexData::new().h_span(2));
        let hint = Size::new(120.0, 40.0);
        assert_eq!(flex.sizes(&tree, root, hint), flex.sizes(&tree, root, hint));
    }

    #[test]
    fn test_zero_columns_is_empty() {
        let flex = Flex::new().columns(0);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(20.0, 10.0), FlexData::new());
        assert_eq!(flex.sizes(&tree, root, Size::ZERO).pref, Size::ZERO);
    }

    #[test]
    fn test_negative_spacing_treated_as_zero() {
        let flex = Flex::new().columns(2).spacing(-10.0, -10.0);
        let mut tree = container(flex);
        let root = tree.root();
        leaf(&mut tree, root, Size::new(20.0, 10.0), FlexData::new());
        leaf(&mut tree, root, Size::new(30.0, 10.0), FlexData::new());
        assert_eq!(flex.sizes(&tree, root, Size::ZERO).pref, Size::new(50.0, 10.0));
    }

    #[test]
    fn test_place_alignment() {
        assert_eq!(place(Alignment::Start, 10.0, 100.0, 40.0), (10.0, 40.0));
        assert_eq!(place(Alignment::Middle, 10.0, 100.0, 40.0), (40.0, 40.0));
        assert_eq!(place(Alignment::End, 10.0, 100.0, 40.0), (70.0, 40.0));
        assert_eq!(place(Alignment::Fill, 10.0, 100.0, 40.0), (10.0, 100.0));
        // Clipped to the cell
        assert_eq!(place(Alignment::Start, 0.0, 30.0, 40.0), (0.0, 30.0));
    }
}
