//! Addressable 2D grids of cells

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Cell, Rect, Region};

/// A rectangular grid of [`Cell`]s with a position in its parent's frame.
///
/// Point access uses local coordinates. Storage covers `local_bounds()`; a fixed
/// grid's storage is `(0, 0, width, height)`. Reads outside the storage return
/// [`Cell::EMPTY`]. Writes outside it are dropped, unless the grid is growable, in
/// which case the storage grows to include the written cell. Growable grids back
/// the private accumulators of paint transactions and the layers of infinite maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    x: i32,
    y: i32,
    area: Rect,
    growable: bool,
    cells: Vec<Cell>,
}

impl TileGrid {
    /// Create an all-empty fixed-size grid at `(x, y)`
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        let area = Rect::new(0, 0, width.max(0), height.max(0));
        Self {
            x,
            y,
            area,
            growable: false,
            cells: vec![Cell::EMPTY; area.width as usize * area.height as usize],
        }
    }

    /// Create a fixed-size grid with every cell set to `cell`
    pub fn filled(x: i32, y: i32, width: i32, height: i32, cell: Cell) -> Self {
        let mut grid = Self::new(x, y, width, height);
        grid.cells.fill(cell);
        grid
    }

    /// An empty growable grid at the origin, used as an accumulation buffer
    pub fn buffer() -> Self {
        Self {
            x: 0,
            y: 0,
            area: Rect::default(),
            growable: true,
            cells: Vec::new(),
        }
    }

    /// Turn this grid into a growable one, keeping its content
    pub fn into_growable(mut self) -> Self {
        self.growable = true;
        self
    }

    pub fn is_growable(&self) -> bool {
        self.growable
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn width(&self) -> i32 {
        self.area.width
    }

    pub fn height(&self) -> i32 {
        self.area.height
    }

    /// Storage extent in local coordinates
    pub fn local_bounds(&self) -> Rect {
        self.area
    }

    /// Storage extent in the parent frame
    pub fn bounds(&self) -> Rect {
        self.area.translated(self.x, self.y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.area.contains(x, y) {
            return None;
        }
        let col = (x - self.area.x) as usize;
        let row = (y - self.area.y) as usize;
        Some(row * self.area.width as usize + col)
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.index(x, y)
            .map(|idx| self.cells[idx])
            .unwrap_or(Cell::EMPTY)
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
            return;
        }
        // Empty cells outside the storage already read as empty.
        if self.growable && !cell.is_empty() {
            self.grow_to(Rect::new(x, y, 1, 1));
            if let Some(idx) = self.index(x, y) {
                self.cells[idx] = cell;
            }
        }
    }

    /// Copy `source` into this grid over `region`.
    ///
    /// `region` is in this grid's local frame; the cell written at `(cx, cy)` is
    /// read from `source` at `(cx - x, cy - y)`. Parts of `region` outside a fixed
    /// grid are clipped.
    pub fn set_cells(&mut self, x: i32, y: i32, source: &TileGrid, region: &Region) {
        if region.is_empty() {
            return;
        }
        let clipped;
        let region = if self.growable {
            self.grow_to(region.bounding_rect());
            region
        } else {
            clipped = region.intersected(&Region::from_rect(self.area));
            &clipped
        };

        for rect in region.rects() {
            for cy in rect.y..rect.bottom() {
                for cx in rect.x..rect.right() {
                    self.set_cell(cx, cy, source.cell_at(cx - x, cy - y));
                }
            }
        }
    }

    /// Fill every cell of `region` (local frame) with `cell`
    pub fn fill(&mut self, region: &Region, cell: Cell) {
        for (x, y) in region.cells() {
            self.set_cell(x, y, cell);
        }
    }

    /// Copy the cells of `region` (local frame) into a new fixed grid the size of
    /// the region's bounding rectangle. Cells outside `region` stay empty.
    pub fn copy(&self, region: &Region) -> TileGrid {
        let bounds = region.bounding_rect();
        let mut copy = TileGrid::new(0, 0, bounds.width, bounds.height);
        for (x, y) in region.cells() {
            copy.set_cell(x - bounds.x, y - bounds.y, self.cell_at(x, y));
        }
        copy
    }

    /// Local coordinates where this grid and `other` hold different cells,
    /// restricted to the overlap of their storage.
    pub fn compute_diff_region(&self, other: &TileGrid) -> Region {
        let overlap = self.area.intersected(&other.area);
        let mut rows: Vec<Rect> = Vec::new();

        for y in overlap.y..overlap.bottom() {
            let mut run_start: Option<i32> = None;
            for x in overlap.x..overlap.right() {
                let differs = self.cell_at(x, y) != other.cell_at(x, y);
                match (differs, run_start) {
                    (true, None) => run_start = Some(x),
                    (false, Some(start)) => {
                        rows.push(Rect::new(start, y, x - start, 1));
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                rows.push(Rect::new(start, y, overlap.right() - start, 1));
            }
        }
        Region::from_rects(rows)
    }

    /// Non-empty cells, in the parent frame
    pub fn region(&self) -> Region {
        let mut rows: Vec<Rect> = Vec::new();
        let area = self.area;
        for y in area.y..area.bottom() {
            let mut run_start: Option<i32> = None;
            for x in area.x..area.right() {
                match (self.cell_at(x, y).is_empty(), run_start) {
                    (false, None) => run_start = Some(x),
                    (true, Some(start)) => {
                        rows.push(Rect::new(start, y, x - start, 1));
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                rows.push(Rect::new(start, y, area.right() - start, 1));
            }
        }
        Region::from_rects(rows).translated(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Change the storage size, keeping the cells that still fit
    pub fn resize(&mut self, width: i32, height: i32) {
        let area = Rect::new(self.area.x, self.area.y, width.max(0), height.max(0));
        self.reallocate(area);
    }

    /// Tilesets referenced by any cell
    pub fn used_tilesets(&self) -> BTreeSet<Uuid> {
        self.cells.iter().filter_map(|c| c.tileset_id).collect()
    }

    pub fn uses_tileset(&self, tileset_id: Uuid) -> bool {
        self.cells.iter().any(|c| c.tileset_id == Some(tileset_id))
    }

    fn grow_to(&mut self, rect: Rect) {
        let area = self.area.united(&rect);
        if area != self.area {
            self.reallocate(area);
        }
    }

    fn reallocate(&mut self, area: Rect) {
        let mut cells = vec![Cell::EMPTY; area.width as usize * area.height as usize];
        let keep = self.area.intersected(&area);
        for y in keep.y..keep.bottom() {
            for x in keep.x..keep.right() {
                let idx = (y - area.y) as usize * area.width as usize + (x - area.x) as usize;
                cells[idx] = self.cell_at(x, y);
            }
        }
        self.area = area;
        self.cells = cells;
    }
}
