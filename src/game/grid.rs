use super::direction::Direction;

/// A tile coordinate on the grid. y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position offset by delta (unwrapped)
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Position one tile over in a direction (unwrapped)
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The flat tile grid with the snake body threaded through it as an implicit
/// singly-linked list.
///
/// Each cell holds either the free sentinel (`None`) or the flat index of
/// the tile immediately *behind* it in the body chain (`Some`, tail-ward).
/// A cell is occupied exactly when it carries a link; the chain's last
/// occupied cell points at a free tile (the tail marker) which terminates
/// every walk. No separate node allocation exists anywhere.
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<usize>>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of an in-range position
    pub fn index_of(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos), "position out of range: {pos:?}");
        pos.y as usize * self.width + pos.x as usize
    }

    /// Position of a flat index
    pub fn position_of(&self, index: usize) -> Position {
        Position::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && (pos.x as usize) < self.width && pos.y >= 0 && (pos.y as usize) < self.height
    }

    /// Map an arbitrary position onto the torus
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(
            pos.x.rem_euclid(self.width as i32),
            pos.y.rem_euclid(self.height as i32),
        )
    }

    /// The behind-link of a cell; `None` means the cell is free
    pub fn behind(&self, index: usize) -> Option<usize> {
        self.cells[index]
    }

    /// Occupy a cell, linking it to the tile behind it
    pub fn set_behind(&mut self, index: usize, behind: usize) {
        self.cells[index] = Some(behind);
    }

    /// Reset a cell to the free sentinel
    pub fn clear(&mut self, index: usize) {
        self.cells[index] = None;
    }

    /// Reset every cell to the free sentinel
    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.cells[index].is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Indices of all free cells, in flat order
    pub fn free_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }

    /// Walk the body chain from `head`, yielding occupied cell indices in
    /// head-to-tail order. Stops at the first free cell (the tail marker,
    /// which is not yielded) and is hard-bounded by the grid size, so a
    /// corrupted cyclic chain cannot hang the caller.
    pub fn chain_from(&self, head: usize) -> ChainIter<'_> {
        ChainIter {
            grid: self,
            cursor: head,
            remaining: self.cells.len(),
        }
    }
}

pub struct ChainIter<'a> {
    grid: &'a TileGrid,
    cursor: usize,
    remaining: usize,
}

impl Iterator for ChainIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.cursor;
        let behind = self.grid.behind(current)?;
        self.cursor = behind;
        Some(current)
    }
}
