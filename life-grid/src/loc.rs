use std::fmt;

/// A cell coordinate. `col` is the x axis and `row` the y axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn grid_index(&self, width: u32, height: u32) -> Option<usize> {
        if self.row < height && self.col < width {
            Some(self.row as usize * width as usize + self.col as usize)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Each cell is drawn as a pair of character columns, so a display of
    /// `columns` x `rows` holds `columns / 2` x `rows` cells.
    pub fn from_display(columns: u16, rows: u16) -> Self {
        Self::new(columns as u32 / 2, rows as u32)
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, loc: Loc) -> bool {
        loc.row < self.height && loc.col < self.width
    }

    pub fn covers(&self, other: GridSize) -> bool {
        self.width >= other.width && self.height >= other.height
    }

    pub fn at_least(&self, floor: GridSize) -> Self {
        Self::new(self.width.max(floor.width), self.height.max(floor.height))
    }

    pub fn center(&self) -> Loc {
        Loc::new(self.height / 2, self.width / 2)
    }

    pub fn locs(&self) -> impl Iterator<Item = Loc> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Loc::new(row, col)))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
