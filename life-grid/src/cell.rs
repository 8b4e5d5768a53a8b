/// One grid cell. `neighbor_count` is a cache filled in by
/// [`LifeGrid::recompute_neighbor_counts`](crate::LifeGrid::recompute_neighbor_counts)
/// and is only meaningful while the grid reports its counts as valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    alive: bool,
    neighbor_count: u8,
    age: u32,
}

impl Cell {
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn neighbor_count(&self) -> u8 {
        self.neighbor_count
    }

    /// Generations this cell has been alive; 0 for dead cells.
    pub fn age(&self) -> u32 {
        self.age
    }

    pub(crate) fn set_alive(&mut self, alive: bool) {
        match (self.alive, alive) {
            (false, true) => self.age = 1,
            (_, false) => self.age = 0,
            (true, true) => {}
        }
        self.alive = alive;
    }

    pub(crate) fn set_neighbor_count(&mut self, count: u8) {
        debug_assert!(count <= 8);
        self.neighbor_count = count;
    }

    /// Applies the B3/S23 rule using this cell's cached neighbor count.
    /// The returned cell carries the old count, which is stale for the new
    /// generation.
    pub(crate) fn next_generation(&self) -> Cell {
        let neighbors = self.neighbor_count;
        let (alive, age) = if self.alive {
            if (2..=3).contains(&neighbors) {
                (true, self.age.saturating_add(1))
            } else {
                (false, 0)
            }
        } else if neighbors == 3 {
            (true, 1)
        } else {
            (false, 0)
        };
        Cell {
            alive,
            neighbor_count: self.neighbor_count,
            age,
        }
    }
}
