use life_grid::{GridSize, LifeGrid, Pattern, Random, Topology, World};
use log::debug;

/// How the board is populated at startup and on every reset.
#[derive(Debug)]
pub enum Seeding {
    /// Each cell lives with probability `1 / density`.
    Random { density: u32 },
    Pattern(Pattern),
    Empty,
}

#[derive(Debug)]
pub struct ConwayWorld {
    grid: LifeGrid,
    topology: Topology,
    seeding: Seeding,
    rand: Random,
}

impl ConwayWorld {
    pub fn new(
        size: GridSize,
        topology: Topology,
        seeding: Seeding,
        rand: Random,
    ) -> life_grid::Result<Self> {
        let mut result = Self {
            grid: LifeGrid::new(size)?,
            topology,
            seeding,
            rand,
        };
        result.reset();
        Ok(result)
    }

    fn seed(&mut self) -> usize {
        match &self.seeding {
            Seeding::Random { density } => {
                let size = self.grid.size();
                self.grid
                    .set_random_pattern(&mut self.rand, size.center(), size, *density)
            }
            Seeding::Pattern(pattern) => self.grid.set_pattern_centered(pattern),
            Seeding::Empty => 0,
        }
    }
}

impl World for ConwayWorld {
    fn grid(&self) -> &LifeGrid {
        &self.grid
    }

    fn grid_mut(&mut self) -> &mut LifeGrid {
        &mut self.grid
    }

    fn topology(&self) -> Topology {
        self.topology
    }

    fn reset(&mut self) {
        self.grid.clear();
        let placed = self.seed();
        self.grid.recompute_neighbor_counts(self.topology);
        debug!("reseeded {} grid with {placed} live cells", self.grid.size());
    }
}
