use crate::{GridSize, LifeGrid, Loc, Pattern, Random};
use log::{debug, warn};

impl LifeGrid {
    /// Overlays the live cells of `pattern` with its top-left corner at
    /// (`anchor_row`, `anchor_col`). Cells that land outside the grid are
    /// dropped. Returns how many cells were set; neighbor counts become stale.
    pub fn set_pattern(&mut self, pattern: &Pattern, anchor_row: i64, anchor_col: i64) -> usize {
        let size = self.size();
        let mut placed = 0;
        for (row, col) in pattern.live_cells() {
            let row = anchor_row + row as i64;
            let col = anchor_col + col as i64;
            if let Some(loc) = Self::loc_in(size, row, col)
                && let Ok(cell) = self.cell_mut(loc)
            {
                cell.set_alive(true);
                placed += 1;
            }
        }
        self.invalidate_counts();
        debug!(
            "placed {placed} of {} pattern cells at {anchor_row}, {anchor_col}",
            pattern.population()
        );
        placed
    }

    /// Places `pattern` so that its center sits on the grid's center.
    pub fn set_pattern_centered(&mut self, pattern: &Pattern) -> usize {
        let center = self.size().center();
        let pattern_size = pattern.size();
        self.set_pattern(
            pattern,
            center.row as i64 - (pattern_size.height / 2) as i64,
            center.col as i64 - (pattern_size.width / 2) as i64,
        )
    }

    /// Brings each cell in the `region` centered on `center` to life with
    /// probability `1 / live_probability_denominator`. The region is clipped
    /// to the grid. Returns how many cells were set; neighbor counts become
    /// stale.
    pub fn set_random_pattern(
        &mut self,
        rand: &mut Random,
        center: Loc,
        region: GridSize,
        live_probability_denominator: u32,
    ) -> usize {
        if live_probability_denominator == 0 {
            warn!("live probability denominator is 0, seeding nothing");
            return 0;
        }

        let (upper_left, lower_right) = self.cell_box(center, region);
        let mut placed = 0;
        for row in upper_left.row..lower_right.row {
            for col in upper_left.col..lower_right.col {
                if rand.one_in(live_probability_denominator)
                    && let Ok(cell) = self.cell_mut(Loc::new(row, col))
                {
                    cell.set_alive(true);
                    placed += 1;
                }
            }
        }
        self.invalidate_counts();
        debug!("randomly seeded {placed} cells in {region} region around {center:?}");
        placed
    }

    /// Corners of the clipped region, the second one exclusive.
    fn cell_box(&self, center: Loc, region: GridSize) -> (Loc, Loc) {
        let size = self.size();
        let (min_row, max_row) = Self::clipped_span(center.row, region.height, size.height);
        let (min_col, max_col) = Self::clipped_span(center.col, region.width, size.width);
        (Loc::new(min_row, min_col), Loc::new(max_row, max_col))
    }

    fn clipped_span(center: u32, extent: u32, limit: u32) -> (u32, u32) {
        let start = center as i64 - (extent / 2) as i64;
        let end = start + extent as i64;
        let clip = |index: i64| index.clamp(0, limit as i64) as u32;
        (clip(start), clip(end))
    }

    fn loc_in(size: GridSize, row: i64, col: i64) -> Option<Loc> {
        let row = u32::try_from(row).ok()?;
        let col = u32::try_from(col).ok()?;
        let loc = Loc::new(row, col);
        size.contains(loc).then_some(loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topology;

    fn grid(width: u32, height: u32) -> LifeGrid {
        LifeGrid::new(GridSize::new(width, height)).unwrap()
    }

    #[test]
    fn pattern_lands_at_anchor() {
        let mut grid = grid(10, 10);
        let glider = Pattern::named("glider").unwrap();
        assert_eq!(grid.set_pattern(&glider, 4, 6), 5);
        assert!(grid[Loc::new(4, 7)].is_alive());
        assert!(grid[Loc::new(6, 6)].is_alive());
        assert_eq!(grid.population(), 5);
    }

    #[test]
    fn pattern_off_the_edges_is_clipped() {
        let mut grid = grid(5, 5);
        let block = Pattern::named("block").unwrap();
        assert_eq!(grid.set_pattern(&block, -1, 4), 1);
        assert_eq!(
            grid.live_cells().map(|(loc, _)| loc).collect::<Vec<_>>(),
            vec![Loc::new(0, 4)]
        );
        assert_eq!(grid.set_pattern(&block, 10, 10), 0);
        assert_eq!(grid.set_pattern(&block, -5, -5), 0);
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn dead_pattern_cells_do_not_clear() {
        let mut grid = grid(5, 5);
        grid.set_alive(Loc::new(0, 0), true).unwrap();
        grid.set_pattern(&Pattern::named("glider").unwrap(), 0, 0);
        assert!(grid[Loc::new(0, 0)].is_alive());
    }

    #[test]
    fn seeding_marks_counts_stale() {
        let mut grid = grid(5, 5);
        grid.recompute_neighbor_counts(Topology::Bounded);
        grid.set_pattern(&Pattern::named("blinker").unwrap(), 2, 1);
        assert!(!grid.counts_valid());
    }

    #[test]
    fn centered_pattern() {
        let mut grid = grid(11, 11);
        grid.set_pattern_centered(&Pattern::named("blinker").unwrap());
        assert_eq!(
            grid.live_cells().map(|(loc, _)| loc).collect::<Vec<_>>(),
            vec![Loc::new(5, 4), Loc::new(5, 5), Loc::new(5, 6)]
        );
    }

    #[test]
    fn random_region_is_clipped_to_grid() {
        let mut grid = grid(20, 20);
        let mut rand = Random::from_seed(1);
        let placed = grid.set_random_pattern(&mut rand, Loc::new(0, 19), GridSize::new(6, 6), 1);
        assert_eq!(placed, 12);
        assert!(grid
            .live_cells()
            .all(|(loc, _)| loc.row < 3 && loc.col >= 16));
    }

    #[test]
    fn random_density_is_roughly_one_in_n() {
        let mut grid = grid(100, 100);
        let mut rand = Random::from_seed(3);
        let size = grid.size();
        let placed = grid.set_random_pattern(&mut rand, size.center(), size, 4);
        assert!((2000..3000).contains(&placed), "{placed}");
        assert_eq!(grid.population(), placed);
    }

    #[test]
    fn zero_denominator_seeds_nothing() {
        let mut grid = grid(10, 10);
        let mut rand = Random::from_seed(1);
        assert_eq!(
            grid.set_random_pattern(&mut rand, Loc::new(5, 5), GridSize::new(10, 10), 0),
            0
        );
    }
}
