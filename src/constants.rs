pub const MIN_DIMENSION: usize = 3;

pub const MIN_TERMINAL_DISTANCE: usize = 5;
pub const TERMINAL_ATTEMPTS: usize = 50;

pub const TREASURE_MIN: usize = 0;
pub const TREASURE_MAX: usize = 10;
pub const ARROWS_MIN: usize = 1;
pub const ARROWS_MAX: usize = 3;

pub const STARTING_ARROWS: u32 = 3;
pub const MIN_SHOT_DISTANCE: u32 = 1;
pub const MAX_SHOT_DISTANCE: u32 = 5;

pub fn candidate_edge_count(rows: usize, cols: usize, wrap: bool) -> usize {
    if wrap {
        return rows * cols * 2;
    }
    rows * cols * 2 - rows - cols
}

pub fn max_interconnectivity(rows: usize, cols: usize, wrap: bool) -> usize {
    candidate_edge_count(rows, cols, wrap) - (rows * cols - 1)
}

pub fn percentage_of(percentage: u32, total: usize) -> usize {
    percentage as usize * total / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_wrapping_grid_loses_one_edge_per_row_and_column() {
        assert_eq!(candidate_edge_count(4, 4, false), 24);
        assert_eq!(candidate_edge_count(3, 5, false), 22);
        assert_eq!(max_interconnectivity(4, 4, false), 9);
    }

    #[test]
    fn wrapping_grid_has_two_edges_per_cell() {
        assert_eq!(candidate_edge_count(4, 4, true), 32);
        assert_eq!(max_interconnectivity(4, 4, true), 17);
    }

    #[test]
    fn percentage_truncates_toward_zero() {
        assert_eq!(percentage_of(40, 9), 3);
        assert_eq!(percentage_of(40, 16), 6);
        assert_eq!(percentage_of(0, 16), 0);
        assert_eq!(percentage_of(100, 7), 7);
    }
}
