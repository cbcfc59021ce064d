use crate::Grid;

/// Draws the map with islands as `x`, the given positions as `o` and water as `.`.
pub fn visualize_positions(grid: &Grid, positions: &[(i8, i8)]) -> String {
    let mut s = String::new();
    for y in 0..grid.height() {
        if y > 0 {
            s.push('\n');
        }
        for x in 0..grid.width() {
            let c = if !grid.is_free(x, y) {
                'x'
            } else if positions.contains(&(x, y)) {
                'o'
            } else {
                '.'
            };
            s.push(c);
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_islands_and_positions() {
        let grid = Grid::from_lines(&["..x", "...", "x.."]).unwrap();
        assert_eq!(
            visualize_positions(&grid, &[(0, 0), (2, 1)]),
            "o.x\n..o\nx.."
        );
    }
}
