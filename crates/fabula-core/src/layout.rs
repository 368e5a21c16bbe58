//! Layout math for the emoji display grid.
//!
//! Pure functions of the viewport dimensions and emoji count, so the UI
//! collaborator stays free of hidden state.

/// Maximum number of emojis per row.
pub const MAX_COLUMNS: usize = 3;
/// Smallest cell edge, in pixels.
pub const MIN_CELL_PX: u32 = 50;

const WIDTH_FRACTION: f64 = 0.9;
const HEIGHT_FRACTION: f64 = 0.6;

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Returns the `(columns, rows)` grid for `count` emojis, capped at
/// [`MAX_COLUMNS`] per row.
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    let cols = count.clamp(1, MAX_COLUMNS);
    let rows = count.div_ceil(cols).max(1);
    (cols, rows)
}

/// Returns the square cell edge for displaying `count` emojis in `viewport`.
///
/// The grid may use 90% of the viewport width and 60% of its height; the
/// smaller of the two per-cell limits wins, floored at [`MIN_CELL_PX`].
pub fn emoji_cell_size(viewport: Viewport, count: usize) -> u32 {
    let (cols, rows) = grid_dimensions(count);
    let max_width = (f64::from(viewport.width) * WIDTH_FRACTION / cols as f64).floor();
    let max_height = (f64::from(viewport.height) * HEIGHT_FRACTION / rows as f64).floor();
    (max_width.min(max_height) as u32).max(MIN_CELL_PX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_caps_at_three_columns() {
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(2), (2, 1));
        assert_eq!(grid_dimensions(3), (3, 1));
        assert_eq!(grid_dimensions(4), (3, 2));
        assert_eq!(grid_dimensions(10), (3, 4));
    }

    #[test]
    fn test_zero_count_still_yields_a_cell() {
        assert_eq!(grid_dimensions(0), (1, 1));
    }

    #[test]
    fn test_cell_size_for_known_viewport() {
        // 1920x1080, 5 emojis: 3 cols x 2 rows.
        // width limit: 1920*0.9/3 = 576; height limit: 1080*0.6/2 = 324.
        let size = emoji_cell_size(
            Viewport {
                width: 1920,
                height: 1080,
            },
            5,
        );
        assert_eq!(size, 324);
    }

    #[test]
    fn test_cell_size_has_a_floor() {
        let size = emoji_cell_size(
            Viewport {
                width: 100,
                height: 100,
            },
            10,
        );
        assert_eq!(size, MIN_CELL_PX);
    }

    #[test]
    fn test_fewer_emojis_get_bigger_cells() {
        let viewport = Viewport {
            width: 800,
            height: 600,
        };
        let one = emoji_cell_size(viewport, 1);
        let nine = emoji_cell_size(viewport, 9);
        assert!(one > nine);
    }
}
