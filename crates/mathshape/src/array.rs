use unicode_math_class::MathClass;

use crate::composition::Canvas;
use crate::ctx::MathContext;
use crate::fragment::GlyphFragment;
use crate::geom::{Color, Em, Point};
use crate::list::MathListLayoutFragment;

/// Default gap between rows.
const DEFAULT_ROW_GAP: Em = Em::new(0.5);
/// Default gap between columns.
const DEFAULT_COL_GAP: Em = Em::new(0.5);

/// A grid of math lists, e.g. the body of a matrix or a cases block.
///
/// Cells are centered within their column; the whole grid is centered on
/// the math axis.
#[derive(Debug, Clone)]
pub struct ArrayFragment {
    rows: Vec<Vec<MathListLayoutFragment>>,
    row_gap: Em,
    col_gap: Em,
    positions: Vec<Vec<Point>>,
    width: f64,
    ascent: f64,
    descent: f64,
}

/// Per-row and per-column extents of the grid, in points.
#[derive(Debug)]
pub(crate) struct GridLayout {
    pub col_widths: Vec<f64>,
    /// Ascent and descent of every row, padded by the delimiter extents.
    pub row_extents: Vec<(f64, f64)>,
    pub width: f64,
    pub height: f64,
}

/// Compute column widths and row extents from the cell metrics.
///
/// `pad` is a minimum (ascent, descent) per row, taken from the extents of
/// a parenthesis so that small matrices align with their delimiters.
pub(crate) fn layout_grid(
    cells: &[Vec<(f64, f64, f64)>],
    row_gap: f64,
    col_gap: f64,
    pad: (f64, f64),
) -> GridLayout {
    let nrows = cells.len();
    let ncols = cells.first().map_or(0, Vec::len);

    let mut col_widths = vec![0.0_f64; ncols];
    let mut row_extents = vec![pad; nrows];

    for (r, row) in cells.iter().enumerate() {
        for (c, &(width, cell_ascent, cell_descent)) in row.iter().enumerate() {
            col_widths[c] = col_widths[c].max(width);
            row_extents[r].0 = row_extents[r].0.max(cell_ascent);
            row_extents[r].1 = row_extents[r].1.max(cell_descent);
        }
    }

    let width = col_widths.iter().sum::<f64>()
        + col_gap * ncols.saturating_sub(1) as f64;
    let height = row_extents.iter().map(|&(a, d)| a + d).sum::<f64>()
        + row_gap * nrows.saturating_sub(1) as f64;

    GridLayout { col_widths, row_extents, width, height }
}

impl ArrayFragment {
    pub fn new(rows: Vec<Vec<MathListLayoutFragment>>) -> Self {
        Self {
            rows,
            row_gap: DEFAULT_ROW_GAP,
            col_gap: DEFAULT_COL_GAP,
            positions: Vec::new(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
        }
    }

    pub fn with_gaps(self, row_gap: Em, col_gap: Em) -> Self {
        Self { row_gap, col_gap, ..self }
    }

    pub fn rows(&self) -> &[Vec<MathListLayoutFragment>] {
        &self.rows
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn class(&self) -> MathClass {
        MathClass::Normal
    }

    /// The position of a cell relative to this fragment's origin.
    pub fn cell_pos(&self, row: usize, col: usize) -> Point {
        self.positions[row][col]
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let font_size = ctx.font().size();
        let axis = scaled!(ctx, axis_height);

        // Pad row extents with a parenthesis so that ordinary matrices line
        // up with their delimiters; a paren always shapes to something.
        let pad = GlyphFragment::new(ctx, '(')
            .map_or((0.0, 0.0), |paren| (paren.ascent, paren.descent));

        let cells: Vec<Vec<(f64, f64, f64)>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (cell.width(), cell.ascent(), cell.descent()))
                    .collect()
            })
            .collect();

        let grid = layout_grid(
            &cells,
            self.row_gap.at(font_size),
            self.col_gap.at(font_size),
            pad,
        );

        self.width = grid.width;
        self.ascent = grid.height / 2.0 + axis;
        self.descent = grid.height - self.ascent;

        // Cell baselines: walk rows downward from the top of the grid,
        // centering every cell in its column.
        self.positions.clear();
        let mut y = -self.ascent;
        for (r, row) in self.rows.iter().enumerate() {
            let (row_ascent, row_descent) = grid.row_extents[r];
            let mut x = 0.0;
            let mut positions = Vec::with_capacity(row.len());
            for (c, cell) in row.iter().enumerate() {
                let centered = x + (grid.col_widths[c] - cell.width()) / 2.0;
                positions.push(Point::new(centered, y + row_ascent));
                x += grid.col_widths[c] + self.col_gap.at(font_size);
            }
            self.positions.push(positions);
            y += row_ascent + row_descent + self.row_gap.at(font_size);
        }
    }

    pub fn draw(&self, at: Point, _color: Color, canvas: &mut dyn Canvas) {
        for (row, positions) in self.rows.iter().zip(&self.positions) {
            for (cell, position) in row.iter().zip(positions) {
                cell.draw(at + *position, canvas);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_extents_take_maxima_and_gaps() {
        let cells = vec![
            vec![(10.0, 5.0, 2.0), (4.0, 3.0, 1.0)],
            vec![(6.0, 2.0, 2.0), (8.0, 6.0, 3.0)],
        ];
        let grid = layout_grid(&cells, 2.0, 3.0, (0.0, 0.0));
        assert_eq!(grid.col_widths, vec![10.0, 8.0]);
        assert_eq!(grid.row_extents, vec![(5.0, 2.0), (6.0, 3.0)]);
        assert_eq!(grid.width, 10.0 + 3.0 + 8.0);
        assert_eq!(grid.height, 7.0 + 2.0 + 9.0);
    }

    #[test]
    fn rows_are_padded_to_the_delimiter_extents() {
        let cells = vec![vec![(10.0, 1.0, 0.5)]];
        let grid = layout_grid(&cells, 0.0, 0.0, (4.0, 2.0));
        assert_eq!(grid.row_extents, vec![(4.0, 2.0)]);
        assert_eq!(grid.height, 6.0);
    }

    #[test]
    fn empty_grid_is_empty() {
        let grid = layout_grid(&[], 2.0, 3.0, (1.0, 1.0));
        assert_eq!(grid.width, 0.0);
        assert_eq!(grid.height, 0.0);
        assert!(grid.col_widths.is_empty());
    }
}
