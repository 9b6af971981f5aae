use ttf_parser::GlyphId;

use crate::font::MathFont;
use crate::fragment::MathFragment;
use crate::geom::{Color, Point, Rect};

/// A drawing sink.
///
/// The engine only ever writes to the canvas; it never queries it.
pub trait Canvas {
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Blit a glyph with its baseline origin at `at`.
    fn fill_glyph(&mut self, font: &MathFont, glyph: GlyphId, at: Point, color: Color);

    /// Restrict subsequent drawing to a rectangle. Calls nest.
    fn push_clip(&mut self, rect: Rect);

    /// Undo the most recent [`push_clip`](Self::push_clip).
    fn pop_clip(&mut self);
}

/// An immutable composite of positioned fragments.
///
/// Positions are baseline-relative offsets from the composition's own
/// origin.
#[derive(Debug, Clone)]
pub struct MathComposition {
    items: Vec<(MathFragment, Point)>,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl MathComposition {
    /// An empty composition with zero extent.
    pub fn empty() -> Self {
        Self { items: vec![], width: 0.0, ascent: 0.0, descent: 0.0 }
    }

    /// Create a composition from explicitly positioned fragments.
    pub fn new(
        width: f64,
        ascent: f64,
        descent: f64,
        items: Vec<(MathFragment, Point)>,
    ) -> Self {
        Self { items, width, ascent, descent }
    }

    /// Lay out fragments left-to-right on a common baseline with zero
    /// spacing.
    pub fn row(fragments: Vec<MathFragment>) -> Self {
        let mut items = Vec::with_capacity(fragments.len());
        let mut position = Point::zero();
        let mut ascent: f64 = 0.0;
        let mut descent: f64 = 0.0;

        for fragment in fragments {
            ascent = ascent.max(fragment.ascent());
            descent = descent.max(fragment.descent());
            let width = fragment.width();
            items.push((fragment, position));
            position.x += width;
        }

        Self { items, width: position.x, ascent, descent }
    }

    /// The height of the composition.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// The positioned fragments.
    pub fn items(&self) -> &[(MathFragment, Point)] {
        &self.items
    }

    /// Draw all fragments, offset by `at`.
    pub fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        for (fragment, position) in &self.items {
            fragment.draw(at + *position, color, canvas);
        }
    }
}

impl Default for MathComposition {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fragment::{FrameFragment, RuleFragment};

    /// A canvas that records draw calls for assertions.
    #[derive(Default)]
    pub struct RecordingCanvas {
        pub rects: Vec<(Rect, Color)>,
        pub glyphs: Vec<(GlyphId, Point, Color)>,
        pub clip_depth: usize,
    }

    impl Canvas for RecordingCanvas {
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.rects.push((rect, color));
        }

        fn fill_glyph(
            &mut self,
            _font: &MathFont,
            glyph: GlyphId,
            at: Point,
            color: Color,
        ) {
            self.glyphs.push((glyph, at, color));
        }

        fn push_clip(&mut self, _rect: Rect) {
            self.clip_depth += 1;
        }

        fn pop_clip(&mut self) {
            self.clip_depth -= 1;
        }
    }

    #[test]
    fn row_accumulates_widths_and_takes_extent_maxima() {
        let row = MathComposition::row(vec![
            FrameFragment::new(4.0, 5.0, 1.0).into(),
            FrameFragment::new(6.0, 2.0, 3.0).into(),
            FrameFragment::new(2.0, 1.0, 0.5).into(),
        ]);
        assert_eq!(row.width, 12.0);
        assert_eq!(row.ascent, 5.0);
        assert_eq!(row.descent, 3.0);
        assert_eq!(row.items()[0].1, Point::zero());
        assert_eq!(row.items()[1].1, Point::with_x(4.0));
        assert_eq!(row.items()[2].1, Point::with_x(10.0));
    }

    #[test]
    fn draw_offsets_items() {
        let composition = MathComposition::new(
            10.0,
            2.0,
            0.0,
            vec![(RuleFragment::new(10.0, 2.0).into(), Point::new(1.0, -3.0))],
        );
        let mut canvas = RecordingCanvas::default();
        composition.draw(Point::new(5.0, 7.0), Color::BLACK, &mut canvas);
        let (rect, _) = canvas.rects[0];
        assert_eq!(rect.x, 6.0);
        // The rule is centered on its origin: y = 7 - 3 - height/2.
        assert_eq!(rect.y, 3.0);
    }
}
