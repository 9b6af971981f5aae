use unicode_math_class::MathClass;

use crate::composition::Canvas;
use crate::ctx::MathContext;
use crate::fragment::{GlyphFragment, MathFragment};
use crate::geom::{Color, Em, Point};
use crate::list::MathListLayoutFragment;

/// How much the accent can be shorter than the base.
const ACCENT_SHORT_FALL: Em = Em::new(0.5);

/// A nucleus with an accent glyph placed above it.
///
/// The accent aligns its attachment point with the nucleus's and rests at
/// the accent base height for short nuclei. The nucleus is laid out cramped
/// by the caller.
#[derive(Debug, Clone)]
pub struct AccentFragment {
    pub nucleus: MathListLayoutFragment,
    pub accent: char,
    nucleus_pos: Point,
    glyph: Option<(Box<MathFragment>, Point)>,
    width: f64,
    ascent: f64,
    descent: f64,
    accent_attach: f64,
}

impl AccentFragment {
    pub fn new(nucleus: MathListLayoutFragment, accent: char) -> Self {
        Self {
            nucleus,
            accent,
            nucleus_pos: Point::zero(),
            glyph: None,
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            accent_attach: 0.0,
        }
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

    /// Accents preserve the nucleus's spacing class.
    pub fn class(&self) -> MathClass {
        self.nucleus.class()
    }

    pub fn accent_attach(&self) -> f64 {
        self.accent_attach
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let base_ascent = self.nucleus.ascent();
        let base_attach = self.nucleus.accent_attach();
        let width = self.nucleus.width();

        let Some(glyph) = GlyphFragment::new(ctx, self.accent) else {
            // No accent glyph: the fragment degrades to its bare nucleus.
            self.glyph = None;
            self.nucleus_pos = Point::zero();
            self.width = width;
            self.ascent = base_ascent;
            self.descent = self.nucleus.descent();
            self.accent_attach = base_attach;
            return;
        };

        // Forcing the accent to be at least as wide as the base makes it
        // too wide in many cases, hence the generous shortfall.
        let shortfall = ACCENT_SHORT_FALL.at(ctx.font().size());
        let accent = glyph.stretch_horizontal(ctx, width, shortfall);
        let accent_attach = accent.accent_attach();

        // The accent's ink bottom usually sits above the baseline, so its
        // descent is negative space; the gap keeps the accent from sinking
        // below the accent base height on short nuclei.
        let accent_base_height = scaled!(ctx, accent_base_height);
        let gap = -accent.descent() - base_ascent.min(accent_base_height);
        let accent_y = -(base_ascent + gap + accent.descent());
        let accent_pos = Point::new(base_attach - accent_attach, accent_y);

        self.ascent = base_ascent + gap + accent.height();
        self.descent = self.nucleus.descent();
        self.width = width;
        self.accent_attach = base_attach;
        self.nucleus_pos = Point::zero();
        self.glyph = Some((Box::new(accent), accent_pos));
    }

    pub fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        if let Some((accent, position)) = &self.glyph {
            accent.draw(at + *position, color, canvas);
        }
        self.nucleus.draw(at + self.nucleus_pos, canvas);
    }
}
