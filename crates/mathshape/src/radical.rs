use unicode_math_class::MathClass;

use crate::composition::Canvas;
use crate::ctx::MathContext;
use crate::fragment::{GlyphFragment, MathFragment, RuleFragment};
use crate::geom::{Color, Point};
use crate::list::MathListLayoutFragment;

/// A radical: a stretched surd, a rule over the radicand, and an optional
/// degree raised along the surd.
#[derive(Debug, Clone)]
pub struct RadicalFragment {
    pub radicand: MathListLayoutFragment,
    pub degree: Option<MathListLayoutFragment>,
    radicand_pos: Point,
    degree_pos: Point,
    /// The surd and the rule, with their positions.
    extras: Vec<(MathFragment, Point)>,
    width: f64,
    ascent: f64,
    descent: f64,
}

impl RadicalFragment {
    pub fn new(
        radicand: MathListLayoutFragment,
        degree: Option<MathListLayoutFragment>,
    ) -> Self {
        Self {
            radicand,
            degree,
            radicand_pos: Point::zero(),
            degree_pos: Point::zero(),
            extras: Vec::new(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
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

    pub fn class(&self) -> MathClass {
        MathClass::Normal
    }

    pub fn radicand_pos(&self) -> Point {
        self.radicand_pos
    }

    pub fn degree_pos(&self) -> Point {
        self.degree_pos
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let gap = scaled!(
            ctx,
            text: radical_vertical_gap,
            display: radical_display_style_vertical_gap,
        );
        let thickness = scaled!(ctx, radical_rule_thickness);
        let extra_ascender = scaled!(ctx, radical_extra_ascender);
        let kern_before = scaled!(ctx, radical_kern_before_degree);
        let kern_after = scaled!(ctx, radical_kern_after_degree);
        let raise_factor = ctx.font().math().radical_degree_bottom_raise_percent;

        // Stretch the surd to cover the radicand, the gap and the rule.
        let target = self.radicand.height() + thickness + gap;
        let surd = match GlyphFragment::new(ctx, '√') {
            Some(glyph) => glyph.stretch_vertical(ctx, target, 0.0),
            None => RuleFragment::new(thickness, target).into(),
        };

        // TeXbook p. 443, item 11: keep the original gap and distribute any
        // remaining free space equally above and below.
        let gap = gap.max((surd.height() - thickness - self.radicand.height() + gap) / 2.0);

        let surd_ascent = self.radicand.ascent() + gap + thickness;
        let descent = surd.height() - surd_ascent;
        let inner_ascent = surd_ascent + extra_ascender;

        let mut surd_offset = 0.0;
        let mut shift_up = 0.0;
        let mut ascent = inner_ascent;

        if let Some(degree) = &self.degree {
            surd_offset = kern_before + degree.width() + kern_after;
            // The raise comes from the TeXbook's definition of \root
            // (p. 360); the added degree descent keeps descenders from
            // colliding with the surd.
            shift_up = raise_factor * (inner_ascent - descent) + degree.descent();
            ascent = ascent.max(shift_up + degree.ascent());
        }

        let surd_x = surd_offset.max(0.0);
        let surd_y = -(surd_ascent - surd.ascent());
        let radicand_x = surd_x + surd.width();
        let width = radicand_x + self.radicand.width();

        let rule_pos =
            Point::new(radicand_x, -self.radicand.ascent() - gap - thickness / 2.0);

        self.extras.clear();
        self.extras.push((surd, Point::new(surd_x, surd_y)));
        self.extras.push((
            RuleFragment::new(self.radicand.width(), thickness).into(),
            rule_pos,
        ));

        self.degree_pos = Point::new(kern_before, -shift_up);
        self.radicand_pos = Point::with_x(radicand_x);
        self.width = width;
        self.ascent = ascent;
        self.descent = descent;
    }

    pub fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        for (fragment, position) in &self.extras {
            fragment.draw(at + *position, color, canvas);
        }
        if let Some(degree) = &self.degree {
            degree.draw(at + self.degree_pos, canvas);
        }
        self.radicand.draw(at + self.radicand_pos, canvas);
    }
}
