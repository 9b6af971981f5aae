use unicode_math_class::MathClass;

use crate::composition::Canvas;
use crate::ctx::MathContext;
use crate::fragment::{GlyphFragment, MathFragment, RuleFragment};
use crate::geom::{Color, Em, Point};
use crate::list::MathListLayoutFragment;
use crate::stretch::DELIM_SHORT_FALL;

/// Space added to each side of the fraction body.
const FRAC_SIDE_PADDING: Em = Em::new(0.1);
/// Minimum width of the fraction rule.
const MIN_RULE_WIDTH: Em = Em::new(0.3);

/// A fraction or binomial.
///
/// Owns its numerator and denominator lists. A binomial hides the rule and
/// wraps the stack between vertically stretched parentheses.
#[derive(Debug, Clone)]
pub struct FracFragment {
    pub numerator: MathListLayoutFragment,
    pub denominator: MathListLayoutFragment,
    pub binomial: bool,
    num_pos: Point,
    denom_pos: Point,
    /// The rule or the stretched delimiters, with their positions.
    extras: Vec<(MathFragment, Point)>,
    width: f64,
    ascent: f64,
    descent: f64,
}

/// The font parameters fraction layout depends on, in points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FracParams {
    pub axis_height: f64,
    pub thickness: f64,
    pub shift_up: f64,
    pub shift_down: f64,
    pub num_gap_min: f64,
    pub denom_gap_min: f64,
    pub side_padding: f64,
    pub min_rule_width: f64,
}

/// The geometry of the bare fraction stack (without delimiters).
#[derive(Debug, Clone, Copy)]
pub(crate) struct FracLayout {
    pub rule_width: f64,
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
    pub descent: f64,
    pub num_pos: Point,
    pub rule_pos: Point,
    pub denom_pos: Point,
}

/// Compute the stack geometry from the parameters and the child extents.
///
/// Children are identified by (width, ascent, descent) only; the formulas
/// do not depend on glyph identities.
pub(crate) fn layout_frac(
    params: &FracParams,
    num: (f64, f64, f64),
    denom: (f64, f64, f64),
) -> FracLayout {
    let (num_width, num_ascent, num_descent) = num;
    let (denom_width, denom_ascent, denom_descent) = denom;
    let num_height = num_ascent + num_descent;
    let denom_height = denom_ascent + denom_descent;

    let num_gap = (params.shift_up
        - (params.axis_height + params.thickness / 2.0)
        - num_descent)
        .max(params.num_gap_min);
    let denom_gap = (params.shift_down + (params.axis_height - params.thickness / 2.0)
        - denom_ascent)
        .max(params.denom_gap_min);

    let rule_width = num_width.max(denom_width).max(params.min_rule_width);
    let width = rule_width + 2.0 * params.side_padding;
    let height = num_height + num_gap + params.thickness + denom_gap + denom_height;
    let ascent = num_height + num_gap + params.thickness / 2.0 + params.axis_height;
    let descent = height - ascent;

    FracLayout {
        rule_width,
        width,
        height,
        ascent,
        descent,
        num_pos: Point::new((width - num_width) / 2.0, -ascent + num_ascent),
        rule_pos: Point::new((width - rule_width) / 2.0, -params.axis_height),
        denom_pos: Point::new((width - denom_width) / 2.0, descent - denom_descent),
    }
}

impl FracFragment {
    /// Create a fraction over already shaped children.
    pub fn new(
        numerator: MathListLayoutFragment,
        denominator: MathListLayoutFragment,
        binomial: bool,
    ) -> Self {
        Self {
            numerator,
            denominator,
            binomial,
            num_pos: Point::zero(),
            denom_pos: Point::zero(),
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

    /// The position of the numerator relative to this fragment's origin.
    pub fn numerator_pos(&self) -> Point {
        self.num_pos
    }

    /// The position of the denominator relative to this fragment's origin.
    pub fn denominator_pos(&self) -> Point {
        self.denom_pos
    }

    /// Recompute the fraction geometry from the context's font constants.
    ///
    /// Display-style constant variants apply only in display style.
    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let params = FracParams {
            axis_height: scaled!(ctx, axis_height),
            thickness: scaled!(ctx, fraction_rule_thickness),
            shift_up: scaled!(
                ctx,
                text: fraction_numerator_shift_up,
                display: fraction_numerator_display_style_shift_up,
            ),
            shift_down: scaled!(
                ctx,
                text: fraction_denominator_shift_down,
                display: fraction_denominator_display_style_shift_down,
            ),
            num_gap_min: scaled!(
                ctx,
                text: fraction_numerator_gap_min,
                display: fraction_num_display_style_gap_min,
            ),
            denom_gap_min: scaled!(
                ctx,
                text: fraction_denominator_gap_min,
                display: fraction_denom_display_style_gap_min,
            ),
            side_padding: FRAC_SIDE_PADDING.at(ctx.font().size()),
            min_rule_width: MIN_RULE_WIDTH.at(ctx.font().size()),
        };

        let layout = layout_frac(
            &params,
            (self.numerator.width(), self.numerator.ascent(), self.numerator.descent()),
            (
                self.denominator.width(),
                self.denominator.ascent(),
                self.denominator.descent(),
            ),
        );

        self.extras.clear();
        self.num_pos = layout.num_pos;
        self.denom_pos = layout.denom_pos;
        self.width = layout.width;
        self.ascent = layout.ascent;
        self.descent = layout.descent;

        if self.binomial {
            self.wrap_in_delimiters(ctx, layout.height);
        } else {
            self.extras.push((
                RuleFragment::new(layout.rule_width, params.thickness).into(),
                layout.rule_pos,
            ));
        }
    }

    /// Stretch parentheses to the stack height and put the stack between
    /// them.
    fn wrap_in_delimiters(&mut self, ctx: &MathContext, height: f64) {
        let shortfall = DELIM_SHORT_FALL.at(ctx.font().size());
        let left = GlyphFragment::new(ctx, '(')
            .map(|glyph| glyph.stretch_vertical(ctx, height, shortfall));
        let right = GlyphFragment::new(ctx, ')')
            .map(|glyph| glyph.stretch_vertical(ctx, height, shortfall));

        if let Some(left) = left {
            let left_width = left.width();
            self.ascent = self.ascent.max(left.ascent());
            self.descent = self.descent.max(left.descent());
            self.extras.push((left, Point::zero()));
            // The stack shifts right by the left delimiter's width.
            self.num_pos.x += left_width;
            self.denom_pos.x += left_width;
            self.width += left_width;
        }
        if let Some(right) = right {
            self.ascent = self.ascent.max(right.ascent());
            self.descent = self.descent.max(right.descent());
            let position = Point::with_x(self.width);
            self.width += right.width();
            self.extras.push((right, position));
        }
    }

    pub fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        for (fragment, position) in &self.extras {
            fragment.draw(at + *position, color, canvas);
        }
        self.numerator.draw(at + self.num_pos, canvas);
        self.denominator.draw(at + self.denom_pos, canvas);
    }
}
