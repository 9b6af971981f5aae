use unicode_math_class::MathClass;

use crate::composition::Canvas;
use crate::ctx::MathContext;
use crate::fragment::{ColoredFragment, GlyphFragment, Limits, MathFragment, RuleFragment};
use crate::geom::{Color, Em, Point};
use crate::list::MathListLayoutFragment;

/// Gap between a nucleus and a stretched spreader.
const SPREADER_GAP: Em = Em::new(0.1);
/// How much less wide a spreader can be than the nucleus.
const SPREADER_SHORT_FALL: Em = Em::new(0.25);

/// What decorates the nucleus of an [`UnderOverFragment`].
#[derive(Debug, Clone)]
pub enum UnderOverKind {
    /// A rule above the nucleus.
    OverLine,
    /// A rule below the nucleus.
    UnderLine,
    /// A glyph (brace, arrow, ...) stretched over the nucleus.
    OverSpreader(char),
    /// A glyph stretched under the nucleus.
    UnderSpreader(char),
}

impl UnderOverKind {
    fn is_over(&self) -> bool {
        matches!(self, Self::OverLine | Self::OverSpreader(_))
    }
}

/// A nucleus with a line or a stretched glyph above or below it.
#[derive(Debug, Clone)]
pub struct UnderOverFragment {
    pub nucleus: MathListLayoutFragment,
    pub kind: UnderOverKind,
    nucleus_pos: Point,
    attach: Option<(Box<MathFragment>, Point)>,
    width: f64,
    ascent: f64,
    descent: f64,
}

/// The geometry of an under- or overline, in points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineParams {
    pub gap: f64,
    pub thickness: f64,
    /// Extra ascender above an overline, extra descender below an
    /// underline.
    pub extra: f64,
}

/// The rule's vertical center and the total extents for a line decoration.
pub(crate) fn layout_line(
    params: &LineParams,
    is_over: bool,
    nucleus: (f64, f64),
) -> (f64, f64, f64) {
    let (nucleus_ascent, nucleus_descent) = nucleus;
    let extra_height = params.extra + params.thickness + params.gap;
    if is_over {
        let line_y = -(nucleus_ascent + params.gap + params.thickness / 2.0);
        (line_y, nucleus_ascent + extra_height, nucleus_descent)
    } else {
        let line_y = nucleus_descent + params.gap + params.thickness / 2.0;
        (line_y, nucleus_ascent, nucleus_descent + extra_height)
    }
}

impl UnderOverFragment {
    pub fn new(nucleus: MathListLayoutFragment, kind: UnderOverKind) -> Self {
        Self {
            nucleus,
            kind,
            nucleus_pos: Point::zero(),
            attach: None,
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

    /// Lines and spreaders preserve the nucleus's spacing class.
    pub fn class(&self) -> MathClass {
        self.nucleus.class()
    }

    pub fn limits(&self) -> Limits {
        Limits::Always
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        match self.kind {
            UnderOverKind::OverLine => self.layout_rule(ctx, true),
            UnderOverKind::UnderLine => self.layout_rule(ctx, false),
            UnderOverKind::OverSpreader(c) => self.layout_spreader(ctx, c, true),
            UnderOverKind::UnderSpreader(c) => self.layout_spreader(ctx, c, false),
        }
    }

    fn layout_rule(&mut self, ctx: &MathContext, is_over: bool) {
        let params = if is_over {
            LineParams {
                gap: scaled!(ctx, overbar_vertical_gap),
                thickness: scaled!(ctx, overbar_rule_thickness),
                extra: scaled!(ctx, overbar_extra_ascender),
            }
        } else {
            LineParams {
                gap: scaled!(ctx, underbar_vertical_gap),
                thickness: scaled!(ctx, underbar_rule_thickness),
                extra: scaled!(ctx, underbar_extra_descender),
            }
        };

        let (line_y, ascent, descent) = layout_line(
            &params,
            is_over,
            (self.nucleus.ascent(), self.nucleus.descent()),
        );

        // Underlines retreat by the italics correction of slanted content.
        let line_adjust =
            if is_over { 0.0 } else { -self.nucleus.italics_correction() };
        let width = self.nucleus.width();
        let line_width = width + line_adjust;

        self.attach = Some((
            Box::new(RuleFragment::new(line_width, params.thickness).into()),
            Point::with_y(line_y),
        ));
        self.nucleus_pos = Point::zero();
        self.width = width;
        self.ascent = ascent;
        self.descent = descent;
    }

    fn layout_spreader(&mut self, ctx: &MathContext, c: char, is_over: bool) {
        let font_size = ctx.font().size();
        let gap = SPREADER_GAP.at(font_size);
        let shortfall = SPREADER_SHORT_FALL.at(font_size);

        let width = self.nucleus.width();
        let attach = match GlyphFragment::new(ctx, c) {
            Some(glyph) => glyph.stretch_horizontal(ctx, width, shortfall),
            // A missing spreader glyph degrades to a visible placeholder
            // rule rather than aborting layout.
            None => ColoredFragment::new(RuleFragment::new(width, 2.0), Color::RED).into(),
        };

        let (attach_y, ascent, descent) = if is_over {
            (
                -(self.nucleus.ascent() + gap + attach.descent()),
                self.nucleus.ascent() + gap + attach.height(),
                self.nucleus.descent(),
            )
        } else {
            (
                self.nucleus.descent() + gap + attach.ascent(),
                self.nucleus.ascent(),
                self.nucleus.descent() + gap + attach.height(),
            )
        };

        let total_width = attach.width().max(width);
        let attach_pos = Point::new((total_width - attach.width()) / 2.0, attach_y);
        self.nucleus_pos = Point::with_x((total_width - width) / 2.0);
        self.attach = Some((Box::new(attach), attach_pos));
        self.width = total_width;
        self.ascent = ascent;
        self.descent = descent;
    }

    pub fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        if let Some((attach, position)) = &self.attach {
            attach.draw(at + *position, color, canvas);
        }
        self.nucleus.draw(at + self.nucleus_pos, canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: LineParams = LineParams { gap: 1.0, thickness: 0.5, extra: 0.75 };

    #[test]
    fn overline_raises_the_total_ascent() {
        let (line_y, ascent, descent) = layout_line(&PARAMS, true, (6.0, 2.0));
        assert_eq!(line_y, -(6.0 + 1.0 + 0.25));
        assert_eq!(ascent, 6.0 + 0.75 + 0.5 + 1.0);
        assert_eq!(descent, 2.0);
    }

    #[test]
    fn underline_deepens_the_total_descent() {
        let (line_y, ascent, descent) = layout_line(&PARAMS, false, (6.0, 2.0));
        assert_eq!(line_y, 2.0 + 1.0 + 0.25);
        assert_eq!(ascent, 6.0);
        assert_eq!(descent, 2.0 + 0.75 + 0.5 + 1.0);
    }

    #[test]
    fn rule_center_sits_between_gap_and_thickness() {
        // The rule is centered on line_y, so its ink spans exactly from the
        // gap's edge to thickness beyond it.
        let (line_y, _, _) = layout_line(&PARAMS, true, (6.0, 2.0));
        let ink_bottom = line_y + PARAMS.thickness / 2.0;
        assert_eq!(ink_bottom, -(6.0 + PARAMS.gap));
    }
}
