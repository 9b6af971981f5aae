use unicode_math_class::MathClass;

use crate::composition::Canvas;
use crate::ctx::MathContext;
use crate::fragment::Corner;
use crate::geom::{Color, Point};
use crate::list::MathListLayoutFragment;

/// A nucleus with attached scripts.
///
/// Carries up to four scripts: pre- and post-scripts above and below the
/// baseline. When the nucleus's limits policy is active for the current
/// style, the post-scripts stack above and below the nucleus instead of
/// attaching to its side.
#[derive(Debug, Clone)]
pub struct AttachFragment {
    pub nucleus: MathListLayoutFragment,
    pub lsub: Option<MathListLayoutFragment>,
    pub lsup: Option<MathListLayoutFragment>,
    pub sub: Option<MathListLayoutFragment>,
    pub sup: Option<MathListLayoutFragment>,
    limits_active: bool,
    nucleus_pos: Point,
    lsub_pos: Point,
    lsup_pos: Point,
    sub_pos: Point,
    sup_pos: Point,
    width: f64,
    ascent: f64,
    descent: f64,
}

/// The extent of a script, as far as shift computation cares.
type Extent = Option<(f64, f64)>;

/// The font parameters script placement depends on, in points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScriptParams {
    /// Cramped formulas use the cramped variant of superscript-shift-up.
    pub sup_shift_up: f64,
    pub sup_bottom_min: f64,
    pub sup_bottom_max_with_sub: f64,
    pub sup_drop_max: f64,
    pub gap_min: f64,
    pub sub_shift_down: f64,
    pub sub_top_max: f64,
    pub sub_drop_min: f64,
}

/// The distance from the base's baseline to the superscripts' and
/// subscripts' baselines.
pub(crate) fn compute_script_shifts(
    params: &ScriptParams,
    base: (f64, f64, bool),
    tl: Extent,
    tr: Extent,
    bl: Extent,
    br: Extent,
) -> (f64, f64) {
    let (base_ascent, base_descent, text_like) = base;
    let mut shift_up: f64 = 0.0;
    let mut shift_down: f64 = 0.0;

    if tl.is_some() || tr.is_some() {
        let drop = if text_like { 0.0 } else { base_ascent - params.sup_drop_max };
        shift_up = shift_up
            .max(params.sup_shift_up)
            .max(drop)
            .max(params.sup_bottom_min + tl.map_or(0.0, |(_, descent)| descent))
            .max(params.sup_bottom_min + tr.map_or(0.0, |(_, descent)| descent));
    }

    if bl.is_some() || br.is_some() {
        let drop = if text_like { 0.0 } else { base_descent + params.sub_drop_min };
        shift_down = shift_down
            .max(params.sub_shift_down)
            .max(drop)
            .max(bl.map_or(0.0, |(ascent, _)| ascent) - params.sub_top_max)
            .max(br.map_or(0.0, |(ascent, _)| ascent) - params.sub_top_max);
    }

    // Push colliding sub/sup pairs apart, preferring to move the
    // superscript up as far as allowed before distributing the rest.
    for (sup, sub) in [(tl, bl), (tr, br)] {
        if let (Some((_, sup_descent)), Some((sub_ascent, _))) = (sup, sub) {
            let sup_bottom = shift_up - sup_descent;
            let sub_top = sub_ascent - shift_down;
            let gap = sup_bottom - sub_top;
            if gap >= params.gap_min {
                continue;
            }
            let increase = params.gap_min - gap;
            let sup_only =
                (params.sup_bottom_max_with_sub - sup_bottom).clamp(0.0, increase);
            let rest = (increase - sup_only) / 2.0;
            shift_up += sup_only + rest;
            shift_down += rest;
        }
    }

    (shift_up, shift_down)
}

/// The font parameters limit placement depends on, in points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LimitParams {
    pub upper_gap_min: f64,
    pub upper_rise_min: f64,
    pub lower_gap_min: f64,
    pub lower_drop_min: f64,
}

/// The distance from the base's baseline to the upper and lower limit's
/// baselines.
///
/// The gap minimums constrain the distance to the limits' ink, the
/// rise/drop minimums constrain the baseline distance itself.
pub(crate) fn compute_limit_shifts(
    params: &LimitParams,
    base: (f64, f64),
    t: Extent,
    b: Extent,
) -> (f64, f64) {
    let (base_ascent, base_descent) = base;

    let t_shift = t.map_or(0.0, |(_, descent)| {
        base_ascent + params.upper_rise_min.max(params.upper_gap_min + descent)
    });
    let b_shift = b.map_or(0.0, |(ascent, _)| {
        base_descent + params.lower_drop_min.max(params.lower_gap_min + ascent)
    });

    (t_shift, b_shift)
}

impl AttachFragment {
    pub fn new(
        nucleus: MathListLayoutFragment,
        lsub: Option<MathListLayoutFragment>,
        lsup: Option<MathListLayoutFragment>,
        sub: Option<MathListLayoutFragment>,
        sup: Option<MathListLayoutFragment>,
    ) -> Self {
        Self {
            nucleus,
            lsub,
            lsup,
            sub,
            sup,
            limits_active: false,
            nucleus_pos: Point::zero(),
            lsub_pos: Point::zero(),
            lsup_pos: Point::zero(),
            sub_pos: Point::zero(),
            sup_pos: Point::zero(),
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
        self.nucleus.class()
    }

    /// Whether the last layout stacked the post-scripts as limits.
    pub fn is_limits_active(&self) -> bool {
        self.limits_active
    }

    pub fn nucleus_pos(&self) -> Point {
        self.nucleus_pos
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        self.limits_active = self.nucleus.limits().active(ctx.style());

        let extent = |list: Option<&MathListLayoutFragment>| {
            list.map(|list| (list.ascent(), list.descent()))
        };

        let tl = self.lsup.as_ref();
        let bl = self.lsub.as_ref();
        let (t, tr) = if self.limits_active {
            (self.sup.as_ref(), None)
        } else {
            (None, self.sup.as_ref())
        };
        let (b, br) = if self.limits_active {
            (self.sub.as_ref(), None)
        } else {
            (None, self.sub.as_ref())
        };

        let base_ascent = self.nucleus.ascent();
        let base_descent = self.nucleus.descent();
        let base_width = self.nucleus.width();
        let base_italics = self.nucleus.italics_correction();

        // Baseline distances for side scripts and for limits.
        let (tx_shift, bx_shift) = if tl.is_none() && tr.is_none() && bl.is_none() && br.is_none()
        {
            (0.0, 0.0)
        } else {
            let params = ScriptParams {
                sup_shift_up: if ctx.cramped() {
                    scaled!(ctx, superscript_shift_up_cramped)
                } else {
                    scaled!(ctx, superscript_shift_up)
                },
                sup_bottom_min: scaled!(ctx, superscript_bottom_min),
                sup_bottom_max_with_sub: scaled!(ctx, superscript_bottom_max_with_subscript),
                sup_drop_max: scaled!(ctx, superscript_baseline_drop_max),
                gap_min: scaled!(ctx, sub_superscript_gap_min),
                sub_shift_down: scaled!(ctx, subscript_shift_down),
                sub_top_max: scaled!(ctx, subscript_top_max),
                sub_drop_min: scaled!(ctx, subscript_baseline_drop_min),
            };
            compute_script_shifts(
                &params,
                (base_ascent, base_descent, self.nucleus.is_text_like()),
                extent(tl),
                extent(tr),
                extent(bl),
                extent(br),
            )
        };

        let limit_params = LimitParams {
            upper_gap_min: scaled!(ctx, upper_limit_gap_min),
            upper_rise_min: scaled!(ctx, upper_limit_baseline_rise_min),
            lower_gap_min: scaled!(ctx, lower_limit_gap_min),
            lower_drop_min: scaled!(ctx, lower_limit_baseline_drop_min),
        };
        let (t_shift, b_shift) = compute_limit_shifts(
            &limit_params,
            (base_ascent, base_descent),
            extent(t),
            extent(b),
        );

        let ascent = base_ascent
            .max(tx_shift + tr.map_or(0.0, |tr| tr.ascent()))
            .max(tx_shift + tl.map_or(0.0, |tl| tl.ascent()))
            .max(t_shift + t.map_or(0.0, |t| t.ascent()));
        let descent = base_descent
            .max(bx_shift + br.map_or(0.0, |br| br.descent()))
            .max(bx_shift + bl.map_or(0.0, |bl| bl.descent()))
            .max(b_shift + b.map_or(0.0, |b| b.descent()));

        // Limits center on the base, offset by half the italics correction.
        let delta = base_italics / 2.0;
        let (t_pre_width, t_post_width) = t.map_or((0.0, 0.0), |t| {
            let half = (t.width() - base_width) / 2.0;
            (half - delta, half + delta)
        });
        let (b_pre_width, b_post_width) = b.map_or((0.0, 0.0), |b| {
            let half = (b.width() - base_width) / 2.0;
            (half + delta, half - delta)
        });

        // Extra spacing before each pre-script and after each post-script
        // (see the MathConstants table in the OpenType MATH spec).
        let space_after_script = scaled!(ctx, space_after_script);

        let tl_pre_width = tl.map_or(0.0, |tl| {
            let kern = self.math_kern(tl, tx_shift, Corner::TopLeft);
            space_after_script + tl.width() + kern
        });
        let bl_pre_width = bl.map_or(0.0, |bl| {
            let kern = self.math_kern(bl, bx_shift, Corner::BottomLeft);
            space_after_script + bl.width() + kern
        });

        let (tr_post_width, tr_kern) = tr.map_or((0.0, 0.0), |tr| {
            let kern = self.math_kern(tr, tx_shift, Corner::TopRight);
            (space_after_script + tr.width() + kern, kern)
        });
        // The base's width accounts for its italics correction, so the
        // post-subscript moves back towards the glyph by that amount.
        let (br_post_width, br_kern) = br.map_or((0.0, 0.0), |br| {
            let kern = self.math_kern(br, bx_shift, Corner::BottomRight) - base_italics;
            (space_after_script + br.width() + kern, kern)
        });

        let pre_width = t_pre_width
            .max(b_pre_width)
            .max(tl_pre_width)
            .max(bl_pre_width)
            .max(0.0);
        let post_width =
            t_post_width.max(b_post_width).max(tr_post_width).max(br_post_width).max(0.0);
        let width = pre_width + base_width + post_width;

        self.nucleus_pos = Point::with_x(pre_width);
        self.lsup_pos =
            Point::new(pre_width - tl_pre_width + space_after_script, -tx_shift);
        self.lsub_pos =
            Point::new(pre_width - bl_pre_width + space_after_script, bx_shift);
        if self.limits_active {
            self.sup_pos = Point::new(pre_width - t_pre_width, -t_shift);
            self.sub_pos = Point::new(pre_width - b_pre_width, b_shift);
        } else {
            self.sup_pos = Point::new(pre_width + base_width + tr_kern, -tx_shift);
            self.sub_pos = Point::new(pre_width + base_width + br_kern, bx_shift);
        }

        self.width = width;
        self.ascent = ascent;
        self.descent = descent;
    }

    /// The kerning between the nucleus and a script at a corner, from the
    /// MATH kern-info table. Zero unless both resolve to single glyphs.
    fn math_kern(
        &self,
        script: &MathListLayoutFragment,
        shift: f64,
        corner: Corner,
    ) -> f64 {
        // Correction heights per the MathKernInfo algorithm: the top of the
        // base relative to the script's baseline and the edge of the script
        // relative to the base's baseline.
        let (height_top, height_bottom) = match corner {
            Corner::TopLeft | Corner::TopRight => {
                (self.nucleus.ascent() - shift, shift - script.descent())
            }
            Corner::BottomLeft | Corner::BottomRight => {
                (script.ascent() - shift, shift - self.nucleus.descent())
            }
        };

        let summed = |height: f64| {
            let base_kern = self
                .nucleus
                .single_glyph()
                .map_or(0.0, |glyph| glyph.kern_at_height(corner, height));
            let script_kern = script.single_glyph().map_or(0.0, |glyph| {
                glyph.kern_at_height(corner.diagonally_opposite(), height)
            });
            base_kern + script_kern
        };

        // Kern values are usually negative; taking the maximum keeps the
        // glyphs from colliding.
        summed(height_top).max(summed(height_bottom))
    }

    pub fn draw(&self, at: Point, _color: Color, canvas: &mut dyn Canvas) {
        self.nucleus.draw(at + self.nucleus_pos, canvas);
        if let Some(lsub) = &self.lsub {
            lsub.draw(at + self.lsub_pos, canvas);
        }
        if let Some(lsup) = &self.lsup {
            lsup.draw(at + self.lsup_pos, canvas);
        }
        if let Some(sub) = &self.sub {
            sub.draw(at + self.sub_pos, canvas);
        }
        if let Some(sup) = &self.sup {
            sup.draw(at + self.sup_pos, canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPTS: ScriptParams = ScriptParams {
        sup_shift_up: 5.0,
        sup_bottom_min: 2.0,
        sup_bottom_max_with_sub: 4.0,
        sup_drop_max: 3.0,
        gap_min: 2.0,
        sub_shift_down: 3.0,
        sub_top_max: 2.5,
        sub_drop_min: 1.0,
    };

    const LIMITS: LimitParams = LimitParams {
        upper_gap_min: 1.5,
        upper_rise_min: 4.0,
        lower_gap_min: 1.0,
        lower_drop_min: 3.5,
    };

    #[test]
    fn no_scripts_mean_no_shifts() {
        let shifts = compute_script_shifts(&SCRIPTS, (6.0, 2.0, true), None, None, None, None);
        assert_eq!(shifts, (0.0, 0.0));
    }

    #[test]
    fn superscript_shift_honors_the_bottom_minimum() {
        // A deep superscript pushes itself up past the default shift.
        let (up, down) =
            compute_script_shifts(&SCRIPTS, (6.0, 2.0, true), None, Some((4.0, 6.0)), None, None);
        assert_eq!(up, SCRIPTS.sup_bottom_min + 6.0);
        assert_eq!(down, 0.0);
    }

    #[test]
    fn tall_bases_drop_their_scripts() {
        // For a non-text-like base the superscript rides on the base's
        // ascent minus the maximum drop.
        let (up, _) =
            compute_script_shifts(&SCRIPTS, (12.0, 2.0, false), None, Some((3.0, 1.0)), None, None);
        assert_eq!(up, 12.0 - SCRIPTS.sup_drop_max);

        // Text-like bases do not.
        let (up, _) =
            compute_script_shifts(&SCRIPTS, (12.0, 2.0, true), None, Some((3.0, 1.0)), None, None);
        assert_eq!(up, SCRIPTS.sup_shift_up);
    }

    #[test]
    fn colliding_scripts_are_pushed_apart() {
        let sup = Some((3.0, 3.0));
        let sub = Some((4.0, 1.0));
        let (up, down) =
            compute_script_shifts(&SCRIPTS, (6.0, 2.0, true), None, sup, None, sub);
        let gap = (up - 3.0) - (4.0 - down);
        assert!(gap >= SCRIPTS.gap_min - 1e-9);
    }

    #[test]
    fn limit_shifts_clear_base_and_gap() {
        let (t, b) = compute_limit_shifts(&LIMITS, (6.0, 2.0), Some((3.0, 1.0)), Some((2.0, 1.0)));
        // Upper: ascent + max(rise_min, gap_min + limit descent).
        assert_eq!(t, 6.0 + 4.0_f64.max(1.5 + 1.0));
        // Lower: descent + max(drop_min, gap_min + limit ascent).
        assert_eq!(b, 2.0 + 3.5_f64.max(1.0 + 2.0));
    }

    #[test]
    fn absent_limits_have_zero_shift() {
        assert_eq!(compute_limit_shifts(&LIMITS, (6.0, 2.0), None, None), (0.0, 0.0));
    }
}
