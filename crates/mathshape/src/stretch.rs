use ttf_parser::math::GlyphPart;

use crate::ctx::MathContext;
use crate::fragment::{GlyphComposite, GlyphFragment, MathFragment, VariantFragment};
use crate::geom::{Axis, Em, Point};

/// How much less high stretched delimiters can be than what they wrap.
pub const DELIM_SHORT_FALL: Em = Em::new(0.1);

/// The implementation safety valve on extender repetition.
const MAX_REPEATS: usize = 1024;

/// Try to stretch a glyph to a target extent along an axis.
///
/// Produces a fragment at least `target - shortfall` long along the axis,
/// preferring the smallest adequate option: the base glyph itself, then the
/// font's pre-made size variants in increasing order, then a glyph assembly.
/// If the font offers nothing adequate, the best available glyph is returned
/// unchanged; undersized results are a degradation, not an error.
pub fn stretch_glyph(
    base: GlyphFragment,
    axis: Axis,
    target: f64,
    shortfall: f64,
    ctx: &MathContext,
) -> MathFragment {
    let min_advance = target - shortfall;

    let advance = match axis {
        Axis::Horizontal => base.width,
        Axis::Vertical => base.height(),
    };
    if advance >= min_advance {
        return base.into();
    }

    let font = base.font.clone();
    let Some(construction) = font.construction(axis, base.glyph) else {
        return base.into();
    };

    // Scan the pre-made variants; they are sorted by increasing advance.
    let mut best = base.glyph;
    for variant in construction.variants {
        best = variant.variant_glyph;
        if font.to_points(variant.advance_measurement) >= min_advance {
            return resized(&base, best).into();
        }
    }

    let Some(assembly) = construction.assembly else {
        // No assembly table: degrade to the largest variant seen.
        if best == base.glyph {
            return base.into();
        }
        return resized(&base, best).into();
    };

    let parts: Vec<AssemblyPart> =
        assembly.parts.into_iter().map(AssemblyPart::from_ttf).collect();
    if parts.is_empty() {
        return base.into();
    }

    // Plan in design units; they are exact where points are scaled.
    let units_per_point = font.units_per_em() / font.size();
    let plan = plan_assembly(&parts, font.min_connector_overlap(), target * units_per_point);

    if plan.overlap_violation {
        log::warn!(
            "glyph assembly for '{}' declares a connector overlap below the \
             font's minimum connector overlap; this is a font bug",
            base.ch,
        );
    }

    assemble(&base, axis, &plan, font.min_connector_overlap(), ctx).into()
}

/// Stretch a fragment in place if it is a glyph; other fragments are left
/// untouched.
pub fn stretch_fragment(
    ctx: &MathContext,
    fragment: &mut MathFragment,
    axis: Axis,
    target: f64,
    shortfall: f64,
) {
    if let MathFragment::Glyph(glyph) = fragment {
        *fragment = stretch_glyph(glyph.clone(), axis, target, shortfall, ctx);
    }
}

/// Pre-stretch a large operator for display style and center it on the
/// axis (TeXbook p. 155).
pub fn stretch_display_operator(glyph: GlyphFragment, ctx: &MathContext) -> MathFragment {
    let min_height = scaled!(ctx, display_operator_min_height);
    let target = min_height.max(glyph.height() * std::f64::consts::SQRT_2);
    glyph.stretch_vertical(ctx, target, 0.0).center_on_axis(ctx)
}

/// The same character shaped as a different (larger) glyph of the font.
fn resized(base: &GlyphFragment, glyph: ttf_parser::GlyphId) -> GlyphFragment {
    GlyphFragment::with_id(base.font.clone(), base.ch, glyph)
}

/// A single piece of a glyph assembly.
#[derive(Debug, Copy, Clone)]
pub(crate) struct AssemblyPart {
    pub glyph: ttf_parser::GlyphId,
    pub start_connector: u16,
    pub end_connector: u16,
    pub full_advance: u16,
    pub extender: bool,
}

impl AssemblyPart {
    fn from_ttf(part: GlyphPart) -> Self {
        Self {
            glyph: part.glyph_id,
            start_connector: part.start_connector_length,
            end_connector: part.end_connector_length,
            full_advance: part.full_advance,
            extender: part.part_flags.extender(),
        }
    }
}

/// The chosen parts list of an assembly, together with how far to spread
/// the junctions apart (0 for maximal overlap, 1 for minimal overlap).
#[derive(Debug)]
pub(crate) struct AssemblyPlan {
    pub parts: Vec<AssemblyPart>,
    pub ratio: f64,
    /// The total advance in design units.
    pub total_advance: f64,
    pub overlap_violation: bool,
}

/// Search for the number of extender repetitions that reaches the target
/// advance (in design units), preferring fewer repetitions and maximal
/// overlap.
pub(crate) fn plan_assembly(
    parts: &[AssemblyPart],
    min_overlap: u16,
    target: f64,
) -> AssemblyPlan {
    let mut chosen = Vec::new();
    let mut ratio = 0.0;
    let mut total = 0.0;
    let mut violation = false;

    // Without extenders every repetition count yields the same parts list.
    let max_repeats =
        if parts.iter().any(|part| part.extender) { MAX_REPEATS } else { 1 };

    for repeats in 0..max_repeats {
        chosen = expand(parts, repeats);
        let (advance, stretch, bad) = natural_extent(&chosen, min_overlap);
        violation |= bad;
        ratio = 0.0;
        total = advance;

        if advance >= target {
            break;
        }
        if stretch > 0.0 && advance + stretch >= target {
            ratio = ((target - advance) / stretch).clamp(0.0, 1.0);
            total = target;
            break;
        }
    }

    AssemblyPlan { parts: chosen, ratio, total_advance: total, overlap_violation: violation }
}

/// The parts list with every extender repeated `repeats` times.
fn expand(parts: &[AssemblyPart], repeats: usize) -> Vec<AssemblyPart> {
    let mut expanded = Vec::new();
    for &part in parts {
        let count = if part.extender { repeats } else { 1 };
        expanded.extend(std::iter::repeat(part).take(count));
    }
    expanded
}

/// The total advance at maximal overlap and the total stretchability of a
/// parts list, in design units. Also reports whether the font declares a
/// connector shorter than its own minimum overlap.
fn natural_extent(parts: &[AssemblyPart], min_overlap: u16) -> (f64, f64, bool) {
    let min_overlap = f64::from(min_overlap);
    let mut advance = 0.0;
    let mut stretch = 0.0;
    let mut violation = false;

    for (i, part) in parts.iter().enumerate() {
        advance += f64::from(part.full_advance);
        if let Some(next) = parts.get(i + 1) {
            let raw = f64::from(part.end_connector.min(next.start_connector));
            if raw < min_overlap {
                violation = true;
            }
            let overlap = raw.max(min_overlap);
            advance -= overlap;
            stretch += overlap - min_overlap;
        }
    }

    (advance, stretch, violation)
}

/// The advance of a part within a planned assembly, in design units.
fn part_advance(plan: &AssemblyPlan, index: usize, min_overlap: u16) -> f64 {
    let part = &plan.parts[index];
    let mut advance = f64::from(part.full_advance);
    if let Some(next) = plan.parts.get(index + 1) {
        let min_overlap = f64::from(min_overlap);
        let overlap =
            f64::from(part.end_connector.min(next.start_connector)).max(min_overlap);
        advance -= overlap;
        advance += plan.ratio * (overlap - min_overlap);
    }
    advance
}

/// Lay the planned parts out contiguously along the axis.
fn assemble(
    base: &GlyphFragment,
    axis: Axis,
    plan: &AssemblyPlan,
    min_overlap: u16,
    ctx: &MathContext,
) -> VariantFragment {
    let font = &base.font;
    let points_per_unit = font.size() / font.units_per_em();
    let total_advance = plan.total_advance * points_per_unit;

    struct Piece {
        glyph: ttf_parser::GlyphId,
        width: f64,
        descent: f64,
        advance: f64,
    }

    let pieces: Vec<Piece> = plan
        .parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let (_, descent) = font.glyph_extents(part.glyph);
            Piece {
                glyph: part.glyph,
                width: font.advance(part.glyph).unwrap_or(0.0),
                descent,
                advance: part_advance(plan, i, min_overlap) * points_per_unit,
            }
        })
        .collect();

    let (width, ascent, descent, accent_attach) = match axis {
        Axis::Horizontal => {
            (total_advance, base.ascent, base.descent, total_advance / 2.0)
        }
        Axis::Vertical => {
            let axis_height = scaled!(ctx, axis_height);
            let width = pieces.iter().map(|piece| piece.width).fold(0.0, f64::max);
            let ascent = total_advance / 2.0 + axis_height;
            (width, ascent, total_advance - ascent, base.accent_attach)
        }
    };

    // Vertical assemblies list their parts bottom-up.
    let mut offset = 0.0;
    let glyphs = pieces
        .iter()
        .map(|piece| {
            let position = match axis {
                Axis::Horizontal => Point::with_x(offset),
                Axis::Vertical => Point::with_y(descent - offset - piece.descent),
            };
            offset += piece.advance;
            (piece.glyph, position)
        })
        .collect();

    VariantFragment {
        ch: base.ch,
        composite: GlyphComposite::new(font.clone(), glyphs, width, ascent, descent),
        italics_correction: 0.0,
        accent_attach,
        class: base.class,
        limits: base.limits,
        extended_shape: base.extended_shape,
        layout_len: base.layout_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_parser::GlyphId;

    fn fixed(advance: u16, start: u16, end: u16) -> AssemblyPart {
        AssemblyPart {
            glyph: GlyphId(1),
            start_connector: start,
            end_connector: end,
            full_advance: advance,
            extender: false,
        }
    }

    fn extender(advance: u16, start: u16, end: u16) -> AssemblyPart {
        AssemblyPart { extender: true, ..fixed(advance, start, end) }
    }

    /// A brace-like construction: two hooks around a repeatable bar.
    fn brace_parts() -> Vec<AssemblyPart> {
        vec![fixed(300, 0, 100), extender(500, 100, 100), fixed(300, 100, 0)]
    }

    #[test]
    fn base_parts_suffice_for_small_targets() {
        let plan = plan_assembly(&brace_parts(), 20, 500.0);
        // Zero extender repetitions: just the two hooks.
        assert_eq!(plan.parts.len(), 2);
        assert_eq!(plan.ratio, 0.0);
        assert!(plan.total_advance >= 500.0);
    }

    #[test]
    fn extenders_are_repeated_until_the_target_is_reached() {
        let plan = plan_assembly(&brace_parts(), 20, 3000.0);
        assert!(plan.total_advance >= 3000.0);
        let extenders = plan.parts.iter().filter(|part| part.extender).count();
        assert!(extenders >= 5);
        // Fixed parts appear exactly once each.
        assert_eq!(plan.parts.iter().filter(|part| !part.extender).count(), 2);
    }

    #[test]
    fn ratio_interpolates_between_overlap_extremes() {
        // Two hooks overlap naturally to 300 + 300 - 100 = 500 units and can
        // spread up to 580 units (overlap relaxed from 100 down to 20).
        let plan = plan_assembly(&brace_parts(), 20, 540.0);
        assert_eq!(plan.parts.len(), 2);
        assert!(plan.ratio > 0.0 && plan.ratio < 1.0);
        assert!((plan.total_advance - 540.0).abs() < 1e-9);
    }

    #[test]
    fn stretch_is_monotonic_in_the_target() {
        let parts = brace_parts();
        let mut previous = 0.0;
        for target in [100.0, 500.0, 800.0, 1300.0, 2100.0, 3400.0, 5500.0] {
            let plan = plan_assembly(&parts, 20, target);
            assert!(plan.total_advance >= previous);
            assert!(plan.total_advance >= target);
            previous = plan.total_advance;
        }
    }

    #[test]
    fn junction_overlaps_respect_the_floor() {
        for target in [500.0, 540.0, 1000.0, 2500.0] {
            let plan = plan_assembly(&brace_parts(), 20, target);
            for (i, part) in plan.parts.iter().enumerate() {
                let Some(next) = plan.parts.get(i + 1) else { break };
                let declared =
                    f64::from(part.end_connector.min(next.start_connector)).max(20.0);
                let applied = declared - plan.ratio * (declared - 20.0);
                assert!(applied >= 20.0 - 1e-9);
                assert!(applied <= declared + 1e-9);
            }
        }
    }

    #[test]
    fn declared_overlap_below_the_floor_is_flagged_and_clamped() {
        let parts = vec![fixed(300, 0, 5), fixed(300, 5, 0)];
        let plan = plan_assembly(&parts, 20, 100.0);
        assert!(plan.overlap_violation);
        // The junction is clamped to the floor: 300 + 300 - 20.
        assert_eq!(plan.total_advance, 580.0);
    }

    #[test]
    fn undersized_assembly_is_a_degradation_not_an_error() {
        // No extenders and a target far beyond reach: the plan settles on
        // the natural extent of the fixed parts at maximal overlap.
        let parts = vec![fixed(300, 0, 50), fixed(300, 50, 0)];
        let plan = plan_assembly(&parts, 20, 10_000.0);
        assert_eq!(plan.parts.len(), 2);
        assert_eq!(plan.ratio, 0.0);
        assert_eq!(plan.total_advance, 550.0);
    }

    #[test]
    fn assembly_reaches_at_least_the_required_minimum() {
        // A 10pt-equivalent base stretched towards 60pt with 2pt shortfall
        // corresponds to a 58pt minimum; with the bar repeated often enough
        // the plan overshoots rather than undershoots.
        let plan = plan_assembly(&brace_parts(), 20, 5800.0);
        assert!(plan.total_advance >= 5800.0);
    }
}
