use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use ttf_parser::math::{GlyphConstruction, KernInfo};
use ttf_parser::GlyphId;

use crate::geom::{Axis, Em};

/// An error that can occur while resolving a math font.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The font data could not be parsed.
    #[error("failed to parse font data: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),
    /// The font has no MATH table.
    #[error("font has no MATH table")]
    MissingMathTable,
    /// The font has a MATH table, but no constants in it.
    #[error("font's MATH table has no constants")]
    MissingMathConstants,
}

/// A handle to a math font at a specific size.
///
/// Cheap to clone. Resizing with [`with_size`](Self::with_size) shares the
/// parsed face, so deriving script-size fonts does not re-parse the data.
#[derive(Clone)]
pub struct MathFont {
    shared: Arc<FaceRepr>,
    size: f64,
}

struct FaceRepr {
    /// The parsed face.
    ///
    /// Declared before `data` so that it is dropped first.
    face: ttf_parser::Face<'static>,
    /// The raw font data the face borrows from.
    #[allow(dead_code)]
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: f64,
    math: MathConstants,
}

impl MathFont {
    /// Parse a font and resolve its math constants.
    ///
    /// Fails if the data is not a valid font or if the font carries no MATH
    /// table with constants. Callers are expected to fall back to a bundled
    /// default math font in that case.
    pub fn new(data: Arc<Vec<u8>>, index: u32, size: f64) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, index)?;

        // SAFETY: The slice the face borrows from is owned by the `Arc` kept
        // alive in the same `FaceRepr`, is never mutated, and outlives the
        // face because `face` is dropped first.
        let face: ttf_parser::Face<'static> = unsafe {
            std::mem::transmute::<ttf_parser::Face<'_>, ttf_parser::Face<'static>>(face)
        };

        let units_per_em = f64::from(face.units_per_em());
        let math = MathConstants::resolve(&face, units_per_em)?;

        Ok(Self {
            shared: Arc::new(FaceRepr { face, data, index, units_per_em, math }),
            size,
        })
    }

    /// The same font at a different size.
    pub fn with_size(&self, size: f64) -> Self {
        Self { shared: self.shared.clone(), size }
    }

    /// The font size in points.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// The number of design units per em.
    pub fn units_per_em(&self) -> f64 {
        self.shared.units_per_em
    }

    /// The face index within the font data.
    pub fn index(&self) -> u32 {
        self.shared.index
    }

    /// The resolved math constants of this font.
    pub fn math(&self) -> &MathConstants {
        &self.shared.math
    }

    /// The underlying face.
    pub fn ttf(&self) -> &ttf_parser::Face<'static> {
        &self.shared.face
    }

    /// Convert a length in design units to an em length.
    pub fn to_em(&self, units: impl Into<f64>) -> Em {
        Em::from_units(units, self.shared.units_per_em)
    }

    /// Convert a length in design units to points at this font's size.
    pub fn to_points(&self, units: impl Into<f64>) -> f64 {
        self.to_em(units).at(self.size)
    }

    /// Look up the glyph for a character.
    pub fn glyph_index(&self, c: char) -> Option<GlyphId> {
        self.ttf().glyph_index(c)
    }

    /// The horizontal advance of a glyph in points.
    pub fn advance(&self, glyph: GlyphId) -> Option<f64> {
        self.ttf().glyph_hor_advance(glyph).map(|advance| self.to_points(advance))
    }

    /// The ink ascent and descent of a glyph in points.
    ///
    /// A glyph without outlines (e.g. a space) has zero extent.
    pub fn glyph_extents(&self, glyph: GlyphId) -> (f64, f64) {
        match self.ttf().glyph_bounding_box(glyph) {
            Some(bbox) => (
                self.to_points(bbox.y_max).max(0.0),
                self.to_points(-bbox.y_min).max(0.0),
            ),
            None => (0.0, 0.0),
        }
    }

    /// The italics correction of a glyph in points, if the font declares one.
    pub fn italics_correction(&self, glyph: GlyphId) -> Option<f64> {
        let table = self.ttf().tables().math?;
        let value = table.glyph_info?.italic_corrections?.get(glyph)?;
        Some(self.to_points(value.value))
    }

    /// The top accent attachment of a glyph in points, if declared.
    pub fn top_accent_attachment(&self, glyph: GlyphId) -> Option<f64> {
        let table = self.ttf().tables().math?;
        let value = table.glyph_info?.top_accent_attachments?.get(glyph)?;
        Some(self.to_points(value.value))
    }

    /// Whether the glyph is covered by the extended-shape table.
    pub fn is_extended_shape(&self, glyph: GlyphId) -> bool {
        self.ttf()
            .tables()
            .math
            .and_then(|table| table.glyph_info)
            .and_then(|info| info.extended_shapes)
            .is_some_and(|coverage| coverage.get(glyph).is_some())
    }

    /// The stretch construction for a glyph along an axis, if any.
    pub fn construction(&self, axis: Axis, glyph: GlyphId) -> Option<GlyphConstruction<'static>> {
        let variants = self.ttf().tables().math?.variants?;
        match axis {
            Axis::Horizontal => variants.horizontal_constructions,
            Axis::Vertical => variants.vertical_constructions,
        }
        .get(glyph)
    }

    /// The font's minimum connector overlap in design units.
    pub fn min_connector_overlap(&self) -> u16 {
        self.ttf()
            .tables()
            .math
            .and_then(|table| table.variants)
            .map_or(0, |variants| variants.min_connector_overlap)
    }

    /// The math kerning info for a glyph, if declared.
    pub fn kern_info(&self, glyph: GlyphId) -> Option<KernInfo<'static>> {
        self.ttf().tables().math?.glyph_info?.kern_infos?.get(glyph)
    }
}

impl Debug for MathFont {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "MathFont({}pt)", self.size)
    }
}

/// The constants of a font's MATH table, resolved to em lengths.
///
/// Em lengths are size-independent, so one resolved table serves every
/// size derived from the same face.
#[derive(Debug, Clone)]
pub struct MathConstants {
    pub script_percent_scale_down: f64,
    pub script_script_percent_scale_down: f64,
    pub display_operator_min_height: Em,

    pub axis_height: Em,
    pub accent_base_height: Em,
    pub flattened_accent_base_height: Em,

    pub fraction_rule_thickness: Em,
    pub fraction_numerator_shift_up: Em,
    pub fraction_numerator_display_style_shift_up: Em,
    pub fraction_denominator_shift_down: Em,
    pub fraction_denominator_display_style_shift_down: Em,
    pub fraction_numerator_gap_min: Em,
    pub fraction_num_display_style_gap_min: Em,
    pub fraction_denominator_gap_min: Em,
    pub fraction_denom_display_style_gap_min: Em,

    pub overbar_vertical_gap: Em,
    pub overbar_rule_thickness: Em,
    pub overbar_extra_ascender: Em,
    pub underbar_vertical_gap: Em,
    pub underbar_rule_thickness: Em,
    pub underbar_extra_descender: Em,

    pub radical_vertical_gap: Em,
    pub radical_display_style_vertical_gap: Em,
    pub radical_rule_thickness: Em,
    pub radical_extra_ascender: Em,
    pub radical_kern_before_degree: Em,
    pub radical_kern_after_degree: Em,
    pub radical_degree_bottom_raise_percent: f64,

    pub space_after_script: Em,
    pub superscript_shift_up: Em,
    pub superscript_shift_up_cramped: Em,
    pub superscript_bottom_min: Em,
    pub superscript_baseline_drop_max: Em,
    pub superscript_bottom_max_with_subscript: Em,
    pub subscript_shift_down: Em,
    pub subscript_top_max: Em,
    pub subscript_baseline_drop_min: Em,
    pub sub_superscript_gap_min: Em,

    pub upper_limit_gap_min: Em,
    pub upper_limit_baseline_rise_min: Em,
    pub lower_limit_gap_min: Em,
    pub lower_limit_baseline_drop_min: Em,
}

impl MathConstants {
    fn resolve(
        face: &ttf_parser::Face<'_>,
        units_per_em: f64,
    ) -> Result<Self, FontError> {
        let table = face.tables().math.ok_or(FontError::MissingMathTable)?;
        let constants = table.constants.ok_or(FontError::MissingMathConstants)?;

        let em = |value: ttf_parser::math::MathValue| {
            Em::from_units(value.value, units_per_em)
        };

        Ok(Self {
            script_percent_scale_down: f64::from(constants.script_percent_scale_down())
                / 100.0,
            script_script_percent_scale_down: f64::from(
                constants.script_script_percent_scale_down(),
            ) / 100.0,
            display_operator_min_height: Em::from_units(
                constants.display_operator_min_height(),
                units_per_em,
            ),

            axis_height: em(constants.axis_height()),
            accent_base_height: em(constants.accent_base_height()),
            flattened_accent_base_height: em(constants.flattened_accent_base_height()),

            fraction_rule_thickness: em(constants.fraction_rule_thickness()),
            fraction_numerator_shift_up: em(constants.fraction_numerator_shift_up()),
            fraction_numerator_display_style_shift_up: em(
                constants.fraction_numerator_display_style_shift_up(),
            ),
            fraction_denominator_shift_down: em(
                constants.fraction_denominator_shift_down(),
            ),
            fraction_denominator_display_style_shift_down: em(
                constants.fraction_denominator_display_style_shift_down(),
            ),
            fraction_numerator_gap_min: em(constants.fraction_numerator_gap_min()),
            fraction_num_display_style_gap_min: em(
                constants.fraction_num_display_style_gap_min(),
            ),
            fraction_denominator_gap_min: em(constants.fraction_denominator_gap_min()),
            fraction_denom_display_style_gap_min: em(
                constants.fraction_denom_display_style_gap_min(),
            ),

            overbar_vertical_gap: em(constants.overbar_vertical_gap()),
            overbar_rule_thickness: em(constants.overbar_rule_thickness()),
            overbar_extra_ascender: em(constants.overbar_extra_ascender()),
            underbar_vertical_gap: em(constants.underbar_vertical_gap()),
            underbar_rule_thickness: em(constants.underbar_rule_thickness()),
            underbar_extra_descender: em(constants.underbar_extra_descender()),

            radical_vertical_gap: em(constants.radical_vertical_gap()),
            radical_display_style_vertical_gap: em(
                constants.radical_display_style_vertical_gap(),
            ),
            radical_rule_thickness: em(constants.radical_rule_thickness()),
            radical_extra_ascender: em(constants.radical_extra_ascender()),
            radical_kern_before_degree: em(constants.radical_kern_before_degree()),
            radical_kern_after_degree: em(constants.radical_kern_after_degree()),
            radical_degree_bottom_raise_percent: f64::from(
                constants.radical_degree_bottom_raise_percent(),
            ) / 100.0,

            space_after_script: em(constants.space_after_script()),
            superscript_shift_up: em(constants.superscript_shift_up()),
            superscript_shift_up_cramped: em(constants.superscript_shift_up_cramped()),
            superscript_bottom_min: em(constants.superscript_bottom_min()),
            superscript_baseline_drop_max: em(constants.superscript_baseline_drop_max()),
            superscript_bottom_max_with_subscript: em(
                constants.superscript_bottom_max_with_subscript(),
            ),
            subscript_shift_down: em(constants.subscript_shift_down()),
            subscript_top_max: em(constants.subscript_top_max()),
            subscript_baseline_drop_min: em(constants.subscript_baseline_drop_min()),
            sub_superscript_gap_min: em(constants.sub_superscript_gap_min()),

            upper_limit_gap_min: em(constants.upper_limit_gap_min()),
            upper_limit_baseline_rise_min: em(constants.upper_limit_baseline_rise_min()),
            lower_limit_gap_min: em(constants.lower_limit_gap_min()),
            lower_limit_baseline_drop_min: em(constants.lower_limit_baseline_drop_min()),
        })
    }
}
