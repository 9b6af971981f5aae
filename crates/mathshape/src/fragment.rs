use ttf_parser::GlyphId;
use unicode_math_class::MathClass;

use crate::accent::AccentFragment;
use crate::array::ArrayFragment;
use crate::attach::AttachFragment;
use crate::class::default_math_class;
use crate::composition::{Canvas, MathComposition};
use crate::ctx::MathContext;
use crate::font::MathFont;
use crate::frac::FracFragment;
use crate::geom::{Axis, Color, Point, Rect};
use crate::list::MathListLayoutFragment;
use crate::radical::RadicalFragment;
use crate::stretch;
use crate::style::MathStyle;
use crate::underover::UnderOverFragment;

/// Whether a large operator's scripts render as limits (stacked above and
/// below) or as ordinary attached scripts.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Limits {
    /// Scripts attach to the side.
    #[default]
    Never,
    /// Scripts stack in display style only.
    Display,
    /// Scripts always stack.
    Always,
}

impl Limits {
    /// The default limit configuration if the given character is the base.
    pub fn for_char(c: char) -> Self {
        match default_math_class(c) {
            Some(MathClass::Large) => {
                if is_integral_char(c) {
                    Limits::Never
                } else {
                    Limits::Display
                }
            }
            Some(MathClass::Relation) => Limits::Always,
            _ => Limits::Never,
        }
    }

    /// The default limit configuration for a math class.
    pub fn for_class(class: MathClass) -> Self {
        match class {
            MathClass::Large => Self::Display,
            MathClass::Relation => Self::Always,
            _ => Self::Never,
        }
    }

    /// Whether limits apply in the given style.
    pub fn active(self, style: MathStyle) -> bool {
        match self {
            Self::Never => false,
            Self::Display => style == MathStyle::Display,
            Self::Always => true,
        }
    }
}

/// Integrals are Large operators, but their scripts never stack.
fn is_integral_char(c: char) -> bool {
    ('∫'..='∳').contains(&c) || ('⨋'..='⨜').contains(&c)
}

/// A corner of a glyph's bounding box, for math kerning.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// The diagonally opposite corner.
    pub fn diagonally_opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomRight => Self::TopLeft,
            Self::BottomLeft => Self::TopRight,
        }
    }
}

/// A shaped unit of math content.
///
/// Every variant satisfies the same flat metric contract, so composition
/// code never has to special-case kinds.
#[derive(Debug, Clone)]
pub enum MathFragment {
    Glyph(GlyphFragment),
    Variant(VariantFragment),
    Frame(FrameFragment),
    Rule(RuleFragment),
    Space(SpaceFragment),
    Clipped(ClippedFragment),
    Translated(TranslatedFragment),
    Colored(ColoredFragment),
    List(MathListLayoutFragment),
    Frac(FracFragment),
    Radical(RadicalFragment),
    Attach(AttachFragment),
    UnderOver(UnderOverFragment),
    Accent(AccentFragment),
    Array(ArrayFragment),
}

impl MathFragment {
    pub fn width(&self) -> f64 {
        match self {
            Self::Glyph(glyph) => glyph.width,
            Self::Variant(variant) => variant.composite.width,
            Self::Frame(frame) => frame.width,
            Self::Rule(rule) => rule.width,
            Self::Space(space) => space.width,
            Self::Clipped(clipped) => clipped.inner.width(),
            Self::Translated(translated) => translated.inner.width(),
            Self::Colored(colored) => colored.inner.width(),
            Self::List(list) => list.width(),
            Self::Frac(frac) => frac.width(),
            Self::Radical(radical) => radical.width(),
            Self::Attach(attach) => attach.width(),
            Self::UnderOver(underover) => underover.width(),
            Self::Accent(accent) => accent.width(),
            Self::Array(array) => array.width(),
        }
    }

    pub fn ascent(&self) -> f64 {
        match self {
            Self::Glyph(glyph) => glyph.ascent,
            Self::Variant(variant) => variant.composite.ascent,
            Self::Frame(frame) => frame.ascent,
            Self::Rule(rule) => rule.height / 2.0,
            Self::Space(_) => 0.0,
            Self::Clipped(clipped) => clipped.inner.ascent(),
            Self::Translated(translated) => {
                translated.inner.ascent() - translated.shift_down
            }
            Self::Colored(colored) => colored.inner.ascent(),
            Self::List(list) => list.ascent(),
            Self::Frac(frac) => frac.ascent(),
            Self::Radical(radical) => radical.ascent(),
            Self::Attach(attach) => attach.ascent(),
            Self::UnderOver(underover) => underover.ascent(),
            Self::Accent(accent) => accent.ascent(),
            Self::Array(array) => array.ascent(),
        }
    }

    pub fn descent(&self) -> f64 {
        match self {
            Self::Glyph(glyph) => glyph.descent,
            Self::Variant(variant) => variant.composite.descent,
            Self::Frame(frame) => frame.descent,
            Self::Rule(rule) => rule.height / 2.0,
            Self::Space(_) => 0.0,
            Self::Clipped(clipped) => clipped.inner.descent().min(clipped.cutoff),
            Self::Translated(translated) => {
                translated.inner.descent() + translated.shift_down
            }
            Self::Colored(colored) => colored.inner.descent(),
            Self::List(list) => list.descent(),
            Self::Frac(frac) => frac.descent(),
            Self::Radical(radical) => radical.descent(),
            Self::Attach(attach) => attach.descent(),
            Self::UnderOver(underover) => underover.descent(),
            Self::Accent(accent) => accent.descent(),
            Self::Array(array) => array.descent(),
        }
    }

    pub fn height(&self) -> f64 {
        self.ascent() + self.descent()
    }

    pub fn italics_correction(&self) -> f64 {
        match self {
            Self::Glyph(glyph) => glyph.italics_correction,
            Self::Variant(variant) => variant.italics_correction,
            Self::Frame(frame) => frame.italics_correction,
            Self::Clipped(clipped) => clipped.inner.italics_correction(),
            Self::Translated(translated) => translated.inner.italics_correction(),
            Self::Colored(colored) => colored.inner.italics_correction(),
            Self::List(list) => list.italics_correction(),
            _ => 0.0,
        }
    }

    /// The horizontal position accents attach at.
    pub fn accent_attach(&self) -> f64 {
        match self {
            Self::Glyph(glyph) => glyph.accent_attach,
            Self::Variant(variant) => variant.accent_attach,
            Self::Frame(frame) => frame.accent_attach,
            Self::Clipped(clipped) => clipped.inner.accent_attach(),
            Self::Translated(translated) => translated.inner.accent_attach(),
            Self::Colored(colored) => colored.inner.accent_attach(),
            Self::List(list) => list.accent_attach(),
            Self::Accent(accent) => accent.accent_attach(),
            _ => self.width() / 2.0,
        }
    }

    pub fn class(&self) -> MathClass {
        match self {
            Self::Glyph(glyph) => glyph.class,
            Self::Variant(variant) => variant.class,
            Self::Frame(frame) => frame.class,
            Self::Space(_) => MathClass::Space,
            Self::Clipped(clipped) => clipped.inner.class(),
            Self::Translated(translated) => translated.inner.class(),
            Self::Colored(colored) => colored.inner.class(),
            Self::List(list) => list.class(),
            Self::Attach(attach) => attach.class(),
            Self::UnderOver(underover) => underover.class(),
            Self::Accent(accent) => accent.class(),
            _ => MathClass::Normal,
        }
    }

    pub fn limits(&self) -> Limits {
        match self {
            Self::Glyph(glyph) => glyph.limits,
            Self::Variant(variant) => variant.limits,
            Self::Frame(frame) => frame.limits,
            Self::Clipped(clipped) => clipped.inner.limits(),
            Self::Translated(translated) => translated.inner.limits(),
            Self::Colored(colored) => colored.inner.limits(),
            Self::List(list) => list.limits(),
            Self::UnderOver(underover) => underover.limits(),
            _ => Limits::Never,
        }
    }

    /// Whether the fragment wants surrounding spaces kept.
    pub fn is_spaced(&self) -> bool {
        match self {
            Self::Glyph(glyph) => glyph.class == MathClass::Fence,
            Self::Variant(variant) => variant.class == MathClass::Fence,
            Self::Frame(frame) => frame.spaced,
            Self::Clipped(clipped) => clipped.inner.is_spaced(),
            Self::Translated(translated) => translated.inner.is_spaced(),
            Self::Colored(colored) => colored.inner.is_spaced(),
            Self::List(list) => list.is_spaced(),
            _ => false,
        }
    }

    /// Whether the fragment behaves like upright text for layout heuristics.
    pub fn is_text_like(&self) -> bool {
        match self {
            Self::Glyph(glyph) => glyph.class != MathClass::Large,
            Self::Variant(variant) => variant.extended_shape,
            Self::Frame(frame) => frame.text_like,
            Self::Clipped(clipped) => clipped.inner.is_text_like(),
            Self::Translated(translated) => translated.inner.is_text_like(),
            Self::Colored(colored) => colored.inner.is_text_like(),
            Self::List(list) => list.is_text_like(),
            _ => false,
        }
    }

    /// How many layout-length units the fragment occupies.
    pub fn layout_len(&self) -> usize {
        match self {
            Self::Glyph(glyph) => glyph.layout_len,
            Self::Variant(variant) => variant.layout_len,
            Self::Frame(frame) => frame.layout_len,
            Self::Clipped(clipped) => clipped.inner.layout_len(),
            Self::Translated(translated) => translated.inner.layout_len(),
            Self::Colored(colored) => colored.inner.layout_len(),
            _ => 1,
        }
    }

    /// Recompute the geometry of composite fragments.
    ///
    /// Leaf fragments are immutable and unaffected.
    pub fn fix_layout(&mut self, ctx: &MathContext) {
        match self {
            Self::Clipped(clipped) => clipped.inner.fix_layout(ctx),
            Self::Translated(translated) => translated.inner.fix_layout(ctx),
            Self::Colored(colored) => colored.inner.fix_layout(ctx),
            Self::List(list) => list.fix_layout(ctx),
            Self::Frac(frac) => frac.fix_layout(ctx),
            Self::Radical(radical) => radical.fix_layout(ctx),
            Self::Attach(attach) => attach.fix_layout(ctx),
            Self::UnderOver(underover) => underover.fix_layout(ctx),
            Self::Accent(accent) => accent.fix_layout(ctx),
            Self::Array(array) => array.fix_layout(ctx),
            _ => {}
        }
    }

    /// Draw the fragment with its baseline origin at `at`.
    pub fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        match self {
            Self::Glyph(glyph) => glyph.draw(at, color, canvas),
            Self::Variant(variant) => variant.composite.draw(at, color, canvas),
            Self::Frame(frame) => frame.items.draw(at, color, canvas),
            Self::Rule(rule) => rule.draw(at, color, canvas),
            Self::Space(_) => {}
            Self::Clipped(clipped) => {
                let rect = Rect::new(
                    at.x,
                    at.y - self.ascent(),
                    self.width(),
                    self.height(),
                );
                canvas.push_clip(rect);
                clipped.inner.draw(at, color, canvas);
                canvas.pop_clip();
            }
            Self::Translated(translated) => {
                let shifted = Point::new(at.x, at.y + translated.shift_down);
                translated.inner.draw(shifted, color, canvas);
            }
            Self::Colored(colored) => colored.inner.draw(at, colored.color, canvas),
            Self::List(list) => list.draw(at, canvas),
            Self::Frac(frac) => frac.draw(at, color, canvas),
            Self::Radical(radical) => radical.draw(at, color, canvas),
            Self::Attach(attach) => attach.draw(at, color, canvas),
            Self::UnderOver(underover) => underover.draw(at, color, canvas),
            Self::Accent(accent) => accent.draw(at, color, canvas),
            Self::Array(array) => array.draw(at, color, canvas),
        }
    }

    /// Center the fragment vertically on the math axis.
    pub fn center_on_axis(self, ctx: &MathContext) -> MathFragment {
        let axis = scaled!(ctx, axis_height);
        let shift = self.ascent() - (self.height() / 2.0 + axis);
        if shift == 0.0 {
            self
        } else {
            TranslatedFragment::new(self, shift).into()
        }
    }
}

macro_rules! fragment_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for MathFragment {
            fn from(fragment: $ty) -> Self {
                Self::$variant(fragment)
            }
        }
    };
}

fragment_from!(Glyph, GlyphFragment);
fragment_from!(Variant, VariantFragment);
fragment_from!(Frame, FrameFragment);
fragment_from!(Rule, RuleFragment);
fragment_from!(Space, SpaceFragment);
fragment_from!(Clipped, ClippedFragment);
fragment_from!(Translated, TranslatedFragment);
fragment_from!(Colored, ColoredFragment);
fragment_from!(List, MathListLayoutFragment);
fragment_from!(Frac, FracFragment);
fragment_from!(Radical, RadicalFragment);
fragment_from!(Attach, AttachFragment);
fragment_from!(UnderOver, UnderOverFragment);
fragment_from!(Accent, AccentFragment);
fragment_from!(Array, ArrayFragment);

/// A leaf fragment bound to a single font glyph.
#[derive(Debug, Clone)]
pub struct GlyphFragment {
    pub ch: char,
    pub glyph: GlyphId,
    pub font: MathFont,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub italics_correction: f64,
    pub accent_attach: f64,
    pub class: MathClass,
    pub limits: Limits,
    pub extended_shape: bool,
    pub layout_len: usize,
}

impl GlyphFragment {
    /// Shape a character in the context's current font.
    ///
    /// Returns `None` if the font has no glyph for the character. Resolving
    /// the same character twice yields identical metrics.
    pub fn new(ctx: &MathContext, c: char) -> Option<Self> {
        Self::in_font(ctx.font(), c)
    }

    /// Shape a character in a specific font.
    pub fn in_font(font: &MathFont, c: char) -> Option<Self> {
        let glyph = font.glyph_index(c)?;
        Some(Self::with_id(font.clone(), c, glyph))
    }

    /// Build a fragment for a known glyph id, e.g. a pre-made size variant.
    pub fn with_id(font: MathFont, c: char, glyph: GlyphId) -> Self {
        let advance = font.advance(glyph).unwrap_or(0.0);
        let (ascent, descent) = font.glyph_extents(glyph);
        let italics_correction = font.italics_correction(glyph).unwrap_or(0.0);
        let extended_shape = font.is_extended_shape(glyph);

        // Extended shapes carry their advance in full; for other glyphs the
        // italics correction contributes to the layout width.
        let mut width = advance;
        if !extended_shape {
            width += italics_correction;
        }

        let accent_attach = font
            .top_accent_attachment(glyph)
            .unwrap_or((advance + italics_correction) / 2.0);

        let class = default_math_class(c).unwrap_or(MathClass::Normal);
        let limits = Limits::for_char(c);
        let layout_len = c.len_utf16();

        Self {
            ch: c,
            glyph,
            font,
            width,
            ascent,
            descent,
            italics_correction,
            accent_attach,
            class,
            limits,
            extended_shape,
            layout_len,
        }
    }

    /// The height of the glyph.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// Stretch the glyph vertically to the given target height.
    pub fn stretch_vertical(
        self,
        ctx: &MathContext,
        target: f64,
        shortfall: f64,
    ) -> MathFragment {
        stretch::stretch_glyph(self, Axis::Vertical, target, shortfall, ctx)
    }

    /// Stretch the glyph horizontally to the given target width.
    pub fn stretch_horizontal(
        self,
        ctx: &MathContext,
        target: f64,
        shortfall: f64,
    ) -> MathFragment {
        stretch::stretch_glyph(self, Axis::Horizontal, target, shortfall, ctx)
    }

    /// Look up the math kerning value for a corner at a height above (for
    /// top corners) or below (for bottom corners) the baseline.
    pub fn kern_at_height(&self, corner: Corner, height: f64) -> f64 {
        let Some(info) = self.font.kern_info(self.glyph) else { return 0.0 };
        let kern = match corner {
            Corner::TopLeft => info.top_left,
            Corner::TopRight => info.top_right,
            Corner::BottomRight => info.bottom_right,
            Corner::BottomLeft => info.bottom_left,
        };
        let Some(kern) = kern else { return 0.0 };

        // The kern table has `count` correction heights partitioning the
        // axis into `count + 1` ranges, each with its own kern value.
        let mut i = 0;
        while i < kern.count() {
            match kern.height(i) {
                Some(h) if height > self.font.to_points(h.value) => i += 1,
                _ => break,
            }
        }
        kern.kern(i).map_or(0.0, |value| self.font.to_points(value.value))
    }

    fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        canvas.fill_glyph(&self.font, self.glyph, at, color);
    }
}

/// A synthesized (stretched) glyph.
///
/// Internally a composite of parts, but it exposes the same flat metric
/// contract as a plain glyph.
#[derive(Debug, Clone)]
pub struct VariantFragment {
    /// The base character the variant was built for.
    pub ch: char,
    pub composite: GlyphComposite,
    pub italics_correction: f64,
    pub accent_attach: f64,
    pub class: MathClass,
    pub limits: Limits,
    pub extended_shape: bool,
    pub layout_len: usize,
}

/// A positioned collection of glyphs from one font.
#[derive(Debug, Clone)]
pub struct GlyphComposite {
    font: MathFont,
    glyphs: Vec<(GlyphId, Point)>,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl GlyphComposite {
    pub fn new(
        font: MathFont,
        glyphs: Vec<(GlyphId, Point)>,
        width: f64,
        ascent: f64,
        descent: f64,
    ) -> Self {
        Self { font, glyphs, width, ascent, descent }
    }

    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        for &(glyph, position) in &self.glyphs {
            canvas.fill_glyph(&self.font, glyph, at + position, color);
        }
    }
}

/// A fragment with externally determined metrics, wrapping arbitrary
/// pre-composed content.
#[derive(Debug, Clone)]
pub struct FrameFragment {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub italics_correction: f64,
    pub accent_attach: f64,
    pub class: MathClass,
    pub limits: Limits,
    pub spaced: bool,
    pub text_like: bool,
    pub layout_len: usize,
    pub items: MathComposition,
}

impl FrameFragment {
    pub fn new(width: f64, ascent: f64, descent: f64) -> Self {
        Self {
            width,
            ascent,
            descent,
            italics_correction: 0.0,
            accent_attach: width / 2.0,
            class: MathClass::Normal,
            limits: Limits::Never,
            spaced: false,
            text_like: false,
            layout_len: 1,
            items: MathComposition::empty(),
        }
    }

    pub fn with_class(self, class: MathClass) -> Self {
        Self { class, ..self }
    }

    pub fn with_limits(self, limits: Limits) -> Self {
        Self { limits, ..self }
    }

    pub fn with_spaced(self, spaced: bool) -> Self {
        Self { spaced, ..self }
    }

    pub fn with_text_like(self, text_like: bool) -> Self {
        Self { text_like, ..self }
    }

    pub fn with_italics_correction(self, italics_correction: f64) -> Self {
        Self { italics_correction, ..self }
    }

    pub fn with_accent_attach(self, accent_attach: f64) -> Self {
        Self { accent_attach, ..self }
    }

    pub fn with_layout_len(self, layout_len: usize) -> Self {
        Self { layout_len, ..self }
    }

    pub fn with_items(self, items: MathComposition) -> Self {
        Self { items, ..self }
    }
}

/// A filled rectangle, vertically centered on its origin.
///
/// Used for fraction and radical rules and as a fallback for missing
/// stretchable glyphs.
#[derive(Debug, Clone)]
pub struct RuleFragment {
    pub width: f64,
    pub height: f64,
}

impl RuleFragment {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn draw(&self, at: Point, color: Color, canvas: &mut dyn Canvas) {
        canvas.fill_rect(
            Rect::new(at.x, at.y - self.height / 2.0, self.width, self.height),
            color,
        );
    }
}

/// An explicit space.
#[derive(Debug, Clone)]
pub struct SpaceFragment {
    pub width: f64,
}

impl SpaceFragment {
    pub fn new(width: f64) -> Self {
        Self { width }
    }
}

/// Truncates the descent of the wrapped fragment, clipping its drawing to
/// the reduced extent. Used for partial-height delimiters.
#[derive(Debug, Clone)]
pub struct ClippedFragment {
    pub inner: Box<MathFragment>,
    pub cutoff: f64,
}

impl ClippedFragment {
    pub fn new(inner: impl Into<MathFragment>, cutoff: f64) -> Self {
        Self { inner: Box::new(inner.into()), cutoff }
    }
}

/// Shifts the wrapped fragment down, adjusting ascent and descent
/// reciprocally.
#[derive(Debug, Clone)]
pub struct TranslatedFragment {
    pub inner: Box<MathFragment>,
    pub shift_down: f64,
}

impl TranslatedFragment {
    pub fn new(inner: impl Into<MathFragment>, shift_down: f64) -> Self {
        Self { inner: Box::new(inner.into()), shift_down }
    }
}

/// Overrides the fill color of the wrapped fragment at draw time.
#[derive(Debug, Clone)]
pub struct ColoredFragment {
    pub inner: Box<MathFragment>,
    pub color: Color,
}

impl ColoredFragment {
    pub fn new(inner: impl Into<MathFragment>, color: Color) -> Self {
        Self { inner: Box::new(inner.into()), color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_for_class() {
        assert_eq!(Limits::for_class(MathClass::Large), Limits::Display);
        assert_eq!(Limits::for_class(MathClass::Relation), Limits::Always);
        assert_eq!(Limits::for_class(MathClass::Binary), Limits::Never);
    }

    #[test]
    fn limits_for_char() {
        // Integrals never stack their scripts.
        assert_eq!(Limits::for_char('∫'), Limits::Never);
        assert_eq!(Limits::for_char('∬'), Limits::Never);
        // Other large operators stack in display style.
        assert_eq!(Limits::for_char('∑'), Limits::Display);
        assert_eq!(Limits::for_char('∏'), Limits::Display);
        // Relations always stack.
        assert_eq!(Limits::for_char('='), Limits::Always);
        // Ordinary characters do not.
        assert_eq!(Limits::for_char('x'), Limits::Never);
    }

    #[test]
    fn limits_activation() {
        assert!(!Limits::Never.active(MathStyle::Display));
        assert!(Limits::Display.active(MathStyle::Display));
        assert!(!Limits::Display.active(MathStyle::Text));
        assert!(Limits::Always.active(MathStyle::Script));
    }

    #[test]
    fn decorators_forward_metrics() {
        let frame = FrameFragment::new(10.0, 6.0, 4.0)
            .with_class(MathClass::Binary)
            .with_italics_correction(1.5);

        let translated = MathFragment::from(TranslatedFragment::new(frame.clone(), 2.0));
        assert_eq!(translated.width(), 10.0);
        assert_eq!(translated.ascent(), 4.0);
        assert_eq!(translated.descent(), 6.0);
        assert_eq!(translated.class(), MathClass::Binary);
        assert_eq!(translated.italics_correction(), 1.5);

        let clipped = MathFragment::from(ClippedFragment::new(frame.clone(), 1.0));
        assert_eq!(clipped.ascent(), 6.0);
        assert_eq!(clipped.descent(), 1.0);
        assert_eq!(clipped.width(), 10.0);

        let colored = MathFragment::from(ColoredFragment::new(frame, Color::RED));
        assert_eq!(colored.ascent(), 6.0);
        assert_eq!(colored.descent(), 4.0);
        assert_eq!(colored.class(), MathClass::Binary);
    }

    #[test]
    fn rule_is_centered_on_its_origin() {
        let rule = MathFragment::from(RuleFragment::new(12.0, 2.0));
        assert_eq!(rule.ascent(), 1.0);
        assert_eq!(rule.descent(), 1.0);
        assert_eq!(rule.class(), MathClass::Normal);
    }

    #[test]
    fn space_fragment_class() {
        let space = MathFragment::from(SpaceFragment::new(5.0));
        assert_eq!(space.class(), MathClass::Space);
        assert_eq!(space.width(), 5.0);
        assert_eq!(space.height(), 0.0);
    }
}
