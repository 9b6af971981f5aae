//! Math formula shaping and composition.
//!
//! This crate turns sequences of characters and nested constructs into
//! positioned glyph geometry, driven by the OpenType MATH table of a font
//! and the TeXbook's spacing rules. The central pieces:
//!
//! - [`MathContext`]: a resolved font with a size regime, cramped flag and
//!   color; cached process-wide per style tuple.
//! - [`GlyphFragment`]: a single shaped glyph with its math metrics.
//! - [`stretch_glyph`]: synthesis of oversized delimiters, braces and
//!   arrows from a font's size variants and glyph assemblies.
//! - [`MathListLayoutFragment`]: an editable sequence of fragments with
//!   TeX-style inter-atom spacing and incremental, dirty-range relayout.
//! - Composite fragments ([`FracFragment`], [`RadicalFragment`],
//!   [`AttachFragment`], [`UnderOverFragment`], [`AccentFragment`],
//!   [`ArrayFragment`]) that build geometry atop lists using font
//!   constants.
//!
//! The crate does no text shaping, line breaking or font parsing beyond
//! table access; fonts come in as raw data and drawing goes out through
//! the [`Canvas`] trait.

#[macro_use]
mod ctx;
mod accent;
mod array;
mod attach;
mod cache;
mod class;
mod composition;
mod font;
mod frac;
mod fragment;
mod geom;
mod list;
mod radical;
mod spacing;
mod stretch;
mod style;
mod underover;

pub use unicode_math_class::MathClass;

pub use self::accent::AccentFragment;
pub use self::array::ArrayFragment;
pub use self::attach::AttachFragment;
pub use self::cache::ConcurrentCache;
pub use self::class::{default_math_class, resolve_math_class};
pub use self::composition::{Canvas, MathComposition};
pub use self::ctx::{context_cache, resolve_context, ContextKey, MathContext};
pub use self::font::{FontError, MathConstants, MathFont};
pub use self::frac::FracFragment;
pub use self::fragment::{
    ClippedFragment, ColoredFragment, Corner, FrameFragment, GlyphComposite,
    GlyphFragment, Limits, MathFragment, RuleFragment, SpaceFragment,
    TranslatedFragment, VariantFragment,
};
pub use self::geom::{Axis, Color, Em, FontSize, Point, Rect};
pub use self::list::MathListLayoutFragment;
pub use self::radical::RadicalFragment;
pub use self::spacing::{spacing, MEDIUM, THICK, THIN};
pub use self::stretch::{
    stretch_display_operator, stretch_fragment, stretch_glyph, DELIM_SHORT_FALL,
};
pub use self::style::MathStyle;
pub use self::underover::{UnderOverFragment, UnderOverKind};
