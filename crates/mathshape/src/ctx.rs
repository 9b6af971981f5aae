use std::sync::Arc;

use ecow::EcoString;
use once_cell::sync::{Lazy, OnceCell};

use crate::cache::ConcurrentCache;
use crate::font::{FontError, MathFont};
use crate::geom::{Color, FontSize};
use crate::style::MathStyle;

/// Resolve a math constant from the context's current font, scaled to its
/// size. The two-argument form selects between the text and display variant
/// of a constant based on the context's style.
macro_rules! scaled {
    ($ctx:expr, text: $text:ident, display: $display:ident $(,)?) => {
        match $ctx.style() {
            $crate::style::MathStyle::Display => scaled!($ctx, $display),
            _ => scaled!($ctx, $text),
        }
    };
    ($ctx:expr, $name:ident) => {
        $ctx.font().math().$name.at($ctx.font().size())
    };
}

/// The context for math layout.
///
/// Bundles the resolved font, the size regime, the cramped flag, and the
/// foreground color. Contexts are immutable values; the `with_*` methods
/// produce copies that share the underlying font set, including the lazily
/// derived script-size fonts.
#[derive(Debug, Clone)]
pub struct MathContext {
    fonts: Arc<FontSet>,
    style: MathStyle,
    cramped: bool,
    fill: Color,
}

/// The base font plus its lazily derived script-size versions.
#[derive(Debug)]
struct FontSet {
    base: MathFont,
    script: OnceCell<MathFont>,
    script_script: OnceCell<MathFont>,
}

impl MathContext {
    /// Create a context over a font that has already been validated to carry
    /// math tables.
    pub fn new(font: MathFont, style: MathStyle, cramped: bool, fill: Color) -> Self {
        Self {
            fonts: Arc::new(FontSet {
                base: font,
                script: OnceCell::new(),
                script_script: OnceCell::new(),
            }),
            style,
            cramped,
            fill,
        }
    }

    /// The current size regime.
    pub fn style(&self) -> MathStyle {
        self.style
    }

    /// Whether the formula is cramped.
    pub fn cramped(&self) -> bool {
        self.cramped
    }

    /// The foreground color.
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// This context with a different style.
    pub fn with_style(&self, style: MathStyle) -> Self {
        Self { fonts: self.fonts.clone(), style, ..*self }
    }

    /// This context with a different cramped flag.
    pub fn with_cramped(&self, cramped: bool) -> Self {
        Self { fonts: self.fonts.clone(), cramped, ..*self }
    }

    /// The context for sub- and superscripts. Subscripts are cramped.
    pub fn for_subscript(&self) -> Self {
        self.with_style(self.style.script()).with_cramped(true)
    }

    /// The context for superscripts. Inherits the cramped flag.
    pub fn for_superscript(&self) -> Self {
        self.with_style(self.style.script())
    }

    /// The context for fraction numerators.
    pub fn for_numerator(&self) -> Self {
        self.with_style(self.style.numerator())
    }

    /// The context for fraction denominators. Always cramped.
    pub fn for_denominator(&self) -> Self {
        self.with_style(self.style.denominator()).with_cramped(true)
    }

    /// The font for the current style.
    pub fn font(&self) -> &MathFont {
        self.font_for(self.style)
    }

    /// The font for the given style.
    ///
    /// Script and script-script fonts are derived on first use by scaling
    /// the base font by the percentages from the math constants table.
    pub fn font_for(&self, style: MathStyle) -> &MathFont {
        let base = &self.fonts.base;
        match style {
            MathStyle::Display | MathStyle::Text => base,
            MathStyle::Script => self.fonts.script.get_or_init(|| {
                base.with_size(base.size() * base.math().script_percent_scale_down)
            }),
            MathStyle::ScriptScript => self.fonts.script_script.get_or_init(|| {
                base.with_size(base.size() * base.math().script_script_percent_scale_down)
            }),
        }
    }

    /// The base (display/text size) font.
    pub fn base_font(&self) -> &MathFont {
        &self.fonts.base
    }
}

/// The key a [`MathContext`] is cached under.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ContextKey {
    pub size: FontSize,
    pub family: EcoString,
    pub style: MathStyle,
    pub cramped: bool,
    pub fill: Color,
}

/// The process-wide context cache.
///
/// Font instantiation is expensive, so resolved contexts are shared across
/// formulas. This is the engine's only shared mutable state.
pub fn context_cache() -> &'static ConcurrentCache<ContextKey, MathContext> {
    static CACHE: Lazy<ConcurrentCache<ContextKey, MathContext>> =
        Lazy::new(ConcurrentCache::new);
    &CACHE
}

/// Resolve a context for the given key, loading the font on a cache miss.
///
/// `load` maps a font family name and size to raw font data; it is typically
/// backed by the embedding application's font database. A font without math
/// tables yields an error, which callers handle by retrying with a bundled
/// default math font family.
pub fn resolve_context(
    key: ContextKey,
    load: impl FnOnce(&str, f64) -> Result<Arc<Vec<u8>>, FontError>,
) -> Result<MathContext, FontError> {
    context_cache().get_or_try_create(key.clone(), || {
        let data = load(&key.family, key.size.get())?;
        let font = MathFont::new(data, 0, key.size.get())?;
        Ok(MathContext::new(font, key.style, key.cramped, key.fill))
    })
}
