use unicode_math_class::MathClass;

/// The spacing class of a character.
///
/// Defaults to the Unicode math class database, with a few overrides that
/// produce better spacing in practice.
pub fn default_math_class(c: char) -> Option<MathClass> {
    match c {
        // Punctuation in text, relation in math.
        ':' => Some(MathClass::Relation),
        // In sequences like "1, 2, ..., n" the dots read as ordinary atoms.
        '⋯' | '⋱' | '⋰' | '⋮' => Some(MathClass::Normal),
        // The Unicode database classifies these as punctuation/fraction
        // slash, which over-spaces them in formulas.
        '.' | '/' => Some(MathClass::Normal),
        _ => unicode_math_class::class(c),
    }
}

/// Resolve the running math classes of a sequence of atoms.
///
/// Rewrites every `Vary` atom to either `Binary` or `Normal` in a single
/// left-to-right pass: an atom stays binary only when something precedes it
/// that can act as a left operand and the next atom can act as a right
/// operand. The pass feeds each resolution into the next atom's left
/// context, and the final atom always resolves to `Normal` (an operator at
/// the edge of a formula is unary).
pub fn resolve_math_class(classes: &[MathClass]) -> Vec<MathClass> {
    let mut resolved = Vec::with_capacity(classes.len());
    let mut previous: Option<MathClass> = None;

    for (i, &current) in classes.iter().enumerate() {
        let class = if current == MathClass::Vary {
            match classes.get(i + 1) {
                Some(&next) if !demoted_by_left(previous) && !demoted_by_right(next) => {
                    MathClass::Binary
                }
                _ => MathClass::Normal,
            }
        } else {
            current
        };
        previous = Some(class);
        resolved.push(class);
    }

    resolved
}

/// Whether the left context forces a variable atom to be ordinary.
///
/// In TeX terms: after Bin, Op, Rel, Open, Punct, or at the start of the
/// list, a binary operator becomes ordinary.
fn demoted_by_left(previous: Option<MathClass>) -> bool {
    !matches!(
        previous,
        Some(
            MathClass::Normal
                | MathClass::Alphabetic
                | MathClass::Closing
                | MathClass::Fence
        )
    )
}

/// Whether the right context forces a variable atom to be ordinary.
fn demoted_by_right(next: MathClass) -> bool {
    matches!(
        next,
        MathClass::Relation | MathClass::Closing | MathClass::Punctuation
    )
}
