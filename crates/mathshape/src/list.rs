use std::ops::Range;

use unicode_math_class::MathClass;

use crate::class::resolve_math_class;
use crate::composition::Canvas;
use crate::ctx::MathContext;
use crate::fragment::{Limits, MathFragment};
use crate::geom::{Color, Point};
use crate::spacing::spacing;
use crate::style::MathStyle;

/// An editable, ordered sequence of shaped fragments.
///
/// The only mutable entity in the engine. All mutations must happen inside
/// an edit transaction delimited by [`begin_editing`](Self::begin_editing)
/// and [`end_editing`](Self::end_editing); they record the leftmost touched
/// index so that the following [`fix_layout`](Self::fix_layout) only
/// recomputes the affected suffix.
#[derive(Debug, Clone)]
pub struct MathListLayoutFragment {
    fragments: Vec<MathFragment>,
    origins: Vec<Point>,
    fill: Color,
    editing: bool,
    /// Index of the left-most modification since the last reflow.
    dirty: Option<usize>,
    width: f64,
    ascent: f64,
    descent: f64,
    content_layout_len: usize,
}

impl MathListLayoutFragment {
    /// Create an empty list that draws its content in the given color.
    pub fn new(fill: Color) -> Self {
        Self {
            fragments: Vec::new(),
            origins: Vec::new(),
            fill,
            editing: false,
            dirty: None,
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            content_layout_len: 0,
        }
    }

    // --- Edit transactions ---

    /// Open an edit transaction.
    ///
    /// Panics when re-entered or when dirty state from a previous
    /// transaction has not been flushed with [`fix_layout`](Self::fix_layout);
    /// both indicate a caller bug.
    pub fn begin_editing(&mut self) {
        assert!(!self.editing && self.dirty.is_none(), "already editing");
        self.editing = true;
    }

    /// Close the current edit transaction.
    pub fn end_editing(&mut self) {
        assert!(self.editing, "not editing");
        self.editing = false;
    }

    /// Whether an edit transaction is open.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    // --- Subfragments ---

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn fragment(&self, index: usize) -> &MathFragment {
        &self.fragments[index]
    }

    /// The baseline origin of a fragment relative to this list's origin.
    ///
    /// Only valid after a reflow.
    pub fn origin(&self, index: usize) -> Point {
        self.origins[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MathFragment> {
        self.fragments.iter()
    }

    /// Insert a fragment. Requires an open transaction.
    pub fn insert(&mut self, fragment: impl Into<MathFragment>, index: usize) {
        assert!(self.editing, "mutation outside an edit transaction");
        let fragment = fragment.into();
        self.content_layout_len += fragment.layout_len();
        self.fragments.insert(index, fragment);
        self.origins.insert(index, Point::zero());
        self.mark_dirty(index);
    }

    /// Insert multiple fragments. Requires an open transaction.
    pub fn insert_all(
        &mut self,
        fragments: impl IntoIterator<Item = MathFragment>,
        index: usize,
    ) {
        assert!(self.editing, "mutation outside an edit transaction");
        let fragments: Vec<MathFragment> = fragments.into_iter().collect();
        self.content_layout_len +=
            fragments.iter().map(MathFragment::layout_len).sum::<usize>();
        let count = fragments.len();
        self.fragments.splice(index..index, fragments);
        self.origins.splice(index..index, std::iter::repeat(Point::zero()).take(count));
        self.mark_dirty(index);
    }

    /// Remove the fragment at an index. Requires an open transaction.
    pub fn remove(&mut self, index: usize) -> MathFragment {
        assert!(self.editing, "mutation outside an edit transaction");
        let removed = self.fragments.remove(index);
        self.origins.remove(index);
        self.content_layout_len -= removed.layout_len();
        self.mark_dirty(index);
        removed
    }

    /// Remove a range of fragments. Requires an open transaction.
    pub fn remove_range(&mut self, range: Range<usize>) {
        assert!(self.editing, "mutation outside an edit transaction");
        self.content_layout_len -= self.fragments[range.clone()]
            .iter()
            .map(MathFragment::layout_len)
            .sum::<usize>();
        self.fragments.drain(range.clone());
        self.origins.drain(range.clone());
        self.mark_dirty(range.start);
    }

    /// Mark a range as needing relayout without changing it. Requires an
    /// open transaction.
    pub fn invalidate_range(&mut self, range: Range<usize>) {
        assert!(self.editing, "mutation outside an edit transaction");
        self.mark_dirty(range.start);
    }

    fn mark_dirty(&mut self, index: usize) {
        self.dirty = Some(self.dirty.map_or(index, |dirty| dirty.min(index)));
    }

    // --- Layout-length bookkeeping ---

    /// The summed layout length of the content.
    pub fn content_layout_len(&self) -> usize {
        self.content_layout_len
    }

    /// The fragment index exactly `n` layout-length units away from `i`,
    /// forward or backward, or `None` if no fragment boundary lands exactly
    /// on that offset.
    pub fn index_offset_by_layout_len(&self, i: usize, n: isize) -> Option<usize> {
        assert!(i <= self.len());
        if n >= 0 {
            self.search_forward(i, n as usize)
        } else {
            self.search_backward(i, n.unsigned_abs())
        }
    }

    /// The fragment range covering exactly the given layout-offset range.
    pub fn index_range(&self, layout_range: Range<usize>) -> Option<Range<usize>> {
        let start = self.search_forward(0, layout_range.start)?;
        let end = self.search_forward(start, layout_range.len())?;
        Some(start..end)
    }

    fn search_forward(&self, i: usize, n: usize) -> Option<usize> {
        let mut j = i;
        let mut sum = 0;
        while sum < n && j < self.fragments.len() {
            sum += self.fragments[j].layout_len();
            j += 1;
        }
        (sum == n).then_some(j)
    }

    fn search_backward(&self, i: usize, n: usize) -> Option<usize> {
        let mut j = i;
        let mut sum = 0;
        while sum < n && j > 0 {
            sum += self.fragments[j - 1].layout_len();
            j -= 1;
        }
        (sum == n).then_some(j)
    }

    // --- Metrics ---

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// A list of exactly one atom behaves like that atom.
    pub fn italics_correction(&self) -> f64 {
        match self.fragments.as_slice() {
            [single] => single.italics_correction(),
            _ => 0.0,
        }
    }

    pub fn accent_attach(&self) -> f64 {
        match self.fragments.as_slice() {
            [single] => single.accent_attach(),
            _ => self.width / 2.0,
        }
    }

    pub fn class(&self) -> MathClass {
        match self.fragments.as_slice() {
            [single] => single.class(),
            _ => MathClass::Normal,
        }
    }

    pub fn limits(&self) -> Limits {
        match self.fragments.as_slice() {
            [single] => single.limits(),
            _ => Limits::Never,
        }
    }

    pub fn is_spaced(&self) -> bool {
        match self.fragments.as_slice() {
            [single] => single.is_spaced(),
            _ => false,
        }
    }

    pub fn is_text_like(&self) -> bool {
        match self.fragments.as_slice() {
            [single] => single.is_text_like(),
            _ => false,
        }
    }

    /// The single glyph this list consists of, if it is one.
    pub(crate) fn single_glyph(&self) -> Option<&crate::fragment::GlyphFragment> {
        match self.fragments.as_slice() {
            [MathFragment::Glyph(glyph)] => Some(glyph),
            _ => None,
        }
    }

    // --- Layout ---

    /// Incrementally recompute fragment positions and aggregate metrics.
    ///
    /// Only the suffix starting at the last non-`Vary` fragment before the
    /// dirty index is re-examined; fragments to its left keep their
    /// positions. A no-op when nothing is dirty. Must be called outside an
    /// edit transaction.
    pub fn fix_layout(&mut self, ctx: &MathContext) {
        self.reflow(ctx.style(), ctx.font().size());
    }

    pub(crate) fn reflow(&mut self, style: MathStyle, font_size: f64) {
        assert!(!self.editing, "fix_layout during an edit transaction");
        let Some(dirty) = self.dirty.take() else { return };
        let dirty = dirty.min(self.fragments.len());

        // Vary atoms resolve against their left context, so re-examination
        // must begin at a fragment whose class is stable.
        let start = self.fragments[..dirty]
            .iter()
            .rposition(|fragment| fragment.class() != MathClass::Vary)
            .unwrap_or(0);

        if start >= self.fragments.len() {
            let width = match self.fragments.last().zip(self.origins.last()) {
                Some((fragment, origin)) => origin.x + fragment.width(),
                None => 0.0,
            };
            self.update_metrics(width);
            return;
        }

        let classes: Vec<MathClass> =
            self.fragments[start..].iter().map(MathFragment::class).collect();
        let resolved = resolve_math_class(&classes);

        let mut position =
            if start == 0 { Point::zero() } else { self.origins[start] };
        for (i, fragment) in self.fragments[start..].iter().enumerate() {
            self.origins[start + i] = position;
            let space = match resolved.get(i + 1) {
                Some(&next) => spacing(resolved[i], next, style)
                    .map_or(0.0, |em| em.at(font_size)),
                None => 0.0,
            };
            position.x += fragment.width() + space;
        }

        self.update_metrics(position.x);
    }

    fn update_metrics(&mut self, width: f64) {
        self.width = width;
        self.ascent =
            self.fragments.iter().map(MathFragment::ascent).fold(0.0, f64::max);
        self.descent =
            self.fragments.iter().map(MathFragment::descent).fold(0.0, f64::max);
    }

    // --- Queries ---

    /// The index of the fragment whose extent contains `x`, if any.
    pub fn fragment_at_x(&self, x: f64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let after = self.origins.partition_point(|origin| origin.x < x);
        Some(after.saturating_sub(1))
    }

    // --- Draw ---

    /// Draw all fragments in this list's text color.
    pub fn draw(&self, at: Point, canvas: &mut dyn Canvas) {
        for (fragment, origin) in self.fragments.iter().zip(&self.origins) {
            fragment.draw(at + *origin, self.fill, canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FrameFragment;
    use crate::spacing::{MEDIUM, THICK};

    const SIZE: f64 = 18.0;

    fn atom(class: MathClass, width: f64) -> MathFragment {
        FrameFragment::new(width, 8.0, 3.0).with_class(class).into()
    }

    fn filled(fragments: Vec<MathFragment>) -> MathListLayoutFragment {
        let mut list = MathListLayoutFragment::new(Color::BLACK);
        list.begin_editing();
        list.insert_all(fragments, 0);
        list.end_editing();
        list.reflow(MathStyle::Text, SIZE);
        list
    }

    #[test]
    #[should_panic(expected = "already editing")]
    fn reentrant_begin_editing_panics() {
        let mut list = MathListLayoutFragment::new(Color::BLACK);
        list.begin_editing();
        list.begin_editing();
    }

    #[test]
    #[should_panic(expected = "outside an edit transaction")]
    fn mutation_outside_transaction_panics() {
        let mut list = MathListLayoutFragment::new(Color::BLACK);
        list.insert(atom(MathClass::Normal, 10.0), 0);
    }

    #[test]
    #[should_panic(expected = "during an edit transaction")]
    fn reflow_during_transaction_panics() {
        let mut list = MathListLayoutFragment::new(Color::BLACK);
        list.begin_editing();
        list.reflow(MathStyle::Text, SIZE);
    }

    #[test]
    fn empty_reflow_is_a_no_op() {
        let mut list = MathListLayoutFragment::new(Color::BLACK);
        list.reflow(MathStyle::Text, SIZE);
        assert_eq!(list.width(), 0.0);
        assert!(list.is_empty());
    }

    #[test]
    fn binary_operators_get_medium_spacing_in_text_style() {
        // x + y - z w, with + and - as Vary atoms.
        let list = filled(vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Vary, 10.0),
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Vary, 10.0),
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Alphabetic, 10.0),
        ]);

        let medium = MEDIUM.at(SIZE);
        assert_eq!(list.origin(0).x, 0.0);
        assert_eq!(list.origin(1).x, 10.0 + medium);
        assert_eq!(list.origin(2).x, 20.0 + 2.0 * medium);
        assert_eq!(list.origin(3).x, 30.0 + 3.0 * medium);
        assert_eq!(list.origin(4).x, 40.0 + 4.0 * medium);
        // z and w are ordinary neighbors without spacing.
        assert_eq!(list.origin(5).x, 50.0 + 4.0 * medium);
        assert_eq!(list.width(), 60.0 + 4.0 * medium);
    }

    #[test]
    fn spacing_collapses_in_script_style() {
        let fragments = vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Vary, 10.0),
            atom(MathClass::Alphabetic, 10.0),
        ];
        let mut list = MathListLayoutFragment::new(Color::BLACK);
        list.begin_editing();
        list.insert_all(fragments, 0);
        list.end_editing();
        list.reflow(MathStyle::Script, SIZE);

        assert_eq!(list.origin(1).x, 10.0);
        assert_eq!(list.origin(2).x, 20.0);
        assert_eq!(list.width(), 30.0);
    }

    #[test]
    fn relation_spacing_in_display_style() {
        let fragments = vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Relation, 10.0),
            atom(MathClass::Alphabetic, 10.0),
        ];
        let mut list = MathListLayoutFragment::new(Color::BLACK);
        list.begin_editing();
        list.insert_all(fragments, 0);
        list.end_editing();
        list.reflow(MathStyle::Display, SIZE);

        let thick = THICK.at(SIZE);
        assert_eq!(list.origin(1).x, 10.0 + thick);
        assert_eq!(list.origin(2).x, 20.0 + 2.0 * thick);
    }

    #[test]
    fn aggregate_metrics_take_extent_maxima() {
        let list = filled(vec![
            FrameFragment::new(4.0, 5.0, 1.0).into(),
            FrameFragment::new(6.0, 2.0, 7.0).into(),
        ]);
        assert_eq!(list.ascent(), 5.0);
        assert_eq!(list.descent(), 7.0);
        assert_eq!(list.height(), 12.0);
    }

    #[test]
    fn single_fragment_list_forwards_its_child() {
        let list = filled(vec![atom(MathClass::Binary, 10.0)]);
        assert_eq!(list.class(), MathClass::Binary);

        let list = filled(vec![
            atom(MathClass::Binary, 10.0),
            atom(MathClass::Normal, 10.0),
        ]);
        assert_eq!(list.class(), MathClass::Normal);
    }

    #[test]
    fn layout_len_index_search() {
        let two_units = FrameFragment::new(10.0, 8.0, 3.0).with_layout_len(2);
        let list = filled(vec![
            atom(MathClass::Alphabetic, 10.0),
            two_units.into(),
            atom(MathClass::Alphabetic, 10.0),
        ]);

        assert_eq!(list.content_layout_len(), 4);
        assert_eq!(list.index_offset_by_layout_len(0, 0), Some(0));
        assert_eq!(list.index_offset_by_layout_len(0, 1), Some(1));
        // No boundary lands in the middle of the two-unit fragment.
        assert_eq!(list.index_offset_by_layout_len(0, 2), None);
        assert_eq!(list.index_offset_by_layout_len(0, 3), Some(2));
        assert_eq!(list.index_offset_by_layout_len(0, 4), Some(3));
        assert_eq!(list.index_offset_by_layout_len(3, -3), Some(1));
        assert_eq!(list.index_offset_by_layout_len(3, -2), None);
        assert_eq!(list.index_range(1..4), Some(1..3));
        assert_eq!(list.index_range(1..3), Some(1..2));
        assert_eq!(list.index_range(1..2), None);
    }

    #[test]
    fn incremental_reflow_matches_from_scratch() {
        // Apply a series of edits with interleaved reflows, then compare
        // against a list built from the final contents in one go.
        let mut incremental = MathListLayoutFragment::new(Color::BLACK);

        incremental.begin_editing();
        incremental.insert_all(
            vec![
                atom(MathClass::Alphabetic, 10.0),
                atom(MathClass::Vary, 8.0),
                atom(MathClass::Alphabetic, 12.0),
            ],
            0,
        );
        incremental.end_editing();
        incremental.reflow(MathStyle::Text, SIZE);

        incremental.begin_editing();
        incremental.insert(atom(MathClass::Relation, 9.0), 1);
        incremental.end_editing();
        incremental.reflow(MathStyle::Text, SIZE);

        incremental.begin_editing();
        incremental.remove(2);
        incremental.insert_all(
            vec![atom(MathClass::Vary, 7.0), atom(MathClass::Alphabetic, 6.0)],
            2,
        );
        incremental.end_editing();
        incremental.reflow(MathStyle::Text, SIZE);

        let scratch = filled(vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Relation, 9.0),
            atom(MathClass::Vary, 7.0),
            atom(MathClass::Alphabetic, 6.0),
            atom(MathClass::Alphabetic, 12.0),
        ]);

        assert_eq!(incremental.len(), scratch.len());
        assert_eq!(incremental.width(), scratch.width());
        assert_eq!(incremental.ascent(), scratch.ascent());
        assert_eq!(incremental.descent(), scratch.descent());
        for i in 0..scratch.len() {
            assert_eq!(incremental.origin(i), scratch.origin(i));
        }
    }

    #[test]
    fn incremental_reflow_matches_from_scratch_with_vary_runs() {
        // A Vary atom adjacent to the edit point forces the anchor to back
        // up; its resolution flips from Binary to Normal when a relation
        // is inserted after it.
        let mut incremental = MathListLayoutFragment::new(Color::BLACK);
        incremental.begin_editing();
        incremental.insert_all(
            vec![
                atom(MathClass::Alphabetic, 10.0),
                atom(MathClass::Vary, 8.0),
                atom(MathClass::Alphabetic, 12.0),
            ],
            0,
        );
        incremental.end_editing();
        incremental.reflow(MathStyle::Text, SIZE);

        incremental.begin_editing();
        incremental.remove(2);
        incremental.insert(atom(MathClass::Relation, 5.0), 2);
        incremental.end_editing();
        incremental.reflow(MathStyle::Text, SIZE);

        let scratch = filled(vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Vary, 8.0),
            atom(MathClass::Relation, 5.0),
        ]);

        assert_eq!(incremental.width(), scratch.width());
        for i in 0..scratch.len() {
            assert_eq!(incremental.origin(i), scratch.origin(i));
        }
    }

    #[test]
    fn reflow_does_not_move_fragments_left_of_the_dirty_anchor() {
        let mut list = filled(vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Vary, 8.0),
            atom(MathClass::Alphabetic, 12.0),
            atom(MathClass::Alphabetic, 11.0),
            atom(MathClass::Vary, 8.0),
            atom(MathClass::Alphabetic, 9.0),
            atom(MathClass::Alphabetic, 4.0),
        ]);

        let before: Vec<Point> = (0..4).map(|i| list.origin(i)).collect();

        list.begin_editing();
        list.insert(atom(MathClass::Alphabetic, 5.0), 4);
        list.end_editing();
        list.reflow(MathStyle::Text, SIZE);

        // The insertion at index 4 re-examines from index 3 (the last
        // non-Vary fragment before it) at most; everything further left
        // keeps its position.
        for (i, origin) in before.iter().enumerate().take(4) {
            assert_eq!(list.origin(i), *origin);
        }
    }

    #[test]
    fn tail_removal_updates_aggregate_width() {
        let mut list = filled(vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Alphabetic, 12.0),
        ]);
        assert_eq!(list.width(), 22.0);

        list.begin_editing();
        list.remove(1);
        list.end_editing();
        list.reflow(MathStyle::Text, SIZE);
        assert_eq!(list.width(), 10.0);

        list.begin_editing();
        list.remove(0);
        list.end_editing();
        list.reflow(MathStyle::Text, SIZE);
        assert_eq!(list.width(), 0.0);
        assert_eq!(list.height(), 0.0);
    }

    #[test]
    fn fragment_hit_testing() {
        let list = filled(vec![
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Alphabetic, 10.0),
            atom(MathClass::Alphabetic, 10.0),
        ]);
        assert_eq!(list.fragment_at_x(-5.0), Some(0));
        assert_eq!(list.fragment_at_x(5.0), Some(0));
        assert_eq!(list.fragment_at_x(15.0), Some(1));
        assert_eq!(list.fragment_at_x(25.0), Some(2));
        assert_eq!(list.fragment_at_x(95.0), Some(2));
        assert_eq!(MathListLayoutFragment::new(Color::BLACK).fragment_at_x(5.0), None);
    }
}
