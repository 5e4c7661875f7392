use std::collections::BTreeMap;

use crate::types::Mm;

/// Usable horizontal span at some vertical position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: Mm,
    pub right: Mm,
}

impl Bounds {
    pub fn new(left: Mm, right: Mm) -> Self {
        Self { left, right }
    }

    pub fn width(self) -> Mm {
        (self.right - self.left).max(Mm::ZERO)
    }
}

/// Which page edge a float is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Sparse ordered map of exclusion bands: quantized vertical key to the
/// horizontal bounds in effect from that row downward, until superseded
/// by a later key. Only rows where the effective span actually changes
/// carry an entry, so overlapping floats stay cheap to merge.
///
/// The map never knows the page geometry; lookups take the full-width
/// default (page margins applied) from the caller.
#[derive(Debug, Clone, Default)]
pub struct FloatMarginMap {
    bands: BTreeMap<i64, Bounds>,
}

impl FloatMarginMap {
    pub fn reset(&mut self) {
        self.bands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Insert or overwrite the band at `y`'s key.
    pub fn seed(&mut self, y: Mm, left: Mm, right: Mm) {
        self.bands.insert(y.to_centi_i64(), Bounds::new(left, right));
    }

    /// Bounds in effect at `y`: the entry with the greatest key at or
    /// before `y`'s key wins; `default` when no entry qualifies.
    pub fn lookup(&self, y: Mm, default: Bounds) -> Bounds {
        self.bands
            .range(..=y.to_centi_i64())
            .next_back()
            .map(|(_, bounds)| *bounds)
            .unwrap_or(default)
    }

    /// Register a float occupying `[x_left, x_right]` horizontally from
    /// `y_top` to `y_bottom`, anchored to `side`.
    ///
    /// The bounds a non-floated line would have used at exactly `y_top`
    /// and `y_bottom` are captured first and re-inserted afterwards, so
    /// content at or below `y_bottom` reverts to the pre-float span.
    /// Every band inside the range that is less restrictive on the
    /// float's side is subsumed and dropped; floats on the opposite side
    /// keep their entries, so each side only tightens its own bound.
    ///
    /// `y_top > y_bottom` violates the caller contract; it is tolerated
    /// (nothing is removed, both boundary rows are still written) and
    /// leaves the map consistent.
    pub fn carve(
        &mut self,
        side: Side,
        x_left: Mm,
        y_top: Mm,
        x_right: Mm,
        y_bottom: Mm,
        default: Bounds,
    ) {
        let mut old_top = self.lookup(y_top, default);
        let old_bottom = self.lookup(y_bottom, default);

        match side {
            Side::Left => {
                if old_top.left < x_right {
                    old_top.left = x_right;
                }
            }
            Side::Right => {
                if old_top.right > x_left {
                    old_top.right = x_left;
                }
            }
        }

        let top_key = y_top.to_centi_i64();
        let bottom_key = y_bottom.to_centi_i64();

        if top_key <= bottom_key {
            let subsumed: Vec<i64> = self
                .bands
                .range(top_key..=bottom_key)
                .filter(|(_, bounds)| match side {
                    Side::Left => bounds.left < x_right,
                    Side::Right => bounds.right > x_left,
                })
                .map(|(key, _)| *key)
                .collect();
            for key in subsumed {
                self.bands.remove(&key);
            }
        }

        self.bands.insert(top_key, old_top);
        self.bands.insert(bottom_key, old_bottom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mm(v: f32) -> Mm {
        Mm::from_f32(v)
    }

    fn page() -> Bounds {
        Bounds::new(mm(10.0), mm(190.0))
    }

    #[test]
    fn empty_map_returns_default() {
        let map = FloatMarginMap::default();
        assert_eq!(map.lookup(mm(0.0), page()), page());
        assert_eq!(map.lookup(mm(250.0), page()), page());
    }

    #[test]
    fn greatest_key_at_or_before_wins() {
        let mut map = FloatMarginMap::default();
        map.seed(mm(10.0), mm(20.0), mm(180.0));
        map.seed(mm(50.0), mm(30.0), mm(170.0));

        assert_eq!(map.lookup(mm(5.0), page()), page());
        assert_eq!(map.lookup(mm(10.0), page()), Bounds::new(mm(20.0), mm(180.0)));
        assert_eq!(map.lookup(mm(49.99), page()), Bounds::new(mm(20.0), mm(180.0)));
        assert_eq!(map.lookup(mm(50.0), page()), Bounds::new(mm(30.0), mm(170.0)));
        assert_eq!(map.lookup(mm(300.0), page()), Bounds::new(mm(30.0), mm(170.0)));
    }

    #[test]
    fn left_float_narrows_its_range_only() {
        let mut map = FloatMarginMap::default();
        map.carve(Side::Left, mm(50.0), mm(10.0), mm(80.0), mm(30.0), page());

        assert_eq!(map.lookup(mm(5.0), page()).left, mm(10.0));
        assert_eq!(map.lookup(mm(15.0), page()).left, mm(80.0));
        assert_eq!(map.lookup(mm(29.99), page()).left, mm(80.0));
        assert_eq!(map.lookup(mm(30.0), page()).left, mm(10.0));
        assert_eq!(map.lookup(mm(35.0), page()).left, mm(10.0));
        // Right bound untouched throughout.
        assert_eq!(map.lookup(mm(15.0), page()).right, mm(190.0));
        // Usable width shrinks by the float's width inside its range.
        assert_eq!(map.lookup(mm(15.0), page()).width(), mm(110.0));
        assert_eq!(map.lookup(mm(35.0), page()).width(), mm(180.0));
    }

    #[test]
    fn right_float_narrows_its_range_only() {
        let mut map = FloatMarginMap::default();
        map.carve(Side::Right, mm(150.0), mm(20.0), mm(190.0), mm(60.0), page());

        assert_eq!(map.lookup(mm(10.0), page()).right, mm(190.0));
        assert_eq!(map.lookup(mm(40.0), page()).right, mm(150.0));
        assert_eq!(map.lookup(mm(60.0), page()).right, mm(190.0));
        assert_eq!(map.lookup(mm(40.0), page()).left, mm(10.0));
    }

    #[test]
    fn narrower_overlapping_left_float_wins_inside_its_range() {
        let mut map = FloatMarginMap::default();
        map.carve(Side::Left, mm(50.0), mm(10.0), mm(80.0), mm(50.0), page());
        map.carve(Side::Left, mm(50.0), mm(20.0), mm(120.0), mm(40.0), page());

        assert_eq!(map.lookup(mm(15.0), page()).left, mm(80.0));
        assert_eq!(map.lookup(mm(25.0), page()).left, mm(120.0));
        assert_eq!(map.lookup(mm(39.0), page()).left, mm(120.0));
        // Back to the wider float's bound after the narrow one ends.
        assert_eq!(map.lookup(mm(45.0), page()).left, mm(80.0));
        assert_eq!(map.lookup(mm(55.0), page()).left, mm(10.0));
    }

    #[test]
    fn opposite_sides_tighten_independently() {
        let mut map = FloatMarginMap::default();
        map.carve(Side::Left, mm(10.0), mm(10.0), mm(60.0), mm(50.0), page());
        map.carve(Side::Right, mm(140.0), mm(20.0), mm(190.0), mm(40.0), page());

        let mid = map.lookup(mm(30.0), page());
        assert_eq!(mid.left, mm(60.0));
        assert_eq!(mid.right, mm(140.0));

        // Past the right float but still inside the left one.
        let lower = map.lookup(mm(45.0), page());
        assert_eq!(lower.left, mm(60.0));
        assert_eq!(lower.right, mm(190.0));
    }

    #[test]
    fn positions_within_a_hundredth_share_a_band() {
        let mut map = FloatMarginMap::default();
        map.carve(Side::Left, mm(50.0), mm(10.0), mm(80.0), mm(30.0), page());
        let a = map.lookup(mm(12.342), page());
        let b = map.lookup(mm(12.348), page());
        assert_eq!(a, b);
    }

    #[test]
    fn inverted_range_stays_consistent() {
        let mut map = FloatMarginMap::default();
        map.seed(mm(0.0), mm(10.0), mm(190.0));
        map.carve(Side::Left, mm(50.0), mm(30.0), mm(80.0), mm(10.0), page());

        // No panic, and every lookup still answers.
        assert_eq!(map.lookup(mm(0.0), page()), Bounds::new(mm(10.0), mm(190.0)));
        let at_bottom = map.lookup(mm(10.0), page());
        assert_eq!(at_bottom.right, mm(190.0));
        assert!(map.len() >= 2);
    }

    #[test]
    fn zero_width_float_is_harmless() {
        let mut map = FloatMarginMap::default();
        map.carve(Side::Left, mm(80.0), mm(10.0), mm(80.0), mm(30.0), page());
        assert_eq!(map.lookup(mm(20.0), page()).left, mm(80.0));
        assert_eq!(map.lookup(mm(31.0), page()).left, mm(10.0));
    }

    #[test]
    fn reset_empties_the_map() {
        let mut map = FloatMarginMap::default();
        map.seed(mm(0.0), mm(10.0), mm(190.0));
        assert!(!map.is_empty());
        map.reset();
        assert!(map.is_empty());
        assert_eq!(map.lookup(mm(0.0), page()), page());
    }

    #[test]
    fn clone_snapshots_are_independent() {
        let mut map = FloatMarginMap::default();
        map.seed(mm(0.0), mm(10.0), mm(190.0));
        let snapshot = map.clone();
        map.carve(Side::Left, mm(50.0), mm(5.0), mm(80.0), mm(25.0), page());
        assert_ne!(map.lookup(mm(10.0), page()), snapshot.lookup(mm(10.0), page()));
        assert_eq!(snapshot.lookup(mm(10.0), page()).left, mm(10.0));
    }
}
