//! Ability bonuses collected during a "did stat calc" dispatch.
//!
//! Observers may push bonuses in any order; resolution always sums the flat
//! bonuses first and then scales by the summed percentage increases.

/// One contribution to a base attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Added to the base value.
    Flat(i32),
    /// Percentage increase, summed with the other increases (20 = +20%).
    Increased(i32),
}

impl Bonus {
    pub fn flat(value: i32) -> Self {
        Bonus::Flat(value)
    }

    pub fn increased(percent: i32) -> Self {
        Bonus::Increased(percent)
    }
}

/// Bonuses gathered for a single stat calculation.
///
/// ```
/// # use combat_core::stats::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::increased(50));
/// stack.add(Bonus::flat(10));
/// // (10 + 10) * 150%
/// assert_eq!(stack.resolve(10), 30);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusStack {
    entries: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.entries.push(bonus);
    }

    /// `(base + Σflat) * (100 + Σincreased) / 100`, truncating toward zero.
    ///
    /// Percentages below -100% bottom out at zero rather than flipping sign.
    pub fn resolve(&self, base: i32) -> i32 {
        let (flat, increased) = self
            .entries
            .iter()
            .fold((0i64, 0i64), |(flat, inc), bonus| match bonus {
                Bonus::Flat(v) => (flat + *v as i64, inc),
                Bonus::Increased(p) => (flat, inc + *p as i64),
            });
        let scaled = (base as i64 + flat) * (100 + increased).max(0) / 100;
        scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(bonuses: &[Bonus]) -> BonusStack {
        let mut stack = BonusStack::new();
        for bonus in bonuses {
            stack.add(*bonus);
        }
        stack
    }

    #[test]
    fn no_bonuses_keep_the_base() {
        assert_eq!(BonusStack::new().resolve(42), 42);
    }

    #[test]
    fn flat_is_added_before_scaling_regardless_of_push_order() {
        let a = stack(&[Bonus::increased(50), Bonus::flat(10)]);
        let b = stack(&[Bonus::flat(10), Bonus::increased(50)]);
        assert_eq!(a.resolve(10), 30);
        assert_eq!(b.resolve(10), 30);
    }

    #[test]
    fn increases_sum_rather_than_compound() {
        let s = stack(&[Bonus::increased(50), Bonus::increased(50)]);
        assert_eq!(s.resolve(10), 20);
    }

    #[test]
    fn large_reductions_floor_at_zero() {
        let s = stack(&[Bonus::increased(-150)]);
        assert_eq!(s.resolve(40), 0);
        assert_eq!(stack(&[Bonus::flat(-15)]).resolve(10), -5);
    }
}
