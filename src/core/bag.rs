//! Bag module - 7-bag piece randomization.
//!
//! Each cycle hands out one of each of the seven kinds in uniformly random
//! order before refilling, which keeps long repeats of the same piece rarer
//! than pure uniform sampling. Draws pick a random still-available kind
//! rather than pre-shuffling; the output is a uniform permutation either way.
//!
//! The RNG is a small seedable LCG so games are reproducible in tests.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG.
/// Uses constants from Numerical Recipes.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max).
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// Kinds a brand-new game never starts with (unplayable openings).
const RESTRICTED_OPENERS: [PieceKind; 3] = [PieceKind::O, PieceKind::S, PieceKind::Z];

/// One-each-of-7 bag, drawn without replacement.
#[derive(Debug, Clone)]
pub struct Bag {
    /// Per-kind mark, indexed like [`PieceKind::ALL`]; true once drawn.
    drawn: [bool; 7],
    /// The next draw must avoid [`RESTRICTED_OPENERS`] (brand-new game only).
    restrict_next_draw: bool,
    /// The next refill is the first of this bag's lifetime.
    fresh: bool,
    rng: SimpleRng,
}

impl Bag {
    /// Create an exhausted bag; callers refill before the first draw.
    pub fn new(seed: u32) -> Self {
        Self {
            drawn: [true; 7],
            restrict_next_draw: false,
            fresh: true,
            rng: SimpleRng::new(seed),
        }
    }

    /// Every mark in the current cycle is drawn.
    pub fn is_empty(&self) -> bool {
        self.drawn.iter().all(|&d| d)
    }

    /// Reset all seven marks to available.
    ///
    /// The very first refill of a bag is the brand-new-game one and
    /// constrains the following draw to exclude O, S and Z.
    pub fn refill(&mut self) {
        self.drawn = [false; 7];
        self.restrict_next_draw = self.fresh;
        self.fresh = false;
    }

    /// Draw a uniformly random still-available kind and mark it drawn.
    ///
    /// Drawing from an exhausted cycle is a programming error; callers must
    /// check [`Bag::is_empty`] and refill first.
    pub fn draw(&mut self) -> PieceKind {
        assert!(!self.is_empty(), "draw from exhausted bag without refill");

        let mut candidates: ArrayVec<usize, 7> = (0..7).filter(|&i| !self.drawn[i]).collect();
        if self.restrict_next_draw {
            candidates.retain(|&mut i| !RESTRICTED_OPENERS.contains(&PieceKind::ALL[i]));
            self.restrict_next_draw = false;
        }

        let pick = candidates[self.rng.next_range(candidates.len() as u32) as usize];
        self.drawn[pick] = true;
        PieceKind::ALL[pick]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_is_deterministic_per_seed() {
        let mut a = SimpleRng::new(12345);
        let mut b = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        let mut c = SimpleRng::new(54321);
        assert_ne!(SimpleRng::new(12345).next_u32(), c.next_u32());
    }

    #[test]
    fn cycle_draws_each_kind_exactly_once() {
        let mut bag = Bag::new(7);
        bag.refill();

        let mut seen = Vec::new();
        for i in 0..7 {
            assert!(!bag.is_empty(), "bag empty after {i} draws");
            seen.push(bag.draw());
        }
        assert!(bag.is_empty());
        for kind in PieceKind::ALL {
            assert_eq!(seen.iter().filter(|&&k| k == kind).count(), 1, "{kind:?}");
        }
    }

    #[test]
    fn is_empty_iff_seven_draws_since_refill() {
        let mut bag = Bag::new(3);
        bag.refill();
        for _ in 0..6 {
            bag.draw();
            assert!(!bag.is_empty());
        }
        bag.draw();
        assert!(bag.is_empty());
        bag.refill();
        assert!(!bag.is_empty());
    }

    #[test]
    fn first_draw_of_new_game_excludes_awkward_openers() {
        for seed in 0..200 {
            let mut bag = Bag::new(seed);
            bag.refill();
            let first = bag.draw();
            assert!(
                !RESTRICTED_OPENERS.contains(&first),
                "seed {seed} opened with {first:?}"
            );
        }
    }

    #[test]
    fn restriction_applies_only_to_first_refill() {
        // After the opening cycle, every kind shows up as a cycle leader
        // eventually.
        let mut leaders = std::collections::HashSet::new();
        for seed in 0..300 {
            let mut bag = Bag::new(seed);
            bag.refill();
            for _ in 0..7 {
                bag.draw();
            }
            bag.refill();
            leaders.insert(bag.draw());
        }
        for kind in RESTRICTED_OPENERS {
            assert!(leaders.contains(&kind), "{kind:?} never led a later cycle");
        }
    }

    #[test]
    #[should_panic(expected = "exhausted bag")]
    fn draw_from_exhausted_bag_panics() {
        let mut bag = Bag::new(1);
        bag.refill();
        for _ in 0..8 {
            bag.draw();
        }
    }
}
