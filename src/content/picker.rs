//! Seedable random selection and string-seeded indexing.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Random source shared by every generator.
///
/// Production code seeds from entropy; tests seed with a fixed value so the
/// synthesized workspace is reproducible.
pub struct Picker {
    rng: StdRng,
}

impl Picker {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly random element. Callers guarantee `items` is non-empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        debug_assert!(!items.is_empty(), "pick from an empty pool");
        &items[self.rng.gen_range(0..items.len())]
    }

    /// True with probability `p`. Out-of-range probabilities saturate.
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.rng.gen_bool(p)
        }
    }

    /// Uniform integer in `lo..=hi`.
    pub fn between(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Up to `n` distinct elements in random order.
    pub fn sample<'a, T>(&mut self, items: &'a [T], n: usize) -> Vec<&'a T> {
        items.choose_multiple(&mut self.rng, n).collect()
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Stable 31-multiplier string hash over UTF-16 code units.
///
/// Pure function of the input: the same URL maps to the same value in every
/// process.
pub fn url_seed(input: &str) -> u64 {
    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });
    i64::from(hash).unsigned_abs()
}

/// Reproducible index in `0..modulus` for `input`. Returns 0 for an empty range.
pub fn seeded_index(input: &str, modulus: usize) -> usize {
    if modulus == 0 {
        return 0;
    }
    (url_seed(input) % modulus as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_seed_known_values() {
        assert_eq!(url_seed(""), 0);
        assert_eq!(url_seed("a"), 97);
        assert_eq!(url_seed("abc"), 96354);
    }

    #[test]
    fn test_url_seed_wraps_like_int32() {
        // Long inputs overflow i32 repeatedly; the result must stay stable.
        let url = "https://confluence.company.com/pages/viewpage.action?pageId=48213";
        assert_eq!(url_seed(url), url_seed(url));
        assert!(url_seed(url) <= i32::MAX as u64 + 1);
    }

    #[test]
    fn test_seeded_index_in_range_and_stable() {
        for input in ["notion", "https://loom.com/share/a1b2c3d4", "Klaus Müller"] {
            let a = seeded_index(input, 7);
            assert!(a < 7);
            assert_eq!(a, seeded_index(input, 7));
        }
        assert_eq!(seeded_index("anything", 0), 0);
    }

    #[test]
    fn test_picker_seeded_is_reproducible() {
        let items = ["a", "b", "c", "d", "e"];
        let mut p1 = Picker::seeded(42);
        let mut p2 = Picker::seeded(42);
        let s1: Vec<_> = (0..20).map(|_| *p1.pick(&items)).collect();
        let s2: Vec<_> = (0..20).map(|_| *p2.pick(&items)).collect();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_picker_chance_saturates() {
        let mut p = Picker::seeded(1);
        assert!(!p.chance(0.0));
        assert!(!p.chance(-1.0));
        assert!(!p.chance(f64::NAN));
        assert!(p.chance(1.0));
        assert!(p.chance(3.5));
    }

    #[test]
    fn test_picker_between_inclusive() {
        let mut p = Picker::seeded(7);
        for _ in 0..200 {
            let v = p.between(2, 4);
            assert!((2..=4).contains(&v));
        }
        assert_eq!(p.between(5, 5), 5);
        assert_eq!(p.between(9, 3), 9);
    }

    #[test]
    fn test_picker_sample_distinct() {
        let mut p = Picker::seeded(3);
        let items = [1, 2, 3, 4, 5];
        let picked = p.sample(&items, 3);
        assert_eq!(picked.len(), 3);
        let mut sorted: Vec<_> = picked.into_iter().copied().collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert_eq!(p.sample(&items, 10).len(), 5);
    }
}
