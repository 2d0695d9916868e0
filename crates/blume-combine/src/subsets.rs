//! Proper, non-empty subsets of estimator columns
//!
//! Subsets are produced lazily, ordered by size and then lexicographically, so
//! only the combination currently being fitted is held in memory.

/// Binomial coefficient `n choose k`, zero when `k > n`
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Iterator over index subsets of `0..n` with sizes in `min_size..=max_size`
#[derive(Debug, Clone)]
pub struct Subsets {
    n: usize,
    current: Vec<usize>,
    max_size: usize,
    remaining: usize,
}

impl Subsets {
    /// Every non-empty subset except the full set: sizes `1..=n-1`, so
    /// `2^n - 2` subsets in total
    pub fn proper(n: usize) -> Self {
        Self::with_sizes(n, 1, n.saturating_sub(1))
    }

    /// Subsets with sizes between `min_size` and `max_size` inclusive
    ///
    /// The empty set is never produced and `max_size` is clamped to `n`.
    pub fn with_sizes(n: usize, min_size: usize, max_size: usize) -> Self {
        let min_size = min_size.max(1);
        let max_size = max_size.min(n);
        let remaining = (min_size..=max_size).map(|k| binomial(n, k)).sum();
        Self {
            n,
            current: (0..min_size).collect(),
            max_size,
            remaining,
        }
    }

    fn advance(&mut self) {
        let k = self.current.len();
        let n = self.n;
        match (0..k).rev().find(|&i| self.current[i] < n - k + i) {
            Some(i) => {
                self.current[i] += 1;
                for j in i + 1..k {
                    self.current[j] = self.current[j - 1] + 1;
                }
            }
            None if k < self.max_size => self.current = (0..=k).collect(),
            None => self.current.clear(),
        }
    }
}

impl Iterator for Subsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let subset = self.current.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(subset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Subsets {}
