//! Expanding estimation windows
//!
//! Window `i` holds the first `window_size + i` observations, so every window
//! starts at the beginning of the series and each one extends the previous
//! by a single period. The sequence captures "beta estimated with everything
//! known up to time t" rather than a fixed lookback.

use crate::{EstimatorError, ReturnWindow};

/// Lazily produced, strictly nested prefixes of a return window
#[derive(Debug, Clone)]
pub struct ExpandingWindows<'a> {
    source: ReturnWindow<'a>,
    next_len: usize,
}

impl<'a> ExpandingWindows<'a> {
    /// Expanding windows over `source`, the shortest holding `window_size`
    /// observations
    ///
    /// Yields exactly `source.len() - window_size` windows.
    ///
    /// # Errors
    /// [`EstimatorError::InvalidConfiguration`] for a zero window size and
    /// [`EstimatorError::InsufficientData`] when `source` is not longer than
    /// `window_size`.
    pub fn new(source: ReturnWindow<'a>, window_size: usize) -> Result<Self, EstimatorError> {
        if window_size == 0 {
            return Err(EstimatorError::InvalidConfiguration(
                "window size must be positive".to_string(),
            ));
        }
        if source.len() <= window_size {
            return Err(EstimatorError::InsufficientData {
                required: window_size + 1,
                actual: source.len(),
            });
        }
        Ok(Self {
            source,
            next_len: window_size,
        })
    }
}

impl<'a> Iterator for ExpandingWindows<'a> {
    type Item = ReturnWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_len >= self.source.len() {
            return None;
        }
        let window = self.source.prefix(self.next_len);
        self.next_len += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.len().saturating_sub(self.next_len);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ExpandingWindows<'_> {}
