//! Configuration for columnar file reads.

/// Rows per batch when the caller does not pick a size.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Configuration shared by every read on a [`ColumnarFile`](crate::ColumnarFile).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Batch size used when a scan asks for `0` or no batch size.
    pub default_batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Sets the default batch size. `0` keeps [`DEFAULT_BATCH_SIZE`].
    #[must_use]
    pub fn with_default_batch_size(mut self, size: usize) -> Self {
        self.default_batch_size = if size == 0 { DEFAULT_BATCH_SIZE } else { size };
        self
    }

    /// Resolve a requested batch size against this config.
    #[must_use]
    pub fn effective_batch_size(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(n) if n > 0 => n,
            _ => self.default_batch_size.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_default() {
        let config = ReaderConfig::default();
        assert_eq!(config.effective_batch_size(None), DEFAULT_BATCH_SIZE);
        assert_eq!(config.effective_batch_size(Some(0)), DEFAULT_BATCH_SIZE);
        assert_eq!(config.effective_batch_size(Some(7)), 7);
    }

    #[test]
    fn test_with_default_batch_size() {
        let config = ReaderConfig::default().with_default_batch_size(16);
        assert_eq!(config.effective_batch_size(Some(0)), 16);

        let config = config.with_default_batch_size(0);
        assert_eq!(config.default_batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_zero_default_still_yields_rows() {
        let config = ReaderConfig {
            default_batch_size: 0,
        };
        assert_eq!(config.effective_batch_size(None), 1);
        assert_eq!(config.effective_batch_size(Some(0)), 1);
    }
}
