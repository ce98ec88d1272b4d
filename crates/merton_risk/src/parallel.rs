//! Rayon-based parallelisation utilities.
//!
//! Observations are independent, so the engine maps over them in parallel
//! once a batch is large enough to amortise the thread hand-off. Results
//! always come back in input order.

use rayon::prelude::*;

/// Minimum number of observations handed to one rayon task.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Batch length from which parallel processing is used.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100;

/// Configuration for parallel execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Minimum items per rayon task
    pub batch_size: usize,
    /// Minimum items before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(batch_size: usize, parallel_threshold: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            parallel_threshold,
        }
    }

    /// Always process sequentially.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }
}

/// Parallel map preserving input order.
///
/// # Arguments
///
/// * `items` - Slice of items to process
/// * `batch_size` - Minimum items per rayon task
/// * `mapper` - Function to apply to each item
pub fn parallel_map<T, R, F>(items: &[T], batch_size: usize, mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items
        .par_iter()
        .with_min_len(batch_size.max(1))
        .map(mapper)
        .collect()
}

/// Maps sequentially or in parallel according to `config`.
pub fn map_with_config<T, R, F>(items: &[T], config: &ParallelConfig, mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if config.should_parallelize(items.len()) {
        parallel_map(items, config.batch_size, mapper)
    } else {
        items.iter().map(mapper).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parallel_map_preserves_order() {
        let items: Vec<i32> = (0..1000).collect();
        let doubled = parallel_map(&items, 16, |&x| x * 2);

        assert_eq!(doubled.len(), 1000);
        assert!(doubled.iter().enumerate().all(|(i, &v)| v == 2 * i as i32));
    }

    #[test]
    fn test_map_with_config_matches_sequential() {
        let items: Vec<f64> = (0..500).map(|i| i as f64 * 0.5).collect();
        let par = map_with_config(&items, &ParallelConfig::new(8, 10), |x| x.sqrt());
        let seq = map_with_config(&items, &ParallelConfig::sequential(), |x| x.sqrt());
        assert_eq!(par, seq);
    }

    #[test]
    fn test_parallel_config_default() {
        let config = ParallelConfig::default();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.parallel_threshold, 100);
    }

    #[test]
    fn test_batch_size_floor() {
        assert_eq!(ParallelConfig::new(0, 10).batch_size, 1);
    }

    #[test]
    fn test_should_parallelize() {
        let config = ParallelConfig::default();
        assert!(!config.should_parallelize(50));
        assert!(config.should_parallelize(100));
        assert!(config.should_parallelize(1000));
        assert!(!ParallelConfig::sequential().should_parallelize(1_000_000));
    }

    proptest! {
        #[test]
        fn prop_map_with_config_is_order_preserving(
            items in prop::collection::vec(any::<u32>(), 0..400),
            batch_size in 0usize..64,
            threshold in 0usize..200,
        ) {
            let config = ParallelConfig::new(batch_size, threshold);
            let mapped = map_with_config(&items, &config, |&x| u64::from(x) + 1);
            let expected: Vec<u64> = items.iter().map(|&x| u64::from(x) + 1).collect();
            prop_assert_eq!(mapped, expected);
        }
    }
}
