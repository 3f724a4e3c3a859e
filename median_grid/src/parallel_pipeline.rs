use crate::core_modules::dimensions::Dimensions;
use crate::core_modules::partition_plan::PartitionPlan;
use crate::core_modules::pixel_grid::PixelGrid;
use crate::error::{GridResult, MedianGridError};
use crate::pipeline::reduce_rows;
use futures::future::try_join_all;
use std::ops::Range;
use std::sync::Arc;

/// Reduces a pixel grid by spreading bands of output rows across blocking workers.
///
/// Produces exactly the same bytes as [`BlockMedianReducer`](crate::pipeline::BlockMedianReducer).
#[derive(Debug, Clone, Copy)]
pub struct ParallelReducer {
    target: Dimensions,
    workers: usize,
}

impl ParallelReducer {
    /// One worker per logical CPU.
    pub fn new(target: Dimensions) -> Self {
        Self::with_workers(target, num_cpus::get())
    }

    pub fn with_workers(target: Dimensions, workers: usize) -> Self {
        Self {
            target,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn reduce(&self, source: Arc<PixelGrid>) -> GridResult<PixelGrid> {
        let plan = PartitionPlan::new(source.dimensions(), self.target)?;
        let bands = row_bands(self.target.height(), self.workers);
        log::debug!(
            "reducing to {} across {} bands ({} workers)",
            self.target,
            bands.len(),
            self.workers
        );

        let tasks = bands.into_iter().map(|rows| {
            let source = Arc::clone(&source);
            tokio::task::spawn_blocking(move || reduce_rows(&source, &plan, rows))
        });
        let results = try_join_all(tasks)
            .await
            .map_err(|e| MedianGridError::Worker(e.to_string()))?;

        let data = results.concat();
        Ok(PixelGrid::from_raw(
            self.target.width(),
            self.target.height(),
            data,
        )?)
    }
}

/// Splits `0..rows` into at most `workers` contiguous, non-empty bands.
fn row_bands(rows: u32, workers: usize) -> Vec<Range<u32>> {
    let count = u32::try_from(workers).unwrap_or(u32::MAX).clamp(1, rows.max(1));
    let base = rows / count;
    let extra = rows % count;
    let mut bands = Vec::with_capacity(count as usize);
    let mut start = 0;
    for band in 0..count {
        let len = base + u32::from(band < extra);
        bands.push(start..start + len);
        start += len;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::reduce;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height).unwrap()
    }

    fn gradient(width: u32, height: u32) -> PixelGrid {
        let data = (0..height)
            .flat_map(|y| {
                (0..width).flat_map(move |x| [(x * 13 % 256) as u8, (y * 29 % 256) as u8, (x ^ y) as u8])
            })
            .collect();
        PixelGrid::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn bands_cover_rows_in_order() {
        assert_eq!(row_bands(10, 3), vec![0..4, 4..7, 7..10]);
        assert_eq!(row_bands(2, 8), vec![0..1, 1..2]);
        assert_eq!(row_bands(5, 1), vec![0..5]);
        assert_eq!(row_bands(1, 0), vec![0..1]);
    }

    #[tokio::test]
    async fn matches_sequential_reduction() {
        let source = Arc::new(gradient(37, 23));
        for target in [dims(1, 1), dims(5, 4), dims(12, 23), dims(37, 23)] {
            let expected = reduce(&source, target).unwrap();
            for workers in [1, 2, 3, 8, 64] {
                let reduced = ParallelReducer::with_workers(target, workers)
                    .reduce(Arc::clone(&source))
                    .await
                    .unwrap();
                assert_eq!(reduced, expected, "target {target}, {workers} workers");
            }
        }
    }

    #[tokio::test]
    async fn default_worker_count_is_positive() {
        let reducer = ParallelReducer::new(dims(2, 2));
        assert!(reducer.workers() >= 1);
        let reduced = reducer.reduce(Arc::new(gradient(4, 4))).await.unwrap();
        assert_eq!(reduced.dimensions(), dims(2, 2));
    }

    #[tokio::test]
    async fn rejects_oversized_target_before_spawning() {
        let err = ParallelReducer::with_workers(dims(3, 9), 4)
            .reduce(Arc::new(gradient(3, 3)))
            .await
            .unwrap_err();
        assert!(matches!(err, MedianGridError::Validation(_)));
    }
}
