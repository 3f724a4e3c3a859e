// THEORY:
// The `pipeline` module is the top-level API of the crate. It wires the partition
// plan and the median chunk together into the block-median reduction, and wraps
// that reduction with the image adapters for whole-file use.
//
// Every check happens before any pixel is read. `PipelineConfig` validates the
// requested grid size as it is built, and the partition plan rejects a grid larger
// than its source. Once a reduction starts it cannot fail, so there is never a
// partially written output.

use crate::core_modules::chunk::chunk::Chunk;
use crate::core_modules::dimensions::Dimensions;
use crate::core_modules::partition_plan::PartitionPlan;
use crate::core_modules::pixel::pixel::{Byte, CHANNELS};
use crate::core_modules::pixel_grid::PixelGrid;
use crate::core_modules::utils::image_helper::image_helper;
use crate::error::{GridResult, ValidationError};
use crate::parallel_pipeline::ParallelReducer;
use image::RgbImage;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

/// Configuration for a file-to-file reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Size of the output grid in cells.
    pub target: Dimensions,
    /// Worker count for the parallel reducer. `None` reduces on the calling thread.
    pub workers: Option<usize>,
}

impl PipelineConfig {
    /// Validates raw user-supplied grid dimensions.
    pub fn new(width: i64, height: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            target: Dimensions::from_signed(width, height)?,
            workers: None,
        })
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }
}

/// Reduces a pixel grid to `target` cells on the calling thread.
#[derive(Debug, Clone, Copy)]
pub struct BlockMedianReducer {
    target: Dimensions,
}

impl BlockMedianReducer {
    pub fn new(target: Dimensions) -> Self {
        Self { target }
    }

    pub fn reduce(&self, source: &PixelGrid) -> Result<PixelGrid, ValidationError> {
        let plan = PartitionPlan::new(source.dimensions(), self.target)?;
        let data = reduce_rows(source, &plan, 0..self.target.height());
        PixelGrid::from_raw(self.target.width(), self.target.height(), data)
    }

    /// Same as [`reduce`](Self::reduce), for callers already holding an `RgbImage`.
    pub fn reduce_image(&self, image: RgbImage) -> Result<RgbImage, ValidationError> {
        let source = PixelGrid::try_from(image)?;
        RgbImage::try_from(self.reduce(&source)?)
    }
}

/// Reduces `source` to a `target`-sized grid of per-block median colors.
pub fn reduce(source: &PixelGrid, target: Dimensions) -> Result<PixelGrid, ValidationError> {
    BlockMedianReducer::new(target).reduce(source)
}

/// Computes the output bytes for target rows `rows`, left to right, top to bottom.
///
/// Each cell depends only on its own block, so disjoint row ranges can be reduced
/// independently and concatenated in order.
pub(crate) fn reduce_rows(source: &PixelGrid, plan: &PartitionPlan, rows: Range<u32>) -> Vec<Byte> {
    let width = plan.target().width();
    let mut out = Vec::with_capacity(rows.len() * width as usize * CHANNELS);
    for row in rows {
        for col in 0..width {
            let Some(block) = plan.block(col, row) else {
                continue;
            };
            debug_assert!(block.area() > 0, "empty block at ({col}, {row})");
            let pixel = Chunk::extract(source, &block)
                .median_pixel()
                .unwrap_or_default();
            out.extend_from_slice(&pixel.channels());
        }
    }
    out
}

/// Decodes `input`, reduces it as configured and writes the result to `output`.
///
/// Returns the dimensions of the written grid.
pub async fn quantize_file(config: &PipelineConfig, input: &Path, output: &Path) -> GridResult<Dimensions> {
    let source = image_helper::load(input)?;
    log::info!(
        "reducing {} ({}) to {} cells",
        input.display(),
        source.dimensions(),
        config.target
    );

    let reduced = match config.workers {
        Some(workers) => {
            ParallelReducer::with_workers(config.target, workers)
                .reduce(Arc::new(source))
                .await?
        }
        None => BlockMedianReducer::new(config.target).reduce(&source)?,
    };

    image_helper::save(output, &reduced)?;
    log::info!("wrote {} ({})", output.display(), reduced.dimensions());
    Ok(reduced.dimensions())
}
