// THEORY:
// The `PartitionPlan` is the bridge between the raw image and the output grid. It
// decides, once per reduction, which rectangle of source pixels feeds each output
// cell. It never touches pixel data itself; it only does the slicing math.
//
// Key architectural principles:
// 1.  **Floor-divided nominal blocks**: every block is `source / target` pixels on
//     each axis, rounded down. Because the target is never larger than the source,
//     this is always at least one pixel.
// 2.  **Trailing-edge absorption**: the last column and the last row stretch to the
//     source edge, so the remainder of the division lands there. Blocks are uniform
//     except for that final row and column, which can only be larger.
// 3.  **Pure and deterministic**: the plan is a function of (source, target) alone.
//     Both reducers ask it for block ranges by cell, in any order, from any thread.

use crate::core_modules::dimensions::Dimensions;
use crate::error::ValidationError;

/// A half-open rectangle of source pixels, `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRange {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl BlockRange {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Number of source pixels inside the block.
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x0..self.x1).contains(&x) && (self.y0..self.y1).contains(&y)
    }
}

/// Maps each cell of a target grid to the block of source pixels it summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPlan {
    source: Dimensions,
    target: Dimensions,
    block_size: Dimensions,
}

impl PartitionPlan {
    /// Derives the plan, rejecting a target grid larger than its source.
    pub fn new(source: Dimensions, target: Dimensions) -> Result<Self, ValidationError> {
        target.ensure_within(&source)?;
        let block_size = Dimensions::new(
            source.width() / target.width(),
            source.height() / target.height(),
        )?;
        log::debug!(
            "partition plan: source {} -> target {}, nominal block {}",
            source,
            target,
            block_size
        );
        Ok(Self {
            source,
            target,
            block_size,
        })
    }

    pub fn source(&self) -> Dimensions {
        self.source
    }

    pub fn target(&self) -> Dimensions {
        self.target
    }

    /// The nominal (floor-divided) block size. Only the final row and column differ.
    pub fn block_size(&self) -> Dimensions {
        self.block_size
    }

    /// Source column range `[x0, x1)` feeding output column `col`.
    pub fn column_span(&self, col: u32) -> Option<(u32, u32)> {
        Self::span(
            col,
            self.target.width(),
            self.block_size.width(),
            self.source.width(),
        )
    }

    /// Source row range `[y0, y1)` feeding output row `row`.
    pub fn row_span(&self, row: u32) -> Option<(u32, u32)> {
        Self::span(
            row,
            self.target.height(),
            self.block_size.height(),
            self.source.height(),
        )
    }

    fn span(index: u32, count: u32, nominal: u32, total: u32) -> Option<(u32, u32)> {
        if index >= count {
            return None;
        }
        let start = index * nominal;
        let end = if index < count - 1 {
            (index + 1) * nominal
        } else {
            total
        };
        Some((start, end))
    }

    /// The block for output cell (col, row), or `None` outside the target grid.
    pub fn block(&self, col: u32, row: u32) -> Option<BlockRange> {
        let (x0, x1) = self.column_span(col)?;
        let (y0, y1) = self.row_span(row)?;
        Some(BlockRange { x0, x1, y0, y1 })
    }

    /// Every ((col, row), block) pair in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), BlockRange)> + '_ {
        (0..self.target.height()).flat_map(move |row| {
            (0..self.target.width()).filter_map(move |col| {
                self.block(col, row).map(|block| ((col, row), block))
            })
        })
    }
}
