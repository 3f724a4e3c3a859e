// THEORY:
// This file is the main entry point for the `median_grid` library crate. It exports
// the block-median reducer (`pipeline`), its multi-worker variant
// (`parallel_pipeline`) and the building blocks they share (`core_modules`).
//
// The reduction itself is split bottom-up: `Dimensions` and `PixelGrid` describe
// the data, `PartitionPlan` decides which source pixels feed which output cell, and
// `Chunk` turns one block into its per-channel median color. The image adapters in
// `core_modules::utils` are the only code that knows about file formats.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::dimensions::Dimensions;
pub use core_modules::partition_plan::{BlockRange, PartitionPlan};
pub use core_modules::pixel::pixel::Pixel;
pub use core_modules::pixel_grid::PixelGrid;
pub use error::{GridResult, MedianGridError, ValidationError};
pub use parallel_pipeline::ParallelReducer;
pub use pipeline::{BlockMedianReducer, PipelineConfig, quantize_file, reduce};
