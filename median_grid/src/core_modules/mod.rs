pub mod chunk;
pub mod dimensions;
pub mod partition_plan;
pub mod pixel;
pub mod pixel_grid;
pub mod utils;
