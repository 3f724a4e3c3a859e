// THEORY:
// The `Chunk` module represents the pixel population of one block. It is the unit
// the reducer summarizes: a rectangle of source pixels goes in, one representative
// color comes out.
//
// Key architectural principles:
// 1.  **Channel-separated storage**: a chunk keeps one flat vector per channel
//     rather than a vector of pixels. The median is computed per channel, never as
//     a joint color median, so the populations are kept apart from the start.
// 2.  **Median, not mean**: the representative color is the per-channel median. An
//     even population averages its two middle samples and truncates to a byte.
// 3.  **Data Container**: like `Pixel`, `Chunk` is a "dumb" container. It knows how
//     to summarize its own data but nothing about where its block sits in the grid.

pub mod chunk {
    use crate::core_modules::partition_plan::BlockRange;
    use crate::core_modules::pixel::pixel::{CHANNELS, Channel, Pixel};
    use crate::core_modules::pixel_grid::PixelGrid;

    /// The samples of one block, split by channel.
    pub struct Chunk {
        /// The width of the chunk in pixels.
        pub width: u32,
        /// The height of the chunk in pixels.
        pub height: u32,
        /// One population per channel, in red, green, blue order.
        pub channels: [Vec<Channel>; CHANNELS],
    }

    impl Chunk {
        pub fn new(width: u32, height: u32, pixels: &[Pixel]) -> Self {
            let mut channels: [Vec<Channel>; CHANNELS] =
                std::array::from_fn(|_| Vec::with_capacity(pixels.len()));
            for pixel in pixels {
                for (population, sample) in channels.iter_mut().zip(pixel.channels()) {
                    population.push(sample);
                }
            }
            Self {
                width,
                height,
                channels,
            }
        }

        /// Gathers the samples of `block` from `grid`.
        ///
        /// The block must lie inside the grid; a plan built from the grid's own
        /// dimensions always satisfies this.
        pub fn extract(grid: &PixelGrid, block: &BlockRange) -> Self {
            let area = block.area();
            let mut channels: [Vec<Channel>; CHANNELS] =
                std::array::from_fn(|_| Vec::with_capacity(area));
            let start = block.x0 as usize * CHANNELS;
            let end = block.x1 as usize * CHANNELS;
            for y in block.y0..block.y1 {
                let Some(row) = grid.row(y) else { break };
                for sample in row[start..end].chunks_exact(CHANNELS) {
                    for (population, &value) in channels.iter_mut().zip(sample) {
                        population.push(value);
                    }
                }
            }
            Self {
                width: block.width(),
                height: block.height(),
                channels,
            }
        }

        pub fn len(&self) -> usize {
            self.channels[0].len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// The per-channel median color of the chunk, or `None` when it holds no pixels.
        ///
        /// Consumes the chunk because selection reorders the populations in place.
        pub fn median_pixel(mut self) -> Option<Pixel> {
            let [red, green, blue] = &mut self.channels;
            Some(Pixel::new(median(red)?, median(green)?, median(blue)?))
        }
    }

    /// Median of a population, or `None` when it is empty.
    ///
    /// Even populations average the two middle values and truncate toward zero.
    pub fn median(values: &mut [Channel]) -> Option<Channel> {
        let len = values.len();
        if len == 0 {
            return None;
        }
        let mid = len / 2;
        let (lower, upper, _) = values.select_nth_unstable(mid);
        let upper = *upper;
        if len % 2 == 1 {
            return Some(upper);
        }
        let below = lower.iter().copied().max().unwrap_or(upper);
        Some(((u16::from(below) + u16::from(upper)) / 2) as Channel)
    }
}

#[cfg(test)]
mod tests {
    use super::chunk::*;
    use crate::core_modules::partition_plan::BlockRange;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::pixel_grid::PixelGrid;

    #[test]
    fn odd_population_takes_middle_value() {
        assert_eq!(median(&mut [9, 1, 5]), Some(5));
        assert_eq!(median(&mut [200]), Some(200));
        assert_eq!(median(&mut [3, 3, 250, 0, 3]), Some(3));
    }

    #[test]
    fn even_population_averages_and_truncates() {
        assert_eq!(median(&mut [1, 2]), Some(1));
        assert_eq!(median(&mut [255, 254]), Some(254));
        assert_eq!(median(&mut [0, 255]), Some(127));
        assert_eq!(median(&mut [10, 40, 20, 30]), Some(25));
        assert_eq!(median(&mut [255, 255, 255, 255]), Some(255));
    }

    #[test]
    fn channels_are_independent() {
        // A joint color median would pick one of the input colors; the channel-wise
        // median need not.
        let pixels = [
            Pixel::new(255, 0, 0),
            Pixel::new(0, 255, 0),
            Pixel::new(0, 0, 255),
        ];
        let chunk = Chunk::new(3, 1, &pixels);
        assert_eq!(chunk.median_pixel(), Some(Pixel::new(0, 0, 0)));
    }

    #[test]
    fn extracts_only_the_block() {
        #[rustfmt::skip]
        let grid = PixelGrid::from_raw(3, 2, vec![
            1, 1, 1,   2, 2, 2,   3, 3, 3,
            4, 4, 4,   5, 5, 5,   6, 6, 6,
        ])
        .unwrap();
        let block = BlockRange { x0: 1, x1: 3, y0: 0, y1: 2 };
        let chunk = Chunk::extract(&grid, &block);
        assert_eq!((chunk.width, chunk.height), (2, 2));
        assert_eq!(chunk.len(), 4);
        assert_eq!(chunk.channels[0], vec![2, 3, 5, 6]);
        assert_eq!(chunk.median_pixel(), Some(Pixel::new(4, 4, 4)));
    }

    #[test]
    fn empty_chunk_has_no_median() {
        assert_eq!(median(&mut []), None);
        let chunk = Chunk::new(0, 0, &[]);
        assert!(chunk.is_empty());
        assert_eq!(chunk.median_pixel(), None);
    }
}
