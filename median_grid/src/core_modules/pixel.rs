// THEORY:
// The `Pixel` module is the most fundamental unit of the reducer. It is a "dumb"
// data container for a single three-channel color sample and nothing more. It
// knows how to move between the raw byte layout used by `PixelGrid`, the
// `image` crate's `Rgb<u8>`, and plain vectors; it does not know anything about
// its neighbors, blocks, or medians.
//
// Alpha is deliberately absent. Images are normalized to RGB by the input
// adapter before they reach this type, so every pixel is exactly `CHANNELS`
// bytes wide.

pub mod pixel {
    use crate::error::ValidationError;

    pub type Byte = u8;
    pub type Bytes = Vec<Byte>;
    pub type Channel = Byte;

    /// Channels per pixel (red, green, blue).
    pub const CHANNELS: usize = 3;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        pub fn channels(&self) -> [Channel; CHANNELS] {
            [self.red, self.green, self.blue]
        }
    }

    impl TryFrom<&[Byte]> for Pixel {
        type Error = ValidationError;

        fn try_from(bytes: &[Byte]) -> Result<Self, Self::Error> {
            match bytes {
                &[red, green, blue] => Ok(Pixel::new(red, green, blue)),
                _ => Err(ValidationError::ChannelCount(bytes.len())),
            }
        }
    }

    impl From<[Channel; CHANNELS]> for Pixel {
        fn from([red, green, blue]: [Channel; CHANNELS]) -> Self {
            Pixel::new(red, green, blue)
        }
    }

    impl From<Pixel> for Bytes {
        fn from(pixel: Pixel) -> Self {
            pixel.channels().to_vec()
        }
    }

    impl From<image::Rgb<u8>> for Pixel {
        fn from(rgb: image::Rgb<u8>) -> Self {
            Pixel::from(rgb.0)
        }
    }

    impl From<Pixel> for image::Rgb<u8> {
        fn from(pixel: Pixel) -> Self {
            image::Rgb(pixel.channels())
        }
    }
}
