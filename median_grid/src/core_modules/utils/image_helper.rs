// Input and output adapters around the `image` crate. Decoding normalizes every
// color type to 8-bit RGB before the data reaches a `PixelGrid`; encoding picks the
// container format from the output path's extension.

pub mod image_helper {
    use crate::core_modules::pixel_grid::PixelGrid;
    use crate::error::{GridResult, MedianGridError};
    use image::{ExtendedColorType, ImageFormat};
    use std::io::{Cursor, Write};
    use std::path::{Path, PathBuf};
    use tempfile::NamedTempFile;

    const IN_MEMORY: &str = "<memory>";

    /// Decodes the image at `path` and converts it to RGB.
    pub fn load(path: &Path) -> GridResult<PixelGrid> {
        let image = image::open(path).map_err(|source| MedianGridError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "decoded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );
        Ok(PixelGrid::try_from(image.to_rgb8())?)
    }

    /// Decodes an in-memory image and converts it to RGB.
    pub fn decode(bytes: &[u8]) -> GridResult<PixelGrid> {
        let image = image::load_from_memory(bytes).map_err(|source| MedianGridError::Decode {
            path: PathBuf::from(IN_MEMORY),
            source,
        })?;
        Ok(PixelGrid::try_from(image.to_rgb8())?)
    }

    /// Encodes `grid` into `format` entirely in memory.
    pub fn encode(grid: &PixelGrid, format: ImageFormat) -> Result<Vec<u8>, image::ImageError> {
        let mut buffer = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut buffer,
            grid.as_bytes(),
            grid.width(),
            grid.height(),
            ExtendedColorType::Rgb8,
            format,
        )?;
        Ok(buffer.into_inner())
    }

    /// Encodes `grid` and writes it to `path`.
    ///
    /// The bytes go to a temporary file next to `path`, which is then renamed
    /// over it. A failed encode or write leaves whatever was at `path` untouched.
    pub fn save(path: &Path, grid: &PixelGrid) -> GridResult<()> {
        let encode_error = |source: image::ImageError| MedianGridError::Encode {
            path: path.to_path_buf(),
            source,
        };
        let format = ImageFormat::from_path(path).map_err(encode_error)?;
        let bytes = encode(grid, format).map_err(encode_error)?;
        write_replacing(path, &bytes).map_err(|source| MedianGridError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("wrote {} bytes of {:?} to {}", bytes.len(), format, path.display());
        Ok(())
    }

    fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
