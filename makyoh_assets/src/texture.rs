use super::*;

use image::GenericImageView;

/// Pixel layout of a texture, one byte per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Red,
    Rg,
    Rgb,
    Rgba,
}

impl TextureFormat {
    /// Maps a channel count in `1..=4` to its format.
    #[inline]
    pub const fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::Red),
            2 => Some(Self::Rg),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Red => 1,
            Self::Rg => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// An 8-bit texture, owned by whoever holds it and released when dropped.
#[derive(Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    format: TextureFormat,
    pixels: Vec<u8>,
}

impl Texture {
    /// Returns `None` if `pixels` doesn't hold exactly `width * height` texels of `format`.
    pub fn try_new(width: u32, height: u32, format: TextureFormat, pixels: Vec<u8>) -> Option<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(format.channels())?;

        (pixels.len() == len).then(|| {
            log::trace!("acquired {width}x{height} {format:?} texture");
            Self {
                width,
                height,
                format,
                pixels,
            }
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Row-major texels, top row first.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        log::trace!(
            "released {}x{} {:?} texture",
            self.width,
            self.height,
            self.format
        );
    }
}

/// Decode the image at `path`, keeping its channel count and reducing it to 8 bits per channel.
pub fn load_image(path: impl AsRef<Path>) -> Result<Texture, AssetError> {
    let path = path.as_ref();

    let image = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(source) => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => AssetError::Image {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let channels = image.color().channel_count();

    let format = TextureFormat::from_channels(channels).ok_or_else(|| AssetError::Channels {
        path: path.to_path_buf(),
        channels,
    })?;

    let (width, height) = image.dimensions();

    let pixels = match format {
        TextureFormat::Red => image.into_luma8().into_raw(),
        TextureFormat::Rg => image.into_luma_alpha8().into_raw(),
        TextureFormat::Rgb => image.into_rgb8().into_raw(),
        TextureFormat::Rgba => image.into_rgba8().into_raw(),
    };

    log::debug!("loaded {} ({width}x{height}, {format:?})", path.display());

    // the buffer comes straight from a converted image of these dimensions
    Texture::try_new(width, height, format, pixels).ok_or_else(|| AssetError::Channels {
        path: path.to_path_buf(),
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_counts() {
        assert_eq!(TextureFormat::from_channels(0), None);
        assert_eq!(TextureFormat::from_channels(1), Some(TextureFormat::Red));
        assert_eq!(TextureFormat::from_channels(2), Some(TextureFormat::Rg));
        assert_eq!(TextureFormat::from_channels(3), Some(TextureFormat::Rgb));
        assert_eq!(TextureFormat::from_channels(4), Some(TextureFormat::Rgba));
        assert_eq!(TextureFormat::from_channels(5), None);
    }

    #[test]
    fn texel_count_is_checked() {
        assert!(Texture::try_new(2, 2, TextureFormat::Rgb, vec![0; 12]).is_some());
        assert!(Texture::try_new(2, 2, TextureFormat::Rgb, vec![0; 11]).is_none());
        assert!(Texture::try_new(2, 2, TextureFormat::Rg, vec![0; 12]).is_none());
    }

    #[test]
    fn grey_png_is_a_red_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.png");

        image::GrayImage::from_raw(2, 2, vec![0, 64, 128, 255])
            .unwrap()
            .save(&path)
            .unwrap();

        let texture = load_image(&path).unwrap();

        assert_eq!((texture.width(), texture.height()), (2, 2));
        assert_eq!(texture.format(), TextureFormat::Red);
        assert_eq!(texture.pixels(), &[0, 64, 128, 255]);
    }

    #[test]
    fn colour_formats_are_kept() {
        let dir = tempfile::tempdir().unwrap();

        let rgb = dir.path().join("rgb.png");
        image::RgbImage::from_pixel(3, 1, image::Rgb([10, 20, 30]))
            .save(&rgb)
            .unwrap();

        let rgba = dir.path().join("rgba.png");
        image::RgbaImage::from_pixel(1, 2, image::Rgba([1, 2, 3, 4]))
            .save(&rgba)
            .unwrap();

        let grey_alpha = dir.path().join("la.png");
        image::GrayAlphaImage::from_pixel(1, 1, image::LumaA([7, 8]))
            .save(&grey_alpha)
            .unwrap();

        let rgb = load_image(&rgb).unwrap();
        assert_eq!(rgb.format(), TextureFormat::Rgb);
        assert_eq!(rgb.pixels(), &[10, 20, 30, 10, 20, 30, 10, 20, 30]);

        let rgba = load_image(&rgba).unwrap();
        assert_eq!(rgba.format(), TextureFormat::Rgba);
        assert_eq!(rgba.pixels(), &[1, 2, 3, 4, 1, 2, 3, 4]);

        let grey_alpha = load_image(&grey_alpha).unwrap();
        assert_eq!(grey_alpha.format(), TextureFormat::Rg);
        assert_eq!(grey_alpha.pixels(), &[7, 8]);
    }

    #[test]
    fn sixteen_bit_images_are_reduced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");

        image::ImageBuffer::<image::Luma<u16>, _>::from_pixel(1, 1, image::Luma([0xFFFF]))
            .save(&path)
            .unwrap();

        let texture = load_image(&path).unwrap();
        assert_eq!(texture.format(), TextureFormat::Red);
        assert_eq!(texture.pixels(), &[255]);
    }

    #[test]
    fn missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = load_image(dir.path().join("nope.png"));
        assert!(matches!(missing, Err(AssetError::Io { .. })));

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"\x89PNG\r\n\x1a\nnot really").unwrap();
        assert!(matches!(load_image(&corrupt), Err(AssetError::Image { .. })));
    }
}
