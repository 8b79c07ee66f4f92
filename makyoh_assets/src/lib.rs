use makyoh::*;

use std::{
    io,
    path::{Path, PathBuf},
};

mod model;
mod texture;

pub use model::*;
pub use texture::*;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{} has {channels} channels, expected 1 to 4", .path.display())]
    Channels { path: PathBuf, channels: u8 },
    #[error("{}: {source}", .path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: ObjError,
    },
    #[error("{} contains no faces", .path.display())]
    EmptyModel { path: PathBuf },
}

/// Loads the external resources the simulation is configured with.
///
/// Failures are returned as values; the caller decides whether to keep the
/// resource it already has.
pub trait AssetLoader {
    /// Decode the raster image at `path` into a texture.
    fn load_image(&self, path: &Path) -> Result<Texture, AssetError>;

    /// Read the Wavefront OBJ file at `path`.
    fn load_model(&self, path: &Path) -> Result<Model, AssetError>;
}

/// Loads assets from the file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsAssets;

impl AssetLoader for FsAssets {
    #[inline]
    fn load_image(&self, path: &Path) -> Result<Texture, AssetError> {
        load_image(path)
    }

    #[inline]
    fn load_model(&self, path: &Path) -> Result<Model, AssetError> {
        load_model(path)
    }
}

impl<T: AssetLoader + ?Sized> AssetLoader for Box<T> {
    fn load_image(&self, path: &Path) -> Result<Texture, AssetError> {
        (**self).load_image(path)
    }

    fn load_model(&self, path: &Path) -> Result<Model, AssetError> {
        (**self).load_model(path)
    }
}
