use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::Context;

use crate::{
    assets::{WallpaperImage, decode::decode_image},
    foundation::error::StillwallResult,
};

/// Provider of the current system wallpaper image.
///
/// Implementations are shared between the host's lifecycle callbacks and the image-changed
/// notification, so they must be thread-safe.
pub trait ImageSource: Send + Sync {
    /// Fetch the current wallpaper image.
    ///
    /// `Ok(None)` means no wallpaper is configured.
    fn current_image(&self) -> StillwallResult<Option<WallpaperImage>>;
}

/// In-memory image source whose image can be swapped at runtime.
#[derive(Debug, Default)]
pub struct StaticImageSource {
    current: Mutex<Option<WallpaperImage>>,
}

impl StaticImageSource {
    /// Source initially yielding `image`.
    pub fn new(image: Option<WallpaperImage>) -> Self {
        Self {
            current: Mutex::new(image),
        }
    }

    /// Replace the image returned by subsequent fetches.
    pub fn set(&self, image: Option<WallpaperImage>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = image;
    }
}

impl ImageSource for StaticImageSource {
    fn current_image(&self) -> StillwallResult<Option<WallpaperImage>> {
        Ok(self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Image source backed by a file that is re-read and decoded on every fetch.
#[derive(Clone, Debug)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImageSource {
    fn current_image(&self) -> StillwallResult<Option<WallpaperImage>> {
        let bytes = match std::fs::read(&self.path) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "wallpaper file missing");
                return Ok(None);
            }
            read => read.with_context(|| format!("read wallpaper '{}'", self.path.display()))?,
        };
        decode_image(&bytes).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
