//! Wallpaper image handling: decoding and the image-source seam.

use std::sync::Arc;

use crate::foundation::{
    core::{Bounds, Rgba8Premul},
    error::{StillwallError, StillwallResult},
};

pub mod decode;
pub mod source;

/// Decoded wallpaper bitmap in premultiplied RGBA8 form.
///
/// Pixels live in a shared `vello_cpu::Pixmap`, so cloning is cheap and drawing does not copy.
#[derive(Clone)]
pub struct WallpaperImage {
    pixmap: Arc<vello_cpu::Pixmap>,
}

fn checked_size(width: u32, height: u32) -> StillwallResult<(u16, u16, usize)> {
    if width == 0 || height == 0 {
        return Err(StillwallError::image("image size must be non-zero"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| StillwallError::image("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StillwallError::image("image height exceeds u16"))?;
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| StillwallError::image("image dimensions overflow"))?;
    Ok((w, h, len))
}

impl WallpaperImage {
    /// Wrap premultiplied pixels, tightly packed and row-major.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> StillwallResult<Self> {
        let (w, h, expected) = checked_size(width, height)?;
        if rgba8_premul.len() != expected {
            return Err(StillwallError::image(format!(
                "pixel buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }

        let mut may_have_opacities = false;
        let pixels = rgba8_premul
            .chunks_exact(4)
            .map(|px| {
                may_have_opacities |= px[3] != 255;
                vello_cpu::peniko::color::PremulRgba8 {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                may_have_opacities,
            )),
        })
    }

    /// Image filled with a single color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> StillwallResult<Self> {
        let (_, _, len) = checked_size(width, height)?;
        Self::from_premul_rgba8(width, height, color.to_array().repeat(len / 4))
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    /// Natural placement rectangle at the origin.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.width(), self.height())
    }

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Image paint sharing this bitmap.
    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

impl PartialEq for WallpaperImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixmap, &other.pixmap)
            || (self.width() == other.width()
                && self.height() == other.height()
                && self.data() == other.data())
    }
}

impl Eq for WallpaperImage {}

impl std::fmt::Debug for WallpaperImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallpaperImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
