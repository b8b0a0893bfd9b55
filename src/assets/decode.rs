use anyhow::Context;

use crate::{
    assets::WallpaperImage,
    foundation::{core::Rgba8Premul, error::StillwallResult},
};

/// Decode an encoded image (PNG, JPEG, ...) into a premultiplied wallpaper bitmap.
pub fn decode_image(bytes: &[u8]) -> StillwallResult<WallpaperImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    from_rgba_image(dyn_img.to_rgba8())
}

/// Convert a straight-alpha RGBA buffer into a wallpaper bitmap.
pub fn from_rgba_image(rgba: image::RgbaImage) -> StillwallResult<WallpaperImage> {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    WallpaperImage::from_premul_rgba8(width, height, rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        if px[3] != 255 {
            let premul = Rgba8Premul::from_straight_rgba(px[0], px[1], px[2], px[3]);
            px.copy_from_slice(&premul.to_array());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
