use crate::foundation::core::{Offsets, Translation};

/// Translation that pans an image of `image` size across a frame of `frame` size.
///
/// Each axis is independent: when the image overflows the frame the slack is consumed
/// proportionally to the paging offset, otherwise the image is centered and the offset is ignored.
pub fn parallax_translation(image: (u32, u32), frame: (u32, u32), offsets: Offsets) -> Translation {
    let avail_w = i64::from(image.0) - i64::from(frame.0);
    let avail_h = i64::from(image.1) - i64::from(frame.1);
    Translation {
        x: pan_axis(avail_w, offsets.x),
        y: pan_axis(avail_h, offsets.y),
    }
}

/// Pixel shift along one axis given the slack `avail = image - frame`.
pub fn pan_axis(avail: i64, offset: f32) -> i32 {
    let shift = if avail > 0 {
        -((avail as f32 * offset).round() as i64)
    } else {
        -avail.div_euclid(2)
    };
    shift.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
