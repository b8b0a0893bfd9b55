pub use kurbo::{Rect, Vec2};

use crate::foundation::math::mul_div255_u8;

/// Placement rectangle of the background image, in image pixels.
///
/// The origin is always `(0, 0)`; `right`/`bottom` track the intrinsic size of the current image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Left edge, always 0.
    pub left: u32,
    /// Top edge, always 0.
    pub top: u32,
    /// Right edge (exclusive), equal to the intrinsic width.
    pub right: u32,
    /// Bottom edge (exclusive), equal to the intrinsic height.
    pub bottom: u32,
}

impl Bounds {
    /// Bounds anchored at the origin with the given intrinsic size.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        }
    }

    /// Intrinsic width.
    pub fn width(self) -> u32 {
        self.right - self.left
    }

    /// Intrinsic height.
    pub fn height(self) -> u32 {
        self.bottom - self.top
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Same rectangle in floating-point drawing coordinates.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

/// Normalized home-screen paging position.
///
/// Both components live in `[0, 1]`; `0` is the leftmost/topmost page.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Offsets {
    /// Horizontal paging position.
    pub x: f32,
    /// Vertical paging position.
    pub y: f32,
}

impl Offsets {
    /// Create offsets, clamping both components into `[0, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

/// Clamp into `[0, 1]`; NaN maps to 0.
pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Whole-pixel translation applied to the drawing context before the image is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Translation {
    /// Horizontal shift in pixels (negative pans the image left).
    pub x: i32,
    /// Vertical shift in pixels (negative pans the image up).
    pub y: i32,
}

impl Translation {
    /// Translation as a drawing-space vector.
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Pixel layout reported by the host surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// RGBA8 with premultiplied alpha.
    #[default]
    Rgba8Premul,
    /// RGB8 with an ignored fourth byte.
    Rgbx8,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Opaque black.
    pub fn black() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let premul = |c: u8| mul_div255_u8(u16::from(c), u16::from(a));
        Self {
            r: premul(r),
            g: premul(g),
            b: premul(b),
            a,
        }
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
