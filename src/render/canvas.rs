use crate::{
    assets::WallpaperImage,
    foundation::core::{Bounds, Rect, Rgba8Premul, Translation},
    render::frame::FrameBuffer,
};

/// Drawing context over a [`FrameBuffer`] with an integer translation.
///
/// Draws are recorded into a `vello_cpu::RenderContext` and land in the frame on
/// [`Canvas::finish`].
pub struct Canvas<'a> {
    frame: &'a mut FrameBuffer,
    ctx: vello_cpu::RenderContext,
    translation: Translation,
}

impl<'a> Canvas<'a> {
    /// Canvas with identity translation.
    pub fn new(frame: &'a mut FrameBuffer) -> Self {
        let (width, height) = frame.size_u16();
        Self {
            frame,
            ctx: vello_cpu::RenderContext::new(width, height),
            translation: Translation::default(),
        }
    }

    /// Accumulate a translation applied to subsequent image draws.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.translation.x = self.translation.x.saturating_add(dx);
        self.translation.y = self.translation.y.saturating_add(dy);
    }

    /// Current translation.
    pub fn translation(&self) -> Translation {
        self.translation
    }

    /// Fill the whole frame; the translation does not apply.
    pub fn draw_color(&mut self, color: Rgba8Premul) {
        let [r, g, b, a] = unpremultiply(color);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&rect_to_cpu(self.frame.rect()));
    }

    /// Draw `image` into `bounds`, shifted by the current translation.
    ///
    /// Pixels map 1:1; a `bounds` larger than the image is clipped to the image, and anything
    /// outside the frame is dropped.
    pub fn draw_image(&mut self, image: &WallpaperImage, bounds: Bounds) {
        let src = bounds.to_rect().intersect(image.bounds().to_rect());
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return;
        }
        let offset = self.translation.as_vec2();
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((offset.x, offset.y)));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(image.paint());
        self.ctx.fill_rect(&rect_to_cpu(src));
    }

    /// Rasterize everything drawn so far into the frame.
    pub fn finish(mut self) {
        self.ctx.flush();
        self.ctx.render_to_pixmap(self.frame.pixmap_mut());
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn unpremultiply(color: Rgba8Premul) -> [u8; 4] {
    let a = u16::from(color.a);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let straight = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
    [straight(color.r), straight(color.g), straight(color.b), color.a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
