//! The wallpaper render engine: image tracking plus parallax compositing.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
};

use crate::{
    assets::{WallpaperImage, source::ImageSource},
    events::ImageChangeListener,
    foundation::{
        core::{Bounds, Offsets, PixelFormat, Translation, clamp_unit},
        error::StillwallResult,
        math::parallax_translation,
    },
    render::Canvas,
    settings::{EngineSettings, YOffsetMode},
    surface::SurfaceProvider,
};

/// Result of one redraw attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A frame was drawn with `translation` and posted to the surface.
    Presented {
        /// Translation applied to the image.
        translation: Translation,
    },
    /// The surface had no frame to give; nothing was drawn.
    Skipped,
}

/// Counters describing engine activity so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames posted to the surface.
    pub frames_presented: u64,
    /// Redraws dropped because no frame was available.
    pub frames_skipped: u64,
    /// Successful image refreshes.
    pub image_refreshes: u64,
}

/// Last geometry reported by the host surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: PixelFormat,
}

#[derive(Default)]
struct Background {
    image: Option<WallpaperImage>,
    bounds: Bounds,
}

#[derive(Default)]
struct Counters {
    presented: AtomicU64,
    skipped: AtomicU64,
    refreshes: AtomicU64,
}

/// Renders a static wallpaper image onto a host surface.
///
/// Triggers may be called from any thread. The background image and its bounds sit behind one
/// lock which is never held while a frame is locked or presented; paging offsets are plain
/// atomics where the last write wins.
pub struct RenderEngine {
    settings: EngineSettings,
    surface: Arc<dyn SurfaceProvider>,
    images: Arc<dyn ImageSource>,
    background: Mutex<Background>,
    offset_x: AtomicU32,
    offset_y: AtomicU32,
    visible: AtomicBool,
    geometry: Mutex<Option<SurfaceGeometry>>,
    counters: Counters,
}

impl RenderEngine {
    /// Engine drawing images from `images` onto `surface`.
    ///
    /// No image is fetched until [`RenderEngine::on_surface_ready`].
    pub fn new(
        surface: Arc<dyn SurfaceProvider>,
        images: Arc<dyn ImageSource>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            settings,
            surface,
            images,
            background: Mutex::new(Background::default()),
            offset_x: AtomicU32::new(0f32.to_bits()),
            offset_y: AtomicU32::new(0f32.to_bits()),
            visible: AtomicBool::new(false),
            geometry: Mutex::new(None),
            counters: Counters::default(),
        }
    }

    fn background(&self) -> MutexGuard<'_, Background> {
        self.background.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The surface became available: fetch the image, size the surface, draw.
    ///
    /// The surface is sized and drawn even when the image source fails, so later triggers can
    /// recover; the refresh error is returned after the draw.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_surface_ready(&self) -> StillwallResult<DrawOutcome> {
        let refreshed = self.refresh_image();
        self.surface.set_size_from_layout();
        let outcome = self.draw_frame()?;
        refreshed?;
        Ok(outcome)
    }

    /// Visibility changed. Redraws in both directions.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_visibility_changed(&self, visible: bool) -> StillwallResult<DrawOutcome> {
        self.visible.store(visible, Ordering::Relaxed);
        self.draw_frame()
    }

    /// Paging position changed.
    ///
    /// Offsets are clamped into `[0, 1]`. The pixel deltas are accepted for host compatibility
    /// but do not influence placement.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_offsets_changed(
        &self,
        x_offset: f32,
        y_offset: f32,
        x_pixels: i32,
        y_pixels: i32,
    ) -> StillwallResult<DrawOutcome> {
        let x = clamp_unit(x_offset);
        let y = match self.settings.y_offset_mode {
            YOffsetMode::Independent => clamp_unit(y_offset),
            YOffsetMode::MirrorX => x,
        };
        self.offset_x.store(x.to_bits(), Ordering::Relaxed);
        self.offset_y.store(y.to_bits(), Ordering::Relaxed);
        self.draw_frame()
    }

    /// Surface was resized or changed format.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_surface_geometry_changed(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> StillwallResult<DrawOutcome> {
        *self.geometry.lock().unwrap_or_else(PoisonError::into_inner) = Some(SurfaceGeometry {
            width,
            height,
            format,
        });
        self.draw_frame()
    }

    /// The image source now yields a different image: refresh and redraw.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_image_source_changed(&self) -> StillwallResult<DrawOutcome> {
        self.refresh_image()?;
        self.draw_frame()
    }

    /// Replace the background image and its bounds from the image source.
    ///
    /// When the source has no image the background is cleared and frames show the clear color
    /// only. When the source fails the previous image is kept.
    pub fn refresh_image(&self) -> StillwallResult<Bounds> {
        let mut bg = self.background();
        let image = self.images.current_image().inspect_err(|err| {
            tracing::warn!(%err, "image source failed; keeping previous wallpaper");
        })?;

        bg.bounds = image.as_ref().map(WallpaperImage::bounds).unwrap_or_default();
        if image.is_none() {
            tracing::warn!("image source has no wallpaper; drawing clear color only");
        }
        bg.image = image;
        self.counters.refreshes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            width = bg.bounds.width(),
            height = bg.bounds.height(),
            "wallpaper refreshed"
        );
        Ok(bg.bounds)
    }

    /// Composite the current image at the current offsets and present it.
    ///
    /// A surface without a frame to give is not an error: the redraw is dropped and the next
    /// trigger draws from whatever state is current then.
    pub fn draw_frame(&self) -> StillwallResult<DrawOutcome> {
        let Some(mut frame) = self.surface.lock_frame() else {
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("no frame available; dropping redraw");
            return Ok(DrawOutcome::Skipped);
        };

        let rect = frame.rect();
        let (dw, dh) = (rect.width() as u32, rect.height() as u32);

        let translation = {
            let bg = self.background();
            let (bw, bh) = (bg.bounds.width(), bg.bounds.height());
            let translation = parallax_translation((bw, bh), (dw, dh), self.offsets());

            let mut canvas = Canvas::new(&mut frame);
            canvas.translate(translation.x, translation.y);
            canvas.draw_color(self.settings.clear_color());
            if let Some(image) = &bg.image {
                canvas.draw_image(image, bg.bounds);
            }
            canvas.finish();
            translation
        };

        self.surface.present(frame)?;
        self.counters.presented.fetch_add(1, Ordering::Relaxed);
        Ok(DrawOutcome::Presented { translation })
    }

    /// Current paging offsets.
    pub fn offsets(&self) -> Offsets {
        Offsets {
            x: f32::from_bits(self.offset_x.load(Ordering::Relaxed)),
            y: f32::from_bits(self.offset_y.load(Ordering::Relaxed)),
        }
    }

    /// Placement bounds of the current image; empty when there is none.
    pub fn bounds(&self) -> Bounds {
        self.background().bounds
    }

    /// The current background image.
    pub fn image(&self) -> Option<WallpaperImage> {
        self.background().image.clone()
    }

    /// Visibility last reported by the host.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    /// Geometry last reported by the host, if any.
    pub fn surface_geometry(&self) -> Option<SurfaceGeometry> {
        *self.geometry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Settings the engine was built with.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Activity counters.
    pub fn stats(&self) -> RenderStats {
        RenderStats {
            frames_presented: self.counters.presented.load(Ordering::Relaxed),
            frames_skipped: self.counters.skipped.load(Ordering::Relaxed),
            image_refreshes: self.counters.refreshes.load(Ordering::Relaxed),
        }
    }
}

impl ImageChangeListener for RenderEngine {
    fn on_image_changed(&self) {
        if let Err(err) = self.on_image_source_changed() {
            tracing::warn!(%err, "redraw after image change failed");
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
