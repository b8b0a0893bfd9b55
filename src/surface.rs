//! The host drawing surface seam and an offscreen implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    foundation::error::StillwallResult,
    render::{FrameBuffer, FrameRGBA},
};

/// Host-managed drawing surface.
///
/// A redraw locks a frame, draws into it and presents it. Presenting replaces the whole visible
/// surface.
pub trait SurfaceProvider: Send + Sync {
    /// Size the surface to the host's layout defaults.
    fn set_size_from_layout(&self);

    /// Acquire a drawable frame, or `None` when the surface cannot be drawn right now.
    fn lock_frame(&self) -> Option<FrameBuffer>;

    /// Post a completed frame.
    fn present(&self, frame: FrameBuffer) -> StillwallResult<()>;
}

#[derive(Debug)]
struct MemorySurfaceState {
    layout: (u32, u32),
    size: Option<(u32, u32)>,
    available: bool,
    presented: Option<FrameRGBA>,
    present_count: u64,
}

/// Offscreen surface that keeps the last presented frame in memory.
///
/// The surface has no size until [`SurfaceProvider::set_size_from_layout`] or
/// [`MemorySurface::resize`] is called; frames cannot be locked before that.
#[derive(Debug)]
pub struct MemorySurface {
    state: Mutex<MemorySurfaceState>,
}

impl MemorySurface {
    /// Surface whose layout default is `width x height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Mutex::new(MemorySurfaceState {
                layout: (width, height),
                size: None,
                available: true,
                presented: None,
                present_count: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemorySurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the surface geometry, as a host would on rotation or resize.
    pub fn resize(&self, width: u32, height: u32) {
        self.state().size = Some((width, height));
    }

    /// Toggle whether frames can be locked.
    pub fn set_available(&self, available: bool) {
        self.state().available = available;
    }

    /// Current surface size, if sized.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.state().size
    }

    /// Last presented frame.
    pub fn last_frame(&self) -> Option<FrameRGBA> {
        self.state().presented.clone()
    }

    /// Number of frames presented so far.
    pub fn present_count(&self) -> u64 {
        self.state().present_count
    }
}

impl SurfaceProvider for MemorySurface {
    fn set_size_from_layout(&self) {
        let mut state = self.state();
        state.size = Some(state.layout);
    }

    fn lock_frame(&self) -> Option<FrameBuffer> {
        let (width, height) = {
            let state = self.state();
            if !state.available {
                return None;
            }
            state.size?
        };
        match FrameBuffer::new(width, height) {
            Ok(frame) => Some(frame),
            Err(err) => {
                tracing::warn!(width, height, %err, "cannot allocate frame");
                None
            }
        }
    }

    fn present(&self, frame: FrameBuffer) -> StillwallResult<()> {
        let mut state = self.state();
        state.presented = Some(frame.to_rgba());
        state.present_count += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/surface.rs"]
mod tests;
