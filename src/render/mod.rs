//! CPU compositing of the wallpaper into a frame buffer.

pub mod canvas;
pub mod frame;

pub use canvas::Canvas;
pub use frame::{FrameBuffer, FrameRGBA};
