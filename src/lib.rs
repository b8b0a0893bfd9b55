//! `stillwall` renders a static wallpaper image onto a host-managed surface.
//!
//! A [`RenderEngine`] tracks the current image from an [`ImageSource`] and, whenever a host
//! trigger fires, composites it onto a frame from a [`SurfaceProvider`]. Images wider or taller
//! than the surface pan with the home-screen paging offsets; smaller images are centered.
#![forbid(unsafe_code)]

pub mod assets;
pub mod engine;
pub mod events;
mod foundation;
pub mod render;
pub mod service;
pub mod settings;
pub mod surface;

pub use crate::assets::{
    WallpaperImage,
    decode::{decode_image, from_rgba_image},
    source::{FileImageSource, ImageSource, StaticImageSource},
};
pub use crate::engine::{DrawOutcome, RenderEngine, RenderStats, SurfaceGeometry};
pub use crate::events::{ImageChangeBus, ImageChangeListener, ImageChangeSource, SubscriptionId};
pub use crate::foundation::core::{
    Bounds, Offsets, PixelFormat, Rect, Rgba8Premul, Translation, Vec2,
};
pub use crate::foundation::error::{StillwallError, StillwallResult};
pub use crate::foundation::math::{pan_axis, parallax_translation};
pub use crate::render::{Canvas, FrameBuffer, FrameRGBA};
pub use crate::service::WallpaperService;
pub use crate::settings::{EngineSettings, YOffsetMode};
pub use crate::surface::{MemorySurface, SurfaceProvider};
