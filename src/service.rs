//! Engine lifecycle and the image-changed subscription.

use std::sync::Arc;

use crate::{
    assets::source::ImageSource,
    engine::RenderEngine,
    events::{ImageChangeListener, ImageChangeSource, SubscriptionId},
    settings::EngineSettings,
    surface::SurfaceProvider,
};

/// Owns the active [`RenderEngine`] and keeps it subscribed to image-changed notifications.
///
/// The event source only ever sees a weak reference to the engine. Replacing the engine or
/// shutting the service down unsubscribes it.
pub struct WallpaperService<E: ImageChangeSource> {
    events: E,
    images: Arc<dyn ImageSource>,
    settings: EngineSettings,
    active: Option<(Arc<RenderEngine>, SubscriptionId)>,
}

impl<E: ImageChangeSource> WallpaperService<E> {
    /// Service fetching images from `images` and listening on `events`.
    pub fn new(events: E, images: Arc<dyn ImageSource>, settings: EngineSettings) -> Self {
        Self {
            events,
            images,
            settings,
            active: None,
        }
    }

    /// Build an engine for `surface` and subscribe it, replacing any previous engine.
    pub fn create_engine(&mut self, surface: Arc<dyn SurfaceProvider>) -> Arc<RenderEngine> {
        self.shutdown();

        let engine = Arc::new(RenderEngine::new(
            surface,
            self.images.clone(),
            self.settings.clone(),
        ));
        let listener: Arc<dyn ImageChangeListener> = engine.clone();
        let id = self.events.subscribe(Arc::downgrade(&listener));
        tracing::debug!(subscription = id.0, "engine subscribed to image changes");

        self.active = Some((engine.clone(), id));
        engine
    }

    /// The active engine, if any.
    pub fn engine(&self) -> Option<&Arc<RenderEngine>> {
        self.active.as_ref().map(|(engine, _)| engine)
    }

    /// Unsubscribe and release the active engine. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some((_, id)) = self.active.take() {
            self.events.unsubscribe(id);
            tracing::debug!(subscription = id.0, "engine unsubscribed from image changes");
        }
    }
}

impl<E: ImageChangeSource> Drop for WallpaperService<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
