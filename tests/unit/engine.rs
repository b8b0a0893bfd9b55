use super::*;
use crate::{
    assets::source::StaticImageSource,
    foundation::{core::Rgba8Premul, error::StillwallError},
    surface::MemorySurface,
};

struct FailingSource;

impl ImageSource for FailingSource {
    fn current_image(&self) -> StillwallResult<Option<WallpaperImage>> {
        Err(StillwallError::image("provider offline"))
    }
}

/// Fails the first fetch, then serves its image.
struct FlakySource {
    failing: AtomicBool,
    image: WallpaperImage,
}

impl ImageSource for FlakySource {
    fn current_image(&self) -> StillwallResult<Option<WallpaperImage>> {
        if self.failing.swap(false, Ordering::SeqCst) {
            return Err(StillwallError::image("provider starting"));
        }
        Ok(Some(self.image.clone()))
    }
}

fn red() -> Rgba8Premul {
    Rgba8Premul::from_straight_rgba(255, 0, 0, 255)
}

fn engine_with(
    image: Option<WallpaperImage>,
    viewport: (u32, u32),
    settings: EngineSettings,
) -> (RenderEngine, Arc<MemorySurface>, Arc<StaticImageSource>) {
    let surface = Arc::new(MemorySurface::new(viewport.0, viewport.1));
    let images = Arc::new(StaticImageSource::new(image));
    let engine = RenderEngine::new(surface.clone(), images.clone(), settings);
    (engine, surface, images)
}

#[test]
fn surface_ready_fetches_sizes_and_draws() {
    let (engine, surface, _) = engine_with(
        Some(WallpaperImage::solid(200, 100, red()).unwrap()),
        (100, 100),
        EngineSettings::default(),
    );
    assert_eq!(engine.bounds(), Bounds::default());

    let outcome = engine.on_surface_ready().unwrap();
    assert_eq!(
        outcome,
        DrawOutcome::Presented {
            translation: Translation { x: 0, y: 0 }
        }
    );
    assert_eq!(engine.bounds(), Bounds::from_size(200, 100));
    assert_eq!(surface.size(), Some((100, 100)));
    assert_eq!(surface.present_count(), 1);
}

#[test]
fn offsets_pan_overflowing_image() {
    let (engine, _, _) = engine_with(
        Some(WallpaperImage::solid(200, 100, red()).unwrap()),
        (100, 100),
        EngineSettings::default(),
    );
    engine.on_surface_ready().unwrap();
    let outcome = engine.on_offsets_changed(0.5, 0.0, -50, 0).unwrap();
    assert_eq!(
        outcome,
        DrawOutcome::Presented {
            translation: Translation { x: -50, y: 0 }
        }
    );
}

#[test]
fn narrow_image_is_centered_with_black_margins() {
    let (engine, surface, _) = engine_with(
        Some(WallpaperImage::solid(80, 100, red()).unwrap()),
        (100, 100),
        EngineSettings::default(),
    );
    engine.on_surface_ready().unwrap();
    let outcome = engine.on_offsets_changed(0.9, 0.0, 0, 0).unwrap();
    assert_eq!(
        outcome,
        DrawOutcome::Presented {
            translation: Translation { x: 10, y: 0 }
        }
    );

    let frame = surface.last_frame().unwrap();
    let px = |x: usize, y: usize| {
        let i = (y * 100 + x) * 4;
        [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
    };
    assert_eq!(px(9, 50), [0, 0, 0, 255]);
    assert_eq!(px(10, 50), [255, 0, 0, 255]);
    assert_eq!(px(89, 50), [255, 0, 0, 255]);
    assert_eq!(px(90, 50), [0, 0, 0, 255]);
}

#[test]
fn independent_mode_stores_both_offsets() {
    let (engine, _, _) = engine_with(None, (10, 10), EngineSettings::default());
    engine.on_offsets_changed(0.3, 0.9, 0, 0).unwrap();
    assert_eq!(engine.offsets(), Offsets { x: 0.3, y: 0.9 });
}

#[test]
fn mirror_mode_copies_x_into_y() {
    let settings = EngineSettings {
        y_offset_mode: YOffsetMode::MirrorX,
        ..EngineSettings::default()
    };
    let (engine, _, _) = engine_with(None, (10, 10), settings);
    engine.on_offsets_changed(0.3, 0.9, 0, 0).unwrap();
    assert_eq!(engine.offsets(), Offsets { x: 0.3, y: 0.3 });
}

#[test]
fn offsets_are_clamped() {
    let (engine, _, _) = engine_with(None, (10, 10), EngineSettings::default());
    engine.on_offsets_changed(1.5, -2.0, 0, 0).unwrap();
    assert_eq!(engine.offsets(), Offsets { x: 1.0, y: 0.0 });
}

#[test]
fn unavailable_surface_skips_without_mutation() {
    let (engine, surface, _) = engine_with(
        Some(WallpaperImage::solid(20, 20, red()).unwrap()),
        (10, 10),
        EngineSettings::default(),
    );
    engine.on_surface_ready().unwrap();
    let before_bounds = engine.bounds();
    let before_offsets = engine.offsets();
    surface.set_available(false);

    assert_eq!(engine.draw_frame().unwrap(), DrawOutcome::Skipped);
    assert_eq!(engine.on_visibility_changed(true).unwrap(), DrawOutcome::Skipped);
    assert_eq!(surface.present_count(), 1);
    assert_eq!(engine.bounds(), before_bounds);
    assert_eq!(engine.offsets(), before_offsets);
    assert_eq!(engine.stats().frames_skipped, 2);
}

#[test]
fn draw_before_surface_ready_is_dropped() {
    let (engine, surface, _) = engine_with(None, (10, 10), EngineSettings::default());
    assert_eq!(engine.draw_frame().unwrap(), DrawOutcome::Skipped);
    assert_eq!(surface.present_count(), 0);
}

#[test]
fn hiding_still_redraws() {
    let (engine, surface, _) = engine_with(None, (4, 4), EngineSettings::default());
    engine.on_surface_ready().unwrap();
    engine.on_visibility_changed(true).unwrap();
    assert!(engine.is_visible());
    engine.on_visibility_changed(false).unwrap();
    assert!(!engine.is_visible());
    assert_eq!(surface.present_count(), 3);
}

#[test]
fn refresh_replaces_bounds_entirely() {
    let (engine, _, images) = engine_with(
        Some(WallpaperImage::solid(300, 200, red()).unwrap()),
        (10, 10),
        EngineSettings::default(),
    );
    assert_eq!(engine.refresh_image().unwrap(), Bounds::from_size(300, 200));

    images.set(Some(WallpaperImage::solid(40, 50, red()).unwrap()));
    engine.on_image_source_changed().unwrap();
    assert_eq!(engine.bounds(), Bounds::from_size(40, 50));
    assert_eq!(engine.image().unwrap().width(), 40);

    images.set(None);
    engine.on_image_source_changed().unwrap();
    assert_eq!(engine.bounds(), Bounds::default());
    assert!(engine.image().is_none());
    assert_eq!(engine.stats().image_refreshes, 3);
}

#[test]
fn missing_image_draws_clear_color_only() {
    let settings = EngineSettings {
        clear_rgba: [10, 20, 30, 255],
        ..EngineSettings::default()
    };
    let (engine, surface, _) = engine_with(None, (3, 2), settings);
    engine.on_surface_ready().unwrap();
    let frame = surface.last_frame().unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn failing_source_keeps_previous_image() {
    let surface = Arc::new(MemorySurface::new(4, 4));
    let engine = RenderEngine::new(surface, Arc::new(FailingSource), EngineSettings::default());
    let err = engine.on_surface_ready().unwrap_err();
    assert!(err.to_string().contains("provider offline"));
    assert_eq!(engine.bounds(), Bounds::default());
    assert_eq!(engine.stats().image_refreshes, 0);
}

#[test]
fn geometry_change_is_recorded_and_redraws() {
    let (engine, surface, _) = engine_with(None, (4, 4), EngineSettings::default());
    engine.on_surface_ready().unwrap();
    surface.resize(8, 2);
    engine
        .on_surface_geometry_changed(8, 2, PixelFormat::Rgbx8)
        .unwrap();
    assert_eq!(
        engine.surface_geometry(),
        Some(SurfaceGeometry {
            width: 8,
            height: 2,
            format: PixelFormat::Rgbx8
        })
    );
    let frame = surface.last_frame().unwrap();
    assert_eq!((frame.width, frame.height), (8, 2));
}

#[test]
fn redraw_is_idempotent() {
    let (engine, surface, _) = engine_with(
        Some(WallpaperImage::solid(150, 120, red()).unwrap()),
        (100, 100),
        EngineSettings::default(),
    );
    engine.on_surface_ready().unwrap();
    engine.on_offsets_changed(0.25, 0.5, 0, 0).unwrap();
    let first = surface.last_frame().unwrap();
    let a = engine.draw_frame().unwrap();
    let b = engine.draw_frame().unwrap();
    assert_eq!(a, b);
    assert_eq!(surface.last_frame().unwrap(), first);
}

#[test]
fn listener_impl_refreshes_and_draws() {
    let (engine, surface, images) = engine_with(None, (4, 4), EngineSettings::default());
    engine.on_surface_ready().unwrap();
    images.set(Some(WallpaperImage::solid(4, 4, red()).unwrap()));
    engine.on_image_changed();
    assert_eq!(engine.bounds(), Bounds::from_size(4, 4));
    assert_eq!(surface.present_count(), 2);
}

#[test]
fn failed_first_fetch_still_sizes_surface_and_recovers() {
    let surface = Arc::new(MemorySurface::new(4, 4));
    let images = Arc::new(FlakySource {
        failing: AtomicBool::new(true),
        image: WallpaperImage::solid(4, 4, red()).unwrap(),
    });
    let engine = RenderEngine::new(surface.clone(), images, EngineSettings::default());

    assert!(engine.on_surface_ready().is_err());
    assert_eq!(surface.size(), Some((4, 4)));
    assert_eq!(surface.present_count(), 1);
    let frame = surface.last_frame().unwrap();
    assert_eq!(&frame.data[..4], &[0, 0, 0, 255]);

    assert!(matches!(
        engine.on_image_source_changed().unwrap(),
        DrawOutcome::Presented { .. }
    ));
    assert_eq!(engine.bounds(), Bounds::from_size(4, 4));
    assert!(matches!(
        engine.on_visibility_changed(true).unwrap(),
        DrawOutcome::Presented { .. }
    ));
    assert_eq!(surface.present_count(), 3);
    let frame = surface.last_frame().unwrap();
    assert_eq!(&frame.data[..4], &[255, 0, 0, 255]);
}

#[test]
fn poisoned_background_lock_is_recovered() {
    let (engine, surface, _) = engine_with(
        Some(WallpaperImage::solid(6, 6, red()).unwrap()),
        (4, 4),
        EngineSettings::default(),
    );
    engine.on_surface_ready().unwrap();

    std::thread::scope(|s| {
        let poisoned = s
            .spawn(|| {
                let _bg = engine.background.lock().unwrap();
                panic!("panic while drawing");
            })
            .join();
        assert!(poisoned.is_err());
    });
    assert!(engine.background.is_poisoned());

    assert!(matches!(
        engine.draw_frame().unwrap(),
        DrawOutcome::Presented { .. }
    ));
    assert_eq!(engine.bounds(), Bounds::from_size(6, 6));
    assert_eq!(engine.refresh_image().unwrap(), Bounds::from_size(6, 6));
    assert_eq!(surface.present_count(), 2);
}
