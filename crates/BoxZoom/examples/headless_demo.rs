use anyhow::Result;
use box_zoom::camera::MercatorCamera;
use box_zoom::geo::LngLat;
use box_zoom::input::{Modifiers, PointerButton, PointerEvent};
use box_zoom::overlay::{MarkerId, OverlayHost};
use box_zoom::{BoxZoom, BoxZoomConfig};
use glam::Vec2;
use slotmap::SlotMap;

/// A host that logs what a real map container would do.
struct ConsoleHost {
    markers: SlotMap<MarkerId, Vec2>,
    viewport: Vec2,
}

impl OverlayHost for ConsoleHost {
    fn create_marker(&mut self, size: f32) -> MarkerId {
        println!("  [host] create {size}px marker");
        self.markers.insert(Vec2::ZERO)
    }

    fn set_marker_translation(&mut self, marker: MarkerId, pos: Vec2) {
        self.markers[marker] = pos;
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        println!("  [host] remove marker");
        self.markers.remove(marker);
    }

    fn set_crosshair(&mut self, on: bool) {
        println!("  [host] crosshair cursor: {on}");
    }

    fn capture_pointer(&mut self, on: bool) {
        println!("  [host] pointer capture: {on}");
    }

    fn suppress_native_drag(&mut self, on: bool) {
        println!("  [host] native drag suppressed: {on}");
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== BoxZoom Headless Demo ===");

    let viewport = Vec2::new(1280.0, 720.0);
    let mut camera = MercatorCamera::new(LngLat::new(13.4, 52.5), 10.0, viewport).with_bearing(20.0);
    let mut host = ConsoleHost {
        markers: SlotMap::with_key(),
        viewport,
    };

    let mut handler = BoxZoom::new(BoxZoomConfig::default());
    handler.enable();

    let mut events = Vec::new();

    // Shift + left press, a short drag, release.
    let start = Vec2::new(400.0, 250.0);
    handler.on_pointer_down(
        &PointerEvent::button(start, PointerButton::Primary, Modifiers::SHIFT),
        &mut host,
    );

    for step in 1..=4 {
        let pos = start + Vec2::new(90.0, 60.0) * step as f32;
        handler.on_pointer_move(&PointerEvent::moved(pos), &camera, &mut host, &mut events);
        let corners: Vec<_> = host.markers.values().collect();
        println!("  frame corners: {corners:?}");
    }

    let end = start + Vec2::new(360.0, 240.0);
    handler.on_pointer_up(
        &PointerEvent::button(end, PointerButton::Primary, Modifiers::empty()),
        &mut camera,
        &mut host,
        &mut events,
    );

    println!("\nEmitted events:");
    for event in &events {
        println!("  {event:?}");
    }

    println!("\nCamera after commit:");
    println!(
        "  center ({:.4}, {:.4}) zoom {:.2} bearing {:.1}",
        camera.center.lng, camera.center.lat, camera.zoom, camera.bearing
    );

    Ok(())
}
