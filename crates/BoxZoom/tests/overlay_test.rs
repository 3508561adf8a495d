use box_zoom::camera::{CameraBridge, MercatorCamera};
use box_zoom::geo::{GeoBounds, LngLat, envelope_quad};
use box_zoom::input::{Modifiers, PointerButton, PointerEvent};
use box_zoom::overlay::{
    BufferId, DrawQuad, MarkerId, OverlayHost, ProgramId, RasterPipeline, ShaderError,
};
use box_zoom::shaders::{self, ShaderSource};
use box_zoom::{BoxZoom, BoxZoomConfig, MapEvent};
use glam::Vec2;
use slotmap::SlotMap;

#[derive(Default)]
struct MockPipeline {
    fail_compile: bool,
    compile_count: usize,
    last_defines: Vec<String>,
    programs: SlotMap<ProgramId, ()>,
    buffers: SlotMap<BufferId, Vec<f32>>,
    upload_count: usize,
    draws: Vec<DrawQuad>,
}

impl RasterPipeline for MockPipeline {
    fn compile_program(
        &mut self,
        source: &ShaderSource,
        defines: &[String],
    ) -> Result<ProgramId, ShaderError> {
        self.compile_count += 1;
        self.last_defines = defines.to_vec();
        if self.fail_compile {
            return Err(ShaderError::Compile(format!("{}: link error", source.name)));
        }
        Ok(self.programs.insert(()))
    }

    fn create_buffer(&mut self) -> BufferId {
        self.buffers.insert(Vec::new())
    }

    fn upload_vertices(&mut self, buffer: BufferId, vertices: &[f32]) {
        self.upload_count += 1;
        self.buffers[buffer] = vertices.to_vec();
    }

    fn draw(&mut self, call: &DrawQuad) {
        self.draws.push(call.clone());
    }

    fn destroy_program(&mut self, program: ProgramId) {
        self.programs.remove(program);
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(buffer);
    }
}

#[derive(Default)]
struct MockHost {
    markers: SlotMap<MarkerId, Vec2>,
    markers_created: usize,
    crosshair: bool,
    viewport: Vec2,
    pipeline: Option<MockPipeline>,
}

impl MockHost {
    fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    fn with_pipeline(viewport: Vec2) -> Self {
        Self {
            viewport,
            pipeline: Some(MockPipeline::default()),
            ..Default::default()
        }
    }

    fn pipeline(&self) -> &MockPipeline {
        self.pipeline.as_ref().expect("host has a pipeline")
    }
}

impl OverlayHost for MockHost {
    fn create_marker(&mut self, _size: f32) -> MarkerId {
        self.markers_created += 1;
        self.markers.insert(Vec2::ZERO)
    }

    fn set_marker_translation(&mut self, marker: MarkerId, pos: Vec2) {
        self.markers[marker] = pos;
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(marker);
    }

    fn set_crosshair(&mut self, on: bool) {
        self.crosshair = on;
    }

    fn capture_pointer(&mut self, _on: bool) {}

    fn suppress_native_drag(&mut self, _on: bool) {}

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn device_pixel_ratio(&self) -> f32 {
        2.0
    }

    fn raster(&mut self) -> Option<&mut dyn RasterPipeline> {
        self.pipeline
            .as_mut()
            .map(|pipeline| pipeline as &mut dyn RasterPipeline)
    }
}

const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

fn press(pos: Vec2) -> PointerEvent {
    PointerEvent::button(pos, PointerButton::Primary, Modifiers::SHIFT)
}

fn release(pos: Vec2) -> PointerEvent {
    PointerEvent::button(pos, PointerButton::Primary, Modifiers::empty())
}

fn assert_close(a: Vec2, b: Vec2, tolerance: f32) {
    assert!(
        (a - b).length() < tolerance,
        "expected {b:?}, got {a:?} (tolerance {tolerance})"
    );
}

#[test]
fn test_frame_markers_sit_on_envelope_corners_under_rotation() {
    let mut handler = BoxZoom::new(BoxZoomConfig::default());
    handler.enable();
    let mut host = MockHost::new(VIEWPORT);
    let mut camera = MercatorCamera::new(LngLat::new(13.4, 52.5), 9.0, VIEWPORT).with_bearing(45.0);
    let mut events = Vec::new();

    let p0 = Vec2::new(300.0, 200.0);
    let p1 = Vec2::new(500.0, 400.0);
    handler.on_pointer_down(&press(p0), &mut host);
    handler.on_pointer_move(&PointerEvent::moved(p1), &camera, &mut host, &mut events);

    assert_eq!(host.markers.len(), 4);

    let bounds = GeoBounds::from_points(camera.unproject(p0), camera.unproject(p1));
    let quad = envelope_quad(&camera, &bounds);

    // Every projected envelope corner has exactly one marker on it.
    for corner in [quad.nw, quad.ne, quad.sw, quad.se] {
        let on_corner = host
            .markers
            .values()
            .filter(|pos| (**pos - corner).length() < 1e-2)
            .count();
        assert_eq!(on_corner, 1, "no marker on corner {corner:?}");
    }

    // Under a 45 degree bearing the quad is not the raw drag rectangle.
    assert!((quad.nw.y - quad.ne.y).abs() > 1.0);
    assert!((quad.nw.x - quad.sw.x).abs() > 1.0);

    handler.on_pointer_up(&release(p1), &mut camera, &mut host, &mut events);
    assert_eq!(host.markers.len(), 0);
}

#[test]
fn test_raster_overlay_compiles_once_and_draws_per_move() {
    let mut handler = BoxZoom::new(BoxZoomConfig::default());
    handler.enable();
    let mut host = MockHost::with_pipeline(VIEWPORT);
    let mut camera = MercatorCamera::new(LngLat::new(0.0, 0.0), 5.0, VIEWPORT);
    let mut events = Vec::new();

    handler.on_pointer_down(&press(Vec2::new(100.0, 100.0)), &mut host);
    for step in 1..=3 {
        let pos = Vec2::new(100.0 + 50.0 * step as f32, 100.0 + 40.0 * step as f32);
        handler.on_pointer_move(&PointerEvent::moved(pos), &camera, &mut host, &mut events);
    }

    let pipeline = host.pipeline();
    assert_eq!(pipeline.compile_count, 1);
    assert_eq!(pipeline.upload_count, 3);
    assert_eq!(pipeline.draws.len(), 3);
    // The raster strategy draws; no frame markers exist.
    assert_eq!(host.markers_created, 0);

    let style = BoxZoomConfig::default().style;
    let draw = host.pipeline().draws.last().unwrap();
    assert_eq!(draw.vertex_count, 4);
    assert_eq!(draw.color, style.fill_color);
    assert_eq!(draw.opacity, style.fill_opacity);
    // Identity model-view: vertices are pre-normalized to clip space.
    let mut identity = [0.0f32; 16];
    for i in 0..4 {
        identity[i * 5] = 1.0;
    }
    assert_eq!(draw.matrix, identity);

    // The device pixel ratio reaches the preprocessor defines.
    assert!(
        host.pipeline()
            .last_defines
            .iter()
            .any(|d| d == "DEVICE_PIXEL_RATIO 2.0")
    );

    handler.on_pointer_up(&release(Vec2::new(250.0, 220.0)), &mut camera, &mut host, &mut events);

    // Program and buffer are released with the session.
    assert!(host.pipeline().programs.is_empty());
    assert!(host.pipeline().buffers.is_empty());
}

#[test]
fn test_raster_vertices_are_clip_space_corners() {
    let mut handler = BoxZoom::new(BoxZoomConfig::default());
    handler.enable();
    let mut host = MockHost::with_pipeline(VIEWPORT);
    let camera = MercatorCamera::new(LngLat::new(0.0, 0.0), 5.0, VIEWPORT);
    let mut events = Vec::new();

    // With no rotation the envelope projects back onto the drag rectangle:
    // (200,150)-(600,450) inside an 800x600 viewport.
    handler.on_pointer_down(&press(Vec2::new(200.0, 150.0)), &mut host);
    handler.on_pointer_move(
        &PointerEvent::moved(Vec2::new(600.0, 450.0)),
        &camera,
        &mut host,
        &mut events,
    );

    let pipeline = host.pipeline();
    let uploaded = pipeline.buffers.values().next().unwrap();
    assert_eq!(uploaded.len(), 8);

    // Triangle strip order: nw, ne, sw, se.
    let expected = [
        Vec2::new(-0.5, 0.5),
        Vec2::new(0.5, 0.5),
        Vec2::new(-0.5, -0.5),
        Vec2::new(0.5, -0.5),
    ];
    for (i, corner) in expected.iter().enumerate() {
        let got = Vec2::new(uploaded[i * 2], uploaded[i * 2 + 1]);
        assert_close(got, *corner, 1e-3);
    }
}

#[test]
fn test_compile_failure_falls_back_to_frame_overlay() {
    let mut handler = BoxZoom::new(BoxZoomConfig::default());
    handler.enable();
    let mut host = MockHost::with_pipeline(VIEWPORT);
    host.pipeline.as_mut().unwrap().fail_compile = true;
    let mut camera = MercatorCamera::new(LngLat::new(0.0, 0.0), 5.0, VIEWPORT);
    let mut events = Vec::new();

    handler.on_pointer_down(&press(Vec2::new(100.0, 100.0)), &mut host);
    handler.on_pointer_move(
        &PointerEvent::moved(Vec2::new(300.0, 250.0)),
        &camera,
        &mut host,
        &mut events,
    );

    // Compilation was attempted once, then the frame strategy took over.
    assert_eq!(host.pipeline().compile_count, 1);
    assert!(host.pipeline().draws.is_empty());
    assert_eq!(host.markers.len(), 4);

    // The failure never leaks into the interaction contract.
    handler.on_pointer_up(&release(Vec2::new(300.0, 250.0)), &mut camera, &mut host, &mut events);
    assert!(matches!(events.last(), Some(MapEvent::BoxZoomEnd { .. })));
    assert_eq!(host.markers.len(), 0);
}

#[test]
fn test_raster_can_be_disabled_by_config() {
    let config = BoxZoomConfig {
        prefer_raster_overlay: false,
        ..Default::default()
    };
    let mut handler = BoxZoom::new(config);
    handler.enable();
    let mut host = MockHost::with_pipeline(VIEWPORT);
    let camera = MercatorCamera::new(LngLat::new(0.0, 0.0), 5.0, VIEWPORT);
    let mut events = Vec::new();

    handler.on_pointer_down(&press(Vec2::new(100.0, 100.0)), &mut host);
    handler.on_pointer_move(
        &PointerEvent::moved(Vec2::new(200.0, 200.0)),
        &camera,
        &mut host,
        &mut events,
    );

    assert_eq!(host.pipeline().compile_count, 0);
    assert_eq!(host.markers.len(), 4);
}

#[test]
fn test_apply_defines_prepends_one_line_per_define() {
    let defines = ["OVERLAY_QUAD".to_string(), "DEVICE_PIXEL_RATIO 2.0".to_string()];
    let source = shaders::apply_defines(shaders::FILL_QUAD.vertex, &defines);

    assert!(source.starts_with("#define OVERLAY_QUAD\n#define DEVICE_PIXEL_RATIO 2.0\n"));
    assert!(source.ends_with(shaders::FILL_QUAD.vertex));

    // No defines leaves the source untouched.
    assert_eq!(shaders::apply_defines(shaders::FILL_QUAD.fragment, &[]), shaders::FILL_QUAD.fragment);
}
