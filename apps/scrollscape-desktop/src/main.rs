use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use scrollscape_assets::EnvironmentMap;
use scrollscape_common::{Pointer, Rgba};
use scrollscape_input::{ScrollInput, ScrollState, Viewport};
use scrollscape_kernel::{FrameInput, FrameStats, Scene, SceneClock, SceneConfig};
use scrollscape_render_wgpu::{SceneCamera, WgpuRenderer};
use scrollscape_tools::{DebugParams, FrameTimer, SceneInspector};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "scrollscape-desktop", about = "Scroll-driven 3D scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log filter, e.g. `scrollscape_kernel=trace` (overrides --verbose)
    #[arg(long)]
    log_level: Option<String>,

    /// Scene configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the six environment faces (px, nx, py, ny, pz, nz)
    #[arg(long)]
    env_dir: Option<PathBuf>,

    /// File suffix of the environment faces
    #[arg(long, default_value = ".jpg")]
    env_format: String,

    /// Initial material color, `#rrggbb`
    #[arg(long)]
    material_color: Option<String>,

    /// Start with the debug panel hidden
    #[arg(long)]
    no_debug: bool,
}

/// Logical pixels scrolled per wheel notch or arrow key.
const LINE_HEIGHT: f32 = 100.0;

enum KeyAction {
    Scroll(ScrollInput),
    TogglePanel,
    Exit,
}

fn key_action(key: KeyCode) -> Option<KeyAction> {
    let action = match key {
        KeyCode::PageDown | KeyCode::Space => KeyAction::Scroll(ScrollInput::PageDown),
        KeyCode::PageUp => KeyAction::Scroll(ScrollInput::PageUp),
        KeyCode::Home => KeyAction::Scroll(ScrollInput::Home),
        KeyCode::End => KeyAction::Scroll(ScrollInput::End),
        KeyCode::ArrowDown => KeyAction::Scroll(ScrollInput::Lines(-1.0)),
        KeyCode::ArrowUp => KeyAction::Scroll(ScrollInput::Lines(1.0)),
        KeyCode::F1 => KeyAction::TogglePanel,
        KeyCode::Escape => KeyAction::Exit,
        _ => return None,
    };
    Some(action)
}

/// Everything that is not GPU state.
struct AppState {
    scene: Scene,
    viewport: Viewport,
    scroll: ScrollState,
    pointer: Pointer,
    clock: SceneClock,
    camera: SceneCamera,
    params: DebugParams,
    timer: FrameTimer,
    last_frame: Instant,
    stats: FrameStats,
}

impl AppState {
    fn new(config: &SceneConfig, show_panel: bool) -> Self {
        let scene = Scene::new(config);
        let viewport = Viewport {
            max_pixel_ratio: config.max_pixel_ratio,
            ..Viewport::default()
        };
        let camera = SceneCamera::from_rig(scene.rig(), viewport.aspect());
        let mut params = DebugParams::from_config(config);
        params.show_panel = show_panel;
        Self {
            scene,
            viewport,
            scroll: ScrollState::new(LINE_HEIGHT),
            pointer: Pointer::default(),
            clock: SceneClock::start(config.motion.max_frame_delta),
            camera,
            params,
            timer: FrameTimer::new(120),
            last_frame: Instant::now(),
            stats: FrameStats::default(),
        }
    }

    fn sections(&self) -> u32 {
        self.scene.config().section_count
    }

    /// Adopt a new physical window size and scale factor.
    fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        self.viewport = Viewport::from_physical(
            width,
            height,
            scale_factor,
            self.scene.config().max_pixel_ratio,
        );
        self.scroll.clamp_to(&self.viewport, self.sections());
        self.camera.aspect = self.viewport.aspect();
        tracing::debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            pixel_ratio = self.viewport.pixel_ratio(),
            "resized"
        );
    }

    fn scroll(&mut self, input: ScrollInput) {
        let sections = self.sections();
        self.scroll.apply(input, &self.viewport, sections);
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key_action(key) {
            Some(KeyAction::Scroll(input)) => self.scroll(input),
            Some(KeyAction::TogglePanel) => {
                self.params.toggle_panel();
            }
            Some(KeyAction::Exit) => return true,
            None => {}
        }
        false
    }

    /// Advance the clock and animate one frame. The timer gets the wall
    /// time since the previous redraw, not the clamped animation delta.
    fn frame(&mut self, now: Instant) {
        self.timer.record(now.saturating_duration_since(self.last_frame));
        self.last_frame = now;
        let time = self.clock.tick();
        self.stats = self.scene.animate(&FrameInput {
            elapsed: time.elapsed,
            delta: time.delta,
            scroll_y: self.scroll.offset(),
            viewport_height: self.viewport.height,
            pointer: self.pointer,
        });
        self.camera = SceneCamera::from_rig(self.scene.rig(), self.viewport.aspect());
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.params.show_panel {
            return;
        }

        let summary = SceneInspector::summary(&self.scene, &self.stats);

        egui::SidePanel::right("debug")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Scrollscape");
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("materialColor");
                    let mut rgb = self.params.tint().to_rgb8();
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        let c = |v: u8| v as f32 / 255.0;
                        self.params.set_tint(Rgba::rgb(c(rgb[0]), c(rgb[1]), c(rgb[2])));
                    }
                    ui.monospace(self.params.material_color.as_str());
                });
                ui.separator();

                ui.label(format!(
                    "Scroll: {:.0}px ({:.0}%)",
                    self.scroll.offset(),
                    summary.scroll_progress * 100.0
                ));
                ui.label(format!(
                    "Pointer: ({:.2}, {:.2})",
                    self.pointer.x, self.pointer.y
                ));
                let [x, y, z] = summary.camera_world;
                ui.label(format!("Camera: ({x:.2}, {y:.2}, {z:.2})"));
                ui.label(format!("Spin: {:.3} rad", summary.spin));
                ui.separator();

                ui.heading("Sections");
                let focused = SceneInspector::focused_section(&self.scene);
                for (i, section) in summary.sections.iter().enumerate() {
                    let [x, y, _] = section.position;
                    ui.selectable_label(
                        focused == Some(i),
                        format!("{} x={x:.2} y={y:.2}", section.name),
                    );
                }
                ui.label(format!("Particles: {}", summary.particle_count));
                ui.separator();

                ui.label(format!(
                    "Frame: {:.1} ms ({:.0} fps)",
                    self.timer.average().as_secs_f32() * 1000.0,
                    self.timer.fps()
                ));
                ui.small("F1: Toggle Panel | Wheel/PgUp/PgDn: Scroll | Esc: Quit");
            });
    }
}

/// Window plus every GPU resource. Created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        egui_ctx: &EguiContext,
        state: &mut AppState,
        environment: &EnvironmentMap,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Scrollscape")
            .with_inner_size(LogicalSize::new(
                state.viewport.width as f64,
                state.viewport.height as f64,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("scrollscape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        state.resize(size.width, size.height, window.scale_factor());
        let (width, height) = state.viewport.render_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            width,
            height,
            &state.scene,
            environment,
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            width,
            height,
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    /// Reconfigure the surface for the viewport's capped render size.
    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.render_size();
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.renderer.resize(&self.device, width, height);
    }

    fn redraw(&mut self, egui_ctx: &EguiContext, state: &mut AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.scene,
            &state.camera,
            state.params.tint(),
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        // The surface may be smaller than the window when the pixel ratio is capped.
        let pixels_per_point = state.viewport.pixel_ratio();
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct GpuApp {
    state: AppState,
    environment: EnvironmentMap,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState, environment: EnvironmentMap) -> Self {
        Self {
            state,
            environment,
            gpu: None,
            egui_ctx: EguiContext::default(),
            init_error: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx, &mut self.state, &self.environment) {
            Ok(gpu) => {
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("GPU setup failed: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.state
                    .resize(new_size.width, new_size.height, gpu.window.scale_factor());
                gpu.resize(&self.state.viewport);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = gpu.window.inner_size();
                self.state.resize(size.width, size.height, scale_factor);
                gpu.resize(&self.state.viewport);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.pointer = self.state.viewport.pointer_at_physical(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let input = match delta {
                    MouseScrollDelta::LineDelta(_, y) => ScrollInput::Lines(y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        ScrollInput::Pixels((pos.y / gpu.window.scale_factor()) as f32)
                    }
                };
                self.state.scroll(input);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key) {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                self.state.frame(Instant::now());
                gpu.redraw(&self.egui_ctx, &mut self.state);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_config(cli: &Cli) -> Result<SceneConfig> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(color) = &cli.material_color {
        config.material_color = color.clone();
    }
    config.validate().context("invalid scene configuration")?;
    Ok(config)
}

fn load_environment(cli: &Cli) -> EnvironmentMap {
    let Some(dir) = &cli.env_dir else {
        return EnvironmentMap::default();
    };
    match EnvironmentMap::load_dir(dir, &cli.env_format) {
        Ok(env) => {
            tracing::info!(dir = %dir.display(), size = env.face_size, "environment loaded");
            env
        }
        Err(e) => {
            tracing::warn!("environment not loaded, using gradient: {e}");
            EnvironmentMap::default()
        }
    }
}

/// `--log-level` wins, then `RUST_LOG`, then `--verbose`.
fn log_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" })),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.log_level.as_deref()))
        .init();

    tracing::info!("scrollscape-desktop starting");

    let config = load_config(&cli)?;
    let environment = load_environment(&cli);
    let state = AppState::new(&config, !cli.no_debug);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, environment);
    event_loop.run_app(&mut app)?;

    match app.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state() -> AppState {
        let mut state = AppState::new(&SceneConfig::default(), true);
        state.resize(1000, 800, 1.0);
        state
    }

    #[test]
    fn page_keys_scroll_one_viewport() {
        let mut state = state();
        state.handle_key(KeyCode::PageDown);
        assert_eq!(state.scroll.offset(), 800.0);
        state.handle_key(KeyCode::End);
        assert_eq!(state.scroll.offset(), 1600.0);
        state.handle_key(KeyCode::PageUp);
        assert_eq!(state.scroll.offset(), 800.0);
        state.handle_key(KeyCode::Home);
        assert_eq!(state.scroll.offset(), 0.0);
    }

    #[test]
    fn escape_exits_and_f1_toggles() {
        let mut state = state();
        assert!(state.handle_key(KeyCode::Escape));
        assert!(!state.handle_key(KeyCode::F1));
        assert!(!state.params.show_panel);
        assert!(!state.handle_key(KeyCode::KeyQ));
    }

    #[test]
    fn shrinking_window_reclamps_scroll() {
        let mut state = state();
        state.handle_key(KeyCode::End);
        state.resize(1000, 400, 1.0);
        assert_eq!(state.scroll.offset(), 800.0);
        assert!((state.camera.aspect - 2.5).abs() < 1e-6);
    }

    #[test]
    fn frame_timer_sees_stalls_longer_than_the_delta_cap() {
        let mut state = state();
        let start = Instant::now();
        state.last_frame = start;
        state.frame(start + Duration::from_millis(250));
        assert_eq!(state.timer.max(), Duration::from_millis(250));
        assert!((state.timer.fps() - 4.0).abs() < 0.01);
    }

    #[test]
    fn wheel_lines_use_line_height() {
        let mut state = state();
        state.scroll(ScrollInput::Lines(-2.0));
        assert_eq!(state.scroll.offset(), 2.0 * LINE_HEIGHT);
    }

    #[test]
    fn explicit_log_level_wins() {
        let filter = log_filter(true, Some("scrollscape_kernel=trace"));
        assert_eq!(filter.to_string(), "scrollscape_kernel=trace");
    }

    #[test]
    fn hidpi_caps_render_size() {
        let mut state = state();
        state.resize(3000, 2400, 3.0);
        assert_eq!(state.viewport.height, 800.0);
        assert_eq!(state.viewport.render_size(), (2000, 1600));
    }
}
