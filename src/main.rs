// Museum walk demo: drives the navigation core from a winit window.
// Zones are drawn as instanced marker cubes (wall trim, doors, the gift),
// all in a single draw call; egui draws the HUD on top.

use std::sync::Arc;
use std::time::Instant;

use glam::{Vec2, Vec3};
use rand::Rng;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::{
    error::{EventLoopError, OsError},
    event::{ElementState, Event as WinitEvent, KeyEvent, MouseButton, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use museum_walk::engine::{
    ConfigurationError, DebugStats, FirstPersonCamera, Hud, HudView, NavigationEvent,
    NavigationSession, PoiId, PointOfInterest, SessionConfig, Transition, Zone, ZoneId,
};

const CONFIG_ENV_VAR: &str = "MUSEUM_CONFIG";

const LETTER: &str = "Two years of writing to each other, then of seeing each other,\n\
and every room of this museum is a piece of that.\n\
Thank you for walking through it with me.";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("failed to read config file: {0}")]
    ReadConfig(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigurationError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

// ============================================================================
// VERTEX DEFINITION
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
}

impl Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

// ============================================================================
// INSTANCE DATA (per marker cube)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    position: [f32; 3],
    scale: f32, // fills the 16-byte slot, uniform cube edge length
    color: [f32; 4],
}

impl InstanceData {
    fn new(position: Vec3, scale: f32, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            scale,
            color: [color[0], color[1], color[2], 1.0],
        }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Position + scale (location 1)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Color (location 2)
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

// Unit cube centered on the origin
const CUBE_VERTICES: &[Vertex] = &[
    Vertex { position: [-0.5, -0.5,  0.5] },
    Vertex { position: [ 0.5, -0.5,  0.5] },
    Vertex { position: [ 0.5,  0.5,  0.5] },
    Vertex { position: [-0.5,  0.5,  0.5] },
    Vertex { position: [-0.5, -0.5, -0.5] },
    Vertex { position: [ 0.5, -0.5, -0.5] },
    Vertex { position: [ 0.5,  0.5, -0.5] },
    Vertex { position: [-0.5,  0.5, -0.5] },
];

const CUBE_INDICES: &[u16] = &[
    0, 1, 2,  0, 2, 3,  // Front
    5, 4, 7,  5, 7, 6,  // Back
    4, 0, 3,  4, 3, 7,  // Left
    1, 5, 6,  1, 6, 2,  // Right
    3, 2, 6,  3, 6, 7,  // Top
    4, 5, 1,  4, 1, 0,  // Bottom
];

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// ============================================================================
// UNIFORM DATA (camera only)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

// ============================================================================
// ZONE MARKERS
// ============================================================================

const WALL_COLOR: [f32; 3] = [0.94, 0.96, 0.97];
const TRIM_COLOR: [f32; 3] = [0.83, 0.69, 0.22];
const STAR_COLOR: [f32; 3] = [1.0, 1.0, 0.9];
const GIFT_COLOR: [f32; 3] = [1.0, 0.08, 0.58];
const CEILING_HEIGHT: f32 = 3.5;

fn door_color(transition: Transition) -> [f32; 3] {
    match transition {
        Transition::EnterZone(ZoneId::Origins) => [1.0, 0.42, 0.62],
        Transition::EnterZone(ZoneId::Travels) => [0.31, 0.80, 0.77],
        Transition::EnterZone(_) => [1.0, 0.08, 0.58],
        Transition::ExitToParent => [0.83, 0.64, 0.45],
        Transition::RevealContent => GIFT_COLOR,
    }
}

fn highlight(color: [f32; 3]) -> [f32; 3] {
    color.map(|c| c + (1.0 - c) * 0.5)
}

/// Room title for a door, `None` for exits and the gift.
fn door_title(poi: &PointOfInterest) -> Option<&'static str> {
    match poi.transition {
        Transition::EnterZone(zone) => Some(zone.title()),
        _ => None,
    }
}

/// Marker cubes outlining a zone: floor and ceiling trim along the walls,
/// a pillar per point of interest (brighter for the hovered door), the
/// exclusion prop, and a starfield in the origins room.
fn zone_instances(zone: &Zone, hovered: Option<&PoiId>) -> Vec<InstanceData> {
    let b = &zone.boundary;
    let mut out = Vec::new();

    let mut trim = |from: Vec2, to: Vec2| {
        let steps = from.distance(to).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            out.push(InstanceData::new(Vec3::new(p.x, 0.1, p.y), 0.2, TRIM_COLOR));
            out.push(InstanceData::new(Vec3::new(p.x, CEILING_HEIGHT - 0.1, p.y), 0.2, WALL_COLOR));
        }
    };
    let corners = [
        Vec2::new(b.x_min, b.z_min),
        Vec2::new(b.x_max, b.z_min),
        Vec2::new(b.x_max, b.z_max),
        Vec2::new(b.x_min, b.z_max),
    ];
    for i in 0..corners.len() {
        trim(corners[i], corners[(i + 1) % corners.len()]);
    }

    for poi in &zone.pois {
        let mut color = door_color(poi.transition);
        if hovered == Some(&poi.id) {
            color = highlight(color);
        }
        for level in 0..5 {
            let y = 0.25 + level as f32 * 0.5;
            out.push(InstanceData::new(Vec3::new(poi.position.x, y, poi.position.y), 0.45, color));
        }
    }

    if let Some(ex) = b.exclusion {
        let size = ex.radius * 1.2;
        out.push(InstanceData::new(Vec3::new(ex.center.x, size * 0.5, ex.center.y), size, GIFT_COLOR));
    }

    if zone.id == ZoneId::Origins {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let p = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            );
            out.push(InstanceData::new(p, rng.gen_range(0.05..0.2), STAR_COLOR));
        }
    }

    out
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    depth_view: wgpu::TextureView,
    num_indices: u32,
    num_instances: u32,
    max_instances: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    hud: Hud,

    session_config: SessionConfig,
    session: NavigationSession,
    camera: FirstPersonCamera,
    started: Instant,
    shown_zone: Option<ZoneId>,
    shown_hover: Option<PoiId>,
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

impl State {
    async fn new(window: Arc<Window>, session_config: SessionConfig) -> Result<Self, AppError> {
        let session = NavigationSession::new(&session_config)?;

        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(AppError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader_instanced.wgsl").into()),
        });

        let uniforms = Uniforms {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), InstanceData::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Large enough for the corridor's trim plus the starfield
        let max_instances = 4096;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (max_instances * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let hud = Hud::new(&window, &device, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            depth_view,
            num_indices: CUBE_INDICES.len() as u32,
            num_instances: 0,
            max_instances,
            uniform_buffer,
            uniform_bind_group,
            hud,
            session_config,
            session,
            camera: FirstPersonCamera::new(),
            started: Instant::now(),
            shown_zone: None,
            shown_hover: None,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// One navigation step per rendered frame.
    fn update(&mut self, window: &Window) {
        let now = self.now_ms();
        self.session.frame(now);

        for event in self.session.drain_events() {
            log::info!("navigation event: {:?}", event);
            if event == NavigationEvent::RevealContent {
                release_cursor(window);
            }
        }

        // Re-upload markers when the zone or the hovered door changes
        let zone_id = self.session.active_zone().map(|z| z.id);
        let hover = self.session.hovered_door().map(|d| d.id.clone());
        if zone_id != self.shown_zone || hover != self.shown_hover {
            self.shown_zone = zone_id;
            self.shown_hover = hover;
            let instances = self
                .session
                .active_zone()
                .map(|zone| zone_instances(zone, self.shown_hover.as_ref()))
                .unwrap_or_default();
            let count = instances.len().min(self.max_instances);
            if count < instances.len() {
                log::warn!("{} marker cubes dropped", instances.len() - count);
            }
            if count > 0 {
                self.queue.write_buffer(
                    &self.instance_buffer,
                    0,
                    bytemuck::cast_slice(&instances[..count]),
                );
            }
            self.num_instances = count as u32;
        }
    }

    fn render(&mut self, window: &Window, stats: Option<&DebugStats>) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.size.width as f32 / self.size.height.max(1) as f32;
        let uniforms = Uniforms {
            view_proj: self
                .camera
                .view_projection(self.session.pose(), aspect)
                .to_cols_array_2d(),
        };
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.94,
                            g: 0.96,
                            b: 0.97,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if self.num_instances > 0 {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..self.num_indices, 0, 0..self.num_instances);
            }
        }

        let now = self.now_ms();
        let hud_view = HudView {
            zone_title: self.session.active_zone().map(|z| z.id.title()),
            dwell: self.session.dwell_status(now),
            pointer_captured: self.session.input().pointer_captured(),
            hovered_door: self
                .session
                .hovered_door()
                .filter(|_| self.session.input().pointer_captured())
                .and_then(door_title),
            letter: self.session.state().is_terminal().then_some(LETTER),
        };
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        let response = self.hud.render(
            &self.device,
            &self.queue,
            &mut encoder,
            window,
            &view,
            &screen_descriptor,
            &hud_view,
            stats,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if response.restart {
            self.restart();
        }

        Ok(())
    }

    /// Start the walk over from the corridor spawn.
    fn restart(&mut self) {
        match NavigationSession::new(&self.session_config) {
            Ok(session) => {
                log::info!("restarting the walk");
                self.session = session;
                self.shown_zone = None;
                self.shown_hover = None;
            }
            Err(e) => log::error!("failed to restart: {}", e),
        }
    }
}

// ============================================================================
// POINTER CAPTURE
// ============================================================================

fn grab_cursor(window: &Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        .is_ok();
    window.set_cursor_visible(!grabbed);
    grabbed
}

fn release_cursor(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        log::warn!("failed to release cursor: {}", e);
    }
    window.set_cursor_visible(true);
}

// ============================================================================
// MAIN
// ============================================================================

fn load_config() -> Result<SessionConfig, AppError> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) => {
            log::info!("loading zones from {}", path);
            let text = std::fs::read_to_string(path)?;
            Ok(SessionConfig::from_json_str(&text)?)
        }
        Err(_) => Ok(SessionConfig::default()),
    }
}

fn run() -> Result<(), AppError> {
    let session_config = load_config()?;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;

    let window_attributes = Window::default_attributes()
        .with_title("Museum Walk")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .map_err(AppError::CreateWindow)?,
    );

    let mut state = pollster::block_on(State::new(window.clone(), session_config))?;
    let mut frame_count = 0;
    let mut frame_time_total = 0.0;
    let mut last_fps_update = Instant::now();
    let mut last_frame = Instant::now();
    let mut stats = DebugStats {
        fps: 0,
        frame_time_avg_ms: 0.0,
        resolution: (state.size.width, state.size.height),
        pose: *state.session.pose(),
        frames: 0,
    };

    event_loop
        .run(move |event, control_flow| match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let _ = state.hud.handle_window_event(&window, event);
                let was_captured = state.session.input().pointer_captured();

                match event {
                    WindowEvent::CloseRequested => control_flow.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                ..
                            },
                        ..
                    } => {
                        if was_captured {
                            release_cursor(&window);
                            state.session.set_pointer_captured(false);
                        } else {
                            control_flow.exit();
                        }
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::F3),
                                ..
                            },
                        ..
                    } => state.hud.toggle_stats(),
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } if was_captured => {
                        state.session.click();
                    }
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        state.update(&window);

                        stats.pose = *state.session.pose();
                        stats.frames = state.session.frames();
                        stats.resolution = (state.size.width, state.size.height);
                        let shown = state.hud.stats_visible.then_some(&stats);
                        match state.render(&window, shown) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => control_flow.exit(),
                            Err(e) => log::warn!("{:?}", e),
                        }

                        let now = Instant::now();
                        frame_time_total += (now - last_frame).as_secs_f32() * 1000.0;
                        last_frame = now;
                        frame_count += 1;
                        if (now - last_fps_update).as_secs_f32() >= 1.0 {
                            stats.fps = frame_count;
                            stats.frame_time_avg_ms = frame_time_total / frame_count.max(1) as f32;
                            log::debug!("FPS: {} | Zone: {:?}", frame_count, state.session.state());
                            frame_count = 0;
                            frame_time_total = 0.0;
                            last_fps_update = now;
                        }
                    }
                    _ => {}
                }

                state.session.handle_window_event(event);
                if state.session.take_capture_request() {
                    let grabbed = grab_cursor(&window);
                    state.session.set_pointer_captured(grabbed);
                }
            }
            WinitEvent::DeviceEvent { ref event, .. } => {
                state.session.handle_device_event(event);
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
