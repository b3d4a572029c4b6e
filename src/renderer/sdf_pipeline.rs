//! SDF-based WebGPU render pipeline
//!
//! Renders the entire court in a fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::HOOP_COUNT;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, aim_preview};

/// Maximum number of particles the shader can draw
pub const MAX_PARTICLES: usize = 256;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct HoopData {
    rect: [f32; 4],  // x, y, width, height
    color: [f32; 4], // sRGB
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],        // offset 0 - physical pixels
    scale: f32,                  // offset 8 - physical pixels per play-area pixel
    time: f32,                   // offset 12
    ball: [f32; 4],              // offset 16 - x, y, radius, visible
    aim: [f32; 4],               // offset 32 - drag.x, drag.y, strength, active
    flags: [u32; 4],             // offset 48 - particle_count, shadow, net, aim_guide
    output: [u32; 4],            // offset 64 - srgb_surface, padding
    hoops: [HoopData; HOOP_COUNT], // offset 80
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ParticleData {
    pos: [f32; 2],
    life: f32,
    size: f32,
    color: [f32; 4],
}

/// Particle radius in play-area pixels
const PARTICLE_SIZE: f32 = 4.0;

// ============================================================================
// SDF RENDER STATE
// ============================================================================

/// Failure while setting up the GPU side of the renderer
#[derive(Debug)]
pub enum RenderInitError {
    Device(wgpu::RequestDeviceError),
    /// The surface reported no usable format or alpha mode
    UnsupportedSurface,
}

impl std::fmt::Display for RenderInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderInitError::Device(e) => write!(f, "failed to create device: {e}"),
            RenderInitError::UnsupportedSurface => {
                write!(f, "surface is not compatible with this adapter")
            }
        }
    }
}

impl std::error::Error for RenderInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderInitError::Device(e) => Some(e),
            RenderInitError::UnsupportedSurface => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for RenderInitError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderInitError::Device(e)
    }
}

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    particles_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    /// Physical pixels per play-area pixel (device pixel ratio)
    scale: f32,
    /// The surface encodes to sRGB on write
    srgb_surface: bool,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        scale: f32,
    ) -> Result<Self, RenderInitError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format =
            pick_surface_format(&surface_caps.formats).ok_or(RenderInitError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(RenderInitError::UnsupportedSurface)?;

        log::info!("Using surface format: {:?}", surface_format);

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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        // Create buffers
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Uniform rather than storage: WebGL2 has no storage buffers in fragment shaders
        let particles_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particles"),
            size: (std::mem::size_of::<ParticleData>() * MAX_PARTICLES) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: particles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let srgb_surface = config.format.is_srgb();
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            particles_buffer,
            bind_group,
            size: (width, height),
            scale,
            srgb_surface,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32, scale: f32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.scale = scale;
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Update GPU buffers from game state and render
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        let globals = build_globals(state, settings, self.size, self.scale, self.srgb_surface, time);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let particles_data = build_particles(state, settings);
        self.queue.write_buffer(
            &self.particles_buffer,
            0,
            bytemuck::cast_slice(&particles_data),
        );

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Prefer an sRGB format, otherwise whatever the surface lists first
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn build_globals(
    state: &GameState,
    settings: &Settings,
    size: (u32, u32),
    scale: f32,
    srgb_surface: bool,
    time: f64,
) -> Globals {
    // The ball only appears once a round has begun
    let ball_visible = state.phase != GamePhase::Start;
    let ball = &state.ball;

    let aim = match aim_preview(state) {
        Some(preview) if settings.aim_guide => [
            preview.drag.x as f32,
            preview.drag.y as f32,
            preview.strength as f32,
            1.0,
        ],
        _ => [0.0; 4],
    };

    let hoops = std::array::from_fn(|i| {
        let hoop = &state.hoops[i];
        HoopData {
            rect: [
                hoop.pos.x as f32,
                hoop.pos.y as f32,
                hoop.width as f32,
                hoop.height as f32,
            ],
            color: hoop.color.to_rgba_f32(1.0),
        }
    });

    let particle_count = if ball_visible {
        state.particles.len().min(settings.max_particles()).min(MAX_PARTICLES)
    } else {
        0
    };

    Globals {
        resolution: [size.0 as f32, size.1 as f32],
        scale,
        // time is ms since page load from requestAnimationFrame, convert to seconds
        time: (time / 1000.0) as f32,
        ball: [
            ball.pos.x as f32,
            ball.pos.y as f32,
            ball.radius as f32,
            if ball_visible { 1.0 } else { 0.0 },
        ],
        aim,
        flags: [
            particle_count as u32,
            settings.quality.shadow_enabled() as u32,
            settings.quality.net_enabled() as u32,
            settings.aim_guide as u32,
        ],
        output: [srgb_surface as u32, 0, 0, 0],
        hoops,
    }
}

fn build_particles(state: &GameState, settings: &Settings) -> Vec<ParticleData> {
    let mut data = vec![ParticleData::zeroed(); MAX_PARTICLES];
    let limit = settings.max_particles().min(MAX_PARTICLES);
    for (slot, particle) in data.iter_mut().zip(state.particles.iter().take(limit)) {
        *slot = ParticleData {
            pos: [particle.pos.x as f32, particle.pos.y as f32],
            life: particle.life.clamp(0.0, 1.0) as f32,
            size: PARTICLE_SIZE,
            color: particle.color.to_rgba_f32(1.0),
        };
    }
    data
}
