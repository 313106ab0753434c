//! SDF-based WebGPU render pipeline
//!
//! Raymarches the tower, ball and splat decals in the fragment shader from a
//! single uniform buffer; the only geometry is a fullscreen triangle.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::sim::{BallMotion, GamePhase, GameState};

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    time: f32,            // offset 8
    rotation: f32,        // offset 12
    section_count: u32,   // offset 16
    gap_index: u32,       // offset 20
    kill_mask: u32,       // offset 24 - bit i set when section i is a kill field
    ring_count: u32,      // offset 28
    ring_spacing: f32,    // offset 32
    ball_height: f32,     // offset 36
    ball_progress: f32,   // offset 40
    ball_falling: u32,    // offset 44
    phase: u32,           // offset 48 - 0 idle, 1 playing, 2 game over
    splat_count: u32,     // offset 52
    splat_tints: u32,     // offset 56 - bit i = palette index of splat i
    ambient: f32,         // offset 60
    background: [f32; 4], // offset 64 (16-byte aligned for WGSL vec4)
    // One vec4 per splat: surface height, ring-local angle, age ratio, spin
    splats: [[f32; 4]; MAX_SPLATS], // offset 80
}

// ============================================================================
// SCENE RENDER STATE
// ============================================================================

pub struct SceneRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

impl SceneRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("scene-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);
        log::info!("Surface alpha modes: {:?}", surface_caps.alpha_modes);
        log::info!("Surface present modes: {:?}", surface_caps.present_modes);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "Surface config: {}x{}, alpha: {:?}",
            width,
            height,
            config.alpha_mode
        );
        surface.configure(&device, &config);

        log::info!("Creating shader module...");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene_shader.wgsl").into()),
        });
        log::info!("Shader module created");

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
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

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Update the uniform buffer from game state and render one frame
    pub fn render(&mut self, state: &GameState, time: f64) -> Result<(), wgpu::SurfaceError> {
        // time is ms since page load from requestAnimationFrame
        let elapsed = ((time - self.start_time) / 1000.0) as f32;

        let mut kill_mask: u32 = 0;
        for &idx in &state.level.kill_indices {
            kill_mask |= 1 << idx;
        }

        let mut splats = [[0.0f32; 4]; MAX_SPLATS];
        let mut splat_tints: u32 = 0;
        for (i, splat) in state.splats.iter().take(MAX_SPLATS).enumerate() {
            let surface = state
                .tower
                .rings
                .get(splat.ring)
                .map(|ring| ring.surface())
                .unwrap_or(0.0);
            splats[i] = [surface, splat.angle, splat.age / SPLAT_LIFETIME, splat.spin];
            splat_tints |= (splat.tint & 1) << i;
        }

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            time: elapsed,
            rotation: state.tower.rotation,
            section_count: state.tower.section_count as u32,
            gap_index: state.level.gap_index as u32,
            kill_mask,
            ring_count: state.tower.rings.len() as u32,
            ring_spacing: state.level.ring_spacing,
            ball_height: state.ball.height,
            ball_progress: state.ball.progress,
            ball_falling: matches!(state.ball.motion, BallMotion::Falling { .. }) as u32,
            phase: match state.phase {
                GamePhase::NotPlaying => 0,
                GamePhase::Playing => 1,
                GamePhase::GameOver => 2,
            },
            splat_count: state.splats.len().min(MAX_SPLATS) as u32,
            splat_tints,
            ambient: state.level.ambient_intensity,
            background: [
                state.level.background[0],
                state.level.background[1],
                state.level.background[2],
                1.0,
            ],
            splats,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
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
