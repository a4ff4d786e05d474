use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use raycast_common::{CameraView, Rgba};
use raycast_render::{Frame, NormalColoring, Scene, Viewport};
use wgpu::util::DeviceExt;

/// Per-frame parameters for the ray casting shader. Every field is a
/// `vec4<f32>` so the layout matches WGSL uniform rules without padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    window: [f32; 4],
    position: [f32; 4],
    forward: [f32; 4],
    right: [f32; 4],
    up: [f32; 4],
    sphere: [f32; 4],
    cell_half_extents: [f32; 4],
    surface_color: [f32; 4],
    background_color: [f32; 4],
}

impl FrameUniforms {
    pub(crate) fn new(view: &CameraView, viewport: Viewport, scene: &Scene) -> Self {
        let coloring = match scene.normal_coloring {
            NormalColoring::Clamped => 0.0,
            NormalColoring::Biased => 1.0,
        };
        let v = |v: Vec3| v.extend(0.0).to_array();
        let c = |c: Rgba| c.to_vec4().to_array();
        Self {
            window: [
                viewport.width() as f32,
                viewport.height() as f32,
                viewport.aspect(),
                coloring,
            ],
            position: v(view.position),
            forward: v(view.forward),
            right: v(view.right),
            up: v(view.up),
            sphere: scene.sphere.center.extend(scene.sphere.radius).to_array(),
            cell_half_extents: v(scene.cell_half_extents),
            surface_color: c(scene.surface_color),
            background_color: c(scene.background_color),
        }
    }
}

/// Texture holding the latest CPU frame, recreated when the viewport changes.
struct BlitTarget {
    viewport: Viewport,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// wgpu presenter for both backends: the fragment-shader ray caster and the
/// blit of CPU-rendered frames.
pub struct WgpuRenderer {
    raycast_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    blit_pipeline: wgpu::RenderPipeline,
    blit_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    blit: Option<BlitTarget>,
    scene: Scene,
}

impl WgpuRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, scene: Scene) -> Self {
        // Uniform buffer
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform_buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_uniform_layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Ray casting pipeline
        let raycast_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("raycast_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::RAYCAST_SHADER.into()),
        });
        let raycast_pipeline = fullscreen_pipeline(
            device,
            "raycast_pipeline",
            &uniform_layout,
            &raycast_shader,
            "fs_raycast",
            surface_format,
        );

        // CPU frame blit pipeline
        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BLIT_SHADER.into()),
        });
        let blit_pipeline = fullscreen_pipeline(
            device,
            "blit_pipeline",
            &blit_layout,
            &blit_shader,
            "fs_blit",
            surface_format,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            raycast_pipeline,
            uniform_buffer,
            uniform_bind_group,
            blit_pipeline,
            blit_layout,
            sampler,
            blit: None,
            scene,
        }
    }

    /// Ray cast one frame on the GPU into `target`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        view: &CameraView,
        viewport: Viewport,
    ) {
        let uniforms = FrameUniforms::new(view, viewport, &self.scene);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.draw_fullscreen(
            device,
            queue,
            target,
            &self.raycast_pipeline,
            &self.uniform_bind_group,
            "raycast_pass",
        );
    }

    /// Upload a CPU-rendered frame and draw it over `target`.
    pub fn present_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &Frame,
    ) {
        let viewport = frame.viewport();
        if self.blit.as_ref().map(|b| b.viewport) != Some(viewport) {
            self.blit = Some(self.create_blit_target(device, viewport));
            tracing::debug!(
                width = viewport.width(),
                height = viewport.height(),
                "recreated blit texture"
            );
        }
        let Some(blit) = &self.blit else {
            return;
        };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &blit.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * viewport.width()),
                rows_per_image: Some(viewport.height()),
            },
            extent(viewport),
        );

        self.draw_fullscreen(
            device,
            queue,
            target,
            &self.blit_pipeline,
            &blit.bind_group,
            "blit_pass",
        );
    }

    fn create_blit_target(&self, device: &wgpu::Device, viewport: Viewport) -> BlitTarget {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cpu_frame_texture"),
            size: extent(viewport),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Linear, like the shader output, so both backends encode alike.
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let texture_view = texture.create_view(&Default::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit_bind_group"),
            layout: &self.blit_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        BlitTarget {
            viewport,
            texture,
            bind_group,
        }
    }

    fn draw_fullscreen(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
        label: &str,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            // One oversized triangle covers the viewport.
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn extent(viewport: Viewport) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: viewport.width(),
        height: viewport.height(),
        depth_or_array_layers: 1,
    }
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}
