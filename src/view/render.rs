use glam::{Mat4, Vec3};

use crate::config::LightingConfig;
use crate::model::{CameraFrame, PickupSet, Player};
use crate::utils::Vertex;
use crate::view::resources::{MeshKind, ResourceCache, TextureHandle};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
    pub view_pos: [f32; 4],
}

impl FrameUniform {
    pub fn new(camera: &CameraFrame, lighting: &LightingConfig) -> Self {
        Self {
            view: camera.view.to_cols_array_2d(),
            proj: camera.proj.to_cols_array_2d(),
            light_dir: lighting.direction.extend(0.0).to_array(),
            light_color: lighting.color.extend(1.0).to_array(),
            view_pos: camera.eye.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// rgb = tint, w = texture coordinate scale
    pub tint_tiling: [f32; 4],
}

/// How a draw is textured. Every kind goes through the same pipeline; only
/// the bound texture, tint and tiling differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMaterial {
    /// Texture repeated `tiling` times across the mesh, no tint.
    Tiled { texture: TextureHandle, tiling: f32 },
    /// Single texture used as-is, multiplied by `tint`.
    Overridden { texture: TextureHandle, tint: Vec3 },
}

impl DrawMaterial {
    pub fn texture(&self) -> TextureHandle {
        match *self {
            DrawMaterial::Tiled { texture, .. } | DrawMaterial::Overridden { texture, .. } => texture,
        }
    }

    pub fn tint(&self) -> Vec3 {
        match *self {
            DrawMaterial::Tiled { .. } => Vec3::ONE,
            DrawMaterial::Overridden { tint, .. } => tint,
        }
    }

    pub fn tiling(&self) -> f32 {
        match *self {
            DrawMaterial::Tiled { tiling, .. } => tiling,
            DrawMaterial::Overridden { .. } => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshKind,
    pub material: DrawMaterial,
    pub model: Mat4,
}

impl DrawCommand {
    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform {
            model: self.model.to_cols_array_2d(),
            tint_tiling: self.material.tint().extend(self.material.tiling()).to_array(),
        }
    }
}

/// Texture handles the scene draws with.
#[derive(Debug, Clone, Copy)]
pub struct SceneTextures {
    pub ground: TextureHandle,
    pub player: TextureHandle,
    pub white: TextureHandle,
}

/// Ground, then player, then every active pickup, in that order.
pub fn build_draw_list(
    player: &Player,
    pickups: &PickupSet,
    textures: &SceneTextures,
    ground_tiling: f32,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(2 + pickups.len());

    commands.push(DrawCommand {
        mesh: MeshKind::Ground,
        material: DrawMaterial::Tiled { texture: textures.ground, tiling: ground_tiling },
        model: Mat4::IDENTITY,
    });

    commands.push(DrawCommand {
        mesh: MeshKind::Player,
        material: DrawMaterial::Overridden { texture: textures.player, tint: Vec3::ONE },
        model: Mat4::from_translation(player.position)
            * Mat4::from_rotation_y(player.yaw_deg.to_radians())
            * Mat4::from_scale(Vec3::splat(player.visual_scale)),
    });

    for pickup in pickups.active() {
        commands.push(DrawCommand {
            mesh: MeshKind::Sphere,
            material: DrawMaterial::Overridden { texture: textures.white, tint: pickup.tint },
            model: Mat4::from_translation(pickup.position) * Mat4::from_scale(Vec3::splat(pickup.radius)),
        });
    }

    commands
}

/// Round `size` up to the dynamic-offset alignment.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FrameRenderer::DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages, has_dynamic_offset: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Per-object uniform slots, one aligned slot per draw.
struct ObjectSlots {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
}

impl ObjectSlots {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, stride: u64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });
        Self { buffer, bind_group, capacity }
    }
}

/// Owns the single scene pipeline and the uniform buffers it reads.
pub struct FrameRenderer {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    objects: ObjectSlots,
    object_stride: u64,
    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl FrameRenderer {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        texture_layout: &wgpu::BindGroupLayout,
        object_capacity: usize,
        clear_color: [f64; 3],
    ) -> Self {
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT, false)],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: frame_buffer.as_entire_binding() }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT, true)],
        });
        let object_stride = aligned_stride(
            std::mem::size_of::<ObjectUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let objects = ObjectSlots::new(device, &object_layout, object_stride, object_capacity);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // imported models come with either winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Self::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            multiview: None,
            cache: None,
        });

        let (depth_texture, depth_view) = create_depth_texture(device, width.max(1), height.max(1));
        let [r, g, b] = clear_color;

        Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            object_layout,
            objects,
            object_stride,
            _depth_texture: depth_texture,
            depth_view,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    fn write_objects(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, commands: &[DrawCommand]) {
        if commands.len() > self.objects.capacity {
            self.objects = ObjectSlots::new(device, &self.object_layout, self.object_stride, commands.len());
        }
        let stride = self.object_stride as usize;
        let mut bytes = vec![0u8; stride * commands.len()];
        for (i, command) in commands.iter().enumerate() {
            let uniform = command.uniform();
            let src = bytemuck::bytes_of(&uniform);
            bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
        }
        queue.write_buffer(&self.objects.buffer, 0, &bytes);
    }

    /// Record and submit one frame into `target`. Presenting is left to the
    /// caller.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &FrameUniform,
        commands: &[DrawCommand],
        resources: &ResourceCache,
    ) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(frame));
        self.write_objects(device, queue, commands);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &self.frame_bind_group, &[]);

            for (i, command) in commands.iter().enumerate() {
                let offset = (i as u64 * self.object_stride) as u32;
                rp.set_bind_group(1, &self.objects.bind_group, &[offset]);
                resources.bind_texture(&mut rp, 2, command.material.texture());
                resources.mesh(command.mesh).draw(&mut rp);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}
