use std::mem::offset_of;

use bytemuck::{NoUninit, bytes_of, cast_slice};
use glam::{Mat4, Vec2, Vec3, vec2, vec3};
use image::EncodableLayout;
use lib_app::AppContext;
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, CompareFunction, DepthBiasState, DepthStencilState, Device, Extent3d,
    FilterMode, FragmentState, FrontFace, IndexFormat, LoadOp, MipmapFilterMode, MultisampleState,
    Operations, Origin3d, PipelineCompilationOptions, PipelineLayoutDescriptor, PolygonMode,
    PrimitiveState, PrimitiveTopology, Queue, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, SamplerBindingType, SamplerDescriptor, ShaderModule, ShaderStages,
    StencilState, StoreOp, TexelCopyBufferLayout, TexelCopyTextureInfo, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType, TextureUsages,
    TextureView, TextureViewDescriptor, TextureViewDimension, VertexAttribute, VertexBufferLayout,
    VertexFormat, VertexState, VertexStepMode, include_wgsl,
    util::{BufferInitDescriptor, DeviceExt},
};

use crate::renderer::{
    CAMERA_DISTANCE, CLEAR_COLOR, DEPTH_FORMAT, FOV_DEGREES, GLYPH_CAP, LABEL_ORIGIN,
    LABEL_STRIDE, TEXT_SCALE, Z_FAR, Z_NEAR, cube,
    text::{self, GLYPH_SIZE, GlyphQuad},
};

/// Everything drawn in one frame: the cube's accumulated rotation plus the
/// overlay labels, stacked top to bottom at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub rot_x_deg: f32,
    pub rot_z_deg: f32,
    pub labels: Vec<String>,
}

#[derive(Debug)]
pub struct Renderer {
    face_vertex_buf: Buffer,
    face_index_buf: Buffer,
    face_index_count: u32,
    edge_vertex_buf: Buffer,
    edge_index_buf: Buffer,
    edge_index_count: u32,
    scene_uniform_buf: Buffer,
    scene_bind_group: BindGroup,
    face_pipeline: RenderPipeline,
    edge_pipeline: RenderPipeline,

    corner_buf: Buffer,
    quad_index_buf: Buffer,
    glyph_buf: Buffer,
    glyph_vec: Vec<GlyphQuad>,
    overlay_uniform_buf: Buffer,
    overlay_bind_group: BindGroup,
    overlay_pipeline: RenderPipeline,

    depth: Option<DepthTarget>,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub struct SceneVertex {
    pub position: Vec3,
    pub color: Vec3,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
struct SceneUniform {
    mvp: Mat4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
struct OverlayUniform {
    screen: Vec2,
    glyph: Vec2,
}

#[derive(Debug)]
struct DepthTarget {
    view: TextureView,
    size: (u32, u32),
}

impl Renderer {
    pub fn new(ctx: RenderContext<'_>) -> Self {
        let face_vertices = cube::face_vertices();
        let face_indices = cube::face_indices();
        let edge_vertices = cube::edge_vertices();
        let edge_indices = cube::edge_indices();

        let face_vertex_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer face vertex buffer"),
            contents: cast_slice(&face_vertices),
            usage: BufferUsages::VERTEX,
        });

        let face_index_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer face index buffer"),
            contents: cast_slice(&face_indices),
            usage: BufferUsages::INDEX,
        });

        let edge_vertex_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer edge vertex buffer"),
            contents: cast_slice(&edge_vertices),
            usage: BufferUsages::VERTEX,
        });

        let edge_index_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer edge index buffer"),
            contents: cast_slice(&edge_indices),
            usage: BufferUsages::INDEX,
        });

        let scene_uniform_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("renderer scene uniform buffer"),
            size: size_of::<SceneUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_shader = ctx.device.create_shader_module(include_wgsl!("scene.wgsl"));

        let scene_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&BindGroupLayoutDescriptor {
                    label: Some("renderer scene bind group layout"),
                    entries: &[BindGroupLayoutEntry {
                        binding: 0,
                        ty: BindingType::Buffer {
                            ty: BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                        visibility: ShaderStages::VERTEX,
                    }],
                });

        let scene_bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("renderer scene bind group"),
            layout: &scene_bind_group_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: scene_uniform_buf.as_entire_binding(),
            }],
        });

        let face_pipeline = scene_pipeline(
            "renderer face pipeline",
            &scene_shader,
            &scene_bind_group_layout,
            PrimitiveTopology::TriangleList,
            CompareFunction::Less,
            true,
            ctx,
        );

        // LessEqual so the wireframe wins depth ties against its own faces.
        let edge_pipeline = scene_pipeline(
            "renderer edge pipeline",
            &scene_shader,
            &scene_bind_group_layout,
            PrimitiveTopology::LineList,
            CompareFunction::LessEqual,
            false,
            ctx,
        );

        let corner_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer overlay corner buffer"),
            contents: bytes_of(&[
                vec2(0.0, 0.0),
                vec2(1.0, 0.0),
                vec2(1.0, 1.0),
                vec2(0.0, 1.0),
            ]),
            usage: BufferUsages::VERTEX,
        });

        let quad_index_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer overlay index buffer"),
            contents: cast_slice::<u16, u8>(&[0, 1, 2, 2, 3, 0]),
            usage: BufferUsages::INDEX,
        });

        let glyph_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("renderer glyph buffer"),
            size: (GLYPH_CAP * size_of::<GlyphQuad>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let overlay_uniform_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("renderer overlay uniform buffer"),
            size: size_of::<OverlayUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let atlas = {
            let image = text::atlas_image();

            let texture = ctx.device.create_texture(&TextureDescriptor {
                label: Some("renderer glyph atlas"),
                size: Extent3d {
                    width: image.width(),
                    height: image.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: TextureDimension::D2,
                format: TextureFormat::Rgba8UnormSrgb,
                usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
                view_formats: &[],
            });

            ctx.queue.write_texture(
                TexelCopyTextureInfo {
                    texture: &texture,
                    aspect: TextureAspect::All,
                    mip_level: 0,
                    origin: Origin3d::ZERO,
                },
                image.as_bytes(),
                TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(image.width() * 4),
                    rows_per_image: Some(image.height()),
                },
                texture.size(),
            );

            texture
        };

        let sampler = ctx.device.create_sampler(&SamplerDescriptor {
            label: Some("renderer overlay sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            anisotropy_clamp: 1,
            border_color: None,
            compare: None,
            lod_max_clamp: 1.0,
            lod_min_clamp: 1.0,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: MipmapFilterMode::Nearest,
        });

        let overlay_shader = ctx
            .device
            .create_shader_module(include_wgsl!("overlay.wgsl"));

        let overlay_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&BindGroupLayoutDescriptor {
                    label: Some("renderer overlay bind group layout"),
                    entries: &[
                        BindGroupLayoutEntry {
                            binding: 0,
                            ty: BindingType::Buffer {
                                ty: BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                            visibility: ShaderStages::VERTEX,
                        },
                        BindGroupLayoutEntry {
                            binding: 1,
                            ty: BindingType::Texture {
                                sample_type: TextureSampleType::Float { filterable: false },
                                view_dimension: TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                            visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                        },
                        BindGroupLayoutEntry {
                            binding: 2,
                            ty: BindingType::Sampler(SamplerBindingType::NonFiltering),
                            count: None,
                            visibility: ShaderStages::FRAGMENT,
                        },
                    ],
                });

        let overlay_bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("renderer overlay bind group"),
            layout: &overlay_bind_group_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: overlay_uniform_buf.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(
                        &atlas.create_view(&TextureViewDescriptor::default()),
                    ),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: BindingResource::Sampler(&sampler),
                },
            ],
        });

        let overlay_pipeline = ctx
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("renderer overlay pipeline"),
                cache: None,
                depth_stencil: Some(DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: CompareFunction::Always,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                layout: Some(
                    &ctx.device
                        .create_pipeline_layout(&PipelineLayoutDescriptor {
                            label: Some("renderer overlay pipeline layout"),
                            bind_group_layouts: &[&overlay_bind_group_layout],
                            immediate_size: 0,
                        }),
                ),
                multiview_mask: None,
                primitive: PrimitiveState {
                    front_face: FrontFace::Ccw,
                    conservative: false,
                    cull_mode: None,
                    polygon_mode: PolygonMode::Fill,
                    strip_index_format: None,
                    topology: PrimitiveTopology::TriangleList,
                    unclipped_depth: false,
                },
                vertex: VertexState {
                    module: &overlay_shader,
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                    buffers: &[CORNER_BUFFER_LAYOUT, GLYPH_BUFFER_LAYOUT],
                },
                fragment: Some(FragmentState {
                    module: &overlay_shader,
                    targets: &[Some(ColorTargetState {
                        blend: Some(BlendState::ALPHA_BLENDING),
                        format: ctx.surface_format,
                        write_mask: ColorWrites::all(),
                    })],
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                multisample: MultisampleState::default(),
            });

        Self {
            face_vertex_buf,
            face_index_buf,
            face_index_count: face_indices.len() as u32,
            edge_vertex_buf,
            edge_index_buf,
            edge_index_count: edge_indices.len() as u32,
            scene_uniform_buf,
            scene_bind_group,
            face_pipeline,
            edge_pipeline,
            corner_buf,
            quad_index_buf,
            glyph_buf,
            glyph_vec: Vec::with_capacity(GLYPH_CAP),
            overlay_uniform_buf,
            overlay_bind_group,
            overlay_pipeline,
            depth: None,
        }
    }

    pub fn draw(&mut self, scene: &Scene, output: &TextureView, ctx: RenderContext<'_>) {
        let width = output.texture().width();
        let height = output.texture().height();

        let aspect = width as f32 / height as f32;
        let projection = Mat4::perspective_rh(FOV_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR);
        let view = Mat4::from_translation(vec3(0.0, 0.0, -CAMERA_DISTANCE));
        let model = Mat4::from_rotation_x(scene.rot_x_deg.to_radians())
            * Mat4::from_rotation_z(scene.rot_z_deg.to_radians());

        let scene_uniform = SceneUniform {
            mvp: projection * view * model,
        };

        ctx.queue
            .write_buffer(&self.scene_uniform_buf, 0, bytes_of(&scene_uniform));

        let glyph_px = Vec2::splat(GLYPH_SIZE as f32 * TEXT_SCALE);
        let overlay_uniform = OverlayUniform {
            screen: vec2(width as f32, height as f32),
            glyph: glyph_px,
        };

        ctx.queue
            .write_buffer(&self.overlay_uniform_buf, 0, bytes_of(&overlay_uniform));

        self.glyph_vec.clear();
        for (row, label) in scene.labels.iter().enumerate() {
            text::layout(
                label,
                LABEL_ORIGIN + vec2(0.0, row as f32 * LABEL_STRIDE),
                glyph_px,
                &mut self.glyph_vec,
            );
        }
        self.glyph_vec.truncate(GLYPH_CAP);

        ctx.queue
            .write_buffer(&self.glyph_buf, 0, cast_slice(&self.glyph_vec));

        if self.depth.as_ref().map(|d| d.size) != Some((width, height)) {
            self.depth = Some(DepthTarget {
                view: ctx
                    .device
                    .create_texture(&TextureDescriptor {
                        label: Some("renderer depth texture"),
                        size: Extent3d {
                            width,
                            height,
                            depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: TextureDimension::D2,
                        format: DEPTH_FORMAT,
                        usage: TextureUsages::RENDER_ATTACHMENT,
                        view_formats: &[],
                    })
                    .create_view(&TextureViewDescriptor::default()),
                size: (width, height),
            });
        }

        let depth = self.depth.as_ref().expect("depth target ensured above");

        let mut encoder = ctx
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("renderer scene pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: output,
                ops: Operations {
                    load: LoadOp::Clear(CLEAR_COLOR),
                    store: StoreOp::Store,
                },
                depth_slice: None,
                resolve_target: None,
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.face_pipeline);
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        pass.set_vertex_buffer(0, self.face_vertex_buf.slice(..));
        pass.set_index_buffer(self.face_index_buf.slice(..), IndexFormat::Uint16);
        pass.draw_indexed(0..self.face_index_count, 0, 0..1);

        pass.set_pipeline(&self.edge_pipeline);
        pass.set_vertex_buffer(0, self.edge_vertex_buf.slice(..));
        pass.set_index_buffer(self.edge_index_buf.slice(..), IndexFormat::Uint16);
        pass.draw_indexed(0..self.edge_index_count, 0, 0..1);

        pass.set_pipeline(&self.overlay_pipeline);
        pass.set_bind_group(0, &self.overlay_bind_group, &[]);
        pass.set_vertex_buffer(0, self.corner_buf.slice(..));
        pass.set_vertex_buffer(1, self.glyph_buf.slice(..));
        pass.set_index_buffer(self.quad_index_buf.slice(..), IndexFormat::Uint16);
        pass.draw_indexed(0..6, 0, 0..self.glyph_vec.len() as u32);

        drop(pass);

        ctx.queue.submit([encoder.finish()]);
    }
}

fn scene_pipeline(
    label: &str,
    shader: &ShaderModule,
    bind_group_layout: &BindGroupLayout,
    topology: PrimitiveTopology,
    depth_compare: CompareFunction,
    depth_write_enabled: bool,
    ctx: RenderContext<'_>,
) -> RenderPipeline {
    ctx.device
        .create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(label),
            cache: None,
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            layout: Some(
                &ctx.device
                    .create_pipeline_layout(&PipelineLayoutDescriptor {
                        label: Some(label),
                        bind_group_layouts: &[bind_group_layout],
                        immediate_size: 0,
                    }),
            ),
            multiview_mask: None,
            primitive: PrimitiveState {
                front_face: FrontFace::Ccw,
                conservative: false,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                strip_index_format: None,
                topology,
                unclipped_depth: false,
            },
            vertex: VertexState {
                module: shader,
                entry_point: None,
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[SCENE_VERTEX_LAYOUT],
            },
            fragment: Some(FragmentState {
                module: shader,
                targets: &[Some(ColorTargetState {
                    blend: None,
                    format: ctx.surface_format,
                    write_mask: ColorWrites::all(),
                })],
                entry_point: None,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            multisample: MultisampleState::default(),
        })
}

impl<'a> From<AppContext<'a>> for RenderContext<'a> {
    fn from(value: AppContext<'a>) -> Self {
        Self {
            device: value.device,
            queue: value.queue,
            surface_format: value.surface_format,
        }
    }
}

const SCENE_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<SceneVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(SceneVertex, position) as u64,
            shader_location: 0,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(SceneVertex, color) as u64,
            shader_location: 1,
        },
    ],
};

const CORNER_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<Vec2>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    }],
};

const GLYPH_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<GlyphQuad>() as u64,
    step_mode: VertexStepMode::Instance,
    attributes: &[
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: offset_of!(GlyphQuad, origin) as u64,
            shader_location: 1,
        },
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: offset_of!(GlyphQuad, uv_min) as u64,
            shader_location: 2,
        },
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: offset_of!(GlyphQuad, uv_max) as u64,
            shader_location: 3,
        },
    ],
};
