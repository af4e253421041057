use fnv::FnvHashMap;
use web_sys as web;

use crosscut_core::geometry::{self, MeshData, Vertex};
use crosscut_core::passes::{
    self, CullMode, DepthFunc, DrawOp, GeometrySlot, RenderState, ShaderKind, StencilFaceOps,
    StencilFunc, StencilOp, UniformSlot,
};
use crosscut_core::uniforms::{ClipUniforms, FrameMatrices, LitUniforms, UnlitUniforms};
use crosscut_core::{
    ObjectKind, CLEAR_COLOR, EDGE_COLOR, OBJECT_COLOR, OBJECT_LENGTH, PLANE_COLOR, PLANE_EXTENT,
    SECTION_COLOR,
};

use wgpu::util::DeviceExt;

const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// GPU-resident mesh: a vertex buffer, an optional index buffer, and the
/// element count. The renderer never touches the CPU-side data again.
pub struct GeometryBuffers {
    vertex: wgpu::Buffer,
    index: Option<wgpu::Buffer>,
    elements: u32,
    vertex_count: u32,
}

impl GeometryBuffers {
    fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = mesh.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertex,
            index,
            elements: mesh.element_count(),
            vertex_count: mesh.vertices.len() as u32,
        }
    }
}

struct ObjectBuffers {
    solid: GeometryBuffers,
    edge: GeometryBuffers,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    // One immutable pipeline per draw op, in frame order.
    pipelines: Vec<(DrawOp, wgpu::RenderPipeline)>,

    object_ub: wgpu::Buffer,
    edge_ub: wgpu::Buffer,
    plane_ub: wgpu::Buffer,
    section_ub: wgpu::Buffer,
    clipped_ub: wgpu::Buffer,
    lit_bg: wgpu::BindGroup,
    edge_bg: wgpu::BindGroup,
    plane_bg: wgpu::BindGroup,
    section_bg: wgpu::BindGroup,
    clipped_bg: wgpu::BindGroup,

    meshes: FnvHashMap<ObjectKind, ObjectBuffers>,
    plane_geom: GeometryBuffers,

    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, width, height);

        // All geometry is uploaded up front; the frame loop only swaps which
        // buffers the solid/edge slots point at.
        let mut meshes = FnvHashMap::default();
        for kind in ObjectKind::ALL {
            meshes.insert(
                kind,
                ObjectBuffers {
                    solid: GeometryBuffers::upload(
                        &device,
                        kind.id(),
                        &geometry::solid_mesh(kind, OBJECT_LENGTH),
                    ),
                    edge: GeometryBuffers::upload(
                        &device,
                        kind.id(),
                        &geometry::edge_mesh(kind, OBJECT_LENGTH),
                    ),
                },
            );
        }
        let plane_geom = GeometryBuffers::upload(
            &device,
            "plane",
            &geometry::plane_quad(PLANE_EXTENT, PLANE_EXTENT),
        );

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniforms_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_buffer = |label: &str, size: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: size as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let object_ub = uniform_buffer("object_ub", std::mem::size_of::<LitUniforms>());
        let edge_ub = uniform_buffer("edge_ub", std::mem::size_of::<UnlitUniforms>());
        let plane_ub = uniform_buffer("plane_ub", std::mem::size_of::<UnlitUniforms>());
        let section_ub = uniform_buffer("section_ub", std::mem::size_of::<UnlitUniforms>());
        let clipped_ub = uniform_buffer("clipped_ub", std::mem::size_of::<ClipUniforms>());
        let bind_group = |label: &str, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let lit_bg = bind_group("object_bg", &object_ub);
        let edge_bg = bind_group("edge_bg", &edge_ub);
        let plane_bg = bind_group("plane_bg", &plane_ub);
        let section_bg = bind_group("section_bg", &section_ub);
        let clipped_bg = bind_group("clipped_bg", &clipped_ub);

        let shader = |label: &str, src: &str| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(src.into()),
            })
        };
        let lit_shader = shader("lit_shader", crosscut_core::LIT_WGSL);
        let unlit_shader = shader("unlit_shader", crosscut_core::UNLIT_WGSL);
        let clip_shader = shader("clip_shader", crosscut_core::CLIP_WGSL);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipelines = passes::draw_list()
            .into_iter()
            .map(|op| {
                let module = match op.shader {
                    ShaderKind::Lit => &lit_shader,
                    ShaderKind::Unlit => &unlit_shader,
                    ShaderKind::Clip => &clip_shader,
                };
                let pipeline = build_pipeline(&device, &pipeline_layout, module, &op, format);
                (op, pipeline)
            })
            .collect();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            pipelines,
            object_ub,
            edge_ub,
            plane_ub,
            section_ub,
            clipped_ub,
            lit_bg,
            edge_bg,
            plane_bg,
            section_bg,
            clipped_bg,
            meshes,
            plane_geom,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, width, height);
        }
    }

    fn geometry(&self, slot: GeometrySlot, kind: ObjectKind) -> &GeometryBuffers {
        let object = &self.meshes[&kind];
        match slot {
            GeometrySlot::Solid => &object.solid,
            GeometrySlot::Edge => &object.edge,
            GeometrySlot::Plane => &self.plane_geom,
        }
    }

    fn bind_group(&self, slot: UniformSlot) -> &wgpu::BindGroup {
        match slot {
            UniformSlot::Object => &self.lit_bg,
            UniformSlot::Edge => &self.edge_bg,
            UniformSlot::Plane => &self.plane_bg,
            UniformSlot::Section => &self.section_bg,
            UniformSlot::Clipped => &self.clipped_bg,
        }
    }

    pub fn render(
        &mut self,
        frame_mat: &FrameMatrices,
        kind: ObjectKind,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // One uniform write per block per frame; every draw reads these
        // snapshots.
        self.queue.write_buffer(
            &self.object_ub,
            0,
            bytemuck::bytes_of(&LitUniforms::new(frame_mat, OBJECT_COLOR)),
        );
        self.queue.write_buffer(
            &self.edge_ub,
            0,
            bytemuck::bytes_of(&UnlitUniforms::new(frame_mat.object_mvp, EDGE_COLOR)),
        );
        self.queue.write_buffer(
            &self.plane_ub,
            0,
            bytemuck::bytes_of(&UnlitUniforms::new(frame_mat.plane_mvp, PLANE_COLOR)),
        );
        self.queue.write_buffer(
            &self.section_ub,
            0,
            bytemuck::bytes_of(&UnlitUniforms::new(frame_mat.plane_mvp, SECTION_COLOR)),
        );
        self.queue.write_buffer(
            &self.clipped_ub,
            0,
            bytemuck::bytes_of(&ClipUniforms::new(frame_mat)),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // The op list is cut into render passes wherever an op asks for a
        // depth or stencil clear; clears are load ops in wgpu, not commands.
        let mut start = 0;
        let mut first_segment = true;
        while start < self.pipelines.len() {
            let mut end = start + 1;
            while end < self.pipelines.len() {
                let state = &self.pipelines[end].0.state;
                if state.clear_depth || state.clear_stencil {
                    break;
                }
                end += 1;
            }
            self.encode_segment(&mut encoder, &view, kind, start..end, first_segment);
            first_segment = false;
            start = end;
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn encode_segment(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        kind: ObjectKind,
        range: std::ops::Range<usize>,
        first_segment: bool,
    ) {
        let lead_state = &self.pipelines[range.start].0.state;
        let clear_depth = first_segment || lead_state.clear_depth;
        let clear_stencil = first_segment || lead_state.clear_stencil;
        let [r, g, b, a] = CLEAR_COLOR;
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.pipelines[range.start].0.id.name()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: if first_segment {
                        wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a })
                    } else {
                        wgpu::LoadOp::Load
                    },
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: if clear_depth {
                        wgpu::LoadOp::Clear(1.0)
                    } else {
                        wgpu::LoadOp::Load
                    },
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: if clear_stencil {
                        wgpu::LoadOp::Clear(0)
                    } else {
                        wgpu::LoadOp::Load
                    },
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Pipelines differ per op, so every op rebinds its pipeline; geometry
        // is rebound only when the slot's buffers actually change (all
        // pipelines share one vertex layout).
        let mut bound_slot: Option<GeometrySlot> = None;
        for (op, pipeline) in &self.pipelines[range] {
            rpass.set_pipeline(pipeline);
            if bound_slot != Some(op.geometry) {
                bound_slot = Some(op.geometry);
                let geom = self.geometry(op.geometry, kind);
                rpass.set_vertex_buffer(0, geom.vertex.slice(..));
                if let Some(index) = &geom.index {
                    rpass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint16);
                }
            }
            rpass.set_bind_group(0, self.bind_group(op.uniforms), &[]);
            rpass.set_stencil_reference(op.state.stencil_check.reference);
            let geom = self.geometry(op.geometry, kind);
            if geom.index.is_some() {
                rpass.draw_indexed(0..geom.elements, 0, 0..1);
            } else {
                rpass.draw(0..geom.vertex_count, 0..1);
            }
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_stencil"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_STENCIL_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn map_compare(func: DepthFunc) -> wgpu::CompareFunction {
    match func {
        DepthFunc::Less => wgpu::CompareFunction::Less,
        DepthFunc::Greater => wgpu::CompareFunction::Greater,
        DepthFunc::Always => wgpu::CompareFunction::Always,
    }
}

fn map_stencil_func(func: StencilFunc) -> wgpu::CompareFunction {
    match func {
        StencilFunc::Always => wgpu::CompareFunction::Always,
        StencilFunc::Equal => wgpu::CompareFunction::Equal,
        StencilFunc::NotEqual => wgpu::CompareFunction::NotEqual,
    }
}

fn map_stencil_op(op: StencilOp) -> wgpu::StencilOperation {
    match op {
        StencilOp::Keep => wgpu::StencilOperation::Keep,
        StencilOp::IncrWrap => wgpu::StencilOperation::IncrementWrap,
        StencilOp::DecrWrap => wgpu::StencilOperation::DecrementWrap,
    }
}

fn stencil_face(state: &RenderState, ops: StencilFaceOps) -> wgpu::StencilFaceState {
    if !state.stencil_test {
        return wgpu::StencilFaceState::IGNORE;
    }
    wgpu::StencilFaceState {
        compare: map_stencil_func(state.stencil_check.func),
        fail_op: map_stencil_op(ops.fail),
        depth_fail_op: map_stencil_op(ops.depth_fail),
        pass_op: map_stencil_op(ops.pass),
    }
}

/// Bake a [`RenderState`] into an immutable pipeline. Disabled depth testing
/// maps to compare-always with writes off, matching the GL semantics where a
/// disabled test also suppresses writes.
pub fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    op: &DrawOp,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let state = &op.state;
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
        ],
    };
    let topology = match op.geometry {
        GeometrySlot::Edge => wgpu::PrimitiveTopology::LineList,
        _ => wgpu::PrimitiveTopology::TriangleList,
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(op.id.name()),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: match state.cull {
                CullMode::None => None,
                CullMode::Front => Some(wgpu::Face::Front),
                CullMode::Back => Some(wgpu::Face::Back),
            },
            front_face: wgpu::FrontFace::Ccw,
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_STENCIL_FORMAT,
            depth_write_enabled: state.depth_test && state.depth_write,
            depth_compare: if state.depth_test {
                map_compare(state.depth_func)
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState {
                front: stencil_face(state, state.stencil_front),
                back: stencil_face(state, state.stencil_back),
                read_mask: state.stencil_check.read_mask,
                write_mask: if state.stencil_write { 0xFF } else { 0 },
            },
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // Separate alpha blend keeps destination alpha sane under
                // the stacked translucent passes.
                blend: Some(wgpu::BlendState {
                    color: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::SrcAlpha,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                    alpha: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::One,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                }),
                write_mask: if state.color_write {
                    wgpu::ColorWrites::ALL
                } else {
                    wgpu::ColorWrites::empty()
                },
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
