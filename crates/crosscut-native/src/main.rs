use std::time::Instant;

use fnv::FnvHashMap;
use wgpu::util::DeviceExt;
use winit::{
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use crosscut_core::geometry::{self, MeshData, Vertex};
use crosscut_core::passes::{
    self, CullMode, DepthFunc, DrawOp, GeometrySlot, RenderState, ShaderKind, StencilFaceOps,
    StencilFunc, StencilOp, UniformSlot,
};
use crosscut_core::uniforms::{frame_matrices, ClipUniforms, LitUniforms, UnlitUniforms};
use crosscut_core::{
    ObjectKind, Scene, CLEAR_COLOR, EDGE_COLOR, OBJECT_COLOR, OBJECT_LENGTH, PLANE_COLOR,
    PLANE_EXTENT, SECTION_COLOR,
};

const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

struct Mesh {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    elements: u32,
}

impl Mesh {
    fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let indices = data.indices.as_ref().expect("builders emit indexed meshes");
        Self {
            vertex: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            elements: data.element_count(),
        }
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipelines: Vec<(DrawOp, wgpu::RenderPipeline)>,
    buffers: FnvHashMap<UniformSlot, (wgpu::Buffer, wgpu::BindGroup)>,
    solids: FnvHashMap<ObjectKind, (Mesh, Mesh)>,
    plane: Mesh,
    width: u32,
    height: u32,
    last_frame: Instant,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        let mut solids = FnvHashMap::default();
        for kind in ObjectKind::ALL {
            solids.insert(
                kind,
                (
                    Mesh::upload(&device, kind.id(), &geometry::solid_mesh(kind, OBJECT_LENGTH)),
                    Mesh::upload(&device, kind.id(), &geometry::edge_mesh(kind, OBJECT_LENGTH)),
                ),
            );
        }
        let plane = Mesh::upload(
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
        let mut buffers = FnvHashMap::default();
        for (slot, size) in [
            (UniformSlot::Object, std::mem::size_of::<LitUniforms>()),
            (UniformSlot::Edge, std::mem::size_of::<UnlitUniforms>()),
            (UniformSlot::Plane, std::mem::size_of::<UnlitUniforms>()),
            (UniformSlot::Section, std::mem::size_of::<UnlitUniforms>()),
            (UniformSlot::Clipped, std::mem::size_of::<ClipUniforms>()),
        ] {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: None,
                size: size as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: None,
                layout: &bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            buffers.insert(slot, (buffer, bind_group));
        }

        let lit = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lit"),
            source: wgpu::ShaderSource::Wgsl(crosscut_core::LIT_WGSL.into()),
        });
        let unlit = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("unlit"),
            source: wgpu::ShaderSource::Wgsl(crosscut_core::UNLIT_WGSL.into()),
        });
        let clip = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("clip"),
            source: wgpu::ShaderSource::Wgsl(crosscut_core::CLIP_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipelines = passes::draw_list()
            .into_iter()
            .map(|op| {
                let module = match op.shader {
                    ShaderKind::Lit => &lit,
                    ShaderKind::Unlit => &unlit,
                    ShaderKind::Clip => &clip,
                };
                let pipeline = build_pipeline(&device, &layout, module, &op, format);
                (op, pipeline)
            })
            .collect();

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_view,
            pipelines,
            buffers,
            solids,
            plane,
            width: size.width.max(1),
            height: size.height.max(1),
            last_frame: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
    }

    fn mesh(&self, slot: GeometrySlot, kind: ObjectKind) -> &Mesh {
        match slot {
            GeometrySlot::Solid => &self.solids[&kind].0,
            GeometrySlot::Edge => &self.solids[&kind].1,
            GeometrySlot::Plane => &self.plane,
        }
    }

    fn render(&mut self, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        scene.tick(dt.as_secs_f32() * 1000.0);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let matrices = frame_matrices(
            &scene.plane,
            &scene.rig,
            self.width as f32,
            self.height as f32,
        );
        let write = |slot: UniformSlot, bytes: &[u8]| {
            self.queue.write_buffer(&self.buffers[&slot].0, 0, bytes);
        };
        write(
            UniformSlot::Object,
            bytemuck::bytes_of(&LitUniforms::new(&matrices, OBJECT_COLOR)),
        );
        write(
            UniformSlot::Edge,
            bytemuck::bytes_of(&UnlitUniforms::new(matrices.object_mvp, EDGE_COLOR)),
        );
        write(
            UniformSlot::Plane,
            bytemuck::bytes_of(&UnlitUniforms::new(matrices.plane_mvp, PLANE_COLOR)),
        );
        write(
            UniformSlot::Section,
            bytemuck::bytes_of(&UnlitUniforms::new(matrices.plane_mvp, SECTION_COLOR)),
        );
        write(
            UniformSlot::Clipped,
            bytemuck::bytes_of(&ClipUniforms::new(&matrices)),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Cut the op list into render passes at depth/stencil clears; the
        // first pass also clears color.
        let mut start = 0;
        let mut first = true;
        while start < self.pipelines.len() {
            let mut end = start + 1;
            while end < self.pipelines.len() {
                let s = &self.pipelines[end].0.state;
                if s.clear_depth || s.clear_stencil {
                    break;
                }
                end += 1;
            }
            {
                let lead = &self.pipelines[start].0.state;
                let [r, g, b, a] = CLEAR_COLOR;
                let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some(self.pipelines[start].0.id.name()),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: if first {
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
                            load: if first || lead.clear_depth {
                                wgpu::LoadOp::Clear(1.0)
                            } else {
                                wgpu::LoadOp::Load
                            },
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: Some(wgpu::Operations {
                            load: if first || lead.clear_stencil {
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
                let mut bound: Option<GeometrySlot> = None;
                for (op, pipeline) in &self.pipelines[start..end] {
                    rpass.set_pipeline(pipeline);
                    let mesh = self.mesh(op.geometry, scene.object);
                    if bound != Some(op.geometry) {
                        bound = Some(op.geometry);
                        rpass.set_vertex_buffer(0, mesh.vertex.slice(..));
                        rpass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint16);
                    }
                    rpass.set_bind_group(0, &self.buffers[&op.uniforms].1, &[]);
                    rpass.set_stencil_reference(op.state.stencil_check.reference);
                    rpass.draw_indexed(0..mesh.elements, 0, 0..1);
                }
            }
            first = false;
            start = end;
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
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
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn compare(func: DepthFunc) -> wgpu::CompareFunction {
    match func {
        DepthFunc::Less => wgpu::CompareFunction::Less,
        DepthFunc::Greater => wgpu::CompareFunction::Greater,
        DepthFunc::Always => wgpu::CompareFunction::Always,
    }
}

fn stencil_face(state: &RenderState, ops: StencilFaceOps) -> wgpu::StencilFaceState {
    if !state.stencil_test {
        return wgpu::StencilFaceState::IGNORE;
    }
    let map_op = |op: StencilOp| match op {
        StencilOp::Keep => wgpu::StencilOperation::Keep,
        StencilOp::IncrWrap => wgpu::StencilOperation::IncrementWrap,
        StencilOp::DecrWrap => wgpu::StencilOperation::DecrementWrap,
    };
    wgpu::StencilFaceState {
        compare: match state.stencil_check.func {
            StencilFunc::Always => wgpu::CompareFunction::Always,
            StencilFunc::Equal => wgpu::CompareFunction::Equal,
            StencilFunc::NotEqual => wgpu::CompareFunction::NotEqual,
        },
        fail_op: map_op(ops.fail),
        depth_fail_op: map_op(ops.depth_fail),
        pass_op: map_op(ops.pass),
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    op: &DrawOp,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let state = &op.state;
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(op.id.name()),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
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
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: match op.geometry {
                GeometrySlot::Edge => wgpu::PrimitiveTopology::LineList,
                _ => wgpu::PrimitiveTopology::TriangleList,
            },
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
                compare(state.depth_func)
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

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("crosscut (native)")
        .build(&event_loop)
        .expect("window");

    let mut state = pollster::block_on(GpuState::new(&window)).expect("gpu");
    let mut scene = Scene::new();
    let mut preset_index = 0usize;
    let mut dragging = false;
    let mut last_cursor: Option<(f32, f32)> = None;

    log::info!("controls: drag=orbit  1-6=object  p=preset  c=camera  r=reset  d=demo");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => state.resize(size),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::WindowEvent {
                event:
                    WindowEvent::MouseInput {
                        state: button_state,
                        button: MouseButton::Left,
                        ..
                    },
                ..
            } => {
                dragging = button_state == ElementState::Pressed;
                if !dragging {
                    last_cursor = None;
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => {
                let pos = (position.x as f32, position.y as f32);
                if dragging {
                    if let Some(last) = last_cursor {
                        scene.rig.rotate(pos.0 - last.0, pos.1 - last.1);
                    }
                }
                last_cursor = Some(pos);
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event: key, .. },
                ..
            } => {
                if key.state != ElementState::Pressed {
                    return;
                }
                let kind = match key.physical_key {
                    PhysicalKey::Code(KeyCode::Digit1) => Some(ObjectKind::Cube),
                    PhysicalKey::Code(KeyCode::Digit2) => Some(ObjectKind::Cuboid),
                    PhysicalKey::Code(KeyCode::Digit3) => Some(ObjectKind::Cylinder),
                    PhysicalKey::Code(KeyCode::Digit4) => Some(ObjectKind::Cone),
                    PhysicalKey::Code(KeyCode::Digit5) => Some(ObjectKind::TruncatedCone),
                    PhysicalKey::Code(KeyCode::Digit6) => Some(ObjectKind::Prism),
                    _ => None,
                };
                if let Some(kind) = kind {
                    scene.select_object(kind);
                    preset_index = 0;
                    log::info!("object: {}", kind.id());
                    return;
                }
                match key.physical_key {
                    PhysicalKey::Code(KeyCode::KeyP) => {
                        let name = scene.cycle_preset(&mut preset_index);
                        log::info!("preset: {name}");
                    }
                    PhysicalKey::Code(KeyCode::KeyC) => {
                        scene.cycle_camera();
                        log::info!("camera status: {}", scene.rig.status.index());
                    }
                    PhysicalKey::Code(KeyCode::KeyR) => {
                        scene.reset_all();
                        log::info!("reset");
                    }
                    PhysicalKey::Code(KeyCode::KeyD) => scene.enqueue_demo(),
                    _ => {}
                }
            }
            Event::AboutToWait => match state.render(&mut scene) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            },
            _ => {}
        })
        .unwrap();
}
