/// One pin as drawn this frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerInstance {
    pub center: [f32; 3],
    /// Radius after hover scaling.
    pub radius: f32,
    pub color: [f32; 4],
    pub emissive: [f32; 4],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GlobeTexture {
    Earth,
    Borders,
}

/// Per-frame inputs for `render_globe`.
#[derive(Debug, Clone)]
pub struct GlobeFrame<'a> {
    pub view_proj: [[f32; 4]; 4],
    pub rotation_y: f64,
    pub globe_radius: f64,
    pub globe_emissive: [f32; 4],
    pub background: [f64; 4],
    pub markers: &'a [MarkerInstance],
}

/// Column-major model matrix for the unit globe mesh: uniform scale, then
/// rotation about +Y.
pub fn globe_model_matrix(rotation_y: f64, radius: f64) -> [[f32; 4]; 4] {
    let (s, c) = rotation_y.sin_cos();
    let (s, c, r) = (s as f32, c as f32, radius as f32);
    [
        [c * r, 0.0, -s * r, 0.0],
        [0.0, r, 0.0, 0.0],
        [s * r, 0.0, c * r, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// What a frame does when the swapchain texture can't be acquired.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceRecovery {
    /// Reconfigure the surface and draw again next frame.
    Reconfigure,
    Skip,
}

pub fn surface_recovery(err: &::wgpu::SurfaceError) -> SurfaceRecovery {
    match err {
        ::wgpu::SurfaceError::Lost | ::wgpu::SurfaceError::Outdated => {
            SurfaceRecovery::Reconfigure
        }
        _ => SurfaceRecovery::Skip,
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::{
        GlobeFrame, GlobeTexture, MarkerInstance, SurfaceRecovery, globe_model_matrix,
        surface_recovery,
    };
    use crate::texture::TextureImage;
    use ::wgpu::util::DeviceExt;
    use foundation::math::project;
    use std::borrow::Cow;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub globe_pipeline: ::wgpu::RenderPipeline,
        pub marker_pipeline: ::wgpu::RenderPipeline,
        pub uniform_buffer: ::wgpu::Buffer,
        pub uniform_bind_group: ::wgpu::BindGroup,
        pub texture_bind_group_layout: ::wgpu::BindGroupLayout,
        pub texture_bind_group: ::wgpu::BindGroup,
        pub sampler: ::wgpu::Sampler,
        pub earth_view: ::wgpu::TextureView,
        pub borders_view: ::wgpu::TextureView,
        pub depth_view: ::wgpu::TextureView,
        pub globe_vertex_buffer: ::wgpu::Buffer,
        pub globe_index_buffer: ::wgpu::Buffer,
        pub globe_index_count: u32,
        pub marker_vertex_buffer: ::wgpu::Buffer,
        pub marker_index_buffer: ::wgpu::Buffer,
        pub marker_index_count: u32,
        pub instance_buffer: ::wgpu::Buffer,
        pub instance_capacity: usize,
        pub instance_count: u32,
    }

    const GLOBALS_WGSL: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_dir: vec3<f32>,
    ambient: f32,
    globe_emissive: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

const DIFFUSE: f32 = 0.85;
"#;

    const GLOBE_SHADER: &str = r#"
@group(1) @binding(0)
var earth_tex: texture_2d<f32>;
@group(1) @binding(1)
var borders_tex: texture_2d<f32>;
@group(1) @binding(2)
var globe_sampler: sampler;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VsOut {
    let world = globals.model * vec4<f32>(position, 1.0);
    let n = (globals.model * vec4<f32>(normal, 0.0)).xyz;
    return VsOut(globals.view_proj * world, n, uv);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(globals.light_dir);
    let ndotl = max(dot(n, l), 0.0);

    let base = textureSample(earth_tex, globe_sampler, fs_in.uv).rgb;
    let borders = textureSample(borders_tex, globe_sampler, fs_in.uv).rgb;
    let glow = borders * globals.globe_emissive.rgb * globals.globe_emissive.a;
    return vec4<f32>(base * (globals.ambient + DIFFUSE * ndotl) + glow, 1.0);
}
"#;

    const MARKER_SHADER: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) emissive: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(3) center: vec3<f32>,
    @location(4) radius: f32,
    @location(5) color: vec4<f32>,
    @location(6) emissive: vec4<f32>,
) -> VsOut {
    let world = center + position * radius;
    return VsOut(globals.view_proj * vec4<f32>(world, 1.0), normal, color, emissive);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(globals.light_dir);
    let ndotl = max(dot(n, l), 0.0);
    let lit = fs_in.color.rgb * (globals.ambient + DIFFUSE * ndotl) + fs_in.emissive.rgb;
    return vec4<f32>(lit, fs_in.color.a);
}
"#;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        model: [[f32; 4]; 4],
        light_dir: [f32; 3],
        ambient: f32,
        globe_emissive: [f32; 4],
    }

    const LIGHT_DIR: [f32; 3] = [5.0, 3.0, 5.0];
    const AMBIENT: f32 = 0.45;

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    /// Unit sphere on a lat/lon grid, laid out with the same projection as
    /// the pins so the equirectangular texture lines up with them.
    fn generate_sphere_mesh(segments: u32) -> (Vec<Vertex>, Vec<u32>) {
        let lat_segments = segments.max(3);
        let lon_segments = segments.max(3);

        let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
        for row in 0..=lat_segments {
            let v = row as f64 / lat_segments as f64;
            let lat = 90.0 - 180.0 * v;
            for col in 0..=lon_segments {
                let u = col as f64 / lon_segments as f64;
                let lon = -180.0 + 360.0 * u;
                let p = project(lat, lon, 1.0).as_f32_array();
                vertices.push(Vertex {
                    position: p,
                    normal: p,
                    uv: [u as f32, v as f32],
                });
            }
        }

        let stride = lon_segments + 1;
        let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
        for row in 0..lat_segments {
            for col in 0..lon_segments {
                let i0 = row * stride + col;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        (vertices, indices)
    }

    fn create_texture(
        device: &::wgpu::Device,
        queue: &::wgpu::Queue,
        label: &str,
        image: &TextureImage,
    ) -> ::wgpu::TextureView {
        let texture = device.create_texture_with_data(
            queue,
            &::wgpu::TextureDescriptor {
                label: Some(label),
                size: ::wgpu::Extent3d {
                    width: image.width.max(1),
                    height: image.height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: ::wgpu::TextureDimension::D2,
                format: ::wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: ::wgpu::TextureUsages::TEXTURE_BINDING | ::wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            ::wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );
        texture.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn create_texture_bind_group(
        device: &::wgpu::Device,
        layout: &::wgpu::BindGroupLayout,
        earth: &::wgpu::TextureView,
        borders: &::wgpu::TextureView,
        sampler: &::wgpu::Sampler,
    ) -> ::wgpu::BindGroup {
        device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-textures-bg"),
            layout,
            entries: &[
                ::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ::wgpu::BindingResource::TextureView(earth),
                },
                ::wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ::wgpu::BindingResource::TextureView(borders),
                },
                ::wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ::wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn texture_layout_entry(binding: u32) -> ::wgpu::BindGroupLayoutEntry {
        ::wgpu::BindGroupLayoutEntry {
            binding,
            visibility: ::wgpu::ShaderStages::FRAGMENT,
            ty: ::wgpu::BindingType::Texture {
                sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: ::wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }
    }

    fn primitive() -> ::wgpu::PrimitiveState {
        ::wgpu::PrimitiveState {
            topology: ::wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: ::wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: ::wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    fn depth_state() -> ::wgpu::DepthStencilState {
        ::wgpu::DepthStencilState {
            format: ::wgpu::TextureFormat::Depth24Plus,
            depth_write_enabled: true,
            depth_compare: ::wgpu::CompareFunction::Less,
            stencil: ::wgpu::StencilState::default(),
            bias: ::wgpu::DepthBiasState::default(),
        }
    }

    const VERTEX_ATTRIBUTES: [::wgpu::VertexAttribute; 3] = ::wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2
    ];

    const INSTANCE_ATTRIBUTES: [::wgpu::VertexAttribute; 4] = ::wgpu::vertex_attr_array![
        3 => Float32x3,
        4 => Float32,
        5 => Float32x4,
        6 => Float32x4
    ];

    pub async fn init_wgpu_from_canvas_id(
        canvas_id: &str,
        globe_segments: u32,
        marker_segments: u32,
    ) -> Result<WgpuContext, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas_elem = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas missing"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let width = canvas_elem.width();
        let height = canvas_elem.height();

        // `wgpu::Surface` must not outlive its `wgpu::Instance`; the instance
        // is leaked for the lifetime of the page.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("globe-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| JsValue::from_str("surface has no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let globe_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(format!(
                "{GLOBALS_WGSL}{GLOBE_SHADER}"
            ))),
        });
        let marker_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("marker-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(format!(
                "{GLOBALS_WGSL}{MARKER_SHADER}"
            ))),
        });

        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-globals-bgl"),
                entries: &[::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: ::wgpu::BindingType::Buffer {
                        ty: ::wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-globals-bg"),
            layout: &uniform_bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-textures-bgl"),
                entries: &[
                    texture_layout_entry(0),
                    texture_layout_entry(1),
                    ::wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: ::wgpu::ShaderStages::FRAGMENT,
                        ty: ::wgpu::BindingType::Sampler(::wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let sampler = device.create_sampler(&::wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: ::wgpu::AddressMode::Repeat,
            address_mode_v: ::wgpu::AddressMode::ClampToEdge,
            address_mode_w: ::wgpu::AddressMode::ClampToEdge,
            mag_filter: ::wgpu::FilterMode::Linear,
            min_filter: ::wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Ocean blue until the earth texture arrives; no glow until borders do.
        let earth_view = create_texture(
            &device,
            &queue,
            "earth",
            &TextureImage::solid([26, 60, 110, 255]),
        );
        let borders_view = create_texture(
            &device,
            &queue,
            "borders",
            &TextureImage::solid([0, 0, 0, 255]),
        );
        let texture_bind_group = create_texture_bind_group(
            &device,
            &texture_bind_group_layout,
            &earth_view,
            &borders_view,
            &sampler,
        );

        let globe_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
            immediate_size: 0,
        });
        let marker_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("marker-pipeline-layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            immediate_size: 0,
        });

        let vertex_layout = ::wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as ::wgpu::BufferAddress,
            step_mode: ::wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        };

        let globe_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-pipeline"),
            layout: Some(&globe_layout),
            vertex: ::wgpu::VertexState {
                module: &globe_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout.clone()],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &globe_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::REPLACE),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive(),
            depth_stencil: Some(depth_state()),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let marker_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("marker-pipeline"),
            layout: Some(&marker_layout),
            vertex: ::wgpu::VertexState {
                module: &marker_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    vertex_layout,
                    ::wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MarkerInstance>()
                            as ::wgpu::BufferAddress,
                        step_mode: ::wgpu::VertexStepMode::Instance,
                        attributes: &INSTANCE_ATTRIBUTES,
                    },
                ],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &marker_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive(),
            depth_stencil: Some(depth_state()),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let (globe_vertices, globe_indices) = generate_sphere_mesh(globe_segments);
        let globe_vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-vertices"),
            contents: bytemuck::cast_slice(&globe_vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let globe_index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-indices"),
            contents: bytemuck::cast_slice(&globe_indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        let (marker_vertices, marker_indices) = generate_sphere_mesh(marker_segments);
        let marker_vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("marker-vertices"),
            contents: bytemuck::cast_slice(&marker_vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let marker_index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("marker-indices"),
            contents: bytemuck::cast_slice(&marker_indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = 16;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas_elem,
            globe_pipeline,
            marker_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            texture_bind_group,
            sampler,
            earth_view,
            borders_view,
            depth_view,
            globe_vertex_buffer,
            globe_index_buffer,
            globe_index_count: globe_indices.len() as u32,
            marker_vertex_buffer,
            marker_index_buffer,
            marker_index_count: marker_indices.len() as u32,
            instance_buffer,
            instance_capacity,
            instance_count: 0,
        })
    }

    fn create_instance_buffer(device: &::wgpu::Device, capacity: usize) -> ::wgpu::Buffer {
        device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("marker-instances"),
            size: (capacity.max(1) * std::mem::size_of::<MarkerInstance>()) as u64,
            usage: ::wgpu::BufferUsages::VERTEX | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn set_globe_texture(ctx: &mut WgpuContext, which: GlobeTexture, image: &TextureImage) {
        match which {
            GlobeTexture::Earth => {
                ctx.earth_view = create_texture(&ctx.device, &ctx.queue, "earth", image);
            }
            GlobeTexture::Borders => {
                ctx.borders_view = create_texture(&ctx.device, &ctx.queue, "borders", image);
            }
        }
        ctx.texture_bind_group = create_texture_bind_group(
            &ctx.device,
            &ctx.texture_bind_group_layout,
            &ctx.earth_view,
            &ctx.borders_view,
            &ctx.sampler,
        );
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    fn upload_markers(ctx: &mut WgpuContext, markers: &[MarkerInstance]) {
        if markers.len() > ctx.instance_capacity {
            ctx.instance_capacity = markers.len().next_power_of_two();
            ctx.instance_buffer = create_instance_buffer(&ctx.device, ctx.instance_capacity);
        }
        if !markers.is_empty() {
            ctx.queue
                .write_buffer(&ctx.instance_buffer, 0, bytemuck::cast_slice(markers));
        }
        ctx.instance_count = markers.len() as u32;
    }

    pub fn render_globe(ctx: &mut WgpuContext, frame: &GlobeFrame<'_>) -> Result<(), JsValue> {
        upload_markers(ctx, frame.markers);

        let surface_frame = match ctx.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                match surface_recovery(&err) {
                    SurfaceRecovery::Reconfigure => {
                        log::debug!("surface {err}, reconfiguring");
                        ctx.surface.configure(&ctx.device, &ctx.config);
                    }
                    SurfaceRecovery::Skip => log::warn!("skipping globe frame: {err}"),
                }
                return Ok(());
            }
        };
        let view = surface_frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        let globals = Globals {
            view_proj: frame.view_proj,
            model: globe_model_matrix(frame.rotation_y, frame.globe_radius),
            light_dir: LIGHT_DIR,
            ambient: AMBIENT,
            globe_emissive: frame.globe_emissive,
        };
        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(&globals));

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("globe-encoder"),
            });

        {
            let [r, g, b, a] = frame.background;
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color { r, g, b, a }),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&ctx.globe_pipeline);
            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);
            rpass.set_bind_group(1, &ctx.texture_bind_group, &[]);
            rpass.set_vertex_buffer(0, ctx.globe_vertex_buffer.slice(..));
            rpass.set_index_buffer(
                ctx.globe_index_buffer.slice(..),
                ::wgpu::IndexFormat::Uint32,
            );
            rpass.draw_indexed(0..ctx.globe_index_count, 0, 0..1);

            if ctx.instance_count > 0 {
                rpass.set_pipeline(&ctx.marker_pipeline);
                rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);
                rpass.set_vertex_buffer(0, ctx.marker_vertex_buffer.slice(..));
                rpass.set_vertex_buffer(1, ctx.instance_buffer.slice(..));
                rpass.set_index_buffer(
                    ctx.marker_index_buffer.slice(..),
                    ::wgpu::IndexFormat::Uint32,
                );
                rpass.draw_indexed(0..ctx.marker_index_count, 0, 0..ctx.instance_count);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        surface_frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::{GlobeFrame, GlobeTexture};
    use crate::texture::TextureImage;
    use wasm_bindgen::prelude::JsValue;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    pub async fn init_wgpu_from_canvas_id(
        _canvas_id: &str,
        _globe_segments: u32,
        _marker_segments: u32,
    ) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn set_globe_texture(_ctx: &mut WgpuContext, _which: GlobeTexture, _image: &TextureImage) {}

    pub fn render_globe(_ctx: &mut WgpuContext, _frame: &GlobeFrame<'_>) -> Result<(), JsValue> {
        Err(JsValue::from_str(
            "wgpu rendering is only available on wasm32 targets",
        ))
    }
}

pub use imp::{WgpuContext, init_wgpu_from_canvas_id, render_globe, resize_wgpu, set_globe_texture};
