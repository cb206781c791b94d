use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GlobeError;
use crate::globe::mesh::GlobeMesh;
use crate::renderer::camera::CameraState;
use crate::renderer::vertex::GlobeVertex;
use crate::settings::DisplaySettings;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniform block shared by both shader stages.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobeUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Direction towards the light, w unused.
    pub light_dir: [f32; 4],
    /// Light color in rgb, ambient term in w.
    pub light_color: [f32; 4],
}

impl GlobeUniform {
    pub fn new(
        view_proj: &nalgebra_glm::Mat4,
        model: &nalgebra_glm::Mat4,
        light_color: [f32; 3],
        ambient: f32,
    ) -> Self {
        Self {
            view_proj: to_columns(view_proj),
            model: to_columns(model),
            light_dir: [0.0, 0.0, 1.0, 0.0],
            light_color: [light_color[0], light_color[1], light_color[2], ambient],
        }
    }
}

fn to_columns(m: &nalgebra_glm::Mat4) -> [[f32; 4]; 4] {
    let mut columns = [[0.0; 4]; 4];
    for (c, column) in columns.iter_mut().enumerate() {
        for (r, value) in column.iter_mut().enumerate() {
            *value = m[(r, c)];
        }
    }
    columns
}

pub struct Renderer {
    pub(super) surface: wgpu::Surface<'static>,
    pub(super) device: wgpu::Device,
    pub(super) queue: wgpu::Queue,
    pub(super) config: wgpu::SurfaceConfiguration,
    pub(super) globe_pipeline: wgpu::RenderPipeline,
    pub(super) vertex_buffer: wgpu::Buffer,
    pub(super) num_vertices: u32,
    pub(super) uniform_buffer: wgpu::Buffer,
    pub(super) uniform_bind_group: wgpu::BindGroup,
    pub(super) depth_view: wgpu::TextureView,
    pub(super) background_color: [f32; 3],
    pub(super) light_color: [f32; 3],
    pub(super) ambient: f32,
    pub(super) camera: CameraState,
    pub(super) egui_renderer: egui_wgpu::Renderer,
    egui_ctx: egui::Context,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, display: &DisplaySettings) -> Result<Self, GlobeError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // An owned Arc keeps the window alive for the surface's 'static lifetime
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::default(),
                ..Default::default()
            })
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

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globe Vertex Buffer"),
            size: 0,
            usage: wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
        });

        let camera = CameraState::new(300.0, display.far_plane);
        let uniform = GlobeUniform::new(
            &nalgebra_glm::Mat4::identity(),
            &nalgebra_glm::Mat4::identity(),
            display.light_color,
            display.ambient,
        );
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globe Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globe Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Globe Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let globe_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Globe Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GlobeVertex::desc()],
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

        let depth_view = create_depth_view(&device, &config);

        let egui_ctx = egui::Context::default();
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, Default::default());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            globe_pipeline,
            vertex_buffer,
            num_vertices: 0,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            background_color: display.background_color,
            light_color: display.light_color,
            ambient: display.ambient,
            camera,
            egui_renderer,
            egui_ctx,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    pub fn egui_context(&self) -> egui::Context {
        self.egui_ctx.clone()
    }

    pub fn update_display(&mut self, display: &DisplaySettings) {
        self.background_color = display.background_color;
        self.light_color = display.light_color;
        self.ambient = display.ambient;
        self.camera.far = display.far_plane;
    }

    pub fn upload_mesh(&mut self, mesh: &GlobeMesh) {
        self.vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.num_vertices = mesh.vertices.len() as u32;
        log::info!("Uploaded globe mesh: {} faces", mesh.face_count());
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;

    #[test]
    fn uniform_columns_follow_glm_layout() {
        let translation = glm::translation(&glm::vec3(1.0, 2.0, 3.0));
        let uniform = GlobeUniform::new(&translation, &glm::Mat4::identity(), [1.0; 3], 0.2);
        assert_eq!(uniform.view_proj[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.model[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(uniform.light_color[3], 0.2);
    }

    #[test]
    fn uniform_size_is_aligned() {
        assert_eq!(size_of::<GlobeUniform>() % 16, 0);
    }
}
