use super::helpers;
use super::targets::{DEPTH_FORMAT, HDR_FORMAT};
use crate::core::{Look, ParticleInstance};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshVertex {
    pos: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) tint_ambient: [f32; 4],
    pub(crate) emissive: [f32; 4], // rgb, intensity
    pub(crate) key_light: [f32; 4], // direction, intensity
    pub(crate) fill_light: [f32; 4], // direction, intensity
    pub(crate) fill_color: [f32; 4],
}

/// Flat-shaded octahedron: eight faces, three vertices each, normals per
/// face.
pub(crate) fn octahedron(radius: f32) -> Vec<MeshVertex> {
    let mut out = Vec::with_capacity(24);
    for sx in [1.0f32, -1.0] {
        for sy in [1.0f32, -1.0] {
            for sz in [1.0f32, -1.0] {
                let normal = Vec3::new(sx, sy, sz).normalize().to_array();
                for pos in [
                    [sx * radius, 0.0, 0.0],
                    [0.0, sy * radius, 0.0],
                    [0.0, 0.0, sz * radius],
                ] {
                    out.push(MeshVertex { pos, normal });
                }
            }
        }
    }
    out
}

pub(crate) struct ParticlePass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    mesh: wgpu::Buffer,
    mesh_len: u32,
    instances: wgpu::Buffer,
    capacity: usize,
}

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];
const MESH_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("particle_instances"),
        size: (capacity.max(1) * std::mem::size_of::<ParticleInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl ParticlePass {
    pub(crate) fn new(device: &wgpu::Device, radius: f32, capacity: usize) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particles_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::PARTICLES_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particles_bgl"),
            entries: &[helpers::uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particles_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particles_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &MESH_ATTRS,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<ParticleInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &INSTANCE_ATTRS,
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particles_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particles_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let vertices = octahedron(radius);
        let mesh = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("octahedron"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            mesh,
            mesh_len: vertices.len() as u32,
            instances: instance_buffer(device, capacity),
            capacity,
        }
    }

    /// Upload camera, material and per-instance data for this frame.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        look: &Look,
        instances: &[ParticleInstance],
    ) {
        if instances.len() > self.capacity {
            self.capacity = instances.len();
            self.instances = instance_buffer(device, self.capacity);
        }
        let u = SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            tint_ambient: look.tint.extend(crate::constants::AMBIENT_LIGHT).to_array(),
            emissive: look
                .emissive
                .extend(look.emissive_intensity * crate::constants::EMISSIVE_GAIN)
                .to_array(),
            key_light: Vec3::from_array(crate::constants::KEY_LIGHT_DIR)
                .normalize()
                .extend(crate::constants::KEY_LIGHT_INTENSITY)
                .to_array(),
            fill_light: Vec3::from_array(crate::constants::FILL_LIGHT_DIR)
                .normalize()
                .extend(crate::constants::FILL_LIGHT_INTENSITY)
                .to_array(),
            fill_color: Vec3::from_array(crate::constants::FILL_LIGHT_COLOR)
                .extend(1.0)
                .to_array(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
        queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(instances));
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, count: usize) {
        let count = count.min(self.capacity) as u32;
        if count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.mesh.slice(..));
        rpass.set_vertex_buffer(1, self.instances.slice(..));
        rpass.draw(0..self.mesh_len, 0..count);
    }
}
