//! # See Also
//!
//! * [glTF 2.0 Spec](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html)

mod buffer;
mod material;
mod mesh;

pub use buffer::*;
pub use material::*;
pub use mesh::*;
pub use primitive::{
    attribute::{Attribute, AttributeComponent, AttributeComponentType, AttributeType, Semantic},
    Mode, Primitive,
};

use nalgebra::{Matrix4, UnitQuaternion, Vector3};

pub type Extras = serde_json::Map<String, serde_json::Value>;

/// A set of scenes and associated data, which may be shared between scenes.
///
/// The model exclusively owns every mesh, accessor, and buffer; everything else refers to them by
/// index.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// If extant, the index of the default scene
    pub scene: Option<usize>,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub images: Vec<Image>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
    /// Center of the `CESIUM_RTC` extension, if declared
    pub rtc_center: Option<Vector3<f64>>,
    /// Application-specific data
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub name: Option<String>,
    /// Root nodes
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: Option<String>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    /// Column-major local transform; takes precedence over TRS when present
    pub matrix: Option<Matrix4<f64>>,
    pub translation: Option<Vector3<f64>>,
    pub rotation: Option<UnitQuaternion<f64>>,
    pub scale: Option<Vector3<f64>>,
}

impl Node {
    pub fn with_mesh(mesh: usize) -> Self {
        Self {
            mesh: Some(mesh),
            ..Default::default()
        }
    }
}

impl Model {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_buffer(&mut self, data: Vec<u8>) -> usize {
        self.buffers.push(Buffer::from(data));
        self.buffers.len() - 1
    }

    pub fn push_buffer_view(&mut self, view: BufferView) -> usize {
        self.buffer_views.push(view);
        self.buffer_views.len() - 1
    }

    pub fn push_accessor(&mut self, accessor: Accessor) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    pub fn push_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn push_node(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn push_scene(&mut self, scene: Scene) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    pub fn push_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn push_texture(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn push_image(&mut self, image: Image) -> usize {
        self.images.push(image);
        self.images.len() - 1
    }

    /// Store tightly-packed little-endian `bytes` in a new buffer, and describe them with a new
    /// buffer view and accessor. Returns the accessor index.
    pub fn push_data(
        &mut self,
        bytes: Vec<u8>,
        component: AttributeComponent,
        ty: AttributeType,
    ) -> usize {
        let byte_length = bytes.len();
        let count = byte_length / ty.size_bytes(component);
        let buffer = self.push_buffer(bytes);
        let view = self.push_buffer_view(BufferView {
            buffer,
            byte_offset: 0,
            byte_length,
            byte_stride: None,
        });
        self.push_accessor(Accessor::new(view, component, ty, count))
    }

    /// Store `values` as an accessor of `F32` components with element shape `ty`.
    pub fn push_f32(&mut self, ty: AttributeType, values: &[f32]) -> usize {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push_data(bytes, AttributeComponent::F32, ty)
    }

    /// Store `values` as a `VEC3` accessor, declaring its min and max.
    pub fn push_vec3(&mut self, values: &[[f32; 3]]) -> usize {
        let flat: Vec<f32> = values.iter().flatten().copied().collect();
        let index = self.push_f32(AttributeType::Vec3, &flat);
        if !values.is_empty() {
            let mut min = vec![f64::INFINITY; 3];
            let mut max = vec![f64::NEG_INFINITY; 3];
            for v in values {
                for i in 0..3 {
                    min[i] = min[i].min(v[i] as f64);
                    max[i] = max[i].max(v[i] as f64);
                }
            }
            let accessor = &mut self.accessors[index];
            accessor.min = min;
            accessor.max = max;
        }
        index
    }

    pub fn push_vec2(&mut self, values: &[[f32; 2]]) -> usize {
        let flat: Vec<f32> = values.iter().flatten().copied().collect();
        self.push_f32(AttributeType::Vec2, &flat)
    }

    /// Store `values` as a `SCALAR` accessor with the given component type, truncating each value
    /// to the width of `component`.
    pub fn push_indices(&mut self, component: AttributeComponent, values: &[u32]) -> usize {
        let bytes = values
            .iter()
            .flat_map(|&v| -> Vec<u8> {
                match component {
                    AttributeComponent::I8 => (v as i8).to_le_bytes().to_vec(),
                    AttributeComponent::U8 => (v as u8).to_le_bytes().to_vec(),
                    AttributeComponent::I16 => (v as i16).to_le_bytes().to_vec(),
                    AttributeComponent::U16 => (v as u16).to_le_bytes().to_vec(),
                    AttributeComponent::U32 => v.to_le_bytes().to_vec(),
                    AttributeComponent::F32 => (v as f32).to_le_bytes().to_vec(),
                }
            })
            .collect();
        self.push_data(bytes, component, AttributeType::Scalar)
    }
}
