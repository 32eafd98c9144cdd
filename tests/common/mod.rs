#![allow(dead_code)]

use tilemesh::hedron::{
    AttributeComponent, AttributeType, Image, Material, Mesh, Mode, Model, Node, Primitive, Scene,
    Semantic, Texture,
};

/// Positions of a unit quad in the XY plane, in strip order.
pub const QUAD: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
];

/// Builds a model with one mesh, referenced by one node in one scene.
#[derive(Debug)]
pub struct Fixture {
    pub model: Model,
    pub primitive: Primitive,
}

impl Fixture {
    pub fn new(mode: Mode, positions: &[[f32; 3]]) -> Self {
        let mut model = Model::new();
        let pos = model.push_vec3(positions);
        Self {
            model,
            primitive: Primitive::new(mode).with_attribute(Semantic::Position, pos),
        }
    }

    pub fn indices(mut self, component: AttributeComponent, indices: &[u32]) -> Self {
        let acc = self.model.push_indices(component, indices);
        self.primitive = self.primitive.with_indices(acc);
        self
    }

    pub fn normals(mut self, normal: [f32; 3]) -> Self {
        let count = self.vertex_count();
        let acc = self.model.push_vec3(&vec![normal; count]);
        self.primitive = self.primitive.with_attribute(Semantic::Normal, acc);
        self
    }

    pub fn tangents(mut self, tangent: [f32; 4]) -> Self {
        let count = self.vertex_count();
        let flat: Vec<f32> = std::iter::repeat(tangent).take(count).flatten().collect();
        let acc = self.model.push_f32(AttributeType::Vec4, &flat);
        self.primitive = self.primitive.with_attribute(Semantic::Tangent, acc);
        self
    }

    /// Texture coordinates equal to the XY of each position, plus `offset`.
    pub fn texcoords(mut self, set: u32, offset: f32) -> Self {
        let uvs = self.planar_uvs(offset);
        let acc = self.model.push_vec2(&uvs);
        self.primitive = self.primitive.with_attribute(Semantic::Texcoord(set), acc);
        self
    }

    pub fn overlay(mut self, index: u32, offset: f32) -> Self {
        let uvs = self.planar_uvs(offset);
        let acc = self.model.push_vec2(&uvs);
        self.primitive = self.primitive.with_attribute(Semantic::Overlay(index), acc);
        self
    }

    /// Add a texture with a source image, returning its index.
    pub fn texture(&mut self) -> usize {
        let image = self.model.push_image(Image::default());
        self.model.push_texture(Texture {
            source: Some(image),
            ..Default::default()
        })
    }

    pub fn material(mut self, material: Material) -> Self {
        let index = self.model.push_material(material);
        self.primitive = self.primitive.with_material(index);
        self
    }

    pub fn vertex_count(&self) -> usize {
        let acc = self.primitive.attribute(&Semantic::Position).unwrap();
        self.model.accessors[acc].count
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        let acc = &self.model.accessors[self.primitive.attribute(&Semantic::Position).unwrap()];
        let view = &self.model.buffer_views[acc.buffer_view.unwrap()];
        let bytes = &self.model.buffers[view.buffer].as_slice()[view.byte_offset + i * 12..];
        std::array::from_fn(|c| f32::from_le_bytes(bytes[c * 4..c * 4 + 4].try_into().unwrap()))
    }

    fn planar_uvs(&self, offset: f32) -> Vec<[f32; 2]> {
        (0..self.vertex_count())
            .map(|i| {
                let [x, y, _] = self.position(i);
                [x + offset, y + offset]
            })
            .collect()
    }

    pub fn build(self) -> Model {
        let Self {
            mut model,
            primitive,
        } = self;
        let mesh = model.push_mesh(Mesh::new(vec![primitive]));
        let node = model.push_node(Node::with_mesh(mesh));
        model.push_scene(Scene {
            nodes: vec![node],
            ..Default::default()
        });
        model.scene = Some(0);
        model
    }
}
