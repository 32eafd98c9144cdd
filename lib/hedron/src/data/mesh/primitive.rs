use std::collections::HashMap;

pub mod attribute;

use attribute::Semantic;

/// The topology of a [Primitive].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    Points = 0,
    Lines = 1,
    LineLoop = 2,
    LineStrip = 3,
    #[default]
    Triangles = 4,
    TriangleStrip = 5,
    TriangleFan = 6,
}

impl Mode {
    #[inline]
    pub const fn to_gl(self) -> u32 {
        self as u32
    }

    pub const fn from_gl(val: u32) -> Option<Self> {
        match val {
            0 => Some(Mode::Points),
            1 => Some(Mode::Lines),
            2 => Some(Mode::LineLoop),
            3 => Some(Mode::LineStrip),
            4 => Some(Mode::Triangles),
            5 => Some(Mode::TriangleStrip),
            6 => Some(Mode::TriangleFan),
            _ => None,
        }
    }
}

/// One drawable batch of geometry within a [Mesh](super::Mesh).
#[derive(Debug, Clone, Default)]
pub struct Primitive {
    /// The method by which vertices are interpreted as topological primitives
    pub mode: Mode,
    /// Accessor holding the index of each vertex. If `None`, equivalent to [0, 1, 2, 3, ...]
    pub indices: Option<usize>,
    /// Accessor of each vertex attribute
    pub attributes: HashMap<Semantic, usize>,
    /// Material with which this primitive is rendered
    pub material: Option<usize>,
    /// Application-specific data
    pub extras: serde_json::Map<String, serde_json::Value>,
    // ignoring morph targets for now
}

impl Primitive {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    #[inline]
    pub fn attribute(&self, semantic: &Semantic) -> Option<usize> {
        self.attributes.get(semantic).copied()
    }

    pub fn with_attribute(mut self, semantic: Semantic, accessor: usize) -> Self {
        self.attributes.insert(semantic, accessor);
        self
    }

    pub fn with_indices(mut self, accessor: usize) -> Self {
        self.indices = Some(accessor);
        self
    }

    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_extra(mut self, key: &str, value: serde_json::Value) -> Self {
        self.extras.insert(key.to_owned(), value);
        self
    }
}
