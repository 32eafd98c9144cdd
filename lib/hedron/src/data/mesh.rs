pub mod primitive;

/// A set of [Primitives](primitive::Primitive) drawn together.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<primitive::Primitive>,
}

impl Mesh {
    pub fn new(primitives: Vec<primitive::Primitive>) -> Self {
        Self {
            name: None,
            primitives,
        }
    }
}
