use crate::primitive::attribute::{AttributeComponent, AttributeType};

/// A data blob which can be accessed through [BufferViews](BufferView)
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    pub data: Vec<u8>,
}

impl Buffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

/// A byte range of a [Buffer]
#[derive(Debug, Clone, Default)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Distance in bytes between the starts of consecutive elements. If `None`, elements are
    /// tightly packed.
    pub byte_stride: Option<usize>,
}

/// A typed, shaped description of a range of a [BufferView].
///
/// Nothing about an accessor is validated on construction; it may reference missing views,
/// disagree with the size of its buffer, or describe an element size larger than its stride.
#[derive(Debug, Clone)]
pub struct Accessor {
    pub name: Option<String>,
    /// If `None`, the accessor has no data (ex. sparse accessors without a base view)
    pub buffer_view: Option<usize>,
    /// Offset in bytes relative to the start of the buffer view
    pub byte_offset: usize,
    pub component: AttributeComponent,
    pub ty: AttributeType,
    pub count: usize,
    pub normalized: bool,
    /// Per-component minimum; empty if undeclared
    pub min: Vec<f64>,
    /// Per-component maximum; empty if undeclared
    pub max: Vec<f64>,
}

impl Accessor {
    pub fn new(
        buffer_view: usize,
        component: AttributeComponent,
        ty: AttributeType,
        count: usize,
    ) -> Self {
        Self {
            name: None,
            buffer_view: Some(buffer_view),
            byte_offset: 0,
            component,
            ty,
            count,
            normalized: false,
            min: Vec::new(),
            max: Vec::new(),
        }
    }

    /// Size in bytes of a single element.
    #[inline]
    pub const fn element_size(&self) -> usize {
        self.ty.size_bytes(self.component)
    }
}
