use hedron::{AttributeComponent, AttributeType, Mode, Semantic};

/// Why an [AccessorView](crate::accessor::AccessorView) cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessorError {
    #[error("accessor index out of range: 0..{len} ∌ {index}")]
    InvalidAccessorIndex { index: usize, len: usize },
    #[error("accessor has no buffer view")]
    MissingBufferView,
    #[error("buffer view index out of range: 0..{len} ∌ {index}")]
    InvalidBufferViewIndex { index: usize, len: usize },
    #[error("buffer index out of range: 0..{len} ∌ {index}")]
    InvalidBufferIndex { index: usize, len: usize },
    #[error("buffer view byte range {offset}+{length} exceeds buffer of {len} bytes")]
    BufferTooSmall {
        offset: usize,
        length: usize,
        len: usize,
    },
    #[error("accessor requires {needed} bytes, but its buffer view has {len}")]
    BufferViewTooSmall { needed: usize, len: usize },
    #[error("byte stride {stride} is smaller than the element size {element}")]
    InvalidStride { stride: usize, element: usize },
    #[error("expected elements of type {expected:?}, accessor has {actual:?}")]
    WrongElementType {
        expected: AttributeType,
        actual: AttributeType,
    },
    #[error("expected components of type {expected:?}, accessor has {actual:?}")]
    WrongComponentType {
        expected: AttributeComponent,
        actual: AttributeComponent,
    },
}

/// Why a [Primitive](hedron::Primitive) was skipped.
///
/// None of these are fatal to the rest of the model; sibling primitives and nodes are still
/// converted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrimitiveError {
    #[error("primitive has no POSITION attribute")]
    MissingPositions,
    #[error("invalid {semantic} accessor: {source}")]
    AccessorInvalid {
        semantic: Semantic,
        source: AccessorError,
    },
    #[error("invalid index accessor: {0}")]
    InvalidIndices(#[source] AccessorError),
    #[error("primitive mode {0:?} is not supported")]
    UnsupportedTopology(Mode),
    #[error("index component type {0:?} is not supported")]
    UnsupportedIndexType(AttributeComponent),
}
