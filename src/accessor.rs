//! Typed, bounds-checked reads of accessor data.

use std::marker::PhantomData;

use hedron::{Accessor, Attribute, Model};

use crate::error::AccessorError;

/// A read-only view of the elements described by an [Accessor], interpreted as `T`.
///
/// Validity is determined once, on construction. An invalid view has a [size](Self::size) of
/// zero, and every read from it returns `None`.
#[derive(Debug, Clone)]
pub struct AccessorView<'m, T> {
    /// Bytes from the first element onward
    data: &'m [u8],
    stride: usize,
    count: usize,
    status: Result<(), AccessorError>,
    _ty: PhantomData<T>,
}

impl<'m, T: Attribute> AccessorView<'m, T> {
    /// Construct a view of the accessor at `index` within `model`.
    pub fn new(model: &'m Model, index: usize) -> Self {
        match model.accessors.get(index) {
            Some(accessor) => Self::from_accessor(model, accessor),
            None => Self::invalid(AccessorError::InvalidAccessorIndex {
                index,
                len: model.accessors.len(),
            }),
        }
    }

    pub fn from_accessor(model: &'m Model, accessor: &Accessor) -> Self {
        match Self::locate(model, accessor) {
            Ok((data, stride)) => Self {
                data,
                stride,
                count: accessor.count,
                status: Ok(()),
                _ty: PhantomData,
            },
            Err(e) => Self::invalid(e),
        }
    }

    #[inline]
    pub fn invalid(error: AccessorError) -> Self {
        Self {
            data: &[],
            stride: 0,
            count: 0,
            status: Err(error),
            _ty: PhantomData,
        }
    }

    /// Find the bytes of the first element and the distance between elements.
    fn locate(model: &'m Model, accessor: &Accessor) -> Result<(&'m [u8], usize), AccessorError> {
        if accessor.ty != T::TYPE {
            return Err(AccessorError::WrongElementType {
                expected: T::TYPE,
                actual: accessor.ty,
            });
        }
        if accessor.component != T::COMPONENT {
            return Err(AccessorError::WrongComponentType {
                expected: T::COMPONENT,
                actual: accessor.component,
            });
        }

        let view_index = accessor
            .buffer_view
            .ok_or(AccessorError::MissingBufferView)?;
        let view =
            model
                .buffer_views
                .get(view_index)
                .ok_or(AccessorError::InvalidBufferViewIndex {
                    index: view_index,
                    len: model.buffer_views.len(),
                })?;
        let buffer = model
            .buffers
            .get(view.buffer)
            .ok_or(AccessorError::InvalidBufferIndex {
                index: view.buffer,
                len: model.buffers.len(),
            })?;

        let element = accessor.element_size();
        let stride = view.byte_stride.unwrap_or(element);
        if stride < element {
            return Err(AccessorError::InvalidStride { stride, element });
        }

        let view_bytes = view
            .byte_offset
            .checked_add(view.byte_length)
            .and_then(|end| buffer.as_slice().get(view.byte_offset..end))
            .ok_or(AccessorError::BufferTooSmall {
                offset: view.byte_offset,
                length: view.byte_length,
                len: buffer.len(),
            })?;

        // the last element needs only `element` bytes, not a full stride
        let needed = match accessor.count {
            0 => accessor.byte_offset,
            n => stride
                .checked_mul(n - 1)
                .and_then(|b| b.checked_add(element))
                .and_then(|b| b.checked_add(accessor.byte_offset))
                .unwrap_or(usize::MAX),
        };
        if needed > view_bytes.len() {
            return Err(AccessorError::BufferViewTooSmall {
                needed,
                len: view_bytes.len(),
            });
        }

        Ok((&view_bytes[accessor.byte_offset..], stride))
    }

    #[inline]
    pub fn status(&self) -> Result<(), &AccessorError> {
        self.status.as_ref().copied()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.status.is_ok()
    }

    /// The number of readable elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Read the element at `index`, or `None` if `index >= self.size()`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.count {
            return None;
        }
        // within bounds, as checked by `locate`
        Some(T::read_le(&self.data[index * self.stride..]))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        (0..self.count).map(|i| T::read_le(&self.data[i * self.stride..]))
    }
}
