//! Assignment of texture coordinate sets to per-vertex UV channels.

use std::collections::BTreeMap;

use hedron::{Model, Primitive, Semantic, TextureInfo};
use nalgebra::Vector2;

use crate::{
    accessor::AccessorView,
    vertex::{Corners, MAX_TEXCOORDS},
};

/// Maps the texture coordinate accessors used by one primitive onto UV channels.
///
/// The first reference to an accessor assigns it the next free channel; later references to the
/// same accessor share that channel.
#[derive(Debug, Clone, Default)]
pub struct TexcoordSlots {
    /// accessor index -> UV channel
    slots: BTreeMap<usize, u32>,
}

impl TexcoordSlots {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of channels assigned so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The channel assigned to accessor `accessor`, if any.
    #[inline]
    pub fn slot_of(&self, accessor: usize) -> Option<u32> {
        self.slots.get(&accessor).copied()
    }

    /// Assign a channel to the texture coordinates referenced by `texture`, copying them into
    /// `corners` if they haven't been already.
    ///
    /// Returns 0 if there is no texture.
    pub fn assign_texture(
        &mut self,
        model: &Model,
        primitive: &Primitive,
        texture: Option<&TextureInfo>,
        corners: &mut Corners<'_>,
    ) -> u32 {
        match texture {
            Some(info) => self.assign(
                model,
                primitive,
                &Semantic::Texcoord(info.tex_coord),
                corners,
            ),
            None => 0,
        }
    }

    /// Assign a channel to the texture coordinate attribute `semantic`, copying it into
    /// `corners` if it hasn't been already.
    ///
    /// Returns 0, and assigns nothing, if the attribute is absent or its accessor is invalid.
    pub fn assign(
        &mut self,
        model: &Model,
        primitive: &Primitive,
        semantic: &Semantic,
        corners: &mut Corners<'_>,
    ) -> u32 {
        let Some(accessor) = primitive.attribute(semantic) else {
            // texture coordinates don't matter for an unused texture
            return 0;
        };
        if let Some(slot) = self.slot_of(accessor) {
            return slot;
        }

        let view = AccessorView::<Vector2<f32>>::new(model, accessor);
        if let Err(e) = view.status() {
            tracing::warn!(%semantic, accessor, error = %e, "invalid texture coordinates");
            return 0;
        }

        let slot = self.slots.len();
        if slot >= MAX_TEXCOORDS {
            tracing::warn!(
                %semantic,
                accessor,
                max = MAX_TEXCOORDS,
                "out of texture coordinate channels"
            );
            return 0;
        }
        self.slots.insert(accessor, slot as u32);

        let _span = tracing::trace_span!("copy texture coordinates", slot).entered();
        let missing = corners.fill(&view, |corner, uv| corner.uvs[slot] = uv);
        if missing > 0 {
            tracing::debug!(%semantic, missing, "texture coordinates out of range; using (0, 0)");
        }
        slot as u32
    }
}
