use crate::{material::TextureRole, vertex::MAX_TEXCOORDS};

/// The most raster overlay texture coordinate sets that can be mapped, leaving a UV channel for
/// every material texture role.
pub const MAX_OVERLAY_TEXCOORDS: usize = MAX_TEXCOORDS - TextureRole::ALL.len();

/// Options shared by every primitive of a model conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateModelOptions {
    /// Generate tangents even for primitives without a normal map.
    pub always_include_tangents: bool,
    /// The number of raster overlay texture coordinate sets (`_CESIUMOVERLAY_n`) to map to UV
    /// channels. Sets past [MAX_OVERLAY_TEXCOORDS] are not mapped.
    pub overlay_texture_coordinate_count: usize,
}

impl Default for CreateModelOptions {
    fn default() -> Self {
        Self {
            always_include_tangents: false,
            overlay_texture_coordinate_count: 3,
        }
    }
}

impl CreateModelOptions {
    pub fn with_always_include_tangents(mut self, value: bool) -> Self {
        self.always_include_tangents = value;
        self
    }

    pub fn with_overlay_texture_coordinate_count(mut self, count: usize) -> Self {
        if count > MAX_OVERLAY_TEXCOORDS {
            tracing::warn!(
                count,
                max = MAX_OVERLAY_TEXCOORDS,
                "too many overlay texture coordinate sets"
            );
        }
        self.overlay_texture_coordinate_count = count.min(MAX_OVERLAY_TEXCOORDS);
        self
    }

    /// The number of overlay texture coordinate sets that will be mapped.
    #[inline]
    pub fn overlay_count(&self) -> usize {
        self.overlay_texture_coordinate_count
            .min(MAX_OVERLAY_TEXCOORDS)
    }
}
