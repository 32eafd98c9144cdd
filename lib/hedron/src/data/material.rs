/// Reference from a material to a [Texture], with the texture coordinate set used to sample it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureInfo {
    pub index: usize,
    /// `n` in `TEXCOORD_n`
    pub tex_coord: u32,
}

impl TextureInfo {
    #[inline]
    pub const fn new(index: usize, tex_coord: u32) -> Self {
        Self { index, tex_coord }
    }
}

#[derive(Debug, Clone)]
pub struct PbrMetallicRoughness {
    /// Linear RGBA; has four components when well-formed
    pub base_color_factor: Vec<f64>,
    pub metallic_factor: f64,
    pub roughness_factor: f64,
    pub base_color_texture: Option<TextureInfo>,
    pub metallic_roughness_texture: Option<TextureInfo>,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: vec![1.0; 4],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: None,
            metallic_roughness_texture: None,
        }
    }
}

/// Surface appearance of a [Primitive](crate::Primitive).
///
/// See the [glTF material reference](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html#materials).
#[derive(Debug, Clone)]
pub struct Material {
    pub name: Option<String>,
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    pub normal_texture: Option<TextureInfo>,
    pub occlusion_texture: Option<TextureInfo>,
    pub emissive_texture: Option<TextureInfo>,
    /// Linear RGB; has three components when well-formed
    pub emissive_factor: Vec<f64>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            pbr_metallic_roughness: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: vec![0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Texture {
    pub name: Option<String>,
    /// Index of the [Image] sampled by this texture
    pub source: Option<usize>,
    pub sampler: Option<usize>,
}

/// Image data is not retained; only enough to identify the source.
#[derive(Debug, Clone, Default)]
pub struct Image {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub mime_type: Option<String>,
}
