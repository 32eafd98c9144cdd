use hedron::{Model, TextureInfo};

/// Turns a texture of a [Model] into something a renderer can load.
///
/// Conversion may run on any thread, so implementations must not touch thread-bound renderer
/// state; a handle should describe work to finish later, on the thread that consumes the
/// converted primitive.
pub trait TextureResolver: Send + Sync {
    type Handle: Clone + Send + Sync + std::fmt::Debug;

    /// Resolve `model.textures[texture]`, which is guaranteed to exist.
    fn resolve(&self, model: &Model, texture: usize) -> Option<Self::Handle>;
}

/// Resolves each texture to its own index, if it has a source image.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureIndexResolver;

impl TextureResolver for TextureIndexResolver {
    type Handle = usize;

    fn resolve(&self, model: &Model, texture: usize) -> Option<usize> {
        let source = model.textures.get(texture)?.source?;
        (source < model.images.len()).then_some(texture)
    }
}

/// Resolve the texture at `index`, warning if it doesn't exist.
pub fn load_texture<R: TextureResolver>(
    resolver: &R,
    model: &Model,
    index: usize,
) -> Option<R::Handle> {
    if index >= model.textures.len() {
        tracing::warn!(
            index,
            len = model.textures.len(),
            "texture index out of range"
        );
        return None;
    }
    resolver.resolve(model, index)
}

/// Resolve the texture referenced by `info`, if any.
#[inline]
pub fn load_texture_info<R: TextureResolver>(
    resolver: &R,
    model: &Model,
    info: Option<&TextureInfo>,
) -> Option<R::Handle> {
    load_texture(resolver, model, info?.index)
}

/// Whether `info` refers to a texture with an existing source image.
pub fn has_image(model: &Model, info: Option<&TextureInfo>) -> bool {
    info.and_then(|info| model.textures.get(info.index))
        .and_then(|texture| texture.source)
        .is_some_and(|source| source < model.images.len())
}
