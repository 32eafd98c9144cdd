use std::path::Path;

use clap::Parser;
use cli::Cli;
use nalgebra::Matrix4;
use tilemesh::{
    collision::{CollisionCooker, NoCollision, ParryCooker},
    tangent::TangentGenerator,
    texture::TextureResolver,
    CreateModelOptions, ModelConverter,
};

mod cli;

fn summarize<R, C, G>(converter: &ModelConverter<R, C, G>, path: &Path, transform: &Matrix4<f64>)
where
    R: TextureResolver,
    C: CollisionCooker,
    G: TangentGenerator,
{
    let model = match hedron::de::gltf::import(path) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "could not load model");
            return;
        }
    };

    let res = converter.convert(&model, transform);
    for prim in res.primitives() {
        tracing::info!(
            name = prim.name.as_str(),
            vertices = prim.vertices.len(),
            triangles = prim.indices.len() / 3,
            index_width = ?prim.index_width,
            uv_channels = prim.vertices.uvs.len(),
            duplicated = prim.duplicated,
            colors = prim.has_vertex_colors,
            collision = prim.collision.is_some(),
            radius = prim.bounds.sphere_radius,
            "converted primitive"
        );
        tracing::debug!(
            name = prim.name.as_str(),
            texcoords = ?prim.texcoords,
            overlays = ?prim.overlay_texcoords,
            parameters = ?prim.parameters,
            "material"
        );
    }
    let skipped = res.skipped().count();
    tracing::info!(
        path = %path.display(),
        nodes = res.nodes.len(),
        primitives = res.primitives().count(),
        skipped,
        "converted model"
    );
}

pub fn main() {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.log_filter, cli.log_format);

    let options = CreateModelOptions::default()
        .with_always_include_tangents(cli.always_include_tangents)
        .with_overlay_texture_coordinate_count(cli.overlay_count);
    let transform = Matrix4::new_translation(&cli.offset);

    let converter = ModelConverter::new(options);
    if cli.collision {
        let converter = converter.with_cooker(ParryCooker);
        for path in &cli.files {
            summarize(&converter, path, &transform);
        }
    } else {
        let converter = converter.with_cooker(NoCollision);
        for path in &cli.files {
            summarize(&converter, path, &transform);
        }
    }
}
