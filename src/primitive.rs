//! Conversion of a single mesh primitive into render-ready buffers.

use std::collections::BTreeMap;

use hedron::{Material, Mesh, Model, Node, PbrMetallicRoughness, Primitive, Semantic};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::{
    attribute::{resolve, Resolved},
    bounds::{Aabb, BoundingVolume, SphereAccumulator},
    collision::{triangles, CollisionCooker},
    color::copy_colors,
    error::PrimitiveError,
    index::canonical_indices,
    material::{material_of, MaterialParameters, TextureRole, WaterMask},
    name::{material_name, primitive_name},
    options::CreateModelOptions,
    tangent::{compute_flat_normals, TangentGenerator},
    texcoord::TexcoordSlots,
    texture::{has_image, TextureResolver},
    vertex::{must_duplicate, reverse_winding, Corners, IndexWidth, VertexBuffers},
};

/// Everything needed to convert one primitive. Lives only as long as that conversion.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveContext<'m> {
    pub model: &'m Model,
    pub mesh_index: usize,
    pub mesh: &'m Mesh,
    /// `None` if the mesh isn't referenced by any node
    pub node: Option<&'m Node>,
    pub primitive_index: usize,
    pub primitive: &'m Primitive,
    /// Primitive space to world space
    pub transform: Matrix4<f64>,
}

/// The output of converting one primitive.
///
/// `H` is a texture handle and `M` a collision mesh.
#[derive(Debug, Clone)]
pub struct PrimitiveResult<H, M> {
    pub name: String,
    pub material_name: String,
    pub mesh_index: usize,
    pub primitive_index: usize,
    /// Index of the source material, if the primitive has a valid one
    pub material_index: Option<usize>,
    /// Primitive space to world space
    pub transform: Matrix4<f64>,
    pub vertices: VertexBuffers,
    /// Triangle list with left-handed winding; every index is `< vertices.len()`
    pub indices: Vec<u32>,
    pub index_width: IndexWidth,
    pub bounds: BoundingVolume,
    /// UV channel of each texture role's coordinates
    pub texcoords: BTreeMap<TextureRole, u32>,
    /// UV channel of each raster overlay's coordinates, by overlay index
    pub overlay_texcoords: Vec<u32>,
    pub parameters: MaterialParameters<H>,
    pub water: WaterMask<H>,
    pub collision: Option<M>,
    /// Whether every vertex was assigned a color from `COLOR_0`
    pub has_vertex_colors: bool,
    /// Whether each triangle corner received its own vertex
    pub duplicated: bool,
    /// The number of vertices whose source index was out of range of the `POSITION` accessor
    pub out_of_range: usize,
}

/// The collaborators a primitive conversion delegates to.
#[derive(Debug, Clone, Copy)]
pub struct Collaborators<'c, R, C, G> {
    pub options: &'c CreateModelOptions,
    pub resolver: &'c R,
    pub cooker: &'c C,
    pub generator: &'c G,
}

/// Convert `ctx.primitive`.
///
/// # Errors
///
/// Fails, without partially populating anything, if the primitive has no readable positions,
/// its indices can't be read, or its topology isn't triangles or a triangle strip.
pub fn convert<R, C, G>(
    ctx: &PrimitiveContext<'_>,
    with: Collaborators<'_, R, C, G>,
) -> Result<PrimitiveResult<R::Handle, C::Mesh>, PrimitiveError>
where
    R: TextureResolver,
    C: CollisionCooker,
    G: TangentGenerator,
{
    let PrimitiveContext {
        model, primitive, ..
    } = *ctx;
    let name = primitive_name(model, ctx.mesh_index, ctx.primitive_index);
    let _span = tracing::debug_span!("convert primitive", name = name.as_str()).entered();

    let positions = match resolve::<Point3<f32>>(model, primitive, &Semantic::Position) {
        Resolved::Valid(view) => view,
        Resolved::Absent => return Err(PrimitiveError::MissingPositions),
        Resolved::Invalid(source) => {
            return Err(PrimitiveError::AccessorInvalid {
                semantic: Semantic::Position,
                source,
            })
        }
    };
    let vertex_count = positions.size();

    let indices = canonical_indices(model, primitive, vertex_count)?;

    let normals = resolve::<Vector3<f32>>(model, primitive, &Semantic::Normal);
    if let Resolved::Invalid(e) = &normals {
        tracing::warn!(error = %e, "invalid normals; computing flat normals instead");
    }

    let default_material = Material::default();
    let material = material_of(model, primitive, &default_material);
    let default_pbr = PbrMetallicRoughness::default();
    let pbr = material
        .pbr_metallic_roughness
        .as_ref()
        .unwrap_or(&default_pbr);

    let water = WaterMask::from_extras(with.resolver, model, &primitive.extras);
    let needs_tangents = with.options.always_include_tangents
        || has_image(model, material.normal_texture.as_ref())
        || water.is_active();

    let tangents = resolve::<Vector4<f32>>(model, primitive, &Semantic::Tangent);
    if let Resolved::Invalid(e) = &tangents {
        tracing::warn!(error = %e, "invalid tangents");
    }

    let position_accessor = primitive
        .attribute(&Semantic::Position)
        .and_then(|index| model.accessors.get(index));
    let aabb = position_accessor
        .and_then(|a| Aabb::from_declared(&a.min, &a.max))
        .or_else(|| Aabb::from_points(positions.iter()))
        .unwrap_or_else(|| Aabb::new(Point3::origin(), Point3::origin()));

    let out_of_range = indices
        .iter()
        .filter(|&&i| i as usize >= vertex_count)
        .count();
    if out_of_range > 0 {
        tracing::warn!(
            out_of_range,
            vertex_count,
            "indices out of range; their vertices will be zeroed"
        );
    }

    let has_normals = normals.is_valid();
    let has_tangents = tangents.is_valid();
    let duplicated = must_duplicate(has_normals, needs_tangents, has_tangents) || out_of_range > 0;
    tracing::trace!(
        has_normals,
        has_tangents,
        needs_tangents,
        duplicated,
        "vertex layout"
    );

    let mut corners = Corners::new(&indices, vertex_count, duplicated);

    let mut sphere = SphereAccumulator::new(aabb.center());
    {
        let _span = tracing::trace_span!("copy positions").entered();
        corners.fill(&positions, |corner, p| {
            sphere.add(&p);
            corner.position = p;
        });
    }
    let bounds = BoundingVolume {
        aabb,
        sphere_radius: sphere.radius(),
    };

    let has_vertex_colors = copy_colors(model, primitive, &mut corners);

    let mut slots = TexcoordSlots::new();
    let texcoords: BTreeMap<_, _> = TextureRole::ALL
        .into_iter()
        .map(|role| {
            let slot = slots.assign_texture(model, primitive, role.info(material, pbr), &mut corners);
            (role, slot)
        })
        .collect();
    let overlay_texcoords: Vec<u32> = (0..with.options.overlay_count())
        .map(|i| slots.assign(model, primitive, &Semantic::Overlay(i as u32), &mut corners))
        .collect();

    match normals.valid() {
        Some(view) => {
            let _span = tracing::trace_span!("copy normals").entered();
            corners.fill(&view, |corner, n| corner.normal = n);
        }
        None => {
            let _span = tracing::trace_span!("compute flat normals").entered();
            compute_flat_normals(corners.as_mut_slice());
        }
    }

    if let Some(view) = tangents.valid() {
        let _span = tracing::trace_span!("copy tangents").entered();
        corners.fill(&view, |corner, t| {
            let tangent = t.xyz();
            corner.tangent = tangent;
            corner.bitangent = corner.normal.cross(&tangent) * t.w;
        });
    } else if needs_tangents {
        let _span = tracing::trace_span!("compute tangents").entered();
        if !with.generator.generate(corners.as_mut_slice()) {
            tracing::warn!("could not generate tangents; leaving them zeroed");
        }
    }

    let vertices = VertexBuffers::from_corners(corners.as_slice(), has_vertex_colors, slots.len());

    let mut indices = indices;
    {
        let _span = tracing::trace_span!("reverse winding order").entered();
        reverse_winding(&mut indices, duplicated);
    }
    let index_width = IndexWidth::for_vertex_count(vertices.len());

    let collision = if !vertices.is_empty() && !indices.is_empty() {
        let _span = tracing::trace_span!("cook collision mesh").entered();
        with.cooker.cook(&vertices.positions, &triangles(&indices))
    } else {
        None
    };

    let parameters = MaterialParameters::new(with.resolver, model, material, &texcoords, &water);

    Ok(PrimitiveResult {
        material_name: material_name(&name),
        name,
        mesh_index: ctx.mesh_index,
        primitive_index: ctx.primitive_index,
        material_index: primitive
            .material
            .filter(|&index| index < model.materials.len()),
        transform: ctx.transform,
        vertices,
        indices,
        index_width,
        bounds,
        texcoords,
        overlay_texcoords,
        parameters,
        water,
        collision,
        has_vertex_colors,
        duplicated,
        out_of_range,
    })
}

#[cfg(test)]
mod tests {
    use hedron::{AttributeComponent, Image, Mode, Texture, TextureInfo};
    use nalgebra::vector;

    use crate::{collision::NoCollision, tangent::MikkTSpace, texture::TextureIndexResolver};

    use super::*;

    fn run(
        model: &Model,
        options: &CreateModelOptions,
    ) -> Result<PrimitiveResult<usize, ()>, PrimitiveError> {
        let mesh = &model.meshes[0];
        let ctx = PrimitiveContext {
            model,
            mesh_index: 0,
            mesh,
            node: None,
            primitive_index: 0,
            primitive: &mesh.primitives[0],
            transform: Matrix4::identity(),
        };
        convert(
            &ctx,
            Collaborators {
                options,
                resolver: &TextureIndexResolver,
                cooker: &NoCollision,
                generator: &MikkTSpace,
            },
        )
    }

    fn single(model: &mut Model, primitive: Primitive) {
        model.push_mesh(Mesh::new(vec![primitive]));
    }

    #[test]
    fn missing_positions() {
        let mut model = Model::new();
        single(&mut model, Primitive::new(Mode::Triangles));
        assert_eq!(
            run(&model, &Default::default()).unwrap_err(),
            PrimitiveError::MissingPositions
        );
    }

    #[test]
    fn shared_vertices_with_normals() {
        let mut model = Model::new();
        let pos = model.push_vec3(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]]);
        let nrm = model.push_vec3(&[[0.0, 0.0, 1.0]; 4]);
        let idx = model.push_indices(AttributeComponent::U16, &[0, 1, 2, 2, 1, 3]);
        single(
            &mut model,
            Primitive::new(Mode::Triangles)
                .with_attribute(Semantic::Position, pos)
                .with_attribute(Semantic::Normal, nrm)
                .with_indices(idx),
        );

        let res = run(&model, &Default::default()).unwrap();
        assert!(!res.duplicated);
        assert_eq!(res.vertices.len(), 4);
        assert_eq!(res.indices, vec![2, 1, 0, 3, 1, 2]);
        assert_eq!(res.index_width, IndexWidth::U16);
        assert_eq!(res.vertices.normals[3], vector![0.0, 0.0, 1.0]);
        assert_eq!(res.bounds.aabb.center(), Point3::new(0.5, 0.5, 0.0));
        assert!((res.bounds.sphere_radius - 0.5f64.sqrt()).abs() < 1e-6);
        assert_eq!(res.vertices.uvs.len(), 1);
        assert_eq!(res.overlay_texcoords, vec![0, 0, 0]);
        assert!(res.texcoords.values().all(|&slot| slot == 0));
        assert_eq!(res.material_name, "glTF mesh 0 primitive 0 material");
    }

    #[test]
    fn out_of_range_indices_are_zeroed() {
        let mut model = Model::new();
        let pos = model.push_vec3(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let nrm = model.push_vec3(&[[0.0, 0.0, 1.0]; 3]);
        let idx = model.push_indices(AttributeComponent::U32, &[0, 1, 9]);
        single(
            &mut model,
            Primitive::new(Mode::Triangles)
                .with_attribute(Semantic::Position, pos)
                .with_attribute(Semantic::Normal, nrm)
                .with_indices(idx),
        );

        let res = run(&model, &Default::default()).unwrap();
        assert!(res.duplicated);
        assert_eq!(res.out_of_range, 1);
        assert_eq!(res.indices, vec![2, 1, 0]);
        assert_eq!(res.vertices.positions[2], Point3::origin());
    }

    #[test]
    fn normal_map_requires_tangents() {
        let mut model = Model::new();
        let pos = model.push_vec3(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        let nrm = model.push_vec3(&[[0.0, 0.0, 1.0]; 3]);
        let uv = model.push_vec2(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        let image = model.push_image(Image::default());
        let texture = model.push_texture(Texture {
            source: Some(image),
            ..Default::default()
        });
        let material = model.push_material(Material {
            normal_texture: Some(TextureInfo::new(texture, 0)),
            ..Default::default()
        });
        single(
            &mut model,
            Primitive::new(Mode::Triangles)
                .with_attribute(Semantic::Position, pos)
                .with_attribute(Semantic::Normal, nrm)
                .with_attribute(Semantic::Texcoord(0), uv)
                .with_material(material),
        );

        let res = run(&model, &Default::default()).unwrap();
        assert!(res.duplicated);
        assert_eq!(res.vertices.len(), 3);
        assert_eq!(res.indices, vec![2, 1, 0]);
        for t in &res.vertices.tangents {
            assert!((t - vector![1.0, 0.0, 0.0]).norm() < 1e-5, "{t:?}");
        }
        assert_eq!(res.texcoords[&TextureRole::Normal], 0);
        assert_eq!(res.parameters.textures["normalTexture"], texture);
        assert_eq!(res.material_index, Some(material));
    }

    #[test]
    fn degenerate_triangles_keep_zero_tangents() {
        let mut model = Model::new();
        let pos = model.push_vec3(&[[0.0, 0.0, 0.0]; 3]);
        let nrm = model.push_vec3(&[[0.0, 0.0, 1.0]; 3]);
        single(
            &mut model,
            Primitive::new(Mode::Triangles)
                .with_attribute(Semantic::Position, pos)
                .with_attribute(Semantic::Normal, nrm),
        );

        let options = CreateModelOptions::default().with_always_include_tangents(true);
        let res = run(&model, &options).unwrap();
        assert!(res.duplicated);
        assert_eq!(res.vertices.len(), 3);
        assert!(res.vertices.tangents.iter().all(|t| *t == Vector3::zeros()));
        assert_eq!(res.vertices.normals[0], vector![0.0, 0.0, 1.0]);
    }
}
