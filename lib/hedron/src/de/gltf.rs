//! Utilities for deserializing glTF data as a [Model].
//!
//! # Notes
//!
//! * Coordinate system: right-handed, Y-up; the same as glTF. No conversion is performed here.
//! * glTF data *may* contain scenes, and it *may* specify a default scene, but these aren't required by the format.
//!   * Sceneless data will be considered a library of entity data; ex. meshes, materials
//! * Root, primitive `extras`, and the `CESIUM_RTC` extension are retained. Other extensions are dropped.
//! * Image data is not decoded.
//!
//! # See Also
//!
//! * [glTF 2.0 Spec](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html)
//! * [glTF Reference Guide](https://www.khronos.org/files/gltf20-reference-guide.pdf)

use std::path::Path;

use nalgebra::{Matrix4, Quaternion, UnitQuaternion, Vector3};
use serde_json::Value;

use crate::{
    Accessor, AttributeComponent, AttributeType, Buffer, BufferView, Extras, Image, Material,
    Mesh, Mode, Model, Node, PbrMetallicRoughness, Primitive, Scene, Semantic, Texture,
    TextureInfo,
};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Gltf(#[from] gltf::Error),
    #[error("could not re-read document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("buffer {0} has no data")]
    MissingBuffer(usize),
    #[error("accessor {index} has unsupported component type {gl}")]
    ComponentType { index: usize, gl: u32 },
}

/// Load a `.gltf` or `.glb` file, along with any buffers it references, as a [Model].
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn import(path: impl AsRef<Path>) -> Result<Model, ImportError> {
    let (document, buffers, _images) = gltf::import(path.as_ref())?;
    Model::from_gltf(&document, buffers)
}

fn f64_array(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .map(|values| values.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

fn object(value: &Value) -> Extras {
    value.as_object().cloned().unwrap_or_default()
}

fn texture_info(texture: gltf::Texture<'_>, tex_coord: u32) -> TextureInfo {
    TextureInfo::new(texture.index(), tex_coord)
}

impl Model {
    /// Convert a loaded glTF document and its buffer data into a [Model].
    ///
    /// `buffers` must be in document order, as returned by [gltf::import].
    pub fn from_gltf(
        document: &gltf::Document,
        buffers: Vec<gltf::buffer::Data>,
    ) -> Result<Self, ImportError> {
        // extras & extensions are read from the raw JSON, which the wrapper API doesn't expose
        // uniformly
        let json = serde_json::to_value(document.as_json())?;

        let mut buffers: Vec<Option<Buffer>> =
            buffers.into_iter().map(|d| Some(Buffer::from(d.0))).collect();
        let buffers = (0..document.buffers().len())
            .map(|i| {
                buffers
                    .get_mut(i)
                    .and_then(Option::take)
                    .ok_or(ImportError::MissingBuffer(i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let buffer_views = document
            .views()
            .map(|view| BufferView {
                buffer: view.buffer().index(),
                byte_offset: view.offset(),
                byte_length: view.length(),
                byte_stride: view.stride(),
            })
            .collect();

        let accessors = document
            .accessors()
            .map(|acc| {
                let gl = acc.data_type().as_gl_enum();
                let component = AttributeComponent::from_gl(gl).ok_or(
                    ImportError::ComponentType {
                        index: acc.index(),
                        gl,
                    },
                )?;
                let ty = match acc.dimensions() {
                    gltf::accessor::Dimensions::Scalar => AttributeType::Scalar,
                    gltf::accessor::Dimensions::Vec2 => AttributeType::Vec2,
                    gltf::accessor::Dimensions::Vec3 => AttributeType::Vec3,
                    gltf::accessor::Dimensions::Vec4 => AttributeType::Vec4,
                    gltf::accessor::Dimensions::Mat2 => AttributeType::Mat2,
                    gltf::accessor::Dimensions::Mat3 => AttributeType::Mat3,
                    gltf::accessor::Dimensions::Mat4 => AttributeType::Mat4,
                };
                let raw = &json["accessors"][acc.index()];
                Ok(Accessor {
                    name: acc.name().map(str::to_owned),
                    buffer_view: acc.view().map(|v| v.index()),
                    byte_offset: acc.offset(),
                    component,
                    ty,
                    count: acc.count(),
                    normalized: acc.normalized(),
                    min: f64_array(&raw["min"]),
                    max: f64_array(&raw["max"]),
                })
            })
            .collect::<Result<Vec<_>, ImportError>>()?;

        let meshes = document
            .meshes()
            .map(|mesh| Mesh {
                name: mesh.name().map(str::to_owned),
                primitives: mesh
                    .primitives()
                    .map(|prim| {
                        let attributes = prim
                            .attributes()
                            .map(|(semantic, acc)| {
                                // infallible
                                let semantic = semantic
                                    .to_string()
                                    .parse::<Semantic>()
                                    .unwrap_or_else(|e| match e {});
                                (semantic, acc.index())
                            })
                            .collect();
                        Primitive {
                            mode: Mode::from_gl(prim.mode().as_gl_enum()).unwrap_or_default(),
                            indices: prim.indices().map(|acc| acc.index()),
                            attributes,
                            material: prim.material().index(),
                            extras: object(
                                &json["meshes"][mesh.index()]["primitives"][prim.index()]
                                    ["extras"],
                            ),
                        }
                    })
                    .collect(),
            })
            .collect();

        let materials = document
            .materials()
            .map(|mat| {
                let pbr = mat.pbr_metallic_roughness();
                Material {
                    name: mat.name().map(str::to_owned),
                    pbr_metallic_roughness: Some(PbrMetallicRoughness {
                        base_color_factor: pbr.base_color_factor().map(f64::from).to_vec(),
                        metallic_factor: pbr.metallic_factor() as f64,
                        roughness_factor: pbr.roughness_factor() as f64,
                        base_color_texture: pbr
                            .base_color_texture()
                            .map(|i| texture_info(i.texture(), i.tex_coord())),
                        metallic_roughness_texture: pbr
                            .metallic_roughness_texture()
                            .map(|i| texture_info(i.texture(), i.tex_coord())),
                    }),
                    normal_texture: mat
                        .normal_texture()
                        .map(|i| texture_info(i.texture(), i.tex_coord())),
                    occlusion_texture: mat
                        .occlusion_texture()
                        .map(|i| texture_info(i.texture(), i.tex_coord())),
                    emissive_texture: mat
                        .emissive_texture()
                        .map(|i| texture_info(i.texture(), i.tex_coord())),
                    emissive_factor: mat.emissive_factor().map(f64::from).to_vec(),
                }
            })
            .collect();

        let textures = document
            .textures()
            .map(|tex| Texture {
                name: tex.name().map(str::to_owned),
                source: Some(tex.source().index()),
                sampler: tex.sampler().index(),
            })
            .collect();

        let images = document
            .images()
            .map(|img| {
                let (uri, mime_type) = match img.source() {
                    gltf::image::Source::Uri { uri, mime_type } => {
                        (Some(uri.to_owned()), mime_type.map(str::to_owned))
                    }
                    gltf::image::Source::View { mime_type, .. } => {
                        (None, Some(mime_type.to_owned()))
                    }
                };
                Image {
                    name: img.name().map(str::to_owned),
                    uri,
                    mime_type,
                }
            })
            .collect();

        let nodes = document
            .nodes()
            .map(|node| {
                let mut res = Node {
                    name: node.name().map(str::to_owned),
                    children: node.children().map(|c| c.index()).collect(),
                    mesh: node.mesh().map(|m| m.index()),
                    ..Default::default()
                };
                match node.transform() {
                    gltf::scene::Transform::Matrix { matrix } => {
                        res.matrix = Some(Matrix4::from_fn(|r, c| matrix[c][r] as f64));
                    }
                    gltf::scene::Transform::Decomposed {
                        translation: [tx, ty, tz],
                        rotation: [x, y, z, w],
                        scale: [sx, sy, sz],
                    } => {
                        res.translation = Some(nalgebra::vector![tx, ty, tz].cast::<f64>());
                        res.rotation = Some(UnitQuaternion::from_quaternion(
                            Quaternion::new(w, x, y, z).cast::<f64>(),
                        ));
                        res.scale = Some(nalgebra::vector![sx, sy, sz].cast::<f64>());
                    }
                }
                res
            })
            .collect();

        let scenes = document
            .scenes()
            .map(|scene| Scene {
                name: scene.name().map(str::to_owned),
                nodes: scene.nodes().map(|n| n.index()).collect(),
            })
            .collect();

        let rtc_center = match f64_array(&json["extensions"]["CESIUM_RTC"]["center"])[..] {
            [x, y, z] => Some(Vector3::new(x, y, z)),
            _ => None,
        };

        tracing::debug!(
            nodes = document.nodes().len(),
            meshes = document.meshes().len(),
            accessors = document.accessors().len(),
            rtc = rtc_center.is_some(),
            "imported glTF document"
        );

        Ok(Self {
            scene: document.default_scene().map(|s| s.index()),
            scenes,
            nodes,
            meshes,
            materials,
            textures,
            images,
            accessors,
            buffer_views,
            buffers,
            rtc_center,
            extras: object(&json["extras"]),
        })
    }
}
