//! Named material parameters for a converted primitive.

use std::collections::BTreeMap;

use hedron::{Extras, Material, Model, PbrMetallicRoughness, Primitive, TextureInfo};
use nalgebra::Vector3;
use serde_json::Value;

use crate::texture::{load_texture, load_texture_info, TextureResolver};

/// A texture slot of a glTF material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureRole {
    BaseColor,
    MetallicRoughness,
    Normal,
    Occlusion,
    Emissive,
}

impl TextureRole {
    /// Every role, in the order their texture coordinates are assigned to UV channels.
    pub const ALL: [TextureRole; 5] = [
        TextureRole::BaseColor,
        TextureRole::MetallicRoughness,
        TextureRole::Normal,
        TextureRole::Occlusion,
        TextureRole::Emissive,
    ];

    /// Name of the texture parameter.
    pub const fn texture_parameter(self) -> &'static str {
        match self {
            TextureRole::BaseColor => "baseColorTexture",
            TextureRole::MetallicRoughness => "metallicRoughnessTexture",
            TextureRole::Normal => "normalTexture",
            TextureRole::Occlusion => "occlusionTexture",
            TextureRole::Emissive => "emissiveTexture",
        }
    }

    /// Name of the scalar parameter holding the UV channel of this role's texture.
    pub const fn coordinate_parameter(self) -> &'static str {
        match self {
            TextureRole::BaseColor => "baseColorTextureCoordinateIndex",
            TextureRole::MetallicRoughness => "metallicRoughnessTextureCoordinateIndex",
            TextureRole::Normal => "normalTextureCoordinateIndex",
            TextureRole::Occlusion => "occlusionTextureCoordinateIndex",
            TextureRole::Emissive => "emissiveTextureCoordinateIndex",
        }
    }

    /// The texture bound to this role, if any.
    pub fn info<'a>(
        self,
        material: &'a Material,
        pbr: &'a PbrMetallicRoughness,
    ) -> Option<&'a TextureInfo> {
        match self {
            TextureRole::BaseColor => pbr.base_color_texture.as_ref(),
            TextureRole::MetallicRoughness => pbr.metallic_roughness_texture.as_ref(),
            TextureRole::Normal => material.normal_texture.as_ref(),
            TextureRole::Occlusion => material.occlusion_texture.as_ref(),
            TextureRole::Emissive => material.emissive_texture.as_ref(),
        }
    }
}

/// Water rendering settings read from a primitive's extras.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterMask<H> {
    pub only_water: bool,
    pub only_land: bool,
    /// Present only when the mask is in use
    pub texture: Option<H>,
    pub translation_x: f64,
    pub translation_y: f64,
    pub scale: f64,
}

impl<H> Default for WaterMask<H> {
    fn default() -> Self {
        Self {
            only_water: false,
            only_land: true,
            texture: None,
            translation_x: 0.0,
            translation_y: 0.0,
            scale: 1.0,
        }
    }
}

impl<H> WaterMask<H> {
    /// Whether the mask texture decides between land and water.
    #[inline]
    pub fn uses_mask(&self) -> bool {
        !self.only_water && !self.only_land
    }

    /// Whether any part of the primitive is water. Water animates its normal in tangent space,
    /// so this requires tangents.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.only_water || self.uses_mask()
    }

    /// Whether the renderer should use its water-capable material.
    #[inline]
    pub fn uses_water_material(&self) -> bool {
        self.only_water || !self.only_land
    }
}

impl<H> WaterMask<H> {
    /// Read the water settings of `extras`.
    ///
    /// `OnlyWater` and `OnlyLand` are only respected if both are booleans. The mask transform is
    /// only respected if all of `WaterMaskTranslationX`, `WaterMaskTranslationY`, and
    /// `WaterMaskScale` are numbers.
    pub fn from_extras<R>(resolver: &R, model: &Model, extras: &Extras) -> Self
    where
        R: TextureResolver<Handle = H>,
    {
        let mut res = Self::default();

        if let (Some(only_water), Some(only_land)) = (
            extras.get("OnlyWater").and_then(Value::as_bool),
            extras.get("OnlyLand").and_then(Value::as_bool),
        ) {
            res.only_water = only_water;
            res.only_land = only_land;
            if res.uses_mask() {
                res.texture = extras
                    .get("WaterMaskTex")
                    .and_then(Value::as_u64)
                    .and_then(|index| usize::try_from(index).ok())
                    .filter(|&index| index < model.textures.len())
                    .and_then(|index| load_texture(resolver, model, index));
            }
        }

        if let (Some(x), Some(y), Some(scale)) = (
            extras.get("WaterMaskTranslationX").and_then(Value::as_f64),
            extras.get("WaterMaskTranslationY").and_then(Value::as_f64),
            extras.get("WaterMaskScale").and_then(Value::as_f64),
        ) {
            res.translation_x = x;
            res.translation_y = y;
            res.scale = scale;
        }

        res
    }
}

/// Named values for a renderer's material instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParameters<H> {
    pub scalars: BTreeMap<&'static str, f64>,
    pub vectors: BTreeMap<&'static str, Vector3<f64>>,
    pub textures: BTreeMap<&'static str, H>,
}

impl<H> Default for MaterialParameters<H> {
    fn default() -> Self {
        Self {
            scalars: BTreeMap::new(),
            vectors: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }
}

impl<H: Clone> MaterialParameters<H> {
    /// Collect the parameters of `material`, given the UV channel assigned to each texture role.
    pub fn new<R>(
        resolver: &R,
        model: &Model,
        material: &Material,
        texcoords: &BTreeMap<TextureRole, u32>,
        water: &WaterMask<H>,
    ) -> Self
    where
        R: TextureResolver<Handle = H>,
    {
        let default_pbr = PbrMetallicRoughness::default();
        let pbr = material
            .pbr_metallic_roughness
            .as_ref()
            .unwrap_or(&default_pbr);

        let mut res = Self::default();

        for (role, slot) in texcoords {
            res.scalars.insert(role.coordinate_parameter(), *slot as f64);
        }

        if let [r, g, b, ..] = pbr.base_color_factor[..] {
            res.vectors
                .insert("baseColorFactor", Vector3::new(r, g, b));
        }
        res.scalars.insert("metallicFactor", pbr.metallic_factor);
        res.scalars.insert("roughnessFactor", pbr.roughness_factor);
        res.scalars.insert("opacityMask", 1.0);

        for role in TextureRole::ALL {
            if let Some(handle) = load_texture_info(resolver, model, role.info(material, pbr)) {
                res.textures.insert(role.texture_parameter(), handle);
            }
        }

        if let [r, g, b, ..] = material.emissive_factor[..] {
            res.vectors.insert("emissiveFactor", Vector3::new(r, g, b));
        } else if res
            .textures
            .contains_key(TextureRole::Emissive.texture_parameter())
        {
            // the default factor of zero would hide the texture
            res.vectors
                .insert("emissiveFactor", Vector3::new(1.0, 1.0, 1.0));
        }

        res.scalars
            .insert("OnlyLand", if water.only_land { 1.0 } else { 0.0 });
        res.scalars
            .insert("OnlyWater", if water.only_water { 1.0 } else { 0.0 });
        if water.uses_mask() {
            if let Some(texture) = &water.texture {
                res.textures.insert("WaterMask", texture.clone());
            }
        }
        res.vectors.insert(
            "WaterMaskTranslationScale",
            Vector3::new(water.translation_x, water.translation_y, water.scale),
        );

        res
    }
}

/// The material of `primitive`, or the default material if it has none or it doesn't exist.
pub fn material_of<'m>(model: &'m Model, primitive: &Primitive, default: &'m Material) -> &'m Material {
    primitive
        .material
        .and_then(|index| model.materials.get(index))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use hedron::{Image, Texture};
    use serde_json::json;

    use crate::texture::TextureIndexResolver;

    use super::*;

    fn extras(value: Value) -> Extras {
        value.as_object().cloned().unwrap()
    }

    fn textured_model() -> Model {
        let mut model = Model::new();
        let image = model.push_image(Image::default());
        for _ in 0..2 {
            model.push_texture(Texture {
                source: Some(image),
                ..Default::default()
            });
        }
        model
    }

    #[test]
    fn water_flags_need_both_booleans() {
        let model = textured_model();
        let r = TextureIndexResolver;

        let water =
            WaterMask::from_extras(&r, &model, &extras(json!({ "OnlyWater": true })));
        assert_eq!(water, WaterMask::default());
        assert!(!water.is_active() && !water.uses_water_material());

        let water = WaterMask::from_extras(
            &r,
            &model,
            &extras(json!({ "OnlyWater": true, "OnlyLand": false })),
        );
        assert!(water.only_water && water.is_active() && !water.uses_mask());
        assert!(water.uses_water_material());
    }

    #[test]
    fn water_mask_texture() {
        let model = textured_model();
        let r = TextureIndexResolver;
        let water = WaterMask::from_extras(
            &r,
            &model,
            &extras(json!({
                "OnlyWater": false,
                "OnlyLand": false,
                "WaterMaskTex": 1,
                "WaterMaskTranslationX": 0.5,
                "WaterMaskTranslationY": 0.25,
                "WaterMaskScale": 2.0,
            })),
        );
        assert!(water.uses_mask() && water.is_active());
        assert_eq!(water.texture, Some(1));
        assert_eq!((water.translation_x, water.translation_y, water.scale), (0.5, 0.25, 2.0));

        // the mask is still in use, even without a texture
        let water = WaterMask::from_extras(
            &r,
            &model,
            &extras(json!({ "OnlyWater": false, "OnlyLand": false, "WaterMaskTex": 7 })),
        );
        assert!(water.is_active());
        assert_eq!(water.texture, None);
    }

    #[test]
    fn parameters() {
        let model = textured_model();
        let r = TextureIndexResolver;
        let material = Material {
            emissive_texture: Some(TextureInfo::new(1, 0)),
            emissive_factor: vec![],
            pbr_metallic_roughness: Some(PbrMetallicRoughness {
                base_color_factor: vec![0.5, 0.25, 1.0, 1.0],
                base_color_texture: Some(TextureInfo::new(0, 0)),
                metallic_factor: 0.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        let texcoords = BTreeMap::from([
            (TextureRole::BaseColor, 0),
            (TextureRole::Emissive, 1),
        ]);
        let params = MaterialParameters::new(&r, &model, &material, &texcoords, &WaterMask::default());

        assert_eq!(params.scalars["baseColorTextureCoordinateIndex"], 0.0);
        assert_eq!(params.scalars["emissiveTextureCoordinateIndex"], 1.0);
        assert_eq!(params.scalars["metallicFactor"], 0.0);
        assert_eq!(params.scalars["roughnessFactor"], 1.0);
        assert_eq!(params.scalars["opacityMask"], 1.0);
        assert_eq!(params.scalars["OnlyLand"], 1.0);
        assert_eq!(params.vectors["baseColorFactor"], Vector3::new(0.5, 0.25, 1.0));
        assert_eq!(params.vectors["emissiveFactor"], Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(params.textures["baseColorTexture"], 0);
        assert_eq!(params.textures["emissiveTexture"], 1);
        assert!(!params.textures.contains_key("WaterMask"));
        assert!(!params.textures.contains_key("normalTexture"));
    }
}
