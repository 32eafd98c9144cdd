//! Deserialization of model data from various storage formats.

#[cfg(feature = "de_gltf")]
pub mod gltf;
