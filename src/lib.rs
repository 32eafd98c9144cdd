//! Conversion of glTF-shaped [Models](hedron::Model) into render-ready geometry: flat vertex
//! buffers, left-handed triangle lists, bounding volumes, UV channel assignments, material
//! parameters, and collision meshes.
//!
//! Conversion is pure; it reads an immutable model and produces a result owned by the caller,
//! so it may run on any thread. See [ModelConverter].
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod accessor;
pub mod attribute;
pub mod bounds;
pub mod collision;
pub mod color;
mod converter;
pub mod error;
pub mod index;
pub mod material;
pub mod name;
mod options;
pub mod primitive;
pub mod scene;
pub mod tangent;
pub mod texcoord;
pub mod texture;
pub mod vertex;

pub use converter::*;
pub use error::{AccessorError, PrimitiveError};
pub use options::*;
pub use primitive::{PrimitiveContext, PrimitiveResult};

pub use hedron;
