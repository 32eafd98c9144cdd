//! Human-readable names for converted primitives.

use hedron::Model;

/// The longest name produced by [safe_name] by default.
pub const MAX_NAME_LENGTH: usize = 256;

/// Shorten `s` to at most `max` characters by replacing its middle with `...`.
pub fn constrain_length(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_owned();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let prefix = (max - 3 + 1) / 2;
    let suffix = (max - 3) / 2;
    let mut res: String = s.chars().take(prefix).collect();
    res.push_str("...");
    res.extend(s.chars().skip(len - suffix));
    res
}

/// Join `prefix` and `suffix`, shortening `prefix` so that the result has at most `max`
/// characters.
pub fn safe_name(prefix: &str, suffix: &str, max: usize) -> String {
    let mut res = constrain_length(prefix, max.saturating_sub(suffix.chars().count()));
    res.push_str(suffix);
    res
}

/// `"<source> mesh <m> primitive <p>"`, where the source is the tile URL recorded in the
/// model's extras, or `glTF`.
pub fn primitive_name(model: &Model, mesh: usize, primitive: usize) -> String {
    let source = match model
        .extras
        .get("Cesium3DTiles_TileUrl")
        .and_then(serde_json::Value::as_str)
    {
        Some(url) => constrain_length(url, MAX_NAME_LENGTH),
        None => "glTF".to_owned(),
    };
    format!("{source} mesh {mesh} primitive {primitive}")
}

/// The name of the material instance created for the primitive named `primitive_name`.
#[inline]
pub fn material_name(primitive_name: &str) -> String {
    safe_name(primitive_name, " material", MAX_NAME_LENGTH)
}
