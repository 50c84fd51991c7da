use serde_json::Value;

pub const POKEMON_CENTER_1F: &str = "LAYOUT_POKEMON_CENTER_1F";
pub const POKEMON_CENTER_2F: &str = "LAYOUT_POKEMON_CENTER_2F";

/// The shared layout a city-specific Pokémon Center layout maps to.
pub fn generic_pokecenter_layout(layout: &str) -> Option<&'static str> {
    if !layout.contains("_POKEMON_CENTER_") {
        return None;
    }
    if layout.ends_with("_1F") {
        Some(POKEMON_CENTER_1F)
    } else if layout.ends_with("_2F") {
        Some(POKEMON_CENTER_2F)
    } else {
        None
    }
}

/// Point a Pokémon Center map at the generic layout. Returns `(old, new)` on change.
pub fn normalize_pokecenter_layout(map: &mut Value) -> Option<(String, &'static str)> {
    let current = map.get("layout").and_then(Value::as_str)?;
    let generic = generic_pokecenter_layout(current)?;
    if current == generic {
        return None;
    }
    let old = current.to_string();
    map.as_object_mut()?
        .insert("layout".to_string(), Value::String(generic.to_string()));
    Some((old, generic))
}
