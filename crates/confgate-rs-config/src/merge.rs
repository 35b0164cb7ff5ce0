//! Deep merge of static and environment config trees.

use serde_json::Value;

/// Merge `env` over `base`, returning a new tree.
///
/// Mappings present on both sides merge recursively; anything else (scalars,
/// arrays, or a mapping meeting a non-mapping) is replaced by the env value.
pub fn merge_configs(base: &Value, env: &Value) -> Value {
    let mut merged = base.clone();
    merge_into(&mut merged, env);
    merged
}

/// Apply `overlay` (the env side) onto `base` in place. Only object/object
/// pairs recurse; every other pairing, arrays included, takes the overlay
/// value whole, so env always wins and arrays are never concatenated.
fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}
