//! Options merging
//!
//! Objects merge key by key. Arrays merge index by index: matching object
//! entries merge, other entries are replaced, extra entries are appended.
//! Any other value overwrites.

use serde_json::Value;

/// Merge `extension` into `base` in place
pub fn merge_into(base: &mut Value, extension: &Value) {
    match (base, extension) {
        (Value::Object(base), Value::Object(extension)) => {
            for (key, value) in extension {
                match base.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(extension)) => {
            for (index, value) in extension.iter().enumerate() {
                match base.get_mut(index) {
                    Some(existing) if existing.is_object() && value.is_object() => merge_into(existing, value),
                    Some(existing) => *existing = value.clone(),
                    None => base.push(value.clone()),
                }
            }
        }
        (base, extension) => *base = extension.clone(),
    }
}

/// Merge every layer over `base`, later layers winning
pub fn config_merge<'a>(base: &Value, layers: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut merged = base.clone();
    for layer in layers {
        merge_into(&mut merged, layer);
    }
    merged
}
