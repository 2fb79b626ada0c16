//! Recursive state merge.
//!
//! Component state is an arbitrary nested mapping ([`serde_json::Value`]).
//! A partial update merges key-by-key: where the existing value is absent
//! or scalar it is overwritten, where it is composite (object or array)
//! the merge recurses into it. Arrays merge index-by-index, extending when
//! the partial is longer. A non-composite current state is replaced
//! wholesale.

use serde_json::Value;

/// Merge `partial` into `state` in place.
pub(crate) fn merge(state: &mut Value, partial: Value) {
    if !is_composite(state) {
        *state = partial;
        return;
    }
    merge_into(state, partial);
}

fn is_composite(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn merge_into(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(dst), Value::Object(src)) => {
            for (key, value) in src {
                if let Some(existing) = dst.get_mut(&key) {
                    if is_composite(existing) {
                        merge_into(existing, value);
                    } else {
                        *existing = value;
                    }
                    continue;
                }
                dst.insert(key, value);
            }
        }
        (Value::Array(dst), Value::Array(src)) => {
            for (index, value) in src.into_iter().enumerate() {
                if index < dst.len() {
                    let existing = &mut dst[index];
                    if is_composite(existing) {
                        merge_into(existing, value);
                    } else {
                        *existing = value;
                    }
                } else {
                    dst.push(value);
                }
            }
        }
        // Composite target patched with a scalar or a mismatched
        // composite: no keys to walk, nothing changes.
        _ => {}
    }
}

// =============================================================================
// Tests
// =============================================================================
