use serde_json::Value;

/// Deep-merge `overlay` into `base`.
///
/// Objects merge key by key, recursively. Any other overlay value (arrays
/// included) replaces the base value outright, so later documents win.
pub fn merge_documents(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_documents(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_later_document_wins() {
        let mut base = json!({
            "info": { "title": "A", "version": "1" },
            "paths": { "/a": { "get": {} } }
        });
        merge_documents(
            &mut base,
            json!({
                "info": { "title": "B" },
                "paths": { "/b": { "get": {} } }
            }),
        );
        assert_eq!(base["info"]["title"], "B");
        assert_eq!(base["info"]["version"], "1");
        assert!(base["paths"].get("/a").is_some());
        assert!(base["paths"].get("/b").is_some());
    }

    #[test]
    fn test_arrays_replace() {
        let mut base = json!({ "tags": ["a", "b"] });
        merge_documents(&mut base, json!({ "tags": ["c"] }));
        assert_eq!(base, json!({ "tags": ["c"] }));
    }

    #[test]
    fn test_key_order_preserved() {
        let mut base = json!({ "z": 1, "a": 2 });
        merge_documents(&mut base, json!({ "m": 3 }));
        let keys: Vec<&String> = base.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
