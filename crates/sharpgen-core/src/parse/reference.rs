use serde::Deserialize;

/// A `$ref` to a reusable component, or the component written inline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Item(T),
}

impl<T> RefOr<T> {
    pub fn reference(&self) -> Option<&str> {
        match self {
            RefOr::Ref { ref_path } => Some(ref_path),
            RefOr::Item(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::operation::Parameter;

    #[test]
    fn test_reference_tried_before_inline() {
        let r: RefOr<Parameter> =
            serde_json::from_str(r##"{"$ref": "#/components/parameters/Limit"}"##).unwrap();
        assert_eq!(r.reference(), Some("#/components/parameters/Limit"));

        let inline: RefOr<Parameter> =
            serde_json::from_str(r#"{"name": "limit", "in": "query"}"#).unwrap();
        assert!(matches!(inline, RefOr::Item(p) if p.name == "limit" && !p.required));
    }
}
