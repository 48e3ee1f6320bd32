// Raw schema AST as parsed from a schema document. No serde_json::Value past this point.

use indexmap::IndexMap;
use serde::Deserialize;

/// Unvalidated field map of a record or of one disjoint-union variant.
/// Key order follows the source document and carries no meaning.
pub type FieldDict = IndexMap<String, TypeExpr>;

/// One raw type expression. The `type` tag set is closed; anything else is a
/// deserialization error, not a fall-through.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeExpr {
    String,
    Number,
    Boolean,
    Enum { variants: Vec<String> },
    Reference { name: String },
    Array { arg: Box<TypeExpr> },
    Nullable { arg: Box<TypeExpr> },
    Dictionary { arg: Box<TypeExpr> },
    Tuple { fields: Vec<TypeExpr> },
    Record { fields: FieldDict },
    Disjoint {
        #[serde(rename = "tagKey")]
        tag_key: String,
        variants: IndexMap<String, FieldDict>,
    },
}

/// A schema document: declaration identifier → raw type expression.
/// Insertion order is preserved so emitted declarations follow source order.
pub type SchemaDocument = IndexMap<String, TypeExpr>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_closed_tag_set() {
        let src = r#"{
            "shape": {
                "type": "disjoint",
                "tagKey": "kind",
                "variants": {
                    "circle": { "radius": { "type": "number" } },
                    "square": { "side": { "type": "number" } }
                }
            },
            "tags": { "type": "array", "arg": { "type": "string" } }
        }"#;
        let doc: SchemaDocument = serde_json::from_str(src).unwrap();
        assert_eq!(doc.len(), 2);
        assert!(matches!(doc["shape"], TypeExpr::Disjoint { .. }));
        assert!(matches!(doc["tags"], TypeExpr::Array { .. }));
    }

    #[test]
    fn document_order_is_preserved() {
        let src = r#"{ "b": { "type": "string" }, "a": { "type": "number" } }"#;
        let doc: SchemaDocument = serde_json::from_str(src).unwrap();
        let ids: Vec<&str> = doc.keys().map(|k| k.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let src = r#"{ "type": "quaternion" }"#;
        assert!(serde_json::from_str::<TypeExpr>(src).is_err());
    }
}
