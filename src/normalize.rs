//! Validation + normalization of the raw schema AST.
//!
//! Turns `ast::TypeExpr` into a canonical `NTy`:
//! - unordered field/variant maps become association lists sorted by key
//!   (byte-wise `str` order, locale-independent), so downstream codegen is
//!   deterministic regardless of document key order;
//! - record/variant field maps split into required vs optional (`name?` sigil,
//!   sigil stripped from the stored name);
//! - structural invariants are enforced fail-fast: the first violation in a
//!   depth-first, left-to-right walk aborts the whole declaration.
//!
//! Normalization is a pure function of the raw AST. Reference names and enum
//! variant lists pass through unchecked here; an unresolved reference surfaces
//! when the emitted module is compiled by the host toolchain.

use crate::ast::{FieldDict, SchemaDocument, TypeExpr};

/// Canonical shape after validation. Immutable for the rest of a compile.
#[derive(Debug, Clone, PartialEq)]
pub enum NTy {
    String,
    Number,
    Boolean,
    Enum { variants: Vec<String> },
    Reference { name: String },
    Array(Box<NTy>),
    Nullable(Box<NTy>),
    Dictionary(Box<NTy>),
    Tuple(Vec<NTy>),
    Record(NFields),
    Disjoint {
        tag_key: String,
        /// Variants sorted by tag value.
        variants: Vec<(String, NFields)>,
    },
}

/// Required/optional field partition, each list sorted by field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NFields {
    pub required: Vec<(String, NTy)>,
    pub optional: Vec<(String, NTy)>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("record field name is empty")]
    EmptyFieldName,
    #[error("disjoint union tag key is empty")]
    EmptyTagKey,
    #[error("nullable wraps another nullable")]
    RedundantNullable,
    #[error("tuple has no elements")]
    EmptyTuple,
}

/// Validation failure tied to the declaration it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("in declaration `{decl}`: {error}")]
pub struct SchemaError {
    pub decl: String,
    #[source]
    pub error: ValidationError,
}

pub fn normalize(ast: TypeExpr) -> Result<NTy, ValidationError> {
    match ast {
        TypeExpr::String => Ok(NTy::String),
        TypeExpr::Number => Ok(NTy::Number),
        TypeExpr::Boolean => Ok(NTy::Boolean),
        TypeExpr::Enum { variants } => Ok(NTy::Enum { variants }),
        TypeExpr::Reference { name } => Ok(NTy::Reference { name }),
        TypeExpr::Array { arg } => Ok(NTy::Array(Box::new(normalize(*arg)?))),
        TypeExpr::Dictionary { arg } => Ok(NTy::Dictionary(Box::new(normalize(*arg)?))),
        TypeExpr::Nullable { arg } => {
            let inner = normalize(*arg)?;
            if matches!(inner, NTy::Nullable(_)) {
                return Err(ValidationError::RedundantNullable);
            }
            Ok(NTy::Nullable(Box::new(inner)))
        }
        TypeExpr::Tuple { fields } => {
            if fields.is_empty() {
                return Err(ValidationError::EmptyTuple);
            }
            let elems = fields
                .into_iter()
                .map(normalize)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NTy::Tuple(elems))
        }
        TypeExpr::Record { fields } => Ok(NTy::Record(partition_fields(fields)?)),
        TypeExpr::Disjoint { tag_key, variants } => {
            if tag_key.is_empty() {
                return Err(ValidationError::EmptyTagKey);
            }
            let mut tags: Vec<(String, FieldDict)> = variants.into_iter().collect();
            tags.sort_by(|a, b| a.0.cmp(&b.0));
            let variants = tags
                .into_iter()
                .map(|(tag, fields)| Ok((tag, partition_fields(fields)?)))
                .collect::<Result<Vec<_>, ValidationError>>()?;
            Ok(NTy::Disjoint { tag_key, variants })
        }
    }
}

/// Sort the unordered field map into an association list, then split on the
/// trailing `?` sigil. Sorting before the split keeps both output lists
/// sorted: the sigil is a shared suffix among optional keys, so stripping it
/// preserves their relative order.
fn partition_fields(fields: FieldDict) -> Result<NFields, ValidationError> {
    let mut pairs: Vec<(String, TypeExpr)> = fields.into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = NFields::default();
    for (name, child) in pairs {
        if name.is_empty() {
            return Err(ValidationError::EmptyFieldName);
        }
        let ty = normalize(child)?;
        match name.strip_suffix('?') {
            Some(stripped) => {
                // a field named just "?" would store an empty name
                if stripped.is_empty() {
                    return Err(ValidationError::EmptyFieldName);
                }
                out.optional.push((stripped.to_string(), ty));
            }
            None => out.required.push((name, ty)),
        }
    }
    Ok(out)
}

/// Normalize every declaration of a document, preserving document order.
pub fn normalize_document(doc: SchemaDocument) -> Result<Vec<(String, NTy)>, SchemaError> {
    doc.into_iter()
        .map(|(decl, ast)| match normalize(ast) {
            Ok(nty) => Ok((decl, nty)),
            Err(error) => Err(SchemaError { decl, error }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(src: &str) -> TypeExpr {
        serde_json::from_str(src).unwrap()
    }

    #[test]
    fn primitives_pass_through() {
        assert_eq!(normalize(raw(r#"{"type": "string"}"#)), Ok(NTy::String));
        assert_eq!(normalize(raw(r#"{"type": "number"}"#)), Ok(NTy::Number));
        assert_eq!(normalize(raw(r#"{"type": "boolean"}"#)), Ok(NTy::Boolean));
    }

    #[test]
    fn nested_nullable_is_rejected() {
        let ast = raw(r#"{"type": "nullable", "arg": {"type": "nullable", "arg": {"type": "string"}}}"#);
        assert_eq!(normalize(ast), Err(ValidationError::RedundantNullable));
    }

    #[test]
    fn nullable_of_array_of_nullable_is_fine() {
        let ast = raw(
            r#"{"type": "nullable", "arg": {"type": "array", "arg": {"type": "nullable", "arg": {"type": "number"}}}}"#,
        );
        assert!(normalize(ast).is_ok());
    }

    #[test]
    fn empty_tuple_is_rejected() {
        let ast = raw(r#"{"type": "tuple", "fields": []}"#);
        assert_eq!(normalize(ast), Err(ValidationError::EmptyTuple));
    }

    #[test]
    fn empty_field_name_is_rejected() {
        let ast = raw(r#"{"type": "record", "fields": {"": {"type": "string"}}}"#);
        assert_eq!(normalize(ast), Err(ValidationError::EmptyFieldName));
        let ast = raw(r#"{"type": "record", "fields": {"?": {"type": "string"}}}"#);
        assert_eq!(normalize(ast), Err(ValidationError::EmptyFieldName));
    }

    #[test]
    fn empty_tag_key_is_rejected() {
        let ast = raw(r#"{"type": "disjoint", "tagKey": "", "variants": {"a": {}}}"#);
        assert_eq!(normalize(ast), Err(ValidationError::EmptyTagKey));
    }

    #[test]
    fn record_fields_partition_and_sort() {
        let ast = raw(
            r#"{"type": "record", "fields": {
                "zebra": {"type": "string"},
                "apple?": {"type": "number"},
                "mango": {"type": "boolean"},
                "banana?": {"type": "string"}
            }}"#,
        );
        let NTy::Record(fields) = normalize(ast).unwrap() else {
            panic!("expected a record");
        };
        let required: Vec<&str> = fields.required.iter().map(|(n, _)| n.as_str()).collect();
        let optional: Vec<&str> = fields.optional.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(required, vec!["mango", "zebra"]);
        assert_eq!(optional, vec!["apple", "banana"]);
    }

    #[test]
    fn disjoint_variants_sort_by_tag() {
        let ast = raw(
            r#"{"type": "disjoint", "tagKey": "kind", "variants": {
                "square": {"side": {"type": "number"}},
                "circle": {"radius": {"type": "number"}}
            }}"#,
        );
        let NTy::Disjoint { variants, .. } = normalize(ast).unwrap() else {
            panic!("expected a disjoint union");
        };
        let tags: Vec<&str> = variants.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["circle", "square"]);
    }

    #[test]
    fn first_violation_wins() {
        // the empty field name sits left of the empty tuple in the sorted walk
        let ast = raw(
            r#"{"type": "record", "fields": {
                "": {"type": "string"},
                "z": {"type": "tuple", "fields": []}
            }}"#,
        );
        assert_eq!(normalize(ast), Err(ValidationError::EmptyFieldName));
    }

    #[test]
    fn document_errors_name_the_declaration() {
        let doc: SchemaDocument = serde_json::from_str(
            r#"{"good": {"type": "string"}, "bad": {"type": "tuple", "fields": []}}"#,
        )
        .unwrap();
        let err = normalize_document(doc).unwrap_err();
        assert_eq!(err.decl, "bad");
        assert_eq!(err.error, ValidationError::EmptyTuple);
        assert_eq!(err.to_string(), "in declaration `bad`: tuple has no elements");
    }
}
