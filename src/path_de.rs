use serde::de::DeserializeOwned;

/// Deserialize a schema document with JSON-path context in error messages,
/// so a malformed node reports where in the document it sits.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::SchemaDocument;

    #[test]
    fn errors_carry_the_document_path() {
        let src = r#"{"person": {"type": "record", "fields": {"age": {"type": "float"}}}}"#;
        let err = super::from_str_with_path::<SchemaDocument>(src).unwrap_err();
        assert!(err.contains("person"), "unexpected error: {err}");
    }
}
