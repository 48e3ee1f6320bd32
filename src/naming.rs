//! Identifier canonicalization for emitted code.

/// `person` → `Person`. The identifier is used as-is past the first character.
pub fn type_name(type_id: &str) -> String {
    let mut chars = type_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Exported single-argument extractor, e.g. `extract$Person`. The `$` keeps
/// generated names disjoint from the fixed runtime primitive names.
pub fn extractor_name(type_id: &str) -> String {
    format!("extract${}", type_name(type_id))
}

/// Internal two-argument extractor used at reference call sites,
/// e.g. `extractAt$Person`.
pub fn extractor_at_name(type_id: &str) -> String {
    format!("extractAt${}", type_name(type_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_only_the_first_character() {
        assert_eq!(type_name("person"), "Person");
        assert_eq!(type_name("blogPost"), "BlogPost");
        assert_eq!(type_name("Person"), "Person");
    }

    #[test]
    fn extractor_names_are_parallel() {
        assert_eq!(extractor_name("person"), "extract$Person");
        assert_eq!(extractor_at_name("person"), "extractAt$Person");
    }
}
