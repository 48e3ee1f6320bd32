//! Low-level text assembly for the emitted module.
//!
//! Stateless string templates: indentation helpers plus the sequence shapes
//! for tuples, records, disjoint unions, enums, and the module wrapper. The
//! codegen engine layers semantics (recursion, call modes, dependency
//! tracking) on top of these.

const ONE_INDENT: &str = "  ";

/// Prefix every line with one indent level.
pub fn indent(code: &str) -> String {
    code.lines()
        .map(|line| format!("{ONE_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indent every line except the first to `level`. Used when splicing a
/// multi-line fragment into a position that already carries its own prefix.
pub fn indent_to_level(level: usize, code: &str) -> String {
    let pad = ONE_INDENT.repeat(level);
    code.lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Literal discriminant injected ahead of a variant's own fields.
#[derive(Debug, Clone, Copy)]
pub struct TagLiteral<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

// ————————————————————————————————————————————————————————————————————————————
// EXTRACTOR SHAPES
// ————————————————————————————————————————————————————————————————————————————

/// Combinator call with the element extractor bound first,
/// `extractArrayOf(<child>, <path>, <x>)` and friends.
pub fn wrapped_call(primitive: &str, child: &str, path_stmt: &str, value_stmt: &str) -> String {
    format!(
        "{primitive}(\n{},\n  {path_stmt},\n  {value_stmt}\n)",
        indent(child)
    )
}

/// Enum membership: extract a string, test it against the literal set.
pub fn enum_template(variants: &[String]) -> String {
    let checks = variants
        .iter()
        .map(|literal| format!("s === '{literal}'"))
        .collect::<Vec<_>>()
        .join(" || ");
    let list = variants
        .iter()
        .map(|literal| format!("\"{literal}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "(path: JSONPath, x: mixed) => andThen(\n  extractString(path, x),\n  (s) => ({checks})\n    ? Ok(s)\n    : Err({{path, message: `String value \"${{s}}\" is not one of: {list}.`}})\n)"
    )
}

/// Tuple extraction: arity check first, then one `res{i}` statement per
/// position, then an `andThen` chain that only assembles the tuple once
/// every position has succeeded.
pub fn tuple_template(arity: usize, res_statements: &str) -> String {
    format!(
        "(path: JSONPath, x: mixed) => andThen(\n  extractMixedArray(path, x),\n  (arr) => {{\n    if (arr.length !== {arity}) {{\n      return Err({{path, message: `Expected {arity} elements, received ${{arr.length}}.`}})\n    }}\n\n    {res}\n    return {ret}\n  }}\n)",
        res = indent_to_level(2, res_statements),
        ret = indent_to_level(2, &tuple_return_chain(arity)),
    )
}

pub fn tuple_res_declaration(index: usize, stmt: &str) -> String {
    format!("const res{index} = {stmt}")
}

fn tuple_final_ok(arity: usize) -> String {
    let elements = (0..arity)
        .map(|index| format!("el{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Ok([{elements}])")
}

fn tuple_return_chain(arity: usize) -> String {
    let mut chain = tuple_final_ok(arity);
    for index in (0..arity).rev() {
        chain = format!(
            "andThen(\n  res{index},\n  (el{index}) =>\n{})",
            indent(&indent(&chain))
        );
    }
    chain
}

/// Body of a record extractor, over bound `path`/`x` identifiers. Required
/// fields are checked first and short-circuit on the first failure; optional
/// fields merge into the accumulator only when the key is present on the
/// input object (an absent key is omitted, never nulled).
pub fn record_template(
    required: &[(String, String)],
    optional: &[(String, String)],
    tag: Option<TagLiteral<'_>>,
) -> String {
    let mut assignments: Vec<String> = Vec::new();
    if let Some(tag) = tag {
        assignments.push(format!("{}: '{}'", tag.key, tag.value));
    }
    for (index, (key, _)) in required.iter().enumerate() {
        assignments.push(format!("{key}: reqField{index}.data"));
    }
    let rec_init = if assignments.is_empty() {
        "let rec = {}".to_string()
    } else {
        format!("let rec = {{\n{}\n}}", indent(&assignments.join(",\n")))
    };

    let mut body_parts: Vec<String> = Vec::new();
    if !required.is_empty() {
        body_parts.push(
            required
                .iter()
                .enumerate()
                .map(|(index, (key, code))| required_field_statement(index, key, code))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    body_parts.push(rec_init);
    if !optional.is_empty() {
        body_parts.push(
            optional
                .iter()
                .enumerate()
                .map(|(index, (key, code))| optional_field_statement(index, key, code))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    body_parts.push("return Ok(rec)".to_string());
    let body = body_parts.join("\n");

    format!(
        "andThen(\n  extractMixedObject(path, x),\n  (obj) => {{\n    {}\n  }}\n)",
        indent_to_level(2, &body)
    )
}

fn required_field_statement(index: usize, key: &str, extractor_code: &str) -> String {
    format!(
        "const reqField{index} = extractFromKey(\n  {},\n  path,\n  '{key}',\n  obj\n)\nif (reqField{index}.tag === 'Err') return reqField{index}",
        indent_to_level(1, extractor_code)
    )
}

fn optional_field_statement(index: usize, key: &str, extractor_code: &str) -> String {
    format!(
        "if (obj.hasOwnProperty('{key}')) {{\n  const optField{index} = extractFromKey(\n    {},\n    path,\n    '{key}',\n    obj\n  )\n  if (optField{index}.tag === 'Ok') {{\n    rec = {{...rec, {key}: optField{index}.data}}\n  }} else {{\n    return optField{index}\n  }}\n}}",
        indent_to_level(2, extractor_code)
    )
}

/// Tag dispatch: bind one extractor per variant, pull the tag string out of
/// the object, then try each known tag in declared (sorted) order. An unknown
/// tag fails at `[...path, tagKey]` listing every legal value.
pub fn disjoint_template(variant_extractors: &[(String, String)], tag_key: &str) -> String {
    let variant_fns = variant_extractors
        .iter()
        .enumerate()
        .map(|(index, (_, body))| {
            format!(
                "const exVariant{index} = (path: JSONPath, x: mixed) =>\n{}",
                indent(body)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let conds = variant_extractors
        .iter()
        .enumerate()
        .map(|(index, (tag, _))| {
            format!("if (tag === '{tag}') {{\n  return exVariant{index}(path, obj)\n}}")
        })
        .collect::<Vec<_>>()
        .join("\n");
    let valid = variant_extractors
        .iter()
        .map(|(tag, _)| format!("\"{tag}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "(path: JSONPath, x: mixed) => {{\n  {fns}\n  return andThen(\n    extractMixedObject(path, x),\n    (obj) => andThen(\n      extractFromKey(extractString, path, '{tag_key}', obj),\n      (tag) => {{\n        {conds}\n        return Err({{path: [...path, '{tag_key}'], message: `Expected one of the following: {valid}. Received \"${{tag}}\".`}})\n      }}\n    )\n  )\n}}",
        fns = indent_to_level(1, &variant_fns),
        conds = indent_to_level(4, &conds),
    )
}

// ————————————————————————————————————————————————————————————————————————————
// DECLARATION SHAPES
// ————————————————————————————————————————————————————————————————————————————

pub fn tuple_dec_template(field_decs: &[String]) -> String {
    format!("[\n  {}\n]", indent_to_level(1, &field_decs.join(",\n")))
}

pub fn record_dec_template(field_decs: &[String]) -> String {
    if field_decs.is_empty() {
        return "{}".to_string();
    }
    format!("{{\n  {}\n}}", indent_to_level(1, &field_decs.join(",\n")))
}

// ————————————————————————————————————————————————————————————————————————————
// MODULE WRAPPER
// ————————————————————————————————————————————————————————————————————————————

/// Wrap declarations and extractors with the import preamble.
/// `primitive_imports` lists only the runtime primitives actually used; an
/// empty list drops the `./extractors` import entirely.
pub fn module_template(primitive_imports: &str, type_decs: &str, extractors: &str) -> String {
    let mut out = String::from("/* @flow */\n\n");
    out.push_str("import { Ok, Err, andThen, type Result } from './result'\n");
    if !primitive_imports.is_empty() {
        out.push_str(&format!(
            "import {{\n{}\n}} from './extractors'\n",
            indent(primitive_imports)
        ));
    }
    out.push_str(
        "\ntype JSONPath = Array<string | number>\n\ntype ExtractionError = {|\n  +path: JSONPath,\n  +message: string\n|}\n\n",
    );
    out.push_str(type_decs);
    out.push_str("\n\n");
    out.push_str(extractors);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_prefixes_every_line() {
        assert_eq!(indent("a\nb"), "  a\n  b");
    }

    #[test]
    fn indent_to_level_skips_the_first_line() {
        assert_eq!(indent_to_level(2, "a\nb\nc"), "a\n    b\n    c");
    }

    #[test]
    fn tuple_chain_nests_left_to_right() {
        let code = tuple_template(2, "const res0 = A\nconst res1 = B");
        assert!(code.contains("if (arr.length !== 2)"));
        assert!(code.contains("Expected 2 elements, received ${arr.length}."));
        // el0 binds outside el1 so the final Ok sees both
        let el0 = code.find("(el0) =>").unwrap();
        let el1 = code.find("(el1) =>").unwrap();
        let ok = code.find("Ok([el0, el1])").unwrap();
        assert!(el0 < el1 && el1 < ok);
    }

    #[test]
    fn record_with_no_fields_still_builds_an_accumulator() {
        let code = record_template(&[], &[], None);
        assert!(code.contains("let rec = {}"));
        assert!(code.contains("return Ok(rec)"));
    }

    #[test]
    fn record_tag_is_injected_ahead_of_required_fields() {
        let required = vec![("radius".to_string(), "extractNumber".to_string())];
        let code = record_template(
            &required,
            &[],
            Some(TagLiteral { key: "kind", value: "circle" }),
        );
        let tag = code.find("kind: 'circle'").unwrap();
        let field = code.find("radius: reqField0.data").unwrap();
        assert!(tag < field);
    }

    #[test]
    fn unknown_tag_error_lists_every_variant() {
        let variants = vec![
            ("circle".to_string(), "CIRCLE_BODY".to_string()),
            ("square".to_string(), "SQUARE_BODY".to_string()),
        ];
        let code = disjoint_template(&variants, "kind");
        assert!(code.contains("extractFromKey(extractString, path, 'kind', obj)"));
        assert!(code.contains(
            "Err({path: [...path, 'kind'], message: `Expected one of the following: \"circle\", \"square\". Received \"${tag}\".`})"
        ));
    }

    #[test]
    fn module_preamble_omits_empty_primitive_imports() {
        let with = module_template("extractString", "export type A = string", "const x = 1");
        assert!(with.contains("import {\n  extractString\n} from './extractors'"));
        let without = module_template("", "export type A = string", "const x = 1");
        assert!(!without.contains("./extractors"));
    }
}
