//! Recursive-descent emitters over the normalized AST.
//!
//! Two generators share `NTy`: `gen_declaration` emits the structural type
//! declaration, `gen_extractor` emits the validating extractor. Extractor
//! code comes out in one of two call modes:
//! - `Abstraction`: a standalone, nameable `(path, x) => ...` value;
//! - `Application`: the same validator applied to caller-supplied path and
//!   value expressions, skipping the closure where the call site is known.
//!
//! Both modes validate identically; the split only avoids redundant closure
//! wrapping in deeply nested schemas. Every generation step records the
//! runtime primitives it referenced, so the assembler can import exactly the
//! transitive closure a module needs.

use std::collections::BTreeSet;

use crate::naming;
use crate::normalize::{NFields, NTy};
use crate::templates::{
    TagLiteral, disjoint_template, enum_template, record_dec_template, record_template,
    tuple_dec_template, tuple_res_declaration, tuple_template, wrapped_call,
};

/// Runtime primitives the emitted module may import from `./extractors`.
/// Declaration order doubles as import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Primitive {
    ExtractString,
    ExtractNumber,
    ExtractBoolean,
    ExtractMixedArray,
    ExtractMixedObject,
    ExtractArrayOf,
    ExtractDictionaryOf,
    ExtractNullableOf,
    ExtractFromKey,
}

impl Primitive {
    pub fn ident(self) -> &'static str {
        match self {
            Primitive::ExtractString => "extractString",
            Primitive::ExtractNumber => "extractNumber",
            Primitive::ExtractBoolean => "extractBoolean",
            Primitive::ExtractMixedArray => "extractMixedArray",
            Primitive::ExtractMixedObject => "extractMixedObject",
            Primitive::ExtractArrayOf => "extractArrayOf",
            Primitive::ExtractDictionaryOf => "extractDictionaryOf",
            Primitive::ExtractNullableOf => "extractNullableOf",
            Primitive::ExtractFromKey => "extractFromKey",
        }
    }
}

pub type Dependencies = BTreeSet<Primitive>;

/// How the emitted extractor will be consumed.
#[derive(Debug, Clone)]
pub enum CallMode {
    /// Standalone `(path, x) => ...` value.
    Abstraction,
    /// Inlined against caller-supplied path/value expressions.
    Application { path: String, value: String },
}

impl CallMode {
    pub fn applied(path: impl Into<String>, value: impl Into<String>) -> Self {
        CallMode::Application {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Emission result for one declaration.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub declaration: String,
    pub extractor: String,
    pub dependencies: Dependencies,
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

pub fn gen_declaration(ty: &NTy) -> String {
    match ty {
        NTy::String => "string".to_string(),
        NTy::Number => "number".to_string(),
        NTy::Boolean => "boolean".to_string(),
        NTy::Enum { variants } => variants
            .iter()
            .map(|literal| format!("\"{literal}\""))
            .collect::<Vec<_>>()
            .join(" | "),
        NTy::Reference { name } => naming::type_name(name),
        NTy::Array(elem) => format!("Array<{}>", gen_declaration(elem)),
        // double-nullable is rejected upstream, so one level of wrapping suffices
        NTy::Nullable(elem) => format!("null | {}", gen_declaration(elem)),
        NTy::Dictionary(value) => format!("{{[key: string]: {}}}", gen_declaration(value)),
        NTy::Tuple(elems) => {
            tuple_dec_template(&elems.iter().map(gen_declaration).collect::<Vec<_>>())
        }
        NTy::Record(fields) => record_declaration(fields, None),
        NTy::Disjoint { tag_key, variants } => variants
            .iter()
            .map(|(tag, fields)| {
                let tag = TagLiteral { key: tag_key, value: tag.as_str() };
                format!("| {}", record_declaration(fields, Some(tag)))
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Required fields first, then optional fields marked with `?`; each group is
/// already sorted by the normalizer. A variant tag leads the field list.
fn record_declaration(fields: &NFields, tag: Option<TagLiteral<'_>>) -> String {
    let mut decs: Vec<String> = Vec::new();
    if let Some(tag) = tag {
        decs.push(format!("{}: \"{}\"", tag.key, tag.value));
    }
    for (name, ty) in &fields.required {
        decs.push(format!("{name}: {}", gen_declaration(ty)));
    }
    for (name, ty) in &fields.optional {
        decs.push(format!("{name}?: {}", gen_declaration(ty)));
    }
    record_dec_template(&decs)
}

// ————————————————————————————————————————————————————————————————————————————
// EXTRACTORS
// ————————————————————————————————————————————————————————————————————————————

pub fn gen_extractor(mode: &CallMode, ty: &NTy, deps: &mut Dependencies) -> String {
    match ty {
        NTy::String => primitive_call(mode, Primitive::ExtractString, deps),
        NTy::Number => primitive_call(mode, Primitive::ExtractNumber, deps),
        NTy::Boolean => primitive_call(mode, Primitive::ExtractBoolean, deps),
        NTy::Enum { variants } => {
            deps.insert(Primitive::ExtractString);
            apply_abstraction(mode, enum_template(variants))
        }
        NTy::Array(elem) => wrapper_call(mode, Primitive::ExtractArrayOf, elem, deps),
        NTy::Nullable(elem) => wrapper_call(mode, Primitive::ExtractNullableOf, elem, deps),
        NTy::Dictionary(value) => wrapper_call(mode, Primitive::ExtractDictionaryOf, value, deps),
        NTy::Tuple(elems) => {
            deps.insert(Primitive::ExtractMixedArray);
            let res_statements = elems
                .iter()
                .enumerate()
                .map(|(index, elem)| {
                    let applied =
                        CallMode::applied(format!("[...path, {index}]"), format!("arr[{index}]"));
                    tuple_res_declaration(index, &gen_extractor(&applied, elem, deps))
                })
                .collect::<Vec<_>>()
                .join("\n");
            apply_abstraction(mode, tuple_template(elems.len(), &res_statements))
        }
        NTy::Record(fields) => {
            let body = record_body(fields, None, deps);
            apply_abstraction(
                mode,
                format!("(path: JSONPath, x: mixed) =>\n{}", crate::templates::indent(&body)),
            )
        }
        NTy::Disjoint { tag_key, variants } => {
            // tag dispatch always pulls a string out of the object
            deps.insert(Primitive::ExtractMixedObject);
            deps.insert(Primitive::ExtractFromKey);
            deps.insert(Primitive::ExtractString);
            let variant_extractors = variants
                .iter()
                .map(|(tag, fields)| {
                    let literal = TagLiteral { key: tag_key, value: tag.as_str() };
                    (tag.clone(), record_body(fields, Some(literal), deps))
                })
                .collect::<Vec<_>>();
            apply_abstraction(mode, disjoint_template(&variant_extractors, tag_key))
        }
        NTy::Reference { name } => {
            let id = naming::extractor_at_name(name);
            match mode {
                CallMode::Abstraction => id,
                CallMode::Application { path, value } => format!("{id}({path}, {value})"),
            }
        }
    }
}

fn primitive_call(mode: &CallMode, primitive: Primitive, deps: &mut Dependencies) -> String {
    deps.insert(primitive);
    let id = primitive.ident();
    match mode {
        CallMode::Abstraction => id.to_string(),
        CallMode::Application { path, value } => format!("{id}({path}, {value})"),
    }
}

/// Array / nullable / dictionary all delegate to a combinator primitive with
/// the child extractor bound as the first argument.
fn wrapper_call(
    mode: &CallMode,
    primitive: Primitive,
    child: &NTy,
    deps: &mut Dependencies,
) -> String {
    deps.insert(primitive);
    let child_code = gen_extractor(&CallMode::Abstraction, child, deps);
    match mode {
        CallMode::Abstraction => format!(
            "(path: JSONPath, x: mixed) => {}",
            wrapped_call(primitive.ident(), &child_code, "path", "x")
        ),
        CallMode::Application { path, value } => {
            wrapped_call(primitive.ident(), &child_code, path, value)
        }
    }
}

/// Shared by records and disjoint variants: child extractors are generated in
/// abstraction mode and handed to the record template as `(key, code)` pairs.
fn record_body(fields: &NFields, tag: Option<TagLiteral<'_>>, deps: &mut Dependencies) -> String {
    deps.insert(Primitive::ExtractMixedObject);
    if !fields.required.is_empty() || !fields.optional.is_empty() {
        deps.insert(Primitive::ExtractFromKey);
    }
    let required = fields
        .required
        .iter()
        .map(|(name, ty)| (name.clone(), gen_extractor(&CallMode::Abstraction, ty, deps)))
        .collect::<Vec<_>>();
    let optional = fields
        .optional
        .iter()
        .map(|(name, ty)| (name.clone(), gen_extractor(&CallMode::Abstraction, ty, deps)))
        .collect::<Vec<_>>();
    record_template(&required, &optional, tag)
}

/// Application mode for shapes that genuinely need both arguments bound in a
/// scope of their own: the abstraction gets applied at the call site.
fn apply_abstraction(mode: &CallMode, abstraction: String) -> String {
    match mode {
        CallMode::Abstraction => abstraction,
        CallMode::Application { path, value } => format!("({abstraction})({path}, {value})"),
    }
}
