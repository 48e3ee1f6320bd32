//! Module Assembler.
//!
//! One structural declaration plus one extractor per schema entry, emitted in
//! document order (forward references across declarations are legal in the
//! target binding model), wrapped in a preamble that imports exactly the
//! union of the per-declaration dependency sets.

use crate::ast::SchemaDocument;
use crate::codegen::{CallMode, Dependencies, GeneratedUnit, gen_declaration, gen_extractor};
use crate::naming;
use crate::normalize::{NTy, SchemaError, normalize_document};
use crate::templates::{indent, module_template};

/// Generate both artifacts for one declaration.
///
/// The two-argument `extractAt$X` carries the real extraction logic and is
/// what reference call sites name, so direct and mutual recursion work; the
/// exported `extract$X` seeds the path with the document root.
pub fn generate_unit(type_id: &str, ty: &NTy) -> GeneratedUnit {
    let type_name = naming::type_name(type_id);
    let declaration = format!("export type {type_name} = {}", gen_declaration(ty));

    let mut dependencies = Dependencies::new();
    let body = match ty {
        // A bare alias (`const a = b`) would read `b` before its initializer
        // runs when the target is declared later in the module, so a direct
        // reference gets eta-expanded instead.
        NTy::Reference { .. } => {
            let call = gen_extractor(&CallMode::applied("path", "x"), ty, &mut dependencies);
            format!("(path: JSONPath, x: mixed) =>\n  {call}")
        }
        _ => gen_extractor(&CallMode::Abstraction, ty, &mut dependencies),
    };

    let at_name = naming::extractor_at_name(type_id);
    let entry_name = naming::extractor_name(type_id);
    let extractor = format!(
        "const {at_name}: (path: JSONPath, x: mixed) => Result<{type_name}, ExtractionError> =\n{}\n\nexport const {entry_name} = (x: mixed): Result<{type_name}, ExtractionError> =>\n  {at_name}([], x)",
        indent(&body),
    );

    GeneratedUnit {
        declaration,
        extractor,
        dependencies,
    }
}

/// Emit the whole module: all declarations first, then all extractors, both
/// in input declaration order.
pub fn assemble(declarations: &[(String, NTy)]) -> String {
    let units: Vec<GeneratedUnit> = declarations
        .iter()
        .map(|(type_id, ty)| generate_unit(type_id, ty))
        .collect();

    let mut module_deps = Dependencies::new();
    for unit in &units {
        module_deps.extend(unit.dependencies.iter().copied());
    }
    let primitive_imports = module_deps
        .iter()
        .map(|primitive| primitive.ident())
        .collect::<Vec<_>>()
        .join(",\n");

    let type_decs = units
        .iter()
        .map(|unit| unit.declaration.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let extractors = units
        .iter()
        .map(|unit| unit.extractor.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    module_template(&primitive_imports, &type_decs, &extractors)
}

/// Raw schema document in, emitted module text out.
pub fn compile_document(doc: SchemaDocument) -> Result<String, SchemaError> {
    let declarations = normalize_document(doc)?;
    Ok(assemble(&declarations))
}
