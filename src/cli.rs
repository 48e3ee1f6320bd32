//! Minimal CLI: schema document(s) → (check | compile)
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ast::SchemaDocument;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile declarative schema documents into typed validating extractors
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate schema documents without emitting anything
    Check(CheckTarget),
    /// compile schema documents into a module of declarations + extractors
    Compile(CompileTarget),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct CheckTarget {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(Args, Debug)]
struct CompileTarget {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .js file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Load every input file and merge their declarations into one document.
    /// Declaration identifiers must be unique across the whole module.
    fn load_document(&self) -> anyhow::Result<SchemaDocument> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut document = SchemaDocument::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read schema file {source_path:?}"))?;
            let declarations: SchemaDocument = crate::path_de::from_str_with_path(&source)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid schema document {source_path:?}"))?;
            for (identifier, type_expr) in declarations {
                if document.contains_key(&identifier) {
                    bail!(
                        "declaration `{identifier}` defined more than once (second definition in {source_path:?})"
                    );
                }
                document.insert(identifier, type_expr);
            }
        }
        Ok(document)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Check(target) => {
                let document = target.input_settings.load_document()?;
                let declarations = crate::normalize::normalize_document(document)?;
                eprintln!("ok: {} declarations", declarations.len());
                Ok(())
            }
            Command::Compile(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let document = target.input_settings.load_document()?;
                let module_src = crate::assemble::compile_document(document)?;

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        if !parent.as_os_str().is_empty() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("failed to create {parent:?}"))?;
                        }
                    }
                    std::fs::write(out, &module_src)
                        .with_context(|| format!("failed to write {out:?}"))?;
                } else {
                    println!("{module_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            // Treat as a glob pattern
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
