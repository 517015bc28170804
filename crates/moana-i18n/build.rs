//! Validates the Fluent catalogs under `locales/` at compile time.
//!
//! Every `locales/<lang>/bot.ftl` must parse, and every locale must define
//! the same message keys with the same variables as `nl-NL`.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use fluent_syntax::ast::{Entry, Expression, InlineExpression, Pattern, PatternElement};
use fluent_syntax::parser::parse;

const REFERENCE_LOCALE: &str = "nl-NL";
const CATALOG_FILE: &str = "bot.ftl";

type Catalog = BTreeMap<String, BTreeSet<String>>;

fn collect_catalog(content: &str) -> Result<Catalog, String> {
    let resource = parse(content).map_err(|(_, errors)| format!("parse errors: {errors:?}"))?;

    let mut catalog = Catalog::new();
    for entry in resource.body {
        if let Entry::Message(message) = entry {
            let mut variables = BTreeSet::new();
            if let Some(pattern) = &message.value {
                collect_pattern(pattern, &mut variables);
            }
            for attribute in &message.attributes {
                collect_pattern(&attribute.value, &mut variables);
            }
            catalog.insert(message.id.name.to_string(), variables);
        }
    }
    Ok(catalog)
}

fn collect_pattern(pattern: &Pattern<&str>, variables: &mut BTreeSet<String>) {
    for element in &pattern.elements {
        if let PatternElement::Placeable { expression } = element {
            collect_expression(expression, variables);
        }
    }
}

fn collect_expression(expression: &Expression<&str>, variables: &mut BTreeSet<String>) {
    match expression {
        Expression::Select { selector, variants } => {
            collect_inline(selector, variables);
            for variant in variants {
                collect_pattern(&variant.value, variables);
            }
        }
        Expression::Inline(inline) => collect_inline(inline, variables),
    }
}

fn collect_inline(expression: &InlineExpression<&str>, variables: &mut BTreeSet<String>) {
    match expression {
        InlineExpression::VariableReference { id } => {
            variables.insert(id.name.to_string());
        }
        InlineExpression::FunctionReference { arguments, .. } => {
            for argument in &arguments.positional {
                collect_inline(argument, variables);
            }
            for argument in &arguments.named {
                collect_inline(&argument.value, variables);
            }
        }
        InlineExpression::Placeable { expression } => collect_expression(expression, variables),
        InlineExpression::MessageReference { .. }
        | InlineExpression::TermReference { .. }
        | InlineExpression::StringLiteral { .. }
        | InlineExpression::NumberLiteral { .. } => {}
    }
}

fn find_catalogs(locales_dir: &Path) -> Result<BTreeMap<String, PathBuf>, String> {
    let entries = fs::read_dir(locales_dir)
        .map_err(|e| format!("cannot read {}: {e}", locales_dir.display()))?;

    let mut catalogs = BTreeMap::new();
    for entry in entries {
        let path = entry.map_err(|e| format!("cannot read locale entry: {e}"))?.path();
        let file = path.join(CATALOG_FILE);
        if !file.is_file() {
            continue;
        }
        let locale = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| format!("invalid locale directory {}", path.display()))?;
        catalogs.insert(locale.to_string(), file);
    }
    Ok(catalogs)
}

fn validate() -> Result<(), String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| "CARGO_MANIFEST_DIR not set")?;
    let locales_dir = Path::new(&manifest_dir).join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let mut catalogs = BTreeMap::new();
    for (locale, path) in find_catalogs(&locales_dir)? {
        println!("cargo:rerun-if-changed={}", path.display());
        let content =
            fs::read_to_string(&path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let catalog = collect_catalog(&content).map_err(|e| format!("{locale}: {e}"))?;
        catalogs.insert(locale, catalog);
    }

    let reference = catalogs
        .get(REFERENCE_LOCALE)
        .ok_or_else(|| format!("reference locale {REFERENCE_LOCALE} is missing"))?;

    let mut problems = Vec::new();
    for (locale, catalog) in &catalogs {
        for (key, variables) in reference {
            match catalog.get(key) {
                None => problems.push(format!("{locale}: missing message '{key}'")),
                Some(found) if found != variables => problems.push(format!(
                    "{locale}: variables of '{key}' differ, expected {variables:?} found {found:?}"
                )),
                Some(_) => {}
            }
        }
        for key in catalog.keys().filter(|key| !reference.contains_key(*key)) {
            problems.push(format!("{locale}: unexpected message '{key}'"));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

fn main() {
    if let Err(e) = validate() {
        eprintln!("Locale validation failed:\n{e}");
        process::exit(1);
    }
}
