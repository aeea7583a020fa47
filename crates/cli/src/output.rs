use crate::error::CliError;
use compiler::{
    Backend, CompileContext,
    context::DEFAULT_MAX_DEPTH,
    document::{OBJECT_CLASS, attribute_cardinality},
};
use model::{Cardinality, Filter, SchemaMetadataProvider};
use serde::Serialize;

#[derive(Serialize)]
struct Report {
    backend: &'static str,
    expression: String,
    consistency: bool,
}

pub fn print_compiled<B: Backend>(
    backend: &B,
    filter: &Filter,
    ctx: &CompileContext<'_>,
    as_json: bool,
) -> Result<(), CliError> {
    let compiled = backend.compile(filter, ctx)?;

    if as_json {
        let report = Report {
            backend: backend.name(),
            expression: compiled.expression.to_string(),
            consistency: compiled.consistency,
        };
        let json = serde_json::to_string_pretty(&report).map_err(CliError::JsonSerialize)?;
        println!("{json}");
    } else {
        println!("{}", compiled.expression);
        if compiled.consistency {
            println!("-- requires consistent reads");
        }
    }

    Ok(())
}

pub fn print_tree(filter: &Filter, schema: &dyn SchemaMetadataProvider) {
    println!(
        "depth {} (compile limit {DEFAULT_MAX_DEPTH})",
        filter.depth()
    );
    print_node(filter, schema, 0);
}

/// Cardinality the document backend will use for a leaf, and where it came
/// from. `None` for nodes without an attribute name.
fn verdict(filter: &Filter, schema: &dyn SchemaMetadataProvider) -> Option<(Cardinality, &'static str)> {
    let name = filter.attribute_name().filter(|name| !name.is_empty())?;

    let marker = filter.cardinality_marker();
    if marker.is_known() {
        return Some((marker, "explicit"));
    }
    if name.eq_ignore_ascii_case(OBJECT_CLASS) {
        return Some((Cardinality::Single, "scalar attribute"));
    }

    let cardinality = attribute_cardinality(name, schema);
    let source = if cardinality.is_known() { "schema" } else { "none" };
    Some((cardinality, source))
}

fn print_node(filter: &Filter, schema: &dyn SchemaMetadataProvider, indent: usize) {
    let pad = "  ".repeat(indent);

    match (filter.attribute_name(), verdict(filter, schema)) {
        (Some(name), Some((cardinality, source))) => println!(
            "{pad}{:<18} {:<20} cardinality={cardinality} ({source}) consistency={}",
            filter.kind(),
            name,
            schema.requires_consistency(name)
        ),
        _ => match filter {
            Filter::Raw { filter: text } => println!("{pad}{} {text}", filter.kind()),
            _ => println!("{pad}{}", filter.kind()),
        },
    }

    for child in filter.children() {
        print_node(child, schema, indent + 1);
    }
}
