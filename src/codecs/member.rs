//! Fields and properties: looked up by name in their containing type.
//! Properties also carry their parameter types so indexers with the same name
//! stay distinct.

use crate::{
    compilation::{Compilation, SymbolKind},
    errors::KeyResult,
    reader::KeyReader,
    resolution::{FailureReason, Resolution, Resolved},
    writer::KeyWriter,
};

use super::members_matching;

pub const FIELD_NAME: &str = "FieldSymbolKey";
pub const PROPERTY_NAME: &str = "PropertySymbolKey";

pub fn create_field<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    write_container(symbol, writer);
    writer.write_string(Some(&compilation.name(symbol)));
}

pub fn resolve_field<C: Compilation>(
    reader: &mut KeyReader<'_, C>,
) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let container = reader.read_symbol_key()?;
    let name = reader.read_name()?;

    let container = field!(container, FIELD_NAME, "containingType");
    let found = members_matching(compilation, container.candidates(), |m| {
        compilation.kind(m) == SymbolKind::Field && reader.names_match(&compilation.name(m), &name)
    });
    Ok(Resolution::from_candidates(found, || {
        FailureReason::not_found(FIELD_NAME, name.clone())
    }))
}

pub fn create_property<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    write_container(symbol, writer);
    writer.write_string(Some(&compilation.name(symbol)));
    let parameter_types = parameter_types(compilation, symbol);
    writer.write_symbol_key_array(Some(&parameter_types));
}

pub fn resolve_property<C: Compilation>(
    reader: &mut KeyReader<'_, C>,
) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let container = reader.read_symbol_key()?;
    let name = reader.read_name()?;
    let expected = reader.read_symbol_key_array()?;

    let container = field!(container, PROPERTY_NAME, "containingType");
    let expected = field!(expected, PROPERTY_NAME, "parameterTypes");
    let found = members_matching(compilation, container.candidates(), |m| {
        compilation.kind(m) == SymbolKind::Property
            && reader.names_match(&compilation.name(m), &name)
            && parameter_types(compilation, m) == &expected[..]
    });
    Ok(Resolution::from_candidates(found, || {
        FailureReason::not_found(PROPERTY_NAME, name.clone())
    }))
}

fn write_container<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let container = compilation
        .container(symbol)
        .unwrap_or_else(|| compilation.global_namespace());
    writer.write_symbol_key(&container);
}

/// Types of a method's or property's parameters, in order.
pub(crate) fn parameter_types<C: Compilation>(compilation: &C, symbol: &C::Symbol) -> Vec<C::Symbol> {
    compilation
        .parameters(symbol)
        .iter()
        .map(|p| {
            compilation
                .type_of(p)
                .unwrap_or_else(|| compilation.universal_type())
        })
        .collect()
}
