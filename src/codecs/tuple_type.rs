use crate::{
    compilation::{Compilation, SymbolKind},
    errors::KeyResult,
    reader::KeyReader,
    reconcile::{reconcile, Fallback},
    resolution::Resolved,
    writer::KeyWriter,
};

pub const NAME: &str = "TupleTypeSymbolKey";

pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let elements = compilation
        .members(symbol)
        .into_iter()
        .filter(|m| compilation.kind(m) == SymbolKind::Field)
        .collect::<Vec<_>>();

    let element_types = elements
        .iter()
        .map(|e| {
            compilation
                .type_of(e)
                .unwrap_or_else(|| compilation.universal_type())
        })
        .collect::<Vec<_>>();
    let element_names = elements
        .iter()
        .map(|e| Some(compilation.name(e)).filter(|n| !n.is_empty()))
        .collect::<Vec<_>>();
    let element_locations = elements
        .iter()
        .map(|e| compilation.first_location(e))
        .collect::<Vec<_>>();

    writer.write_symbol_key_array(Some(&element_types));
    writer.write_string_array(Some(&element_names));
    writer.write_location_array(Some(&element_locations));
}

/// Unlike anonymous types, a tuple the target will not build is a failure.
pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let element_types = reader.read_symbol_key_array()?;
    let element_names = reader.read_string_array()?;
    let element_locations = reader.read_location_array()?;

    let element_types = field!(element_types, NAME, "elementTypes");
    let element_locations = field!(element_locations, NAME, "elementLocations");

    Ok(reconcile(
        compilation,
        NAME,
        element_types.presence(),
        Fallback::Fail,
        || compilation.tuple_type(&element_types, &element_names, &element_locations),
    ))
}
