use crate::{
    compilation::{Compilation, SymbolKind},
    errors::KeyResult,
    reader::KeyReader,
    reconcile::{reconcile, Fallback},
    resolution::Resolved,
    writer::KeyWriter,
};

pub const NAME: &str = "AnonymousTypeSymbolKey";

/// Anonymous types are identified by their properties, in declaration order:
/// type, name, read-only flag and first declaration site of each.
pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let properties = compilation
        .members(symbol)
        .into_iter()
        .filter(|m| compilation.kind(m) == SymbolKind::Property)
        .collect::<Vec<_>>();

    let property_types = properties
        .iter()
        .map(|p| {
            compilation
                .type_of(p)
                .unwrap_or_else(|| compilation.universal_type())
        })
        .collect::<Vec<_>>();
    let property_names = properties
        .iter()
        .map(|p| Some(compilation.name(p)))
        .collect::<Vec<_>>();
    let property_is_read_only = properties
        .iter()
        .map(|p| compilation.is_read_only(p))
        .collect::<Vec<_>>();
    let property_locations = properties
        .iter()
        .map(|p| compilation.first_location(p))
        .collect::<Vec<_>>();

    writer.write_symbol_key_array(Some(&property_types));
    writer.write_string_array(Some(&property_names));
    writer.write_bool_array(Some(&property_is_read_only));
    writer.write_location_array(Some(&property_locations));
}

/// Never fails once the property types and locations resolve: a shape the
/// target compilation will not build, or no shape at all, resolves to the
/// universal type.
pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let property_types = reader.read_symbol_key_array()?;
    let property_names = reader.read_string_array()?;
    let property_is_read_only = reader.read_bool_array()?;
    let property_locations = reader.read_location_array()?;

    let property_types = field!(property_types, NAME, "propertyTypes");
    let property_locations = field!(property_locations, NAME, "propertyLocations");

    Ok(reconcile(
        compilation,
        NAME,
        property_types.presence(),
        Fallback::UniversalType,
        || {
            let names = property_names
                .iter()
                .map(|n| n.clone().unwrap_or_default())
                .collect::<Vec<_>>();
            compilation.anonymous_type(
                &property_types,
                &names,
                &property_is_read_only,
                &property_locations,
            )
        },
    ))
}
