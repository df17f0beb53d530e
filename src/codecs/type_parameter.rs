use crate::{
    compilation::Compilation,
    errors::KeyResult,
    reader::KeyReader,
    resolution::{FailureReason, Resolution, Resolved},
    writer::KeyWriter,
};

pub const NAME: &str = "TypeParameterSymbolKey";
pub const ORDINAL_NAME: &str = "TypeParameterOrdinalSymbolKey";

pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let owner = compilation
        .container(symbol)
        .unwrap_or_else(|| compilation.global_namespace());
    writer.write_symbol_key(&owner);
    writer.write_string(Some(&compilation.name(symbol)));
}

pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let owner = reader.read_symbol_key()?;
    let name = reader.read_name()?;

    let owner = field!(owner, NAME, "owner");
    let found = owner
        .candidates()
        .iter()
        .flat_map(|o| compilation.type_parameters(o))
        .filter(|p| reader.names_match(&compilation.name(p), &name))
        .collect::<Vec<_>>();
    Ok(Resolution::from_candidates(found, || {
        FailureReason::not_found(NAME, name.clone())
    }))
}

/// Written only while the owning method's signature is on the writer's
/// method stack, so the index always refers to an enclosing method key.
pub fn create_ordinal<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let owner = compilation.container(symbol);
    let index = owner
        .as_ref()
        .and_then(|o| writer.method_index(o))
        .unwrap_or_default();
    let ordinal = owner
        .map(|o| compilation.type_parameters(&o))
        .and_then(|params| params.iter().position(|p| p == symbol))
        .unwrap_or_default();
    writer.write_usize(index);
    writer.write_usize(ordinal);
}

pub fn resolve_ordinal<C: Compilation>(
    reader: &mut KeyReader<'_, C>,
) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let index = reader.read_usize()?;
    let ordinal = reader.read_usize()?;

    let method = unless!(reader.method_at(index), else FailureReason::Unbound {
        codec: ORDINAL_NAME,
        detail: format!("no enclosing method at depth {}", index),
    });
    let parameter = unless!(compilation.type_parameters(method).into_iter().nth(ordinal), else FailureReason::Unbound {
        codec: ORDINAL_NAME,
        detail: format!("method has no type parameter #{}", ordinal),
    });
    Ok(Ok(Resolution::Symbol(parameter)))
}
