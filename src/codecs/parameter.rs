use crate::{
    compilation::Compilation,
    errors::KeyResult,
    reader::KeyReader,
    resolution::{FailureReason, Resolution, Resolved},
    writer::KeyWriter,
};

pub const NAME: &str = "ParameterSymbolKey";

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

    let owner = field!(owner, NAME, "containingSymbol");
    let found = owner
        .candidates()
        .iter()
        .flat_map(|o| compilation.parameters(o))
        .filter(|p| reader.names_match(&compilation.name(p), &name))
        .collect::<Vec<_>>();
    Ok(Resolution::from_candidates(found, || {
        FailureReason::not_found(NAME, name.clone())
    }))
}
