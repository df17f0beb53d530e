use crate::{
    compilation::{Compilation, SymbolKind},
    errors::KeyResult,
    reader::KeyReader,
    resolution::{FailureReason, Resolution, Resolved},
    writer::KeyWriter,
};

use super::members_matching;

pub const NAME: &str = "NamespaceSymbolKey";

pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    match compilation.container(symbol) {
        None => writer.write_bool(true),
        Some(container) => {
            writer.write_bool(false);
            writer.write_symbol_key(&container);
            writer.write_string(Some(&compilation.name(symbol)));
        }
    }
}

pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    if reader.read_bool()? {
        return Ok(Ok(Resolution::Symbol(compilation.global_namespace())));
    }

    let container = reader.read_symbol_key()?;
    let name = reader.read_name()?;

    let container = field!(container, NAME, "containingNamespace");
    let found = members_matching(compilation, container.candidates(), |m| {
        compilation.kind(m) == SymbolKind::Namespace
            && reader.names_match(&compilation.name(m), &name)
    });
    Ok(Resolution::from_candidates(found, || {
        FailureReason::not_found(NAME, name.clone())
    }))
}
