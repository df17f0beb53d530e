use crate::{
    compilation::{Compilation, SymbolKind},
    errors::KeyResult,
    reader::KeyReader,
    resolution::{FailureReason, Resolution, Resolved},
    writer::KeyWriter,
};

pub const NAME: &str = "LocalSymbolKey";

/// Locals are found by name within their method; shadowed locals sharing a
/// name are told apart by their ordinal among the same-named ones.
pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let name = compilation.name(symbol);
    let method = compilation
        .container(symbol)
        .unwrap_or_else(|| compilation.global_namespace());
    let ordinal = same_named_locals(compilation, &method, &name, |a, b| a == b)
        .iter()
        .position(|l| l == symbol)
        .unwrap_or_default();

    writer.write_symbol_key(&method);
    writer.write_string(Some(&name));
    writer.write_usize(ordinal);
}

pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let method = reader.read_symbol_key()?;
    let name = reader.read_name()?;
    let ordinal = reader.read_usize()?;

    let method = field!(method, NAME, "containingMethod");
    let found = method
        .candidates()
        .iter()
        .filter_map(|m| {
            same_named_locals(compilation, m, &name, |a, b| reader.names_match(a, b))
                .into_iter()
                .nth(ordinal)
        })
        .collect::<Vec<_>>();
    Ok(Resolution::from_candidates(found, || {
        FailureReason::not_found(NAME, format!("{}#{}", name, ordinal))
    }))
}

fn same_named_locals<C, F>(compilation: &C, method: &C::Symbol, name: &str, eq: F) -> Vec<C::Symbol>
where
    C: Compilation,
    F: Fn(&str, &str) -> bool,
{
    compilation
        .members(method)
        .into_iter()
        .filter(|m| compilation.kind(m) == SymbolKind::Local && eq(&compilation.name(m), name))
        .collect()
}
