use crate::{
    compilation::{Compilation, SymbolKind},
    errors::KeyResult,
    reader::KeyReader,
    resolution::{FailureReason, Resolution, Resolved},
    writer::KeyWriter,
};

use super::{member::parameter_types, members_matching};

pub const NAME: &str = "MethodSymbolKey";

/// The parameter types are written with the method on the writer's method
/// stack: references to the method's own type parameters become ordinals.
pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let container = compilation
        .container(symbol)
        .unwrap_or_else(|| compilation.global_namespace());
    writer.write_symbol_key(&container);
    writer.write_string(Some(&compilation.name(symbol)));
    writer.write_usize(compilation.type_parameters(symbol).len());

    let parameter_types = parameter_types(compilation, symbol);
    writer.push_method(symbol);
    writer.write_symbol_key_array(Some(&parameter_types));
    writer.pop_method();
}

/// Parameter types can mention the candidate's own type parameters, so the
/// parameter segment is replayed once per candidate with that candidate on
/// the reader's method stack. With no candidates it is read once to step
/// over it.
pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let container = reader.read_symbol_key()?;
    let name = reader.read_name()?;
    let arity = reader.read_usize()?;

    let candidates = match &container {
        Ok(container) => members_matching(compilation, container.candidates(), |m| {
            compilation.kind(m) == SymbolKind::Method
                && reader.names_match(&compilation.name(m), &name)
                && compilation.type_parameters(m).len() == arity
        }),
        Err(_) => Vec::new(),
    };

    let start = reader.position();
    let mut matches = Vec::new();
    let mut failure = None;
    for candidate in candidates.iter() {
        reader.rewind(start);
        reader.push_method(candidate.clone());
        let parameters = reader.read_symbol_key_array();
        reader.pop_method();

        match parameters? {
            Ok(types) => {
                if parameter_types(compilation, candidate) == &types[..] {
                    matches.push(candidate.clone());
                }
            }
            Err(reason) => {
                failure.get_or_insert(reason);
            }
        }
    }
    if candidates.is_empty() {
        let _ = reader.read_symbol_key_array()?;
    }

    let _ = field!(container, NAME, "containingType");
    if let Some(reason) = failure.filter(|_| matches.is_empty()) {
        return Ok(Err(FailureReason::field(NAME, "parameterTypes", reason)));
    }
    Ok(Resolution::from_candidates(matches, || {
        FailureReason::not_found(NAME, name.clone())
    }))
}
