use crate::{
    compilation::{Compilation, SymbolKind},
    errors::KeyResult,
    reader::KeyReader,
    resolution::{FailureReason, Resolution, Resolved},
    writer::KeyWriter,
};

use super::members_matching;

pub const NAME: &str = "NamedTypeSymbolKey";

/// A generic definition is written with an absent argument array; a
/// constructed type carries its arguments and is rebuilt from the definition.
pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let definition = compilation.original_definition(symbol);
    let container = compilation
        .container(&definition)
        .unwrap_or_else(|| compilation.global_namespace());

    writer.write_symbol_key(&container);
    writer.write_string(Some(&compilation.name(&definition)));
    writer.write_usize(compilation.type_parameters(&definition).len());
    if definition == *symbol {
        writer.write_symbol_key_array(None);
    } else {
        let arguments = compilation.type_arguments(symbol);
        writer.write_symbol_key_array(Some(&arguments));
    }
}

pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let container = reader.read_symbol_key()?;
    let name = reader.read_name()?;
    let arity = reader.read_usize()?;
    let arguments = reader.read_symbol_key_array()?;

    let container = field!(container, NAME, "containingSymbol");
    let arguments = field!(arguments, NAME, "typeArguments");

    let definitions = members_matching(compilation, container.candidates(), |m| {
        compilation.kind(m) == SymbolKind::NamedType
            && reader.names_match(&compilation.name(m), &name)
            && compilation.type_parameters(m).len() == arity
    });
    if arguments.is_absent() || definitions.is_empty() {
        return Ok(Resolution::from_candidates(definitions, || {
            FailureReason::not_found(NAME, name.clone())
        }));
    }

    let mut rejections = Vec::new();
    let constructed = definitions
        .iter()
        .filter_map(|d| match compilation.construct(d, &arguments) {
            Ok(symbol) => Some(symbol),
            Err(rejected) => {
                rejections.push(rejected.reason);
                None
            }
        })
        .collect::<Vec<_>>();
    Ok(Resolution::from_candidates(constructed, || {
        FailureReason::Rejected {
            codec: NAME,
            detail: format!("cannot construct '{}': {}", name, rejections.join("; ")),
        }
    }))
}
