use crate::{
    compilation::Compilation, errors::KeyResult, reader::KeyReader, resolution::Resolved,
    writer::KeyWriter,
};

pub const NAME: &str = "ArrayTypeSymbolKey";

pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let element = compilation
        .type_of(symbol)
        .unwrap_or_else(|| compilation.universal_type());
    writer.write_symbol_key(&element);
    writer.write_usize(compilation.array_rank(symbol));
}

pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let element = reader.read_symbol_key()?;
    let rank = reader.read_usize()?;

    let element = field!(element, NAME, "elementType");
    Ok(Ok(element.map(|e| compilation.array_type(&e, rank))))
}
