use crate::{
    compilation::Compilation, errors::KeyResult, reader::KeyReader, resolution::Resolved,
    writer::KeyWriter,
};

pub const NAME: &str = "PointerTypeSymbolKey";

pub fn create<C: Compilation>(symbol: &C::Symbol, writer: &mut KeyWriter<'_, C>) {
    let compilation = writer.compilation();
    let pointee = compilation
        .type_of(symbol)
        .unwrap_or_else(|| compilation.universal_type());
    writer.write_symbol_key(&pointee);
}

pub fn resolve<C: Compilation>(reader: &mut KeyReader<'_, C>) -> KeyResult<Resolved<C::Symbol>> {
    let compilation = reader.compilation();
    let pointee = reader.read_symbol_key()?;

    let pointee = field!(pointee, NAME, "pointedAtType");
    Ok(Ok(pointee.map(|p| compilation.pointer_type(&p))))
}
