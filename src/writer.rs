use crate::{
    codecs,
    compilation::{Compilation, SymbolKind},
    frame::{Category, Frame, Presence},
    location::Location,
};

/// Emits the frames describing a live symbol. Writing cannot fail: every
/// symbol reachable from a compilation is assumed to be describable.
pub struct KeyWriter<'a, C: Compilation> {
    compilation: &'a C,
    frames: Vec<Frame>,
    methods: Vec<C::Symbol>,
}

impl<'a, C: Compilation> KeyWriter<'a, C> {
    pub fn new(compilation: &'a C) -> Self {
        Self {
            compilation,
            frames: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn compilation(&self) -> &'a C {
        self.compilation
    }

    pub fn finish(self) -> Vec<Frame> {
        self.frames
    }

    pub fn write_symbol_key(&mut self, symbol: &C::Symbol) {
        let category = self.category_of(symbol);
        self.frames.push(Frame::Kind(category));
        let codec = codecs::codec_for::<C>(category);
        (codec.create)(symbol, self);
    }

    /// `None` writes an absent array, which is distinct from an empty one.
    pub fn write_symbol_key_array(&mut self, symbols: Option<&[C::Symbol]>) {
        self.write_array_header(Presence::of(symbols), symbols.map_or(0, |s| s.len()));
        for symbol in symbols.unwrap_or_default() {
            self.write_symbol_key(symbol);
        }
    }

    pub fn write_string(&mut self, value: Option<&str>) {
        self.frames.push(Frame::Str(value.map(str::to_string)));
    }

    pub fn write_string_array(&mut self, values: Option<&[Option<String>]>) {
        self.write_array_header(Presence::of(values), values.map_or(0, |v| v.len()));
        for value in values.unwrap_or_default() {
            self.write_string(value.as_deref());
        }
    }

    pub fn write_bool(&mut self, value: bool) {
        self.frames.push(Frame::Bool(value));
    }

    pub fn write_bool_array(&mut self, values: Option<&[bool]>) {
        self.write_array_header(Presence::of(values), values.map_or(0, |v| v.len()));
        for value in values.unwrap_or_default() {
            self.write_bool(*value);
        }
    }

    pub fn write_int(&mut self, value: i64) {
        self.frames.push(Frame::Int(value));
    }

    /// Counts past `i64::MAX` saturate; the reader rejects what no real
    /// compilation produces.
    pub fn write_usize(&mut self, value: usize) {
        self.write_int(i64::try_from(value).unwrap_or(i64::MAX));
    }

    pub fn write_location(&mut self, location: &Location) {
        match location {
            Location::None => self.write_int(0),
            Location::Source { path, span } => {
                self.write_int(1);
                self.write_string(Some(path));
                for pos in [span.start, span.end].iter() {
                    self.write_usize(pos.lineno);
                    self.write_usize(pos.col);
                    self.write_usize(pos.offset);
                }
            }
        }
    }

    pub fn write_location_array(&mut self, locations: Option<&[Location]>) {
        self.write_array_header(Presence::of(locations), locations.map_or(0, |l| l.len()));
        for location in locations.unwrap_or_default() {
            self.write_location(location);
        }
    }

    pub fn push_method(&mut self, method: &C::Symbol) {
        self.methods.push(method.clone());
    }

    pub fn pop_method(&mut self) {
        self.methods.pop();
    }

    /// Arrays longer than `u32::MAX` saturate the header. The header then
    /// announces more elements than follow it, which the reader reports as
    /// malformed instead of misreading the frames.
    fn write_array_header(&mut self, presence: Presence, len: usize) {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        self.frames.push(Frame::Array(presence, len));
    }

    /// Chooses the wire category. A type parameter owned by a method whose
    /// signature is being written refers to that method by stack position;
    /// writing its container would recurse into the same signature again.
    fn category_of(&self, symbol: &C::Symbol) -> Category {
        match self.compilation.kind(symbol) {
            SymbolKind::Namespace => Category::Namespace,
            SymbolKind::NamedType => Category::NamedType,
            SymbolKind::ArrayType => Category::ArrayType,
            SymbolKind::PointerType => Category::PointerType,
            SymbolKind::TupleType => Category::TupleType,
            SymbolKind::AnonymousType => Category::AnonymousType,
            SymbolKind::TypeParameter => {
                let owner = self.compilation.container(symbol);
                if owner.map_or(false, |o| self.methods.contains(&o)) {
                    Category::TypeParameterOrdinal
                } else {
                    Category::TypeParameter
                }
            }
            SymbolKind::Field => Category::Field,
            SymbolKind::Property => Category::Property,
            SymbolKind::Method => Category::Method,
            SymbolKind::Parameter => Category::Parameter,
            SymbolKind::Local => Category::Local,
        }
    }

    /// Position of `method` on the signature stack.
    pub fn method_index(&self, method: &C::Symbol) -> Option<usize> {
        self.methods.iter().rposition(|m| m == method)
    }
}
