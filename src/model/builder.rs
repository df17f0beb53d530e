use fnv::FnvHashSet;

use crate::{
    compilation::{ShapeRejected, SymbolKind},
    location::Location,
};

use super::{
    store::{Attach, Store, SymbolData},
    MemCompilation, SymbolId,
};

/// Declares the symbols of a `MemCompilation`.
///
/// A fresh builder already holds the global namespace and the builtin types
/// `object`, `int`, `string` and `bool`. Declarations are appended in call
/// order, which is also member order.
pub struct CompilationBuilder {
    store: Store,
    files: FnvHashSet<String>,
    global: SymbolId,
    object: SymbolId,
    int: SymbolId,
    string: SymbolId,
    bool: SymbolId,
}

impl CompilationBuilder {
    pub fn new() -> Self {
        let mut store = Store::default();
        let global = store.alloc(SymbolData::new(SymbolKind::Namespace, ""), Attach::Detached);
        let mut builtin = |name: &str| {
            store.alloc(
                SymbolData::new(SymbolKind::NamedType, name).within(global),
                Attach::Member,
            )
        };
        let object = builtin("object");
        let int = builtin("int");
        let string = builtin("string");
        let bool = builtin("bool");
        Self {
            store,
            files: FnvHashSet::default(),
            global,
            object,
            int,
            string,
            bool,
        }
    }

    pub fn global(&self) -> SymbolId {
        self.global
    }

    pub fn object(&self) -> SymbolId {
        self.object
    }

    pub fn int(&self) -> SymbolId {
        self.int
    }

    pub fn string(&self) -> SymbolId {
        self.string
    }

    pub fn bool(&self) -> SymbolId {
        self.bool
    }

    /// Registers a source file; locations in files that were never
    /// registered do not resolve.
    pub fn file(&mut self, path: impl Into<String>) -> &mut Self {
        self.files.insert(path.into());
        self
    }

    /// Caps how many properties an anonymous type may have.
    pub fn max_anonymous_arity(&mut self, max: usize) -> &mut Self {
        self.store.max_anonymous_arity = Some(max);
        self
    }

    pub fn namespace(&mut self, parent: SymbolId, name: &str) -> SymbolId {
        self.member(SymbolData::new(SymbolKind::Namespace, name).within(parent))
    }

    /// A named type, generic when `type_params` is non-empty.
    pub fn class(&mut self, container: SymbolId, name: &str, type_params: &[&str]) -> SymbolId {
        let class = self.member(SymbolData::new(SymbolKind::NamedType, name).within(container));
        self.declare_type_parameters(class, type_params);
        class
    }

    pub fn field(
        &mut self,
        owner: SymbolId,
        name: &str,
        ty: SymbolId,
        location: Location,
    ) -> SymbolId {
        self.member(
            SymbolData::new(SymbolKind::Field, name)
                .within(owner)
                .typed(ty)
                .located(location),
        )
    }

    pub fn property(
        &mut self,
        owner: SymbolId,
        name: &str,
        ty: SymbolId,
        read_only: bool,
        location: Location,
    ) -> SymbolId {
        let mut data = SymbolData::new(SymbolKind::Property, name)
            .within(owner)
            .typed(ty)
            .located(location);
        data.read_only = read_only;
        self.member(data)
    }

    /// A property with parameters.
    pub fn indexer(
        &mut self,
        owner: SymbolId,
        name: &str,
        ty: SymbolId,
        params: &[(&str, SymbolId)],
    ) -> SymbolId {
        let indexer = self.property(owner, name, ty, true, Location::None);
        for (param, param_ty) in params {
            self.parameter(indexer, param, *param_ty);
        }
        indexer
    }

    pub fn method(&mut self, owner: SymbolId, name: &str, type_params: &[&str]) -> SymbolId {
        let method = self.member(SymbolData::new(SymbolKind::Method, name).within(owner));
        self.declare_type_parameters(method, type_params);
        method
    }

    pub fn type_parameters(&self, symbol: SymbolId) -> Vec<SymbolId> {
        self.store.get(symbol).type_params.clone()
    }

    pub fn parameter(&mut self, method: SymbolId, name: &str, ty: SymbolId) -> SymbolId {
        let data = SymbolData::new(SymbolKind::Parameter, name)
            .within(method)
            .typed(ty);
        self.store.alloc(data, Attach::Parameter)
    }

    pub fn local(&mut self, method: SymbolId, name: &str, ty: SymbolId) -> SymbolId {
        self.member(
            SymbolData::new(SymbolKind::Local, name)
                .within(method)
                .typed(ty),
        )
    }

    pub fn array(&mut self, element: SymbolId, rank: usize) -> SymbolId {
        self.store.array(element, rank)
    }

    pub fn pointer(&mut self, pointee: SymbolId) -> SymbolId {
        self.store.pointer(pointee)
    }

    pub fn construct(
        &mut self,
        definition: SymbolId,
        arguments: &[SymbolId],
    ) -> Result<SymbolId, ShapeRejected> {
        self.store.construct(definition, arguments)
    }

    pub fn tuple(
        &mut self,
        types: &[SymbolId],
        names: &[Option<String>],
        locations: &[Location],
    ) -> Result<SymbolId, ShapeRejected> {
        self.store.tuple(types, names, locations)
    }

    pub fn anonymous(
        &mut self,
        types: &[SymbolId],
        names: &[String],
        read_only: &[bool],
        locations: &[Location],
    ) -> Result<SymbolId, ShapeRejected> {
        self.store.anonymous(types, names, read_only, locations)
    }

    pub fn finish(self) -> MemCompilation {
        MemCompilation::new(self.store, self.files, self.global, self.object)
    }

    fn member(&mut self, data: SymbolData) -> SymbolId {
        self.store.alloc(data, Attach::Member)
    }

    fn declare_type_parameters(&mut self, owner: SymbolId, names: &[&str]) {
        for name in names {
            let data = SymbolData::new(SymbolKind::TypeParameter, *name).within(owner);
            self.store.alloc(data, Attach::TypeParameter);
        }
    }
}

impl Default for CompilationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
