//! An in-memory compilation for tools and tests.
//!
//! `MemCompilation` implements `Compilation` over a flat table of symbols.
//! It is built once with a `CompilationBuilder`; afterwards the only
//! mutation is the interning of structural types the factories create, which
//! happens behind a lock so one compilation can serve concurrent decodes.

mod builder;
mod store;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use fnv::FnvHashSet;

use crate::{
    compilation::{Compilation, ShapeRejected, SymbolKind},
    location::Location,
};

pub use builder::CompilationBuilder;
pub use store::SymbolId;

use store::{Store, SymbolData};

pub struct MemCompilation {
    store: RwLock<Store>,
    files: FnvHashSet<String>,
    global: SymbolId,
    object: SymbolId,
    structural_requests: AtomicUsize,
}

impl MemCompilation {
    pub(crate) fn new(
        store: Store,
        files: FnvHashSet<String>,
        global: SymbolId,
        object: SymbolId,
    ) -> Self {
        Self {
            store: RwLock::new(store),
            files,
            global,
            object,
            structural_requests: AtomicUsize::new(0),
        }
    }

    /// How many times a tuple or anonymous type was requested from the
    /// factories, accepted or not.
    pub fn structural_requests(&self) -> usize {
        self.structural_requests.load(Ordering::Relaxed)
    }

    pub fn symbol_count(&self) -> usize {
        self.read().len()
    }

    /// Finds a symbol by a `::`-separated path of names from the global
    /// namespace, following members only.
    pub fn lookup(&self, path: &str) -> Option<SymbolId> {
        let store = self.read();
        path.split("::").try_fold(self.global, |scope, name| {
            store
                .get(scope)
                .members
                .iter()
                .copied()
                .find(|m| store.get(*m).name == name)
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    fn with<T, F: FnOnce(&SymbolData) -> T>(&self, id: &SymbolId, f: F) -> T {
        f(self.read().get(*id))
    }
}

impl Compilation for MemCompilation {
    type Symbol = SymbolId;

    fn kind(&self, symbol: &SymbolId) -> SymbolKind {
        self.with(symbol, |s| s.kind)
    }

    fn name(&self, symbol: &SymbolId) -> String {
        self.with(symbol, |s| s.name.clone())
    }

    fn container(&self, symbol: &SymbolId) -> Option<SymbolId> {
        self.with(symbol, |s| s.container)
    }

    fn members(&self, symbol: &SymbolId) -> Vec<SymbolId> {
        self.with(symbol, |s| s.members.clone())
    }

    fn type_of(&self, symbol: &SymbolId) -> Option<SymbolId> {
        self.with(symbol, |s| s.ty)
    }

    fn type_parameters(&self, symbol: &SymbolId) -> Vec<SymbolId> {
        self.with(symbol, |s| s.type_params.clone())
    }

    fn type_arguments(&self, symbol: &SymbolId) -> Vec<SymbolId> {
        self.with(symbol, |s| s.type_args.clone())
    }

    fn original_definition(&self, symbol: &SymbolId) -> SymbolId {
        self.with(symbol, |s| s.definition.unwrap_or(*symbol))
    }

    fn parameters(&self, symbol: &SymbolId) -> Vec<SymbolId> {
        self.with(symbol, |s| s.params.clone())
    }

    fn is_read_only(&self, symbol: &SymbolId) -> bool {
        self.with(symbol, |s| s.read_only)
    }

    fn locations(&self, symbol: &SymbolId) -> Vec<Location> {
        self.with(symbol, |s| s.locations.clone())
    }

    fn array_rank(&self, symbol: &SymbolId) -> usize {
        self.with(symbol, |s| s.rank)
    }

    fn global_namespace(&self) -> SymbolId {
        self.global
    }

    fn universal_type(&self) -> SymbolId {
        self.object
    }

    fn contains_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    fn construct(
        &self,
        definition: &SymbolId,
        arguments: &[SymbolId],
    ) -> Result<SymbolId, ShapeRejected> {
        self.write().construct(*definition, arguments)
    }

    fn array_type(&self, element: &SymbolId, rank: usize) -> SymbolId {
        self.write().array(*element, rank)
    }

    fn pointer_type(&self, pointee: &SymbolId) -> SymbolId {
        self.write().pointer(*pointee)
    }

    fn tuple_type(
        &self,
        types: &[SymbolId],
        names: &[Option<String>],
        locations: &[Location],
    ) -> Result<SymbolId, ShapeRejected> {
        self.structural_requests.fetch_add(1, Ordering::Relaxed);
        self.write().tuple(types, names, locations)
    }

    fn anonymous_type(
        &self,
        types: &[SymbolId],
        names: &[String],
        read_only: &[bool],
        locations: &[Location],
    ) -> Result<SymbolId, ShapeRejected> {
        self.structural_requests.fetch_add(1, Ordering::Relaxed);
        self.write().anonymous(types, names, read_only, locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_follows_member_paths() {
        let mut b = CompilationBuilder::new();
        let geo = b.namespace(b.global(), "geo");
        let point = b.class(geo, "Point", &[]);
        let x = b.field(point, "x", b.int(), Location::None);
        let c = b.finish();

        assert_eq!(c.lookup("geo::Point"), Some(point));
        assert_eq!(c.lookup("geo::Point::x"), Some(x));
        assert_eq!(c.lookup("geo::Missing"), None);
        assert_eq!(c.kind(&x), SymbolKind::Field);
        assert_eq!(c.type_of(&x), Some(c.lookup("int").unwrap()));
    }

    #[test]
    fn constructed_types_point_at_their_definition() {
        let mut b = CompilationBuilder::new();
        let list = b.class(b.global(), "List", &["T"]);
        let c = b.finish();

        let int = c.lookup("int").unwrap();
        let list_of_int = c.construct(&list, &[int]).unwrap();
        assert_eq!(c.original_definition(&list_of_int), list);
        assert_eq!(c.type_arguments(&list_of_int), vec![int]);
        assert!(c.is_definition(&list));
        assert!(!c.is_definition(&list_of_int));
        assert!(c.construct(&list, &[int, int]).is_err());
        assert!(c.construct(&int, &[int]).is_err());
    }
}
