use fnv::FnvHashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    compilation::{ShapeRejected, SymbolKind},
    location::Location,
};

/// Index of a symbol in a `MemCompilation`. Only meaningful within the
/// compilation that issued it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SymbolData {
    pub kind: SymbolKind,
    pub name: String,
    pub container: Option<SymbolId>,
    pub members: Vec<SymbolId>,
    pub ty: Option<SymbolId>,
    pub type_params: Vec<SymbolId>,
    pub type_args: Vec<SymbolId>,
    pub definition: Option<SymbolId>,
    pub params: Vec<SymbolId>,
    pub read_only: bool,
    pub locations: Vec<Location>,
    pub rank: usize,
}

impl SymbolData {
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            container: None,
            members: Vec::new(),
            ty: None,
            type_params: Vec::new(),
            type_args: Vec::new(),
            definition: None,
            params: Vec::new(),
            read_only: false,
            locations: Vec::new(),
            rank: 0,
        }
    }

    pub fn within(mut self, container: SymbolId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn typed(mut self, ty: SymbolId) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn located(mut self, location: Location) -> Self {
        if !location.is_none() {
            self.locations.push(location);
        }
        self
    }
}

/// How a new symbol hangs off its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Attach {
    Member,
    Parameter,
    TypeParameter,
    Detached,
}

/// Structural types are interned so that rebuilding the same shape yields
/// the same symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Shape {
    Array(SymbolId, usize),
    Pointer(SymbolId),
    Constructed(SymbolId, Vec<SymbolId>),
    Tuple(Vec<SymbolId>, Vec<Option<String>>),
    Anonymous(Vec<SymbolId>, Vec<String>, Vec<bool>),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Store {
    symbols: Vec<SymbolData>,
    interned: FnvHashMap<Shape, SymbolId>,
    pub max_anonymous_arity: Option<usize>,
}

impl Store {
    pub fn get(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn alloc(&mut self, data: SymbolData, attach: Attach) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        if let Some(container) = data.container {
            let owner = &mut self.symbols[container.0 as usize];
            match attach {
                Attach::Member => owner.members.push(id),
                Attach::Parameter => owner.params.push(id),
                Attach::TypeParameter => owner.type_params.push(id),
                Attach::Detached => {}
            }
        }
        self.symbols.push(data);
        id
    }

    fn intern<F>(&mut self, shape: Shape, build: F) -> SymbolId
    where
        F: FnOnce(&mut Store) -> SymbolId,
    {
        if let Some(id) = self.interned.get(&shape) {
            return *id;
        }
        let id = build(self);
        self.interned.insert(shape, id);
        id
    }

    pub fn array(&mut self, element: SymbolId, rank: usize) -> SymbolId {
        self.intern(Shape::Array(element, rank), |s| {
            let mut data = SymbolData::new(SymbolKind::ArrayType, "").typed(element);
            data.rank = rank;
            s.alloc(data, Attach::Detached)
        })
    }

    pub fn pointer(&mut self, pointee: SymbolId) -> SymbolId {
        self.intern(Shape::Pointer(pointee), |s| {
            let data = SymbolData::new(SymbolKind::PointerType, "").typed(pointee);
            s.alloc(data, Attach::Detached)
        })
    }

    pub fn construct(
        &mut self,
        definition: SymbolId,
        arguments: &[SymbolId],
    ) -> Result<SymbolId, ShapeRejected> {
        let def = self.get(definition);
        if def.kind != SymbolKind::NamedType || def.definition.is_some() {
            return Err(ShapeRejected::new(format!(
                "'{}' is not a generic type definition",
                def.name
            )));
        }
        if def.type_params.is_empty() || def.type_params.len() != arguments.len() {
            return Err(ShapeRejected::new(format!(
                "'{}' takes {} type argument(s), got {}",
                def.name,
                def.type_params.len(),
                arguments.len()
            )));
        }

        let shape = Shape::Constructed(definition, arguments.to_vec());
        Ok(self.intern(shape, |s| {
            let def = s.get(definition);
            let mut data = SymbolData::new(SymbolKind::NamedType, def.name.clone());
            data.container = def.container;
            data.definition = Some(definition);
            data.type_args = arguments.to_vec();
            s.alloc(data, Attach::Detached)
        }))
    }

    pub fn tuple(
        &mut self,
        types: &[SymbolId],
        names: &[Option<String>],
        locations: &[Location],
    ) -> Result<SymbolId, ShapeRejected> {
        if types.len() != names.len() || types.len() != locations.len() {
            return Err(ShapeRejected::new("tuple element arrays differ in length"));
        }
        if types.len() < 2 {
            return Err(ShapeRejected::new(format!(
                "tuples need at least two elements, got {}",
                types.len()
            )));
        }
        if let Some(dup) = first_duplicate(names.iter().flatten()) {
            return Err(ShapeRejected::new(format!("duplicate element name '{}'", dup)));
        }

        let shape = Shape::Tuple(types.to_vec(), names.to_vec());
        Ok(self.intern(shape, |s| {
            let tuple = s.alloc(SymbolData::new(SymbolKind::TupleType, ""), Attach::Detached);
            for ((ty, name), location) in types.iter().zip(names).zip(locations) {
                let data = SymbolData::new(SymbolKind::Field, name.clone().unwrap_or_default())
                    .within(tuple)
                    .typed(*ty)
                    .located(location.clone());
                s.alloc(data, Attach::Member);
            }
            tuple
        }))
    }

    pub fn anonymous(
        &mut self,
        types: &[SymbolId],
        names: &[String],
        read_only: &[bool],
        locations: &[Location],
    ) -> Result<SymbolId, ShapeRejected> {
        let len = types.len();
        if names.len() != len || read_only.len() != len || locations.len() != len {
            return Err(ShapeRejected::new("property arrays differ in length"));
        }
        if let Some(max) = self.max_anonymous_arity {
            if len > max {
                return Err(ShapeRejected::new(format!(
                    "anonymous types are limited to {} properties, got {}",
                    max, len
                )));
            }
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(ShapeRejected::new("anonymous type properties must be named"));
        }
        if let Some(dup) = first_duplicate(names.iter()) {
            return Err(ShapeRejected::new(format!("duplicate property name '{}'", dup)));
        }

        let shape = Shape::Anonymous(types.to_vec(), names.to_vec(), read_only.to_vec());
        Ok(self.intern(shape, |s| {
            let anon = s.alloc(SymbolData::new(SymbolKind::AnonymousType, ""), Attach::Detached);
            for i in 0..len {
                let mut data = SymbolData::new(SymbolKind::Property, names[i].clone())
                    .within(anon)
                    .typed(types[i])
                    .located(locations[i].clone());
                data.read_only = read_only[i];
                s.alloc(data, Attach::Member);
            }
            anon
        }))
    }
}

fn first_duplicate<'a, I>(names: I) -> Option<&'a String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = fnv::FnvHashSet::default();
    names.into_iter().find(|n| !seen.insert(*n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_int() -> (Store, SymbolId) {
        let mut store = Store::default();
        let global = store.alloc(SymbolData::new(SymbolKind::Namespace, ""), Attach::Detached);
        let int = store.alloc(
            SymbolData::new(SymbolKind::NamedType, "int").within(global),
            Attach::Member,
        );
        (store, int)
    }

    #[test]
    fn structural_types_are_interned() {
        let (mut store, int) = store_with_int();
        let a = store.array(int, 1);
        assert_eq!(store.array(int, 1), a);
        assert_ne!(store.array(int, 2), a);

        let names = vec![str!("X")];
        let anon = store
            .anonymous(&[int], &names, &[false], &[Location::None])
            .unwrap();
        assert_eq!(
            store.anonymous(&[int], &names, &[false], &[Location::None]),
            Ok(anon)
        );
        assert_eq!(store.get(anon).members.len(), 1);
    }

    #[test]
    fn anonymous_shapes_are_validated() {
        let (mut store, int) = store_with_int();
        let dup = vec![str!("X"), str!("X")];
        let rejected = store.anonymous(&[int, int], &dup, &[false, false], &[Location::None, Location::None]);
        assert_eq!(
            rejected,
            Err(ShapeRejected::new("duplicate property name 'X'"))
        );

        let ragged = store.anonymous(&[int], &[], &[false], &[Location::None]);
        assert!(ragged.is_err());

        store.max_anonymous_arity = Some(0);
        let too_wide = store.anonymous(&[int], &[str!("X")], &[false], &[Location::None]);
        assert!(too_wide.is_err());
        assert!(store.anonymous(&[], &[], &[], &[]).is_ok());
    }

    #[test]
    fn tuples_need_two_elements() {
        let (mut store, int) = store_with_int();
        assert!(store.tuple(&[int], &[None], &[Location::None]).is_err());
        let pair = store
            .tuple(&[int, int], &[Some(str!("a")), None], &[Location::None, Location::None])
            .unwrap();
        assert_eq!(store.get(pair).members.len(), 2);
    }
}
