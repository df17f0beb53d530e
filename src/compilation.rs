use std::{fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// How the host classifies a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Namespace,
    NamedType,
    ArrayType,
    PointerType,
    TupleType,
    AnonymousType,
    TypeParameter,
    Field,
    Property,
    Method,
    Parameter,
    Local,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SymbolKind::Namespace => "namespace",
                SymbolKind::NamedType => "named type",
                SymbolKind::ArrayType => "array type",
                SymbolKind::PointerType => "pointer type",
                SymbolKind::TupleType => "tuple type",
                SymbolKind::AnonymousType => "anonymous type",
                SymbolKind::TypeParameter => "type parameter",
                SymbolKind::Field => "field",
                SymbolKind::Property => "property",
                SymbolKind::Method => "method",
                SymbolKind::Parameter => "parameter",
                SymbolKind::Local => "local",
            }
        )
    }
}

/// The factory refused to build the requested shape at this snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeRejected {
    pub reason: String,
}

impl ShapeRejected {
    pub fn new(reason: impl Into<String>) -> ShapeRejected {
        ShapeRejected {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ShapeRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape rejected: {}", self.reason)
    }
}

impl std::error::Error for ShapeRejected {}

/// A compilation snapshot, as seen by the key protocol.
///
/// Encoding only uses the query half of this trait. Decoding additionally
/// needs the factories, which may intern new types and must therefore be safe
/// to call through a shared reference (a host that is shared between threads
/// needs internal synchronization).
///
/// Containment is uniform: a namespace or named type contains types, a type
/// contains its fields, properties and methods, a method contains its locals.
/// Parameters and type parameters are reached through their own accessors.
pub trait Compilation {
    type Symbol: Clone + Eq + Hash + fmt::Debug;

    fn kind(&self, symbol: &Self::Symbol) -> SymbolKind;

    /// Declared name, or an empty string for unnamed symbols (the global
    /// namespace, array types, unnamed tuple elements).
    fn name(&self, symbol: &Self::Symbol) -> String;

    fn container(&self, symbol: &Self::Symbol) -> Option<Self::Symbol>;

    /// Members in declaration order.
    fn members(&self, symbol: &Self::Symbol) -> Vec<Self::Symbol>;

    /// The type of a field, property, parameter or local; the element type of
    /// an array or pointer.
    fn type_of(&self, symbol: &Self::Symbol) -> Option<Self::Symbol>;

    fn type_parameters(&self, symbol: &Self::Symbol) -> Vec<Self::Symbol>;

    /// Type arguments of a constructed generic type; empty for definitions.
    fn type_arguments(&self, symbol: &Self::Symbol) -> Vec<Self::Symbol>;

    fn original_definition(&self, symbol: &Self::Symbol) -> Self::Symbol;

    fn parameters(&self, symbol: &Self::Symbol) -> Vec<Self::Symbol>;

    /// True for properties without a setter.
    fn is_read_only(&self, symbol: &Self::Symbol) -> bool;

    fn locations(&self, symbol: &Self::Symbol) -> Vec<Location>;

    fn array_rank(&self, symbol: &Self::Symbol) -> usize;

    fn global_namespace(&self) -> Self::Symbol;

    /// The root type every structural fallback resolves to.
    fn universal_type(&self) -> Self::Symbol;

    fn contains_file(&self, path: &str) -> bool;

    fn construct(
        &self,
        definition: &Self::Symbol,
        arguments: &[Self::Symbol],
    ) -> Result<Self::Symbol, ShapeRejected>;

    fn array_type(&self, element: &Self::Symbol, rank: usize) -> Self::Symbol;

    fn pointer_type(&self, pointee: &Self::Symbol) -> Self::Symbol;

    fn tuple_type(
        &self,
        types: &[Self::Symbol],
        names: &[Option<String>],
        locations: &[Location],
    ) -> Result<Self::Symbol, ShapeRejected>;

    fn anonymous_type(
        &self,
        types: &[Self::Symbol],
        names: &[String],
        read_only: &[bool],
        locations: &[Location],
    ) -> Result<Self::Symbol, ShapeRejected>;

    /// First declaration site, or the `Location::None` sentinel.
    fn first_location(&self, symbol: &Self::Symbol) -> Location {
        self.locations(symbol).into_iter().next().unwrap_or_default()
    }

    fn is_definition(&self, symbol: &Self::Symbol) -> bool {
        &self.original_definition(symbol) == symbol
    }
}
