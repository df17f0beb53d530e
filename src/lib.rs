#[macro_use]
mod macros;

pub mod arena;
pub mod codecs;
pub mod compilation;
pub mod errors;
pub mod frame;
pub mod key;
pub mod location;
pub mod logger;
pub mod model;
pub mod options;
pub mod reader;
pub mod reconcile;
pub mod resolution;
pub mod writer;

pub use compilation::{Compilation, ShapeRejected, SymbolKind};
pub use errors::{KeyError, KeyErrorKind, KeyResult};
pub use frame::{Category, Frame, Presence};
pub use key::{Resolver, SymbolKey};
pub use location::{Location, Pos, Span};
pub use options::{CancellationFlag, ResolveOptions};
pub use resolution::{FailureReason, Resolution, Resolved};
