//! Rebuilding structural types from a decoded shape.
//!
//! Structural categories have no name to look up. Once their member arrays
//! have resolved, the shape is handed to the compilation's factory. What
//! happens when the factory says no (or when no shape was recorded at all)
//! depends on the category's `Fallback`.

use crate::{
    compilation::{Compilation, ShapeRejected},
    frame::Presence,
    resolution::{FailureReason, Resolution, Resolved},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// Resolve to the compilation's universal type.
    UniversalType,
    /// Report the rejection as a failure.
    Fail,
}

/// `presence` is the presence of the shape's type array. An absent shape
/// never reaches the factory.
pub fn reconcile<C, F>(
    compilation: &C,
    codec: &'static str,
    presence: Presence,
    fallback: Fallback,
    construct: F,
) -> Resolved<C::Symbol>
where
    C: Compilation,
    F: FnOnce() -> Result<C::Symbol, ShapeRejected>,
{
    if presence.is_absent() {
        log::debug!("[symbol_key] {}: no shape recorded", codec);
        return fall_back(compilation, codec, fallback, str!("no shape recorded"));
    }

    match construct() {
        Ok(symbol) => Ok(Resolution::Symbol(symbol)),
        Err(rejected) => {
            log::debug!("[symbol_key] {}: {}", codec, rejected);
            fall_back(compilation, codec, fallback, rejected.reason)
        }
    }
}

fn fall_back<C: Compilation>(
    compilation: &C,
    codec: &'static str,
    fallback: Fallback,
    detail: String,
) -> Resolved<C::Symbol> {
    match fallback {
        Fallback::UniversalType => Ok(Resolution::Symbol(compilation.universal_type())),
        Fallback::Fail => Err(FailureReason::Rejected { codec, detail }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompilationBuilder;

    #[test]
    fn accepted_shape_is_returned() {
        let b = CompilationBuilder::new();
        let int = b.int();
        let c = b.finish();
        let resolved = reconcile(&c, "Test", Presence::Populated, Fallback::Fail, || {
            Ok(int)
        });
        assert_eq!(resolved, Ok(Resolution::Symbol(int)));
    }

    #[test]
    fn rejection_follows_policy() {
        let c = CompilationBuilder::new().finish();
        let lenient = reconcile(&c, "Test", Presence::Populated, Fallback::UniversalType, || {
            Err(ShapeRejected::new("duplicate member 'x'"))
        });
        assert_eq!(lenient, Ok(Resolution::Symbol(c.universal_type())));

        let strict = reconcile(&c, "Test", Presence::Empty, Fallback::Fail, || {
            Err(ShapeRejected::new("duplicate member 'x'"))
        });
        assert_eq!(
            strict.unwrap_err().to_string(),
            "(Test shape rejected: duplicate member 'x')"
        );
    }

    #[test]
    fn absent_shape_skips_factory() {
        let c = CompilationBuilder::new().finish();
        let resolved = reconcile(&c, "Test", Presence::Absent, Fallback::UniversalType, || {
            panic!("factory must not be called")
        });
        assert_eq!(resolved, Ok(Resolution::Symbol(c.universal_type())));
    }
}
