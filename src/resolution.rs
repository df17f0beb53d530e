use std::{fmt, sync::Arc};

use itertools::Itertools;

/// A successfully decoded key: either exactly one symbol or several equally
/// good candidates, in lookup order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution<S> {
    Symbol(S),
    Ambiguous(Vec<S>),
}

/// The outcome of decoding a key against one compilation. There is no
/// "resolved to nothing" state: that is always a `FailureReason`.
pub type Resolved<S> = Result<Resolution<S>, FailureReason>;

impl<S> Resolution<S>
where
    S: Clone + Eq + std::hash::Hash,
{
    /// Collapses lookup results: duplicates are dropped (first occurrence
    /// wins), a single survivor is a `Symbol`, more are `Ambiguous`, none is
    /// the failure built by `missing`.
    pub fn from_candidates<I, F>(candidates: I, missing: F) -> Resolved<S>
    where
        I: IntoIterator<Item = S>,
        F: FnOnce() -> FailureReason,
    {
        let mut candidates = candidates.into_iter().unique().collect::<Vec<_>>();
        match candidates.len() {
            0 => Err(missing()),
            1 => Ok(Resolution::Symbol(candidates.remove(0))),
            _ => Ok(Resolution::Ambiguous(candidates)),
        }
    }
}

impl<S> Resolution<S> {
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Resolution::Symbol(s) => Some(s),
            Resolution::Ambiguous(_) => None,
        }
    }

    /// The symbol, or the first candidate. `None` only for an `Ambiguous`
    /// built by hand with no candidates; `from_candidates` never makes one.
    pub fn any_symbol(&self) -> Option<&S> {
        self.candidates().first()
    }

    pub fn candidates(&self) -> &[S] {
        match self {
            Resolution::Symbol(s) => std::slice::from_ref(s),
            Resolution::Ambiguous(candidates) => candidates,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous(_))
    }

    pub fn map<T, F: FnMut(S) -> T>(self, mut f: F) -> Resolution<T> {
        match self {
            Resolution::Symbol(s) => Resolution::Symbol(f(s)),
            Resolution::Ambiguous(c) => Resolution::Ambiguous(c.into_iter().map(f).collect()),
        }
    }
}

/// Why a key could not be resolved, innermost cause last.
///
/// Reasons are built bottom-up while the resolve stack unwinds: the codec
/// that hit the problem creates a leaf and every enclosing codec wraps it
/// with the field it was reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    NotFound {
        codec: &'static str,
        name: String,
    },
    Rejected {
        codec: &'static str,
        detail: String,
    },
    NotInCompilation {
        path: String,
    },
    Unbound {
        codec: &'static str,
        detail: String,
    },
    Field {
        codec: &'static str,
        field: &'static str,
        cause: Arc<FailureReason>,
    },
    Element {
        index: usize,
        cause: Arc<FailureReason>,
    },
}

impl FailureReason {
    pub fn not_found(codec: &'static str, name: impl Into<String>) -> FailureReason {
        FailureReason::NotFound {
            codec,
            name: name.into(),
        }
    }

    pub fn field(codec: &'static str, field: &'static str, cause: FailureReason) -> FailureReason {
        FailureReason::Field {
            codec,
            field,
            cause: Arc::new(cause),
        }
    }

    pub fn element(index: usize, cause: FailureReason) -> FailureReason {
        FailureReason::Element {
            index,
            cause: Arc::new(cause),
        }
    }

    pub fn cause(&self) -> Option<&FailureReason> {
        match self {
            FailureReason::Field { cause, .. } | FailureReason::Element { cause, .. } => {
                Some(cause)
            }
            _ => None,
        }
    }

    /// This reason followed by its causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &FailureReason> {
        std::iter::successors(Some(self), |r| r.cause())
    }

    pub fn root_cause(&self) -> &FailureReason {
        self.chain().last().unwrap_or(self)
    }

    /// Whether any link of the chain was produced while reading `field`.
    pub fn involves_field(&self, field: &str) -> bool {
        self.chain().any(|r| match r {
            FailureReason::Field { field: f, .. } => *f == field,
            _ => false,
        })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotFound { codec, name } => write!(f, "({} '{}' not found)", codec, name),
            FailureReason::Rejected { codec, detail } => {
                write!(f, "({} shape rejected: {})", codec, detail)
            }
            FailureReason::NotInCompilation { path } => {
                write!(f, "(location '{}' not in compilation)", path)
            }
            FailureReason::Unbound { codec, detail } => write!(f, "({} {})", codec, detail),
            FailureReason::Field {
                codec,
                field,
                cause,
            } => write!(f, "({} {} failed -> {})", codec, field, cause),
            FailureReason::Element { index, cause } => {
                write!(f, "(element {} failed -> {})", index, cause)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_collapse_by_count() {
        let none = Resolution::<u32>::from_candidates(vec![], || {
            FailureReason::not_found("FieldSymbolKey", "x")
        });
        assert_eq!(
            none,
            Err(FailureReason::not_found("FieldSymbolKey", "x"))
        );

        let one = Resolution::from_candidates(vec![7, 7], || unreachable!());
        assert_eq!(one, Ok(Resolution::Symbol(7)));

        let many = Resolution::from_candidates(vec![3, 1, 3, 2], || unreachable!());
        assert_eq!(many, Ok(Resolution::Ambiguous(vec![3, 1, 2])));
    }

    #[test]
    fn chain_reads_outermost_first() {
        let reason = FailureReason::field(
            "AnonymousTypeSymbolKey",
            "propertyTypes",
            FailureReason::element(1, FailureReason::not_found("NamedTypeSymbolKey", "Gone")),
        );
        assert_eq!(
            reason.to_string(),
            "(AnonymousTypeSymbolKey propertyTypes failed -> (element 1 failed -> (NamedTypeSymbolKey 'Gone' not found)))"
        );
        assert_eq!(reason.chain().count(), 3);
        assert!(reason.involves_field("propertyTypes"));
        assert!(!reason.involves_field("propertyLocations"));
        assert_eq!(
            reason.root_cause(),
            &FailureReason::not_found("NamedTypeSymbolKey", "Gone")
        );
    }

    #[test]
    fn any_symbol_prefers_first_candidate() {
        let res = Resolution::Ambiguous(vec!["a", "b"]);
        assert_eq!(res.any_symbol(), Some(&"a"));
        assert!(res.symbol().is_none());
        assert_eq!(res.map(|s| s.len()).candidates(), &[1, 1]);
    }

    #[test]
    fn empty_ambiguity_has_no_symbol() {
        let res = Resolution::<u32>::Ambiguous(Vec::new());
        assert_eq!(res.any_symbol(), None);
        assert!(res.candidates().is_empty());
    }
}
