use std::fmt;

pub type KeyResult<T = ()> = Result<T, KeyError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyErrorKind {
    Version,
    Malformed,
    Truncated,
    TooDeep,
    Cancelled,
    Encoding,
}

impl fmt::Display for KeyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                KeyErrorKind::Version => "version error",
                KeyErrorKind::Malformed => "malformed key",
                KeyErrorKind::Truncated => "truncated key",
                KeyErrorKind::TooDeep => "nesting error",
                KeyErrorKind::Cancelled => "cancelled",
                KeyErrorKind::Encoding => "encoding error",
            }
        )
    }
}

/// A defect in the key itself or in the decode call, as opposed to a symbol
/// that could not be found (see `FailureReason`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyError {
    pub msg: String,
    pub kind: KeyErrorKind,
}

impl KeyError {
    pub fn new(kind: KeyErrorKind, msg: impl Into<String>) -> KeyError {
        KeyError {
            msg: msg.into(),
            kind,
        }
    }

    pub fn malformed(msg: impl Into<String>) -> KeyError {
        KeyError::new(KeyErrorKind::Malformed, msg)
    }

    pub fn truncated(pos: usize) -> KeyError {
        KeyError::new(
            KeyErrorKind::Truncated,
            format!("expected a frame at position {}", pos),
        )
    }

    pub fn cancelled() -> KeyError {
        KeyError::new(KeyErrorKind::Cancelled, "resolution was cancelled")
    }
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

impl std::error::Error for KeyError {}

impl From<bincode::Error> for KeyError {
    fn from(err: bincode::Error) -> KeyError {
        KeyError {
            msg: err.to_string(),
            kind: KeyErrorKind::Encoding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_kind_then_message() {
        let err = KeyError::truncated(4);
        assert_eq!(
            err.to_string(),
            "truncated key: expected a frame at position 4"
        );
    }
}
