//! The token stream a `SymbolKey` is made of.
//!
//! A key is a flat sequence of frames. There are no lengths or field tags
//! apart from the leading `Kind` of every symbol segment and the header of
//! every array, so the reader has to consume exactly what the writer produced,
//! in the same order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire discriminant selecting the codec for one symbol segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Namespace,
    NamedType,
    ArrayType,
    PointerType,
    TupleType,
    AnonymousType,
    TypeParameter,
    /// A method's type parameter referenced from inside that method's own
    /// signature, written as (method stack index, ordinal).
    TypeParameterOrdinal,
    Field,
    Property,
    Method,
    Parameter,
    Local,
}

impl Category {
    pub fn tag(&self) -> char {
        match self {
            Category::Namespace => 'N',
            Category::NamedType => 'D',
            Category::ArrayType => 'Z',
            Category::PointerType => 'P',
            Category::TupleType => 'U',
            Category::AnonymousType => 'W',
            Category::TypeParameter => 'Y',
            Category::TypeParameterOrdinal => '@',
            Category::Field => 'F',
            Category::Property => 'Q',
            Category::Method => 'M',
            Category::Parameter => 'R',
            Category::Local => 'B',
        }
    }
}

/// Tri-state array presence. `Absent` means the writer had nothing it could
/// describe, which is not the same thing as an empty shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    Absent,
    Empty,
    Populated,
}

impl Presence {
    pub fn of_len(len: usize) -> Presence {
        if len == 0 {
            Presence::Empty
        } else {
            Presence::Populated
        }
    }

    pub fn of<T>(items: Option<&[T]>) -> Presence {
        items.map_or(Presence::Absent, |items| Presence::of_len(items.len()))
    }

    pub fn is_absent(&self) -> bool {
        *self == Presence::Absent
    }

    /// Whether a header with this presence may announce `len` elements.
    pub fn admits(&self, len: usize) -> bool {
        match self {
            Presence::Absent | Presence::Empty => len == 0,
            Presence::Populated => len > 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frame {
    Kind(Category),
    Str(Option<String>),
    Bool(bool),
    Int(i64),
    Array(Presence, u32),
}

impl Frame {
    pub fn describe(&self) -> &'static str {
        match self {
            Frame::Kind(_) => "symbol kind",
            Frame::Str(_) => "string",
            Frame::Bool(_) => "boolean",
            Frame::Int(_) => "integer",
            Frame::Array(..) => "array header",
        }
    }

    /// Frame equality with case-insensitive strings.
    pub fn eq_ignore_case(&self, other: &Frame) -> bool {
        match (self, other) {
            (Frame::Str(Some(a)), Frame::Str(Some(b))) => a.to_lowercase() == b.to_lowercase(),
            _ => self == other,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Kind(c) => write!(f, "{}", c.tag()),
            Frame::Str(None) => write!(f, "#"),
            Frame::Str(Some(s)) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Frame::Bool(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            Frame::Int(i) => write!(f, "{}", i),
            Frame::Array(Presence::Absent, _) => write!(f, "%#"),
            Frame::Array(_, len) => write!(f, "%{}", len),
        }
    }
}
