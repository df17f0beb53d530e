use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::{
    arena::ArrayArena,
    compilation::Compilation,
    errors::{KeyError, KeyErrorKind, KeyResult},
    frame::{Category, Frame, Presence},
    options::ResolveOptions,
    reader::KeyReader,
    resolution::Resolved,
    writer::KeyWriter,
};

/// Bump this whenever the frame layout of any category changes.
pub const FORMAT_VERSION: u32 = 1;

/// A portable description of a symbol: encoded against one compilation and
/// resolved against another (or a later snapshot of the same one).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolKey {
    version: u32,
    frames: Vec<Frame>,
}

impl SymbolKey {
    pub fn create<C: Compilation>(compilation: &C, symbol: &C::Symbol) -> SymbolKey {
        let mut writer = KeyWriter::new(compilation);
        writer.write_symbol_key(symbol);
        let key = SymbolKey::from_frames(writer.finish());
        log::trace!("[symbol_key] created {}", key);
        key
    }

    pub fn from_frames(frames: Vec<Frame>) -> SymbolKey {
        SymbolKey {
            version: FORMAT_VERSION,
            frames,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Category of the outermost symbol.
    pub fn category(&self) -> Option<Category> {
        match self.frames.first() {
            Some(Frame::Kind(category)) => Some(*category),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> KeyResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// The version is checked before the frames are decoded, so a key written
    /// by an incompatible format reports a version error rather than garbage.
    pub fn from_bytes(bytes: &[u8]) -> KeyResult<SymbolKey> {
        let version: u32 = bincode::deserialize(bytes)?;
        check_version(version)?;
        Ok(bincode::deserialize(bytes)?)
    }

    /// A stable 64-bit digest of the frames, for use as a cache key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.update(&self.version.to_le_bytes());
        for frame in self.frames.iter() {
            match frame {
                Frame::Kind(category) => {
                    hasher.update(&[0, category.tag() as u8]);
                }
                Frame::Str(None) => hasher.update(&[1]),
                Frame::Str(Some(s)) => {
                    hasher.update(&[2]);
                    hasher.update(&(s.len() as u64).to_le_bytes());
                    hasher.update(s.as_bytes());
                }
                Frame::Bool(b) => hasher.update(&[3, *b as u8]),
                Frame::Int(i) => {
                    hasher.update(&[4]);
                    hasher.update(&i.to_le_bytes());
                }
                Frame::Array(presence, len) => {
                    let presence = match presence {
                        Presence::Absent => 0,
                        Presence::Empty => 1,
                        Presence::Populated => 2,
                    };
                    hasher.update(&[5, presence]);
                    hasher.update(&len.to_le_bytes());
                }
            }
        }
        hasher.digest()
    }

    /// Frame-wise comparison; with `ignore_case`, names differing only in
    /// case are considered equal.
    pub fn equivalent(&self, other: &SymbolKey, ignore_case: bool) -> bool {
        self.version == other.version
            && self.frames.len() == other.frames.len()
            && self.frames.iter().zip(other.frames.iter()).all(|(a, b)| {
                if ignore_case {
                    a.eq_ignore_case(b)
                } else {
                    a == b
                }
            })
    }

    pub fn resolve<C: Compilation>(&self, compilation: &C) -> KeyResult<Resolved<C::Symbol>> {
        self.resolve_with(compilation, &ResolveOptions::default())
    }

    pub fn resolve_with<C: Compilation>(
        &self,
        compilation: &C,
        options: &ResolveOptions,
    ) -> KeyResult<Resolved<C::Symbol>> {
        let arena = ArrayArena::new();
        self.resolve_in(compilation, options, &arena)
    }

    fn resolve_in<C: Compilation>(
        &self,
        compilation: &C,
        options: &ResolveOptions,
        arena: &ArrayArena<C::Symbol>,
    ) -> KeyResult<Resolved<C::Symbol>> {
        check_version(self.version)?;
        let mut reader = KeyReader::new(compilation, options, arena, &self.frames);
        let resolved = reader.read_root();
        match &resolved {
            Ok(Ok(resolution)) if resolution.is_ambiguous() => {
                log::debug!(
                    "[symbol_key] {} is ambiguous ({} candidates)",
                    self,
                    resolution.candidates().len()
                )
            }
            Ok(Err(reason)) => log::debug!("[symbol_key] {} did not resolve: {}", self, reason),
            Err(err) => log::warn!("[symbol_key] {} is unusable: {}", self, err),
            _ => {}
        }
        resolved
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version)?;
        for frame in self.frames.iter() {
            write!(f, " {}", frame)?;
        }
        Ok(())
    }
}

fn check_version(version: u32) -> KeyResult {
    if version != FORMAT_VERSION {
        return Err(KeyError::new(
            KeyErrorKind::Version,
            format!(
                "key format version {} is not supported (expected {})",
                version, FORMAT_VERSION
            ),
        ));
    }
    Ok(())
}

/// Resolves many keys against one compilation, reusing a single array arena.
///
/// The arena is not thread-safe; create one resolver per thread.
pub struct Resolver<'c, C: Compilation> {
    compilation: &'c C,
    options: ResolveOptions,
    arena: ArrayArena<C::Symbol>,
}

impl<'c, C: Compilation> Resolver<'c, C> {
    pub fn new(compilation: &'c C) -> Self {
        Self::with_options(compilation, ResolveOptions::default())
    }

    pub fn with_options(compilation: &'c C, options: ResolveOptions) -> Self {
        Self {
            compilation,
            options,
            arena: ArrayArena::new(),
        }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn arena(&self) -> &ArrayArena<C::Symbol> {
        &self.arena
    }

    pub fn resolve(&self, key: &SymbolKey) -> KeyResult<Resolved<C::Symbol>> {
        key.resolve_in(self.compilation, &self.options, &self.arena)
    }

    pub fn resolve_all<'k, I>(&self, keys: I) -> Vec<KeyResult<Resolved<C::Symbol>>>
    where
        I: IntoIterator<Item = &'k SymbolKey>,
    {
        keys.into_iter().map(|key| self.resolve(key)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        location::Location,
        model::CompilationBuilder,
        resolution::{FailureReason, Resolution},
    };

    #[test]
    fn display_lists_frames() {
        let key = SymbolKey::from_frames(vec![
            Frame::Kind(Category::Field),
            Frame::Kind(Category::Namespace),
            Frame::Bool(true),
            Frame::Str(Some(str!("say \"hi\""))),
            Frame::Str(None),
            Frame::Array(Presence::Absent, 0),
            Frame::Array(Presence::Populated, 2),
            Frame::Int(-3),
        ]);
        assert_eq!(key.to_string(), r#"v1 F N T "say ""hi""" # %# %2 -3"#);
        assert_eq!(key.category(), Some(Category::Field));
    }

    #[test]
    fn fingerprint_tracks_frames() {
        let a = SymbolKey::from_frames(vec![Frame::Str(Some(str!("a"))), Frame::Int(1)]);
        let b = SymbolKey::from_frames(vec![Frame::Str(Some(str!("a"))), Frame::Int(1)]);
        let c = SymbolKey::from_frames(vec![Frame::Str(Some(str!("a1")))]);
        let d = SymbolKey::from_frames(vec![Frame::Str(None), Frame::Int(1)]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(a.fingerprint(), d.fingerprint());
    }

    #[test]
    fn equivalence_can_ignore_case() {
        let upper = SymbolKey::from_frames(vec![Frame::Str(Some(str!("Point")))]);
        let lower = SymbolKey::from_frames(vec![Frame::Str(Some(str!("point")))]);
        assert!(!upper.equivalent(&lower, false));
        assert!(upper.equivalent(&lower, true));
        assert!(upper.equivalent(&upper.clone(), false));
    }

    #[test]
    fn bytes_carry_the_version() {
        let key = SymbolKey::from_frames(vec![Frame::Kind(Category::Namespace), Frame::Bool(true)]);
        let bytes = key.to_bytes().unwrap();
        assert_eq!(SymbolKey::from_bytes(&bytes).unwrap(), key);

        let stale = SymbolKey {
            version: FORMAT_VERSION + 1,
            frames: key.frames().to_vec(),
        };
        let err = SymbolKey::from_bytes(&stale.to_bytes().unwrap()).unwrap_err();
        assert_eq!(err.kind, KeyErrorKind::Version);
        assert_eq!(stale.resolve(&CompilationBuilder::new().finish()).unwrap_err().kind, KeyErrorKind::Version);

        let err = SymbolKey::from_bytes(&[1, 0]).unwrap_err();
        assert_eq!(err.kind, KeyErrorKind::Encoding);
    }

    #[test]
    fn resolver_reuses_its_arena() {
        let mut b = CompilationBuilder::new();
        let point = b.class(b.global(), "Point", &[]);
        let x = b.field(point, "x", b.int(), Location::None);
        let m = b.method(point, "move_by", &[]);
        b.parameter(m, "dx", b.int());
        let c = b.finish();

        let keys = vec![
            SymbolKey::create(&c, &x),
            SymbolKey::create(&c, &m),
            SymbolKey::create(&c, &point),
        ];
        let resolver = Resolver::new(&c);
        let resolved = resolver.resolve_all(&keys);
        assert_eq!(
            resolved,
            vec![
                Ok(Ok(Resolution::Symbol(x))),
                Ok(Ok(Resolution::Symbol(m))),
                Ok(Ok(Resolution::Symbol(point))),
            ]
        );
        assert_eq!(resolver.arena().outstanding(), 0);
        assert!(resolver.arena().idle() > 0);
    }

    #[test]
    fn empty_key_is_truncated() {
        let c = CompilationBuilder::new().finish();
        let err = SymbolKey::from_frames(Vec::new()).resolve(&c).unwrap_err();
        assert_eq!(err.kind, KeyErrorKind::Truncated);
    }

    #[test]
    fn missing_field_names_the_codec() {
        let mut b = CompilationBuilder::new();
        let point = b.class(b.global(), "Point", &[]);
        let x = b.field(point, "x", b.int(), Location::None);
        let key = SymbolKey::create(&b.finish(), &x);

        let mut b = CompilationBuilder::new();
        b.class(b.global(), "Point", &[]);
        let resolved = key.resolve(&b.finish()).unwrap();
        assert_eq!(
            resolved,
            Err(FailureReason::not_found("FieldSymbolKey", "x"))
        );
    }
}
