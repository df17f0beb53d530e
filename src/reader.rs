use crate::{
    arena::{ArrayArena, Pooled},
    codecs,
    compilation::Compilation,
    errors::{KeyError, KeyErrorKind, KeyResult},
    frame::{Category, Frame, Presence},
    location::{Location, Pos, Span},
    options::ResolveOptions,
    resolution::{FailureReason, Resolved},
};

/// Replays a key's frames against a target compilation.
///
/// Every `read_*` call consumes exactly the frames the matching `write_*`
/// produced. Two error tiers come back from the reads: a `KeyError` (the
/// outer `Result`) means the stream itself is unusable and decoding stops; a
/// `FailureReason` (the inner `Result`) means a symbol could not be found in
/// this compilation, and the stream is still positioned correctly for the
/// next read.
pub struct KeyReader<'a, C: Compilation> {
    compilation: &'a C,
    options: &'a ResolveOptions,
    arena: &'a ArrayArena<C::Symbol>,
    frames: &'a [Frame],
    pos: usize,
    depth: usize,
    methods: Vec<C::Symbol>,
}

impl<'a, C: Compilation> KeyReader<'a, C> {
    pub fn new(
        compilation: &'a C,
        options: &'a ResolveOptions,
        arena: &'a ArrayArena<C::Symbol>,
        frames: &'a [Frame],
    ) -> Self {
        Self {
            compilation,
            options,
            arena,
            frames,
            pos: 0,
            depth: 0,
            methods: Vec::new(),
        }
    }

    pub fn compilation(&self) -> &'a C {
        self.compilation
    }

    pub fn options(&self) -> &'a ResolveOptions {
        self.options
    }

    pub fn names_match(&self, a: &str, b: &str) -> bool {
        self.options.names_match(a, b)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewinds to a position previously returned by `position`, to replay a
    /// segment once per lookup candidate.
    pub fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }

    pub fn skip_to(&mut self, pos: usize) {
        self.pos = self.pos.max(pos);
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.frames.len()
    }

    /// Decodes the whole stream as one key.
    pub fn read_root(&mut self) -> KeyResult<Resolved<C::Symbol>> {
        let resolved = self.read_symbol_key()?;
        if !self.is_at_end() {
            return Err(KeyError::malformed(format!(
                "{} trailing frame(s) after position {}",
                self.frames.len() - self.pos,
                self.pos
            )));
        }
        Ok(resolved)
    }

    pub fn read_symbol_key(&mut self) -> KeyResult<Resolved<C::Symbol>> {
        if self.options.is_cancelled() {
            return Err(KeyError::cancelled());
        }
        if self.depth >= self.options.max_depth {
            return Err(KeyError::new(
                KeyErrorKind::TooDeep,
                format!("keys nested deeper than {}", self.options.max_depth),
            ));
        }

        let category = self.read_kind()?;
        let codec = codecs::codec_for::<C>(category);
        log::trace!("[symbol_key] {} at frame {}", codec.name, self.pos);

        self.depth += 1;
        let resolved = (codec.resolve)(self);
        self.depth -= 1;

        let resolved = resolved?;
        if let Err(reason) = &resolved {
            log::debug!("[symbol_key] {} failed: {}", codec.name, reason);
        }
        Ok(resolved)
    }

    /// Reads every element even after one has failed, so the frames after the
    /// array stay aligned. The first failing element is reported.
    pub fn read_symbol_key_array(
        &mut self,
    ) -> KeyResult<Result<Pooled<C::Symbol>, FailureReason>> {
        let (presence, len) = self.read_array_header()?;
        let mut symbols = self.arena.symbols.acquire(presence, len);
        let mut failure = None;
        for index in 0..len {
            match self.read_symbol_key()? {
                Ok(resolution) => match resolution.any_symbol() {
                    Some(symbol) => symbols.push(symbol.clone()),
                    None => {
                        failure.get_or_insert_with(|| {
                            FailureReason::element(
                                index,
                                FailureReason::not_found("SymbolKey", "<no candidates>"),
                            )
                        });
                    }
                },
                Err(reason) => {
                    if failure.is_none() {
                        failure = Some(FailureReason::element(index, reason));
                    }
                }
            }
        }

        Ok(match failure {
            Some(reason) => Err(reason),
            None => Ok(symbols),
        })
    }

    pub fn read_kind(&mut self) -> KeyResult<Category> {
        match self.next()? {
            Frame::Kind(category) => Ok(*category),
            other => Err(self.unexpected("symbol kind", other)),
        }
    }

    pub fn read_string(&mut self) -> KeyResult<Option<String>> {
        match self.next()? {
            Frame::Str(s) => Ok(s.clone()),
            other => Err(self.unexpected("string", other)),
        }
    }

    /// A string that the writer never leaves out.
    pub fn read_name(&mut self) -> KeyResult<String> {
        self.read_string()?
            .ok_or_else(|| KeyError::malformed(format!("missing name at frame {}", self.pos - 1)))
    }

    pub fn read_string_array(&mut self) -> KeyResult<Pooled<Option<String>>> {
        let (presence, len) = self.read_array_header()?;
        let mut strings = self.arena.strings.acquire(presence, len);
        for _ in 0..len {
            strings.push(self.read_string()?);
        }
        Ok(strings)
    }

    pub fn read_bool(&mut self) -> KeyResult<bool> {
        match self.next()? {
            Frame::Bool(b) => Ok(*b),
            other => Err(self.unexpected("boolean", other)),
        }
    }

    pub fn read_bool_array(&mut self) -> KeyResult<Pooled<bool>> {
        let (presence, len) = self.read_array_header()?;
        let mut bools = self.arena.bools.acquire(presence, len);
        for _ in 0..len {
            bools.push(self.read_bool()?);
        }
        Ok(bools)
    }

    pub fn read_int(&mut self) -> KeyResult<i64> {
        match self.next()? {
            Frame::Int(i) => Ok(*i),
            other => Err(self.unexpected("integer", other)),
        }
    }

    pub fn read_usize(&mut self) -> KeyResult<usize> {
        let value = self.read_int()?;
        if value < 0 {
            return Err(KeyError::malformed(format!(
                "negative count {} at frame {}",
                value,
                self.pos - 1
            )));
        }
        Ok(value as usize)
    }

    /// A source location whose file is not part of the target compilation
    /// fails; the `None` sentinel always resolves.
    pub fn read_location(&mut self) -> KeyResult<Result<Location, FailureReason>> {
        match self.read_int()? {
            0 => Ok(Ok(Location::None)),
            1 => {
                let path = self.read_name()?;
                let start = self.read_pos()?;
                let end = self.read_pos()?;
                if !self.compilation.contains_file(&path) {
                    return Ok(Err(FailureReason::NotInCompilation { path }));
                }
                Ok(Ok(Location::source(path, Span::new(start, end))))
            }
            kind => Err(KeyError::malformed(format!(
                "unknown location kind {} at frame {}",
                kind,
                self.pos - 1
            ))),
        }
    }

    pub fn read_location_array(&mut self) -> KeyResult<Result<Pooled<Location>, FailureReason>> {
        let (presence, len) = self.read_array_header()?;
        let mut locations = self.arena.locations.acquire(presence, len);
        let mut failure = None;
        for index in 0..len {
            match self.read_location()? {
                Ok(location) => locations.push(location),
                Err(reason) => {
                    if failure.is_none() {
                        failure = Some(FailureReason::element(index, reason));
                    }
                }
            }
        }

        Ok(match failure {
            Some(reason) => Err(reason),
            None => Ok(locations),
        })
    }

    pub fn push_method(&mut self, method: C::Symbol) {
        self.methods.push(method);
    }

    pub fn pop_method(&mut self) {
        self.methods.pop();
    }

    pub fn method_at(&self, index: usize) -> Option<&C::Symbol> {
        self.methods.get(index)
    }

    fn read_pos(&mut self) -> KeyResult<Pos> {
        Ok(Pos {
            lineno: self.read_usize()?,
            col: self.read_usize()?,
            offset: self.read_usize()?,
        })
    }

    fn read_array_header(&mut self) -> KeyResult<(Presence, usize)> {
        match self.next()? {
            Frame::Array(presence, len) => {
                let (presence, len) = (*presence, *len as usize);
                if !presence.admits(len) {
                    return Err(KeyError::malformed(format!(
                        "{:?} array header announces {} element(s) at frame {}",
                        presence,
                        len,
                        self.pos - 1
                    )));
                }
                // every element takes at least one frame
                let remaining = self.frames.len() - self.pos;
                if len > remaining {
                    return Err(KeyError::malformed(format!(
                        "array header at frame {} announces {} element(s), only {} frame(s) left",
                        self.pos - 1,
                        len,
                        remaining
                    )));
                }
                Ok((presence, len))
            }
            other => Err(self.unexpected("array header", other)),
        }
    }

    fn next(&mut self) -> KeyResult<&'a Frame> {
        let frames: &'a [Frame] = self.frames;
        let frame = frames
            .get(self.pos)
            .ok_or_else(|| KeyError::truncated(self.pos))?;
        self.pos += 1;
        Ok(frame)
    }

    fn unexpected(&self, expected: &str, found: &Frame) -> KeyError {
        KeyError::malformed(format!(
            "expected {} at frame {}, found {}",
            expected,
            self.pos - 1,
            found.describe()
        ))
    }
}
