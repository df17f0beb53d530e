//! Reusable buffers for the parallel arrays a decode assembles.
//!
//! An `ArrayArena` belongs to one decode call (or one `Resolver` working
//! through a batch of keys on a single thread). Buffers are handed out as
//! `Pooled` guards that give the buffer back when dropped, so every exit path
//! of a codec, including unwinding, releases what it acquired.

use std::{
    cell::{Cell, RefCell},
    ops::Deref,
    rc::Rc,
};

use crate::{frame::Presence, location::Location};

/// Idle buffers kept per element type.
pub const MAX_IDLE: usize = 16;

/// Buffers that grew past this many elements are dropped on release.
pub const MAX_RETAINED_CAPACITY: usize = 1024;

struct PoolState<T> {
    idle: RefCell<Vec<Vec<T>>>,
    outstanding: Cell<usize>,
}

pub struct Pool<T> {
    state: Rc<PoolState<T>>,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(PoolState {
                idle: RefCell::new(Vec::new()),
                outstanding: Cell::new(0),
            }),
        }
    }

    pub fn acquire(&self, presence: Presence, len: usize) -> Pooled<T> {
        let mut items = self.state.idle.borrow_mut().pop().unwrap_or_default();
        items.reserve(len.min(MAX_RETAINED_CAPACITY));
        self.state.outstanding.set(self.state.outstanding.get() + 1);
        Pooled {
            items,
            presence,
            home: Rc::clone(&self.state),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.state.outstanding.get()
    }

    pub fn idle(&self) -> usize {
        self.state.idle.borrow().len()
    }
}

/// A buffer on loan from a `Pool`, tagged with the presence state it was
/// read with.
pub struct Pooled<T> {
    items: Vec<T>,
    presence: Presence,
    home: Rc<PoolState<T>>,
}

impl<T> Pooled<T> {
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn is_absent(&self) -> bool {
        self.presence.is_absent()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> Pooled<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T> Deref for Pooled<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pooled")
            .field("presence", &self.presence)
            .field("items", &self.items)
            .finish()
    }
}

impl<T> Drop for Pooled<T> {
    fn drop(&mut self) {
        let mut items = std::mem::take(&mut self.items);
        items.clear();
        self.home
            .outstanding
            .set(self.home.outstanding.get().saturating_sub(1));
        if items.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }

        let mut idle = self.home.idle.borrow_mut();
        if idle.len() < MAX_IDLE {
            idle.push(items);
        }
    }
}

/// One pool per element type the protocol reads arrays of.
pub struct ArrayArena<S> {
    pub symbols: Pool<S>,
    pub strings: Pool<Option<String>>,
    pub bools: Pool<bool>,
    pub locations: Pool<Location>,
}

impl<S> ArrayArena<S> {
    pub fn new() -> Self {
        Self {
            symbols: Pool::new(),
            strings: Pool::new(),
            bools: Pool::new(),
            locations: Pool::new(),
        }
    }

    /// Buffers currently on loan, across all element types.
    pub fn outstanding(&self) -> usize {
        self.symbols.outstanding()
            + self.strings.outstanding()
            + self.bools.outstanding()
            + self.locations.outstanding()
    }

    pub fn idle(&self) -> usize {
        self.symbols.idle() + self.strings.idle() + self.bools.idle() + self.locations.idle()
    }
}

impl<S> Default for ArrayArena<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_buffers_are_reused() {
        let pool = Pool::<u32>::new();
        {
            let mut a = pool.acquire(Presence::Populated, 2);
            a.push(1);
            a.push(2);
            assert_eq!(&a[..], &[1, 2]);
            assert_eq!(pool.outstanding(), 1);
        }
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.idle(), 1);

        let b = pool.acquire(Presence::Empty, 0);
        assert!(b.is_empty());
        assert!(b.capacity_hint() >= 2);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn released_on_unwind() {
        let pool = Pool::<String>::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = pool.acquire(Presence::Populated, 1);
            panic!("factory defect");
        }));
        assert!(result.is_err());
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn oversized_buffers_are_not_retained() {
        let pool = Pool::<u8>::new();
        {
            let mut big = pool.acquire(Presence::Populated, MAX_RETAINED_CAPACITY + 1);
            for _ in 0..=MAX_RETAINED_CAPACITY {
                big.push(0);
            }
        }
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn reservation_is_capped() {
        let pool = Pool::<u64>::new();
        let huge = pool.acquire(Presence::Populated, u32::MAX as usize);
        assert!(huge.capacity_hint() <= MAX_RETAINED_CAPACITY * 2);
        assert!(huge.is_empty());
    }

    #[test]
    fn idle_list_is_bounded() {
        let pool = Pool::<u8>::new();
        let guards = (0..MAX_IDLE + 4)
            .map(|_| pool.acquire(Presence::Empty, 0))
            .collect::<Vec<_>>();
        assert_eq!(pool.outstanding(), MAX_IDLE + 4);
        drop(guards);
        assert_eq!(pool.idle(), MAX_IDLE);
    }

    #[test]
    fn arena_keeps_presence() {
        let arena = ArrayArena::<u32>::new();
        let absent = arena.symbols.acquire(Presence::Absent, 0);
        assert!(absent.is_absent());
        assert_eq!(arena.outstanding(), 1);
    }

    impl<T> Pooled<T> {
        fn capacity_hint(&self) -> usize {
            self.items.capacity()
        }
    }
}
