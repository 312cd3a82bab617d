//! Local identifier synthesis.
//!
//! The remote service answers every create with the same placeholder id and
//! never persists it, so the store assigns its own. The allocator is a
//! monotonic high-water mark: it only ever moves up, so an id freed by a
//! delete is never handed out again within the session.

#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    high_water: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the high-water mark to at least `id`.
    pub fn observe(&mut self, id: u64) {
        self.high_water = self.high_water.max(id);
    }

    pub fn observe_all(&mut self, ids: impl IntoIterator<Item = u64>) {
        for id in ids {
            self.observe(id);
        }
    }

    /// The id the next call to `allocate` will return.
    pub fn peek(&self) -> u64 {
        self.high_water.saturating_add(1)
    }

    pub fn allocate(&mut self) -> u64 {
        let id = self.peek();
        self.high_water = id;
        id
    }
}
