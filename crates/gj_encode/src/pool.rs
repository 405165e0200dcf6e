use alloc::vec::Vec;
use std::sync::{Mutex, PoisonError};

/// Buffers above this capacity are not kept.
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;
/// At most this many idle buffers are kept.
const MAX_IDLE: usize = 16;

/// A pool of reusable output buffers.
///
/// A buffer is always empty when handed out; callers copy its content out
/// before giving it back.
#[derive(Debug)]
pub(crate) struct BufferPool {
    idle: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub const fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
        }
    }

    pub fn take(&self) -> Vec<u8> {
        let mut buffer = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        buffer.clear();
        buffer
    }

    pub fn give(&self, mut buffer: Vec<u8>) {
        if buffer.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buffer.clear();
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < MAX_IDLE {
            idle.push(buffer);
        }
    }

    #[cfg(test)]
    fn idle_len(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_come_back_empty() {
        let pool = BufferPool::new();
        let mut buffer = pool.take();
        buffer.extend_from_slice(b"stale");
        let capacity = buffer.capacity();
        pool.give(buffer);

        let reused = pool.take();
        assert!(reused.is_empty());
        assert_eq!(reused.capacity(), capacity);
    }

    #[test]
    fn oversized_buffers_are_dropped() {
        let pool = BufferPool::new();
        pool.give(Vec::with_capacity(MAX_RETAINED_CAPACITY + 1));
        assert_eq!(pool.idle_len(), 0);

        for _ in 0..MAX_IDLE + 4 {
            pool.give(Vec::with_capacity(8));
        }
        assert_eq!(pool.idle_len(), MAX_IDLE);
    }
}
