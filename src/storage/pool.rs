//! Reusable result buffers.
//!
//! Reductions and broadcasts take their output buffers from a [`BufferPool`]
//! so that repeated calls do not allocate on every invocation. Buffers are
//! keyed by element type; a released buffer is handed out again to any
//! request of the same type whose length fits its capacity.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::element::Element;

/// Pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// When `false` every acquire allocates and every release drops.
    pub enabled: bool,
    /// Upper bound on the free buffers kept per element type.
    pub max_buffers_per_type: usize,
    /// A free buffer is reused only if its capacity is at most this many
    /// times the requested length.
    pub max_oversize: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_buffers_per_type: 16,
            max_oversize: 2,
        }
    }
}

/// Counters describing pool traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: u64,
    pub reused: u64,
    pub allocated: u64,
    pub released: u64,
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicU64,
    reused: AtomicU64,
    allocated: AtomicU64,
    released: AtomicU64,
    dropped: AtomicU64,
}

type FreeList = Vec<Box<dyn Any + Send>>;

/// Thread-safe free list of typed buffers.
#[derive(Debug, Default)]
pub struct BufferPool {
    config: PoolConfig,
    free: Mutex<HashMap<TypeId, FreeList>>,
    counters: Counters,
}

impl BufferPool {
    /// Creates an empty pool.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            free: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    /// The process-wide pool used by the convenience front end.
    pub fn global() -> &'static BufferPool {
        static GLOBAL: OnceLock<BufferPool> = OnceLock::new();
        GLOBAL.get_or_init(BufferPool::default)
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    // The free list is a plain map; a panic while holding the lock cannot
    // leave it half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, FreeList>> {
        self.free.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a buffer holding exactly `len` zeroed elements.
    pub fn acquire<T: Element>(&self, len: usize) -> Vec<T> {
        self.counters.acquired.fetch_add(1, Ordering::Relaxed);

        if self.config.enabled {
            if let Some(mut buffer) = self.take_free::<T>(len) {
                self.counters.reused.fetch_add(1, Ordering::Relaxed);
                buffer.clear();
                buffer.resize(len, T::zero());
                return buffer;
            }
        }

        self.counters.allocated.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "buffer pool miss: allocating {} x {}",
            len,
            std::any::type_name::<T>()
        );
        vec![T::zero(); len]
    }

    fn take_free<T: Element>(&self, len: usize) -> Option<Vec<T>> {
        let mut free = self.lock();
        let list = free.get_mut(&TypeId::of::<T>())?;
        let max_capacity = len.saturating_mul(self.config.max_oversize.max(1)).max(1);
        let position = list.iter().position(|entry| {
            entry
                .downcast_ref::<Vec<T>>()
                .map(|v| v.capacity() >= len && v.capacity() <= max_capacity)
                .unwrap_or(false)
        })?;
        list.swap_remove(position).downcast::<Vec<T>>().ok().map(|b| *b)
    }

    /// Hands a buffer back for reuse.
    pub fn release<T: Element>(&self, buffer: Vec<T>) {
        if !self.config.enabled || buffer.capacity() == 0 {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let mut free = self.lock();
        let list = free.entry(TypeId::of::<T>()).or_default();
        if list.len() >= self.config.max_buffers_per_type {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            log::debug!(
                "buffer pool full for {}: dropping buffer of capacity {}",
                std::any::type_name::<T>(),
                buffer.capacity()
            );
            return;
        }
        list.push(Box::new(buffer));
        self.counters.released.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of free buffers currently held for `T`.
    pub fn free_count<T: Element>(&self) -> usize {
        self.lock()
            .get(&TypeId::of::<T>())
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Drops every free buffer.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Snapshot of the traffic counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            acquired: self.counters.acquired.load(Ordering::Relaxed),
            reused: self.counters.reused.load(Ordering::Relaxed),
            allocated: self.counters.allocated.load(Ordering::Relaxed),
            released: self.counters.released.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}
