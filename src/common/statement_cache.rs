use hashlink::LruCache;

/// A cache for server-prepared statements, keyed by SQL text. When full,
/// the least recently used entry is evicted and returned so the caller can
/// issue `COM_STMT_CLOSE` for it.
///
/// Generic over the cached value so callers can store more than a bare
/// statement id (e.g. id plus parameter/column counts) without this module
/// needing to know their shape.
#[derive(Debug)]
pub(crate) struct StatementCache<V = u32> {
    inner: LruCache<String, V>,
    capacity: usize,
}

impl<V: Copy> StatementCache<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: LruCache::new(capacity.max(1)),
            capacity,
        }
    }

    pub(crate) fn get(&mut self, sql: &str) -> Option<V> {
        self.inner.get_mut(sql).copied()
    }

    /// Inserts `sql -> value`, returning an entry that must be closed:
    /// either the value this call replaced, or the one evicted to make room.
    pub(crate) fn insert(&mut self, sql: &str, value: V) -> Option<V> {
        if let Some(replaced) = self.inner.remove(sql) {
            self.inner.insert(sql.to_owned(), value);
            return Some(replaced);
        }

        let evicted = if self.inner.len() >= self.capacity {
            self.inner.remove_lru().map(|(_, v)| v)
        } else {
            None
        };

        self.inner.insert(sql.to_owned(), value);
        evicted
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drains every cached entry, leaving the cache empty. Used on
    /// `COM_CHANGE_USER` and connection close, where every server-side
    /// prepared statement is implicitly invalidated.
    pub(crate) fn drain(&mut self) -> Vec<V> {
        let values = self.inner.values().copied().collect();
        self.inner.clear();
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_below_capacity_returns_none() {
        let mut cache = StatementCache::<u32>::new(2);
        assert_eq!(cache.insert("select 1", 1), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_over_capacity_evicts_lru() {
        let mut cache = StatementCache::<u32>::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        // touch "a" so "b" becomes least recently used
        cache.get("a");
        let evicted = cache.insert("c", 3);
        assert_eq!(evicted, Some(2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn reinserting_existing_key_returns_old_value() {
        let mut cache = StatementCache::<u32>::new(2);
        cache.insert("a", 1);
        let replaced = cache.insert("a", 2);
        assert_eq!(replaced, Some(1));
        assert_eq!(cache.get("a"), Some(2));
    }

    #[test]
    fn drain_empties_cache() {
        let mut cache = StatementCache::<u32>::new(4);
        cache.insert("a", 1);
        cache.insert("b", 2);
        let mut values = cache.drain();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
        assert!(cache.is_empty());
    }
}
