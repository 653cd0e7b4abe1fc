//! Activity ID interning.
//!
//! Maps string activity IDs to dense integer indices so the graph passes can
//! work on plain vectors.

use rustc_hash::FxHashMap;

/// Interned activity index.
pub type ActivityIdx = u32;

/// Bidirectional mapping between activity ID strings and dense indices.
#[derive(Debug, Clone, Default)]
pub struct ActivityIdInterner {
    to_idx: FxHashMap<String, ActivityIdx>,
    from_idx: Vec<String>,
}

impl ActivityIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Intern `s`. Returns the index and whether it was newly added.
    pub fn intern(&mut self, s: &str) -> (ActivityIdx, bool) {
        if let Some(&idx) = self.to_idx.get(s) {
            return (idx, false);
        }
        let idx = self.from_idx.len() as ActivityIdx;
        self.from_idx.push(s.to_string());
        self.to_idx.insert(s.to_string(), idx);
        (idx, true)
    }

    #[inline]
    pub fn get(&self, s: &str) -> Option<ActivityIdx> {
        self.to_idx.get(s).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: ActivityIdx) -> Option<&str> {
        self.from_idx.get(idx as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let mut interner = ActivityIdInterner::with_capacity(4);

        let (a, new_a) = interner.intern("A");
        let (b, _) = interner.intern("B");
        let (a_again, new_again) = interner.intern("A");

        assert!(new_a);
        assert!(!new_again);
        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(interner.len(), 2);

        assert_eq!(interner.resolve(b), Some("B"));
        assert_eq!(interner.get("A"), Some(a));
        assert_eq!(interner.get("Z"), None);
        assert_eq!(interner.resolve(7), None);
    }
}
