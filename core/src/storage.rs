use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Persistence port for personal bests, keyed by [`crate::LevelConfig::identity_key`].
///
/// A missing key is a normal outcome, it means no run has been recorded yet.
/// Writes are last-write-wins.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<f64>;
    fn set(&mut self, key: &str, value: f64);
}

/// In-memory store, used headless and in tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    scores: BTreeMap<String, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    fn set(&mut self, key: &str, value: f64) {
        self.scores.insert(key.to_string(), value);
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn get(&self, key: &str) -> Option<f64> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: f64) {
        (**self).set(key, value)
    }
}
