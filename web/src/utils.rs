use gloo::storage::{LocalStorage, Storage};
use numbuster_core::{LevelConfig, ScoreStore};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// LocalStorage slot for a value persisted whole.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_default()
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T: StorageKey + Serialize> LocalSave for T {
    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::warn!("failed to save {}: {}", T::KEY, err);
        }
    }
}

impl StorageKey for LevelConfig {
    const KEY: &'static str = "numbuster:level";
}

/// Personal bests in LocalStorage, one entry per level identity key.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct LocalScoreStore;

impl ScoreStore for LocalScoreStore {
    fn get(&self, key: &str) -> Option<f64> {
        LocalStorage::get(key).ok()
    }

    fn set(&mut self, key: &str, value: f64) {
        if let Err(err) = LocalStorage::set(key, value) {
            log::warn!("failed to save best score for {}: {}", key, err);
        }
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}
