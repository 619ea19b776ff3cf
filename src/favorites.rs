//! Favorite coin symbols persisted in a local preference store

use crate::{constants::FAVORITES_KEY, error::FavoritesError, types::CoinRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Ordered set of uppercase coin symbols
///
/// Order is insertion order, so a favorites screen lists coins in the order
/// they were starred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    symbols: Vec<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set, uppercasing and dropping duplicates
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for symbol in symbols {
            let symbol = symbol.as_ref().to_uppercase();
            if !set.symbols.contains(&symbol) {
                set.symbols.push(symbol);
            }
        }
        set
    }

    /// Case-insensitive membership test
    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.to_uppercase();
        self.symbols.iter().any(|s| *s == symbol)
    }

    /// Returns a new set with `symbol` added if absent or removed if present
    pub fn toggle(&self, symbol: &str) -> FavoriteSet {
        let symbol = symbol.to_uppercase();
        let mut symbols = self.symbols.clone();

        match symbols.iter().position(|s| *s == symbol) {
            Some(index) => {
                symbols.remove(index);
            }
            None => symbols.push(symbol),
        }

        FavoriteSet { symbols }
    }

    /// Coins whose symbol is a favorite, in list order
    pub fn filter_coins<'a>(&self, coins: &'a [CoinRecord]) -> Vec<&'a CoinRecord> {
        coins
            .iter()
            .filter(|coin| self.contains(&coin.symbol))
            .collect()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Local key-value preferences holding string lists
pub trait PreferenceStore: Send + Sync {
    /// Reads the list under `key`, `None` if never written
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, FavoritesError>;

    /// Replaces the list under `key`
    fn set_string_list(&self, key: &str, values: &[String]) -> Result<(), FavoritesError>;
}

/// Volatile preferences, for tests and previews
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        // The map stays consistent even if a holder panicked
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, FavoritesError> {
        Ok(self.values().get(key).cloned())
    }

    fn set_string_list(&self, key: &str, values: &[String]) -> Result<(), FavoritesError> {
        self.values().insert(key.to_string(), values.to_vec());
        Ok(())
    }
}

/// Preferences stored as one JSON object in a file
///
/// Writes go to a sibling temp file that is then renamed over the original,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, FavoritesError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, FavoritesError> {
        match self.read_all()?.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn set_string_list(&self, key: &str, values: &[String]) -> Result<(), FavoritesError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(FavoritesError::Serialization(e)) => {
                let corrupt_path = self.path.with_extension("json.corrupt");
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Preference file is unreadable, moving it aside and starting over"
                );
                if let Err(e) = fs::rename(&self.path, &corrupt_path) {
                    tracing::warn!(error = %e, "Failed to move unreadable preference file");
                }
                Map::new()
            }
            Err(e) => return Err(e),
        };
        all.insert(key.to_string(), serde_json::to_value(values)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(&all)?)?;
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}

/// Loads and persists the favorites list
pub struct FavoritesStore {
    prefs: Arc<dyn PreferenceStore>,
}

impl FavoritesStore {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    /// Store backed by a JSON file at `path`
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonFilePreferences::new(path)))
    }

    /// Reads the persisted set
    ///
    /// Missing or unreadable data yields an empty set; read errors are logged.
    pub fn load(&self) -> FavoriteSet {
        match self.prefs.get_string_list(FAVORITES_KEY) {
            Ok(Some(symbols)) => FavoriteSet::from_symbols(symbols),
            Ok(None) => FavoriteSet::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load favorites, starting empty");
                FavoriteSet::new()
            }
        }
    }

    /// Writes `set` to the preference store
    pub fn persist(&self, set: &FavoriteSet) -> Result<(), FavoritesError> {
        self.prefs.set_string_list(FAVORITES_KEY, set.symbols())?;
        tracing::debug!(count = set.len(), "Persisted favorites");
        Ok(())
    }

    /// Toggles `symbol` and persists the result
    ///
    /// A failed write is logged and the new set is still returned; the
    /// session keeps working with it in memory.
    pub fn toggle_and_persist(&self, current: &FavoriteSet, symbol: &str) -> FavoriteSet {
        let updated = current.toggle(symbol);
        if let Err(e) = self.persist(&updated) {
            tracing::warn!(symbol, error = %e, "Failed to persist favorites");
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::coin;

    struct FailingPreferences;

    impl PreferenceStore for FailingPreferences {
        fn get_string_list(&self, _key: &str) -> Result<Option<Vec<String>>, FavoritesError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn set_string_list(&self, _key: &str, _values: &[String]) -> Result<(), FavoritesError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    fn temp_prefs_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("coin-market-sdk-{}", uuid::Uuid::new_v4()))
            .join("prefs.json")
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let empty = FavoriteSet::new();
        let with_btc = empty.toggle("BTC");
        assert_eq!(with_btc.symbols(), ["BTC"]);
        assert_eq!(with_btc.toggle("BTC"), empty);
    }

    #[test]
    fn test_toggle_uppercases_and_keeps_order() {
        let set = FavoriteSet::new().toggle("eth").toggle("btc").toggle("sol");
        assert_eq!(set.symbols(), ["ETH", "BTC", "SOL"]);
        assert!(set.contains("Btc"));

        let set = set.toggle("BTC");
        assert_eq!(set.symbols(), ["ETH", "SOL"]);
    }

    #[test]
    fn test_from_symbols_dedupes() {
        let set = FavoriteSet::from_symbols(["btc", "BTC", "eth"]);
        assert_eq!(set.symbols(), ["BTC", "ETH"]);
    }

    #[test]
    fn test_filter_coins() {
        let coins = vec![
            coin("bitcoin", "btc", 1.0),
            coin("ethereum", "eth", 2.0),
            coin("solana", "sol", 3.0),
        ];
        let set = FavoriteSet::from_symbols(["SOL", "BTC"]);
        let ids: Vec<&str> = set.filter_coins(&coins).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "solana"]);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = FavoritesStore::new(Arc::new(MemoryPreferences::new()));
        assert!(store.load().is_empty());

        let set = store.toggle_and_persist(&FavoriteSet::new(), "btc");
        let set = store.toggle_and_persist(&set, "eth");
        assert_eq!(store.load(), set);
        assert_eq!(store.load().symbols(), ["BTC", "ETH"]);
    }

    #[test]
    fn test_file_store_survives_reload() {
        let path = temp_prefs_path();

        let store = FavoritesStore::with_file(&path);
        assert!(store.load().is_empty());
        store.persist(&FavoriteSet::from_symbols(["BTC", "SOL"])).unwrap();

        let reloaded = FavoritesStore::with_file(&path);
        assert_eq!(reloaded.load().symbols(), ["BTC", "SOL"]);

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["favorites"], serde_json::json!(["BTC", "SOL"]));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let path = temp_prefs_path();
        let prefs = JsonFilePreferences::new(&path);
        prefs
            .set_string_list("recent", &["ETH".to_string()])
            .unwrap();

        let store = FavoritesStore::new(Arc::new(JsonFilePreferences::new(&path)));
        store.persist(&FavoriteSet::from_symbols(["BTC"])).unwrap();

        assert_eq!(
            prefs.get_string_list("recent").unwrap(),
            Some(vec!["ETH".to_string()])
        );
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = temp_prefs_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = FavoritesStore::with_file(&path);
        assert!(store.load().is_empty());
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_persist() {
        for contents in ["not json", "[1, 2]"] {
            let path = temp_prefs_path();
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();

            let store = FavoritesStore::with_file(&path);
            let set = store.load().toggle("btc");
            store.persist(&set).unwrap();

            let reloaded = FavoritesStore::with_file(&path);
            assert_eq!(reloaded.load().symbols(), ["BTC"]);
            assert_eq!(
                fs::read_to_string(path.with_extension("json.corrupt")).unwrap(),
                contents
            );
            fs::remove_dir_all(path.parent().unwrap()).unwrap();
        }
    }

    #[test]
    fn test_persist_failure_is_soft() {
        let store = FavoritesStore::new(Arc::new(FailingPreferences));
        assert!(store.persist(&FavoriteSet::from_symbols(["BTC"])).is_err());
        assert!(store.load().is_empty());

        let set = store.toggle_and_persist(&FavoriteSet::new(), "btc");
        assert_eq!(set.symbols(), ["BTC"]);
    }
}
