//! Favorite cities persisted as a JSON array of names

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Result, WeatherCastError};

/// Ordered, duplicate-free list of city names backed by a JSON file
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored names in insertion order; a missing file is an empty list
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            WeatherCastError::favorites(format!(
                "Corrupt favorites file {}: {e}",
                self.path.display()
            ))
        })
    }

    /// Append a city; adding a name already present (ignoring case) fails
    pub fn add(&self, city: &str) -> Result<Vec<String>> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherCastError::validation("City name cannot be empty"));
        }

        let mut favorites = self.list()?;
        if favorites.iter().any(|f| f.eq_ignore_ascii_case(city)) {
            return Err(WeatherCastError::favorites(format!(
                "'{city}' is already a favorite"
            )));
        }

        favorites.push(city.to_string());
        self.save(&favorites)?;
        debug!("Added '{}' to favorites", city);
        Ok(favorites)
    }

    /// Remove a city, reporting whether it was present
    pub fn remove(&self, city: &str) -> Result<bool> {
        let city = city.trim();
        let mut favorites = self.list()?;
        let before = favorites.len();
        favorites.retain(|f| !f.eq_ignore_ascii_case(city));

        if favorites.len() == before {
            return Ok(false);
        }

        self.save(&favorites)?;
        debug!("Removed '{}' from favorites", city);
        Ok(true)
    }

    fn save(&self, favorites: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(favorites)
            .map_err(|e| WeatherCastError::favorites(format!("Failed to encode favorites: {e}")))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FavoritesStore) {
        let dir = TempDir::new().unwrap();
        let store = FavoritesStore::new(dir.path().join("nested").join("favorites.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_add_keeps_order_and_persists() {
        let (_dir, store) = store();
        store.add("Kharar").unwrap();
        store.add(" Mohali ").unwrap();

        let reopened = FavoritesStore::new(store.path());
        assert_eq!(reopened.list().unwrap(), vec!["Kharar", "Mohali"]);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let (_dir, store) = store();
        store.add("Kharar").unwrap();

        let err = store.add("kharar").unwrap_err();
        assert!(matches!(err, WeatherCastError::Favorites { .. }));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_reports_presence() {
        let (_dir, store) = store();
        store.add("Kharar").unwrap();
        store.add("Delhi").unwrap();

        assert!(store.remove("Kharar").unwrap());
        assert!(!store.remove("Kharar").unwrap());
        assert_eq!(store.list().unwrap(), vec!["Delhi"]);
    }

    #[test]
    fn test_corrupt_file() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(
            store.list().unwrap_err(),
            WeatherCastError::Favorites { .. }
        ));
    }
}
