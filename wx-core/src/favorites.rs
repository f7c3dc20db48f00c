use std::{fs, path::PathBuf};

use crate::error::{Result, WeatherError};

/// Saved locations, persisted as a JSON array of strings.
///
/// Entries are stored exactly as given: no trimming, no case folding, no dedup.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
    locations: Vec<String>,
}

impl FavoritesStore {
    /// Load favorites from `path`, or start empty if the file doesn't exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no favorites file yet");
            return Ok(Self { path, locations: Vec::new() });
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| WeatherError::storage(&path, format!("failed to read: {e}")))?;

        let locations: Vec<String> = serde_json::from_str(&contents)
            .map_err(|e| WeatherError::storage(&path, format!("not a JSON list of locations: {e}")))?;

        tracing::debug!(path = %path.display(), count = locations.len(), "loaded favorites");
        Ok(Self { path, locations })
    }

    /// Append `location` and write the whole list back to disk.
    pub fn add(&mut self, location: impl Into<String>) -> Result<()> {
        self.locations.push(location.into());
        if let Err(e) = self.save() {
            self.locations.pop();
            return Err(e);
        }
        Ok(())
    }

    pub fn list(&self) -> &[String] {
        &self.locations
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::storage(&self.path, format!("failed to create directory: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.locations)
            .map_err(|e| WeatherError::storage(&self.path, e))?;

        fs::write(&self.path, json)
            .map_err(|e| WeatherError::storage(&self.path, format!("failed to write: {e}")))?;

        tracing::info!(path = %self.path.display(), count = self.locations.len(), "saved favorites");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::load(dir.path().join("favorites.json")).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn added_locations_round_trip_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("favorites.json");

        let mut store = FavoritesStore::load(&path).unwrap();
        store.add("Paris, FR").unwrap();
        store.add("  são paulo ").unwrap();
        store.add("Paris, FR").unwrap();

        let reloaded = FavoritesStore::load(&path).unwrap();
        assert_eq!(reloaded.list(), ["Paris, FR", "  são paulo ", "Paris, FR"]);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "{\"not\": \"a list\"}").unwrap();

        let err = FavoritesStore::load(&path).unwrap_err();
        assert!(matches!(err, WeatherError::Storage { .. }));
    }

    #[test]
    fn unwritable_location_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut store = FavoritesStore::load(blocker.join("favorites.json")).unwrap();
        let err = store.add("Oslo").unwrap_err();

        assert!(matches!(err, WeatherError::Storage { .. }));
        assert!(store.list().is_empty());
    }
}
