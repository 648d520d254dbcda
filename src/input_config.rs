//! Receipt generation inputs persisted as a YAML mapping.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct InputConfigStore {
    path: PathBuf,
}

impl InputConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current configuration; empty when the file does not exist yet.
    pub async fn get(&self) -> AppResult<Map<String, Value>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_yaml::from_str::<Option<Value>>(&text)? {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(AppError::Configuration(format!(
                "{} must contain a mapping",
                self.path.display()
            ))),
        }
    }

    /// Shallow-merges `updates` over the stored mapping and writes it back.
    #[tracing::instrument(
        name = "input_config.update",
        skip(self, updates),
        fields(config.updated_keys = updates.len())
    )]
    pub async fn update(&self, updates: Map<String, Value>) -> AppResult<Map<String, Value>> {
        let mut merged = self.get().await?;
        merged.extend(updates);

        let text = serde_yaml::to_string(&merged)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, text).await?;

        tracing::info!(path = %self.path.display(), "Input configuration updated");
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = InputConfigStore::new(dir.path().join("receipt_input.yaml"));
        let config = tokio_test::assert_ok!(store.get().await);
        assert!(config.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = InputConfigStore::new(dir.path().join("config/receipt_input.yaml"));

        store
            .update(fields(json!({"default_merchant": "Old Store", "tax_rate": 0.1})))
            .await
            .unwrap();
        let merged = store
            .update(fields(json!({"default_merchant": "New Store Name", "currency": "USD"})))
            .await
            .unwrap();

        assert_eq!(merged["default_merchant"], "New Store Name");
        assert_eq!(merged["tax_rate"], 0.1);
        assert_eq!(merged["currency"], "USD");

        let reloaded = store.get().await.unwrap();
        assert_eq!(reloaded, merged);
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt_input.yaml");
        std::fs::write(&path, "").unwrap();

        let store = InputConfigStore::new(path);
        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_mapping_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt_input.yaml");
        std::fs::write(&path, "- a\n- b\n").unwrap();

        let store = InputConfigStore::new(path);
        assert!(matches!(
            store.get().await,
            Err(AppError::Configuration(_))
        ));
    }
}
