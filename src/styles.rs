//! Receipt styles stored as `<name>.json` files in one directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleInfo {
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct StyleStore {
    dir: PathBuf,
}

impl StyleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        let valid = !name.is_empty()
            && !name.contains(['/', '\\'])
            && !name.contains("..")
            && !name.starts_with('.');
        if !valid {
            return Err(AppError::InvalidStyle(format!("Invalid style name '{name}'")));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Sorted style names. A missing directory has no styles.
    pub async fn list(&self) -> AppResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn exists(&self, name: &str) -> AppResult<bool> {
        Ok(tokio::fs::try_exists(self.path_for(name)?).await?)
    }

    async fn not_found(&self, name: &str) -> AppError {
        AppError::StyleNotFound {
            style: name.to_string(),
            available: self.list().await.unwrap_or_default(),
        }
    }

    pub async fn load(&self, name: &str) -> AppResult<Value> {
        let path = self.path_for(name)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(self.not_found(name).await);
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text)
            .map_err(|e| AppError::InvalidStyle(format!("Style '{name}' is not valid JSON: {e}")))
    }

    pub async fn info(&self, name: &str) -> AppResult<StyleInfo> {
        let content = self.load(name).await?;
        let metadata = tokio::fs::metadata(self.path_for(name)?).await?;

        let created_at = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(|time| DateTime::<Local>::from(time).to_rfc3339());

        Ok(StyleInfo {
            name: name.to_string(),
            description: content
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            created_at,
            file_size: Some(metadata.len()),
        })
    }

    /// Writes a new style. Existing styles are never overwritten.
    #[tracing::instrument(name = "style.create", skip(self, content))]
    pub async fn create(&self, name: &str, content: &Value) -> AppResult<PathBuf> {
        let path = self.path_for(name)?;
        if tokio::fs::try_exists(&path).await? {
            return Err(AppError::InvalidStyle(format!("Style '{name}' already exists")));
        }

        let text = serde_json::to_string_pretty(content)
            .map_err(|e| AppError::Internal(format!("failed to encode style: {e}")))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, text).await?;

        tracing::info!(style = name, path = %path.display(), "Style created");
        Ok(path)
    }

    #[tracing::instrument(name = "style.delete", skip(self))]
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(style = name, "Style deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Style '{name}' not found")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_list_and_info() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path());

        store
            .create("minimal", &json!({"description": "Clean white paper"}))
            .await
            .unwrap();
        store.create("table_noire", &json!({"font": "mono"})).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["minimal", "table_noire"]);

        let info = store.info("minimal").await.unwrap();
        assert_eq!(info.name, "minimal");
        assert_eq!(info.description.as_deref(), Some("Clean white paper"));
        assert!(info.file_size.unwrap() > 0);
        assert!(info.created_at.is_some());

        assert_eq!(store.info("table_noire").await.unwrap().description, None);
    }

    #[tokio::test]
    async fn test_create_refuses_existing_style() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path());

        store.create("minimal", &json!({})).await.unwrap();
        let err = store.create("minimal", &json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid style: Style 'minimal' already exists");
    }

    #[tokio::test]
    async fn test_load_missing_style_lists_available() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path());
        store.create("minimal", &json!({})).await.unwrap();

        match store.load("neon").await {
            Err(AppError::StyleNotFound { style, available }) => {
                assert_eq!(style, "neon");
                assert_eq!(available, vec!["minimal"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path());
        store.create("minimal", &json!({})).await.unwrap();

        tokio_test::assert_ok!(store.delete("minimal").await);
        assert!(!store.exists("minimal").await.unwrap());
        assert!(matches!(
            store.delete("minimal").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path());

        for name in ["../secrets", "a/b", "", ".hidden"] {
            assert!(matches!(
                store.create(name, &json!({})).await,
                Err(AppError::InvalidStyle(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_missing_directory_has_no_styles() {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::new(dir.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
    }
}
