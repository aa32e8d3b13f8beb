//! Workspace-backed file store behind the dispatcher actions

use crate::auth::ServiceAccountKey;
use crate::dispatcher::FileEntry;
use crate::error::{DoctorError, Result};
use chrono::Local;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::info;

const CONFIG_FILE: &str = "google_cloud_config.json";

/// File store rooted at the workspace directory.
///
/// Uploads land under `uploads/`, derived configuration under `config/`.
/// Both subdirectories are created when the store is opened.
#[derive(Debug, Clone)]
pub struct FileStore {
    uploads_dir: PathBuf,
    config_dir: PathBuf,
}

impl FileStore {
    pub fn open(workspace_dir: &Path) -> Result<Self> {
        let uploads_dir = workspace_dir.join("uploads");
        let config_dir = workspace_dir.join("config");
        std::fs::create_dir_all(&uploads_dir)?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(Self {
            uploads_dir,
            config_dir,
        })
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Save a file into the uploads directory.
    ///
    /// `.json` payloads are validated and pretty-printed; invalid JSON leaves
    /// nothing on disk. Anything else is written verbatim.
    pub fn upload(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.uploads_dir.join(safe_name(filename)?);

        if filename.ends_with(".json") {
            let parsed: Value = serde_json::from_str(content).map_err(|e| {
                DoctorError::malformed_input(format!("JSON non valido in {}: {}", filename, e))
            })?;
            let pretty = serde_json::to_string_pretty(&parsed)?;
            std::fs::write(&path, pretty)?;
        } else {
            std::fs::write(&path, content)?;
        }

        info!("file salvato: {}", path.display());
        Ok(path)
    }

    /// Every uploaded file with name, path, size and modification time
    pub fn list(&self) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.uploads_dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
            entries.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Read an uploaded file back: parsed JSON for `.json`, raw text otherwise
    pub fn read(&self, filename: &str) -> Result<Value> {
        let path = self.uploads_dir.join(safe_name(filename)?);
        if !path.is_file() {
            return Err(DoctorError::not_found(format!(
                "File non trovato: {}",
                filename
            )));
        }
        let content = std::fs::read_to_string(&path)?;
        if filename.ends_with(".json") {
            let data: Value = serde_json::from_str(&content)?;
            Ok(json!({ "data": data }))
        } else {
            Ok(json!({ "content": content }))
        }
    }

    /// Derive the Google Cloud configuration from an uploaded service-account
    /// key and persist it under `config/`.
    pub fn configure(&self, credentials_filename: &str) -> Result<Value> {
        let path = self.uploads_dir.join(safe_name(credentials_filename)?);
        if !path.is_file() {
            return Err(DoctorError::not_found(format!(
                "File credenziali non trovato: {}",
                credentials_filename
            )));
        }

        let content = std::fs::read(&path)?;
        let key = ServiceAccountKey::from_slice(&content)?;

        let config = json!({
            "provider": "google_cloud",
            "project_id": key.project_id,
            "service_account": key.client_email,
            "credentials_file": path.to_string_lossy(),
            "setup_date": Local::now().format("%Y-%m-%d").to_string(),
            "status": "configured",
        });

        let config_path = self.config_dir.join(CONFIG_FILE);
        std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
        info!("configurazione scritta: {}", config_path.display());

        Ok(json!({
            "config": config,
            "config_path": config_path.to_string_lossy(),
        }))
    }
}

/// Reject path-traversing filenames before they touch the filesystem
fn safe_name(filename: &str) -> Result<&str> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(DoctorError::malformed_input(format!(
            "Nome file non valido: {:?}",
            filename
        )));
    }
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upload_pretty_prints_json() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let path = store.upload("key.json", r#"{"a":1,"b":[2,3]}"#).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("\n"));
        assert!(written.contains("\"a\": 1"));
    }

    #[test]
    fn test_invalid_json_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.upload("broken.json", "{not json").is_err());
        assert!(!dir.path().join("uploads/broken.json").exists());
    }

    #[test]
    fn test_traversal_names_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.upload("../escape.txt", "x").is_err());
        assert!(store.read("a/b.json").is_err());
    }

    #[test]
    fn test_configure_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store
            .upload(
                "sa.json",
                r#"{"project_id":"demo-project","client_email":"svc@demo.iam.gserviceaccount.com"}"#,
            )
            .unwrap();
        let result = store.configure("sa.json").unwrap();
        assert_eq!(result["config"]["project_id"], "demo-project");
        assert_eq!(result["config"]["status"], "configured");

        let persisted: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("config").join(CONFIG_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(
            persisted["service_account"],
            "svc@demo.iam.gserviceaccount.com"
        );
    }
}
