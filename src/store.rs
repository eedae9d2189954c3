//! Persistence adapters: JSON-file stores for codebases and plans, plus the
//! local file repository with timestamped backups.
//!
//! Stores keep one JSON document per aggregate id. Loading an unknown id is
//! `Ok(None)`, not an error; unknown fields in stored documents are ignored
//! so older documents keep loading.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Codebase, RefactoringPlan};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub trait CodebaseStore: Send + Sync {
    fn save(&self, codebase: &Codebase) -> Result<(), StoreError>;
    fn load(&self, id: &str) -> Result<Option<Codebase>, StoreError>;
}

pub trait PlanStore: Send + Sync {
    fn save(&self, plan: &RefactoringPlan) -> Result<(), StoreError>;
    fn load(&self, id: &str) -> Result<Option<RefactoringPlan>, StoreError>;
}

pub trait FileRepository: Send + Sync {
    fn read(&self, path: &str) -> Result<String, StoreError>;
    fn write(&self, path: &str, content: &str) -> Result<(), StoreError>;
    fn create_backup(&self, path: &str) -> Result<PathBuf, StoreError>;
}

pub struct JsonCodebaseStore {
    dir: PathBuf,
}

impl JsonCodebaseStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl CodebaseStore for JsonCodebaseStore {
    fn save(&self, codebase: &Codebase) -> Result<(), StoreError> {
        let path = self.path_for(&codebase.id);
        debug!(path = %path.display(), "saving codebase");
        fs::write(&path, serde_json::to_string_pretty(codebase)?)?;
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<Codebase>, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }
}

pub struct JsonPlanStore {
    dir: PathBuf,
}

impl JsonPlanStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl PlanStore for JsonPlanStore {
    fn save(&self, plan: &RefactoringPlan) -> Result<(), StoreError> {
        let path = self.path_for(&plan.id);
        debug!(path = %path.display(), "saving plan");
        fs::write(&path, serde_json::to_string_pretty(plan)?)?;
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<RefactoringPlan>, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }
}

/// Local-filesystem file repository. Backups land in a configured directory
/// with a deterministic timestamped name.
pub struct LocalFileRepository {
    backup_dir: PathBuf,
}

impl LocalFileRepository {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let backup_dir = backup_dir.into();
        fs::create_dir_all(&backup_dir)?;
        Ok(Self { backup_dir })
    }
}

impl FileRepository for LocalFileRepository {
    fn read(&self, path: &str) -> Result<String, StoreError> {
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StoreError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn create_backup(&self, path: &str) -> Result<PathBuf, StoreError> {
        let source = Path::new(path);
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let backup_path = self.backup_dir.join(format!("{stem}_backup_{timestamp}{ext}"));
        let content = self.read(path)?;
        fs::write(&backup_path, content)?;
        Ok(backup_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RefactoringTask, SourceLanguage, TaskStatus};
    use std::collections::BTreeMap;

    fn sample_codebase() -> Codebase {
        Codebase {
            id: "cb_42".into(),
            path: "/tmp/project".into(),
            language: SourceLanguage::Python,
            files: vec!["app.py".into(), "worker.py".into()],
            dependencies: BTreeMap::from([("boto3".to_string(), "1.34".to_string())]),
            created_at: Utc::now(),
            metadata: BTreeMap::from([("origin".to_string(), "test".to_string())]),
        }
    }

    #[test]
    fn test_codebase_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCodebaseStore::new(dir.path()).unwrap();
        let codebase = sample_codebase();
        store.save(&codebase).unwrap();
        let loaded = store.load("cb_42").unwrap().unwrap();
        assert_eq!(loaded, codebase);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCodebaseStore::new(dir.path()).unwrap();
        assert!(store.load("nope").unwrap().is_none());
        let plans = JsonPlanStore::new(dir.path()).unwrap();
        assert!(plans.load("nope").unwrap().is_none());
    }

    #[test]
    fn test_plan_round_trip_preserves_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPlanStore::new(dir.path()).unwrap();
        let plan = RefactoringPlan {
            id: "plan_7".into(),
            codebase_id: "cb_42".into(),
            tasks: vec![
                RefactoringTask::new("t1", "migrate", "app.py", "migrate_aws_s3_to_gcp"),
                RefactoringTask {
                    status: TaskStatus::Failed,
                    error: Some("boom".into()),
                    ..RefactoringTask::new("t2", "migrate", "worker.py", "migrate_aws_sqs_to_gcp")
                },
            ],
            created_at: Utc::now(),
            started_at: Some(Utc::now()),
            completed_at: None,
            metadata: BTreeMap::from([("migration_type".to_string(), "multi_service".to_string())]),
        };
        store.save(&plan).unwrap();
        let loaded = store.load("plan_7").unwrap().unwrap();
        assert_eq!(loaded, plan);
        assert_eq!(loaded.tasks[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_unknown_fields_ignored_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCodebaseStore::new(dir.path()).unwrap();
        let mut value = serde_json::to_value(sample_codebase()).unwrap();
        value["surprise"] = serde_json::json!("ignored");
        fs::write(dir.path().join("cb_42.json"), value.to_string()).unwrap();
        assert!(store.load("cb_42").unwrap().is_some());
    }

    #[test]
    fn test_backup_name_contains_stem_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalFileRepository::new(dir.path().join("backups")).unwrap();
        let file = dir.path().join("handler.py");
        fs::write(&file, "x = 1\n").unwrap();
        let backup = repo.create_backup(file.to_str().unwrap()).unwrap();
        let name = backup.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("handler_backup_"));
        assert!(name.ends_with(".py"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "x = 1\n");
    }
}
