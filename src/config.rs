//! Runtime configuration, environment-driven.
//!
//! Every knob has a default so the engine runs out of the box; a missing LLM
//! credential disables refinement rather than erroring.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Storage directories for the JSON stores and file backups.
    pub codebase_storage_path: String,
    pub plan_storage_path: String,
    pub backup_storage_path: String,

    /// Model credential; `None` disables LLM refinement.
    pub gemini_api_key: Option<String>,

    pub gcp_project_id: String,
    pub gcp_region: String,

    /// Hard wall-clock budget for one model call.
    pub llm_timeout: Duration,
    /// Outer budget for translating one file, retries included.
    pub file_budget: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            codebase_storage_path: env::var("CODEBASE_STORAGE_PATH")
                .unwrap_or_else(|_| "/tmp/cloudshift/codebases".to_string()),
            plan_storage_path: env::var("PLAN_STORAGE_PATH")
                .unwrap_or_else(|_| "/tmp/cloudshift/plans".to_string()),
            backup_storage_path: env::var("BACKUP_STORAGE_PATH")
                .unwrap_or_else(|_| "/tmp/cloudshift/backups".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "my-project".to_string()),
            gcp_region: env::var("GCP_REGION").unwrap_or_else(|_| "us-central1".to_string()),
            llm_timeout: duration_var("LLM_TIMEOUT_SECS", 90),
            file_budget: duration_var("FILE_BUDGET_SECS", 120),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn duration_var(name: &str, default_secs: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::from_env();
        assert!(!config.plan_storage_path.is_empty());
        assert_eq!(duration_var("CLOUDSHIFT_UNSET_VAR", 90), Duration::from_secs(90));
        assert!(config.file_budget >= config.llm_timeout);
    }
}
