//! Domain entities and values: codebases, refactoring plans, tasks, outcomes.
//!
//! Plans and tasks are immutable; every state transition produces a new value.
//! The executor swaps the new plan into the store (copy-on-write) after each
//! transition so a crash never leaves a half-updated aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::rename::RenameMap;

/// Source language of a codebase under migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    Python,
    Java,
    Go,
    #[serde(rename = "csharp")]
    CSharp,
}

impl SourceLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "python",
            SourceLanguage::Java => "java",
            SourceLanguage::Go => "go",
            SourceLanguage::CSharp => "csharp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "python" | "py" => Some(SourceLanguage::Python),
            "java" => Some(SourceLanguage::Java),
            "go" | "golang" => Some(SourceLanguage::Go),
            "csharp" | "c#" | "cs" => Some(SourceLanguage::CSharp),
            _ => None,
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "py",
            SourceLanguage::Java => "java",
            SourceLanguage::Go => "go",
            SourceLanguage::CSharp => "cs",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A codebase registered for migration.
///
/// The file set is fixed for the lifetime of the aggregate; ids are unique
/// within the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Codebase {
    pub id: String,
    pub path: String,
    pub language: SourceLanguage,
    pub files: Vec<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Operation tag of a task that performs no file edit.
pub const NO_OP: &str = "no_op";

/// A single migration step against one file. Immutable; transitions clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefactoringTask {
    pub id: String,
    pub description: String,
    pub file_path: String,
    /// `migrate_<service>_to_gcp` or `no_op`.
    pub operation: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl RefactoringTask {
    pub fn new(id: impl Into<String>, description: impl Into<String>, file_path: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            file_path: file_path.into(),
            operation: operation.into(),
            status: TaskStatus::Pending,
            error: None,
            completed_at: None,
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.operation == NO_OP
    }

    fn with_status(&self, status: TaskStatus, error: Option<String>, completed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: self.id.clone(),
            description: self.description.clone(),
            file_path: self.file_path.clone(),
            operation: self.operation.clone(),
            status,
            error,
            completed_at,
        }
    }
}

/// Ordered sequence of tasks driving one codebase migration.
///
/// Invariants: task ids unique; `started_at` set iff any task has left pending;
/// `completed_at` set iff every task is terminal; executable iff no task failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefactoringPlan {
    pub id: String,
    pub codebase_id: String,
    pub tasks: Vec<RefactoringTask>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl RefactoringPlan {
    pub fn pending_tasks(&self) -> Vec<&RefactoringTask> {
        self.tasks.iter().filter(|t| t.status == TaskStatus::Pending).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&RefactoringTask> {
        self.tasks.iter().filter(|t| t.status == TaskStatus::Completed).collect()
    }

    pub fn failed_tasks(&self) -> Vec<&RefactoringTask> {
        self.tasks.iter().filter(|t| t.status == TaskStatus::Failed).collect()
    }

    pub fn is_executable(&self) -> bool {
        self.failed_tasks().is_empty()
    }

    /// New plan with the given task marked in-progress; stamps `started_at`
    /// on the first transition out of pending.
    pub fn mark_task_in_progress(&self, task_id: &str) -> Self {
        let tasks = self
            .tasks
            .iter()
            .map(|t| {
                if t.id == task_id {
                    t.with_status(TaskStatus::InProgress, None, None)
                } else {
                    t.clone()
                }
            })
            .collect();
        Self {
            tasks,
            started_at: self.started_at.or_else(|| Some(Utc::now())),
            ..self.clone_header()
        }
    }

    /// New plan with the given task completed; stamps `completed_at` on the
    /// plan once every task has reached a terminal state.
    pub fn mark_task_completed(&self, task_id: &str) -> Self {
        let tasks: Vec<RefactoringTask> = self
            .tasks
            .iter()
            .map(|t| {
                if t.id == task_id {
                    t.with_status(TaskStatus::Completed, None, Some(Utc::now()))
                } else {
                    t.clone()
                }
            })
            .collect();
        let all_terminal = tasks.iter().all(|t| t.status.is_terminal());
        Self {
            completed_at: if all_terminal {
                self.completed_at.or_else(|| Some(Utc::now()))
            } else {
                self.completed_at
            },
            tasks,
            started_at: self.started_at,
            ..self.clone_header()
        }
    }

    pub fn mark_task_failed(&self, task_id: &str, error: &str) -> Self {
        let tasks: Vec<RefactoringTask> = self
            .tasks
            .iter()
            .map(|t| {
                if t.id == task_id {
                    t.with_status(TaskStatus::Failed, Some(error.to_string()), None)
                } else {
                    t.clone()
                }
            })
            .collect();
        let all_terminal = tasks.iter().all(|t| t.status.is_terminal());
        Self {
            completed_at: if all_terminal {
                self.completed_at.or_else(|| Some(Utc::now()))
            } else {
                self.completed_at
            },
            tasks,
            started_at: self.started_at,
            ..self.clone_header()
        }
    }

    fn clone_header(&self) -> Self {
        Self {
            id: self.id.clone(),
            codebase_id: self.codebase_id.clone(),
            tasks: Vec::new(),
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
            metadata: self.metadata.clone(),
        }
    }
}

/// Per-service success/failure tally in an outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTally {
    pub succeeded: usize,
    pub failed: usize,
}

/// Aggregate result of executing a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationOutcome {
    pub success: bool,
    pub message: String,
    pub transformed_files: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Service tag -> tally.
    pub service_results: BTreeMap<String, ServiceTally>,
    /// Identifier renames accumulated across every task, for downstream
    /// cross-file propagation.
    pub renames: RenameMap,
}
