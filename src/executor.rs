//! Plan construction and execution.
//!
//! The executor drives a plan's tasks sequentially: mark in-progress,
//! translate, write, mark completed (or failed), re-persisting the plan after
//! every transition. Failures never abort the plan; each task is attempted
//! independently. Translation goes through a free-standing function that
//! receives only primitive values, never the task value itself.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::CloudService;
use crate::detect::detect_services;
use crate::domain::{
    Codebase, MigrationOutcome, RefactoringPlan, RefactoringTask, ServiceTally, SourceLanguage,
    NO_OP,
};
use crate::pipeline::{TranslationPipeline, TranslationReport};
use crate::rename::RenameMap;
use crate::store::{CodebaseStore, FileRepository, PlanStore, StoreError};
use crate::transform::Recipe;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("codebase not found: {0}")]
    CodebaseNotFound(String),

    #[error("plan not found: {0}")]
    PlanNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Post-migration test runner port. Opaque beyond the success flag.
#[derive(Debug, Clone)]
pub struct TestReport {
    pub success: bool,
    pub detail: String,
}

#[async_trait]
pub trait TestRunner: Send + Sync {
    async fn run(&self, codebase: &Codebase) -> TestReport;
}

/// A test runner for installations without a harness: reports success and
/// says so.
pub struct NoopTestRunner;

#[async_trait]
impl TestRunner for NoopTestRunner {
    async fn run(&self, _codebase: &Codebase) -> TestReport {
        TestReport {
            success: true,
            detail: "no test harness configured".into(),
        }
    }
}

/// Builds migration plans from codebase analysis.
pub struct MigrationPlanner {
    file_repo: Arc<dyn FileRepository>,
}

impl MigrationPlanner {
    pub fn new(file_repo: Arc<dyn FileRepository>) -> Self {
        Self { file_repo }
    }

    /// Scans every file, creating one task per (service, first file using
    /// it). A codebase with no detected services gets a single bookkeeping
    /// `no_op` task so the plan still records the attempt.
    pub fn build_plan(&self, codebase: &Codebase) -> RefactoringPlan {
        let mut tasks: Vec<RefactoringTask> = Vec::new();
        let mut covered: Vec<CloudService> = Vec::new();

        for file_path in &codebase.files {
            let content = match self.file_repo.read(file_path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %file_path, error = %e, "skipping unreadable file during planning");
                    continue;
                }
            };
            for (service, _regions) in detect_services(&content, codebase.language) {
                if covered.contains(&service) {
                    continue;
                }
                covered.push(service);
                let task_id = format!(
                    "task_{}_{}_{}",
                    tasks.len(),
                    service.tag(),
                    file_path.replace(['/', '.'], "_")
                );
                tasks.push(RefactoringTask::new(
                    task_id,
                    format!(
                        "Migrate {} usage in {} to {}",
                        service.tag(),
                        file_path,
                        crate::catalog::ServiceCatalog::lookup(service)
                            .map(|m| m.target.tag())
                            .unwrap_or("gcp")
                    ),
                    file_path.clone(),
                    service.operation_tag(),
                ));
            }
        }

        if tasks.is_empty() {
            tasks.push(RefactoringTask::new(
                "task_no_services_found",
                "No source-cloud service usage detected",
                "",
                NO_OP,
            ));
        }

        let services: Vec<&str> = covered.iter().map(|s| s.tag()).collect();
        RefactoringPlan {
            id: format!("plan_{}_{}", codebase.id, Utc::now().format("%Y%m%d_%H%M%S")),
            codebase_id: codebase.id.clone(),
            tasks,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            metadata: BTreeMap::from([
                ("migration_type".to_string(), "multi_service_cloud_to_gcp".to_string()),
                ("source_language".to_string(), codebase.language.as_str().to_string()),
                ("services_to_migrate".to_string(), services.join(",")),
            ]),
        }
    }
}

/// Registers a directory as a codebase aggregate.
pub fn ingest_codebase(
    root: &str,
    language: SourceLanguage,
    files: Vec<String>,
) -> Codebase {
    Codebase {
        id: Uuid::new_v4().to_string(),
        path: root.to_string(),
        language,
        files,
        dependencies: BTreeMap::new(),
        created_at: Utc::now(),
        metadata: BTreeMap::new(),
    }
}

pub struct PlanExecutor {
    pipeline: TranslationPipeline,
    plan_store: Arc<dyn PlanStore>,
    codebase_store: Arc<dyn CodebaseStore>,
    file_repo: Arc<dyn FileRepository>,
    test_runner: Arc<dyn TestRunner>,
}

impl PlanExecutor {
    pub fn new(
        pipeline: TranslationPipeline,
        plan_store: Arc<dyn PlanStore>,
        codebase_store: Arc<dyn CodebaseStore>,
        file_repo: Arc<dyn FileRepository>,
        test_runner: Arc<dyn TestRunner>,
    ) -> Self {
        Self {
            pipeline,
            plan_store,
            codebase_store,
            file_repo,
            test_runner,
        }
    }

    /// Executes every pending task of the plan, then runs the test suite.
    pub async fn execute(&self, plan_id: &str) -> Result<MigrationOutcome, ExecutorError> {
        let plan = self
            .plan_store
            .load(plan_id)?
            .ok_or_else(|| ExecutorError::PlanNotFound(plan_id.to_string()))?;
        let codebase = self
            .codebase_store
            .load(&plan.codebase_id)?
            .ok_or_else(|| ExecutorError::CodebaseNotFound(plan.codebase_id.clone()))?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut service_results: BTreeMap<String, ServiceTally> = BTreeMap::new();
        let mut renames = RenameMap::new();
        let mut transformed_files = 0usize;

        let pending: Vec<String> = plan.pending_tasks().iter().map(|t| t.id.clone()).collect();

        for task_id in pending {
            // The plan is reloaded before every transition so the stored
            // aggregate is the single source of truth.
            let plan = self.reload(plan_id)?;
            let Some(task) = plan.tasks.iter().find(|t| t.id == task_id) else {
                continue;
            };

            // Extract every primitive the translation needs before any state
            // transition; the task value itself goes no further.
            let file_path = task.file_path.clone();
            let operation = task.operation.clone();
            let is_no_op = task.is_no_op();
            let service_tag = CloudService::from_operation(&operation).map(|s| s.tag().to_string());

            let plan = plan.mark_task_in_progress(&task_id);
            self.plan_store.save(&plan)?;

            if is_no_op {
                let plan = self.reload(plan_id)?.mark_task_completed(&task_id);
                self.plan_store.save(&plan)?;
                continue;
            }

            let step = async {
                let content = self.file_repo.read(&file_path)?;
                let report = translate_file(
                    &self.pipeline,
                    &file_path,
                    codebase.language,
                    &operation,
                    &content,
                )
                .await;
                self.file_repo.write(&file_path, &report.text)?;
                Ok::<TranslationReport, StoreError>(report)
            };

            match step.await {
                Ok(report) => {
                    transformed_files += 1;
                    renames.merge(&report.renames);
                    warnings.extend(report.warnings);
                    if let Some(tag) = &service_tag {
                        service_results.entry(tag.clone()).or_default().succeeded += 1;
                    }
                    let plan = self.reload(plan_id)?.mark_task_completed(&task_id);
                    self.plan_store.save(&plan)?;
                    info!(task = %task_id, file = %file_path, "task completed");
                }
                Err(e) => {
                    errors.push(format!("Task {task_id} failed: {e}"));
                    if let Some(tag) = &service_tag {
                        service_results.entry(tag.clone()).or_default().failed += 1;
                    }
                    let plan = self.reload(plan_id)?.mark_task_failed(&task_id, &e.to_string());
                    self.plan_store.save(&plan)?;
                    warn!(task = %task_id, error = %e, "task failed; continuing with next task");
                }
            }
        }

        let tests = self.test_runner.run(&codebase).await;
        if !tests.success {
            errors.push(format!(
                "Tests failed after migration - behavior may not be preserved ({})",
                tests.detail
            ));
        }

        let success = errors.is_empty() && tests.success;
        Ok(MigrationOutcome {
            success,
            message: format!("Migration completed with {transformed_files} files transformed"),
            transformed_files,
            errors,
            warnings,
            service_results,
            renames,
        })
    }

    fn reload(&self, plan_id: &str) -> Result<RefactoringPlan, ExecutorError> {
        self.plan_store
            .load(plan_id)?
            .ok_or_else(|| ExecutorError::PlanNotFound(plan_id.to_string()))
    }
}

/// Free-standing translation step.
///
/// Deliberately takes only primitives (no task, no plan) so no immutable
/// aggregate is ever captured by the async machinery between retries. An
/// unknown operation or an internal failure yields the original content
/// prefixed with a diagnostic comment; the task still completes.
pub async fn translate_file(
    pipeline: &TranslationPipeline,
    file_path: &str,
    language: SourceLanguage,
    operation: &str,
    content: &str,
) -> TranslationReport {
    let recipe = match Recipe::from_operation(operation, language) {
        Ok(recipe) => recipe,
        Err(e) => {
            warn!(file = %file_path, error = %e, "unrecognized operation; keeping original text");
            let marker = comment_marker(language);
            return TranslationReport {
                text: format!(
                    "{marker} MIGRATION NOTE: {e}; original code preserved below\n{content}"
                ),
                renames: RenameMap::new(),
                warnings: vec![format!("{file_path}: {e}")],
            };
        }
    };
    pipeline.translate(content, &recipe).await
}

fn comment_marker(language: SourceLanguage) -> &'static str {
    match language {
        SourceLanguage::Python => "#",
        _ => "//",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonCodebaseStore, JsonPlanStore, LocalFileRepository};
    use std::fs;

    fn fixture() -> (
        tempfile::TempDir,
        Arc<JsonCodebaseStore>,
        Arc<JsonPlanStore>,
        Arc<LocalFileRepository>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let codebases = Arc::new(JsonCodebaseStore::new(dir.path().join("codebases")).unwrap());
        let plans = Arc::new(JsonPlanStore::new(dir.path().join("plans")).unwrap());
        let files = Arc::new(LocalFileRepository::new(dir.path().join("backups")).unwrap());
        (dir, codebases, plans, files)
    }

    #[tokio::test]
    async fn test_plan_and_execute_s3_file() {
        let (dir, codebases, plans, files) = fixture();
        let app = dir.path().join("app.py");
        fs::write(
            &app,
            "import boto3\ns3 = boto3.client('s3')\ns3.upload_file('a.txt', 'my-bucket', 'a.txt')\n",
        )
        .unwrap();

        let codebase = ingest_codebase(
            dir.path().to_str().unwrap(),
            SourceLanguage::Python,
            vec![app.to_str().unwrap().to_string()],
        );
        codebases.save(&codebase).unwrap();

        let planner = MigrationPlanner::new(files.clone());
        let plan = planner.build_plan(&codebase);
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].operation, "migrate_aws_s3_to_gcp");
        plans.save(&plan).unwrap();

        let executor = PlanExecutor::new(
            TranslationPipeline::new(None),
            plans.clone(),
            codebases.clone(),
            files.clone(),
            Arc::new(NoopTestRunner),
        );
        let outcome = executor.execute(&plan.id).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.transformed_files, 1);
        assert_eq!(outcome.service_results["aws_s3"].succeeded, 1);
        assert_eq!(outcome.renames.get("s3"), Some("storage_client"));

        let migrated = fs::read_to_string(&app).unwrap();
        assert!(migrated.contains("from google.cloud import storage"));
        assert!(!migrated.contains("boto3"));

        let stored = plans.load(&plan.id).unwrap().unwrap();
        assert!(stored.completed_at.is_some());
        assert!(stored.pending_tasks().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_fails_task_but_not_plan() {
        let (dir, codebases, plans, files) = fixture();
        let good = dir.path().join("good.py");
        fs::write(&good, "import boto3\nsqs_client = boto3.client('sqs')\n").unwrap();

        let codebase = ingest_codebase(
            dir.path().to_str().unwrap(),
            SourceLanguage::Python,
            vec![good.to_str().unwrap().to_string()],
        );
        codebases.save(&codebase).unwrap();

        let mut plan = MigrationPlanner::new(files.clone()).build_plan(&codebase);
        plan.tasks.insert(
            0,
            RefactoringTask::new(
                "task_missing",
                "migrate a file that does not exist",
                dir.path().join("ghost.py").to_str().unwrap(),
                "migrate_aws_s3_to_gcp",
            ),
        );
        plans.save(&plan).unwrap();

        let executor = PlanExecutor::new(
            TranslationPipeline::new(None),
            plans.clone(),
            codebases.clone(),
            files.clone(),
            Arc::new(NoopTestRunner),
        );
        let outcome = executor.execute(&plan.id).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.transformed_files, 1);

        let stored = plans.load(&plan.id).unwrap().unwrap();
        assert_eq!(stored.failed_tasks().len(), 1);
        assert_eq!(stored.completed_tasks().len(), 1);
        assert!(!stored.is_executable());
    }

    #[tokio::test]
    async fn test_no_op_plan_completes_without_touching_files() {
        let (dir, codebases, plans, files) = fixture();
        let clean = dir.path().join("clean.py");
        fs::write(&clean, "print('hello')\n").unwrap();

        let codebase = ingest_codebase(
            dir.path().to_str().unwrap(),
            SourceLanguage::Python,
            vec![clean.to_str().unwrap().to_string()],
        );
        codebases.save(&codebase).unwrap();

        let plan = MigrationPlanner::new(files.clone()).build_plan(&codebase);
        assert_eq!(plan.tasks.len(), 1);
        assert!(plan.tasks[0].is_no_op());
        plans.save(&plan).unwrap();

        let executor = PlanExecutor::new(
            TranslationPipeline::new(None),
            plans.clone(),
            codebases.clone(),
            files.clone(),
            Arc::new(NoopTestRunner),
        );
        let outcome = executor.execute(&plan.id).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.transformed_files, 0);
        assert_eq!(fs::read_to_string(&clean).unwrap(), "print('hello')\n");
    }

    #[tokio::test]
    async fn test_failing_test_runner_marks_outcome() {
        struct FailingRunner;
        #[async_trait]
        impl TestRunner for FailingRunner {
            async fn run(&self, _c: &Codebase) -> TestReport {
                TestReport {
                    success: false,
                    detail: "2 tests failed".into(),
                }
            }
        }

        let (dir, codebases, plans, files) = fixture();
        let clean = dir.path().join("clean.py");
        fs::write(&clean, "print('hello')\n").unwrap();
        let codebase = ingest_codebase(
            dir.path().to_str().unwrap(),
            SourceLanguage::Python,
            vec![clean.to_str().unwrap().to_string()],
        );
        codebases.save(&codebase).unwrap();
        let plan = MigrationPlanner::new(files.clone()).build_plan(&codebase);
        plans.save(&plan).unwrap();

        let executor = PlanExecutor::new(
            TranslationPipeline::new(None),
            plans.clone(),
            codebases.clone(),
            files.clone(),
            Arc::new(FailingRunner),
        );
        let outcome = executor.execute(&plan.id).await.unwrap();
        assert!(!outcome.success);
        assert!(outcome.errors.iter().any(|e| e.contains("Tests failed")));
        // The test failure belongs to the aggregate, not to any task.
        let stored = plans.load(&plan.id).unwrap().unwrap();
        assert!(stored.failed_tasks().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_plan_id_is_hard_error() {
        let (_dir, codebases, plans, files) = fixture();
        let executor = PlanExecutor::new(
            TranslationPipeline::new(None),
            plans,
            codebases,
            files,
            Arc::new(NoopTestRunner),
        );
        let err = executor.execute("ghost").await.unwrap_err();
        assert!(matches!(err, ExecutorError::PlanNotFound(_)));
    }
}
