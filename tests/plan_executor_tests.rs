use std::fs;
use std::sync::Arc;

use cloudshift::executor::{ingest_codebase, MigrationPlanner, NoopTestRunner, PlanExecutor};
use cloudshift::store::{
    CodebaseStore, JsonCodebaseStore, JsonPlanStore, LocalFileRepository, PlanStore,
};
use cloudshift::{SourceLanguage, TaskStatus, TranslationPipeline};

#[tokio::test]
async fn test_multi_service_plan_executes_all_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let codebases = Arc::new(JsonCodebaseStore::new(dir.path().join("codebases")).unwrap());
    let plans = Arc::new(JsonPlanStore::new(dir.path().join("plans")).unwrap());
    let files = Arc::new(LocalFileRepository::new(dir.path().join("backups")).unwrap());

    let app = dir.path().join("app.py");
    fs::write(
        &app,
        r#"import boto3
s3_client = boto3.client('s3')
sqs_client = boto3.client('sqs')
s3_client.upload_file('a.txt', 'bucket', 'a.txt')
sqs_client.send_message(QueueUrl=url, MessageBody=body)
"#,
    )
    .unwrap();

    let codebase = ingest_codebase(
        dir.path().to_str().unwrap(),
        SourceLanguage::Python,
        vec![app.to_str().unwrap().to_string()],
    );
    codebases.save(&codebase).unwrap();

    let plan = MigrationPlanner::new(files.clone()).build_plan(&codebase);
    // One task per detected service, both against the same file.
    assert_eq!(plan.tasks.len(), 2);
    let operations: Vec<&str> = plan.tasks.iter().map(|t| t.operation.as_str()).collect();
    assert!(operations.contains(&"migrate_aws_s3_to_gcp"));
    assert!(operations.contains(&"migrate_aws_sqs_to_gcp"));
    plans.save(&plan).unwrap();

    let executor = PlanExecutor::new(
        TranslationPipeline::new(None),
        plans.clone(),
        codebases.clone(),
        files.clone(),
        Arc::new(NoopTestRunner),
    );
    let outcome = executor.execute(&plan.id).await.unwrap();

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert_eq!(outcome.transformed_files, 2);
    assert_eq!(outcome.renames.get("s3_client"), Some("storage_client"));
    assert_eq!(outcome.renames.get("sqs_client"), Some("pubsub_publisher"));

    let migrated = fs::read_to_string(&app).unwrap();
    assert!(migrated.contains("from google.cloud import storage"));
    assert!(migrated.contains("from google.cloud import pubsub_v1"));
    assert!(!migrated.contains("boto3"));
    assert!(!migrated.contains("QueueUrl"));

    let stored = plans.load(&plan.id).unwrap().unwrap();
    assert!(stored.tasks.iter().all(|t| t.status == TaskStatus::Completed));
    assert!(stored.started_at.is_some());
    assert!(stored.completed_at.is_some());
    for task in &stored.tasks {
        assert!(task.completed_at.is_some());
    }
}

#[tokio::test]
async fn test_plan_round_trip_law() {
    let dir = tempfile::tempdir().unwrap();
    let plans = Arc::new(JsonPlanStore::new(dir.path().join("plans")).unwrap());
    let files = Arc::new(LocalFileRepository::new(dir.path().join("backups")).unwrap());

    let app = dir.path().join("app.py");
    fs::write(&app, "import boto3\ns3 = boto3.client('s3')\n").unwrap();
    let codebase = ingest_codebase(
        dir.path().to_str().unwrap(),
        SourceLanguage::Python,
        vec![app.to_str().unwrap().to_string()],
    );

    let plan = MigrationPlanner::new(files).build_plan(&codebase);
    // Exercise every state in the round trip.
    let plan = plan
        .mark_task_in_progress(&plan.tasks[0].id)
        .mark_task_failed(&plan.tasks[0].id, "simulated failure");

    plans.save(&plan).unwrap();
    let loaded = plans.load(&plan.id).unwrap().unwrap();
    assert_eq!(loaded, plan);
}

#[tokio::test]
async fn test_codebase_round_trip_law() {
    let dir = tempfile::tempdir().unwrap();
    let codebases = Arc::new(JsonCodebaseStore::new(dir.path().join("codebases")).unwrap());
    let codebase = ingest_codebase("/srv/app", SourceLanguage::CSharp, vec!["Program.cs".into()]);
    codebases.save(&codebase).unwrap();
    let loaded = codebases.load(&codebase.id).unwrap().unwrap();
    assert_eq!(loaded, codebase);
}

#[tokio::test]
async fn test_executable_flag_follows_failures() {
    let dir = tempfile::tempdir().unwrap();
    let files = Arc::new(LocalFileRepository::new(dir.path().join("backups")).unwrap());
    let app = dir.path().join("app.py");
    fs::write(&app, "import boto3\ns3 = boto3.client('s3')\n").unwrap();
    let codebase = ingest_codebase(
        dir.path().to_str().unwrap(),
        SourceLanguage::Python,
        vec![app.to_str().unwrap().to_string()],
    );
    let plan = MigrationPlanner::new(files).build_plan(&codebase);
    assert!(plan.is_executable());
    let failed = plan.mark_task_failed(&plan.tasks[0].id, "broken");
    assert!(!failed.is_executable());
}
