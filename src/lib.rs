pub mod catalog;
pub mod cli;
pub mod config;
pub mod detect;
pub mod domain;
pub mod executor;
pub mod llm;
pub mod pipeline;
pub mod rename;
pub mod residue;
pub mod store;
pub mod transform;
pub mod validate;

// Re-export for convenience
pub use catalog::{CloudService, GcpService, Provider, ServiceCatalog, ServiceMapping};
pub use domain::{
    Codebase, MigrationOutcome, RefactoringPlan, RefactoringTask, SourceLanguage, TaskStatus,
};
pub use pipeline::{TranslationPipeline, TranslationReport};
pub use rename::RenameMap;
pub use transform::Recipe;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_translate_minimal_s3_snippet() {
        let source = r#"
import boto3
s3 = boto3.client('s3')
s3.upload_file('report.csv', 'analytics', 'report.csv')
"#;
        let pipeline = TranslationPipeline::new(None);
        let recipe = Recipe::new(CloudService::AwsS3, SourceLanguage::Python);
        let report = pipeline.translate(source, &recipe).await;

        assert!(report.text.contains("from google.cloud import storage"));
        assert!(!report.text.contains("boto3"));
        assert!(!residue::has_source_residue(&report.text, SourceLanguage::Python));
    }

    #[tokio::test]
    async fn test_detection_feeds_operation_tags() {
        let source = "from azure.cosmos import CosmosClient\nclient = CosmosClient(url, key)\n";
        let tags = detect::detected_tags(source, SourceLanguage::Python);
        assert_eq!(tags, vec![CloudService::AzureCosmosDb]);
        assert_eq!(tags[0].operation_tag(), "migrate_azure_cosmos_db_to_gcp");
    }
}
