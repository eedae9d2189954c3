mod aws;
mod azure;

use tracing::debug;

use crate::catalog::{CloudService, ServiceCatalog};
use crate::rename::RenameMap;
use crate::transform::helpers::{ensure_import, rule, safe_replace};
use crate::transform::Recipe;

/// Comment inserted next to the Firestore client in a rewritten migration
/// script. Its presence marks the file as already converted, so every later
/// pass (transformer, cleanup) leaves the preserved DynamoDB read path alone.
pub const DYNAMODB_SCRIPT_MARKER: &str = "# Firestore destination for migrated writes";

/// Migration-script shape: DynamoDB reads (`scan`/`get_item`/`query`) and
/// writes (`put_item`/`batch_write_item`) co-occurring in one file mean the
/// file copies data out of DynamoDB. Reads stay on the source client; only
/// the write path moves to Firestore.
pub fn is_dynamodb_migration_script(code: &str) -> bool {
    code.contains(DYNAMODB_SCRIPT_MARKER)
        || (rule(r"\.(scan|get_item|query)\s*\(").is_match(code)
            && rule(r"\.(put_item|batch_write_item)\s*\(").is_match(code))
}

/// Python rewrite engine.
///
/// Each service migration applies its steps in a fixed order: wreckage
/// cleanup, import rewrite, client construction, identifier rename, API call
/// rewrite, env-var rewrite, handler shape, exception taxonomy, regions.
/// A step that finds nothing to match leaves the text alone.
pub struct PythonTransformer;

impl PythonTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, source: &str, recipe: &Recipe) -> (String, RenameMap) {
        if source.trim().is_empty() {
            return (source.to_string(), RenameMap::new());
        }

        debug!(service = %recipe.service, "python transform");
        let (mut code, mut renames) = match recipe.service {
            CloudService::AwsS3 => aws::migrate_s3(source),
            CloudService::AwsLambda => aws::migrate_lambda(source),
            CloudService::AwsDynamoDb => aws::migrate_dynamodb(source),
            CloudService::AwsSqs => aws::migrate_sqs(source),
            CloudService::AwsSns => aws::migrate_sns(source),
            CloudService::AwsRds => aws::migrate_rds(source),
            CloudService::AwsEc2 => aws::migrate_ec2(source),
            CloudService::AwsCloudWatch => aws::migrate_cloudwatch(source),
            CloudService::AwsApiGateway => aws::migrate_apigateway(source),
            CloudService::AwsEks => aws::migrate_eks(source),
            CloudService::AwsFargate => aws::migrate_fargate(source),
            CloudService::AzureBlobStorage => azure::migrate_blob_storage(source),
            CloudService::AzureFunctions => azure::migrate_functions(source),
            CloudService::AzureCosmosDb => azure::migrate_cosmos_db(source),
            CloudService::AzureServiceBus => azure::migrate_service_bus(source),
            CloudService::AzureEventHubs => azure::migrate_event_hubs(source),
            CloudService::AzureKeyVault => azure::migrate_key_vault(source),
            CloudService::AzureApplicationInsights => azure::migrate_application_insights(source),
            CloudService::AzureSqlDatabase => azure::migrate_sql_database(source),
            CloudService::AzureVirtualMachines => azure::migrate_virtual_machines(source),
            CloudService::AzureMonitor => azure::migrate_monitor(source),
            CloudService::AzureApiManagement => azure::migrate_api_management(source),
            CloudService::AzureRedisCache => azure::migrate_redis_cache(source),
            CloudService::AzureAks => azure::migrate_aks(source),
            CloudService::AzureContainerInstances => azure::migrate_container_instances(source),
            CloudService::AzureAppService => azure::migrate_app_service(source),
        };

        // A migration script keeps its DynamoDB read path, so its source env
        // vars stay meaningful and must not be renamed.
        let preserve_source_env =
            recipe.service == CloudService::AwsDynamoDb && is_dynamodb_migration_script(source);
        if !preserve_source_env {
            code = apply_env_map(&code, recipe.service);
        }
        code = rewrite_exceptions(&code);

        renames.retain_applied(&code);
        (code, renames)
    }
}

/// Replaces every source auth/config env var name per the catalog table.
pub fn apply_env_map(code: &str, service: CloudService) -> String {
    let Some(mapping) = ServiceCatalog::lookup(service) else {
        return code.to_string();
    };
    let mut result = code.to_string();
    for (from, to) in mapping.auth_env_map {
        // GOOGLE_APPLICATION_CREDENTIALS replaces both AWS key vars; a direct
        // substitution would leave a duplicated assignment, so credential-pair
        // lines are dropped instead.
        if *from == "AWS_SECRET_ACCESS_KEY" || *from == "AZURE_CLIENT_SECRET" {
            result = safe_replace(
                &result,
                &format!(r"^.*\b{}\b.*$", regex::escape(from)),
                &format!("# {from} not needed: GCP uses GOOGLE_APPLICATION_CREDENTIALS"),
                "#",
            );
        } else {
            result = result.replace(from, to);
        }
    }
    result
}

/// Source exception imports and `except` clauses -> GCP taxonomy.
pub fn rewrite_exceptions(code: &str) -> String {
    let mut result = code.to_string();
    result = result.replace(
        "from botocore.exceptions import ClientError",
        "from google.api_core.exceptions import GoogleAPIError",
    );
    result = result.replace(
        "from botocore.exceptions import NoCredentialsError",
        "from google.auth.exceptions import DefaultCredentialsError",
    );
    result = safe_replace(
        &result,
        r"botocore\.exceptions\.ClientError",
        "google.api_core.exceptions.GoogleAPIError",
        "#",
    );
    result = safe_replace(&result, r"\bexcept\s+ClientError\b", "except GoogleAPIError", "#");
    result = safe_replace(
        &result,
        r"\bexcept\s+NoCredentialsError\b",
        "except DefaultCredentialsError",
        "#",
    );
    result = safe_replace(
        &result,
        r"\w+\.exceptions\.NoSuchKey",
        "NotFound",
        "#",
    );
    result = result.replace(
        "from azure.core.exceptions import ResourceNotFoundError",
        "from google.cloud.exceptions import NotFound",
    );
    result = safe_replace(
        &result,
        r"\bexcept\s+ResourceNotFoundError\b",
        "except NotFound",
        "#",
    );
    if result.contains("except NotFound") || result.contains(" NotFound:") {
        if !result.contains("from google.cloud.exceptions import NotFound") {
            result = ensure_import(&result, "from google.cloud.exceptions import NotFound");
        }
    }
    if result.contains("except GoogleAPIError")
        && !result.contains("from google.api_core.exceptions import GoogleAPIError")
    {
        result = ensure_import(&result, "from google.api_core.exceptions import GoogleAPIError");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceLanguage;

    #[test]
    fn test_empty_file_is_identity() {
        let recipe = Recipe::new(CloudService::AwsS3, SourceLanguage::Python);
        let (out, renames) = PythonTransformer::new().transform("", &recipe);
        assert_eq!(out, "");
        assert!(renames.is_empty());
    }

    #[test]
    fn test_exception_rewrite() {
        let code = "from botocore.exceptions import ClientError\ntry:\n    pass\nexcept ClientError as e:\n    raise\n";
        let out = rewrite_exceptions(code);
        assert!(out.contains("from google.api_core.exceptions import GoogleAPIError"));
        assert!(out.contains("except GoogleAPIError as e:"));
        assert!(!out.contains("botocore"));
    }

    #[test]
    fn test_env_map_rewrites_region_var() {
        let code = "region = os.environ['AWS_DEFAULT_REGION']\n";
        let out = apply_env_map(code, CloudService::AwsS3);
        assert!(out.contains("GOOGLE_CLOUD_REGION"));
        assert!(!out.contains("AWS_DEFAULT_REGION"));
    }

    #[test]
    fn test_secret_key_line_dropped() {
        let code = "key = os.environ['AWS_SECRET_ACCESS_KEY']\n";
        let out = apply_env_map(code, CloudService::AwsS3);
        assert!(out.contains("# AWS_SECRET_ACCESS_KEY not needed"));
    }
}
