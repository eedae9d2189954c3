pub mod aws;
pub mod azure;
pub mod regions;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source cloud provider for a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target GCP service a source service maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GcpService {
    CloudStorage,
    CloudFunctions,
    Firestore,
    PubSub,
    CloudSql,
    ComputeEngine,
    CloudMonitoring,
    Apigee,
    Gke,
    CloudRun,
    Memorystore,
    SecretManager,
}

impl GcpService {
    pub fn tag(&self) -> &'static str {
        match self {
            GcpService::CloudStorage => "cloud_storage",
            GcpService::CloudFunctions => "cloud_functions",
            GcpService::Firestore => "firestore",
            GcpService::PubSub => "pub_sub",
            GcpService::CloudSql => "cloud_sql",
            GcpService::ComputeEngine => "compute_engine",
            GcpService::CloudMonitoring => "cloud_monitoring",
            GcpService::Apigee => "apigee",
            GcpService::Gke => "gke",
            GcpService::CloudRun => "cloud_run",
            GcpService::Memorystore => "memorystore",
            GcpService::SecretManager => "secret_manager",
        }
    }
}

/// Every source service the engine knows how to migrate.
///
/// The wire tag (`aws_s3`, `azure_blob_storage`, ...) is stable: it appears in
/// plan operation tags and in analysis reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudService {
    AwsS3,
    AwsLambda,
    AwsDynamoDb,
    AwsSqs,
    AwsSns,
    AwsRds,
    AwsEc2,
    AwsCloudWatch,
    AwsApiGateway,
    AwsEks,
    AwsFargate,
    AzureBlobStorage,
    AzureFunctions,
    AzureCosmosDb,
    AzureServiceBus,
    AzureEventHubs,
    AzureSqlDatabase,
    AzureVirtualMachines,
    AzureMonitor,
    AzureApiManagement,
    AzureRedisCache,
    AzureAks,
    AzureContainerInstances,
    AzureAppService,
    AzureKeyVault,
    AzureApplicationInsights,
}

impl CloudService {
    pub fn provider(&self) -> Provider {
        match self {
            CloudService::AwsS3
            | CloudService::AwsLambda
            | CloudService::AwsDynamoDb
            | CloudService::AwsSqs
            | CloudService::AwsSns
            | CloudService::AwsRds
            | CloudService::AwsEc2
            | CloudService::AwsCloudWatch
            | CloudService::AwsApiGateway
            | CloudService::AwsEks
            | CloudService::AwsFargate => Provider::Aws,
            _ => Provider::Azure,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            CloudService::AwsS3 => "aws_s3",
            CloudService::AwsLambda => "aws_lambda",
            CloudService::AwsDynamoDb => "aws_dynamodb",
            CloudService::AwsSqs => "aws_sqs",
            CloudService::AwsSns => "aws_sns",
            CloudService::AwsRds => "aws_rds",
            CloudService::AwsEc2 => "aws_ec2",
            CloudService::AwsCloudWatch => "aws_cloudwatch",
            CloudService::AwsApiGateway => "aws_apigateway",
            CloudService::AwsEks => "aws_eks",
            CloudService::AwsFargate => "aws_fargate",
            CloudService::AzureBlobStorage => "azure_blob_storage",
            CloudService::AzureFunctions => "azure_functions",
            CloudService::AzureCosmosDb => "azure_cosmos_db",
            CloudService::AzureServiceBus => "azure_service_bus",
            CloudService::AzureEventHubs => "azure_event_hubs",
            CloudService::AzureSqlDatabase => "azure_sql_database",
            CloudService::AzureVirtualMachines => "azure_virtual_machines",
            CloudService::AzureMonitor => "azure_monitor",
            CloudService::AzureApiManagement => "azure_api_management",
            CloudService::AzureRedisCache => "azure_redis_cache",
            CloudService::AzureAks => "azure_aks",
            CloudService::AzureContainerInstances => "azure_container_instances",
            CloudService::AzureAppService => "azure_app_service",
            CloudService::AzureKeyVault => "azure_key_vault",
            CloudService::AzureApplicationInsights => "azure_application_insights",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.tag() == tag)
    }

    /// Operation tag carried by plan tasks, e.g. `migrate_aws_s3_to_gcp`.
    pub fn operation_tag(&self) -> String {
        format!("migrate_{}_to_gcp", self.tag())
    }

    /// Inverse of [`operation_tag`]: parses `migrate_<service>_to_gcp`.
    pub fn from_operation(operation: &str) -> Option<Self> {
        let inner = operation
            .strip_prefix("migrate_")?
            .strip_suffix("_to_gcp")?;
        Self::from_tag(inner)
    }

    pub fn all() -> &'static [CloudService] {
        use CloudService::*;
        &[
            AwsS3,
            AwsLambda,
            AwsDynamoDb,
            AwsSqs,
            AwsSns,
            AwsRds,
            AwsEc2,
            AwsCloudWatch,
            AwsApiGateway,
            AwsEks,
            AwsFargate,
            AzureBlobStorage,
            AzureFunctions,
            AzureCosmosDb,
            AzureServiceBus,
            AzureEventHubs,
            AzureSqlDatabase,
            AzureVirtualMachines,
            AzureMonitor,
            AzureApiManagement,
            AzureRedisCache,
            AzureAks,
            AzureContainerInstances,
            AzureAppService,
            AzureKeyVault,
            AzureApplicationInsights,
        ]
    }
}

impl fmt::Display for CloudService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One catalog record: how a single source service translates to GCP.
///
/// All fields are static data; the catalog is loaded once and shared read-only.
#[derive(Debug, Clone, Copy)]
pub struct ServiceMapping {
    pub source: CloudService,
    pub target: GcpService,
    /// Regexes identifying SDK import statements in source code.
    pub source_sdk_imports: &'static [&'static str],
    /// Import lines the rewritten code should carry.
    pub target_sdk_imports: &'static [&'static str],
    /// Regexes identifying high-signal API invocations.
    pub source_api_patterns: &'static [&'static str],
    /// Informational: what the rewritten call sites look like.
    pub target_api_hints: &'static [&'static str],
    /// Source env var -> target env var.
    pub auth_env_map: &'static [(&'static str, &'static str)],
    /// Source config option -> target config option.
    pub config_key_map: &'static [(&'static str, &'static str)],
}

/// The closed set of service mappings. Never fails; unknown lookups yield `None`.
pub struct ServiceCatalog;

impl ServiceCatalog {
    pub fn get(provider: Provider, service: CloudService) -> Option<&'static ServiceMapping> {
        if service.provider() != provider {
            return None;
        }
        Self::all_for_provider(provider)
            .iter()
            .find(|m| m.source == service)
    }

    pub fn lookup(service: CloudService) -> Option<&'static ServiceMapping> {
        Self::get(service.provider(), service)
    }

    pub fn all_for_provider(provider: Provider) -> &'static [ServiceMapping] {
        match provider {
            Provider::Aws => aws::MAPPINGS,
            Provider::Azure => azure::MAPPINGS,
        }
    }

    pub fn all() -> impl Iterator<Item = &'static ServiceMapping> {
        aws::MAPPINGS.iter().chain(azure::MAPPINGS.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_service_has_a_mapping() {
        for service in CloudService::all() {
            let mapping = ServiceCatalog::lookup(*service);
            assert!(mapping.is_some(), "missing mapping for {}", service.tag());
            let mapping = mapping.unwrap();
            assert_eq!(mapping.source, *service);
            assert!(!mapping.source_api_patterns.is_empty());
            assert!(!mapping.source_sdk_imports.is_empty());
        }
    }

    #[test]
    fn test_operation_tag_round_trip() {
        for service in CloudService::all() {
            let op = service.operation_tag();
            assert_eq!(CloudService::from_operation(&op), Some(*service));
        }
        assert_eq!(CloudService::from_operation("no_op"), None);
        assert_eq!(CloudService::from_operation("migrate_bogus_to_gcp"), None);
    }

    #[test]
    fn test_wrong_provider_lookup_is_none() {
        assert!(ServiceCatalog::get(Provider::Azure, CloudService::AwsS3).is_none());
        assert!(ServiceCatalog::get(Provider::Aws, CloudService::AzureKeyVault).is_none());
    }

    #[test]
    fn test_all_patterns_compile() {
        for mapping in ServiceCatalog::all() {
            for pattern in mapping
                .source_sdk_imports
                .iter()
                .chain(mapping.source_api_patterns.iter())
                .chain(mapping.target_api_hints.iter())
            {
                assert!(
                    regex::Regex::new(pattern).is_ok(),
                    "invalid pattern for {}: {}",
                    mapping.source.tag(),
                    pattern
                );
            }
        }
    }
}
