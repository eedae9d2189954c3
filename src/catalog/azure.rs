//! Azure service mappings.

use super::{CloudService, GcpService, ServiceMapping};

pub static MAPPINGS: &[ServiceMapping] = &[
    ServiceMapping {
        source: CloudService::AzureBlobStorage,
        target: GcpService::CloudStorage,
        source_sdk_imports: &[
            r"^from azure\.storage\.blob",
            r"^import azure\.storage\.blob",
            r"import com\.azure\.storage\.blob\.",
            r#"github\.com/Azure/azure-sdk-for-go/sdk/storage/azblob"#,
            r"using Azure\.Storage\.Blobs",
        ],
        target_sdk_imports: &["from google.cloud import storage"],
        source_api_patterns: &[
            r"BlobServiceClient",
            r"\.from_connection_string\(",
            r"\.get_container_client\(",
            r"\.get_blob_client\(",
            r"\.upload_blob\(",
            r"\.download_blob\(",
            r"azblob\.NewClient\(",
            r"\.blob\.core\.windows\.net",
        ],
        target_api_hints: &[
            r"storage\.Client\(\)",
            r"\.bucket\(",
            r"\.blob\(",
            r"\.upload_from_string\(",
        ],
        auth_env_map: &[
            ("AZURE_STORAGE_ACCOUNT_NAME", "GOOGLE_CLOUD_PROJECT"),
            ("AZURE_STORAGE_ACCOUNT_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AZURE_STORAGE_CONNECTION_STRING", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[
            ("storage_account", "bucket_name"),
            ("container_name", "gcs_bucket"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureFunctions,
        target: GcpService::CloudFunctions,
        source_sdk_imports: &[
            r"^import azure\.functions",
            r"^from azure\.functions",
            r"using Microsoft\.Azure\.WebJobs",
            r"using Microsoft\.Azure\.Functions",
        ],
        target_sdk_imports: &["import functions_framework"],
        source_api_patterns: &[
            r"func\.HttpRequest",
            r"func\.HttpResponse",
            r"func\.Out",
            r"@function_app",
            r"FunctionName\(",
            r"\[FunctionName",
        ],
        target_api_hints: &[
            r"@functions_framework\.http",
            r"request\.get_json\(",
        ],
        auth_env_map: &[("AzureWebJobsStorage", "GOOGLE_APPLICATION_CREDENTIALS")],
        config_key_map: &[
            ("function_name", "gcf_function_name"),
            ("trigger", "gcf_trigger"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureCosmosDb,
        target: GcpService::Firestore,
        source_sdk_imports: &[
            r"^from azure\.cosmos",
            r"^import azure\.cosmos",
            r"import com\.azure\.cosmos\.",
            r"using Microsoft\.Azure\.Cosmos",
        ],
        target_sdk_imports: &["from google.cloud import firestore"],
        source_api_patterns: &[
            r"CosmosClient",
            r"\.GetDatabase\(",
            r"\.GetContainer\(",
            r"\.get_database_client\(",
            r"\.get_container_client\(",
            r"\.create_item\(",
            r"\.read_item\(",
            r"\.upsert_item\(",
            r"\.documents\.azure\.com",
        ],
        target_api_hints: &[
            r"firestore\.Client\(\)",
            r"\.collection\(",
            r"\.document\(",
        ],
        auth_env_map: &[
            ("COSMOS_ENDPOINT", "GOOGLE_CLOUD_PROJECT"),
            ("COSMOS_MASTER_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[
            ("database_id", "firestore_project"),
            ("container_id", "collection_name"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureServiceBus,
        target: GcpService::PubSub,
        source_sdk_imports: &[
            r"^from azure\.servicebus",
            r"^import azure\.servicebus",
            r"using Azure\.Messaging\.ServiceBus",
        ],
        target_sdk_imports: &["from google.cloud import pubsub_v1"],
        source_api_patterns: &[
            r"ServiceBusClient",
            r"ServiceBusMessage",
            r"\.get_queue_sender\(",
            r"\.get_queue_receiver\(",
            r"\.send_messages\(",
            r"\.servicebus\.windows\.net",
        ],
        target_api_hints: &[
            r"pubsub_v1\.PublisherClient\(\)",
            r"\.publish\(",
        ],
        auth_env_map: &[(
            "SERVICEBUS_CONNECTION_STRING",
            "GOOGLE_APPLICATION_CREDENTIALS",
        )],
        config_key_map: &[
            ("queue_name", "pubsub_topic"),
            ("topic_name", "pubsub_topic"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureEventHubs,
        target: GcpService::PubSub,
        source_sdk_imports: &[
            r"^from azure\.eventhub",
            r"^import azure\.eventhub",
            r"using Azure\.Messaging\.EventHubs",
        ],
        target_sdk_imports: &["from google.cloud import pubsub_v1"],
        source_api_patterns: &[
            r"EventHubProducerClient",
            r"EventHubConsumerClient",
            r"EventData\(",
            r"\.send_batch\(",
        ],
        target_api_hints: &[
            r"pubsub_v1\.PublisherClient\(\)",
            r"\.publish\(",
        ],
        auth_env_map: &[(
            "EVENT_HUBS_CONNECTION_STRING",
            "GOOGLE_APPLICATION_CREDENTIALS",
        )],
        config_key_map: &[
            ("eventhub_name", "pubsub_topic"),
            ("consumer_group", "pubsub_subscription"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureSqlDatabase,
        target: GcpService::CloudSql,
        source_sdk_imports: &[r"^import pyodbc", r"^import pymssql", r"using System\.Data\.SqlClient"],
        target_sdk_imports: &["from google.cloud.sql.connector import Connector"],
        source_api_patterns: &[
            r"database\.windows\.net",
            r"ODBC Driver",
            r"pyodbc\.connect\(",
            r"pymssql\.connect\(",
        ],
        target_api_hints: &[r"Connector\(\)", r"connector\.connect\("],
        auth_env_map: &[("AZURE_SQL_SERVER", "GOOGLE_CLOUD_SQL_INSTANCE")],
        config_key_map: &[
            ("database", "cloud_sql_database"),
            ("server", "cloud_sql_connection_name"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureVirtualMachines,
        target: GcpService::ComputeEngine,
        source_sdk_imports: &[
            r"^from azure\.mgmt\.compute",
            r"^import azure\.mgmt\.compute",
        ],
        target_sdk_imports: &["from google.cloud import compute_v1"],
        source_api_patterns: &[
            r"ComputeManagementClient",
            r"\.virtual_machines\.",
            r"\.vm_sizes\.",
            r"virtual_machines\.begin_create_or_update\(",
        ],
        target_api_hints: &[r"compute_v1\.InstancesClient\(\)"],
        auth_env_map: &[
            ("AZURE_CLIENT_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AZURE_CLIENT_SECRET", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AZURE_SUBSCRIPTION_ID", "GOOGLE_CLOUD_PROJECT"),
        ],
        config_key_map: &[
            ("vm_size", "machine_type"),
            ("storage_account_type", "disk_type"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureMonitor,
        target: GcpService::CloudMonitoring,
        source_sdk_imports: &[r"^from azure\.monitor", r"^import azure\.monitor"],
        target_sdk_imports: &["from google.cloud import monitoring_v3"],
        source_api_patterns: &[
            r"MetricsQueryClient",
            r"LogsQueryClient",
            r"logs_query_client",
            r"\.query_workspace\(",
        ],
        target_api_hints: &[r"monitoring_v3\.MetricServiceClient\(\)"],
        auth_env_map: &[(
            "AZURE_LOG_ANALYTICS_WORKSPACE_ID",
            "GOOGLE_CLOUD_PROJECT",
        )],
        config_key_map: &[
            ("workspace_id", "project_id"),
            ("metric_namespace", "metric_type"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureApiManagement,
        target: GcpService::Apigee,
        source_sdk_imports: &[
            r"^from azure\.mgmt\.apimanagement",
            r"^import azure\.mgmt\.apimanagement",
        ],
        target_sdk_imports: &["from apigee import apis"],
        source_api_patterns: &[
            r"ApiManagementClient",
            r"api_management\.",
            r"\.azure-api\.net",
        ],
        target_api_hints: &[r"apigee\.apis\.create", r"apigee\.apis\.deploy"],
        auth_env_map: &[("AZURE_SUBSCRIPTION_ID", "GOOGLE_CLOUD_PROJECT")],
        config_key_map: &[
            ("api_id", "apigee_api_name"),
            ("resource_group", "gcp_region"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureRedisCache,
        target: GcpService::Memorystore,
        source_sdk_imports: &[r"^import redis", r"using StackExchange\.Redis"],
        target_sdk_imports: &["from google.cloud import redis_v1"],
        source_api_patterns: &[
            r"redis\.StrictRedis\(",
            r"\.redis\.cache\.windows\.net",
            r"ConnectionMultiplexer\.Connect\(",
        ],
        target_api_hints: &[r"redis_v1\.CloudRedisClient\(\)"],
        auth_env_map: &[
            ("AZURE_REDIS_HOST", "GOOGLE_CLOUD_PROJECT"),
            ("AZURE_REDIS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[
            ("host", "memorystore_instance"),
            ("port", "memorystore_port"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureAks,
        target: GcpService::Gke,
        source_sdk_imports: &[
            r"^from azure\.mgmt\.containerservice",
            r"^import azure\.mgmt\.containerservice",
        ],
        target_sdk_imports: &["from google.cloud import container_v1"],
        source_api_patterns: &[
            r"ContainerServiceClient",
            r"managed_clusters\.",
            r"managed_clusters\.begin_create_or_update\(",
        ],
        target_api_hints: &[r"container_v1\.ClusterManagerClient\(\)"],
        auth_env_map: &[("AZURE_SUBSCRIPTION_ID", "GOOGLE_CLOUD_PROJECT")],
        config_key_map: &[
            ("agent_pool_profiles", "node_config"),
            ("kubernetes_version", "initial_cluster_version"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureContainerInstances,
        target: GcpService::CloudRun,
        source_sdk_imports: &[
            r"^from azure\.mgmt\.containerinstance",
            r"^import azure\.mgmt\.containerinstance",
        ],
        target_sdk_imports: &["from google.cloud import run_v2"],
        source_api_patterns: &[
            r"ContainerInstanceManagementClient",
            r"container_groups\.",
        ],
        target_api_hints: &[r"run_v2\.ServicesClient\(\)"],
        auth_env_map: &[("AZURE_SUBSCRIPTION_ID", "GOOGLE_CLOUD_PROJECT")],
        config_key_map: &[
            ("containers", "container_config"),
            ("os_type", "execution_environment"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureAppService,
        target: GcpService::CloudRun,
        source_sdk_imports: &[r"^from azure\.mgmt\.web", r"^import azure\.mgmt\.web"],
        target_sdk_imports: &["from google.cloud import run_v2"],
        source_api_patterns: &[
            r"WebSiteManagementClient",
            r"web_apps\.",
            r"\.azurewebsites\.net",
        ],
        target_api_hints: &[r"run_v2\.ServicesClient\(\)"],
        auth_env_map: &[("AZURE_SUBSCRIPTION_ID", "GOOGLE_CLOUD_PROJECT")],
        config_key_map: &[
            ("app_service_plan", "cloud_run_service"),
            ("site_name", "service_name"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureKeyVault,
        target: GcpService::SecretManager,
        source_sdk_imports: &[
            r"^from azure\.keyvault",
            r"^import azure\.keyvault",
            r"^from azure\.identity",
            r"using Azure\.Security\.KeyVault",
        ],
        target_sdk_imports: &["from google.cloud import secretmanager"],
        source_api_patterns: &[
            r"SecretClient",
            r"KeyVaultClient",
            r"\.get_secret\(",
            r"\.set_secret\(",
            r"\.begin_delete_secret\(",
            r"\.list_properties_of_secrets\(",
            r"\.vault\.azure\.net",
        ],
        target_api_hints: &[
            r"secretmanager\.SecretManagerServiceClient\(\)",
            r"\.access_secret_version\(",
            r"\.add_secret_version\(",
        ],
        auth_env_map: &[
            ("AZURE_KEY_VAULT_URL", "GOOGLE_CLOUD_PROJECT"),
            ("AZURE_CLIENT_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AZURE_CLIENT_SECRET", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AZURE_TENANT_ID", "GOOGLE_CLOUD_PROJECT"),
        ],
        config_key_map: &[
            ("vault_url", "project_id"),
            ("secret_name", "secret_id"),
            ("secret_version", "version_id"),
        ],
    },
    ServiceMapping {
        source: CloudService::AzureApplicationInsights,
        target: GcpService::CloudMonitoring,
        source_sdk_imports: &[
            r"^from applicationinsights",
            r"^import applicationinsights",
            r"^from azure\.applicationinsights",
            r"using Microsoft\.ApplicationInsights",
        ],
        target_sdk_imports: &[
            "from google.cloud import monitoring_v3",
            "from google.cloud import logging",
        ],
        source_api_patterns: &[
            r"TelemetryClient",
            r"ApplicationInsightsClient",
            r"\.track_event\(",
            r"\.track_exception\(",
            r"\.track_metric\(",
            r"\.track_trace\(",
            r"APPINSIGHTS_INSTRUMENTATION_KEY",
        ],
        target_api_hints: &[
            r"monitoring_v3\.MetricServiceClient\(\)",
            r"logging\.Client\(\)",
            r"\.log_text\(",
            r"\.log_struct\(",
        ],
        auth_env_map: &[
            ("APPINSIGHTS_INSTRUMENTATION_KEY", "GOOGLE_CLOUD_PROJECT"),
            ("APPINSIGHTS_CONNECTION_STRING", "GOOGLE_CLOUD_PROJECT"),
        ],
        config_key_map: &[
            ("instrumentation_key", "project_id"),
            ("connection_string", "project_id"),
            ("app_id", "project_id"),
        ],
    },
];
