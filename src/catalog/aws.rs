//! AWS service mappings.
//!
//! Each record enumerates the import patterns, high-signal call patterns and
//! env/config translations for one AWS service across the supported source
//! languages (Python, Java, Go, C#).

use super::{CloudService, GcpService, ServiceMapping};

pub static MAPPINGS: &[ServiceMapping] = &[
    ServiceMapping {
        source: CloudService::AwsS3,
        target: GcpService::CloudStorage,
        source_sdk_imports: &[
            r"^import boto3",
            r"^from boto3",
            r"^import botocore",
            r"import com\.amazonaws\.services\.s3\.",
            r#"github\.com/aws/aws-sdk-go/service/s3"#,
            r"using Amazon\.S3",
        ],
        target_sdk_imports: &["from google.cloud import storage"],
        source_api_patterns: &[
            r#"boto3\.(client|resource)\(\s*['"]s3['"]"#,
            r"\.upload_file\(",
            r"\.download_file\(",
            r"\.put_object\(",
            r"\.get_object\(",
            r"\.list_objects(_v2)?\(",
            r"\.delete_object\(",
            r"\.create_bucket\(",
            r"AmazonS3ClientBuilder",
            r"new AmazonS3Client\(",
            r"s3\.New\(",
            r"s3manager\.",
        ],
        target_api_hints: &[
            r"storage\.Client\(\)",
            r"\.bucket\(",
            r"\.blob\(",
            r"\.upload_from_filename\(",
            r"\.download_to_filename\(",
        ],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_DEFAULT_REGION", "GOOGLE_CLOUD_REGION"),
            ("S3_BUCKET_NAME", "GCS_BUCKET_NAME"),
        ],
        config_key_map: &[
            ("s3_endpoint", "gcs_endpoint"),
            ("s3_region", "gcs_region"),
            ("s3_bucket", "gcs_bucket"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsLambda,
        target: GcpService::CloudFunctions,
        source_sdk_imports: &[
            r"^import boto3",
            r"^from boto3",
            r"import com\.amazonaws\.services\.lambda\.",
            r#"github\.com/aws/aws-sdk-go/service/lambda"#,
            r"using Amazon\.Lambda",
        ],
        target_sdk_imports: &[
            "import functions_framework",
            "from google.cloud import functions_v2",
        ],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]lambda['"]"#,
            r"def\s+lambda_handler\s*\(",
            r"\.invoke\(\s*FunctionName",
            r"\.create_function\(",
            r"\.update_function_code\(",
            r#"event\[['"]Records['"]\]"#,
            r"implements\s+RequestHandler",
            r"ILambdaContext",
        ],
        target_api_hints: &[
            r"functions_v2\.FunctionServiceClient\(\)",
            r"@functions_framework\.http",
            r"def process_gcs_file\(data, context\)",
        ],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_LAMBDA_FUNCTION_NAME", "GCP_FUNCTION_NAME"),
        ],
        config_key_map: &[
            ("lambda_role", "gcp_service_account"),
            ("lambda_timeout", "gcf_timeout"),
            ("handler", "entry_point"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsDynamoDb,
        target: GcpService::Firestore,
        source_sdk_imports: &[
            r"^import boto3",
            r"^from boto3",
            r"^import pynamodb",
            r"import com\.amazonaws\.services\.dynamodbv2\.",
            r#"github\.com/aws/aws-sdk-go/service/dynamodb"#,
            r"using Amazon\.DynamoDBv2",
        ],
        target_sdk_imports: &["from google.cloud import firestore"],
        source_api_patterns: &[
            r#"boto3\.(client|resource)\(\s*['"]dynamodb['"]"#,
            r"\.put_item\(",
            r"\.get_item\(",
            r"\.batch_write_item\(",
            r"\.update_item\(",
            r"\.delete_item\(",
            r"\.create_table\(",
            r"dynamodb\.(query|scan)\(",
            r"AmazonDynamoDBClientBuilder",
        ],
        target_api_hints: &[
            r"firestore\.Client\(\)",
            r"\.collection\(",
            r"\.document\(",
            r"\.set\(",
            r"\.batch\(\)",
        ],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("DYNAMODB_TABLE_NAME", "FIRESTORE_COLLECTION_NAME"),
        ],
        config_key_map: &[
            ("read_capacity_units", "not_applicable"),
            ("write_capacity_units", "not_applicable"),
            ("billing_mode", "not_applicable"),
            ("table_name", "collection_name"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsSqs,
        target: GcpService::PubSub,
        source_sdk_imports: &[
            r"^import boto3",
            r"^from boto3",
            r#"github\.com/aws/aws-sdk-go/service/sqs"#,
            r"using Amazon\.SQS",
        ],
        target_sdk_imports: &["from google.cloud import pubsub_v1"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]sqs['"]"#,
            r"\.send_message\(",
            r"\.receive_message\(",
            r"\.delete_message\(",
            r"\.create_queue\(",
            r"QueueUrl\s*=",
            r"https://sqs\.",
        ],
        target_api_hints: &[
            r"pubsub_v1\.PublisherClient\(\)",
            r"pubsub_v1\.SubscriberClient\(\)",
            r"\.topic_path\(",
            r"\.publish\(",
        ],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("SQS_DLQ_URL", "PUB_SUB_ERROR_TOPIC"),
        ],
        config_key_map: &[
            ("sqs_queue_name", "pubsub_topic_name"),
            ("queue_name", "pubsub_topic"),
            ("visibility_timeout", "pubsub_ack_deadline"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsSns,
        target: GcpService::PubSub,
        source_sdk_imports: &[
            r"^import boto3",
            r"^from boto3",
            r#"github\.com/aws/aws-sdk-go/service/sns"#,
            r"using Amazon\.SimpleNotificationService",
        ],
        target_sdk_imports: &["from google.cloud import pubsub_v1"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]sns['"]"#,
            r"\.publish\(\s*TopicArn",
            r"\.create_topic\(",
            r"\.subscribe\(",
            r"TopicArn\s*=",
            r"arn:aws:sns:",
        ],
        target_api_hints: &[
            r"pubsub_v1\.PublisherClient\(\)",
            r"\.topic_path\(",
            r"\.publish\(",
        ],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("SNS_TOPIC_ARN", "PUB_SUB_SUMMARY_TOPIC"),
        ],
        config_key_map: &[
            ("sns_topic_arn", "pubsub_topic_name"),
            ("sns_protocol", "pubsub_protocol"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsRds,
        target: GcpService::CloudSql,
        source_sdk_imports: &[
            r"^import boto3",
            r"^import pymysql",
            r"^import psycopg2",
            r#"github\.com/aws/aws-sdk-go/service/rds"#,
        ],
        target_sdk_imports: &["from google.cloud.sql.connector import Connector"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]rds['"]"#,
            r"\.create_db_instance\(",
            r"\.delete_db_instance\(",
            r"\.describe_db_instances\(",
            r"\.rds\.amazonaws\.com",
        ],
        target_api_hints: &[r"Connector\(\)", r"connector\.connect\("],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("RDS_HOSTNAME", "GCP_CLOUD_SQL_INSTANCE_CONNECTION_NAME"),
        ],
        config_key_map: &[
            ("db_instance_class", "db_tier"),
            ("allocated_storage", "db_size"),
            ("engine", "db_engine"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsEc2,
        target: GcpService::ComputeEngine,
        source_sdk_imports: &[
            r"^import boto3",
            r#"github\.com/aws/aws-sdk-go/service/ec2"#,
            r"using Amazon\.EC2",
        ],
        target_sdk_imports: &["from google.cloud import compute_v1"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]ec2['"]"#,
            r"\.run_instances\(",
            r"\.terminate_instances\(",
            r"\.describe_instances\(",
        ],
        target_api_hints: &[r"compute_v1\.InstancesClient\(\)"],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[
            ("instance_type", "machine_type"),
            ("ami_id", "image"),
            ("security_group", "firewall_rule"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsCloudWatch,
        target: GcpService::CloudMonitoring,
        source_sdk_imports: &[
            r"^import boto3",
            r#"github\.com/aws/aws-sdk-go/service/cloudwatch"#,
            r"using Amazon\.CloudWatch",
        ],
        target_sdk_imports: &["from google.cloud import monitoring_v3"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]cloudwatch['"]"#,
            r"\.put_metric_data\(",
            r"\.get_metric_statistics\(",
        ],
        target_api_hints: &[
            r"monitoring_v3\.MetricServiceClient\(\)",
            r"\.create_time_series\(",
        ],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[("namespace", "metric_type"), ("metric_name", "metric_name")],
    },
    ServiceMapping {
        source: CloudService::AwsApiGateway,
        target: GcpService::Apigee,
        source_sdk_imports: &[r"^import boto3", r"using Amazon\.APIGateway"],
        target_sdk_imports: &["from apigee import apis"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]apigateway['"]"#,
            r"\.create_rest_api\(",
            r"\.create_resource\(",
            r"\.put_method\(",
            r"\.put_integration\(",
        ],
        target_api_hints: &[r"apigee\.apis\.create", r"apigee\.apis\.deploy"],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[
            ("api_name", "apigee_api_name"),
            ("stage_name", "apigee_environment"),
            ("rest_api_id", "apigee_api_id"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsEks,
        target: GcpService::Gke,
        source_sdk_imports: &[
            r"^import boto3",
            r#"github\.com/aws/aws-sdk-go/service/eks"#,
        ],
        target_sdk_imports: &["from google.cloud import container_v1"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]eks['"]"#,
            r"eks\w*\.create_cluster\(",
            r"eks\w*\.describe_cluster\(",
            r"eks\w*\.delete_cluster\(",
            r"eks\w*\.list_clusters\(",
        ],
        target_api_hints: &[
            r"container_v1\.ClusterManagerClient\(\)",
            r"\.create_cluster\(",
            r"\.get_cluster\(",
        ],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[
            ("cluster_name", "gke_cluster_name"),
            ("role_arn", "gke_service_account"),
            ("vpc_config", "gke_network_config"),
        ],
    },
    ServiceMapping {
        source: CloudService::AwsFargate,
        target: GcpService::CloudRun,
        source_sdk_imports: &[
            r"^import boto3",
            r#"github\.com/aws/aws-sdk-go/service/ecs"#,
        ],
        target_sdk_imports: &["from google.cloud import run_v2"],
        source_api_patterns: &[
            r#"boto3\.client\(\s*['"]ecs['"]"#,
            r"\.run_task\(",
            r"\.start_task\(",
            r"\.register_task_definition\(",
            r"FARGATE",
        ],
        target_api_hints: &[r"run_v2\.ServicesClient\(\)", r"\.create_service\("],
        auth_env_map: &[
            ("AWS_ACCESS_KEY_ID", "GOOGLE_APPLICATION_CREDENTIALS"),
            ("AWS_SECRET_ACCESS_KEY", "GOOGLE_APPLICATION_CREDENTIALS"),
        ],
        config_key_map: &[
            ("task_definition", "cloud_run_service"),
            ("cluster", "cloud_run_location"),
            ("launch_type", "execution_environment"),
        ],
    },
];
