//! C# rewrite rules.
//!
//! Handles the using-directive swaps, client type/construction replacement
//! and the request-object call shapes of the AWS and Azure SDKs for .NET.
//! Emitted as plain text; the residue oracle still applies.

use crate::catalog::CloudService;
use crate::rename::RenameMap;
use crate::transform::helpers::{drop_lines_matching, rule, safe_replace};
use crate::transform::Recipe;

pub struct CSharpTransformer;

impl CSharpTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, source: &str, recipe: &Recipe) -> (String, RenameMap) {
        let mut renames = RenameMap::new();
        let code = match recipe.service {
            CloudService::AwsS3 => migrate_s3(source, &mut renames),
            CloudService::AzureBlobStorage => migrate_blob_storage(source, &mut renames),
            CloudService::AwsDynamoDb | CloudService::AzureCosmosDb => {
                migrate_database(source, &mut renames)
            }
            CloudService::AwsLambda | CloudService::AzureFunctions => migrate_functions(source),
            CloudService::AwsSqs | CloudService::AwsSns | CloudService::AzureServiceBus
            | CloudService::AzureEventHubs => migrate_messaging(source, &mut renames),
            _ => migrate_generic(source),
        };
        (code, renames)
    }
}

fn migrate_s3(source: &str, renames: &mut RenameMap) -> String {
    let mut code = source.to_string();

    code = rule(r"using Amazon\.S3(\.\w+)*;")
        .replace_all(&code, "using Google.Cloud.Storage.V1;")
        .into_owned();
    code = dedup_using(&code, "using Google.Cloud.Storage.V1;");

    if rule(r"\bs3Client\b").is_match(&code) {
        renames.record("s3Client", "storageClient");
    }

    // Interface and concrete client types.
    code = safe_replace(&code, r"\bIAmazonS3\b", "StorageClient", "//");
    code = rule(r"new\s+AmazonS3Client\s*\([^)]*\)")
        .replace_all(&code, "StorageClient.Create()")
        .into_owned();

    // Request-object call shapes collapse onto the fluent client.
    code = rule(r"await\s+(\w+)\.PutObjectAsync\s*\(\s*(\w+)\s*\)")
        .replace_all(
            &code,
            "await $1.UploadObjectAsync($2.BucketName, $2.Key, null, $2.InputStream)",
        )
        .into_owned();
    code = rule(r"await\s+(\w+)\.GetObjectAsync\s*\(\s*(\w+)\s*\)")
        .replace_all(&code, "await $1.DownloadObjectAsync($2.BucketName, $2.Key, stream)")
        .into_owned();
    code = rule(r"await\s+(\w+)\.DeleteObjectAsync\s*\(\s*(\w+)\s*\)")
        .replace_all(&code, "await $1.DeleteObjectAsync($2.BucketName, $2.Key)")
        .into_owned();

    // Request DTO types disappear with the request objects.
    code = safe_replace(&code, r"\bnew\s+PutObjectRequest\b", "new { }  /* request object folded into UploadObjectAsync */ ", "//");
    code = safe_replace(&code, r"\bnew\s+GetObjectRequest\b", "new { }  /* request object folded into DownloadObjectAsync */ ", "//");

    code = renames.apply(&code, "//");
    code
}

fn migrate_blob_storage(source: &str, renames: &mut RenameMap) -> String {
    let mut code = source.to_string();

    code = rule(r"using Azure\.Storage\.Blobs(\.\w+)*;")
        .replace_all(&code, "using Google.Cloud.Storage.V1;")
        .into_owned();
    code = dedup_using(&code, "using Google.Cloud.Storage.V1;");

    if rule(r"\bblobServiceClient\b").is_match(&code) {
        renames.record("blobServiceClient", "storageClient");
    }

    code = rule(r"new\s+BlobServiceClient\s*\([^)]*\)")
        .replace_all(&code, "StorageClient.Create()")
        .into_owned();
    code = safe_replace(&code, r"\bBlobServiceClient\b", "StorageClient", "//");
    code = safe_replace(&code, r"\bBlobContainerClient\b", "StorageClient", "//");

    code = rule(r"(\w+)\.GetBlobContainerClient\s*\(([^)]+)\)")
        .replace_all(&code, "$1  /* container $2 resolves per call below */")
        .into_owned();
    code = rule(r"await\s+(\w+)\.UploadBlobAsync\s*\(([^,]+),\s*([^)]+)\)")
        .replace_all(&code, "await $1.UploadObjectAsync(bucketName, $2, null, $3)")
        .into_owned();

    code = renames.apply(&code, "//");
    code
}

fn migrate_database(source: &str, renames: &mut RenameMap) -> String {
    let mut code = source.to_string();

    code = rule(r"using Amazon\.DynamoDBv2(\.\w+)*;")
        .replace_all(&code, "using Google.Cloud.Firestore;")
        .into_owned();
    code = rule(r"using Microsoft\.Azure\.Cosmos(\.\w+)*;")
        .replace_all(&code, "using Google.Cloud.Firestore;")
        .into_owned();
    code = dedup_using(&code, "using Google.Cloud.Firestore;");

    if rule(r"\bdynamoDbClient\b").is_match(&code) {
        renames.record("dynamoDbClient", "firestoreDb");
    }
    if rule(r"\bcosmosClient\b").is_match(&code) {
        renames.record("cosmosClient", "firestoreDb");
    }

    code = safe_replace(&code, r"\bIAmazonDynamoDB\b", "FirestoreDb", "//");
    code = rule(r"new\s+AmazonDynamoDBClient\s*\([^)]*\)")
        .replace_all(
            &code,
            "FirestoreDb.Create(Environment.GetEnvironmentVariable(\"GCP_PROJECT_ID\"))",
        )
        .into_owned();
    code = rule(r"new\s+CosmosClient\s*\([^)]*\)")
        .replace_all(
            &code,
            "FirestoreDb.Create(Environment.GetEnvironmentVariable(\"GCP_PROJECT_ID\"))",
        )
        .into_owned();
    code = safe_replace(&code, r"\bCosmosClient\b", "FirestoreDb", "//");

    code = rule(r"await\s+(\w+)\.PutItemAsync\s*\(\s*(\w+)\s*\)")
        .replace_all(
            &code,
            "await $1.Collection(tableName).Document().SetAsync($2)  // review: $2 carried DynamoDB attribute values",
        )
        .into_owned();
    code = rule(r"(\w+)\.GetContainer\s*\(([^,)]+)(,[^)]*)?\)")
        .replace_all(&code, "$1.Collection($2)")
        .into_owned();
    code = rule(r"await\s+(\w+)\.CreateItemAsync\s*\(\s*([^,)]+)[^)]*\)")
        .replace_all(&code, "await $1.Document().SetAsync($2)")
        .into_owned();

    code = renames.apply(&code, "//");
    code
}

fn migrate_functions(source: &str) -> String {
    let mut code = source.to_string();

    code = rule(r"using Amazon\.Lambda(\.\w+)*;")
        .replace_all(&code, "using Google.Cloud.Functions.Framework;\nusing Microsoft.AspNetCore.Http;")
        .into_owned();
    code = rule(r"using Microsoft\.Azure\.WebJobs(\.\w+)*;")
        .replace_all(&code, "using Google.Cloud.Functions.Framework;\nusing Microsoft.AspNetCore.Http;")
        .into_owned();
    code = dedup_using(&code, "using Google.Cloud.Functions.Framework;");

    // Lambda entry point -> IHttpFunction.
    code = rule(r"public\s+[\w<>,\s]+\s+FunctionHandler\s*\(\s*[\w<>,\s]+\s+\w+\s*,\s*ILambdaContext\s+\w+\s*\)")
        .replace_all(&code, "public async Task HandleAsync(HttpContext context)")
        .into_owned();
    code = safe_replace(&code, r"\bILambdaContext\b", "HttpContext", "//");
    code = safe_replace(
        &code,
        r"class\s+(\w+)\s*$",
        "class $1 : IHttpFunction",
        "//",
    );
    code = safe_replace(&code, r"\[FunctionName\([^\)]*\)\]", "// entry point configured by the Functions Framework", "//");

    code
}

fn migrate_messaging(source: &str, renames: &mut RenameMap) -> String {
    let mut code = source.to_string();

    for pattern in [
        r"using Amazon\.SQS(\.\w+)*;",
        r"using Amazon\.SimpleNotificationService(\.\w+)*;",
        r"using Azure\.Messaging\.ServiceBus;",
        r"using Azure\.Messaging\.EventHubs(\.\w+)*;",
    ] {
        code = rule(pattern)
            .replace_all(&code, "using Google.Cloud.PubSub.V1;")
            .into_owned();
    }
    code = dedup_using(&code, "using Google.Cloud.PubSub.V1;");

    for (var, to) in [
        ("sqsClient", "publisherClient"),
        ("snsClient", "publisherClient"),
        ("serviceBusClient", "publisherClient"),
        ("producerClient", "publisherClient"),
    ] {
        if rule(&format!(r"\b{var}\b")).is_match(&code) {
            renames.record(var, to);
        }
    }

    for ctor in [
        r"new\s+AmazonSQSClient\s*\([^)]*\)",
        r"new\s+AmazonSimpleNotificationServiceClient\s*\([^)]*\)",
        r"new\s+ServiceBusClient\s*\([^)]*\)",
        r"new\s+EventHubProducerClient\s*\([^)]*\)",
    ] {
        code = rule(ctor)
            .replace_all(&code, "await PublisherClient.CreateAsync(topicName)")
            .into_owned();
    }

    code = rule(r"await\s+(\w+)\.SendMessageAsync\s*\([^)]*\)")
        .replace_all(&code, "await $1.PublishAsync(messageBody)")
        .into_owned();
    code = rule(r"await\s+(\w+)\.PublishAsync\s*\(\s*new\s+PublishRequest[^)]*\)")
        .replace_all(&code, "await $1.PublishAsync(messageBody)  // SNS Subject has no Pub/Sub analogue")
        .into_owned();

    code = renames.apply(&code, "//");
    code
}

fn migrate_generic(source: &str) -> String {
    let mut code = source.to_string();
    code = rule(r"using Amazon(\.\w+)*;")
        .replace_all(&code, "// AWS SDK using-directive removed during GCP migration")
        .into_owned();
    code = rule(r"using (Azure|Microsoft\.Azure)(\.\w+)*;")
        .replace_all(&code, "// Azure SDK using-directive removed during GCP migration")
        .into_owned();
    code
}

/// `using` swaps from several source directives can leave duplicates.
fn dedup_using(code: &str, directive: &str) -> String {
    let mut seen = false;
    let mut out = Vec::new();
    for line in code.lines() {
        if line.trim() == directive {
            if seen {
                continue;
            }
            seen = true;
        }
        out.push(line);
    }
    let mut joined = out.join("\n");
    if code.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceLanguage;

    #[test]
    fn test_csharp_s3_migration() {
        let source = r#"using Amazon.S3;
using Amazon.S3.Model;
using System;

public class S3Example
{
    private IAmazonS3 s3Client;

    public S3Example()
    {
        s3Client = new AmazonS3Client();
    }
}
"#;
        let recipe = Recipe::new(CloudService::AwsS3, SourceLanguage::CSharp);
        let (out, renames) = CSharpTransformer::new().transform(source, &recipe);
        assert!(out.contains("using Google.Cloud.Storage.V1;"));
        assert!(out.contains("private StorageClient storageClient;"));
        assert!(out.contains("storageClient = StorageClient.Create();"));
        assert!(!out.contains("Amazon.S3"));
        assert!(!out.contains("IAmazonS3"));
        assert!(!out.contains("AmazonS3Client"));
        assert_eq!(renames.get("s3Client"), Some("storageClient"));
    }

    #[test]
    fn test_csharp_cosmos_migration() {
        let source = "using Microsoft.Azure.Cosmos;\nvar cosmosClient = new CosmosClient(endpoint, key);\nvar container = cosmosClient.GetContainer(\"db\", \"items\");\nawait container.CreateItemAsync(item, partitionKey);\n";
        let recipe = Recipe::new(CloudService::AzureCosmosDb, SourceLanguage::CSharp);
        let (out, _) = CSharpTransformer::new().transform(source, &recipe);
        assert!(out.contains("using Google.Cloud.Firestore;"));
        assert!(out.contains("FirestoreDb.Create("));
        assert!(out.contains(".Collection(\"db\")"));
        assert!(out.contains(".Document().SetAsync(item)"));
        assert!(!out.contains("CosmosClient"));
    }

    #[test]
    fn test_csharp_using_dedup() {
        let code = "using Google.Cloud.Storage.V1;\nusing Google.Cloud.Storage.V1;\nclass A {}\n";
        let out = dedup_using(code, "using Google.Cloud.Storage.V1;");
        assert_eq!(out.matches("using Google.Cloud.Storage.V1;").count(), 1);
    }
}
