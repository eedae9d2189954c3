//! Residue oracle: does a rewritten file still smell of the source cloud?
//!
//! Checks a closed, language-specific list of source-cloud signatures in
//! non-string, non-comment positions. String detection is the per-line odd
//! quote count heuristic; multi-line strings are mis-classified, which is
//! accepted technical debt for now.

use regex::RegexBuilder;

use crate::domain::SourceLanguage;
use crate::rename::inside_string_heuristic;

/// Signatures shared by every language: SDK package tokens and endpoints.
static COMMON_SIGNATURES: &[&str] = &[
    r"\bboto3\b",
    r"\bbotocore\b",
    r"azure\.storage\.blob",
    r"azure\.cosmos",
    r"azure\.servicebus",
    r"azure\.eventhub",
    r"azure\.keyvault",
    r"azure\.functions",
    r"\.amazonaws\.com",
    r"\.blob\.core\.windows\.net",
    r"\.documents\.azure\.com",
    r"\.servicebus\.windows\.net",
    r"\.vault\.azure\.net",
];

/// Source-only identifiers: client variables the transformers rename away.
static IDENTIFIER_SIGNATURES: &[&str] = &[
    r"\bs3_client\b",
    r"\bdynamodb_client\b",
    r"\bsqs_client\b",
    r"\bsns_client\b",
    r"\blambda_client\b",
    r"\bblob_service_client\b",
    r"\bcosmos_client\b",
];

static PYTHON_SIGNATURES: &[&str] = &[
    r"def\s+lambda_handler\s*\(",
    r#"event\[['"]Records['"]\]"#,
    r"\bBucket\s*=",
    r"\bQueueUrl\s*=",
    r"\bTopicArn\s*=",
    r"\bTableName\s*=",
    r"\bBlobServiceClient\b",
    r"\bCosmosClient\b",
    r"\bServiceBusClient\b",
    r"\bEventHubProducerClient\b",
    r"\bSecretClient\b",
    r"\bTelemetryClient\b",
    r"https://sqs\.",
    r"arn:aws:",
    r"s3://",
    r"DYNAMODB_TABLE_NAME",
    r"SQS_DLQ_URL",
    r"SNS_TOPIC_ARN",
    r"APPINSIGHTS_INSTRUMENTATION_KEY",
];

static JAVA_SIGNATURES: &[&str] = &[
    r"com\.amazonaws\.",
    r"com\.azure\.",
    r"\bAmazonS3\b",
    r"\bAmazonDynamoDB\b",
    r"AmazonS3ClientBuilder",
    r"implements\s+RequestHandler",
    r"\bBlobServiceClient\b",
];

static GO_SIGNATURES: &[&str] = &[
    r"github\.com/aws/aws-sdk-go",
    r"github\.com/Azure/azure-sdk-for-go",
    r"\bazblob\b",
    r"session\.NewSession\(",
    r"s3\.New\(",
    r"sqs\.New\(",
    r"dynamodb\.New\(",
];

static CSHARP_SIGNATURES: &[&str] = &[
    r"using Amazon",
    r"using Azure\.",
    r"using Microsoft\.Azure",
    r"\bIAmazonS3\b",
    r"\bAmazonS3Client\b",
    r"\bAmazonDynamoDBClient\b",
    r"\bBlobServiceClient\b",
    r"\bCosmosClient\b",
    r"ILambdaContext",
];

fn comment_marker(language: SourceLanguage) -> &'static str {
    match language {
        SourceLanguage::Python => "#",
        SourceLanguage::Java | SourceLanguage::Go | SourceLanguage::CSharp => "//",
    }
}

fn signatures_for(language: SourceLanguage) -> impl Iterator<Item = &'static &'static str> {
    let per_language: &[&str] = match language {
        SourceLanguage::Python => PYTHON_SIGNATURES,
        SourceLanguage::Java => JAVA_SIGNATURES,
        SourceLanguage::Go => GO_SIGNATURES,
        SourceLanguage::CSharp => CSHARP_SIGNATURES,
    };
    COMMON_SIGNATURES
        .iter()
        .chain(IDENTIFIER_SIGNATURES.iter())
        .chain(per_language.iter())
}

/// True iff any source-cloud signature remains in a code position.
pub fn has_source_residue(text: &str, language: SourceLanguage) -> bool {
    first_residue(text, language).is_some()
}

/// The first surviving signature, for logging.
pub fn first_residue(text: &str, language: SourceLanguage) -> Option<String> {
    let marker = comment_marker(language);
    for pattern in signatures_for(language) {
        let re = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(_) => continue,
        };
        for line in text.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with(marker) {
                continue;
            }
            if language == SourceLanguage::Python && inside_string_heuristic(line) {
                continue;
            }
            if re.is_match(line) {
                return Some((*pattern).to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boto3_is_residue() {
        assert!(has_source_residue("import boto3", SourceLanguage::Python));
    }

    #[test]
    fn test_clean_gcp_python_is_not_residue() {
        let code = "from google.cloud import storage\nclient = storage.Client()\nbucket = client.bucket('b')\n";
        assert!(!has_source_residue(code, SourceLanguage::Python));
    }

    #[test]
    fn test_comment_mentions_are_ignored() {
        let code = "# previously used boto3 here\nclient = storage.Client()\n";
        assert!(!has_source_residue(code, SourceLanguage::Python));
    }

    #[test]
    fn test_keyword_params_are_residue() {
        assert!(has_source_residue("resp = c.get_object(Bucket=b, Key=k)", SourceLanguage::Python));
        assert!(has_source_residue("c.send_message(QueueUrl=u, MessageBody=m)", SourceLanguage::Python));
    }

    #[test]
    fn test_string_literals_skipped_by_quote_heuristic() {
        // Odd quote count on the line: treated as inside a string.
        let code = "text = \"talking about boto3\nmore words";
        assert!(!has_source_residue(code, SourceLanguage::Python));
    }

    #[test]
    fn test_go_package_residue() {
        let code = "import \"github.com/aws/aws-sdk-go/service/s3\"";
        assert!(has_source_residue(code, SourceLanguage::Go));
    }

    #[test]
    fn test_csharp_using_residue() {
        assert!(has_source_residue("using Amazon.S3;", SourceLanguage::CSharp));
        assert!(!has_source_residue(
            "using Google.Cloud.Storage.V1;",
            SourceLanguage::CSharp
        ));
    }

    #[test]
    fn test_java_builder_residue() {
        let code = "AmazonS3 s3 = AmazonS3ClientBuilder.standard().build();";
        assert!(has_source_residue(code, SourceLanguage::Java));
    }

    #[test]
    fn test_handler_signature_residue() {
        assert!(has_source_residue("def lambda_handler(event, context):", SourceLanguage::Python));
        assert!(!has_source_residue("def process_gcs_file(data, context):", SourceLanguage::Python));
    }
}
