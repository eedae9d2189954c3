//! Prompt templates and response post-processing for the refinement adapter.

use std::fmt::Write;

use crate::catalog::{CloudService, ServiceCatalog};
use crate::domain::{Codebase, SourceLanguage};

/// Identifiers and imports that must not appear in refined output, grouped
/// for the prompt's forbidden list.
fn forbidden_list(language: SourceLanguage) -> &'static str {
    match language {
        SourceLanguage::Python => {
            "boto3, botocore, azure.storage.blob, azure.cosmos, azure.servicebus, azure.eventhub, \
             s3_client, dynamodb_client, sqs_client, sns_client, blob_service_client, cosmos_client, \
             lambda_handler, Bucket=, QueueUrl=, TopicArn=, TableName=, .amazonaws.com, .blob.core.windows.net"
        }
        SourceLanguage::Java => {
            "com.amazonaws.*, com.azure.*, AmazonS3, AmazonS3ClientBuilder, AmazonDynamoDB, \
             RequestHandler, BlobServiceClient, CosmosClient"
        }
        SourceLanguage::Go => {
            "github.com/aws/aws-sdk-go, github.com/Azure/azure-sdk-for-go, azblob, \
             session.NewSession, s3.New, sqs.New, dynamodb.New"
        }
        SourceLanguage::CSharp => {
            "using Amazon.*, using Azure.*, using Microsoft.Azure.*, IAmazonS3, AmazonS3Client, \
             AmazonDynamoDBClient, BlobServiceClient, CosmosClient, ILambdaContext"
        }
    }
}

/// Builds the refinement prompt: exact rewrite rules for every detected
/// service, the forbidden lists, and the input embedded verbatim in a fence.
pub fn refinement_prompt(
    source: &str,
    services: &[CloudService],
    language: SourceLanguage,
    retry: bool,
    guidance: Option<&str>,
) -> String {
    let mut rules = String::new();
    for service in services {
        let Some(mapping) = ServiceCatalog::lookup(*service) else {
            continue;
        };
        let _ = writeln!(
            rules,
            "- {} -> {}: remove every pattern matching {:?}; the rewritten code imports {:?}.",
            service.tag(),
            mapping.target.tag(),
            mapping.source_api_patterns,
            mapping.target_sdk_imports,
        );
        for (from, to) in mapping.auth_env_map {
            let _ = writeln!(rules, "  env var {from} -> {to}");
        }
    }
    if rules.is_empty() {
        rules.push_str("- replace every AWS/Azure SDK usage with the GCP SDK equivalent.\n");
    }

    let retry_note = if retry {
        "\nTHIS IS A RETRY: the previous attempt still contained source-cloud patterns. Be exhaustive this time.\n"
    } else {
        ""
    };
    let guidance_note = match guidance {
        Some(text) if !text.trim().is_empty() => format!("\nAdditional guidance:\n{text}\n"),
        _ => String::new(),
    };

    format!(
        "You are a cloud migration assistant. Rewrite the following {lang} code so it uses \
Google Cloud Platform SDKs only, preserving behavior and parameter expressions.

Rules, per detected service:
{rules}
The output must contain NONE of: {forbidden}.
{retry_note}{guidance_note}
Return only the rewritten {lang} code, with no narrative and no markdown fences.

Input:
```{fence}
{source}
```",
        lang = language.as_str(),
        rules = rules,
        forbidden = forbidden_list(language),
        retry_note = retry_note,
        guidance_note = guidance_note,
        fence = language.as_str(),
        source = source,
    )
}

pub fn intent_prompt(codebase: &Codebase, file_path: &str, target: &str) -> String {
    format!(
        "Summarize, in three sentences, what must change to migrate the file {file_path} \
(language: {lang}) of the codebase rooted at {root} to {target}. Mention the services involved \
and any renamed identifiers.",
        lang = codebase.language.as_str(),
        root = codebase.path,
    )
}

pub fn recipe_prompt(analysis: &str) -> String {
    format!(
        "Given this migration analysis, produce a short ordered list of rewrite steps \
(imports, client construction, API calls, env vars, handlers):\n\n{analysis}"
    )
}

/// Strips markdown fences and leading narrative from a model response,
/// keeping the largest code block when several are present.
pub fn extract_code(response: &str, language: SourceLanguage) -> String {
    let text = response.trim();
    let lang_fence = format!("```{}", language.as_str());

    let mut body = if let Some(idx) = text.find(&lang_fence) {
        let after = &text[idx + lang_fence.len()..];
        after.split("```").next().unwrap_or(after).to_string()
    } else if text.contains("```") {
        // Generic fences: keep the longest block.
        text.split("```")
            .skip(1)
            .step_by(2)
            .max_by_key(|block| block.len())
            .unwrap_or("")
            .to_string()
    } else {
        text.to_string()
    };

    // Drop leading narrative lines before the first code-looking line.
    let starters: &[&str] = match language {
        SourceLanguage::Python => &["import ", "from ", "def ", "class ", "@", "#"],
        SourceLanguage::Java => &["import ", "package ", "public ", "class ", "//"],
        SourceLanguage::Go => &["package ", "import ", "func ", "//"],
        SourceLanguage::CSharp => &["using ", "namespace ", "public ", "class ", "//"],
    };
    let mut lines: Vec<&str> = body.lines().collect();
    let first_code = lines
        .iter()
        .position(|line| {
            let t = line.trim_start();
            starters.iter().any(|s| t.starts_with(s))
        })
        .unwrap_or(0);
    lines.drain(..first_code);
    body = lines.join("\n");

    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_source_and_rules() {
        let prompt = refinement_prompt(
            "import boto3",
            &[CloudService::AwsS3],
            SourceLanguage::Python,
            false,
            None,
        );
        assert!(prompt.contains("aws_s3 -> cloud_storage"));
        assert!(prompt.contains("```python\nimport boto3\n```"));
        assert!(prompt.contains("AWS_ACCESS_KEY_ID -> GOOGLE_APPLICATION_CREDENTIALS"));
        assert!(!prompt.contains("RETRY"));
    }

    #[test]
    fn test_retry_note_present() {
        let prompt = refinement_prompt("x", &[], SourceLanguage::Python, true, None);
        assert!(prompt.contains("THIS IS A RETRY"));
    }

    #[test]
    fn test_guidance_folded_in() {
        let prompt = refinement_prompt(
            "x",
            &[],
            SourceLanguage::Python,
            false,
            Some("keep the retry helper untouched"),
        );
        assert!(prompt.contains("keep the retry helper untouched"));
    }

    #[test]
    fn test_extract_from_lang_fence() {
        let response = "Here is the code:\n```python\nimport os\nprint(os.name)\n```\nDone!";
        assert_eq!(
            extract_code(response, SourceLanguage::Python),
            "import os\nprint(os.name)"
        );
    }

    #[test]
    fn test_extract_bare_response() {
        let response = "The rewritten code follows.\nimport os\nprint(1)";
        assert_eq!(extract_code(response, SourceLanguage::Python), "import os\nprint(1)");
    }

    #[test]
    fn test_extract_picks_longest_generic_block() {
        let response = "```\nshort\n```\ntext\n```\nimport os\nimport sys\nprint(2)\n```";
        assert_eq!(
            extract_code(response, SourceLanguage::Python),
            "import os\nimport sys\nprint(2)"
        );
    }
}
