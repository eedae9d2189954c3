//! Source-cloud service detection.
//!
//! Casts a broad net: every catalog entry for both providers is checked, and a
//! snippet matching both an AWS and an Azure pattern is recorded under both
//! tags. The caller decides priority; detection itself is deterministic and
//! side-effect-free.

use regex::RegexBuilder;
use std::collections::BTreeMap;

use crate::catalog::{CloudService, ServiceCatalog};
use crate::domain::SourceLanguage;

/// Where a pattern matched inside the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRegion {
    pub start: usize,
    pub end: usize,
    pub matched: String,
}

/// Scans `source` for source-cloud SDK usage and reports every service whose
/// import or call patterns fire, with match locations.
///
/// The result is ordered by service tag, so equivalent inputs always produce
/// the same report regardless of catalog enumeration order.
pub fn detect_services(
    source: &str,
    _language: SourceLanguage,
) -> BTreeMap<CloudService, Vec<MatchRegion>> {
    let mut found: BTreeMap<CloudService, Vec<MatchRegion>> = BTreeMap::new();

    // Only the high-signal call patterns participate: import lines like
    // `import boto3` are shared across services and would tag all of them.
    for mapping in ServiceCatalog::all() {
        let mut regions = Vec::new();
        for pattern in mapping.source_api_patterns.iter() {
            let re = match RegexBuilder::new(pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
            {
                Ok(re) => re,
                Err(_) => continue,
            };
            for m in re.find_iter(source) {
                regions.push(MatchRegion {
                    start: m.start(),
                    end: m.end(),
                    matched: m.as_str().to_string(),
                });
            }
        }
        if !regions.is_empty() {
            regions.sort_by_key(|r| (r.start, r.end));
            regions.dedup();
            found.insert(mapping.source, regions);
        }
    }

    found
}

/// Convenience: just the set of detected service tags.
pub fn detected_tags(source: &str, language: SourceLanguage) -> Vec<CloudService> {
    detect_services(source, language).into_keys().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_boto3_s3() {
        let code = "import boto3\ns3 = boto3.client('s3')\ns3.upload_file('a', 'b', 'c')\n";
        let found = detect_services(code, SourceLanguage::Python);
        assert!(found.contains_key(&CloudService::AwsS3));
    }

    #[test]
    fn test_detects_azure_blob() {
        let code = "from azure.storage.blob import BlobServiceClient\nc = BlobServiceClient.from_connection_string(CS)\n";
        let found = detect_services(code, SourceLanguage::Python);
        assert!(found.contains_key(&CloudService::AzureBlobStorage));
    }

    #[test]
    fn test_multi_service_detection() {
        let code = r#"
import boto3
s3 = boto3.client('s3')
dynamodb = boto3.client('dynamodb')
sqs = boto3.client('sqs')
"#;
        let found = detect_services(code, SourceLanguage::Python);
        assert!(found.contains_key(&CloudService::AwsS3));
        assert!(found.contains_key(&CloudService::AwsDynamoDb));
        assert!(found.contains_key(&CloudService::AwsSqs));
    }

    #[test]
    fn test_clean_code_detects_nothing() {
        let code = "from google.cloud import storage\nclient = storage.Client()\n";
        let found = detect_services(code, SourceLanguage::Python);
        assert!(found.is_empty());
    }

    #[test]
    fn test_detection_is_deterministic() {
        let code = "import boto3\ns3 = boto3.client('s3')\nsns = boto3.client('sns')\n";
        let a = detected_tags(code, SourceLanguage::Python);
        let b = detected_tags(code, SourceLanguage::Python);
        assert_eq!(a, b);
    }

    #[test]
    fn test_match_regions_carry_locations() {
        let code = "x = boto3.client('sqs')";
        let found = detect_services(code, SourceLanguage::Python);
        let regions = found.get(&CloudService::AwsSqs).unwrap();
        assert!(regions.iter().any(|r| r.matched.contains("boto3.client")));
        assert!(regions[0].start < regions[0].end);
    }
}
