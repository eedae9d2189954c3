//! Region translation tables.
//!
//! AWS and Azure regions have no canonical 1:1 mapping to GCP locations; these
//! tables pick the closest match and fall back to a multi-region default.
//! Downstream users should treat the result as a suggestion.

/// AWS region -> GCP Cloud Storage location.
static AWS_TO_GCP: &[(&str, &str)] = &[
    // US
    ("us-east-1", "US-EAST1"),
    ("us-east-2", "US-EAST4"),
    ("us-west-1", "US-WEST1"),
    ("us-west-2", "US-WEST1"),
    // Europe
    ("eu-west-1", "EUROPE-WEST1"),
    ("eu-west-2", "EUROPE-WEST2"),
    ("eu-west-3", "EUROPE-WEST3"),
    ("eu-central-1", "EUROPE-WEST3"),
    ("eu-central-2", "EUROPE-CENTRAL2"),
    ("eu-north-1", "EUROPE-NORTH1"),
    ("eu-south-1", "EUROPE-WEST4"),
    ("eu-south-2", "EUROPE-WEST4"),
    // Asia Pacific
    ("ap-southeast-1", "ASIA-SOUTHEAST1"),
    ("ap-southeast-2", "AUSTRALIA-SOUTHEAST1"),
    ("ap-southeast-3", "ASIA-SOUTHEAST2"),
    ("ap-southeast-4", "AUSTRALIA-SOUTHEAST2"),
    ("ap-northeast-1", "ASIA-NORTHEAST1"),
    ("ap-northeast-2", "ASIA-NORTHEAST2"),
    ("ap-northeast-3", "ASIA-NORTHEAST3"),
    ("ap-south-1", "ASIA-SOUTH1"),
    ("ap-south-2", "ASIA-SOUTH1"),
    ("ap-east-1", "ASIA-EAST1"),
    // Middle East
    ("me-south-1", "ASIA-SOUTH1"),
    ("me-central-1", "ASIA-SOUTH1"),
    // South America
    ("sa-east-1", "SOUTHAMERICA-EAST1"),
    // Canada
    ("ca-central-1", "US-EAST1"),
    ("ca-west-1", "US-WEST1"),
    // Africa
    ("af-south-1", "EUROPE-WEST1"),
    // China
    ("cn-north-1", "ASIA-NORTHEAST1"),
    ("cn-northwest-1", "ASIA-NORTHEAST1"),
    // Israel
    ("il-central-1", "EUROPE-WEST1"),
];

/// Azure location -> GCP region.
static AZURE_TO_GCP: &[(&str, &str)] = &[
    ("eastus", "us-east1"),
    ("eastus2", "us-east4"),
    ("westus", "us-west1"),
    ("westus2", "us-west2"),
    ("westus3", "us-west3"),
    ("centralus", "us-central1"),
    ("southcentralus", "us-south1"),
    ("northcentralus", "us-central1"),
    ("canadacentral", "northamerica-northeast1"),
    ("canadaeast", "northamerica-northeast2"),
    ("brazilsouth", "southamerica-east1"),
    ("westeurope", "europe-west1"),
    ("northeurope", "europe-north1"),
    ("uksouth", "europe-west2"),
    ("ukwest", "europe-west2"),
    ("francecentral", "europe-west1"),
    ("germanywestcentral", "europe-west3"),
    ("switzerlandnorth", "europe-west6"),
    ("norwayeast", "europe-north1"),
    ("southeastasia", "asia-southeast1"),
    ("eastasia", "asia-east1"),
    ("japaneast", "asia-northeast1"),
    ("japanwest", "asia-northeast2"),
    ("koreacentral", "asia-northeast3"),
    ("australiaeast", "australia-southeast1"),
    ("australiasoutheast", "australia-southeast2"),
    ("southafricanorth", "africa-south1"),
    ("uaenorth", "me-west1"),
    ("centralindia", "asia-south1"),
    ("southindia", "asia-south2"),
    ("westindia", "asia-south1"),
];

const AWS_DEFAULT: &str = "US";
const AZURE_DEFAULT: &str = "us-central1";

/// Closest GCP Cloud Storage location for an AWS region.
pub fn gcp_location_for_aws_region(region: &str) -> &'static str {
    let wanted = region.trim().trim_matches(|c| c == '\'' || c == '"').to_lowercase();
    AWS_TO_GCP
        .iter()
        .find(|(aws, _)| *aws == wanted)
        .map(|(_, gcp)| *gcp)
        .unwrap_or(AWS_DEFAULT)
}

/// Closest GCP region for an Azure location.
pub fn gcp_region_for_azure_location(location: &str) -> &'static str {
    let wanted = location.trim().trim_matches(|c| c == '\'' || c == '"').to_lowercase();
    AZURE_TO_GCP
        .iter()
        .find(|(az, _)| *az == wanted)
        .map(|(_, gcp)| *gcp)
        .unwrap_or(AZURE_DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_aws_regions() {
        assert_eq!(gcp_location_for_aws_region("us-east-1"), "US-EAST1");
        assert_eq!(gcp_location_for_aws_region("eu-west-2"), "EUROPE-WEST2");
        assert_eq!(gcp_location_for_aws_region("'ap-south-1'"), "ASIA-SOUTH1");
    }

    #[test]
    fn test_unknown_aws_region_falls_back() {
        assert_eq!(gcp_location_for_aws_region("mars-north-1"), "US");
    }

    #[test]
    fn test_known_azure_locations() {
        assert_eq!(gcp_region_for_azure_location("westeurope"), "europe-west1");
        assert_eq!(gcp_region_for_azure_location("JapanEast"), "asia-northeast1");
    }

    #[test]
    fn test_unknown_azure_location_falls_back() {
        assert_eq!(gcp_region_for_azure_location("atlantis"), "us-central1");
    }
}
