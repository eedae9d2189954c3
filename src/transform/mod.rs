pub mod cleanup;
pub mod csharp;
pub mod go;
pub mod helpers;
pub mod java;
pub mod python;

use std::collections::BTreeMap;
use thiserror::Error;

use crate::catalog::CloudService;
use crate::domain::SourceLanguage;
use crate::rename::RenameMap;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

/// Per-task control structure handed to a language transformer.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Operation tag from the plan task, e.g. `migrate_aws_s3_to_gcp`.
    pub operation: String,
    pub service: CloudService,
    pub language: SourceLanguage,
    /// Free-form guidance folded into the LLM refinement prompt.
    pub llm_guidance: Option<String>,
    /// Per-service knobs; currently advisory.
    pub params: BTreeMap<String, String>,
}

impl Recipe {
    pub fn new(service: CloudService, language: SourceLanguage) -> Self {
        Self {
            operation: service.operation_tag(),
            service,
            language,
            llm_guidance: None,
            params: BTreeMap::new(),
        }
    }

    /// Builds a recipe from a plan operation tag.
    pub fn from_operation(operation: &str, language: SourceLanguage) -> Result<Self, TransformError> {
        let service = CloudService::from_operation(operation)
            .ok_or_else(|| TransformError::UnknownOperation(operation.to_string()))?;
        Ok(Self {
            operation: operation.to_string(),
            service,
            language,
            llm_guidance: None,
            params: BTreeMap::new(),
        })
    }
}

/// Routes one source file through the transformer for its language.
///
/// All transformers share the same contract: they return the rewritten text
/// and the identifier renames they performed. A rule that does not match is a
/// silent no-op, so clean or already-migrated input passes through unchanged.
pub fn transform(source: &str, recipe: &Recipe) -> (String, RenameMap) {
    match recipe.language {
        SourceLanguage::Python => python::PythonTransformer::new().transform(source, recipe),
        SourceLanguage::Java => java::JavaTransformer::new().transform(source, recipe),
        SourceLanguage::Go => go::GoTransformer::new().transform(source, recipe),
        SourceLanguage::CSharp => csharp::CSharpTransformer::new().transform(source, recipe),
    }
}
