use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::CliError;
use crate::catalog::{CloudService, Provider, ServiceCatalog};
use crate::config::Config;
use crate::detect::detect_services;
use crate::domain::SourceLanguage;
use crate::executor::{ingest_codebase, MigrationPlanner, NoopTestRunner, PlanExecutor};
use crate::llm::gemini::GeminiClient;
use crate::llm::LlmProvider;
use crate::pipeline::TranslationPipeline;
use crate::store::{
    CodebaseStore, FileRepository, JsonCodebaseStore, JsonPlanStore, LocalFileRepository, PlanStore,
};
use crate::transform::Recipe;

fn stores(config: &Config) -> Result<(JsonCodebaseStore, JsonPlanStore, LocalFileRepository), CliError> {
    Ok((
        JsonCodebaseStore::new(&config.codebase_storage_path)?,
        JsonPlanStore::new(&config.plan_storage_path)?,
        LocalFileRepository::new(&config.backup_storage_path)?,
    ))
}

fn provider_from_env() -> Option<Arc<dyn LlmProvider>> {
    match GeminiClient::from_env() {
        Some(client) => Some(Arc::new(client)),
        None => {
            println!("   {} no GEMINI_API_KEY set; LLM refinement disabled", "note:".yellow());
            None
        }
    }
}

fn parse_language(value: &str) -> Result<SourceLanguage, CliError> {
    SourceLanguage::parse(value).ok_or_else(|| CliError::UnknownLanguage(value.to_string()))
}

pub struct InitCommand {
    pub path: PathBuf,
    pub language: String,
}

impl InitCommand {
    pub fn execute(&self, config: &Config) -> Result<(), CliError> {
        println!("📦 Registering codebase at {}...", self.path.display());
        let language = parse_language(&self.language)?;
        let mut files = Vec::new();
        collect_sources(&self.path, language, &mut files)?;
        files.sort();
        println!("   {} source files found", files.len());

        let codebase = ingest_codebase(
            self.path.to_string_lossy().as_ref(),
            language,
            files,
        );
        let (codebases, _, _) = stores(config)?;
        codebases.save(&codebase)?;
        println!("✅ Codebase registered: {}", codebase.id.bold());
        Ok(())
    }
}

fn collect_sources(dir: &Path, language: SourceLanguage, out: &mut Vec<String>) -> Result<(), CliError> {
    if !dir.exists() {
        return Err(CliError::NotFound(dir.display().to_string()));
    }
    let wanted = language.file_extension();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') || name == "node_modules" || name == "target" {
                continue;
            }
            collect_sources(&path, language, out)?;
        } else if path.extension().map(|e| e == wanted).unwrap_or(false) {
            out.push(path.to_string_lossy().into_owned());
        }
    }
    Ok(())
}

pub struct AnalyzeCommand {
    pub codebase_id: String,
    pub json: bool,
}

impl AnalyzeCommand {
    pub fn execute(&self, config: &Config) -> Result<(), CliError> {
        let (codebases, _, files) = stores(config)?;
        let codebase = codebases
            .load(&self.codebase_id)?
            .ok_or_else(|| CliError::NotFound(format!("codebase {}", self.codebase_id)))?;

        println!("🔍 Analyzing {} files...", codebase.files.len());
        let mut report: Vec<(String, Vec<(CloudService, usize)>)> = Vec::new();
        for file_path in &codebase.files {
            let Ok(content) = files.read(file_path) else {
                continue;
            };
            let found = detect_services(&content, codebase.language);
            if !found.is_empty() {
                report.push((
                    file_path.clone(),
                    found.into_iter().map(|(s, m)| (s, m.len())).collect(),
                ));
            }
        }

        if self.json {
            let value: serde_json::Value = report
                .iter()
                .map(|(file, services)| {
                    let per_service: serde_json::Map<String, serde_json::Value> = services
                        .iter()
                        .map(|(s, n)| (s.tag().to_string(), serde_json::json!(n)))
                        .collect();
                    (file.clone(), serde_json::Value::Object(per_service))
                })
                .collect::<serde_json::Map<String, serde_json::Value>>()
                .into();
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
            return Ok(());
        }

        if report.is_empty() {
            println!("✅ No source-cloud service usage detected");
            return Ok(());
        }
        for (file, services) in &report {
            println!("   {}", file.bold());
            for (service, matches) in services {
                let mapping = ServiceCatalog::lookup(*service);
                println!(
                    "      {} -> {} ({} matches)",
                    service.tag().red(),
                    mapping.map(|m| m.target.tag()).unwrap_or("?").green(),
                    matches
                );
            }
        }
        Ok(())
    }
}

pub struct PlanCommand {
    pub codebase_id: String,
}

impl PlanCommand {
    pub fn execute(&self, config: &Config) -> Result<(), CliError> {
        let (codebases, plans, files) = stores(config)?;
        let codebase = codebases
            .load(&self.codebase_id)?
            .ok_or_else(|| CliError::NotFound(format!("codebase {}", self.codebase_id)))?;

        println!("🗺️  Planning migration for {}...", codebase.id);
        let planner = MigrationPlanner::new(Arc::new(files));
        let plan = planner.build_plan(&codebase);
        for task in &plan.tasks {
            println!("   {} {} ({})", "task".cyan(), task.id, task.operation);
        }
        plans.save(&plan)?;
        println!("✅ Plan created: {} ({} tasks)", plan.id.bold(), plan.tasks.len());
        Ok(())
    }
}

pub struct MigrateCommand {
    pub plan_id: String,
    pub backup: bool,
}

impl MigrateCommand {
    pub async fn execute(&self, config: &Config) -> Result<(), CliError> {
        let (codebases, plans, files) = stores(config)?;
        let plan = plans
            .load(&self.plan_id)?
            .ok_or_else(|| CliError::NotFound(format!("plan {}", self.plan_id)))?;

        if self.backup {
            println!("🗄️  Backing up target files...");
            for task in &plan.tasks {
                if !task.is_no_op() {
                    if let Ok(backup) = files.create_backup(&task.file_path) {
                        println!("   {} -> {}", task.file_path, backup.display());
                    }
                }
            }
        }

        println!("🚀 Executing plan {}...", self.plan_id.bold());
        let bar = ProgressBar::new(plan.tasks.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("   [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let pipeline = TranslationPipeline::new(provider_from_env())
            .with_file_budget(config.file_budget);
        let executor = PlanExecutor::new(
            pipeline,
            Arc::new(plans),
            Arc::new(codebases),
            Arc::new(files),
            Arc::new(NoopTestRunner),
        );

        // Progress here is per-plan; task granularity comes from the stored
        // plan which the executor re-persists after every transition.
        bar.set_message("translating");
        let outcome = executor.execute(&self.plan_id).await?;
        bar.finish_with_message("done");

        println!(
            "{} {}",
            if outcome.success { "✅".to_string() } else { "❌".to_string() },
            outcome.message
        );
        for (service, tally) in &outcome.service_results {
            println!(
                "   {}: {} ok, {} failed",
                service,
                tally.succeeded.to_string().green(),
                tally.failed.to_string().red()
            );
        }
        if !outcome.renames.is_empty() {
            println!("   Renamed identifiers (apply elsewhere as needed):");
            for (from, to) in outcome.renames.iter() {
                println!("      {} -> {}", from.red(), to.green());
            }
        }
        for warning in &outcome.warnings {
            println!("   {} {}", "warning:".yellow(), warning);
        }
        for error in &outcome.errors {
            println!("   {} {}", "error:".red(), error);
        }
        Ok(())
    }
}

pub struct TranslateCommand {
    pub input: PathBuf,
    pub language: String,
    pub service: String,
    pub output: Option<PathBuf>,
}

impl TranslateCommand {
    pub async fn execute(&self, config: &Config) -> Result<(), CliError> {
        let language = parse_language(&self.language)?;
        let service = CloudService::from_tag(&self.service)
            .ok_or_else(|| CliError::UnknownService(self.service.clone()))?;
        let source = fs::read_to_string(&self.input)?;

        println!(
            "🔄 Translating {} ({} -> {})...",
            self.input.display(),
            service.tag(),
            ServiceCatalog::lookup(service).map(|m| m.target.tag()).unwrap_or("gcp")
        );

        let pipeline = TranslationPipeline::new(provider_from_env())
            .with_file_budget(config.file_budget);
        let recipe = Recipe::new(service, language);
        let report = pipeline.translate(&source, &recipe).await;

        match &self.output {
            Some(path) => {
                fs::write(path, &report.text)?;
                println!("✅ Wrote {}", path.display());
            }
            None => println!("{}", report.text),
        }
        if !report.renames.is_empty() {
            for (from, to) in report.renames.iter() {
                println!("   renamed {} -> {}", from.red(), to.green());
            }
        }
        for warning in &report.warnings {
            println!("   {} {}", "warning:".yellow(), warning);
        }
        Ok(())
    }
}

pub struct CatalogCommand {
    pub provider: Option<String>,
}

impl CatalogCommand {
    pub fn execute(&self) -> Result<(), CliError> {
        let providers: Vec<Provider> = match self.provider.as_deref() {
            Some("aws") => vec![Provider::Aws],
            Some("azure") => vec![Provider::Azure],
            Some(other) => return Err(CliError::UnknownProvider(other.to_string())),
            None => vec![Provider::Aws, Provider::Azure],
        };
        for provider in providers {
            println!("{}", provider.as_str().to_uppercase().bold());
            for mapping in ServiceCatalog::all_for_provider(provider) {
                println!(
                    "   {} -> {}",
                    mapping.source.tag().red(),
                    mapping.target.tag().green()
                );
            }
        }
        Ok(())
    }
}
