// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blockform Pipeline - declarative parse/validate/render chains
//!
//! Pipelines describe how a document travels through the core stages:
//! - Input: source text or block JSON
//! - Steps: ordered list of parse, validate and render steps
//! - Output: target format and filename pattern
//!
//! Definitions are TOML:
//!
//! ```toml
//! name = "post"
//! input = "text"
//!
//! [[steps]]
//! type = "parse"
//! front_matter = "---"
//!
//! [[steps]]
//! type = "validate"
//!
//! [[steps]]
//! type = "render"
//! layout = "article"
//!
//! [output]
//! format = "html"
//! filename = "{name}.html"
//! ```

use blockform_core::formats::html::render_document;
use blockform_core::traits::BackLink;
use blockform_core::wire::{block_array, blocks_from_value, blocks_to_value};
use blockform_core::{
    Document, DocumentMeta, Layout, MarkdownHandler, ParseConfig, Parser, RenderConfig,
    RenderOutput, ValidationReport, Validator,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, info_span};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid pipeline definition: {0}")]
    Definition(#[from] toml::de::Error),

    #[error("Pipeline not found: {0}")]
    PipelineNotFound(String),

    #[error("Step `{step}` cannot run on {stage}")]
    StepMismatch { step: &'static str, stage: &'static str },

    #[error("Validation failed with {count} error(s), first: {first}")]
    ValidationFailed { count: usize, first: String },

    #[error("Invalid input: {0}")]
    Input(#[from] blockform_core::ConversionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A pipeline definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    #[serde(default)]
    pub input: PipelineInput,
    pub steps: Vec<PipelineStep>,
    #[serde(default)]
    pub output: PipelineOutput,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineInput {
    /// Markdown-ish source text
    #[default]
    Text,
    /// Block JSON in any accepted wire shape
    Blocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PipelineStep {
    /// Text to blocks
    Parse {
        #[serde(default)]
        front_matter: Option<String>,
    },
    /// Repair blocks; strict mode turns recorded errors into a failure
    Validate {
        #[serde(default)]
        strict: bool,
        #[serde(default)]
        max_depth: Option<usize>,
    },
    /// Blocks to HTML
    Render {
        #[serde(default)]
        layout: Layout,
        #[serde(default)]
        color_styles: bool,
        #[serde(default)]
        back_link: Option<BackLink>,
    },
}

impl PipelineStep {
    fn name(&self) -> &'static str {
        match self {
            PipelineStep::Parse { .. } => "parse",
            PipelineStep::Validate { .. } => "validate",
            PipelineStep::Render { .. } => "render",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    /// The block wire JSON, pretty-printed
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    #[serde(default)]
    pub format: OutputFormat,
    /// `{name}` is replaced by the pipeline name
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    "{name}.html".to_string()
}

impl Default for PipelineOutput {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            filename: default_filename(),
        }
    }
}

/// Where a document is between steps
enum Stage {
    Text(String),
    Blocks { meta: DocumentMeta, value: Value },
}

impl Stage {
    fn label(&self) -> &'static str {
        match self {
            Stage::Text(_) => "text",
            Stage::Blocks { .. } => "blocks",
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineResult {
    pub meta: DocumentMeta,
    /// Block wire JSON after the last step that touched blocks
    pub blocks: Option<Value>,
    /// Report of the last validate step
    pub validation: Option<ValidationReport>,
    /// Output of the last render step
    pub rendered: Option<RenderOutput>,
}

impl PipelineResult {
    pub fn html(&self) -> Option<&str> {
        self.rendered.as_ref().map(|r| r.html.as_str())
    }
}

/// Pipeline executor
pub struct PipelineExecutor {
    pipelines: HashMap<String, Pipeline>,
}

impl PipelineExecutor {
    pub fn new() -> Self {
        Self {
            pipelines: HashMap::new(),
        }
    }

    pub fn register(&mut self, pipeline: Pipeline) {
        debug!(name = %pipeline.name, steps = pipeline.steps.len(), "registered pipeline");
        self.pipelines.insert(pipeline.name.clone(), pipeline);
    }

    pub fn get(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.get(name)
    }

    /// Register a pipeline from TOML text, returning its name
    pub fn load_str(&mut self, definition: &str) -> Result<String> {
        let pipeline: Pipeline = toml::from_str(definition)?;
        let name = pipeline.name.clone();
        self.register(pipeline);
        Ok(name)
    }

    /// Register a pipeline from a TOML file, returning its name
    pub fn load_pipeline(&mut self, path: &Path) -> Result<String> {
        let definition = std::fs::read_to_string(path)?;
        self.load_str(&definition)
    }

    /// Execute a pipeline
    pub fn execute(&self, pipeline_name: &str, input: &str) -> Result<PipelineResult> {
        let pipeline = self
            .pipelines
            .get(pipeline_name)
            .ok_or_else(|| PipelineError::PipelineNotFound(pipeline_name.to_string()))?;

        let span = info_span!("pipeline", name = %pipeline.name);
        let _guard = span.enter();

        let mut result = PipelineResult::default();
        let mut stage = match pipeline.input {
            PipelineInput::Text => Stage::Text(input.to_string()),
            PipelineInput::Blocks => blocks_stage(serde_json::from_str(input)?),
        };

        for step in &pipeline.steps {
            debug!(step = step.name(), stage = stage.label(), "running step");
            stage = run_step(step, stage, &mut result)?;
        }

        if let Stage::Blocks { meta, value } = stage {
            result.meta = meta;
            result.blocks = Some(value);
        }
        info!(
            rendered = result.rendered.is_some(),
            fixes = result.validation.as_ref().map_or(0, |r| r.fixes.len()),
            "pipeline finished"
        );
        Ok(result)
    }

    /// Execute a pipeline and write its output into `dir`
    pub fn execute_to_dir(&self, pipeline_name: &str, input: &str, dir: &Path) -> Result<PathBuf> {
        let result = self.execute(pipeline_name, input)?;
        let pipeline = self
            .pipelines
            .get(pipeline_name)
            .ok_or_else(|| PipelineError::PipelineNotFound(pipeline_name.to_string()))?;

        let contents = match pipeline.output.format {
            OutputFormat::Html => result.html().unwrap_or_default().to_string(),
            OutputFormat::Json => {
                serde_json::to_string_pretty(result.blocks.as_ref().unwrap_or(&Value::Null))?
            }
        };
        let path = dir.join(pipeline.output.filename.replace("{name}", &pipeline.name));
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), "wrote pipeline output");
        Ok(path)
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Block JSON input: metadata is lifted out, blocks unwrapped from any wrapper
fn blocks_stage(value: Value) -> Stage {
    let meta = value
        .get("metadata")
        .and_then(|raw| serde_json::from_value(raw.clone()).ok())
        .unwrap_or_default();
    let value = match value {
        Value::Array(_) => value,
        other => Value::Array(block_array(other)),
    };
    Stage::Blocks { meta, value }
}

fn run_step(step: &PipelineStep, stage: Stage, result: &mut PipelineResult) -> Result<Stage> {
    match (step, stage) {
        (PipelineStep::Parse { front_matter }, Stage::Text(text)) => {
            let config = ParseConfig {
                front_matter_delimiter: front_matter.clone(),
            };
            let doc = MarkdownHandler::new().parse(&text, &config)?;
            debug!(blocks = doc.blocks.len(), "parsed text");
            Ok(Stage::Blocks {
                meta: doc.meta,
                value: blocks_to_value(&doc.blocks),
            })
        }
        (PipelineStep::Validate { strict, max_depth }, Stage::Blocks { meta, value }) => {
            let mut validator = Validator::new();
            if let Some(depth) = max_depth {
                validator = validator.with_max_depth(*depth);
            }
            let report = validator.run(&value);
            debug!(
                errors = report.errors.len(),
                fixes = report.fixes.len(),
                "validated blocks"
            );
            if *strict && !report.is_valid {
                return Err(PipelineError::ValidationFailed {
                    count: report.errors.len(),
                    first: report
                        .errors
                        .first()
                        .map(|e| e.message.clone())
                        .unwrap_or_default(),
                });
            }
            let value = report.fixed_data.clone();
            result.validation = Some(report);
            Ok(Stage::Blocks { meta, value })
        }
        (
            PipelineStep::Render {
                layout,
                color_styles,
                back_link,
            },
            Stage::Blocks { meta, value },
        ) => {
            let config = RenderConfig {
                layout: *layout,
                color_styles: *color_styles,
                back_link: back_link.clone(),
                ..RenderConfig::default()
            };
            let doc = Document::new(blocks_from_value(value.clone(), config.max_depth))
                .with_meta(meta.clone());
            let output = render_document(&doc, &config);
            debug!(
                rendered = output.blocks_rendered,
                skipped = output.blocks_skipped,
                "rendered blocks"
            );
            result.rendered = Some(output);
            Ok(Stage::Blocks { meta, value })
        }
        (step, stage) => Err(PipelineError::StepMismatch {
            step: step.name(),
            stage: stage.label(),
        }),
    }
}
