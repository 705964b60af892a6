//! UML skeleton code generator
//!
//! Walks a read-only UML model and emits skeleton source code for C++,
//! Java, Python or Ruby, applying per-language naming and keyword rules and
//! a shared formatting policy.
//!
//! ## Architecture
//!
//! The generator runs in four stages:
//! 1. **Query**: resolve types, parents and association roles of a classifier
//! 2. **Plan (IR)**: language-agnostic view of one classifier, members tagged
//!    with their origin and grouped by visibility
//! 3. **Emitters**: one [`generators::Emitter`] per target language renders
//!    the plan into one or more files
//! 4. **Driver**: resolves output paths under the overwrite policy, writes
//!    files and reports per-classifier outcomes
//!
//! Rendering is a pure function of model, policy and timestamp, so
//! [`CodeGenerator::render`] can be used without touching the filesystem.

pub mod driver;
mod error;
pub mod generators;
pub mod ir;
pub mod language;
pub mod naming;
pub mod output;
pub mod policy;
pub mod query;
pub mod types;
pub mod utils;
pub mod writer;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use umbrello_model::{Classifier, Model};

pub use driver::{
    ClassifierOutcome, GenerationDriver, GenerationObserver, GenerationReport, GenerationStatus,
    NoopObserver,
};
pub use error::{Error, Result};
pub use language::Language;
pub use naming::ModifyNamePolicy;
pub use output::{FixedAnswer, OverwriteAnswer, OverwriteChoice, OverwritePrompt};
pub use policy::{CodeGenerationPolicy, OverwritePolicy};

use generators::{emitter_for, render_unit, FileInfo, GenerationContext};
use ir::ClassifierPlan;

/// One rendered file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    /// Path relative to the output directory, before collision handling
    pub path: PathBuf,
    pub contents: String,
}

/// Main entry point for code generation
pub struct CodeGenerator {
    model: Model,
    policy: CodeGenerationPolicy,
    language: Language,
}

impl CodeGenerator {
    /// Create a generator; the policy is validated here
    pub fn new(model: Model, policy: CodeGenerationPolicy, language: Language) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            model,
            policy,
            language,
        })
    }

    /// Load the model snapshot from a JSON file
    pub fn from_file(path: &Path, policy: CodeGenerationPolicy, language: Language) -> Result<Self> {
        let model = umbrello_model::loader::load_json_file(path)?;
        Self::new(model, policy, language)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn policy(&self) -> &CodeGenerationPolicy {
        &self.policy
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Look a classifier up by id, then by name
    pub fn classifier(&self, key: &str) -> Result<&Classifier> {
        self.model
            .classifier(key)
            .or_else(|| self.model.classifier_by_name(key))
            .ok_or_else(|| Error::ClassifierNotFound(key.to_string()))
    }

    /// Render every unit of one classifier without writing anything
    pub fn render(&self, classifier: &Classifier) -> Vec<RenderedUnit> {
        self.render_at(classifier, Local::now())
    }

    /// [`render`](Self::render) with a fixed clock for headings
    pub fn render_at(&self, classifier: &Classifier, timestamp: DateTime<Local>) -> Vec<RenderedUnit> {
        let context = GenerationContext::new(&self.model, &self.policy, self.language, timestamp);
        let emitter = emitter_for(self.language);
        let plan = ClassifierPlan::build(&context.query, classifier, &self.policy);
        let base = output::natural_base_name(
            &self.model,
            classifier,
            self.language,
            self.policy.create_package_dirs,
        );

        emitter
            .units(&plan)
            .into_iter()
            .map(|unit| {
                let mut path = base.clone().into_os_string();
                path.push(unit.extension);
                let path = PathBuf::from(path);
                let file = FileInfo {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    file_path: self
                        .policy
                        .output_directory
                        .join(path.parent().unwrap_or_else(|| Path::new(""))),
                };
                let contents = render_unit(emitter.as_ref(), &context, &plan, unit, file);
                RenderedUnit { path, contents }
            })
            .collect()
    }

    /// Generate every classifier of the model, in model order
    pub fn generate_all(
        &self,
        observer: &mut dyn GenerationObserver,
        prompt: Box<dyn OverwritePrompt + '_>,
    ) -> GenerationReport {
        let classifiers: Vec<&Classifier> = self.model.classifiers().collect();
        self.driver(prompt).generate(&classifiers, observer)
    }

    /// Generate the named classifiers (ids or names), in the given order
    pub fn generate<S: AsRef<str>>(
        &self,
        names: &[S],
        observer: &mut dyn GenerationObserver,
        prompt: Box<dyn OverwritePrompt + '_>,
    ) -> Result<GenerationReport> {
        let classifiers = names
            .iter()
            .map(|n| self.classifier(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.driver(prompt).generate(&classifiers, observer))
    }

    fn driver<'p>(&self, prompt: Box<dyn OverwritePrompt + 'p>) -> GenerationDriver<'_, 'p> {
        GenerationDriver::new(&self.model, &self.policy, self.language, prompt)
    }
}

/// Convenience helper: load a model file and generate every classifier.
///
/// Existing files are never asked about; under [`OverwritePolicy::Ask`]
/// colliding output goes to a fresh `name__N` file.
pub fn generate_from_file(
    model_path: &Path,
    language: Language,
    policy: CodeGenerationPolicy,
) -> Result<GenerationReport> {
    let generator = CodeGenerator::from_file(model_path, policy, language)?;
    let report = generator.generate_all(
        &mut NoopObserver,
        Box::new(FixedAnswer(OverwriteChoice::Rename)),
    );
    Ok(report)
}
