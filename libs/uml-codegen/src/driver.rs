//! Generation driver
//!
//! Walks the requested classifiers in caller order. Every classifier is
//! planned, rendered unit by unit, and written to the path the
//! [`OutputResolver`] hands out. A failure is recorded for that classifier
//! and the run moves on; there is no rollback of files already written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use umbrello_model::{BaseKind, Classifier, Model, ObjectId};

use crate::error::Error;
use crate::generators::{emitter_for, render_unit, Emitter, FileInfo, GenerationContext};
use crate::ir::ClassifierPlan;
use crate::language::Language;
use crate::output::{OutputResolver, OverwritePrompt, ResolvedPath};
use crate::policy::CodeGenerationPolicy;
use crate::utils::write_generated_file;

/// Progress callbacks of a run
pub trait GenerationObserver {
    /// A classifier was attempted; `success` is false when any unit failed
    fn code_generated(&mut self, _classifier: &Classifier, _success: bool) {}

    fn file_written(&mut self, _path: &Path) {}

    /// Polled before each classifier; `false` stops the run
    fn should_continue(&mut self) -> bool {
        true
    }
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Generated { files: Vec<PathBuf> },
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierOutcome {
    pub id: ObjectId,
    pub name: String,
    pub status: GenerationStatus,
}

/// Per-classifier results of one run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub outcomes: Vec<ClassifierOutcome>,
    /// The observer asked to stop before every classifier was processed
    pub stopped_early: bool,
}

impl GenerationReport {
    pub fn generated(&self) -> usize {
        self.count(|s| matches!(s, GenerationStatus::Generated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, GenerationStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, GenerationStatus::Failed { .. }))
    }

    /// No attempted classifier failed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Every file written during the run
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes.iter().flat_map(|o| match &o.status {
            GenerationStatus::Generated { files } => files.as_slice(),
            _ => [].as_slice(),
        })
    }

    pub fn outcome(&self, name: &str) -> Option<&ClassifierOutcome> {
        self.outcomes.iter().find(|o| o.name == name || o.id == name)
    }

    fn count(&self, pred: impl Fn(&GenerationStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// One generation run over a model snapshot
pub struct GenerationDriver<'a, 'p> {
    context: GenerationContext<'a>,
    resolver: OutputResolver<'p>,
    emitter: Box<dyn Emitter>,
}

impl<'a, 'p> GenerationDriver<'a, 'p> {
    pub fn new(
        model: &'a Model,
        policy: &'a CodeGenerationPolicy,
        language: Language,
        prompt: Box<dyn OverwritePrompt + 'p>,
    ) -> Self {
        Self {
            context: GenerationContext::new(model, policy, language, Local::now()),
            resolver: OutputResolver::new(policy, language, prompt),
            emitter: emitter_for(language),
        }
    }

    /// Fix the clock used for `%date%` and `%time%` in headings
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.context.timestamp = timestamp;
        self
    }

    pub fn generate(
        &mut self,
        classifiers: &[&'a Classifier],
        observer: &mut dyn GenerationObserver,
    ) -> GenerationReport {
        let mut report = GenerationReport::default();

        for &classifier in classifiers {
            if !observer.should_continue() {
                tracing::info!(remaining = classifiers.len() - report.outcomes.len(), "generation stopped");
                report.stopped_early = true;
                break;
            }

            let status = match self.skip_reason(classifier) {
                Some(reason) => {
                    tracing::debug!(classifier = %classifier.name, %reason, "skipped");
                    GenerationStatus::Skipped { reason }
                }
                None => {
                    let status = self.generate_classifier(classifier, observer);
                    let success = matches!(status, GenerationStatus::Generated { .. });
                    observer.code_generated(classifier, success);
                    status
                }
            };

            report.outcomes.push(ClassifierOutcome {
                id: classifier.id.clone(),
                name: classifier.name.clone(),
                status,
            });
        }

        tracing::info!(
            generated = report.generated(),
            skipped = report.skipped(),
            failed = report.failed(),
            language = %self.context.language,
            "generation finished"
        );
        report
    }

    fn skip_reason(&self, classifier: &Classifier) -> Option<String> {
        if classifier.kind == BaseKind::Datatype {
            return Some("datatype".to_string());
        }
        if self.context.query.is_common_datatype(&classifier.name) {
            return Some(format!("{} is a built-in datatype", classifier.name));
        }
        None
    }

    fn generate_classifier(
        &mut self,
        classifier: &'a Classifier,
        observer: &mut dyn GenerationObserver,
    ) -> GenerationStatus {
        let model = self.context.query.model();
        let plan = ClassifierPlan::build(&self.context.query, classifier, self.context.policy);
        let mut files = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        // sibling units are attempted independently
        for unit in self.emitter.units(&plan) {
            let path = match self.resolver.resolve(model, classifier, unit.extension) {
                Ok(ResolvedPath::Path(path)) => path,
                Ok(ResolvedPath::Cancelled) => {
                    failures.push(
                        Error::OutputCancelled {
                            classifier: classifier.name.clone(),
                        }
                        .to_string(),
                    );
                    continue;
                }
                Err(err) => {
                    failures.push(err.to_string());
                    continue;
                }
            };

            let file = FileInfo {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                file_path: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            };
            let text = render_unit(self.emitter.as_ref(), &self.context, &plan, unit, file);
            tracing::debug!(classifier = %classifier.name, path = %path.display(), bytes = text.len(), "rendered unit");

            match write_generated_file(&path, &text) {
                Ok(()) => {
                    observer.file_written(&path);
                    files.push(path);
                }
                Err(err) => failures.push(err.to_string()),
            }
        }

        if failures.is_empty() {
            tracing::info!(classifier = %classifier.name, files = files.len(), "code generated");
            GenerationStatus::Generated { files }
        } else {
            let reason = failures.join("; ");
            tracing::warn!(classifier = %classifier.name, %reason, "code generation failed");
            GenerationStatus::Failed { reason }
        }
    }
}
