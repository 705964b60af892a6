//! Code emitters for the supported target languages
//!
//! Each language implements [`Emitter`]. The provided [`Emitter::emit_unit`]
//! drives the same sequence for every language: heading, header (package,
//! namespace, imports), kind dispatch, type opening with inheritance,
//! members, accessors, constructors, operations, type close, footer.
//! Back-ends override single steps, or [`Emitter::emit_body`] when the
//! language groups declarations differently.

pub mod cpp;
pub mod java;
pub mod python;
pub mod ruby;

use std::path::PathBuf;

use chrono::{DateTime, Local};
use umbrello_model::{Operation, Visibility};

use crate::ir::{ClassifierPlan, Member, SpecialKind, TypeShape};
use crate::language::Language;
use crate::policy::CodeGenerationPolicy;
use crate::query::{ModelQuery, ResolvedType};
use crate::types::TypeMapper;
use crate::writer::{doc_comment_syntax, line_comment_syntax, CodeWriter, CommentSyntax};

/// Everything one run needs besides the classifier at hand
pub struct GenerationContext<'a> {
    pub language: Language,
    pub policy: &'a CodeGenerationPolicy,
    pub query: ModelQuery<'a>,
    /// Clock value used for `%date%` and `%time%`, fixed for the run
    pub timestamp: DateTime<Local>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        model: &'a umbrello_model::Model,
        policy: &'a CodeGenerationPolicy,
        language: Language,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            language,
            policy,
            query: ModelQuery::new(model, TypeMapper::new(language, policy)),
            timestamp,
        }
    }

    pub fn mapper(&self) -> &TypeMapper {
        self.query.mapper()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// C++ header
    Header,
    /// C++ implementation file
    Source,
    /// Single-file languages
    Module,
}

/// One file produced for a classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputUnit {
    pub kind: UnitKind,
    pub extension: &'static str,
}

/// Name and location of the file being emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_name: String,
    pub file_path: PathBuf,
}

/// State of one unit being emitted
pub struct EmitContext<'c, 'm> {
    pub gen: &'c GenerationContext<'m>,
    pub plan: &'c ClassifierPlan<'m>,
    pub unit: OutputUnit,
    pub file: FileInfo,
    pub w: CodeWriter,
}

impl<'c, 'm> EmitContext<'c, 'm> {
    pub fn policy(&self) -> &'m CodeGenerationPolicy {
        self.gen.policy
    }

    pub fn mapper(&self) -> &'c TypeMapper {
        self.gen.mapper()
    }

    pub fn language(&self) -> Language {
        self.gen.language
    }

    pub fn doc_syntax(&self) -> CommentSyntax {
        doc_comment_syntax(self.gen.language, self.gen.policy.comment_style)
    }

    pub fn line_syntax(&self) -> CommentSyntax {
        line_comment_syntax(self.gen.language)
    }

    /// Section banner, only with verbose section comments
    pub fn banner(&mut self, title: &str) {
        if !self.policy().verbose_section_comments {
            return;
        }
        let syntax = self.line_syntax();
        let bare = syntax.line.trim_end().to_string();
        self.w.line(&bare);
        self.w.line(format!("{}{}", syntax.line, title));
        self.w.line(&bare);
        self.w.blank();
    }

    /// Documentation block for `doc` plus tag lines; nothing when both are empty
    pub fn doc_block(&mut self, doc: &str, tags: &[String]) {
        let mut paragraphs = Vec::new();
        if !doc.trim().is_empty() {
            paragraphs.push(doc.to_string());
        }
        paragraphs.extend(tags.iter().cloned());
        if paragraphs.is_empty() {
            return;
        }
        let syntax = self.doc_syntax();
        self.w.comment_lines(&syntax, &paragraphs);
    }

    /// Marked comment replacing the declaration of a member whose type
    /// does not resolve
    pub fn unresolved_member(&mut self, member: &Member<'_>) -> bool {
        if let ResolvedType::Unknown(name) = &member.resolved {
            let syntax = self.line_syntax();
            self.w.line(format!(
                "{}unresolved type '{}' for member '{}'",
                syntax.line,
                name,
                member.model_name()
            ));
            return true;
        }
        false
    }

    /// Marker comment above an operation whose signature has unknown types
    pub fn mark_unresolved_signature(&mut self, operation: &Operation) {
        let query = &self.gen.query;
        let mut unknown: Vec<String> = Vec::new();
        if let ResolvedType::Unknown(name) = query.resolve_return_type(operation) {
            unknown.push(name);
        }
        for parameter in &operation.parameters {
            if let ResolvedType::Unknown(name) = query.resolve_attribute_type(parameter) {
                unknown.push(name);
            }
        }
        if !unknown.is_empty() {
            let syntax = self.line_syntax();
            self.w.line(format!(
                "{}unresolved type(s) in '{}': {}",
                syntax.line,
                operation.name,
                unknown.join(", ")
            ));
        }
    }

    /// Comment for a stereotype this language does not generate
    pub fn not_implemented(&mut self, stereotype: &str) {
        let syntax = self.line_syntax();
        let name = self.plan.name.clone();
        let language = self.language();
        self.w.line(format!(
            "{}{}: stereotype <<{}>> is not yet implemented for {}",
            syntax.line, name, stereotype, language
        ));
    }
}

/// A language back-end
pub trait Emitter {
    fn language(&self) -> Language;

    /// Files this classifier produces, in emission order
    fn units(&self, plan: &ClassifierPlan<'_>) -> Vec<OutputUnit>;

    fn emit_heading(&self, cx: &mut EmitContext<'_, '_>) {
        let heading = cx.policy().heading(
            cx.unit.extension,
            &cx.file.file_name,
            &cx.file.file_path,
            &cx.gen.timestamp,
        );
        if let Some(heading) = heading {
            cx.w.raw(&heading);
            cx.w.blank();
        }
    }

    /// Package or namespace opening and imports
    fn emit_header(&self, cx: &mut EmitContext<'_, '_>);

    fn emit_enum(&self, cx: &mut EmitContext<'_, '_>);

    fn emit_special(&self, cx: &mut EmitContext<'_, '_>, kind: &SpecialKind);

    /// Type documentation, declaration and inheritance clause
    fn emit_type_open(&self, cx: &mut EmitContext<'_, '_>);

    /// Data members of one tier: statics, instance attributes, role fields
    fn emit_members(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility);

    fn emit_accessors(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility);

    /// Constructors and the attribute initializer
    fn emit_constructors(&self, cx: &mut EmitContext<'_, '_>);

    fn emit_operations(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility);

    fn emit_type_close(&self, cx: &mut EmitContext<'_, '_>);

    /// Namespace closing and file trailer
    fn emit_footer(&self, cx: &mut EmitContext<'_, '_>);

    fn emit_body(&self, cx: &mut EmitContext<'_, '_>) {
        for tier in Visibility::TIERS {
            self.emit_members(cx, tier);
        }
        for tier in Visibility::TIERS {
            self.emit_accessors(cx, tier);
        }
        self.emit_constructors(cx);
        for tier in Visibility::TIERS {
            self.emit_operations(cx, tier);
        }
    }

    fn emit_unit(&self, cx: &mut EmitContext<'_, '_>) {
        emit_skeleton(self, cx);
    }
}

/// The shared per-unit sequence
pub fn emit_skeleton<E: Emitter + ?Sized>(emitter: &E, cx: &mut EmitContext<'_, '_>) {
    emitter.emit_heading(cx);
    emitter.emit_header(cx);
    let plan = cx.plan;
    match &plan.shape {
        TypeShape::Enum => emitter.emit_enum(cx),
        TypeShape::Special(kind) => {
            tracing::debug!(classifier = %plan.name, ?kind, "special stereotype");
            emitter.emit_special(cx, kind);
        }
        TypeShape::Class | TypeShape::Interface => {
            emitter.emit_type_open(cx);
            emitter.emit_body(cx);
            emitter.emit_type_close(cx);
        }
    }
    emitter.emit_footer(cx);
}

pub fn emitter_for(language: Language) -> Box<dyn Emitter> {
    match language {
        Language::Cpp => Box::new(cpp::CppEmitter),
        Language::Java => Box::new(java::JavaEmitter),
        Language::Python => Box::new(python::PythonEmitter),
        Language::Ruby => Box::new(ruby::RubyEmitter),
    }
}

/// Render one unit of a classifier to text
pub fn render_unit<'m>(
    emitter: &dyn Emitter,
    gen: &GenerationContext<'m>,
    plan: &ClassifierPlan<'m>,
    unit: OutputUnit,
    file: FileInfo,
) -> String {
    let mut cx = EmitContext {
        gen,
        plan,
        unit,
        file,
        w: CodeWriter::new(gen.policy),
    };
    emitter.emit_unit(&mut cx);
    cx.w.into_string()
}

/// Accessor base name of a member: `items` gives `Items`
pub(crate) fn accessor_stem(member: &Member<'_>) -> String {
    crate::naming::capitalize_first(&member.name)
}
