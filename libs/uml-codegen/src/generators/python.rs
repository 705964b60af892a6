//! Python emitter
//!
//! Interfaces become abstract base classes; abstract operations are
//! `@abstractmethod` declarations whose body is `...`. Visibility maps to
//! the usual underscore prefixes.

use heck::ToSnakeCase;
use umbrello_model::{Attribute, Operation, OperationKind, Visibility};

use super::{EmitContext, Emitter, OutputUnit, UnitKind};
use crate::ir::{ClassifierPlan, Member, SpecialKind, TypeShape};
use crate::language::Language;
use crate::naming::{clean_name, member_identifier};
use crate::writer::CodeWriter;

pub struct PythonEmitter;

fn prefix(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "",
        Visibility::Protected | Visibility::Implementation => "_",
        Visibility::Private => "__",
    }
}

fn field_name(member: &Member<'_>) -> String {
    format!("{}{}", prefix(member.visibility), member.name)
}

fn hint(member: &Member<'_>) -> String {
    if member.is_collection() {
        format!("List[{}]", member.type_name)
    } else {
        member.type_name.clone()
    }
}

fn docstring(w: &mut CodeWriter, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !text.contains('\n') {
        w.line(format!("\"\"\"{}\"\"\"", text));
        return;
    }
    w.line("\"\"\"");
    for line in text.lines() {
        w.line(line.trim_end());
    }
    w.line("\"\"\"");
}

fn parameter(cx: &EmitContext<'_, '_>, p: &Attribute) -> String {
    let mapper = cx.mapper();
    let ty = mapper.fix_type_name(&p.type_name);
    let name = member_identifier(Language::Python, cx.policy().modify_name_policy, &p.name);
    let value = mapper.fix_initial_value(&p.initial_value, &ty);
    if value.is_empty() {
        format!("{}: {}", name, ty)
    } else {
        format!("{}: {} = {}", name, ty, value)
    }
}

/// Module imports; classifiers only named in annotations are deferred behind
/// `TYPE_CHECKING` so mutual associations do not import each other at runtime
#[derive(Default)]
struct Imports {
    eager: Vec<String>,
    deferred: Vec<String>,
}

impl PythonEmitter {
    fn collect_imports(&self, cx: &EmitContext<'_, '_>) -> Imports {
        let plan = cx.plan;
        let model = cx.gen.query.model();
        let mut imports = Imports::default();

        for related in &plan.related {
            let name = clean_name(&related.name);
            let module = model.fully_qualified_name(related, ".");
            let line = format!("from {} import {}", module, name);
            let at_runtime = plan.supers().any(|p| p.id == related.id)
                || plan.init.objects.iter().any(|(_, class)| *class == name);
            if at_runtime {
                imports.eager.push(line);
            } else {
                imports.deferred.push(line);
            }
        }

        let mut head = Vec::new();
        if !imports.deferred.is_empty() {
            head.push("from __future__ import annotations".to_string());
        }
        match &plan.shape {
            TypeShape::Enum => head.push("from enum import Enum, auto".to_string()),
            TypeShape::Special(SpecialKind::Struct) => {
                head.push("from dataclasses import dataclass".to_string())
            }
            TypeShape::Interface => head.push("from abc import ABC, abstractmethod".to_string()),
            TypeShape::Class if plan.has_abstract_operations() => {
                head.push("from abc import ABC, abstractmethod".to_string())
            }
            _ => {}
        }

        let mapper = cx.mapper();
        let uses_list = plan.has_collections()
            || plan.operations.iter().any(|o| {
                mapper.fix_type_name(&o.return_type).contains("List[")
                    || o.parameters
                        .iter()
                        .any(|p| mapper.fix_type_name(&p.type_name).contains("List["))
            })
            || plan.members.iter().any(|m| m.type_name.contains("List["));
        let mut typing = Vec::new();
        if !imports.deferred.is_empty() {
            typing.push("TYPE_CHECKING");
        }
        if uses_list {
            typing.push("List");
        }
        if !typing.is_empty() {
            head.push(format!("from typing import {}", typing.join(", ")));
        }

        head.append(&mut imports.eager);
        imports.eager = head;
        imports
    }

    fn write_operation(&self, cx: &mut EmitContext<'_, '_>, operation: &Operation) {
        let plan = cx.plan;
        let policy = cx.policy();
        cx.mark_unresolved_signature(operation);

        let mut params: Vec<String> = Vec::new();
        if !operation.is_static {
            params.push("self".to_string());
        }
        params.extend(operation.parameters.iter().map(|p| parameter(cx, p)));

        let name = match operation.kind {
            OperationKind::Constructor => "__init__".to_string(),
            OperationKind::Destructor => "__del__".to_string(),
            OperationKind::Regular => format!(
                "{}{}",
                prefix(operation.visibility),
                member_identifier(Language::Python, policy.modify_name_policy, &operation.name)
            ),
        };
        let returns = match operation.kind {
            OperationKind::Regular => cx.mapper().fix_type_name(&operation.return_type),
            _ => "None".to_string(),
        };
        let is_abstract = operation.kind == OperationKind::Regular
            && (operation.is_abstract || (plan.is_interface() && !operation.is_static));

        if operation.is_static {
            cx.w.line("@staticmethod");
        }
        if is_abstract {
            cx.w.line("@abstractmethod");
        }
        cx.w.line(format!("def {}({}) -> {}:", name, params.join(", "), returns));
        let init_call = operation.kind == OperationKind::Constructor
            && policy.auto_generate_constructors
            && !plan.init.is_empty();
        cx.w.indented(|w| {
            docstring(w, &operation.doc);
            if is_abstract {
                w.line("...");
            } else if !operation.source_code.trim().is_empty() {
                w.source_code(&operation.source_code);
            } else if init_call {
                w.line("self._init_attributes()");
            } else {
                w.line("pass");
            }
        });
        cx.w.blank();
    }

    fn write_accessors(&self, cx: &mut EmitContext<'_, '_>, member: &Member<'_>) {
        let field = field_name(member);
        let stem = member.name.to_snake_case();
        let ty = member.type_name.clone();

        if member.is_static {
            cx.w.line("@classmethod");
            cx.w.line(format!("def get_{}(cls) -> {}:", stem, ty));
            cx.w.indented(|w| w.line(format!("return cls.{}", field)));
            cx.w.blank();
            return;
        }

        let changeable = member.changeability == umbrello_model::Changeability::Changeable;
        if member.is_collection() {
            if member.is_writable() {
                cx.w.line(format!("def add_{}(self, value: {}) -> None:", stem, ty));
                cx.w.indented(|w| w.line(format!("self.{}.append(value)", field)));
                cx.w.blank();
            }
            if changeable {
                cx.w.line(format!("def remove_{}(self, value: {}) -> None:", stem, ty));
                cx.w.indented(|w| w.line(format!("self.{}.remove(value)", field)));
                cx.w.blank();
            }
            cx.w.line(format!("def get_{}_list(self) -> List[{}]:", stem, ty));
            cx.w.indented(|w| w.line(format!("return self.{}", field)));
            cx.w.blank();
        } else {
            if changeable {
                cx.w.line(format!("def set_{}(self, value: {}) -> None:", stem, ty));
                cx.w.indented(|w| w.line(format!("self.{} = value", field)));
                cx.w.blank();
            }
            cx.w.line(format!("def get_{}(self) -> {}:", stem, ty));
            cx.w.indented(|w| w.line(format!("return self.{}", field)));
            cx.w.blank();
        }
    }
}

impl Emitter for PythonEmitter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn units(&self, _plan: &ClassifierPlan<'_>) -> Vec<OutputUnit> {
        vec![OutputUnit {
            kind: UnitKind::Module,
            extension: ".py",
        }]
    }

    fn emit_header(&self, cx: &mut EmitContext<'_, '_>) {
        let imports = self.collect_imports(cx);
        for import in &imports.eager {
            cx.w.line(import);
        }
        if !imports.deferred.is_empty() {
            cx.w.blank();
            cx.w.line("if TYPE_CHECKING:");
            cx.w.indented(|w| {
                for import in &imports.deferred {
                    w.line(import);
                }
            });
        }
        if !imports.eager.is_empty() {
            cx.w.blank();
            cx.w.blank();
        }
    }

    fn emit_enum(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        cx.w.line(format!("class {}(Enum):", plan.name));
        cx.w.indented(|w| {
            docstring(w, &plan.classifier.doc);
            if plan.classifier.literals.is_empty() {
                w.line("pass");
            }
            for literal in &plan.classifier.literals {
                let value = literal.value.trim();
                let value = if value.is_empty() { "auto()" } else { value };
                w.line(format!("{} = {}", clean_name(&literal.name), value));
            }
        });
    }

    fn emit_special(&self, cx: &mut EmitContext<'_, '_>, kind: &SpecialKind) {
        let plan = cx.plan;
        match kind {
            SpecialKind::Struct => {
                let (plain, defaulted): (Vec<&Member<'_>>, Vec<&Member<'_>>) = plan
                    .attributes()
                    .filter(|m| !m.is_static)
                    .partition(|m| m.initial_value.is_empty());
                cx.w.line("@dataclass");
                cx.w.line(format!("class {}:", plan.name));
                cx.w.indented(|w| {
                    docstring(w, &plan.classifier.doc);
                    for m in &plain {
                        w.line(format!("{}: {}", m.name, m.type_name));
                    }
                    for m in &defaulted {
                        w.line(format!("{}: {} = {}", m.name, m.type_name, m.initial_value));
                    }
                    if plain.is_empty() && defaulted.is_empty() && plan.classifier.doc.trim().is_empty() {
                        w.line("pass");
                    }
                });
            }
            SpecialKind::Union => cx.not_implemented("union"),
            SpecialKind::Typedef => cx.not_implemented("typedef"),
            SpecialKind::Unsupported(stereotype) => cx.not_implemented(stereotype),
        }
    }

    fn emit_type_open(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        let mut bases: Vec<String> = plan.supers().map(|c| clean_name(&c.name)).collect();
        // last, so bases that are already ABCs keep a consistent MRO
        if plan.is_interface() || plan.has_abstract_operations() {
            bases.push("ABC".to_string());
        }
        if bases.is_empty() {
            cx.w.line(format!("class {}:", plan.name));
        } else {
            cx.w.line(format!("class {}({}):", plan.name, bases.join(", ")));
        }
        cx.w.indent();

        let doc = if plan.classifier.doc.trim().is_empty() && cx.policy().verbose_document_comments {
            format!("Class {}", plan.name)
        } else {
            plan.classifier.doc.clone()
        };
        if !doc.trim().is_empty() {
            docstring(&mut cx.w, &doc);
            cx.w.blank();
        }
    }

    fn emit_members(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let fields = plan.fields(tier);
        if fields.is_empty() {
            return;
        }
        cx.banner(&format!("{} attributes", tier.as_str()));
        for member in fields {
            if cx.unresolved_member(member) {
                continue;
            }
            if !member.doc.trim().is_empty() {
                let syntax = cx.line_syntax();
                cx.w.comment(&syntax, &member.doc);
            }
            let name = field_name(member);
            if member.is_static && !member.initial_value.is_empty() {
                cx.w.line(format!("{}: {} = {}", name, hint(member), member.initial_value));
            } else {
                cx.w.line(format!("{}: {}", name, hint(member)));
            }
        }
        cx.w.blank();
    }

    fn emit_accessors(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let policy = cx.policy();
        if plan.is_interface() {
            return;
        }
        let mut members: Vec<&Member<'_>> = Vec::new();
        if tier == Visibility::Public && policy.auto_generate_attrib_accessors {
            members.extend(plan.attributes());
        }
        if policy.auto_generate_assoc_accessors {
            members.extend(plan.role_fields(tier));
        }
        members.retain(|m| !m.resolved.is_unknown());
        if members.is_empty() {
            return;
        }
        cx.banner(&format!("{} accessor methods", tier.as_str()));
        for member in members {
            self.write_accessors(cx, member);
        }
    }

    fn emit_constructors(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        if plan.is_interface() || !cx.policy().auto_generate_constructors {
            return;
        }
        let explicit = plan
            .operations
            .iter()
            .any(|o| o.kind == OperationKind::Constructor);

        if !explicit {
            cx.w.line("def __init__(self) -> None:");
            let has_super = !plan.super_classes.is_empty();
            cx.w.indented(|w| {
                if has_super {
                    w.line("super().__init__()");
                }
                if !plan.init.is_empty() {
                    w.line("self._init_attributes()");
                }
                if !has_super && plan.init.is_empty() {
                    w.line("pass");
                }
            });
            cx.w.blank();
        }

        if plan.init.is_empty() {
            return;
        }
        let lookup = |name: &str| -> String {
            plan.members
                .iter()
                .find(|m| m.name == name)
                .map(field_name)
                .unwrap_or_else(|| name.to_string())
        };
        cx.w.line("def _init_attributes(self) -> None:");
        cx.w.indented(|w| {
            for (name, value) in &plan.init.assignments {
                w.line(format!("self.{} = {}", lookup(name), value));
            }
            for (name, class) in &plan.init.objects {
                w.line(format!("self.{} = {}()", lookup(name), class));
            }
            for (name, _) in &plan.init.collections {
                w.line(format!("self.{} = []", lookup(name)));
            }
        });
        cx.w.blank();
    }

    fn emit_operations(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let operations: Vec<&Operation> = plan.operations_of(tier).copied().collect();
        // abstract interface methods must be overridden to instantiate
        let implemented: Vec<Operation> = if tier == Visibility::Public {
            plan.implemented_operations()
        } else {
            Vec::new()
        };
        if operations.is_empty() && implemented.is_empty() {
            return;
        }
        cx.banner(&format!("{} methods", tier.as_str()));
        for operation in operations.into_iter().chain(implemented.iter()) {
            self.write_operation(cx, operation);
        }
    }

    fn emit_body(&self, cx: &mut EmitContext<'_, '_>) {
        let before = cx.w.as_str().len();
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
        if cx.w.as_str().len() == before {
            cx.w.line("pass");
        }
    }

    fn emit_type_close(&self, cx: &mut EmitContext<'_, '_>) {
        cx.w.dedent();
    }

    fn emit_footer(&self, _cx: &mut EmitContext<'_, '_>) {}
}
