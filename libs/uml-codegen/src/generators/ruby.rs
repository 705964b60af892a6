//! Ruby emitter
//!
//! Ruby has single inheritance plus mixins: the first superclass becomes
//! `class X < Base`, every other parent (and every interface, which is
//! emitted as a `module`) is mixed in with `include`.

use heck::ToSnakeCase;
use umbrello_model::{Attribute, Changeability, Operation, OperationKind, Visibility};

use super::{EmitContext, Emitter, OutputUnit, UnitKind};
use crate::ir::{ClassifierPlan, Member, SpecialKind};
use crate::language::Language;
use crate::naming::{clean_name, safe_identifier};

pub struct RubyEmitter;

/// Ruby spelling of a member or method name: `m_firstName` gives `first_name`
pub fn ruby_name(name: &str) -> String {
    let base = name.strip_prefix("m_").unwrap_or(name);
    safe_identifier(Language::Ruby, &clean_name(base).to_snake_case())
}

fn visibility_keyword(visibility: Visibility) -> Option<&'static str> {
    match visibility {
        Visibility::Public => None,
        Visibility::Protected => Some("protected"),
        Visibility::Private | Visibility::Implementation => Some("private"),
    }
}

fn parameter(cx: &EmitContext<'_, '_>, p: &Attribute) -> String {
    let mapper = cx.mapper();
    let name = ruby_name(&p.name);
    let ty = mapper.fix_type_name(&p.type_name);
    let value = mapper.fix_initial_value(&p.initial_value, &ty);
    if value.is_empty() {
        name
    } else {
        format!("{} = {}", name, value)
    }
}

impl RubyEmitter {
    fn operation_tags(&self, cx: &EmitContext<'_, '_>, operation: &Operation) -> Vec<String> {
        if operation.doc.trim().is_empty() && !cx.policy().verbose_document_comments {
            return Vec::new();
        }
        let mapper = cx.mapper();
        let mut tags: Vec<String> = operation
            .parameters
            .iter()
            .map(|p| {
                let ty = mapper.fix_type_name(&p.type_name);
                format!("@param {} [{}] {}", ruby_name(&p.name), ty, p.doc)
                    .trim_end()
                    .to_string()
            })
            .collect();
        let returns = mapper.fix_type_name(&operation.return_type);
        if !returns.is_empty() && operation.kind == OperationKind::Regular {
            tags.push(format!("@return [{}]", returns));
        }
        if operation.is_abstract {
            tags.push("@abstract".to_string());
        }
        tags
    }

    fn write_operation(&self, cx: &mut EmitContext<'_, '_>, operation: &Operation) {
        let name = match operation.kind {
            OperationKind::Constructor => "initialize".to_string(),
            OperationKind::Destructor => {
                let syntax = cx.line_syntax();
                cx.w.line(format!(
                    "{}destructor {} has no Ruby counterpart",
                    syntax.line, operation.name
                ));
                cx.w.blank();
                return;
            }
            OperationKind::Regular => ruby_name(&operation.name),
        };

        cx.mark_unresolved_signature(operation);
        let tags = self.operation_tags(cx, operation);
        cx.doc_block(&operation.doc, &tags);

        let params: Vec<String> = operation
            .parameters
            .iter()
            .map(|p| parameter(cx, p))
            .collect();
        let receiver = if operation.is_static { "self." } else { "" };
        if params.is_empty() {
            cx.w.line(format!("def {}{}", receiver, name));
        } else {
            cx.w.line(format!("def {}{}({})", receiver, name, params.join(", ")));
        }

        let init_call = operation.kind == OperationKind::Constructor
            && cx.policy().auto_generate_constructors
            && !cx.plan.init.is_empty();
        cx.w.indented(|w| {
            if !operation.source_code.trim().is_empty() {
                w.source_code(&operation.source_code);
            } else if init_call {
                w.line("init_attributes");
            }
        });
        cx.w.line("end");
        cx.w.blank();
    }

    fn write_role_accessors(&self, cx: &mut EmitContext<'_, '_>, member: &Member<'_>) {
        let name = ruby_name(member.model_name());
        let mut methods: Vec<String> = Vec::new();

        if member.is_collection() {
            cx.w.line(format!("attr_reader :{}", name));
            methods.push(format!(":{}", name));
            if member.is_writable() {
                cx.w.blank();
                cx.w.line(format!("def add_{}(value)", name));
                cx.w.indented(|w| w.line(format!("@{} << value", name)));
                cx.w.line("end");
                methods.push(format!(":add_{}", name));
            }
            if member.changeability == Changeability::Changeable {
                cx.w.blank();
                cx.w.line(format!("def remove_{}(value)", name));
                cx.w.indented(|w| w.line(format!("@{}.delete(value)", name)));
                cx.w.line("end");
                methods.push(format!(":remove_{}", name));
            }
        } else if member.changeability == Changeability::Changeable {
            cx.w.line(format!("attr_accessor :{}", name));
            methods.push(format!(":{}", name));
            methods.push(format!(":{}=", name));
        } else {
            cx.w.line(format!("attr_reader :{}", name));
            methods.push(format!(":{}", name));
        }

        if let Some(keyword) = visibility_keyword(member.visibility) {
            cx.w.line(format!("{} {}", keyword, methods.join(", ")));
        }
        cx.w.blank();
    }
}

impl Emitter for RubyEmitter {
    fn language(&self) -> Language {
        Language::Ruby
    }

    fn units(&self, _plan: &ClassifierPlan<'_>) -> Vec<OutputUnit> {
        vec![OutputUnit {
            kind: UnitKind::Module,
            extension: ".rb",
        }]
    }

    fn emit_header(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        let model = cx.gen.query.model();
        let mut requires: Vec<String> = Vec::new();
        for related in &plan.related {
            let path = crate::output::natural_base_name(
                model,
                related,
                Language::Ruby,
                cx.policy().create_package_dirs,
            );
            let path = path.to_string_lossy().replace('\\', "/");
            if !requires.contains(&path) {
                requires.push(path);
            }
        }
        for path in &requires {
            cx.w.line(format!("require '{}'", path));
        }
        if !requires.is_empty() {
            cx.w.blank();
        }
    }

    fn emit_enum(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        let syntax = cx.doc_syntax();
        cx.w.comment(&syntax, &plan.classifier.doc);
        cx.w.line(format!("module {}", plan.name));
        cx.w.indented(|w| {
            let mut next: i64 = 0;
            for literal in &plan.classifier.literals {
                let name = clean_name(&literal.name).to_uppercase();
                let explicit = literal.value.trim();
                let value = if explicit.is_empty() {
                    next.to_string()
                } else {
                    explicit.to_string()
                };
                if let Ok(n) = value.parse::<i64>() {
                    next = n + 1;
                }
                w.line(format!("{} = {}", name, value));
            }
        });
        cx.w.line("end");
    }

    fn emit_special(&self, cx: &mut EmitContext<'_, '_>, kind: &SpecialKind) {
        let plan = cx.plan;
        match kind {
            SpecialKind::Struct => {
                let fields: Vec<String> = plan
                    .attributes()
                    .filter(|m| !m.is_static)
                    .map(|m| format!(":{}", ruby_name(m.model_name())))
                    .collect();
                let syntax = cx.doc_syntax();
                cx.w.comment(&syntax, &plan.classifier.doc);
                cx.w.line(format!("{} = Struct.new({})", plan.name, fields.join(", ")));
            }
            SpecialKind::Union => cx.not_implemented("union"),
            SpecialKind::Typedef => cx.not_implemented("typedef"),
            SpecialKind::Unsupported(stereotype) => cx.not_implemented(stereotype),
        }
    }

    fn emit_type_open(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        let doc = if plan.classifier.doc.trim().is_empty() && cx.policy().verbose_document_comments {
            format!("{} {}", if plan.is_interface() { "Module" } else { "Class" }, plan.name)
        } else {
            plan.classifier.doc.clone()
        };
        let syntax = cx.doc_syntax();
        cx.w.comment(&syntax, &doc);

        let mut mixins: Vec<String> = Vec::new();
        if plan.is_interface() {
            cx.w.line(format!("module {}", plan.name));
            mixins.extend(plan.super_interfaces.iter().map(|c| clean_name(&c.name)));
        } else {
            match plan.super_classes.first() {
                Some(base) => cx.w.line(format!("class {} < {}", plan.name, clean_name(&base.name))),
                None => cx.w.line(format!("class {}", plan.name)),
            }
            mixins.extend(plan.super_classes.iter().skip(1).map(|c| clean_name(&c.name)));
            mixins.extend(plan.super_interfaces.iter().map(|c| clean_name(&c.name)));
        }
        cx.w.indent();
        for mixin in &mixins {
            cx.w.line(format!("include {}", mixin));
        }
        if !mixins.is_empty() {
            cx.w.blank();
        }
    }

    fn emit_members(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let statics: Vec<&Member<'_>> = plan.static_attributes(tier).collect();
        if statics.is_empty() {
            return;
        }
        cx.banner(&format!("{} class variables", tier.as_str()));
        for member in statics {
            if cx.unresolved_member(member) {
                continue;
            }
            let value = if member.initial_value.is_empty() {
                "nil".to_string()
            } else {
                member.initial_value.clone()
            };
            cx.w.line(format!("@@{} = {}", ruby_name(member.model_name()), value));
        }
        cx.w.blank();
    }

    fn emit_accessors(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let policy = cx.policy();
        if plan.is_interface() {
            return;
        }

        let attributes: Vec<&Member<'_>> = if policy.auto_generate_attrib_accessors {
            plan.instance_attributes(tier)
                .filter(|m| !m.resolved.is_unknown())
                .collect()
        } else {
            Vec::new()
        };
        let roles: Vec<&Member<'_>> = if policy.auto_generate_assoc_accessors {
            plan.role_fields(tier)
                .filter(|m| !m.resolved.is_unknown())
                .collect()
        } else {
            Vec::new()
        };
        // private attributes stay without accessors
        let attributes: Vec<&Member<'_>> = attributes
            .into_iter()
            .filter(|m| m.visibility != Visibility::Private)
            .collect();
        if attributes.is_empty() && roles.is_empty() {
            return;
        }

        cx.banner(&format!("{} accessor methods", tier.as_str()));
        for member in &attributes {
            cx.w.line(format!("attr_accessor :{}", ruby_name(member.model_name())));
        }
        if let Some(keyword) = visibility_keyword(tier) {
            let names: Vec<String> = attributes
                .iter()
                .flat_map(|m| {
                    let name = ruby_name(m.model_name());
                    [format!(":{}", name), format!(":{}=", name)]
                })
                .collect();
            if !names.is_empty() {
                cx.w.line(format!("{} {}", keyword, names.join(", ")));
            }
        }
        if !attributes.is_empty() {
            cx.w.blank();
        }
        for member in roles {
            self.write_role_accessors(cx, member);
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
            cx.w.line("def initialize");
            if !plan.init.is_empty() {
                cx.w.indented(|w| w.line("init_attributes"));
            }
            cx.w.line("end");
            cx.w.blank();
        }

        if plan.init.is_empty() {
            return;
        }
        cx.w.line("def init_attributes");
        cx.w.indented(|w| {
            for (name, value) in &plan.init.assignments {
                w.line(format!("@{} = {}", ruby_name(name), value));
            }
            for (name, class) in &plan.init.objects {
                w.line(format!("@{} = {}.new", ruby_name(name), class));
            }
            for (name, _) in &plan.init.collections {
                w.line(format!("@{} = []", ruby_name(name)));
            }
        });
        cx.w.line("end");
        cx.w.line("private :init_attributes");
        cx.w.blank();
    }

    fn emit_operations(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let operations: Vec<&Operation> = plan.operations_of(tier).copied().collect();
        if operations.is_empty() {
            return;
        }
        cx.banner(&format!("{} methods", tier.as_str()));
        if let Some(keyword) = visibility_keyword(tier) {
            cx.w.line(keyword);
            cx.w.blank();
        }
        for operation in operations {
            self.write_operation(cx, operation);
        }
    }

    fn emit_type_close(&self, cx: &mut EmitContext<'_, '_>) {
        cx.w.dedent();
        cx.w.line("end");
    }

    fn emit_footer(&self, _cx: &mut EmitContext<'_, '_>) {}
}
