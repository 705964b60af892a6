//! C++ emitter
//!
//! Every classifier gets a header with the declaration and an
//! implementation file with out-of-line definitions. Classifiers with
//! `Implementation` visibility get no header; their declaration is written
//! at the top of the implementation file. Enums, interfaces and special
//! stereotypes are header-only. Class templates are header-only too, with
//! their member definitions after the class body.

mod header;
mod source;

use umbrello_model::{Attribute, Changeability, Model, Operation, OperationKind, Visibility};

use super::{EmitContext, Emitter, OutputUnit, UnitKind};
use crate::ir::{ClassifierPlan, Member, SpecialKind, TypeShape};
use crate::language::Language;
use crate::naming::{capitalize_first, clean_name, member_identifier};
use crate::policy::CodeGenerationPolicy;

pub struct CppEmitter;

pub(crate) const HEADER_EXTENSION: &str = ".h";
pub(crate) const SOURCE_EXTENSION: &str = ".cpp";

fn label(tier: Visibility) -> &'static str {
    match tier {
        Visibility::Public => "public:",
        Visibility::Protected => "protected:",
        Visibility::Private | Visibility::Implementation => "private:",
    }
}

/// Data member name including the configured prefix
fn field_name(cx: &EmitContext<'_, '_>, member: &Member<'_>) -> String {
    format!("{}{}", cx.policy().cpp.class_member_prefix, member.name)
}

/// Element type as stored: roles are held by pointer
fn element_type(member: &Member<'_>) -> String {
    if member.is_role() {
        format!("{}*", member.type_name)
    } else {
        member.type_name.clone()
    }
}

/// Declared type of a data member
fn field_type(cx: &EmitContext<'_, '_>, member: &Member<'_>) -> String {
    if member.is_collection() {
        format!("{}<{}>", cx.policy().cpp.vector_class_name, element_type(member))
    } else {
        element_type(member)
    }
}

/// Accessor method name for `verb` (`get`, `set`, `add`, `remove`)
fn accessor_name(policy: &CodeGenerationPolicy, verb: &str, member: &Member<'_>) -> String {
    let cpp = &policy.cpp;
    let mut stem = member.name.as_str();
    if cpp.remove_prefix_from_accessor_methods {
        stem = stem.strip_prefix("m_").unwrap_or(stem);
        stem = stem.trim_start_matches('_');
    }
    if verb == "get" && !cpp.getter_with_get_prefix {
        return stem.to_string();
    }
    if cpp.accessor_methods_start_with_upper_case {
        format!("{}{}", verb, capitalize_first(stem))
    } else {
        format!("{}_{}", verb, stem)
    }
}

/// `#include` operand of a classifier's header, relative to the output root
fn include_path(model: &Model, classifier: &umbrello_model::Classifier, policy: &CodeGenerationPolicy) -> String {
    let base = crate::output::natural_base_name(
        model,
        classifier,
        Language::Cpp,
        policy.create_package_dirs,
    );
    format!(
        "\"{}{}\"",
        base.to_string_lossy().replace('\\', "/"),
        HEADER_EXTENSION
    )
}

/// Include guard symbol: `SHOP_ORDER_H`
fn guard_name(plan: &ClassifierPlan<'_>) -> String {
    let mut parts: Vec<String> = plan.package.iter().map(|p| clean_name(p)).collect();
    parts.push(plan.name.clone());
    format!("{}_H", parts.join("_").to_uppercase())
}

fn namespace(cx: &EmitContext<'_, '_>) -> Option<String> {
    let plan = cx.plan;
    if !cx.policy().cpp.package_is_namespace || plan.package.is_empty() {
        return None;
    }
    Some(
        plan.package
            .iter()
            .map(|p| clean_name(p))
            .collect::<Vec<_>>()
            .join(Language::Cpp.package_separator()),
    )
}

fn open_namespace(cx: &mut EmitContext<'_, '_>) {
    if let Some(ns) = namespace(cx) {
        cx.w.line(format!("namespace {} {{", ns));
        cx.w.blank();
    }
}

fn close_namespace(cx: &mut EmitContext<'_, '_>) {
    if let Some(ns) = namespace(cx) {
        cx.w.line(format!("}} // namespace {}", ns));
        cx.w.blank();
    }
}

/// `template<class T, int N>` line, empty for plain classes
fn template_clause(plan: &ClassifierPlan<'_>) -> Option<String> {
    let templates = &plan.classifier.templates;
    if templates.is_empty() {
        return None;
    }
    let params: Vec<String> = templates
        .iter()
        .map(|t| {
            if t.is_unconstrained() {
                format!("class {}", t.name)
            } else {
                format!("{} {}", t.type_name, t.name)
            }
        })
        .collect();
    Some(format!("template<{}>", params.join(", ")))
}

/// Scope prefix for out-of-line definitions: `Order::` or `Pair<T>::`
fn qualifier(plan: &ClassifierPlan<'_>) -> String {
    let templates = &plan.classifier.templates;
    if templates.is_empty() {
        format!("{}::", plan.name)
    } else {
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        format!("{}<{}>::", plan.name, names.join(", "))
    }
}

fn operation_name(cx: &EmitContext<'_, '_>, operation: &Operation) -> String {
    let plan = cx.plan;
    match operation.kind {
        OperationKind::Constructor => plan.name.clone(),
        OperationKind::Destructor => format!("~{}", plan.name),
        OperationKind::Regular => {
            member_identifier(Language::Cpp, cx.policy().modify_name_policy, &operation.name)
        }
    }
}

/// Mapped return type, `None` for constructors and destructors
fn return_type(cx: &EmitContext<'_, '_>, operation: &Operation) -> Option<String> {
    match operation.kind {
        OperationKind::Regular => Some(cx.mapper().fix_type_name(&operation.return_type)),
        _ => None,
    }
}

/// Parameter list; default values only belong in the declaration
fn parameter_list(cx: &EmitContext<'_, '_>, parameters: &[Attribute], with_defaults: bool) -> String {
    let mapper = cx.mapper();
    let policy = cx.policy();
    parameters
        .iter()
        .map(|p| {
            let ty = mapper.fix_type_name(&p.type_name);
            let name = member_identifier(Language::Cpp, policy.modify_name_policy, &p.name);
            let value = mapper.fix_initial_value(&p.initial_value, &ty);
            if with_defaults && !value.is_empty() {
                format!("{} {} = {}", ty, name, value)
            } else {
                format!("{} {}", ty, name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Declared without a body anywhere
fn is_pure(plan: &ClassifierPlan<'_>, operation: &Operation) -> bool {
    operation.is_abstract || (plan.is_interface() && !operation.is_static)
}

fn default_return(return_type: &str) -> Option<String> {
    let ty = return_type.trim();
    match ty {
        "void" => None,
        "bool" => Some("return false;".to_string()),
        "int" | "long" | "short" | "unsigned int" | "unsigned long" | "unsigned short" | "float"
        | "double" | "char" | "unsigned char" | "size_t" => Some("return 0;".to_string()),
        _ if ty.ends_with('*') => Some("return nullptr;".to_string()),
        _ => Some(format!("return {}();", ty)),
    }
}

/// Body text of an operation definition, inline or out of line
fn operation_body(cx: &EmitContext<'_, '_>, operation: &Operation) -> String {
    if !operation.source_code.trim().is_empty() {
        return operation.source_code.clone();
    }
    let plan = cx.plan;
    if operation.kind == OperationKind::Constructor
        && cx.policy().auto_generate_constructors
        && !plan.init.is_empty()
    {
        return "initAttributes();".to_string();
    }
    return_type(cx, operation)
        .and_then(|ty| default_return(&ty))
        .unwrap_or_default()
}

/// Operations of one tier, plus the interface operations a concrete class
/// provides when `tier` is public
fn operations_for(plan: &ClassifierPlan<'_>, tier: Visibility) -> Vec<Operation> {
    let mut operations: Vec<Operation> = plan.operations_of(tier).map(|o| (*o).clone()).collect();
    if tier == Visibility::Public {
        operations.extend(plan.implemented_operations());
    }
    operations
}

/// One generated accessor method
struct Accessor {
    doc: Vec<String>,
    is_static: bool,
    return_type: String,
    name: String,
    params: String,
    is_const: bool,
    body: String,
}

impl Accessor {
    fn signature(&self, scope: &str) -> String {
        format!(
            "{} {}{}({}){}",
            self.return_type,
            scope,
            self.name,
            self.params,
            if self.is_const { " const" } else { "" }
        )
    }
}

/// Members of one tier that get accessors under the policy
fn accessor_members<'p, 'm>(
    plan: &'p ClassifierPlan<'m>,
    policy: &CodeGenerationPolicy,
    tier: Visibility,
) -> Vec<&'p Member<'m>> {
    if plan.is_interface() {
        return Vec::new();
    }
    let mut members: Vec<&Member<'m>> = Vec::new();
    if policy.auto_generate_attrib_accessors {
        members.extend(plan.static_attributes(tier));
        members.extend(plan.instance_attributes(tier));
    }
    if policy.auto_generate_assoc_accessors {
        members.extend(plan.role_fields(tier));
    }
    members.retain(|m| !m.resolved.is_unknown());
    members
}

fn accessors(cx: &EmitContext<'_, '_>, member: &Member<'_>) -> Vec<Accessor> {
    let policy = cx.policy();
    let field = field_name(cx, member);
    let element = element_type(member);
    let mut out = Vec::new();

    if member.is_collection() {
        if member.is_writable() {
            out.push(Accessor {
                doc: vec![format!("Add a {} object to the {} list", member.type_name, field)],
                is_static: false,
                return_type: "void".to_string(),
                name: accessor_name(policy, "add", member),
                params: format!("{} value", element),
                is_const: false,
                body: format!("{}.push_back(value);", field),
            });
        }
        if member.changeability == Changeability::Changeable {
            out.push(Accessor {
                doc: vec![format!("Remove a {} object from the {} list", member.type_name, field)],
                is_static: false,
                return_type: "void".to_string(),
                name: accessor_name(policy, "remove", member),
                params: format!("{} value", element),
                is_const: false,
                body: format!(
                    "{f}.erase(std::remove({f}.begin(), {f}.end(), value), {f}.end());",
                    f = field
                ),
            });
        }
        out.push(Accessor {
            doc: vec![format!("Get the list of {} objects held by {}", member.type_name, field)],
            is_static: false,
            return_type: field_type(cx, member),
            name: format!("{}List", accessor_name(policy, "get", member)),
            params: String::new(),
            is_const: true,
            body: format!("return {};", field),
        });
        return out;
    }

    let ty = element;
    if member.is_writable() {
        out.push(Accessor {
            doc: vec![
                format!("Set the value of {}", field),
                format!("{}param value the new value of {}", policy.cpp.doc_tool_tag, field),
            ],
            is_static: member.is_static,
            return_type: "void".to_string(),
            name: accessor_name(policy, "set", member),
            params: format!("{} value", ty),
            is_const: false,
            body: format!("{} = value;", field),
        });
    }
    out.push(Accessor {
        doc: vec![
            format!("Get the value of {}", field),
            format!("{}return the value of {}", policy.cpp.doc_tool_tag, field),
        ],
        is_static: member.is_static,
        return_type: ty,
        name: accessor_name(policy, "get", member),
        params: String::new(),
        is_const: !member.is_static,
        body: format!("return {};", field),
    });
    out
}

/// Whether some changeable collection gets a `remove` accessor, whose body
/// calls `std::remove`
fn has_remove_accessor(plan: &ClassifierPlan<'_>, policy: &CodeGenerationPolicy) -> bool {
    Visibility::TIERS.iter().any(|&tier| {
        accessor_members(plan, policy, tier)
            .iter()
            .any(|m| m.is_collection() && m.changeability == Changeability::Changeable)
    })
}

/// Whether any member or signature spells the configured string class
fn uses_string(cx: &EmitContext<'_, '_>) -> bool {
    let plan = cx.plan;
    let mapper = cx.mapper();
    let string_class = &cx.policy().cpp.string_class_name;
    let mentions = |ty: &str| ty.contains(string_class.as_str()) || mapper.is_string_type(ty);
    plan.members.iter().any(|m| mentions(&m.type_name))
        || plan.operations.iter().any(|o| {
            mentions(&mapper.fix_type_name(&o.return_type))
                || o.parameters
                    .iter()
                    .any(|p| mentions(&mapper.fix_type_name(&p.type_name)))
        })
}

/// Header file exists for this classifier
fn has_header(plan: &ClassifierPlan<'_>) -> bool {
    plan.classifier.visibility != Visibility::Implementation
}

/// Class template with a header: definitions must be visible to every
/// translation unit that instantiates it
fn defines_in_header(plan: &ClassifierPlan<'_>) -> bool {
    has_header(plan) && plan.shape == TypeShape::Class && !plan.classifier.templates.is_empty()
}

fn has_source(plan: &ClassifierPlan<'_>) -> bool {
    !has_header(plan) || (plan.shape == TypeShape::Class && !defines_in_header(plan))
}

impl Emitter for CppEmitter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn units(&self, plan: &ClassifierPlan<'_>) -> Vec<OutputUnit> {
        let mut units = Vec::new();
        if has_header(plan) {
            units.push(OutputUnit {
                kind: UnitKind::Header,
                extension: HEADER_EXTENSION,
            });
        }
        if has_source(plan) {
            units.push(OutputUnit {
                kind: UnitKind::Source,
                extension: SOURCE_EXTENSION,
            });
        }
        units
    }

    fn emit_header(&self, cx: &mut EmitContext<'_, '_>) {
        let guard = guard_name(cx.plan);
        cx.w.line(format!("#ifndef {}", guard));
        cx.w.line(format!("#define {}", guard));
        cx.w.blank();
        header::write_includes(cx);
        open_namespace(cx);
    }

    fn emit_enum(&self, cx: &mut EmitContext<'_, '_>) {
        header::write_enum(cx);
    }

    fn emit_special(&self, cx: &mut EmitContext<'_, '_>, kind: &SpecialKind) {
        header::write_special(cx, kind);
    }

    fn emit_type_open(&self, cx: &mut EmitContext<'_, '_>) {
        header::write_type_open(cx);
    }

    fn emit_members(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        header::write_fields(cx, tier);
    }

    fn emit_accessors(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        header::write_accessor_declarations(cx, tier);
    }

    fn emit_constructors(&self, cx: &mut EmitContext<'_, '_>) {
        header::write_constructor_declarations(cx);
    }

    fn emit_operations(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        header::write_operation_declarations(cx, tier);
    }

    fn emit_type_close(&self, cx: &mut EmitContext<'_, '_>) {
        cx.w.dedent();
        cx.w.line("};");
    }

    fn emit_footer(&self, cx: &mut EmitContext<'_, '_>) {
        cx.w.blank();
        if defines_in_header(cx.plan) {
            source::write_definitions(cx);
        }
        close_namespace(cx);
        cx.w.line(format!("#endif // {}", guard_name(cx.plan)));
    }

    /// Declarations grouped under one access label per tier
    fn emit_body(&self, cx: &mut EmitContext<'_, '_>) {
        let accessors_public = cx.policy().cpp.accessors_are_public;
        for tier in [Visibility::Public, Visibility::Protected, Visibility::Private] {
            // implementation visibility shares the private section
            let tiers: &[Visibility] = if tier == Visibility::Private {
                &[Visibility::Private, Visibility::Implementation]
            } else {
                std::slice::from_ref(&tier)
            };

            let child = cx.w.child();
            let outer = std::mem::replace(&mut cx.w, child);
            if tier == Visibility::Public {
                self.emit_constructors(cx);
            }
            for &t in tiers {
                self.emit_operations(cx, t);
            }
            if accessors_public {
                if tier == Visibility::Public {
                    for t in Visibility::TIERS {
                        self.emit_accessors(cx, t);
                    }
                }
            } else {
                for &t in tiers {
                    self.emit_accessors(cx, t);
                }
            }
            for &t in tiers {
                self.emit_members(cx, t);
            }
            if tier == Visibility::Private {
                header::write_init_declaration(cx);
            }
            let section = std::mem::replace(&mut cx.w, outer);

            if section.is_empty() {
                continue;
            }
            cx.w.dedent();
            cx.w.line(label(tier));
            cx.w.indent();
            cx.w.append(section);
        }
    }

    fn emit_unit(&self, cx: &mut EmitContext<'_, '_>) {
        match cx.unit.kind {
            UnitKind::Source => source::write_source(self, cx),
            UnitKind::Header | UnitKind::Module => super::emit_skeleton(self, cx),
        }
    }
}
