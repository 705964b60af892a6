//! Declarations: the `.h` unit, and the class block of header-less classifiers

use umbrello_model::{Classifier, Model, Operation, OperationKind, Visibility};

use super::{
    accessor_members, accessors, defines_in_header, field_name, field_type, has_remove_accessor,
    include_path, is_pure, operation_body, operation_name, operations_for, parameter_list,
    return_type, template_clause, uses_string,
};
use crate::generators::EmitContext;
use crate::ir::{ClassifierPlan, MemberOrigin, SpecialKind};
use crate::naming::clean_name;
use crate::policy::CodeGenerationPolicy;

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// `<string>` stays as is, a bare `string` gets angle brackets
fn include_operand(include: &str) -> String {
    let include = include.trim();
    if include.starts_with('<') || include.starts_with('"') {
        include.to_string()
    } else {
        format!("<{}>", include)
    }
}

/// The classifier only points at `related` through the B end of a
/// bidirectional association, so a forward declaration breaks the
/// include cycle
fn is_back_reference(plan: &ClassifierPlan<'_>, related: &Classifier) -> bool {
    let by_value = plan
        .attributes()
        .any(|m| m.resolved.classifier().is_some_and(|c| c.id == related.id));
    if by_value {
        return false;
    }
    plan.roles().any(|m| match &m.origin {
        MemberOrigin::AssociationRole(role) => {
            let association = role.association;
            role.target.classifier().is_some_and(|c| c.id == related.id)
                && association.b.object == plan.classifier.id
                && !association.a.role_name.trim().is_empty()
                && !association.b.role_name.trim().is_empty()
        }
        MemberOrigin::Attribute(_) => false,
    })
}

fn forward_declaration(model: &Model, classifier: &Classifier, policy: &CodeGenerationPolicy) -> String {
    let declaration = format!("class {};", clean_name(&classifier.name));
    let segments = model.package_segments(classifier.package.as_deref());
    if policy.cpp.package_is_namespace && !segments.is_empty() {
        let ns: Vec<String> = segments.iter().map(|s| clean_name(s)).collect();
        format!("namespace {} {{ {} }}", ns.join("::"), declaration)
    } else {
        declaration
    }
}

/// Parent name as seen from this classifier's namespace
fn type_reference(cx: &EmitContext<'_, '_>, classifier: &Classifier) -> String {
    let model = cx.gen.query.model();
    let package = model.package_path(classifier, "::");
    let own = model.package_path(cx.plan.classifier, "::");
    if !cx.policy().cpp.package_is_namespace || package.is_empty() || package == own {
        clean_name(&classifier.name)
    } else {
        let mut parts: Vec<String> = model
            .package_segments(classifier.package.as_deref())
            .into_iter()
            .map(clean_name)
            .collect();
        parts.push(clean_name(&classifier.name));
        parts.join("::")
    }
}

pub(super) fn write_includes(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    let model = cx.gen.query.model();
    let policy = cx.policy();

    let mut includes: Vec<String> = Vec::new();
    let mut forwards: Vec<String> = Vec::new();
    for parent in plan.supers() {
        push_unique(&mut includes, include_path(model, parent, policy));
    }
    if uses_string(cx) {
        push_unique(&mut includes, include_operand(&policy.cpp.string_class_include));
    }
    if plan.has_collections() {
        push_unique(&mut includes, include_operand(&policy.cpp.vector_class_include));
    }
    // accessor bodies written in this file
    if (policy.cpp.accessors_are_inline || defines_in_header(plan))
        && has_remove_accessor(plan, policy)
    {
        push_unique(&mut includes, "<algorithm>".to_string());
    }
    for related in &plan.related {
        if plan.supers().any(|p| p.id == related.id) {
            continue;
        }
        if is_back_reference(plan, related) {
            push_unique(&mut forwards, forward_declaration(model, related, policy));
        } else {
            push_unique(&mut includes, include_path(model, related, policy));
        }
    }

    for include in &includes {
        cx.w.line(format!("#include {}", include));
    }
    if !includes.is_empty() {
        cx.w.blank();
    }
    for forward in &forwards {
        cx.w.line(forward);
    }
    if !forwards.is_empty() {
        cx.w.blank();
    }
}

pub(super) fn write_enum(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    cx.doc_block(&plan.classifier.doc, &[]);
    cx.w.line(format!("enum {} {{", plan.name));
    let count = plan.classifier.literals.len();
    cx.w.indented(|w| {
        for (i, literal) in plan.classifier.literals.iter().enumerate() {
            let separator = if i + 1 < count { "," } else { "" };
            let name = clean_name(&literal.name);
            let value = literal.value.trim();
            if value.is_empty() {
                w.line(format!("{}{}", name, separator));
            } else {
                w.line(format!("{} = {}{}", name, value, separator));
            }
        }
    });
    cx.w.line("};");
}

pub(super) fn write_special(cx: &mut EmitContext<'_, '_>, kind: &SpecialKind) {
    let plan = cx.plan;
    match kind {
        SpecialKind::Struct | SpecialKind::Union => {
            let keyword = if *kind == SpecialKind::Struct { "struct" } else { "union" };
            cx.doc_block(&plan.classifier.doc, &[]);
            cx.w.line(format!("{} {}", keyword, plan.name));
            cx.w.line("{");
            cx.w.indent();
            for member in plan.attributes() {
                if cx.unresolved_member(member) {
                    continue;
                }
                cx.doc_block(&member.doc, &[]);
                let static_kw = if member.is_static { "static " } else { "" };
                let ty = field_type(cx, member);
                let name = field_name(cx, member);
                cx.w.line(format!("{}{} {};", static_kw, ty, name));
            }
            cx.w.dedent();
            cx.w.line("};");
        }
        SpecialKind::Typedef => match plan.super_classes.first() {
            Some(base) => {
                cx.doc_block(&plan.classifier.doc, &[]);
                let base = type_reference(cx, base);
                cx.w.line(format!("typedef {} {};", base, plan.name));
            }
            None => {
                let syntax = cx.line_syntax();
                cx.w.line(format!(
                    "{}typedef {} has no base classifier to alias",
                    syntax.line, plan.name
                ));
            }
        },
        SpecialKind::Unsupported(stereotype) => cx.not_implemented(stereotype),
    }
}

pub(super) fn write_type_open(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    let classifier = plan.classifier;
    let doc = if classifier.doc.trim().is_empty() && cx.policy().verbose_document_comments {
        format!(
            "{} {}",
            if plan.is_interface() { "Interface" } else { "Class" },
            plan.name
        )
    } else {
        classifier.doc.clone()
    };
    cx.doc_block(&doc, &[]);

    if plan.is_abstract() && !plan.has_abstract_operations() {
        let syntax = cx.line_syntax();
        cx.w.line(format!(
            "{}abstract class without abstract operations",
            syntax.line
        ));
    }
    if let Some(templates) = template_clause(plan) {
        cx.w.line(templates);
    }

    let parents: Vec<String> = plan
        .supers()
        .map(|parent| {
            let virtual_kw = if parent.is_abstract || parent.is_interface() {
                "virtual "
            } else {
                ""
            };
            format!("{}public {}", virtual_kw, type_reference(cx, parent))
        })
        .collect();
    if parents.is_empty() {
        cx.w.line(format!("class {}", plan.name));
    } else {
        cx.w.line(format!("class {} : {}", plan.name, parents.join(", ")));
    }
    cx.w.line("{");
    cx.w.indent();
}

pub(super) fn write_fields(cx: &mut EmitContext<'_, '_>, tier: Visibility) {
    let plan = cx.plan;
    if plan.is_interface() {
        return;
    }
    let fields = plan.fields(tier);
    if fields.is_empty() {
        return;
    }
    cx.banner(&format!("{} attributes", tier.as_str()));
    for member in fields {
        if cx.unresolved_member(member) {
            continue;
        }
        cx.doc_block(&member.doc, &[]);
        let static_kw = if member.is_static { "static " } else { "" };
        let ty = field_type(cx, member);
        let name = field_name(cx, member);
        cx.w.line(format!("{}{} {};", static_kw, ty, name));
    }
    cx.w.blank();
}

pub(super) fn write_accessor_declarations(cx: &mut EmitContext<'_, '_>, tier: Visibility) {
    let plan = cx.plan;
    let policy = cx.policy();
    let members = accessor_members(plan, policy, tier);
    if members.is_empty() {
        return;
    }
    cx.banner(&format!("{} attribute accessor methods", tier.as_str()));
    for member in members {
        for accessor in accessors(cx, member) {
            cx.doc_block("", &accessor.doc);
            let static_kw = if accessor.is_static { "static " } else { "" };
            let signature = accessor.signature("");
            if policy.cpp.accessors_are_inline {
                cx.w.line(format!("{}{} {{ {} }}", static_kw, signature, accessor.body));
            } else {
                cx.w.line(format!("{}{};", static_kw, signature));
            }
            cx.w.blank();
        }
    }
}

pub(super) fn write_constructor_declarations(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    let policy = cx.policy();

    if plan.is_interface() {
        if policy.cpp.destructors_are_virtual {
            cx.w.line(format!("virtual ~{}() {{}}", plan.name));
            cx.w.blank();
        }
        return;
    }
    if !policy.auto_generate_constructors {
        return;
    }

    let has_constructor = plan
        .operations
        .iter()
        .any(|o| o.kind == OperationKind::Constructor && o.parameters.is_empty());
    let has_destructor = plan
        .operations
        .iter()
        .any(|o| o.kind == OperationKind::Destructor);
    cx.banner("Constructors/Destructors");
    if !has_constructor {
        if policy.verbose_document_comments {
            cx.doc_block("Empty Constructor", &[]);
        }
        cx.w.line(format!("{}();", plan.name));
        cx.w.blank();
    }
    if !has_destructor {
        if policy.verbose_document_comments {
            cx.doc_block("Empty Destructor", &[]);
        }
        let virtual_kw = if policy.cpp.destructors_are_virtual { "virtual " } else { "" };
        cx.w.line(format!("{}~{}();", virtual_kw, plan.name));
        cx.w.blank();
    }
}

fn operation_tags(cx: &EmitContext<'_, '_>, operation: &Operation) -> Vec<String> {
    if operation.doc.trim().is_empty() && !cx.policy().verbose_document_comments {
        return Vec::new();
    }
    let tag = &cx.policy().cpp.doc_tool_tag;
    let mut tags: Vec<String> = operation
        .parameters
        .iter()
        .map(|p| format!("{}param {} {}", tag, p.name, p.doc).trim_end().to_string())
        .collect();
    if let Some(ty) = return_type(cx, operation) {
        if ty != "void" {
            tags.push(format!("{}return {}", tag, ty));
        }
    }
    tags
}

fn write_operation_declaration(cx: &mut EmitContext<'_, '_>, operation: &Operation) {
    let plan = cx.plan;
    let policy = cx.policy();
    let pure = is_pure(plan, operation);

    cx.mark_unresolved_signature(operation);
    let tags = operation_tags(cx, operation);
    cx.doc_block(&operation.doc, &tags);

    let mut signature = String::new();
    if operation.is_static {
        signature.push_str("static ");
    } else if pure
        || (operation.kind == OperationKind::Destructor && policy.cpp.destructors_are_virtual)
    {
        signature.push_str("virtual ");
    }
    if let Some(ty) = return_type(cx, operation) {
        signature.push_str(&ty);
        signature.push(' ');
    }
    signature.push_str(&format!(
        "{}({})",
        operation_name(cx, operation),
        parameter_list(cx, &operation.parameters, true)
    ));
    if operation.is_const && !operation.is_static {
        signature.push_str(" const");
    }

    if pure {
        cx.w.line(format!("{} = 0;", signature));
    } else if policy.cpp.operations_are_inline {
        let body = operation_body(cx, operation);
        cx.w.line(signature);
        cx.w.line("{");
        cx.w.indented(|w| w.source_code(&body));
        cx.w.line("}");
    } else {
        cx.w.line(format!("{};", signature));
    }
    cx.w.blank();
}

pub(super) fn write_operation_declarations(cx: &mut EmitContext<'_, '_>, tier: Visibility) {
    let plan = cx.plan;
    let operations = operations_for(plan, tier);
    if operations.is_empty() {
        return;
    }
    cx.banner(&format!("{} operations", tier.as_str()));
    for operation in &operations {
        write_operation_declaration(cx, operation);
    }
}

pub(super) fn write_init_declaration(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    if plan.is_interface() || !cx.policy().auto_generate_constructors || plan.init.is_empty() {
        return;
    }
    cx.w.line("void initAttributes();");
    cx.w.blank();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_operand() {
        assert_eq!(include_operand("<string>"), "<string>");
        assert_eq!(include_operand("\"qstring.h\""), "\"qstring.h\"");
        assert_eq!(include_operand("vector"), "<vector>");
    }
}
