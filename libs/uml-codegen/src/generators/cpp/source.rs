//! Definitions: the `.cpp` unit, and the tail of class template headers

use umbrello_model::{OperationKind, Visibility};

use super::{
    accessor_members, accessors, close_namespace, field_name, field_type, has_remove_accessor,
    header, include_path, is_pure, open_namespace, operation_body, operation_name, operations_for,
    parameter_list, qualifier, return_type, template_clause, CppEmitter,
};
use crate::generators::{EmitContext, Emitter};
use crate::ir::TypeShape;

/// Whether out-of-line remove accessors need `std::remove`
fn needs_algorithm(cx: &EmitContext<'_, '_>) -> bool {
    let policy = cx.policy();
    !policy.cpp.accessors_are_inline && has_remove_accessor(cx.plan, policy)
}

/// Open a definition: optional template line, then the signature and `{`
fn open_definition(cx: &mut EmitContext<'_, '_>, signature: &str) {
    if let Some(templates) = template_clause(cx.plan) {
        cx.w.line(templates);
    }
    cx.w.line(signature);
    cx.w.line("{");
}

fn close_definition(cx: &mut EmitContext<'_, '_>) {
    cx.w.line("}");
    cx.w.blank();
}

fn write_static_definitions(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    let scope = qualifier(plan);
    let mut written = false;
    for tier in Visibility::TIERS {
        for member in plan.static_attributes(tier) {
            if member.resolved.is_unknown() {
                continue;
            }
            let ty = field_type(cx, member);
            let name = field_name(cx, member);
            if let Some(templates) = template_clause(plan) {
                cx.w.line(templates);
            }
            if member.initial_value.is_empty() {
                cx.w.line(format!("{} {}{};", ty, scope, name));
            } else {
                cx.w.line(format!("{} {}{} = {};", ty, scope, name, member.initial_value));
            }
            written = true;
        }
    }
    if written {
        cx.w.blank();
    }
}

fn write_constructor_definitions(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    let policy = cx.policy();
    if !policy.auto_generate_constructors {
        return;
    }
    let scope = qualifier(plan);
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
        open_definition(cx, &format!("{}{}()", scope, plan.name));
        if !plan.init.is_empty() {
            cx.w.indented(|w| w.line("initAttributes();"));
        }
        close_definition(cx);
    }
    if !has_destructor {
        open_definition(cx, &format!("{}~{}()", scope, plan.name));
        close_definition(cx);
    }
}

fn write_operation_definitions(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    if cx.policy().cpp.operations_are_inline {
        return;
    }
    let scope = qualifier(plan);
    for tier in Visibility::TIERS {
        let operations = operations_for(plan, tier);
        for operation in operations.iter().filter(|o| !is_pure(plan, o)) {
            let mut signature = String::new();
            if let Some(ty) = return_type(cx, operation) {
                signature.push_str(&ty);
                signature.push(' ');
            }
            signature.push_str(&format!(
                "{}{}({})",
                scope,
                operation_name(cx, operation),
                parameter_list(cx, &operation.parameters, false)
            ));
            if operation.is_const && !operation.is_static {
                signature.push_str(" const");
            }
            let body = operation_body(cx, operation);
            open_definition(cx, &signature);
            cx.w.indented(|w| w.source_code(&body));
            close_definition(cx);
        }
    }
}

fn write_accessor_definitions(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    let policy = cx.policy();
    if policy.cpp.accessors_are_inline {
        return;
    }
    let scope = qualifier(plan);
    for tier in Visibility::TIERS {
        for member in accessor_members(plan, policy, tier) {
            for accessor in accessors(cx, member) {
                open_definition(cx, &accessor.signature(&scope));
                cx.w.indented(|w| w.line(&accessor.body));
                close_definition(cx);
            }
        }
    }
}

fn write_init_definition(cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    if !cx.policy().auto_generate_constructors || plan.init.is_empty() {
        return;
    }
    let prefix = cx.policy().cpp.class_member_prefix.clone();
    let vector = cx.policy().cpp.vector_class_name.clone();
    open_definition(cx, &format!("void {}initAttributes()", qualifier(plan)));
    cx.w.indented(|w| {
        for (name, value) in &plan.init.assignments {
            w.line(format!("{}{} = {};", prefix, name, value));
        }
        for (name, class) in &plan.init.objects {
            w.line(format!("{}{} = new {}();", prefix, name, class));
        }
        for (name, element) in &plan.init.collections {
            w.line(format!("{}{} = {}<{}*>();", prefix, name, vector, element));
        }
    });
    close_definition(cx);
}

/// Every out-of-line definition of a class
pub(super) fn write_definitions(cx: &mut EmitContext<'_, '_>) {
    write_static_definitions(cx);
    write_constructor_definitions(cx);
    write_operation_definitions(cx);
    write_accessor_definitions(cx);
    write_init_definition(cx);
}

/// Implementation file: own header (or the full declaration when the
/// classifier has none), then every out-of-line definition
pub(super) fn write_source(emitter: &CppEmitter, cx: &mut EmitContext<'_, '_>) {
    let plan = cx.plan;
    emitter.emit_heading(cx);

    let own_header = super::has_header(plan);
    if own_header {
        let model = cx.gen.query.model();
        let include = include_path(model, plan.classifier, cx.policy());
        cx.w.line(format!("#include {}", include));
        if needs_algorithm(cx) {
            cx.w.line("#include <algorithm>");
        }
        cx.w.blank();
    } else {
        header::write_includes(cx);
        if needs_algorithm(cx) {
            cx.w.line("#include <algorithm>");
            cx.w.blank();
        }
    }
    open_namespace(cx);

    if !own_header {
        match &plan.shape {
            TypeShape::Enum => emitter.emit_enum(cx),
            TypeShape::Special(kind) => emitter.emit_special(cx, kind),
            TypeShape::Class | TypeShape::Interface => {
                emitter.emit_type_open(cx);
                emitter.emit_body(cx);
                emitter.emit_type_close(cx);
            }
        }
        cx.w.blank();
    }

    if plan.shape == TypeShape::Class {
        write_definitions(cx);
    }

    close_namespace(cx);
}
