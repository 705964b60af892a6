//! Java emitter

use umbrello_model::{Attribute, Operation, OperationKind, Visibility};

use super::{accessor_stem, EmitContext, Emitter, OutputUnit, UnitKind};
use crate::ir::{ClassifierPlan, Member, SpecialKind};
use crate::language::Language;
use crate::naming::member_identifier;

pub struct JavaEmitter;

fn modifier(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public ",
        Visibility::Protected => "protected ",
        Visibility::Private => "private ",
        Visibility::Implementation => "",
    }
}

fn tier_title(tier: Visibility) -> &'static str {
    match tier {
        Visibility::Public => "Public",
        Visibility::Protected => "Protected",
        Visibility::Private => "Private",
        Visibility::Implementation => "Package",
    }
}

/// Declared type of a member
fn member_type(cx: &EmitContext<'_, '_>, member: &Member<'_>) -> String {
    if member.is_collection() {
        format!(
            "{}<{}>",
            cx.policy().java.collection_interface,
            member.type_name
        )
    } else {
        member.type_name.clone()
    }
}

fn new_collection(cx: &EmitContext<'_, '_>) -> String {
    format!("new {}<>()", cx.policy().java.collection_class)
}

fn default_return(fixed_type: &str) -> Option<&'static str> {
    match fixed_type {
        "void" => None,
        "boolean" => Some("return false;"),
        "int" | "long" | "short" | "byte" | "float" | "double" | "char" => Some("return 0;"),
        _ => Some("return null;"),
    }
}

fn parameter_list(cx: &EmitContext<'_, '_>, parameters: &[Attribute]) -> String {
    let policy = cx.policy();
    parameters
        .iter()
        .map(|p| {
            format!(
                "{} {}",
                cx.mapper().fix_type_name(&p.type_name),
                member_identifier(Language::Java, policy.modify_name_policy, &p.name)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn operation_tags(cx: &EmitContext<'_, '_>, operation: &Operation, return_type: &str) -> Vec<String> {
    if operation.doc.trim().is_empty() && !cx.policy().verbose_document_comments {
        return Vec::new();
    }
    let mut tags: Vec<String> = operation
        .parameters
        .iter()
        .map(|p| format!("@param {} {}", p.name, p.doc).trim_end().to_string())
        .collect();
    if return_type != "void" && operation.kind == OperationKind::Regular {
        tags.push(format!("@return {}", return_type));
    }
    tags
}

impl JavaEmitter {
    fn write_field(&self, cx: &mut EmitContext<'_, '_>, member: &Member<'_>) {
        if cx.unresolved_member(member) {
            return;
        }
        let inline_init = member.is_static || !cx.policy().auto_generate_constructors;
        let ty = member_type(cx, member);
        let mut decl = format!(
            "{}{}{} {}",
            modifier(member.visibility),
            if member.is_static { "static " } else { "" },
            ty,
            member.name
        );
        if inline_init {
            if member.is_collection() {
                decl.push_str(&format!(" = {}", new_collection(cx)));
            } else if !member.initial_value.is_empty() {
                decl.push_str(&format!(" = {}", member.initial_value));
            }
        }
        decl.push(';');

        cx.doc_block(&member.doc, &[]);
        cx.w.line(decl);
    }

    fn write_attribute_accessors(&self, cx: &mut EmitContext<'_, '_>, member: &Member<'_>) {
        let stem = accessor_stem(member);
        let vis = modifier(member.visibility);
        let ty = member.type_name.clone();
        let static_kw = if member.is_static { "static " } else { "" };

        // statics are treated as constants: getter only
        if !member.is_static {
            cx.doc_block(
                "",
                &[
                    format!("Set the value of {}", member.name),
                    format!("@param newVar the new value of {}", member.name),
                ],
            );
            cx.w.line(format!("{}void set{}({} newVar) {{", vis, stem, ty));
            cx.w.indented(|w| w.line(format!("{} = newVar;", member.name)));
            cx.w.line("}");
            cx.w.blank();
        }

        cx.doc_block(
            "",
            &[
                format!("Get the value of {}", member.name),
                format!("@return the value of {}", member.name),
            ],
        );
        cx.w.line(format!("{}{}{} get{}() {{", vis, static_kw, ty, stem));
        cx.w.indented(|w| w.line(format!("return {};", member.name)));
        cx.w.line("}");
        cx.w.blank();
    }

    fn write_role_accessors(&self, cx: &mut EmitContext<'_, '_>, member: &Member<'_>) {
        if matches!(member.resolved, crate::query::ResolvedType::Unknown(_)) {
            return;
        }
        let stem = accessor_stem(member);
        let vis = modifier(member.visibility);
        let ty = member.type_name.clone();
        let changeable = member.changeability == umbrello_model::Changeability::Changeable;

        if member.is_collection() {
            if member.is_writable() {
                cx.doc_block("", &[format!("Add a {} object to the {} list", ty, member.name)]);
                cx.w.line(format!("{}void add{}({} newObject) {{", vis, stem, ty));
                cx.w.indented(|w| w.line(format!("{}.add(newObject);", member.name)));
                cx.w.line("}");
                cx.w.blank();
            }
            if changeable {
                cx.doc_block("", &[format!("Remove a {} object from the {} list", ty, member.name)]);
                cx.w.line(format!("{}void remove{}({} oldObject) {{", vis, stem, ty));
                cx.w.indented(|w| w.line(format!("{}.remove(oldObject);", member.name)));
                cx.w.line("}");
                cx.w.blank();
            }
            let list_type = member_type(cx, member);
            cx.doc_block("", &[format!("Get the list of {} objects held by {}", ty, member.name)]);
            cx.w.line(format!("{}{} get{}List() {{", vis, list_type, stem));
            cx.w.indented(|w| w.line(format!("return {};", member.name)));
            cx.w.line("}");
            cx.w.blank();
        } else {
            if changeable {
                cx.doc_block("", &[format!("Set the value of {}", member.name)]);
                cx.w.line(format!("{}void set{}({} newVar) {{", vis, stem, ty));
                cx.w.indented(|w| w.line(format!("{} = newVar;", member.name)));
                cx.w.line("}");
                cx.w.blank();
            }
            cx.doc_block("", &[format!("Get the value of {}", member.name)]);
            cx.w.line(format!("{}{} get{}() {{", vis, ty, stem));
            cx.w.indented(|w| w.line(format!("return {};", member.name)));
            cx.w.line("}");
            cx.w.blank();
        }
    }

    fn write_operation(&self, cx: &mut EmitContext<'_, '_>, operation: &Operation) {
        let plan = cx.plan;
        let policy = cx.policy();
        let interface = plan.is_interface();

        if operation.kind == OperationKind::Destructor {
            let syntax = cx.line_syntax();
            cx.w.line(format!(
                "{}destructor {} has no Java counterpart",
                syntax.line, operation.name
            ));
            cx.w.blank();
            return;
        }

        cx.mark_unresolved_signature(operation);
        let params = parameter_list(cx, &operation.parameters);
        let return_type = cx.mapper().fix_type_name(&operation.return_type);
        let tags = operation_tags(cx, operation, &return_type);
        cx.doc_block(&operation.doc, &tags);

        if operation.kind == OperationKind::Constructor {
            cx.w.line(format!(
                "{}{}({}) {{",
                modifier(operation.visibility),
                plan.name,
                params
            ));
            cx.w.indented(|w| {
                if !operation.source_code.trim().is_empty() {
                    w.source_code(&operation.source_code);
                } else if policy.auto_generate_constructors && !plan.init.is_empty() {
                    w.line("initAttributes();");
                }
            });
            cx.w.line("}");
            cx.w.blank();
            return;
        }

        let name = member_identifier(Language::Java, policy.modify_name_policy, &operation.name);
        let declaration_only = (interface && !operation.is_static) || operation.is_abstract;
        let mut signature = String::new();
        if !interface {
            signature.push_str(modifier(operation.visibility));
        }
        if operation.is_static {
            signature.push_str("static ");
        }
        if operation.is_abstract && !interface {
            signature.push_str("abstract ");
        }
        signature.push_str(&format!("{} {}({})", return_type, name, params));

        if declaration_only {
            cx.w.line(format!("{};", signature));
        } else {
            cx.w.line(format!("{} {{", signature));
            cx.w.indented(|w| {
                if !operation.source_code.trim().is_empty() {
                    w.source_code(&operation.source_code);
                } else if let Some(ret) = default_return(&return_type) {
                    w.line(ret);
                }
            });
            cx.w.line("}");
        }
        cx.w.blank();
    }
}

impl Emitter for JavaEmitter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn units(&self, _plan: &ClassifierPlan<'_>) -> Vec<OutputUnit> {
        vec![OutputUnit {
            kind: UnitKind::Module,
            extension: ".java",
        }]
    }

    fn emit_header(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        let model = cx.gen.query.model();

        if !plan.package.is_empty() {
            cx.w.line(format!("package {};", plan.package.join(Language::Java.package_separator())));
            cx.w.blank();
        }

        let mut imports: Vec<String> = Vec::new();
        if plan.has_collections() {
            let java = &cx.policy().java;
            for name in [&java.collection_interface, &java.collection_class] {
                let import = if name.contains('.') {
                    name.clone()
                } else {
                    format!("java.util.{}", name)
                };
                if !imports.contains(&import) {
                    imports.push(import);
                }
            }
        }
        for related in &plan.imports {
            let import = model.fully_qualified_name(related, ".");
            if !imports.contains(&import) {
                imports.push(import);
            }
        }
        for import in &imports {
            cx.w.line(format!("import {};", import));
        }
        if !imports.is_empty() {
            cx.w.blank();
        }
    }

    fn emit_enum(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        cx.doc_block(&plan.classifier.doc, &[]);
        let public = if plan.classifier.visibility == Visibility::Public {
            "public "
        } else {
            ""
        };
        cx.w.line(format!("{}enum {} {{", public, plan.name));
        let count = plan.classifier.literals.len();
        cx.w.indented(|w| {
            for (i, literal) in plan.classifier.literals.iter().enumerate() {
                let separator = if i + 1 < count { "," } else { "" };
                let name = crate::naming::clean_name(&literal.name);
                if literal.value.trim().is_empty() {
                    w.line(format!("{}{}", name, separator));
                } else {
                    w.line(format!("{}{} // = {}", name, separator, literal.value.trim()));
                }
            }
        });
        cx.w.line("}");
    }

    fn emit_special(&self, cx: &mut EmitContext<'_, '_>, kind: &SpecialKind) {
        let plan = cx.plan;
        match kind {
            SpecialKind::Struct => {
                let components: Vec<String> = plan
                    .attributes()
                    .filter(|m| !m.is_static)
                    .map(|m| format!("{} {}", m.type_name, m.name))
                    .collect();
                cx.doc_block(&plan.classifier.doc, &[]);
                cx.w.line(format!(
                    "public record {}({}) {{",
                    plan.name,
                    components.join(", ")
                ));
                cx.w.line("}");
            }
            SpecialKind::Union => cx.not_implemented("union"),
            SpecialKind::Typedef => cx.not_implemented("typedef"),
            SpecialKind::Unsupported(stereotype) => cx.not_implemented(stereotype),
        }
    }

    fn emit_type_open(&self, cx: &mut EmitContext<'_, '_>) {
        let plan = cx.plan;
        let classifier = plan.classifier;
        let interface = plan.is_interface();

        if !interface && plan.super_classes.len() > 1 {
            let ignored: Vec<&str> = plan.super_classes[1..]
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            let syntax = cx.line_syntax();
            cx.w.line(format!(
                "{}Java has no multiple class inheritance; not extended: {}",
                syntax.line,
                ignored.join(", ")
            ));
        }

        let doc = if classifier.doc.trim().is_empty() && cx.policy().verbose_document_comments {
            format!("{} {}", if interface { "Interface" } else { "Class" }, plan.name)
        } else {
            classifier.doc.clone()
        };
        cx.doc_block(&doc, &[]);

        let mut decl = String::new();
        if classifier.visibility == Visibility::Public {
            decl.push_str("public ");
        }
        if classifier.is_abstract && !interface {
            decl.push_str("abstract ");
        }
        decl.push_str(if interface { "interface " } else { "class " });
        decl.push_str(&plan.name);

        if !classifier.templates.is_empty() {
            let params: Vec<String> = classifier
                .templates
                .iter()
                .map(|t| {
                    if t.is_unconstrained() {
                        t.name.clone()
                    } else {
                        format!("{} extends {}", t.name, t.type_name)
                    }
                })
                .collect();
            decl.push_str(&format!("<{}>", params.join(", ")));
        }

        let interfaces: Vec<&str> = plan.super_interfaces.iter().map(|c| c.name.as_str()).collect();
        if interface {
            if !interfaces.is_empty() {
                decl.push_str(&format!(" extends {}", interfaces.join(", ")));
            }
        } else {
            if let Some(base) = plan.super_classes.first() {
                decl.push_str(&format!(" extends {}", base.name));
            }
            if !interfaces.is_empty() {
                decl.push_str(&format!(" implements {}", interfaces.join(", ")));
            }
        }
        decl.push_str(" {");
        cx.w.line(decl);
        cx.w.blank();
        cx.w.indent();
    }

    fn emit_members(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        if plan.is_interface() {
            return;
        }
        let fields = plan.fields(tier);
        if fields.is_empty() {
            return;
        }
        cx.banner(&format!("{} fields", tier_title(tier)));
        for member in fields {
            self.write_field(cx, member);
        }
        cx.w.blank();
    }

    fn emit_accessors(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let policy = cx.policy();
        if plan.is_interface() {
            return;
        }

        // accessors share the visibility of their attribute
        let attributes: Vec<&Member<'_>> = if policy.auto_generate_attrib_accessors {
            plan.static_attributes(tier)
                .chain(plan.instance_attributes(tier))
                .filter(|m| !matches!(m.resolved, crate::query::ResolvedType::Unknown(_)))
                .collect()
        } else {
            Vec::new()
        };
        let roles: Vec<&Member<'_>> = if policy.auto_generate_assoc_accessors {
            plan.role_fields(tier).collect()
        } else {
            Vec::new()
        };
        if attributes.is_empty() && roles.is_empty() {
            return;
        }

        cx.banner(&format!("{} accessor methods", tier_title(tier)));
        for member in attributes {
            self.write_attribute_accessors(cx, member);
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

        let has_default = plan
            .operations
            .iter()
            .any(|o| o.kind == OperationKind::Constructor && o.parameters.is_empty());
        cx.banner("Constructors");
        if !has_default {
            if cx.policy().verbose_document_comments {
                cx.doc_block("Empty Constructor", &[]);
            }
            cx.w.line(format!("public {}() {{", plan.name));
            if !plan.init.is_empty() {
                cx.w.indented(|w| w.line("initAttributes();"));
            }
            cx.w.line("}");
            cx.w.blank();
        }

        if plan.init.is_empty() {
            return;
        }
        let collection = new_collection(cx);
        cx.w.line("private void initAttributes() {");
        cx.w.indented(|w| {
            for (name, value) in &plan.init.assignments {
                w.line(format!("{} = {};", name, value));
            }
            for (name, class) in &plan.init.objects {
                w.line(format!("{} = new {}();", name, class));
            }
            for (name, _) in &plan.init.collections {
                w.line(format!("{} = {};", name, collection));
            }
        });
        cx.w.line("}");
        cx.w.blank();
    }

    fn emit_operations(&self, cx: &mut EmitContext<'_, '_>, tier: Visibility) {
        let plan = cx.plan;
        let operations: Vec<&Operation> = plan.operations_of(tier).copied().collect();
        // interface operations a concrete class has to provide
        let implemented: Vec<Operation> = if tier == Visibility::Public {
            plan.implemented_operations()
        } else {
            Vec::new()
        };
        if operations.is_empty() && implemented.is_empty() {
            return;
        }
        cx.banner(&format!("{} methods", tier_title(tier)));
        for operation in operations.into_iter().chain(implemented.iter()) {
            self.write_operation(cx, operation);
        }
    }

    fn emit_type_close(&self, cx: &mut EmitContext<'_, '_>) {
        cx.w.dedent();
        cx.w.line("}");
    }

    fn emit_footer(&self, _cx: &mut EmitContext<'_, '_>) {}
}
