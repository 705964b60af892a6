//! Per-classifier generation plan
//!
//! Language-agnostic view of one classifier, computed once before any text
//! is emitted: its shape, its parents, and every member with its origin
//! (modelled attribute or association role) already decided. Emitters only
//! read the plan.

use umbrello_model::{Attribute, Changeability, Classifier, Operation, Visibility};

use crate::naming::{clean_name, member_identifier};
use crate::policy::CodeGenerationPolicy;
use crate::query::{Cardinality, ClassifierFilter, ModelQuery, ResolvedType, RoleInfo};

/// Stereotypes that are rendered as something other than a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialKind {
    Struct,
    Union,
    Typedef,
    /// Recognised but not generated, e.g. CORBA stereotypes
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Class,
    Interface,
    Enum,
    Special(SpecialKind),
}

impl TypeShape {
    pub fn of(classifier: &Classifier) -> Self {
        use umbrello_model::BaseKind;

        if classifier.kind == BaseKind::Enum {
            return TypeShape::Enum;
        }
        let stereotype = classifier.stereotype.trim();
        match stereotype.to_ascii_lowercase().as_str() {
            "struct" => return TypeShape::Special(SpecialKind::Struct),
            "union" => return TypeShape::Special(SpecialKind::Union),
            "typedef" => return TypeShape::Special(SpecialKind::Typedef),
            s if s.starts_with("corba") => {
                return TypeShape::Special(SpecialKind::Unsupported(stereotype.to_string()))
            }
            _ => {}
        }
        if classifier.kind == BaseKind::Interface {
            TypeShape::Interface
        } else {
            TypeShape::Class
        }
    }
}

/// Where a member comes from
#[derive(Debug, Clone)]
pub enum MemberOrigin<'m> {
    Attribute(&'m Attribute),
    AssociationRole(RoleInfo<'m>),
}

/// A data member of the generated type
#[derive(Debug, Clone)]
pub struct Member<'m> {
    /// Sanitized identifier
    pub name: String,
    /// Mapped type; for collections the element type
    pub type_name: String,
    pub resolved: ResolvedType<'m>,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Initial value in target spelling, empty when none
    pub initial_value: String,
    pub doc: String,
    pub cardinality: Cardinality,
    pub changeability: Changeability,
    pub origin: MemberOrigin<'m>,
}

impl Member<'_> {
    pub fn is_role(&self) -> bool {
        matches!(self.origin, MemberOrigin::AssociationRole(_))
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    /// Name as written in the model, before sanitizing
    pub fn model_name(&self) -> &str {
        match &self.origin {
            MemberOrigin::Attribute(a) => &a.name,
            MemberOrigin::AssociationRole(r) => &r.role_name,
        }
    }

    /// Setter or add method allowed
    pub fn is_writable(&self) -> bool {
        self.changeability != Changeability::Frozen
    }
}

/// Work done by the generated attribute initializer of one classifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitPlan {
    /// `(member, value)` for instance attributes with an initial value
    pub assignments: Vec<(String, String)>,
    /// `(member, class)` for scalar association fields
    pub objects: Vec<(String, String)>,
    /// `(member, element type)` for collection association fields
    pub collections: Vec<(String, String)>,
}

impl InitPlan {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.objects.is_empty() && self.collections.is_empty()
    }
}

pub struct ClassifierPlan<'m> {
    pub classifier: &'m Classifier,
    /// Sanitized type name
    pub name: String,
    pub shape: TypeShape,
    /// Enclosing package names, outermost first
    pub package: Vec<String>,
    pub super_classes: Vec<&'m Classifier>,
    pub super_interfaces: Vec<&'m Classifier>,
    pub members: Vec<Member<'m>>,
    pub operations: Vec<&'m Operation>,
    /// Interface operations the classifier has to provide
    pub inherited_operations: Vec<&'m Operation>,
    pub related: Vec<&'m Classifier>,
    pub imports: Vec<&'m Classifier>,
    pub init: InitPlan,
}

impl<'m> ClassifierPlan<'m> {
    pub fn build(
        query: &ModelQuery<'m>,
        classifier: &'m Classifier,
        policy: &CodeGenerationPolicy,
    ) -> Self {
        let model = query.model();
        let mapper = query.mapper();
        let language = mapper.language();
        let shape = TypeShape::of(classifier);

        let mut members = Vec::new();
        for attribute in &classifier.attributes {
            let resolved = query.resolve_attribute_type(attribute);
            let raw_type = match (&resolved, attribute.type_name.trim()) {
                (ResolvedType::Classifier(c), "") => c.name.clone(),
                (_, name) => name.to_string(),
            };
            let type_name = mapper.fix_type_name(&raw_type);
            members.push(Member {
                name: member_identifier(language, policy.modify_name_policy, &attribute.name),
                initial_value: mapper.fix_initial_value(&attribute.initial_value, &type_name),
                type_name,
                resolved,
                visibility: attribute.visibility,
                is_static: attribute.is_static,
                doc: attribute.doc.clone(),
                cardinality: Cardinality::Single,
                changeability: Changeability::Changeable,
                origin: MemberOrigin::Attribute(attribute),
            });
        }
        // interfaces carry no state
        if shape != TypeShape::Interface {
            for role in query.association_roles(classifier) {
                members.push(Member {
                    name: member_identifier(language, policy.modify_name_policy, &role.role_name),
                    type_name: clean_name(&role.type_name),
                    resolved: role.target.clone(),
                    visibility: role.visibility,
                    is_static: false,
                    initial_value: String::new(),
                    doc: role.doc.clone(),
                    cardinality: role.cardinality,
                    changeability: role.changeability,
                    origin: MemberOrigin::AssociationRole(role),
                });
            }
        }

        let init = plan_initialization(&members);

        Self {
            classifier,
            name: clean_name(&classifier.name),
            shape,
            package: model
                .package_segments(classifier.package.as_deref())
                .into_iter()
                .map(str::to_string)
                .collect(),
            super_classes: query.super_classifiers(classifier, ClassifierFilter::Class),
            super_interfaces: query.super_classifiers(classifier, ClassifierFilter::Interface),
            members,
            operations: classifier.operations.iter().collect(),
            inherited_operations: query.interface_operations_to_implement(classifier),
            related: query.related_classifiers(classifier),
            imports: query.related_packages_needing_import(classifier),
            init,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.shape == TypeShape::Interface
    }

    pub fn is_abstract(&self) -> bool {
        self.classifier.is_abstract
    }

    /// All direct parents, classes first
    pub fn supers(&self) -> impl Iterator<Item = &&'m Classifier> {
        self.super_classes.iter().chain(self.super_interfaces.iter())
    }

    pub fn static_attributes(&self, tier: Visibility) -> impl Iterator<Item = &Member<'m>> {
        self.members
            .iter()
            .filter(move |m| !m.is_role() && m.is_static && m.visibility == tier)
    }

    pub fn instance_attributes(&self, tier: Visibility) -> impl Iterator<Item = &Member<'m>> {
        self.members
            .iter()
            .filter(move |m| !m.is_role() && !m.is_static && m.visibility == tier)
    }

    pub fn role_fields(&self, tier: Visibility) -> impl Iterator<Item = &Member<'m>> {
        self.members
            .iter()
            .filter(move |m| m.is_role() && m.visibility == tier)
    }

    /// Statics, instance attributes, then role fields of one tier
    pub fn fields(&self, tier: Visibility) -> Vec<&Member<'m>> {
        self.static_attributes(tier)
            .chain(self.instance_attributes(tier))
            .chain(self.role_fields(tier))
            .collect()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Member<'m>> {
        self.members.iter().filter(|m| !m.is_role())
    }

    pub fn roles(&self) -> impl Iterator<Item = &Member<'m>> {
        self.members.iter().filter(|m| m.is_role())
    }

    pub fn has_collections(&self) -> bool {
        self.members.iter().any(|m| m.is_collection())
    }

    pub fn operations_of(&self, tier: Visibility) -> impl Iterator<Item = &&'m Operation> {
        self.operations.iter().filter(move |o| o.visibility == tier)
    }

    pub fn has_abstract_operations(&self) -> bool {
        self.operations.iter().any(|o| o.is_abstract)
    }

    /// Interface operations a concrete class provides, as public
    /// non-abstract copies
    pub fn implemented_operations(&self) -> Vec<Operation> {
        if self.is_abstract() || self.is_interface() {
            return Vec::new();
        }
        self.inherited_operations
            .iter()
            .map(|o| Operation {
                is_abstract: false,
                visibility: Visibility::Public,
                ..(*o).clone()
            })
            .collect()
    }
}

fn plan_initialization(members: &[Member<'_>]) -> InitPlan {
    let mut plan = InitPlan::default();
    for member in members {
        match &member.origin {
            // statics are initialised where they are defined
            MemberOrigin::Attribute(_) => {
                if !member.is_static && !member.initial_value.is_empty() {
                    plan.assignments
                        .push((member.name.clone(), member.initial_value.clone()));
                }
            }
            MemberOrigin::AssociationRole(_) => match (&member.resolved, member.cardinality) {
                (_, Cardinality::Many) => plan
                    .collections
                    .push((member.name.clone(), member.type_name.clone())),
                (ResolvedType::Classifier(c), Cardinality::Single)
                    if !c.is_abstract && !c.is_interface() =>
                {
                    plan.objects
                        .push((member.name.clone(), member.type_name.clone()))
                }
                _ => {}
            },
        }
    }
    plan
}
