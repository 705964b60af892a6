//! Read-only queries over the model used by the generators
//!
//! Type references are resolved here once; anything that does not resolve
//! becomes [`ResolvedType::Unknown`] so emitters can render a marked stub
//! instead of failing the classifier.

use std::collections::HashSet;

use umbrello_model::{
    Association, AssociationKind, Attribute, BaseKind, Changeability, Classifier, Model,
    Operation, RoleSide, Visibility,
};

use crate::types::TypeMapper;

/// Which superclassifiers or subclassifiers to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierFilter {
    Class,
    Interface,
    All,
}

impl ClassifierFilter {
    fn accepts(&self, classifier: &Classifier) -> bool {
        match self {
            ClassifierFilter::Class => !classifier.is_interface(),
            ClassifierFilter::Interface => classifier.is_interface(),
            ClassifierFilter::All => true,
        }
    }
}

/// Result of resolving a type reference
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType<'m> {
    /// No type at all (`void` return)
    Void,
    /// Built-in datatype of the language or a model datatype
    Primitive(String),
    /// A classifier of the model
    Classifier(&'m Classifier),
    /// A name that is neither built in nor modelled; passed through verbatim
    Named(String),
    /// A model reference that points nowhere
    Unknown(String),
}

impl ResolvedType<'_> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedType::Unknown(_))
    }

    pub fn classifier(&self) -> Option<&Classifier> {
        match self {
            ResolvedType::Classifier(c) => Some(c),
            _ => None,
        }
    }
}

/// Scalar or collection, derived from the multiplicity text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Many,
}

impl Cardinality {
    /// Empty or `1` is a scalar; anything else is a collection
    pub fn from_multiplicity(multiplicity: &str) -> Self {
        match multiplicity.trim() {
            "" | "1" => Cardinality::Single,
            _ => Cardinality::Many,
        }
    }
}

/// One association role as seen from the classifier that holds it
#[derive(Debug, Clone)]
pub struct RoleInfo<'m> {
    pub association: &'m Association,
    pub kind: AssociationKind,
    pub target: ResolvedType<'m>,
    /// Name of the classifier at this end
    pub type_name: String,
    pub role_name: String,
    pub multiplicity: String,
    pub doc: String,
    pub changeability: Changeability,
    pub visibility: Visibility,
    pub cardinality: Cardinality,
}

/// Kinds contributing fields, in emission order
const FIELD_KINDS: [AssociationKind; 4] = [
    AssociationKind::Association,
    AssociationKind::UniAssociation,
    AssociationKind::Aggregation,
    AssociationKind::Composition,
];

pub struct ModelQuery<'m> {
    model: &'m Model,
    mapper: TypeMapper,
}

impl<'m> ModelQuery<'m> {
    pub fn new(model: &'m Model, mapper: TypeMapper) -> Self {
        Self { model, mapper }
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    pub fn mapper(&self) -> &TypeMapper {
        &self.mapper
    }

    /// Attributes of one visibility, statics or instance attributes only
    pub fn attributes_filtered<'c>(
        &self,
        classifier: &'c Classifier,
        visibility: Visibility,
        static_only: bool,
    ) -> Vec<&'c Attribute> {
        classifier
            .attributes
            .iter()
            .filter(|a| a.visibility == visibility && a.is_static == static_only)
            .collect()
    }

    pub fn operations_filtered<'c>(
        &self,
        classifier: &'c Classifier,
        visibility: Visibility,
    ) -> Vec<&'c Operation> {
        classifier
            .operations
            .iter()
            .filter(|o| o.visibility == visibility)
            .collect()
    }

    /// Direct parents through generalization and realization
    pub fn super_classifiers(
        &self,
        classifier: &Classifier,
        filter: ClassifierFilter,
    ) -> Vec<&'m Classifier> {
        let mut result: Vec<&'m Classifier> = Vec::new();
        for association in self.model.associations_of(&classifier.id) {
            if !matches!(
                association.kind,
                AssociationKind::Generalization | AssociationKind::Realization
            ) || association.a.object != classifier.id
                || association.b.object == classifier.id
            {
                continue;
            }
            if let Some(parent) = self.model.classifier(&association.b.object) {
                if filter.accepts(parent) && !result.iter().any(|c| c.id == parent.id) {
                    result.push(parent);
                }
            }
        }
        result
    }

    /// Direct children through generalization and realization
    pub fn sub_classifiers(
        &self,
        classifier: &Classifier,
        filter: ClassifierFilter,
    ) -> Vec<&'m Classifier> {
        let mut result: Vec<&'m Classifier> = Vec::new();
        for association in self.model.associations_of(&classifier.id) {
            if !matches!(
                association.kind,
                AssociationKind::Generalization | AssociationKind::Realization
            ) || association.b.object != classifier.id
                || association.a.object == classifier.id
            {
                continue;
            }
            if let Some(child) = self.model.classifier(&association.a.object) {
                if filter.accepts(child) && !result.iter().any(|c| c.id == child.id) {
                    result.push(child);
                }
            }
        }
        result
    }

    pub fn resolve_type(&self, type_ref: Option<&str>, type_name: &str) -> ResolvedType<'m> {
        if let Some(id) = type_ref {
            return match self.model.classifier(id) {
                Some(c) if c.kind == BaseKind::Datatype => ResolvedType::Primitive(c.name.clone()),
                Some(c) => ResolvedType::Classifier(c),
                None => {
                    let shown = if type_name.trim().is_empty() {
                        id
                    } else {
                        type_name.trim()
                    };
                    ResolvedType::Unknown(shown.to_string())
                }
            };
        }

        let name = type_name.trim();
        if name.is_empty() {
            return ResolvedType::Void;
        }
        if self.mapper.is_primitive(name) || self.mapper.is_primitive(&self.mapper.fix_type_name(name))
        {
            return ResolvedType::Primitive(name.to_string());
        }
        match self.model.classifier_by_name(name) {
            Some(c) if c.kind == BaseKind::Datatype => ResolvedType::Primitive(c.name.clone()),
            Some(c) => ResolvedType::Classifier(c),
            None => ResolvedType::Named(name.to_string()),
        }
    }

    pub fn resolve_attribute_type(&self, attribute: &Attribute) -> ResolvedType<'m> {
        self.resolve_type(attribute.type_ref.as_deref(), &attribute.type_name)
    }

    pub fn resolve_return_type(&self, operation: &Operation) -> ResolvedType<'m> {
        self.resolve_type(operation.return_ref.as_deref(), &operation.return_type)
    }

    /// The role on `side`, or `None` when that side carries no role name or
    /// the association contributes no fields
    pub fn resolve_association_role(
        &self,
        association: &'m Association,
        side: RoleSide,
    ) -> Option<RoleInfo<'m>> {
        if !association.kind.is_structural() {
            return None;
        }
        let end = association.end(side);
        let role_name = end.role_name.trim();
        if role_name.is_empty() {
            return None;
        }

        let (target, type_name) = match self.model.classifier(&end.object) {
            Some(c) => (ResolvedType::Classifier(c), c.name.clone()),
            None => (ResolvedType::Unknown(end.object.clone()), end.object.clone()),
        };

        Some(RoleInfo {
            association,
            kind: association.kind,
            target,
            type_name,
            role_name: role_name.to_string(),
            multiplicity: end.multiplicity.trim().to_string(),
            doc: end.doc.clone(),
            changeability: end.changeability,
            visibility: end.visibility,
            cardinality: Cardinality::from_multiplicity(&end.multiplicity),
        })
    }

    /// Association roles that become fields of `classifier`.
    ///
    /// The classifier holds the role of the opposite end; a uni-directional
    /// association is only navigable from end A.
    pub fn association_roles(&self, classifier: &Classifier) -> Vec<RoleInfo<'m>> {
        let mut roles = Vec::new();
        for kind in FIELD_KINDS {
            for association in self.model.associations() {
                if association.kind != kind {
                    continue;
                }
                if association.a.object == classifier.id {
                    roles.extend(self.resolve_association_role(association, RoleSide::B));
                }
                if association.b.object == classifier.id && kind != AssociationKind::UniAssociation
                {
                    roles.extend(self.resolve_association_role(association, RoleSide::A));
                }
            }
        }
        roles
    }

    /// Classifiers `classifier` refers to, deduplicated, in first-seen order.
    ///
    /// Covers parents, association and dependency targets, operation
    /// signatures and (for non-interfaces) attribute types. Datatypes,
    /// unresolved types and the classifier itself are left out.
    pub fn related_classifiers(&self, classifier: &Classifier) -> Vec<&'m Classifier> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut related: Vec<&'m Classifier> = Vec::new();
        let mut push = |c: &'m Classifier, related: &mut Vec<&'m Classifier>| {
            if c.id != classifier.id && c.kind != BaseKind::Datatype && seen.insert(c.id.as_str()) {
                related.push(c);
            }
        };

        for parent in self.super_classifiers(classifier, ClassifierFilter::All) {
            push(parent, &mut related);
        }
        for role in self.association_roles(classifier) {
            if let ResolvedType::Classifier(c) = role.target {
                push(c, &mut related);
            }
        }
        for association in self.model.associations_of(&classifier.id) {
            if association.kind == AssociationKind::Dependency
                && association.a.object == classifier.id
            {
                if let Some(c) = self.model.classifier(&association.b.object) {
                    push(c, &mut related);
                }
            }
        }
        for operation in &classifier.operations {
            if let ResolvedType::Classifier(c) = self.resolve_return_type(operation) {
                push(c, &mut related);
            }
            for parameter in &operation.parameters {
                if let ResolvedType::Classifier(c) = self.resolve_attribute_type(parameter) {
                    push(c, &mut related);
                }
            }
        }
        if !classifier.is_interface() {
            for attribute in &classifier.attributes {
                if let ResolvedType::Classifier(c) = self.resolve_attribute_type(attribute) {
                    push(c, &mut related);
                }
            }
        }
        related
    }

    /// Related classifiers living in a different, non-root package
    pub fn related_packages_needing_import(&self, classifier: &Classifier) -> Vec<&'m Classifier> {
        let own = self.model.package_path(classifier, ".");
        self.related_classifiers(classifier)
            .into_iter()
            .filter(|c| {
                let package = self.model.package_path(c, ".");
                !package.is_empty() && package != own
            })
            .collect()
    }

    /// Operations declared by the interfaces `classifier` realizes (and
    /// their parent interfaces) that it does not declare itself
    pub fn interface_operations_to_implement(&self, classifier: &Classifier) -> Vec<&'m Operation> {
        if classifier.is_interface() {
            return Vec::new();
        }

        let mut pending = self.super_classifiers(classifier, ClassifierFilter::Interface);
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result: Vec<&'m Operation> = Vec::new();

        while let Some(interface) = pending.pop() {
            if !visited.insert(interface.id.as_str()) {
                continue;
            }
            for operation in &interface.operations {
                let declared = classifier
                    .operations
                    .iter()
                    .any(|o| same_signature(o, operation))
                    || result.iter().any(|o| same_signature(o, operation));
                if !declared {
                    result.push(operation);
                }
            }
            pending.extend(self.super_classifiers(interface, ClassifierFilter::Interface));
        }
        result
    }

    pub fn has_abstract_ops(&self, classifier: &Classifier) -> bool {
        classifier.operations.iter().any(|o| o.is_abstract)
    }

    pub fn has_default_value_attr(&self, classifier: &Classifier) -> bool {
        classifier
            .attributes
            .iter()
            .any(|a| !a.initial_value.trim().is_empty())
    }

    /// Names of built-in datatypes are never generated as classes
    pub fn is_common_datatype(&self, name: &str) -> bool {
        self.mapper.is_primitive(name)
    }
}

fn same_signature(a: &Operation, b: &Operation) -> bool {
    a.name == b.name
        && a.parameters.len() == b.parameters.len()
        && a
            .parameters
            .iter()
            .zip(&b.parameters)
            .all(|(x, y)| x.type_name.trim() == y.type_name.trim())
}
