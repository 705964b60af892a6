use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};

/// Identifier of a model element (package, classifier or association)
pub type ObjectId = String;

/// UML visibility of a classifier, member or association role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
    Implementation,
}

impl Visibility {
    /// Emission order of visibility tiers
    pub const TIERS: [Visibility; 4] = [
        Visibility::Public,
        Visibility::Protected,
        Visibility::Private,
        Visibility::Implementation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Implementation => "implementation",
        }
    }
}

/// Base kind of a classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseKind {
    #[default]
    Class,
    Interface,
    Datatype,
    Enum,
}

/// Direction of an operation parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterDirection {
    #[default]
    In,
    Out,
    InOut,
}

/// Whether the far end of an association may be modified through the near end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Changeability {
    #[default]
    Changeable,
    Frozen,
    AddOnly,
}

/// Kind of a relationship between two classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationKind {
    Association,
    UniAssociation,
    Aggregation,
    Composition,
    /// End A specializes end B
    Generalization,
    /// End A implements interface B
    Realization,
    Dependency,
}

impl AssociationKind {
    /// Associations that contribute fields to the participating classifiers
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AssociationKind::Association
                | AssociationKind::UniAssociation
                | AssociationKind::Aggregation
                | AssociationKind::Composition
        )
    }
}

/// Kind of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Regular,
    Constructor,
    Destructor,
}

/// A package. Packages nest through `parent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<ObjectId>,
    #[serde(default)]
    pub doc: String,
}

impl Package {
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent: None,
            doc: String::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<ObjectId>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Attribute of a classifier; also used for operation parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub name: String,
    /// Textual type name as written in the model
    pub type_name: String,
    /// Reference to a classifier in the model, when the type is one
    pub type_ref: Option<ObjectId>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub initial_value: String,
    pub direction: ParameterDirection,
    pub doc: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    pub fn with_type_ref(mut self, id: impl Into<ObjectId>) -> Self {
        self.type_ref = Some(id.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub name: String,
    pub return_type: String,
    pub return_ref: Option<ObjectId>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_const: bool,
    pub is_override: bool,
    pub kind: OperationKind,
    pub parameters: Vec<Attribute>,
    /// Literal body text inserted verbatim into the generated method
    pub source_code: String,
    pub doc: String,
}

impl Operation {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, parameter: Attribute) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_source(mut self, code: impl Into<String>) -> Self {
        self.source_code = code.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_kind(mut self, kind: OperationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn const_(mut self) -> Self {
        self.is_const = true;
        self
    }
}

/// Template parameter of a classifier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateParameter {
    pub name: String,
    /// Constraining type; empty or `class` means unconstrained
    pub type_name: String,
}

impl TemplateParameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.type_name.is_empty() || self.type_name == "class"
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumLiteral {
    pub name: String,
    /// Explicit value, empty when the literal takes the next implicit one
    pub value: String,
    pub doc: String,
}

impl EnumLiteral {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// A class, interface, datatype or enumeration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Classifier {
    pub id: ObjectId,
    pub name: String,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub stereotype: String,
    pub kind: BaseKind,
    /// Owning package or owning classifier
    pub package: Option<ObjectId>,
    pub attributes: Vec<Attribute>,
    pub operations: Vec<Operation>,
    pub templates: Vec<TemplateParameter>,
    pub literals: Vec<EnumLiteral>,
    pub doc: String,
}

impl Classifier {
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: BaseKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_package(mut self, package: impl Into<ObjectId>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = stereotype.into();
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_template(mut self, template: TemplateParameter) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_literal(mut self, literal: EnumLiteral) -> Self {
        self.literals.push(literal);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == BaseKind::Interface
    }
}

/// One end of an association
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationEnd {
    /// Classifier at this end
    pub object: ObjectId,
    pub role_name: String,
    pub multiplicity: String,
    pub visibility: Visibility,
    pub changeability: Changeability,
    pub doc: String,
}

impl AssociationEnd {
    pub fn new(object: impl Into<ObjectId>) -> Self {
        Self {
            object: object.into(),
            visibility: Visibility::Private,
            ..Default::default()
        }
    }

    pub fn role(mut self, name: impl Into<String>) -> Self {
        self.role_name = name.into();
        self
    }

    pub fn multiplicity(mut self, multiplicity: impl Into<String>) -> Self {
        self.multiplicity = multiplicity.into();
        self
    }

    pub fn changeability(mut self, changeability: Changeability) -> Self {
        self.changeability = changeability;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub id: ObjectId,
    pub kind: AssociationKind,
    pub a: AssociationEnd,
    pub b: AssociationEnd,
    #[serde(default)]
    pub doc: String,
}

impl Association {
    pub fn new(
        id: impl Into<ObjectId>,
        kind: AssociationKind,
        a: AssociationEnd,
        b: AssociationEnd,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            a,
            b,
            doc: String::new(),
        }
    }

    /// Generalization from `child` to `parent`
    pub fn generalization(
        id: impl Into<ObjectId>,
        child: impl Into<ObjectId>,
        parent: impl Into<ObjectId>,
    ) -> Self {
        Self::new(
            id,
            AssociationKind::Generalization,
            AssociationEnd::new(child),
            AssociationEnd::new(parent),
        )
    }

    /// Realization of `interface` by `implementor`
    pub fn realization(
        id: impl Into<ObjectId>,
        implementor: impl Into<ObjectId>,
        interface: impl Into<ObjectId>,
    ) -> Self {
        Self::new(
            id,
            AssociationKind::Realization,
            AssociationEnd::new(implementor),
            AssociationEnd::new(interface),
        )
    }
}

/// Which end of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSide {
    A,
    B,
}

impl RoleSide {
    pub fn opposite(&self) -> RoleSide {
        match self {
            RoleSide::A => RoleSide::B,
            RoleSide::B => RoleSide::A,
        }
    }
}

impl Association {
    pub fn end(&self, side: RoleSide) -> &AssociationEnd {
        match side {
            RoleSide::A => &self.a,
            RoleSide::B => &self.b,
        }
    }
}

/// The complete model snapshot with id and name indexes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    packages: Vec<Package>,
    #[serde(default)]
    classifiers: Vec<Classifier>,
    #[serde(default)]
    associations: Vec<Association>,

    #[serde(skip)]
    package_index: HashMap<ObjectId, usize>,
    #[serde(skip)]
    classifier_index: HashMap<ObjectId, usize>,
    #[serde(skip)]
    name_index: HashMap<String, usize>,
    #[serde(skip)]
    association_ids: HashSet<ObjectId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from its parts, rejecting duplicate ids
    pub fn from_parts(
        packages: Vec<Package>,
        classifiers: Vec<Classifier>,
        associations: Vec<Association>,
    ) -> Result<Self> {
        let mut model = Self::new();
        for package in packages {
            model.add_package(package)?;
        }
        for classifier in classifiers {
            model.add_classifier(classifier)?;
        }
        for association in associations {
            model.add_association(association)?;
        }
        Ok(model)
    }

    /// Rebuild the lookup indexes after deserialization
    pub(crate) fn reindex(self) -> Result<Self> {
        let Model {
            packages,
            classifiers,
            associations,
            ..
        } = self;
        Self::from_parts(packages, classifiers, associations)
    }

    fn ensure_unique(&self, id: &str) -> Result<()> {
        let taken = self.package_index.contains_key(id)
            || self.classifier_index.contains_key(id)
            || self.association_ids.contains(id);
        if taken {
            return Err(Error::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    pub fn add_package(&mut self, package: Package) -> Result<()> {
        self.ensure_unique(&package.id)?;
        self.package_index
            .insert(package.id.clone(), self.packages.len());
        self.packages.push(package);
        Ok(())
    }

    pub fn add_classifier(&mut self, classifier: Classifier) -> Result<()> {
        self.ensure_unique(&classifier.id)?;
        let position = self.classifiers.len();
        self.classifier_index
            .insert(classifier.id.clone(), position);
        // first classifier with a given name wins name lookups
        self.name_index
            .entry(classifier.name.clone())
            .or_insert(position);
        self.classifiers.push(classifier);
        Ok(())
    }

    pub fn add_association(&mut self, association: Association) -> Result<()> {
        self.ensure_unique(&association.id)?;
        self.association_ids.insert(association.id.clone());
        self.associations.push(association);
        Ok(())
    }

    /// Get a classifier by id
    pub fn classifier(&self, id: &str) -> Option<&Classifier> {
        self.classifier_index
            .get(id)
            .map(|&index| &self.classifiers[index])
    }

    /// Get a classifier by its simple name
    pub fn classifier_by_name(&self, name: &str) -> Option<&Classifier> {
        self.name_index
            .get(name)
            .map(|&index| &self.classifiers[index])
    }

    pub fn package(&self, id: &str) -> Option<&Package> {
        self.package_index
            .get(id)
            .map(|&index| &self.packages[index])
    }

    /// Classifiers in document order
    pub fn classifiers(&self) -> impl Iterator<Item = &Classifier> {
        self.classifiers.iter()
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.iter()
    }

    /// Associations in which the classifier participates at either end
    pub fn associations_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Association> {
        self.associations
            .iter()
            .filter(move |a| a.a.object == id || a.b.object == id)
    }

    /// Names of the enclosing packages (and classifiers), outermost first
    pub fn package_segments(&self, owner: Option<&str>) -> Vec<&str> {
        let mut segments = Vec::new();
        let mut current = owner;
        // guards against cyclic parent chains in malformed snapshots
        let mut depth = 0;
        while let Some(id) = current {
            if depth > 64 {
                tracing::warn!(id, "package nesting too deep, truncating");
                break;
            }
            depth += 1;
            if let Some(package) = self.package(id) {
                segments.push(package.name.as_str());
                current = package.parent.as_deref();
            } else if let Some(classifier) = self.classifier(id) {
                segments.push(classifier.name.as_str());
                current = classifier.package.as_deref();
            } else {
                break;
            }
        }
        segments.reverse();
        segments
    }

    /// Enclosing package path joined with `separator`, empty for the root
    pub fn package_path(&self, classifier: &Classifier, separator: &str) -> String {
        self.package_segments(classifier.package.as_deref())
            .join(separator)
    }

    /// Package path plus the classifier's own name
    pub fn fully_qualified_name(&self, classifier: &Classifier, separator: &str) -> String {
        let mut segments = self.package_segments(classifier.package.as_deref());
        segments.push(classifier.name.as_str());
        segments.join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Model {
        Model::from_parts(
            vec![
                Package::new("p1", "shop"),
                Package::new("p2", "orders").with_parent("p1"),
            ],
            vec![
                Classifier::new("c1", "Order").with_package("p2"),
                Classifier::new("c2", "Line").with_package("c1"),
                Classifier::new("c3", "Loose"),
            ],
            vec![Association::generalization("g1", "c2", "c3")],
        )
        .unwrap()
    }

    #[test]
    fn test_package_path_walks_packages_and_classifiers() {
        let model = sample();
        let order = model.classifier("c1").unwrap();
        let line = model.classifier("c2").unwrap();
        let loose = model.classifier("c3").unwrap();

        assert_eq!(model.package_path(order, "."), "shop.orders");
        assert_eq!(model.package_path(line, "::"), "shop::orders::Order");
        assert_eq!(model.package_path(loose, "."), "");
        assert_eq!(model.fully_qualified_name(order, "-"), "shop-orders-Order");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut model = sample();
        let err = model
            .add_classifier(Classifier::new("p1", "Clash"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == "p1"));

        let err = model
            .add_association(Association::generalization("g1", "c1", "c3"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == "g1"));
        let err = model.add_package(Package::new("g1", "clash")).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == "g1"));
        assert_eq!(model.associations().count(), 1);
    }

    #[test]
    fn test_lookup_by_name_and_associations() {
        let model = sample();
        assert_eq!(model.classifier_by_name("Line").unwrap().id, "c2");
        assert_eq!(model.associations_of("c3").count(), 1);
        assert_eq!(model.associations_of("c1").count(), 0);
    }
}
