#![allow(dead_code)]

use std::path::Path;

use chrono::{Local, TimeZone};
use umbrello_codegen::{CodeGenerationPolicy, CodeGenerator, Language};
use umbrello_model::{
    Association, AssociationEnd, AssociationKind, Attribute, BaseKind, Changeability, Classifier,
    EnumLiteral, Model, Operation, Package,
};

/// `Animal { name: string; speak() }`
pub fn animal() -> Classifier {
    Classifier::new("animal", "Animal")
        .with_attribute(Attribute::new("name", "string"))
        .with_operation(Operation::new("speak", ""))
}

/// Interface `Drawable { abstract draw() }`
pub fn drawable() -> Classifier {
    Classifier::new("drawable", "Drawable")
        .with_kind(BaseKind::Interface)
        .with_operation(Operation::new("draw", "").abstract_())
}

/// Enum `Pair { A, B, C }`
pub fn pair() -> Classifier {
    Classifier::new("pair", "Pair")
        .with_kind(BaseKind::Enum)
        .with_literal(EnumLiteral::new("A"))
        .with_literal(EnumLiteral::new("B"))
        .with_literal(EnumLiteral::new("C"))
}

pub fn animal_model() -> Model {
    Model::from_parts(vec![], vec![animal()], vec![]).unwrap()
}

pub fn drawable_model() -> Model {
    Model::from_parts(
        vec![],
        vec![drawable(), Classifier::new("circle", "Circle")],
        vec![Association::realization("r1", "circle", "drawable")],
    )
    .unwrap()
}

pub fn pair_model() -> Model {
    Model::from_parts(vec![], vec![pair()], vec![]).unwrap()
}

/// `Order` -> `LineItem`, role `items` with multiplicity `*` on the
/// `LineItem` end, no role on the `Order` end
pub fn order_model() -> Model {
    order_model_with(Changeability::Changeable)
}

pub fn order_model_with(changeability: Changeability) -> Model {
    Model::from_parts(
        vec![],
        vec![
            Classifier::new("order", "Order"),
            Classifier::new("item", "LineItem"),
        ],
        vec![Association::new(
            "a1",
            AssociationKind::Association,
            AssociationEnd::new("order"),
            AssociationEnd::new("item")
                .role("items")
                .multiplicity("*")
                .changeability(changeability),
        )],
    )
    .unwrap()
}

/// A small model touching packages, inheritance, statics and datatypes
pub fn shop_model() -> Model {
    Model::from_parts(
        vec![
            Package::new("pkg-shop", "shop"),
            Package::new("pkg-billing", "billing").with_parent("pkg-shop"),
        ],
        vec![
            Classifier::new("entity", "Entity")
                .abstract_()
                .with_package("pkg-shop")
                .with_operation(Operation::new("id", "int").abstract_()),
            Classifier::new("order", "Order")
                .with_package("pkg-shop")
                .with_attribute(Attribute::new("note", "string").with_initial_value("none"))
                .with_attribute(Attribute::new("count", "int").with_initial_value("0").static_()),
            Classifier::new("invoice", "Invoice").with_package("pkg-billing"),
            Classifier::new("int", "int").with_kind(BaseKind::Datatype),
        ],
        vec![
            Association::generalization("g1", "order", "entity"),
            Association::new(
                "a1",
                AssociationKind::UniAssociation,
                AssociationEnd::new("invoice"),
                AssociationEnd::new("order").role("order"),
            ),
        ],
    )
    .unwrap()
}

pub fn policy_in(dir: &Path) -> CodeGenerationPolicy {
    CodeGenerationPolicy {
        output_directory: dir.to_path_buf(),
        ..Default::default()
    }
}

pub fn generator(model: Model, language: Language) -> CodeGenerator {
    CodeGenerator::new(model, CodeGenerationPolicy::default(), language).unwrap()
}

/// Every unit of classifier `key`, concatenated, at a fixed time
pub fn render(model: Model, language: Language, key: &str) -> String {
    render_with(model, CodeGenerationPolicy::default(), language, key)
}

pub fn render_with(
    model: Model,
    policy: CodeGenerationPolicy,
    language: Language,
    key: &str,
) -> String {
    let generator = CodeGenerator::new(model, policy, language).unwrap();
    let classifier = generator.classifier(key).unwrap();
    generator
        .render_at(classifier, fixed_time())
        .into_iter()
        .map(|u| u.contents)
        .collect::<Vec<_>>()
        .join("")
}

pub fn fixed_time() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
}
