use std::path::PathBuf;

use umbrello_model::loader::{from_json_str, load_json_file, to_json_string};
use umbrello_model::{AssociationKind, BaseKind, Changeability, Error, Visibility};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn loads_shop_fixture() {
    let model = load_json_file(&fixture("shop.json")).unwrap();

    assert_eq!(model.classifiers().count(), 4);
    assert_eq!(model.packages().count(), 2);

    let order = model.classifier("order").unwrap();
    assert_eq!(order.name, "Order");
    assert_eq!(order.kind, BaseKind::Class);
    assert_eq!(order.attributes.len(), 2);
    assert_eq!(order.attributes[0].visibility, Visibility::Private);
    assert_eq!(order.attributes[1].visibility, Visibility::Public);
    assert!(order.operations[0].is_const);
    assert_eq!(order.operations[0].parameters[0].initial_value, "0.0");

    let status = model.classifier_by_name("Status").unwrap();
    assert_eq!(status.kind, BaseKind::Enum);
    assert_eq!(status.literals[1].value, "5");
}

#[test]
fn resolves_nested_package_paths() {
    let model = load_json_file(&fixture("shop.json")).unwrap();
    let invoice = model.classifier("invoice").unwrap();

    assert_eq!(model.package_path(invoice, "."), "shop.billing");
    assert_eq!(
        model.fully_qualified_name(invoice, "::"),
        "shop::billing::Invoice"
    );
}

#[test]
fn keeps_association_ends() {
    let model = load_json_file(&fixture("shop.json")).unwrap();
    let composition = model
        .associations()
        .find(|a| a.id == "order-items")
        .unwrap();

    assert_eq!(composition.kind, AssociationKind::Composition);
    assert_eq!(composition.b.role_name, "items");
    assert_eq!(composition.b.changeability, Changeability::AddOnly);
    assert_eq!(model.associations_of("order").count(), 2);
}

#[test]
fn rejects_duplicate_ids() {
    let json = r#"{
        "classifiers": [
            { "id": "x", "name": "A" },
            { "id": "x", "name": "B" }
        ]
    }"#;

    let err = from_json_str(json).unwrap_err();
    assert!(matches!(err, Error::DuplicateId(ref id) if id == "x"));
}

#[test]
fn dangling_references_are_not_load_errors() {
    let json = r#"{
        "classifiers": [
            { "id": "a", "name": "A", "package": "missing",
              "attributes": [{ "name": "ghost", "type_name": "Ghost", "type_ref": "nowhere" }] }
        ]
    }"#;

    let model = from_json_str(json).unwrap();
    let a = model.classifier("a").unwrap();
    assert_eq!(model.package_path(a, "."), "");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load_json_file(&path).unwrap_err();
    assert!(matches!(err, Error::ModelNotFound(_)));
}

#[test]
fn written_snapshot_loads_back() {
    let model = load_json_file(&fixture("shop.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.json");
    std::fs::write(&path, to_json_string(&model).unwrap()).unwrap();

    let reloaded = load_json_file(&path).unwrap();
    assert_eq!(
        reloaded.classifier("line-item").map(|c| c.name.as_str()),
        Some("LineItem")
    );
}
