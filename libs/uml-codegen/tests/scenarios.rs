//! End-to-end rendering of small models in every target language

use umbrello_codegen::{CodeGenerationPolicy, Language};
use umbrello_model::{
    Association, AssociationEnd, AssociationKind, Attribute, BaseKind, Changeability, Classifier,
    EnumLiteral, Model, Operation, TemplateParameter, Visibility,
};

mod test_support;

use test_support::*;

/// The line following the first line whose trimmed text is `first`
fn line_after<'a>(text: &'a str, first: &str) -> Option<&'a str> {
    let mut lines = text.lines();
    lines.find(|l| l.trim() == first)?;
    lines.next().map(str::trim)
}

// --- Animal: one attribute, one operation ---

#[test]
fn animal_java() {
    let text = render(animal_model(), Language::Java, "Animal");
    assert!(text.contains("public class Animal {"));
    assert!(text.contains("public String name;"));
    assert!(text.contains("public void speak() {"));
    assert!(!text.contains("import "));
}

#[test]
fn animal_cpp() {
    let text = render(animal_model(), Language::Cpp, "Animal");
    assert!(text.contains("class Animal\n{"));
    assert!(text.contains("std::string name;"));
    assert!(text.contains("void speak();"));
    assert!(text.contains("void Animal::speak()"));
    assert!(text.contains("#include <string>"));
    assert!(!text.contains("#include <vector>"));
}

#[test]
fn animal_python() {
    let text = render(animal_model(), Language::Python, "Animal");
    assert!(text.starts_with("class Animal:"));
    assert!(text.contains("name: str"));
    assert!(text.contains("def speak(self) -> None:"));
    assert!(!text.contains("import"));
}

#[test]
fn animal_ruby() {
    let text = render(animal_model(), Language::Ruby, "Animal");
    assert!(text.starts_with("class Animal\n"));
    assert!(text.contains("attr_accessor :name"));
    assert!(text.contains("def speak"));
    assert!(!text.contains("require"));
    assert!(text.trim_end().ends_with("end"));
}

// --- Drawable: interface with one abstract operation ---

#[test]
fn drawable_ruby_is_a_module() {
    let text = render(drawable_model(), Language::Ruby, "Drawable");
    assert!(text.starts_with("module Drawable\n"));
    assert_eq!(line_after(&text, "def draw"), Some("end"));
    assert!(!text.contains("initialize"));
}

#[test]
fn drawable_python_uses_abc() {
    let text = render(drawable_model(), Language::Python, "Drawable");
    assert!(text.starts_with("from abc import ABC, abstractmethod\n"));
    assert!(text.contains("class Drawable(ABC):"));
    assert_eq!(line_after(&text, "@abstractmethod"), Some("def draw(self) -> None:"));
    assert_eq!(line_after(&text, "def draw(self) -> None:"), Some("..."));
    assert!(!text.contains("__init__"));
}

#[test]
fn drawable_java_and_cpp_declare_without_body() {
    let java = render(drawable_model(), Language::Java, "Drawable");
    assert!(java.contains("public interface Drawable {"));
    assert!(java.contains("void draw();"));

    let cpp = render(drawable_model(), Language::Cpp, "Drawable");
    assert!(cpp.contains("virtual void draw() = 0;"));
    assert!(!cpp.contains("Drawable::draw"));
}

#[test]
fn circle_provides_interface_operations() {
    let java = render(drawable_model(), Language::Java, "Circle");
    assert!(java.contains("public class Circle implements Drawable {"));
    assert!(java.contains("public void draw() {"));

    let ruby = render(drawable_model(), Language::Ruby, "Circle");
    assert!(ruby.contains("class Circle\n"));
    assert!(ruby.contains("include Drawable"));
    assert!(ruby.contains("require 'Drawable'"));

    let cpp = render(drawable_model(), Language::Cpp, "Circle");
    assert!(cpp.contains("#include \"Drawable.h\""));
    assert!(cpp.contains("class Circle : virtual public Drawable"));
    assert!(cpp.contains("void Circle::draw()"));

    let python = render(drawable_model(), Language::Python, "Circle");
    assert!(python.contains("class Circle(Drawable):"));
    assert!(python.contains("def draw(self) -> None:"));
    assert!(!python.contains("@abstractmethod"));
}

// --- Pair: enumeration ---

#[test]
fn pair_enum_in_every_language() {
    assert_eq!(
        render(pair_model(), Language::Java, "Pair"),
        "public enum Pair {\n    A,\n    B,\n    C\n}\n"
    );
    assert_eq!(
        render(pair_model(), Language::Cpp, "Pair"),
        "#ifndef PAIR_H\n#define PAIR_H\n\nenum Pair {\n    A,\n    B,\n    C\n};\n\n#endif // PAIR_H\n"
    );
    assert_eq!(
        render(pair_model(), Language::Python, "Pair"),
        "from enum import Enum, auto\n\n\nclass Pair(Enum):\n    A = auto()\n    B = auto()\n    C = auto()\n"
    );
    assert_eq!(
        render(pair_model(), Language::Ruby, "Pair"),
        "module Pair\n    A = 0\n    B = 1\n    C = 2\nend\n"
    );
}

// --- Order / LineItem: association cardinality ---

#[test]
fn order_gets_one_collection_field() {
    let java = render(order_model(), Language::Java, "Order");
    assert_eq!(java.matches("List<LineItem> items;").count(), 1);
    assert!(java.contains("import java.util.List;"));
    assert!(java.contains("items = new ArrayList<>();"));

    let cpp = render(order_model(), Language::Cpp, "Order");
    assert_eq!(cpp.matches("std::vector<LineItem*> items;").count(), 1);
    assert!(cpp.contains("#include \"LineItem.h\""));
    assert!(cpp.contains("#include <vector>"));

    let python = render(order_model(), Language::Python, "Order");
    assert!(python.contains("__items: List[LineItem]"));
    assert!(python.starts_with("from __future__ import annotations\n"));
    assert!(python.contains("from typing import TYPE_CHECKING, List"));
    assert!(python.contains("if TYPE_CHECKING:\n    from LineItem import LineItem\n"));

    let ruby = render(order_model(), Language::Ruby, "Order");
    assert!(ruby.contains("@items = []"));
    assert!(ruby.contains("attr_reader :items"));
}

#[test]
fn line_item_gets_no_field() {
    for language in Language::ALL {
        let text = render(order_model(), language, "LineItem");
        assert!(!text.contains("items"), "{language}: {text}");
        assert!(!text.contains("Order"), "{language}: {text}");
    }
}

#[test]
fn python_mutual_association_imports_lazily() {
    let model = Model::from_parts(
        vec![],
        vec![
            Classifier::new("order", "Order"),
            Classifier::new("item", "LineItem"),
        ],
        vec![Association::new(
            "a1",
            AssociationKind::Association,
            AssociationEnd::new("order").role("order"),
            AssociationEnd::new("item").role("items").multiplicity("*"),
        )],
    )
    .unwrap();
    let order = render(model.clone(), Language::Python, "order");
    assert!(order.starts_with("from __future__ import annotations\n"));
    let runtime = order.split("if TYPE_CHECKING:").next().unwrap();
    assert!(!runtime.contains("import LineItem"));
    assert!(order.contains("if TYPE_CHECKING:\n    from LineItem import LineItem\n"));

    // the role object is constructed, so its class is needed at runtime
    let item = render(model, Language::Python, "item");
    assert!(item.starts_with("from Order import Order\n"));
    assert!(!item.contains("TYPE_CHECKING"));
    assert!(item.contains("order = Order()"));
}

#[test]
fn python_abstract_class_below_a_base_mixes_in_abc() {
    let model = Model::from_parts(
        vec![],
        vec![
            Classifier::new("base", "Base"),
            Classifier::new("shape", "Shape")
                .abstract_()
                .with_operation(Operation::new("area", "double").abstract_()),
        ],
        vec![Association::generalization("g1", "shape", "base")],
    )
    .unwrap();
    let text = render(model, Language::Python, "shape");
    assert!(text.contains("from abc import ABC, abstractmethod"));
    assert!(text.contains("from Base import Base"));
    assert!(text.contains("class Shape(Base, ABC):"));
    assert!(text.contains("@abstractmethod"));
}

// --- Changeability ---

#[test]
fn frozen_roles_have_no_mutators() {
    let java = render(order_model_with(Changeability::Frozen), Language::Java, "Order");
    assert!(java.contains("getItemsList()"));
    assert!(!java.contains("addItems"));
    assert!(!java.contains("removeItems"));

    let cpp = render(order_model_with(Changeability::Frozen), Language::Cpp, "Order");
    assert!(cpp.contains("getItemsList() const"));
    assert!(!cpp.contains("addItems"));
    assert!(!cpp.contains("#include <algorithm>"));
}

#[test]
fn add_only_roles_cannot_remove() {
    let java = render(order_model_with(Changeability::AddOnly), Language::Java, "Order");
    assert!(java.contains("addItems(LineItem newObject)"));
    assert!(!java.contains("removeItems"));

    let python = render(order_model_with(Changeability::AddOnly), Language::Python, "Order");
    assert!(python.contains("def add_items(self, value: LineItem) -> None:"));
    assert!(!python.contains("remove_items"));
}

// --- Packages, inheritance, statics ---

#[test]
fn java_accessors_take_attribute_visibility() {
    let account = Classifier::new("account", "Account")
        .with_attribute(Attribute::new("secret", "string").with_visibility(Visibility::Private))
        .with_attribute(Attribute::new("level", "int").with_visibility(Visibility::Protected))
        .with_attribute(Attribute::new("owner", "string"));
    let model = Model::from_parts(vec![], vec![account], vec![]).unwrap();
    let text = render(model, Language::Java, "account");

    assert!(text.contains("private void setSecret(String newVar) {"));
    assert!(text.contains("private String getSecret() {"));
    assert!(text.contains("protected int getLevel() {"));
    assert!(text.contains("public void setOwner(String newVar) {"));
    // one accessor group per tier
    assert!(text.find("setOwner").unwrap() < text.find("getLevel").unwrap());
    assert!(text.find("getLevel").unwrap() < text.find("getSecret").unwrap());
}

#[test]
fn java_packages_and_imports() {
    let order = render(shop_model(), Language::Java, "Order");
    assert!(order.starts_with("package shop;\n"));
    assert!(order.contains("public class Order extends Entity {"));
    assert!(order.contains("public static int count = 0;"));

    let invoice = render(shop_model(), Language::Java, "Invoice");
    assert!(invoice.starts_with("package shop.billing;\n"));
    assert!(invoice.contains("import shop.Order;"));

    let entity = render(shop_model(), Language::Java, "Entity");
    assert!(entity.contains("public abstract class Entity {"));
    assert!(entity.contains("public abstract int id();"));
}

#[test]
fn cpp_namespaces_and_static_definitions() {
    let order = render(shop_model(), Language::Cpp, "Order");
    assert!(order.contains("#include \"shop/Entity.h\""));
    assert!(order.contains("namespace shop {"));
    assert!(order.contains("class Order : virtual public Entity"));
    assert!(order.contains("static int count;"));
    assert!(order.contains("int Order::count = 0;"));
    assert!(order.contains("note = \"none\";"));
    assert!(order.contains("#include \"shop/Order.h\""));

    let invoice = render(shop_model(), Language::Cpp, "Invoice");
    assert!(invoice.contains("namespace shop::billing {"));
    assert!(invoice.contains("#include \"shop/Order.h\""));
    assert!(invoice.contains("order = new Order();"));
}

#[test]
fn cpp_without_package_dirs_joins_names() {
    let policy = CodeGenerationPolicy {
        create_package_dirs: false,
        ..Default::default()
    };
    let order = render_with(shop_model(), policy, Language::Cpp, "Order");
    assert!(order.contains("#include \"shop-Entity.h\""));
}

#[test]
fn python_private_members_and_super_init() {
    let text = render(shop_model(), Language::Python, "Order");
    assert!(text.contains("from shop.Entity import Entity"));
    assert!(text.contains("class Order(Entity):"));
    assert!(text.contains("count: int = 0"));
    assert!(text.contains("super().__init__()"));
    assert!(text.contains("self.note = \"none\""));
}

// --- Naming ---

#[test]
fn keyword_members_are_escaped() {
    let model = Model::from_parts(
        vec![],
        vec![Classifier::new("k", "Keywords")
            .with_attribute(Attribute::new("class", "int"))
            .with_attribute(Attribute::new("end", "int"))
            .with_attribute(Attribute::new("lambda", "int"))],
        vec![],
    )
    .unwrap();
    let java = render(model.clone(), Language::Java, "Keywords");
    assert!(java.contains("int class_;"));
    let ruby = render(model.clone(), Language::Ruby, "Keywords");
    assert!(ruby.contains("attr_accessor :end_"));
    let python = render(model, Language::Python, "Keywords");
    assert!(python.contains("lambda_: int"));
}

// --- Stereotypes ---

#[test]
fn struct_stereotype_per_language() {
    let model = Model::from_parts(
        vec![],
        vec![Classifier::new("p", "Point")
            .with_stereotype("struct")
            .with_attribute(Attribute::new("x", "int"))
            .with_attribute(Attribute::new("y", "int"))],
        vec![],
    )
    .unwrap();

    let cpp = render(model.clone(), Language::Cpp, "Point");
    assert!(cpp.contains("struct Point\n{\n    int x;\n    int y;\n};"));
    let java = render(model.clone(), Language::Java, "Point");
    assert!(java.contains("public record Point(int x, int y) {"));
    let python = render(model.clone(), Language::Python, "Point");
    assert!(python.contains("@dataclass\nclass Point:"));
    let ruby = render(model, Language::Ruby, "Point");
    assert!(ruby.contains("Point = Struct.new(:x, :y)"));
}

#[test]
fn corba_stereotype_is_not_implemented() {
    let model = Model::from_parts(
        vec![],
        vec![Classifier::new("c", "Remote").with_stereotype("CORBAInterface")],
        vec![],
    )
    .unwrap();
    for language in Language::ALL {
        let text = render(model.clone(), language, "Remote");
        assert!(
            text.contains("stereotype <<CORBAInterface>> is not yet implemented"),
            "{language}: {text}"
        );
    }
}

// --- Dangling references ---

#[test]
fn unresolved_member_type_becomes_a_comment() {
    let model = Model::from_parts(
        vec![],
        vec![Classifier::new("o", "Order")
            .with_attribute(Attribute::new("owner", "Customer").with_type_ref("missing"))],
        vec![],
    )
    .unwrap();
    let java = render(model.clone(), Language::Java, "Order");
    assert!(java.contains("// unresolved type 'Customer' for member 'owner'"));
    assert!(!java.contains("Customer owner;"));

    let python = render(model, Language::Python, "Order");
    assert!(python.contains("# unresolved type 'Customer' for member 'owner'"));
}

// --- Policy ---

#[test]
fn line_endings_follow_policy() {
    let policy = CodeGenerationPolicy {
        line_ending: umbrello_codegen::policy::LineEnding::Dos,
        ..Default::default()
    };
    let text = render_with(pair_model(), policy, Language::Java, "Pair");
    assert_eq!(text, "public enum Pair {\r\n    A,\r\n    B,\r\n    C\r\n}\r\n");
}

#[test]
fn verbose_sections_add_banners() {
    let policy = CodeGenerationPolicy {
        verbose_section_comments: true,
        ..Default::default()
    };
    let text = render_with(animal_model(), policy, Language::Java, "Animal");
    assert!(text.contains("// Public fields"));
}

#[test]
fn rendering_is_deterministic() {
    for language in Language::ALL {
        let a = render(shop_model(), language, "Order");
        let b = render(shop_model(), language, "Order");
        assert_eq!(a, b);
    }
}

// --- Templates, literal bodies, enum values ---

#[test]
fn template_class_cpp() {
    let model = Model::from_parts(
        vec![],
        vec![Classifier::new("box", "Box")
            .with_template(TemplateParameter::new("T", "class"))
            .with_operation(
                Operation::new("size", "int")
                    .const_()
                    .with_source("return 1;")
                    .with_doc("Number of items"),
            )],
        vec![],
    )
    .unwrap();
    let generator = generator(model, Language::Cpp);
    let units = generator.render_at(generator.classifier("box").unwrap(), fixed_time());
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].path, std::path::PathBuf::from("Box.h"));

    let text = &units[0].contents;
    assert!(text.contains("template<class T>\nclass Box\n{"));
    assert!(text.contains("Number of items"));
    assert!(text.contains("int size() const;"));
    let definition = text
        .find("template<class T>\nint Box<T>::size() const\n{\n    return 1;\n}")
        .unwrap();
    assert!(definition > text.find("};").unwrap());
    assert!(definition < text.find("#endif // BOX_H").unwrap());
    assert!(text.contains("template<class T>\nBox<T>::Box()"));
}

#[test]
fn template_class_with_collection_includes_algorithm() {
    let model = Model::from_parts(
        vec![],
        vec![
            Classifier::new("box", "Box").with_template(TemplateParameter::new("T", "class")),
            Classifier::new("item", "LineItem"),
        ],
        vec![Association::new(
            "a1",
            AssociationKind::Association,
            AssociationEnd::new("box"),
            AssociationEnd::new("item").role("items").multiplicity("*"),
        )],
    )
    .unwrap();
    let generator = generator(model, Language::Cpp);
    let units = generator.render_at(generator.classifier("box").unwrap(), fixed_time());
    assert_eq!(units.len(), 1);
    assert!(units[0].contents.contains("#include <algorithm>"));
    assert!(units[0].contents.contains("void Box<T>::removeItems(LineItem* value)"));
}

#[test]
fn inline_accessors_include_algorithm_in_header() {
    let mut policy = CodeGenerationPolicy::default();
    policy.cpp.accessors_are_inline = true;
    let generator = umbrello_codegen::CodeGenerator::new(order_model(), policy, Language::Cpp).unwrap();
    let units = generator.render_at(generator.classifier("order").unwrap(), fixed_time());

    let header = units.iter().find(|u| u.path.ends_with("Order.h")).unwrap();
    assert!(header.contents.contains("std::remove("));
    assert!(header.contents.contains("#include <algorithm>"));
    assert!(header.contents.contains("void addItems(LineItem* value) { items.push_back(value); }"));

    let source = units.iter().find(|u| u.path.ends_with("Order.cpp")).unwrap();
    assert!(!source.contents.contains("<algorithm>"));
    assert!(!source.contents.contains("addItems"));
}

#[test]
fn enum_literal_values() {
    let level = Classifier::new("level", "Level")
        .with_kind(BaseKind::Enum)
        .with_doc("Severity")
        .with_literal(EnumLiteral::new("LOW"))
        .with_literal(EnumLiteral::new("HIGH").with_value("5"))
        .with_literal(EnumLiteral::new("TOP"));
    let model = Model::from_parts(vec![], vec![level], vec![]).unwrap();

    let ruby = render(model.clone(), Language::Ruby, "level");
    assert!(ruby.contains("LOW = 0\n"));
    assert!(ruby.contains("HIGH = 5\n"));
    assert!(ruby.contains("TOP = 6\n"));

    let python = render(model.clone(), Language::Python, "level");
    assert!(python.contains("class Level(Enum):"));
    assert!(python.contains("Severity"));
    assert!(python.contains("LOW = auto()"));
    assert!(python.contains("HIGH = 5"));

    let cpp = render(model, Language::Cpp, "level");
    assert!(cpp.contains("HIGH = 5,"));
}
