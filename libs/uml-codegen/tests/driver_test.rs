use std::fs;
use std::path::{Path, PathBuf};

use umbrello_codegen::{
    CodeGenerationPolicy, CodeGenerator, Error, FixedAnswer, GenerationDriver, GenerationObserver,
    GenerationStatus, Language, NoopObserver, OverwriteAnswer, OverwriteChoice, OverwritePolicy,
    OverwritePrompt,
};
use umbrello_model::Classifier;

mod test_support;

use test_support::*;

#[derive(Default)]
struct Recorder {
    generated: Vec<(String, bool)>,
    written: Vec<PathBuf>,
    budget: Option<usize>,
}

impl GenerationObserver for Recorder {
    fn code_generated(&mut self, classifier: &Classifier, success: bool) {
        self.generated.push((classifier.name.clone(), success));
    }

    fn file_written(&mut self, path: &Path) {
        self.written.push(path.to_path_buf());
    }

    fn should_continue(&mut self) -> bool {
        match self.budget.as_mut() {
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
            None => true,
        }
    }
}

/// Prompt answering from a script, recording what it was asked about
struct Scripted {
    answers: Vec<OverwriteAnswer>,
    asked: Vec<PathBuf>,
}

impl OverwritePrompt for &mut Scripted {
    fn ask(&mut self, existing: &Path) -> OverwriteAnswer {
        self.asked.push(existing.to_path_buf());
        self.answers.remove(0)
    }
}

fn generator_in(dir: &Path, language: Language, overwrite: OverwritePolicy) -> CodeGenerator {
    let mut policy = policy_in(dir);
    policy.overwrite_policy = overwrite;
    CodeGenerator::new(shop_model(), policy, language).unwrap()
}

#[test]
fn writes_one_file_per_unit_under_package_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator_in(dir.path(), Language::Cpp, OverwritePolicy::Ok);
    let mut recorder = Recorder::default();
    let report = generator.generate_all(&mut recorder, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

    assert!(report.is_success());
    assert_eq!(report.generated(), 3);
    assert_eq!(report.skipped(), 1);
    assert!(dir.path().join("shop/Order.h").exists());
    assert!(dir.path().join("shop/Order.cpp").exists());
    assert!(dir.path().join("shop/billing/Invoice.h").exists());
    assert_eq!(recorder.written.len(), 6);
    assert_eq!(
        recorder.generated,
        vec![
            ("Entity".to_string(), true),
            ("Order".to_string(), true),
            ("Invoice".to_string(), true),
        ]
    );

    let header = fs::read_to_string(dir.path().join("shop/Order.h")).unwrap();
    assert!(header.contains("class Order : virtual public Entity"));
}

#[test]
fn datatypes_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator_in(dir.path(), Language::Java, OverwritePolicy::Ok);
    let report = generator.generate_all(&mut NoopObserver, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

    let outcome = report.outcome("int").unwrap();
    assert!(matches!(outcome.status, GenerationStatus::Skipped { .. }));
    assert!(!dir.path().join("int.java").exists());
}

#[test]
fn cancel_policy_fails_only_the_colliding_classifier() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("shop")).unwrap();
    fs::write(dir.path().join("shop/Order.java"), "// hand written\n").unwrap();

    let generator = generator_in(dir.path(), Language::Java, OverwritePolicy::Cancel);
    let mut recorder = Recorder::default();
    let report = generator.generate_all(&mut recorder, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

    assert!(!report.is_success());
    assert_eq!(report.failed(), 1);
    assert_eq!(report.generated(), 2);
    match &report.outcome("Order").unwrap().status {
        GenerationStatus::Failed { reason } => assert!(reason.contains("cancelled")),
        other => panic!("unexpected status {:?}", other),
    }
    assert!(recorder.generated.contains(&("Order".to_string(), false)));
    // the existing file is left alone
    assert_eq!(
        fs::read_to_string(dir.path().join("shop/Order.java")).unwrap(),
        "// hand written\n"
    );
    assert!(dir.path().join("shop/billing/Invoice.java").exists());
}

#[test]
fn never_policy_renames() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("shop")).unwrap();
    fs::write(dir.path().join("shop/Order.py"), "").unwrap();

    let generator = generator_in(dir.path(), Language::Python, OverwritePolicy::Never);
    let report = generator.generate_all(&mut NoopObserver, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

    assert!(report.is_success());
    assert!(dir.path().join("shop/Order__1.py").exists());
    assert_eq!(fs::read_to_string(dir.path().join("shop/Order.py")).unwrap(), "");
}

#[test]
fn ask_policy_apply_to_all() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("shop/billing")).unwrap();
    fs::write(dir.path().join("shop/Order.rb"), "").unwrap();
    fs::write(dir.path().join("shop/billing/Invoice.rb"), "").unwrap();

    let mut prompt = Scripted {
        answers: vec![OverwriteAnswer {
            choice: OverwriteChoice::Overwrite,
            apply_to_all: true,
        }],
        asked: Vec::new(),
    };
    let generator = generator_in(dir.path(), Language::Ruby, OverwritePolicy::Ask);
    let report = generator.generate_all(&mut NoopObserver, Box::new(&mut prompt));

    assert!(report.is_success());
    assert_eq!(prompt.asked, vec![dir.path().join("shop/Order.rb")]);
    let invoice = fs::read_to_string(dir.path().join("shop/billing/Invoice.rb")).unwrap();
    assert!(invoice.contains("class Invoice"));
}

#[test]
fn observer_can_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator_in(dir.path(), Language::Java, OverwritePolicy::Ok);
    let mut recorder = Recorder {
        budget: Some(1),
        ..Default::default()
    };
    let report = generator.generate_all(&mut recorder, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

    assert!(report.stopped_early);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(recorder.generated, vec![("Entity".to_string(), true)]);
}

#[test]
fn generate_named_classifiers_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator_in(dir.path(), Language::Java, OverwritePolicy::Ok);
    let report = generator
        .generate(
            &["Invoice", "order"],
            &mut NoopObserver,
            Box::new(FixedAnswer(OverwriteChoice::Cancel)),
        )
        .unwrap();
    let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Invoice", "Order"]);

    let err = generator
        .generate(&["Nope"], &mut NoopObserver, Box::new(FixedAnswer(OverwriteChoice::Cancel)))
        .unwrap_err();
    assert!(matches!(err, Error::ClassifierNotFound(name) if name == "Nope"));
}

#[test]
fn headings_are_expanded() {
    let dir = tempfile::tempdir().unwrap();
    let headings = tempfile::tempdir().unwrap();
    fs::write(
        headings.path().join("heading.java"),
        "// %filename% generated by %author% on %date%\n",
    )
    .unwrap();

    let policy = CodeGenerationPolicy {
        output_directory: dir.path().to_path_buf(),
        include_headings: true,
        headings_directory: headings.path().to_path_buf(),
        author: Some("Ada".to_string()),
        ..Default::default()
    };
    let generator = CodeGenerator::new(animal_model(), policy, Language::Java).unwrap();
    let classifier = generator.classifier("Animal").unwrap();
    let units = generator.render_at(classifier, fixed_time());
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].path, PathBuf::from("Animal.java"));
    assert!(units[0]
        .contents
        .starts_with("// Animal.java generated by Ada on 2024-05-17\n"));
}

#[test]
fn generate_from_file_loads_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    fs::write(
        &model_path,
        umbrello_model::loader::to_json_string(&order_model()).unwrap(),
    )
    .unwrap();

    let out = dir.path().join("out");
    let report = umbrello_codegen::generate_from_file(&model_path, Language::Java, policy_in(&out)).unwrap();
    assert_eq!(report.generated(), 2);
    assert!(out.join("Order.java").exists());
    assert!(out.join("LineItem.java").exists());
}

#[test]
fn driver_uses_fixed_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let headings = tempfile::tempdir().unwrap();
    fs::write(headings.path().join("heading.py"), "# %date% %time%\n").unwrap();

    let model = animal_model();
    let policy = CodeGenerationPolicy {
        output_directory: dir.path().to_path_buf(),
        include_headings: true,
        headings_directory: headings.path().to_path_buf(),
        ..Default::default()
    };
    let mut driver = GenerationDriver::new(
        &model,
        &policy,
        Language::Python,
        Box::new(FixedAnswer(OverwriteChoice::Cancel)),
    )
    .with_timestamp(fixed_time());
    let classifiers: Vec<&Classifier> = model.classifiers().collect();
    let report = driver.generate(&classifiers, &mut NoopObserver);

    assert!(report.is_success());
    let text = fs::read_to_string(dir.path().join("Animal.py")).unwrap();
    assert!(text.starts_with("# 2024-05-17 09:30:00\n"));
}
