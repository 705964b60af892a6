//! Output path resolution
//!
//! Maps a classifier and a file extension to the path its code is written
//! to, applying the overwrite policy. One [`OutputResolver`] lives for one
//! generation run: it remembers the base name handed out per classifier,
//! the paths claimed so far and any "apply to all" answer from the prompt.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use umbrello_model::{Classifier, Model, ObjectId};

use crate::error::{Error, Result};
use crate::language::Language;
use crate::policy::{CodeGenerationPolicy, OverwritePolicy};

/// Answer to an overwrite question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    Overwrite,
    /// Generate under a fresh `name__N` file instead
    Rename,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverwriteAnswer {
    pub choice: OverwriteChoice,
    /// Use this choice for all remaining files of the run
    pub apply_to_all: bool,
}

/// Asked when the policy is [`OverwritePolicy::Ask`] and the target exists
pub trait OverwritePrompt {
    fn ask(&mut self, existing: &Path) -> OverwriteAnswer;
}

/// Prompt that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub OverwriteChoice);

impl OverwritePrompt for FixedAnswer {
    fn ask(&mut self, _existing: &Path) -> OverwriteAnswer {
        OverwriteAnswer {
            choice: self.0,
            apply_to_all: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    Path(PathBuf),
    Cancelled,
}

/// Relative base path (no extension) a classifier is written to before any
/// collision handling: `pkg/sub/Name` with package directories, else the
/// fully qualified name joined with `-`.
pub fn natural_base_name(
    model: &Model,
    classifier: &Classifier,
    language: Language,
    create_package_dirs: bool,
) -> PathBuf {
    let segments: Vec<String> = model
        .package_segments(classifier.package.as_deref())
        .into_iter()
        .map(file_segment)
        .collect();
    let name = file_segment(&classifier.name);

    let base = if create_package_dirs {
        let mut path: PathBuf = segments.iter().collect();
        path.push(name);
        path
    } else {
        let mut parts = segments;
        parts.push(name);
        PathBuf::from(parts.join("-"))
    };

    if language.is_case_sensitive() {
        base
    } else {
        PathBuf::from(base.to_string_lossy().to_lowercase())
    }
}

fn file_segment(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

fn with_extension(base: &Path, extension: &str) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(extension);
    PathBuf::from(s)
}

pub struct OutputResolver<'p> {
    output_directory: PathBuf,
    create_package_dirs: bool,
    language: Language,
    /// Effective policy; an "apply to all" answer replaces it for the rest of the run
    policy: OverwritePolicy,
    prompt: Box<dyn OverwritePrompt + 'p>,
    assigned: HashMap<ObjectId, PathBuf>,
    claimed: HashSet<PathBuf>,
}

impl<'p> OutputResolver<'p> {
    pub fn new(
        policy: &CodeGenerationPolicy,
        language: Language,
        prompt: Box<dyn OverwritePrompt + 'p>,
    ) -> Self {
        Self {
            output_directory: policy.output_directory.clone(),
            create_package_dirs: policy.create_package_dirs,
            language,
            policy: policy.overwrite_policy,
            prompt,
            assigned: HashMap::new(),
            claimed: HashSet::new(),
        }
    }

    pub fn effective_policy(&self) -> OverwritePolicy {
        self.policy
    }

    /// Resolve the output path of `classifier` for `extension` (with leading dot).
    ///
    /// Creates the output and package directories as needed.
    pub fn resolve(
        &mut self,
        model: &Model,
        classifier: &Classifier,
        extension: &str,
    ) -> Result<ResolvedPath> {
        if let Some(base) = self.assigned.get(&classifier.id) {
            let path = self.output_directory.join(with_extension(base, extension));
            self.claimed.insert(path.clone());
            return Ok(ResolvedPath::Path(path));
        }

        let base = natural_base_name(model, classifier, self.language, self.create_package_dirs);
        let directory = match base.parent() {
            Some(parent) => self.output_directory.join(parent),
            None => self.output_directory.clone(),
        };
        fs::create_dir_all(&directory).map_err(|source| Error::CreateDirectory {
            path: directory.clone(),
            source,
        })?;

        let candidate = self.output_directory.join(with_extension(&base, extension));
        let base = if self.is_taken(&candidate) {
            match self.on_collision(&candidate) {
                OverwriteChoice::Overwrite => base,
                OverwriteChoice::Rename => self.fresh_base(&base, extension),
                OverwriteChoice::Cancel => {
                    tracing::warn!(path = %candidate.display(), "output cancelled, file exists");
                    return Ok(ResolvedPath::Cancelled);
                }
            }
        } else {
            base
        };

        let path = self.output_directory.join(with_extension(&base, extension));
        tracing::debug!(classifier = %classifier.name, path = %path.display(), "resolved output path");
        self.assigned.insert(classifier.id.clone(), base);
        self.claimed.insert(path.clone());
        Ok(ResolvedPath::Path(path))
    }

    fn is_taken(&self, path: &Path) -> bool {
        path.exists() || self.claimed.contains(path)
    }

    fn on_collision(&mut self, existing: &Path) -> OverwriteChoice {
        match self.policy {
            OverwritePolicy::Ok => OverwriteChoice::Overwrite,
            OverwritePolicy::Never => OverwriteChoice::Rename,
            OverwritePolicy::Cancel => OverwriteChoice::Cancel,
            OverwritePolicy::Ask => {
                let answer = self.prompt.ask(existing);
                if answer.apply_to_all {
                    self.policy = match answer.choice {
                        OverwriteChoice::Overwrite => OverwritePolicy::Ok,
                        OverwriteChoice::Rename => OverwritePolicy::Never,
                        OverwriteChoice::Cancel => OverwritePolicy::Cancel,
                    };
                }
                answer.choice
            }
        }
    }

    /// First `base__N` (N from 1) whose file does not exist yet
    fn fresh_base(&self, base: &Path, extension: &str) -> PathBuf {
        let mut n = 1usize;
        loop {
            let mut candidate = base.as_os_str().to_os_string();
            candidate.push(format!("__{}", n));
            let candidate = PathBuf::from(candidate);
            if !self.is_taken(&self.output_directory.join(with_extension(&candidate, extension))) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbrello_model::Package;

    fn model() -> Model {
        Model::from_parts(
            vec![
                Package::new("p", "shop"),
                Package::new("q", "orders").with_parent("p"),
            ],
            vec![
                Classifier::new("a", "Order").with_package("q"),
                Classifier::new("b", "Line Item"),
                Classifier::new("c", "Order"),
            ],
            vec![],
        )
        .unwrap()
    }

    fn policy(dir: &Path, overwrite: OverwritePolicy) -> CodeGenerationPolicy {
        CodeGenerationPolicy {
            output_directory: dir.to_path_buf(),
            overwrite_policy: overwrite,
            ..Default::default()
        }
    }

    fn path(resolved: ResolvedPath) -> PathBuf {
        match resolved {
            ResolvedPath::Path(p) => p,
            ResolvedPath::Cancelled => panic!("unexpected cancel"),
        }
    }

    #[test]
    fn test_natural_base_names() {
        let model = model();
        let order = model.classifier("a").unwrap();
        let item = model.classifier("b").unwrap();

        assert_eq!(
            natural_base_name(&model, order, Language::Java, true),
            PathBuf::from("shop/orders/Order")
        );
        assert_eq!(
            natural_base_name(&model, order, Language::Java, false),
            PathBuf::from("shop-orders-Order")
        );
        assert_eq!(
            natural_base_name(&model, item, Language::Java, true),
            PathBuf::from("Line_Item")
        );
    }

    #[test]
    fn test_creates_package_directories() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let policy = policy(dir.path(), OverwritePolicy::Ok);
        let mut resolver = OutputResolver::new(&policy, Language::Java, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

        let p = path(resolver.resolve(&model, model.classifier("a").unwrap(), ".java").unwrap());
        assert_eq!(p, dir.path().join("shop/orders/Order.java"));
        assert!(dir.path().join("shop/orders").is_dir());
    }

    #[test]
    fn test_never_picks_fresh_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Order.java"), "").unwrap();
        fs::write(dir.path().join("Order__1.java"), "").unwrap();
        let model = model();
        let policy = policy(dir.path(), OverwritePolicy::Never);
        let mut resolver = OutputResolver::new(&policy, Language::Java, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

        let p = path(resolver.resolve(&model, model.classifier("c").unwrap(), ".java").unwrap());
        assert_eq!(p, dir.path().join("Order__2.java"));
    }

    #[test]
    fn test_memoized_base_shared_across_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Order.h"), "").unwrap();
        let model = model();
        let policy = policy(dir.path(), OverwritePolicy::Never);
        let mut resolver = OutputResolver::new(&policy, Language::Cpp, Box::new(FixedAnswer(OverwriteChoice::Cancel)));
        let order = model.classifier("c").unwrap();

        let header = path(resolver.resolve(&model, order, ".h").unwrap());
        let source = path(resolver.resolve(&model, order, ".cpp").unwrap());
        assert_eq!(header, dir.path().join("Order__1.h"));
        assert_eq!(source, dir.path().join("Order__1.cpp"));
    }

    #[test]
    fn test_ok_overwrites_and_cancel_gives_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Order.rb"), "").unwrap();
        let model = model();
        let order = model.classifier("c").unwrap();

        let ok = policy(dir.path(), OverwritePolicy::Ok);
        let mut resolver = OutputResolver::new(&ok, Language::Ruby, Box::new(FixedAnswer(OverwriteChoice::Cancel)));
        assert_eq!(
            resolver.resolve(&model, order, ".rb").unwrap(),
            ResolvedPath::Path(dir.path().join("Order.rb"))
        );

        let cancel = policy(dir.path(), OverwritePolicy::Cancel);
        let mut resolver = OutputResolver::new(&cancel, Language::Ruby, Box::new(FixedAnswer(OverwriteChoice::Overwrite)));
        assert_eq!(resolver.resolve(&model, order, ".rb").unwrap(), ResolvedPath::Cancelled);
    }

    struct CountingPrompt {
        asked: usize,
        answer: OverwriteAnswer,
    }

    impl OverwritePrompt for &mut CountingPrompt {
        fn ask(&mut self, _existing: &Path) -> OverwriteAnswer {
            self.asked += 1;
            self.answer
        }
    }

    #[test]
    fn test_ask_apply_to_all_switches_policy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Order.py"), "").unwrap();
        fs::write(dir.path().join("Line_Item.py"), "").unwrap();
        let model = model();
        let policy = policy(dir.path(), OverwritePolicy::Ask);
        let mut prompt = CountingPrompt {
            asked: 0,
            answer: OverwriteAnswer {
                choice: OverwriteChoice::Rename,
                apply_to_all: true,
            },
        };

        {
            let mut resolver = OutputResolver::new(&policy, Language::Python, Box::new(&mut prompt));
            let first = path(resolver.resolve(&model, model.classifier("c").unwrap(), ".py").unwrap());
            let second = path(resolver.resolve(&model, model.classifier("b").unwrap(), ".py").unwrap());
            assert_eq!(first, dir.path().join("Order__1.py"));
            assert_eq!(second, dir.path().join("Line_Item__1.py"));
            assert_eq!(resolver.effective_policy(), OverwritePolicy::Never);
        }
        assert_eq!(prompt.asked, 1);
    }

    #[test]
    fn test_claimed_paths_count_as_taken() {
        let dir = tempfile::tempdir().unwrap();
        let model = Model::from_parts(
            vec![],
            vec![Classifier::new("x", "Dup"), Classifier::new("y", "Dup")],
            vec![],
        )
        .unwrap();
        let policy = policy(dir.path(), OverwritePolicy::Never);
        let mut resolver = OutputResolver::new(&policy, Language::Java, Box::new(FixedAnswer(OverwriteChoice::Cancel)));

        let first = path(resolver.resolve(&model, model.classifier("x").unwrap(), ".java").unwrap());
        let second = path(resolver.resolve(&model, model.classifier("y").unwrap(), ".java").unwrap());
        assert_ne!(first, second);
    }
}
