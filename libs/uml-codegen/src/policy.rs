//! Formatting and generation policy
//!
//! A [`CodeGenerationPolicy`] is a plain value resolved before a run starts
//! (defaults, optional file, environment, command line) and passed to the
//! generators explicitly. Every field has a default so partial policy files
//! deserialize.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::naming::ModifyNamePolicy;

/// Upper bound on lines read from a heading file
pub const MAX_HEADING_LINES: usize = 500;

/// What to do when a target file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Overwrite the existing file
    Ok,
    /// Consult the overwrite prompt
    #[default]
    Ask,
    /// Never overwrite; pick a fresh `name__N` file instead
    Never,
    /// Give up on the file
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentationType {
    None,
    Tab,
    #[default]
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Unix,
    Dos,
    Mac,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Unix => "\n",
            LineEnding::Dos => "\r\n",
            LineEnding::Mac => "\r",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    SingleLine,
    #[default]
    MultiLine,
}

/// C++ specific options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CppPolicy {
    pub accessors_are_inline: bool,
    pub operations_are_inline: bool,
    pub destructors_are_virtual: bool,
    /// Map packages to namespaces
    pub package_is_namespace: bool,
    /// Group every accessor under `public:` regardless of member visibility
    pub accessors_are_public: bool,
    pub getter_with_get_prefix: bool,
    /// Strip the member prefix (`m_`) when deriving accessor names
    pub remove_prefix_from_accessor_methods: bool,
    pub accessor_methods_start_with_upper_case: bool,
    pub string_class_name: String,
    pub string_class_include: String,
    pub vector_class_name: String,
    pub vector_class_include: String,
    /// Prefix for generated data members, e.g. `m_`
    pub class_member_prefix: String,
    /// Tag character for documentation commands (`@param` or `\param`)
    pub doc_tool_tag: String,
}

impl Default for CppPolicy {
    fn default() -> Self {
        Self {
            accessors_are_inline: false,
            operations_are_inline: false,
            destructors_are_virtual: true,
            package_is_namespace: true,
            accessors_are_public: true,
            getter_with_get_prefix: true,
            remove_prefix_from_accessor_methods: false,
            accessor_methods_start_with_upper_case: true,
            string_class_name: "std::string".to_string(),
            string_class_include: "<string>".to_string(),
            vector_class_name: "std::vector".to_string(),
            vector_class_include: "<vector>".to_string(),
            class_member_prefix: String::new(),
            doc_tool_tag: "@".to_string(),
        }
    }
}

/// Java specific options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaPolicy {
    /// Declared type of collection fields
    pub collection_interface: String,
    /// Class instantiated for collection fields
    pub collection_class: String,
}

impl Default for JavaPolicy {
    fn default() -> Self {
        Self {
            collection_interface: "List".to_string(),
            collection_class: "ArrayList".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeGenerationPolicy {
    pub output_directory: PathBuf,
    /// Mirror packages as directories below the output directory
    pub create_package_dirs: bool,
    pub headings_directory: PathBuf,
    pub include_headings: bool,
    /// Value of `%author%` in headings; `$USER` when unset
    pub author: Option<String>,
    pub overwrite_policy: OverwritePolicy,
    pub modify_name_policy: ModifyNamePolicy,
    pub line_ending: LineEnding,
    pub indentation_type: IndentationType,
    pub indentation_amount: usize,
    pub comment_style: CommentStyle,
    pub verbose_section_comments: bool,
    pub verbose_document_comments: bool,
    pub auto_generate_constructors: bool,
    pub auto_generate_attrib_accessors: bool,
    pub auto_generate_assoc_accessors: bool,
    pub cpp: CppPolicy,
    pub java: JavaPolicy,
}

impl Default for CodeGenerationPolicy {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("uml-generated-code"),
            create_package_dirs: true,
            headings_directory: PathBuf::from("headings"),
            include_headings: false,
            author: None,
            overwrite_policy: OverwritePolicy::default(),
            modify_name_policy: ModifyNamePolicy::default(),
            line_ending: LineEnding::default(),
            indentation_type: IndentationType::default(),
            indentation_amount: 4,
            comment_style: CommentStyle::default(),
            verbose_section_comments: false,
            verbose_document_comments: false,
            auto_generate_constructors: true,
            auto_generate_attrib_accessors: true,
            auto_generate_assoc_accessors: true,
            cpp: CppPolicy::default(),
            java: JavaPolicy::default(),
        }
    }
}

impl CodeGenerationPolicy {
    /// One level of indentation
    pub fn indentation(&self) -> String {
        let unit = match self.indentation_type {
            IndentationType::None => "",
            IndentationType::Tab => "\t",
            IndentationType::Space => " ",
        };
        unit.repeat(self.indentation_amount)
    }

    pub fn line_ending(&self) -> &'static str {
        self.line_ending.as_str()
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_directory.as_os_str().is_empty() {
            return Err(Error::InvalidPolicy(
                "output_directory must not be empty".to_string(),
            ));
        }
        if self.cpp.string_class_name.trim().is_empty() {
            return Err(Error::InvalidPolicy(
                "cpp.string_class_name must not be empty".to_string(),
            ));
        }
        if self.cpp.vector_class_name.trim().is_empty() {
            return Err(Error::InvalidPolicy(
                "cpp.vector_class_name must not be empty".to_string(),
            ));
        }
        if self.java.collection_interface.trim().is_empty()
            || self.java.collection_class.trim().is_empty()
        {
            return Err(Error::InvalidPolicy(
                "java collection types must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn author_name(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_default()
    }

    /// Heading text for a generated file, if headings are enabled and found.
    ///
    /// `name` is either an extension starting with `.` (`.h`, `.java`), in
    /// which case `heading<ext>` or else the first file ending in `<ext>` in
    /// the headings directory is used, or a literal file name there.
    pub fn heading(
        &self,
        name: &str,
        file_name: &str,
        file_path: &Path,
        now: &DateTime<Local>,
    ) -> Option<String> {
        if !self.include_headings {
            return None;
        }
        if name.contains(' ') || name.contains(';') {
            tracing::warn!(name, "heading file names must not contain blanks or ';'");
            return None;
        }

        let heading_path = self.find_heading_file(name)?;
        let text = match fs::read_to_string(&heading_path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %heading_path.display(), error = %err, "could not read heading file");
                return None;
            }
        };

        let endl = self.line_ending();
        let mut heading = String::new();
        for line in text.lines().take(MAX_HEADING_LINES) {
            heading.push_str(line);
            heading.push_str(endl);
        }

        let heading = heading
            .replace("%filename%", file_name)
            .replace("%filepath%", &file_path.display().to_string())
            .replace("%author%", &self.author_name())
            .replace("%headingpath%", &heading_path.display().to_string())
            .replace("%time%", &now.format("%H:%M:%S").to_string())
            .replace("%date%", &now.format("%Y-%m-%d").to_string());
        Some(heading)
    }

    fn find_heading_file(&self, name: &str) -> Option<PathBuf> {
        let dir = &self.headings_directory;
        if !name.starts_with('.') {
            let path = dir.join(name);
            return path.is_file().then_some(path);
        }

        let preferred = dir.join(format!("heading{}", name));
        if preferred.is_file() {
            return Some(preferred);
        }

        let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|f| f.to_str())
                        .is_some_and(|f| f.ends_with(name))
            })
            .collect();
        candidates.sort();
        candidates.into_iter().next()
    }
}
