//! Identifier sanitizing and reserved word handling
//!
//! Every name that ends up in generated source passes through here: member,
//! method and parameter names are cleaned to word characters and escaped
//! when they collide with a keyword of the target language. Keyword tables
//! are compile-time perfect hash sets.

use std::sync::OnceLock;

use heck::{ToSnakeCase, ToUpperCamelCase};
use phf::phf_set;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Placeholder for names that clean down to nothing
pub const PLACEHOLDER_NAME: &str = "unnamed";

/// How member and method base names are rewritten before escaping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModifyNamePolicy {
    /// Keep names as modelled
    #[default]
    No,
    /// `firstName` becomes `first_name`
    Underscore,
    /// `firstName` becomes `FirstName`
    Capitalise,
}

impl ModifyNamePolicy {
    pub fn apply(&self, name: &str) -> String {
        match self {
            ModifyNamePolicy::No => name.to_string(),
            ModifyNamePolicy::Underscore => name.to_snake_case(),
            ModifyNamePolicy::Capitalise => name.to_upper_camel_case(),
        }
    }
}

static CPP_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor",
    "bool", "break", "case", "catch", "char", "char8_t", "char16_t", "char32_t",
    "class", "compl", "concept", "const", "consteval", "constexpr", "constinit",
    "const_cast", "continue", "co_await", "co_return", "co_yield", "decltype",
    "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept",
    "not", "not_eq", "nullptr", "operator", "or", "or_eq", "private",
    "protected", "public", "register", "reinterpret_cast", "requires", "return",
    "short", "signed", "sizeof", "static", "static_assert", "static_cast",
    "struct", "switch", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
};

static JAVA_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "default", "do", "double", "else", "enum",
    "extends", "false", "final", "finally", "float", "for", "goto", "if",
    "implements", "import", "instanceof", "int", "interface", "long", "native",
    "new", "null", "package", "permits", "private", "protected", "public",
    "record", "return", "sealed", "short", "static", "strictfp", "super",
    "switch", "synchronized", "this", "throw", "throws", "transient", "true",
    "try", "var", "void", "volatile", "while", "yield",
};

static PYTHON_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "exec",
    "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "object", "or", "pass", "print", "raise", "return",
    "self", "try", "while", "with", "yield",
};

static RUBY_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "__ENCODING__", "__FILE__", "__LINE__", "BEGIN", "END", "alias", "and",
    "begin", "break", "case", "class", "def", "defined", "do", "else", "elsif",
    "end", "ensure", "false", "for", "if", "in", "module", "next", "nil",
    "not", "or", "redo", "rescue", "retry", "return", "self", "super", "then",
    "true", "undef", "unless", "until", "when", "while", "yield",
};

fn keyword_table(language: Language) -> &'static phf::Set<&'static str> {
    match language {
        Language::Cpp => &CPP_KEYWORDS,
        Language::Java => &JAVA_KEYWORDS,
        Language::Python => &PYTHON_KEYWORDS,
        Language::Ruby => &RUBY_KEYWORDS,
    }
}

/// Reserved words of a language, sorted
pub fn reserved_keywords(language: Language) -> Vec<&'static str> {
    let mut words: Vec<&'static str> = keyword_table(language).iter().copied().collect();
    words.sort_unstable();
    words
}

/// Replace every run of non-word characters with `_`.
///
/// A leading digit gets a `_` prefix and an empty name becomes
/// [`PLACEHOLDER_NAME`]. The result only contains word characters, so
/// cleaning is idempotent.
pub fn clean_name(name: &str) -> String {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    let re = NON_WORD.get_or_init(|| Regex::new(r"\W+").expect("non-word regex must compile"));

    let cleaned = re.replace_all(name, "_");
    match cleaned.chars().next() {
        None => PLACEHOLDER_NAME.to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{}", cleaned),
        Some(_) => cleaned.into_owned(),
    }
}

/// Whether `name` is a reserved word of `language`
pub fn is_reserved_keyword(language: Language, name: &str) -> bool {
    let table = keyword_table(language);
    if language.is_case_sensitive() {
        table.contains(name)
    } else {
        table.iter().any(|keyword| keyword.eq_ignore_ascii_case(name))
    }
}

/// Clean `name` and mark a keyword collision with a trailing `_`
pub fn safe_identifier(language: Language, name: &str) -> String {
    let cleaned = clean_name(name);
    if is_reserved_keyword(language, &cleaned) {
        format!("{}_", cleaned)
    } else {
        cleaned
    }
}

/// Apply the name policy, then sanitize for `language`
pub fn member_identifier(language: Language, policy: ModifyNamePolicy, name: &str) -> String {
    safe_identifier(language, &policy.apply(&clean_name(name)))
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
