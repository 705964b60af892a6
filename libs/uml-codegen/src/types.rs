//! Type name mapping per target language

use crate::language::Language;
use crate::policy::CodeGenerationPolicy;

const CPP_DATATYPES: &[&str] = &[
    "char",
    "int",
    "float",
    "double",
    "bool",
    "string",
    "unsigned char",
    "signed char",
    "unsigned int",
    "signed int",
    "short int",
    "unsigned short int",
    "signed short int",
    "long int",
    "signed long int",
    "unsigned long int",
    "long double",
    "wchar_t",
];

const JAVA_DATATYPES: &[&str] = &[
    "int",
    "char",
    "boolean",
    "float",
    "double",
    "byte",
    "short",
    "long",
    "String",
    "Integer",
    "Character",
    "Boolean",
    "Float",
    "Double",
    "Byte",
    "Short",
    "Long",
    "StringBuffer",
    "StringBuilder",
];

const PYTHON_DATATYPES: &[&str] = &[
    "array", "bool", "tuple", "float", "int", "list", "long", "dict", "object", "set", "str",
];

const RUBY_DATATYPES: &[&str] = &[
    "String", "Symbol", "Integer", "Float", "Array", "Hash", "Range", "Regexp", "Proc",
];

/// Maps model type names to the spelling of one target language.
///
/// Mapping is total and has no side effects; callers that need an include
/// or import for a mapped type inspect the result themselves.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    language: Language,
    cpp_string_class: String,
}

impl TypeMapper {
    pub fn new(language: Language, policy: &CodeGenerationPolicy) -> Self {
        Self {
            language,
            cpp_string_class: policy.cpp.string_class_name.clone(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Built-in datatypes of the language
    pub fn default_datatypes(&self) -> &'static [&'static str] {
        match self.language {
            Language::Cpp => CPP_DATATYPES,
            Language::Java => JAVA_DATATYPES,
            Language::Python => PYTHON_DATATYPES,
            Language::Ruby => RUBY_DATATYPES,
        }
    }

    /// Whether `name` is a built-in datatype of the language
    pub fn is_primitive(&self, name: &str) -> bool {
        let name = name.trim();
        if self.language.is_case_sensitive() {
            self.default_datatypes().contains(&name)
        } else {
            self.default_datatypes()
                .iter()
                .any(|d| d.eq_ignore_ascii_case(name))
        }
    }

    /// Spelling of `name` in the target language
    pub fn fix_type_name(&self, name: &str) -> String {
        let name = name.trim();
        match self.language {
            Language::Cpp => match name {
                "" => "void".to_string(),
                "string" => self.cpp_string_class.clone(),
                other => other.to_string(),
            },
            Language::Java => match name {
                "" => "void".to_string(),
                "string" => "String".to_string(),
                "bool" => "boolean".to_string(),
                other => other.to_string(),
            },
            Language::Python => python_type(name),
            Language::Ruby => ruby_type(name),
        }
    }

    /// Whether a mapped type name denotes the language's string type
    pub fn is_string_type(&self, fixed: &str) -> bool {
        match self.language {
            Language::Cpp => fixed == self.cpp_string_class || fixed == "string",
            Language::Java => fixed == "String",
            Language::Python => fixed == "str",
            Language::Ruby => fixed == "String",
        }
    }

    /// Quote a string-typed initial value unless it already is quoted
    pub fn fix_initial_value(&self, value: &str, fixed_type: &str) -> String {
        let value = value.trim();
        if value.is_empty() || !self.is_string_type(fixed_type) {
            return value.to_string();
        }
        if (value.starts_with('"') && value.ends_with('"') && value.len() > 1)
            || (self.language != Language::Cpp
                && self.language != Language::Java
                && value.starts_with('\'')
                && value.ends_with('\'')
                && value.len() > 1)
        {
            return value.to_string();
        }
        format!("\"{}\"", value)
    }
}

fn python_type(name: &str) -> String {
    if let Some(inner) = name
        .strip_prefix("vector<")
        .or_else(|| name.strip_prefix("std::vector<"))
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return format!("List[{}]", python_type(inner.trim()));
    }
    match name {
        "" | "void" => "None".to_string(),
        "string" | "std::string" | "char*" => "str".to_string(),
        "double" | "float" => "float".to_string(),
        "boolean" => "bool".to_string(),
        "long" | "short" | "unsigned int" => "int".to_string(),
        other => other.to_string(),
    }
}

fn ruby_type(name: &str) -> String {
    let mut cleaned = name
        .replace("const ", "")
        .replace(['*', '&'], "")
        .trim()
        .to_string();
    if let Some(stripped) = cleaned.strip_prefix("std::") {
        cleaned = stripped.to_string();
    }
    match cleaned.as_str() {
        "" => String::new(),
        "int" | "long" | "short" | "unsigned int" | "long int" | "short int" | "uint"
        | "unsigned long" => "Integer".to_string(),
        "float" | "double" | "long double" => "Float".to_string(),
        "bool" | "boolean" => "true|false".to_string(),
        "string" | "QString" | "char" => "String".to_string(),
        "void" => String::new(),
        other => other.replace(['<', '>'], "_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(language: Language) -> TypeMapper {
        TypeMapper::new(language, &CodeGenerationPolicy::default())
    }

    #[test]
    fn test_java_mapping() {
        let m = mapper(Language::Java);
        assert_eq!(m.fix_type_name(""), "void");
        assert_eq!(m.fix_type_name("string"), "String");
        assert_eq!(m.fix_type_name("bool"), "boolean");
        assert_eq!(m.fix_type_name("Animal"), "Animal");
        assert!(m.is_primitive("StringBuilder"));
        assert!(!m.is_primitive("string"));
    }

    #[test]
    fn test_cpp_mapping_uses_policy_string_class() {
        let mut policy = CodeGenerationPolicy::default();
        policy.cpp.string_class_name = "QString".to_string();
        let m = TypeMapper::new(Language::Cpp, &policy);
        assert_eq!(m.fix_type_name("string"), "QString");
        assert_eq!(m.fix_type_name(""), "void");
        assert!(m.is_primitive("unsigned long int"));
    }

    #[test]
    fn test_python_mapping() {
        let m = mapper(Language::Python);
        assert_eq!(m.fix_type_name("string"), "str");
        assert_eq!(m.fix_type_name(""), "None");
        assert_eq!(m.fix_type_name("vector<string>"), "List[str]");
        assert_eq!(m.fix_type_name("vector<vector<double>>"), "List[List[float]]");
    }

    #[test]
    fn test_ruby_mapping() {
        let m = mapper(Language::Ruby);
        assert_eq!(m.fix_type_name("const QString&"), "String");
        assert_eq!(m.fix_type_name("unsigned int"), "Integer");
        assert_eq!(m.fix_type_name("double"), "Float");
        assert_eq!(m.fix_type_name("bool"), "true|false");
        assert_eq!(m.fix_type_name("Foo<Bar>"), "Foo_Bar_");
    }

    #[test]
    fn test_initial_value_quoting() {
        let java = mapper(Language::Java);
        assert_eq!(java.fix_initial_value("hello", "String"), "\"hello\"");
        assert_eq!(java.fix_initial_value("\"hi\"", "String"), "\"hi\"");
        assert_eq!(java.fix_initial_value("42", "int"), "42");
        assert_eq!(java.fix_initial_value("", "String"), "");

        let python = mapper(Language::Python);
        assert_eq!(python.fix_initial_value("'x'", "str"), "'x'");
    }
}
