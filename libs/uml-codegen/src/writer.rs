//! Text assembly helpers shared by all emitters

use crate::language::Language;
use crate::policy::{CodeGenerationPolicy, CommentStyle};

/// Column at which documentation text is wrapped
pub const DOC_LINE_WIDTH: usize = 80;

/// Indentation-aware string builder using the policy's line ending
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buf: String,
    indent_unit: String,
    level: usize,
    endl: &'static str,
}

impl CodeWriter {
    pub fn new(policy: &CodeGenerationPolicy) -> Self {
        Self {
            buf: String::new(),
            indent_unit: policy.indentation(),
            level: 0,
            endl: policy.line_ending(),
        }
    }

    /// Empty writer with the same settings and indentation level
    pub fn child(&self) -> Self {
        Self {
            buf: String::new(),
            indent_unit: self.indent_unit.clone(),
            level: self.level,
            endl: self.endl,
        }
    }

    pub fn endl(&self) -> &'static str {
        self.endl
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    pub fn current_indent(&self) -> String {
        self.indent_unit.repeat(self.level)
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent();
        f(self);
        self.dedent();
    }

    /// One line at the current indentation; empty text gives a bare line break
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.buf.push_str(&self.current_indent());
            self.buf.push_str(text);
        }
        self.buf.push_str(self.endl);
    }

    pub fn blank(&mut self) {
        self.buf.push_str(self.endl);
    }

    /// Verbatim text, no indentation or line break added
    pub fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Every line of `lines` at the current indentation
    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
    }

    pub fn append(&mut self, other: CodeWriter) {
        self.buf.push_str(&other.buf);
    }

    /// Literal method body text, re-indented to the current level
    pub fn source_code(&mut self, code: &str) {
        let indent = self.current_indent();
        for line in format_source_code(code, &indent) {
            self.buf.push_str(&line);
            self.buf.push_str(self.endl);
        }
    }

    /// Comment block in `syntax`, wrapped at [`DOC_LINE_WIDTH`]
    pub fn comment(&mut self, syntax: &CommentSyntax, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.comment_lines(syntax, &[text.to_string()]);
    }

    /// Comment block made of several paragraphs (each may span lines)
    pub fn comment_lines(&mut self, syntax: &CommentSyntax, paragraphs: &[String]) {
        let width = DOC_LINE_WIDTH.saturating_sub(self.current_indent().len());
        if let Some(open) = syntax.open {
            self.line(open);
        }
        for paragraph in paragraphs {
            let wrapped = format_doc(paragraph, syntax.line, width);
            if wrapped.is_empty() {
                self.line(syntax.line.trim_end());
            }
            for line in wrapped {
                self.line(line);
            }
        }
        if let Some(close) = syntax.close {
            self.line(close);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Delimiters of a comment block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub open: Option<&'static str>,
    pub line: &'static str,
    pub close: Option<&'static str>,
}

impl CommentSyntax {
    pub const fn single(line: &'static str) -> Self {
        Self {
            open: None,
            line,
            close: None,
        }
    }
}

/// Documentation comment syntax of `language` under `style`
pub fn doc_comment_syntax(language: Language, style: CommentStyle) -> CommentSyntax {
    match (language, style) {
        (Language::Cpp | Language::Java, CommentStyle::MultiLine) => CommentSyntax {
            open: Some("/**"),
            line: " * ",
            close: Some(" */"),
        },
        (Language::Cpp | Language::Java, CommentStyle::SingleLine) => CommentSyntax::single("/// "),
        (Language::Python | Language::Ruby, _) => CommentSyntax::single("# "),
    }
}

/// Plain (non-documentation) comment syntax of `language`
pub fn line_comment_syntax(language: Language) -> CommentSyntax {
    match language {
        Language::Cpp | Language::Java => CommentSyntax::single("// "),
        Language::Python | Language::Ruby => CommentSyntax::single("# "),
    }
}

/// Wrap `text` at blanks so that `prefix` plus each line fits in `width`.
///
/// Line breaks in `text` are kept; an empty source line becomes the bare
/// prefix. Words longer than the width are not split.
pub fn format_doc(text: &str, prefix: &str, width: usize) -> Vec<String> {
    let text = text.trim_end();
    if text.is_empty() {
        return Vec::new();
    }

    let available = width.saturating_sub(prefix.len()).max(1);
    let mut out = Vec::new();
    for source_line in text.lines() {
        let words: Vec<&str> = source_line.split_whitespace().collect();
        if words.is_empty() {
            out.push(prefix.trim_end().to_string());
            continue;
        }
        let mut current = String::new();
        for word in words {
            if !current.is_empty() && current.len() + 1 + word.len() > available {
                out.push(format!("{}{}", prefix, current));
                current.clear();
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(format!("{}{}", prefix, current));
    }
    out
}

/// Prefix every line of `code` with `indent`, dropping trailing blank lines
pub fn format_source_code(code: &str, indent: &str) -> Vec<String> {
    let mut lines: Vec<String> = code
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
