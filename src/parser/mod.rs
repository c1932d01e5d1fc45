pub mod markdown;
pub mod source_code;

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Markdown,
    SourceCode(SourceLang),
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLang {
    Rust,
    JavaScript,
    TypeScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
    Jsx,
    Tsx,
    CSharp,
    Swift,
    Kotlin,
    Ruby,
    Shell,
    Sql,
    Lua,
    Haskell,
    Html,
    Css,
    Yaml,
    Toml,
    Php,
    Other,
}

impl SourceLang {
    pub const ALL: [SourceLang; 24] = [
        SourceLang::Rust,
        SourceLang::JavaScript,
        SourceLang::TypeScript,
        SourceLang::Python,
        SourceLang::Go,
        SourceLang::Java,
        SourceLang::C,
        SourceLang::Cpp,
        SourceLang::Jsx,
        SourceLang::Tsx,
        SourceLang::CSharp,
        SourceLang::Swift,
        SourceLang::Kotlin,
        SourceLang::Ruby,
        SourceLang::Shell,
        SourceLang::Sql,
        SourceLang::Lua,
        SourceLang::Haskell,
        SourceLang::Html,
        SourceLang::Css,
        SourceLang::Yaml,
        SourceLang::Toml,
        SourceLang::Php,
        SourceLang::Other,
    ];
}

impl FileType {
    /// Detect file type from extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(FileType::PlainText)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext.to_lowercase().as_str() {
            "md" | "mdx" | "markdown" => return Some(FileType::Markdown),
            "txt" | "text" => return Some(FileType::PlainText),
            "rs" => SourceLang::Rust,
            "js" | "mjs" | "cjs" => SourceLang::JavaScript,
            "ts" | "mts" | "cts" => SourceLang::TypeScript,
            "jsx" => SourceLang::Jsx,
            "tsx" => SourceLang::Tsx,
            "py" | "pyw" | "pyi" => SourceLang::Python,
            "go" => SourceLang::Go,
            "java" => SourceLang::Java,
            "c" | "h" => SourceLang::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => SourceLang::Cpp,
            "cs" => SourceLang::CSharp,
            "swift" => SourceLang::Swift,
            "kt" | "kts" => SourceLang::Kotlin,
            "rb" => SourceLang::Ruby,
            "sh" | "bash" | "zsh" => SourceLang::Shell,
            "sql" => SourceLang::Sql,
            "lua" => SourceLang::Lua,
            "hs" => SourceLang::Haskell,
            "html" | "htm" | "xml" | "svg" | "vue" => SourceLang::Html,
            "css" | "scss" | "less" => SourceLang::Css,
            "yml" | "yaml" => SourceLang::Yaml,
            "toml" => SourceLang::Toml,
            "php" => SourceLang::Php,
            _ => return None,
        };
        Some(FileType::SourceCode(lang))
    }

    /// Resolve a caller-supplied hint: an extension (`rs`, `.py`), a file
    /// name (`main.go`) or a language name (`python`).
    pub fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim().to_lowercase();
        if hint.is_empty() {
            return None;
        }

        let ext = hint.rsplit('.').next().unwrap_or(&hint);
        if let Some(file_type) = Self::from_extension(ext) {
            return Some(file_type);
        }

        let lang = match hint.as_str() {
            "plain" | "plaintext" => return Some(FileType::PlainText),
            "rust" => SourceLang::Rust,
            "javascript" => SourceLang::JavaScript,
            "typescript" => SourceLang::TypeScript,
            "python" => SourceLang::Python,
            "golang" => SourceLang::Go,
            "c++" => SourceLang::Cpp,
            "csharp" | "c#" => SourceLang::CSharp,
            "kotlin" => SourceLang::Kotlin,
            "ruby" => SourceLang::Ruby,
            "shell" | "shellscript" => SourceLang::Shell,
            "haskell" => SourceLang::Haskell,
            "code" | "source" => SourceLang::Other,
            _ => return None,
        };
        Some(FileType::SourceCode(lang))
    }

    /// Best guess from content when no hint is given
    pub fn detect(content: &str) -> Self {
        let first_line = content.lines().next().unwrap_or("");
        if let Some(shebang) = first_line.strip_prefix("#!") {
            let lang = if shebang.contains("python") {
                SourceLang::Python
            } else if shebang.contains("ruby") {
                SourceLang::Ruby
            } else if shebang.contains("node") {
                SourceLang::JavaScript
            } else {
                SourceLang::Shell
            };
            return FileType::SourceCode(lang);
        }
        if content.trim_start().starts_with("<?php") {
            return FileType::SourceCode(SourceLang::Php);
        }
        if content.contains("```") || first_line.starts_with('#') {
            return FileType::Markdown;
        }
        FileType::PlainText
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpanKind {
    Code,
    String,
    LineComment,
    BlockComment,
    Prose,
    Fence,
}

impl SpanKind {
    /// Only comments and prose are handed to the text pipeline
    pub fn is_convertible(self) -> bool {
        matches!(
            self,
            SpanKind::LineComment | SpanKind::BlockComment | SpanKind::Prose
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
    pub content: String,
    /// Delimiter bytes at the front of the construct (`//`, `/*`)
    pub prefix_len: usize,
    /// Delimiter bytes at the back (`*/`); zero if closed by EOF
    pub suffix_len: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partition `text` into spans that cover it exactly, in order
pub fn tokenize(text: &str, file_type: FileType) -> Vec<Span> {
    match file_type {
        FileType::Markdown | FileType::PlainText => markdown::partition(text),
        FileType::SourceCode(lang) => source_code::scan(text, &source_code::syntax(lang)),
    }
}

pub fn resolve_file_type(text: &str, hint: Option<&str>) -> FileType {
    hint.and_then(FileType::from_hint)
        .unwrap_or_else(|| FileType::detect(text))
}

/// Comment and prose spans with delimiters stripped from `content`.
///
/// `start`/`end` still cover the whole construct in the original text.
pub fn extract_comments(text: &str, hint: Option<&str>) -> Vec<Span> {
    tokenize(text, resolve_file_type(text, hint))
        .into_iter()
        .filter(|span| span.kind.is_convertible())
        .map(|mut span| {
            span.content = inner_content(&span).to_string();
            span
        })
        .collect()
}

fn inner_content(span: &Span) -> &str {
    if span.kind == SpanKind::Prose {
        return &span.content;
    }

    let raw = &span.content;
    let body_end = raw.len().saturating_sub(span.suffix_len).max(span.prefix_len);
    let body = &raw[span.prefix_len..body_end];

    // Doc markers such as `///`, `//!`, `/**` and `##` repeat the delimiter
    let repeat = raw[..span.prefix_len].chars().next_back();
    body.trim_start_matches(|c| Some(c) == repeat || c == '!')
        .trim()
}

/// Rebuild a delimited construct around converted inner content.
///
/// The trimmed content is located inside the original text so delimiters and
/// inner whitespace survive; failing that, delimiter lengths are used.
pub fn reattach(
    original: &str,
    content: &str,
    converted: &str,
    prefix_len: usize,
    suffix_len: usize,
) -> String {
    let search_from = prefix_len.min(original.len());
    let located = if content.is_empty() {
        None
    } else {
        original
            .get(search_from..)
            .and_then(|tail| tail.find(content))
            .map(|pos| search_from + pos)
    };

    match located {
        Some(pos) => format!(
            "{}{}{}",
            &original[..pos],
            converted,
            &original[pos + content.len()..]
        ),
        None => {
            let prefix = original.get(..prefix_len).unwrap_or("");
            let suffix = original
                .len()
                .checked_sub(suffix_len)
                .filter(|&at| at >= prefix.len())
                .and_then(|at| original.get(at..))
                .unwrap_or("");
            format!("{prefix}{converted}{suffix}")
        }
    }
}

/// A replacement of `start..end` in some original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Apply edits from the highest offset down so earlier offsets stay valid.
///
/// Fails rather than corrupt the document if an edit is out of range,
/// overlaps another, or splits a character.
pub fn splice(text: &str, edits: &[Edit]) -> Result<String> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut result = text.to_string();
    let mut next_start = text.len();
    for edit in ordered {
        if edit.start > edit.end || edit.end > text.len() {
            return Err(Error::SpliceOutOfRange {
                start: edit.start,
                end: edit.end,
                len: text.len(),
            });
        }
        if edit.end > next_start {
            return Err(Error::SpliceOverlap {
                start: edit.start,
                next_start,
            });
        }
        for offset in [edit.start, edit.end] {
            if !text.is_char_boundary(offset) {
                return Err(Error::SpliceBoundary { offset });
            }
        }

        result.replace_range(edit.start..edit.end, &edit.replacement);
        next_start = edit.start;
    }

    Ok(result)
}
