use crate::parser::{SourceLang, Span, SpanKind};

/// Lexical rules for one language family
#[derive(Debug, Clone, Copy)]
pub struct Syntax {
    pub line_comments: &'static [&'static str],
    pub block_comments: &'static [(&'static str, &'static str)],
    /// String delimiters, longest first so `"""` wins over `"`
    pub strings: &'static [&'static str],
    /// Delimiters whose strings may run across newlines
    pub multiline_strings: &'static [&'static str],
    /// `'` opens a char literal only when it closes right away (`'a'`, `'\n'`)
    pub char_literals: bool,
    /// `r"..."` and `r#"..."#` strings without escapes
    pub raw_strings: bool,
    /// Line comments open only at line start or after whitespace or `;`
    pub comment_needs_boundary: bool,
}

const C_LIKE: Syntax = Syntax {
    line_comments: &["//"],
    block_comments: &[("/*", "*/")],
    strings: &["\"", "'"],
    multiline_strings: &[],
    char_literals: false,
    raw_strings: false,
    comment_needs_boundary: false,
};

const JS_LIKE: Syntax = Syntax {
    strings: &["\"", "'", "`"],
    multiline_strings: &["`"],
    ..C_LIKE
};

const HASH: Syntax = Syntax {
    line_comments: &["#"],
    block_comments: &[],
    strings: &["\"", "'"],
    multiline_strings: &[],
    char_literals: false,
    raw_strings: false,
    comment_needs_boundary: false,
};

pub fn syntax(lang: SourceLang) -> Syntax {
    match lang {
        SourceLang::Rust => Syntax {
            strings: &["\""],
            multiline_strings: &["\""],
            char_literals: true,
            raw_strings: true,
            ..C_LIKE
        },
        SourceLang::JavaScript | SourceLang::TypeScript | SourceLang::Jsx | SourceLang::Tsx => {
            JS_LIKE
        }
        SourceLang::Go => Syntax {
            strings: &["\"", "'", "`"],
            multiline_strings: &["`"],
            ..C_LIKE
        },
        SourceLang::Swift | SourceLang::Kotlin => Syntax {
            strings: &["\"\"\"", "\"", "'"],
            multiline_strings: &["\"\"\""],
            ..C_LIKE
        },
        SourceLang::Css => Syntax {
            line_comments: &[],
            ..C_LIKE
        },
        SourceLang::Php => Syntax {
            line_comments: &["//", "#"],
            ..C_LIKE
        },
        SourceLang::Python => Syntax {
            strings: &["\"\"\"", "'''", "\"", "'"],
            multiline_strings: &["\"\"\"", "'''"],
            ..HASH
        },
        SourceLang::Toml => Syntax {
            strings: &["\"\"\"", "'''", "\"", "'"],
            multiline_strings: &["\"\"\"", "'''"],
            ..HASH
        },
        SourceLang::Ruby => Syntax {
            block_comments: &[("=begin", "=end")],
            ..HASH
        },
        SourceLang::Shell | SourceLang::Yaml => Syntax {
            comment_needs_boundary: true,
            ..HASH
        },
        SourceLang::Sql => Syntax {
            line_comments: &["--"],
            strings: &["'", "\""],
            ..C_LIKE
        },
        SourceLang::Lua => Syntax {
            line_comments: &["--"],
            block_comments: &[("--[[", "]]")],
            strings: &["\"", "'"],
            ..HASH
        },
        SourceLang::Haskell => Syntax {
            line_comments: &["--"],
            block_comments: &[("{-", "-}")],
            strings: &["\""],
            multiline_strings: &[],
            char_literals: true,
            ..C_LIKE
        },
        SourceLang::Html => Syntax {
            line_comments: &[],
            block_comments: &[("<!--", "-->")],
            strings: &[],
            ..C_LIKE
        },
        SourceLang::Java | SourceLang::C | SourceLang::Cpp | SourceLang::CSharp => C_LIKE,
        SourceLang::Other => C_LIKE,
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Code,
    Str(&'static str),
    /// Raw string closed by `"` and this many `#`
    RawStr(usize),
    LineComment,
    BlockComment(&'static str),
}

struct Scanner<'a> {
    text: &'a str,
    spans: Vec<Span>,
    span_start: usize,
    prefix_len: usize,
}

impl<'a> Scanner<'a> {
    fn close(&mut self, end: usize, kind: SpanKind, suffix_len: usize) {
        if end > self.span_start {
            self.spans.push(Span {
                start: self.span_start,
                end,
                kind,
                content: self.text[self.span_start..end].to_string(),
                prefix_len: self.prefix_len,
                suffix_len,
            });
        }
        self.span_start = end;
        self.prefix_len = 0;
    }
}

/// Single left-to-right pass; spans cover the input exactly.
///
/// Unterminated constructs close at end of input. A line comment stops before
/// its newline, which stays in the following code span.
pub fn scan(text: &str, syntax: &Syntax) -> Vec<Span> {
    let mut scanner = Scanner {
        text,
        spans: Vec::new(),
        span_start: 0,
        prefix_len: 0,
    };
    let mut state = State::Code;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        match state {
            State::Code => {
                if let Some(&(open, close)) =
                    syntax.block_comments.iter().find(|(open, _)| rest.starts_with(open))
                {
                    scanner.close(i, SpanKind::Code, 0);
                    scanner.prefix_len = open.len();
                    state = State::BlockComment(close);
                    i += open.len();
                } else if let Some(marker) = syntax
                    .line_comments
                    .iter()
                    .find(|m| rest.starts_with(*m))
                    .filter(|_| !syntax.comment_needs_boundary || at_boundary(text, i))
                {
                    scanner.close(i, SpanKind::Code, 0);
                    scanner.prefix_len = marker.len();
                    state = State::LineComment;
                    i += marker.len();
                } else if let Some((open_len, hashes)) = syntax
                    .raw_strings
                    .then(|| raw_string_opener(text, i))
                    .flatten()
                {
                    scanner.close(i, SpanKind::Code, 0);
                    scanner.prefix_len = open_len;
                    state = State::RawStr(hashes);
                    i += open_len;
                } else if let Some(&delim) = syntax.strings.iter().find(|d| rest.starts_with(*d))
                {
                    scanner.close(i, SpanKind::Code, 0);
                    scanner.prefix_len = delim.len();
                    state = State::Str(delim);
                    i += delim.len();
                } else if syntax.char_literals && ch == '\'' {
                    match char_literal_len(rest) {
                        Some(len) => {
                            scanner.close(i, SpanKind::Code, 0);
                            scanner.prefix_len = 1;
                            scanner.close(i + len, SpanKind::String, 1);
                            i += len;
                        }
                        // Lifetime, label or prime suffix
                        None => i += 1,
                    }
                } else {
                    i += ch.len_utf8();
                }
            }
            State::LineComment => {
                if ch == '\n' {
                    scanner.close(i, SpanKind::LineComment, 0);
                    state = State::Code;
                }
                i += ch.len_utf8();
            }
            State::BlockComment(close) => {
                match rest.find(close) {
                    Some(pos) => {
                        i += pos + close.len();
                        scanner.close(i, SpanKind::BlockComment, close.len());
                        state = State::Code;
                    }
                    None => i = text.len(),
                }
            }
            State::RawStr(hashes) => {
                let close = format!("\"{}", "#".repeat(hashes));
                match rest.find(&close) {
                    Some(pos) => {
                        i += pos + close.len();
                        scanner.close(i, SpanKind::String, close.len());
                        state = State::Code;
                    }
                    None => i = text.len(),
                }
            }
            State::Str(delim) => {
                if ch == '\\' {
                    i += 1;
                    if let Some(escaped) = text[i..].chars().next() {
                        i += escaped.len_utf8();
                    }
                } else if rest.starts_with(delim) {
                    i += delim.len();
                    scanner.close(i, SpanKind::String, delim.len());
                    state = State::Code;
                } else if ch == '\n' && !syntax.multiline_strings.contains(&delim) {
                    scanner.close(i, SpanKind::String, 0);
                    state = State::Code;
                } else {
                    i += ch.len_utf8();
                }
            }
        }
    }

    let (kind, suffix_len) = match state {
        State::Code => (SpanKind::Code, 0),
        State::Str(_) | State::RawStr(_) => (SpanKind::String, 0),
        State::LineComment => (SpanKind::LineComment, 0),
        State::BlockComment(_) => (SpanKind::BlockComment, 0),
    };
    scanner.close(text.len(), kind, suffix_len);

    scanner.spans
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn at_boundary(text: &str, i: usize) -> bool {
    text[..i]
        .chars()
        .next_back()
        .map_or(true, |c| c.is_whitespace() || c == ';')
}

/// Opener length and `#` count when a raw string (`r"`, `r#"`, `br"`) starts at `i`
fn raw_string_opener(text: &str, i: usize) -> Option<(usize, usize)> {
    let rest = &text[i..];
    let after_prefix = rest.strip_prefix("br").or_else(|| rest.strip_prefix('r'))?;
    if text[..i].chars().next_back().is_some_and(is_ident_char) {
        return None;
    }
    let hashes = after_prefix.len() - after_prefix.trim_start_matches('#').len();
    after_prefix[hashes..]
        .starts_with('"')
        .then_some((rest.len() - after_prefix.len() + hashes + 1, hashes))
}

/// Length of a char literal starting at `rest`, if this `'` opens one
fn char_literal_len(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices().skip(1);
    let (_, first) = chars.next()?;
    if first == '\\' {
        // '\n', '\'', '\u{1F600}'
        let close = rest[2..].find('\'')?;
        return (close <= 10).then_some(close + 3);
    }
    match chars.next() {
        Some((at, '\'')) => Some(at + 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str, lang: SourceLang) -> Vec<(SpanKind, String)> {
        scan(text, &syntax(lang))
            .into_iter()
            .map(|s| (s.kind, s.content))
            .collect()
    }

    fn assert_partition(text: &str, spans: &[Span]) {
        let mut cursor = 0;
        for span in spans {
            assert_eq!(span.start, cursor);
            assert!(!span.is_empty());
            cursor = span.end;
        }
        assert_eq!(cursor, text.len());
        let joined: String = spans.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_c_style_comments() {
        let content = r#"
// This is a comment with words
fn main() {
    println!("A string with text");
}
"#;
        let spans = scan(content, &syntax(SourceLang::Rust));
        assert_partition(content, &spans);

        let comments: Vec<_> = spans.iter().filter(|s| s.kind == SpanKind::LineComment).collect();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "// This is a comment with words");

        let strings: Vec<_> = spans.iter().filter(|s| s.kind == SpanKind::String).collect();
        assert_eq!(strings[0].content, "\"A string with text\"");
    }

    #[test]
    fn test_comment_markers_inside_strings() {
        let content = r#"let url = "http://example.com"; // real"#;
        let spans = kinds(content, SourceLang::Rust);
        assert_eq!(spans[1], (SpanKind::String, "\"http://example.com\"".to_string()));
        assert_eq!(spans[3], (SpanKind::LineComment, "// real".to_string()));
    }

    #[test]
    fn test_escaped_quotes() {
        let content = r#"s = "say \"hi\" # not a comment"  # comment"#;
        let spans = kinds(content, SourceLang::Python);
        assert_eq!(spans[1].0, SpanKind::String);
        assert_eq!(spans[1].1, r#""say \"hi\" # not a comment""#);
        assert_eq!(spans[3], (SpanKind::LineComment, "# comment".to_string()));
    }

    #[test]
    fn test_python_comments() {
        let content = r#"
# This is a Python comment
def main():
    """Docstring about behavior."""
    print('A string with text')
"#;
        let spans = scan(content, &syntax(SourceLang::Python));
        assert_partition(content, &spans);
        let kinds: Vec<_> = spans.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&SpanKind::LineComment));
        let strings: Vec<_> = spans.iter().filter(|s| s.kind == SpanKind::String).collect();
        assert_eq!(strings[0].content, "\"\"\"Docstring about behavior.\"\"\"");
        assert_eq!(strings[1].content, "'A string with text'");
    }

    #[test]
    fn test_multiline_block_comment() {
        let content = "a /* one\ntwo */ b";
        let spans = kinds(content, SourceLang::C);
        assert_eq!(spans[1], (SpanKind::BlockComment, "/* one\ntwo */".to_string()));
        assert_eq!(spans[2], (SpanKind::Code, " b".to_string()));
    }

    #[test]
    fn test_unterminated_constructs_close_at_eof() {
        let content = "x = 1 /* never closed";
        let spans = scan(content, &syntax(SourceLang::C));
        assert_partition(content, &spans);
        let last = spans.last().unwrap();
        assert_eq!(last.kind, SpanKind::BlockComment);
        assert_eq!(last.suffix_len, 0);

        let content = "let s = r#\"open raw";
        let spans = scan(content, &syntax(SourceLang::Rust));
        assert_partition(content, &spans);
        assert_eq!(spans.last().unwrap().kind, SpanKind::String);
        assert_eq!(spans.last().unwrap().prefix_len, 3);

        let content = "s = `open template";
        let spans = scan(content, &syntax(SourceLang::JavaScript));
        assert_partition(content, &spans);
        assert_eq!(spans.last().unwrap().kind, SpanKind::String);
    }

    #[test]
    fn test_rust_lifetimes_are_code() {
        let content = "fn f<'a>(x: &'a str) -> char { 'x' } // done";
        let spans = kinds(content, SourceLang::Rust);
        let strings: Vec<_> = spans.iter().filter(|(k, _)| *k == SpanKind::String).collect();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].1, "'x'");
        assert_eq!(spans.last().unwrap(), &(SpanKind::LineComment, "// done".to_string()));
    }

    #[test]
    fn test_other_comment_styles() {
        let spans = kinds("SELECT 1; -- the color", SourceLang::Sql);
        assert_eq!(spans[1], (SpanKind::LineComment, "-- the color".to_string()));

        let spans = kinds("<p>x</p><!-- gray -->", SourceLang::Html);
        assert_eq!(spans[1], (SpanKind::BlockComment, "<!-- gray -->".to_string()));

        let spans = kinds("x = 1 --[[ block ]] --line", SourceLang::Lua);
        assert_eq!(spans[1].0, SpanKind::BlockComment);
        assert_eq!(spans[3].0, SpanKind::LineComment);
    }

    #[test]
    fn test_rust_raw_strings() {
        let content = "let p = r\"C:\\\";\nlet url = \"see //color.com/color\";";
        let spans = kinds(content, SourceLang::Rust);
        assert_eq!(spans[1], (SpanKind::String, "r\"C:\\\"".to_string()));
        assert!(spans.iter().all(|(k, _)| *k != SpanKind::LineComment));
        assert!(spans.contains(&(SpanKind::String, "\"see //color.com/color\"".to_string())));

        let content = r####"let s = r#"a "quoted" // word"#; // gray"####;
        let spans = scan(content, &syntax(SourceLang::Rust));
        assert_partition(content, &spans);
        assert_eq!(spans[1].content, r###"r#"a "quoted" // word"#"###);
        assert_eq!(spans[1].prefix_len, 3);
        assert_eq!(spans[1].suffix_len, 2);
        assert_eq!(spans.last().unwrap().content, "// gray");
    }

    #[test]
    fn test_raw_identifiers_are_code() {
        let content = "let r#type = bar\"x\"; // c";
        let spans = kinds(content, SourceLang::Rust);
        assert_eq!(spans[0], (SpanKind::Code, "let r#type = bar".to_string()));
        assert_eq!(spans[1], (SpanKind::String, "\"x\"".to_string()));
    }

    #[test]
    fn test_shell_hash_inside_words_is_code() {
        let content = "n=${#color}\necho $n $# # the color\n";
        let spans = kinds(content, SourceLang::Shell);
        let comments: Vec<_> = spans.iter().filter(|(k, _)| *k == SpanKind::LineComment).collect();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].1, "# the color");
        assert_eq!(spans[0], (SpanKind::Code, "n=${#color}\necho $n $# ".to_string()));

        let spans = kinds("#!/bin/sh\nls;# done", SourceLang::Shell);
        assert_eq!(spans[0], (SpanKind::LineComment, "#!/bin/sh".to_string()));
        assert_eq!(spans.last().unwrap(), &(SpanKind::LineComment, "# done".to_string()));
    }

    #[test]
    fn test_newline_ends_plain_strings() {
        let content = "echo don't\n# a comment\n";
        let spans = scan(content, &syntax(SourceLang::Shell));
        assert_partition(content, &spans);
        assert!(spans
            .iter()
            .any(|s| s.kind == SpanKind::LineComment && s.content == "# a comment"));
    }
}
