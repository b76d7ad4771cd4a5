//! Per-language tokenizers built from ordered regex rules.
//!
//! Each grammar compiles into one alternation; the first rule that matches at
//! a position wins, so rules are listed from most to least specific. Text
//! between matches is plain.

use crate::error::HighlightError;
use crate::theme::TokenKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Plain,
    TypeScript,
    JavaScript,
    Python,
    Java,
    Sql,
    Html,
    Css,
    Json,
    Markdown,
    Rust,
    Shell,
    Go,
    C,
    Yaml,
}

impl Language {
    /// Resolves an editor language tag. Empty or text-like tags are plain.
    pub fn from_name(name: &str) -> Option<Language> {
        let language = match name.trim().to_lowercase().as_str() {
            "" | "text" | "plain" | "plaintext" | "txt" => Language::Plain,
            "ts" | "typescript" | "tsx" => Language::TypeScript,
            "js" | "javascript" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "py" | "python" => Language::Python,
            "java" => Language::Java,
            "sql" | "postgres" | "postgresql" | "mysql" => Language::Sql,
            "html" | "xml" | "svg" | "xhtml" => Language::Html,
            "css" => Language::Css,
            "json" | "jsonc" => Language::Json,
            "md" | "markdown" => Language::Markdown,
            "rust" | "rs" => Language::Rust,
            "sh" | "bash" | "shell" | "zsh" => Language::Shell,
            "go" | "golang" => Language::Go,
            "c" | "cpp" | "c++" | "h" | "hpp" | "cc" => Language::C,
            "yaml" | "yml" => Language::Yaml,
            _ => return None,
        };
        Some(language)
    }
}

const C_COMMENT: &str = r"//[^\n]*|/\*[\s\S]*?\*/";
const HASH_COMMENT: &str = r"#[^\n]*";
const QUOTED: &str = r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'"#;
const DOUBLE_QUOTED: &str = r#""(?:[^"\\\n]|\\.)*""#;
const NUMBER: &str = r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?)\b";
const CAPITALIZED: &str = r"\b[A-Z][A-Za-z0-9_]*\b";
const PUNCTUATION: &str = r"[{}()\[\];,.:<>=+\-*/%!&|^~?]";

fn words(list: &[&str]) -> String {
    format!(r"\b(?:{})\b", list.join("|"))
}

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "finally", "for", "from", "function",
    "get", "if", "import", "in", "instanceof", "let", "new", "of", "return", "set", "static",
    "super", "switch", "this", "throw", "try", "typeof", "var", "void", "while", "with", "yield",
];
const TS_KEYWORDS: &[&str] = &[
    "abstract", "as", "declare", "enum", "implements", "interface", "keyof", "namespace",
    "private", "protected", "public", "readonly", "type",
];
const TS_TYPES: &[&str] = &[
    "any", "boolean", "never", "number", "object", "string", "symbol", "unknown",
];
const JS_LITERALS: &[&str] = &["true", "false", "null", "undefined", "NaN", "Infinity"];

const PY_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "case", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "new", "package", "private", "protected", "public", "record", "return", "short", "static",
    "super", "switch", "synchronized", "this", "throw", "throws", "try", "var", "void",
    "volatile", "while",
];

const SQL_KEYWORDS: &[&str] = &[
    "select", "from", "where", "insert", "into", "values", "update", "set", "delete", "create",
    "table", "alter", "drop", "index", "view", "join", "inner", "left", "right", "outer",
    "full", "cross", "on", "group", "by", "order", "having", "limit", "offset", "as", "and",
    "or", "not", "is", "in", "like", "between", "distinct", "union", "all", "case", "when",
    "then", "else", "end", "primary", "key", "foreign", "references", "default", "exists",
    "returning", "with", "asc", "desc", "count", "sum", "avg", "min", "max",
];
const SQL_TYPES: &[&str] = &[
    "int", "integer", "bigint", "smallint", "serial", "text", "varchar", "char", "boolean",
    "date", "timestamp", "timestamptz", "numeric", "decimal", "uuid", "jsonb", "json",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "type", "unsafe",
    "use", "where", "while",
];
const RUST_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
    "f32", "f64", "bool", "char", "str",
];

const SHELL_KEYWORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "function", "in", "return", "export", "local", "readonly", "echo", "exit", "source", "set",
];

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];
const GO_TYPES: &[&str] = &[
    "bool", "byte", "error", "float32", "float64", "int", "int8", "int16", "int32", "int64",
    "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64",
];

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "catch", "class", "const", "constexpr", "continue", "default",
    "delete", "do", "else", "enum", "extern", "for", "goto", "if", "inline", "namespace", "new",
    "operator", "override", "private", "protected", "public", "register", "return", "sizeof",
    "static", "struct", "switch", "template", "this", "throw", "try", "typedef", "typename",
    "union", "using", "virtual", "volatile", "while",
];
const C_TYPES: &[&str] = &[
    "bool", "char", "double", "float", "int", "long", "short", "signed", "size_t", "unsigned",
    "void",
];

fn rules_for(language: Language) -> Vec<(TokenKind, String)> {
    use TokenKind::*;
    let r = |kind: TokenKind, pattern: &str| (kind, pattern.to_string());
    match language {
        Language::Plain => Vec::new(),
        Language::TypeScript | Language::JavaScript => {
            let mut rules = vec![
                r(Comment, C_COMMENT),
                r(String, QUOTED),
                r(String, r"`(?:[^`\\]|\\[\s\S])*`"),
                (Keyword, words(JS_KEYWORDS)),
            ];
            if language == Language::TypeScript {
                rules.push((Keyword, words(TS_KEYWORDS)));
                rules.push((Type, words(TS_TYPES)));
            }
            rules.extend([
                (Literal, words(JS_LITERALS)),
                r(Number, NUMBER),
                r(Type, CAPITALIZED),
                r(Punctuation, PUNCTUATION),
            ]);
            rules
        }
        Language::Python => vec![
            r(Comment, HASH_COMMENT),
            r(String, r#"[rRbBfFuU]{0,2}(?:"""[\s\S]*?"""|'''[\s\S]*?''')"#),
            r(String, &format!("[rRbBfFuU]{{0,2}}(?:{})", QUOTED)),
            r(Attribute, r"@[\w.]+"),
            (Keyword, words(PY_KEYWORDS)),
            (Literal, words(&["True", "False", "None"])),
            r(Number, NUMBER),
            r(Type, CAPITALIZED),
            r(Punctuation, PUNCTUATION),
        ],
        Language::Java => vec![
            r(Comment, C_COMMENT),
            r(String, QUOTED),
            r(Attribute, r"@\w+"),
            (Keyword, words(JAVA_KEYWORDS)),
            (Literal, words(&["true", "false", "null"])),
            r(Number, NUMBER),
            r(Type, CAPITALIZED),
            r(Punctuation, PUNCTUATION),
        ],
        Language::Sql => vec![
            r(Comment, r"--[^\n]*|/\*[\s\S]*?\*/"),
            r(String, r"'(?:[^']|'')*'"),
            r(Property, r#""(?:[^"]|"")*""#),
            (Keyword, format!("(?i:{})", words(SQL_KEYWORDS))),
            (Type, format!("(?i:{})", words(SQL_TYPES))),
            (Literal, format!("(?i:{})", words(&["null", "true", "false"]))),
            r(Number, NUMBER),
            r(Punctuation, r"[(),;.*=<>+\-/]"),
        ],
        Language::Html => vec![
            r(Comment, r"<!--[\s\S]*?-->"),
            r(Keyword, r"(?i:<!DOCTYPE[^>]*>)|<\?[\s\S]*?\?>"),
            r(Tag, r"</?[A-Za-z][\w:.-]*|/?>"),
            r(Attribute, r"[A-Za-z_:@][\w:.-]*\s*="),
            r(String, QUOTED),
            r(Literal, r"&#?\w+;"),
        ],
        Language::Css => vec![
            r(Comment, r"/\*[\s\S]*?\*/"),
            r(String, QUOTED),
            r(Keyword, r"@[\w-]+|!important"),
            r(Number, r"#[0-9a-fA-F]{3,8}\b"),
            r(Property, r"[\w-]+\s*:"),
            r(Number, r"-?\d*\.?\d+(?:px|em|rem|%|vh|vw|ms|s|pt|deg|fr)?"),
            r(Type, r"[.#][\w-]+"),
            r(Punctuation, r"[{}();,>+~*]"),
        ],
        Language::Json => vec![
            r(Property, &format!(r"{}\s*:", DOUBLE_QUOTED)),
            r(String, DOUBLE_QUOTED),
            (Literal, words(&["true", "false", "null"])),
            r(Number, r"-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?"),
            r(Punctuation, r"[{}\[\],:]"),
        ],
        Language::Markdown => vec![
            r(Heading, r"(?m)^#{1,6}[^\n]*"),
            r(String, r"(?m)^```[^\n]*|`[^`\n]+`"),
            r(Comment, r"(?m)^>[^\n]*"),
            r(Keyword, r"\*\*[^*\n]+\*\*|__[^_\n]+__"),
            r(Type, r"\*[^*\n]+\*"),
            r(Attribute, r"!?\[[^\]\n]*\]\([^)\n]*\)"),
            r(Punctuation, r"(?m)^[ \t]*(?:[-*+]|\d+\.)[ \t]"),
        ],
        Language::Rust => vec![
            r(Comment, C_COMMENT),
            r(String, r#"b?"(?:[^"\\]|\\[\s\S])*""#),
            r(String, r"b?'(?:[^'\\\n]|\\.)'"),
            r(Attribute, r"#!?\[[^\]\n]*\]|\b\w+!"),
            (Keyword, words(RUST_KEYWORDS)),
            (Type, words(RUST_TYPES)),
            (Literal, words(&["true", "false", "None", "Some", "Ok", "Err"])),
            r(Number, NUMBER),
            r(Type, CAPITALIZED),
            r(Punctuation, PUNCTUATION),
        ],
        Language::Shell => vec![
            r(Comment, r"(?m)(?:^|[ \t])#[^\n]*"),
            r(String, QUOTED),
            r(Property, r"\$\{[^}\n]*\}|\$\w+|\$[@#?$!*0-9]"),
            (Keyword, words(SHELL_KEYWORDS)),
            r(Number, NUMBER),
            r(Punctuation, r"[|&;<>(){}\[\]=]"),
        ],
        Language::Go => vec![
            r(Comment, C_COMMENT),
            r(String, QUOTED),
            r(String, r"`[^`]*`"),
            (Keyword, words(GO_KEYWORDS)),
            (Type, words(GO_TYPES)),
            (Literal, words(&["true", "false", "nil", "iota"])),
            r(Number, NUMBER),
            r(Type, CAPITALIZED),
            r(Punctuation, PUNCTUATION),
        ],
        Language::C => vec![
            r(Comment, C_COMMENT),
            r(Attribute, r"(?m)^[ \t]*#[ \t]*\w+"),
            r(String, QUOTED),
            (Keyword, words(C_KEYWORDS)),
            (Type, words(C_TYPES)),
            (Literal, words(&["true", "false", "NULL", "nullptr"])),
            r(Number, NUMBER),
            r(Punctuation, PUNCTUATION),
        ],
        Language::Yaml => vec![
            r(Comment, r"(?m)(?:^|[ \t])#[^\n]*"),
            r(Punctuation, r"(?m)^(?:---|\.\.\.)"),
            r(Property, r"(?m)^[ \t]*(?:-[ \t]+)?[\w.\-]+[ \t]*:"),
            r(String, QUOTED),
            (Literal, words(&["true", "false", "null", "yes", "no", "on", "off"])),
            r(Number, NUMBER),
            r(Punctuation, r"[\-:\[\]{},|>]"),
        ],
    }
}

/// A compiled tokenizer. Capture group `i + 1` corresponds to `kinds[i]`.
#[derive(Debug)]
pub struct Grammar {
    regex: Option<Regex>,
    kinds: Vec<TokenKind>,
}

impl Grammar {
    fn compile(language: Language) -> Result<Self, regex::Error> {
        let rules = rules_for(language);
        if rules.is_empty() {
            return Ok(Self {
                regex: None,
                kinds: Vec::new(),
            });
        }
        let pattern = rules
            .iter()
            .map(|(_, p)| format!("({})", p))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            regex: Some(Regex::new(&pattern)?),
            kinds: rules.into_iter().map(|(k, _)| k).collect(),
        })
    }

    /// Splits `code` into `(kind, text)` tokens covering it exactly.
    pub fn tokenize<'a>(&self, code: &'a str) -> Vec<(TokenKind, &'a str)> {
        let Some(regex) = &self.regex else {
            return vec![(TokenKind::Plain, code)];
        };
        let mut tokens = Vec::new();
        let mut last = 0;
        for caps in regex.captures_iter(code) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.as_str().is_empty() {
                continue;
            }
            let kind = caps
                .iter()
                .skip(1)
                .position(|m| m.is_some())
                .and_then(|i| self.kinds.get(i).copied())
                .unwrap_or(TokenKind::Plain);
            if whole.start() > last {
                tokens.push((TokenKind::Plain, &code[last..whole.start()]));
            }
            tokens.push((kind, whole.as_str()));
            last = whole.end();
        }
        if last < code.len() {
            tokens.push((TokenKind::Plain, &code[last..]));
        }
        tokens
    }
}

static GRAMMARS: Lazy<HashMap<Language, Result<Grammar, String>>> = Lazy::new(|| {
    [
        Language::Plain,
        Language::TypeScript,
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Sql,
        Language::Html,
        Language::Css,
        Language::Json,
        Language::Markdown,
        Language::Rust,
        Language::Shell,
        Language::Go,
        Language::C,
        Language::Yaml,
    ]
    .into_iter()
    .map(|lang| (lang, Grammar::compile(lang).map_err(|e| e.to_string())))
    .collect()
});

pub fn grammar_for(language: Language) -> Result<&'static Grammar, HighlightError> {
    match GRAMMARS.get(&language) {
        Some(Ok(grammar)) => Ok(grammar),
        Some(Err(e)) => Err(HighlightError::Tokenizer(e.clone())),
        None => Err(HighlightError::Tokenizer(format!(
            "no grammar registered for {:?}",
            language
        ))),
    }
}
