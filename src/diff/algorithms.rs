use std::borrow::Cow;
use std::sync::OnceLock;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffTag};
use super::operation::{push_coalesced, ChangeKind, Operation};
use crate::error::{DiffError, Result};

/// Options a primitive honours while comparing tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimitiveOptions {
    pub ignore_case: bool,
    pub ignore_whitespace: bool,
    pub algorithm: DiffAlgorithmType,
}

/// Trait defining a diff primitive for one comparison granularity
pub trait DiffPrimitive: Send + Sync {
    /// Split text into the tokens this primitive compares
    fn tokenize<'a>(&self, text: &'a str) -> Result<Vec<&'a str>>;

    /// Get the primitive name
    fn name(&self) -> &'static str;

    /// Key a token is compared by under the given options
    fn comparison_key<'a>(&self, token: &'a str, options: &PrimitiveOptions) -> Cow<'a, str> {
        let token = if options.ignore_whitespace && token.trim().is_empty() {
            Cow::Borrowed("")
        } else {
            Cow::Borrowed(token)
        };
        fold_case(token, options)
    }

    /// Diff old against new, returning coalesced operations in order.
    /// Tokens that compare equal are emitted with the new side's text.
    fn diff(&self, old: &str, new: &str, options: &PrimitiveOptions) -> Result<Vec<Operation>> {
        let old_tokens = self.tokenize(old)?;
        let new_tokens = self.tokenize(new)?;

        let old_keys: Vec<Cow<str>> = old_tokens
            .iter()
            .map(|token| self.comparison_key(token, options))
            .collect();
        let new_keys: Vec<Cow<str>> = new_tokens
            .iter()
            .map(|token| self.comparison_key(token, options))
            .collect();

        let mut operations = Vec::new();
        for op in similar::capture_diff_slices(options.algorithm.into(), &old_keys, &new_keys) {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => {
                    push_coalesced(&mut operations, ChangeKind::Unchanged, &new_tokens[new_range].concat());
                }
                DiffTag::Delete => {
                    push_coalesced(&mut operations, ChangeKind::Removed, &old_tokens[old_range].concat());
                }
                DiffTag::Insert => {
                    push_coalesced(&mut operations, ChangeKind::Added, &new_tokens[new_range].concat());
                }
                DiffTag::Replace => {
                    push_coalesced(&mut operations, ChangeKind::Removed, &old_tokens[old_range].concat());
                    push_coalesced(&mut operations, ChangeKind::Added, &new_tokens[new_range].concat());
                }
            }
        }

        Ok(operations)
    }
}

fn fold_case<'a>(token: Cow<'a, str>, options: &PrimitiveOptions) -> Cow<'a, str> {
    if options.ignore_case {
        Cow::Owned(token.to_lowercase())
    } else {
        token
    }
}

/// Pattern compiled on first use and shared afterwards.
struct TokenPattern {
    source: &'static str,
    compiled: OnceLock<Regex>,
}

impl TokenPattern {
    const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    fn regex(&self) -> Result<&Regex> {
        if let Some(regex) = self.compiled.get() {
            return Ok(regex);
        }
        let regex = Regex::new(self.source).map_err(|err| DiffError::Tokenizer(err.to_string()))?;
        Ok(self.compiled.get_or_init(|| regex))
    }
}

static WORD_PATTERN: TokenPattern = TokenPattern::new(r"\w+|\s+|[^\w\s]");
static SENTENCE_PATTERN: TokenPattern = TokenPattern::new(r"\s+|[^.!?\s][^.!?]*[.!?]*|[.!?]+");
static CSS_PATTERN: TokenPattern = TokenPattern::new(r"[{}:;,]|\s+|[^{}:;,\s]+");

/// Tokenize with a pattern whose alternatives cover every character.
fn tokenize_with<'a>(pattern: &TokenPattern, text: &'a str) -> Result<Vec<&'a str>> {
    let regex = pattern.regex()?;

    let mut tokens = Vec::new();
    let mut cursor = 0;
    for found in regex.find_iter(text) {
        if found.start() != cursor {
            return Err(DiffError::Tokenizer(format!(
                "pattern {} skipped input at byte {}",
                pattern.source, cursor
            )));
        }
        tokens.push(found.as_str());
        cursor = found.end();
    }
    if cursor != text.len() {
        return Err(DiffError::Tokenizer(format!(
            "pattern {} skipped input at byte {}",
            pattern.source, cursor
        )));
    }

    Ok(tokens)
}

/// Character-level primitive
pub struct CharPrimitive;

impl DiffPrimitive for CharPrimitive {
    fn tokenize<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        Ok(text
            .char_indices()
            .map(|(idx, ch)| &text[idx..idx + ch.len_utf8()])
            .collect())
    }

    fn name(&self) -> &'static str {
        "chars"
    }
}

/// Word-level primitive: words, whitespace runs and punctuation
pub struct WordPrimitive;

impl DiffPrimitive for WordPrimitive {
    fn tokenize<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        tokenize_with(&WORD_PATTERN, text)
    }

    fn name(&self) -> &'static str {
        "words"
    }
}

/// Line-level primitive, also used for pretty-printed JSON
pub struct LinePrimitive;

impl DiffPrimitive for LinePrimitive {
    fn tokenize<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        Ok(text.split_inclusive('\n').collect())
    }

    fn name(&self) -> &'static str {
        "lines"
    }

    fn comparison_key<'a>(&self, token: &'a str, options: &PrimitiveOptions) -> Cow<'a, str> {
        let token = if options.ignore_whitespace {
            Cow::Borrowed(token.trim())
        } else {
            Cow::Borrowed(token)
        };
        fold_case(token, options)
    }
}

/// Sentence-level primitive: text up to a terminator, and the whitespace between
pub struct SentencePrimitive;

impl DiffPrimitive for SentencePrimitive {
    fn tokenize<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        tokenize_with(&SENTENCE_PATTERN, text)
    }

    fn name(&self) -> &'static str {
        "sentences"
    }
}

/// CSS-token primitive: punctuation, whitespace runs and everything in between
pub struct CssPrimitive;

impl DiffPrimitive for CssPrimitive {
    fn tokenize<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        tokenize_with(&CSS_PATTERN, text)
    }

    fn name(&self) -> &'static str {
        "css"
    }
}

/// Comparison granularity of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum DiffKind {
    Chars,
    Words,
    Lines,
    Json,
    Css,
    Sentences,
}

impl DiffKind {
    pub fn all() -> &'static [DiffKind] {
        &[
            Self::Chars,
            Self::Words,
            Self::Lines,
            Self::Json,
            Self::Css,
            Self::Sentences,
        ]
    }

    /// Line-based kinds render one row per line; the rest render a single run.
    pub fn is_line_based(&self) -> bool {
        matches!(self, Self::Lines | Self::Json)
    }

    pub fn create(&self) -> Box<dyn DiffPrimitive> {
        match self {
            Self::Chars => Box::new(CharPrimitive),
            Self::Words => Box::new(WordPrimitive),
            Self::Lines | Self::Json => Box::new(LinePrimitive),
            Self::Css => Box::new(CssPrimitive),
            Self::Sentences => Box::new(SentencePrimitive),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Chars => "Character diff",
            Self::Words => "Word diff",
            Self::Lines => "Line diff",
            Self::Json => "JSON diff",
            Self::Css => "CSS diff",
            Self::Sentences => "Sentence diff",
        }
    }
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Available diff algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum DiffAlgorithmType {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl DiffAlgorithmType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Myers => "Myers",
            Self::Patience => "Patience",
            Self::Lcs => "LCS",
        }
    }
}

impl From<DiffAlgorithmType> for Algorithm {
    fn from(value: DiffAlgorithmType) -> Self {
        match value {
            DiffAlgorithmType::Myers => Algorithm::Myers,
            DiffAlgorithmType::Patience => Algorithm::Patience,
            DiffAlgorithmType::Lcs => Algorithm::Lcs,
        }
    }
}

impl std::fmt::Display for DiffAlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
