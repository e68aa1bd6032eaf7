use crate::{
    beautify::tokens_to_beautified,
    error::ProcessError,
    join::tokens_to_string,
    tokens::{scan, Token, TokenizedName},
    transformations::{find_transformations, Transformation},
    utils, validate, CurableError, SpecData,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // names that are trivially normalized; the pipeline is bypassed for them
    static ref SIMPLE_NAME: Regex =
        Regex::new(r"^[a-z0-9]+(\.[a-z0-9]+)*$").expect("fast-path pattern compiles");
}

/// The ENSIP-15 pipeline bound to one loaded [`SpecData`].
///
/// Construction is the only expensive step; the normalizer is immutable
/// afterwards and can be shared freely across threads.
pub struct Normalizer {
    spec: SpecData,
}

/// A name that passed tokenization and every label check. Rendering the
/// normalized or beautified form is a cheap walk over the retained tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedName {
    pub input: String,
    pub tokens: Vec<Token>,
    label_is_greek: Vec<bool>,
}

/// Result of [`Normalizer::cure`]: the cured name plus every fix applied to
/// reach it, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuredName {
    pub cured: String,
    pub fixes: Vec<CurableError>,
}

impl Normalizer {
    pub fn new(spec: SpecData) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &SpecData {
        &self.spec
    }

    /// Tokenize and validate `input` without rendering anything yet.
    pub fn process(&self, input: impl AsRef<str>) -> Result<ProcessedName, ProcessError> {
        let input = input.as_ref();
        if SIMPLE_NAME.is_match(input) {
            return Ok(ProcessedName {
                input: input.to_string(),
                tokens: simple_tokens(input),
                label_is_greek: vec![false; input.split('.').count()],
            });
        }
        let (tokens, latched) = scan(input, &self.spec);
        if let Some(err) = latched {
            return Err(err.into());
        }
        let label_is_greek = validate::post_check(&tokens, input, &self.spec)?;
        Ok(ProcessedName {
            input: input.to_string(),
            tokens,
            label_is_greek,
        })
    }

    pub fn normalize(&self, input: impl AsRef<str>) -> Result<String, ProcessError> {
        self.process(input).map(|name| name.normalized())
    }

    pub fn beautify(&self, input: impl AsRef<str>) -> Result<String, ProcessError> {
        self.process(input).map(|name| name.beautified())
    }

    /// The public token view. Never fails: disallowed characters surface as
    /// `disallowed` tokens rather than errors.
    pub fn tokenize(&self, input: impl AsRef<str>) -> TokenizedName {
        let input = input.as_ref();
        if SIMPLE_NAME.is_match(input) {
            return TokenizedName {
                input: input.to_string(),
                tokens: simple_tokens(input),
            };
        }
        TokenizedName::from_input(input, &self.spec)
    }

    /// Every modification `normalize` would apply silently, input-aligned.
    pub fn transformations(
        &self,
        input: impl AsRef<str>,
    ) -> Result<Vec<Transformation>, ProcessError> {
        self.process(input)
            .map(|name| find_transformations(&name.tokens))
    }

    /// Repeatedly normalize, splicing each curable error's suggestion over
    /// its sequence, until normalization succeeds. Non-curable errors
    /// propagate unchanged.
    pub fn cure(&self, input: impl AsRef<str>) -> Result<CuredName, ProcessError> {
        let input = input.as_ref();
        let mut text = input.to_string();
        let mut fixes = Vec::new();
        let limit = 2 * input.chars().count() + 1;
        for _ in 0..limit {
            match self.normalize(&text) {
                Ok(cured) => return Ok(CuredName { cured, fixes }),
                Err(ProcessError::Curable(err)) => {
                    text = splice(&text, &err);
                    fixes.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(ProcessError::CureNotConverging { limit })
    }

    /// True iff `input` is already in normalized form.
    pub fn is_normalized(&self, input: impl AsRef<str>) -> bool {
        let input = input.as_ref();
        self.normalize(input).map(|n| n == input).unwrap_or(false)
    }

    pub fn is_normalizable(&self, input: impl AsRef<str>) -> bool {
        self.process(input).is_ok()
    }
}

impl ProcessedName {
    pub fn normalized(&self) -> String {
        tokens_to_string(&self.tokens)
    }

    pub fn beautified(&self) -> String {
        tokens_to_beautified(&self.tokens, &self.label_is_greek)
    }
}

fn simple_tokens(input: &str) -> Vec<Token> {
    itertools::intersperse(
        input.split('.').map(|label| Token::Valid {
            cps: utils::str2cps(label),
        }),
        Token::stop(),
    )
    .collect()
}

/// Replace `[index, index + len(sequence))` with the suggestion, in
/// code-point coordinates.
fn splice(text: &str, err: &CurableError) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = err.index.min(chars.len());
    let end = (err.index + err.sequence.chars().count()).min(chars.len());
    let mut out: String = chars[..start].iter().collect();
    out.push_str(&err.suggested);
    out.extend(&chars[end..]);
    out
}
