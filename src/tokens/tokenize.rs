use crate::{
    constants,
    error::{CurableError, CurableErrorKind},
    tokens::Token,
    utils, CodePoint, SpecData,
};

/// A name after scanning, NFC re-normalization and valid-run merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedName {
    pub input: String,
    pub tokens: Vec<Token>,
}

impl TokenizedName {
    pub fn from_input(input: impl AsRef<str>, spec: &SpecData) -> Self {
        let input = input.as_ref();
        let (tokens, _) = scan(input, spec);
        Self {
            input: input.to_string(),
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }
}

/// Scan `input` left to right: longest emoji match first, otherwise classify
/// a single code point. Returns the token stream together with the first
/// curable error latched while scanning; scanning never stops early so the
/// stream always covers the whole input.
pub(crate) fn scan(input: &str, spec: &SpecData) -> (Vec<Token>, Option<CurableError>) {
    let matches: Vec<regex::Match> = spec.emoji_matches(input).collect();
    let mut next_match = 0;

    let mut tokens = Vec::new();
    let mut first_error: Option<CurableError> = None;

    let mut byte_cur = 0;
    let mut cp_cur = 0;

    while byte_cur < input.len() {
        while next_match < matches.len() && matches[next_match].start() < byte_cur {
            next_match += 1;
        }
        if next_match < matches.len() && matches[next_match].start() == byte_cur {
            let matched = &matches[next_match];
            next_match += 1;

            let input_cps = utils::str2cps(matched.as_str());
            let text_cps = utils::filter_fe0f(&input_cps);
            let pretty = spec
                .pretty_emoji(&text_cps)
                .expect("a match implies a known emoji sequence")
                .clone();

            byte_cur = matched.end();
            cp_cur += input_cps.len();
            tokens.push(Token::Emoji {
                emoji: pretty,
                input: input_cps,
                cps: text_cps,
            });
            continue;
        }

        let c = input[byte_cur..]
            .chars()
            .next()
            .expect("cursor is on a char boundary");
        let cp = c as CodePoint;
        byte_cur += c.len_utf8();
        cp_cur += 1;

        let token = if spec.is_stop(cp) {
            Token::Stop { cp }
        } else if spec.is_valid(cp) {
            Token::Valid { cps: vec![cp] }
        } else if spec.is_ignored(cp) {
            Token::Ignored { cp }
        } else if let Some(mapping) = spec.mapping(cp) {
            Token::Mapped {
                cp,
                cps: mapping.clone(),
            }
        } else {
            if first_error.is_none() {
                let kind = if cp == constants::CP_ZWJ || cp == constants::CP_ZWNJ {
                    CurableErrorKind::Invisible
                } else {
                    CurableErrorKind::Disallowed
                };
                first_error = Some(CurableError {
                    kind,
                    index: cp_cur - 1,
                    sequence: c.to_string(),
                    suggested: String::new(),
                });
            }
            Token::Disallowed { cp }
        };
        tokens.push(token);
    }

    apply_nfc(&mut tokens, spec);
    collapse_valid(&mut tokens);
    (tokens, first_error)
}

/// Re-run NFC over maximal valid/mapped runs that contain a code point from
/// the `nfc_check` set. A run whose NFC output differs is replaced by a
/// single `Nfc` token; interior ignored tokens are absorbed.
fn apply_nfc(tokens: &mut Vec<Token>, spec: &SpecData) {
    let mut i = 0;
    let mut start: Option<usize> = None;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Valid { cps } | Token::Mapped { cps, .. } => {
                if spec.requires_nfc_check(cps) {
                    let mut end = i + 1;
                    for pos in end..tokens.len() {
                        match &tokens[pos] {
                            Token::Valid { cps } | Token::Mapped { cps, .. } => {
                                if !spec.requires_nfc_check(cps) {
                                    break;
                                }
                                end = pos + 1;
                            }
                            Token::Ignored { .. } => {}
                            _ => break,
                        }
                    }

                    let run_start = start.unwrap_or(i);
                    let mut merged: Vec<CodePoint> = Vec::new();
                    for tok in &tokens[run_start..end] {
                        if let Token::Valid { cps } | Token::Mapped { cps, .. } = tok {
                            merged.extend(cps.iter());
                        }
                    }

                    let before = utils::cps2str(&merged);
                    let after = utils::nfc(&before);
                    if before == after {
                        i = end - 1;
                    } else {
                        let replacement = Token::Nfc {
                            input: merged,
                            cps: utils::str2cps(&after),
                        };
                        tokens.splice(run_start..end, [replacement]);
                        i = run_start;
                    }
                    start = None;
                } else {
                    start = Some(i);
                }
            }
            Token::Ignored { .. } => {}
            _ => {
                start = None;
            }
        }
        i += 1;
    }
}

fn collapse_valid(tokens: &mut Vec<Token>) {
    let mut i = 0;
    while i < tokens.len() {
        if let Token::Valid { cps } = &tokens[i] {
            let mut merged = cps.clone();
            let mut j = i + 1;
            while j < tokens.len() {
                if let Token::Valid { cps } = &tokens[j] {
                    merged.extend(cps.iter());
                    j += 1;
                } else {
                    break;
                }
            }
            if j > i + 1 {
                tokens.splice(i..j, [Token::Valid { cps: merged }]);
            }
        }
        i += 1;
    }
}
