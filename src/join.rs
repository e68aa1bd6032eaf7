use crate::{tokens::Token, utils};

/// Render the token stream as the normalized name: ignored and disallowed
/// tokens are dropped, emoji render in text form (FE0F stripped).
pub(crate) fn tokens_to_string(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Ignored { .. } | Token::Disallowed { .. } => {}
            Token::Stop { .. } => out.push('.'),
            Token::Valid { cps } | Token::Mapped { cps, .. } | Token::Nfc { cps, .. } => {
                out.push_str(&utils::cps2str(cps))
            }
            Token::Emoji { cps, .. } => out.push_str(&utils::cps2str(cps)),
        }
    }
    out
}

/// Render the stream for the label checks: every emoji collapses to a single
/// U+FE0F placeholder so label boundaries and positions stay simple.
pub(crate) fn tokens_to_projection(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Ignored { .. } | Token::Disallowed { .. } => {}
            Token::Stop { .. } => out.push('.'),
            Token::Valid { cps } | Token::Mapped { cps, .. } | Token::Nfc { cps, .. } => {
                out.push_str(&utils::cps2str(cps))
            }
            Token::Emoji { .. } => out.push('\u{FE0F}'),
        }
    }
    out
}
