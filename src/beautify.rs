use crate::{constants, tokens::Token, utils, CodePoint};

/// Render the beautified name: emoji keep their pretty (FE0F-restored) form
/// and ξ becomes Ξ in every label that did not resolve to the Greek group.
pub(crate) fn tokens_to_beautified(tokens: &[Token], label_is_greek: &[bool]) -> String {
    let mut out = String::new();
    let mut label_index = 0;
    for token in tokens {
        match token {
            Token::Ignored { .. } | Token::Disallowed { .. } => {}
            Token::Stop { .. } => {
                out.push('.');
                label_index += 1;
            }
            Token::Emoji { emoji, .. } => out.push_str(&utils::cps2str(emoji)),
            Token::Valid { cps } | Token::Mapped { cps, .. } | Token::Nfc { cps, .. } => {
                let is_greek = label_is_greek.get(label_index).copied().unwrap_or(false);
                if is_greek {
                    out.push_str(&utils::cps2str(cps));
                } else {
                    out.push_str(&utils::cps2str(&capitalize_xi(cps)));
                }
            }
        }
    }
    out
}

fn capitalize_xi(cps: &[CodePoint]) -> Vec<CodePoint> {
    cps.iter()
        .map(|cp| {
            if *cp == constants::CP_XI_SMALL {
                constants::CP_XI_CAPITAL
            } else {
                *cp
            }
        })
        .collect()
}
