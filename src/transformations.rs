use crate::{tokens::Token, utils};

/// A modification `normalize` applied silently: a mapped character, a dropped
/// ignored character, an FE0F-stripped emoji or an NFC fold. Shares the
/// curable-error shape so consumers can surface both the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    pub kind: TransformationKind,
    pub index: usize,
    pub sequence: String,
    pub suggested: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformationKind {
    Ignored,
    Mapped,
    Fe0f,
    Nfc,
}

impl TransformationKind {
    pub fn code(&self) -> &'static str {
        match self {
            TransformationKind::Ignored => "IGNORED",
            TransformationKind::Mapped => "MAPPED",
            TransformationKind::Fe0f => "FE0F",
            TransformationKind::Nfc => "NFC",
        }
    }
}

/// Walk the token stream and report every token that changed its input,
/// with a running input-aligned code-point index.
pub(crate) fn find_transformations(tokens: &[Token]) -> Vec<Transformation> {
    let mut out = Vec::new();
    let mut start = 0;
    for token in tokens {
        let mut record = None;
        let scanned = match token {
            Token::Mapped { cp, cps } => {
                record = Some((
                    TransformationKind::Mapped,
                    utils::cp2str(*cp),
                    utils::cps2str(cps),
                ));
                1
            }
            Token::Ignored { cp } => {
                record = Some((
                    TransformationKind::Ignored,
                    utils::cp2str(*cp),
                    String::new(),
                ));
                1
            }
            Token::Emoji { input, cps, .. } => {
                if input != cps {
                    record = Some((
                        TransformationKind::Fe0f,
                        utils::cps2str(input),
                        utils::cps2str(cps),
                    ));
                }
                input.len()
            }
            Token::Nfc { input, cps } => {
                record = Some((
                    TransformationKind::Nfc,
                    utils::cps2str(input),
                    utils::cps2str(cps),
                ));
                input.len()
            }
            Token::Valid { cps } => cps.len(),
            Token::Stop { .. } | Token::Disallowed { .. } => 1,
        };
        if let Some((kind, sequence, suggested)) = record {
            out.push(Transformation {
                kind,
                index: start,
                sequence,
                suggested,
            });
        }
        start += scanned;
    }
    out
}
