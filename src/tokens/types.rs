use crate::{constants, CodePoint};
use serde::{Deserialize, Serialize};

/// One unit of the scanned name. The serialized form is part of the public
/// contract: `{"type": "valid", "cps": [...]}` and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Token {
    Valid {
        cps: Vec<CodePoint>,
    },
    Mapped {
        cp: CodePoint,
        cps: Vec<CodePoint>,
    },
    Ignored {
        cp: CodePoint,
    },
    Disallowed {
        cp: CodePoint,
    },
    Emoji {
        /// Pretty form with FE0F restored.
        emoji: Vec<CodePoint>,
        /// Raw input code points as they were scanned.
        input: Vec<CodePoint>,
        /// Text form with FE0F stripped.
        cps: Vec<CodePoint>,
    },
    Stop {
        cp: CodePoint,
    },
    Nfc {
        input: Vec<CodePoint>,
        cps: Vec<CodePoint>,
    },
}

impl Token {
    pub fn stop() -> Self {
        Token::Stop {
            cp: constants::CP_STOP,
        }
    }

    /// Code points this token contributes to the normalized output.
    pub fn cps(&self) -> &[CodePoint] {
        match self {
            Token::Valid { cps }
            | Token::Mapped { cps, .. }
            | Token::Nfc { cps, .. }
            | Token::Emoji { cps, .. } => cps,
            _ => &[],
        }
    }

    pub fn is_emoji(&self) -> bool {
        matches!(self, Token::Emoji { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Token::Ignored { .. })
    }

    pub fn is_disallowed(&self) -> bool {
        matches!(self, Token::Disallowed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::valid(Token::Valid { cps: vec![97] }, r#"{"type":"valid","cps":[97]}"#)]
    #[case::mapped(
        Token::Mapped { cp: 65, cps: vec![97] },
        r#"{"type":"mapped","cp":65,"cps":[97]}"#
    )]
    #[case::ignored(Token::Ignored { cp: 173 }, r#"{"type":"ignored","cp":173}"#)]
    #[case::disallowed(Token::Disallowed { cp: 63 }, r#"{"type":"disallowed","cp":63}"#)]
    #[case::emoji(
        Token::Emoji { emoji: vec![128169, 65039], input: vec![128169], cps: vec![128169] },
        r#"{"type":"emoji","emoji":[128169,65039],"input":[128169],"cps":[128169]}"#
    )]
    #[case::stop(Token::stop(), r#"{"type":"stop","cp":46}"#)]
    #[case::nfc(
        Token::Nfc { input: vec![97, 768], cps: vec![224] },
        r#"{"type":"nfc","input":[97,768],"cps":[224]}"#
    )]
    fn test_token_json_shape(#[case] token: Token, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&token).unwrap(), expected);
        let back: Token = serde_json::from_str(expected).unwrap();
        assert_eq!(back, token);
    }
}
