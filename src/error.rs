use crate::spec::GroupName;

/// Outcome of running the pipeline on a name that cannot be normalized.
///
/// The taxonomy has two families: [`DisallowedError`] applies to the whole
/// name and has no per-position cure, while [`CurableError`] points at a
/// sequence in the input that can be replaced to make progress.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Disallowed(#[from] DisallowedError),
    #[error(transparent)]
    Curable(#[from] CurableError),
    #[error("cure did not converge within {limit} attempts")]
    CureNotConverging { limit: usize },
}

impl ProcessError {
    pub fn code(&self) -> &'static str {
        match self {
            ProcessError::Disallowed(e) => e.code(),
            ProcessError::Curable(e) => e.code(),
            ProcessError::CureNotConverging { .. } => "CURE_NOT_CONVERGING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisallowedError {
    #[error("the name is empty")]
    EmptyName,
    #[error("contains a repeated non-spacing mark")]
    NsmRepeated,
    #[error("contains too many consecutive non-spacing marks")]
    NsmTooMany,
    #[error("contains visually confusing characters from the {script1} and {script2} scripts")]
    ConfWhole {
        script1: GroupName,
        script2: GroupName,
    },
}

impl DisallowedError {
    pub fn code(&self) -> &'static str {
        match self {
            DisallowedError::EmptyName => "EMPTY_NAME",
            DisallowedError::NsmRepeated => "NSM_REPEATED",
            DisallowedError::NsmTooMany => "NSM_TOO_MANY",
            DisallowedError::ConfWhole { .. } => "CONF_WHOLE",
        }
    }
}

/// A disallowed sequence with a deterministic fix.
///
/// `index` is a 0-based code-point offset into the original input,
/// `sequence` is the input substring to replace and `suggested` its
/// replacement (empty means deletion).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sequence '{sequence}' at position {index}: {kind}")]
pub struct CurableError {
    pub kind: CurableErrorKind,
    pub index: usize,
    pub sequence: String,
    pub suggested: String,
}

impl CurableError {
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurableErrorKind {
    #[error("an underscore is only allowed at the start of a label")]
    Underscore,
    #[error("hyphens are disallowed at the 2nd and 3rd positions of a label")]
    Hyphen,
    #[error("empty labels are not allowed")]
    EmptyLabel,
    #[error("a combining mark is disallowed at the start of a label")]
    CmStart,
    #[error("a combining mark is disallowed after an emoji")]
    CmEmoji,
    #[error("this character is disallowed")]
    Disallowed,
    #[error("this invisible character is disallowed")]
    Invisible,
    #[error("this character is disallowed at the start of a label")]
    FencedLeading,
    #[error("characters in this sequence cannot be placed next to each other")]
    FencedMulti,
    #[error("this character is disallowed at the end of a label")]
    FencedTrailing,
    #[error(
        "this character is visually confusing with another character from a different script ({})",
        scripts_slot(.script1, .script2)
    )]
    ConfMixed {
        /// A group that does contain the offending code point, when one exists.
        script1: Option<GroupName>,
        /// The group the rest of the label had resolved towards.
        script2: GroupName,
    },
}

impl CurableErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            CurableErrorKind::Underscore => "UNDERSCORE",
            CurableErrorKind::Hyphen => "HYPHEN",
            CurableErrorKind::EmptyLabel => "EMPTY_LABEL",
            CurableErrorKind::CmStart => "CM_START",
            CurableErrorKind::CmEmoji => "CM_EMOJI",
            CurableErrorKind::Disallowed => "DISALLOWED",
            CurableErrorKind::Invisible => "INVISIBLE",
            CurableErrorKind::FencedLeading => "FENCED_LEADING",
            CurableErrorKind::FencedMulti => "FENCED_MULTI",
            CurableErrorKind::FencedTrailing => "FENCED_TRAILING",
            CurableErrorKind::ConfMixed { .. } => "CONF_MIXED",
        }
    }

    /// The `{scripts}` message slot for confusable errors, `None` otherwise.
    pub fn scripts(&self) -> Option<String> {
        match self {
            CurableErrorKind::ConfMixed { script1, script2 } => {
                Some(scripts_slot(script1, script2))
            }
            _ => None,
        }
    }
}

fn scripts_slot(script1: &Option<GroupName>, script2: &GroupName) -> String {
    match script1 {
        Some(script1) => format!("{script1}/{script2}"),
        None => format!("{script2} plus other scripts"),
    }
}
