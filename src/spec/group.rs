use crate::{spec::json, CodePoint};
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use std::collections::HashSet;

/// Script group names as they appear in the spec document. Greek is the only
/// name the pipeline treats specially (the ξ/Ξ beautification rule).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GroupName {
    Greek,
    #[serde(untagged)]
    Other(String),
}
derive_fromstr_from_deserialize!(GroupName);
derive_display_from_serialize!(GroupName);

impl GroupName {
    pub fn is_greek(&self) -> bool {
        matches!(self, GroupName::Greek)
    }
}

impl From<&str> for GroupName {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| GroupName::Other(s.to_string()))
    }
}

/// A script-restricted set of allowed code points.
///
/// `all` is `V = primary ∪ secondary`; `cm_check` is set for groups that
/// require the non-spacing-mark run checks after NFD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptGroup {
    pub name: GroupName,
    pub primary: HashSet<CodePoint>,
    pub secondary: HashSet<CodePoint>,
    all: HashSet<CodePoint>,
    pub cm_check: bool,
}

impl From<json::GroupJson> for ScriptGroup {
    fn from(g: json::GroupJson) -> Self {
        let primary: HashSet<CodePoint> = g.primary.into_iter().collect();
        let secondary: HashSet<CodePoint> = g.secondary.into_iter().collect();
        let all = primary.union(&secondary).cloned().collect();
        Self {
            name: g.name,
            primary,
            secondary,
            all,
            // absence of the `cm` key marks a group whose combining marks
            // are constrained by the NSM run rules
            cm_check: g.cm.is_none(),
        }
    }
}

impl ScriptGroup {
    pub fn contains(&self, cp: CodePoint) -> bool {
        self.all.contains(&cp)
    }

    pub fn contains_all(&self, cps: impl IntoIterator<Item = CodePoint>) -> bool {
        cps.into_iter().all(|cp| self.contains(cp))
    }

    pub fn iter_all(&self) -> impl Iterator<Item = &CodePoint> {
        self.all.iter()
    }
}
