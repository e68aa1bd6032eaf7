use crate::{
    constants,
    spec::{
        json::{SpecJson, WholeValueJson},
        GroupName, ScriptGroup,
    },
    utils, CodePoint,
};
use anyhow::{ensure, Context};
use itertools::Itertools;
use regex::Regex;
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

/// Frozen normalization tables plus the derived indices the pipeline needs.
///
/// Constructed once from a spec document and shared read-only afterwards;
/// every lookup is by value and the struct is `Send + Sync`.
#[derive(Debug)]
pub struct SpecData {
    unicode_version: String,
    valid: HashSet<CodePoint>,
    ignored: HashSet<CodePoint>,
    mapped: HashMap<CodePoint, Vec<CodePoint>>,
    cm: HashSet<CodePoint>,
    nsm: HashSet<CodePoint>,
    nsm_max: u32,
    nfc_check: HashSet<CodePoint>,
    fenced: HashMap<CodePoint, String>,
    groups: Vec<ScriptGroup>,
    whole_map: HashMap<CodePoint, WholeEntry>,
    emoji_text_to_pretty: HashMap<Vec<CodePoint>, Vec<CodePoint>>,
    emoji_matcher: Regex,
}

/// One `whole_map` entry after group names have been resolved to indices.
#[derive(Debug)]
pub enum WholeEntry {
    /// The code point is unique to its script; the label cannot be a
    /// whole-script confusable.
    Unique,
    Confusable(WholeConfusable),
}

#[derive(Debug)]
pub struct WholeConfusable {
    pub confused: HashSet<CodePoint>,
    /// For each code point, the groups (by index) able to produce a lookalike.
    pub maker: HashMap<CodePoint, Vec<usize>>,
}

impl SpecData {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let raw: SpecJson = serde_json::from_str(json).context("parsing spec document")?;
        Self::new(raw)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading spec document from {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn new(raw: SpecJson) -> anyhow::Result<Self> {
        let groups: Vec<ScriptGroup> = raw.groups.into_iter().map(ScriptGroup::from).collect();
        let valid = compute_valid(&groups);

        let ignored: HashSet<CodePoint> = raw.ignored.into_iter().collect();
        ensure!(
            valid.is_disjoint(&ignored),
            "valid and ignored sets overlap"
        );

        let mapped: HashMap<CodePoint, Vec<CodePoint>> =
            raw.mapped.into_iter().map(|m| (m.from, m.to)).collect();
        for cp in mapped.keys() {
            ensure!(
                !valid.contains(cp) && !ignored.contains(cp),
                "mapped code point {cp} is not disallowed as input"
            );
        }

        let mut cm: HashSet<CodePoint> = raw.cm.into_iter().collect();
        cm.remove(&constants::CP_FE0F);

        let group_index: HashMap<&GroupName, usize> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (&g.name, i))
            .collect();
        let whole_map = raw
            .whole_map
            .into_iter()
            .map(|(cp, value)| {
                let entry = match value {
                    WholeValueJson::Marker(_) => WholeEntry::Unique,
                    WholeValueJson::Confusable(obj) => {
                        ensure!(
                            obj.m.contains_key(&cp),
                            "whole_map entry for {cp} does not cover itself"
                        );
                        let maker = obj
                            .m
                            .into_iter()
                            .map(|(cp, names)| {
                                let indices = names
                                    .iter()
                                    .map(|name| {
                                        group_index.get(name).copied().with_context(|| {
                                            format!("whole_map references unknown group {name}")
                                        })
                                    })
                                    .collect::<anyhow::Result<Vec<usize>>>()?;
                                Ok((cp, indices))
                            })
                            .collect::<anyhow::Result<HashMap<_, _>>>()?;
                        WholeEntry::Confusable(WholeConfusable {
                            confused: obj.v.into_iter().collect(),
                            maker,
                        })
                    }
                };
                Ok((cp, entry))
            })
            .collect::<anyhow::Result<HashMap<_, _>>>()?;

        for seq in &raw.emoji {
            ensure!(
                seq.iter().any(|cp| *cp != constants::CP_FE0F),
                "emoji sequence is empty after FE0F stripping"
            );
        }
        let emoji_text_to_pretty: HashMap<Vec<CodePoint>, Vec<CodePoint>> = raw
            .emoji
            .iter()
            .map(|e| (utils::filter_fe0f(e), e.clone()))
            .collect();
        let emoji_matcher =
            build_emoji_matcher(&raw.emoji).context("compiling the emoji matcher")?;

        check_unicode_version(&raw.unicode);
        tracing::debug!(
            groups = groups.len(),
            valid = valid.len(),
            mapped = mapped.len(),
            emoji = emoji_text_to_pretty.len(),
            "loaded normalization spec"
        );

        Ok(Self {
            unicode_version: raw.unicode,
            valid,
            ignored,
            mapped,
            cm,
            nsm: raw.nsm.into_iter().collect(),
            nsm_max: raw.nsm_max,
            nfc_check: raw.nfc_check.into_iter().collect(),
            fenced: raw.fenced.into_iter().map(|f| (f.from, f.to)).collect(),
            groups,
            whole_map,
            emoji_text_to_pretty,
            emoji_matcher,
        })
    }
}

impl SpecData {
    pub fn unicode_version(&self) -> &str {
        &self.unicode_version
    }

    pub fn is_stop(&self, cp: CodePoint) -> bool {
        cp == constants::CP_STOP
    }

    pub fn is_valid(&self, cp: CodePoint) -> bool {
        self.valid.contains(&cp)
    }

    pub fn is_ignored(&self, cp: CodePoint) -> bool {
        self.ignored.contains(&cp)
    }

    pub fn is_cm(&self, cp: CodePoint) -> bool {
        self.cm.contains(&cp)
    }

    pub fn is_nsm(&self, cp: CodePoint) -> bool {
        self.nsm.contains(&cp)
    }

    pub fn nsm_max(&self) -> u32 {
        self.nsm_max
    }

    pub fn is_fenced(&self, cp: CodePoint) -> bool {
        self.fenced.contains_key(&cp)
    }

    pub fn fenced_name(&self, cp: CodePoint) -> Option<&str> {
        self.fenced.get(&cp).map(String::as_str)
    }

    pub fn mapping(&self, cp: CodePoint) -> Option<&Vec<CodePoint>> {
        self.mapped.get(&cp)
    }

    pub fn requires_nfc_check(&self, cps: &[CodePoint]) -> bool {
        cps.iter().any(|cp| self.nfc_check.contains(cp))
    }

    /// Pretty (FE0F-restored) form of an emoji given its text form.
    pub fn pretty_emoji(&self, text_cps: &[CodePoint]) -> Option<&Vec<CodePoint>> {
        self.emoji_text_to_pretty.get(text_cps)
    }

    /// Non-overlapping emoji matches over `input`, longest-first at every
    /// position (the alternation is sorted by FE0F-stripped length).
    pub fn emoji_matches<'a>(&'a self, input: &'a str) -> impl Iterator<Item = regex::Match<'a>> {
        self.emoji_matcher.find_iter(input)
    }

    pub fn groups(&self) -> &[ScriptGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> &ScriptGroup {
        &self.groups[index]
    }

    pub fn whole_entry(&self, cp: CodePoint) -> Option<&WholeEntry> {
        self.whole_map.get(&cp)
    }
}

/// Union of every group's `V`, closed under NFD so that decompositions of
/// valid code points tokenize as valid.
fn compute_valid(groups: &[ScriptGroup]) -> HashSet<CodePoint> {
    let mut valid: HashSet<CodePoint> = HashSet::new();
    for g in groups {
        valid.extend(g.iter_all());
    }
    let decomposed: Vec<CodePoint> = utils::nfd_cps(&valid.iter().cloned().collect::<Vec<_>>());
    valid.extend(decomposed);
    valid
}

fn build_emoji_matcher(emoji: &[Vec<CodePoint>]) -> Result<Regex, regex::Error> {
    let fe0f = regex::escape(constants::STR_FE0F);

    let mut sequences = insert_optional_fe0f(emoji);
    sequences.sort_by_key(|cps| std::cmp::Reverse(utils::filter_fe0f(cps).len()));

    let pattern = sequences
        .iter()
        .map(|cps| regex::escape(&utils::cps2str(cps)).replace(&fe0f, &format!("{fe0f}?")))
        .join("|");

    if pattern.is_empty() {
        // a spec without emoji still needs a matcher that never matches
        return Regex::new("[^\\s\\S]");
    }
    Regex::new(&pattern)
}

/// Append FE0F to every emoji prefix that some other sequence follows with
/// FE0F. A trie matcher would flag such prefixes instead of storing FE0F
/// nodes, tolerating FE0F placements the flat sequence list does not spell
/// out; the expanded alternation gives the regex the same tolerance.
fn insert_optional_fe0f(emoji: &[Vec<CodePoint>]) -> Vec<Vec<CodePoint>> {
    let mut fe0f_prefixes: HashSet<&[CodePoint]> = HashSet::new();
    for cps in emoji {
        for i in 1..cps.len() {
            if cps[i] == constants::CP_FE0F {
                fe0f_prefixes.insert(&cps[..i]);
            }
        }
    }

    emoji
        .iter()
        .map(|cps| {
            let mut out = Vec::with_capacity(cps.len() + 2);
            for (i, cp) in cps.iter().enumerate() {
                out.push(*cp);
                if fe0f_prefixes.contains(&cps[..i + 1])
                    && (i + 1 == cps.len() || cps[i + 1] != constants::CP_FE0F)
                {
                    out.push(constants::CP_FE0F);
                }
            }
            out
        })
        .collect()
}

fn check_unicode_version(spec_version: &str) {
    let (major, minor, patch) = unicode_normalization::UNICODE_VERSION;
    let provider = format!("{major}.{minor}.{patch}");
    if spec_version != provider {
        tracing::warn!(
            spec = %spec_version,
            provider = %provider,
            "spec unicode version differs from the NFC provider"
        );
    }
}
