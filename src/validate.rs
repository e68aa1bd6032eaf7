use crate::{
    constants,
    error::{CurableError, CurableErrorKind, DisallowedError, ProcessError},
    join,
    spec::{ScriptGroup, SpecData, WholeEntry},
    tokens::Token,
    utils, CodePoint,
};
use itertools::Itertools;

/// Run the label checks over the FE0F-projected token stream.
///
/// On success returns one Greek flag per label (for the beautifier). Curable
/// errors come back re-aligned to code-point positions in the original input.
pub(crate) fn post_check(
    tokens: &[Token],
    input: &str,
    spec: &SpecData,
) -> Result<Vec<bool>, ProcessError> {
    let projection = join::tokens_to_projection(tokens);
    if projection.is_empty() {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        // ignorable residue only, e.g. an all-FE0F name: curable by deletion,
        // already in input coordinates
        return Err(CurableError {
            kind: CurableErrorKind::EmptyLabel,
            index: 0,
            sequence: input.to_string(),
            suggested: String::new(),
        }
        .into());
    }

    let mut label_is_greek = Vec::new();
    match check_projection(&projection, spec, &mut label_is_greek) {
        None => Ok(label_is_greek),
        Some(ProcessError::Curable(mut err)) => {
            err.index = offset_to_input(tokens, err.index);
            Err(err.into())
        }
        Some(err) => Err(err),
    }
}

fn check_projection(
    name: &str,
    spec: &SpecData,
    label_is_greek: &mut Vec<bool>,
) -> Option<ProcessError> {
    if let Some(err) = check_dots(name) {
        return Some(err.into());
    }
    let mut label_offset = 0;
    for label in name.split('.') {
        let cps = utils::str2cps(label);
        let mut is_greek = false;
        let curable = check_underscore(&cps)
            .or_else(|| check_hyphen(&cps))
            .or_else(|| check_cm(&cps, spec))
            .or_else(|| check_fenced(&cps, spec));
        let err = match curable {
            Some(err) => Some(err.into()),
            None => check_group_and_whole(&cps, spec, &mut is_greek),
        };
        label_is_greek.push(is_greek);
        if let Some(mut err) = err {
            // checks ran on a single label; shift back into name coordinates
            if let ProcessError::Curable(curable) = &mut err {
                curable.index += label_offset;
            }
            return Some(err);
        }
        label_offset += cps.len() + 1;
    }
    None
}

/// Leading, trailing and doubled stops all make an empty label.
fn check_dots(name: &str) -> Option<CurableError> {
    let empty_label = |index: usize, sequence: &str, suggested: &str| CurableError {
        kind: CurableErrorKind::EmptyLabel,
        index,
        sequence: sequence.to_string(),
        suggested: suggested.to_string(),
    };
    let cps = utils::str2cps(name);
    if *cps.first()? == constants::CP_STOP {
        return Some(empty_label(0, ".", ""));
    }
    if *cps.last()? == constants::CP_STOP {
        return Some(empty_label(cps.len() - 1, ".", ""));
    }
    cps.windows(2)
        .position(|pair| pair == [constants::CP_STOP, constants::CP_STOP])
        .map(|i| empty_label(i, "..", "."))
}

/// Underscores are only allowed as a contiguous run at the start of a label.
fn check_underscore(cps: &[CodePoint]) -> Option<CurableError> {
    let mut in_middle = false;
    for (i, cp) in cps.iter().enumerate() {
        if *cp != constants::CP_UNDERSCORE {
            in_middle = true;
        } else if in_middle {
            let run = cps[i..]
                .iter()
                .take_while(|cp| **cp == constants::CP_UNDERSCORE)
                .count();
            return Some(CurableError {
                kind: CurableErrorKind::Underscore,
                index: i,
                sequence: "_".repeat(run),
                suggested: String::new(),
            });
        }
    }
    None
}

/// ASCII labels must not carry `--` at positions 2 and 3 (`xn--` et al).
fn check_hyphen(cps: &[CodePoint]) -> Option<CurableError> {
    if cps.len() >= 4
        && cps.iter().all(|cp| utils::is_ascii(*cp))
        && cps[2] == constants::CP_HYPHEN
        && cps[3] == constants::CP_HYPHEN
    {
        return Some(CurableError {
            kind: CurableErrorKind::Hyphen,
            index: 2,
            sequence: "--".to_string(),
            suggested: String::new(),
        });
    }
    None
}

fn check_cm(cps: &[CodePoint], spec: &SpecData) -> Option<CurableError> {
    for (i, cp) in cps.iter().enumerate() {
        if spec.is_cm(*cp) {
            if i == 0 {
                return Some(CurableError {
                    kind: CurableErrorKind::CmStart,
                    index: i,
                    sequence: utils::cp2str(*cp),
                    suggested: String::new(),
                });
            }
            // emoji collapsed to FE0F in this projection
            if cps[i - 1] == constants::CP_FE0F {
                return Some(CurableError {
                    kind: CurableErrorKind::CmEmoji,
                    index: i,
                    sequence: utils::cp2str(*cp),
                    suggested: String::new(),
                });
            }
        }
    }
    None
}

fn check_fenced(cps: &[CodePoint], spec: &SpecData) -> Option<CurableError> {
    let first = *cps.first()?;
    if spec.is_fenced(first) {
        return Some(fenced_error(cps, 0, 1));
    }
    let mut last_end = 0;
    for (i, cp) in cps.iter().enumerate().skip(1) {
        if spec.is_fenced(*cp) {
            if last_end == i {
                return Some(fenced_error(cps, i - 1, i + 1));
            }
            last_end = i + 1;
        }
    }
    if last_end == cps.len() {
        return Some(fenced_error(cps, cps.len() - 1, cps.len()));
    }
    None
}

fn fenced_error(cps: &[CodePoint], start: usize, end: usize) -> CurableError {
    let (kind, suggested) = if start == 0 {
        (CurableErrorKind::FencedLeading, String::new())
    } else if end == cps.len() {
        (CurableErrorKind::FencedTrailing, String::new())
    } else {
        (CurableErrorKind::FencedMulti, utils::cp2str(cps[start]))
    };
    CurableError {
        kind,
        index: start,
        sequence: utils::cps2str(&cps[start..end]),
        suggested,
    }
}

fn check_group_and_whole(
    cps: &[CodePoint],
    spec: &SpecData,
    is_greek: &mut bool,
) -> Option<ProcessError> {
    let cps_no_fe0f = utils::filter_fe0f(cps);
    let unique: Vec<CodePoint> = cps_no_fe0f.iter().cloned().unique().collect();
    let group = match resolve_group(&unique, cps, spec) {
        Ok(group) => group,
        Err(err) => return Some(err.into()),
    };
    *is_greek = group.name.is_greek();
    check_members_and_nsm(group, &cps_no_fe0f, cps, spec)
        .or_else(|| check_whole(group, &unique, spec))
}

/// Restrict the group candidates by every unique code point of the label.
/// `cps_with_fe0f` is only used to locate an offending code point in the
/// projected label for error reporting.
fn resolve_group<'a>(
    unique: &[CodePoint],
    cps_with_fe0f: &[CodePoint],
    spec: &'a SpecData,
) -> Result<&'a ScriptGroup, CurableError> {
    let all = spec.groups();
    let mut candidates: Vec<&ScriptGroup> = all.iter().collect();
    for cp in unique {
        let remaining: Vec<&ScriptGroup> = candidates
            .iter()
            .filter(|g| g.contains(*cp))
            .cloned()
            .collect();
        if remaining.is_empty() {
            let index = cps_with_fe0f
                .iter()
                .position(|c| c == cp)
                .expect("unique code points come from the label");
            let kind = if candidates.len() == all.len() {
                // no group ever accepted this code point
                CurableErrorKind::Disallowed
            } else {
                CurableErrorKind::ConfMixed {
                    script1: all.iter().find(|g| g.contains(*cp)).map(|g| g.name.clone()),
                    script2: candidates[0].name.clone(),
                }
            };
            return Err(CurableError {
                kind,
                index,
                sequence: utils::cp2str(*cp),
                suggested: String::new(),
            });
        }
        candidates = remaining;
        if candidates.len() == 1 {
            break;
        }
    }
    Ok(candidates[0])
}

fn check_members_and_nsm(
    group: &ScriptGroup,
    cps_no_fe0f: &[CodePoint],
    cps_with_fe0f: &[CodePoint],
    spec: &SpecData,
) -> Option<ProcessError> {
    for cp in cps_no_fe0f {
        if !group.contains(*cp) {
            let index = cps_with_fe0f
                .iter()
                .position(|c| c == cp)
                .expect("code point comes from the label");
            return Some(
                CurableError {
                    kind: CurableErrorKind::ConfMixed {
                        script1: spec
                            .groups()
                            .iter()
                            .find(|g| g.contains(*cp))
                            .map(|g| g.name.clone()),
                        script2: group.name.clone(),
                    },
                    index,
                    sequence: utils::cp2str(*cp),
                    suggested: String::new(),
                }
                .into(),
            );
        }
    }

    if group.cm_check {
        let decomposed = utils::nfd_cps(cps_no_fe0f);
        let len = decomposed.len();
        let mut i = 1;
        while i < len {
            if spec.is_nsm(decomposed[i]) {
                let mut j = i + 1;
                while j < len && spec.is_nsm(decomposed[j]) {
                    if j - i + 1 > spec.nsm_max() as usize {
                        return Some(DisallowedError::NsmTooMany.into());
                    }
                    for k in i..j {
                        if decomposed[k] == decomposed[j] {
                            return Some(DisallowedError::NsmRepeated.into());
                        }
                    }
                    j += 1;
                }
                i = j;
            }
            i += 1;
        }
    }
    None
}

/// Whole-script confusable detection: intersect, over the unique code
/// points, the sets of groups able to produce a lookalike. If some group
/// survives and also covers every code point the map has no opinion on, the
/// label as a whole reads as that other script.
fn check_whole(
    group: &ScriptGroup,
    unique: &[CodePoint],
    spec: &SpecData,
) -> Option<ProcessError> {
    let mut maker: Option<Vec<usize>> = None;
    let mut shared: Vec<CodePoint> = Vec::new();
    for cp in unique {
        match spec.whole_entry(*cp) {
            Some(WholeEntry::Unique) => return None,
            Some(WholeEntry::Confusable(whole)) => {
                let confused_groups = whole
                    .maker
                    .get(cp)
                    .expect("validated at load: maker covers its own code point");
                match maker.as_mut() {
                    Some(maker) => maker.retain(|g| confused_groups.contains(g)),
                    None => maker = Some(confused_groups.clone()),
                }
                if maker.as_ref().is_some_and(Vec::is_empty) {
                    return None;
                }
            }
            None => shared.push(*cp),
        }
    }
    for group_index in maker? {
        let candidate = spec.group(group_index);
        if candidate.contains_all(shared.iter().cloned()) {
            return Some(
                DisallowedError::ConfWhole {
                    script1: group.name.clone(),
                    script2: candidate.name.clone(),
                }
                .into(),
            );
        }
    }
    None
}

/// Post-check indices are measured in the projected, NFC-folded name. Walk
/// the tokens until the projection cursor reaches the error position and
/// accumulate the drift against raw input code points.
fn offset_to_input(tokens: &[Token], index: usize) -> usize {
    let mut scanned = 0;
    let mut offset = 0isize;
    for token in tokens {
        if scanned >= index {
            break;
        }
        match token {
            Token::Ignored { .. } | Token::Disallowed { .. } => {
                offset += 1;
            }
            Token::Emoji { input, .. } => {
                offset += input.len() as isize - 1;
                scanned += 1;
            }
            Token::Nfc { input, cps } => {
                offset += input.len() as isize - cps.len() as isize;
                scanned += cps.len();
            }
            Token::Mapped { cps, .. } => {
                offset += 1 - cps.len() as isize;
                scanned += cps.len();
            }
            Token::Stop { .. } => {
                scanned += 1;
            }
            Token::Valid { cps } => {
                scanned += cps.len();
            }
        }
    }
    (index as isize + offset) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{spec::GroupName, testing, tokens::scan};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    #[once]
    fn spec() -> SpecData {
        testing::spec()
    }

    fn run(input: &str, spec: &SpecData) -> Result<Vec<bool>, ProcessError> {
        let (tokens, latched) = scan(input, spec);
        assert!(latched.is_none(), "unexpected scan error for {input:?}");
        post_check(&tokens, input, spec)
    }

    fn curable(
        kind: CurableErrorKind,
        index: usize,
        sequence: &str,
        suggested: &str,
    ) -> ProcessError {
        ProcessError::Curable(CurableError {
            kind,
            index,
            sequence: sequence.to_string(),
            suggested: suggested.to_string(),
        })
    }

    #[rstest]
    #[case::ok("hello", vec![false])]
    #[case::two_labels("hello.eth", vec![false, false])]
    #[case::leading_underscore_run("___abc", vec![false])]
    #[case::greek_flags("ξabc.ξλφα", vec![false, true])]
    #[case::all_emoji_label("👍.eth", vec![false, false])]
    #[case::empty_input("", vec![])]
    fn test_legal(#[case] input: &str, #[case] greek: Vec<bool>, spec: &SpecData) {
        assert_eq!(run(input, spec).unwrap(), greek);
    }

    #[rstest]
    #[case::underscore("a_b", curable(CurableErrorKind::Underscore, 1, "_", ""))]
    #[case::underscore_run("ab__c", curable(CurableErrorKind::Underscore, 2, "__", ""))]
    #[case::underscore_second_label(
        "abc.de_f",
        curable(CurableErrorKind::Underscore, 6, "_", "")
    )]
    #[case::hyphen("ab--cd", curable(CurableErrorKind::Hyphen, 2, "--", ""))]
    #[case::cm_start("\u{300}abc", curable(CurableErrorKind::CmStart, 0, "\u{300}", ""))]
    #[case::cm_after_emoji(
        "a🚴‍♂️\u{300}b",
        curable(CurableErrorKind::CmEmoji, 5, "\u{300}", "")
    )]
    #[case::fenced_leading("’ab", curable(CurableErrorKind::FencedLeading, 0, "’", ""))]
    #[case::fenced_trailing("ab’", curable(CurableErrorKind::FencedTrailing, 2, "’", ""))]
    #[case::fenced_multi("a’⁄b", curable(CurableErrorKind::FencedMulti, 1, "’⁄", "’"))]
    #[case::leading_dot(".ab", curable(CurableErrorKind::EmptyLabel, 0, ".", ""))]
    #[case::trailing_dot("ab.", curable(CurableErrorKind::EmptyLabel, 2, ".", ""))]
    #[case::double_dot("a..b", curable(CurableErrorKind::EmptyLabel, 1, "..", "."))]
    #[case::invisible_residue(
        "\u{FE0F}\u{FE0F}",
        curable(CurableErrorKind::EmptyLabel, 0, "\u{FE0F}\u{FE0F}", "")
    )]
    fn test_curable(#[case] input: &str, #[case] expected: ProcessError, spec: &SpecData) {
        assert_eq!(run(input, spec).unwrap_err(), expected);
    }

    #[rstest]
    fn test_conf_mixed_position_and_scripts(spec: &SpecData) {
        let err = run("bitcoin.bitcοin.bi̇tcoin.bitсoin", spec).unwrap_err();
        let ProcessError::Curable(err) = err else {
            panic!("expected curable, got {err:?}");
        };
        assert_eq!(err.index, 12);
        assert_eq!(err.sequence, "ο");
        assert_eq!(err.suggested, "");
        assert_eq!(
            err.kind,
            CurableErrorKind::ConfMixed {
                script1: Some(GroupName::Greek),
                script2: GroupName::from("Latin"),
            }
        );
        assert_eq!(err.kind.scripts().unwrap(), "Greek/Latin");
    }

    #[rstest]
    fn test_conf_mixed_without_owning_group(spec: &SpecData) {
        // combining acute is valid via NFD closure but belongs to no group
        let err = run("x\u{301}", spec).unwrap_err();
        let ProcessError::Curable(err) = err else {
            panic!("expected curable, got {err:?}");
        };
        assert_eq!(err.index, 1);
        assert_eq!(
            err.kind.scripts().unwrap(),
            "Latin plus other scripts"
        );
    }

    #[rstest]
    fn test_conf_whole(spec: &SpecData) {
        let err = run("0x.0χ.0х", spec).unwrap_err();
        assert_eq!(
            err,
            ProcessError::Disallowed(DisallowedError::ConfWhole {
                script1: GroupName::from("Cyrillic"),
                script2: GroupName::from("Latin"),
            })
        );
    }

    #[rstest]
    #[case::repeated("-إؐؑؑ-.eth", DisallowedError::NsmRepeated)]
    #[case::too_many("-إؐؑؒؓؔ-.eth", DisallowedError::NsmTooMany)]
    fn test_nsm(#[case] input: &str, #[case] expected: DisallowedError, spec: &SpecData) {
        assert_eq!(
            run(input, spec).unwrap_err(),
            ProcessError::Disallowed(expected)
        );
    }

    #[rstest]
    fn test_index_realigned_over_rewrites(spec: &SpecData) {
        // mapped, ignored and emoji tokens before the underscore all shift
        // the projected position away from the input position
        let input = "A\u{AD}a🚴‍♂️x_y";
        let err = run(input, spec).unwrap_err();
        let ProcessError::Curable(err) = err else {
            panic!("expected curable, got {err:?}");
        };
        assert_eq!(err.kind, CurableErrorKind::Underscore);
        let cps = utils::str2cps(input);
        assert_eq!(cps[err.index], constants::CP_UNDERSCORE);
        assert_eq!(err.index, 8);
    }
}
