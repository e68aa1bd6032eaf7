use ensip15::{
    CurableError, CurableErrorKind, DisallowedError, GroupName, Normalizer, ProcessError,
    SpecData, Token, TransformationKind,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

const SPEC_MINI: &str = include_str!("fixtures/spec_mini.json");

#[fixture]
#[once]
fn normalizer() -> Normalizer {
    Normalizer::new(SpecData::from_json_str(SPEC_MINI).expect("fixture spec loads"))
}

fn curable(kind: CurableErrorKind, index: usize, sequence: &str, suggested: &str) -> ProcessError {
    ProcessError::Curable(CurableError {
        kind,
        index,
        sequence: sequence.to_string(),
        suggested: suggested.to_string(),
    })
}

#[rstest]
#[case::simple("vitalik.eth", Ok(("vitalik.eth", "vitalik.eth")))]
#[case::uppercase("VITALIK.ETH", Ok(("vitalik.eth", "vitalik.eth")))]
#[case::mapped_single("Ab", Ok(("ab", "ab")))]
#[case::empty("", Ok(("", "")))]
#[case::fe0f_emoji("a🚴‍♂️", Ok(("a🚴‍♂", "a🚴‍♂️")))]
#[case::keycap("1⃣", Ok(("1⃣", "1️⃣")))]
#[case::nfc_fold("aa\u{300}b", Ok(("aàb", "aàb")))]
#[case::xi_rule("ξabc.ξλφα", Ok(("ξabc.ξλφα", "Ξabc.ξλφα")))]
#[case::leading_underscores("______vitalik", Ok(("______vitalik", "______vitalik")))]
#[case::underscore_middle(
    "a_b",
    Err(curable(CurableErrorKind::Underscore, 1, "_", ""))
)]
#[case::underscore_after_prefix(
    "vitalik__",
    Err(curable(CurableErrorKind::Underscore, 7, "__", ""))
)]
#[case::hyphen_34(
    "xx--xx",
    Err(curable(CurableErrorKind::Hyphen, 2, "--", ""))
)]
#[case::empty_label(
    "a..b",
    Err(curable(CurableErrorKind::EmptyLabel, 1, "..", "."))
)]
#[case::leading_dot(
    ".ab",
    Err(curable(CurableErrorKind::EmptyLabel, 0, ".", ""))
)]
#[case::fe0f_residue(
    "\u{FE0F}\u{FE0F}",
    Err(curable(CurableErrorKind::EmptyLabel, 0, "\u{FE0F}\u{FE0F}", ""))
)]
#[case::cm_start(
    "abcd.\u{303}eth",
    Err(curable(CurableErrorKind::CmStart, 5, "\u{303}", ""))
)]
#[case::cm_after_emoji(
    "vi👍\u{303}talik",
    Err(curable(CurableErrorKind::CmEmoji, 3, "\u{303}", ""))
)]
#[case::fenced_leading(
    "・abcd",
    Err(curable(CurableErrorKind::FencedLeading, 0, "・", ""))
)]
#[case::fenced_trailing(
    "abcd・",
    Err(curable(CurableErrorKind::FencedTrailing, 4, "・", ""))
)]
#[case::fenced_multi(
    "a・’a",
    Err(curable(CurableErrorKind::FencedMulti, 1, "・’", "・"))
)]
#[case::disallowed_space(
    "vitalik .eth",
    Err(curable(CurableErrorKind::Disallowed, 7, " ", ""))
)]
#[case::invisible_zwj(
    "vitalik\u{200D}.eth",
    Err(curable(CurableErrorKind::Invisible, 7, "\u{200D}", ""))
)]
#[case::nsm_repeated(
    "-إؐؑؑ-.eth",
    Err(ProcessError::Disallowed(DisallowedError::NsmRepeated))
)]
#[case::nsm_too_many(
    "-إؐؑؒؓؔ-.eth",
    Err(ProcessError::Disallowed(DisallowedError::NsmTooMany))
)]
fn e2e(
    #[case] input: &str,
    #[case] expected: Result<(&str, &str), ProcessError>,
    normalizer: &Normalizer,
) {
    let actual = normalizer.process(input);
    match expected {
        Ok((normalized, beautified)) => {
            let processed = actual.expect("process should succeed");
            assert_eq!(processed.normalized(), normalized);
            assert_eq!(processed.beautified(), beautified);
        }
        Err(expected) => assert_eq!(actual.unwrap_err(), expected),
    }
}

#[rstest]
fn e2e_conf_mixed(normalizer: &Normalizer) {
    let err = normalizer
        .normalize("bitcoin.bitcοin.bi̇tcoin.bitсoin")
        .unwrap_err();
    let ProcessError::Curable(err) = err else {
        panic!("expected curable, got {err:?}");
    };
    assert_eq!(err.code(), "CONF_MIXED");
    assert_eq!(err.index, 12);
    assert_eq!(err.sequence, "ο");
    assert_eq!(err.kind.scripts().unwrap(), "Greek/Latin");
}

#[rstest]
fn e2e_conf_whole(normalizer: &Normalizer) {
    let err = normalizer.normalize("0x.0χ.0х").unwrap_err();
    assert_eq!(
        err,
        ProcessError::Disallowed(DisallowedError::ConfWhole {
            script1: GroupName::from("Cyrillic"),
            script2: GroupName::from("Latin"),
        })
    );
    assert_eq!(err.code(), "CONF_WHOLE");
}

#[rstest]
fn e2e_transformations(normalizer: &Normalizer) {
    let transformations = normalizer.transformations("a🚴‍♂️").unwrap();
    assert_eq!(transformations.len(), 1);
    assert_eq!(transformations[0].kind, TransformationKind::Fe0f);
    assert_eq!(transformations[0].index, 1);
    assert_eq!(transformations[0].sequence, "🚴‍♂️");
    assert_eq!(transformations[0].suggested, "🚴‍♂");

    let transformations = normalizer.transformations("aa\u{300}b").unwrap();
    assert_eq!(transformations.len(), 1);
    assert_eq!(transformations[0].kind, TransformationKind::Nfc);
    assert_eq!(transformations[0].index, 1);
    assert_eq!(transformations[0].sequence, "a\u{300}");
    assert_eq!(transformations[0].suggested, "à");
}

#[rstest]
fn e2e_cure(normalizer: &Normalizer) {
    let cured = normalizer.cure("a_b").unwrap();
    assert_eq!(cured.cured, "ab");
    assert_eq!(cured.fixes.len(), 1);
    assert_eq!(cured.fixes[0].code(), "UNDERSCORE");

    let cured = normalizer.cure("a..b").unwrap();
    assert_eq!(cured.cured, "a.b");

    assert!(matches!(
        normalizer.cure("0x.0χ.0х"),
        Err(ProcessError::Disallowed(_))
    ));
}

#[rstest]
fn e2e_is_normalized(normalizer: &Normalizer) {
    assert!(normalizer.is_normalized(""));
    assert!(normalizer.is_normalized("vitalik.eth"));
    assert!(normalizer.is_normalized("a🚴‍♂"));
    assert!(!normalizer.is_normalized("VITALIK.ETH"));
    assert!(!normalizer.is_normalized("a🚴‍♂️"));
    assert!(!normalizer.is_normalized("a_b"));
}

#[rstest]
fn e2e_tokenize_json_shape(normalizer: &Normalizer) {
    let tokenized = normalizer.tokenize("A💩\u{FE0F}");
    let json = serde_json::to_value(&tokenized.tokens).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "mapped", "cp": 65, "cps": [97]},
            {"type": "emoji", "emoji": [128169, 65039], "input": [128169, 65039], "cps": [128169]},
        ])
    );
}

#[rstest]
fn e2e_error_messages_are_stable(normalizer: &Normalizer) {
    let err = normalizer.normalize("a_b").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid sequence '_' at position 1: an underscore is only allowed at the start of a label"
    );
    let err = normalizer.normalize("-إؐؑؑ-.eth").unwrap_err();
    assert_eq!(err.to_string(), "contains a repeated non-spacing mark");
}

#[rstest]
fn e2e_index_alignment_after_rewrites(normalizer: &Normalizer) {
    // every modification before the fault moves the projected index away
    // from the input index; the reported one must match the input
    for (input, bad) in [
        ("abc.A\u{AD}b🚴‍♂️_x", '_'),
        ("A💩\u{FE0F}?", '?'),
        ("aa\u{300}b.c_d", '_'),
    ] {
        let err = normalizer.normalize(input).unwrap_err();
        let ProcessError::Curable(err) = err else {
            panic!("expected curable for {input:?}");
        };
        let cps: Vec<char> = input.chars().collect();
        assert_eq!(cps[err.index], bad, "misaligned index for {input:?}");
    }
}

#[rstest]
fn e2e_tokenize_covers_disallowed(normalizer: &Normalizer) {
    let tokenized = normalizer.tokenize("vitalik .eth");
    assert!(tokenized.tokens.iter().any(|t| t.is_disallowed()));
    assert_eq!(
        tokenized.tokens.iter().filter(|t| t.is_emoji()).count(),
        0
    );
    // stream still covers the stop and the trailing label
    assert!(tokenized
        .tokens
        .iter()
        .any(|t| matches!(t, Token::Stop { .. })));
}
