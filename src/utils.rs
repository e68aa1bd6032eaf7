use crate::{constants, CodePoint};
use unicode_normalization::UnicodeNormalization;

pub fn filter_fe0f(cps: &[CodePoint]) -> Vec<CodePoint> {
    cps.iter()
        .filter(|cp| **cp != constants::CP_FE0F)
        .cloned()
        .collect()
}

pub fn cps2str(cps: &[CodePoint]) -> String {
    cps.iter()
        .map(|cp| char::from_u32(*cp).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

pub fn cp2str(cp: CodePoint) -> String {
    cps2str(&[cp])
}

pub fn str2cps(str: &str) -> Vec<CodePoint> {
    str.chars().map(|c| c as CodePoint).collect()
}

pub fn nfc(str: &str) -> String {
    str.nfc().collect()
}

pub fn nfd_cps(cps: &[CodePoint]) -> Vec<CodePoint> {
    str2cps(&cps2str(cps).nfd().collect::<String>())
}

pub fn is_ascii(cp: CodePoint) -> bool {
    cp < constants::MAX_ASCII
}
