mod beautify;
pub(crate) mod constants;
mod error;
mod join;
mod normalizer;
mod spec;
mod tokens;
mod transformations;
mod utils;
mod validate;

pub type CodePoint = u32;

pub use error::{CurableError, CurableErrorKind, DisallowedError, ProcessError};
pub use normalizer::{CuredName, Normalizer, ProcessedName};
pub use spec::{
    FencedJson, GroupJson, GroupName, MappedJson, ScriptGroup, SpecData, SpecJson,
    WholeConfusable, WholeEntry, WholeObjectJson, WholeValueJson,
};
pub use tokens::{Token, TokenizedName};
pub use transformations::{Transformation, TransformationKind};

#[cfg(test)]
pub(crate) mod testing {
    use crate::SpecData;

    pub(crate) const SPEC_MINI: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/spec_mini.json"
    ));

    pub(crate) fn spec() -> SpecData {
        SpecData::from_json_str(SPEC_MINI).expect("fixture spec loads")
    }
}
