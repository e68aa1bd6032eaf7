//! Raw serde model of the spec document. [`crate::SpecData`] turns this into
//! the frozen lookup structure the pipeline runs against.

use crate::{spec::GroupName, CodePoint};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::collections::HashMap;

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct SpecJson {
    #[serde(default)]
    pub created: String,
    pub unicode: String,
    #[serde(default)]
    pub cldr: String,
    pub emoji: Vec<Vec<CodePoint>>,
    pub ignored: Vec<CodePoint>,
    pub mapped: Vec<MappedJson>,
    pub fenced: Vec<FencedJson>,
    pub cm: Vec<CodePoint>,
    pub nsm: Vec<CodePoint>,
    pub nsm_max: u32,
    pub groups: Vec<GroupJson>,
    pub nfc_check: Vec<CodePoint>,
    #[serde_as(as = "HashMap<DisplayFromStr, _>")]
    pub whole_map: HashMap<CodePoint, WholeValueJson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MappedJson {
    pub from: CodePoint,
    pub to: Vec<CodePoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FencedJson {
    pub from: CodePoint,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupJson {
    pub name: GroupName,
    pub primary: Vec<CodePoint>,
    pub secondary: Vec<CodePoint>,
    pub cm: Option<Vec<CodePoint>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WholeValueJson {
    /// The scalar 1: this code point is unique to its script and exempts the
    /// label from the whole-confusable intersection.
    Marker(u32),
    Confusable(WholeObjectJson),
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct WholeObjectJson {
    #[serde(rename = "V")]
    pub v: Vec<CodePoint>,
    #[serde(rename = "M")]
    #[serde_as(as = "HashMap<DisplayFromStr, _>")]
    pub m: HashMap<CodePoint, Vec<GroupName>>,
}
