mod data;
mod group;
mod json;

pub use data::{SpecData, WholeConfusable, WholeEntry};
pub use group::{GroupName, ScriptGroup};
pub use json::{FencedJson, GroupJson, MappedJson, SpecJson, WholeObjectJson, WholeValueJson};
