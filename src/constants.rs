#![allow(dead_code)]

use crate::CodePoint;

pub const CP_STOP: CodePoint = 0x2E;
pub const CP_FE0F: CodePoint = 0xFE0F;
pub const CP_UNDERSCORE: CodePoint = 0x5F;
pub const CP_HYPHEN: CodePoint = 0x2D;
pub const CP_XI_SMALL: CodePoint = 0x3BE;
pub const CP_XI_CAPITAL: CodePoint = 0x39E;
pub const CP_ZWNJ: CodePoint = 0x200C;
pub const CP_ZWJ: CodePoint = 0x200D;

pub const STR_FE0F: &str = "\u{fe0f}";
pub const MAX_ASCII: CodePoint = 0x80;
