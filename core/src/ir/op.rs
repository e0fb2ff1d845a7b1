use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::value::{Attribute, BlockId, ValueId};
use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OpKind {
    Nil,
    Number,
    GetOrAlloc,
    Concat,
    Unpack,
    Assign,
    Call,
    Return,
}

impl OpKind {
    pub const ALL: [OpKind; 8] = [
        OpKind::Nil,
        OpKind::Number,
        OpKind::GetOrAlloc,
        OpKind::Concat,
        OpKind::Unpack,
        OpKind::Assign,
        OpKind::Call,
        OpKind::Return,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpKind::Nil => "lua.nil",
            OpKind::Number => "lua.number",
            OpKind::GetOrAlloc => "lua.get_or_alloc",
            OpKind::Concat => "lua.concat",
            OpKind::Unpack => "lua.unpack",
            OpKind::Assign => "lua.assign",
            OpKind::Call => "lua.call",
            OpKind::Return => "return",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub kind: OpKind,
    pub block: BlockId,
    pub operands: Vec<ValueId>,
    pub attributes: BTreeMap<String, Attribute>,
    pub results: Vec<ValueId>,
    pub loc: Location,
}

impl Operation {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}
