use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ValueId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OpId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionId(pub usize);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^bb{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    /// One Lua value (a constant, a variable cell, a call target).
    Ref,
    /// An ordered group of values: call arguments and results, the right-hand
    /// side of a multiple assignment.
    Pack,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Ref => write!(f, "!lua.ref"),
            ValueType::Pack => write!(f, "!lua.pack"),
        }
    }
}

/// Handle to a value of type `!lua.ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RefValue(ValueId);

/// Handle to a value of type `!lua.pack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PackValue(ValueId);

impl RefValue {
    pub(crate) fn new(id: ValueId) -> Self {
        RefValue(id)
    }

    pub fn id(self) -> ValueId {
        self.0
    }
}

impl PackValue {
    pub(crate) fn new(id: ValueId) -> Self {
        PackValue(id)
    }

    pub fn id(self) -> ValueId {
        self.0
    }
}

impl From<RefValue> for ValueId {
    fn from(value: RefValue) -> Self {
        value.0
    }
}

impl From<PackValue> for ValueId {
    fn from(value: PackValue) -> Self {
        value.0
    }
}

/// Where a value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueDef {
    OpResult { op: OpId, index: usize },
    BlockArg { block: BlockId, index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueData {
    pub ty: ValueType,
    pub def: ValueDef,
}

/// Typed constant payload of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Attribute {
    I64(i64),
    F64(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttrKind {
    I64,
    F64,
    Str,
}

impl Attribute {
    pub fn kind(&self) -> AttrKind {
        match self {
            Attribute::I64(_) => AttrKind::I64,
            Attribute::F64(_) => AttrKind::F64,
            Attribute::Str(_) => AttrKind::Str,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::I64(v) => write!(f, "{} : i64", v),
            Attribute::F64(v) => write!(f, "{:?} : f64", v),
            Attribute::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrKind::I64 => write!(f, "i64"),
            AttrKind::F64 => write!(f, "f64"),
            AttrKind::Str => write!(f, "string"),
        }
    }
}

/// A numeric constant as accepted by `lua.number`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NumberValue {
    Int(i64),
    Float(f64),
}

impl From<NumberValue> for Attribute {
    fn from(value: NumberValue) -> Self {
        match value {
            NumberValue::Int(v) => Attribute::I64(v),
            NumberValue::Float(v) => Attribute::F64(v),
        }
    }
}
