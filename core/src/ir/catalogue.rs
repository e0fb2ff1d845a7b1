//! file: core/src/ir/catalogue.rs
//! description: the fixed vocabulary of operations the lowering emits.
//!
//! The catalogue is a plain value built once with `OpCatalogue::lua()` and
//! handed to the builder and the verifier. Nothing about it is global.
//!
use std::collections::BTreeMap;

use super::op::OpKind;
use super::value::{AttrKind, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeConstraint {
    Ref,
    Pack,
    Any,
}

impl TypeConstraint {
    pub fn admits(self, ty: ValueType) -> bool {
        matches!(
            (self, ty),
            (TypeConstraint::Any, _) | (TypeConstraint::Ref, ValueType::Ref) | (TypeConstraint::Pack, ValueType::Pack)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    Fixed(&'static [TypeConstraint]),
    Variadic(TypeConstraint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Fixed(&'static [ValueType]),
    Variadic(ValueType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    /// Accepted payload kinds; the attribute is required.
    pub kinds: &'static [AttrKind],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDef {
    pub kind: OpKind,
    pub operands: OperandShape,
    pub results: ResultShape,
    pub attributes: &'static [AttrSpec],
    pub terminator: bool,
}

impl OpDef {
    pub fn mnemonic(&self) -> &'static str {
        self.kind.mnemonic()
    }
}

#[derive(Debug, Clone)]
pub struct OpCatalogue {
    defs: BTreeMap<OpKind, OpDef>,
}

const REF: &[ValueType] = &[ValueType::Ref];
const PACK: &[ValueType] = &[ValueType::Pack];
const NONE: &[ValueType] = &[];

impl OpCatalogue {
    /// Catalogue of the `lua` dialect plus the generic `return` terminator.
    pub fn lua() -> Self {
        let defs = [
            OpDef {
                kind: OpKind::Nil,
                operands: OperandShape::Fixed(&[]),
                results: ResultShape::Fixed(REF),
                attributes: &[],
                terminator: false,
            },
            OpDef {
                kind: OpKind::Number,
                operands: OperandShape::Fixed(&[]),
                results: ResultShape::Fixed(REF),
                attributes: &[AttrSpec { name: "value", kinds: &[AttrKind::I64, AttrKind::F64] }],
                terminator: false,
            },
            OpDef {
                kind: OpKind::GetOrAlloc,
                operands: OperandShape::Fixed(&[]),
                results: ResultShape::Fixed(REF),
                attributes: &[AttrSpec { name: "var", kinds: &[AttrKind::Str] }],
                terminator: false,
            },
            OpDef {
                kind: OpKind::Concat,
                operands: OperandShape::Variadic(TypeConstraint::Any),
                results: ResultShape::Fixed(PACK),
                attributes: &[],
                terminator: false,
            },
            OpDef {
                kind: OpKind::Unpack,
                operands: OperandShape::Fixed(&[TypeConstraint::Pack]),
                results: ResultShape::Variadic(ValueType::Ref),
                attributes: &[],
                terminator: false,
            },
            OpDef {
                kind: OpKind::Assign,
                operands: OperandShape::Fixed(&[TypeConstraint::Ref, TypeConstraint::Ref]),
                results: ResultShape::Fixed(NONE),
                attributes: &[],
                terminator: false,
            },
            OpDef {
                kind: OpKind::Call,
                operands: OperandShape::Fixed(&[TypeConstraint::Ref, TypeConstraint::Pack]),
                results: ResultShape::Fixed(PACK),
                attributes: &[],
                terminator: false,
            },
            OpDef {
                kind: OpKind::Return,
                operands: OperandShape::Fixed(&[]),
                results: ResultShape::Fixed(NONE),
                attributes: &[],
                terminator: true,
            },
        ];
        OpCatalogue { defs: defs.into_iter().map(|def| (def.kind, def)).collect() }
    }

    pub fn get(&self, kind: OpKind) -> Option<&OpDef> {
        self.defs.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// A copy of this catalogue without `kind`, for exercising the builder
    /// and verifier against an incomplete vocabulary.
    pub fn without(&self, kind: OpKind) -> Self {
        let mut defs = self.defs.clone();
        defs.remove(&kind);
        OpCatalogue { defs }
    }
}
