//! file: core/src/ir/analysis.rs
//! description: static reasoning about packs.
//!
//! `unpack_slots` is the reference model of `lua.unpack`; `resolve_unpacked`
//! applies it to emitted IR by following an unpack result back through the
//! `lua.concat` that built its pack.
//!
use super::module::Module;
use super::op::OpKind;
use super::value::{ValueDef, ValueId, ValueType};

/// What one unpacked value denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackSlot<T> {
    Value(T),
    /// Padding added because the pack was too short.
    Nil,
}

/// Expand `contents` into exactly `count` slots: extra values are dropped and
/// missing ones become `Nil`.
pub fn unpack_slots<T: Clone>(contents: &[T], count: usize) -> Vec<PackSlot<T>> {
    (0..count)
        .map(|i| contents.get(i).cloned().map_or(PackSlot::Nil, PackSlot::Value))
        .collect()
}

/// The single values a pack is built from, if they are statically known.
///
/// Returns `None` when the pack (or a pack nested in it) is the result of a
/// call, whose length is only known at run time.
pub fn pack_contents(module: &Module, pack: ValueId) -> Option<Vec<ValueId>> {
    let op = module.defining_op(pack)?;
    if op.kind != OpKind::Concat {
        return None;
    }
    let mut contents = Vec::with_capacity(op.operands.len());
    for operand in &op.operands {
        match module.value_type(*operand)? {
            ValueType::Ref => contents.push(*operand),
            ValueType::Pack => contents.extend(pack_contents(module, *operand)?),
        }
    }
    Some(contents)
}

/// The value (or nil padding) an unpack result stands for.
pub fn resolve_unpacked(module: &Module, value: ValueId) -> Option<PackSlot<ValueId>> {
    let ValueDef::OpResult { op, index } = module.value(value)?.def else {
        return None;
    };
    let op = module.op(op)?;
    if op.kind != OpKind::Unpack {
        return None;
    }
    let contents = pack_contents(module, *op.operands.first()?)?;
    unpack_slots(&contents, op.results.len()).get(index).cloned()
}
