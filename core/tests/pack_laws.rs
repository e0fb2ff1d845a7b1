use luair_core::ir::analysis::{PackSlot, pack_contents, resolve_unpacked, unpack_slots};
use luair_core::ir::{Attribute, Module, NumberValue, OpBuilder, OpCatalogue, OpKind, ValueId};
use luair_core::location::Location;
use luair_core::{Script, compile_script};
use proptest::prelude::*;

fn loc() -> Location {
    Location::new("p.lua", 1, 1)
}

proptest! {
    #[test]
    fn unpack_keeps_prefix_and_pads_with_nil(contents in proptest::collection::vec(any::<i32>(), 0..8), count in 0usize..10) {
        let slots = unpack_slots(&contents, count);
        prop_assert_eq!(slots.len(), count);
        for (i, slot) in slots.iter().enumerate() {
            match contents.get(i) {
                Some(v) => prop_assert_eq!(slot, &PackSlot::Value(*v)),
                None => prop_assert_eq!(slot, &PackSlot::Nil),
            }
        }
    }

    #[test]
    fn unpack_to_own_length_is_identity(contents in proptest::collection::vec(any::<i32>(), 0..8)) {
        let slots = unpack_slots(&contents, contents.len());
        let expected: Vec<PackSlot<i32>> = contents.iter().copied().map(PackSlot::Value).collect();
        prop_assert_eq!(slots, expected);
    }

    #[test]
    fn emitted_unpack_follows_the_pack_model(len in 0usize..6, count in 0usize..8) {
        let catalogue = OpCatalogue::lua();
        let mut module = Module::new();
        let region = module.add_function("main", loc());
        let block = module.add_entry_block(region).expect("fresh region");

        let mut ops = OpBuilder::at_end(&mut module, &catalogue, block);
        let mut items: Vec<ValueId> = Vec::new();
        for i in 0..len {
            let value = ops.number(NumberValue::Int(i as i64), loc()).expect("number");
            items.push(value.id());
        }
        let pack = ops.concat(&items, loc()).expect("concat");
        let values = ops.unpack(pack, count, loc()).expect("unpack");
        prop_assert_eq!(values.len(), count);

        let expected = unpack_slots(&items, count);
        for (value, slot) in values.iter().zip(expected) {
            prop_assert_eq!(resolve_unpacked(&module, value.id()), Some(slot));
        }
    }

    #[test]
    fn assignment_binds_targets_by_position(targets in 1usize..6, values in 1usize..6) {
        let names: Vec<String> = (0..targets).map(|i| format!("t{}", i)).collect();
        let exps: Vec<String> = (0..values).map(|i| i.to_string()).collect();
        let src = format!("{} = {}", names.join(", "), exps.join(", "));
        let module = compile_script(&Script::from_source("p.lua", src)).expect("lowering should succeed");

        let assigns: Vec<_> = module.ops().filter(|op| op.kind == OpKind::Assign).collect();
        prop_assert_eq!(assigns.len(), targets);
        for (i, assign) in assigns.iter().enumerate() {
            match resolve_unpacked(&module, assign.operands[1]) {
                Some(PackSlot::Value(v)) => {
                    let number = module.defining_op(v).expect("defined value");
                    prop_assert!(i < values);
                    prop_assert_eq!(number.attribute("value"), Some(&Attribute::I64(i as i64)));
                }
                Some(PackSlot::Nil) => prop_assert!(i >= values),
                None => prop_assert!(false, "assignment source is not an unpack result"),
            }
        }
    }
}

#[test]
fn nested_packs_flatten_into_their_contents() {
    let catalogue = OpCatalogue::lua();
    let mut module = Module::new();
    let region = module.add_function("main", loc());
    let block = module.add_entry_block(region).expect("fresh region");

    let mut ops = OpBuilder::at_end(&mut module, &catalogue, block);
    let a = ops.nil(loc()).expect("nil");
    let b = ops.nil(loc()).expect("nil");
    let inner = ops.concat(&[b.id()], loc()).expect("inner concat");
    let outer = ops.concat(&[a.id(), inner.id()], loc()).expect("outer concat");

    assert_eq!(pack_contents(&module, outer.id()), Some(vec![a.id(), b.id()]));
}

#[test]
fn call_packs_have_no_static_contents() {
    let module = compile_script(&Script::from_source("p.lua", "x = f()")).expect("lowering should succeed");
    let assign = module.ops().find(|op| op.kind == OpKind::Assign).expect("an assignment");
    assert_eq!(resolve_unpacked(&module, assign.operands[1]), None);
}
