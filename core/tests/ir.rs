use luair_core::ir::catalogue::{OperandShape, ResultShape};
use luair_core::ir::{
    IrError, Module, NumberValue, OpBuilder, OpCatalogue, OpKind, ValueType, VerifyError, verify_module,
};
use luair_core::location::Location;
use luair_core::{Script, compile_script};

fn loc(line: usize, column: usize) -> Location {
    Location::new("ir.lua", line, column)
}

#[test]
fn catalogue_defines_the_lua_dialect() {
    let catalogue = OpCatalogue::lua();
    assert_eq!(catalogue.len(), OpKind::ALL.len());
    for kind in OpKind::ALL {
        let def = catalogue.get(kind).expect("every kind is registered");
        assert_eq!(def.mnemonic(), kind.mnemonic());
        assert_eq!(def.terminator, kind == OpKind::Return);
    }
    let unpack = catalogue.get(OpKind::Unpack).expect("unpack");
    assert!(matches!(unpack.results, ResultShape::Variadic(ValueType::Ref)));
    let concat = catalogue.get(OpKind::Concat).expect("concat");
    assert!(matches!(concat.operands, OperandShape::Variadic(_)));

    let smaller = catalogue.without(OpKind::Call);
    assert_eq!(smaller.len(), catalogue.len() - 1);
    assert!(smaller.get(OpKind::Call).is_none());
}

#[test]
fn region_accepts_a_single_entry_block() {
    let mut module = Module::new();
    let region = module.add_function("main", loc(1, 1));
    module.add_entry_block(region).expect("first entry block");
    assert_eq!(module.add_entry_block(region), Err(IrError::RegionPopulated(region)));
}

#[test]
fn builder_refuses_unregistered_operations() {
    let catalogue = OpCatalogue::lua().without(OpKind::Nil);
    let mut module = Module::new();
    let region = module.add_function("main", loc(1, 1));
    let block = module.add_entry_block(region).expect("entry block");

    let mut ops = OpBuilder::at_end(&mut module, &catalogue, block);
    assert_eq!(ops.nil(loc(1, 1)), Err(IrError::UnregisteredOp(OpKind::Nil)));
    assert_eq!(module.op_count(), 0);
}

#[test]
fn builder_refuses_operations_after_the_terminator() {
    let catalogue = OpCatalogue::lua();
    let mut module = Module::new();
    let region = module.add_function("main", loc(1, 1));
    let block = module.add_entry_block(region).expect("entry block");

    let mut ops = OpBuilder::at_end(&mut module, &catalogue, block);
    ops.ret(loc(1, 1)).expect("return");
    assert_eq!(
        ops.get_or_alloc("x", loc(2, 1)),
        Err(IrError::BlockTerminated { block, kind: OpKind::GetOrAlloc })
    );
}

#[test]
fn built_values_have_the_declared_types() {
    let catalogue = OpCatalogue::lua();
    let mut module = Module::new();
    let region = module.add_function("main", loc(1, 1));
    let block = module.add_entry_block(region).expect("entry block");

    let mut ops = OpBuilder::at_end(&mut module, &catalogue, block);
    let f = ops.get_or_alloc("f", loc(1, 1)).expect("cell");
    let n = ops.number(NumberValue::Float(0.5), loc(1, 3)).expect("number");
    let args = ops.concat(&[n.id()], loc(1, 1)).expect("concat");
    let results = ops.call(f, args, loc(1, 1)).expect("call");
    let values = ops.unpack(results, 3, loc(1, 1)).expect("unpack");
    ops.ret(loc(1, 1)).expect("return");

    assert_eq!(module.value_type(f.id()), Some(ValueType::Ref));
    assert_eq!(module.value_type(args.id()), Some(ValueType::Pack));
    assert_eq!(module.value_type(results.id()), Some(ValueType::Pack));
    assert_eq!(values.len(), 3);
    assert!(values.iter().all(|v| module.value_type(v.id()) == Some(ValueType::Ref)));
    assert!(verify_module(&module, &catalogue).is_ok());
}

#[test]
fn verifier_reports_missing_main_and_terminator() {
    let catalogue = OpCatalogue::lua();
    let mut module = Module::new();
    let region = module.add_function("helper", loc(1, 1));
    let block = module.add_entry_block(region).expect("entry block");
    OpBuilder::at_end(&mut module, &catalogue, block).nil(loc(1, 1)).expect("nil");

    let errors = verify_module(&module, &catalogue).expect_err("module is malformed");
    assert!(errors.contains(&VerifyError::MissingMain));
    assert!(errors.contains(&VerifyError::MissingTerminator { function: "helper".into(), block }));
}

#[test]
fn verifier_reports_empty_bodies_and_duplicates() {
    let mut module = Module::new();
    module.add_function("main", loc(1, 1));
    module.add_function("main", loc(2, 1));

    let errors = verify_module(&module, &OpCatalogue::lua()).expect_err("module is malformed");
    assert!(errors.contains(&VerifyError::DuplicateFunction { name: "main".into() }));
    assert_eq!(errors.iter().filter(|e| matches!(e, VerifyError::EmptyRegion { .. })).count(), 2);
}

#[test]
fn verifier_reports_entry_block_arguments() {
    let catalogue = OpCatalogue::lua();
    let mut module = Module::new();
    let region = module.add_function("main", loc(1, 1));
    let block = module.add_entry_block(region).expect("entry block");
    module.add_block_argument(block, ValueType::Pack).expect("argument");
    OpBuilder::at_end(&mut module, &catalogue, block).ret(loc(1, 1)).expect("return");

    let errors = verify_module(&module, &catalogue).expect_err("entry blocks take no arguments");
    assert_eq!(errors, vec![VerifyError::EntryBlockArguments { function: "main".into(), count: 1 }]);
}

#[test]
fn verifier_reports_values_from_other_functions() {
    let catalogue = OpCatalogue::lua();
    let mut module = Module::new();
    let other = module.add_function("other", loc(1, 1));
    let other_block = module.add_entry_block(other).expect("entry block");
    let main = module.add_function("main", loc(2, 1));
    let main_block = module.add_entry_block(main).expect("entry block");

    let foreign = {
        let mut ops = OpBuilder::at_end(&mut module, &catalogue, other_block);
        let cell = ops.get_or_alloc("x", loc(1, 1)).expect("cell");
        ops.ret(loc(1, 1)).expect("return");
        cell
    };
    let mut ops = OpBuilder::at_end(&mut module, &catalogue, main_block);
    let value = ops.nil(loc(2, 1)).expect("nil");
    ops.assign(foreign, value, loc(2, 1)).expect("assign");
    ops.ret(loc(2, 1)).expect("return");

    let errors = verify_module(&module, &catalogue).expect_err("x belongs to another function");
    match errors.as_slice() {
        [VerifyError::UseBeforeDef { function, kind, value, loc: at }] => {
            assert_eq!(function, "main");
            assert_eq!(*kind, OpKind::Assign);
            assert_eq!(*value, foreign.id());
            assert_eq!(at, &loc(2, 1));
        }
        other => panic!("unexpected errors {:?}", other),
    }
}

#[test]
fn verifier_checks_against_the_given_catalogue() {
    let module = compile_script(&Script::from_source("ir.lua", "print(1)")).expect("lowering should succeed");
    let errors = verify_module(&module, &OpCatalogue::lua().without(OpKind::Call)).expect_err("call is unknown");
    assert!(matches!(
        errors.as_slice(),
        [VerifyError::UnknownOp { kind: OpKind::Call, loc, .. }] if *loc == Location::new("ir.lua", 1, 1)
    ));
}

#[test]
fn printed_module_lists_operations_with_types_and_locations() {
    let module = compile_script(&Script::from_source("t.lua", "x, y = 1, 2")).expect("lowering should succeed");
    let text = module.to_string();
    let expected = r#"module {
  func @main() {
  ^bb0:
    %0 = lua.get_or_alloc {var = "x"} : () -> (!lua.ref) loc("t.lua":1:1)
    %1 = lua.get_or_alloc {var = "y"} : () -> (!lua.ref) loc("t.lua":1:4)
    %2 = lua.number {value = 1 : i64} : () -> (!lua.ref) loc("t.lua":1:8)
    %3 = lua.number {value = 2 : i64} : () -> (!lua.ref) loc("t.lua":1:11)
    %4 = lua.concat(%2, %3) : (!lua.ref, !lua.ref) -> (!lua.pack) loc("t.lua":1:1)
    %5:2 = lua.unpack(%4) : (!lua.pack) -> (!lua.ref, !lua.ref) loc("t.lua":1:1)
    lua.assign(%0, %5#0) : (!lua.ref, !lua.ref) -> () loc("t.lua":1:1)
    lua.assign(%1, %5#1) : (!lua.ref, !lua.ref) -> () loc("t.lua":1:1)
    return : () -> () loc("t.lua":1:11)
  } loc("t.lua":1:1)
}"#;
    assert_eq!(text, expected);
}

#[test]
fn printed_floats_and_unknown_locations() {
    let catalogue = OpCatalogue::lua();
    let mut module = Module::new();
    let region = module.add_function("main", Location::unknown("ir.lua"));
    let block = module.add_entry_block(region).expect("entry block");
    let mut ops = OpBuilder::at_end(&mut module, &catalogue, block);
    ops.number(NumberValue::Float(2.0), Location::unknown("ir.lua")).expect("number");
    ops.ret(Location::unknown("ir.lua")).expect("return");

    let text = module.to_string();
    assert!(text.contains("%0 = lua.number {value = 2.0 : f64} : () -> (!lua.ref) loc(unknown)"), "{}", text);
}

#[test]
fn module_serializes_to_json() {
    let module = compile_script(&Script::from_source("t.lua", "f(1)")).expect("lowering should succeed");
    let json = serde_json::to_value(&module).expect("module serializes");
    assert_eq!(json["functions"][0]["name"], "main");
    assert_eq!(json["ops"].as_array().map(Vec::len), Some(module.op_count()));
    assert_eq!(json["ops"][0]["kind"], "GetOrAlloc");
    assert_eq!(json["ops"][0]["attributes"]["var"]["Str"], "f");
}
