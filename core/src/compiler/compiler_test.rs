use pretty_assertions::assert_eq;

use super::*;
use crate::ast::test_support::*;
use crate::ast::Program;

fn compile(statements: Vec<Statement>) -> Bytecode {
    Compiler::new()
        .compile(&Program { statements })
        .expect("program should compile")
}

fn disassembly(statements: Vec<Statement>) -> String {
    compile(statements).instructions.disassemble()
}

#[test]
fn integer_arithmetic_emits_constants_then_the_operator_and_a_trailing_pop() {
    let got = disassembly(vec![expr_stmt(infix("+", int(1), int(2)))]);
    let expected = "\
0000 OpConstant 0
0003 OpConstant 1
0006 OpAdd
0007 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn less_than_is_compiled_as_swapped_greater_than() {
    let got = disassembly(vec![expr_stmt(infix("<", int(1), int(2)))]);
    let expected = "\
0000 OpConstant 0
0003 OpConstant 1
0006 OpGreaterThan
0007 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn booleans_compile_to_their_singleton_opcodes() {
    let got = disassembly(vec![expr_stmt(boolean(true))]);
    assert_eq!(got, "0000 OpTrue\n0001 OpPop\n");
}

#[test]
fn prefix_bang_and_minus_compile_operand_then_operator() {
    assert_eq!(
        disassembly(vec![expr_stmt(prefix("!", boolean(true)))]),
        "0000 OpTrue\n0001 OpBang\n0002 OpPop\n"
    );
    assert_eq!(
        disassembly(vec![expr_stmt(prefix("-", int(5)))]),
        "0000 OpConstant 0\n0003 OpMinus\n0004 OpPop\n"
    );
}

#[test]
fn if_without_else_nulls_the_missing_branch_and_backpatches_jumps() {
    let got = disassembly(vec![expr_stmt(if_expr(
        boolean(true),
        block(vec![expr_stmt(int(10))]),
        None,
    ))]);
    let expected = "\
0000 OpTrue
0001 OpJumpNotTruthy 10
0004 OpConstant 0
0007 OpJump 11
0010 OpNull
0011 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn if_with_else_compiles_both_branches_without_a_null_filler() {
    let got = disassembly(vec![expr_stmt(if_expr(
        boolean(true),
        block(vec![expr_stmt(int(10))]),
        Some(block(vec![expr_stmt(int(20))])),
    ))]);
    let expected = "\
0000 OpTrue
0001 OpJumpNotTruthy 10
0004 OpConstant 0
0007 OpJump 13
0010 OpConstant 1
0013 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn let_and_identifier_use_global_get_set_for_top_level_bindings() {
    let got = disassembly(vec![let_stmt("one", int(1)), expr_stmt(ident("one"))]);
    let expected = "\
0000 OpConstant 0
0003 OpSetGlobal 0
0006 OpGetGlobal 0
0009 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn string_literals_are_pooled_as_constants() {
    let bytecode = compile(vec![expr_stmt(string("monkey"))]);
    assert_eq!(bytecode.constants, vec![Value::string("monkey")]);
}

#[test]
fn array_literal_pushes_elements_then_emits_its_length() {
    let got = disassembly(vec![expr_stmt(array(vec![int(1), int(2), int(3)]))]);
    let expected = "\
0000 OpConstant 0
0003 OpConstant 1
0006 OpConstant 2
0009 OpArray 3
0012 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn hash_literal_keys_compile_in_ascending_textual_order() {
    // Keys "1" and "2" already sort ascending; deliberately author them
    // out of source order to prove the compiler, not the caller, sorts.
    let got = disassembly(vec![expr_stmt(hash(vec![
        (int(2), int(20)),
        (int(1), int(10)),
    ]))]);
    let expected = "\
0000 OpConstant 0
0003 OpConstant 1
0006 OpConstant 2
0009 OpConstant 3
0012 OpHash 4
0015 OpPop
";
    assert_eq!(got, expected);
    let bytecode = compile(vec![expr_stmt(hash(vec![
        (int(2), int(20)),
        (int(1), int(10)),
    ]))]);
    assert_eq!(
        bytecode.constants,
        vec![
            Value::Integer(1),
            Value::Integer(10),
            Value::Integer(2),
            Value::Integer(20),
        ]
    );
}

#[test]
fn index_expression_compiles_left_then_index_then_opindex() {
    let got = disassembly(vec![expr_stmt(index(array(vec![int(1)]), int(0)))]);
    let expected = "\
0000 OpConstant 0
0003 OpArray 1
0006 OpConstant 1
0009 OpIndex
0010 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn function_literal_with_no_locals_returns_its_last_expression() {
    let bytecode = compile(vec![expr_stmt(function(
        None,
        &[],
        block(vec![expr_stmt(infix("+", int(1), int(2)))]),
    ))]);
    // constants[0..=1] are the two integers, constants[2] is the function.
    match &bytecode.constants[2] {
        Value::CompiledFunction(func) => {
            let expected = "\
0000 OpConstant 0
0003 OpConstant 1
0006 OpAdd
0007 OpReturnValue
";
            assert_eq!(func.instructions.disassemble(), expected);
            assert_eq!(func.num_locals, 0);
            assert_eq!(func.num_parameters, 0);
        }
        other => panic!("expected a CompiledFunction constant, got {other:?}"),
    }
    let got = bytecode.instructions.disassemble();
    assert_eq!(got, "0000 OpClosure 2 0\n0004 OpPop\n");
}

#[test]
fn function_with_empty_body_emits_a_bare_return() {
    let bytecode = compile(vec![expr_stmt(function(None, &[], block(vec![])))]);
    match &bytecode.constants[0] {
        Value::CompiledFunction(func) => {
            assert_eq!(func.instructions.disassemble(), "0000 OpReturn\n");
        }
        other => panic!("expected a CompiledFunction constant, got {other:?}"),
    }
}

#[test]
fn function_parameters_and_locals_use_local_get_set() {
    let bytecode = compile(vec![let_stmt(
        "identity",
        function(
            Some("identity"),
            &["a"],
            block(vec![expr_stmt(ident("a"))]),
        ),
    )]);
    let func_const = bytecode
        .constants
        .iter()
        .find_map(|c| match c {
            Value::CompiledFunction(f) => Some(f.clone()),
            _ => None,
        })
        .expect("a CompiledFunction constant");
    assert_eq!(func_const.num_parameters, 1);
    assert_eq!(
        func_const.instructions.disassemble(),
        "0000 OpGetLocal 0\n0002 OpReturnValue\n"
    );
}

#[test]
fn call_expression_compiles_callee_then_arguments_then_opcall() {
    let got = disassembly(vec![expr_stmt(call(
        function(None, &[], block(vec![expr_stmt(int(24))])),
        vec![],
    ))]);
    assert!(got.contains("OpCall 0"));
}

#[test]
fn builtins_resolve_to_opgetbuiltin_with_the_canonical_index() {
    let got = disassembly(vec![expr_stmt(call(ident("len"), vec![string("abc")]))]);
    let expected = "\
0000 OpGetBuiltin 0
0002 OpConstant 0
0005 OpCall 1
0007 OpPop
";
    assert_eq!(got, expected);
}

#[test]
fn free_variables_are_loaded_before_opclosure_in_declaration_scope() {
    // fn(a) { fn(b) { a + b } } -- the inner function closes over `a`.
    let inner = function(
        None,
        &["b"],
        block(vec![expr_stmt(infix("+", ident("a"), ident("b")))]),
    );
    let outer = function(None, &["a"], block(vec![expr_stmt(inner)]));
    let bytecode = compile(vec![expr_stmt(outer)]);

    let outer_func = bytecode
        .constants
        .iter()
        .rev()
        .find_map(|c| match c {
            Value::CompiledFunction(f) if f.num_parameters == 1 => Some(f.clone()),
            _ => None,
        })
        .expect("outer CompiledFunction constant");
    let disasm = outer_func.instructions.disassemble();
    assert!(disasm.contains("OpGetLocal 0"));
    assert!(disasm.contains("OpClosure"));
}

#[test]
fn undefined_identifier_is_a_compile_error() {
    let err = Compiler::new()
        .compile(&Program {
            statements: vec![expr_stmt(ident("nope"))],
        })
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::UndefinedVariable {
            name: "nope".to_string()
        }
    );
    assert_eq!(err.to_string(), "undefined variable nope");
}

#[test]
fn recursive_function_resolves_its_own_name_via_function_scope() {
    // let count = fn(x) { count(x) };
    let bytecode = compile(vec![let_stmt(
        "count",
        function(
            Some("count"),
            &["x"],
            block(vec![expr_stmt(call(ident("count"), vec![ident("x")]))]),
        ),
    )]);
    let func = bytecode
        .constants
        .iter()
        .find_map(|c| match c {
            Value::CompiledFunction(f) => Some(f.clone()),
            _ => None,
        })
        .unwrap();
    assert!(func
        .instructions
        .disassemble()
        .contains("OpCurrentClosure"));
}
