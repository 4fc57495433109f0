use super::test_support::*;
use super::*;

#[test]
fn display_renders_infix_with_parens_for_deterministic_hash_key_ordering() {
    let expr = infix("+", int(1), int(2));
    assert_eq!(expr.to_string(), "(1 + 2)");
}

#[test]
fn display_renders_string_literals_quoted() {
    assert_eq!(string("one").to_string(), "\"one\"");
}

#[test]
fn display_orders_distinct_keys_differently() {
    let mut keys = vec![string("b").to_string(), string("a").to_string(), int(1).to_string()];
    keys.sort();
    assert_eq!(keys, vec!["\"a\"", "\"b\"", "1"]);
}

#[test]
fn builders_assemble_a_small_program() {
    let prog = program(vec![
        let_stmt("x", int(5)),
        expr_stmt(infix("+", ident("x"), int(1))),
    ]);
    assert_eq!(prog.statements.len(), 2);
}
