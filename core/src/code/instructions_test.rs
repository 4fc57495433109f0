use pretty_assertions::assert_eq;

use super::*;
use crate::code::Opcode::*;

#[test]
fn make_encodes_operands_big_endian() {
    let tests: Vec<(Opcode, Vec<usize>, Vec<u8>)> = vec![
        (OpConstant, vec![65534], vec![OpConstant.byte(), 255, 254]),
        (OpAdd, vec![], vec![OpAdd.byte()]),
        (OpGetLocal, vec![255], vec![OpGetLocal.byte(), 255]),
        (
            OpClosure,
            vec![65535, 255],
            vec![OpClosure.byte(), 255, 255, 255],
        ),
    ];

    for (op, operands, expected) in tests {
        let instruction = make(op, &operands);
        assert_eq!(instruction, expected);
    }
}

#[test]
fn make_truncates_operands_wider_than_their_slot() {
    // OpCall's operand is a single byte; 300 doesn't fit and is truncated.
    let instruction = make(OpCall, &[300]);
    assert_eq!(instruction, vec![OpCall.byte(), 300u16 as u8]);
}

#[test]
fn read_operands_inverts_make() {
    let tests: Vec<(Opcode, Vec<usize>, usize)> = vec![
        (OpConstant, vec![65535], 2),
        (OpGetLocal, vec![250], 1),
        (OpClosure, vec![65535, 255], 3),
    ];

    for (op, operands, bytes_read) in tests {
        let instruction = make(op, &operands);
        let (decoded, n) = read_operands(op, &instruction[1..]);
        assert_eq!(n, bytes_read);
        assert_eq!(decoded, operands);
    }
}

#[test]
fn disassembly_matches_the_golden_string() {
    let mut instructions = Instructions::new();
    instructions.extend_from_slice(&make(OpConstant, &[65535]));
    instructions.extend_from_slice(&make(OpClosure, &[65535, 255]));

    let expected = "0000 OpConstant 65535\n0003 OpClosure 65535 255\n";
    assert_eq!(instructions.disassemble(), expected);
}

#[test]
fn disassembly_is_line_wise_concatenation_with_cumulative_offsets() {
    let mut instructions = Instructions::new();
    instructions.extend_from_slice(&make(OpAdd, &[]));
    instructions.extend_from_slice(&make(OpConstant, &[2]));
    instructions.extend_from_slice(&make(OpConstant, &[65535]));
    instructions.extend_from_slice(&make(OpPop, &[]));

    let expected = "\
0000 OpAdd
0001 OpConstant 2
0004 OpConstant 65535
0007 OpPop
";
    assert_eq!(instructions.disassemble(), expected);
}

#[test]
fn instruction_length_sums_match_encoded_byte_length() {
    let instruction = make(OpClosure, &[1, 2]);
    assert_eq!(instruction.len(), OpClosure.instruction_len());
}
