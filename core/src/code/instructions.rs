//! The assembler, disassembler, and flat byte container for bytecode (§4.B).

use std::fmt;
use std::ops::{Deref, DerefMut};

use super::opcode::Opcode;

/// A flat byte sequence of opcodes and operands.
///
/// Thin enough to `Deref` to `[u8]` for indexing by instruction pointer, but
/// named so call sites read as "bytecode", not "some bytes".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instructions(pub Vec<u8>);

impl Instructions {
    pub fn new() -> Self {
        Instructions(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend_from_slice(&mut self, other: &[u8]) {
        self.0.extend_from_slice(other);
    }

    /// Render as `NNNN OpName [operand ...]` lines, one per instruction,
    /// offsets zero-padded to 4 digits (§4.B).
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        let mut ip = 0usize;
        while ip < self.0.len() {
            match Opcode::from_byte(self.0[ip]) {
                Ok(op) => {
                    let (operands, read) = read_operands(op, &self.0[ip + 1..]);
                    out.push_str(&format!("{:04} {}", ip, fmt_instruction(op, &operands)));
                    out.push('\n');
                    ip += 1 + read;
                }
                Err(err) => {
                    out.push_str(&format!("{:04} ERROR: {}\n", ip, err));
                    ip += 1;
                }
            }
        }
        out
    }
}

fn fmt_instruction(op: Opcode, operands: &[usize]) -> String {
    if operands.is_empty() {
        return op.name().to_string();
    }
    let rendered: Vec<String> = operands.iter().map(|o| o.to_string()).collect();
    format!("{} {}", op.name(), rendered.join(" "))
}

impl Deref for Instructions {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl DerefMut for Instructions {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl From<Vec<u8>> for Instructions {
    fn from(bytes: Vec<u8>) -> Self {
        Instructions(bytes)
    }
}

impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.disassemble())
    }
}

/// Assemble one instruction: opcode byte followed by big-endian operands,
/// per the widths in §6.2. An operand wider than its slot is truncated
/// silently (callers are expected to respect the limits in §6.2).
pub fn make(op: Opcode, operands: &[usize]) -> Vec<u8> {
    let widths = op.operand_widths();
    let mut out = Vec::with_capacity(op.instruction_len());
    out.push(op.byte());

    for (&operand, &width) in operands.iter().zip(widths.iter()) {
        match width {
            1 => out.push(operand as u8),
            2 => out.extend_from_slice(&(operand as u16).to_be_bytes()),
            other => unreachable!("unsupported operand width {other}"),
        }
    }
    out
}

/// Decode the operands of an instruction whose opcode byte has already been
/// consumed, returning the operand values and the number of bytes read.
pub fn read_operands(op: Opcode, bytes: &[u8]) -> (Vec<usize>, usize) {
    let widths = op.operand_widths();
    let mut operands = Vec::with_capacity(widths.len());
    let mut offset = 0usize;

    for &width in widths {
        match width {
            1 => {
                operands.push(bytes[offset] as usize);
                offset += 1;
            }
            2 => {
                operands.push(read_u16(&bytes[offset..]) as usize);
                offset += 2;
            }
            other => unreachable!("unsupported operand width {other}"),
        }
    }
    (operands, offset)
}

pub fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

pub fn read_u8(bytes: &[u8]) -> u8 {
    bytes[0]
}

#[cfg(test)]
mod instructions_test;
