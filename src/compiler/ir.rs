//! The pseudo-instruction list built while parsing.
//!
//! The target is a one-accumulator machine: loads replace the accumulator,
//! arithmetic opcodes implicitly combine it with the most recently loaded
//! value, and stores spill it to a named location. Instruction operands are
//! single characters; a variable is identified by the first character of its
//! identifier only, a constraint of the compiled language. Operations with
//! no operand carry a blank.

use std::fmt;

/// The fixed memory location the RES clause stores into.
pub const RESULT_LOCATION: char = 'R';

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Opcode {
    LoadConst,
    LoadAddr,
    Store,
    Add,
    Sub,
    Mul,
    Div,
}

impl Opcode {
    /// The three-letter mnemonic used in traces and in the output listing.
    pub fn mnemonic(&self) -> &'static str {
        use Opcode::*;
        match self {
            LoadConst => "LDC",
            LoadAddr => "LDA",
            Store => "STA",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        use Opcode::*;
        matches!(self, Add | Sub | Mul | Div)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Instruction {
    pub op: Opcode,
    pub operand: Option<char>,
}

impl Instruction {
    /// The operand as it appears in listings; blank when the opcode
    /// takes none.
    pub fn operand_char(&self) -> char {
        self.operand.unwrap_or(' ')
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.op, self.operand_char())
    }
}

/// Append-only ordered log of the instructions emitted during parsing.
///
/// Nodes are never removed or rewritten once pushed. Lowering consumes the
/// list in full, walking forward from the front; indexed access exists so
/// its pattern rules can peek ahead without re-walking.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct InstrList {
    nodes: Vec<Instruction>,
}

impl InstrList {
    pub fn new() -> Self {
        InstrList { nodes: Vec::new() }
    }

    /// Appends a node at the tail.
    pub fn push(&mut self, op: Opcode, operand: Option<char>) {
        self.nodes.push(Instruction { op, operand });
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonics() {
        assert_eq!(Opcode::LoadConst.mnemonic(), "LDC");
        assert_eq!(Opcode::LoadAddr.mnemonic(), "LDA");
        assert_eq!(Opcode::Store.mnemonic(), "STA");
        assert_eq!(Opcode::Add.mnemonic(), "ADD");
        assert_eq!(Opcode::Sub.mnemonic(), "SUB");
        assert_eq!(Opcode::Mul.mnemonic(), "MUL");
        assert_eq!(Opcode::Div.mnemonic(), "DIV");
    }

    #[test]
    fn test_is_arithmetic() {
        assert!(Opcode::Add.is_arithmetic());
        assert!(Opcode::Sub.is_arithmetic());
        assert!(Opcode::Mul.is_arithmetic());
        assert!(Opcode::Div.is_arithmetic());
        assert!(!Opcode::LoadConst.is_arithmetic());
        assert!(!Opcode::LoadAddr.is_arithmetic());
        assert!(!Opcode::Store.is_arithmetic());
    }

    #[test]
    fn test_instruction_display() {
        let load = Instruction { op: Opcode::LoadConst, operand: Some('2') };
        assert_eq!(load.to_string(), "LDC 2");

        // Blank operands render as a space.
        let add = Instruction { op: Opcode::Add, operand: None };
        assert_eq!(add.to_string(), "ADD  ");
    }

    #[test]
    fn test_append_order() {
        let mut list = InstrList::new();
        assert!(list.is_empty());

        list.push(Opcode::LoadConst, Some('2'));
        list.push(Opcode::Store, Some('A'));
        list.push(Opcode::Add, None);

        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), Some(&Instruction { op: Opcode::LoadConst, operand: Some('2') }));
        assert_eq!(list.get(1), Some(&Instruction { op: Opcode::Store, operand: Some('A') }));
        assert_eq!(list.get(2), Some(&Instruction { op: Opcode::Add, operand: None }));
        assert_eq!(list.get(3), None);

        let ops: Vec<Opcode> = list.iter().map(|i| i.op).collect();
        assert_eq!(ops, vec![Opcode::LoadConst, Opcode::Store, Opcode::Add]);
    }
}
