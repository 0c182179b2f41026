//! Lowering turns the finished instruction list into the final
//! accumulator-machine listing: a DATA section declaring every memory
//! location touched, and a CODE section produced by structural pattern
//! rules over the list.
//!
//! The two passes are independent and each walks the complete list from
//! the front. Both lean on positional pairings rather than real data-flow
//! analysis: a constant load is paired with whichever node follows it, and
//! an address load is folded into the operation next to it. Sequences the
//! rules do not cover fail with an explicit error instead of advancing.

use std::fmt;

use super::ir::{InstrList, Instruction, Opcode, RESULT_LOCATION};

/// One declaration in the DATA section. `init` of `None` renders as `?`,
/// an uninitialized location.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DataEntry {
    pub var: char,
    pub init: Option<i32>,
}

impl fmt::Display for DataEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.init {
            Some(value) => write!(f, "{} = {}", self.var, value),
            None => write!(f, "{} = ?", self.var),
        }
    }
}

/// One line of the CODE section.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CodeLine {
    pub op: Opcode,
    pub operand: char,
}

impl CodeLine {
    fn new(op: Opcode, operand: char) -> Self {
        CodeLine { op, operand }
    }
}

impl fmt::Display for CodeLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.op, self.operand)
    }
}

/// The lowered program. `Display` renders the assembly file verbatim.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assembly {
    pub data: Vec<DataEntry>,
    pub code: Vec<CodeLine>,
}

impl Assembly {
    /// Runs both lowering passes over a completed instruction list.
    pub fn lower(list: &InstrList) -> Result<Assembly, String> {
        Ok(Assembly {
            data: data_section(list)?,
            code: code_section(list)?,
        })
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ".DATA")?;
        writeln!(f)?;
        for entry in &self.data {
            writeln!(f, "{}", entry)?;
        }
        writeln!(f)?;
        writeln!(f, ".CODE")?;
        writeln!(f, ".ORG 0")?;
        for line in &self.code {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Bounds-checked lookahead into the list.
fn peek(list: &InstrList, index: usize, offset: usize) -> Result<&Instruction, String> {
    list.get(index + offset).ok_or_else(|| {
        format!(
            "malformed instruction stream: expected an instruction at index {}",
            index + offset
        )
    })
}

/// Pass 1: variable discovery. Walks the list once and declares every
/// memory location the program touches, in first-appearance order.
///
/// Rules, first match per node:
/// 1. A constant load pairs with the node that follows it (assumed, not
///    verified, to be its store); the constant becomes that location's
///    initializer. When an operator follows instead, the blank operand
///    gets declared. That is how the language behaves.
/// 2. A store to an undeclared location declares it uninitialized.
/// 3. Any other node naming the result location redeclares it, even if it
///    was already declared.
pub fn data_section(list: &InstrList) -> Result<Vec<DataEntry>, String> {
    let mut declared: Vec<char> = Vec::new();
    let mut data = Vec::new();

    for (index, ins) in list.iter().enumerate() {
        if ins.op == Opcode::LoadConst {
            let dest = peek(list, index, 1)?.operand_char();
            let value = ins.operand_char() as i32 - '0' as i32;
            data.push(DataEntry { var: dest, init: Some(value) });
            declared.push(dest);
        } else if ins.op == Opcode::Store && !declared.contains(&ins.operand_char()) {
            data.push(DataEntry { var: ins.operand_char(), init: None });
            declared.push(ins.operand_char());
        } else if ins.operand == Some(RESULT_LOCATION) {
            data.push(DataEntry { var: RESULT_LOCATION, init: None });
            declared.push(RESULT_LOCATION);
        }
    }

    Ok(data)
}

/// Pass 2: code emission. A single forward cursor applies the rules below
/// in priority order at each position:
///
/// 1. Skip: constant loads and their paired stores emit nothing; the
///    constant is already materialized as a DATA initializer.
/// 2. Double load: two address loads in a row emit the first verbatim,
///    then the node-after-next's opcode carrying the second load's
///    operand, consuming all three nodes.
/// 3. Load-then-op: an address load followed by an operator emits the
///    operator carrying the loaded variable, consuming both.
/// 4. Store: emitted verbatim.
///
/// A position no rule covers is an error; the rule table is deliberately
/// not extended past what the language defines.
pub fn code_section(list: &InstrList) -> Result<Vec<CodeLine>, String> {
    let mut code = Vec::new();
    let mut cursor = 0;

    while cursor < list.len() {
        while list.get(cursor).map(|i| i.op) == Some(Opcode::LoadConst) {
            peek(list, cursor, 1)?;
            cursor += 2;
        }

        let ins = match list.get(cursor) {
            Some(ins) => ins,
            None => break,
        };

        match (ins.op, list.get(cursor + 1)) {
            (Opcode::LoadAddr, Some(next)) if next.op == Opcode::LoadAddr => {
                let after = peek(list, cursor, 2)?;
                code.push(CodeLine::new(ins.op, ins.operand_char()));
                code.push(CodeLine::new(after.op, next.operand_char()));
                cursor += 3;
            }
            (Opcode::LoadAddr, Some(next)) if next.op.is_arithmetic() => {
                code.push(CodeLine::new(next.op, ins.operand_char()));
                cursor += 2;
            }
            (Opcode::Store, _) => {
                code.push(CodeLine::new(ins.op, ins.operand_char()));
                cursor += 1;
            }
            _ => {
                return Err(format!(
                    "no lowering rule matches `{}` at index {}",
                    ins, cursor
                ));
            }
        }
    }

    Ok(code)
}
