//! The Compiler module is in charge of taking an
//! LPN source file and producing accumulator-machine
//! assembly from it.
//!
//! It does this with a pull lexer feeding a recursive
//! descent parser that emits pseudo-instructions as a
//! side effect of parsing, followed by a two-pass
//! lowering step over the finished instruction list.

pub mod ir;
pub mod lexer;
pub mod lowering;
pub mod parser;
