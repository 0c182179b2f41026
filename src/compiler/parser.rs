//! The Parser module takes tokens pulled from the Lexer and translates
//! them into the pseudo-instruction list, emitting a readable trace of
//! the generated stream as it goes.
//!
//! Grammar:
//!
//! ```text
//! program := "PROGRAMA" QUOTE Identifier QUOTE COLON "INICIO" stmt* "RES" "=" expr "FIM"
//! stmt    := Identifier "=" expr
//! expr    := term ( ("+"|"-") term )*
//! term    := factor ( ("*"|"/") factor )*
//! factor  := Number | Identifier | "(" expr ")"
//! ```
//!
//! Parsing is plain LL(1) descent with one token of lookahead and no
//! backtracking; code generation happens inline in each nonterminal
//! (syntax-directed translation, not parse-then-generate). The first
//! unexpected token aborts the whole compilation.

use std::io::Write;

use super::ir::{InstrList, Opcode, RESULT_LOCATION};
use super::lexer::{Lexer, Token, TokenKind};

pub struct Parser<W: Write> {
    lexer: Lexer,
    current: Token,
    list: InstrList,
    trace: W,
}

impl<W: Write> Parser<W> {
    /// `trace` receives the instruction trace, one line per emitted
    /// instruction or `;`-prefixed comment, in emission order.
    pub fn new(mut lexer: Lexer, trace: W) -> Self {
        let current = lexer.next_token();
        Parser { lexer, current, list: InstrList::new(), trace }
    }

    /// Runs the parser to completion, consuming itself and returning the
    /// instruction list built while parsing. Any error leaves no partial
    /// output worth keeping.
    pub fn run(mut self) -> Result<InstrList, String> {
        self.program()?;
        Ok(self.list)
    }

    fn program(&mut self) -> Result<(), String> {
        self.consume(TokenKind::Programa)?;
        self.consume(TokenKind::Quote)?;

        if self.current.kind != TokenKind::Identifier {
            return Err(format!(
                "expected an identifier in the program label, found {:?} ({})",
                self.current.kind, self.current.lexeme
            ));
        }
        let name = self.current.lexeme.clone();
        self.comment(&format!("program: {}", name))?;
        self.consume(TokenKind::Identifier)?;

        self.consume(TokenKind::Quote)?;
        self.consume(TokenKind::Colon)?;
        self.consume(TokenKind::Inicio)?;

        // Zero statements is legal; RES alone is a complete body.
        while self.current.kind == TokenKind::Identifier {
            self.statement()?;
        }

        self.consume(TokenKind::Res)?;
        self.consume(TokenKind::Assign)?;
        self.comment("result expression")?;
        self.expr()?;
        self.trace_line("STA RES")?;
        self.list.push(Opcode::Store, Some(RESULT_LOCATION));

        self.consume(TokenKind::Fim)
    }

    fn statement(&mut self) -> Result<(), String> {
        let target = self.current.lexeme.clone();
        self.consume(TokenKind::Identifier)?;
        self.consume(TokenKind::Assign)?;
        self.comment(&format!("assignment to {}", target))?;
        self.expr()?;

        // The trace keeps the full identifier; the instruction keeps only
        // its first character, which is the variable's entire identity to
        // the code generator.
        self.trace_line(&format!("STA {}", target))?;
        self.list.push(Opcode::Store, target.chars().next());
        Ok(())
    }

    fn expr(&mut self) -> Result<(), String> {
        self.term()?;
        while self.current.kind == TokenKind::Plus || self.current.kind == TokenKind::Minus {
            let op = self.current.kind;
            self.consume(op)?;
            self.term()?;

            // The right operand's code is already emitted; the opcode
            // combines it with the accumulator, so it takes no operand.
            let opcode = if op == TokenKind::Plus { Opcode::Add } else { Opcode::Sub };
            self.trace_line(opcode.mnemonic())?;
            self.list.push(opcode, None);
        }
        Ok(())
    }

    fn term(&mut self) -> Result<(), String> {
        self.factor()?;
        while self.current.kind == TokenKind::Mult || self.current.kind == TokenKind::Div {
            let op = self.current.kind;
            self.consume(op)?;
            self.factor()?;

            let opcode = if op == TokenKind::Mult { Opcode::Mul } else { Opcode::Div };
            self.trace_line(opcode.mnemonic())?;
            self.list.push(opcode, None);
        }
        Ok(())
    }

    fn factor(&mut self) -> Result<(), String> {
        match self.current.kind {
            TokenKind::Number => {
                self.trace_line(&format!("LDC {}", self.current.lexeme))?;
                self.list.push(Opcode::LoadConst, self.current.lexeme.chars().next());
                self.consume(TokenKind::Number)
            }
            TokenKind::Identifier => {
                self.trace_line(&format!("LDA {}", self.current.lexeme))?;
                self.list.push(Opcode::LoadAddr, self.current.lexeme.chars().next());
                self.consume(TokenKind::Identifier)
            }
            TokenKind::LParen => {
                // Parentheses group; they emit nothing of their own.
                self.consume(TokenKind::LParen)?;
                self.expr()?;
                self.consume(TokenKind::RParen)
            }
            _ => Err(format!(
                "unexpected token in factor: {:?} ({})",
                self.current.kind, self.current.lexeme
            )),
        }
    }

    /// Advances past the current token if it has the expected kind,
    /// otherwise fails the compilation.
    #[inline]
    fn consume(&mut self, expected: TokenKind) -> Result<(), String> {
        if self.current.kind == expected {
            self.current = self.lexer.next_token();
            Ok(())
        } else {
            Err(format!(
                "expected token {:?}, found {:?} ({})",
                expected, self.current.kind, self.current.lexeme
            ))
        }
    }

    fn trace_line(&mut self, line: &str) -> Result<(), String> {
        writeln!(self.trace, "{}", line)
            .map_err(|err| format!("unable to write instruction trace: {}", err))
    }

    fn comment(&mut self, text: &str) -> Result<(), String> {
        self.trace_line(&format!("; {}", text))
    }
}
