//! This lexer tokenizes LPN source text.
//!
//! Tokens are pulled on demand with [`Lexer::next_token`]; there is no
//! backtracking and lexing itself never fails. Characters the lexer cannot
//! classify come back as one-character [`TokenKind::Unknown`] tokens and are
//! left for the parser to reject.

/// Lexemes longer than this are truncated. Diagnostics lose the tail of a
/// very long identifier, nothing else does.
const MAX_LEXEME: usize = 63;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Programa,
    Inicio,
    Fim,
    Res,
    Identifier,
    Number,
    Assign,
    Plus,
    Minus,
    Mult,
    Div,
    LParen,
    RParen,
    Quote,
    Colon,
    EndOfInput,
    Unknown,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    fn new<S: Into<String>>(kind: TokenKind, lexeme: S) -> Self {
        Token { kind, lexeme: lexeme.into() }
    }
}

/// Owns the source text and the cursor into it. One lexer serves exactly
/// one compilation; nothing here is shared or global, so independent
/// compilations can run side by side.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer { src: source.chars().collect(), pos: 0 }
    }

    /// Skips whitespace and classifies the next character run.
    /// At end of input this keeps returning `EndOfInput`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.src.get(self.pos) {
            Some(&c) => c,
            None => return Token::new(TokenKind::EndOfInput, "EOF"),
        };

        if c.is_ascii_alphabetic() {
            return self.identifier_or_reserved();
        }

        if c.is_ascii_digit() {
            return self.number();
        }

        self.pos += 1;
        match c {
            '=' => Token::new(TokenKind::Assign, "="),
            '+' => Token::new(TokenKind::Plus, "+"),
            '-' => Token::new(TokenKind::Minus, "-"),
            '*' => Token::new(TokenKind::Mult, "*"),
            '/' => Token::new(TokenKind::Div, "/"),
            '(' => Token::new(TokenKind::LParen, "("),
            ')' => Token::new(TokenKind::RParen, ")"),
            '"' => Token::new(TokenKind::Quote, "\""),
            ':' => Token::new(TokenKind::Colon, ":"),
            _ => Token::new(TokenKind::Unknown, c.to_string()),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.src.get(self.pos) {
            if c == ' ' || c == '\t' || c == '\n' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Reads a maximal alphanumeric run and checks it against the four
    /// reserved words. The match is case-sensitive: `programa` is an
    /// ordinary identifier.
    fn identifier_or_reserved(&mut self) -> Token {
        let lexeme = self.take_while(|c| c.is_ascii_alphanumeric());
        let kind = match lexeme.as_str() {
            "PROGRAMA" => TokenKind::Programa,
            "INICIO" => TokenKind::Inicio,
            "FIM" => TokenKind::Fim,
            "RES" => TokenKind::Res,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, lexeme)
    }

    // Unsigned integers only. Signs and decimal points are unsupported
    // by the language.
    fn number(&mut self) -> Token {
        let lexeme = self.take_while(|c| c.is_ascii_digit());
        Token::new(TokenKind::Number, lexeme)
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, accept: F) -> String {
        let start = self.pos;
        while let Some(&c) = self.src.get(self.pos) {
            if accept(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.pos].iter().take(MAX_LEXEME).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pulls every token up to and including `EndOfInput`.
    fn collect(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::EndOfInput;
            out.push(token);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn test_reserved_words() {
        let mut lexer = Lexer::new("PROGRAMA INICIO FIM RES");
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Programa, "PROGRAMA"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Inicio, "INICIO"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Fim, "FIM"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Res, "RES"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::EndOfInput, "EOF"));

        // Keyword matching is case-sensitive.
        let mut lexer = Lexer::new("programa Inicio fim Res");
        for lexeme in &["programa", "Inicio", "fim", "Res"] {
            assert_eq!(lexer.next_token(), Token::new(TokenKind::Identifier, *lexeme));
        }
    }

    #[test]
    fn test_single_char_tokens() {
        let expected = [
            (TokenKind::Assign, "="),
            (TokenKind::Plus, "+"),
            (TokenKind::Minus, "-"),
            (TokenKind::Mult, "*"),
            (TokenKind::Div, "/"),
            (TokenKind::LParen, "("),
            (TokenKind::RParen, ")"),
            (TokenKind::Quote, "\""),
            (TokenKind::Colon, ":"),
        ];
        let mut lexer = Lexer::new("= + - * / ( ) \" :");
        for (kind, lexeme) in &expected {
            assert_eq!(lexer.next_token(), Token::new(*kind, *lexeme));
        }
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
    }

    #[test]
    fn test_identifiers_and_numbers() {
        let mut lexer = Lexer::new("soma x1 42 007");
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Identifier, "soma"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Identifier, "x1"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Number, "42"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Number, "007"));

        // A digit lead ends at the first non-digit, so `12abc` splits.
        let mut lexer = Lexer::new("12abc");
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Number, "12"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Identifier, "abc"));
    }

    #[test]
    fn test_unknown_character() {
        let mut lexer = Lexer::new("a @ b");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Unknown, "@"));
        // The lexer reports Unknown and moves on; rejection is the
        // parser's job.
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Identifier, "b"));
    }

    #[test]
    fn test_end_of_input_is_sticky() {
        let mut lexer = Lexer::new("   \t\n ");
        assert_eq!(lexer.next_token(), Token::new(TokenKind::EndOfInput, "EOF"));
        assert_eq!(lexer.next_token(), Token::new(TokenKind::EndOfInput, "EOF"));
    }

    #[test]
    fn test_lexeme_cap() {
        let long: String = "a".repeat(200);
        let mut lexer = Lexer::new(&long);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.lexeme.len(), 63);
        // The whole run is still consumed.
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
    }

    #[test]
    fn test_round_trip() {
        let source = "PROGRAMA \"X\":\nINICIO\nA = 2 + 3\nRES = (A * 4)\nFIM\n";
        let rebuilt: String = collect(source)
            .iter()
            .filter(|t| t.kind != TokenKind::EndOfInput)
            .map(|t| t.lexeme.as_str())
            .collect();
        let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(rebuilt, stripped);
    }
}
