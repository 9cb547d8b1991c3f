//! DFA lexer over the twin buffer.
//!
//! One token per call. Maximal munch is enforced by retracting whenever the
//! automaton reads past the end of a lexeme; states that peek two characters
//! ahead (`<-` that is not `<---`, `digits.` that is not a real literal)
//! retract two under the buffer's retract-flag discipline. Lexical errors are
//! emitted inline as error-kind tokens and the stream always continues to the
//! end-of-input token.

use crate::frontend::buffer::TwinBuffer;
use crate::frontend::keywords::KEYWORDS;
use crate::frontend::symtab::{SymbolEntry, SymbolTable};
use crate::frontend::token::{Token, TokenKind};
use crate::utils::errors::FrontendResult;
use std::io::Read;
use std::rc::Rc;

/// Maximum length of a variable identifier.
pub const MAX_ID_LEN: usize = 20;
/// Maximum length of a function identifier (including the underscore).
pub const MAX_FUNID_LEN: usize = 30;

/// The lexical analyzer.
pub struct Lexer<R: Read> {
    buffer: TwinBuffer<R>,
    symbols: SymbolTable,
    line: usize,
    done: bool,
}

impl<R: Read> Lexer<R> {
    /// Create a lexer over the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            buffer: TwinBuffer::new(reader),
            symbols: SymbolTable::new(),
            line: 1,
            done: false,
        }
    }

    /// The symbol table built up so far.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scan and return the next token. After the end-of-input token has been
    /// returned once, keeps returning it.
    pub fn next_token(&mut self) -> FrontendResult<Token> {
        if self.done {
            let entry = Rc::new(SymbolEntry::new("", TokenKind::Dollar, 0.0));
            return Ok(Token::new(entry, self.line));
        }
        loop {
            let begin = self.buffer.next_pos();
            let c = self.buffer.advance()?;
            match c {
                b'\n' => self.line += 1,
                b' ' | b'\t' | b'\r' => {}
                b'0'..=b'9' => return self.scan_number(begin),
                b'%' => return self.scan_comment(begin),
                b'<' => return self.scan_less(begin),
                b'>' => return self.scan_follow_eq(begin, TokenKind::Ge, TokenKind::Gt),
                b'=' => return self.scan_exact_pair(begin, b'=', TokenKind::Eq),
                b'!' => return self.scan_exact_pair(begin, b'=', TokenKind::Ne),
                b'&' => return self.scan_exact_triple(begin, b'&', TokenKind::And),
                b'@' => return self.scan_exact_triple(begin, b'@', TokenKind::Or),
                b'~' => return self.emit(begin, TokenKind::Not),
                b'_' => return self.scan_function_id(begin),
                b'#' => return self.scan_record_id(begin),
                b'[' => return self.emit(begin, TokenKind::Sql),
                b']' => return self.emit(begin, TokenKind::Sqr),
                b',' => return self.emit(begin, TokenKind::Comma),
                b';' => return self.emit(begin, TokenKind::Sem),
                b':' => return self.emit(begin, TokenKind::Colon),
                b'.' => return self.emit(begin, TokenKind::Dot),
                b'(' => return self.emit(begin, TokenKind::Op),
                b')' => return self.emit(begin, TokenKind::Cl),
                b'+' => return self.emit(begin, TokenKind::Plus),
                b'-' => return self.emit(begin, TokenKind::Minus),
                b'*' => return self.emit(begin, TokenKind::Mul),
                b'/' => return self.emit(begin, TokenKind::Div),
                b'b'..=b'd' => return self.scan_bcd_identifier(begin),
                b'a' | b'e'..=b'z' => return self.scan_word(begin),
                0 => {
                    self.done = true;
                    let entry = Rc::new(SymbolEntry::new("", TokenKind::Dollar, 0.0));
                    return Ok(Token::new(entry, self.line));
                }
                _ => return self.emit(begin, TokenKind::UnknownPattern),
            }
        }
    }

    /// Collect all tokens through the end-of-input token.
    pub fn tokenize(mut self) -> FrontendResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn token(&self, entry: Rc<SymbolEntry>) -> Token {
        Token::new(entry, self.line)
    }

    fn emit(&mut self, begin: usize, kind: TokenKind) -> FrontendResult<Token> {
        let lexeme = self.buffer.lexeme(begin);
        let entry = self.symbols.intern(&lexeme, kind, 0.0);
        Ok(self.token(entry))
    }

    /// `<` family: `<=`, `<---`, plain `<`, and the `<--` error. A `<-` that
    /// is not the assignment operator retracts two so the `-` is re-lexed.
    fn scan_less(&mut self, begin: usize) -> FrontendResult<Token> {
        match self.buffer.advance()? {
            b'=' => self.emit(begin, TokenKind::Le),
            b'-' => {
                if self.buffer.advance()? != b'-' {
                    self.buffer.retract(2);
                    return self.emit(begin, TokenKind::Lt);
                }
                if self.buffer.advance()? == b'-' {
                    self.emit(begin, TokenKind::AssignOp)
                } else {
                    self.buffer.retract(1);
                    self.emit(begin, TokenKind::UnknownPattern)
                }
            }
            _ => {
                self.buffer.retract(1);
                self.emit(begin, TokenKind::Lt)
            }
        }
    }

    /// Single char optionally followed by `=` (`>` / `>=`).
    fn scan_follow_eq(
        &mut self,
        begin: usize,
        with_eq: TokenKind,
        without: TokenKind,
    ) -> FrontendResult<Token> {
        if self.buffer.advance()? == b'=' {
            self.emit(begin, with_eq)
        } else {
            self.buffer.retract(1);
            self.emit(begin, without)
        }
    }

    /// Two-character operator whose one-character prefix is invalid
    /// (`==`, `!=`).
    fn scan_exact_pair(
        &mut self,
        begin: usize,
        second: u8,
        kind: TokenKind,
    ) -> FrontendResult<Token> {
        if self.buffer.advance()? == second {
            self.emit(begin, kind)
        } else {
            self.buffer.retract(1);
            self.emit(begin, TokenKind::UnknownPattern)
        }
    }

    /// Three-character operator whose shorter prefixes are invalid
    /// (`&&&`, `@@@`).
    fn scan_exact_triple(
        &mut self,
        begin: usize,
        repeat: u8,
        kind: TokenKind,
    ) -> FrontendResult<Token> {
        for _ in 0..2 {
            if self.buffer.advance()? != repeat {
                self.buffer.retract(1);
                return self.emit(begin, TokenKind::UnknownPattern);
            }
        }
        self.emit(begin, kind)
    }

    /// Integer and real literals. `digits . non-digit` retracts two and
    /// yields the integer, so the dot is re-lexed; `digits . d non-digit` is
    /// a lexical error; the exponent takes exactly two digits.
    fn scan_number(&mut self, begin: usize) -> FrontendResult<Token> {
        let mut c = self.buffer.advance()?;
        while c.is_ascii_digit() {
            c = self.buffer.advance()?;
        }
        if c != b'.' {
            self.buffer.retract(1);
            return self.emit_num(begin);
        }
        if !self.buffer.advance()?.is_ascii_digit() {
            self.buffer.retract(2);
            return self.emit_num(begin);
        }
        if !self.buffer.advance()?.is_ascii_digit() {
            self.buffer.retract(1);
            return self.emit(begin, TokenKind::UnknownPattern);
        }
        if self.buffer.advance()? != b'E' {
            self.buffer.retract(1);
            return self.emit_rnum(begin);
        }
        let mut e = self.buffer.advance()?;
        if e == b'+' || e == b'-' {
            e = self.buffer.advance()?;
        }
        if !e.is_ascii_digit() {
            self.buffer.retract(1);
            return self.emit(begin, TokenKind::UnknownPattern);
        }
        if !self.buffer.advance()?.is_ascii_digit() {
            self.buffer.retract(1);
            return self.emit(begin, TokenKind::UnknownPattern);
        }
        self.emit_rnum(begin)
    }

    fn emit_num(&mut self, begin: usize) -> FrontendResult<Token> {
        let lexeme = self.buffer.lexeme(begin);
        let value = integer_value(&lexeme);
        let entry = self.symbols.intern(&lexeme, TokenKind::Num, value);
        Ok(self.token(entry))
    }

    fn emit_rnum(&mut self, begin: usize) -> FrontendResult<Token> {
        let lexeme = self.buffer.lexeme(begin);
        let value = real_value(&lexeme);
        let entry = self.symbols.intern(&lexeme, TokenKind::Rnum, value);
        Ok(self.token(entry))
    }

    /// Lowercase word starting with `a` or `e`..`z`: keyword or FIELDID.
    fn scan_word(&mut self, begin: usize) -> FrontendResult<Token> {
        let mut c = self.buffer.advance()?;
        while c.is_ascii_lowercase() {
            c = self.buffer.advance()?;
        }
        self.buffer.retract(1);
        let lexeme = self.buffer.lexeme(begin);
        let kind = KEYWORDS.lookup(&lexeme).unwrap_or(TokenKind::FieldId);
        let entry = self.symbols.intern(&lexeme, kind, 0.0);
        Ok(self.token(entry))
    }

    /// Word starting with `b`, `c`, or `d`: a variable identifier when a
    /// `[2-7]+` tail follows the letters, otherwise keyword-or-FIELDID. Only
    /// variable identifiers carry the 20-character cap, so it is checked once
    /// a digit confirms the class, against the whole lexeme; a pure letter
    /// run is an uncapped field identifier.
    fn scan_bcd_identifier(&mut self, begin: usize) -> FrontendResult<Token> {
        let mut c = self.buffer.advance()?;
        while c.is_ascii_lowercase() {
            c = self.buffer.advance()?;
        }
        if !(b'2'..=b'7').contains(&c) {
            self.buffer.retract(1);
            let lexeme = self.buffer.lexeme(begin);
            let kind = KEYWORDS.lookup(&lexeme).unwrap_or(TokenKind::FieldId);
            let entry = self.symbols.intern(&lexeme, kind, 0.0);
            return Ok(self.token(entry));
        }
        while (b'2'..=b'7').contains(&c) {
            if self.buffer.lexeme_len(begin) > MAX_ID_LEN {
                return self.emit_overlong(begin, MAX_ID_LEN, TokenKind::IdLengthExceeded);
            }
            c = self.buffer.advance()?;
        }
        self.buffer.retract(1);
        self.emit(begin, TokenKind::Id)
    }

    /// Function identifier: `_` letters digits?, with `_main` distinguished
    /// and a 30-character cap.
    fn scan_function_id(&mut self, begin: usize) -> FrontendResult<Token> {
        let mut c = self.buffer.advance()?;
        if !c.is_ascii_alphabetic() {
            self.buffer.retract(1);
            return self.emit(begin, TokenKind::UnknownPattern);
        }
        while c.is_ascii_alphabetic() {
            if self.buffer.lexeme_len(begin) > MAX_FUNID_LEN {
                return self.emit_overlong(begin, MAX_FUNID_LEN, TokenKind::FunLengthExceeded);
            }
            c = self.buffer.advance()?;
        }
        while c.is_ascii_digit() {
            if self.buffer.lexeme_len(begin) > MAX_FUNID_LEN {
                return self.emit_overlong(begin, MAX_FUNID_LEN, TokenKind::FunLengthExceeded);
            }
            c = self.buffer.advance()?;
        }
        self.buffer.retract(1);
        let lexeme = self.buffer.lexeme(begin);
        let kind = if lexeme == "_main" {
            TokenKind::Main
        } else {
            TokenKind::FunId
        };
        let entry = self.symbols.intern(&lexeme, kind, 0.0);
        Ok(self.token(entry))
    }

    /// Record/union identifier `#[a-z]+`; a bare `#` is a lexical error.
    fn scan_record_id(&mut self, begin: usize) -> FrontendResult<Token> {
        let mut c = self.buffer.advance()?;
        if !c.is_ascii_lowercase() {
            self.buffer.retract(1);
            return self.emit(begin, TokenKind::UnknownPattern);
        }
        while c.is_ascii_lowercase() {
            c = self.buffer.advance()?;
        }
        self.buffer.retract(1);
        self.emit(begin, TokenKind::Ruid)
    }

    /// Truncate an over-long identifier to its first `cap` characters plus an
    /// ellipsis, then consume the remaining identifier characters so the next
    /// token begins cleanly.
    fn emit_overlong(
        &mut self,
        begin: usize,
        cap: usize,
        kind: TokenKind,
    ) -> FrontendResult<Token> {
        let full = self.buffer.lexeme(begin);
        let mut lexeme = full[..cap].to_string();
        lexeme.push_str("...");
        let continues: fn(u8) -> bool = match kind {
            TokenKind::FunLengthExceeded => |c| c.is_ascii_alphanumeric(),
            _ => |c| c.is_ascii_lowercase() || (b'2'..=b'7').contains(&c),
        };
        let mut c = self.buffer.advance()?;
        while continues(c) {
            c = self.buffer.advance()?;
        }
        self.buffer.retract(1);
        let entry = self.symbols.intern(&lexeme, kind, 0.0);
        Ok(self.token(entry))
    }

    /// `%` comment: emit one COMMENT token, then discard through the newline
    /// (bumping the line counter) or the end-of-input sentinel.
    fn scan_comment(&mut self, begin: usize) -> FrontendResult<Token> {
        let lexeme = self.buffer.lexeme(begin);
        let entry = self.symbols.intern(&lexeme, TokenKind::Comment, 0.0);
        let token = self.token(entry);
        loop {
            match self.buffer.advance()? {
                b'\n' => {
                    self.line += 1;
                    break;
                }
                0 => {
                    self.buffer.retract(1);
                    break;
                }
                _ => {}
            }
        }
        Ok(token)
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = FrontendResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            None
        } else {
            Some(self.next_token())
        }
    }
}

/// Decimal value of an integer literal.
fn integer_value(lexeme: &str) -> f64 {
    lexeme
        .bytes()
        .fold(0.0, |v, b| v * 10.0 + f64::from(b - b'0'))
}

/// Value of a real literal: integer part plus the two fractional digits,
/// scaled by ten to the signed two-digit exponent when one is present.
fn real_value(lexeme: &str) -> f64 {
    let bytes = lexeme.as_bytes();
    let dot = match bytes.iter().position(|&b| b == b'.') {
        Some(dot) => dot,
        None => return integer_value(lexeme),
    };
    let mut value = integer_value(&lexeme[..dot]);
    value += f64::from(bytes[dot + 1] - b'0') / 10.0;
    value += f64::from(bytes[dot + 2] - b'0') / 100.0;
    if let Some(&e) = bytes.get(dot + 3) {
        debug_assert_eq!(e, b'E');
        let (negative, digits) = match bytes[dot + 4] {
            b'-' => (true, &bytes[dot + 5..]),
            b'+' => (false, &bytes[dot + 5..]),
            _ => (false, &bytes[dot + 4..]),
        };
        let exp = i32::from(digits[0] - b'0') * 10 + i32::from(digits[1] - b'0');
        value *= 10f64.powi(if negative { -exp } else { exp });
    }
    value
}

/// Strip `%` comments: everything from a `%` to the end of its line is
/// removed, the newline itself is kept.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        match line.find('%') {
            Some(i) => {
                out.push_str(&line[..i]);
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }
    out
}

/// Tokenize a complete source string.
pub fn tokenize_source(source: &str) -> FrontendResult<Vec<Token>> {
    Lexer::new(std::io::Cursor::new(source.as_bytes().to_vec())).tokenize()
}
