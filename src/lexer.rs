use crate::dictionary::LENGTH;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pos(pub u32, pub u32);

impl Pos {
    pub fn start() -> Pos {
        Pos(1, 1)
    }

    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn column(&self) -> u32 {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub start: Pos,
    pub lexeme: String,
}

/// Splits raw text into candidate words.
///
/// Words are runs of ASCII letters, with apostrophes allowed after the first
/// letter. Runs longer than [`LENGTH`] and anything touching a digit are
/// dropped.
#[derive(Debug)]
pub struct Lexer {
    text: Vec<u8>,
    col: u32,
    line: u32,
    offset: usize,
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl Lexer {
    pub fn new<T: Into<Vec<u8>>>(text: T) -> Lexer {
        let start = Pos::start();
        Lexer {
            text: text.into(),
            line: start.line(),
            col: start.column(),
            offset: 0,
        }
    }

    fn pos(&self) -> Pos {
        Pos(self.line, self.col)
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            let byte = self.peek()?;
            if byte.is_ascii_alphabetic() {
                if let Some(token) = self.word() {
                    return Some(token);
                }
            } else if byte.is_ascii_digit() {
                self.skip_while(|b| b.is_ascii_alphanumeric());
            } else {
                self.next();
            }
        }
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;

        self.col += 1;

        if byte == b'\n' {
            self.col = 1;
            self.line += 1;
        }
        self.offset += 1;

        Some(byte)
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.offset).copied()
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.next();
        }
    }

    /// Reads one word starting at a letter. `None` means it was dropped.
    fn word(&mut self) -> Option<Token> {
        let start = self.pos();
        let mut lexeme = String::new();

        while let Some(byte) = self.peek() {
            match byte {
                b'a'..=b'z' | b'A'..=b'Z' | b'\'' => {
                    self.next();
                    lexeme.push(byte as char);
                    if lexeme.len() > LENGTH {
                        self.skip_while(|b| b.is_ascii_alphabetic());
                        return None;
                    }
                }
                b'0'..=b'9' => {
                    self.skip_while(|b| b.is_ascii_alphanumeric());
                    return None;
                }
                _ => break,
            }
        }

        Some(Token { start, lexeme })
    }
}
