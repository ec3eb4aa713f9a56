//! src/lexer.rs

use crate::error::LexError;

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    OpenParen,    // (
    CloseParen,   // )
    OpenBrace,    // {
    CloseBrace,   // }
    OpenBracket,  // [
    CloseBracket, // ]
    Semicolon,    // ; or an inserted newline
    Comma,        // ,
    Dot,          // .
    Ellipsis,     // ...
    Colon,        // :
    Assign,       // =
    Define,       // :=
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Amp,          // &
    Pipe,         // |
    Caret,        // ^
    AndNot,       // &^
    ShiftLeft,    // <<
    ShiftRight,   // >>
    LogicalAnd,   // &&
    LogicalOr,    // ||
    Arrow,        // <-
    Increment,    // ++
    Decrement,    // --
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    Bang,         // !
    Tilde,        // ~
    /// Compound assignment such as `+=`; the parser never needs the operator.
    OpAssign(String),
    KeywordPackage,
    KeywordImport,
    KeywordConst,
    KeywordType,
    KeywordVar,
    KeywordFunc,
    /// `break`, `continue`, `fallthrough` and `return` only matter for
    /// semicolon insertion.
    KeywordFlow(String),
    /// Any other Go keyword.
    Keyword(String),
    Identifier(String),
    IntLiteral(String),
    FloatLiteral(String),
    ImagLiteral(String),
    /// Quoted source text, escapes left as written.
    RuneLiteral(String),
    StringLiteral(String),
}

impl TokenType {
    /// Whether a newline right after this token ends the statement.
    fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenType::Identifier(_)
                | TokenType::IntLiteral(_)
                | TokenType::FloatLiteral(_)
                | TokenType::ImagLiteral(_)
                | TokenType::RuneLiteral(_)
                | TokenType::StringLiteral(_)
                | TokenType::KeywordFlow(_)
                | TokenType::Increment
                | TokenType::Decrement
                | TokenType::CloseParen
                | TokenType::CloseBracket
                | TokenType::CloseBrace
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    /// Byte offset of the first character in the source.
    pub offset: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    /// Set when the last emitted token allows an automatic semicolon.
    pending_semicolon: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            pending_semicolon: false,
            finished: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn current_offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Character after the next one, without consuming anything.
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> TokenType {
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let end = self.current_offset();
        let word = &self.source[start..end];
        match word {
            "package" => TokenType::KeywordPackage,
            "import" => TokenType::KeywordImport,
            "const" => TokenType::KeywordConst,
            "type" => TokenType::KeywordType,
            "var" => TokenType::KeywordVar,
            "func" => TokenType::KeywordFunc,
            "break" | "continue" | "fallthrough" | "return" => {
                TokenType::KeywordFlow(word.to_string())
            }
            "case" | "chan" | "default" | "defer" | "else" | "for" | "go" | "goto" | "if"
            | "interface" | "map" | "range" | "select" | "struct" | "switch" => {
                TokenType::Keyword(word.to_string())
            }
            _ => TokenType::Identifier(word.to_string()),
        }
    }

    /// Numbers are kept as source text: hex, octal, binary, underscores,
    /// exponents and the imaginary suffix all end up in one token.
    fn lex_number(&mut self, start: usize) -> TokenType {
        let rest = &self.source[start..];
        let hex = rest.starts_with("0x") || rest.starts_with("0X");
        let mut is_float = false;
        let mut prev = '\0';
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                let exponent = if hex {
                    matches!(c, 'p' | 'P')
                } else {
                    matches!(c, 'e' | 'E')
                };
                is_float |= exponent;
            } else if c == '+' || c == '-' {
                let after_exponent = if hex {
                    matches!(prev, 'p' | 'P')
                } else {
                    matches!(prev, 'e' | 'E')
                };
                if !after_exponent {
                    break;
                }
            } else if c == '.' && !is_float && self.peek_second() != Some('.') {
                is_float = true;
            } else {
                break;
            }
            prev = c;
            self.bump();
        }
        let text = self.source[start..self.current_offset()].to_string();
        if text.ends_with('i') {
            TokenType::ImagLiteral(text)
        } else if is_float {
            TokenType::FloatLiteral(text)
        } else {
            TokenType::IntLiteral(text)
        }
    }

    /// Reads a quoted literal up to the closing `quote`, honouring backslash
    /// escapes without interpreting them.
    fn lex_quoted(&mut self, start: usize, quote: char) -> Result<String, LexError> {
        let line = self.line;
        let what = if quote == '\'' { "rune literal" } else { "string literal" };
        self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(LexError::Unterminated { what, line });
                    }
                }
                Some('\n') | None => return Err(LexError::Unterminated { what, line }),
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        Ok(self.source[start..self.current_offset()].to_string())
    }

    fn lex_raw_string(&mut self, start: usize) -> Result<String, LexError> {
        let line = self.line;
        self.bump();
        loop {
            match self.bump() {
                Some('`') => break,
                Some(_) => {}
                None => {
                    return Err(LexError::Unterminated {
                        what: "raw string literal",
                        line,
                    });
                }
            }
        }
        Ok(self.source[start..self.current_offset()].to_string())
    }

    /// Picks between a single-character operator and its two- or
    /// three-character extensions.
    fn lex_operator(&mut self, c: char) -> Result<TokenType, LexError> {
        self.bump();
        let token_type = match c {
            '(' => TokenType::OpenParen,
            ')' => TokenType::CloseParen,
            '{' => TokenType::OpenBrace,
            '}' => TokenType::CloseBrace,
            '[' => TokenType::OpenBracket,
            ']' => TokenType::CloseBracket,
            ';' => TokenType::Semicolon,
            ',' => TokenType::Comma,
            '~' => TokenType::Tilde,
            '.' => {
                if self.peek_char() == Some('.') && self.peek_second() == Some('.') {
                    self.bump();
                    self.bump();
                    TokenType::Ellipsis
                } else {
                    TokenType::Dot
                }
            }
            ':' => {
                if self.eat('=') {
                    TokenType::Define
                } else {
                    TokenType::Colon
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenType::Equal
                } else {
                    TokenType::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenType::NotEqual
                } else {
                    TokenType::Bang
                }
            }
            '+' => {
                if self.eat('+') {
                    TokenType::Increment
                } else if self.eat('=') {
                    TokenType::OpAssign("+=".to_string())
                } else {
                    TokenType::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenType::Decrement
                } else if self.eat('=') {
                    TokenType::OpAssign("-=".to_string())
                } else {
                    TokenType::Minus
                }
            }
            '*' | '/' | '%' | '^' => {
                if self.eat('=') {
                    TokenType::OpAssign(format!("{}=", c))
                } else {
                    match c {
                        '*' => TokenType::Star,
                        '/' => TokenType::Slash,
                        '%' => TokenType::Percent,
                        _ => TokenType::Caret,
                    }
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenType::LogicalAnd
                } else if self.eat('^') {
                    if self.eat('=') {
                        TokenType::OpAssign("&^=".to_string())
                    } else {
                        TokenType::AndNot
                    }
                } else if self.eat('=') {
                    TokenType::OpAssign("&=".to_string())
                } else {
                    TokenType::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenType::LogicalOr
                } else if self.eat('=') {
                    TokenType::OpAssign("|=".to_string())
                } else {
                    TokenType::Pipe
                }
            }
            '<' => {
                if self.eat('-') {
                    TokenType::Arrow
                } else if self.eat('<') {
                    if self.eat('=') {
                        TokenType::OpAssign("<<=".to_string())
                    } else {
                        TokenType::ShiftLeft
                    }
                } else if self.eat('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('=') {
                        TokenType::OpAssign(">>=".to_string())
                    } else {
                        TokenType::ShiftRight
                    }
                } else if self.eat('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                }
            }
            _ => {
                return Err(LexError::UnrecognizedCharacter {
                    ch: c,
                    line: self.line,
                });
            }
        };
        Ok(token_type)
    }

    /// Skips whitespace and comments. Returns the offset and line of the
    /// first newline crossed, if any, so the caller can insert a semicolon.
    fn skip_trivia(&mut self) -> Result<Option<(usize, usize)>, LexError> {
        let mut newline = None;
        loop {
            match self.peek_char() {
                Some('\n') => {
                    if newline.is_none() {
                        newline = Some((self.current_offset(), self.line));
                    }
                    self.bump();
                }
                Some(' ') | Some('\t') | Some('\r') => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let line = self.line;
                    let offset = self.current_offset();
                    self.bump();
                    self.bump();
                    let mut closed = false;
                    while let Some(c) = self.bump() {
                        if c == '\n' && newline.is_none() {
                            newline = Some((offset, line));
                        }
                        if c == '*' && self.eat('/') {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(LexError::Unterminated {
                            what: "block comment",
                            line,
                        });
                    }
                }
                _ => return Ok(newline),
            }
        }
    }

    fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        if self.finished {
            return None;
        }

        let newline = match self.skip_trivia() {
            Ok(newline) => newline,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        if self.pending_semicolon {
            let inserted = match (newline, self.peek_char()) {
                (Some((offset, line)), _) => Some((offset, line)),
                (None, None) => Some((self.source.len(), self.line)),
                _ => None,
            };
            if let Some((offset, line)) = inserted {
                self.pending_semicolon = false;
                return Some(Ok(Token {
                    token_type: TokenType::Semicolon,
                    line,
                    offset,
                }));
            }
        }

        let c = match self.peek_char() {
            Some(c) => c,
            None => {
                self.finished = true;
                return None;
            }
        };
        let start = self.current_offset();
        let line = self.line;

        let result = match c {
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.lex_identifier_or_keyword(start)),
            c if c.is_alphabetic() => Ok(self.lex_identifier_or_keyword(start)),
            '0'..='9' => Ok(self.lex_number(start)),
            '.' if self.peek_second().is_some_and(|n| n.is_ascii_digit()) => {
                Ok(self.lex_number(start))
            }
            '\'' => self.lex_quoted(start, '\'').map(TokenType::RuneLiteral),
            '"' => self.lex_quoted(start, '"').map(TokenType::StringLiteral),
            '`' => self.lex_raw_string(start).map(TokenType::StringLiteral),
            _ => self.lex_operator(c),
        };

        Some(match result {
            Ok(token_type) => {
                self.pending_semicolon = token_type.ends_statement();
                Ok(Token {
                    token_type,
                    line,
                    offset: start,
                })
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Convenience wrapper collecting every token or the first error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn types(source: &str) -> Vec<TokenType> {
        tokenize(source)
            .expect("lexing should succeed")
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    fn ident(name: &str) -> TokenType {
        TokenType::Identifier(name.to_string())
    }

    #[test]
    fn test_semicolon_inserted_after_line_end() {
        let got = types("const (\n\tstatusA status = iota\n\tstatusB\n)\n");
        assert_eq!(
            got,
            vec![
                TokenType::KeywordConst,
                TokenType::OpenParen,
                ident("statusA"),
                ident("status"),
                TokenType::Assign,
                ident("iota"),
                TokenType::Semicolon,
                ident("statusB"),
                TokenType::Semicolon,
                TokenType::CloseParen,
                TokenType::Semicolon,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_open_paren_or_operator() {
        let got = types("x = 1 +\n2");
        assert_eq!(
            got,
            vec![
                ident("x"),
                TokenType::Assign,
                TokenType::IntLiteral("1".to_string()),
                TokenType::Plus,
                TokenType::IntLiteral("2".to_string()),
                TokenType::Semicolon,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped_but_still_end_lines() {
        let got = types("a // trailing\nb /* spans\nlines */ c");
        assert_eq!(
            got,
            vec![
                ident("a"),
                TokenType::Semicolon,
                ident("b"),
                TokenType::Semicolon,
                ident("c"),
                TokenType::Semicolon,
            ]
        );
    }

    #[test]
    fn test_literals_keep_source_text() {
        let got = types(r#"'A' '\n' "x\"y" `raw` 0x1F 3.14 1e9 2i"#);
        assert_eq!(
            got,
            vec![
                TokenType::RuneLiteral("'A'".to_string()),
                TokenType::RuneLiteral(r"'\n'".to_string()),
                TokenType::StringLiteral(r#""x\"y""#.to_string()),
                TokenType::StringLiteral("`raw`".to_string()),
                TokenType::IntLiteral("0x1F".to_string()),
                TokenType::FloatLiteral("3.14".to_string()),
                TokenType::FloatLiteral("1e9".to_string()),
                TokenType::ImagLiteral("2i".to_string()),
                TokenType::Semicolon,
            ]
        );
    }

    #[test]
    fn test_multi_character_operators() {
        let got = types("a &^ b << 2 := <- ... != +=");
        assert_eq!(
            got,
            vec![
                ident("a"),
                TokenType::AndNot,
                ident("b"),
                TokenType::ShiftLeft,
                TokenType::IntLiteral("2".to_string()),
                TokenType::Define,
                TokenType::Arrow,
                TokenType::Ellipsis,
                TokenType::NotEqual,
                TokenType::OpAssign("+=".to_string()),
            ]
        );
    }

    #[test]
    fn test_offsets_and_lines() {
        let tokens = tokenize("package p\n\nconst x = 1").expect("lexing should succeed");
        let x = tokens
            .iter()
            .find(|t| t.token_type == ident("x"))
            .expect("x should be lexed");
        assert_eq!(x.line, 3);
        assert_eq!(x.offset, 17);
    }

    #[test]
    fn test_unterminated_rune_fails() {
        let err = tokenize("x = 'A").unwrap_err();
        assert_eq!(
            err,
            LexError::Unterminated {
                what: "rune literal",
                line: 1
            }
        );
    }

    #[test]
    fn test_unrecognized_character_fails() {
        let err = tokenize("x = @").unwrap_err();
        assert_eq!(err, LexError::UnrecognizedCharacter { ch: '@', line: 1 });
    }
}
