//! src/parser.rs

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{Token, TokenType};

pub struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Parses a whole file.
    /// <file> ::= "package" <identifier> ";" { <top-level-decl> ";" }
    pub fn parse(&mut self) -> Result<SourceFile, ParseError> {
        self.skip_semicolons();
        self.expect_token(TokenType::KeywordPackage)?;
        let package = self.expect_identifier()?.name;
        self.expect_spec_end()?;

        let mut declarations = Vec::new();
        while let Some(token) = self.peek() {
            match token.token_type {
                TokenType::Semicolon => {
                    self.consume();
                }
                TokenType::KeywordImport => {
                    declarations.push(Declaration::Gen(self.parse_gen_decl(DeclKeyword::Import)?));
                }
                TokenType::KeywordConst => {
                    declarations.push(Declaration::Gen(self.parse_gen_decl(DeclKeyword::Const)?));
                }
                TokenType::KeywordType => {
                    declarations.push(Declaration::Gen(self.parse_gen_decl(DeclKeyword::Type)?));
                }
                // var, func and anything else carry nothing we evaluate.
                _ => self.skip_declaration(),
            }
        }

        Ok(SourceFile {
            package,
            declarations,
        })
    }

    // --- Private Helper Methods ---

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_type(&self) -> Option<&TokenType> {
        self.peek().map(|t| &t.token_type)
    }

    fn consume(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{:?}", token.token_type),
                line: token.line,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn expect_token(&mut self, expected_type: TokenType) -> Result<&Token, ParseError> {
        match self.peek() {
            Some(token) if token.token_type == expected_type => {
                self.position += 1;
                Ok(&self.tokens[self.position - 1])
            }
            _ => Err(self.unexpected(&format!("{:?}", expected_type))),
        }
    }

    fn expect_identifier(&mut self) -> Result<Ident, ParseError> {
        if let Some(Token {
            token_type: TokenType::Identifier(name),
            offset,
            ..
        }) = self.peek()
        {
            let ident = Ident {
                name: name.clone(),
                offset: *offset,
            };
            self.consume();
            return Ok(ident);
        }
        Err(self.unexpected("an identifier"))
    }

    fn skip_semicolons(&mut self) {
        while self.peek_type() == Some(&TokenType::Semicolon) {
            self.consume();
        }
    }

    /// True at `;`, at the `)` closing a group, or at end of input.
    fn at_spec_end(&self) -> bool {
        matches!(
            self.peek_type(),
            None | Some(TokenType::Semicolon) | Some(TokenType::CloseParen)
        )
    }

    fn expect_spec_end(&mut self) -> Result<(), ParseError> {
        match self.peek_type() {
            Some(TokenType::Semicolon) => {
                self.consume();
                Ok(())
            }
            None | Some(TokenType::CloseParen) => Ok(()),
            _ => Err(self.unexpected("end of declaration")),
        }
    }

    /// Consumes tokens up to and including the next `;` outside any
    /// brackets. Used for declarations the generator does not model.
    fn skip_declaration(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.consume() {
            match token.token_type {
                TokenType::OpenParen | TokenType::OpenBrace | TokenType::OpenBracket => depth += 1,
                TokenType::CloseParen | TokenType::CloseBrace | TokenType::CloseBracket => {
                    depth = depth.saturating_sub(1)
                }
                TokenType::Semicolon if depth == 0 => return,
                _ => {}
            }
        }
    }

    /// Like `skip_declaration` but stops before the spec terminator so a
    /// surrounding group keeps its closing `)`.
    fn skip_spec(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.token_type {
                TokenType::OpenParen | TokenType::OpenBrace | TokenType::OpenBracket => depth += 1,
                TokenType::CloseParen if depth == 0 => return,
                TokenType::CloseParen | TokenType::CloseBrace | TokenType::CloseBracket => {
                    depth = depth.saturating_sub(1)
                }
                TokenType::Semicolon if depth == 0 => return,
                _ => {}
            }
            self.consume();
        }
    }

    // --- Declarations ---

    /// <gen-decl> ::= <keyword> ( <spec> | "(" { <spec> ";" } ")" )
    fn parse_gen_decl(&mut self, keyword: DeclKeyword) -> Result<GenDecl, ParseError> {
        self.consume();
        let mut specs = Vec::new();

        if self.peek_type() == Some(&TokenType::OpenParen) {
            self.consume();
            loop {
                self.skip_semicolons();
                if self.peek_type() == Some(&TokenType::CloseParen) {
                    self.consume();
                    break;
                }
                if self.peek().is_none() {
                    return Err(self.unexpected("')' closing the declaration group"));
                }
                specs.push(self.parse_spec(keyword)?);
                self.expect_spec_end()?;
            }
        } else {
            specs.push(self.parse_spec(keyword)?);
        }

        Ok(GenDecl { keyword, specs })
    }

    fn parse_spec(&mut self, keyword: DeclKeyword) -> Result<Spec, ParseError> {
        match keyword {
            DeclKeyword::Import => self.parse_import_spec().map(Spec::Import),
            DeclKeyword::Const => self.parse_value_spec().map(Spec::Value),
            DeclKeyword::Type => self.parse_type_spec().map(Spec::Type),
        }
    }

    /// <import-spec> ::= [ "." | <identifier> ] <string>
    fn parse_import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let alias = match self.peek_type() {
            Some(TokenType::Dot) => {
                self.consume();
                Some(".".to_string())
            }
            Some(TokenType::Identifier(_)) => Some(self.expect_identifier()?.name),
            _ => None,
        };
        match self.peek_type() {
            Some(TokenType::StringLiteral(path)) => {
                let path = path.trim_matches(|c| c == '"' || c == '`').to_string();
                self.consume();
                Ok(ImportSpec { alias, path })
            }
            _ => Err(self.unexpected("an import path")),
        }
    }

    /// <value-spec> ::= <identifier> { "," <identifier> } [ <type> ] [ "=" <exp> { "," <exp> } ]
    fn parse_value_spec(&mut self) -> Result<ValueSpec, ParseError> {
        let mut names = vec![self.expect_identifier()?];
        while self.peek_type() == Some(&TokenType::Comma) {
            self.consume();
            names.push(self.expect_identifier()?);
        }

        let type_name = if self.at_spec_end() || self.peek_type() == Some(&TokenType::Assign) {
            None
        } else {
            Some(self.parse_type_name()?)
        };

        let mut values = Vec::new();
        if self.peek_type() == Some(&TokenType::Assign) {
            self.consume();
            values.push(self.parse_expression()?);
            while self.peek_type() == Some(&TokenType::Comma) {
                self.consume();
                values.push(self.parse_expression()?);
            }
        }

        Ok(ValueSpec {
            names,
            type_name,
            values,
        })
    }

    /// <type-name> ::= <identifier> [ "." <identifier> ]
    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_identifier()?.name;
        if self.peek_type() == Some(&TokenType::Dot) {
            self.consume();
            let qualified = self.expect_identifier()?;
            name = format!("{}.{}", name, qualified.name);
        }
        Ok(name)
    }

    /// <type-spec> ::= <identifier> [ "=" ] <type>
    /// Only a bare identifier on the right is recorded as the underlying type.
    fn parse_type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let name = self.expect_identifier()?;
        let underlying = match self.peek_type() {
            Some(TokenType::Identifier(underlying)) => {
                let underlying = underlying.clone();
                self.consume();
                if self.at_spec_end() {
                    Some(underlying)
                } else {
                    self.skip_spec();
                    None
                }
            }
            _ => {
                self.skip_spec();
                None
            }
        };
        Ok(TypeSpec { name, underlying })
    }

    // --- Expressions ---

    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_binary(1)
    }

    fn peek_binary_operator(&self) -> Option<BinaryOperator> {
        let operator = match self.peek_type()? {
            TokenType::Plus => BinaryOperator::Add,
            TokenType::Minus => BinaryOperator::Subtract,
            TokenType::Star => BinaryOperator::Multiply,
            TokenType::Slash => BinaryOperator::Divide,
            TokenType::Percent => BinaryOperator::Remainder,
            TokenType::Amp => BinaryOperator::BitAnd,
            TokenType::Pipe => BinaryOperator::BitOr,
            TokenType::Caret => BinaryOperator::BitXor,
            TokenType::AndNot => BinaryOperator::AndNot,
            TokenType::ShiftLeft => BinaryOperator::ShiftLeft,
            TokenType::ShiftRight => BinaryOperator::ShiftRight,
            TokenType::LogicalAnd => BinaryOperator::And,
            TokenType::LogicalOr => BinaryOperator::Or,
            TokenType::Equal => BinaryOperator::Equal,
            TokenType::NotEqual => BinaryOperator::NotEqual,
            TokenType::Less => BinaryOperator::LessThan,
            TokenType::LessEqual => BinaryOperator::LessOrEqual,
            TokenType::Greater => BinaryOperator::GreaterThan,
            TokenType::GreaterEqual => BinaryOperator::GreaterOrEqual,
            _ => return None,
        };
        Some(operator)
    }

    /// Precedence climbing; operators of equal precedence associate left.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(operator) = self.peek_binary_operator() {
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            self.consume();
            let right = self.parse_binary(precedence + 1)?;
            left = Expression::Binary(BinaryExpression::new(left, operator, right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let operator = match self.peek_type() {
            Some(TokenType::Plus) => UnaryOperator::Plus,
            Some(TokenType::Minus) => UnaryOperator::Negate,
            Some(TokenType::Bang) => UnaryOperator::Not,
            Some(TokenType::Caret) => UnaryOperator::Complement,
            Some(TokenType::Star) => UnaryOperator::Deref,
            Some(TokenType::Amp) => UnaryOperator::AddressOf,
            Some(TokenType::Arrow) => UnaryOperator::Receive,
            _ => return self.parse_primary(),
        };
        self.consume();
        let operand = self.parse_unary()?;
        Ok(Expression::Unary {
            operator,
            operand: Box::new(operand),
        })
    }

    fn parse_operand(&mut self) -> Result<Expression, ParseError> {
        let literal = |kind: LiteralKind, text: &String| {
            Expression::Literal(Literal {
                kind,
                text: text.clone(),
            })
        };
        let expression = match self.peek_type() {
            Some(TokenType::Identifier(name)) => Expression::Identifier(name.clone()),
            Some(TokenType::IntLiteral(text)) => literal(LiteralKind::Int, text),
            Some(TokenType::FloatLiteral(text)) => literal(LiteralKind::Float, text),
            Some(TokenType::ImagLiteral(text)) => literal(LiteralKind::Imag, text),
            Some(TokenType::RuneLiteral(text)) => literal(LiteralKind::Char, text),
            Some(TokenType::StringLiteral(text)) => literal(LiteralKind::String, text),
            Some(TokenType::OpenParen) => {
                self.consume();
                let inner = self.parse_expression()?;
                self.expect_token(TokenType::CloseParen)?;
                return Ok(Expression::Paren(Box::new(inner)));
            }
            _ => return Err(self.unexpected("an expression")),
        };
        self.consume();
        Ok(expression)
    }

    /// <primary> ::= <operand> { "." <identifier> | "(" [ <exp> { "," <exp> } ] ")" | "[" <exp> "]" }
    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.parse_operand()?;
        loop {
            match self.peek_type() {
                Some(TokenType::Dot) => {
                    self.consume();
                    let field = self.expect_identifier()?.name;
                    expression = Expression::Selector {
                        base: Box::new(expression),
                        field,
                    };
                }
                Some(TokenType::OpenParen) => {
                    self.consume();
                    let mut args = Vec::new();
                    while self.peek_type() != Some(&TokenType::CloseParen) {
                        args.push(self.parse_expression()?);
                        if self.peek_type() == Some(&TokenType::Comma) {
                            self.consume();
                        } else {
                            break;
                        }
                    }
                    self.expect_token(TokenType::CloseParen)?;
                    expression = Expression::Call {
                        callee: Box::new(expression),
                        args,
                    };
                }
                Some(TokenType::OpenBracket) => {
                    self.consume();
                    let index = self.parse_expression()?;
                    self.expect_token(TokenType::CloseBracket)?;
                    expression = Expression::Index {
                        base: Box::new(expression),
                        index: Box::new(index),
                    };
                }
                _ => return Ok(expression),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> SourceFile {
        let tokens = tokenize(source).expect("lexing should succeed");
        Parser::new(&tokens).parse().expect("parsing should succeed")
    }

    fn const_specs(file: &SourceFile) -> Vec<&ValueSpec> {
        file.declarations
            .iter()
            .flat_map(|Declaration::Gen(decl)| decl.specs.iter())
            .filter_map(|spec| match spec {
                Spec::Value(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_const_block() {
        let file = parse(
            "package testdata\n\ntype status uint8\n\nconst (\n\tstatusUnknown status = iota\n\tstatusActive\n)\n",
        );
        assert_eq!(file.package, "testdata");
        let specs = const_specs(&file);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].names[0].name, "statusUnknown");
        assert_eq!(specs[0].type_name.as_deref(), Some("status"));
        assert_eq!(
            specs[0].values,
            vec![Expression::Identifier("iota".to_string())]
        );
        assert_eq!(specs[1].names[0].name, "statusActive");
        assert!(specs[1].values.is_empty());
        assert!(specs[0].names[0].offset < specs[1].names[0].offset);
    }

    #[test]
    fn test_parse_binary_precedence() {
        let file = parse("package p\nconst a = 10 + iota * 2\n");
        let specs = const_specs(&file);
        assert_eq!(
            specs[0].values[0],
            Expression::Binary(BinaryExpression::new(
                Expression::Literal(Literal::int("10")),
                BinaryOperator::Add,
                Expression::Binary(BinaryExpression::new(
                    Expression::Identifier("iota".to_string()),
                    BinaryOperator::Multiply,
                    Expression::Literal(Literal::int("2")),
                )),
            ))
        );
    }

    #[test]
    fn test_parse_unary_and_rune() {
        let file = parse("package p\nconst (\n\ta = -5\n\tb = 'A'\n)\n");
        let specs = const_specs(&file);
        assert_eq!(
            specs[0].values[0],
            Expression::Unary {
                operator: UnaryOperator::Negate,
                operand: Box::new(Expression::Literal(Literal::int("5"))),
            }
        );
        assert_eq!(
            specs[1].values[0],
            Expression::Literal(Literal::rune("'A'"))
        );
    }

    #[test]
    fn test_parse_multi_name_line() {
        let file = parse("package p\nconst (\n\ta, _, c = iota, iota, iota\n)\n");
        let specs = const_specs(&file);
        let names: Vec<&str> = specs[0].names.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "_", "c"]);
        assert_eq!(specs[0].values.len(), 3);
    }

    #[test]
    fn test_skips_functions_and_vars() {
        let file = parse(
            "package p\n\nimport (\n\t\"fmt\"\n\tsq \"database/sql\"\n)\n\nvar x = map[string]int{\"a\": 1}\n\nfunc f() {\n\tif true {\n\t\tfmt.Println(1)\n\t}\n}\n\nconst y = 1\n",
        );
        assert_eq!(file.declarations.len(), 2);
        match &file.declarations[0] {
            Declaration::Gen(decl) => {
                assert_eq!(decl.keyword, DeclKeyword::Import);
                assert_eq!(
                    decl.specs[1],
                    Spec::Import(ImportSpec {
                        alias: Some("sq".to_string()),
                        path: "database/sql".to_string(),
                    })
                );
            }
        }
        assert_eq!(const_specs(&file)[0].names[0].name, "y");
    }

    #[test]
    fn test_type_specs() {
        let file = parse(
            "package p\ntype (\n\ta uint16\n\tb = int\n\tc struct{ x int }\n\td pkg.T\n)\n",
        );
        let types: Vec<(String, Option<String>)> = file
            .declarations
            .iter()
            .flat_map(|Declaration::Gen(decl)| decl.specs.iter())
            .filter_map(|spec| match spec {
                Spec::Type(t) => Some((t.name.name.clone(), t.underlying.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            types,
            vec![
                ("a".to_string(), Some("uint16".to_string())),
                ("b".to_string(), None),
                ("c".to_string(), None),
                ("d".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_empty_const_block() {
        let file = parse("package p\nconst (\n\t// nothing here\n)\n");
        match &file.declarations[0] {
            Declaration::Gen(decl) => assert!(decl.specs.is_empty()),
        }
    }

    #[test]
    fn test_missing_package_clause_fails() {
        let tokens = tokenize("const a = 1").expect("lexing should succeed");
        let err = Parser::new(&tokens).parse().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { line: 1, .. }));
    }

    #[test]
    fn test_unclosed_group_fails() {
        let tokens = tokenize("package p\nconst (\n\ta = 1\n").expect("lexing should succeed");
        let err = Parser::new(&tokens).parse().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
