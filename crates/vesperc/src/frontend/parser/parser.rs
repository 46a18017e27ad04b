//! Recursive descent parser

use crate::common::{CompileError, CompileResult, Interner, LineIndex, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};
use crate::types::Type;

/// Recursive descent parser producing a [`Program`]
pub struct Parser<'a, 'i> {
    lexer: Lexer<'a>,
    current: Token,
    lines: LineIndex,
    interner: &'i mut Interner,
}

impl<'a, 'i> Parser<'a, 'i> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str, interner: &'i mut Interner) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            lines: LineIndex::new(source),
            interner,
        })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let mut decls = Vec::new();

        while !self.at_end() {
            decls.push(self.parse_declaration()?);
        }

        Ok(Program::new(decls))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::parser(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.span,
        )
    }

    fn line(&self) -> usize {
        self.line_at(self.current.span)
    }

    fn line_at(&self, span: Span) -> usize {
        self.lines.line_of(span.start)
    }

    fn expect_identifier(&mut self) -> CompileResult<crate::common::Symbol> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let symbol = self.interner.intern(name);
            self.advance()?;
            Ok(symbol)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn parse_type(&mut self) -> CompileResult<Type> {
        let ty = match self.current.kind {
            TokenKind::IntType => Type::Int,
            TokenKind::FloatType => Type::Float,
            TokenKind::StringType => Type::String,
            TokenKind::BoolType => Type::Bool,
            TokenKind::VoidType => Type::Void,
            _ => return Err(self.unexpected("type name")),
        };
        self.advance()?;
        Ok(ty)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_declaration(&mut self) -> CompileResult<Decl> {
        match self.current.kind {
            TokenKind::Var => Ok(Decl::global(self.parse_var_decl()?)),
            TokenKind::Fn => Ok(Decl::function(self.parse_function()?)),
            _ => Err(self.unexpected("'var' or 'fn'")),
        }
    }

    /// var name: Type;
    fn parse_var_decl(&mut self) -> CompileResult<VarDecl> {
        let line = self.line();
        self.expect(TokenKind::Var)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Semi)?;
        Ok(VarDecl::new(name, ty, line))
    }

    /// fn name(a: T, ...): R { ... }
    fn parse_function(&mut self) -> CompileResult<FnDecl> {
        let line = self.line();
        self.expect(TokenKind::Fn)?;
        let name = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_line = self.line();
                let param_name = self.expect_identifier()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;
                params.push(Param::new(param_name, ty, param_line));

                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::Colon)?;
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;

        Ok(FnDecl::new(name, return_type, params, body, line))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> CompileResult<Block> {
        let line = self.line();
        self.expect(TokenKind::LBrace)?;

        let mut locals = Vec::new();
        while self.check(&TokenKind::Var) {
            locals.push(self.parse_var_decl()?);
        }

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(locals, stmts, line))
    }

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        let line = self.line();

        match self.current.kind {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                Ok(Stmt::new(StmtKind::Block(block), line))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Return => {
                self.advance()?;
                let value = if self.check(&TokenKind::Semi) {
                    Expr::empty(line)
                } else {
                    self.parse_expression()?
                };
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Return(value), line))
            }
            TokenKind::Break => {
                self.advance()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Break, line))
            }
            TokenKind::Continue => {
                self.advance()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Continue, line))
            }
            TokenKind::Var => Err(CompileError::parser(
                "variable declarations must come before statements in a block",
                self.current.span,
            )),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Expr(expr), line))
            }
        }
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let line = self.line();
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.match_token(&TokenKind::Else)? {
            if self.check(&TokenKind::If) {
                // else if: wrap the nested if in its own block
                let else_line = self.line();
                let nested = self.parse_if_statement()?;
                Block::new(Vec::new(), vec![nested], else_line)
            } else {
                self.parse_block()?
            }
        } else {
            Block::empty(line)
        };

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            line,
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let line = self.line();
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(Stmt::new(StmtKind::While { condition, body }, line))
    }

    fn parse_for_statement(&mut self) -> CompileResult<Stmt> {
        let line = self.line();
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init = self.parse_optional_expression(&TokenKind::Semi)?;
        self.expect(TokenKind::Semi)?;
        let condition = self.parse_optional_expression(&TokenKind::Semi)?;
        self.expect(TokenKind::Semi)?;
        let update = self.parse_optional_expression(&TokenKind::RParen)?;
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;

        Ok(Stmt::new(
            StmtKind::For {
                init,
                condition,
                update,
                body,
            },
            line,
        ))
    }

    fn parse_optional_expression(&mut self, terminator: &TokenKind) -> CompileResult<Expr> {
        if self.check(terminator) {
            Ok(Expr::empty(self.line()))
        } else {
            self.parse_expression()
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> CompileResult<Expr> {
        let left = self.parse_binary_expression(1)?;

        if self.check(&TokenKind::Eq) {
            let ExprKind::Object(target) = left.kind else {
                return Err(CompileError::parser(
                    "left side of an assignment must be a variable name",
                    self.current.span,
                ));
            };
            self.advance()?;
            let value = self.parse_assignment_expression()?;

            return Ok(Expr::new(
                ExprKind::Assign {
                    target,
                    value: Box::new(value),
                },
                left.line,
            ));
        }

        Ok(left)
    }

    /// Precedence climbing over [`TokenKind::binary_precedence`]; all binary
    /// operators are left-associative
    fn parse_binary_expression(&mut self, min_prec: u8) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expression()?;

        while let Some(prec) = self.current.kind.binary_precedence() {
            if prec < min_prec {
                break;
            }
            let Some(op) = Self::binary_op(&self.current.kind) else {
                break;
            };
            self.advance()?;

            let right = self.parse_binary_expression(prec + 1)?;
            let line = left.line;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                line,
            );
        }

        Ok(left)
    }

    fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::Caret => BinaryOp::Xor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            _ => return None,
        };
        Some(op)
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let line = self.line();
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            _ => return self.parse_primary_expression(),
        };
        self.advance()?;
        let operand = self.parse_unary_expression()?;

        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            line,
        ))
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;
        let line = self.line_at(span);

        match &self.current.kind {
            TokenKind::IntLiteral(s) => {
                let value = s.parse::<i64>().map_err(|_| {
                    CompileError::parser(format!("integer literal out of range: {}", s), span)
                })?;
                self.advance()?;
                Ok(Expr::new(ExprKind::Const(Constant::Int(value)), line))
            }
            TokenKind::FloatLiteral(s) => {
                let value = s.parse::<f64>().map_err(|_| {
                    CompileError::parser(format!("invalid float literal: {}", s), span)
                })?;
                self.advance()?;
                Ok(Expr::new(ExprKind::Const(Constant::Float(value)), line))
            }
            TokenKind::StringLiteral(s) => {
                let value = unescape_string(s, span)?;
                self.advance()?;
                Ok(Expr::new(ExprKind::Const(Constant::String(value)), line))
            }
            TokenKind::True | TokenKind::False => {
                let value = matches!(self.current.kind, TokenKind::True);
                self.advance()?;
                Ok(Expr::new(ExprKind::Const(Constant::Bool(value)), line))
            }
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_arguments()?;
                    Ok(Expr::new(ExprKind::Call { callee: name, args }, line))
                } else {
                    Ok(Expr::new(ExprKind::Object(name), line))
                }
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(CompileError::parser(
                format!("unexpected token in expression: {}", self.current.kind),
                span,
            )),
        }
    }

    /// Arguments after the opening parenthesis, consuming the closing one
    fn parse_arguments(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}

/// Strip the quotes from a string literal token and resolve escapes
fn unescape_string(raw: &str, span: Span) -> CompileResult<String> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CompileError::parser("malformed string literal", span))?;

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some('\\') => value.push('\\'),
            Some('"') => value.push('"'),
            Some(other) => {
                return Err(CompileError::parser(
                    format!("unknown escape sequence '\\{}'", other),
                    span,
                ));
            }
            None => return Err(CompileError::parser("unterminated escape sequence", span)),
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (Program, Interner) {
        let mut interner = Interner::new();
        let program = Parser::new(source, &mut interner).unwrap().parse().unwrap();
        (program, interner)
    }

    fn only_function(program: &Program) -> &FnDecl {
        program.functions().next().expect("expected a function")
    }

    #[test]
    fn test_parse_simple_function() {
        let (program, interner) = parse("fn main(): Void { return; }");

        assert_eq!(program.decls.len(), 1);
        let main = only_function(&program);
        assert_eq!(interner.resolve(main.name), "main");
        assert_eq!(main.return_type, Type::Void);
        assert!(main.params.is_empty());
        assert_eq!(main.body.stmts.len(), 1);
        match &main.body.stmts[0].kind {
            StmtKind::Return(value) => assert!(value.is_empty()),
            other => panic!("expected return, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_globals_and_params() {
        let source = "var count: Int;\nvar ratio: Float;\nfn sum(a: Int, b: Int): Int { return a + b; }";
        let (program, interner) = parse(source);

        let globals: Vec<_> = program.globals().map(|g| (interner.resolve(g.name), g.ty, g.line)).collect();
        assert_eq!(globals, vec![("count", Type::Int, 1), ("ratio", Type::Float, 2)]);

        let sum = only_function(&program);
        assert_eq!(sum.param_types(), vec![Type::Int, Type::Int]);
        assert_eq!(sum.line, 3);
    }

    #[test]
    fn test_parse_block_locals() {
        let (program, _) = parse("fn f(): Int { var x: Int; var y: Bool; x = 1; return x; }");

        let f = only_function(&program);
        assert_eq!(f.body.locals.len(), 2);
        assert_eq!(f.body.locals[1].ty, Type::Bool);
        assert_eq!(f.body.stmts.len(), 2);
    }

    #[test]
    fn test_local_after_statement_is_rejected() {
        let mut interner = Interner::new();
        let result = Parser::new("fn f(): Void { return; var x: Int; }", &mut interner)
            .unwrap()
            .parse();
        assert!(matches!(result, Err(CompileError::Parser { .. })));
    }

    #[test]
    fn test_precedence() {
        let (program, _) = parse("fn f(): Bool { return 1 + 2 * 3 < 10 && true; }");

        let f = only_function(&program);
        let StmtKind::Return(value) = &f.body.stmts[0].kind else {
            panic!("expected return");
        };
        let ExprKind::Binary { op: BinaryOp::And, left, .. } = &value.kind else {
            panic!("expected && at the root, got {:?}", value.kind);
        };
        let ExprKind::Binary { op: BinaryOp::Lt, left: sum, .. } = &left.kind else {
            panic!("expected < under &&");
        };
        let ExprKind::Binary { op: BinaryOp::Add, right: product, .. } = &sum.kind else {
            panic!("expected + under <");
        };
        assert!(matches!(product.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_left_associative_subtraction() {
        let (program, _) = parse("fn f(): Int { return 10 - 3 - 2; }");

        let f = only_function(&program);
        let StmtKind::Return(value) = &f.body.stmts[0].kind else {
            panic!("expected return");
        };
        let ExprKind::Binary { op: BinaryOp::Sub, left, right } = &value.kind else {
            panic!("expected subtraction");
        };
        assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Sub, .. }));
        assert_eq!(right.kind, ExprKind::Const(Constant::Int(2)));
    }

    #[test]
    fn test_parse_assignment_and_call() {
        let (program, interner) = parse(r#"fn f(): Void { x = y = sum(1, 2.5); printf("n = %d\n", x); return; }"#);

        let f = only_function(&program);
        let StmtKind::Expr(assign) = &f.body.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { target, value } = &assign.kind else {
            panic!("expected assignment");
        };
        assert_eq!(interner.resolve(*target), "x");
        assert!(matches!(value.kind, ExprKind::Assign { .. }));

        let StmtKind::Expr(call) = &f.body.stmts[1].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Call { callee, args } = &call.kind else {
            panic!("expected call");
        };
        assert_eq!(*callee, interner.print_symbol());
        assert_eq!(args[0].kind, ExprKind::Const(Constant::String("n = %d\n".to_string())));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut interner = Interner::new();
        let result = Parser::new("fn f(): Void { 1 = 2; }", &mut interner)
            .unwrap()
            .parse();
        assert!(matches!(result, Err(CompileError::Parser { .. })));
    }

    #[test]
    fn test_parse_control_flow() {
        let source = r#"
fn f(n: Int): Int {
    var i: Int;
    for (i = 0; i < n; i = i + 1) {
        if (i == 3) { break; } else if (i == 4) { continue; }
    }
    for (;;) { break; }
    while (!false) { return 1; }
    return 0;
}
"#;
        let (program, _) = parse(source);
        let f = only_function(&program);
        assert_eq!(f.line, 2);

        let StmtKind::For { body, .. } = &f.body.stmts[0].kind else {
            panic!("expected for");
        };
        let StmtKind::If { else_branch, .. } = &body.stmts[0].kind else {
            panic!("expected if");
        };
        assert!(matches!(else_branch.stmts[0].kind, StmtKind::If { .. }));

        let StmtKind::For { init, condition, update, .. } = &f.body.stmts[1].kind else {
            panic!("expected for");
        };
        assert!(init.is_empty() && condition.is_empty() && update.is_empty());
        assert_eq!(f.body.stmts[2].line, 8);
    }

    #[test]
    fn test_if_without_else_gets_empty_block() {
        let (program, _) = parse("fn f(): Void { if (true) { return; } return; }");

        let f = only_function(&program);
        let StmtKind::If { else_branch, .. } = &f.body.stmts[0].kind else {
            panic!("expected if");
        };
        assert!(else_branch.is_empty());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_string(r#""a\tb\\c\"""#, Span::default()).unwrap(), "a\tb\\c\"");
        assert!(unescape_string(r#""bad \q""#, Span::default()).is_err());
    }

    #[test]
    fn test_missing_semicolon() {
        let mut interner = Interner::new();
        let result = Parser::new("var x: Int", &mut interner).unwrap().parse();
        match result {
            Err(CompileError::Parser { message, .. }) => assert!(message.contains("';'")),
            other => panic!("expected parser error, got {:?}", other),
        }
    }
}
