use std::collections::HashMap;

use ast::{Expr, Function, ProtoKind, Prototype};
use error::{CompileError, CompileResult};
use lex::{Lexer, Token};

/// Recursive-descent / Pratt parser. Holds one token of lookahead and a
/// snapshot of the (possibly still-growing) operator precedence table taken
/// when the parser was built; the table itself is owned by the compilation
/// context and mutated elsewhere, at lowering time, so a fresh snapshot is
/// taken for each top-level item parsed.
pub struct Parser<'input, 'lexer> {
    lexer: &'lexer mut Lexer<'input>,
    current: Token,
    precedence: HashMap<String, i32>,
}

impl<'input, 'lexer> Parser<'input, 'lexer> {
    pub fn new(
        lexer: &'lexer mut Lexer<'input>,
        precedence: &HashMap<String, i32>,
    ) -> CompileResult<Parser<'input, 'lexer>> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            precedence: precedence.clone(),
        })
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn advance(&mut self) -> CompileResult<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect_char(&mut self, c: char) -> CompileResult<()> {
        match self.current {
            Token::Char(got) if got == c => self.advance(),
            _ => Err(self.expected("a punctuation character")),
        }
    }

    fn expected(&self, what: &'static str) -> CompileError {
        CompileError::ParseError {
            expected: what,
            found: self.current.clone(),
        }
    }

    fn precedence_of(&self, op: &str) -> i32 {
        self.precedence.get(op).cloned().unwrap_or(-1)
    }

    /// `topLevel ::= expression`, wrapped as the `__anon_expr` function.
    pub fn parse_top_level_expr(&mut self) -> CompileResult<Function> {
        let expr = self.parse_expression()?;
        Ok(Function {
            proto: Prototype {
                name: Prototype::ANON_NAME.to_string(),
                params: Vec::new(),
                kind: ProtoKind::Plain,
                op_precedence: 0,
            },
            body: vec![expr],
        })
    }

    /// `definition ::= 'def' prototype expression* 'end'`
    pub fn parse_definition(&mut self) -> CompileResult<Function> {
        self.advance()?; // consume `def`
        let proto = self.parse_prototype()?;
        let body = self.parse_expr_sequence_until_end()?;
        Ok(Function { proto, body })
    }

    /// `extern ::= 'extern' prototype`
    pub fn parse_extern(&mut self) -> CompileResult<Prototype> {
        self.advance()?; // consume `extern`
        self.parse_prototype()
    }

    fn parse_expr_sequence_until_end(&mut self) -> CompileResult<Vec<Expr>> {
        let mut body = Vec::new();
        while self.current != Token::End {
            body.push(self.parse_expression()?);
        }
        self.advance()?; // consume `end`
        Ok(body)
    }

    fn parse_prototype(&mut self) -> CompileResult<Prototype> {
        match self.current.clone() {
            Token::Ident(name) => {
                self.advance()?;
                let params = self.parse_param_list()?;
                Ok(Prototype {
                    name,
                    params,
                    kind: ProtoKind::Plain,
                    op_precedence: 0,
                })
            }
            Token::Unary => {
                self.advance()?;
                let op = self.parse_op_text()?;
                let params = self.parse_param_list()?;
                if params.len() != 1 {
                    return Err(self.expected("exactly one parameter for a unary operator"));
                }
                Ok(Prototype {
                    name: format!("unary{}", op),
                    params,
                    kind: ProtoKind::UnaryOp,
                    op_precedence: 0,
                })
            }
            Token::Binary => {
                self.advance()?;
                let op = self.parse_op_text()?;
                let precedence = self.parse_precedence_number()?;
                let params = self.parse_param_list()?;
                if params.len() != 2 {
                    return Err(self.expected("exactly two parameters for a binary operator"));
                }
                Ok(Prototype {
                    name: format!("binary{}", op),
                    params,
                    kind: ProtoKind::BinaryOp,
                    op_precedence: precedence,
                })
            }
            _ => Err(self.expected("a function name, `unary`, or `binary`")),
        }
    }

    fn parse_op_text(&mut self) -> CompileResult<String> {
        match self.current.clone() {
            Token::Op(op) => {
                self.advance()?;
                Ok(op)
            }
            Token::Char(c) => {
                self.advance()?;
                Ok(c.to_string())
            }
            _ => Err(self.expected("an operator")),
        }
    }

    fn parse_precedence_number(&mut self) -> CompileResult<i32> {
        match self.current {
            Token::Number(n) => {
                self.advance()?;
                Ok(n as i32)
            }
            _ => Err(self.expected("a precedence number")),
        }
    }

    fn parse_param_list(&mut self) -> CompileResult<Vec<String>> {
        self.expect_char('(')?;
        let mut params = Vec::new();
        while self.current != Token::Char(')') {
            match self.current.clone() {
                Token::Ident(name) => {
                    params.push(name);
                    self.advance()?;
                }
                _ => return Err(self.expected("a parameter name")),
            }
        }
        self.expect_char(')')?;
        Ok(params)
    }

    /// `expression ::= unary (OP expression-with-precedence)*`
    pub fn parse_expression(&mut self) -> CompileResult<Expr> {
        let lhs = self.parse_unary()?;
        self.parse_bin_op_rhs(0, lhs)
    }

    fn parse_bin_op_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> CompileResult<Expr> {
        loop {
            let op = match self.current_operator_text() {
                Some(op) => op,
                None => return Ok(lhs),
            };
            let prec = self.precedence_of(&op);
            if prec < min_prec {
                return Ok(lhs);
            }
            self.advance()?;
            let mut rhs = self.parse_unary()?;

            if let Some(next_op) = self.current_operator_text() {
                let next_prec = self.precedence_of(&next_op);
                if prec < next_prec {
                    rhs = self.parse_bin_op_rhs(prec + 1, rhs)?;
                }
            }

            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn current_operator_text(&self) -> Option<String> {
        match self.current {
            Token::Op(ref op) => Some(op.clone()),
            _ => None,
        }
    }

    /// `unary ::= primary | OP unary`
    fn parse_unary(&mut self) -> CompileResult<Expr> {
        if let Token::Op(op) = self.current.clone() {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    /// `primary ::= number | '(' expression ')' | identifierExpr
    ///            | ifExpr | forExpr | globalExpr`
    fn parse_primary(&mut self) -> CompileResult<Expr> {
        match self.current.clone() {
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::Char('(') => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect_char(')')?;
                Ok(expr)
            }
            Token::Ident(name) => self.parse_identifier_expr(name, false),
            Token::If => self.parse_if_expr(),
            Token::For => self.parse_for_expr(),
            Token::Global => {
                self.advance()?;
                match self.current.clone() {
                    Token::Ident(name) => self.parse_identifier_expr(name, true),
                    _ => Err(self.expected("an identifier after `global`")),
                }
            }
            _ => Err(self.expected("an expression")),
        }
    }

    fn parse_identifier_expr(&mut self, name: String, is_global: bool) -> CompileResult<Expr> {
        self.advance()?;
        if self.current == Token::Char('(') {
            let args = self.parse_call_args()?;
            return Ok(Expr::Call { callee: name, args });
        }
        Ok(Expr::Variable { name, is_global })
    }

    fn parse_call_args(&mut self) -> CompileResult<Vec<Expr>> {
        self.expect_char('(')?;
        let mut args = Vec::new();
        if self.current != Token::Char(')') {
            args.push(self.parse_expression()?);
            while self.current == Token::Char(',') {
                self.advance()?;
                args.push(self.parse_expression()?);
            }
        }
        self.expect_char(')')?;
        Ok(args)
    }

    /// `ifExpr ::= 'if' expression 'then' expr* 'else' expr* 'end'`
    fn parse_if_expr(&mut self) -> CompileResult<Expr> {
        self.advance()?; // consume `if`
        let cond = self.parse_expression()?;
        if self.current != Token::Then {
            return Err(self.expected("`then`"));
        }
        self.advance()?;
        let mut then_body = Vec::new();
        while self.current != Token::Else {
            then_body.push(self.parse_expression()?);
        }
        self.advance()?; // consume `else`
        let else_body = self.parse_expr_sequence_until_end()?;
        Ok(Expr::If {
            cond: Box::new(cond),
            then_body,
            else_body,
        })
    }

    /// `forExpr ::= 'for' ID '=' expression ',' expression ',' expression 'in' expr* 'end'`
    fn parse_for_expr(&mut self) -> CompileResult<Expr> {
        self.advance()?; // consume `for`
        let var = match self.current.clone() {
            Token::Ident(name) => {
                self.advance()?;
                name
            }
            _ => return Err(self.expected("a loop variable name")),
        };
        if self.current != Token::Op("=".to_string()) {
            return Err(self.expected("`=`"));
        }
        self.advance()?;
        let start = self.parse_expression()?;
        self.expect_char(',')?;
        let end = self.parse_expression()?;
        self.expect_char(',')?;
        let step = self.parse_expression()?;
        if self.current != Token::In {
            return Err(self.expected("`in`"));
        }
        self.advance()?;
        let body = self.parse_expr_sequence_until_end()?;
        Ok(Expr::For {
            var,
            start: Box::new(start),
            end: Box::new(end),
            step: Box::new(step),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parse::builtin_precedence;

    fn parse_expr(input: &str, table: &HashMap<String, i32>) -> Expr {
        let mut lexer = Lexer::new(input);
        let mut parser = Parser::new(&mut lexer, table).expect("failed to construct parser");
        parser.parse_expression().expect("failed to parse expression")
    }

    #[test]
    fn parses_left_associative_same_precedence() {
        let table = builtin_precedence();
        let expr = parse_expr("1 - 2 - 3", &table);
        match expr {
            Expr::Binary { op, lhs, rhs } => {
                assert_eq!(op, "-");
                assert_eq!(*rhs, Expr::Number(3.0));
                assert!(matches!(*lhs, Expr::Binary { .. }));
            }
            other => panic!("expected a binary node, got {:?}", other),
        }
    }

    #[test]
    fn respects_precedence_climbing() {
        let table = builtin_precedence();
        let expr = parse_expr("1 + 2 * 3", &table);
        match expr {
            Expr::Binary { op, rhs, .. } => {
                assert_eq!(op, "+");
                assert!(matches!(*rhs, Expr::Binary { ref op, .. } if op == "*"));
            }
            other => panic!("expected a binary node, got {:?}", other),
        }
    }

    #[test]
    fn parses_call_with_args() {
        let table = builtin_precedence();
        let expr = parse_expr("foo(1, 2)", &table);
        match expr {
            Expr::Call { callee, args } => {
                assert_eq!(callee, "foo");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected a call node, got {:?}", other),
        }
    }

    #[test]
    fn parses_global_variable_reference() {
        let table = builtin_precedence();
        let expr = parse_expr("global x", &table);
        assert_eq!(
            expr,
            Expr::Variable {
                name: "x".to_string(),
                is_global: true,
            }
        );
    }

    #[test]
    fn parses_unary_operator() {
        let table = builtin_precedence();
        let expr = parse_expr("-x", &table);
        assert_eq!(
            expr,
            Expr::Unary {
                op: "-".to_string(),
                operand: Box::new(Expr::Variable {
                    name: "x".to_string(),
                    is_global: false,
                }),
            }
        );
    }

    #[test]
    fn parses_definition_with_binary_operator_prototype() {
        let table = builtin_precedence();
        let mut lexer = Lexer::new("def binary> 10 (a b) a end");
        let mut parser = Parser::new(&mut lexer, &table).unwrap();
        let func = parser.parse_definition().expect("failed to parse definition");
        assert_eq!(func.proto.name, "binary>");
        assert_eq!(func.proto.kind, ProtoKind::BinaryOp);
        assert_eq!(func.proto.op_precedence, 10);
    }
}
