//! Expression grammar
//!
//! Precedence, lowest first: assignment, `||`, `&&`, equality, relational,
//! additive, multiplicative, cast, unary, postfix, primary. Every level
//! returns the [`ExprInfo`] of what it matched.

use super::parser::Parser;
use crate::common::{CompileError, CompileResult};
use crate::lexer::literal::{parse_char, parse_int, parse_real, parse_string, LiteralError};
use crate::lexer::{Token, TokenKind};
use crate::sema::{can_cast, promote, BaseType, ConstValue, ExprInfo, Extent, SymbolClass, Type};

impl Parser<'_> {
    /// Whether the current token can begin an expression
    pub(super) fn starts_expression(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Identifier(_)
                | TokenKind::IntLiteral(_)
                | TokenKind::RealLiteral(_)
                | TokenKind::CharLiteral(_)
                | TokenKind::StringLiteral(_)
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Bang
        )
    }

    pub(super) fn parse_expression(&mut self) -> CompileResult<ExprInfo> {
        self.parse_assignment()
    }

    /// `exprAssign := exprOr ('=' exprAssign)?`, right associative
    fn parse_assignment(&mut self) -> CompileResult<ExprInfo> {
        let start = self.current();
        let left = self.parse_or()?;
        if !self.check(&TokenKind::Eq) {
            return Ok(left);
        }
        let op = self.advance();
        let right = self.parse_assignment()?;

        if !left.lvalue {
            return Err(self.semantic_error(start, "cannot assign to a non-lvalue"));
        }
        if left.ty.is_array() {
            return Err(self.semantic_error(op, format!(
                "cannot assign to an array of type {}",
                self.type_name(&left.ty)
            )));
        }
        if !can_cast(&left.ty, &right.ty) {
            return Err(self.semantic_error(op, format!(
                "cannot assign {} to {}",
                self.type_name(&right.ty),
                self.type_name(&left.ty)
            )));
        }
        Ok(ExprInfo::rvalue(left.ty))
    }

    // =========================================================================
    // Binary operators
    // =========================================================================

    fn parse_or(&mut self) -> CompileResult<ExprInfo> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::PipePipe) {
            let op = self.advance();
            let right = self.parse_and()?;
            left = self.check_logical(op, &left, &right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> CompileResult<ExprInfo> {
        let mut left = self.parse_equality()?;
        while self.check(&TokenKind::AmpAmp) {
            let op = self.advance();
            let right = self.parse_equality()?;
            left = self.check_logical(op, &left, &right)?;
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> CompileResult<ExprInfo> {
        let mut left = self.parse_relational()?;
        while matches!(self.current().kind, TokenKind::EqEq | TokenKind::NotEq) {
            let op = self.advance();
            let right = self.parse_relational()?;
            left = self.check_comparison(op, &left, &right)?;
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> CompileResult<ExprInfo> {
        let mut left = self.parse_additive()?;
        while matches!(
            self.current().kind,
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq
        ) {
            let op = self.advance();
            let right = self.parse_additive()?;
            left = self.check_comparison(op, &left, &right)?;
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> CompileResult<ExprInfo> {
        let mut left = self.parse_multiplicative()?;
        while matches!(self.current().kind, TokenKind::Plus | TokenKind::Minus) {
            let op = self.advance();
            let right = self.parse_multiplicative()?;
            left = self.check_arithmetic(op, &left, &right)?;
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> CompileResult<ExprInfo> {
        let mut left = self.parse_cast()?;
        while matches!(
            self.current().kind,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent
        ) {
            let op = self.advance();
            let right = self.parse_cast()?;
            left = self.check_arithmetic(op, &left, &right)?;
        }
        Ok(left)
    }

    fn check_logical(&self, op: &Token, left: &ExprInfo, right: &ExprInfo) -> CompileResult<ExprInfo> {
        for side in [left, right] {
            if side.ty.is_struct() || side.ty.is_void() {
                return Err(self.operand_error(op, &side.ty));
            }
        }
        Ok(ExprInfo::rvalue(Type::int()))
    }

    fn check_comparison(&self, op: &Token, left: &ExprInfo, right: &ExprInfo) -> CompileResult<ExprInfo> {
        for side in [left, right] {
            if side.ty.is_struct() || side.ty.is_array() || side.ty.is_void() {
                return Err(self.operand_error(op, &side.ty));
            }
        }
        Ok(ExprInfo::rvalue(Type::int()))
    }

    fn check_arithmetic(&self, op: &Token, left: &ExprInfo, right: &ExprInfo) -> CompileResult<ExprInfo> {
        let Some(ty) = promote(&left.ty, &right.ty) else {
            let bad = if left.ty.is_arithmetic() { &right.ty } else { &left.ty };
            return Err(self.operand_error(op, bad));
        };
        if matches!(op.kind, TokenKind::Percent) && matches!(ty.base, BaseType::Double) {
            return Err(self.semantic_error(op, "operands of '%' must be char or int"));
        }
        Ok(ExprInfo::rvalue(ty))
    }

    fn operand_error(&self, op: &Token, ty: &Type) -> CompileError {
        self.semantic_error(op, format!(
            "invalid operand of type {} for {}",
            self.type_name(ty),
            op.kind
        ))
    }

    // =========================================================================
    // Cast and unary
    // =========================================================================

    /// `exprCast := '(' typeName ')' exprCast | exprUnary`
    fn parse_cast(&mut self) -> CompileResult<ExprInfo> {
        let checkpoint = self.checkpoint();
        if self.match_token(&TokenKind::LParen) {
            if let Some(target) = self.parse_type_name()? {
                self.expect(TokenKind::RParen)?;
                let token = self.current();
                let operand = self.parse_cast()?;
                if !can_cast(&target, &operand.ty) {
                    return Err(self.semantic_error(token, format!(
                        "cannot cast {} to {}",
                        self.type_name(&operand.ty),
                        self.type_name(&target)
                    )));
                }
                return Ok(ExprInfo::rvalue(target));
            }
            // Parenthesized expression: leave it to primary
            self.restore(checkpoint);
        }
        self.parse_unary()
    }

    /// `exprUnary := ('-' | '!') exprUnary | exprPostfix`
    fn parse_unary(&mut self) -> CompileResult<ExprInfo> {
        match self.current().kind {
            TokenKind::Minus => {
                let op = self.advance();
                let operand = self.parse_unary()?;
                if !operand.ty.is_arithmetic() {
                    return Err(self.operand_error(op, &operand.ty));
                }
                let constant = match operand.constant {
                    Some(ConstValue::Int(v)) => v.checked_neg().map(ConstValue::Int),
                    Some(ConstValue::Real(v)) => Some(ConstValue::Real(-v)),
                    _ => None,
                };
                Ok(ExprInfo { ty: operand.ty, lvalue: false, constant })
            }
            TokenKind::Bang => {
                let op = self.advance();
                let operand = self.parse_unary()?;
                if operand.ty.is_struct() || operand.ty.is_void() {
                    return Err(self.operand_error(op, &operand.ty));
                }
                Ok(ExprInfo::rvalue(Type::int()))
            }
            _ => self.parse_postfix(),
        }
    }

    // =========================================================================
    // Postfix and primary
    // =========================================================================

    /// `exprPostfix := exprPrimary ('[' expr ']' | '.' ID)*`
    fn parse_postfix(&mut self) -> CompileResult<ExprInfo> {
        let mut base = self.parse_primary()?;
        loop {
            if self.check(&TokenKind::LBracket) {
                let open = self.advance();
                if !base.ty.is_array() {
                    return Err(self.semantic_error(open, format!(
                        "only an array can be indexed, not {}",
                        self.type_name(&base.ty)
                    )));
                }
                let token = self.current();
                let index = self.parse_expression()?;
                if index.ty != Type::int() {
                    return Err(self.semantic_error(token, format!(
                        "array index must be an int, not {}",
                        self.type_name(&index.ty)
                    )));
                }
                self.expect(TokenKind::RBracket)?;
                base = ExprInfo::lvalue(base.ty.element());
            } else if self.check(&TokenKind::Dot) {
                let dot = self.advance();
                let (token, name) = self.expect_identifier("member name")?;
                let Some(id) = base.ty.struct_id().filter(|_| !base.ty.is_array()) else {
                    return Err(self.semantic_error(dot, format!(
                        "member access on a non-struct value of type {}",
                        self.type_name(&base.ty)
                    )));
                };
                let member = self
                    .symbols
                    .name(name)
                    .and_then(|n| self.symbols.struct_def(id).and_then(|def| def.member(n)));
                let Some(member) = member else {
                    return Err(self.semantic_error(token, format!(
                        "{} has no member {}",
                        self.type_name(&base.ty),
                        name
                    )));
                };
                base = ExprInfo { ty: member.ty, lvalue: base.lvalue, constant: None };
            } else {
                return Ok(base);
            }
        }
    }

    fn parse_primary(&mut self) -> CompileResult<ExprInfo> {
        let token = self.current();
        match &token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                let symbol = self
                    .symbols
                    .find_str(name)
                    .ok_or_else(|| self.semantic_error(token, format!("undefined symbol: {}", name)))?;

                if self.check(&TokenKind::LParen) {
                    if !symbol.is_callable() {
                        return Err(self.semantic_error(token, format!("{} is not a function", name)));
                    }
                    let ret = symbol.ty;
                    let params: Vec<Type> = symbol.args.iter().map(|a| a.ty).collect();
                    self.parse_call_arguments(token, name, &params)?;
                    return Ok(ExprInfo::rvalue(ret));
                }

                match symbol.class {
                    SymbolClass::Variable => Ok(ExprInfo::lvalue(symbol.ty)),
                    SymbolClass::Function | SymbolClass::ExternFunction => {
                        Err(self.semantic_error(token, format!("function {} used without a call", name)))
                    }
                    SymbolClass::Struct => {
                        Err(self.semantic_error(token, format!("struct {} used as a value", name)))
                    }
                }
            }
            TokenKind::IntLiteral(text) => {
                self.advance();
                let value = parse_int(text).map_err(|e| literal_error(token, &e))?;
                Ok(ExprInfo::constant(Type::int(), ConstValue::Int(value)))
            }
            TokenKind::RealLiteral(text) => {
                self.advance();
                let value = parse_real(text).map_err(|e| literal_error(token, &e))?;
                Ok(ExprInfo::constant(Type::double(), ConstValue::Real(value)))
            }
            TokenKind::CharLiteral(text) => {
                self.advance();
                let code = parse_char(text).map_err(|e| literal_error(token, &e))?;
                Ok(ExprInfo::constant(Type::char(), ConstValue::Int(i64::from(code))))
            }
            TokenKind::StringLiteral(text) => {
                self.advance();
                let value = parse_string(text).map_err(|e| literal_error(token, &e))?;
                let extent = match u32::try_from(value.len()) {
                    Ok(0) => Extent::Open,
                    Ok(n) => Extent::Fixed(n),
                    Err(_) => return Err(self.semantic_error(token, "string literal too long")),
                };
                Ok(ExprInfo::constant(Type::char().with_extent(extent), ConstValue::Str(value)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.syntax_error("expression")),
        }
    }

    /// `'(' (expr (',' expr)*)? ')'` checked against the callee's parameters
    fn parse_call_arguments(&mut self, callee: &Token, name: &str, params: &[Type]) -> CompileResult<()> {
        self.expect(TokenKind::LParen)?;
        let mut count = 0;
        if !self.check(&TokenKind::RParen) {
            loop {
                let token = self.current();
                let arg = self.parse_expression()?;
                let Some(param) = params.get(count) else {
                    return Err(self.semantic_error(token, format!(
                        "too many arguments in call to {} (expected {})",
                        name,
                        params.len()
                    )));
                };
                if !can_cast(param, &arg.ty) {
                    return Err(self.semantic_error(token, format!(
                        "argument {} of {}: cannot convert {} to {}",
                        count + 1,
                        name,
                        self.type_name(&arg.ty),
                        self.type_name(param)
                    )));
                }
                count += 1;
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        if count < params.len() {
            return Err(self.semantic_error(callee, format!(
                "too few arguments in call to {} (expected {}, got {})",
                name,
                params.len(),
                count
            )));
        }
        Ok(())
    }
}

fn literal_error(token: &Token, err: &LiteralError) -> CompileError {
    CompileError::lexical(err.to_string(), token.text(), token.span, token.line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DiagnosticKind;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    /// Analyze `body` inside `void f() { ... }` after the given globals
    fn check_body(globals: &str, body: &str) -> CompileResult<()> {
        let source = format!("{}\nvoid f() {{ {} }}", globals, body);
        let tokens = tokenize(&source)?;
        Parser::new(&tokens)?.parse().map(|_| ())
    }

    fn expression_info(globals: &str, expr: &str) -> ExprInfo {
        let source = format!("{}\n{}", globals, expr);
        let tokens = tokenize(&source).unwrap();
        let mut parser = Parser::new(&tokens).unwrap();
        while parser.current().kind.is_type_base() {
            assert!(parser.parse_declaration().unwrap());
        }
        parser.parse_expression().unwrap()
    }

    fn semantic(globals: &str, body: &str) {
        let err = check_body(globals, body).unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Semantic, "{}", err);
    }

    #[test]
    fn test_literal_descriptors() {
        let int = expression_info("", "0x1F");
        assert_eq!(int, ExprInfo::constant(Type::int(), ConstValue::Int(31)));

        let c = expression_info("", "'\\n'");
        assert_eq!(c, ExprInfo::constant(Type::char(), ConstValue::Int(10)));

        let s = expression_info("", "\"abc\"");
        assert_eq!(s.ty, Type::char().with_extent(Extent::Fixed(3)));
        assert!(!s.lvalue);

        let r = expression_info("", "2.5e1");
        assert_eq!(r.constant, Some(ConstValue::Real(25.0)));
    }

    #[test]
    fn test_promotion_in_arithmetic() {
        let info = expression_info("int i; char c; double d;", "c + i * d");
        assert_eq!(info, ExprInfo::rvalue(Type::double()));
        let info = expression_info("char a; char b;", "a - b");
        assert_eq!(info.ty, Type::char());
    }

    #[test]
    fn test_comparison_yields_int() {
        let info = expression_info("double d;", "d < 1.0 && d != 0.0");
        assert_eq!(info, ExprInfo::rvalue(Type::int()));
    }

    #[test]
    fn test_variable_is_lvalue_and_assignment_is_not() {
        let info = expression_info("int x;", "x");
        assert!(info.lvalue);
        let info = expression_info("int x;", "x = 3");
        assert!(!info.lvalue);
    }

    #[test]
    fn test_indexing_and_members() {
        let globals = "struct P { int x; double y[2]; }; struct P ps[4];";
        let info = expression_info(globals, "ps[1].y[0]");
        assert_eq!(info, ExprInfo::lvalue(Type::double()));
        semantic(globals, "ps.x = 1;");
        semantic(globals, "ps[0].z = 1;");
        semantic(globals, "ps[1.5].x = 1;");
        semantic("int v[3]; char c;", "v[c] = 1;");
        assert!(check_body("int v[3]; int i;", "v[i] = 1; v[(int)'a'] = v[2];").is_ok());
        semantic("int n;", "n[0] = 1;");
    }

    #[test]
    fn test_assignment_rules() {
        semantic("int a[3]; int b[3];", "a = b;");
        semantic("", "3 = 4;");
        semantic("struct A { int x; }; struct B { int x; }; struct A a; struct B b;", "a = b;");
        assert!(check_body("int i; double d; char c;", "i = d; d = c; c = i = 2;").is_ok());
    }

    #[test]
    fn test_struct_and_array_operands_rejected() {
        let globals = "struct S { int a; }; struct S s; int v[2];";
        semantic(globals, "s + 1;");
        semantic(globals, "v * 2;");
        semantic(globals, "v == v;");
        semantic(globals, "s || 1;");
        semantic(globals, "-s;");
        semantic(globals, "!s;");
        assert!(check_body(globals, "!v; v[0] || 1;").is_ok());
    }

    #[test]
    fn test_modulo_requires_integers() {
        semantic("double d;", "d % 2;");
        assert!(check_body("char c; int i;", "i = c % 3;").is_ok());
    }

    #[test]
    fn test_casts() {
        let info = expression_info("double d;", "(int)d");
        assert_eq!(info, ExprInfo::rvalue(Type::int()));
        let info = expression_info("int x;", "(x)");
        assert!(info.lvalue);
        semantic("struct S { int a; }; struct S s;", "(int)s;");
        semantic("int v[3];", "(double[])v;");
        assert!(check_body("int v[3];", "(int[])v;").is_ok());
    }

    #[test]
    fn test_calls() {
        let globals = "int add(int a, int b) { return a + b; }";
        assert!(check_body(globals, "add(1, 'c');").is_ok());
        semantic(globals, "add(1);");
        semantic(globals, "add(1, 2, 3);");
        semantic("int x;", "x(1);");
        semantic(globals, "add;");
        semantic("", "put_i(\"text\");");
        assert!(check_body("", "put_s(\"text\"); put_d(get_i());").is_ok());
    }

    #[test]
    fn test_undefined_symbol() {
        semantic("", "y = 1;");
    }

    #[test]
    fn test_missing_operand_is_syntax_error() {
        let err = check_body("int x;", "x = ;").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Syntax);
    }
}
