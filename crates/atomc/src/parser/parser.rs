//! Recursive descent parser for AtomC with inline semantic analysis
//!
//! There is no syntax tree: every production performs its symbol-table
//! and type checks as soon as it matches. The first error aborts the run.
//!
//! The cursor only ever moves backward at three places, each going through
//! [`Parser::checkpoint`] / [`Parser::restore`]:
//! 1. `struct ID` not followed by `{` (a struct-typed variable, not a definition)
//! 2. a type followed by `ID (` (function) versus a variable declaration
//! 3. `( typeName )` as a cast versus a parenthesized expression

use super::const_eval::ConstEvaluator;
use crate::common::{CompileError, CompileResult};
use crate::lexer::{Token, TokenClass, TokenKind};
use crate::sema::{
    can_cast, register_externs, BaseType, ExprInfo, Extent, Redefinition, Storage, StructId,
    Symbol, SymbolClass, SymbolTable, Type,
};

/// Declarative region that receives new variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Context {
    Global,
    /// Members of the struct at this table index
    Struct { index: usize },
    /// Parameters and locals of the function at this table index
    Function { index: usize, depth: u32 },
}

/// Saved cursor position for a backtracking point
#[derive(Debug, Clone, Copy)]
pub(super) struct Checkpoint(usize);

/// Result of a successful analysis
#[derive(Debug)]
pub struct Program {
    /// Externals, globals, structs and functions; locals are gone
    pub symbols: SymbolTable,
    /// Final cursor position, the index of the `Eof` token
    pub cursor: usize,
}

impl Program {
    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.symbols.find_str(name)
    }

    /// Members of the struct called `name`
    pub fn struct_members(&self, name: &str) -> Option<&[Symbol]> {
        self.symbols
            .find_struct_str(name)
            .and_then(|id| self.symbols.struct_def(id))
            .map(|def| def.members.as_slice())
    }
}

/// Recursive descent parser and analyzer over a scanned token sequence
pub struct Parser<'t> {
    pub(super) tokens: &'t [Token],
    pub(super) pos: usize,
    pub(super) symbols: SymbolTable,
    pub(super) context: Context,
    /// Last scope depth handed out to a function
    last_depth: u32,
    /// Enclosing loops of the current statement
    loop_depth: u32,
}

impl<'t> Parser<'t> {
    /// Create a parser over `tokens`, which must end with `Eof`
    pub fn new(tokens: &'t [Token]) -> CompileResult<Self> {
        match tokens.last() {
            Some(last) if matches!(last.kind, TokenKind::Eof) => {}
            Some(last) => {
                return Err(CompileError::syntax("end of input", last.kind.to_string(), last.span, last.line));
            }
            None => {
                return Err(CompileError::syntax("end of input", "an empty token sequence", Default::default(), 1));
            }
        }

        let mut symbols = SymbolTable::new();
        register_externs(&mut symbols).map_err(|e| {
            CompileError::semantic(format!("symbol redefinition: {}", e.name), Default::default(), 1)
        })?;

        Ok(Self {
            tokens,
            pos: 0,
            symbols,
            context: Context::Global,
            last_depth: 0,
            loop_depth: 0,
        })
    }

    /// Analyze the whole unit: `(declStruct | declFunc | declVar)* END`
    pub fn parse(mut self) -> CompileResult<Program> {
        while !self.at_end() {
            if !self.parse_declaration()? {
                return Err(self.syntax_error("declaration"));
            }
        }

        log::debug!("analysis finished at token {} of {}", self.pos, self.tokens.len());
        Ok(Program {
            symbols: self.symbols,
            cursor: self.pos,
        })
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    pub(super) fn current(&self) -> &'t Token {
        // `new` guarantees a trailing Eof and `advance` never steps past it
        &self.tokens[self.pos]
    }

    pub(super) fn at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    pub(super) fn advance(&mut self) -> &'t Token {
        let token = self.current();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    pub(super) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind) -> CompileResult<&'t Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error(kind.to_string()))
        }
    }

    /// Consume an identifier if present, returning its token and text
    pub(super) fn match_identifier(&mut self) -> Option<(&'t Token, &'t str)> {
        let token = self.current();
        match &token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Some((token, name.as_str()))
            }
            _ => None,
        }
    }

    pub(super) fn expect_identifier(&mut self, what: &str) -> CompileResult<(&'t Token, &'t str)> {
        match self.match_identifier() {
            Some(found) => Ok(found),
            None => Err(self.syntax_error(what)),
        }
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub(super) fn restore(&mut self, checkpoint: Checkpoint) {
        log::trace!(
            "backtracking from token {} to token {} (line {})",
            self.pos,
            checkpoint.0,
            self.tokens[checkpoint.0].line
        );
        self.pos = checkpoint.0;
    }

    pub(super) fn syntax_error(&self, expected: impl Into<String>) -> CompileError {
        let token = self.current();
        CompileError::syntax(expected, token.kind.to_string(), token.span, token.line)
    }

    pub(super) fn semantic_error(&self, token: &Token, message: impl Into<String>) -> CompileError {
        CompileError::semantic(message, token.span, token.line)
    }

    fn redefinition_error(&self, token: &Token, err: Redefinition) -> CompileError {
        let message = if err.previous_line > 0 {
            format!("symbol redefinition: {} (previously declared on line {})", err.name, err.previous_line)
        } else {
            format!("symbol redefinition: {}", err.name)
        };
        self.semantic_error(token, message)
    }

    pub(super) fn type_name(&self, ty: &Type) -> String {
        self.symbols.type_name(ty)
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// `typeBase := 'int' | 'double' | 'char' | 'struct' ID`
    pub(super) fn parse_type_base(&mut self) -> CompileResult<Option<Type>> {
        let ty = match self.current().kind {
            TokenKind::Int => Type::int(),
            TokenKind::Double => Type::double(),
            TokenKind::Char => Type::char(),
            TokenKind::Struct => {
                self.advance();
                let (token, name) = self.expect_identifier("struct name")?;
                let id = self
                    .symbols
                    .find_struct_str(name)
                    .ok_or_else(|| self.semantic_error(token, format!("undefined struct: {}", name)))?;
                return Ok(Some(Type::scalar(BaseType::Struct(id))));
            }
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(ty))
    }

    /// `arrayDecl := '[' constIntExpr? ']'`
    pub(super) fn parse_array_decl(&mut self) -> CompileResult<Option<Extent>> {
        if !self.match_token(&TokenKind::LBracket) {
            return Ok(None);
        }
        if self.match_token(&TokenKind::RBracket) {
            return Ok(Some(Extent::Open));
        }

        let start = self.current();
        let (size, consumed) = ConstEvaluator::new(&self.tokens[self.pos..]).evaluate()?;
        self.pos += consumed;

        let next = self.current();
        if !matches!(next.kind, TokenKind::RBracket) {
            return Err(match next.class() {
                TokenClass::Identifier
                | TokenClass::Operator
                | TokenClass::IntLiteral
                | TokenClass::RealLiteral
                | TokenClass::CharLiteral
                | TokenClass::StringLiteral => self.semantic_error(
                    next,
                    "array size must be a constant integer expression",
                ),
                _ => self.syntax_error("']'"),
            });
        }
        if size <= 0 {
            return Err(self.semantic_error(start, format!("array size must be positive, got {}", size)));
        }
        let size = u32::try_from(size)
            .map_err(|_| self.semantic_error(start, format!("array size too large: {}", size)))?;
        self.advance();
        Ok(Some(Extent::Fixed(size)))
    }

    /// `typeName := typeBase arrayDecl?`
    pub(super) fn parse_type_name(&mut self) -> CompileResult<Option<Type>> {
        let Some(base) = self.parse_type_base()? else {
            return Ok(None);
        };
        Ok(Some(match self.parse_array_decl()? {
            Some(extent) => base.with_extent(extent),
            None => base,
        }))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// One top-level declaration, trying struct, then function, then variable
    pub(super) fn parse_declaration(&mut self) -> CompileResult<bool> {
        Ok(self.parse_struct_declaration()?
            || self.parse_function_declaration()?
            || self.parse_var_declaration()?)
    }

    /// `declStruct := 'struct' ID '{' declVar* '}' ';'`
    fn parse_struct_declaration(&mut self) -> CompileResult<bool> {
        let checkpoint = self.checkpoint();
        if !self.match_token(&TokenKind::Struct) {
            return Ok(false);
        }
        let (token, name) = self.expect_identifier("struct name")?;
        if !self.match_token(&TokenKind::LBrace) {
            // `struct ID` used as a type: let declVar/declFunc have it
            self.restore(checkpoint);
            return Ok(false);
        }

        let name_id = self.symbols.intern(name);
        if let Some(prev) = self.symbols.find(name_id) {
            return Err(self.redefinition_error(
                token,
                Redefinition { name: name.to_string(), previous_line: prev.line },
            ));
        }
        let index = self.symbols.len();
        let ty = Type::scalar(BaseType::Struct(StructId(index)));
        self.symbols
            .add(Symbol::new(name_id, SymbolClass::Struct, ty, Storage::Global, 0, token.line))
            .map_err(|e| self.redefinition_error(token, e))?;

        let outer = std::mem::replace(&mut self.context, Context::Struct { index });
        while self.parse_var_declaration()? {}
        self.context = outer;

        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Semi)?;

        let members = self.symbols.get(index).map_or(0, |s| s.members.len());
        log::debug!("declared struct {} with {} members", name, members);
        Ok(true)
    }

    /// `declVar := typeBase varDef (',' varDef)* ';'`
    /// with `varDef := ID arrayDecl? ('=' init)?`
    fn parse_var_declaration(&mut self) -> CompileResult<bool> {
        let Some(base) = self.parse_type_base()? else {
            return Ok(false);
        };

        loop {
            let (token, name) = self.expect_identifier("variable name")?;
            let mut ty = match self.parse_array_decl()? {
                Some(extent) => base.with_extent(extent),
                None => base,
            };
            if self.check(&TokenKind::Eq) {
                let eq = self.advance();
                if matches!(self.context, Context::Struct { .. }) {
                    return Err(self.semantic_error(eq, format!("struct member {} cannot be initialized", name)));
                }
                ty = self.parse_initializer(ty)?;
            }
            self.declare_variable(token, name, ty)?;

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::Semi)?;
        Ok(true)
    }

    /// `init := expr | '{' (expr (',' expr)*)? '}'`
    ///
    /// Returns the variable type, sized from the initializer when it was
    /// declared as an open array.
    fn parse_initializer(&mut self, ty: Type) -> CompileResult<Type> {
        let start = self.current();

        if self.match_token(&TokenKind::LBrace) {
            if !ty.is_array() {
                return Err(self.semantic_error(start, format!(
                    "a brace initializer needs an array, not {}",
                    self.type_name(&ty)
                )));
            }
            let element = ty.element();
            let mut count: u32 = 0;
            if !self.check(&TokenKind::RBrace) {
                loop {
                    let token = self.current();
                    let value = self.parse_expression()?;
                    if !can_cast(&element, &value.ty) {
                        return Err(self.semantic_error(token, format!(
                            "cannot initialize an element of type {} with {}",
                            self.type_name(&element),
                            self.type_name(&value.ty)
                        )));
                    }
                    count += 1;
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RBrace)?;
            return self.fit_initializer(start, ty, count);
        }

        let value = self.parse_expression()?;
        if !can_cast(&ty, &value.ty) {
            return Err(self.semantic_error(start, format!(
                "cannot initialize {} with {}",
                self.type_name(&ty),
                self.type_name(&value.ty)
            )));
        }
        match value.ty.extent {
            Extent::Fixed(n) if ty.is_array() => self.fit_initializer(start, ty, n),
            _ => Ok(ty),
        }
    }

    fn fit_initializer(&self, token: &Token, ty: Type, count: u32) -> CompileResult<Type> {
        match ty.extent {
            Extent::Fixed(size) if count > size => Err(self.semantic_error(token, format!(
                "too many initializers: {} for an array of {}",
                count, size
            ))),
            Extent::Open if count > 0 => Ok(ty.with_extent(Extent::Fixed(count))),
            _ => Ok(ty),
        }
    }

    /// Register a variable in whichever context is open
    fn declare_variable(&mut self, token: &Token, name: &str, ty: Type) -> CompileResult<()> {
        let name_id = self.symbols.intern(name);
        match self.context {
            Context::Struct { index } => {
                if ty.struct_id() == Some(StructId(index)) {
                    return Err(self.semantic_error(token, format!(
                        "struct {} cannot contain a member of its own type",
                        self.symbols.get(index).map_or("", |s| self.symbols.name_of(s))
                    )));
                }
                let member = Symbol::new(name_id, SymbolClass::Variable, ty, Storage::Local, 0, token.line);
                let def = self
                    .symbols
                    .get_mut(index)
                    .ok_or_else(|| CompileError::semantic("struct declaration vanished", token.span, token.line))?;
                if let Some(previous_line) = def.member(name_id).map(|m| m.line) {
                    let err = Redefinition { name: name.to_string(), previous_line };
                    return Err(self.redefinition_error(token, err));
                }
                def.members.push(member);
            }
            Context::Function { depth, .. } => {
                let local = Symbol::new(name_id, SymbolClass::Variable, ty, Storage::Local, depth, token.line);
                self.symbols.add(local).map_err(|e| self.redefinition_error(token, e))?;
            }
            Context::Global => {
                let global = Symbol::new(name_id, SymbolClass::Variable, ty, Storage::Global, 0, token.line);
                self.symbols.add(global).map_err(|e| self.redefinition_error(token, e))?;
            }
        }
        Ok(())
    }

    /// `declFunc := ('void' | typeBase '*'?) ID '(' (funcArg (',' funcArg)*)? ')' stmCompound`
    fn parse_function_declaration(&mut self) -> CompileResult<bool> {
        let checkpoint = self.checkpoint();

        let ret = if self.match_token(&TokenKind::Void) {
            Type::void()
        } else if let Some(base) = self.parse_type_base()? {
            if self.match_token(&TokenKind::Star) {
                base.with_extent(Extent::Open)
            } else {
                base
            }
        } else {
            return Ok(false);
        };

        let Some((token, name)) = self.match_identifier() else {
            self.restore(checkpoint);
            return Ok(false);
        };
        if !self.match_token(&TokenKind::LParen) {
            self.restore(checkpoint);
            return Ok(false);
        }

        // Committed: the function is visible to its own body (recursion)
        let mark = self.symbols.len();
        let name_id = self.symbols.intern(name);
        let func = Symbol::new(name_id, SymbolClass::Function, ret, Storage::Global, 0, token.line);
        let index = self.symbols.add(func).map_err(|e| self.redefinition_error(token, e))?;
        self.last_depth += 1;
        let depth = self.last_depth;
        let outer = std::mem::replace(&mut self.context, Context::Function { index, depth });

        if !self.check(&TokenKind::RParen) {
            loop {
                self.parse_function_arg(index, depth)?;
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        if !self.parse_compound_statement()? {
            return Err(self.syntax_error("'{'"));
        }

        self.context = outer;
        let dropped = self.symbols.len() - (mark + 1);
        self.symbols.truncate(mark + 1);
        log::debug!(
            "declared function {} at depth {} ({} parameters and locals released)",
            name,
            depth,
            dropped
        );
        Ok(true)
    }

    /// `funcArg := typeBase ID arrayDecl?`
    fn parse_function_arg(&mut self, func_index: usize, depth: u32) -> CompileResult<()> {
        let Some(base) = self.parse_type_base()? else {
            return Err(self.syntax_error("parameter type"));
        };
        let (token, name) = self.expect_identifier("parameter name")?;
        // Any array parameter accepts an array of any size
        let ty = match self.parse_array_decl()? {
            Some(_) => base.with_extent(Extent::Open),
            None => base,
        };

        let name_id = self.symbols.intern(name);
        let arg = Symbol::new(name_id, SymbolClass::Variable, ty, Storage::Argument, depth, token.line);
        self.symbols.add(arg.clone()).map_err(|e| self.redefinition_error(token, e))?;
        if let Some(func) = self.symbols.get_mut(func_index) {
            func.args.push(arg);
        }
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// `stmCompound := '{' (declVar | stm)* '}'`
    ///
    /// A nested block does not open a new depth: it shares the namespace of
    /// the enclosing function.
    fn parse_compound_statement(&mut self) -> CompileResult<bool> {
        if !self.match_token(&TokenKind::LBrace) {
            return Ok(false);
        }
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.syntax_error("'}'"));
            }
            if self.parse_var_declaration()? {
                continue;
            }
            self.parse_statement()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(true)
    }

    fn parse_statement(&mut self) -> CompileResult<()> {
        match self.current().kind {
            TokenKind::LBrace => {
                self.parse_compound_statement()?;
            }
            TokenKind::If => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                self.parse_condition()?;
                self.expect(TokenKind::RParen)?;
                self.parse_statement()?;
                if self.match_token(&TokenKind::Else) {
                    self.parse_statement()?;
                }
            }
            TokenKind::While => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                self.parse_condition()?;
                self.expect(TokenKind::RParen)?;
                self.parse_loop_body()?;
            }
            TokenKind::For => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                if !self.check(&TokenKind::Semi) {
                    self.parse_expression()?;
                }
                self.expect(TokenKind::Semi)?;
                if !self.check(&TokenKind::Semi) {
                    self.parse_condition()?;
                }
                self.expect(TokenKind::Semi)?;
                if !self.check(&TokenKind::RParen) {
                    self.parse_expression()?;
                }
                self.expect(TokenKind::RParen)?;
                self.parse_loop_body()?;
            }
            TokenKind::Break => {
                let token = self.advance();
                if self.loop_depth == 0 {
                    return Err(self.semantic_error(token, "break outside of a loop"));
                }
                self.expect(TokenKind::Semi)?;
            }
            TokenKind::Return => {
                let token = self.advance();
                let value = if self.check(&TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.check_return(token, value.as_ref())?;
                self.expect(TokenKind::Semi)?;
            }
            TokenKind::Semi => {
                self.advance();
            }
            _ => {
                if !self.starts_expression() {
                    return Err(self.syntax_error("statement"));
                }
                self.parse_expression()?;
                self.expect(TokenKind::Semi)?;
            }
        }
        Ok(())
    }

    fn parse_loop_body(&mut self) -> CompileResult<()> {
        self.loop_depth += 1;
        let result = self.parse_statement();
        self.loop_depth -= 1;
        result
    }

    /// Condition of `if`, `while` or `for`: any value but a struct
    fn parse_condition(&mut self) -> CompileResult<ExprInfo> {
        let token = self.current();
        let cond = self.parse_expression()?;
        if cond.ty.is_struct() {
            return Err(self.semantic_error(token, "a struct cannot be logically tested"));
        }
        if cond.ty.is_void() {
            return Err(self.semantic_error(token, "a void value cannot be logically tested"));
        }
        Ok(cond)
    }

    fn check_return(&self, token: &Token, value: Option<&ExprInfo>) -> CompileResult<()> {
        let Context::Function { index, .. } = self.context else {
            return Err(self.semantic_error(token, "return outside of a function"));
        };
        let Some(func) = self.symbols.get(index) else {
            return Err(self.semantic_error(token, "return outside of a function"));
        };
        let ret = func.ty;
        let name = self.symbols.name_of(func);

        match value {
            Some(_) if ret.is_void() => Err(self.semantic_error(
                token,
                format!("void function {} cannot return a value", name),
            )),
            None if !ret.is_void() => Err(self.semantic_error(
                token,
                format!("function {} must return a value of type {}", name, self.type_name(&ret)),
            )),
            Some(value) if !can_cast(&ret, &value.ty) => Err(self.semantic_error(
                token,
                format!(
                    "cannot return {} from function {} returning {}",
                    self.type_name(&value.ty),
                    name,
                    self.type_name(&ret)
                ),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DiagnosticKind;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn analyze_source(source: &str) -> CompileResult<Program> {
        let tokens = tokenize(source)?;
        Parser::new(&tokens)?.parse()
    }

    fn error_kind(source: &str) -> DiagnosticKind {
        analyze_source(source).unwrap_err().kind()
    }

    #[test]
    fn test_parse_simple_function() {
        let source = "int main() { return 0; }";
        let tokens = tokenize(source).unwrap();
        let program = Parser::new(&tokens).unwrap().parse().unwrap();

        assert_eq!(program.cursor, tokens.len() - 1);
        let main = program.find("main").unwrap();
        assert_eq!(main.class, SymbolClass::Function);
        assert_eq!(main.ty, Type::int());
        assert!(main.args.is_empty());
    }

    #[test]
    fn test_locals_released_after_function() {
        let program = analyze_source("int f(int a) { int b; b = a; return b; }").unwrap();
        assert!(program.find("a").is_none());
        assert!(program.find("b").is_none());
        let f = program.find("f").unwrap();
        assert_eq!(f.args.len(), 1);
        assert_eq!(f.args[0].storage, Storage::Argument);
    }

    #[test]
    fn test_function_depths_increase() {
        let source = "void f(int a) { int x; } void g(int a) { int x; }";
        let tokens = tokenize(source).unwrap();
        let mut parser = Parser::new(&tokens).unwrap();
        assert!(parser.parse_function_declaration().unwrap());
        assert_eq!(parser.last_depth, 1);
        assert!(parser.parse_function_declaration().unwrap());
        assert_eq!(parser.last_depth, 2);
        assert_eq!(parser.context, Context::Global);
    }

    #[test]
    fn test_struct_keyword_backtracks_to_variable() {
        let _ = env_logger::builder().is_test(true).try_init();
        let source = "struct P { int x; }; struct P p;";
        let program = analyze_source(source).unwrap();
        let p = program.find("p").unwrap();
        assert_eq!(p.class, SymbolClass::Variable);
        assert!(p.ty.is_struct());
    }

    #[test]
    fn test_function_backtracks_to_variable() {
        let program = analyze_source("double d[3]; char c;").unwrap();
        assert_eq!(program.find("d").unwrap().ty, Type::double().with_extent(Extent::Fixed(3)));
        assert_eq!(program.find("c").unwrap().ty, Type::char());
    }

    #[test]
    fn test_pointer_return_is_open_array() {
        let program = analyze_source("int *f(int v[]) { return v; }").unwrap();
        assert_eq!(program.find("f").unwrap().ty, Type::int().with_extent(Extent::Open));
    }

    #[test]
    fn test_missing_semicolon_is_syntax_error() {
        let err = analyze_source("int a\nint b;").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Syntax);
        assert_eq!(err.line(), 2);
        assert!(matches!(err, CompileError::Syntax { ref expected, .. } if expected == "';'"));
    }

    #[test]
    fn test_committed_if_reports_syntax() {
        assert_eq!(error_kind("void f() { if 1) ; }"), DiagnosticKind::Syntax);
        assert_eq!(error_kind("void f() { while (1 ; }"), DiagnosticKind::Syntax);
    }

    #[test]
    fn test_if_else() {
        assert!(analyze_source("void f(int c) { int x; if (c) x = 1; else x = 2; }").is_ok());
        assert_eq!(error_kind("void f() { if (1) ; else ; else ; }"), DiagnosticKind::Syntax);
        assert!(analyze_source("void f() { while (1) if (0) ; else break; }").is_ok());
    }

    #[test]
    fn test_dangling_else_binds_to_inner_if() {
        let source = "if (a) if (b) x = 1; else x = 2; x = 3;";
        let tokens = tokenize(source).unwrap();
        let mut parser = Parser::new(&tokens).unwrap();
        for name in ["a", "b", "x"] {
            let name = parser.symbols.intern(name);
            let var = Symbol::new(name, SymbolClass::Variable, Type::int(), Storage::Global, 0, 1);
            parser.symbols.add(var).unwrap();
        }

        parser.parse_statement().unwrap();
        // The whole nested if, else included, is a single statement
        assert_eq!(tokens[parser.pos].kind, TokenKind::Identifier("x".to_string()));
        assert_eq!(tokens[parser.pos + 1].kind, TokenKind::Eq);
        assert!(matches!(tokens[parser.pos + 2].kind, TokenKind::IntLiteral(ref v) if v == "3"));

        let source = "int a; int b; void f() { if (a) if (b) ; else ; else ; }";
        assert!(analyze_source(source).is_ok());
    }

    #[test]
    fn test_else_branch_is_checked() {
        let err = analyze_source("void f() {\n  if (1) ;\n  else y = 1;\n}").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Semantic);
        assert_eq!(err.line(), 3);
        let source = "struct S { int a; }; struct S s; void f() { if (1) ; else if (s) ; }";
        assert_eq!(error_kind(source), DiagnosticKind::Semantic);
    }

    #[test]
    fn test_struct_cannot_contain_itself() {
        assert_eq!(error_kind("struct S { int a; struct S s; };"), DiagnosticKind::Semantic);
        assert_eq!(error_kind("struct S { struct S v[2]; };"), DiagnosticKind::Semantic);
        assert!(analyze_source("struct A { int a; }; struct B { struct A inner[2]; };").is_ok());
    }

    #[test]
    fn test_break_outside_loop() {
        assert_eq!(error_kind("void f() { break; }"), DiagnosticKind::Semantic);
        assert!(analyze_source("void f() { while (1) { if (1) break; } }").is_ok());
    }

    #[test]
    fn test_return_checks() {
        assert_eq!(error_kind("void f() { return 1; }"), DiagnosticKind::Semantic);
        assert_eq!(error_kind("int f() { return; }"), DiagnosticKind::Semantic);
        assert!(analyze_source("double f() { return 'a'; }").is_ok());
        assert!(analyze_source("void f() { return; }").is_ok());
    }

    #[test]
    fn test_struct_condition_rejected() {
        let source = "struct S { int a; }; struct S s; void f() { if (s) ; }";
        assert_eq!(error_kind(source), DiagnosticKind::Semantic);
    }

    #[test]
    fn test_tokens_without_eof_rejected() {
        let mut tokens = tokenize("int a;").unwrap();
        tokens.pop();
        assert!(Parser::new(&tokens).is_err());
        assert!(Parser::new(&[]).is_err());
    }
}
