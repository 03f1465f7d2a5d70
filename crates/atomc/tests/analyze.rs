//! End-to-end checks of `tokenize` followed by `analyze`

use atomc::sema::{BaseType, Extent, Storage, SymbolClass, Type};
use atomc::{analyze, tokenize, CompileError, CompileResult, DiagnosticKind, Program, TokenKind};
use pretty_assertions::assert_eq;

fn run(source: &str) -> CompileResult<Program> {
    let tokens = tokenize(source)?;
    analyze(&tokens)
}

fn error(source: &str) -> CompileError {
    match run(source) {
        Ok(_) => panic!("expected a diagnostic for {:?}", source),
        Err(e) => e,
    }
}

#[test]
fn struct_with_two_members() {
    let program = run("struct Point { int x; int y; };").unwrap();
    let point = program.find("Point").unwrap();
    assert_eq!(point.class, SymbolClass::Struct);

    let members = program.struct_members("Point").unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m.ty == Type::int()));
    // Members live in their own namespace
    assert!(program.find("x").is_none());
}

#[test]
fn global_list_with_initializer() {
    let program = run("int a, b = 5;").unwrap();
    for name in ["a", "b"] {
        let symbol = program.find(name).unwrap();
        assert_eq!(symbol.class, SymbolClass::Variable);
        assert_eq!(symbol.storage, Storage::Global);
        assert_eq!(symbol.depth, 0);
        assert_eq!(symbol.ty, Type::int());
    }
}

#[test]
fn fixed_array_size() {
    let program = run("int x[5];").unwrap();
    assert_eq!(program.find("x").unwrap().ty, Type::new(BaseType::Int, Extent::Fixed(5)));

    let program = run("char buf[2 * (3 + 1) % 5];").unwrap();
    assert_eq!(program.find("buf").unwrap().ty.extent, Extent::Fixed(3));
}

#[test]
fn non_positive_array_sizes() {
    for source in ["int y[-1];", "int z[0];", "int w[3 - 3];"] {
        let err = error(source);
        assert_eq!(err.kind(), DiagnosticKind::Semantic, "{}", source);
        assert_eq!(err.line(), 1);
    }
}

#[test]
fn non_constant_array_size() {
    let err = error("int n;\nint v[n];");
    assert_eq!(err.kind(), DiagnosticKind::Semantic);
    assert_eq!(err.line(), 2);
    assert_eq!(error("int v[2.0];").kind(), DiagnosticKind::Semantic);
}

#[test]
fn global_redefinition() {
    let err = error("int a;\nint a;");
    assert_eq!(err.kind(), DiagnosticKind::Semantic);
    assert_eq!(err.line(), 2);
    assert!(err.message().contains("redefinition"), "{}", err.message());
}

#[test]
fn struct_name_collides_with_any_symbol() {
    assert_eq!(error("int S; struct S { int a; };").kind(), DiagnosticKind::Semantic);
    assert_eq!(error("struct put_i { int a; };").kind(), DiagnosticKind::Semantic);
}

#[test]
fn call_arity_mismatch() {
    let source = "void f(int a, int b) { }\nvoid g() { f(1); }";
    let err = error(source);
    assert_eq!(err.kind(), DiagnosticKind::Semantic);
    assert_eq!(err.line(), 2);
}

#[test]
fn main_consumes_every_token() {
    let source = "int main(){ return 0; }";
    let tokens = tokenize(source).unwrap();
    let program = analyze(&tokens).unwrap();
    assert_eq!(program.cursor, tokens.len() - 1);
    assert!(matches!(tokens[program.cursor].kind, TokenKind::Eof));
}

#[test]
fn empty_unit_is_valid() {
    let tokens = tokenize("  // nothing\n").unwrap();
    let program = analyze(&tokens).unwrap();
    assert_eq!(program.cursor, 0);
    assert!(program.find("put_s").is_some());
}

#[test]
fn sibling_blocks_share_a_namespace() {
    let source = "void f() { { int t; } { int t; } }";
    assert_eq!(error(source).kind(), DiagnosticKind::Semantic);
}

#[test]
fn locals_shadow_globals() {
    let source = "double x;\nint f(int x) { return x; }\nvoid g() { x = 1.5; }";
    let program = run(source).unwrap();
    assert_eq!(program.find("x").unwrap().ty, Type::double());
}

#[test]
fn parameter_and_local_collide() {
    assert_eq!(error("void f(int a) { int a; }").kind(), DiagnosticKind::Semantic);
}

#[test]
fn recursion_sees_the_function() {
    let source = "int fact(int n) { if (n < 2) return 1; return n * fact(n - 1); }";
    assert!(run(source).is_ok());
}

#[test]
fn undefined_struct_type() {
    let err = error("struct Missing m;");
    assert_eq!(err.kind(), DiagnosticKind::Semantic);
    assert!(err.message().contains("Missing"));
}

#[test]
fn struct_values_are_nominal() {
    let source = "struct A { int v; }; struct B { int v; };\n\
                  struct A a; struct B b;\n\
                  void f(struct A p) { }\n\
                  void g() { f(a); a.v = b.v; }";
    assert!(run(source).is_ok());

    let source = "struct A { int v; }; struct B { int v; }; struct B b;\n\
                  void f(struct A p) { }\n\
                  void g() { f(b); }";
    assert_eq!(error(source).kind(), DiagnosticKind::Semantic);
}

#[test]
fn array_initializers() {
    let program = run("int v[] = {1, 2, 3}; char s[] = \"hey\"; double d[4] = {1, 'a'};").unwrap();
    assert_eq!(program.find("v").unwrap().ty.extent, Extent::Fixed(3));
    assert_eq!(program.find("s").unwrap().ty.extent, Extent::Fixed(3));
    assert_eq!(program.find("d").unwrap().ty.extent, Extent::Fixed(4));

    assert_eq!(error("int v[2] = {1, 2, 3};").kind(), DiagnosticKind::Semantic);
    assert_eq!(error("int i = {1};").kind(), DiagnosticKind::Semantic);
    assert_eq!(error("struct S { int a = 1; };").kind(), DiagnosticKind::Semantic);
}

#[test]
fn unclosed_block_is_syntax_error() {
    let err = error("void f() {\n  int a;\n");
    assert_eq!(err.kind(), DiagnosticKind::Syntax);
    assert_eq!(err.line(), 3);
}

#[test]
fn lexical_error_surfaces_first() {
    let err = error("int a;\nint b @ c;");
    assert_eq!(err.kind(), DiagnosticKind::Lexical);
    assert_eq!(err.line(), 2);
}

#[test]
fn complete_program() {
    let source = r#"
        struct Pt { int x; double y; };
        struct Pt pts[10];
        int count;

        double sum(struct Pt v[], int n) {
            int i;
            double total;
            total = 0;
            for (i = 0; i < n; i = i + 1) {
                total = total + v[i].x + v[i].y;
            }
            return total;
        }

        void main() {
            char name[16];
            get_s(name);
            put_s(name);
            count = get_i();
            while (count > 0 && !(count % 2 == 0)) {
                if (count > 10) break;
                count = count - 1;
            }
            put_d(sum(pts, (int)count) / seconds());
            put_c('\n');
        }
    "#;
    let tokens = tokenize(source).unwrap();
    let program = analyze(&tokens).unwrap();
    assert_eq!(program.cursor, tokens.len() - 1);

    let sum = program.find("sum").unwrap();
    assert_eq!(sum.class, SymbolClass::Function);
    assert_eq!(sum.args.len(), 2);
    assert!(sum.args[0].ty.is_struct() && sum.args[0].ty.extent == Extent::Open);
    assert!(program.find("total").is_none());
}
