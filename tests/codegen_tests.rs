use oberon2c::compiler::{compile_module, CompileError, CompilerOptions};
use oberon2c::codegen::ModuleOutput;
use oberon2c::parser::ParserError;
use oberon2c::symbol::SymbolError;
use oberon2c::types::{TypeError, TypeId};

/// Compile a module named `M` that is expected to succeed
fn compile(source: &str) -> ModuleOutput {
    compile_module("M.Mod", source, "M.h", &CompilerOptions::default())
        .unwrap_or_else(|e| panic!("compilation failed: {e}"))
}

/// Compile a module named `M` that is expected to fail
fn compile_err(source: &str) -> CompileError {
    match compile_module("M.Mod", source, "M.h", &CompilerOptions::default()) {
        Ok(output) => panic!("expected an error, got:\n{}", output.implementation),
        Err(e) => e,
    }
}

fn assert_contains(haystack: &str, needle: &str) {
    assert!(haystack.contains(needle), "expected to find {needle:?} in:\n{haystack}");
}

#[test]
fn test_simple_assignment_module() {
    let output = compile("MODULE M; VAR x: INTEGER; BEGIN x := 1 + 2 END M.");
    assert_eq!(
        output.implementation,
        "#include \"M.h\"\n\
         \n\
         static int M_x;\n\
         \n\
         static bool is_M_init = false;\n\
         void mod_M_init() {\n\
         if (is_M_init) {\n\
         return;\n\
         }\n\
         is_M_init = true;\n\
         M_x = ((1) + (2));\n\
         }\n"
    );
    assert_eq!(
        output.interface,
        "#ifndef M_H\n\
         #define M_H\n\
         \n\
         #include <stdint.h>\n\
         #include <stdbool.h>\n\
         #include <stdlib.h>\n\
         #include <string.h>\n\
         #include <math.h>\n\
         #define M_ASH(x, n) ((n) >= 0 ? ((x) << (n)) : ((x) >> -(n)))\n\
         \n\
         \n\
         extern void mod_M_init();\n\
         \n\
         #endif\n"
    );
}

#[test]
fn test_exported_variable_scenario() {
    let output = compile("MODULE M; VAR x*: INTEGER; BEGIN x := 1 + 2 END M.");
    assert_contains(&output.implementation, "\nint M_x;\n");
    assert_contains(&output.interface, "extern int M_x;\n");
    assert_eq!(output.interface.matches("extern int M_x;").count(), 1);
    assert_contains(&output.implementation, "is_M_init = true;\nM_x = ((1) + (2));\n}\n");
    assert_eq!(output.implementation.matches("#include \"M.h\"").count(), 1);
}

#[test]
fn test_exports() {
    let output = compile("MODULE M; CONST N* = 10; K = -5; VAR a*: INTEGER; b: CHAR; END M.");
    assert_contains(&output.interface, "#define\tM_N\t10\n");
    assert_contains(&output.implementation, "#define\tM_K\t(-5)\n");
    assert!(!output.interface.contains("M_K"));
    assert_contains(&output.implementation, "int M_a;\n");
    assert!(!output.implementation.contains("static int M_a"));
    assert_contains(&output.interface, "extern int M_a;\n");
    assert_contains(&output.implementation, "static char M_b;\n");
    assert!(!output.interface.contains("M_b"));
}

#[test]
fn test_procedures() {
    let source = "MODULE P;\n\
                  PROCEDURE Add*(a, b: INTEGER): INTEGER;\n\
                  BEGIN RETURN a + b END Add;\n\
                  PROCEDURE Q;\n\
                  BEGIN RETURN END Q;\n\
                  END P.";
    let output = compile_module("P.Mod", source, "P.h", &CompilerOptions::default()).unwrap();
    assert_contains(
        &output.implementation,
        "\nint P_Add(int P_a, int P_b) {\nreturn ((P_a) + (P_b));\n}\n",
    );
    assert_contains(&output.interface, "extern int P_Add(int P_a, int P_b);\n");
    assert_contains(&output.implementation, "\nstatic void P_Q(void) {\nreturn;\n}\n");
    assert!(!output.interface.contains("P_Q"));
}

#[test]
fn test_locals_shadow_and_release() {
    let source = "MODULE S; VAR x: INTEGER;\n\
                  PROCEDURE P; VAR x: CHAR; BEGIN x := 'a' END P;\n\
                  BEGIN x := 1 END S.";
    let output = compile_module("S.Mod", source, "S.h", &CompilerOptions::default()).unwrap();
    assert_contains(&output.implementation, "static int S_x;\n");
    assert_contains(&output.implementation, "char S_x;\nS_x = (('a'));\n}\n");
    assert_contains(&output.implementation, "S_x = ((1));\n");
}

#[test]
fn test_parameters_go_out_of_scope() {
    let error = compile_err("MODULE M; PROCEDURE P(a: INTEGER); END P; BEGIN a := 1 END M.");
    assert_eq!(error.error, ParserError::UndeclaredIdentifier("a".to_string()));
}

#[test]
fn test_duplicates() {
    let error = compile_err("MODULE M; VAR x: INTEGER; x: CHAR; END M.");
    assert_eq!(error.error, ParserError::DuplicateIdentifier("x".to_string()));

    let error = compile_err("MODULE M; VAR M: INTEGER; END M.");
    assert_eq!(error.error, ParserError::DuplicateIdentifier("M".to_string()));

    let error = compile_err("MODULE M; PROCEDURE P(a: INTEGER); VAR a: CHAR; END P; END M.");
    assert_eq!(error.error, ParserError::DuplicateIdentifier("a".to_string()));
}

#[test]
fn test_strings_and_arrays() {
    let output = compile("MODULE M; VAR s: ARRAY 3 OF CHAR; x: INTEGER; BEGIN s := \"hi\"; s[0] := 'a'; s[ABS(x)] := 'b' END M.");
    assert_contains(&output.implementation, "static char M_s[3];\n");
    assert_contains(&output.implementation, "strcpy(M_s, \"hi\");\n");
    assert_contains(&output.implementation, "M_s[((0))] = (('a'));\n");
    assert_contains(&output.implementation, "M_s[((abs(((M_x)))))] = (('b'));\n");
}

#[test]
fn test_array_sized_by_constant() {
    let output = compile("MODULE M; CONST N = 4; VAR a: ARRAY N OF REAL; END M.");
    assert_contains(&output.implementation, "static float M_a[M_N];\n");
}

#[test]
fn test_string_into_scalar() {
    let error = compile_err("MODULE M; VAR x: INTEGER; BEGIN x := \"no\" END M.");
    assert_eq!(error.error, ParserError::Type(TypeError::Mismatch(TypeId::INTEGER, TypeId::STRING)));
}

#[test]
fn test_index_checks() {
    let error = compile_err("MODULE M; VAR x: INTEGER; BEGIN x[0] := 1 END M.");
    assert_eq!(error.error, ParserError::Type(TypeError::ArrayExpected));

    let error = compile_err("MODULE M; VAR s: ARRAY 3 OF CHAR; BEGIN s['a'] := 'b' END M.");
    assert_eq!(error.error, ParserError::Type(TypeError::Mismatch(TypeId::CHAR, TypeId::INTEGER)));
}

#[test]
fn test_imports_and_aliases() {
    let output = compile("MODULE M; IMPORT Out, F := Format; VAR x: INTEGER; BEGIN Out.Int(x); F.Ln END M.");
    assert!(
        output
            .implementation
            .starts_with("#include \"Out.h\"\n#include \"Format.h\"\n#include \"M.h\"\n\n"),
        "unexpected includes:\n{}",
        output.implementation
    );
    assert_contains(&output.implementation, "Out_Int(((M_x)));\n");
    assert_contains(&output.implementation, "Format_Ln();\n");
}

#[test]
fn test_imported_members_are_unchecked() {
    let output = compile("MODULE M; IMPORT Lib; BEGIN Lib.buf[1] := 'a'; Lib.count := Lib.Get(2) END M.");
    assert_contains(&output.implementation, "Lib_buf[((1))] = (('a'));\n");
    assert_contains(&output.implementation, "Lib_count = ((Lib_Get(((2)))));\n");
}

#[test]
fn test_qualified_own_module() {
    let output = compile("MODULE M; VAR x: INTEGER; BEGIN M.x := 1 END M.");
    assert_contains(&output.implementation, "M_x = ((1));\n");
}

#[test]
fn test_argument_checks() {
    let declare = "MODULE M; PROCEDURE Q(a: INTEGER); END Q; BEGIN ";

    let error = compile_err(&format!("{declare}Q(1, 2) END M."));
    assert_eq!(
        error.error,
        ParserError::ArgumentCount {
            name: "Q".to_string(),
            expected: 1,
            found: 2
        }
    );

    let error = compile_err(&format!("{declare}Q END M."));
    assert!(matches!(error.error, ParserError::ArgumentCount { found: 0, .. }));

    let error = compile_err(&format!("{declare}Q('a') END M."));
    assert_eq!(error.error, ParserError::Type(TypeError::Mismatch(TypeId::INTEGER, TypeId::CHAR)));

    let output = compile(&format!("{declare}Q(7) END M."));
    assert_contains(&output.implementation, "M_Q(((7)));\n");
}

#[test]
fn test_return_type_checked() {
    let error = compile_err("MODULE M; PROCEDURE F(): INTEGER; BEGIN RETURN 'c' END F; END M.");
    assert_eq!(error.error, ParserError::Type(TypeError::Mismatch(TypeId::INTEGER, TypeId::CHAR)));
}

#[test]
fn test_control_flow() {
    let output = compile(
        "MODULE M; VAR x: INTEGER; b: BOOLEAN;\n\
         BEGIN\n\
           IF x > 0 THEN x := 0 ELSIF x = 0 THEN x := 1 ELSE x := 2 END;\n\
           WHILE b DO b := FALSE END;\n\
           REPEAT INC(x) UNTIL x > 10;\n\
           ASSERT(x # 3);\n\
           DEC(x, 2)\n\
         END M.",
    );
    let code = &output.implementation;
    assert_contains(
        code,
        "if (((M_x)) > ((0))) {\nM_x = ((0));\n} else if (((M_x)) == ((0))) {\nM_x = ((1));\n} else {\nM_x = ((2));\n}\n",
    );
    assert_contains(code, "while (((M_b))) {\nM_b = ((false));\n}\n");
    assert_contains(code, "do {\nM_x++;\n} while (!(((M_x)) > ((10))));\n");
    assert_contains(code, "if (!(((M_x)) != ((3)))) abort();\n");
    assert_contains(code, "M_x -= ((2));\n");
}

#[test]
fn test_condition_must_be_boolean() {
    let error = compile_err("MODULE M; VAR x: INTEGER; BEGIN WHILE x DO END END M.");
    assert_eq!(error.error, ParserError::Type(TypeError::Mismatch(TypeId::INTEGER, TypeId::BOOLEAN)));
}

#[test]
fn test_builtin_functions() {
    let output = compile(
        "MODULE M; VAR x: INTEGER; r: REAL; c: CHAR; b: BOOLEAN; l: LONGINT;\n\
         BEGIN x := ABS(x); r := ABS(r); b := ODD(x); x := ORD(c); c := CHR(x);\n\
         l := FLOOR(r); x := ASH(x, 2); b := ~b END M.",
    );
    let code = &output.implementation;
    assert_contains(code, "M_x = ((abs(((M_x)))));\n");
    assert_contains(code, "M_r = ((fabs(((M_r)))));\n");
    assert_contains(code, "((((M_x))) & 1)");
    assert_contains(code, "((int)(((M_c))))");
    assert_contains(code, "((char)(((M_x))))");
    assert_contains(code, "((long)floor(((M_r))))");
    assert_contains(code, "M_ASH(((M_x)), ((2)))");
    assert_contains(code, "M_b = ((!M_b));\n");
}

#[test]
fn test_pointer_and_procedure_types() {
    let output = compile("MODULE M; VAR p: POINTER TO INTEGER; q: POINTER; f: PROCEDURE; BEGIN p := NIL END M.");
    assert_contains(&output.implementation, "static int * M_p;\n");
    assert_contains(&output.implementation, "static void * M_q;\n");
    assert_contains(&output.implementation, "static void (* M_f)();\n");
    assert_contains(&output.implementation, "M_p = ((NULL));\n");

    let error = compile_err("MODULE M; VAR x: INTEGER; BEGIN x := NIL END M.");
    assert_eq!(error.error, ParserError::Type(TypeError::Mismatch(TypeId::INTEGER, TypeId::NIL)));
}

#[test]
fn test_type_names() {
    let output = compile("MODULE M; IMPORT Lib; VAR t: Lib.T; u: Foo; END M.");
    assert_contains(&output.implementation, "static Lib_T M_t;\n");
    assert_contains(&output.implementation, "static Foo M_u;\n");

    let error = compile_err("MODULE M; VAR x: INTEGER; y: x; END M.");
    assert_eq!(error.error, ParserError::TypeExpected("x".to_string()));
}

#[test]
fn test_unsupported_declarations() {
    let error = compile_err("MODULE M; VAR a: ARRAY 2 OF ARRAY 3 OF INTEGER; END M.");
    assert_eq!(error.error, ParserError::MultiDimensionalArray);

    let error = compile_err("MODULE M; PROCEDURE P(VAR a: INTEGER); END P; END M.");
    assert_eq!(error.error, ParserError::VarParameter);

    let error = compile_err("MODULE M; PROCEDURE P; VAR y*: INTEGER; END P; END M.");
    assert_eq!(error.error, ParserError::ExportedLocal("y".to_string()));
}

#[test]
fn test_not_assignable() {
    let error = compile_err("MODULE M; CONST K = 1; BEGIN K := 2 END M.");
    assert_eq!(error.error, ParserError::NotAssignable("K".to_string()));
}

#[test]
fn test_closing_names() {
    let error = compile_err("MODULE M; END N.");
    assert_eq!(
        error.error,
        ParserError::NameMismatch {
            expected: "M".to_string(),
            found: "N".to_string()
        }
    );

    let error = compile_err("MODULE M; PROCEDURE P; END Q; END M.");
    assert!(matches!(error.error, ParserError::NameMismatch { .. }));
}

#[test]
fn test_statement_expected() {
    let error = compile_err("MODULE M; BEGIN 5 END M.");
    assert_eq!(error.error, ParserError::StatementExpected("5".to_string()));
}

#[test]
fn test_error_reports_line() {
    let error = compile_err("MODULE M;\nVAR x: INTEGER;\nBEGIN\n  y := 1\nEND M.");
    assert_eq!(error.line, 4);
    assert_eq!(error.to_string(), "M.Mod:4: Undeclared identifier 'y'");
}

#[test]
fn test_symbol_capacity() {
    let options = CompilerOptions {
        max_symbols: 44,
        ..CompilerOptions::default()
    };
    let error = compile_module("M.Mod", "MODULE M; VAR x: INTEGER; END M.", "M.h", &options).unwrap_err();
    assert_eq!(error.error, ParserError::Symbol(SymbolError::TableFull));

    let options = CompilerOptions {
        max_symbols: 10,
        ..CompilerOptions::default()
    };
    let error = compile_module("M.Mod", "MODULE M; END M.", "M.h", &options).unwrap_err();
    assert_eq!(error.line, 1);
    assert_eq!(error.error, ParserError::Symbol(SymbolError::TableFull));
}

#[test]
fn test_counter_program() {
    let source = include_str!("programs/Counter.Mod");
    let output = compile_module("Counter.Mod", source, "Counter.h", &CompilerOptions::default()).unwrap();
    let code = &output.implementation;
    assert_contains(&output.interface, "#define\tCounter_Limit\t0x10\n");
    assert_contains(&output.interface, "extern int Counter_count;\n");
    assert_contains(&output.interface, "extern int Counter_Bump(int Counter_by);\n");
    assert_contains(code, "#define\tCounter_Step\t2\n");
    assert_contains(code, "static char Counter_name[16];\n");
    assert_contains(code, "static void Counter_Reset(void) {\n");
    assert_contains(code, "strcpy(Counter_name, \"counter\");\n");
    assert_contains(code, "Counter_Reset();\n");
    assert_contains(code, "Counter_count = ((Counter_Bump(((Counter_Step)))));\n");
    assert_contains(code, "Counter_ASH(");
    assert_contains(code, "fabs(");
    assert_contains(code, "Out_Int(((Counter_count)));\n");
    assert_contains(code, "Format_Write(((Counter_name)));\n");
}

#[test]
fn test_compilation_is_repeatable() {
    let source = include_str!("programs/Counter.Mod");
    let options = CompilerOptions::default();
    let first = compile_module("Counter.Mod", source, "Counter.h", &options).unwrap();
    let second = compile_module("Counter.Mod", source, "Counter.h", &options).unwrap();
    assert_eq!(first, second);
}
