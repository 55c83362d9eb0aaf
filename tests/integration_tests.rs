use arara_compiler::{codegen, frontend, semantic, tac};

/// Run the full pipeline (frontend → semantic table → TAC → LLVM IR),
/// asserting every stage succeeds, and return the generated IR text.
fn compile(source: &str) -> String {
    let program = frontend::parse(source).expect("frontend error");
    let symbols = semantic::build(&program);
    let instructions = tac::generator::generate(&program).expect("TAC generation error");
    codegen::generate(&instructions, &symbols).expect("IR generation error")
}

#[test]
fn hello_world_prints_a_string_literal() {
    let ir = compile(r#"escreva("Hello, world!");"#);
    assert!(ir.contains("define i32 @main()"));
    assert!(ir.contains("c\"Hello, world!\\0A\\00\""));
    assert!(ir.contains("call i32 (i8*, ...) @printf(i8* %"));
    assert!(ir.contains("ret i32 0"));
}

#[test]
fn echo_reads_and_writes_an_identifier() {
    let ir = compile("inteiro x; leia(x); escreva(x);");
    assert!(ir.contains("%x_ptr = alloca i32, align 4"));
    assert!(ir.contains("call i32 (i8*, ...) @scanf(i8* %"));
    assert!(ir.contains("i32* %x_ptr)"));
    assert!(ir.contains("call i32 (i8*, ...) @printf(i8* %"));
}

#[test]
fn arithmetic_chain_folds_left_to_right() {
    let ir = compile("inteiro x; x <- 1 + 2 * 3;");
    assert!(ir.contains("= mul i32 2, 3"));
    assert!(ir.contains("= add i32 1, %"));
    assert!(ir.contains("store i32 %"));
}

#[test]
fn if_else_branches_on_a_comparison() {
    let source = r#"
        inteiro x;
        leia(x);
        se x == 0 entao
            escreva(1);
        senao
            escreva(2);
        fimse
    "#;
    let ir = compile(source);
    assert!(ir.contains("= icmp eq i32"));
    assert!(ir.contains("br i1"));
    // Two distinct labelled blocks plus entry's implicit one.
    let block_labels = ir.matches(":\n").count();
    assert!(block_labels >= 2, "expected at least two labelled blocks, got:\n{ir}");
}

#[test]
fn counting_loop_reevaluates_its_condition() {
    let source = r#"
        inteiro i;
        i <- 0;
        enquanto i < 3 faca
            escreva(i);
            i <- i + 1;
        fimenquanto
    "#;
    let ir = compile(source);
    assert!(ir.contains("= icmp slt i32"));
    assert!(ir.contains("br label %L") || ir.contains("br i1"));
    assert!(ir.contains("= add i32"));
}

#[test]
fn boolean_combination_lowers_to_and_not() {
    let source = r#"
        inteiro x;
        leia(x);
        se (x > 0) && !(x == 10) entao
            escreva(1);
        fimse
    "#;
    let ir = compile(source);
    assert!(ir.contains("= icmp sgt i32"));
    assert!(ir.contains("= icmp eq i32"));
    assert!(ir.contains("= xor i1"));
    assert!(ir.contains("= and i1"));
}

#[test]
fn printed_tac_round_trips_through_the_parser() {
    let program = frontend::parse("inteiro x; x <- 1 + 2; escreva(x);").unwrap();
    let instructions = tac::generator::generate(&program).unwrap();
    let printed = tac::print_program(&instructions);
    let reparsed = tac::parse_program(&printed).unwrap();
    assert_eq!(instructions, reparsed);
}

#[test]
fn syntax_errors_surface_as_input_errors_with_a_span() {
    let err = frontend::parse("x <- 1").unwrap_err();
    assert_eq!(err.kind, arara_compiler::error::ErrorKind::InputError);
}
