use super::generator::generate;
use super::*;
use crate::ast::{BinOp, Command, CommandKind, Expr, ExprKind, Program, SourceType, UnOp};
use crate::error::Span;

fn sp() -> Span {
    Span::synthetic()
}

fn int(v: i64) -> Expr {
    Expr::new(ExprKind::IntLit(v), sp())
}

fn ident(name: &str) -> Expr {
    Expr::new(ExprKind::Ident(name.to_string()), sp())
}

fn bin(op: BinOp, l: Expr, r: Expr) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(l),
            right: Box::new(r),
        },
        sp(),
    )
}

fn program(commands: Vec<Command>) -> Program {
    Program { commands }
}

#[test]
fn write_string_literal_emits_single_instruction() {
    let src = Expr::new(ExprKind::StrLit("\"ola\"".to_string()), sp());
    let prog = program(vec![Command::new(CommandKind::Write { expr: src }, sp())]);
    let instrs = generate(&prog).unwrap();
    assert_eq!(instrs.len(), 1);
    assert_eq!(instrs[0].to_string(), "WRITE \"ola\"");
}

#[test]
fn read_then_write_echoes_identifier() {
    let prog = program(vec![
        Command::new(
            CommandKind::Read {
                name: "x".to_string(),
            },
            sp(),
        ),
        Command::new(
            CommandKind::Write { expr: ident("x") },
            sp(),
        ),
    ]);
    let instrs = generate(&prog).unwrap();
    let rendered: Vec<String> = instrs.iter().map(|i| i.to_string()).collect();
    assert_eq!(rendered, vec!["READ x", "WRITE x"]);
}

#[test]
fn arithmetic_chain_allocates_temps_left_to_right() {
    // x <- 1 + 2 * 3
    let mul = bin(BinOp::Mul, int(2), int(3));
    let add = bin(BinOp::Add, int(1), mul);
    let prog = program(vec![Command::new(
        CommandKind::Assign {
            name: "x".to_string(),
            expr: add,
        },
        sp(),
    )]);
    let instrs = generate(&prog).unwrap();
    let rendered: Vec<String> = instrs.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["_t0 = 2 * 3", "_t1 = 1 + _t0", "x = _t1"]
    );
}

#[test]
fn if_else_lowers_to_two_labels_and_a_goto() {
    let prog = program(vec![
        Command::new(
            CommandKind::Read {
                name: "x".to_string(),
            },
            sp(),
        ),
        Command::new(
            CommandKind::If {
                cond: bin(BinOp::Eq, ident("x"), int(0)),
                then_block: vec![Command::new(
                    CommandKind::Write { expr: int(1) },
                    sp(),
                )],
                else_block: Some(vec![Command::new(
                    CommandKind::Write { expr: int(2) },
                    sp(),
                )]),
            },
            sp(),
        ),
    ]);
    let instrs = generate(&prog).unwrap();
    let rendered: Vec<String> = instrs.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "READ x",
            "_t0 = x == 0",
            "IF_FALSE _t0 GOTO L0",
            "WRITE 1",
            "GOTO L1",
            "L0:",
            "WRITE 2",
            "L1:",
        ]
    );
}

#[test]
fn while_loop_reevaluates_condition_at_top() {
    let prog = program(vec![Command::new(
        CommandKind::While {
            cond: bin(BinOp::Lt, ident("i"), int(3)),
            body: vec![
                Command::new(CommandKind::Write { expr: ident("i") }, sp()),
                Command::new(
                    CommandKind::Assign {
                        name: "i".to_string(),
                        expr: bin(BinOp::Add, ident("i"), int(1)),
                    },
                    sp(),
                ),
            ],
        },
        sp(),
    )]);
    let instrs = generate(&prog).unwrap();
    let rendered: Vec<String> = instrs.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "L0:",
            "_t0 = i < 3",
            "IF_FALSE _t0 GOTO L1",
            "WRITE i",
            "_t1 = i + 1",
            "i = _t1",
            "GOTO L0",
            "L1:",
        ]
    );
}

#[test]
fn boolean_combination_short_circuits_are_not_required() {
    // (x > 0) && !(x == 10)
    let gt = bin(BinOp::Gt, ident("x"), int(0));
    let eq = bin(BinOp::Eq, ident("x"), int(10));
    let not_eq = Expr::new(
        ExprKind::Unary {
            op: UnOp::Not,
            operand: Box::new(eq),
        },
        sp(),
    );
    let cond = bin(BinOp::And, gt, not_eq);
    let prog = program(vec![Command::new(
        CommandKind::If {
            cond,
            then_block: vec![Command::new(CommandKind::Write { expr: int(1) }, sp())],
            else_block: None,
        },
        sp(),
    )]);
    let instrs = generate(&prog).unwrap();
    let rendered: Vec<String> = instrs.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "_t0 = x > 0",
            "_t1 = x == 10",
            "_t2 = ! _t1",
            "_t3 = _t0 && _t2",
            "IF_FALSE _t3 GOTO L0",
            "WRITE 1",
            "L0:",
            "L1:",
        ]
    );
}

#[test]
fn declarations_emit_no_instructions() {
    let prog = program(vec![Command::new(
        CommandKind::Decl {
            source_type: SourceType::Inteiro,
            name: "x".to_string(),
        },
        sp(),
    )]);
    assert!(generate(&prog).unwrap().is_empty());
}

#[test]
fn fresh_names_are_globally_unique() {
    let mul = bin(BinOp::Mul, int(2), int(3));
    let add = bin(BinOp::Add, int(1), mul);
    let prog = program(vec![
        Command::new(
            CommandKind::Assign {
                name: "x".to_string(),
                expr: add.clone(),
            },
            sp(),
        ),
        Command::new(
            CommandKind::Assign {
                name: "y".to_string(),
                expr: add,
            },
            sp(),
        ),
    ]);
    let instrs = generate(&prog).unwrap();
    let mut temps: Vec<&str> = instrs
        .iter()
        .filter_map(|i| match &i.result {
            Some(Operand::Temp(name)) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let before = temps.len();
    temps.sort_unstable();
    temps.dedup();
    assert_eq!(temps.len(), before, "temp names must be unique");
}

#[test]
fn round_trip_print_then_parse_is_identity() {
    let mul = bin(BinOp::Mul, int(2), int(3));
    let add = bin(BinOp::Add, int(1), mul);
    let prog = program(vec![
        Command::new(
            CommandKind::Read {
                name: "x".to_string(),
            },
            sp(),
        ),
        Command::new(
            CommandKind::If {
                cond: bin(BinOp::Eq, ident("x"), int(0)),
                then_block: vec![Command::new(
                    CommandKind::Assign {
                        name: "y".to_string(),
                        expr: add,
                    },
                    sp(),
                )],
                else_block: Some(vec![Command::new(
                    CommandKind::Write { expr: ident("y") },
                    sp(),
                )]),
            },
            sp(),
        ),
    ]);
    let instrs = generate(&prog).unwrap();
    let printed = print_program(&instrs);
    let reparsed = parse_program(&printed).unwrap();
    assert_eq!(instrs, reparsed);
}
