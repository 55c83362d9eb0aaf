use std::env;
use std::fs;
use std::path::Path;

use arara_compiler::{codegen, frontend, semantic, tac};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: aracc <file.arara> [--gerar-tac] [--gerar-llvm]");
        std::process::exit(1);
    }

    let path = &args[1];
    let write_tac = args.iter().any(|a| a == "--gerar-tac");
    let write_ll = args.iter().any(|a| a == "--gerar-llvm");

    let source = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Failed to read {path}: {err}");
        std::process::exit(1);
    });

    let program = frontend::parse(&source).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    let symbols = semantic::build(&program);

    let instructions = tac::generator::generate(&program).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    let ir = codegen::generate(&instructions, &symbols).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    let stem = Path::new(path).with_extension("");

    if write_tac {
        let out = stem.with_extension("tac");
        if let Err(err) = fs::write(&out, tac::print_program(&instructions)) {
            eprintln!("Failed to write {}: {err}", out.display());
            std::process::exit(1);
        }
    }

    if write_ll {
        let out = stem.with_extension("ll");
        if let Err(err) = fs::write(&out, &ir) {
            eprintln!("Failed to write {}: {err}", out.display());
            std::process::exit(1);
        }
    }

    if !write_tac && !write_ll {
        println!("{ir}");
    }
}
