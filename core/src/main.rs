use std::fs;
use std::io::Read;
use std::process::Command;

use colored::*;
use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};

use tcc_core::interpreter::Interpreter;
use tcc_core::runner::Pipeline;

const USAGE: &str = "usage: tcc <ir|asm|compile|interpret> [file]\n\n\
  ir         print the function-partitioned intermediate representation\n\
  asm        print the generated x86-64 assembly\n\
  compile    assemble and link the program into ./a.out\n\
  interpret  run the program directly, without emitting assembly\n\n\
  reads from <file> if given, otherwise from stdin.";

fn main() {
  let args: Vec<String> = std::env::args().collect();

  if args.len() < 2 || args[1] == "-h" || args[1] == "--help" {
    println!("{}", USAGE);
    std::process::exit(if args.len() < 2 { 1 } else { 0 });
  }

  let command = args[1].as_str();
  if !matches!(command, "ir" | "asm" | "compile" | "interpret") {
    eprintln!("{} unknown command '{}'", "error:".red().bold(), command);
    eprintln!("{}", USAGE);
    std::process::exit(1);
  }

  let source = match args.get(2) {
    Some(path) => match fs::read_to_string(path) {
      Ok(source) => source,
      Err(err) => {
        eprintln!("{} could not read '{}': {}", "error:".red().bold(), path, err);
        std::process::exit(1);
      },
    },
    None => {
      let mut buf = String::new();
      if let Err(err) = std::io::stdin().read_to_string(&mut buf) {
        eprintln!("{} could not read stdin: {}", "error:".red().bold(), err);
        std::process::exit(1);
      }
      buf
    },
  };

  let mut engine = DiagnosticEngine::new();

  match command {
    "ir" => {
      if let Some(program) = Pipeline::compile_to_ir(&source, &mut engine) {
        print!("{}", program);
      }
    },
    "asm" => {
      if let Some(asm) = Pipeline::compile_to_asm(&source, &mut engine) {
        print!("{}", asm);
      }
    },
    "compile" => {
      if let Some(asm) = Pipeline::compile_to_asm(&source, &mut engine) {
        assemble_and_link(&asm, &mut engine);
      }
    },
    "interpret" => {
      if let Some(module) = Pipeline::typecheck(&source, &mut engine) {
        if let Err(err) = Interpreter::run(&module) {
          engine.emit(err.into());
        }
      }
    },
    _ => unreachable!("command already validated above"),
  }

  if engine.has_errors() {
    engine.print_all();
    std::process::exit(1);
  }
}

/// Shells out to the system toolchain to turn generated assembly into a
/// runnable binary. Assumes an object providing `print_int`, `print_bool`
/// and `read_int` is discoverable on the linker's search path — this
/// workspace has no runtime library of its own to supply one.
fn assemble_and_link(asm: &str, engine: &mut DiagnosticEngine) {
  let asm_path = std::env::temp_dir().join("tcc_out.s");
  if let Err(err) = fs::write(&asm_path, asm) {
    engine.emit(Diagnostic::new(DiagnosticCode::IoError, format!("could not write assembly: {}", err)));
    return;
  }

  let status = Command::new("cc").arg(&asm_path).arg("-o").arg("a.out").status();
  match status {
    Ok(status) if status.success() => {},
    Ok(status) => {
      engine.emit(Diagnostic::new(
        DiagnosticCode::IoError,
        format!("assembler/linker exited with {}", status),
      ));
    },
    Err(err) => {
      engine.emit(Diagnostic::new(DiagnosticCode::IoError, format!("could not invoke cc: {}", err)));
    },
  }
}
