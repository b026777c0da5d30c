//! Deja Vu CLI

use dejac::commands::{lex_file, parse_file, run_file};

fn main() {
    dejac::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let Some(path) = args.iter().skip(2).find(|arg| !arg.starts_with('-')) else {
                eprintln!("error: missing file path");
                eprintln!("Usage: deja run <file.dv>");
                std::process::exit(1);
            };
            run_file(path);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: deja parse <file.dv>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: deja lex <file.dv>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Deja Vu {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare source path runs the file.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dv"))
            {
                run_file(command);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Deja Vu");
    println!();
    println!("Usage: deja <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.dv>        Evaluate a Deja Vu program");
    println!("  parse <file.dv>      Parse and print the syntax tree");
    println!("  lex <file.dv>        Tokenize and print the tokens");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Enable tracing (e.g. RUST_LOG=deja_eval=debug)");
    println!();
    println!("Examples:");
    println!("  deja run main.dv");
    println!("  deja main.dv");
    println!("  deja parse main.dv");
}
