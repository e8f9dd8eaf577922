//! CLI tool to check expressions and print their canonical dump.

use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: egrammar <command> [-e] [inputs...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  dump   Parse each input and print its canonical dump");
        eprintln!("  check  Check that each input parses");
        eprintln!();
        eprintln!("Inputs are file paths, or expressions when -e is given.");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  egrammar dump expr.pp");
        eprintln!("  egrammar dump -e '$a = 1 + 2 * 3'");
        eprintln!("  egrammar check -e '$a = [1, 2' '$b = 3'");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    if command != "dump" && command != "check" {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    let inline = args.get(2).is_some_and(|a| a == "-e");
    let inputs = if inline { &args[3..] } else { &args[2..] };

    if inputs.is_empty() {
        eprintln!("Error: no inputs specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for input in inputs {
        let (label, source) = if inline {
            ("<expr>", input.clone())
        } else {
            match fs::read_to_string(input) {
                Ok(c) => (input.as_str(), c),
                Err(e) => {
                    eprintln!("{input}: {e}");
                    had_error = true;
                    continue;
                }
            }
        };

        match egrammar::parse_str(&source) {
            Ok(expr) if command == "dump" => println!("{}", egrammar::dump(&expr)),
            Ok(_) => eprintln!("{label}: valid"),
            Err(e) => {
                eprintln!("{label}: {e}");
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
