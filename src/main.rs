#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(elided_lifetimes_in_paths)]

use std::{cell::RefCell, env, fs, path, process, rc::Rc};

mod args;
mod file_paths;
mod helper;
mod interrupt;

use args::Action;

enum EvalResult {
    Ok,
    Err,
    NoInput,
}

fn eval_and_print_res(
    line: &str,
    context: &mut bigcalc_core::Context,
    int: &impl bigcalc_core::Interrupt,
) -> EvalResult {
    match bigcalc_core::evaluate_with_interrupt(line, context, int) {
        Ok(res) => {
            let result = res.get_main_result();
            if result.is_empty() {
                return EvalResult::NoInput;
            }
            println!("{}", result);
            EvalResult::Ok
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            EvalResult::Err
        }
    }
}

fn print_help(explain_quitting: bool) {
    println!("bigcalc evaluates integer expressions of any size, e.g. `2 ** 100 % 7`.");
    println!();
    println!("Operators, from lowest to highest precedence:");
    println!("  |   ^   &   == !=   < <= > >=   << >>   + -   * / %   unary - + ~ !   **");
    println!("`ans` is the previous result, `true` and `false` are booleans.");
    println!("Start with --live or set BIGCALC_LIVE to preview results while typing.");
    println!();
    println!("Version: {}", bigcalc_core::get_version());
    if let Some(history_path) = file_paths::get_history_file_location() {
        println!("History file: {}", history_path.to_string_lossy());
    } else {
        println!("Failed to get history file location");
    }
    if explain_quitting {
        println!("\nTo quit, type `quit`.");
    }
}

fn save_history(rl: &mut rustyline::Editor<helper::Helper>, path: Option<&path::Path>) {
    if let Some(history_path) = path {
        if let Some(dir) = history_path.parent() {
            if fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        if rl.save_history(history_path).is_err() {
            // Error trying to save history
        }
    }
}

fn repl_loop(live: bool) -> i32 {
    let mut rl = rustyline::Editor::<helper::Helper>::with_config(
        rustyline::config::Builder::new()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build(),
    );
    let context = Rc::new(RefCell::new(bigcalc_core::Context::new()));
    rl.set_helper(Some(helper::Helper::new(Rc::clone(&context), live)));
    let history_path = file_paths::get_history_file_location();
    if let Some(history_path) = &history_path {
        if rl.load_history(history_path).is_err() {
            // No previous history
        }
    }
    let mut initial_run = true; // set to false after first successful command
    let mut last_command_success = true;
    let ctrl_c = interrupt::CtrlC::install();
    loop {
        let readline = rl.readline("> ");
        match readline {
            Ok(line) => match line.trim() {
                "exit" | "exit()" | ".exit" | ":exit" | "quit" | "quit()" | ":quit" | ":q" => {
                    break
                }
                "help" | "?" => {
                    print_help(true);
                }
                "version" => {
                    println!("{}", bigcalc_core::get_version());
                }
                line => {
                    let mut context = context.borrow_mut();
                    match ctrl_c.run(|int| eval_and_print_res(line, &mut context, int)) {
                        EvalResult::Ok => {
                            last_command_success = true;
                            initial_run = false;
                        }
                        EvalResult::NoInput => {
                            last_command_success = true;
                        }
                        EvalResult::Err => {
                            last_command_success = false;
                        }
                    }
                }
            },
            Err(rustyline::error::ReadlineError::Interrupted) => {
                if initial_run {
                    break;
                }
                println!("Use Ctrl-D (i.e. EOF) to exit");
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }
    save_history(&mut rl, history_path.as_deref());
    if last_command_success {
        0
    } else {
        1
    }
}

fn main() {
    process::exit(real_main())
}

fn real_main() -> i32 {
    let action = Action::parse(env::args().skip(1));
    match action {
        Action::Help => {
            print_help(false);
            0
        }
        Action::Version => {
            println!("{}", bigcalc_core::get_version());
            0
        }
        Action::Eval(expr) => {
            let ctrl_c = interrupt::CtrlC::install();
            let mut context = bigcalc_core::Context::new();
            match ctrl_c.run(|int| eval_and_print_res(expr.as_str(), &mut context, int)) {
                EvalResult::Ok | EvalResult::NoInput => 0,
                EvalResult::Err => 1,
            }
        }
        Action::Repl { live } => repl_loop(live),
    }
}
