//! Colored terminal output helpers.
//!
//! All user-facing status goes through these functions so we get
//! consistent styling across every command. Status lines go to stderr;
//! stdout carries only command results so it can be piped.

use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a command result to stdout, unstyled.
pub fn result(value: &str) {
    println!("{value}");
}
