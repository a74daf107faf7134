//! CLI Personas Command
//!
//! Lists the expert personas a question can be addressed to.

use expertdesk_core::Persona;

use crate::terminal_output::{render_table, supports_color, DIM, RESET};

pub fn render() -> String {
    let rows: Vec<Vec<String>> = Persona::ALL
        .iter()
        .map(|p| {
            let marker = if *p == Persona::default() { "*" } else { "" };
            vec![
                format!("{}{marker}", p.key()),
                p.label().to_string(),
                p.display_description(),
            ]
        })
        .collect();
    render_table(&["KEY", "LABEL", "DESCRIPTION"], &rows)
}

pub fn run() {
    println!("\n🎯 Available experts\n");
    print!("{}", render());
    if supports_color() {
        println!("\n{DIM}* default persona{RESET}");
    } else {
        println!("\n* default persona");
    }
}
