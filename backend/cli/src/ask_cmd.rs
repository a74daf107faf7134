//! CLI Ask Command
//!
//! One-shot consultation from the terminal.

use expertdesk_core::{Persona, Query, Reply};
use expertdesk_dispatch::Dispatcher;

use crate::page::{EMPTY_QUESTION_WARNING, SETUP_STEPS};
use crate::terminal_output::{note_error, note_warn, supports_color, BOLD, RESET};

#[derive(Debug, PartialEq)]
pub enum AskOutcome {
    MissingCredential,
    BlankQuestion,
    Replied(Reply),
}

impl AskOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, AskOutcome::Replied(reply) if reply.is_answered())
    }
}

pub async fn answer(dispatcher: Option<&Dispatcher>, persona: Persona, question: &str) -> AskOutcome {
    let Some(dispatcher) = dispatcher else {
        return AskOutcome::MissingCredential;
    };
    match Query::new(question) {
        Some(query) => AskOutcome::Replied(dispatcher.consult(&query, persona).await),
        None => AskOutcome::BlankQuestion,
    }
}

/// Run the command and print the result. Returns whether an answer was produced.
pub async fn run(dispatcher: Option<&Dispatcher>, persona: Persona, question: &str) -> bool {
    let outcome = answer(dispatcher, persona, question).await;
    match &outcome {
        AskOutcome::MissingCredential => {
            note_error("The OpenAI API key is not configured.");
            for (i, step) in SETUP_STEPS.iter().enumerate() {
                eprintln!("  {}. {step}", i + 1);
            }
        }
        AskOutcome::BlankQuestion => note_warn(EMPTY_QUESTION_WARNING),
        AskOutcome::Replied(reply) => {
            let heading = format!("Advice from {}:", persona.label());
            if supports_color() {
                println!("{BOLD}{heading}{RESET}");
            } else {
                println!("{heading}");
            }
            println!("{}", reply.display_text());
        }
    }
    outcome.succeeded()
}
