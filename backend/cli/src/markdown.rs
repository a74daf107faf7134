//! Markdown rendering for model answers.
//!
//! Raw HTML in the source is emitted as escaped text.

use pulldown_cmark::{html, Event, Options, Parser};

pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
