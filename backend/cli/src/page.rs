//! Server-rendered HTML for the consultation page.

use expertdesk_core::{Persona, Reply};

use crate::markdown::render_markdown;

/// Setup steps shown when no API key is configured.
pub const SETUP_STEPS: [&str; 3] = [
    "Get an API key from the OpenAI website: https://platform.openai.com/api-keys",
    "Running locally: export OPENAI_API_KEY=\"your-api-key-here\" and restart the server",
    "Hosted deployment: add OPENAI_API_KEY = \"your-api-key-here\" to the secrets.toml secret store",
];

pub const EMPTY_QUESTION_WARNING: &str = "⚠️ Please enter your question.";

const TITLE: &str = "AI Expert Consultant";

/// Keeps the "Selected" line and the busy label in step with the radios, and
/// reveals the busy indicator while the answer is generated.
const FORM_SCRIPT: &str = r#"<script>
function busyText(label) { return "⏳ Generating an answer as " + label + "..."; }
function pickPersona(radio) {
  document.getElementById("selected").textContent = radio.dataset.description;
  document.getElementById("busy").textContent = busyText(radio.dataset.label);
}
function showBusy() { document.getElementById("busy").hidden = false; }
</script>"#;

const PLACEHOLDER: &str = "Example: I'm struggling to track progress on my project. \
    How can I keep my team motivated and manage tasks efficiently?";

/// What to show below the form after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The question was blank; nothing was dispatched.
    Warning,
    Reply(Reply),
}

/// State of the form page for one render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormView {
    pub persona: Persona,
    pub question: String,
    pub outcome: Option<Outcome>,
}

/// Page shown instead of the form when the credential is missing.
pub fn render_setup_page() -> String {
    let steps = SETUP_STEPS
        .iter()
        .map(|s| format!("<li>{}</li>", html_escape(s)))
        .collect::<String>();

    let body = format!(
        r#"<div class="panel error">⚠️ The OpenAI API key is not configured. Set it up as described below.</div>
<details open class="panel">
<summary>🔑 How to configure the API key</summary>
<ol>{steps}</ol>
</details>"#
    );

    layout(&body)
}

pub fn render_form_page(view: &FormView) -> String {
    let radios = Persona::ALL
        .iter()
        .map(|p| {
            let checked = if *p == view.persona { " checked" } else { "" };
            format!(
                r#"<label class="persona"><input type="radio" name="persona" value="{key}"{checked} data-label="{label}" data-description="{description}" onchange="pickPersona(this)"> {icon} {label}</label>"#,
                key = p.key(),
                icon = p.profile().icon,
                label = html_escape(p.label()),
                description = html_escape(&p.display_description()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let outcome = match &view.outcome {
        None => String::new(),
        Some(Outcome::Warning) => format!(
            r#"<div class="panel warning">{}</div>"#,
            html_escape(EMPTY_QUESTION_WARNING)
        ),
        Some(Outcome::Reply(reply)) => {
            let (class, content) = match reply {
                Reply::Answered { content, .. } => ("answer", render_markdown(content)),
                Reply::Failed { .. } => ("answer failed", html_escape(&reply.display_text())),
            };
            format!(
                r#"<section class="{class}">
<h3>🤖 Answer from the AI expert</h3>
<p><strong>Advice from {label}:</strong></p>
<div class="content">{content}</div>
</section>"#,
                label = html_escape(view.persona.label()),
            )
        }
    };

    let body = format!(
        r#"<h1>🤖 {TITLE}</h1>
<section class="intro">
<h2>📖 About this app</h2>
<p>This app is an AI consultant that answers as an expert in one of several fields.
Your questions are answered from the knowledge and perspective of the field you choose.</p>
<h2>🚀 How to use</h2>
<ol>
<li><strong>Choose an expert</strong>: pick the field you want to consult from the list on the right.</li>
<li><strong>Enter your question</strong>: describe your question or concern in the text area.</li>
<li><strong>Get an answer</strong>: press "Get answer" and the AI answers from the chosen expert's point of view.</li>
</ol>
<h2>⚠️ Please note</h2>
<ul>
<li>Answers from this app are provided for reference only.</li>
<li>For important decisions or professional diagnoses, always consult a real expert.</li>
</ul>
</section>
<form method="post" action="/ask" class="columns" onsubmit="showBusy()">
<div class="main">
<h3>💬 Your question</h3>
<label for="question">Describe what you want to ask in detail:</label>
<textarea id="question" name="question" rows="7" placeholder="{placeholder}">{question}</textarea>
<button type="submit">🚀 Get answer</button>
</div>
<aside>
<h3>🎯 Choose an expert</h3>
<p>Select the field you want to consult:</p>
{radios}
<div class="panel info"><strong>Selected</strong>: <span id="selected">{selected}</span></div>
</aside>
</form>
<div id="busy" class="panel info busy" role="status" hidden>⏳ Generating an answer as {busy_label}...</div>
{outcome}
{FORM_SCRIPT}"#,
        placeholder = html_escape(PLACEHOLDER),
        question = html_escape(&view.question),
        selected = html_escape(&view.persona.display_description()),
        busy_label = html_escape(view.persona.label()),
    );

    layout(&body)
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{TITLE}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 1100px; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }}
.columns {{ display: flex; gap: 2rem; }}
.main {{ flex: 3; display: flex; flex-direction: column; gap: 0.5rem; }}
aside {{ flex: 1; }}
.persona {{ display: block; margin: 0.25rem 0; }}
textarea {{ width: 100%; font: inherit; }}
button {{ padding: 0.6rem; font-weight: 700; background: #ff4b4b; color: #fff; border: none; border-radius: 6px; }}
.panel {{ border-radius: 6px; padding: 0.75rem 1rem; margin: 1rem 0; }}
.error {{ background: #fde2e2; }}
.warning {{ background: #fff4d6; }}
.info {{ background: #e3f0ff; }}
.answer {{ margin-top: 2rem; border-left: 3px solid #3b82f6; padding-left: 1rem; }}
.failed {{ border-left-color: #ef4444; }}
.failed .content {{ white-space: pre-wrap; }}
.content pre {{ background: #f4f4f4; padding: 0.75rem; overflow-x: auto; }}
</style>
</head>
<body>
{body}
</body>
</html>"#
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
