//! `profile show | save | fill`.
//!
//! `fill` walks the form section by section on stdin. An empty line keeps
//! the current answer; `<` goes back one section.

use color_eyre::eyre::bail;
use color_eyre::Result;
use forms::{FieldDefinition, FieldKind, FormDefinition, FormPhase, Intent, Validator};
use portal_client::{Notification, ProfileSession};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use super::read_json;
use crate::cli::ProfileCmd;
use crate::output::print_json;
use crate::runtime::Runtime;

pub async fn run(action: ProfileCmd, rt: &Runtime) -> Result<()> {
    match action {
        ProfileCmd::Show => {
            let form = rt.api()?.profile_form().await?;
            if rt.json {
                print_json(&form)?;
            } else {
                print_outline(&form);
            }
        }
        ProfileCmd::Save { file } => {
            let form: FormDefinition = read_json(&file)?;
            form.check()?;
            let message = rt.api()?.save_profile_form(&form).await?;
            rt.notifier.notify(Notification::success(if message.is_empty() {
                format!("profile form saved ({} sections)", form.section_count())
            } else {
                message
            }));
        }
        ProfileCmd::Fill => fill(rt).await?,
    }
    Ok(())
}

fn print_outline(form: &FormDefinition) {
    if !form.title.is_empty() {
        println!("{}", form.title);
    }
    for (i, section) in form.sections.iter().enumerate() {
        println!("{}. {}", i + 1, section.title);
        for field in &section.fields {
            let marker = if field.required { "*" } else { " " };
            println!("   {marker} {:<20} {:<9} {}", field.id, field.kind, field.label);
        }
    }
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, text: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => bail!("input closed before the form was submitted"),
        }
    }
}

async fn fill(rt: &Runtime) -> Result<()> {
    let mut session =
        ProfileSession::open(rt.api()?, rt.notifier.clone(), Validator::new()).await?;
    let mut prompt = Prompt::new();

    loop {
        let phase = session.controller().phase().clone();
        match phase {
            FormPhase::Submitted { .. } => {
                if !session.controller().form().settings.allow_another_response {
                    return Ok(());
                }
                let again = prompt.ask("Submit another response? [y/N] ").await?;
                if !again.eq_ignore_ascii_case("y") {
                    return Ok(());
                }
                session.dispatch(Intent::Reset).await;
            }
            FormPhase::Filling(index) => {
                let Some(section) = session.controller().current_section().cloned() else {
                    bail!("section {index} missing from the form");
                };
                let (step, total) = session.controller().progress();
                println!("\nStep {step} of {total}: {}", section.title);
                if let Some(description) = &section.description {
                    println!("{description}");
                }
                if let Some(error) = session.controller().form_error() {
                    println!("! {error}");
                }

                let mut back = false;
                for field in &section.fields {
                    let current = session.controller().answers().get(&field.id).cloned();
                    if let Some(error) = session.controller().errors().get(&field.id) {
                        println!("  ! {error}");
                    }
                    let raw = prompt.ask(&field_prompt(field, current.as_ref())).await?;
                    if raw == "<" {
                        back = true;
                        break;
                    }
                    if let Some(value) = parse_input(field, &raw) {
                        session.dispatch(Intent::change(field.id.clone(), value)).await;
                    }
                }

                let intent = if back {
                    Intent::Previous
                } else if session.controller().is_last_section() {
                    Intent::Submit
                } else {
                    Intent::Next
                };
                session.dispatch(intent).await;
            }
        }
    }
}

fn field_prompt(field: &FieldDefinition, current: Option<&Value>) -> String {
    let mut text = format!("  {}", field.label);
    if field.required {
        text.push_str(" *");
    }
    if !field.options.is_empty() {
        text.push_str(&format!(" ({})", field.options.join(", ")));
    }
    if let Some(current) = current {
        text.push_str(&format!(" [{}]", display_value(current)));
    }
    text.push_str(": ");
    text
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Turn one input line into an answer. `None` keeps the current answer.
/// Numbers that do not parse stay text so the validator can report them.
fn parse_input(field: &FieldDefinition, raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    if raw == "-" {
        return Some(if field.is_list() {
            Value::Array(Vec::new())
        } else {
            Value::String(String::new())
        });
    }
    let value = match field.kind {
        FieldKind::Number => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        FieldKind::Checkbox => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        ),
        _ => Value::String(raw.to_string()),
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_parse_or_stay_text() {
        let field = FieldDefinition::new("cgpa", "CGPA", FieldKind::Number);
        assert_eq!(parse_input(&field, "8.5"), Some(json!(8.5)));
        assert_eq!(parse_input(&field, "eight"), Some(json!("eight")));
        assert_eq!(parse_input(&field, ""), None);
    }

    #[test]
    fn checkbox_input_splits_on_commas() {
        let field = FieldDefinition::new("skills", "Skills", FieldKind::Checkbox)
            .options(["rust", "sql"]);
        assert_eq!(parse_input(&field, "rust, sql,"), Some(json!(["rust", "sql"])));
        assert_eq!(parse_input(&field, "-"), Some(json!([])));
    }

    #[test]
    fn prompt_shows_current_answer() {
        let field = FieldDefinition::new("name", "Name", FieldKind::Text).required();
        assert_eq!(
            field_prompt(&field, Some(&json!("Asha"))),
            "  Name * [Asha]: "
        );
    }
}
