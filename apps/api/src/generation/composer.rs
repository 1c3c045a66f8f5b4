//! Prompt Composer: turns the form fields into one labeled prompt.
//!
//! Sections appear in a fixed order; blank fields are left out entirely.

use crate::generation::generator::GenerateRequest;
use crate::generation::prompts::CLOSING_INSTRUCTION;

#[derive(Debug, Clone, Copy)]
enum Layout {
    /// `Label: value`
    Inline,
    /// `Label:` then the value on the following lines.
    Block,
}

/// Composes the prompt sent to both backends.
pub fn compose_prompt(request: &GenerateRequest) -> String {
    let sections = [
        ("Role", Layout::Inline, request.role.as_str()),
        ("Context", Layout::Block, optional(&request.context)),
        ("Example", Layout::Block, optional(&request.example)),
        ("Target audience", Layout::Inline, optional(&request.audience)),
        ("Format", Layout::Inline, optional(&request.format)),
        ("Style", Layout::Inline, optional(&request.style)),
        ("Constraints", Layout::Inline, optional(&request.constraints)),
        ("Task", Layout::Block, request.task.as_str()),
    ];

    let mut paragraphs: Vec<String> = sections
        .iter()
        .filter_map(|(label, layout, value)| {
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            Some(match layout {
                Layout::Inline => format!("{label}: {value}"),
                Layout::Block => format!("{label}:\n{value}"),
            })
        })
        .collect();
    paragraphs.push(CLOSING_INSTRUCTION.to_string());

    paragraphs.join("\n\n")
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
