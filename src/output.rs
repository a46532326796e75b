//! Terminal output formatting.

use colored::Colorize;

use crate::explain::ExplainResponse;

/// `Error:` line with an optional `Tip:` underneath
pub fn format_error(message: &str, tip: Option<&str>) -> String {
    let mut output = format!("{} {}", "Error:".red().bold(), message);
    if let Some(tip) = tip {
        output.push('\n');
        output.push_str(&format!("{} {}", "Tip:".blue().bold(), tip));
    }
    output
}

/// Render markdown text to terminal with colored output.
pub fn render_markdown(text: &str, width: usize, indent: &str) {
    for line in markdown_lines(text, width, indent) {
        println!("{line}");
    }
}

/// Lines [`render_markdown`] prints: fenced code is indented and cyan, other
/// text is wrapped to `width`
pub fn markdown_lines(text: &str, width: usize, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if line.trim().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            lines.push(format!("{indent}  {}", line.cyan()));
            continue;
        }

        if line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let processed = render_inline_markdown(line);
        for wrapped in textwrap::wrap(&processed, width.saturating_sub(indent.len()).max(20)) {
            lines.push(format!("{indent}{wrapped}"));
        }
    }

    lines
}

/// Process inline markdown: `code`, **bold**, *italic*
pub fn render_inline_markdown(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '`' => {
                let code: String = chars.by_ref().take_while(|&next| next != '`').collect();
                result.push_str(&code.cyan().to_string());
            }
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut bold_text = String::new();
                while let Some(next) = chars.next() {
                    if next == '*' {
                        if chars.peek() == Some(&'*') {
                            chars.next();
                        }
                        break;
                    }
                    bold_text.push(next);
                }
                result.push_str(&bold_text.bold().to_string());
            }
            '*' => {
                let italic_text: String =
                    chars.by_ref().take_while(|&next| next != '*').collect();
                result.push_str(&italic_text.italic().to_string());
            }
            _ => result.push(c),
        }
    }

    result
}

pub fn print_explanation(response: &ExplainResponse) {
    let width = textwrap::termwidth().min(100);

    println!();
    render_markdown(response.text.trim(), width, "");
    println!();
}

pub fn print_debug_section(title: &str, body: &str, footer: Option<String>) {
    eprintln!("{}", format!("=== DEBUG: {title} ===").yellow().bold());
    if body.trim().is_empty() {
        eprintln!("{}", "| <empty>".dimmed());
    } else {
        for line in body.lines() {
            eprintln!("{}", format!("| {line}").bright_white());
        }
    }
    if let Some(footer) = footer {
        eprintln!("{}", footer.dimmed());
    }
    eprintln!();
}
