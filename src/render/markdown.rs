//! Markdown rendering to a safe HTML subset
//!
//! All source text is HTML-escaped before any tags are emitted, so markup
//! in the input (script tags included) can never reach the output as
//! markup. The subset covers headings, fenced code blocks, inline code,
//! bold, italic, lists, tables, paragraphs, and line breaks.

/// Escape the HTML-significant characters in a text fragment
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render markdown text into the safe HTML subset
pub fn to_safe_html(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        // Fenced code block
        if line.trim_start().starts_with("```") {
            let mut code_lines = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim_start().starts_with("```") {
                code_lines.push(escape(lines[i]));
                i += 1;
            }
            // skip the closing fence if present
            if i < lines.len() {
                i += 1;
            }
            blocks.push(format!("<pre><code>{}</code></pre>", code_lines.join("\n")));
            continue;
        }

        // Heading
        if let Some((level, rest)) = heading_line(line) {
            blocks.push(format!("<h{}>{}</h{}>", level, render_inline(rest), level));
            i += 1;
            continue;
        }

        // Table: a pipe row followed by a separator row
        if line.trim_start().starts_with('|')
            && i + 1 < lines.len()
            && is_table_separator(lines[i + 1])
        {
            let header = table_cells(line);
            let mut rows = Vec::new();
            i += 2;
            while i < lines.len() && lines[i].trim_start().starts_with('|') {
                rows.push(table_cells(lines[i]));
                i += 1;
            }

            let mut table = String::from("<table><thead><tr>");
            for cell in &header {
                table.push_str(&format!("<th>{}</th>", render_inline(cell)));
            }
            table.push_str("</tr></thead><tbody>");
            for row in &rows {
                table.push_str("<tr>");
                for cell in row {
                    table.push_str(&format!("<td>{}</td>", render_inline(cell)));
                }
                table.push_str("</tr>");
            }
            table.push_str("</tbody></table>");
            blocks.push(table);
            continue;
        }

        // Unordered list
        if unordered_item(line).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                match unordered_item(lines[i]) {
                    Some(item) => {
                        items.push(format!("<li>{}</li>", render_inline(item)));
                        i += 1;
                    }
                    None => break,
                }
            }
            blocks.push(format!("<ul>{}</ul>", items.join("")));
            continue;
        }

        // Ordered list
        if ordered_item(line).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                match ordered_item(lines[i]) {
                    Some(item) => {
                        items.push(format!("<li>{}</li>", render_inline(item)));
                        i += 1;
                    }
                    None => break,
                }
            }
            blocks.push(format!("<ol>{}</ol>", items.join("")));
            continue;
        }

        // Paragraph: the current line plus consecutive plain lines,
        // joined with <br>. Consuming the first line unconditionally
        // also swallows stray table-ish lines with no separator row.
        let mut para_lines = vec![render_inline(line)];
        i += 1;
        while i < lines.len() && is_paragraph_line(lines[i]) {
            para_lines.push(render_inline(lines[i]));
            i += 1;
        }
        blocks.push(format!("<p>{}</p>", para_lines.join("<br>")));
    }

    blocks.join("\n")
}

/// Heading marker and text, if the line is a heading
fn heading_line(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&level) {
        if let Some(rest) = trimmed[level..].strip_prefix(' ') {
            return Some((level, rest));
        }
    }
    None
}

/// Item text, if the line is an unordered list item
fn unordered_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
}

/// Item text, if the line is an ordered list item
fn ordered_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let dot = trimmed.find(". ")?;
    if dot > 0 && trimmed[..dot].chars().all(|c| c.is_ascii_digit()) {
        Some(&trimmed[dot + 2..])
    } else {
        None
    }
}

/// Whether the line is a table separator row like `|---|:---:|`
fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') {
        return false;
    }
    trimmed
        .trim_matches('|')
        .split('|')
        .all(|cell| {
            let cell = cell.trim();
            !cell.is_empty() && cell.chars().all(|c| c == '-' || c == ':')
        })
}

/// Cell texts of a table row
fn table_cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Whether the line continues a paragraph
fn is_paragraph_line(line: &str) -> bool {
    !line.trim().is_empty()
        && !line.trim_start().starts_with("```")
        && heading_line(line).is_none()
        && unordered_item(line).is_none()
        && ordered_item(line).is_none()
        && !line.trim_start().starts_with('|')
}

/// Render inline markdown after escaping the source text
fn render_inline(text: &str) -> String {
    let escaped = escape(text);
    let with_code = replace_pairs(&escaped, "`", "<code>", "</code>");
    let with_bold = replace_pairs(&with_code, "**", "<strong>", "</strong>");
    replace_pairs(&with_bold, "*", "<em>", "</em>")
}

/// Replace paired delimiters with open/close tags.
///
/// An unpaired trailing delimiter stays literal.
fn replace_pairs(text: &str, delim: &str, open: &str, close: &str) -> String {
    let parts: Vec<&str> = text.split(delim).collect();
    if parts.len() < 3 {
        return text.to_string();
    }

    let paired = (parts.len() - 1) / 2 * 2;
    let mut out = String::with_capacity(text.len());
    let mut inside = false;

    for (i, part) in parts.iter().enumerate() {
        out.push_str(part);
        if i + 1 < parts.len() {
            if i < paired {
                out.push_str(if inside { close } else { open });
                inside = !inside;
            } else {
                out.push_str(delim);
            }
        }
    }
    out
}
