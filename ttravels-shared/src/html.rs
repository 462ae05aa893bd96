/// Escapes text for insertion into element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes, then turns newlines into `<br>`.
pub fn escape_multiline(text: &str) -> String {
    escape(text).replace('\n', "<br>")
}

/// True when the text contains something shaped like an opening tag (`<p`, `<div class=..>`).
pub fn looks_like_markup(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| {
        *b == b'<'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic)
            && bytes[i + 1..].contains(&b'>')
    })
}

/// Column budget for text layout; wide enough that sentences stay on one line.
const TEXT_WIDTH: usize = 4096;

/// Visible text of an HTML fragment laid out as lines, without decoration
/// markers (no `**`, link footnotes or bullets). Script and style bodies are
/// dropped and entities decoded.
pub fn text_lines(html: &str) -> String {
    html2text::config::plain_no_decorate()
        .string_from_read(html.as_bytes(), TEXT_WIDTH)
        .unwrap_or_else(|_| html.to_string())
}

/// Visible text of an HTML fragment with whitespace runs collapsed. Inline
/// elements do not split words.
pub fn plain_text(html: &str) -> String {
    text_lines(html).split_whitespace().collect::<Vec<_>>().join(" ")
}
