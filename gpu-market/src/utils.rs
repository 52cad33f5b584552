/// Text processing utilities
pub mod text {
    /// Remove markup from feed summaries and collapse whitespace.
    ///
    /// A `<` only opens a tag when a letter, `/` or `!` follows it, so plain
    /// comparisons such as "a < b" survive.
    pub fn strip_html(html: &str) -> String {
        let mut text = String::with_capacity(html.len());
        let mut in_tag = false;
        let mut chars = html.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '<' if !in_tag
                    && chars.peek().is_some_and(|next| next.is_ascii_alphabetic() || *next == '/' || *next == '!') =>
                {
                    in_tag = true;
                }
                '>' if in_tag => {
                    // Tags separate words
                    text.push(' ');
                    in_tag = false;
                }
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }

        decode_entities(&text).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn decode_entities(text: &str) -> String {
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    /// Truncate text to at most `max_chars` characters, trying to break at
    /// sentence or word boundaries
    pub fn smart_truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }

        let cut = text.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(text.len());
        let truncated = &text[..cut];

        if let Some(last_sentence) = truncated.rfind(". ") {
            truncated[..last_sentence + 1].to_string()
        } else if let Some(last_space) = truncated.rfind(' ') {
            format!("{}...", &truncated[..last_space])
        } else {
            format!("{}...", truncated)
        }
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Extract domain from URL
    pub fn extract_domain(url_str: &str) -> Option<String> {
        Url::parse(url_str).ok()?.domain().map(|d| d.to_string())
    }
}
