//! Javadoc comment splitting.
//!
//! ```text
//! /**
//!  * Main text, possibly
//!  * over several lines.
//!  * @author a
//!  * @author b
//!  * @since 1.2
//!  */
//! ```
//!
//! becomes the text `Main text, possibly\nover several lines.` and the tags
//! `author = "a\nb"`, `since = "1.2"`.

use indexmap::IndexMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Javadoc {
    pub text: String,
    /// Tag name (without `@`) to values joined by `\n`, in first-seen order.
    pub tags: IndexMap<String, String>,
}

impl Javadoc {
    pub fn parse(comment: &str) -> Self {
        let body = comment.trim();
        let body = body.strip_prefix("/**").unwrap_or(body);
        let body = body.strip_suffix("*/").unwrap_or(body);

        let mut text_lines = Vec::new();
        let mut tags: IndexMap<String, String> = IndexMap::new();
        let mut current: Option<(String, String)> = None;

        for raw in body.lines() {
            let line = raw.trim();
            let line = line.strip_prefix('*').map(str::trim_start).unwrap_or(line);

            if let Some(tagged) = line.strip_prefix('@') {
                if let Some((tag, value)) = current.take() {
                    push_tag(&mut tags, tag, value);
                }
                let (tag, value) = tagged
                    .split_once(char::is_whitespace)
                    .unwrap_or((tagged, ""));
                current = Some((tag.to_string(), value.trim().to_string()));
            } else if let Some((_, value)) = current.as_mut() {
                if !line.is_empty() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(line);
                }
            } else {
                text_lines.push(line);
            }
        }
        if let Some((tag, value)) = current {
            push_tag(&mut tags, tag, value);
        }

        while text_lines.first().is_some_and(|l| l.is_empty()) {
            text_lines.remove(0);
        }
        while text_lines.last().is_some_and(|l| l.is_empty()) {
            text_lines.pop();
        }

        Self {
            text: text_lines.join("\n"),
            tags,
        }
    }
}

fn push_tag(tags: &mut IndexMap<String, String>, tag: String, value: String) {
    match tags.get_mut(&tag) {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(&value);
        }
        None => {
            tags.insert(tag, value);
        }
    }
}
