//! Markdown-to-speakable-text extraction
//!
//! Turns raw markdown into clean prose for synthesis: formatting is
//! dropped, code blocks and images are discarded, link text survives
//! without its URL, and block boundaries become sentence breaks so the
//! voice pauses where a reader would.

use std::sync::OnceLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s)]+").expect("must be valid regex"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("must be valid regex"))
}

/// Extract speakable plain text from markdown
///
/// Pure and deterministic: the same input always yields the same output.
/// Empty or whitespace-only input yields an empty string; callers decide
/// whether that is an error.
pub fn extract(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES);

    let mut out = String::with_capacity(markdown.len());
    // Depth of enclosing constructs whose contents are not speech
    // (code blocks, images, inline HTML containers)
    let mut mute_depth = 0usize;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Image { .. }) => mute_depth += 1,
            Event::End(TagEnd::CodeBlock | TagEnd::Image) => {
                mute_depth = mute_depth.saturating_sub(1);
            }
            Event::Text(text) if mute_depth == 0 => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak if mute_depth == 0 => out.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::BlockQuote(_)
                | TagEnd::TableHead
                | TagEnd::TableRow,
            ) if mute_depth == 0 => push_sentence_break(&mut out),
            Event::End(TagEnd::TableCell) if mute_depth == 0 => out.push(' '),
            // Inline code, raw HTML, math, and footnote markers are not prose
            _ => {}
        }
    }

    clean(&out)
}

/// Append a sentence break unless the text already ends in terminal
/// punctuation
fn push_sentence_break(out: &mut String) {
    match out.trim_end().chars().last() {
        None => {}
        Some('.' | '!' | '?' | ':' | ';') => out.push(' '),
        Some(_) => {
            let trimmed_len = out.trim_end().len();
            out.truncate(trimmed_len);
            out.push_str(". ");
        }
    }
}

/// Normalize extracted text for synthesis
///
/// Bare URLs and e-mail addresses don't read well aloud; they are
/// dropped along with any whitespace runs they leave behind.
fn clean(text: &str) -> String {
    let text = url_re().replace_all(text, "");
    let text = email_re().replace_all(&text, "");

    let mut out = String::with_capacity(text.len());
    let mut last_space = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else if matches!(ch, ',' | '.' | '!' | '?' | ';' | ':') && last_space && !out.is_empty() {
            // Re-attach punctuation orphaned by a removed URL
            out.truncate(out.trim_end().len());
            out.push(ch);
            last_space = false;
        } else {
            out.push(ch);
            last_space = false;
        }
    }

    out.trim().to_string()
}

/// Word-boundary-aware prefix of `text`, at most `max_len` characters
/// plus an ellipsis when truncated
pub fn preview(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let prefix: String = text.chars().take(max_len).collect();
    let cut = match prefix.rfind(' ') {
        // Only back up to a space when it doesn't cost half the preview
        Some(pos) if pos > max_len / 2 => pos,
        _ => prefix.len(),
    };

    format!("{}...", prefix[..cut].trim_end())
}
