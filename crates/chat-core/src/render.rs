//! Message Rendering
//!
//! Bot messages are markdown, user messages are shown verbatim.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

use crate::message::Message;

/// Renderable body of a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderedBody {
    /// Literal text, to be inserted as a text node
    Plain(String),
    /// HTML produced from markdown
    Markdown(String),
}

impl RenderedBody {
    pub fn is_markdown(&self) -> bool {
        matches!(self, RenderedBody::Markdown(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RenderedBody::Plain(s) | RenderedBody::Markdown(s) => s,
        }
    }
}

/// Select plain or markdown rendering for a message
pub fn render_message(message: &Message) -> RenderedBody {
    if message.is_bot {
        RenderedBody::Markdown(render_markdown_to_html(&message.text))
    } else {
        RenderedBody::Plain(message.text.clone())
    }
}

/// URL schemes a link or image may point at
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Whether a link target is relative or uses an allowed scheme
pub fn is_safe_url(url: &str) -> bool {
    // Browsers ignore ASCII whitespace and control characters inside a scheme
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();

    let scheme_end = cleaned.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(idx) if cleaned[idx..].starts_with(':') => {
            let scheme = &cleaned[..idx];
            ALLOWED_SCHEMES
                .iter()
                .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
        }
        _ => true,
    }
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) { url } else { CowStr::Borrowed("") }
}

/// Render markdown to HTML.
///
/// Raw HTML in the source comes out as escaped text; link and image targets
/// outside http, https, mailto and relative URLs are blanked.
pub fn render_markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}
