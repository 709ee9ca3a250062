//! Main App Component

use chat_core::{ClientConfig, DocumentFetcher, HttpDocumentSource, Message, parse_transcript};
use leptos::prelude::*;

use crate::pages::ChatPage;

/// Id of the `<script type="application/json">` element a host page uses to
/// hand over the conversation to show
pub const TRANSCRIPT_ELEMENT_ID: &str = "chat-transcript";

/// Configuration baked in at build time; an unset or empty base URL means
/// the page's own origin
fn client_config() -> ClientConfig {
    let config = ClientConfig::from_env();
    if option_env!("CHAT_API_BASE_URL").is_some_and(|base| !base.is_empty()) {
        return config;
    }

    match web_sys::window().and_then(|w| w.location().origin().ok()) {
        Some(origin) => config.with_base_url(origin),
        None => config,
    }
}

/// Messages embedded by the host page, or a greeting when there are none
fn initial_transcript() -> Vec<Message> {
    let embedded = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(TRANSCRIPT_ELEMENT_ID))
        .and_then(|el| el.text_content());

    let greeting = || vec![Message::bot("Hi! Ask me about your **course material**.")];

    match embedded {
        Some(json) => match parse_transcript(&json) {
            Ok(messages) => {
                tracing::info!(count = messages.len(), "loaded transcript from page");
                messages
            }
            Err(e) => {
                tracing::error!(error = %e, "ignoring malformed transcript");
                greeting()
            }
        },
        None => greeting(),
    }
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let config = client_config();
    tracing::debug!(base_url = %config.base_url, "document client configured");

    let fetcher = DocumentFetcher::new(HttpDocumentSource::from_config(&config));

    view! {
        <main class="app">
            <ChatPage
                fetcher=fetcher
                release_after=config.release_after()
                initial=initial_transcript()
            />
        </main>
    }
}
