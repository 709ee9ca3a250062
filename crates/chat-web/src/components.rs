//! UI Components

use std::time::Duration;

use chat_core::{
    DocumentControl, DocumentFetcher, FetchState, HttpDocumentSource, Message, RenderedBody,
    render_message,
};
use leptos::ev::MouseEvent;
use leptos::prelude::*;

use crate::browser::{BrowserTimer, BrowserViewer};

/// Message bubble with an optional document button
///
/// Bot text is rendered as markdown, user text verbatim. The button only
/// exists when the message names a document; it is disabled while a fetch is
/// in flight.
#[component]
pub fn MessageView(
    message: Message,
    fetcher: DocumentFetcher<HttpDocumentSource>,
    /// How long an opened document's object URL stays valid
    release_after: Duration,
) -> impl IntoView {
    let role = message.author_label();
    let class = format!("message message-{role}");
    let time = message.time_label();
    let control = DocumentControl::for_message(&message);

    let body = match render_message(&message) {
        RenderedBody::Markdown(html) => {
            view! { <div class="content markdown" inner_html=html></div> }.into_any()
        }
        RenderedBody::Plain(text) => view! { <p class="content">{text}</p> }.into_any(),
    };

    let (state, set_state) = signal(FetchState::Idle);

    let open_document = move |ev: MouseEvent| {
        ev.prevent_default();
        if !set_state.try_update(FetchState::begin).unwrap_or(false) {
            return;
        }

        let fetcher = fetcher.clone();
        let message = message.clone();
        leptos::task::spawn_local(async move {
            let result = fetcher
                .open_with_release(&message, BrowserViewer, &BrowserTimer, release_after)
                .await;
            if let Err(e) = &result {
                tracing::warn!(document = %message.document_name, error = %e, "opening document failed");
            }
            set_state.update(|state| state.settle(&result));
        });
    };

    view! {
        <div class=class>
            <span class="role">{role}</span>
            {time.map(|t| view! { <span class="time">{t}</span> })}
            {body}
            {control.map(|control| {
                let name = control.document_name().to_string();
                let label_control = control.clone();
                view! {
                    <div class="document">
                        <button
                            class="btn document-open"
                            title=name.clone()
                            disabled=move || control.is_disabled(&state.get())
                            on:click=open_document
                        >
                            {move || label_control.label(&state.get())}
                        </button>
                        <span class="document-name">{name}</span>
                        {move || state.get().notice().map(|n| view! {
                            <span class="document-notice">{n}</span>
                        })}
                    </div>
                }
            })}
        </div>
    }
}
