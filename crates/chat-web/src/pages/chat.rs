//! Chat Page

use std::time::Duration;

use chat_core::{DocumentFetcher, HttpDocumentSource, Message};
use chrono::Utc;
use leptos::prelude::*;

use crate::components::MessageView;

#[component]
pub fn ChatPage(
    fetcher: DocumentFetcher<HttpDocumentSource>,
    release_after: Duration,
    #[prop(optional)] initial: Vec<Message>,
) -> impl IntoView {
    let (messages, set_messages) = signal(initial);
    let (input, set_input) = signal(String::new());

    let send = move |()| {
        let text = input.get();
        if text.trim().is_empty() {
            return;
        }

        set_messages.update(|msgs| {
            msgs.push(Message::user(text).with_created_at(Utc::now()));
        });
        set_input.set(String::new());
    };

    view! {
        <div class="chat">
            <main class="chat-main">
                <div class="messages">
                    // Transcript is append-only, so positions are stable keys
                    <For
                        each=move || messages.get().into_iter().enumerate()
                        key=|(index, _)| *index
                        children=move |(_, msg)| view! {
                            <MessageView
                                message=msg
                                fetcher=fetcher.clone()
                                release_after=release_after
                            />
                        }
                    />
                </div>

                <div class="input-area">
                    <textarea
                        placeholder="Ask anything..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send(());
                            }
                        }
                    />
                    <button on:click=move |_| send(())>"Send"</button>
                </div>
            </main>
        </div>
    }
}
