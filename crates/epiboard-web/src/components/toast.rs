//! Toast notifications for save and delete outcomes

use leptos::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }

    /// Errors stay on screen longer
    fn lifetime(&self) -> Duration {
        match self {
            ToastKind::Success => Duration::from_millis(3000),
            ToastKind::Error => Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Toast {
    id: usize,
    message: String,
    kind: ToastKind,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<usize>,
}

impl ToastContext {
    fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let id = self.next_id.get_value();
        self.next_id.update_value(|n| *n += 1);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                message: message.into(),
                kind,
            })
        });

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|toasts| toasts.retain(|t| t.id != id)),
            kind.lifetime(),
        );
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    fn dismiss(&self, id: usize) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }
}

/// Wraps the app root and renders the active toasts
#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    let context = ToastContext::new();
    provide_context(context);

    view! {
        {children()}
        <div class="toast-container" aria-live="polite">
            <For
                each=move || context.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class()>
                            <span class="toast-message">{toast.message}</span>
                            <button
                                class="toast-close"
                                on:click=move |_| context.dismiss(id)
                                aria-label="Dismiss"
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

pub fn use_toast() -> ToastContext {
    expect_context::<ToastContext>()
}
