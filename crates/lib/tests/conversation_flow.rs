//! Integration test: drive the view controller the way the desktop app does, against the
//! default config, with the reply delay shortened.

use chrono::Utc;
use lib::assistant::SimulatedReply;
use lib::config::Config;
use lib::context::ContextRegistry;
use lib::conversation::ConversationStore;
use lib::message::Role;
use lib::view::{InputState, Tab, ViewController};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

const FAST_REPLY: Duration = Duration::from_millis(5);

fn fast_config() -> Config {
    let mut config = Config::default();
    config.assistant.reply_delay_ms = 5;
    config
}

/// Default template and greeting with a short delay. Builds the generator directly so
/// LIFEOS_REPLY_DELAY_MS in the environment cannot stretch the reply past `wait_idle`.
fn fast_view() -> ViewController {
    let config = Config::default();
    let generator = SimulatedReply::new(FAST_REPLY, config.assistant.reply_template.clone());
    let mut store = ConversationStore::new(Arc::new(generator), Handle::current());
    if let Some(greeting) = config.assistant.greeting {
        store = store.with_greeting(greeting);
    }
    let contexts = ContextRegistry::seeded(Utc::now(), config.contexts.default_description);
    ViewController::new(store, contexts)
}

async fn wait_idle(view: &mut ViewController) {
    for _ in 0..100 {
        view.poll();
        if view.input_state() == InputState::Idle {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("reply did not arrive within 500ms");
}

#[tokio::test]
async fn adding_a_context_keeps_seed_order() {
    let config = fast_config();
    let mut view = ViewController::from_config(
        &config,
        Path::new("/nonexistent/config.json"),
        Handle::current(),
        None,
        None,
    );
    let seed: Vec<String> = view.contexts().iter().map(|c| c.name.clone()).collect();
    assert_eq!(seed.len(), 5);

    view.select_tab(Tab::Contexts);
    view.open_dialog();
    view.dialog_mut().expect("dialog open").name = "Q4 Planning".to_string();
    assert!(view.create_context());

    let names: Vec<String> = view.contexts().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names.len(), 6);
    assert_eq!(names[0], "q4-planning");
    assert_eq!(&names[1..], &seed[..]);
    assert_eq!(view.active_tab(), Tab::Contexts);
}

#[tokio::test]
async fn replies_follow_their_user_message() {
    let mut view = fast_view();
    // Greeting is preloaded.
    assert_eq!(view.messages().len(), 1);
    assert_eq!(view.messages()[0].role, Role::Assistant);

    for text in ["first question", "  second question  "] {
        view.input = text.to_string();
        assert!(view.submit_input());
        view.input = "too soon".to_string();
        assert!(!view.submit_input());
        view.input.clear();
        wait_idle(&mut view).await;
    }

    let thread: Vec<(Role, &str)> = view
        .messages()
        .iter()
        .skip(1)
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(thread.len(), 4);
    assert_eq!(thread[0], (Role::User, "first question"));
    assert_eq!(thread[1].0, Role::Assistant);
    assert!(thread[1].1.contains("\"first question\""));
    assert_eq!(thread[2], (Role::User, "second question"));
    assert_eq!(thread[3].0, Role::Assistant);
    assert!(thread[3].1.contains("\"second question\""));
}

#[tokio::test]
async fn disabled_seed_and_greeting() {
    let mut config = fast_config();
    config.contexts.seed = false;
    config.assistant.greeting = None;
    let view = ViewController::from_config(
        &config,
        Path::new("/nonexistent/config.json"),
        Handle::current(),
        None,
        None,
    );
    assert!(view.contexts().is_empty());
    assert!(view.messages().is_empty());
}
