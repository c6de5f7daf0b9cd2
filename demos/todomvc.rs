//! Scripted todo list session against the headless DOM.
//!
//! Run with `RUST_LOG=rivulet=debug cargo run --example todomvc` to watch
//! every action pass through the loop.

use rivulet::drivers::dom::{DomEvent, Key};
use rivulet::todo::{bootstrap, TodoConfig, UuidIds};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r##"{
    "run": { "log_actions": true },
    "root": "#root",
    "todos": [
        { "id": "seed-1", "title": "Taste JavaScript", "completed": true },
        { "id": "seed-2", "title": "Buy a unicorn" }
    ]
}"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rivulet=info")))
        .init();

    let config = TodoConfig::from_json(CONFIG)?;
    let app = bootstrap(config, Rc::new(UuidIds))?;
    let dom = app.dom();

    println!("Todo list session");
    println!("=================\n");
    println!("Started with {} entries", dom.count(".todo-list li"));

    for title in ["Walk the dog", "Write the report"] {
        dom.dispatch(".new-todo", DomEvent::Input { value: title.to_string() })?;
        dom.dispatch(
            ".new-todo",
            DomEvent::KeyUp {
                key: Key::Enter,
                value: title.to_string(),
            },
        )?;
        println!("Added {title:?}");
    }

    dom.dispatch("li[data-id=seed-2] .toggle", DomEvent::Change { checked: true })?;
    println!("Completed \"Buy a unicorn\"");

    dom.dispatch("a[href='#/active']", DomEvent::Click)?;
    println!(
        "Active filter at {}: {} entries shown",
        app.history().location().unwrap_or_default(),
        dom.count(".todo-list li")
    );

    dom.dispatch(".clear-completed", DomEvent::Click)?;
    app.history().go("#/");

    println!("\nFinal list:");
    if let Some(state) = app.state() {
        for todo in &state.todos {
            let mark = if todo.completed { "x" } else { " " };
            println!("  [{mark}] {}", todo.title);
        }
    }
    println!("{}", dom.text(".todo-count").unwrap_or_default());

    app.stop();
    Ok(())
}
