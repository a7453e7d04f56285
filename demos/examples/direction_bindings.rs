// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Language switching with per-element direction bindings.
//!
//! This example shows how a host framework might wire up:
//! - a `DirectionStore` configured from TOML and mirrored onto a document root,
//! - a few widgets whose `dir` attributes are driven by `DirectionBinding`s,
//! - the attach / input-changed / detach lifecycle.
//!
//! Run:
//! - `RUST_LOG=understory_direction=debug cargo run -p understory_demos --example direction_bindings`

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use understory_direction::{AttributeSink, DirectionBinding, DirectionStore, StoreOptions};

const CONFIG: &str = r#"
initial = "ltr"
rtl_languages = ["ar", "he", "fa", "dv", "ku", "ur", "ps", "yi"]
"#;

/// A toy DOM node: a name plus an attribute map shared with the binding.
#[derive(Clone, Debug, Default)]
struct Node {
    name: &'static str,
    attributes: Rc<RefCell<BTreeMap<String, String>>>,
}

impl Node {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn dir(&self) -> String {
        self.attributes
            .borrow()
            .get("dir")
            .cloned()
            .unwrap_or_else(|| "-".to_owned())
    }
}

impl AttributeSink for Node {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }
}

/// The framework side of a widget: it owns its binding and forwards lifecycle calls.
struct Widget {
    node: Node,
    binding: DirectionBinding<Node>,
}

impl Widget {
    fn mount(store: &DirectionStore, name: &'static str, dir_input: Option<&str>) -> Self {
        let node = Node::new(name);
        let mut binding = DirectionBinding::new(store.clone(), node.clone(), dir_input);
        binding.on_attach();
        Self { node, binding }
    }
}

fn print_tree(root: &Node, widgets: &[Widget]) {
    println!("  <{} dir={}>", root.name, root.dir());
    for widget in widgets {
        println!(
            "    <{} dir={}> ({:?})",
            widget.node.name,
            widget.node.dir(),
            widget.binding.mode()
        );
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let options: StoreOptions = match toml::from_str(CONFIG) {
        Ok(options) => options,
        Err(err) => {
            tracing::warn!(%err, "invalid direction config, using defaults");
            StoreOptions::default()
        }
    };

    let root = Node::new("html");
    let store = DirectionStore::with_options(options).with_root_sink(root.clone());

    let mut widgets = vec![
        Widget::mount(&store, "header", None),
        Widget::mount(&store, "code", Some("ltr")),
        Widget::mount(&store, "quote", Some("'rtl'")),
        Widget::mount(&store, "footer", Some("auto")),
    ];

    println!("initial:");
    print_tree(&root, &widgets);

    for language in ["he-IL", "yi", "en-GB"] {
        store.set_language(Some(language));
        println!("language {language}:");
        print_tree(&root, &widgets);
    }

    // The quote loses its override and follows the document again.
    widgets[2].binding.on_input_changed(None);
    store.set_language(Some("fa"));
    println!("quote override cleared, language fa:");
    print_tree(&root, &widgets);

    // A detached header keeps its last direction.
    widgets[0].binding.on_detach();
    store.set_language(Some("en"));
    println!("header detached, language en:");
    print_tree(&root, &widgets);

    println!("live subscriptions: {}", store.observer_count());
}
