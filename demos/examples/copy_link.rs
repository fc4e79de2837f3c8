// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Copy mode: `y` then `f` labels only links with an address, and selecting
//! one writes the address to the clipboard instead of clicking it.
//!
//! Also shows the chord timing out when the second key never comes.
//!
//! Run:
//! - `cargo run -p keyhop_demos --example copy_link`

use core::time::Duration;

use keyhop::adapters::scene::SceneHost;
use keyhop::config::Config;
use keyhop::event::RawEvent;
use keyhop::host::Surface;
use keyhop::session::Session;
use keyhop_scene::{LocalNode, Scene, Tag};
use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let mut scene = Scene::new(Size::new(640.0, 480.0));
    let body = scene.insert(None, LocalNode::new(Tag::Body, Rect::new(0.0, 0.0, 640.0, 480.0)));
    scene.insert(Some(body), LocalNode::link(Rect::new(20.0, 20.0, 200.0, 40.0), "https://example.com/a"));
    scene.insert(Some(body), LocalNode::link(Rect::new(300.0, 220.0, 400.0, 240.0), "https://example.com/b"));
    // Clickable, but has no address to copy.
    scene.insert(Some(body), LocalNode::new(Tag::Button, Rect::new(300.0, 300.0, 380.0, 330.0)));
    scene.commit();

    let config = Config::default().with_chord_timeout(Duration::from_millis(250));
    let Ok(mut session) = Session::new(SceneHost::new(scene), config) else {
        eprintln!("invalid configuration");
        return;
    };

    // The chord times out: the host fires the timer and the session returns to rest.
    let _ = session.handle(RawEvent::key("y"));
    println!("after y: {:?}", session.mode());
    let timers = session.host().pending_timers().to_vec();
    for id in timers {
        session.host_mut().fire_timer(id);
        session.on_timer(id);
    }
    println!("after timeout: {:?}", session.mode());

    // The chord completes.
    for key in ["y", "f"] {
        let _ = session.handle(RawEvent::key(key));
    }
    println!("copy mode: {}, labels:", session.is_copy_mode());
    for hint in session.hints() {
        println!("  {} -> {:?}", hint.label, session.host().href(hint.element));
    }

    let _ = session.handle(RawEvent::key("a"));
    session.run_deferred();
    println!("clipboard: {:?}", session.host().clipboard());
}
