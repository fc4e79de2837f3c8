// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A full activation over a small page: show labels, narrow, select.
//!
//! A three-letter alphabet keeps labels two characters wide so narrowing is
//! visible. Every side effect the session asks of its host is printed as it happens.
//! Set `RUST_LOG=keyhop=trace` to also see the session's own logs.
//!
//! Run:
//! - `cargo run -p keyhop_demos --example session_basics`

use keyhop::adapters::scene::SceneHost;
use keyhop::config::Config;
use keyhop::event::RawEvent;
use keyhop::session::Session;
use keyhop_scene::{Attributes, Cursor, LocalNode, Scene, Tag};
use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut scene = Scene::new(Size::new(800.0, 600.0));
    let body = scene.insert(None, LocalNode::new(Tag::Body, Rect::new(0.0, 0.0, 800.0, 1600.0)));
    let nav = scene.insert(Some(body), LocalNode::new(Tag::Div, Rect::new(0.0, 0.0, 800.0, 40.0)));
    for (i, href) in ["/", "/docs", "/blog"].into_iter().enumerate() {
        let x = 10.0 + 90.0 * i as f64;
        scene.insert(Some(nav), LocalNode::link(Rect::new(x, 10.0, x + 80.0, 30.0), href));
    }
    scene.insert(Some(body), LocalNode::new(Tag::Input, Rect::new(200.0, 120.0, 600.0, 150.0)));
    scene.insert(Some(body), LocalNode::new(Tag::Button, Rect::new(360.0, 280.0, 440.0, 310.0)));
    scene.insert(
        Some(body),
        LocalNode::new(Tag::Div, Rect::new(40.0, 400.0, 300.0, 480.0)).with_cursor(Cursor::Pointer),
    );
    scene.insert(
        Some(body),
        LocalNode::new(Tag::Span, Rect::new(500.0, 400.0, 700.0, 420.0)).with_attributes(Attributes::ONCLICK),
    );
    // Below the fold: never labeled.
    scene.insert(Some(body), LocalNode::new(Tag::Button, Rect::new(10.0, 1200.0, 90.0, 1230.0)));
    scene.commit();

    let mut session = match Session::new(SceneHost::new(scene), Config::default().with_alphabet("ASD")) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return;
        }
    };

    for key in ["f", "s", "Backspace", "d"] {
        match session.handle(RawEvent::key(key)) {
            Ok(disposition) => println!("{key:>9} -> {disposition:?}, mode {:?}", session.mode()),
            Err(err) => {
                eprintln!("{key}: {err}");
                return;
            }
        }
        for hint in session.hints() {
            println!("           {:>3} {:?} top={} right={}", hint.label, hint.element, hint.placement.top, hint.placement.right);
        }
        for effect in session.host_mut().take_effects() {
            println!("           effect {effect:?}");
        }
        if session.host_mut().take_turn_request() {
            session.run_deferred();
            for effect in session.host_mut().take_effects() {
                println!("           next turn {effect:?}");
            }
        }
    }
}
