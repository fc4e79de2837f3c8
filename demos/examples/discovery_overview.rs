// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which elements get labels, and why the others do not.
//!
//! The page mixes the cases discovery has to decide on: an element scrolled
//! out of view, one too small to click, one covered by a modal, a button
//! nested in another button, and a link wrapping an image.
//!
//! Run:
//! - `cargo run -p keyhop_demos --example discovery_overview`

use keyhop::adapters::scene::SceneHost;
use keyhop::discovery::{DiscoveryOptions, discover};
use keyhop::labels::{Alphabet, assign_labels};
use keyhop_scene::{LocalNode, NodeId, Scene, Tag};
use kurbo::{Rect, Size, Vec2};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keyhop=trace")))
        .init();

    let mut scene = Scene::new(Size::new(800.0, 600.0));
    let body = scene.insert(None, LocalNode::new(Tag::Body, Rect::new(0.0, 0.0, 800.0, 2000.0)));
    let mut names: Vec<(NodeId, &str)> = Vec::new();
    let mut add = |scene: &mut Scene, parent: NodeId, name: &'static str, node: LocalNode| {
        let id = scene.insert(Some(parent), node);
        names.push((id, name));
        id
    };

    add(&mut scene, body, "scrolled away", LocalNode::new(Tag::Button, Rect::new(10.0, 20.0, 90.0, 50.0)));
    add(&mut scene, body, "tiny", LocalNode::new(Tag::Button, Rect::new(10.0, 220.0, 13.0, 223.0)));
    add(&mut scene, body, "plain", LocalNode::new(Tag::Button, Rect::new(100.0, 220.0, 180.0, 250.0)));
    let outer = add(&mut scene, body, "outer button", LocalNode::new(Tag::Button, Rect::new(200.0, 220.0, 400.0, 300.0)));
    add(&mut scene, outer, "inner button", LocalNode::new(Tag::Button, Rect::new(210.0, 230.0, 260.0, 260.0)));
    let link = add(&mut scene, body, "image link", LocalNode::link(Rect::new(420.0, 220.0, 600.0, 320.0), "/photo"));
    add(&mut scene, link, "image", LocalNode::new(Tag::Image, Rect::new(430.0, 230.0, 590.0, 310.0)).with_cursor(keyhop_scene::Cursor::Pointer));
    add(&mut scene, body, "under modal", LocalNode::new(Tag::Button, Rect::new(100.0, 500.0, 180.0, 530.0)));
    add(&mut scene, body, "modal", LocalNode::new(Tag::Div, Rect::new(0.0, 450.0, 800.0, 700.0)).with_z_index(10));
    scene.set_scroll(Vec2::new(0.0, 200.0));
    scene.commit();

    let host = SceneHost::new(scene);
    let name = |id: NodeId| names.iter().find(|(n, _)| *n == id).map_or("?", |(_, s)| *s);
    for copy_mode in [false, true] {
        let options = DiscoveryOptions {
            copy_mode,
            ..Default::default()
        };
        let hints = match discover(&host, &options).and_then(|targets| assign_labels(&host, targets, &Alphabet::default())) {
            Ok(hints) => hints,
            Err(err) => {
                eprintln!("discovery failed: {err}");
                return;
            }
        };
        println!("copy_mode={copy_mode}:");
        for hint in &hints {
            println!("  {:>2}  {}", hint.label, name(hint.element));
        }
    }
}
