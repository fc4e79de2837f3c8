// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use keyhop::adapters::scene::SceneHost;
use keyhop::config::Config;
use keyhop::discovery::{DiscoveryOptions, discover};
use keyhop::event::RawEvent;
use keyhop::labels::{Alphabet, assign_labels, generate_labels};
use keyhop::session::Session;
use keyhop_scene::{Attributes, LocalNode, Scene, Tag};
use kurbo::{Rect, Size};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A page of `rows` cards, each a wrapper holding a link, a button, and some text.
fn gen_card_page(rows: usize, viewport: Size) -> Scene {
    let mut scene = Scene::new(viewport);
    let page_h = rows as f64 * 60.0;
    let body = scene.insert(
        None,
        LocalNode::new(Tag::Body, Rect::new(0.0, 0.0, viewport.width, page_h)),
    );
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for row in 0..rows {
        let y = row as f64 * 60.0;
        let card = scene.insert(
            Some(body),
            LocalNode::new(Tag::Div, Rect::new(0.0, y, viewport.width, y + 56.0)),
        );
        let x = rng.next_f64() * (viewport.width - 300.0);
        scene.insert(
            Some(card),
            LocalNode::link(Rect::new(x, y + 4.0, x + 120.0, y + 24.0), "/item"),
        );
        scene.insert(
            Some(card),
            LocalNode::new(Tag::Button, Rect::new(x + 140.0, y + 4.0, x + 200.0, y + 28.0)),
        );
        scene.insert(
            Some(card),
            LocalNode::new(Tag::Span, Rect::new(x, y + 30.0, x + 280.0, y + 50.0))
                .with_attributes(Attributes::ONCLICK),
        );
    }
    scene.commit();
    scene
}

fn bench_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_labels");
    let alphabet = Alphabet::default();
    for &n in &[15usize, 225, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n{}", n), |b| {
            b.iter(|| black_box(generate_labels(black_box(n), &alphabet)));
        });
    }
    group.finish();
}

fn bench_discover(c: &mut Criterion) {
    let mut group = c.benchmark_group("discover");
    for &rows in &[16usize, 256, 2048] {
        let host = SceneHost::new(gen_card_page(rows, Size::new(1280.0, 800.0)));
        group.throughput(Throughput::Elements((rows * 4) as u64));
        group.bench_function(format!("rows{}", rows), |b| {
            b.iter(|| {
                let targets = discover(&host, &DiscoveryOptions::default()).unwrap();
                black_box(targets.len());
            });
        });
        group.bench_function(format!("rows{}_copy", rows), |b| {
            let options = DiscoveryOptions {
                copy_mode: true,
                ..Default::default()
            };
            b.iter(|| black_box(discover(&host, &options).unwrap().len()));
        });
        group.bench_function(format!("rows{}_with_labels", rows), |b| {
            let alphabet = Alphabet::default();
            b.iter(|| {
                let targets = discover(&host, &DiscoveryOptions::default()).unwrap();
                let hints = assign_labels(&host, targets, &alphabet).unwrap();
                black_box(hints.len());
            });
        });
    }
    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    for &rows in &[16usize, 256] {
        let scene = gen_card_page(rows, Size::new(1280.0, 800.0));
        group.bench_function(format!("activate_select_rows{}", rows), |b| {
            b.iter_batched(
                || Session::new(SceneHost::new(scene.clone()), Config::default()).unwrap(),
                |mut session| {
                    session.handle(RawEvent::key("f")).unwrap();
                    for key in ["a", "a"] {
                        session.handle(RawEvent::key(key)).unwrap();
                    }
                    session.run_deferred();
                    black_box(session.mode());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_labels, bench_discover, bench_session);
criterion_main!(benches);
