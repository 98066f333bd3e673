use criterion::{criterion_group, criterion_main, Criterion};
use routable::options::RouteOptions;
use routable::router::{matches, RouteTemplate};
use routable::runtime_config::RouterConfig;
use routable::screen::PlaceholderScreen;
use routable::Router;
use std::hint::black_box;

const TEMPLATES: &[&str] = &[
    "home",
    "inbox",
    "settings/account",
    "users/:id",
    "users/:id/posts/:post_id",
    "shops/:shop/orders/:order/items/:item",
    "complex/:a/:b/:c/:d/:e/:f/:g/:h",
];

const PATHS: &[&str] = &[
    "home",
    "users/123",
    "users/123/posts/456",
    "shops/7/orders/88/items/9",
    "complex/1/2/3/4/5/6/7/8",
];

fn build_router(config: RouterConfig) -> Router {
    let router = Router::with_config(config);
    // Filler routes ahead of the interesting ones so the scan has work to do
    for i in 0..200 {
        router
            .map(
                &format!("filler{i}/:id"),
                PlaceholderScreen::factory("filler"),
                RouteOptions::new(),
            )
            .expect("map filler route");
    }
    for template in TEMPLATES {
        router
            .map(
                template,
                PlaceholderScreen::factory(*template),
                RouteOptions::new(),
            )
            .expect("map route");
    }
    router
}

fn bench_resolve_cached(c: &mut Criterion) {
    let router = build_router(RouterConfig::default());
    c.bench_function("resolve_cached", |b| {
        b.iter(|| {
            for path in PATHS {
                let res = router.resolve(black_box(path));
                black_box(&res);
            }
        })
    });
}

fn bench_resolve_uncached(c: &mut Criterion) {
    let router = build_router(RouterConfig {
        resolve_cache: false,
        ..RouterConfig::default()
    });
    c.bench_function("resolve_uncached", |b| {
        b.iter(|| {
            for path in PATHS {
                let res = router.resolve(black_box(path));
                black_box(&res);
            }
        })
    });
}

fn bench_template_match(c: &mut Criterion) {
    let template = RouteTemplate::parse("shops/:shop/orders/:order/items/:item");
    c.bench_function("template_match", |b| {
        b.iter(|| black_box(matches(&template, black_box("shops/7/orders/88/items/9"))))
    });
}

criterion_group!(
    benches,
    bench_resolve_cached,
    bench_resolve_uncached,
    bench_template_match
);
criterion_main!(benches);
