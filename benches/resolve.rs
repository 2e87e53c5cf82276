#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use wireup::{AppScope, Injector, InjectorRegistry, InstantiateErrorKind, Key, Target};

struct Config(u64);
struct Repo;
struct Service;

#[inline]
fn injector_with_bindings() -> Injector {
    let injector = Injector::new();
    injector.bind(Key::of::<Config>(), Target::instance(Config(42)), None);
    injector.bind(
        Key::of::<Repo>(),
        Target::factory(|| Ok::<_, InstantiateErrorKind>(Repo)),
        Some(&AppScope),
    );
    injector.bind(
        Key::of::<Service>(),
        Target::factory(|| Ok::<_, InstantiateErrorKind>(Service)),
        None,
    );
    injector
}

fn injector_bind(c: &mut Criterion) {
    c.bench_function("injector_bind", |b| b.iter(injector_with_bindings));
}

fn injector_get_unscoped(c: &mut Criterion) {
    let injector = injector_with_bindings();
    let key = Key::of::<Service>();
    c.bench_function("injector_get_unscoped", |b| {
        b.iter(|| injector.get_instance::<Service>(&key).unwrap());
    });
}

fn injector_get_app_scoped(c: &mut Criterion) {
    let injector = injector_with_bindings();
    let key = Key::of::<Repo>();
    c.bench_function("injector_get_app_scoped", |b| {
        b.iter(|| injector.get_instance::<Repo>(&key).unwrap());
    });
}

fn injector_get_instance_binding(c: &mut Criterion) {
    let injector = injector_with_bindings();
    let key = Key::of::<Config>();
    c.bench_function("injector_get_instance_binding", |b| {
        b.iter(|| injector.get_instance::<Config>(&key).unwrap());
    });
}

fn registry_get(c: &mut Criterion) {
    let registry = InjectorRegistry::new();
    registry.register(Arc::new(injector_with_bindings()));
    let key = Key::of::<Service>();
    c.bench_function("registry_get", |b| {
        b.iter(|| registry.get_instance::<Service>(&key).unwrap());
    });
}

criterion_group!(
    benches,
    injector_bind,
    injector_get_unscoped,
    injector_get_app_scoped,
    injector_get_instance_binding,
    registry_get
);
criterion_main!(benches);
