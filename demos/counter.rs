//! A parent scope provides a counter; two consecutive child views use it.
//!
//! Run with `RUST_LOG=debug cargo run --example counter` to see the
//! provide, materialize and evict events.

use std::cell::Cell;
use std::rc::Rc;

use scoped_inject::{Class, LoggingObserver, MetricsObserver, Provider, Scope};

#[derive(Default)]
struct Counter {
    value: Cell<i32>,
}

impl Counter {
    fn increment(&self) {
        self.value.set(self.value.get() + 1);
    }
}

const COUNTER: Class<Counter> = Class::new();

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let app = Scope::root();
    let metrics = Rc::new(MetricsObserver::new());
    app.add_observer(Rc::new(LoggingObserver::with_prefix("[demo]")));
    app.add_observer(metrics.clone());

    app.provide(&COUNTER, Provider::class())?;

    let b = app.child_labeled("B");
    let counter = b.inject(&COUNTER)?;
    counter.increment();
    counter.increment();
    println!("{} sees {}", b.path(), counter.value.get());
    b.destroy();

    let c = app.child_labeled("C");
    let counter = c.inject(&COUNTER)?;
    println!("{} sees {}", c.path(), counter.value.get());

    for binding in app.bindings() {
        println!("{binding}");
    }
    c.destroy();

    let totals = metrics.snapshot();
    println!(
        "materialized {} times, evicted {} times",
        totals.materializations, totals.evictions
    );
    Ok(())
}
