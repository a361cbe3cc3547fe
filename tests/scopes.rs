use scoped_inject::{injectable, Class, DiError, Key, Provider, Scope};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct Counter {
    value: Cell<i32>,
}

const COUNTER: Class<Counter> = Class::new();

#[test]
fn test_singleton_while_live_across_siblings() {
    let root = Scope::root();
    root.provide(&COUNTER, Provider::class()).unwrap();

    let left = root.child();
    let right = root.child();
    let a = left.inject(&COUNTER).unwrap();
    let b = right.inject(&COUNTER).unwrap();
    assert!(Rc::ptr_eq(&a, &b));

    // One sibling tearing down keeps the instance alive for the other
    left.destroy();
    assert!(root.bindings()[0].materialized);
    let c = right.inject(&COUNTER).unwrap();
    assert!(Rc::ptr_eq(&a, &c));

    right.destroy();
    assert!(!root.bindings()[0].materialized);
}

#[test]
fn test_eviction_and_recreate() {
    let root = Scope::root();
    root.provide(&COUNTER, Provider::class()).unwrap();

    let first_scope = root.child();
    let first = first_scope.inject(&COUNTER).unwrap();
    first.value.set(5);
    first_scope.destroy();

    let second_scope = root.child();
    let second = second_scope.inject(&COUNTER).unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(second.value.get(), 0);
    assert_eq!(root.bindings()[0].materializations, 2);
    assert_eq!(root.bindings()[0].evictions, 1);
}

#[test]
fn test_child_shadows_ancestor() {
    let root = Scope::root();
    root.provide(&COUNTER, Provider::value(Counter { value: Cell::new(1) }))
        .unwrap();

    let page = root.child_labeled("page");
    page.provide(&COUNTER, Provider::value(Counter { value: Cell::new(2) }))
        .unwrap();
    let widget = page.child_labeled("widget");

    assert_eq!(root.inject(&COUNTER).unwrap().value.get(), 1);
    assert_eq!(widget.inject(&COUNTER).unwrap().value.get(), 2);
    assert_eq!(widget.resolve_owner(&COUNTER).as_deref(), Some("root/page"));

    // Only the shadowing binding was touched by the widget
    assert_eq!(page.bindings()[0].live_count, 1);
    assert_eq!(root.bindings()[0].live_count, 1);
}

#[test]
fn test_shadowing_token_in_subtree() {
    let token = injectable(|| Counter::default());
    let root = Scope::root();
    let island = root.child_labeled("island");
    island.provide_token(&token).unwrap();

    let outside = root.child().inject(&token).unwrap();
    let inside = island.child().inject(&token).unwrap();
    assert!(!Rc::ptr_eq(&outside, &inside));
}

#[test]
fn test_destroy_runs_descendants_first() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let root = Scope::root();
    let page = root.child_labeled("page");
    let header = page.child_labeled("header");
    let body = page.child_labeled("body");
    let cell = body.child_labeled("cell");

    for scope in [&page, &header, &body, &cell] {
        let order = order.clone();
        let label = scope.label().to_string();
        scope
            .on_teardown(move || order.borrow_mut().push(label))
            .unwrap();
    }

    page.destroy();
    assert_eq!(*order.borrow(), vec!["cell", "body", "header", "page"]);
    assert!(cell.is_destroyed());
    assert!(header.is_destroyed());
    assert!(!root.is_destroyed());
}

#[test]
fn test_teardown_is_lifo_and_runs_once() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let scope = Scope::root();
    for i in 0..3 {
        let order = order.clone();
        scope.on_teardown(move || order.borrow_mut().push(i)).unwrap();
    }

    scope.destroy();
    scope.destroy();
    assert_eq!(*order.borrow(), vec![2, 1, 0]);
}

#[test]
fn test_destroying_parent_releases_child_consumers() {
    let root = Scope::root();
    root.provide(&COUNTER, Provider::class()).unwrap();
    let page = root.child();
    let widget = page.child();
    widget.inject(&COUNTER).unwrap();
    page.inject(&COUNTER).unwrap();
    assert_eq!(root.bindings()[0].live_count, 2);

    page.destroy();
    assert_eq!(root.bindings()[0].live_count, 0);
    assert!(!root.bindings()[0].materialized);
}

#[test]
fn test_operations_on_destroyed_scope_fail() {
    let root = Scope::root();
    let page = root.child_labeled("page");
    page.destroy();

    assert_eq!(
        page.inject(&COUNTER).unwrap_err(),
        DiError::ScopeDestroyed("root/page".to_string())
    );
    assert!(matches!(
        page.provide(&COUNTER, Provider::class()),
        Err(DiError::ScopeDestroyed(_))
    ));
    assert!(page.on_teardown(|| {}).is_err());
    assert!(page.set_context(Key::named("x"), 1u8).is_err());
}

#[test]
fn test_destroyed_scope_drops_its_bindings() {
    let root = Scope::root();
    let page = root.child();
    page.provide(&COUNTER, Provider::class()).unwrap();
    let widget = page.child();
    widget.inject(&COUNTER).unwrap();

    page.destroy();
    assert!(page.bindings().is_empty());
    assert!(matches!(
        root.inject(&COUNTER),
        Err(DiError::MissingProvider(_))
    ));
}

#[test]
fn test_context_inheritance() {
    let root = Scope::root();
    let key = Key::named("locale");
    root.set_context(key, String::from("en")).unwrap();

    let page = root.child();
    let widget = page.child();
    assert_eq!(widget.get_context::<String>(&key).unwrap().as_str(), "en");
    assert!(widget.get_own_context::<String>(&key).is_none());

    page.set_context(key, String::from("fr")).unwrap();
    assert_eq!(widget.get_context::<String>(&key).unwrap().as_str(), "fr");

    // Wrong type under the nearest key resolves to nothing
    assert!(widget.get_context::<u32>(&key).is_none());
}

#[test]
fn test_scope_paths() {
    let root = Scope::root();
    let page = root.child_labeled("page");
    let widget = page.child_labeled("widget");

    assert_eq!(root.depth(), 0);
    assert_eq!(widget.depth(), 2);
    assert_eq!(widget.path(), "root/page/widget");
    assert!(widget.root_scope().ptr_eq(&root));
    assert!(widget.parent().unwrap().ptr_eq(&page));
    assert!(root.parent().is_none());
    assert_ne!(page.id(), widget.id());
}
