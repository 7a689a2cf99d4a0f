use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{
    EventResult, Message, MessageEventArgs, MessageRouter, NodeId, RaiseOutcome, RoutingError,
    RoutingNode,
};

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

// X -> Y -> Z, X is the root
fn three_level_tree() -> (MessageRouter, RoutingNode, RoutingNode, RoutingNode) {
    let router = MessageRouter::new();
    let x = router.add_root("x");
    let y = x.add_child("y").unwrap();
    let z = y.add_child("z").unwrap();
    (router, x, y, z)
}

fn recording_handler(
    log: &Log,
    tag: &'static str,
    result: EventResult,
) -> impl Fn(&MessageEventArgs<'_>) -> EventResult + 'static {
    let log = log.clone();
    move |args| {
        log.borrow_mut().push(format!("{}:{}", tag, args.message.text()));
        result
    }
}

#[test]
fn test_bubbles_to_every_ancestor_in_order() {
    let (_router, x, y, z) = three_level_tree();
    let log = new_log();

    x.subscribe(recording_handler(&log, "logger", EventResult::Continue)).unwrap();
    y.subscribe(recording_handler(&log, "toast", EventResult::Continue)).unwrap();

    let outcome = z.raise(Message::info("saved")).unwrap();

    assert_eq!(outcome, RaiseOutcome::Unhandled);
    assert_eq!(*log.borrow(), vec!["toast:saved", "logger:saved"]);
}

#[test]
fn test_handled_stops_before_ancestors() {
    let (_router, x, y, z) = three_level_tree();
    let log = new_log();

    x.subscribe(recording_handler(&log, "logger", EventResult::Continue)).unwrap();
    y.subscribe(recording_handler(&log, "toast", EventResult::Handled)).unwrap();

    let outcome = z.raise(Message::warning("disk full")).unwrap();

    assert_eq!(outcome, RaiseOutcome::Handled { by: y.id() });
    assert_eq!(*log.borrow(), vec!["toast:disk full"]);
}

#[test]
fn test_handled_skips_later_handlers_on_same_node() {
    let router = MessageRouter::new();
    let root = router.add_root("root");
    let log = new_log();

    root.subscribe(recording_handler(&log, "first", EventResult::Handled)).unwrap();
    root.subscribe(recording_handler(&log, "second", EventResult::Continue)).unwrap();

    root.raise(Message::info("m")).unwrap();

    assert_eq!(*log.borrow(), vec!["first:m"]);
}

#[test]
fn test_handlers_on_one_node_run_in_registration_order() {
    let router = MessageRouter::new();
    let root = router.add_root("root");
    let log = new_log();

    for tag in ["a", "b", "c"] {
        root.subscribe(recording_handler(&log, tag, EventResult::Continue)).unwrap();
    }

    root.raise(Message::info("m")).unwrap();

    assert_eq!(*log.borrow(), vec!["a:m", "b:m", "c:m"]);
}

#[test]
fn test_handler_sees_origin_and_current_node() {
    let (_router, x, _y, z) = three_level_tree();
    let seen = Rc::new(RefCell::new(None));
    let seen_clone = seen.clone();

    x.subscribe(move |args| {
        *seen_clone.borrow_mut() = Some((args.origin, args.current));
        EventResult::Continue
    })
    .unwrap();

    z.raise(Message::info("from the leaf")).unwrap();

    assert_eq!(*seen.borrow(), Some((z.id(), x.id())));
}

#[test]
fn test_sibling_subtree_is_not_visited() {
    let (_router, x, y, _z) = three_level_tree();
    let other = x.add_child("other").unwrap();
    let log = new_log();

    y.subscribe(recording_handler(&log, "y", EventResult::Continue)).unwrap();
    x.subscribe(recording_handler(&log, "x", EventResult::Continue)).unwrap();

    other.raise(Message::info("m")).unwrap();

    assert_eq!(*log.borrow(), vec!["x:m"]);
}

#[test]
fn test_raise_on_bare_root_is_silently_dropped() {
    let router = MessageRouter::new();
    let root = router.add_root("lonely");

    let outcome = root.raise(Message::debug("nobody listens")).unwrap();

    assert_eq!(outcome, RaiseOutcome::Unhandled);
}

#[test]
fn test_unsubscribe_is_idempotent() {
    let router = MessageRouter::new();
    let root = router.add_root("root");
    let log = new_log();

    let handle = root.subscribe(recording_handler(&log, "h", EventResult::Continue)).unwrap();

    assert!(router.unsubscribe(handle));
    assert!(!router.unsubscribe(handle), "Second removal should be a no-op");

    root.raise(Message::info("m")).unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn test_handler_removed_mid_dispatch_is_skipped() {
    let (router, x, y, z) = three_level_tree();
    let log = new_log();

    let logger = x.subscribe(recording_handler(&log, "logger", EventResult::Continue)).unwrap();
    let router_clone = router.clone();
    y.subscribe(move |_| {
        router_clone.unsubscribe(logger);
        EventResult::Continue
    })
    .unwrap();

    z.raise(Message::info("m")).unwrap();

    assert!(log.borrow().is_empty(), "Removed handler must not run");
}

#[test]
fn test_handler_added_mid_dispatch_waits_for_next_message() {
    let router = MessageRouter::new();
    let root = router.add_root("root");
    let log = new_log();

    let root_clone = root.clone();
    let log_clone = log.clone();
    let added = Rc::new(RefCell::new(false));
    root.subscribe(move |_| {
        if !*added.borrow() {
            *added.borrow_mut() = true;
            root_clone
                .subscribe(recording_handler(&log_clone, "late", EventResult::Continue))
                .unwrap();
        }
        EventResult::Continue
    })
    .unwrap();

    root.raise(Message::info("first")).unwrap();
    root.raise(Message::info("second")).unwrap();

    assert_eq!(*log.borrow(), vec!["late:second"]);
}

#[test]
fn test_nested_raise_is_deferred_until_dispatch_finishes() {
    let (_router, x, y, z) = three_level_tree();
    let log = new_log();

    let z_clone = z.clone();
    let log_clone = log.clone();
    y.subscribe(move |args| {
        log_clone.borrow_mut().push(format!("y:{}", args.message.text()));
        if args.message.text() == "outer" {
            let outcome = z_clone.raise(Message::info("inner")).unwrap();
            assert_eq!(outcome, RaiseOutcome::Deferred);
        }
        EventResult::Continue
    })
    .unwrap();
    x.subscribe(recording_handler(&log, "x", EventResult::Continue)).unwrap();

    z.raise(Message::info("outer")).unwrap();

    assert_eq!(*log.borrow(), vec!["y:outer", "x:outer", "y:inner", "x:inner"]);
}

#[test]
fn test_reparent_during_dispatch_is_rejected() {
    let (router, x, y, z) = three_level_tree();
    let other_root = router.add_root("other");
    let result = Rc::new(RefCell::new(None));

    let result_clone = result.clone();
    let z_clone = z.clone();
    let other_clone = other_root.clone();
    x.subscribe(move |_| {
        *result_clone.borrow_mut() = Some(z_clone.reparent(Some(&other_clone)));
        EventResult::Continue
    })
    .unwrap();

    z.raise(Message::info("m")).unwrap();

    assert_eq!(
        *result.borrow(),
        Some(Err(RoutingError::ReparentDuringDispatch { node: z.id() }))
    );
    assert_eq!(router.parent(z.id()).unwrap(), Some(y.id()));
    assert!(!router.is_dispatching());
}

#[test]
fn test_reparent_moves_subtree_atomically() {
    let (router, x, y, z) = three_level_tree();
    let pane = x.add_child("pane").unwrap();
    let log = new_log();

    pane.subscribe(recording_handler(&log, "pane", EventResult::Continue)).unwrap();
    y.subscribe(recording_handler(&log, "y", EventResult::Continue)).unwrap();

    z.reparent(Some(&pane)).unwrap();
    z.raise(Message::info("m")).unwrap();

    assert_eq!(*log.borrow(), vec!["pane:m"]);
    assert!(router.children(y.id()).unwrap().is_empty());
    assert_eq!(router.children(pane.id()).unwrap(), vec![z.id()]);
    assert_eq!(router.ancestors(z.id()).unwrap(), vec![z.id(), pane.id(), x.id()]);
}

#[test]
fn test_reparent_rejects_cycles() {
    let (_router, x, _y, z) = three_level_tree();

    let err = x.reparent(Some(&z)).unwrap_err();
    assert_eq!(err, RoutingError::CyclicParent { node: x.id(), new_parent: z.id() });

    let err = z.reparent(Some(&z)).unwrap_err();
    assert_eq!(err, RoutingError::CyclicParent { node: z.id(), new_parent: z.id() });
}

#[test]
fn test_disposed_node_rejects_use() {
    let (router, _x, y, z) = three_level_tree();

    let removed = y.dispose().unwrap();
    assert_eq!(removed.len(), 2, "Disposing y removes its child z too");

    assert_eq!(z.raise(Message::info("m")).unwrap_err(), RoutingError::DisposedNode(z.id()));
    assert!(matches!(
        y.subscribe(|_| EventResult::Continue),
        Err(RoutingError::DisposedNode(_))
    ));
    assert_eq!(
        router.raise(NodeId(9_999), Message::info("m")).unwrap_err(),
        RoutingError::UnknownNode(NodeId(9_999))
    );
}

#[test]
fn test_audit_sink_sees_handled_messages() {
    let (router, x, y, z) = three_level_tree();
    let log = new_log();

    x.subscribe(recording_handler(&log, "logger", EventResult::Continue)).unwrap();
    y.subscribe(recording_handler(&log, "toast", EventResult::Handled)).unwrap();
    let log_clone = log.clone();
    router.add_audit_sink(move |args, outcome| {
        log_clone
            .borrow_mut()
            .push(format!("audit:{}:{}", args.message.text(), outcome.is_handled()));
    });

    z.raise(Message::error("boom")).unwrap();

    assert_eq!(*log.borrow(), vec!["toast:boom", "audit:boom:true"]);
}

#[test]
fn test_audit_sink_removal() {
    let router = MessageRouter::new();
    let root = router.add_root("root");
    let log = new_log();
    let log_clone = log.clone();

    let id = router.add_audit_sink(move |args, _| {
        log_clone.borrow_mut().push(args.message.text().to_string())
    });
    root.raise(Message::info("one")).unwrap();
    assert!(router.remove_audit_sink(id));
    assert!(!router.remove_audit_sink(id));
    root.raise(Message::info("two")).unwrap();

    assert_eq!(*log.borrow(), vec!["one"]);
}

#[test]
fn test_unsubscribe_owner_removes_only_that_owner() {
    let (router, x, _y, z) = three_level_tree();
    let log = new_log();

    let plugin_view = z.owned_by("plugin-a");
    plugin_view.subscribe(recording_handler(&log, "a-leaf", EventResult::Continue)).unwrap();
    x.owned_by("plugin-a")
        .subscribe(recording_handler(&log, "a-root", EventResult::Continue))
        .unwrap();
    x.owned_by("plugin-b")
        .subscribe(recording_handler(&log, "b-root", EventResult::Continue))
        .unwrap();

    assert_eq!(router.unsubscribe_owner("plugin-a"), 2);
    z.raise(Message::info("m")).unwrap();

    assert_eq!(*log.borrow(), vec!["b-root:m"]);
}

#[test]
fn test_messages_arrive_in_raise_order() {
    let (_router, x, _y, z) = three_level_tree();
    let log = new_log();
    x.subscribe(recording_handler(&log, "x", EventResult::Continue)).unwrap();

    for i in 0..5 {
        z.raise(Message::info(format!("{}", i))).unwrap();
    }

    assert_eq!(*log.borrow(), vec!["x:0", "x:1", "x:2", "x:3", "x:4"]);
}
