use std::cell::RefCell;
use std::rc::Rc;

use dockyard_core::event::{MessageEventArgs, MessageKind, MessageRouter};
use dockyard_core::plugin_system::{DocumentWell, PlugIn, PlugInHost, RecentFiles};

use crate::{ConsoleLogPlugIn, PLUGIN_ID};

fn host() -> (MessageRouter, PlugInHost) {
    let router = MessageRouter::new();
    let root = router.add_root("host");
    let files = Rc::new(RecentFiles::new(root.clone(), 4));
    let host = PlugInHost::new(root, Box::new(DocumentWell::new()), files);
    (router, host)
}

fn audit(router: &MessageRouter) -> Rc<RefCell<Vec<(MessageKind, String)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    router.add_audit_sink(move |args: &MessageEventArgs<'_>, _| {
        seen_clone
            .borrow_mut()
            .push((args.message.kind(), args.message.text().to_string()));
    });
    seen
}

#[test]
fn test_manifest_is_compatible_with_host() {
    let plugin = ConsoleLogPlugIn::new("info");
    assert_eq!(plugin.manifest().id, PLUGIN_ID);
    assert!(plugin.manifest().supports_api(&dockyard_core::kernel::constants::API_VERSION));
}

#[test]
fn test_load_reports_filter_once() {
    let (router, mut host) = host();
    let seen = audit(&router);
    let plugin = Rc::new(ConsoleLogPlugIn::new("dockyard=debug,warn"));

    host.load_plugin(plugin.clone()).unwrap();

    assert!(plugin.is_attached());
    assert_eq!(
        *seen.borrow(),
        vec![(
            MessageKind::Info,
            "Console logging filter: dockyard=debug,warn".to_string()
        )]
    );
}

#[test]
fn test_does_not_subscribe_to_routed_messages() {
    let (router, mut host) = host();
    host.load_plugin(Rc::new(ConsoleLogPlugIn::new("info"))).unwrap();

    assert_eq!(router.subscription_count(host.root().id()).unwrap(), 0);
    assert_eq!(router.audit_sink_count(), 0);
}

#[test]
fn test_unload_detaches() {
    let (router, mut host) = host();
    let plugin = Rc::new(ConsoleLogPlugIn::new("info"));
    host.load_plugin(plugin.clone()).unwrap();

    host.unload_plugin(PLUGIN_ID).unwrap();

    assert!(!plugin.is_attached());
    assert_eq!(router.node_count(), 1);
}
