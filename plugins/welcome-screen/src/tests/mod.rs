use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dockyard_core::event::{MessageEventArgs, MessageKind, MessageRouter};
use dockyard_core::kernel::error::Result as KernelResult;
use dockyard_core::plugin_system::{
    CapabilityKind, CapabilitySet, DocumentWell, LoadState, PlugIn, PlugInHost, PlugInManifest,
    QuickAction, QuickActionContributor, QuickActionSink, RecentFiles,
};

use crate::{PLUGIN_ID, WelcomeScreen};

struct Fixture {
    router: MessageRouter,
    host: PlugInHost,
    screen: Rc<WelcomeScreen>,
}

fn loaded(title: &str) -> Fixture {
    let router = MessageRouter::new();
    let root = router.add_root("host");
    let files = Rc::new(RecentFiles::new(root.clone(), 4));
    let mut host = PlugInHost::new(root, Box::new(DocumentWell::new()), files);
    let screen = Rc::new(WelcomeScreen::new(title));
    let state = host.load_plugin(screen.clone()).unwrap();
    assert_eq!(state, LoadState::Loaded);
    Fixture { router, host, screen }
}

#[test]
fn test_declares_every_capability() {
    let fixture = loaded("Welcome Screen");
    let descriptor = fixture.host.plugin(PLUGIN_ID).unwrap();
    assert_eq!(descriptor.capabilities(), CapabilityKind::ALL.to_vec());
}

#[test]
fn test_docks_as_selected_pane_with_configured_title() {
    let fixture = loaded("Start Here");
    let pane = fixture.screen.pane().unwrap();
    assert_eq!(fixture.host.plugin(PLUGIN_ID).unwrap().panes(), vec![pane]);

    let node = fixture.screen.node().unwrap();
    let pane_node = node.parent().unwrap().unwrap();
    assert_eq!(pane_node.label().unwrap(), "pane:Start Here");
}

#[test]
fn test_contributes_quick_actions_in_priority_order() {
    let fixture = loaded("Welcome Screen");
    let ids: Vec<String> = fixture
        .host
        .quick_actions()
        .iter()
        .map(|a| a.id.clone())
        .collect();
    assert_eq!(ids, vec!["welcome.new-file", "welcome.open-recent"]);
}

#[test]
fn test_open_file_updates_recent_and_announces() {
    let fixture = loaded("Welcome Screen");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    fixture.router.add_audit_sink(move |args: &MessageEventArgs<'_>, _| {
        seen_clone.borrow_mut().push((
            args.message.text().to_string(),
            args.message.source_id().map(str::to_string),
        ));
    });

    fixture.screen.open_file(Path::new("maps/a.ggs")).unwrap();
    fixture.screen.open_file(Path::new("maps/b.ggs")).unwrap();
    fixture.screen.open_file(Path::new("maps/a.ggs")).unwrap();

    assert_eq!(
        fixture.screen.recent_files(),
        vec![PathBuf::from("maps/a.ggs"), PathBuf::from("maps/b.ggs")]
    );
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(
        seen.borrow()[0],
        ("Opened maps/a.ggs".to_string(), Some(PLUGIN_ID.to_string()))
    );
}

#[test]
fn test_announce_bubbles_through_pane_to_host() {
    let fixture = loaded("Welcome Screen");
    let path = Rc::new(RefCell::new(Vec::new()));
    let mut node = fixture.screen.node();
    while let Some(current) = node {
        let path_clone = path.clone();
        let label = current.label().unwrap();
        current
            .subscribe(move |_| {
                path_clone.borrow_mut().push(label.clone());
                dockyard_core::event::EventResult::Continue
            })
            .unwrap();
        node = current.parent().unwrap();
    }

    fixture.screen.announce(MessageKind::Info, "ready").unwrap();
    assert_eq!(
        *path.borrow(),
        vec!["plugin:welcome-screen", "pane:Welcome Screen", "host"]
    );
}

#[test]
fn test_unloaded_screen_reports_missing_services() {
    let screen = WelcomeScreen::default();
    assert!(screen.recent_files().is_empty());
    assert!(screen.open_file(Path::new("x")).is_err());
    assert!(screen.announce(MessageKind::Info, "hello").is_err());
}

#[test]
fn test_unload_clears_pane_and_actions() {
    let mut fixture = loaded("Welcome Screen");
    fixture.host.unload_plugin(PLUGIN_ID).unwrap();

    assert!(fixture.screen.pane().is_none());
    assert!(fixture.screen.node().is_none());
    assert!(fixture.host.quick_actions().is_empty());
    assert!(fixture.screen.displayed_actions().is_empty());
    assert_eq!(fixture.router.node_count(), 1);
    assert_eq!(fixture.screen.manifest().id, PLUGIN_ID);
}

/// Contributes a single action, for watching the screen follow the list
struct ExtraActions {
    manifest: PlugInManifest,
    priority: i32,
}

impl ExtraActions {
    fn new(id: &str, priority: i32) -> Rc<Self> {
        Rc::new(Self {
            manifest: PlugInManifest::new(id, id, "1.0.0"),
            priority,
        })
    }
}

impl PlugIn for ExtraActions {
    fn manifest(&self) -> &PlugInManifest {
        &self.manifest
    }

    fn declare_capabilities(self: Rc<Self>, caps: &mut CapabilitySet) {
        caps.quick_actions(self);
    }
}

impl QuickActionContributor for ExtraActions {
    fn register_quick_actions(&self, sink: &mut QuickActionSink<'_>) -> KernelResult<()> {
        let id = &self.manifest.id;
        sink.register_quick_action(QuickAction::new(id, id, "extra.run"), self.priority);
        Ok(())
    }
}

#[test]
fn test_displays_quick_actions_in_host_order() {
    let fixture = loaded("Welcome Screen");
    assert_eq!(fixture.screen.displayed_actions(), vec!["New file", "Open recent"]);
}

#[test]
fn test_display_follows_other_plugins() {
    let mut fixture = loaded("Welcome Screen");

    fixture.host.load_plugin(ExtraActions::new("build", 15)).unwrap();
    fixture.host.load_plugin(ExtraActions::new("deploy", 1)).unwrap();
    assert_eq!(
        fixture.screen.displayed_actions(),
        vec!["New file", "build", "Open recent", "deploy"]
    );

    assert!(fixture.host.set_quick_action_priority("deploy", 30));
    assert_eq!(
        fixture.screen.displayed_actions(),
        vec!["deploy", "New file", "build", "Open recent"]
    );

    fixture.host.unload_plugin("build").unwrap();
    assert_eq!(
        fixture.screen.displayed_actions(),
        vec!["deploy", "New file", "Open recent"]
    );
}
