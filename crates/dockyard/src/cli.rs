//! Text rendering for the command-line front end.
use dockyard_core::plugin_system::PlugInHost;
use dockyard_core::ui_bridge::StatusLog;

/// Quick actions in display order, one per line
pub fn render_actions(host: &PlugInHost) -> String {
    let actions = host.quick_actions();
    if actions.is_empty() {
        return "  No quick actions registered.\n".to_string();
    }
    let mut out = String::new();
    for (index, item) in actions.entries().enumerate() {
        let action = item.value();
        out.push_str(&format!(
            "  {}. {} ({}) priority {}\n",
            index + 1,
            action.title,
            action.id,
            item.priority()
        ));
    }
    out
}

/// Loaded plug-ins with capabilities and load state
pub fn render_plugins(host: &PlugInHost) -> String {
    if host.plugins().is_empty() {
        return "  No plug-ins loaded.\n".to_string();
    }
    let mut out = String::new();
    for descriptor in host.plugins() {
        let capabilities: Vec<&str> = descriptor
            .capabilities()
            .iter()
            .map(|kind| kind.as_str())
            .collect();
        out.push_str(&format!(
            "  - {} v{}: {} [{}]\n",
            descriptor.id(),
            descriptor.manifest().version,
            descriptor.state(),
            capabilities.join(", ")
        ));
    }
    out
}

pub fn render_status_log(log: &StatusLog) -> String {
    let mut out = String::new();
    for entry in log.entries() {
        out.push_str(&format!("  {}\n", entry));
    }
    out
}
