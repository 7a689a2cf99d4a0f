use semver::Version;

/// Application name
pub const APP_NAME: &str = "Dockyard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Host API version plug-in manifests are checked against
pub const API_VERSION: Version = Version::new(0, 1, 0);

/// Label of the routing tree root owned by the host
pub const HOST_NODE_LABEL: &str = "host";

/// Entries kept by the host's recent-files list
pub const RECENT_FILES_CAPACITY: usize = 16;
