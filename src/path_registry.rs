/// Metadata for a symbolic path key that zel tools resolve through the path store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathKeyDescriptor {
    pub key: &'static str,
    pub description: &'static str,
    pub example: &'static str,
    /// Tools that read this key
    pub used_by: &'static [&'static str],
}

const PATH_KEYS: &[PathKeyDescriptor] = &[
    PathKeyDescriptor {
        key: "vault",
        description: "Main vault/second-brain directory",
        example: "/mnt/Vault/Second-Brain",
        used_by: &["zeljournal"],
    },
    PathKeyDescriptor {
        key: "budget-data",
        description: "Budget data directory",
        example: "~/Documents/Budget",
        used_by: &["zelbudget"],
    },
    PathKeyDescriptor {
        key: "media",
        description: "Media files directory",
        example: "~/Media",
        used_by: &["zelmedia"],
    },
    PathKeyDescriptor {
        key: "projects",
        description: "Projects directory",
        example: "~/Projects",
        used_by: &["zelblock"],
    },
    PathKeyDescriptor {
        key: "timer-logs",
        description: "Timer log files directory",
        example: "~/Documents/Timers",
        used_by: &["zeltimer"],
    },
];

/// All known path keys, in registry order
pub fn available_keys() -> Vec<&'static str> {
    PATH_KEYS.iter().map(|entry| entry.key).collect()
}

pub fn describe(key: &str) -> Option<&'static PathKeyDescriptor> {
    PATH_KEYS.iter().find(|entry| entry.key == key)
}

/// Keys containing `partial`, ignoring case. An empty input suggests every key.
pub fn suggest(partial: &str) -> Vec<&'static str> {
    let needle = partial.to_lowercase();
    PATH_KEYS
        .iter()
        .map(|entry| entry.key)
        .filter(|key| key.to_lowercase().contains(&needle))
        .collect()
}
