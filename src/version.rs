//! Version information with embedded git metadata.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Build timestamp (RFC 3339), or "unknown" if unavailable.
pub const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(timestamp) => timestamp,
    None => "unknown",
};

/// Target triple the crate was compiled for, or "unknown" if unavailable.
pub const TARGET_TRIPLE: &str = match option_env!("VERGEN_CARGO_TARGET_TRIPLE") {
    Some(triple) => triple,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Full version string: `{version}+{branch}.{sha}`, with `.dirty` appended
/// for dirty builds.
pub fn version_string() -> String {
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    format!(
        "{PKG_VERSION}+{GIT_BRANCH}.{}{dirty_suffix}",
        &GIT_SHA[..7.min(GIT_SHA.len())]
    )
}

/// `User-Agent` sent by the default transport.
pub fn user_agent() -> String {
    format!("rapidapi-client/{PKG_VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_package_version() {
        assert!(version_string().starts_with(PKG_VERSION));
        assert!(version_string().contains('+'));
    }

    #[test]
    fn git_sha_is_populated() {
        assert_ne!(GIT_SHA, "unknown", "git SHA should be populated");
    }

    #[test]
    fn git_branch_is_populated() {
        assert_ne!(GIT_BRANCH, "unknown", "git branch should be populated");
    }

    #[test]
    fn build_timestamp_is_rfc3339() {
        assert!(
            chrono::DateTime::parse_from_rfc3339(BUILD_TIMESTAMP).is_ok(),
            "unexpected build timestamp {BUILD_TIMESTAMP:?}"
        );
    }

    #[test]
    fn target_triple_is_populated() {
        assert_ne!(TARGET_TRIPLE, "unknown");
        assert!(TARGET_TRIPLE.contains('-'));
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert_eq!(user_agent(), format!("rapidapi-client/{PKG_VERSION}"));
    }
}
