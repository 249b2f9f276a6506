//! Parsing tool version banners

use std::sync::LazyLock;

use regex::Regex;

static CLIENT_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"git version (\S+)").expect("valid regex"));

static LFS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"git-lfs/(\S+)").expect("valid regex"));

/// `git version 2.39.1.windows.1` -> `2.39.1.windows.1`
pub fn parse_client_version(banner: &str) -> Option<String> {
    CLIENT_VERSION
        .captures(banner)
        .map(|c| c[1].to_string())
}

/// `git-lfs/3.3.0 (GitHub; windows amd64; go 1.19.3)` -> `3.3.0`
pub fn parse_lfs_version(banner: &str) -> Option<String> {
    LFS_VERSION.captures(banner).map(|c| c[1].to_string())
}

/// The credential manager prints its bare version on the first line.
pub fn parse_manager_version(banner: &str) -> Option<String> {
    banner
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Whether a `credential.helper` value refers to the supported credential manager.
pub fn is_manager_helper(helper: &str) -> bool {
    let name = helper
        .trim()
        .trim_matches('"')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim_end_matches(".exe");
    matches!(
        name,
        "manager" | "manager-core" | "git-credential-manager" | "git-credential-manager-core"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("git version 2.39.1.windows.1\n", Some("2.39.1.windows.1"))]
    #[case("git version 2.43.0", Some("2.43.0"))]
    #[case("command not found", None)]
    fn test_parse_client_version(#[case] banner: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_client_version(banner).as_deref(), expected);
    }

    #[rstest]
    #[case("git-lfs/3.3.0 (GitHub; windows amd64; go 1.19.3)", Some("3.3.0"))]
    #[case("git: 'lfs' is not a git command.", None)]
    fn test_parse_lfs_version(#[case] banner: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_lfs_version(banner).as_deref(), expected);
    }

    #[test]
    fn test_parse_manager_version_takes_first_line() {
        assert_eq!(
            parse_manager_version("\n2.0.886+ea93cb5158\nextra").as_deref(),
            Some("2.0.886+ea93cb5158")
        );
        assert_eq!(parse_manager_version("   \n"), None);
    }

    #[rstest]
    #[case("manager", true)]
    #[case("manager-core", true)]
    #[case("/usr/local/bin/git-credential-manager", true)]
    #[case("\"C:\\\\Program Files\\\\GCM\\\\git-credential-manager.exe\"", true)]
    #[case("store", false)]
    #[case("C:/tools/other-helper.exe", false)]
    fn test_is_manager_helper(#[case] helper: &str, #[case] expected: bool) {
        assert_eq!(is_manager_helper(helper), expected);
    }
}
