//! GitHub URL helpers.

/// Turn a GitHub branch URL into the raw URL of its README.
///
/// `https://github.com/org/repo/tree/main` becomes
/// `https://raw.githubusercontent.com/org/repo/main/README.md`.
/// Repo URLs without `/tree/` only get the host swapped.
// TODO: resolve the default branch so plain repository URLs work too.
pub fn github_readme_url_from_branch_url(branch_url: &str) -> String {
    let url = branch_url.replacen("github.com", "raw.githubusercontent.com", 1);
    match url.find("/tree/") {
        Some(idx) => format!("{}/{}/README.md", &url[..idx], &url[idx + "/tree/".len()..]),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_url() {
        assert_eq!(
            github_readme_url_from_branch_url("https://github.com/scaffold-eth/se-2/tree/main"),
            "https://raw.githubusercontent.com/scaffold-eth/se-2/main/README.md"
        );
    }

    #[test]
    fn test_nested_branch_path() {
        assert_eq!(
            github_readme_url_from_branch_url(
                "https://github.com/scaffold-eth/scaffold-eth-examples/tree/feature/nft"
            ),
            "https://raw.githubusercontent.com/scaffold-eth/scaffold-eth-examples/feature/nft/README.md"
        );
    }

    #[test]
    fn test_repo_url_only_swaps_host() {
        assert_eq!(
            github_readme_url_from_branch_url("https://github.com/scaffold-eth/eth-hooks"),
            "https://raw.githubusercontent.com/scaffold-eth/eth-hooks"
        );
    }
}
