//! Parsing of `git` plain-text output.
//!
//! Every assumption about the format of git's output lives here, so a change
//! in a git release only has to be handled in one place.

const HEADS_PREFIX: &str = "refs/heads/";
const REMOTES_PREFIX: &str = "refs/remotes/";

/// Split newline-separated output into trimmed, non-empty lines.
pub fn parse_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `git for-each-ref --format=%(refname) refs/heads/` into branch names.
pub fn parse_local_branches(output: &str) -> Vec<String> {
    parse_lines(output)
        .into_iter()
        .filter_map(|r| r.strip_prefix(HEADS_PREFIX).map(String::from))
        .collect()
}

/// Parse `git for-each-ref --format=%(refname) refs/remotes/<remote>/` into
/// branch names relative to the remote. The symbolic `<remote>/HEAD` is dropped.
pub fn parse_remote_branches(remote: &str, output: &str) -> Vec<String> {
    let prefix = format!("{REMOTES_PREFIX}{remote}/");
    parse_lines(output)
        .into_iter()
        .filter_map(|r| r.strip_prefix(&prefix).map(String::from))
        .filter(|name| name != "HEAD")
        .collect()
}

/// Parse the single integer printed by `git rev-list --count`.
pub fn parse_count(output: &str) -> Option<u32> {
    output.trim().parse().ok()
}

/// `refs/heads/dev` → `dev`. Anything else is returned unchanged.
pub fn strip_heads_prefix(refname: &str) -> &str {
    let refname = refname.trim();
    refname.strip_prefix(HEADS_PREFIX).unwrap_or(refname)
}

/// Fully qualified local branch ref.
pub fn local_ref(branch: &str) -> String {
    format!("{HEADS_PREFIX}{branch}")
}

/// Fully qualified remote-tracking ref.
pub fn remote_ref(remote: &str, branch: &str) -> String {
    format!("{REMOTES_PREFIX}{remote}/{branch}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_branches_keep_listing_order() {
        let output = "refs/heads/master\nrefs/heads/dev\nrefs/heads/feature/login\n";
        assert_eq!(
            parse_local_branches(output),
            vec!["master", "dev", "feature/login"]
        );
    }

    #[test]
    fn local_branches_ignore_blank_lines_and_foreign_refs() {
        let output = "\nrefs/heads/main\n\nrefs/tags/v1\n";
        assert_eq!(parse_local_branches(output), vec!["main"]);
    }

    #[test]
    fn remote_branches_strip_prefix_and_drop_head() {
        let output = "refs/remotes/origin/HEAD\nrefs/remotes/origin/dev\nrefs/remotes/origin/master\n";
        assert_eq!(parse_remote_branches("origin", output), vec!["dev", "master"]);
    }

    #[test]
    fn remote_branches_ignore_other_remotes() {
        let output = "refs/remotes/origin/dev\nrefs/remotes/originals/dev\n";
        assert_eq!(parse_remote_branches("origin", output), vec!["dev"]);
    }

    #[test]
    fn remote_branches_keep_nested_names() {
        let output = "refs/remotes/upstream/release/1.0\n";
        assert_eq!(parse_remote_branches("upstream", output), vec!["release/1.0"]);
    }

    #[test]
    fn count_parses_trimmed_integer() {
        assert_eq!(parse_count("3\n"), Some(3));
        assert_eq!(parse_count("0"), Some(0));
    }

    #[test]
    fn count_rejects_garbage_and_negatives() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("fatal: bad revision"), None);
    }

    #[test]
    fn heads_prefix_is_stripped() {
        assert_eq!(strip_heads_prefix("refs/heads/dev\n"), "dev");
        assert_eq!(strip_heads_prefix("dev"), "dev");
    }

    #[test]
    fn refs_are_fully_qualified() {
        assert_eq!(local_ref("dev"), "refs/heads/dev");
        assert_eq!(remote_ref("origin", "dev"), "refs/remotes/origin/dev");
    }
}
