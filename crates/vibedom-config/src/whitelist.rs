//! Domain whitelist: the allow-list egress filter checks every outbound
//! request host against.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use vibedom_core::VibedomError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    domains: HashSet<String>,
}

impl Whitelist {
    /// An empty whitelist: every request is blocked. This is the fallback
    /// used when the whitelist file is missing at startup.
    pub fn empty() -> Self {
        Whitelist { domains: HashSet::new() }
    }

    pub fn from_domains(domains: impl IntoIterator<Item = String>) -> Self {
        Whitelist { domains: domains.into_iter().map(|d| d.to_lowercase()).collect() }
    }

    /// Read a newline-delimited domain list: blank lines and `#` comments
    /// are skipped, entries are lowercased. Returns `WhitelistMissing` if the
    /// file does not exist; the caller is expected to log it and fall back
    /// to `Whitelist::empty()`.
    pub fn load(path: &Path) -> Result<Self, VibedomError> {
        if !path.exists() {
            return Err(VibedomError::WhitelistMissing(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|_| VibedomError::WhitelistMissing(path.to_path_buf()))?;
        Ok(Self::from_domains(parse_lines(&contents)))
    }

    /// Whether `host` matches a whitelisted domain or any of its parent
    /// domains (`a.b.c.d` is allowed if `b.c.d`, `c.d`, or `d` is listed).
    pub fn is_allowed(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        for suffix in suffixes(&host) {
            if self.domains.contains(suffix) {
                return true;
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn parse_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

fn suffixes(host: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(host);
    std::iter::from_fn(move || {
        let current = rest?;
        rest = current.split_once('.').map(|(_, tail)| tail);
        Some(current)
    })
}

/// Default on-disk location for the whitelist, relative to `config_base()`.
pub fn default_whitelist_path(config_base: &Path) -> PathBuf {
    config_base.join("trusted_domains.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn exact_domain_is_allowed() {
        let wl = Whitelist::from_domains(["github.com".to_string()]);
        assert!(wl.is_allowed("github.com"));
    }

    #[test]
    fn subdomain_of_whitelisted_domain_is_allowed() {
        let wl = Whitelist::from_domains(["github.com".to_string()]);
        assert!(wl.is_allowed("api.github.com"));
        assert!(wl.is_allowed("deep.nested.api.github.com"));
    }

    #[test]
    fn unrelated_domain_is_blocked() {
        let wl = Whitelist::from_domains(["github.com".to_string()]);
        assert!(!wl.is_allowed("evil.com"));
        assert!(!wl.is_allowed("notgithub.com"));
    }

    #[test]
    fn empty_whitelist_blocks_everything() {
        let wl = Whitelist::empty();
        assert!(!wl.is_allowed("github.com"));
    }

    #[test]
    fn load_skips_blank_lines_and_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trusted_domains.txt");
        std::fs::write(&path, "# comment\n\ngithub.com\n  \nPYPI.ORG\n").unwrap();

        let wl = Whitelist::load(&path).unwrap();
        assert_eq!(wl.len(), 2);
        assert!(wl.is_allowed("github.com"));
        assert!(wl.is_allowed("pypi.org"));
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempdir().unwrap();
        let result = Whitelist::load(&dir.path().join("does-not-exist.txt"));
        assert!(matches!(result, Err(VibedomError::WhitelistMissing(_))));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let wl = Whitelist::from_domains(["GitHub.com".to_string()]);
        assert!(wl.is_allowed("API.GITHUB.COM"));
    }

    #[test]
    fn default_whitelist_path_is_trusted_domains_txt() {
        let base = Path::new("/cfg");
        assert_eq!(default_whitelist_path(base), Path::new("/cfg/trusted_domains.txt"));
    }
}
