use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Dependency-manifest families the scanner knows how to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestKind {
    PackageJson,
    PipRequirements,
    GoMod,
    Gemfile,
}

impl ManifestKind {
    /// Conventional file name for this family, reported back to callers
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "package.json",
            ManifestKind::PipRequirements => "requirements.txt",
            ManifestKind::GoMod => "go.mod",
            ManifestKind::Gemfile => "Gemfile",
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "npm package manifest",
            ManifestKind::PipRequirements => "Python requirements list",
            ManifestKind::GoMod => "Go module file",
            ManifestKind::Gemfile => "Ruby Gemfile",
        }
    }
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

// name==version / name>=1.0 style requirement line, optionally with extras
static REQUIREMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*(\[[^\]]+\])?\s*(===|==|>=|<=|~=|!=|>|<)\s*[0-9]")
        .expect("requirement regex is valid")
});

/// Shallow textual classification of a blob into a manifest family.
///
/// Fixed priority order, first match wins, no scoring. This is a routing
/// heuristic rather than a parser; misclassification is accepted risk.
pub fn classify_manifest(text: &str) -> Option<ManifestKind> {
    if text.contains("\"dependencies\"") || text.contains("\"devDependencies\"") {
        return Some(ManifestKind::PackageJson);
    }

    let requirement_like = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(10)
        .any(|line| REQUIREMENT_LINE.is_match(line));
    if requirement_like {
        return Some(ManifestKind::PipRequirements);
    }

    if text.contains("module ") || text.contains("require ") {
        return Some(ManifestKind::GoMod);
    }

    if text.trim_start().starts_with("source ") || text.contains("gem ") {
        return Some(ManifestKind::Gemfile);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_manifest_wins_on_dependencies_key() {
        let text = r#"{
  "name": "demo",
  "dependencies": { "express": "^4.17.1" }
}"#;
        assert_eq!(classify_manifest(text), Some(ManifestKind::PackageJson));

        let dev_only = r#"{"devDependencies": {"jest": "29.0.0"}}"#;
        assert_eq!(classify_manifest(dev_only), Some(ManifestKind::PackageJson));
    }

    #[test]
    fn requirement_lines_classify_as_pip() {
        assert_eq!(
            classify_manifest("requests==2.31.0\n"),
            Some(ManifestKind::PipRequirements)
        );
        assert_eq!(
            classify_manifest("# pinned\nflask>=2.0\nuvicorn[standard]~=0.23\n"),
            Some(ManifestKind::PipRequirements)
        );
    }

    #[test]
    fn requirement_match_only_scans_leading_lines() {
        let mut text = String::new();
        for i in 0..12 {
            text.push_str(&format!("plain line {i}\n"));
        }
        text.push_str("requests==2.31.0\n");
        assert_eq!(classify_manifest(&text), None);
    }

    #[test]
    fn go_module_declarations_classify_as_go() {
        let text = "module example.com/x\n\nrequire foo v1.0.0\n";
        assert_eq!(classify_manifest(text), Some(ManifestKind::GoMod));
    }

    #[test]
    fn gemfile_source_and_gem_tokens_classify_as_ruby() {
        let text = "source 'https://rubygems.org'\ngem 'rails'";
        assert_eq!(classify_manifest(text), Some(ManifestKind::Gemfile));
        assert_eq!(
            classify_manifest("gem 'nokogiri', '~> 1.15'\n"),
            Some(ManifestKind::Gemfile)
        );
    }

    #[test]
    fn ordinary_code_is_not_classified() {
        assert_eq!(classify_manifest("print('hi')"), None);
        assert_eq!(classify_manifest(""), None);
        assert_eq!(classify_manifest("fn main() { let x = 1; }"), None);
    }
}
