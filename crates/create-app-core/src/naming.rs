//! npm package name validation
//!
//! Mirrors the registry rules for names that can be published as *new*
//! packages: errors make a name unusable anywhere, warnings flag names the
//! registry still accepts for legacy packages but refuses for new ones.

/// Longest name the registry accepts for new packages
pub const MAX_NAME_LENGTH: usize = 214;

/// Names the registry reserves outright
const BLACKLIST: &[&str] = &["node_modules", "favicon.ico"];

/// Node.js core module names
const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Outcome of validating a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValidation {
    pub valid: bool,
    /// Errors first, then warnings, each in rule-check order
    pub problems: Vec<String>,
}

impl NameValidation {
    /// The problem shown inline in prompts
    pub fn first_problem(&self) -> Option<&str> {
        self.problems.first().map(String::as_str)
    }
}

/// Validate `name` as a new npm package name
pub fn validate(name: &str) -> NameValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if name.is_empty() {
        errors.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        errors.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        errors.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        errors.push("name cannot contain leading or trailing spaces".to_string());
    }

    let lower = name.to_lowercase();
    for reserved in BLACKLIST {
        if lower == *reserved {
            errors.push(format!("{} is not a valid package name", reserved));
        }
    }

    if BUILTIN_MODULES.contains(&lower.as_str()) {
        warnings.push(format!("{} is a core module name", name));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        warnings.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if lower != name {
        warnings.push("name can no longer contain capital letters".to_string());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.contains(['~', '\'', '!', '(', ')', '*']) {
        warnings.push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }

    if !is_uri_component(name) && !is_scoped_url_friendly(name) {
        errors.push("name can only contain URL-friendly characters".to_string());
    }

    let problems: Vec<String> = errors.into_iter().chain(warnings).collect();
    NameValidation {
        valid: problems.is_empty(),
        problems,
    }
}

/// `@scope/name` where both halves survive URI-component encoding unchanged
fn is_scoped_url_friendly(name: &str) -> bool {
    let Some(rest) = name.strip_prefix('@') else {
        return false;
    };
    match rest.split_once('/') {
        Some((scope, package)) => {
            !scope.is_empty()
                && !package.is_empty()
                && !package.contains('/')
                && is_uri_component(scope)
                && is_uri_component(package)
        }
        None => false,
    }
}

/// True when percent-encoding `s` as a URI component would leave it unchanged
fn is_uri_component(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in [
            "my-app",
            "some-package",
            "example.com",
            "under_score",
            "period.js",
            "123numeric",
            "@npm/thingy",
            "@jane/foo.js",
        ] {
            let result = validate(name);
            assert!(result.valid, "{} should be valid: {:?}", name, result.problems);
            assert!(result.problems.is_empty());
        }
    }

    #[test]
    fn test_capital_letters_rejected() {
        let result = validate("MyApp");
        assert!(!result.valid);
        assert_eq!(
            result.first_problem(),
            Some("name can no longer contain capital letters")
        );
    }

    #[test]
    fn test_empty_name() {
        let result = validate("");
        assert!(!result.valid);
        assert_eq!(
            result.first_problem(),
            Some("name length must be greater than zero")
        );
    }

    #[test]
    fn test_leading_characters() {
        assert_eq!(
            validate(".start-with-period").first_problem(),
            Some("name cannot start with a period")
        );
        assert_eq!(
            validate("_start-with-underscore").first_problem(),
            Some("name cannot start with an underscore")
        );
        assert_eq!(
            validate(" leading-space").first_problem(),
            Some("name cannot contain leading or trailing spaces")
        );
    }

    #[test]
    fn test_reserved_and_core_names() {
        assert_eq!(
            validate("node_modules").first_problem(),
            Some("node_modules is not a valid package name")
        );
        assert_eq!(
            validate("favicon.ico").first_problem(),
            Some("favicon.ico is not a valid package name")
        );
        assert_eq!(
            validate("http").first_problem(),
            Some("http is a core module name")
        );
    }

    #[test]
    fn test_errors_come_before_warnings() {
        // leading space is an error, capital letter is a warning
        let result = validate(" Foo");
        assert!(!result.valid);
        assert_eq!(
            result.problems,
            vec![
                "name cannot contain leading or trailing spaces".to_string(),
                "name can only contain URL-friendly characters".to_string(),
                "name can no longer contain capital letters".to_string(),
            ]
        );
    }

    #[test]
    fn test_forbidden_characters() {
        for name in ["crazy!", "s/l/a/s/h/e/s", "has space", "ünicode", "a:b"] {
            let result = validate(name);
            assert!(!result.valid, "{} should be invalid", name);
            assert!(!result.problems.is_empty());
        }

        let result = validate("crazy!");
        assert!(result
            .problems
            .iter()
            .any(|p| p.contains("special characters")));
    }

    #[test]
    fn test_too_long() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        let result = validate(&name);
        assert!(!result.valid);
        assert_eq!(
            result.first_problem(),
            Some("name can no longer contain more than 214 characters")
        );
        assert!(validate(&"a".repeat(MAX_NAME_LENGTH)).valid);
    }

    #[test]
    fn test_scoped_names() {
        assert!(validate("@scope/pkg").valid);
        assert!(!validate("@scope/").valid);
        assert!(!validate("@/pkg").valid);
        assert!(!validate("@scope/pkg/extra").valid);
    }
}
