//! Path pattern matching.

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// A compiled path pattern for matching request paths.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original pattern string.
    pattern: String,
    /// Compiled regex for matching.
    regex: Regex,
    /// Parameter names in order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Parses a path pattern string.
    ///
    /// Pattern syntax:
    /// - `/db/_table` - Literal path
    /// - `/db/_table/{table_name}` - Path with parameter
    ///
    /// # Example
    ///
    /// ```
    /// use tabula_router::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/db/_table/{table_name}/{id}").unwrap();
    /// let params = pattern.match_path("/db/_table/widgets/7").unwrap();
    /// assert_eq!(params.get("table_name"), Some("widgets"));
    /// assert_eq!(params.get("id"), Some("7"));
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut param_names = Vec::new();
        let mut regex_str = String::from("^");

        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            regex_str.push('/');

            if let Some(name) = part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if name.is_empty() || !name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
                {
                    return Err(RouterError::InvalidPattern(pattern.to_string()));
                }
                if param_names.iter().any(|n| n == name) {
                    return Err(RouterError::InvalidPattern(pattern.to_string()));
                }
                param_names.push(name.to_string());
                regex_str.push_str("([^/]+)");
            } else {
                regex_str.push_str(&regex::escape(part));
            }
        }

        regex_str.push_str("/?$");

        let regex = Regex::new(&regex_str)
            .map_err(|e| RouterError::InvalidPattern(format!("{pattern}: {e}")))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            param_names,
        })
    }

    /// Attempts to match a path against this pattern.
    ///
    /// Returns extracted parameters if the path matches.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;

        let mut params = PathParams::new();

        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                params.insert(name.clone(), value.as_str().to_string());
            }
        }

        Some(params)
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parameter names.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }
}
