//! Resource path parsing
//!
//! A resource path is a `/`-separated list of segments. Each segment is a
//! base name optionally followed by `[name=value]` key predicates:
//!
//! ```text
//! /openconfig-acl:acl/acl-sets/acl-set[name=MyACL1][type=ACL_IPV4]/acl-entries
//! ```
//!
//! Two independent views are produced from the same grammar:
//!
//! - [`Path::parse`] gives the tree-navigation form: module prefixes stripped
//!   from segment names, predicates kept in order, empty segments dropped.
//! - [`template`] gives the dispatch form: every predicate group collapsed to
//!   `{}` and the predicate values collected into a [`VarMap`]. Nothing is
//!   stripped; the rest of the text is copied verbatim.
//!
//! Predicate values may contain any character except `]`, including `/`.
//! Predicate names may contain any character except `=`. An unterminated
//! group consumes the rest of the input without error.

use std::collections::BTreeMap;
use std::fmt;

/// Predicate key → value, with repeated keys numbered `key#2`, `key#3`, ...
pub type VarMap = BTreeMap<String, String>;

/// One `[key=value]` predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub key: String,
    pub value: String,
}

impl Predicate {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One path segment in tree-navigation form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: String,
    pub predicates: Vec<Predicate>,
}

impl Segment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicates: Vec::new(),
        }
    }

    pub fn with_predicate(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::new(key, value));
        self
    }

    /// Value of the first predicate with the given key
    pub fn predicate(&self, key: &str) -> Option<&str> {
        self.predicates
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn has_predicates(&self) -> bool {
        !self.predicates.is_empty()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for p in &self.predicates {
            write!(f, "[{}={}]", p.key, p.value)?;
        }
        Ok(())
    }
}

/// A parsed path in tree-navigation form
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the tree root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a path string into navigation segments
    ///
    /// Module prefixes (`module:name`) are stripped to the text after the last
    /// `:`; empty segments are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut segments: Vec<Segment> = Vec::new();
        let mut current: Option<Segment> = None;

        for token in Scanner::new(raw) {
            match token {
                Token::Separator => {
                    if let Some(seg) = current.take() {
                        segments.push(seg);
                    }
                }
                Token::Text(text) => match current.as_mut() {
                    Some(seg) => seg.name.push_str(text),
                    None => current = Some(Segment::new(text)),
                },
                Token::Predicate { key, value } => current
                    .get_or_insert_with(|| Segment::new(""))
                    .predicates
                    .push(Predicate::new(key, value)),
            }
        }
        if let Some(seg) = current.take() {
            segments.push(seg);
        }

        for seg in &mut segments {
            seg.name = strip_module_prefix(&seg.name).to_string();
        }
        segments.retain(|seg| !seg.name.is_empty() || seg.has_predicates());

        Self { segments }
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// This path without its last segment; the root stays the root
    pub fn parent(&self) -> Path {
        let keep = self.segments.len().saturating_sub(1);
        Path {
            segments: self.segments[..keep].to_vec(),
        }
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for seg in &self.segments {
            write!(f, "/{}", seg)?;
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Path::parse(raw)
    }
}

/// Dispatch form of a path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTemplate {
    pub template: String,
    pub vars: VarMap,
}

/// Collapse every predicate group to `{}` and collect predicate values
///
/// ```
/// use yangbind_core::path::template;
///
/// let t = template("/a[x=1]/b[y=2]/c[x=3]");
/// assert_eq!(t.template, "/a{}/b{}/c{}");
/// assert_eq!(t.vars["x"], "1");
/// assert_eq!(t.vars["x#2"], "3");
/// ```
pub fn template(raw: &str) -> PathTemplate {
    let mut out = String::with_capacity(raw.len());
    let mut vars = VarMap::new();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut in_group = false;

    for token in Scanner::new(raw) {
        match token {
            Token::Separator => {
                in_group = false;
                out.push('/');
            }
            Token::Text(text) => {
                in_group = false;
                out.push_str(text);
            }
            Token::Predicate { key, value } => {
                if !in_group {
                    out.push_str("{}");
                    in_group = true;
                }
                let count = seen.entry(key.to_string()).or_insert(0);
                *count += 1;
                let slot = if *count == 1 {
                    key.to_string()
                } else {
                    format!("{}#{}", key, count)
                };
                vars.insert(slot, value.to_string());
            }
        }
    }

    PathTemplate {
        template: out,
        vars,
    }
}

/// Both views of a path at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub path: Path,
    pub template: String,
    pub vars: VarMap,
}

pub fn parse(raw: &str) -> ParsedPath {
    let PathTemplate { template, vars } = template(raw);
    ParsedPath {
        path: Path::parse(raw),
        template,
        vars,
    }
}

/// `module:name` → `name`; names without a prefix are returned unchanged
pub fn strip_module_prefix(name: &str) -> &str {
    match name.rfind(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Separator,
    Text(&'a str),
    Predicate { key: &'a str, value: &'a str },
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn predicate(&mut self) -> Token<'a> {
        // Positioned just past '['
        let rest = &self.src[self.pos..];
        let Some(eq) = rest.find('=') else {
            self.pos = self.src.len();
            return Token::Predicate {
                key: rest,
                value: "",
            };
        };
        let key = &rest[..eq];
        let after = &rest[eq + 1..];
        match after.find(']') {
            Some(close) => {
                self.pos += eq + 1 + close + 1;
                Token::Predicate {
                    key,
                    value: &after[..close],
                }
            }
            None => {
                self.pos = self.src.len();
                Token::Predicate { key, value: after }
            }
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.src[self.pos..];
        let first = rest.chars().next()?;
        match first {
            '/' => {
                self.pos += 1;
                Some(Token::Separator)
            }
            '[' => {
                self.pos += 1;
                Some(self.predicate())
            }
            _ => {
                let end = rest.find(&['/', '['][..]).unwrap_or(rest.len());
                self.pos += end;
                Some(Token::Text(&rest[..end]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_tokens() {
        let tokens: Vec<_> = Scanner::new("/a[k=v]").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Separator,
                Token::Text("a"),
                Token::Predicate {
                    key: "k",
                    value: "v"
                },
            ]
        );
    }

    #[test]
    fn test_value_may_contain_slash() {
        let path = Path::parse("/interfaces/interface[name=Ethernet0/1]/config");
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[1].predicate("name"), Some("Ethernet0/1"));
        assert_eq!(path.segments()[2].name, "config");
    }

    #[test]
    fn test_module_prefix_stripped_for_navigation_only() {
        let raw = "/openconfig-acl:acl/acl-sets";
        assert_eq!(Path::parse(raw).segments()[0].name, "acl");
        assert_eq!(template(raw).template, raw);
    }

    #[test]
    fn test_prefix_strip_uses_last_colon() {
        assert_eq!(strip_module_prefix("a:b:c"), "c");
        assert_eq!(strip_module_prefix("plain"), "plain");
        assert_eq!(strip_module_prefix("trailing:"), "");
    }

    #[test]
    fn test_multiple_predicates_keep_order() {
        let path = Path::parse("/acl-set[name=MyACL1][type=ACL_IPV4]");
        let seg = &path.segments()[0];
        assert_eq!(seg.predicates[0], Predicate::new("name", "MyACL1"));
        assert_eq!(seg.predicates[1], Predicate::new("type", "ACL_IPV4"));
    }

    #[test]
    fn test_consecutive_groups_share_one_placeholder() {
        let t = template("/acl-set[name=A][type=B]/x");
        assert_eq!(t.template, "/acl-set{}/x");
        assert_eq!(t.vars.len(), 2);
    }

    #[test]
    fn test_unterminated_predicate_consumes_rest() {
        let t = template("/a[name=foo/b");
        assert_eq!(t.template, "/a{}");
        assert_eq!(t.vars["name"], "foo/b");

        let path = Path::parse("/a[name=foo/b");
        assert_eq!(path.len(), 1);
        assert_eq!(path.segments()[0].predicate("name"), Some("foo/b"));
    }

    #[test]
    fn test_predicate_without_equals_consumes_rest() {
        let t = template("/a[name");
        assert_eq!(t.template, "/a{}");
        assert_eq!(t.vars.get("name").map(String::as_str), Some(""));
    }

    #[test]
    fn test_empty_segments_skipped() {
        let path = Path::parse("//acl//acl-sets/");
        assert_eq!(path.to_string(), "/acl/acl-sets");
        assert_eq!(template("//acl/").template, "//acl/");
    }

    #[test]
    fn test_parent_of_root_is_root() {
        assert!(Path::root().parent().is_empty());
        assert_eq!(Path::parse("/a/b").parent().to_string(), "/a");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let raw = "/acl/acl-sets/acl-set[name=A][type=ACL_IPV4]/acl-entries";
        let path = Path::parse(raw);
        assert_eq!(path.to_string(), raw);
        assert_eq!(Path::parse(&path.to_string()), path);
    }
}
