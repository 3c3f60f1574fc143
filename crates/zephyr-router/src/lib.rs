//! zephyr-router: Zero-dependency segment trie HTTP router
//!
//! Maps `(method, pattern)` pairs to numeric handler IDs. The handlers
//! themselves live elsewhere (see `zephyr_core::App`), so the router stays
//! free of any request/response types.
//!
//! Patterns are `/`-separated; a `:name` segment captures exactly one path
//! segment. When both a static segment and a parameter fit, the static
//! branch is tried first and the parameter only if that branch dead-ends.
//!
//! By default empty segments are ignored, so `/user/` and `/user` are the
//! same path. With [`Router::strict_slashes`] a path containing an empty
//! segment (`//hello`, `/user/42/`) matches nothing.
//!
//! ## Example
//! ```
//! use zephyr_router::Router;
//!
//! let mut router = Router::new();
//! router.insert("GET", "/hello", 0);
//! router.insert("GET", "/user/:id", 1);
//!
//! let m = router.find("GET", "/user/42").unwrap();
//! assert_eq!(m.handler_id, 1);
//! assert_eq!(m.params, vec![("id".to_string(), "42".to_string())]);
//! ```

use std::collections::HashMap;

/// Route match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The matched handler ID
    pub handler_id: u32,
    /// Captured path parameters as (name, raw value) pairs, in pattern order
    pub params: Vec<(String, String)>,
}

impl Match {
    /// Look up a single captured parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct Node {
    statics: HashMap<String, Node>,
    param: Option<Box<(String, Node)>>,
    handler_id: Option<u32>,
}

/// Segment trie router, one tree per HTTP method.
#[derive(Debug, Default)]
pub struct Router {
    /// Uppercased method -> trie root
    trees: HashMap<String, Node>,
    strict_slashes: bool,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject request paths with empty segments instead of collapsing them
    ///
    /// Only lookups are affected; patterns are always normalized on insert,
    /// so this may be toggled after routes are registered.
    pub fn strict_slashes(&mut self, strict: bool) {
        self.strict_slashes = strict;
    }

    /// Insert a route
    ///
    /// `method` is case-insensitive here; it is stored uppercased and
    /// [`Router::find`] compares it exactly. Inserting the same pattern
    /// twice replaces the earlier handler ID. The first `:name` registered
    /// at a given depth names the parameter for every later pattern sharing
    /// that prefix.
    pub fn insert(&mut self, method: &str, pattern: &str, handler_id: u32) {
        let mut node = self.trees.entry(method.to_ascii_uppercase()).or_default();

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            node = match segment.strip_prefix(':') {
                Some(name) => {
                    let param = node
                        .param
                        .get_or_insert_with(|| Box::new((name.to_string(), Node::default())));
                    &mut param.1
                }
                None => node.statics.entry(segment.to_string()).or_default(),
            };
        }
        node.handler_id = Some(handler_id);
    }

    /// Find a matching route
    ///
    /// `method` must be uppercase, as it appears on the wire. `path` must
    /// not carry a query string.
    ///
    /// ```
    /// use zephyr_router::Router;
    ///
    /// let mut router = Router::new();
    /// router.insert("get", "/user/:id", 7);
    ///
    /// assert_eq!(router.find("GET", "/user/abc").unwrap().param("id"), Some("abc"));
    /// assert!(router.find("get", "/user/abc").is_none());
    /// assert!(router.find("POST", "/user/abc").is_none());
    /// assert!(router.find("GET", "/user").is_none());
    /// ```
    pub fn find(&self, method: &str, path: &str) -> Option<Match> {
        let tree = self.trees.get(method)?;
        let segments = self.segments(path)?;
        let mut params = Vec::new();
        let handler_id = lookup(tree, &segments, &mut params)?;
        Some(Match { handler_id, params })
    }

    /// Methods with a route matching `path`, sorted alphabetically.
    ///
    /// Used to tell "wrong method" (405) apart from "no such path" (404),
    /// and to fill `Allow` headers.
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        let Some(segments) = self.segments(path) else {
            return Vec::new();
        };
        let mut methods: Vec<String> = self
            .trees
            .iter()
            .filter(|(_, tree)| lookup(tree, &segments, &mut Vec::new()).is_some())
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort();
        methods
    }

    fn segments<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        if !self.strict_slashes {
            return Some(path.split('/').filter(|s| !s.is_empty()).collect());
        }

        let rest = path.strip_prefix('/')?;
        if rest.is_empty() {
            return Some(Vec::new());
        }
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(segments)
    }
}

fn lookup(node: &Node, segments: &[&str], params: &mut Vec<(String, String)>) -> Option<u32> {
    let Some((&segment, rest)) = segments.split_first() else {
        return node.handler_id;
    };

    if let Some(id) = node
        .statics
        .get(segment)
        .and_then(|child| lookup(child, rest, params))
    {
        return Some(id);
    }

    let (name, child) = node.param.as_deref()?;
    params.push((name.clone(), segment.to_string()));
    let found = lookup(child, rest, params);
    if found.is_none() {
        params.pop();
    }
    found
}
