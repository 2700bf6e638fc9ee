//! Path-template matching.
//!
//! Templates are split into `/`-separated segments; each segment is either
//! static text or a `{name}` placeholder covering the whole segment. The
//! table stores them in a per-segment trie with at most one placeholder
//! child per node, so matching is a single walk down the tree.

use crate::params::Params;

/// Result of matching a request path against a [`RouteTable`].
#[derive(Debug)]
pub struct PathMatch<'a, T> {
    /// Entry stored for the matched template.
    pub entry: &'a T,
    /// Placeholder values captured during the match.
    pub params: Params,
}

/// A segment trie mapping path templates to entries.
///
/// # Example
///
/// ```rust
/// use capstan_router::RouteTable;
///
/// let mut table = RouteTable::new();
/// table.insert("/users/{id}", "user-service");
/// table.insert("/users/me", "me-service");
///
/// // Static segments win over placeholders.
/// assert_eq!(table.match_path("/users/me").unwrap().entry, &"me-service");
///
/// let matched = table.match_path("/users/123").unwrap();
/// assert_eq!(matched.entry, &"user-service");
/// assert_eq!(matched.params.get("id"), Some("123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable<T> {
    root: Node<T>,
    len: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    static_children: Vec<(String, Node<T>)>,
    /// Placeholder child: the name bound by `{name}` plus its subtree.
    param_child: Option<(String, Box<Node<T>>)>,
    entry: Option<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            static_children: Vec::new(),
            param_child: None,
            entry: None,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl<T> RouteTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }

    /// Inserts a template into the table, replacing any existing entry for
    /// the identical template.
    pub fn insert(&mut self, template: &str, entry: T) {
        let mut node = &mut self.root;
        for segment in segments(template) {
            if let Some(name) = placeholder_name(segment) {
                // Two templates disagreeing on the placeholder name for the
                // same position keep the first name.
                let (_, child) = node
                    .param_child
                    .get_or_insert_with(|| (name.to_string(), Box::new(Node::default())));
                node = &mut **child;
            } else {
                let position = node
                    .static_children
                    .iter()
                    .position(|(s, _)| s == segment);
                let index = match position {
                    Some(i) => i,
                    None => {
                        node.static_children
                            .push((segment.to_string(), Node::default()));
                        node.static_children.len() - 1
                    }
                };
                node = &mut node.static_children[index].1;
            }
        }
        if node.entry.replace(entry).is_none() {
            self.len += 1;
        }
    }

    /// Matches a concrete request path against the table.
    ///
    /// Trailing slashes are normalized (empty segments are skipped), and
    /// static segments take priority over placeholders.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<PathMatch<'_, T>> {
        let segs: Vec<&str> = segments(path).collect();
        let mut params = Params::new();
        let entry = Self::descend(&self.root, &segs, &mut params)?;
        Some(PathMatch { entry, params })
    }

    fn descend<'a>(node: &'a Node<T>, segs: &[&str], params: &mut Params) -> Option<&'a T> {
        let Some((head, tail)) = segs.split_first() else {
            return node.entry.as_ref();
        };

        if let Some((_, child)) = node.static_children.iter().find(|(s, _)| s == head) {
            if let Some(entry) = Self::descend(child, tail, params) {
                return Some(entry);
            }
        }

        if let Some((name, child)) = &node.param_child {
            let before = params.len();
            params.push(name.clone(), (*head).to_string());
            if let Some(entry) = Self::descend(child, tail, params) {
                return Some(entry);
            }
            // Backtrack the speculative capture.
            params.truncate(before);
        }

        None
    }

    /// Returns the number of templates stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the table holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{').and_then(|s| s.strip_suffix('}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_static_path() {
        let mut table = RouteTable::new();
        table.insert("/users", 1);

        assert_eq!(table.match_path("/users").unwrap().entry, &1);
        assert!(table.match_path("/posts").is_none());
    }

    #[test]
    fn matches_placeholder_and_captures() {
        let mut table = RouteTable::new();
        table.insert("/users/{user_id}", "u");

        let matched = table.match_path("/users/42").unwrap();
        assert_eq!(matched.entry, &"u");
        assert_eq!(matched.params.get("user_id"), Some("42"));
    }

    #[test]
    fn static_wins_over_placeholder() {
        let mut table = RouteTable::new();
        table.insert("/users/{id}", "param");
        table.insert("/users/me", "static");

        assert_eq!(table.match_path("/users/me").unwrap().entry, &"static");
        assert_eq!(table.match_path("/users/7").unwrap().entry, &"param");
    }

    #[test]
    fn nested_placeholders() {
        let mut table = RouteTable::new();
        table.insert("/users/{user_id}/posts/{post_id}", "up");

        let matched = table.match_path("/users/3/posts/9").unwrap();
        assert_eq!(matched.params.get("user_id"), Some("3"));
        assert_eq!(matched.params.get("post_id"), Some("9"));
    }

    #[test]
    fn backtracks_from_static_dead_end() {
        let mut table = RouteTable::new();
        table.insert("/files/static", "s");
        table.insert("/files/{name}/raw", "r");

        // "static" matches the static child first but that branch has no
        // continuation for "/raw"; the placeholder branch must be retried.
        let matched = table.match_path("/files/static/raw").unwrap();
        assert_eq!(matched.entry, &"r");
        assert_eq!(matched.params.get("name"), Some("static"));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let mut table = RouteTable::new();
        table.insert("/users", 1);

        assert!(table.match_path("/users/").is_some());
    }

    #[test]
    fn root_path() {
        let mut table = RouteTable::new();
        table.insert("/", "root");
        assert_eq!(table.match_path("/").unwrap().entry, &"root");
    }

    #[test]
    fn replaces_existing_template() {
        let mut table = RouteTable::new();
        table.insert("/users", 1);
        table.insert("/users", 2);

        assert_eq!(table.len(), 1);
        assert_eq!(table.match_path("/users").unwrap().entry, &2);
    }

    #[test]
    fn partial_match_is_not_a_match() {
        let mut table = RouteTable::new();
        table.insert("/users/{id}", "u");

        assert!(table.match_path("/users").is_none());
        assert!(table.match_path("/users/1/extra").is_none());
    }
}
