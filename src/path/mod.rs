//! Attribute path resolution.
//!
//! An attribute path is a dot-separated navigation such as
//! `order.customer.name`: every part but the last is a relation hop and the
//! last part is the attribute. Each relation prefix is bound to an alias made
//! of its segments with the dots removed (`order.customer` → `ordercustomer`).

/// Attribute path decomposed into relation hops and a final attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Whether the path crosses at least one relation.
    pub is_related: bool,
    /// Number of relation hops.
    pub hop_count: usize,
    /// Relation segments, in navigation order.
    pub segments: Vec<String>,
    /// Alias bound to the entity owning the final attribute.
    pub relation_alias_name: String,
    pub final_attribute_name: String,
}

impl ResolvedPath {
    /// `<alias>.<attribute>`.
    pub fn qualified_identifier(&self) -> String {
        format!("{}.{}", self.relation_alias_name, self.final_attribute_name)
    }

    /// Alias of the first `len` relation segments.
    pub fn prefix_alias(&self, len: usize) -> String {
        self.segments[..len].concat()
    }
}

/// Classifies attribute paths and names their aliases.
pub trait PathResolver: Send + Sync {
    /// Alias bound to the root entity.
    fn root_alias(&self) -> &str;

    fn resolve(&self, attribute_path: &str) -> ResolvedPath;
}

/// Resolves plain dotted paths; local attributes belong to the root alias.
#[derive(Debug, Clone)]
pub struct DottedPathResolver {
    root_alias: String,
}

impl DottedPathResolver {
    pub fn new(root_alias: &str) -> Self {
        Self {
            root_alias: root_alias.into(),
        }
    }
}

impl Default for DottedPathResolver {
    fn default() -> Self {
        Self::new("obj")
    }
}

impl PathResolver for DottedPathResolver {
    fn root_alias(&self) -> &str {
        &self.root_alias
    }

    fn resolve(&self, attribute_path: &str) -> ResolvedPath {
        match attribute_path.rsplit_once('.') {
            Some((relation, attribute)) => {
                let segments: Vec<String> = relation.split('.').map(String::from).collect();
                ResolvedPath {
                    is_related: true,
                    hop_count: segments.len(),
                    relation_alias_name: segments.concat(),
                    segments,
                    final_attribute_name: attribute.to_string(),
                }
            }
            None => ResolvedPath {
                is_related: false,
                hop_count: 0,
                segments: vec![],
                relation_alias_name: self.root_alias.clone(),
                final_attribute_name: attribute_path.to_string(),
            },
        }
    }
}
