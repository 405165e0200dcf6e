use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default tag key holding a field's visibility groups.
pub const DEFAULT_TAG_KEY: &str = "groups";

/// How requested groups are matched against a field's groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    /// The field belongs to at least one requested group.
    #[default]
    Or,
    /// The field belongs to every requested group.
    And,
}

/// What happens when nesting goes past the maximum depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthPolicy {
    /// The over-deep value is replaced and encoding continues.
    #[default]
    Truncate,
    /// Encoding fails with `DepthExceeded`.
    Error,
}

/// Replacement for a truncated map or sequence. Records always become `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffCollection {
    #[default]
    Null,
    /// `{}` for maps, `[]` for sequences.
    Empty,
}

/// Options of one encode call.
///
/// Builder methods take and return the configuration by value, so a base
/// configuration can be shared and specialised per call.
///
/// ```
/// use gj_encode::{EncodeConfig, GroupMode};
///
/// let base = EncodeConfig::new().with_groups(["public"]);
/// let admin = base.clone().with_groups(["public", "admin"]).with_group_mode(GroupMode::And);
///
/// assert_eq!(base.groups(), ["public"]);
/// assert_eq!(admin.group_mode(), GroupMode::And);
/// assert_eq!(admin.max_depth(), 32);
/// ```
///
/// It can also be loaded from any serde format; missing keys keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    groups: Vec<String>,
    group_mode: GroupMode,
    tag_key: String,
    top_level_key: Option<String>,
    #[serde(deserialize_with = "deserialize_max_depth")]
    max_depth: usize,
    depth_policy: DepthPolicy,
    cutoff_collection: CutoffCollection,
    escape_html: bool,
    sort_keys: bool,
    allow_map: bool,
    allow_slice: bool,
}

fn deserialize_max_depth<'de, D: serde::Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    usize::deserialize(d).map(|depth| depth.max(1))
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            group_mode: GroupMode::Or,
            tag_key: String::from(DEFAULT_TAG_KEY),
            top_level_key: None,
            max_depth: DEFAULT_MAX_DEPTH,
            depth_policy: DepthPolicy::Truncate,
            cutoff_collection: CutoffCollection::Null,
            escape_html: false,
            sort_keys: false,
            allow_map: false,
            allow_slice: false,
        }
    }
}

impl EncodeConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the requested groups. Duplicates are dropped.
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.clear();
        for group in groups {
            let group = group.into();
            if !self.groups.contains(&group) {
                self.groups.push(group);
            }
        }
        self
    }

    #[must_use]
    pub fn with_group_mode(mut self, mode: GroupMode) -> Self {
        self.group_mode = mode;
        self
    }

    /// Sets the tag key that holds visibility groups.
    #[must_use]
    pub fn with_tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Wraps the output as `{"<key>": ...}`.
    #[must_use]
    pub fn with_top_level_key(mut self, key: impl Into<String>) -> Self {
        self.top_level_key = Some(key.into());
        self
    }

    /// Sets the maximum nesting depth; values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn with_depth_policy(mut self, policy: DepthPolicy) -> Self {
        self.depth_policy = policy;
        self
    }

    #[must_use]
    pub fn with_cutoff_collection(mut self, cutoff: CutoffCollection) -> Self {
        self.cutoff_collection = cutoff;
        self
    }

    /// Escapes `<`, `>` and `&` in strings.
    #[must_use]
    pub fn with_escape_html(mut self, on: bool) -> Self {
        self.escape_html = on;
        self
    }

    /// Emits map entries sorted by key.
    #[must_use]
    pub fn with_sort_keys(mut self, on: bool) -> Self {
        self.sort_keys = on;
        self
    }

    /// Accepts a map as root value.
    #[must_use]
    pub fn allow_map(mut self, on: bool) -> Self {
        self.allow_map = on;
        self
    }

    /// Accepts a sequence as root value, emitted as `{"data": [...]}`.
    #[must_use]
    pub fn allow_slice(mut self, on: bool) -> Self {
        self.allow_slice = on;
        self
    }

    #[inline]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    #[inline]
    pub fn group_mode(&self) -> GroupMode {
        self.group_mode
    }

    #[inline]
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    #[inline]
    pub fn top_level_key(&self) -> Option<&str> {
        self.top_level_key.as_deref()
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn depth_policy(&self) -> DepthPolicy {
        self.depth_policy
    }

    #[inline]
    pub fn cutoff_collection(&self) -> CutoffCollection {
        self.cutoff_collection
    }

    #[inline]
    pub fn escape_html(&self) -> bool {
        self.escape_html
    }

    #[inline]
    pub fn sort_keys(&self) -> bool {
        self.sort_keys
    }

    #[inline]
    pub fn allows_map(&self) -> bool {
        self.allow_map
    }

    #[inline]
    pub fn allows_slice(&self) -> bool {
        self.allow_slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_returns_copies() {
        let base = EncodeConfig::new();
        let changed = base.clone().with_max_depth(0).with_sort_keys(true);

        assert_eq!(base.max_depth(), DEFAULT_MAX_DEPTH);
        assert!(!base.sort_keys());
        assert_eq!(changed.max_depth(), 1);
        assert!(changed.sort_keys());
    }

    #[test]
    fn duplicate_groups_are_dropped() {
        let config = EncodeConfig::new().with_groups(["a", "b", "a"]);
        assert_eq!(config.groups(), ["a", "b"]);
    }

    #[test]
    fn deserialize_from_ron() {
        let config: EncodeConfig = ron::from_str(
            r#"(
                groups: ["public", "admin"],
                group_mode: and,
                max_depth: 0,
                depth_policy: error,
                top_level_key: Some("data"),
            )"#,
        )
        .unwrap();

        assert_eq!(config.groups(), ["public", "admin"]);
        assert_eq!(config.group_mode(), GroupMode::And);
        assert_eq!(config.max_depth(), 1);
        assert_eq!(config.depth_policy(), DepthPolicy::Error);
        assert_eq!(config.top_level_key(), Some("data"));
        assert_eq!(config.tag_key(), DEFAULT_TAG_KEY);
        assert_eq!(config.cutoff_collection(), CutoffCollection::Null);
    }
}
