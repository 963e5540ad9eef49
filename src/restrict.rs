//! Datatype restriction rules: which tags are selectable at a node, and the
//! rules handed down to container children.
//!
//! A restriction dictionary maps tag names to rules. A dictionary that names
//! no tags allows everything; otherwise exactly the truthy-marked tags are
//! allowed. For the `array` and `object` keys, the rule may itself be a
//! nested dictionary, which becomes the restriction applied to array-element
//! or object-entry children. The same dictionary shape recurses to any depth.

use crate::{EditorError, EditorResult, Tag, TagSet};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// The rule attached to one tag key in a restriction dictionary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagRule {
    /// Plain inclusion (`true`) or exclusion (`false`).
    Allow(bool),
    /// Inclusion with a nested dictionary for the container's children.
    /// Only meaningful on the `array` and `object` keys.
    Nested(Restriction),
}

impl TagRule {
    /// Whether this rule marks its tag as selectable.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        match self {
            TagRule::Allow(b) => *b,
            TagRule::Nested(_) => true,
        }
    }
}

/// A restriction dictionary: an ordered map from tags to rules.
///
/// The empty dictionary is the unrestricted default.
///
/// # Examples
///
/// ```
/// use value_editor::{Restriction, Tag};
///
/// let rules = Restriction::unrestricted()
///     .allow(Tag::String)
///     .allow(Tag::Number);
/// let allowed = rules.allowed_tags();
/// assert!(allowed.contains(Tag::String));
/// assert!(!allowed.contains(Tag::Array));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Restriction(BTreeMap<Tag, TagRule>);

impl Restriction {
    /// The unrestricted dictionary (allows all seven tags).
    #[inline]
    pub fn unrestricted() -> Self {
        Restriction(BTreeMap::new())
    }

    /// Check whether this dictionary names no tags at all.
    #[inline]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Mark a tag as allowed (builder pattern).
    pub fn allow(mut self, tag: Tag) -> Self {
        self.0.insert(tag, TagRule::Allow(true));
        self
    }

    /// Mark a tag as excluded (builder pattern).
    pub fn deny(mut self, tag: Tag) -> Self {
        self.0.insert(tag, TagRule::Allow(false));
        self
    }

    /// Allow a container tag with a nested dictionary for its children
    /// (builder pattern).
    pub fn nested(mut self, tag: Tag, rules: Restriction) -> Self {
        self.0.insert(tag, TagRule::Nested(rules));
        self
    }

    /// Get the rule for a tag, if any.
    #[inline]
    pub fn get(&self, tag: Tag) -> Option<&TagRule> {
        self.0.get(&tag)
    }

    /// Derive the set of selectable tags.
    ///
    /// An empty dictionary allows all tags. A dictionary whose named tags are
    /// all falsy also falls open to the full set rather than producing an
    /// empty (unusable) set.
    pub fn allowed_tags(&self) -> TagSet {
        if self.0.is_empty() {
            return TagSet::all();
        }
        let set: TagSet = self
            .0
            .iter()
            .filter(|(_, rule)| rule.is_truthy())
            .map(|(tag, _)| *tag)
            .collect();
        if set.is_empty() {
            TagSet::all()
        } else {
            set
        }
    }

    /// The restriction handed to array-element children.
    pub fn item_rules(&self) -> Restriction {
        match self.0.get(&Tag::Array) {
            Some(TagRule::Nested(rules)) => rules.clone(),
            _ => Restriction::unrestricted(),
        }
    }

    /// The restriction handed to object-entry children.
    pub fn entry_rules(&self) -> Restriction {
        match self.0.get(&Tag::Object) {
            Some(TagRule::Nested(rules)) => rules.clone(),
            _ => Restriction::unrestricted(),
        }
    }

    /// Parse a restriction dictionary from JSON, failing open.
    ///
    /// Non-object input and unknown keys are ignored; values use truthiness
    /// (`false`, `null`, `0`, `NaN` and `""` exclude a tag, everything else
    /// includes it). Object values under the `array`/`object` keys become
    /// nested dictionaries.
    pub fn from_json(json: &Json) -> Restriction {
        let Json::Object(map) = json else {
            return Restriction::unrestricted();
        };
        let mut rules = BTreeMap::new();
        for (key, value) in map {
            let Some(tag) = Tag::from_name(key) else {
                continue;
            };
            let rule = match value {
                Json::Object(_) if tag.is_container() => {
                    TagRule::Nested(Restriction::from_json(value))
                }
                other => TagRule::Allow(json_truthy(other)),
            };
            rules.insert(tag, rule);
        }
        Restriction(rules)
    }

    /// Parse a restriction dictionary from JSON, rejecting malformed input.
    ///
    /// Unlike `from_json`, unknown keys, non-object roots, and nested
    /// dictionaries under non-container keys are reported as errors.
    pub fn try_from_json(json: &Json) -> EditorResult<Restriction> {
        let Json::Object(map) = json else {
            return Err(EditorError::invalid_restriction(format!(
                "expected object, found {}",
                json_type_name(json)
            )));
        };
        let mut rules = BTreeMap::new();
        for (key, value) in map {
            let tag = Tag::from_name(key)
                .ok_or_else(|| EditorError::invalid_restriction(format!("unknown tag: {key}")))?;
            let rule = match value {
                Json::Bool(b) => TagRule::Allow(*b),
                Json::Object(_) if tag.is_container() => {
                    TagRule::Nested(Restriction::try_from_json(value)?)
                }
                Json::Object(_) => {
                    return Err(EditorError::invalid_restriction(format!(
                        "nested dictionary under non-container tag: {tag}"
                    )));
                }
                other => {
                    return Err(EditorError::invalid_restriction(format!(
                        "expected bool or dictionary for {tag}, found {}",
                        json_type_name(other)
                    )));
                }
            };
            rules.insert(tag, rule);
        }
        Ok(Restriction(rules))
    }
}

fn json_truthy(json: &Json) -> bool {
    match json {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Json::String(s) => !s.is_empty(),
        Json::Array(_) | Json::Object(_) => true,
    }
}

fn json_type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_dictionary_allows_all() {
        assert_eq!(Restriction::unrestricted().allowed_tags(), TagSet::all());
    }

    #[test]
    fn test_named_truthy_subset() {
        let rules = Restriction::unrestricted()
            .allow(Tag::String)
            .allow(Tag::Number)
            .deny(Tag::Array);
        let allowed = rules.allowed_tags();
        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains(Tag::String));
        assert!(allowed.contains(Tag::Number));
        // Tags never named are excluded too.
        assert!(!allowed.contains(Tag::Null));
    }

    #[test]
    fn test_all_falsy_fails_open() {
        let rules = Restriction::unrestricted().deny(Tag::String);
        assert_eq!(rules.allowed_tags(), TagSet::all());
    }

    #[test]
    fn test_nested_rules_propagate() {
        let inner = Restriction::unrestricted().allow(Tag::Number);
        let rules = Restriction::unrestricted()
            .allow(Tag::String)
            .nested(Tag::Array, inner.clone());

        // A nested rule counts as truthy for the parent's allowed set.
        assert!(rules.allowed_tags().contains(Tag::Array));
        assert_eq!(rules.item_rules(), inner);
        // No nested dictionary on the object key: entries are unrestricted.
        assert!(rules.entry_rules().is_unrestricted());
    }

    #[test]
    fn test_from_json_truthiness() {
        let rules = Restriction::from_json(&json!({
            "string": true,
            "number": 1,
            "boolean": 0,
            "null": "",
            "undefined": "yes"
        }));
        let allowed = rules.allowed_tags();
        assert!(allowed.contains(Tag::String));
        assert!(allowed.contains(Tag::Number));
        assert!(allowed.contains(Tag::Undefined));
        assert!(!allowed.contains(Tag::Boolean));
        assert!(!allowed.contains(Tag::Null));
    }

    #[test]
    fn test_from_json_nested() {
        let rules = Restriction::from_json(&json!({
            "array": {"string": true},
            "object": true
        }));
        assert!(rules.item_rules().allowed_tags().contains(Tag::String));
        assert!(!rules.item_rules().allowed_tags().contains(Tag::Number));
        assert!(rules.entry_rules().is_unrestricted());
    }

    #[test]
    fn test_from_json_fails_open() {
        assert!(Restriction::from_json(&json!(42)).is_unrestricted());
        assert!(Restriction::from_json(&json!("nope")).is_unrestricted());
        assert!(Restriction::from_json(&json!(null)).is_unrestricted());
        // Unknown keys are skipped, known keys still apply.
        let rules = Restriction::from_json(&json!({"function": true, "string": true}));
        assert_eq!(rules.allowed_tags().len(), 1);
    }

    #[test]
    fn test_try_from_json_rejects_malformed() {
        assert!(Restriction::try_from_json(&json!([])).is_err());
        assert!(Restriction::try_from_json(&json!({"function": true})).is_err());
        assert!(Restriction::try_from_json(&json!({"string": {"number": true}})).is_err());
        assert!(Restriction::try_from_json(&json!({"string": 1})).is_err());

        let rules = Restriction::try_from_json(&json!({"array": {"number": true}})).unwrap();
        assert!(rules.item_rules().allowed_tags().contains(Tag::Number));
    }

    #[test]
    fn test_restriction_serde_roundtrip() {
        let rules = Restriction::unrestricted()
            .allow(Tag::String)
            .nested(Tag::Array, Restriction::unrestricted().allow(Tag::Number));
        let json = serde_json::to_string(&rules).unwrap();
        let parsed: Restriction = serde_json::from_str(&json).unwrap();
        assert_eq!(rules, parsed);
    }
}
