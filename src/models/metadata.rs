use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::marker::Marker;
use crate::error::ConfigError;

pub type TagSet = BTreeSet<String>;

/// Build a [`TagSet`] from anything string-like.
pub fn tag_set<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter().map(Into::into).collect()
}

/// One call signature of a parameterized test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default)]
    pub positional: Vec<Value>,
    #[serde(default)]
    pub keyword: Map<String, Value>,
}

impl Argument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: Map::new(),
        }
    }

    pub fn with_keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Positional value at `index`, or `None` if absent or not a `T`.
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Option<T> {
        self.positional
            .get(index)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Keyword value named `name`, or `None` if absent or not a `T`.
    pub fn kwarg<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.keyword
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// One single-positional [`Argument`] per value, in order.
pub fn each<I, T>(values: I) -> Vec<Argument>
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    values
        .into_iter()
        .map(|v| Argument::positional([v]))
        .collect()
}

/// Execution policy of one registered test.
#[derive(Debug)]
pub struct TestMetadata {
    pub marker: Option<Marker>,
    pub comment: Option<String>,
    pub tags: TagSet,
    pub arguments: Vec<Argument>,
    /// How many times the full argument matrix runs. Always at least 1.
    pub launch_count: usize,
    pub is_fixture: bool,
}

impl Default for TestMetadata {
    fn default() -> Self {
        Self {
            marker: None,
            comment: None,
            tags: TagSet::new(),
            arguments: Vec::new(),
            launch_count: 1,
            is_fixture: false,
        }
    }
}

/// Options of the `test(...)` registration call.
#[derive(Debug, Clone)]
pub struct TestConfig {
    comment: Option<String>,
    comment_args: Map<String, Value>,
    tags: TagSet,
    launch_count: usize,
    arguments: Vec<Argument>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            comment: None,
            comment_args: Map::new(),
            tags: TagSet::new(),
            launch_count: 1,
            arguments: Vec::new(),
        }
    }
}

impl TestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Human label. May contain `{name}` placeholders filled from
    /// [`comment_arg`](Self::comment_arg) values at registration time.
    pub fn comment(mut self, template: impl Into<String>) -> Self {
        self.comment = Some(template.into());
        self
    }

    pub fn comment_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.comment_args.insert(name.into(), value.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tag_set(tags);
        self
    }

    pub fn launch_count(mut self, count: usize) -> Self {
        self.launch_count = count;
        self
    }

    pub fn arguments<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = Argument>,
    {
        self.arguments = arguments.into_iter().collect();
        self
    }

    /// Overwrite the non-marker fields of `meta` with this configuration.
    ///
    /// Fails without touching `meta` if the comment template cannot be
    /// resolved or the launch count is zero.
    pub(crate) fn apply(&self, name: &str, meta: &mut TestMetadata) -> Result<(), ConfigError> {
        if self.launch_count == 0 {
            return Err(ConfigError::ZeroLaunchCount {
                name: name.to_string(),
            });
        }
        let comment = self
            .comment
            .as_deref()
            .map(|template| render_comment(template, &self.comment_args))
            .transpose()?;

        meta.comment = comment;
        meta.tags = self.tags.clone();
        meta.arguments = self.arguments.clone();
        meta.launch_count = self.launch_count;
        Ok(())
    }
}

/// Resolve `{name}` placeholders against `args`. `{{` and `}}` are literal
/// braces. String values are inserted without quotes.
pub fn render_comment(template: &str, args: &Map<String, Value>) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut placeholder = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(inner);
                }
                if !closed {
                    return Err(ConfigError::MalformedTemplate {
                        template: template.to_string(),
                        brace: '{',
                        offset,
                    });
                }
                match args.get(placeholder.trim()) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        return Err(ConfigError::UnresolvedPlaceholder {
                            template: template.to_string(),
                            placeholder,
                        });
                    }
                }
            }
            '}' => {
                return Err(ConfigError::MalformedTemplate {
                    template: template.to_string(),
                    brace: '}',
                    offset,
                });
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn plain_comment_is_unchanged() {
        assert_eq!(
            render_comment("async test example", &Map::new()).unwrap(),
            "async test example"
        );
    }

    #[test]
    fn placeholders_resolve_against_keyword_values() {
        let rendered = render_comment(
            "adds {a} to {who} {{literal}}",
            &args(json!({"a": 2, "who": "b"})),
        )
        .unwrap();
        assert_eq!(rendered, "adds 2 to b {literal}");
    }

    #[test]
    fn unknown_placeholder_is_a_config_error() {
        let err = render_comment("uses {missing}", &Map::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnresolvedPlaceholder {
                template: "uses {missing}".into(),
                placeholder: "missing".into(),
            }
        );
    }

    #[test]
    fn stray_braces_are_config_errors() {
        assert!(matches!(
            render_comment("open {", &Map::new()),
            Err(ConfigError::MalformedTemplate { brace: '{', .. })
        ));
        assert!(matches!(
            render_comment("close } here", &Map::new()),
            Err(ConfigError::MalformedTemplate {
                brace: '}',
                offset: 6,
                ..
            })
        ));
    }

    #[test]
    fn apply_rejects_zero_launches_and_leaves_metadata_alone() {
        let mut meta = TestMetadata {
            comment: Some("kept".into()),
            ..Default::default()
        };
        let err = TestConfig::new()
            .comment("new")
            .launch_count(0)
            .apply("t", &mut meta)
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroLaunchCount { name: "t".into() });
        assert_eq!(meta.comment.as_deref(), Some("kept"));
    }

    #[test]
    fn each_builds_one_argument_per_value() {
        let built = each([2, 3]);
        assert_eq!(
            built,
            vec![Argument::positional([2]), Argument::positional([3])]
        );
        assert_eq!(built[1].arg::<i64>(0), Some(3));
    }

    #[test]
    fn typed_accessors_reject_missing_or_mismatched_values() {
        let argument = Argument::positional(["text"]).with_keyword("n", 7);
        assert_eq!(argument.arg::<i64>(0), None);
        assert_eq!(argument.arg::<String>(0).as_deref(), Some("text"));
        assert_eq!(argument.kwarg::<u32>("n"), Some(7));
        assert_eq!(argument.kwarg::<u32>("m"), None);
    }
}
