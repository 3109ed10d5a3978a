use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// A single parameter value contributing to a cache key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamValue {
    Int(i64),
    /// Unordered id set. Stored sorted and de-duplicated.
    IntSet(Vec<i64>),
    Text(String),
}

impl ParamValue {
    pub fn int_set<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        ParamValue::IntSet(ids)
    }

    fn render_into(&self, out: &mut String) {
        match self {
            ParamValue::Int(v) => out.push_str(&v.to_string()),
            ParamValue::IntSet(ids) => {
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&id.to_string());
                }
            }
            ParamValue::Text(s) => {
                for c in s.chars() {
                    match c {
                        '%' => out.push_str("%25"),
                        '&' => out.push_str("%26"),
                        '=' => out.push_str("%3D"),
                        '?' => out.push_str("%3F"),
                        c => out.push(c),
                    }
                }
            }
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<&[i64]> for ParamValue {
    fn from(ids: &[i64]) -> Self {
        ParamValue::int_set(ids.iter().copied())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(ids: Vec<i64>) -> Self {
        ParamValue::int_set(ids)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Deterministic cache key: `operation?name=value&name=value`, parameters
/// sorted by name.
///
/// Cloning is an `Arc` bump.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(Arc<str>);

impl CacheKey {
    pub fn builder(operation: &str) -> CacheKeyBuilder {
        CacheKeyBuilder {
            operation: operation.to_string(),
            params: SmallVec::new(),
        }
    }

    /// Key for an operation without parameters.
    pub fn bare(operation: &str) -> Self {
        Self(Arc::from(operation))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn operation_name(&self) -> &str {
        match self.0.split_once('?') {
            Some((op, _)) => op,
            None => &self.0,
        }
    }

    pub fn belongs_to(&self, operation: &str) -> bool {
        self.operation_name() == operation
    }

    /// Rendered value of parameter `name`, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.0.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct CacheKeyBuilder {
    operation: String,
    params: SmallVec<[(&'static str, ParamValue); 4]>,
}

impl CacheKeyBuilder {
    pub fn param(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    pub fn build(mut self) -> CacheKey {
        // Sorting on (name, value) keeps the key independent of the order in
        // which parameters were supplied, even for repeated names.
        self.params.sort();

        let mut rendered = self.operation;
        for (i, (name, value)) in self.params.iter().enumerate() {
            rendered.push(if i == 0 { '?' } else { '&' });
            rendered.push_str(name);
            rendered.push('=');
            value.render_into(&mut rendered);
        }

        CacheKey(Arc::from(rendered))
    }
}
