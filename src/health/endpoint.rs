//! 端点数据结构
//!
//! 一次运行期间只读的端点集合

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 被检测的HTTP端点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// 端点名称（唯一）
    pub name: String,
    /// 端点URL
    pub url: String,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// 端点集合，名称唯一
///
/// 迭代顺序按名称排序，保证每次运行的派发顺序一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointSet {
    endpoints: BTreeMap<String, Endpoint>,
}

impl EndpointSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入端点，同名端点会被替换并返回旧值
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) -> Option<Endpoint> {
        let endpoint = Endpoint::new(name, url);
        self.endpoints.insert(endpoint.name.clone(), endpoint)
    }

    pub fn get(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.get(name)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }
}

impl<N, U> FromIterator<(N, U)> for EndpointSet
where
    N: Into<String>,
    U: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, U)>>(iter: I) -> Self {
        let mut set = EndpointSet::new();
        for (name, url) in iter {
            set.insert(name, url);
        }
        set
    }
}

impl IntoIterator for EndpointSet {
    type Item = Endpoint;
    type IntoIter = std::collections::btree_map::IntoValues<String, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut set = EndpointSet::new();
        assert!(set.insert("svc1", "https://a.example.com").is_none());

        let replaced = set.insert("svc1", "https://b.example.com");
        assert_eq!(replaced.map(|e| e.url), Some("https://a.example.com".to_string()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("svc1").unwrap().url, "https://b.example.com");
    }

    #[test]
    fn test_iteration_is_sorted_by_name() {
        let set: EndpointSet = vec![
            ("zeta", "https://z.example.com"),
            ("alpha", "https://a.example.com"),
            ("mid", "https://m.example.com"),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = set.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
