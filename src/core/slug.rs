//! # Slug Rendering Module / Slug 渲染模块
//!
//! Renders a step's slug template against an environment's variables.
//! Every `+name+` token is replaced by the variable's value, one variable at
//! a time in the variables' iteration order.
//!
//! Substitution is sequential, not single-pass: the output of one replacement
//! is the input of the next, so a value that itself contains `+other+` is
//! expanded again when `other` comes later in the order. There is no escape
//! syntax, and a value containing `+` can form a token together with the
//! surrounding text. Both quirks are kept as-is.
//!
//! 将步骤的 slug 模板按环境变量渲染。替换按顺序逐个变量执行，不是单次遍历。

use crate::core::models::EnvironmentVariable;
use serde::Serialize;

/// Token delimiter around a variable name.
pub const DELIMITER: char = '+';

/// An ordered name→value mapping with dictionary semantics.
///
/// Inserting an existing name replaces its value but keeps its original
/// position, so with duplicated names the last value wins while the
/// substitution order is decided by the first occurrence.
///
/// 具有字典语义的有序 name→value 映射。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Variables {
    entries: Vec<(String, String)>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

impl<'a> FromIterator<&'a EnvironmentVariable> for Variables {
    fn from_iter<I: IntoIterator<Item = &'a EnvironmentVariable>>(iter: I) -> Self {
        iter.into_iter()
            .map(|var| (var.name.clone(), var.value.clone()))
            .collect()
    }
}

/// Renders `template` against `variables`.
///
/// An absent template renders as the empty string. Tokens with no matching
/// variable are left verbatim. Never fails.
///
/// # Examples
/// ```
/// use casebook::core::slug::{render, Variables};
///
/// let vars: Variables = [("env", "prod")].into_iter().collect();
/// assert_eq!(render(Some("/+env+/api"), &vars), "/prod/api");
/// assert_eq!(render(Some("/+missing+/x"), &vars), "/+missing+/x");
/// assert_eq!(render(None, &vars), "");
/// ```
pub fn render(template: Option<&str>, variables: &Variables) -> String {
    let mut rendered = template.unwrap_or_default().to_string();
    for (name, value) in variables.iter() {
        let token = format!("{DELIMITER}{name}{DELIMITER}");
        if rendered.contains(&token) {
            rendered = rendered.replace(&token, value);
        }
    }
    rendered
}
