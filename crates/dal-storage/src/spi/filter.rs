use std::cmp::Ordering;

use serde_json::Value;

use crate::model::DELETED_FIELD;

/// Visibility of soft-deleted documents. Reads exclude them unless a caller
/// asks otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletedFilter {
    #[default]
    Exclude,
    Include,
    Only,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
}

impl Condition {
    fn matches(&self, actual: &Value) -> bool {
        match self {
            Condition::Eq(expected) => actual == expected,
            Condition::Ne(expected) => actual != expected,
            Condition::In(values) => values.contains(actual),
            Condition::Nin(values) => !values.contains(actual),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
    deleted: DeletedFilter,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Eq(value.into()))
    }

    pub fn ne(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Ne(value.into()))
    }

    pub fn is_in(self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.with(field, Condition::In(values))
    }

    pub fn not_in(self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.with(field, Condition::Nin(values))
    }

    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.conditions.push((field.into(), condition));
        self
    }

    pub fn deleted(mut self, mode: DeletedFilter) -> Self {
        self.deleted = mode;
        self
    }

    pub fn deleted_mode(&self) -> DeletedFilter {
        self.deleted
    }

    pub fn conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    /// Value the filter pins `field` to by equality, if any.
    pub fn equals(&self, field: &str) -> Option<&Value> {
        self.conditions.iter().find_map(|(name, cond)| match cond {
            Condition::Eq(value) if name == field => Some(value),
            _ => None,
        })
    }

    pub fn matches(&self, doc: &Value) -> bool {
        let deleted = matches!(doc.get(DELETED_FIELD), Some(Value::Bool(true)));
        let visible = match self.deleted {
            DeletedFilter::Exclude => !deleted,
            DeletedFilter::Include => true,
            DeletedFilter::Only => deleted,
        };
        visible
            && self.conditions.iter().all(|(field, cond)| {
                let actual = lookup(doc, field).unwrap_or(&Value::Null);
                cond.matches(actual)
            })
    }
}

/// Resolves a dotted path inside a document.
pub(crate) fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |cursor, segment| cursor.get(segment))
}

pub(crate) fn json_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(sa), Value::String(sb)) => sa.cmp(sb),
        (Value::Number(na), Value::Number(nb)) => {
            let lhs = na.as_f64().unwrap_or_default();
            let rhs = nb.as_f64().unwrap_or_default();
            lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(ba), Value::Bool(bb)) => ba.cmp(bb),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn excludes_deleted_by_default() {
        let live = json!({"name": "a", "deleted": false});
        let gone = json!({"name": "a", "deleted": true});
        let legacy = json!({"name": "a"});

        let filter = Filter::new().eq("name", "a");
        assert!(filter.matches(&live));
        assert!(filter.matches(&legacy));
        assert!(!filter.matches(&gone));

        let all = filter.clone().deleted(DeletedFilter::Include);
        assert!(all.matches(&gone));

        let only = filter.deleted(DeletedFilter::Only);
        assert!(only.matches(&gone));
        assert!(!only.matches(&live));
    }

    #[test]
    fn operators_and_nested_paths() {
        let doc = json!({"channel": "email", "meta": {"rank": 2}});
        assert!(Filter::new().ne("channel", "sms").matches(&doc));
        assert!(Filter::new()
            .is_in("channel", vec![json!("email"), json!("push")])
            .matches(&doc));
        assert!(!Filter::new()
            .not_in("channel", vec![json!("email")])
            .matches(&doc));
        assert!(Filter::new().eq("meta.rank", 2).matches(&doc));
        assert!(Filter::new().eq("missing", Value::Null).matches(&doc));
    }

    #[test]
    fn equals_only_reports_equality_conditions() {
        let filter = Filter::new().ne("_environmentId", "E2").eq("_organizationId", "O1");
        assert_eq!(filter.equals("_organizationId"), Some(&json!("O1")));
        assert_eq!(filter.equals("_environmentId"), None);
    }
}
