#![cfg(feature = "surreal")]

use serde_json::Value;

use crate::errors::{StorageError, StorageResult};
use crate::model::{Sort, DELETED_FIELD};
use crate::spi::filter::{Condition, DeletedFilter, Filter};
use crate::spi::pipeline::{Pipeline, Stage};
use crate::spi::query::NamedArgs;

const DEFAULT_PREFIX: &str = "filter";

/// SurrealQL fragments compiled from a [`Pipeline`].
#[derive(Debug, Default, PartialEq)]
pub struct CompiledPipeline {
    pub where_clause: String,
    pub order_clause: String,
    pub limit: Option<u64>,
    pub start: Option<u64>,
}

pub fn append_where(target: &mut String, clause: &str) {
    if clause.trim().is_empty() {
        return;
    }
    if !target.trim().is_empty() {
        target.push_str(" AND ");
    }
    target.push('(');
    target.push_str(clause);
    target.push(')');
}

pub fn build_filter_clause(
    filter: &Filter,
    params: &mut NamedArgs,
    prefix: &str,
) -> StorageResult<String> {
    let prefix = sanitize_prefix(prefix);
    let mut counter = 0usize;
    let mut clause = String::new();
    for (field, condition) in filter.conditions() {
        validate_identifier(field)?;
        let fragment = match condition {
            Condition::Eq(operand) => bind_compare(field, "=", operand, params, &prefix, &mut counter),
            Condition::Ne(operand) => bind_compare(field, "!=", operand, params, &prefix, &mut counter),
            Condition::In(values) => {
                let param = bind(Value::Array(values.clone()), params, &prefix, &mut counter);
                format!("{field} IN ${param}")
            }
            Condition::Nin(values) => {
                let param = bind(Value::Array(values.clone()), params, &prefix, &mut counter);
                format!("NOT ({field} IN ${param})")
            }
        };
        append_where(&mut clause, &fragment);
    }
    match filter.deleted_mode() {
        DeletedFilter::Exclude => append_where(&mut clause, &format!("{DELETED_FIELD} != true")),
        DeletedFilter::Only => append_where(&mut clause, &format!("{DELETED_FIELD} = true")),
        DeletedFilter::Include => {}
    }
    Ok(clause)
}

fn bind_compare(
    field: &str,
    op: &str,
    operand: &Value,
    params: &mut NamedArgs,
    prefix: &str,
    counter: &mut usize,
) -> String {
    let param = bind(operand.clone(), params, prefix, counter);
    format!("{field} {op} ${param}")
}

fn bind(value: Value, params: &mut NamedArgs, prefix: &str, counter: &mut usize) -> String {
    let param = next_param(prefix, counter);
    params.insert(param.clone(), value);
    param
}

pub fn build_sort_clause(sorts: &[Sort]) -> StorageResult<String> {
    if sorts.is_empty() {
        return Ok(String::new());
    }
    let mut clauses = Vec::new();
    for sort in sorts {
        let field = sort.field.trim();
        validate_identifier(field)?;
        let direction = if sort.asc { "ASC" } else { "DESC" };
        clauses.push(format!("{field} {direction}"));
    }
    Ok(format!(" ORDER BY {}", clauses.join(", ")))
}

/// Compiles a pipeline into a single SELECT. Only the canonical stage order
/// `match, sort?, skip?, limit?` can be expressed that way.
pub fn compile_pipeline(pipeline: &Pipeline, params: &mut NamedArgs) -> StorageResult<CompiledPipeline> {
    let mut stages = pipeline.stages().iter().peekable();
    let filter = match stages.next() {
        Some(Stage::Match(filter)) => filter,
        _ => return Err(StorageError::schema("pipeline must start with a match stage")),
    };
    let mut compiled = CompiledPipeline {
        where_clause: build_filter_clause(filter, params, "match")?,
        ..CompiledPipeline::default()
    };
    if let Some(Stage::Sort(sorts)) = stages.peek() {
        compiled.order_clause = build_sort_clause(sorts)?;
        stages.next();
    }
    if let Some(Stage::Skip(n)) = stages.peek() {
        compiled.start = Some(*n);
        stages.next();
    }
    if let Some(Stage::Limit(n)) = stages.peek() {
        compiled.limit = Some(*n);
        stages.next();
    }
    if let Some(stage) = stages.next() {
        return Err(StorageError::schema(format!(
            "unsupported pipeline stage order at {stage:?}"
        )));
    }
    Ok(compiled)
}

fn sanitize_prefix(prefix: &str) -> String {
    let pref = if prefix.trim().is_empty() {
        DEFAULT_PREFIX
    } else {
        prefix
    };
    pref.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn next_param(prefix: &str, counter: &mut usize) -> String {
    let name = format!("{}_{}", prefix, *counter);
    *counter += 1;
    name
}

pub(crate) fn validate_identifier(input: &str) -> StorageResult<()> {
    if input.is_empty()
        || !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(StorageError::schema(format!(
            "invalid field identifier '{input}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_eq_builds_clause() {
        let mut params = NamedArgs::default();
        let filter = Filter::new().eq("_environmentId", "E1");
        let clause = build_filter_clause(&filter, &mut params, "t").unwrap();
        assert_eq!(clause, "(_environmentId = $t_0) AND (deleted != true)");
        assert_eq!(params.get("t_0").unwrap(), &json!("E1"));
    }

    #[test]
    fn filter_operators_and_deleted_modes() {
        let mut params = NamedArgs::default();
        let filter = Filter::new()
            .is_in("channel", vec![json!("email"), json!("sms")])
            .not_in("name", vec![json!("x")])
            .ne("isDefault", true)
            .deleted(DeletedFilter::Only);
        let clause = build_filter_clause(&filter, &mut params, "s").unwrap();
        assert_eq!(
            clause,
            "(channel IN $s_0) AND (NOT (name IN $s_1)) AND (isDefault != $s_2) AND (deleted = true)"
        );

        let mut params = NamedArgs::default();
        let all = Filter::new().eq("_id", "a").deleted(DeletedFilter::Include);
        let clause = build_filter_clause(&all, &mut params, "").unwrap();
        assert_eq!(clause, "(_id = $filter_0)");
    }

    #[test]
    fn sort_clause_valid() {
        let sorts = vec![Sort::ascending("_id"), Sort::descending("createdAt")];
        let clause = build_sort_clause(&sorts).unwrap();
        assert_eq!(clause, " ORDER BY _id ASC, createdAt DESC");
    }

    #[test]
    fn invalid_identifier_fails() {
        let mut params = NamedArgs::default();
        let filter = Filter::new().eq("na-me", "oops");
        let err = build_filter_clause(&filter, &mut params, "p").unwrap_err();
        assert!(err.to_string().contains("invalid field identifier"));
    }

    #[test]
    fn pipeline_compiles_in_canonical_order() {
        let mut params = NamedArgs::default();
        let pipeline = Pipeline::new()
            .matching(Filter::new().eq("_organizationId", "O1"))
            .sort(vec![Sort::ascending("_id")])
            .skip(5)
            .limit(10);
        let compiled = compile_pipeline(&pipeline, &mut params).unwrap();
        assert_eq!(compiled.order_clause, " ORDER BY _id ASC");
        assert_eq!(compiled.start, Some(5));
        assert_eq!(compiled.limit, Some(10));
        assert!(compiled.where_clause.starts_with("(_organizationId = $match_0)"));
    }

    #[test]
    fn pipeline_rejects_other_orders() {
        let mut params = NamedArgs::default();
        let reordered = Pipeline::new()
            .matching(Filter::new().eq("_organizationId", "O1"))
            .limit(10)
            .skip(5);
        assert!(compile_pipeline(&reordered, &mut params).is_err());

        let unmatched = Pipeline::new().limit(1);
        assert!(compile_pipeline(&unmatched, &mut params).is_err());
    }
}
