use serde_json::Value;

use super::error::FilterError;
use super::is_valid_identifier;
use super::types::{FilterOp, FilterWhereInfo};

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
    conditions: Vec<FilterWhereInfo>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Render `where_data` as SQL, numbering placeholders after `starting_param_index`.
    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(where_data)
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build(&mut self, where_data: &Value) -> Result<(String, Vec<Value>), FilterError> {
        if where_data.is_null() {
            return Ok((String::new(), vec![]));
        }
        self.parse_where_data(where_data)?;

        let mut sql_conditions = vec![];
        let conditions_snapshot = self.conditions.clone();
        for condition in &conditions_snapshot {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }
        Ok((sql_conditions.join(" AND "), self.param_values.clone()))
    }

    fn parse_where_data(&mut self, where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Object(obj) => {
                for (key, value) in obj {
                    if key.starts_with('$') {
                        self.parse_logical_operator(key, value)?;
                    } else {
                        self.parse_field_condition(key, value)?;
                    }
                }
                Ok(())
            }
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn parse_logical_operator(&mut self, op: &str, value: &Value) -> Result<(), FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value.as_array().ok_or_else(|| FilterError::InvalidOperand {
                    operator: op.to_string(),
                    reason: "expected an array".to_string(),
                })?;
                if arr.is_empty() {
                    return Err(FilterError::InvalidOperand {
                        operator: op.to_string(),
                        reason: "expected at least one clause".to_string(),
                    });
                }
                let mut sql_parts = Vec::new();
                for v in arr {
                    let (sql, params) = Self::generate(v, self.param_index)?;
                    self.param_index += params.len();
                    self.param_values.extend(params);
                    sql_parts.push(format!("({})", sql));
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                // Parenthesize so sibling conditions joined with AND keep their precedence
                let column = format!("({})", sql_parts.join(joiner));
                self.conditions.push(FilterWhereInfo { column, operator: FilterOp::Text, data: Value::Null });
                Ok(())
            }
            "$not" => {
                let (sql, params) = Self::generate(value, self.param_index)?;
                self.param_index += params.len();
                self.param_values.extend(params);
                self.conditions.push(FilterWhereInfo { column: format!("NOT ({})", sql), operator: FilterOp::Text, data: Value::Null });
                Ok(())
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(&mut self, field: &str, value: &Value) -> Result<(), FilterError> {
        if !is_valid_identifier(field) {
            return Err(FilterError::InvalidColumn(field.to_string()));
        }
        if let Value::Object(obj) = value {
            for (op_key, op_val) in obj {
                let operator = Self::map_operator(op_key)?;
                self.conditions.push(FilterWhereInfo { column: field.to_string(), operator, data: op_val.clone() });
            }
        } else {
            // Implicit equality: { field: value }
            self.conditions.push(FilterWhereInfo { column: field.to_string(), operator: FilterOp::Eq, data: value.clone() });
        }
        Ok(())
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$like" => FilterOp::Like,
            "$ilike" => FilterOp::ILike,
            "$in" => FilterOp::In,
            "$between" => FilterOp::Between,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        // Logical operators arrive pre-rendered
        if condition.operator == FilterOp::Text {
            return Ok(condition.column.clone());
        }

        let quoted_column = format!("\"{}\"", condition.column);
        let data = condition.data.clone();
        match condition.operator {
            FilterOp::Eq => {
                if data.is_null() { Ok(format!("{} IS NULL", quoted_column)) }
                else { Ok(format!("{} = {}", quoted_column, self.param(data))) }
            }
            FilterOp::Ne => {
                if data.is_null() { Ok(format!("{} IS NOT NULL", quoted_column)) }
                else { Ok(format!("{} <> {}", quoted_column, self.param(data))) }
            }
            FilterOp::Gt => Ok(format!("{} > {}", quoted_column, self.param(data))),
            FilterOp::Gte => Ok(format!("{} >= {}", quoted_column, self.param(data))),
            FilterOp::Lt => Ok(format!("{} < {}", quoted_column, self.param(data))),
            FilterOp::Lte => Ok(format!("{} <= {}", quoted_column, self.param(data))),
            FilterOp::Like => Ok(format!("{} LIKE {}", quoted_column, self.param(data))),
            FilterOp::ILike => Ok(format!("{} ILIKE {}", quoted_column, self.param(data))),
            FilterOp::In => {
                if let Value::Array(values) = data {
                    if values.is_empty() { return Ok("1=0".to_string()); }
                    let params: Vec<String> = values.into_iter().map(|v| self.param(v)).collect();
                    Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
                } else {
                    Ok(format!("{} = {}", quoted_column, self.param(data)))
                }
            }
            FilterOp::Between => {
                match data {
                    Value::Array(values) if values.len() == 2 => {
                        let mut it = values.into_iter();
                        let (low, high) = (it.next().unwrap_or(Value::Null), it.next().unwrap_or(Value::Null));
                        Ok(format!("{} BETWEEN {} AND {}", quoted_column, self.param(low), self.param(high)))
                    }
                    _ => Err(FilterError::InvalidOperand {
                        operator: "$between".to_string(),
                        reason: "expected [low, high]".to_string(),
                    }),
                }
            }
            FilterOp::Text => Ok(condition.column.clone()),
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn combines_field_and_or_conditions() {
        let (sql, params) = FilterWhere::generate(
            &json!({
                "member_id": 7,
                "$or": [
                    { "event_type": "hajj" },
                    { "event_type": "umrah" }
                ]
            }),
            0,
        )
        .unwrap();
        // Object keys iterate in sorted order, so "$or" renders before "member_id"
        assert_eq!(sql, "((\"event_type\" = $1) OR (\"event_type\" = $2)) AND \"member_id\" = $3");
        assert_eq!(params, vec![json!("hajj"), json!("umrah"), json!(7)]);
    }

    #[test]
    fn in_with_empty_array_matches_nothing() {
        let (sql, params) = FilterWhere::generate(&json!({ "id": { "$in": [] } }), 0).unwrap();
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn between_requires_two_values() {
        let err = FilterWhere::generate(&json!({ "start_year": { "$between": [2000] } }), 0);
        assert!(matches!(err, Err(FilterError::InvalidOperand { .. })));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = FilterWhere::generate(&json!({ "name": { "$regex": "^a" } }), 0);
        assert!(matches!(err, Err(FilterError::UnsupportedOperator(_))));
    }
}
