use std::sync::Arc;

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use log::debug;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row};

use crate::expr_arc;
use crate::sql::chunk::Chunk;
use crate::sql::expression::ExpressionArc;

/// Thin executor for rendered expressions over a shared tokio-postgres
/// [`Client`]. All statement-time errors (malformed JSON payloads, operator
/// precondition violations) surface here as query failures; nothing is
/// retried.
#[derive(Clone, Debug)]
pub struct Postgres {
    client: Arc<Box<Client>>,
}

/// Postgres is equal to its clones.
impl PartialEq for Postgres {
    fn eq(&self, other: &Postgres) -> bool {
        Arc::ptr_eq(&self.client, &other.client)
    }
}

impl Postgres {
    pub fn new(client: Arc<Box<Client>>) -> Postgres {
        Postgres { client }
    }

    pub fn client(&self) -> &tokio_postgres::Client {
        self.client.as_ref()
    }

    pub fn convert_value_tosql(&self, value: Value) -> Box<dyn ToSql + Sync> {
        match value {
            Value::Null => Box::new(None as Option<&[u8]>),
            Value::Bool(b) => Box::new(b),
            Value::Number(n) => {
                if n.is_i64() {
                    Box::new(n.as_i64().unwrap() as i32)
                } else {
                    Box::new(n.as_f64().unwrap() as f32)
                }
            }
            Value::String(s) => Box::new(s),
            // arrays of strings bind as text[], for path and key-list operands
            Value::Array(a) if a.iter().all(|v| v.is_string()) => Box::new(
                a.into_iter()
                    .map(|v| v.as_str().unwrap().to_string())
                    .collect::<Vec<String>>(),
            ),
            Value::Array(a) => Box::new(serde_json::to_string(&a).unwrap()),
            Value::Object(o) => Box::new(serde_json::to_string(&o).unwrap()),
        }
    }

    pub fn convert_value_fromsql(&self, row: Row) -> Result<Value> {
        let mut json_map: IndexMap<String, Value> = IndexMap::new();

        for (i, col) in row.columns().iter().enumerate() {
            let name = col.name().to_string();
            let col_type = col.type_().name();
            let value = match col_type {
                "int4" => json!(row.get::<_, Option<i32>>(i)),
                "int8" => json!(row.get::<_, Option<i64>>(i)),
                "varchar" | "text" => json!(row.get::<_, Option<String>>(i)),
                "bool" => json!(row.get::<_, Option<bool>>(i)),
                "float4" => json!(row.get::<_, Option<f32>>(i)),
                "float8" => json!(row.get::<_, Option<f64>>(i)),
                "numeric" => json!(row.get::<_, Option<Decimal>>(i)),
                "json" | "jsonb" => row.get::<_, Option<Value>>(i).unwrap_or(Value::Null),
                _ => {
                    return Err(anyhow!(
                        "Unsupported type: {} for column {}",
                        col_type,
                        name
                    ))
                }
            };

            json_map.insert(name, value);
        }

        Ok(json!(json_map))
    }

    /// Execute a chunk as a complete statement and return all rows as
    /// column-name to value maps.
    pub async fn query_raw(&self, chunk: &impl Chunk) -> Result<Vec<Value>> {
        let rendered = chunk.render_chunk();
        debug!(
            "query: {}; params: {:?}",
            rendered.sql_final(),
            rendered.params()
        );

        let params_tosql = rendered
            .params()
            .iter()
            .map(|v| self.convert_value_tosql(v.clone()))
            .collect::<Vec<_>>();

        let params_tosql_refs = params_tosql
            .iter()
            .map(|b| b.as_ref())
            .collect::<Vec<&(dyn ToSql + Sync)>>();

        let result = self
            .client
            .query(rendered.sql_final().as_str(), params_tosql_refs.as_slice())
            .await?;

        result
            .into_iter()
            .map(|row| self.convert_value_fromsql(row))
            .collect()
    }

    /// Execute a chunk as a statement with no interesting result, such as
    /// DDL or an INSERT.
    pub async fn execute(&self, chunk: &impl Chunk) -> Result<()> {
        let rendered = chunk.render_chunk();
        debug!(
            "execute: {}; params: {:?}",
            rendered.sql_final(),
            rendered.params()
        );

        let params_tosql = rendered
            .params()
            .iter()
            .map(|v| self.convert_value_tosql(v.clone()))
            .collect::<Vec<_>>();

        let params_tosql_refs = params_tosql
            .iter()
            .map(|b| b.as_ref())
            .collect::<Vec<&(dyn ToSql + Sync)>>();

        self.client
            .execute(rendered.sql_final().as_str(), params_tosql_refs.as_slice())
            .await?;

        Ok(())
    }

    /// Evaluate a single expression by wrapping it as `SELECT (…) AS result`
    /// and returning the one resulting value.
    pub async fn select_one(&self, chunk: &impl Chunk) -> Result<Value> {
        let query = expr_arc!("SELECT ({}) AS result", chunk.render_chunk());
        let rows = self.query_raw(&query).await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Query returned no rows"))?;
        row.get("result")
            .cloned()
            .ok_or_else(|| anyhow!("Query returned no result column"))
    }
}
