use std::error::Error;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::private::BytesMut;
use tokio_postgres::types::{Format, FromSql, IsNull, ToSql, Type};
use tokio_postgres::{Client, NoTls, Row, Statement};

use crate::config::SessionConfig;
use crate::error::{DbEngineError, Result};
use crate::materialize::{materialize, ColumnMeta, RowSource};
use crate::placeholder::to_numbered;
use crate::traits::DatabaseDriver;
use crate::types::{BindType, BoundParameter, ResultSet, SqlValue};

/// PostgreSQL driver implementation using tokio-postgres.
///
/// Placeholders are rewritten from `?` to `$n`. Integer and float parameters are declared
/// as `int8`/`float8`. Text parameters (and NULL) are left for the server to type from
/// their position and are sent in text format, so the column type's input function parses
/// them: `'2024-01-02'` lands in a `date` column and NULL in any column.
pub struct TokioPostgresDriver {
    client: Client,
}

impl TokioPostgresDriver {
    /// Connect to a PostgreSQL database.
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        let (client, connection) = config
            .to_pg_config()
            .connect(NoTls)
            .await
            .map_err(|e| DbEngineError::ConnectionFailed(describe(&e)))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(
                    target: "dbengine::connection",
                    error = %e,
                    "PostgreSQL connection error"
                );
            }
        });

        Ok(Self { client })
    }

    /// Wrap an already connected client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn prepare(&self, sql: &str, params: &[BoundParameter]) -> Result<Statement> {
        let numbered = to_numbered(sql);

        let prepared = match self
            .client
            .prepare_typed(&numbered, &declared_types(params, false))
            .await
        {
            // A text parameter in an untyped position, e.g. `CONCAT('%', $1, '%')`.
            Err(e) if e.code() == Some(&SqlState::INDETERMINATE_DATATYPE) => {
                tracing::debug!(
                    target: "dbengine::sql",
                    error = %describe(&e),
                    "declaring text parameters as text"
                );
                self.client
                    .prepare_typed(&numbered, &declared_types(params, true))
                    .await
            }
            other => other,
        };
        let statement = prepared.map_err(|e| DbEngineError::Prepare(describe(&e)))?;

        if statement.params().len() != params.len() {
            return Err(DbEngineError::BindArity {
                placeholders: statement.params().len(),
                parameters: params.len(),
            });
        }
        Ok(statement)
    }
}

// The prepared `Statement` is closed on the server when it is dropped, on success and
// error paths alike.
#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn query(&self, sql: &str, params: &[BoundParameter]) -> Result<ResultSet> {
        let statement = self.prepare(sql, params).await?;
        let converted = to_sql_params(params);
        let param_refs: Vec<&(dyn ToSql + Sync)> =
            converted.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let rows = self
            .client
            .query(&statement, &param_refs)
            .await
            .map_err(|e| DbEngineError::Execution(describe(&e)))?;

        materialize(&mut PgRowSource::new(&statement, rows))
    }

    async fn execute(&self, sql: &str, params: &[BoundParameter]) -> Result<u64> {
        let statement = self.prepare(sql, params).await?;
        let converted = to_sql_params(params);
        let param_refs: Vec<&(dyn ToSql + Sync)> =
            converted.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        self.client
            .execute(&statement, &param_refs)
            .await
            .map_err(|e| DbEngineError::Execution(describe(&e)))
    }
}

/// `Type::UNKNOWN` asks the server to infer the parameter type.
fn pg_type(bind_type: BindType, text_as_text: bool) -> Type {
    match bind_type {
        BindType::Integer => Type::INT8,
        BindType::Float => Type::FLOAT8,
        BindType::Text if text_as_text => Type::TEXT,
        BindType::Text => Type::UNKNOWN,
    }
}

fn declared_types(params: &[BoundParameter], text_as_text: bool) -> Vec<Type> {
    params
        .iter()
        .map(|p| pg_type(p.bind_type(), text_as_text))
        .collect()
}

/// A bound parameter in wire form.
#[derive(Debug, Clone, PartialEq)]
enum PgParam {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl ToSql for PgParam {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            PgParam::Integer(v) => v.to_sql(ty, out),
            PgParam::Float(v) => v.to_sql(ty, out),
            PgParam::Text(s) => {
                out.extend_from_slice(s.as_bytes());
                Ok(IsNull::No)
            }
            PgParam::Null => Ok(IsNull::Yes),
        }
    }

    // Integer and float parameters are declared with their exact types; text is parsed
    // by whatever type the server settled on.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn encode_format(&self, _ty: &Type) -> Format {
        match self {
            PgParam::Integer(_) | PgParam::Float(_) => Format::Binary,
            PgParam::Text(_) | PgParam::Null => Format::Text,
        }
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Converts each parameter according to its tag, never by re-inspecting the value.
fn to_sql_param(param: &BoundParameter) -> PgParam {
    let value = param.value();
    match param.bind_type() {
        BindType::Integer => value.as_i64().map_or(PgParam::Null, PgParam::Integer),
        BindType::Float => value.as_f64().map_or(PgParam::Null, PgParam::Float),
        BindType::Text if value.is_null() => PgParam::Null,
        BindType::Text => PgParam::Text(value.to_string()),
    }
}

fn to_sql_params(params: &[BoundParameter]) -> Vec<PgParam> {
    params.iter().map(to_sql_param).collect()
}

fn describe(e: &tokio_postgres::Error) -> String {
    match e.as_db_error() {
        Some(db) => format!("{} ({})", db.message(), db.code().code()),
        None => e.to_string(),
    }
}

/// Walks fetched rows using the prepared statement's column metadata, which is
/// available even when no rows come back.
struct PgRowSource {
    columns: Vec<ColumnMeta>,
    types: Vec<Type>,
    rows: std::vec::IntoIter<Row>,
}

impl PgRowSource {
    fn new(statement: &Statement, rows: Vec<Row>) -> Self {
        let columns = statement
            .columns()
            .iter()
            .map(|c| ColumnMeta::new(c.name(), c.type_().name()))
            .collect();
        let types = statement
            .columns()
            .iter()
            .map(|c| c.type_().clone())
            .collect();
        Self {
            columns,
            types,
            rows: rows.into_iter(),
        }
    }
}

impl RowSource for PgRowSource {
    fn columns(&self) -> Vec<ColumnMeta> {
        self.columns.clone()
    }

    fn fetch(&mut self, slots: &mut [SqlValue]) -> Result<bool> {
        let Some(row) = self.rows.next() else {
            return Ok(false);
        };
        for (idx, slot) in slots.iter_mut().enumerate() {
            *slot = decode(&row, idx, &self.types[idx], &self.columns[idx].name)?;
        }
        Ok(true)
    }
}

fn get<'a, T, F>(row: &'a Row, idx: usize, column: &str, convert: F) -> Result<SqlValue>
where
    T: FromSql<'a>,
    F: FnOnce(T) -> Result<SqlValue>,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(value)) => convert(value),
        Ok(None) => Ok(SqlValue::Null),
        Err(e) => Err(DbEngineError::Execution(format!("column '{column}': {e}"))),
    }
}

fn value<T: Into<SqlValue>>(v: T) -> Result<SqlValue> {
    Ok(v.into())
}

fn text<T: ToString>(v: T) -> Result<SqlValue> {
    Ok(SqlValue::Text(v.to_string()))
}

/// Integer-like columns read as `Integer`, floating and numeric columns as `Float`, and
/// character, temporal, uuid and json columns as `Text`.
fn decode(row: &Row, idx: usize, ty: &Type, column: &str) -> Result<SqlValue> {
    if *ty == Type::INT2 {
        get(row, idx, column, value::<i16>)
    } else if *ty == Type::INT4 {
        get(row, idx, column, value::<i32>)
    } else if *ty == Type::INT8 {
        get(row, idx, column, value::<i64>)
    } else if *ty == Type::OID {
        get(row, idx, column, value::<u32>)
    } else if *ty == Type::CHAR {
        get(row, idx, column, value::<i8>)
    } else if *ty == Type::BOOL {
        get(row, idx, column, value::<bool>)
    } else if *ty == Type::FLOAT4 {
        get(row, idx, column, value::<f32>)
    } else if *ty == Type::FLOAT8 {
        get(row, idx, column, value::<f64>)
    } else if *ty == Type::NUMERIC {
        get(row, idx, column, |d: Decimal| {
            d.to_f64().map(SqlValue::Float).ok_or_else(|| {
                DbEngineError::Execution(format!("column '{column}': numeric {d} out of range"))
            })
        })
    } else if *ty == Type::DATE {
        get(row, idx, column, text::<chrono::NaiveDate>)
    } else if *ty == Type::TIME {
        get(row, idx, column, text::<chrono::NaiveTime>)
    } else if *ty == Type::TIMESTAMP {
        get(row, idx, column, text::<chrono::NaiveDateTime>)
    } else if *ty == Type::TIMESTAMPTZ {
        get(row, idx, column, |v: chrono::DateTime<chrono::Utc>| text(v.to_rfc3339()))
    } else if *ty == Type::UUID {
        get(row, idx, column, text::<uuid::Uuid>)
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        get(row, idx, column, text::<serde_json::Value>)
    } else if <String as FromSql<'_>>::accepts(ty) {
        get(row, idx, column, value::<String>)
    } else {
        Err(DbEngineError::Execution(format!("column '{column}': unsupported type {ty}")))
    }
}
