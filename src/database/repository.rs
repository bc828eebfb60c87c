use serde_json::json;
use sqlx::{self, postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::FilterData;

/// Read access to one table through the JSON filter language.
pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(self.table_name)?
            .filter(filter_data)?
            .select_all(&self.pool)
            .await
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        QueryBuilder::<T>::new(self.table_name)?
            .filter(filter_data)?
            .select_optional(&self.pool)
            .await
    }

    /// Like `select_one`, but a missing row becomes `NotFound("<label> not found")`.
    pub async fn select_404(&self, filter_data: FilterData, label: &str) -> Result<T, DatabaseError> {
        match QueryBuilder::<T>::new(self.table_name)?
            .filter(filter_data)?
            .select_one(&self.pool)
            .await
        {
            Ok(row) => Ok(row),
            Err(DatabaseError::NotFound(_)) => Err(DatabaseError::NotFound(format!("{} not found", label))),
            Err(other) => Err(other),
        }
    }

    pub async fn select_id(&self, id: i64, label: &str) -> Result<T, DatabaseError> {
        self.select_404(FilterData::with_where(json!({ "id": id })), label).await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.count(FilterData::with_where(json!({ "id": id }))).await? > 0)
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        QueryBuilder::<T>::new(self.table_name)?
            .filter(filter_data)?
            .count(&self.pool)
            .await
    }

    pub async fn count_by(&self, column: &str, filter_data: FilterData) -> Result<Vec<(String, i64)>, DatabaseError> {
        QueryBuilder::<T>::new(self.table_name)?
            .filter(filter_data)?
            .count_by(column, &self.pool)
            .await
    }

    pub async fn select_ids(&self, ids: &[i64]) -> Result<Vec<T>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let filter = FilterData::with_where(json!({ "id": { "$in": ids } })).order_by("id asc");
        self.select_any(filter).await
    }

    /// Delete by id; `NotFound` when no row matched.
    pub async fn delete_id(&self, id: i64, label: &str) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.table_name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} not found", label)));
        }
        Ok(())
    }
}
