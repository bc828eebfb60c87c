use serde_json::{json, Map, Value};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::database::models::{
    Masjid, MasjidCreate, MasjidType, MasjidUpdate, MasjidWithRelations, Member, MemberBasic,
};
use crate::database::{DatabaseError, Repository};
use crate::filter::FilterData;

use super::{like_pattern, require_found, Deleted, Page, ServiceError, ServiceResult};

pub struct MasjidService {
    pool: PgPool,
    masjids: Repository<Masjid>,
    members: Repository<Member>,
}

impl MasjidService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            masjids: Repository::new("masjids", pool.clone()),
            members: Repository::new("members", pool.clone()),
            pool,
        }
    }

    /// Search matches name, address, parish or activities.
    pub async fn list(
        &self,
        search: Option<&str>,
        masjid_type: Option<MasjidType>,
        page: Page,
    ) -> ServiceResult<Vec<MasjidWithRelations>> {
        let mut conditions = Map::new();
        if let Some(masjid_type) = masjid_type {
            conditions.insert("type".to_string(), json!(masjid_type.as_str()));
        }
        if let Some(pattern) = like_pattern(search) {
            conditions.insert(
                "$or".to_string(),
                json!([
                    { "name": { "$ilike": pattern } },
                    { "address": { "$ilike": pattern } },
                    { "parish": { "$ilike": pattern } },
                    { "activities": { "$ilike": pattern } }
                ]),
            );
        }
        let filter = FilterData::with_where(Value::Object(conditions))
            .order_by("id asc")
            .page(page.skip, page.limit);

        let mut result = Vec::new();
        for masjid in self.masjids.select_any(filter).await? {
            result.push(self.with_relations(masjid).await?);
        }
        Ok(result)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<MasjidWithRelations> {
        let masjid = self.masjids.select_id(id, "Masjid").await?;
        self.with_relations(masjid).await
    }

    /// Unknown shura member ids are ignored.
    pub async fn create(&self, input: MasjidCreate, created_by: i64) -> ServiceResult<MasjidWithRelations> {
        input.validate()?;
        if let Some(imam_id) = input.imam_id {
            require_found(self.members.exists(imam_id).await?, "Imam")?;
        }

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO masjids (
                name, type, address, city, parish, postal_code, phone, email, website, imam_id,
                established_year, capacity, facilities, prayer_times_info, jummah_time, activities,
                created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id",
        )
        .bind(&input.name)
        .bind(input.masjid_type)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.parish)
        .bind(&input.postal_code)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.website)
        .bind(input.imam_id)
        .bind(input.established_year)
        .bind(input.capacity)
        .bind(&input.facilities)
        .bind(&input.prayer_times_info)
        .bind(&input.jummah_time)
        .bind(&input.activities)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        replace_shura(&mut tx, id, &input.shura_member_ids).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!("Created masjid {} ({})", id, input.name);
        self.get(id).await
    }

    /// A given `shura_member_ids` replaces the whole set.
    pub async fn update(&self, id: i64, patch: MasjidUpdate) -> ServiceResult<MasjidWithRelations> {
        let mut masjid = self.masjids.select_id(id, "Masjid").await?;
        let imam_changed = patch.imam_id.is_some();
        let shura = patch.apply(&mut masjid)?;
        if let Some(imam_id) = masjid.imam_id.filter(|_| imam_changed) {
            require_found(self.members.exists(imam_id).await?, "Imam")?;
        }

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        sqlx::query(
            "UPDATE masjids SET
                name = $2, type = $3, address = $4, city = $5, parish = $6, postal_code = $7,
                phone = $8, email = $9, website = $10, imam_id = $11, established_year = $12,
                capacity = $13, facilities = $14, prayer_times_info = $15, jummah_time = $16,
                activities = $17, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(masjid.id)
        .bind(&masjid.name)
        .bind(masjid.masjid_type)
        .bind(&masjid.address)
        .bind(&masjid.city)
        .bind(&masjid.parish)
        .bind(&masjid.postal_code)
        .bind(&masjid.phone)
        .bind(&masjid.email)
        .bind(&masjid.website)
        .bind(masjid.imam_id)
        .bind(masjid.established_year)
        .bind(masjid.capacity)
        .bind(&masjid.facilities)
        .bind(&masjid.prayer_times_info)
        .bind(&masjid.jummah_time)
        .bind(&masjid.activities)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        if let Some(member_ids) = shura {
            replace_shura(&mut tx, id, &member_ids).await?;
        }
        tx.commit().await.map_err(DatabaseError::from)?;

        self.get(id).await
    }

    /// Refuses while members still name this masjid.
    pub async fn delete(&self, id: i64) -> ServiceResult<Deleted> {
        require_found(self.masjids.exists(id).await?, "Masjid")?;
        let affiliated = self.members.count(FilterData::with_where(json!({ "masjid_id": id }))).await?;
        if affiliated > 0 {
            return Err(ServiceError::BadRequest(format!(
                "Cannot delete masjid with {} affiliated members. Please reassign them first.",
                affiliated
            )));
        }
        self.masjids.delete_id(id, "Masjid").await?;
        info!("Deleted masjid {}", id);
        Ok(Deleted::new("Masjid"))
    }

    /// Members affiliated with the masjid.
    pub async fn members(&self, id: i64) -> ServiceResult<Vec<Member>> {
        require_found(self.masjids.exists(id).await?, "Masjid")?;
        let filter = FilterData::with_where(json!({ "masjid_id": id })).order_by("id asc");
        Ok(self.members.select_any(filter).await?)
    }

    async fn with_relations(&self, masjid: Masjid) -> ServiceResult<MasjidWithRelations> {
        let imam = match masjid.imam_id {
            Some(imam_id) => sqlx::query_as::<_, MemberBasic>(
                "SELECT id, muslim_name, legal_name FROM members WHERE id = $1",
            )
            .bind(imam_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?,
            None => None,
        };

        let shura_members = sqlx::query_as::<_, MemberBasic>(
            "SELECT m.id, m.muslim_name, m.legal_name
             FROM masjid_shura_members s
             JOIN members m ON m.id = s.member_id
             WHERE s.masjid_id = $1
             ORDER BY m.id",
        )
        .bind(masjid.id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        let affiliated_members_count = self
            .members
            .count(FilterData::with_where(json!({ "masjid_id": masjid.id })))
            .await?;

        Ok(MasjidWithRelations { masjid, imam, shura_members, affiliated_members_count })
    }
}

async fn replace_shura(tx: &mut Transaction<'_, Postgres>, masjid_id: i64, member_ids: &[i64]) -> ServiceResult<()> {
    sqlx::query("DELETE FROM masjid_shura_members WHERE masjid_id = $1")
        .bind(masjid_id)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::from)?;

    if !member_ids.is_empty() {
        sqlx::query(
            "INSERT INTO masjid_shura_members (masjid_id, member_id)
             SELECT $1, id FROM members WHERE id = ANY($2)",
        )
        .bind(masjid_id)
        .bind(member_ids)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::from)?;
    }
    Ok(())
}
