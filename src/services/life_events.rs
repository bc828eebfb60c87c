use serde_json::{json, Map, Value};
use sqlx::PgPool;

use crate::database::models::{EventType, LifeEvent, LifeEventCreate, LifeEventUpdate, Member};
use crate::database::{DatabaseError, Repository};
use crate::filter::FilterData;

use super::{require_found, Deleted, Page, ServiceResult};

pub struct LifeEventService {
    pool: PgPool,
    life_events: Repository<LifeEvent>,
    members: Repository<Member>,
}

impl LifeEventService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            life_events: Repository::new("life_events", pool.clone()),
            members: Repository::new("members", pool.clone()),
            pool,
        }
    }

    pub async fn list(
        &self,
        member_id: Option<i64>,
        event_type: Option<EventType>,
        page: Page,
    ) -> ServiceResult<Vec<LifeEvent>> {
        let mut conditions = Map::new();
        if let Some(member_id) = member_id {
            conditions.insert("member_id".to_string(), json!(member_id));
        }
        if let Some(event_type) = event_type {
            conditions.insert("event_type".to_string(), json!(event_type.as_str()));
        }
        let filter = FilterData::with_where(Value::Object(conditions))
            .order_by("event_date desc, id desc")
            .page(page.skip, page.limit);
        Ok(self.life_events.select_any(filter).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<LifeEvent> {
        Ok(self.life_events.select_id(id, "Life event").await?)
    }

    pub async fn create(&self, input: LifeEventCreate, created_by: i64) -> ServiceResult<LifeEvent> {
        self.check_members(input.member_id, input.related_member_id).await?;

        let event = sqlx::query_as::<_, LifeEvent>(
            "INSERT INTO life_events (
                member_id, event_type, event_date, event_location, description, related_member_id, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *",
        )
        .bind(input.member_id)
        .bind(input.event_type)
        .bind(input.event_date)
        .bind(&input.event_location)
        .bind(&input.description)
        .bind(input.related_member_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(event)
    }

    pub async fn update(&self, id: i64, patch: LifeEventUpdate) -> ServiceResult<LifeEvent> {
        let mut event = self.life_events.select_id(id, "Life event").await?;
        let member_changed = patch.member_id.is_some();
        let related_changed = patch.related_member_id.is_some();
        patch.apply(&mut event);
        if member_changed {
            require_found(self.members.exists(event.member_id).await?, "Member")?;
        }
        if let Some(related) = event.related_member_id.filter(|_| related_changed) {
            require_found(self.members.exists(related).await?, "Related member")?;
        }

        let updated = sqlx::query_as::<_, LifeEvent>(
            "UPDATE life_events SET
                member_id = $2, event_type = $3, event_date = $4, event_location = $5,
                description = $6, related_member_id = $7
             WHERE id = $1
             RETURNING *",
        )
        .bind(event.id)
        .bind(event.member_id)
        .bind(event.event_type)
        .bind(event.event_date)
        .bind(&event.event_location)
        .bind(&event.description)
        .bind(event.related_member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<Deleted> {
        self.life_events.delete_id(id, "Life event").await?;
        Ok(Deleted::new("Life event"))
    }

    async fn check_members(&self, member_id: i64, related_member_id: Option<i64>) -> ServiceResult<()> {
        require_found(self.members.exists(member_id).await?, "Member")?;
        if let Some(related) = related_member_id {
            require_found(self.members.exists(related).await?, "Related member")?;
        }
        Ok(())
    }
}
