use serde_json::json;
use sqlx::PgPool;
use tracing::info;

use crate::database::models::{LifeEvent, Masjid, Member, MemberCreate, MemberUpdate, MemberWithRelations};
use crate::database::{DatabaseError, Repository};
use crate::filter::FilterData;

use super::{like_pattern, require_found, Deleted, Page, ServiceResult};

pub struct MemberService {
    pool: PgPool,
    members: Repository<Member>,
    life_events: Repository<LifeEvent>,
    masjids: Repository<Masjid>,
}

impl MemberService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            members: Repository::new("members", pool.clone()),
            life_events: Repository::new("life_events", pool.clone()),
            masjids: Repository::new("masjids", pool.clone()),
            pool,
        }
    }

    /// Search matches muslim name, legal name, email or phone.
    pub async fn list(&self, search: Option<&str>, page: Page) -> ServiceResult<Vec<Member>> {
        let mut filter = match like_pattern(search) {
            Some(pattern) => FilterData::with_where(json!({
                "$or": [
                    { "muslim_name": { "$ilike": pattern } },
                    { "legal_name": { "$ilike": pattern } },
                    { "email": { "$ilike": pattern } },
                    { "phone_number": { "$ilike": pattern } }
                ]
            })),
            None => FilterData::default(),
        };
        filter = filter.order_by("id asc").page(page.skip, page.limit);
        Ok(self.members.select_any(filter).await?)
    }

    /// Member with life events, newest first.
    pub async fn get(&self, id: i64) -> ServiceResult<MemberWithRelations> {
        let member = self.members.select_id(id, "Member").await?;
        let life_events = self
            .life_events
            .select_any(FilterData::with_where(json!({ "member_id": id })).order_by("event_date desc, id desc"))
            .await?;
        Ok(MemberWithRelations { member, life_events })
    }

    pub async fn create(&self, input: MemberCreate, created_by: i64) -> ServiceResult<Member> {
        input.validate()?;
        self.check_references(input.spouse_id, input.masjid_id).await?;

        let member = sqlx::query_as::<_, Member>(
            "INSERT INTO members (
                muslim_name, legal_name, gender, date_of_birth, date_of_conversion, marital_status,
                present_address, permanent_address, phone_number, email, workplace, occupation,
                salary, salary_period, spouse_id, father_name, mother_name, burial_location,
                date_of_death, notes, masjid_id, created_by
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22
            ) RETURNING *",
        )
        .bind(&input.muslim_name)
        .bind(&input.legal_name)
        .bind(input.gender)
        .bind(input.date_of_birth)
        .bind(input.date_of_conversion)
        .bind(input.marital_status)
        .bind(&input.present_address)
        .bind(&input.permanent_address)
        .bind(&input.phone_number)
        .bind(&input.email)
        .bind(&input.workplace)
        .bind(&input.occupation)
        .bind(input.salary)
        .bind(input.salary_period)
        .bind(input.spouse_id)
        .bind(&input.father_name)
        .bind(&input.mother_name)
        .bind(&input.burial_location)
        .bind(input.date_of_death)
        .bind(&input.notes)
        .bind(input.masjid_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        info!("Created member {} ({})", member.id, member.legal_name);
        Ok(member)
    }

    pub async fn update(&self, id: i64, patch: MemberUpdate) -> ServiceResult<Member> {
        let mut member = self.members.select_id(id, "Member").await?;
        let spouse_changed = patch.spouse_id.is_some();
        let masjid_changed = patch.masjid_id.is_some();
        patch.apply(&mut member)?;
        self.check_references(
            member.spouse_id.filter(|_| spouse_changed),
            member.masjid_id.filter(|_| masjid_changed),
        )
        .await?;

        let updated = sqlx::query_as::<_, Member>(
            "UPDATE members SET
                muslim_name = $2, legal_name = $3, gender = $4, date_of_birth = $5,
                date_of_conversion = $6, marital_status = $7, present_address = $8,
                permanent_address = $9, phone_number = $10, email = $11, workplace = $12,
                occupation = $13, salary = $14, salary_period = $15, spouse_id = $16,
                father_name = $17, mother_name = $18, burial_location = $19,
                date_of_death = $20, notes = $21, masjid_id = $22, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(member.id)
        .bind(&member.muslim_name)
        .bind(&member.legal_name)
        .bind(member.gender)
        .bind(member.date_of_birth)
        .bind(member.date_of_conversion)
        .bind(member.marital_status)
        .bind(&member.present_address)
        .bind(&member.permanent_address)
        .bind(&member.phone_number)
        .bind(&member.email)
        .bind(&member.workplace)
        .bind(&member.occupation)
        .bind(member.salary)
        .bind(member.salary_period)
        .bind(member.spouse_id)
        .bind(&member.father_name)
        .bind(&member.mother_name)
        .bind(&member.burial_location)
        .bind(member.date_of_death)
        .bind(&member.notes)
        .bind(member.masjid_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<Deleted> {
        self.members.delete_id(id, "Member").await?;
        info!("Deleted member {}", id);
        Ok(Deleted::new("Member"))
    }

    async fn check_references(&self, spouse_id: Option<i64>, masjid_id: Option<i64>) -> ServiceResult<()> {
        if let Some(spouse_id) = spouse_id {
            require_found(self.members.exists(spouse_id).await?, "Spouse")?;
        }
        if let Some(masjid_id) = masjid_id {
            require_found(self.masjids.exists(masjid_id).await?, "Masjid")?;
        }
        Ok(())
    }
}
