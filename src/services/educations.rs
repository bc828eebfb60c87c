use serde_json::json;
use sqlx::PgPool;

use crate::database::models::{Education, EducationCreate, EducationUpdate, Member};
use crate::database::{DatabaseError, Repository};
use crate::filter::FilterData;

use super::{require_found, Deleted, Page, ServiceResult};

pub struct EducationService {
    pool: PgPool,
    educations: Repository<Education>,
    members: Repository<Member>,
}

impl EducationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            educations: Repository::new("educations", pool.clone()),
            members: Repository::new("members", pool.clone()),
            pool,
        }
    }

    pub async fn list(&self, member_id: Option<i64>, page: Page) -> ServiceResult<Vec<Education>> {
        let filter = match member_id {
            Some(member_id) => FilterData::with_where(json!({ "member_id": member_id })),
            None => FilterData::default(),
        };
        Ok(self.educations.select_any(filter.order_by("id asc").page(page.skip, page.limit)).await?)
    }

    /// Latest end year first; records without an end year come last.
    pub async fn for_member(&self, member_id: i64) -> ServiceResult<Vec<Education>> {
        require_found(self.members.exists(member_id).await?, "Member")?;
        let rows = sqlx::query_as::<_, Education>(
            "SELECT * FROM educations
             WHERE member_id = $1
             ORDER BY end_year DESC NULLS LAST, start_year DESC, id",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Education> {
        Ok(self.educations.select_id(id, "Education record").await?)
    }

    pub async fn create(&self, input: EducationCreate, created_by: i64) -> ServiceResult<Education> {
        input.validate()?;
        require_found(self.members.exists(input.member_id).await?, "Member")?;

        let education = sqlx::query_as::<_, Education>(
            "INSERT INTO educations (
                member_id, education_type, category, degree_name, institution, location, start_year,
                end_year, is_ongoing, field_of_study, grade, achievements, islamic_qualification_details,
                created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *",
        )
        .bind(input.member_id)
        .bind(input.education_type)
        .bind(input.category)
        .bind(&input.degree_name)
        .bind(&input.institution)
        .bind(&input.location)
        .bind(input.start_year)
        .bind(input.end_year)
        .bind(input.is_ongoing)
        .bind(&input.field_of_study)
        .bind(&input.grade)
        .bind(&input.achievements)
        .bind(&input.islamic_qualification_details)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(education)
    }

    pub async fn update(&self, id: i64, patch: EducationUpdate) -> ServiceResult<Education> {
        let mut education = self.educations.select_id(id, "Education record").await?;
        patch.apply(&mut education)?;

        let updated = sqlx::query_as::<_, Education>(
            "UPDATE educations SET
                education_type = $2, category = $3, degree_name = $4, institution = $5,
                location = $6, start_year = $7, end_year = $8, is_ongoing = $9,
                field_of_study = $10, grade = $11, achievements = $12,
                islamic_qualification_details = $13, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(education.id)
        .bind(education.education_type)
        .bind(education.category)
        .bind(&education.degree_name)
        .bind(&education.institution)
        .bind(&education.location)
        .bind(education.start_year)
        .bind(education.end_year)
        .bind(education.is_ongoing)
        .bind(&education.field_of_study)
        .bind(&education.grade)
        .bind(&education.achievements)
        .bind(&education.islamic_qualification_details)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<Deleted> {
        self.educations.delete_id(id, "Education record").await?;
        Ok(Deleted::new("Education record"))
    }
}
