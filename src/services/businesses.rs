use serde::Serialize;
use sqlx::{PgPool, Postgres};
use tracing::info;

use crate::database::models::{Business, BusinessCategory, BusinessCreate, BusinessUpdate, BusinessWithOwner, Member};
use crate::database::{DatabaseError, Repository};

use super::{like_pattern, require_found, Deleted, Page, ServiceResult};

const SELECT_WITH_OWNER: &str = "SELECT b.*, m.muslim_name AS owner_name, m.phone_number AS owner_phone
     FROM businesses b
     LEFT JOIN members m ON m.id = b.owner_id
     WHERE TRUE";

#[derive(Debug, Clone, Default)]
pub struct BusinessQuery<'a> {
    pub search: Option<&'a str>,
    pub category: Option<BusinessCategory>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub struct BusinessService {
    pool: PgPool,
    businesses: Repository<Business>,
    members: Repository<Member>,
}

impl BusinessService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            businesses: Repository::new("businesses", pool.clone()),
            members: Repository::new("members", pool.clone()),
            pool,
        }
    }

    /// Search matches business name, description, phone, and the owner's
    /// muslim name or phone.
    pub async fn list(&self, query: BusinessQuery<'_>, page: Page) -> ServiceResult<Vec<BusinessWithOwner>> {
        let mut qb = sqlx::QueryBuilder::<Postgres>::new(SELECT_WITH_OWNER);
        if let Some(category) = query.category {
            qb.push(" AND b.category = ").push_bind(category);
        }
        if let Some(is_active) = query.is_active {
            qb.push(" AND b.is_active = ").push_bind(is_active);
        }
        if let Some(pattern) = like_pattern(query.search) {
            qb.push(" AND (b.name ILIKE ").push_bind(pattern.clone());
            qb.push(" OR b.description ILIKE ").push_bind(pattern.clone());
            qb.push(" OR b.phone_number ILIKE ").push_bind(pattern.clone());
            qb.push(" OR m.muslim_name ILIKE ").push_bind(pattern.clone());
            qb.push(" OR m.phone_number ILIKE ").push_bind(pattern);
            qb.push(")");
        }
        qb.push(" ORDER BY b.id LIMIT ").push_bind(page.limit);
        qb.push(" OFFSET ").push_bind(page.skip);

        let rows = qb
            .build_query_as::<BusinessWithOwner>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<BusinessWithOwner> {
        let row = sqlx::query_as::<_, BusinessWithOwner>(&format!("{} AND b.id = $1", SELECT_WITH_OWNER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        row.ok_or_else(|| DatabaseError::NotFound("Business not found".to_string()).into())
    }

    pub async fn create(&self, input: BusinessCreate, created_by: i64) -> ServiceResult<BusinessWithOwner> {
        input.validate()?;
        require_found(self.members.exists(input.owner_id).await?, "Owner")?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO businesses (
                name, owner_id, category, description, phone_number, email, website, address, city,
                parish, postal_code, operating_hours, year_established, number_of_employees,
                halal_certified, accepts_zakat, social_media, is_active, notes, created_by
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            ) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.owner_id)
        .bind(input.category)
        .bind(&input.description)
        .bind(&input.phone_number)
        .bind(&input.email)
        .bind(&input.website)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.parish)
        .bind(&input.postal_code)
        .bind(&input.operating_hours)
        .bind(input.year_established)
        .bind(input.number_of_employees)
        .bind(input.halal_certified)
        .bind(input.accepts_zakat)
        .bind(&input.social_media)
        .bind(input.is_active)
        .bind(&input.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        info!("Created business {} ({})", id, input.name);
        self.get(id).await
    }

    pub async fn update(&self, id: i64, patch: BusinessUpdate) -> ServiceResult<BusinessWithOwner> {
        let mut business = self.businesses.select_id(id, "Business").await?;
        let previous_owner = business.owner_id;
        patch.apply(&mut business)?;
        if business.owner_id != previous_owner {
            require_found(self.members.exists(business.owner_id).await?, "Owner")?;
        }

        sqlx::query(
            "UPDATE businesses SET
                name = $2, owner_id = $3, category = $4, description = $5, phone_number = $6,
                email = $7, website = $8, address = $9, city = $10, parish = $11, postal_code = $12,
                operating_hours = $13, year_established = $14, number_of_employees = $15,
                halal_certified = $16, accepts_zakat = $17, social_media = $18, is_active = $19,
                notes = $20, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(business.id)
        .bind(&business.name)
        .bind(business.owner_id)
        .bind(business.category)
        .bind(&business.description)
        .bind(&business.phone_number)
        .bind(&business.email)
        .bind(&business.website)
        .bind(&business.address)
        .bind(&business.city)
        .bind(&business.parish)
        .bind(&business.postal_code)
        .bind(&business.operating_hours)
        .bind(business.year_established)
        .bind(business.number_of_employees)
        .bind(business.halal_certified)
        .bind(business.accepts_zakat)
        .bind(&business.social_media)
        .bind(business.is_active)
        .bind(&business.notes)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<Deleted> {
        self.businesses.delete_id(id, "Business").await?;
        info!("Deleted business {}", id);
        Ok(Deleted::new("Business"))
    }

    pub fn categories() -> Vec<CategoryOption> {
        BusinessCategory::ALL
            .iter()
            .map(|c| CategoryOption { value: c.as_str(), label: c.label() })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_list_every_value_with_label() {
        let categories = BusinessService::categories();
        assert_eq!(categories.len(), 20);
        assert!(categories.contains(&CategoryOption { value: "halal_meat", label: "Halal Meat" }));
    }
}
