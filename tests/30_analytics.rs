mod common;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

fn count(data: &Value, key: &str) -> Result<i64> {
    data[key].as_i64().with_context(|| format!("missing {} in {}", key, data))
}

fn bucket_total(dashboard: &Value) -> Result<i64> {
    let buckets = dashboard["age_distribution"].as_object().context("age_distribution is not an object")?;
    for label in ["0-18", "19-30", "31-45", "46-60", "60+"] {
        assert!(buckets.contains_key(label), "missing bucket {}", label);
    }
    Ok(buckets.values().filter_map(Value::as_i64).sum())
}

#[tokio::test]
async fn dashboard_counts_track_seeded_members() -> Result<()> {
    let Some(api) = common::authenticated_client().await? else { return Ok(()) };
    let suffix = common::unique_suffix();

    let before = api.get("/analytics/dashboard").await?;

    let today = Utc::now().date_naive();
    let young_dob = today - Duration::days(20 * 365 + 100);
    api.create(
        "/members",
        &json!({
            "muslim_name": format!("Yusuf {}", suffix),
            "legal_name": format!("Joseph Brown {}", suffix),
            "gender": "male",
            "date_of_birth": young_dob.format("%Y-%m-%d").to_string(),
            "workplace": "Kingston Wharf",
        }),
    )
    .await?;
    api.create(
        "/members",
        &json!({
            "muslim_name": format!("Khadija {}", suffix),
            "legal_name": format!("Catherine Reid {}", suffix),
            "gender": "female",
            "date_of_birth": "1940-03-12",
            "date_of_death": "2020-11-02",
        }),
    )
    .await?;

    let after = api.get("/analytics/dashboard").await?;

    let total = count(&after, "total_members")?;
    let active = count(&after, "active_members")?;
    let deceased = count(&after, "deceased_members")?;
    assert_eq!(active + deceased, total, "active + deceased must equal total: {}", after);
    assert_eq!(bucket_total(&after)?, active, "age buckets must cover active members only: {}", after);

    assert_eq!(total - count(&before, "total_members")?, 2);
    assert_eq!(deceased - count(&before, "deceased_members")?, 1);
    assert_eq!(active - count(&before, "active_members")?, 1);
    assert_eq!(
        after["age_distribution"]["19-30"].as_i64().unwrap_or_default()
            - before["age_distribution"]["19-30"].as_i64().unwrap_or_default(),
        1
    );

    Ok(())
}

#[tokio::test]
async fn member_statistics_rates_are_percentages() -> Result<()> {
    let Some(api) = common::authenticated_client().await? else { return Ok(()) };

    let stats = api.get("/analytics/members/statistics").await?;
    for key in ["employment_rate", "business_ownership_rate"] {
        let rate = stats[key].as_f64().with_context(|| format!("missing {} in {}", key, stats))?;
        assert!((0.0..=100.0).contains(&rate), "{} out of range: {}", key, rate);
    }
    assert!(count(&stats, "members_with_businesses")? >= 0);
    assert!(stats["conversions_by_year"].is_object(), "{}", stats);
    assert!(stats["top_business_categories"].as_array().map_or(false, |c| c.len() <= 5), "{}", stats);

    Ok(())
}
