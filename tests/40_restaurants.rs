mod common;

use anyhow::{Context, Result};
use serde_json::{json, Value};

fn id_of(data: &Value) -> Result<i64> {
    data["id"].as_i64().with_context(|| format!("missing id in {}", data))
}

fn named<'a>(items: &'a [Value], name: &str) -> Vec<&'a Value> {
    items.iter().filter(|item| item["name"] == name).collect()
}

async fn list(api: &common::ApiClient, query: &str) -> Result<Vec<Value>> {
    let data = api.get(&format!("/restaurants?{}", query)).await?;
    data.as_array().cloned().context("restaurant listing is not an array")
}

#[tokio::test]
async fn listing_merges_dedicated_and_derived_restaurants() -> Result<()> {
    let Some(api) = common::authenticated_client().await? else { return Ok(()) };
    let suffix = common::unique_suffix();

    let owner = api
        .create(
            "/members",
            &json!({
                "muslim_name": format!("Ibrahim {}", suffix),
                "legal_name": format!("Abraham Clarke {}", suffix),
                "gender": "male",
                "date_of_birth": "1978-06-01",
            }),
        )
        .await?;
    let owner_id = id_of(&owner)?;

    // Restaurant business without a restaurant record
    let grill_name = format!("Zam Zam Grill {}", suffix);
    let grill = api
        .create(
            "/businesses",
            &json!({
                "name": grill_name,
                "owner_id": owner_id,
                "category": "restaurant",
                "address": format!("12 Halal Street {}", suffix),
                "parish": "St. Andrew",
                "halal_certified": true,
            }),
        )
        .await?;
    let grill_id = id_of(&grill)?;

    // Restaurant business already covered by a dedicated record
    let linked_name = format!("Linked Kitchen {}", suffix);
    let linked = api
        .create(
            "/businesses",
            &json!({
                "name": linked_name,
                "owner_id": owner_id,
                "category": "restaurant",
                "address": "4 Hope Road",
                "halal_certified": true,
            }),
        )
        .await?;
    let linked_id = id_of(&linked)?;

    let bites_name = format!("Halal Bites {}", suffix);
    let bites = api
        .create(
            "/restaurants",
            &json!({
                "name": bites_name,
                "address": "7 Constant Spring Road",
                "parish": "Kingston",
                "has_halal_options": true,
                "business_id": linked_id,
            }),
        )
        .await?;
    let bites_id = id_of(&bites)?;

    let items = list(&api, &format!("search={}&halal_only=true&limit=100", suffix)).await?;

    let bites_rows = named(&items, &bites_name);
    assert_eq!(bites_rows.len(), 1, "dedicated restaurant listed once: {:?}", items);
    assert_eq!(bites_rows[0]["source"], "dedicated");
    assert_eq!(bites_rows[0]["id"], bites_id);

    let grill_rows = named(&items, &grill_name);
    assert_eq!(grill_rows.len(), 1, "derived restaurant listed once: {:?}", items);
    assert_eq!(grill_rows[0]["source"], "derived");
    assert_eq!(grill_rows[0]["id"], 0);
    assert_eq!(grill_rows[0]["business_id"], grill_id);
    assert_eq!(grill_rows[0]["is_halal_certified"], true);

    assert!(
        named(&items, &linked_name).is_empty(),
        "linked business must not be derived: {:?}",
        items
    );
    assert_eq!(items.len(), 2, "{:?}", items);

    // Address match reaches the derived entry only
    let by_address = list(&api, &format!("search=Halal%20Street%20{}&halal_only=true", suffix)).await?;
    assert_eq!(by_address.len(), 1, "{:?}", by_address);
    assert_eq!(by_address[0]["name"], grill_name.as_str());

    // Window applies to the merged list
    let first = list(&api, &format!("search={}&skip=0&limit=1", suffix)).await?;
    let second = list(&api, &format!("search={}&skip=1&limit=1", suffix)).await?;
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0]["source"], "dedicated");
    assert_eq!(second[0]["source"], "derived");

    Ok(())
}

#[tokio::test]
async fn menus_attach_to_dedicated_restaurants() -> Result<()> {
    let Some(api) = common::authenticated_client().await? else { return Ok(()) };
    let suffix = common::unique_suffix();

    let name = format!("Menu House {}", suffix);
    let restaurant = api
        .create(
            "/restaurants",
            &json!({ "name": name, "address": "1 King Street", "parish": "Kingston" }),
        )
        .await?;
    let restaurant_id = id_of(&restaurant)?;

    let menu = api
        .create(
            &format!("/restaurants/{}/menu", restaurant_id),
            &json!({ "file_name": "dinner.pdf", "file_type": "pdf" }),
        )
        .await?;
    let menu_id = id_of(&menu)?;
    assert_eq!(menu["restaurant_id"], restaurant_id);

    let fetched = api.get(&format!("/restaurants/{}", restaurant_id)).await?;
    let files = fetched["menu_files"].as_array().context("menu_files is not an array")?;
    assert_eq!(files.len(), 1, "{}", fetched);
    assert_eq!(files[0]["file_name"], "dinner.pdf");

    api.delete(&format!("/restaurants/{}/menu/{}", restaurant_id, menu_id)).await?;
    let fetched = api.get(&format!("/restaurants/{}", restaurant_id)).await?;
    assert_eq!(fetched["menu_files"], json!([]));

    api.delete(&format!("/restaurants/{}", restaurant_id)).await?;
    Ok(())
}
