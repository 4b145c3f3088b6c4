mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

// Runs alone in this binary so it sees a fresh store and the first assigned id.
#[tokio::test]
async fn water_example_end_to_end() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::full_access_token();

    let res = client
        .post(format!("{}/drinks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Water",
            "recipe": [{"name": "Water", "color": "blue", "parts": 1}],
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["drinks"],
        json!([{
            "id": 1,
            "title": "Water",
            "recipe": [{"name": "Water", "color": "blue", "parts": 1}],
        }])
    );

    let res = client
        .get(format!("{}/drinks", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["drinks"],
        json!([{
            "id": 1,
            "title": "Water",
            "recipe": [{"name": "*"}],
        }])
    );
    Ok(())
}
