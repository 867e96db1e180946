use bigo_api_client::{ApiClient, EventFilters, ListFilters};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = ApiClient::from_env().map_err(anyhow::Error::msg)?;

    let rooms = api
        .list_resources(&ListFilters::default().page(1, 10).status("live"))
        .await?;
    println!("{rooms:#}");

    let room_id = std::env::args().nth(1).unwrap_or_default();
    match api.get_resource_details(&room_id).await {
        Ok(room) => println!("{room:#}"),
        Err(err) => eprintln!("room lookup failed: {err} (status {:?})", err.status()),
    }

    let events = api
        .get_resource_events(&room_id, &EventFilters::default().event_type("gift"))
        .await?;
    println!("{events:#}");

    Ok(())
}
