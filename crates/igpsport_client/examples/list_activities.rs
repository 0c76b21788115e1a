use igpsport_client::{
    ActivityFilter, IgpsportClient, config::Config, http_client::ReqwestIgpsportClient,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects IGPSPORT_AUTH_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestIgpsportClient::new(cfg)?;

    let page_size = std::env::var("IGPSPORT_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(20);

    let activities = client
        .list_activities(&ActivityFilter::default().with_page_size(page_size))
        .await
        .map_err(|e| format!("failed to fetch activities: {}", e))?;

    println!("Found {} activities", activities.len());
    for (i, a) in activities.iter().enumerate() {
        println!(
            "{}. {} - {} ({:.2} km)",
            i + 1,
            a.start_time,
            a.title,
            a.ride_distance / 1000.0
        );
    }
    Ok(())
}
