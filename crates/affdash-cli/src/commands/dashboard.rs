use affdash_core::ApiClient;
use anyhow::Result;
use serde_json::json;

use crate::cli::DashboardCommands;
use crate::output::print_json;

pub async fn run(client: &ApiClient, command: DashboardCommands) -> Result<()> {
    let dashboard = client.dashboard();
    match command {
        DashboardCommands::Stats => {
            let (stats, recent) =
                futures::try_join!(dashboard.stats(), dashboard.recent_applications())?;
            print_json(&json!({
                "stats": stats,
                "recent_applications": recent,
            }))
        }
        DashboardCommands::Graph { period } => print_json(&dashboard.graph_data(period).await?),
        DashboardCommands::Affiliates => print_json(&dashboard.affiliate_stats().await?),
        DashboardCommands::Tree { affiliate_id } => {
            print_json(&dashboard.affiliate_tree(affiliate_id.as_deref()).await?)
        }
    }
}
