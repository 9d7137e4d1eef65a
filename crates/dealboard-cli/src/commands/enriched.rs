use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{self, display_option, Format};

#[derive(Subcommand)]
pub enum Commands {
    /// List deals joined with their business details
    List {
        #[arg(long, default_value = "100")]
        limit: i64,
        #[arg(long)]
        skip: Option<i64>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Schedule {
    days: Vec<String>,
    start_time: String,
    end_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnrichedDeal {
    id: i64,
    business_id: i64,
    restaurant_name: String,
    deal_type: String,
    deal_description: String,
    schedule: Schedule,
    vote_count: i32,
    address: Option<String>,
    image_url: String,
    location: Location,
    website: Option<String>,
}

#[derive(Tabled, Serialize)]
struct Row {
    id: i64,
    restaurant: String,
    deal_type: String,
    days: String,
    hours: String,
    votes: i32,
    #[tabled(display_with = "display_option")]
    address: Option<String>,
}

impl From<EnrichedDeal> for Row {
    fn from(d: EnrichedDeal) -> Self {
        let hours = if d.schedule.start_time.is_empty() && d.schedule.end_time.is_empty() {
            "-".into()
        } else {
            format!("{}-{}", d.schedule.start_time, d.schedule.end_time)
        };

        Self {
            id: d.id,
            restaurant: d.restaurant_name,
            deal_type: d.deal_type,
            days: if d.schedule.days.is_empty() {
                "-".into()
            } else {
                d.schedule.days.join(", ")
            },
            hours,
            votes: d.vote_count,
            address: d.address,
        }
    }
}

pub async fn run(cmd: Commands, config: &Config, format: Format) -> Result<()> {
    let client = ApiClient::new(config);

    match cmd {
        Commands::List { limit, skip } => {
            let mut url = format!("/api/deals-enriched?limit={}", limit);
            if let Some(skip) = skip {
                url.push_str(&format!("&skip={}", skip));
            }
            let deals: Vec<EnrichedDeal> = client.get(&url).await?;

            match format {
                Format::Json => output::print_json(&deals),
                Format::Table => {
                    output::print_items(deals.into_iter().map(Row::from).collect::<Vec<_>>(), format)
                }
            }
        }
    }

    Ok(())
}
