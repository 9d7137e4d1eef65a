use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{self, display_option, Format};

#[derive(Subcommand)]
pub enum Commands {
    /// List businesses
    List {
        #[arg(long, default_value = "100")]
        limit: i64,
        #[arg(long)]
        skip: Option<i64>,
    },
    /// Create a new business
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        google_place_id: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        latitude: Option<f64>,
        #[arg(long)]
        longitude: Option<f64>,
        #[arg(long)]
        created_by: Option<String>,
    },
    /// Get business details
    Get {
        #[arg(help = "Business ID")]
        id: i64,
    },
    /// Update fields of a business (omitted fields are left unchanged)
    Update {
        #[arg(help = "Business ID")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        google_place_id: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        latitude: Option<f64>,
        #[arg(long)]
        longitude: Option<f64>,
    },
    /// Delete a business and everything attached to it
    Delete {
        #[arg(help = "Business ID")]
        id: i64,
    },
    /// Upvote (+1) or downvote (-1) a business
    Vote {
        #[arg(help = "Business ID")]
        id: i64,
        #[arg(help = "+1 or -1", allow_negative_numbers = true)]
        vote: i32,
    },
}

#[derive(Debug, Serialize)]
struct CreateRequest {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
pub struct Business {
    pub id: i64,
    pub name: String,
    #[tabled(display_with = "display_option")]
    pub address: Option<String>,
    #[tabled(display_with = "display_option")]
    pub phone: Option<String>,
    #[tabled(display_with = "display_option")]
    pub website: Option<String>,
    pub vote_score: i32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

pub async fn run(cmd: Commands, config: &Config, format: Format) -> Result<()> {
    let client = ApiClient::new(config);

    match cmd {
        Commands::List { limit, skip } => {
            let mut url = format!("/businesses?limit={}", limit);
            if let Some(skip) = skip {
                url.push_str(&format!("&skip={}", skip));
            }
            let businesses: Vec<Business> = client.get(&url).await?;
            output::print_items(businesses, format);
        }
        Commands::Create {
            name,
            address,
            phone,
            google_place_id,
            website,
            latitude,
            longitude,
            created_by,
        } => {
            let req = CreateRequest {
                name,
                address,
                phone,
                google_place_id,
                website,
                latitude,
                longitude,
                created_by,
            };
            let business: Business = client.post("/businesses", &req).await?;
            output::print_created(business, format);
        }
        Commands::Get { id } => {
            let business: Business = client.get(&format!("/businesses/{}", id)).await?;
            output::print_item(business, format);
        }
        Commands::Update {
            id,
            name,
            address,
            phone,
            google_place_id,
            website,
            latitude,
            longitude,
        } => {
            let req = UpdateRequest {
                name,
                address,
                phone,
                google_place_id,
                website,
                latitude,
                longitude,
            };
            let business: Business = client.put(&format!("/businesses/{}", id), &req).await?;
            output::print_item(business, format);
        }
        Commands::Delete { id } => {
            client.delete(&format!("/businesses/{}", id)).await?;
            output::print_success("Deleted");
        }
        Commands::Vote { id, vote } => {
            let business: Business = client
                .post(
                    &format!("/businesses/{}/vote", id),
                    &serde_json::json!({ "vote": vote }),
                )
                .await?;
            output::print_item(business, format);
        }
    }

    Ok(())
}
