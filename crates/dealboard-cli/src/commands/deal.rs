use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{self, display_list, display_option, Format};

#[derive(Subcommand)]
pub enum Commands {
    /// List deals, optionally scoped to one business
    List {
        #[arg(long, default_value = "100")]
        limit: i64,
        #[arg(long)]
        skip: Option<i64>,
        #[arg(long)]
        business_id: Option<i64>,
    },
    /// Create a new deal
    Create {
        #[arg(long)]
        business_id: i64,
        #[arg(long)]
        deal_type: String,
        #[arg(long, value_delimiter = ',', help = "Lowercase day names, comma-separated")]
        days_active: Option<Vec<String>>,
        #[arg(long, help = "HH:MM:SS")]
        time_start: Option<String>,
        #[arg(long, help = "HH:MM:SS")]
        time_end: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        food_items: Option<String>,
        #[arg(long)]
        drink_items: Option<String>,
        #[arg(long)]
        pricing: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        created_by: Option<String>,
    },
    /// Get deal details
    Get {
        #[arg(help = "Deal ID")]
        id: i64,
    },
    /// Update fields of a deal (omitted fields are left unchanged)
    Update {
        #[arg(help = "Deal ID")]
        id: i64,
        #[arg(long)]
        deal_type: Option<String>,
        #[arg(long, value_delimiter = ',')]
        days_active: Option<Vec<String>>,
        #[arg(long)]
        time_start: Option<String>,
        #[arg(long)]
        time_end: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        food_items: Option<String>,
        #[arg(long)]
        drink_items: Option<String>,
        #[arg(long)]
        pricing: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a deal and its comments
    Delete {
        #[arg(help = "Deal ID")]
        id: i64,
    },
    /// Upvote (+1) or downvote (-1) a deal
    Vote {
        #[arg(help = "Deal ID")]
        id: i64,
        #[arg(help = "+1 or -1", allow_negative_numbers = true)]
        vote: i32,
    },
}

#[derive(Debug, Serialize)]
struct CreateRequest {
    business_id: i64,
    deal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    days_active: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    food_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    drink_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pricing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    deal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days_active: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    food_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    drink_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pricing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
pub struct Deal {
    pub id: i64,
    pub business_id: i64,
    pub deal_type: String,
    #[tabled(display_with = "display_list")]
    pub days_active: Option<Vec<String>>,
    #[tabled(display_with = "display_option")]
    pub time_start: Option<String>,
    #[tabled(display_with = "display_option")]
    pub time_end: Option<String>,
    #[tabled(display_with = "display_option")]
    pub pricing: Option<String>,
    pub vote_score: i32,
    pub created_at: DateTime<Utc>,
}

pub async fn run(cmd: Commands, config: &Config, format: Format) -> Result<()> {
    let client = ApiClient::new(config);

    match cmd {
        Commands::List {
            limit,
            skip,
            business_id,
        } => {
            let mut url = format!("/deals?limit={}", limit);
            if let Some(skip) = skip {
                url.push_str(&format!("&skip={}", skip));
            }
            if let Some(business_id) = business_id {
                url.push_str(&format!("&business_id={}", business_id));
            }
            let deals: Vec<Deal> = client.get(&url).await?;
            output::print_items(deals, format);
        }
        Commands::Create {
            business_id,
            deal_type,
            days_active,
            time_start,
            time_end,
            description,
            food_items,
            drink_items,
            pricing,
            tags,
            image_url,
            created_by,
        } => {
            let req = CreateRequest {
                business_id,
                deal_type,
                days_active,
                time_start,
                time_end,
                description,
                food_items,
                drink_items,
                pricing,
                tags,
                image_url,
                created_by,
            };
            let deal: Deal = client.post("/deals", &req).await?;
            output::print_created(deal, format);
        }
        Commands::Get { id } => {
            let deal: Deal = client.get(&format!("/deals/{}", id)).await?;
            output::print_item(deal, format);
        }
        Commands::Update {
            id,
            deal_type,
            days_active,
            time_start,
            time_end,
            description,
            food_items,
            drink_items,
            pricing,
            tags,
            image_url,
        } => {
            let req = UpdateRequest {
                deal_type,
                days_active,
                time_start,
                time_end,
                description,
                food_items,
                drink_items,
                pricing,
                tags,
                image_url,
            };
            let deal: Deal = client.put(&format!("/deals/{}", id), &req).await?;
            output::print_item(deal, format);
        }
        Commands::Delete { id } => {
            client.delete(&format!("/deals/{}", id)).await?;
            output::print_success("Deleted");
        }
        Commands::Vote { id, vote } => {
            let deal: Deal = client
                .post(
                    &format!("/deals/{}/vote", id),
                    &serde_json::json!({ "vote": vote }),
                )
                .await?;
            output::print_item(deal, format);
        }
    }

    Ok(())
}
