use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{self, Format};

#[derive(Subcommand)]
pub enum Commands {
    /// List comments, optionally scoped to a business or deal
    List {
        #[arg(long, default_value = "100")]
        limit: i64,
        #[arg(long)]
        skip: Option<i64>,
        #[arg(long)]
        business_id: Option<i64>,
        #[arg(long)]
        deal_id: Option<i64>,
    },
    /// Create a comment on exactly one business or deal
    Create {
        #[arg(long)]
        text: String,
        #[arg(long)]
        business_id: Option<i64>,
        #[arg(long)]
        deal_id: Option<i64>,
        #[arg(long)]
        created_by: Option<String>,
    },
    /// Get comment details
    Get {
        #[arg(help = "Comment ID")]
        id: i64,
    },
    /// Update a comment's text
    Update {
        #[arg(help = "Comment ID")]
        id: i64,
        #[arg(long)]
        text: String,
    },
    /// Delete a comment
    Delete {
        #[arg(help = "Comment ID")]
        id: i64,
    },
    /// Upvote (+1) or downvote (-1) a comment
    Vote {
        #[arg(help = "Comment ID")]
        id: i64,
        #[arg(help = "+1 or -1", allow_negative_numbers = true)]
        vote: i32,
    },
}

#[derive(Debug, Serialize)]
struct CreateRequest {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deal_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
pub struct Comment {
    pub id: i64,
    #[tabled(display_with = "display_id")]
    pub business_id: Option<i64>,
    #[tabled(display_with = "display_id")]
    pub deal_id: Option<i64>,
    pub text: String,
    pub vote_score: i32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

fn display_id(o: &Option<i64>) -> String {
    o.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
}

pub async fn run(cmd: Commands, config: &Config, format: Format) -> Result<()> {
    let client = ApiClient::new(config);

    match cmd {
        Commands::List {
            limit,
            skip,
            business_id,
            deal_id,
        } => {
            let mut url = format!("/comments?limit={}", limit);
            if let Some(skip) = skip {
                url.push_str(&format!("&skip={}", skip));
            }
            if let Some(business_id) = business_id {
                url.push_str(&format!("&business_id={}", business_id));
            }
            if let Some(deal_id) = deal_id {
                url.push_str(&format!("&deal_id={}", deal_id));
            }
            let comments: Vec<Comment> = client.get(&url).await?;
            output::print_items(comments, format);
        }
        Commands::Create {
            text,
            business_id,
            deal_id,
            created_by,
        } => {
            let req = CreateRequest {
                text,
                business_id,
                deal_id,
                created_by,
            };
            let comment: Comment = client.post("/comments", &req).await?;
            output::print_created(comment, format);
        }
        Commands::Get { id } => {
            let comment: Comment = client.get(&format!("/comments/{}", id)).await?;
            output::print_item(comment, format);
        }
        Commands::Update { id, text } => {
            let comment: Comment = client
                .put(
                    &format!("/comments/{}", id),
                    &serde_json::json!({ "text": text }),
                )
                .await?;
            output::print_item(comment, format);
        }
        Commands::Delete { id } => {
            client.delete(&format!("/comments/{}", id)).await?;
            output::print_success("Deleted");
        }
        Commands::Vote { id, vote } => {
            let comment: Comment = client
                .post(
                    &format!("/comments/{}/vote", id),
                    &serde_json::json!({ "vote": vote }),
                )
                .await?;
            output::print_item(comment, format);
        }
    }

    Ok(())
}
