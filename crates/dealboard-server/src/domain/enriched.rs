use serde::Serialize;

use super::{Business, Deal};

/// Stock images assigned to deals without one of their own. Selection is by
/// `deal.id % 8`, so a given deal always renders with the same image.
pub const DEFAULT_IMAGES: [&str; 8] = [
    "/craft-beer-bar-interior-with-taps.jpg",
    "/cocktails-on-bar-with-lake-view.jpg",
    "/fresh-oysters-on-ice-with-lemon.jpg",
    "/wine-glasses-and-cheese-board-cozy-cafe.jpg",
    "/street-tacos-with-margarita-mexican-food.jpg",
    "/sushi-rolls-platter-fresh-fish.jpg",
    "/giant-pizza-slice-new-york-style.jpg",
    "/natural-wine-bottles-elegant-restaurant.jpg",
];

/// Downtown Oakland, used when a business has no stored coordinates.
pub const DEFAULT_LOCATION: (f64, f64) = (37.8044, -122.2712);

pub fn default_image(deal_id: i64) -> &'static str {
    DEFAULT_IMAGES[(deal_id.rem_euclid(DEFAULT_IMAGES.len() as i64)) as usize]
}

#[derive(Debug, Serialize)]
pub struct Schedule {
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Denormalized Deal+Business composite consumed by the frontend.
#[derive(Debug, Serialize)]
pub struct EnrichedDeal {
    pub id: i64,
    pub business_id: i64,
    pub restaurant_name: String,
    pub deal_description: String,
    pub schedule: Schedule,
    pub vote_count: i32,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub google_place_id: Option<String>,
    pub created_by: String,
    pub created_at: Option<String>,
    pub image_url: String,
    pub location: Location,
    pub neighborhood: Option<String>,
    pub deal_type: String,
    pub food_items: Option<String>,
    pub drink_items: Option<String>,
    pub pricing: Option<String>,
    pub tags: Option<Vec<String>>,
    pub website: Option<String>,
}

impl EnrichedDeal {
    pub fn project(deal: Deal, business: &Business) -> Self {
        Self {
            id: deal.id,
            business_id: business.id,
            restaurant_name: business.name.clone(),
            deal_description: deal.description.unwrap_or_default(),
            schedule: Schedule {
                days: deal
                    .days_active
                    .unwrap_or_default()
                    .iter()
                    .map(|day| capitalize(day))
                    .collect(),
                start_time: deal
                    .time_start
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_default(),
                end_time: deal
                    .time_end
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_default(),
            },
            vote_count: deal.vote_score,
            address: business.address.clone(),
            phone: business.phone.clone(),
            google_place_id: business.google_place_id.clone(),
            created_by: deal.created_by,
            created_at: Some(deal.created_at.to_rfc3339()),
            // Always assigned by id so a deal renders consistently; the
            // stored image_url is not consulted here.
            image_url: default_image(deal.id).to_string(),
            location: Location {
                lat: business.latitude.unwrap_or(DEFAULT_LOCATION.0),
                lng: business.longitude.unwrap_or(DEFAULT_LOCATION.1),
            },
            neighborhood: None,
            deal_type: deal.deal_type,
            food_items: deal.food_items,
            drink_items: deal.drink_items,
            pricing: deal.pricing,
            tags: deal.tags,
            website: business.website.clone(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
