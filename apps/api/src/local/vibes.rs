//! Local deals, events and meetups, durably cached per (city, country).
//!
//! Lookup order: stored row → generate and upsert. On refresh the row is
//! deleted before generation. When generation fails the response still
//! succeeds, falling back to whatever row exists now, then the row deleted
//! by the refresh, then a fixed default list.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::RAW_JSON_ARRAY_RULE;
use crate::llm_client::{generate_records, ContentKind, ContentRequest, TextGenerator};
use crate::models::local_vibe::{LocalVibeItem, LocalVibeRow, VibeKind};
use crate::models::user::UserProfile;
use crate::store::Store;

pub const DEFAULT_CITY: &str = "New York";
pub const DEFAULT_COUNTRY: &str = "USA";

/// Replace: {city}, {country}, {json_rule}
pub const LOCAL_VIBES_PROMPT_TEMPLATE: &str = r#"Find or generate 6-8 incredible 'local vibes' for someone living in {city}, {country}.
These should be a mix of:
- Current shopping discounts or sales.
- Upcoming community events or festivals.
- Trending local food spots or happy hour deals.
- Career-related meetups or student discounts.

Each element of the array must have these exact keys:
"title": string
"type": one of "Deal", "Event", "Food", "Career"
"description": string
"value": string, e.g. "50% Off" or "Free Entry"
"location_detail": string
"image_query": a short string to use for an image search
{json_rule}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VibeSource {
    Stored,
    Generated,
    Stale,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalVibes {
    pub location: String,
    pub offers: Vec<LocalVibeItem>,
    pub source: VibeSource,
}

pub fn fallback_vibes() -> Vec<LocalVibeItem> {
    let item = |title: &str, kind, description: &str, value: &str, detail: &str, image: &str| {
        LocalVibeItem {
            title: title.to_string(),
            kind,
            description: description.to_string(),
            value: value.to_string(),
            location_detail: detail.to_string(),
            image_query: image.to_string(),
        }
    };
    vec![
        item(
            "Global Fusion Festival",
            VibeKind::Event,
            "A celebration of local culture and food.",
            "Free Entry",
            "Downtown Plaza",
            "festival crowd",
        ),
        item(
            "Tech Career Mixer",
            VibeKind::Career,
            "Networking with local innovators.",
            "Invite Only",
            "Innovation Hub",
            "networking event",
        ),
        item(
            "Student Night Out",
            VibeKind::Deal,
            "Exclusive discounts for verified students.",
            "30% Off Everything",
            "City Center",
            "shopping mall",
        ),
    ]
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    match value.trim() {
        "" => default,
        trimmed => trimmed,
    }
}

fn usable(row: Option<LocalVibeRow>) -> Option<Vec<LocalVibeItem>> {
    row.map(|r| r.offers.0).filter(|offers| !offers.is_empty())
}

pub async fn local_vibes(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    user: &UserProfile,
    refresh: bool,
) -> Result<LocalVibes, AppError> {
    let city = or_default(&user.city, DEFAULT_CITY);
    let country = or_default(&user.country, DEFAULT_COUNTRY);
    let location = format!("{city}, {country}");
    let respond = |offers, source| LocalVibes {
        location: location.clone(),
        offers,
        source,
    };

    let stale = if refresh {
        info!("Refreshing local vibes for {location}");
        store.delete_local_vibe(city, country).await?
    } else {
        if let Some(offers) = usable(store.find_local_vibe(city, country).await?) {
            info!("Serving stored local vibes for {location}");
            return Ok(respond(offers, VibeSource::Stored));
        }
        None
    };

    let prompt = LOCAL_VIBES_PROMPT_TEMPLATE
        .replace("{city}", city)
        .replace("{country}", country)
        .replace("{json_rule}", RAW_JSON_ARRAY_RULE);
    let request = ContentRequest::new(ContentKind::LocalVibes, location.clone(), prompt);

    match generate_records::<LocalVibeItem>(llm, &request).await {
        Ok(items) if !items.is_empty() => {
            let row = store.upsert_local_vibe(city, country, &items).await?;
            info!("Saved {} local vibes for {location}", row.offers.0.len());
            return Ok(respond(row.offers.0, VibeSource::Generated));
        }
        Ok(_) => warn!("Local vibes generation for {location} produced no items"),
        Err(e) => warn!("Local vibes generation for {location} failed: {e}"),
    }

    if let Some(offers) = usable(store.find_local_vibe(city, country).await?) {
        return Ok(respond(offers, VibeSource::Stored));
    }
    if let Some(offers) = usable(stale) {
        return Ok(respond(offers, VibeSource::Stale));
    }
    Ok(respond(fallback_vibes(), VibeSource::Fallback))
}
