//! Destination suggestions plus a flight-search deep link.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::{localize, Locale, RAW_JSON_ARRAY_RULE};
use crate::llm_client::{generate_records, ContentKind, ContentRequest, TextGenerator};

const SKYSCANNER_FLIGHTS_URL: &str = "https://www.skyscanner.com/transport/flights";

/// Replace: {destination}, {json_rule}
pub const TRAVEL_PROMPT_TEMPLATE: &str = r#"Act as a travel guide. Suggest 5 incredibly popular places to visit in {destination}.
Each element of the array must have these exact keys:
"name": string
"description": string, one or two sentences
{json_rule}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPlace {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelPlan {
    pub places: Vec<TravelPlace>,
    pub flight_search_url: String,
}

pub fn flight_search_url(from: &str, to: &str, date: &str) -> String {
    Url::parse(SKYSCANNER_FLIGHTS_URL)
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut().ok()?.extend([from, to, date]);
            Some(url.to_string())
        })
        .unwrap_or_else(|| format!("{SKYSCANNER_FLIGHTS_URL}/{from}/{to}/{date}"))
}

/// Never fails: generation problems yield an empty list of places.
pub async fn plan_trip(
    llm: &dyn TextGenerator,
    from: &str,
    to: &str,
    date: &str,
    locale: Locale,
) -> TravelPlan {
    let prompt = TRAVEL_PROMPT_TEMPLATE
        .replace("{destination}", to)
        .replace("{json_rule}", RAW_JSON_ARRAY_RULE);
    let request = ContentRequest::new(ContentKind::TravelPlan, to, localize(prompt, locale));

    let places = match generate_records::<TravelPlace>(llm, &request).await {
        Ok(places) => places,
        Err(e) => {
            warn!("Travel plan generation for {to} failed: {e}");
            Vec::new()
        }
    };

    TravelPlan {
        places,
        flight_search_url: flight_search_url(from, to, date),
    }
}
