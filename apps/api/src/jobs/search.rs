//! Job-listing generation behind the shared cache.
//!
//! Fails open: a generation or parse failure yields an empty list, which is
//! never cached. The user's stored listings are replaced on every search.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::{job_search_key, read_json, write_json, SharedCache};
use crate::errors::AppError;
use crate::llm_client::prompts::RAW_JSON_ARRAY_RULE;
use crate::llm_client::{generate_records, ContentKind, ContentRequest, TextGenerator};
use crate::models::job::{NewScrapedJob, ScrapedJobRow};
use crate::models::user::UserProfile;
use crate::store::Store;

pub const DEFAULT_QUERY: &str = "Software Developer";
const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// Replace: {query}, {location}, {json_rule}
pub const JOB_LIST_PROMPT_TEMPLATE: &str = r#"Generate exactly 15 highly realistic job postings for the role of '{query}' located in or near '{location}' (or remote).
Make them look like authentic listings from well-known companies and startups.
Each element of the array must have these exact keys:
"title": string
"company": string
"location": string
"source": one of "LinkedIn", "Glassdoor", "Indeed", "Wellfound", "ZipRecruiter"
"description": a 1-2 sentence snippet of the role
{json_rule}"#;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPayload {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl JobPayload {
    /// Applies listing defaults. Model-supplied links are ignored; the link is
    /// always a web search for the title and company.
    pub fn normalize(self, query: &str, location: &str) -> NewScrapedJob {
        let company_raw = non_blank(self.company);
        let title = non_blank(self.title).unwrap_or_else(|| format!("{query} Professional"));
        let link = search_link(&format!(
            "{title} job {}",
            company_raw.as_deref().unwrap_or_default()
        ));
        NewScrapedJob {
            link,
            company: company_raw.unwrap_or_else(|| "Tech Innovations Inc.".to_string()),
            location: non_blank(self.location).unwrap_or_else(|| {
                if location.is_empty() {
                    "Remote".to_string()
                } else {
                    location.to_string()
                }
            }),
            source: non_blank(self.source).unwrap_or_else(|| "Web".to_string()),
            description: non_blank(self.description)
                .unwrap_or_else(|| "A fantastic opportunity.".to_string()),
            title,
        }
    }
}

pub fn search_link(text: &str) -> String {
    Url::parse_with_params(GOOGLE_SEARCH_URL, &[("q", text.trim())])
        .map(String::from)
        .unwrap_or_else(|_| GOOGLE_SEARCH_URL.to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSearch {
    pub query_used: String,
    pub location_used: String,
    pub jobs: Vec<ScrapedJobRow>,
}

/// Explicit parameter, else occupation, else the first skill, else the default.
pub fn resolve_query(user: &UserProfile, query: Option<&str>) -> String {
    [query, Some(user.occupation.as_str()), user.skills.first().map(String::as_str)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUERY)
        .to_string()
}

/// Explicit parameter, else city, else country, else empty.
pub fn resolve_location(user: &UserProfile, location: Option<&str>) -> String {
    [location, Some(user.city.as_str()), Some(user.country.as_str())]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub async fn search_jobs(
    store: &dyn Store,
    cache: &dyn SharedCache,
    llm: &dyn TextGenerator,
    user: &UserProfile,
    query: Option<&str>,
    location: Option<&str>,
) -> Result<JobSearch, AppError> {
    let query = resolve_query(user, query);
    let location = resolve_location(user, location);
    let key = job_search_key(&query, &location);

    let listings = match read_json::<Vec<NewScrapedJob>>(cache, &key).await {
        Some(cached) => {
            info!("Job search cache hit for {key}");
            cached
        }
        None => {
            let listings = generate_listings(llm, &query, &location).await;
            if !listings.is_empty() {
                write_json(cache, &key, &listings).await;
            }
            listings
        }
    };

    let jobs = store.replace_scraped_jobs(user.id, listings).await?;
    info!(
        "Stored {} job listings for user {} ({query} / {location})",
        jobs.len(),
        user.id
    );

    Ok(JobSearch {
        query_used: query,
        location_used: location,
        jobs,
    })
}

async fn generate_listings(llm: &dyn TextGenerator, query: &str, location: &str) -> Vec<NewScrapedJob> {
    let prompt = JOB_LIST_PROMPT_TEMPLATE
        .replace("{json_rule}", RAW_JSON_ARRAY_RULE)
        .replace("{location}", location)
        .replace("{query}", query);
    let request = ContentRequest::new(ContentKind::JobList, format!("{query} @ {location}"), prompt);

    match generate_records::<JobPayload>(llm, &request).await {
        Ok(payloads) => payloads
            .into_iter()
            .map(|p| p.normalize(query, location))
            .collect(),
        Err(e) => {
            warn!("Job generation failed for '{query}', returning no listings: {e}");
            Vec::new()
        }
    }
}
