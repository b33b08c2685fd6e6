//! Career plan generation with most-recent-plan reuse.
//!
//! Flow: no extra details + stored plan → return stored plan.
//! Otherwise: prompt → generate → parse steps → persist → return.
//! There is no fallback plan; generation and parse failures surface.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::career::prompts::build_career_plan_prompt;
use crate::errors::AppError;
use crate::llm_client::parser::ParseError;
use crate::llm_client::prompts::Locale;
use crate::llm_client::{generate_records, ContentKind, ContentRequest, TextGenerator};
use crate::models::user::UserProfile;
use crate::store::Store;

pub const MAX_STEPS: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum StepType {
    #[default]
    Milestone,
    Learning,
    Project,
    Job,
}

impl From<String> for StepType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "learning" => StepType::Learning,
            "project" => StepType::Project,
            "job" => StepType::Job,
            _ => StepType::Milestone,
        }
    }
}

/// One roadmap node. `title` is required; everything else has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerStep {
    #[serde(default)]
    pub step_number: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeframe: String,
    #[serde(rename = "type", default)]
    pub step_type: StepType,
}

#[derive(Debug, Clone)]
pub struct CareerPlan {
    pub plan_id: Uuid,
    pub steps: Vec<CareerStep>,
    pub cached: bool,
}

/// Returns the user's stored plan when `extra_info` is blank, else generates one.
pub async fn get_or_generate_plan(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    user: &UserProfile,
    extra_info: &str,
    locale: Locale,
) -> Result<CareerPlan, AppError> {
    if extra_info.trim().is_empty() {
        if let Some(existing) = store.latest_career_plan(user.id).await? {
            match serde_json::from_value::<Vec<CareerStep>>(existing.plan_details) {
                Ok(steps) if !steps.is_empty() => {
                    info!("Reusing stored career plan {} for user {}", existing.id, user.id);
                    return Ok(CareerPlan {
                        plan_id: existing.id,
                        steps,
                        cached: true,
                    });
                }
                Ok(_) => warn!("Stored career plan {} is empty, regenerating", existing.id),
                Err(e) => warn!(
                    "Stored career plan {} is unreadable, regenerating: {e}",
                    existing.id
                ),
            }
        }
    }

    let request = ContentRequest::new(
        ContentKind::CareerPlan,
        user.id.to_string(),
        build_career_plan_prompt(user, extra_info, locale),
    );
    let steps = normalize_steps(generate_records::<CareerStep>(llm, &request).await?)?;

    let plan_value = serde_json::to_value(&steps)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize career plan: {e}")))?;
    let row = store.insert_career_plan(user.id, &plan_value).await?;

    info!(
        "Generated career plan {} with {} steps for user {}",
        row.id,
        steps.len(),
        user.id
    );

    Ok(CareerPlan {
        plan_id: row.id,
        steps,
        cached: false,
    })
}

/// Caps the plan at `MAX_STEPS` and renumbers steps from 1.
fn normalize_steps(mut steps: Vec<CareerStep>) -> Result<Vec<CareerStep>, ParseError> {
    if steps.is_empty() {
        return Err(ParseError::Empty);
    }
    steps.truncate(MAX_STEPS);
    for (index, step) in steps.iter_mut().enumerate() {
        step.step_number = index as u32 + 1;
    }
    Ok(steps)
}
