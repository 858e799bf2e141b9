use anyhow::{Context, Result};
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::SuggestionProvider;
use crate::config::SuggestionSettings;
use crate::domain::{PlayerId, PlayerSkillProfile};

/// Chat-completion client used as a grouping suggestion source.
pub struct SuggestionClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroupsPayload {
    groups: Vec<Vec<PlayerId>>,
}

impl SuggestionClient {
    pub fn new(settings: &SuggestionSettings, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: settings.api_url.to_string(),
            model: settings.model.to_string(),
            api_key,
        })
    }

    /// Describes every profile plus the deterministic pairing rules, and
    /// asks for a strict JSON answer so the reply can be machine-parsed.
    fn build_prompt(profiles: &[PlayerSkillProfile], group_size: usize) -> String {
        let mut prompt = String::from(
            "You are balancing groups for a reflex/aim arena. \
             Players, one per line as `id name rating consistency style`:\n",
        );
        for p in profiles {
            prompt.push_str(&format!(
                "{} {} {:.0} {:.2} {}\n",
                p.player_id,
                p.name,
                p.skill_rating,
                p.consistency,
                p.play_style.as_str()
            ));
        }
        prompt.push_str(&format!(
            "\nSplit all players into groups of {} with minimal skill spread \
             inside each group. Default rule when unsure: sort descending by \
             rating and take adjacent players. Use every id exactly once. \
             Answer with JSON only, shaped {{\"groups\": [[id, id], ...]}}.",
            group_size
        ));
        prompt
    }

    /// Extract the JSON object from the completion text. Models often wrap
    /// the payload in code fences or prose, so take the outermost braces.
    fn parse_groups(content: &str) -> Result<Vec<Vec<PlayerId>>> {
        let start = content
            .find('{')
            .context("No JSON object in suggestion response")?;
        let end = content
            .rfind('}')
            .context("No JSON object in suggestion response")?;
        let payload: GroupsPayload = serde_json::from_str(&content[start..=end])
            .context("Failed to parse suggestion response JSON")?;
        Ok(payload.groups)
    }
}

impl SuggestionProvider for SuggestionClient {
    async fn suggest_groups(
        &self,
        profiles: &[PlayerSkillProfile],
        group_size: usize,
    ) -> Result<Vec<Vec<PlayerId>>> {
        info!(
            "Requesting grouping suggestion for {} players (group size {})",
            profiles.len(),
            group_size
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_prompt(profiles, group_size),
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send suggestion request")?;

        if !response.status().is_success() {
            anyhow::bail!("Suggestion API returned status: {}", response.status());
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to decode suggestion response body")?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .context("Suggestion response contained no choices")?;

        Self::parse_groups(content)
    }
}
