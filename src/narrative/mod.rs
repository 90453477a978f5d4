//! Narrative composition
//!
//! Produces the guidance text for a report. When a [`TextGenerator`] is
//! configured the composer asks it for a personalized summary; any failure,
//! timeout or empty reply falls back to a fixed template. `compose` never
//! fails.

pub mod client;
pub mod prompt;

pub use client::{GenerationRequest, MockTextGenerator, OpenAiClient, TextGenerator};
pub use prompt::{PromptBuilder, PERSONA, PROMPT_TOP_THEMES};

use crate::config::PersonalizationConfig;
use crate::quiz::Identity;
use crate::scoring::ScoreMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

pub const FALLBACK_INTRO: &str = "Thank you for completing the Reflection Quiz. Below are your top themes and next-step ideas tailored for you.";
pub const FALLBACK_THEME_ACTION: &str =
    "Consider one simple action this week to build momentum in this area.";
pub const FALLBACK_CLOSING: &str = "Tip: Small consistent actions beat big one-off efforts. Be kind to yourself as you experiment.";

/// Where the narrative text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeSource {
    Personalized,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
}

impl Narrative {
    fn fallback(top: &[String]) -> Self {
        Self {
            text: fallback_text(top),
            source: NarrativeSource::Fallback,
        }
    }
}

/// Deterministic guidance: intro, one bullet per top theme, closing tip
pub fn fallback_text(top: &[String]) -> String {
    let mut lines = Vec::with_capacity(top.len() + 2);
    lines.push(FALLBACK_INTRO.to_string());
    for theme in top {
        lines.push(format!("- {theme}: {FALLBACK_THEME_ACTION}"));
    }
    lines.push(FALLBACK_CLOSING.to_string());
    lines.join("\n")
}

pub struct NarrativeComposer {
    generator: Option<Arc<dyn TextGenerator>>,
    prompts: Option<PromptBuilder>,
    timeout: Duration,
}

impl NarrativeComposer {
    /// Composer that always uses the fallback template
    pub fn disabled() -> Self {
        Self {
            generator: None,
            prompts: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        let prompts = match PromptBuilder::new() {
            Ok(prompts) => Some(prompts),
            Err(e) => {
                warn!("Personalization prompt unavailable: {}", e);
                None
            }
        };
        Self {
            generator: Some(generator),
            prompts,
            timeout,
        }
    }

    /// Build from configuration. Personalization is active only when it is
    /// enabled and an API key is present.
    pub fn from_config(settings: &PersonalizationConfig) -> Self {
        if !settings.enabled {
            debug!("Personalization disabled by configuration");
            return Self::disabled();
        }
        let Some(api_key) = settings.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            debug!("No API key configured; using fallback narrative");
            return Self::disabled();
        };
        match OpenAiClient::new(api_key, settings) {
            Ok(client) => {
                info!("Personalized narratives enabled (model {})", settings.model);
                Self::with_generator(Arc::new(client), settings.timeout())
            }
            Err(e) => {
                warn!("Could not create text generation client: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_personalized(&self) -> bool {
        self.generator.is_some() && self.prompts.is_some()
    }

    /// Guidance for `identity`. The identity never reaches the generator;
    /// prompts carry scores and the leading [`PROMPT_TOP_THEMES`] theme
    /// names only. `top` drives the fallback text.
    pub async fn compose(&self, identity: &Identity, scores: &ScoreMap, top: &[String]) -> Narrative {
        trace!("Composing narrative for {}", identity);
        let (Some(generator), Some(prompts)) = (&self.generator, &self.prompts) else {
            return Narrative::fallback(top);
        };

        let prompt = match prompts.build(scores) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Failed to build personalization prompt: {}", e);
                return Narrative::fallback(top);
            }
        };
        let request = GenerationRequest {
            system: PERSONA.to_string(),
            prompt,
        };

        match tokio::time::timeout(self.timeout, generator.generate(&request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Narrative {
                text: text.trim().to_string(),
                source: NarrativeSource::Personalized,
            },
            Ok(Ok(_)) => {
                warn!("Text generator returned empty content; using fallback narrative");
                Narrative::fallback(top)
            }
            Ok(Err(e)) => {
                warn!("Text generation failed: {}; using fallback narrative", e);
                Narrative::fallback(top)
            }
            Err(_) => {
                warn!(
                    "Text generation timed out after {:?}; using fallback narrative",
                    self.timeout
                );
                Narrative::fallback(top)
            }
        }
    }
}
