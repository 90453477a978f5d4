//! Personalization prompt built from a tera template

use crate::error::Result;
use crate::scoring::ScoreMap;
use tera::{Context, Tera};

/// Persona sent alongside every personalization prompt
pub const PERSONA: &str = "You are a warm, practical life coach. Be concise and supportive.";

/// Number of leading themes named in the prompt, independent of the
/// report's ranking length
pub const PROMPT_TOP_THEMES: usize = 3;

const TEMPLATE_NAME: &str = "personalization.txt";

const PERSONALIZATION_TEMPLATE: &str = "Create a friendly, empowering summary (140-200 words) for a user with these theme scores: {{ scores }}.
Top 3 themes: {{ top | join(sep=\", \") }}.
Voice: empathetic, practical, and encouraging; avoid medical claims.
Give 3 short bullet-point actions for the next 7 days, tailored to the themes.
Do not mention scores. Address the reader as 'you'.";

pub struct PromptBuilder {
    tera: Tera,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, PERSONALIZATION_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn build(&self, scores: &ScoreMap) -> Result<String> {
        let mut context = Context::new();
        context.insert("scores", &scores.summary_line());
        context.insert("top", &scores.top(PROMPT_TOP_THEMES));
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}
