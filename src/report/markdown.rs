use super::{
    ReportFormat, ReportRenderer, ReportRequest, FOOTER, GUIDANCE_HEADING, REPORT_TITLE,
    SNAPSHOT_HEADING, TOP_THEMES_HEADING,
};
use crate::error::Result;
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "report.md";

const DEFAULT_MARKDOWN_TEMPLATE: &str = r#"# {{ title }}

**Date:** {{ date }}
{% if identity %}**Email:** {{ identity }}
{% endif %}
## {{ snapshot_heading }}

{% for row in scores %}- {{ row.theme }}: {{ row.score }}
{% endfor %}
## {{ top_heading }}

{{ top_themes | join(sep=", ") }}

## {{ guidance_heading }}

{% for line in narrative %}{{ line }}
{% endfor %}
---

*{{ footer }}*
"#;

#[derive(Serialize)]
struct ScoreRow<'a> {
    theme: &'a str,
    score: i64,
}

pub struct MarkdownRenderer {
    template_engine: Tera,
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self> {
        let mut template_engine = Tera::default();
        template_engine.autoescape_on(vec![]);
        template_engine.add_raw_template(TEMPLATE_NAME, DEFAULT_MARKDOWN_TEMPLATE)?;
        Ok(Self { template_engine })
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, request: &ReportRequest<'_>) -> Result<Vec<u8>> {
        let scores: Vec<ScoreRow<'_>> = request
            .scores
            .iter()
            .map(|(theme, score)| ScoreRow { theme, score })
            .collect();
        let narrative: Vec<&str> = request.narrative.lines().collect();

        let mut context = Context::new();
        context.insert("title", REPORT_TITLE);
        context.insert("date", &request.display_date());
        context.insert("identity", request.identity);
        context.insert("snapshot_heading", SNAPSHOT_HEADING);
        context.insert("scores", &scores);
        context.insert("top_heading", TOP_THEMES_HEADING);
        context.insert("top_themes", request.top_themes);
        context.insert("guidance_heading", GUIDANCE_HEADING);
        context.insert("narrative", &narrative);
        context.insert("footer", FOOTER);

        let markdown = self.template_engine.render(TEMPLATE_NAME, &context)?;
        Ok(markdown.into_bytes())
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}
