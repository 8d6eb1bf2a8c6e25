//! Prompt construction for spec and code generation.
//!
//! Pure text assembly. The only I/O is reading the spec template through
//! [`SpecTemplateSource`]; a failed read falls back to the built-in template.

use std::sync::Arc;

use serde_json::Value;
use specforge_domain::{JsonObject, SpecDocument};

use crate::infrastructure::ports::SpecTemplateSource;
use crate::prompt_templates::{PromptTemplates, BLOCKCHAIN_CHAIN};
use crate::use_cases::rendering::render_markdown;

/// Characters of the brief used as the game name when it has no period.
const GAME_NAME_CHARS: usize = 50;

/// Upper bound on each markdown excerpt embedded in the code prompt.
pub const EXCERPT_CAP: usize = 300;

/// Mechanics listed in the code prompt.
const MAX_MECHANICS: usize = 3;

const DEFAULT_CODE_TITLE: &str = "Game";
const DEFAULT_CODE_GENRE: &str = "arcade";
const DEFAULT_CODE_CONTROL: &str = "arrow_keys";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPrompt {
    pub system: String,
    pub user: String,
    /// Name derived from the brief, also used as the title fallback.
    pub game_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePrompt {
    pub system: String,
    pub user: String,
}

/// Excerpts of a rendered specification, bucketed by heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecExcerpts {
    pub overview: String,
    pub rules: String,
    pub win_conditions: String,
    pub controls: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Overview,
    Rules,
    WinConditions,
    Controls,
}

impl Bucket {
    /// Bucket opened by a heading line, checked in priority order.
    fn for_heading(lower: &str) -> Option<Self> {
        if lower.contains("overview") {
            Some(Self::Overview)
        } else if ["rules", "legal moves", "gameplay"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some(Self::Rules)
        } else if ["win", "lose", "draw", "victory"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some(Self::WinConditions)
        } else if lower.contains("control") {
            Some(Self::Controls)
        } else {
            None
        }
    }
}

impl SpecExcerpts {
    fn bucket_mut(&mut self, bucket: Bucket) -> &mut String {
        match bucket {
            Bucket::Overview => &mut self.overview,
            Bucket::Rules => &mut self.rules,
            Bucket::WinConditions => &mut self.win_conditions,
            Bucket::Controls => &mut self.controls,
        }
    }
}

/// Builds prompts from briefs and spec documents.
pub struct PromptBuilder {
    templates: Arc<dyn SpecTemplateSource>,
    prompts: PromptTemplates,
}

impl PromptBuilder {
    pub fn new(templates: Arc<dyn SpecTemplateSource>, prompts: PromptTemplates) -> Self {
        Self { templates, prompts }
    }

    pub fn build_spec_prompt(&self, brief: &str, constraints: Option<&JsonObject>) -> SpecPrompt {
        let template = match self.templates.load_spec_template() {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(error = %e, "Spec template unavailable, using built-in template");
                self.prompts.spec_fallback_template.clone()
            }
        };

        let game_name = game_name(brief);
        let mut user = template
            .replace("{GAME_NAME}", &game_name)
            .replace("{BRIEF}", brief)
            .replace("{BLOCKCHAIN_CHAIN}", BLOCKCHAIN_CHAIN);

        if let Some(constraints) = constraints.filter(|c| !c.is_empty()) {
            let pretty = serde_json::to_string_pretty(constraints).unwrap_or_default();
            user.push_str("\n\nAdditional Constraints: ");
            user.push_str(&pretty);
        }

        SpecPrompt {
            system: self.prompts.spec_system_prompt.clone(),
            user,
            game_name,
        }
    }

    pub fn build_code_prompt(&self, spec: &SpecDocument) -> CodePrompt {
        let title = non_empty_or(&spec.title, DEFAULT_CODE_TITLE);
        let genre = non_empty_or(&spec.genre, DEFAULT_CODE_GENRE);

        let mechanics = mechanic_names(spec);
        let mechanics = if mechanics.is_empty() {
            "standard game mechanics".to_string()
        } else {
            mechanics.join(", ")
        };

        let controls = if spec.controls.is_empty() {
            DEFAULT_CODE_CONTROL.to_string()
        } else {
            spec.controls.join(", ")
        };

        let markdown = match spec.extra_str("spec_markdown") {
            Some(markdown) if !markdown.trim().is_empty() => markdown.to_string(),
            _ => render_markdown(spec),
        };
        let excerpts = scan_sections(&markdown);

        let user = format!(
            "Generate a complete HTML5 game: {title}\n\n\
             Game Title: {title}\n\
             Game Type: {genre}\n\
             Core Mechanics: {mechanics}\n\
             Controls: {controls}\n\n\
             Game Overview:\n{overview}\n\n\
             Key Rules:\n{rules}\n\n\
             Win/Lose Conditions:\n{win}\n\n\
             Control Details:\n{control_details}\n\n\
             {contract}",
            overview = excerpts.overview.trim_end(),
            rules = excerpts.rules.trim_end(),
            win = excerpts.win_conditions.trim_end(),
            control_details = excerpts.controls.trim_end(),
            contract = self.prompts.code_output_contract,
        );

        CodePrompt {
            system: self.prompts.code_system_prompt.clone(),
            user,
        }
    }
}

/// Text before the first period (trimmed), or the first 50 characters.
pub fn game_name(brief: &str) -> String {
    match brief.split_once('.') {
        Some((head, _)) => head.trim().to_string(),
        None => brief.chars().take(GAME_NAME_CHARS).collect(),
    }
}

/// Bucket the body lines of a markdown document under the headings the code
/// prompt cares about.
///
/// A heading line (starting with `#`) opens a bucket when it matches one,
/// and closes the open bucket otherwise. Each bucket keeps whole lines only
/// while it stays within [`EXCERPT_CAP`] characters.
pub fn scan_sections(markdown: &str) -> SpecExcerpts {
    let mut excerpts = SpecExcerpts::default();
    let mut current: Option<Bucket> = None;

    for line in markdown.lines() {
        if line.starts_with('#') {
            current = Bucket::for_heading(&line.trim().to_lowercase());
            continue;
        }

        let Some(bucket) = current else { continue };
        if line.trim().is_empty() {
            continue;
        }

        let text = excerpts.bucket_mut(bucket);
        let added = line.chars().count() + 1;
        if text.chars().count() + added <= EXCERPT_CAP {
            text.push_str(line);
            text.push('\n');
        }
    }

    excerpts
}

/// Mechanic names from `mechanics` when present, else `detailed_mechanics`.
fn mechanic_names(spec: &SpecDocument) -> Vec<String> {
    let names: Vec<String> = match spec.extra.get("mechanics") {
        Some(Value::Array(entries)) => entries.iter().filter_map(mechanic_label).collect(),
        _ => spec
            .detailed_mechanics
            .iter()
            .map(|m| m.mechanic_name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
    };
    names.into_iter().take(MAX_MECHANICS).collect()
}

fn mechanic_label(entry: &Value) -> Option<String> {
    let label = match entry {
        Value::String(name) => Some(name.as_str()),
        Value::Object(fields) => ["mechanic_name", "name", "rule"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str)),
        _ => None,
    }?;
    let label = label.trim();
    (!label.is_empty()).then(|| label.to_string())
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}
