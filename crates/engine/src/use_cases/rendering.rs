//! Markdown rendering of a [`SpecDocument`].
//!
//! Output is deterministic and follows a fixed section order. A section whose
//! field is absent or empty is left out entirely, so the empty document
//! renders as just the fallback title.

use specforge_domain::{AssetGroup, FieldValue, GameMode, LabeledValues, Mechanic, SpecDocument};

/// Heading used when the document has no title.
pub const FALLBACK_TITLE: &str = "Generated Web Game";

pub fn render_markdown(doc: &SpecDocument) -> String {
    render_markdown_titled(doc, FALLBACK_TITLE)
}

/// Like [`render_markdown`], with `fallback_title` as the heading of an untitled document.
pub fn render_markdown_titled(doc: &SpecDocument, fallback_title: &str) -> String {
    let mut out = format!("# {}\n", doc.display_title().unwrap_or(fallback_title));

    push_paragraph(&mut out, "Description", &doc.description);
    push_paragraph(&mut out, "Core Concept", &doc.core_concept);
    push_paragraph(&mut out, "How to Play", &doc.how_to_play);
    push_section(&mut out, "Game Details", game_details(doc));
    push_section(
        &mut out,
        "Game Modes",
        subsections(doc.game_modes.iter().enumerate().map(|(i, m)| game_mode(i, m))),
    );
    push_section(
        &mut out,
        "Detailed Mechanics",
        subsections(
            doc.detailed_mechanics
                .iter()
                .enumerate()
                .map(|(i, m)| mechanic(i, m)),
        ),
    );
    push_section(&mut out, "Objectives", objectives(doc));
    push_section(&mut out, "Visual Style", labeled(&doc.visual_style));
    push_section(
        &mut out,
        "Technical Requirements",
        labeled(&doc.technical_requirements),
    );
    push_section(&mut out, "Game Flow", labeled(&doc.game_flow));
    push_section(&mut out, "Unique Features", bullets(&doc.unique_features));
    push_paragraph(
        &mut out,
        "Difficulty Progression",
        &doc.difficulty_progression,
    );
    push_section(
        &mut out,
        "Required Assets",
        subsections(doc.assets.iter().map(asset_group)),
    );

    out
}

/// `snake_case` identifier to `Title Case` label, e.g. `vs_ai` to `Vs Ai`.
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

// =============================================================================
// Sections
// =============================================================================

fn push_section(out: &mut String, heading: &str, body: Option<String>) {
    if let Some(body) = body {
        out.push_str(&format!("\n## {heading}\n\n{body}\n"));
    }
}

fn push_paragraph(out: &mut String, heading: &str, text: &str) {
    push_section(out, heading, non_empty(text).map(str::to_string));
}

fn game_details(doc: &SpecDocument) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(genre) = non_empty(&doc.genre) {
        lines.push(format!("- **Genre**: {genre}"));
    }
    if !doc.platform.is_empty() {
        lines.push(format!("- **Platform**: {}", doc.platform.join(", ")));
    }
    if !lines.is_empty() || !doc.controls.is_empty() || doc.duration.is_some() {
        lines.push(format!("- **Duration**: {} seconds", doc.duration_sec()));
    }
    if !doc.controls.is_empty() {
        lines.push(format!("- **Controls**: {}", doc.controls.join(", ")));
    }
    join_lines(lines)
}

fn game_mode(index: usize, mode: &GameMode) -> Option<String> {
    let details = [
        ("AI Behavior", &mode.ai_behavior),
        ("Networking", &mode.networking),
        ("Gameplay Differences", &mode.gameplay_differences),
        ("Competitive Elements", &mode.competitive_elements),
    ];

    let mut parts = Vec::new();
    if let Some(description) = non_empty(&mode.description) {
        parts.push(description.to_string());
    }
    for (label, value) in details {
        if let Some(value) = value.as_deref().and_then(non_empty) {
            parts.push(format!("**{label}**: {value}"));
        }
    }
    if parts.is_empty() && non_empty(&mode.mode).is_none() {
        return None;
    }

    let heading = match non_empty(&mode.mode) {
        Some(name) => title_case(name),
        None => format!("Mode {}", index + 1),
    };
    Some(subsection(&heading, parts))
}

fn mechanic(index: usize, mechanic: &Mechanic) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(description) = non_empty(&mechanic.description) {
        parts.push(description.to_string());
    }
    if let Some(interaction) = non_empty(&mechanic.player_interaction) {
        parts.push(format!("**Player Interaction**: {interaction}"));
    }
    if parts.is_empty() && non_empty(&mechanic.mechanic_name).is_none() {
        return None;
    }

    let heading = non_empty(&mechanic.mechanic_name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Mechanic {}", index + 1));
    Some(subsection(&heading, parts))
}

fn objectives(doc: &SpecDocument) -> Option<String> {
    let objectives = &doc.objectives;
    let mut lines = Vec::new();
    if let Some(goal) = labeled_text(objectives.primary_goal.as_ref()) {
        lines.push(format!("**Primary Goal**: {goal}"));
    }
    if !objectives.secondary_goals.is_empty() {
        lines.push(format!(
            "**Secondary Goals**: {}",
            objectives.secondary_goals.join(", ")
        ));
    }
    if let Some(progression) = labeled_text(objectives.progression_system.as_ref()) {
        lines.push(format!("**Progression**: {progression}"));
    }
    for (key, value) in &objectives.extra {
        let text = FieldValue::from(value.clone()).display();
        if let Some(text) = non_empty(&text) {
            lines.push(format!("**{}**: {text}", title_case(key)));
        }
    }
    join_lines(lines)
}

fn labeled(values: &LabeledValues) -> Option<String> {
    join_lines(
        values
            .iter()
            .filter_map(|(label, value)| {
                let text = value.display();
                non_empty(&text).map(|text| format!("**{}**: {text}", title_case(label)))
            })
            .collect(),
    )
}

fn bullets(items: &[String]) -> Option<String> {
    join_lines(
        items
            .iter()
            .filter_map(|item| non_empty(item))
            .map(|item| format!("- {item}"))
            .collect(),
    )
}

fn asset_group(group: &AssetGroup) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(description) = non_empty(&group.description) {
        parts.push(description.to_string());
    }
    if let Some(items) = bullets(&group.items) {
        parts.push(items);
    }
    if parts.is_empty() && non_empty(&group.category).is_none() {
        return None;
    }

    let heading = non_empty(&group.category)
        .map(title_case)
        .unwrap_or_else(|| "Assets".to_string());
    Some(subsection(&heading, parts))
}

// =============================================================================
// Helpers
// =============================================================================

fn subsection(heading: &str, parts: Vec<String>) -> String {
    if parts.is_empty() {
        format!("### {heading}")
    } else {
        format!("### {heading}\n\n{}", parts.join("\n\n"))
    }
}

fn subsections(items: impl Iterator<Item = Option<String>>) -> Option<String> {
    let rendered: Vec<String> = items.flatten().collect();
    (!rendered.is_empty()).then(|| rendered.join("\n\n"))
}

/// Display text of an optional value, `None` when it renders blank.
fn labeled_text(value: Option<&FieldValue>) -> Option<String> {
    let text = value?.display();
    non_empty(&text).map(str::to_string)
}

fn join_lines(lines: Vec<String>) -> Option<String> {
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> SpecDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_document_renders_only_fallback_title() {
        assert_eq!(
            render_markdown(&SpecDocument::default()),
            "# Generated Web Game\n"
        );
    }

    #[test]
    fn test_blank_title_uses_fallback() {
        let rendered = render_markdown(&doc(json!({"title": "   "})));
        assert!(rendered.starts_with("# Generated Web Game\n"));
    }

    #[test]
    fn test_game_mode_lists_only_present_keys() {
        let rendered = render_markdown(&doc(json!({
            "title": "X",
            "game_modes": [{"mode": "vs_ai", "description": "d", "ai_behavior": "b"}]
        })));

        assert!(rendered.contains("### Vs Ai"));
        assert!(rendered
            .lines()
            .any(|line| line.contains("AI Behavior") && line.contains('b')));
        assert!(!rendered.contains("Networking"));
        assert!(!rendered.contains("## Description"));
    }

    #[test]
    fn test_mode_details_follow_fixed_order() {
        let rendered = render_markdown(&doc(json!({
            "game_modes": [{
                "mode": "pvp_online",
                "competitive_elements": "ladder",
                "networking": "websockets"
            }]
        })));

        let networking = rendered.find("**Networking**").unwrap();
        let competitive = rendered.find("**Competitive Elements**").unwrap();
        assert!(networking < competitive);
        assert!(rendered.contains("### Pvp Online"));
    }

    #[test]
    fn test_full_document_section_order() {
        let rendered = render_markdown(&doc(json!({
            "title": "Gem Match",
            "assets": [{"category": "sprites", "items": ["gem_red"], "description": "Gem art"}],
            "difficulty_progression": "Faster drops",
            "unique_features": ["Cascades"],
            "game_flow": {"start_sequence": "Countdown"},
            "technical_requirements": {"web_technologies": ["Canvas", "WebSockets"]},
            "visual_style": {"art_direction": "Pastel"},
            "objectives": {"primary_goal": "Clear the board", "secondary_goals": ["Combo", "Speed"]},
            "detailed_mechanics": [{"mechanic_name": "Swap", "description": "Swap two gems"}],
            "game_modes": [{"mode": "vs_ai", "description": "Solo"}],
            "genre": "puzzle",
            "how_to_play": "Drag gems",
            "core_concept": "Match gems",
            "description": "A gem game"
        })));

        let order = [
            "# Gem Match",
            "## Description",
            "## Core Concept",
            "## How to Play",
            "## Game Details",
            "## Game Modes",
            "## Detailed Mechanics",
            "## Objectives",
            "## Visual Style",
            "## Technical Requirements",
            "## Game Flow",
            "## Unique Features",
            "## Difficulty Progression",
            "## Required Assets",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|heading| rendered.find(heading).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        assert!(rendered.contains("**Web Technologies**: Canvas, WebSockets"));
        assert!(rendered.contains("**Secondary Goals**: Combo, Speed"));
        assert!(rendered.contains("### Sprites\n\nGem art\n\n- gem_red"));
        assert!(rendered.contains("- **Duration**: 60 seconds"));
    }

    #[test]
    fn test_game_details_only_for_present_fields() {
        let rendered = render_markdown(&doc(json!({"platform": "web"})));
        assert!(rendered.contains("- **Platform**: web"));
        assert!(!rendered.contains("**Genre**"));
        assert!(!rendered.contains("**Controls**"));

        let duration_only = render_markdown(&doc(json!({"duration_sec": 120})));
        assert!(duration_only.contains("- **Duration**: 120 seconds"));
    }

    #[test]
    fn test_scalar_label_values_render_as_is() {
        let rendered = render_markdown(&doc(json!({
            "technical_requirements": {"max_players": 2, "offline": false, "notes": ""}
        })));

        assert!(rendered.contains("**Max Players**: 2"));
        assert!(rendered.contains("**Offline**: false"));
        assert!(!rendered.contains("**Notes**"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let document = doc(json!({
            "title": "T",
            "visual_style": {"b_key": "1", "a_key": "2"}
        }));
        let first = render_markdown(&document);
        assert_eq!(first, render_markdown(&document));
        assert!(first.find("B Key").unwrap() < first.find("A Key").unwrap());
    }

    #[test]
    fn test_list_objectives_are_comma_joined() {
        let rendered = render_markdown(&doc(json!({
            "title": "X",
            "objectives": {
                "primary_goal": ["Win", "Survive"],
                "progression_system": ["XP", "Levels"]
            }
        })));

        assert!(rendered.contains("**Primary Goal**: Win, Survive"));
        assert!(rendered.contains("**Progression**: XP, Levels"));
    }

    #[test]
    fn test_untitled_document_takes_given_heading() {
        let rendered = render_markdown_titled(&doc(json!({"genre": "racing"})), "Turbo Lanes");
        assert!(rendered.starts_with("# Turbo Lanes\n"));

        let titled = render_markdown_titled(&doc(json!({"title": "Orbit"})), "Turbo Lanes");
        assert!(titled.starts_with("# Orbit\n"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("vs_ai"), "Vs Ai");
        assert_eq!(title_case("art_direction"), "Art Direction");
        assert_eq!(title_case("3d_MODE"), "3D Mode");
        assert_eq!(title_case(""), "");
    }
}
