//! Configurable LLM prompt templates used by the engine.
//!
//! Every template has a hard-coded default that can be overridden with an
//! environment variable (see [`key_to_env_var`]). The long spec-generation
//! template lives on disk instead; [`defaults::SPEC_FALLBACK_TEMPLATE`] is
//! used when that file cannot be read.

/// Value substituted for `{BLOCKCHAIN_CHAIN}` in the spec template.
pub const BLOCKCHAIN_CHAIN: &str = "Ethereum";

/// All prompt template keys as constants.
pub mod keys {
    /// System prompt for spec generation.
    pub const SPEC_SYSTEM_PROMPT: &str = "spec.system_prompt";
    /// Minimal template used when the spec template file is unavailable.
    pub const SPEC_FALLBACK_TEMPLATE: &str = "spec.fallback_template";
    /// System prompt for code generation.
    pub const CODE_SYSTEM_PROMPT: &str = "code.system_prompt";
    /// JSON-only output contract appended to every code prompt.
    pub const CODE_OUTPUT_CONTRACT: &str = "code.output_contract";
}

/// Default values for all templates.
pub mod defaults {
    pub const SPEC_SYSTEM_PROMPT: &str = "You are a Requirements Author specializing in game specifications. You MUST respond with valid JSON only, following the exact format specified in the prompt.";

    pub const SPEC_FALLBACK_TEMPLATE: &str = r#"Generate a detailed game specification for {GAME_NAME}.

Brief: {BRIEF}

Provide a comprehensive specification including:
- Overview and core mechanics
- Platform requirements (mobile-first)
- Game modes (vs AI and PvP online)
- Controls and UI requirements
- Win/lose conditions
- Technical implementation notes

Respond with a detailed markdown specification."#;

    pub const CODE_SYSTEM_PROMPT: &str = "You are a professional game developer. You MUST respond with valid JSON only. Do not include any explanatory text, markdown formatting, or code blocks. Your response must start with { and end with }.";

    pub const CODE_OUTPUT_CONTRACT: &str = r#"CRITICAL: You MUST respond with ONLY a valid JSON object. Do NOT include any explanatory text, markdown formatting, or code blocks. Start your response directly with { and end with }.

Required JSON format:
{
  "success": true,
  "files": [
    {"path": "index.html", "content": "[COMPLETE HTML CODE]", "file_type": "html"},
    {"path": "style.css", "content": "[COMPLETE CSS CODE]", "file_type": "css"},
    {"path": "game.js", "content": "[COMPLETE JAVASCRIPT CODE]", "file_type": "javascript"}
  ],
  "project_structure": {},
  "build_instructions": "Open index.html in browser"
}

Requirements:
- Vanilla HTML5/CSS3/JavaScript only
- Canvas-based with requestAnimationFrame game loop
- Mobile-responsive with touch controls
- Complete game state management
- Working collision detection and physics
- Sound effects and visual feedback
- Score system and game over/restart
- Implement ALL specified game mechanics
- Clean, readable code with proper error handling

IMPORTANT:
1. Generate complete working code, not placeholders!
2. Your response must be valid JSON that can be parsed directly
3. Do NOT wrap your response in markdown code blocks
4. Do NOT include any text before or after the JSON object"#;
}

/// Convert a template key to its environment variable name.
pub fn key_to_env_var(key: &str) -> String {
    format!("SPECFORGE_PROMPT_{}", key.to_uppercase().replace('.', "_"))
}

/// Get the default value for a template key.
pub fn get_default(key: &str) -> Option<&'static str> {
    match key {
        keys::SPEC_SYSTEM_PROMPT => Some(defaults::SPEC_SYSTEM_PROMPT),
        keys::SPEC_FALLBACK_TEMPLATE => Some(defaults::SPEC_FALLBACK_TEMPLATE),
        keys::CODE_SYSTEM_PROMPT => Some(defaults::CODE_SYSTEM_PROMPT),
        keys::CODE_OUTPUT_CONTRACT => Some(defaults::CODE_OUTPUT_CONTRACT),
        _ => None,
    }
}

/// Resolved prompt texts.
///
/// Resolution priority: Environment Variable > Default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub spec_system_prompt: String,
    pub spec_fallback_template: String,
    pub code_system_prompt: String,
    pub code_output_contract: String,
}

impl PromptTemplates {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |key: &str| {
            lookup(&key_to_env_var(key))
                .filter(|value| !value.trim().is_empty())
                .or_else(|| get_default(key).map(str::to_string))
                .unwrap_or_default()
        };

        Self {
            spec_system_prompt: resolve(keys::SPEC_SYSTEM_PROMPT),
            spec_fallback_template: resolve(keys::SPEC_FALLBACK_TEMPLATE),
            code_system_prompt: resolve(keys::CODE_SYSTEM_PROMPT),
            code_output_contract: resolve(keys::CODE_OUTPUT_CONTRACT),
        }
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
