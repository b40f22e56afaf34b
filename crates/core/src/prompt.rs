//! Prompt construction for card generation.
//!
//! The creator profile and content style only change the tone section. The
//! output contract (exact count, distinct cards, fixed JSON shape) is the
//! same for every request so the parser can rely on it.

use serde::Serialize;

/// The slice of a creator profile that shapes the prompt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatorProfile {
    pub display_name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub expertise_areas: Vec<String>,
    pub content_style: String,
}

/// System and user messages sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// JSON shape every provider is asked to return.
pub const OUTPUT_SCHEMA: &str = r#"{
  "cards": [
    {
      "title": "short, specific title",
      "summary": "one paragraph that stands on its own",
      "detailed_content": "longer explanation with examples",
      "tags": ["tag1", "tag2"],
      "difficulty": "beginner | intermediate | advanced",
      "guidance": "one sentence on how to use or study this card"
    }
  ]
}"#;

/// Tone instructions for the known content styles.
pub fn style_instructions(style: &str) -> String {
    match style.trim().to_lowercase().as_str() {
        "educational" => {
            "Use a clear, didactic tone. Define terms before using them and build intuition step by step."
                .to_string()
        }
        "question_first" => {
            "Open every summary with a thought-provoking question, then answer it.".to_string()
        }
        "storytelling" => {
            "Frame each card around a short story, historical moment, or concrete scenario."
                .to_string()
        }
        "casual" | "conversational" => {
            "Write in a friendly, conversational voice, as if talking to a curious friend."
                .to_string()
        }
        "technical" => {
            "Be precise and rigorous. Prefer exact terminology, figures, and mechanisms."
                .to_string()
        }
        "" => style_instructions("educational"),
        other => format!("Adopt a {other} tone throughout."),
    }
}

fn creator_section(creator: &CreatorProfile) -> String {
    let mut lines = vec![format!("You are writing on behalf of {}.", creator.display_name)];
    if !creator.description.trim().is_empty() {
        lines.push(format!("About the creator: {}", creator.description.trim()));
    }
    if !creator.categories.is_empty() {
        lines.push(format!("Their audience follows them for: {}.", creator.categories.join(", ")));
    }
    if !creator.expertise_areas.is_empty() {
        lines.push(format!("Areas of expertise: {}.", creator.expertise_areas.join(", ")));
    }
    if !creator.content_style.trim().is_empty() {
        lines.push(format!(
            "Their usual voice: {}",
            style_instructions(&creator.content_style)
        ));
    }
    lines.join("\n")
}

/// Build the prompt for one generation run.
pub fn build_prompt(
    creator: &CreatorProfile,
    topic: &str,
    style: &str,
    card_count: u32,
    language: &str,
) -> Prompt {
    let system = format!(
        "You create short educational content cards for a mobile learning app.\n\
         {creator}\n\
         Tone for this set: {tone}\n\
         Write all text in the language with code {language}.",
        creator = creator_section(creator),
        tone = style_instructions(style),
    );

    let user = format!(
        "Create exactly {card_count} cards about \"{topic}\".\n\
         \n\
         Rules:\n\
         1. Produce exactly {card_count} cards, no more and no fewer.\n\
         2. Every card must be DISTINCT: do not repeat a fact, example, or explanation \
            that already appears in another card, even with different wording.\n\
         3. Each card covers a different aspect of the topic; order them from foundational to advanced.\n\
         4. Every card needs a non-empty title and a non-empty summary.\n\
         5. Respond with JSON only, no prose before or after, using exactly this structure:\n\
         {schema}",
        schema = OUTPUT_SCHEMA,
    );

    Prompt { system, user }
}
