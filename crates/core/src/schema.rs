//! Self-description of the content model for admin tooling.
//!
//! Lists every field of the three entities and whether it lives in a typed
//! column or in a JSON document, plus the closed vocabularies the write
//! paths enforce.

use serde::Serialize;

use crate::content::{SUPPORTED_PLATFORMS, VALID_DIFFICULTY_LEVELS, VALID_SET_STATUSES};
use crate::generation::{MAX_CARD_COUNT, MIN_CARD_COUNT};
use crate::numbering::{CARD_PREFIX, NUMBER_WIDTH, SET_PREFIX};

/// Where a field is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Storage {
    /// Typed, indexable column.
    Column,
    /// Flexible JSON document.
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub required: bool,
    pub nullable: bool,
    pub storage: Storage,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySchema {
    pub name: &'static str,
    /// Prefix of the human-readable sequence number, if the entity has one.
    pub number_prefix: Option<char>,
    pub fields: Vec<FieldDescriptor>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Vocabularies {
    pub set_statuses: &'static [&'static str],
    pub difficulty_levels: &'static [&'static str],
    pub platforms: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationLimits {
    pub min_card_count: u32,
    pub max_card_count: u32,
}

/// Body of `GET /schema`.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSchema {
    pub system_version: String,
    pub number_width: usize,
    pub creators: EntitySchema,
    pub sets: EntitySchema,
    pub cards: EntitySchema,
    pub vocabularies: Vocabularies,
    pub generation: GenerationLimits,
}

fn column(name: &'static str, field_type: &'static str, required: bool) -> FieldDescriptor {
    FieldDescriptor {
        name,
        field_type,
        required,
        nullable: false,
        storage: Storage::Column,
    }
}

fn nullable(name: &'static str, field_type: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        nullable: true,
        ..column(name, field_type, false)
    }
}

fn json(name: &'static str, field_type: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        field_type,
        required: false,
        nullable: false,
        storage: Storage::Json,
    }
}

fn timestamps() -> [FieldDescriptor; 2] {
    [
        column("created_at", "date-time", false),
        column("updated_at", "date-time", false),
    ]
}

fn creator_schema() -> EntitySchema {
    let mut fields = vec![
        column("id", "integer", false),
        column("display_name", "string", true),
        column("description", "string", false),
        json("platforms", "array"),
        column("categories", "array", false),
        column("content_style", "string", false),
        column("expertise_areas", "array", false),
        nullable("avatar_url", "string"),
        nullable("banner_url", "string"),
        column("follower_count", "integer", false),
        column("verified", "boolean", false),
    ];
    fields.extend(timestamps());
    EntitySchema {
        name: "creator",
        number_prefix: None,
        fields,
    }
}

fn set_schema() -> EntitySchema {
    let mut fields = vec![
        column("id", "integer", false),
        column("set_number", "string", false),
        column("creator_id", "integer", true),
        column("title", "string", true),
        column("description", "string", false),
        column("category", "string", false),
        column("difficulty_level", "string", false),
        column("target_audience", "string", false),
        column("content_style", "string", false),
        column("card_count", "integer", false),
        column("estimated_time_minutes", "integer", false),
        json("tags", "array"),
        json("prerequisites", "array"),
        json("learning_outcomes", "array"),
        column("status", "string", false),
        column("language", "string", false),
    ];
    fields.extend(timestamps());
    EntitySchema {
        name: "content_set",
        number_prefix: Some(SET_PREFIX),
        fields,
    }
}

fn card_schema() -> EntitySchema {
    let mut fields = vec![
        column("id", "integer", false),
        column("card_number", "string", false),
        column("set_id", "integer", true),
        column("creator_id", "integer", false),
        column("title", "string", true),
        column("summary", "string", true),
        nullable("detailed_content", "string"),
        column("order_index", "integer", false),
        json("domain_data", "object"),
        json("media", "array"),
        json("tags", "array"),
    ];
    fields.extend(timestamps());
    EntitySchema {
        name: "content_card",
        number_prefix: Some(CARD_PREFIX),
        fields,
    }
}

/// Describe the content model served by this build.
pub fn system_schema(version: &str) -> SystemSchema {
    SystemSchema {
        system_version: version.to_string(),
        number_width: NUMBER_WIDTH,
        creators: creator_schema(),
        sets: set_schema(),
        cards: card_schema(),
        vocabularies: Vocabularies {
            set_statuses: VALID_SET_STATUSES,
            difficulty_levels: VALID_DIFFICULTY_LEVELS,
            platforms: SUPPORTED_PLATFORMS,
        },
        generation: GenerationLimits {
            min_card_count: MIN_CARD_COUNT,
            max_card_count: MAX_CARD_COUNT,
        },
    }
}
