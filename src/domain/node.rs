use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::character::Character;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_attribute_value: Option<i32>,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Choice {
            id: Uuid::new_v4(),
            text: text.into(),
            required_attribute: None,
            required_attribute_value: None,
        }
    }

    pub fn requiring(mut self, attribute: impl Into<String>, value: i32) -> Self {
        self.required_attribute = Some(attribute.into());
        self.required_attribute_value = Some(value);
        self
    }
}

/// Whether `character` meets the attribute requirement of `choice`.
///
/// Choices without a required value are always available. A character that
/// lacks the named attribute is treated as having a score of zero.
pub fn can_make_choice(choice: &Choice, character: &Character) -> bool {
    let Some(required) = choice.required_attribute_value else {
        return true;
    };

    let score = choice
        .required_attribute
        .as_deref()
        .map(|name| character.attribute(name))
        .unwrap_or(0);

    score >= required
}

/// What kind of scene a node is. Scene-specific data lives on the variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Narrative,
    #[serde(rename_all = "camelCase")]
    Combat { enemy: String, enemy_health: i32 },
    Ending { outcome: String },
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Narrative => "narrative",
            NodeKind::Combat { .. } => "combat",
            NodeKind::Ending { .. } => "ending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    pub id: Uuid,
    pub session_id: Uuid,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_choice_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_choice_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_node_id: Option<Uuid>,
    #[serde(default)]
    pub depth: i32,
    pub created_at: DateTime<Utc>,
}

impl StoryNode {
    pub fn is_combat_scene(&self) -> bool {
        matches!(self.kind, NodeKind::Combat { .. })
    }

    pub fn is_ending(&self) -> bool {
        matches!(self.kind, NodeKind::Ending { .. })
    }

    pub fn is_root(&self) -> bool {
        self.parent_node_id.is_none()
    }

    pub fn find_choice(&self, choice_id: Uuid) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    pub fn select_choice(&mut self, choice: &Choice) {
        self.selected_choice_id = Some(choice.id);
        self.selected_choice_text = Some(choice.text.clone());
    }

    pub fn clear_selection(&mut self) {
        self.selected_choice_id = None;
        self.selected_choice_text = None;
    }
}
