//! Scene generation seam. The game server asks a [`SceneGenerator`] for the
//! opening scene of a session and for the scene reached by each choice.
//! Language-model backends plug in here; [`ScriptedGenerator`] is the
//! deterministic built-in used by default and in tests.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Character, Choice, NodeKind, StoryNode};

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub content: String,
    pub location: Option<String>,
    pub scene_description: Option<String>,
    pub choices: Vec<Choice>,
    pub kind: NodeKind,
}

impl Scene {
    /// Materialize the scene as a node of `session_id`, child of `parent`.
    pub fn into_node(self, session_id: Uuid, parent: Option<&StoryNode>) -> StoryNode {
        StoryNode {
            id: Uuid::new_v4(),
            session_id,
            content: self.content,
            location: self.location,
            scene_description: self.scene_description,
            choices: self.choices,
            kind: self.kind,
            selected_choice_id: None,
            selected_choice_text: None,
            parent_node_id: parent.map(|p| p.id),
            depth: parent.map(|p| p.depth + 1).unwrap_or(0),
            created_at: Utc::now(),
        }
    }
}

pub trait SceneGenerator: Send + Sync {
    fn opening_scene(&self, character: &Character) -> Scene;

    fn next_scene(&self, from: &StoryNode, choice: &Choice, character: &Character) -> Scene;
}

/// Fixed-shape story: a combat every `combat_every` steps and an ending once
/// `ending_depth` is reached.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    pub combat_every: i32,
    pub ending_depth: i32,
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        ScriptedGenerator {
            combat_every: 4,
            ending_depth: 12,
        }
    }
}

const LOCATIONS: [&str; 4] = ["Crossroads", "Whispering Forest", "River Ford", "Ruined Keep"];

impl ScriptedGenerator {
    fn location_for(depth: i32) -> String {
        LOCATIONS[depth.rem_euclid(LOCATIONS.len() as i32) as usize].to_string()
    }

    fn exploration_choices() -> Vec<Choice> {
        vec![
            Choice::new("Follow the forest road"),
            Choice::new("Wade across the river"),
            Choice::new("Force open the old gate").requiring("strength", 12),
        ]
    }
}

impl SceneGenerator for ScriptedGenerator {
    fn opening_scene(&self, character: &Character) -> Scene {
        Scene {
            content: format!(
                "{} wakes at the crossroads with nothing but a worn map.",
                character.name
            ),
            location: Some(Self::location_for(0)),
            scene_description: Some("Three roads part under a grey sky.".to_string()),
            choices: Self::exploration_choices(),
            kind: NodeKind::Narrative,
        }
    }

    fn next_scene(&self, from: &StoryNode, choice: &Choice, character: &Character) -> Scene {
        let depth = from.depth + 1;
        let location = Self::location_for(depth);

        if depth >= self.ending_depth {
            return Scene {
                content: format!(
                    "{} chose to {} and the journey comes to rest at the {}.",
                    character.name,
                    choice.text.to_lowercase(),
                    location
                ),
                location: Some(location),
                scene_description: None,
                choices: Vec::new(),
                kind: NodeKind::Ending {
                    outcome: "journey_complete".to_string(),
                },
            };
        }

        if self.combat_every > 0 && depth % self.combat_every == 0 {
            return Scene {
                content: format!(
                    "A bandit leaps out as {} reaches the {}.",
                    character.name, location
                ),
                location: Some(location),
                scene_description: Some("Steel glints between the trees.".to_string()),
                choices: vec![
                    Choice::new("Draw your blade"),
                    Choice::new("Try to talk your way out").requiring("charisma", 10),
                    Choice::new("Flee"),
                ],
                kind: NodeKind::Combat {
                    enemy: "bandit".to_string(),
                    enemy_health: 6 + depth,
                },
            };
        }

        Scene {
            content: format!(
                "{} chose to {}. The path leads on to the {}.",
                character.name,
                choice.text.to_lowercase(),
                location
            ),
            location: Some(location),
            scene_description: None,
            choices: Self::exploration_choices(),
            kind: NodeKind::Narrative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn hero() -> Character {
        Character {
            name: "Ayla".to_string(),
            character_class: None,
            attributes: HashMap::new(),
        }
    }

    fn node_at(depth: i32) -> StoryNode {
        StoryNode {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            content: String::new(),
            location: None,
            scene_description: None,
            choices: vec![],
            kind: NodeKind::Narrative,
            selected_choice_id: None,
            selected_choice_text: None,
            parent_node_id: None,
            depth,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_opening_scene_offers_choices() {
        let scene = ScriptedGenerator::default().opening_scene(&hero());

        assert_eq!(scene.kind, NodeKind::Narrative);
        assert_eq!(scene.choices.len(), 3);
        assert!(scene.content.starts_with("Ayla"));
    }

    #[test]
    fn test_combat_and_ending_cadence() {
        let generator = ScriptedGenerator {
            combat_every: 2,
            ending_depth: 3,
        };
        let choice = Choice::new("Press on");

        let combat = generator.next_scene(&node_at(1), &choice, &hero());
        assert!(matches!(combat.kind, NodeKind::Combat { .. }));

        let ending = generator.next_scene(&node_at(2), &choice, &hero());
        assert!(matches!(ending.kind, NodeKind::Ending { .. }));
        assert!(ending.choices.is_empty());
    }

    #[test]
    fn test_scene_into_node_links_parent() {
        let generator = ScriptedGenerator::default();
        let session_id = Uuid::new_v4();
        let root = generator.opening_scene(&hero()).into_node(session_id, None);

        assert!(root.is_root());
        assert_eq!(root.depth, 0);

        let choice = root.choices[0].clone();
        let child = generator
            .next_scene(&root, &choice, &hero())
            .into_node(session_id, Some(&root));

        assert_eq!(child.parent_node_id, Some(root.id));
        assert_eq!(child.depth, 1);
        assert_eq!(child.session_id, session_id);
    }
}
