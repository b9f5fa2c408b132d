//! Built-in habit bundles.

use serde::Serialize;

use crate::model::{Difficulty, HabitDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub habits: [&'static str; 4],
}

pub const TEMPLATES: &[HabitTemplate] = &[
    HabitTemplate {
        id: "morning-routine",
        title: "Morning Routine",
        description: "Start your day with healthy habits",
        category: "health",
        habits: ["Drink water", "Exercise", "Meditate", "Plan day"],
    },
    HabitTemplate {
        id: "fitness-journey",
        title: "Fitness Journey",
        description: "Build a strong, healthy body",
        category: "fitness",
        habits: ["Morning run", "Strength training", "Yoga", "Track calories"],
    },
    HabitTemplate {
        id: "learning-path",
        title: "Learning Path",
        description: "Continuous skill development",
        category: "learning",
        habits: ["Read 30 minutes", "Practice coding", "Watch tutorials", "Take notes"],
    },
    HabitTemplate {
        id: "mindfulness",
        title: "Mindfulness Journey",
        description: "Mental health and well-being",
        category: "mindfulness",
        habits: ["Meditate", "Gratitude journal", "Deep breathing", "Digital detox"],
    },
    HabitTemplate {
        id: "productivity",
        title: "Productivity Master",
        description: "Get things done efficiently",
        category: "productivity",
        habits: ["Time blocking", "Inbox zero", "Daily review", "Single tasking"],
    },
    HabitTemplate {
        id: "creativity",
        title: "Creative Flow",
        description: "Unlock your creative potential",
        category: "creativity",
        habits: ["Daily sketching", "Writing practice", "Music practice", "Photo walk"],
    },
];

pub fn find_template(id: &str) -> Option<&'static HabitTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

impl HabitTemplate {
    /// Drafts for every habit in the bundle: medium difficulty, daily.
    pub fn drafts(&self) -> Vec<HabitDraft> {
        self.habits
            .iter()
            .map(|name| HabitDraft {
                category: self.category.to_string(),
                difficulty: Difficulty::Medium,
                description: format!("Part of {} template", self.title),
                ..HabitDraft::named(*name)
            })
            .collect()
    }
}
