//! # Habit Facts
//!
//! Short facts served from the facts menu, one pool per stock category.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0
//! - **Toggleable**: true

use rand::seq::IndexedRandom;

use crate::core::types::Category;

const FALLBACK_FACT: &str = "No facts for this category yet.";

const WATER_FACTS: [&str; 3] = [
    "Drinking water helps maintain your body's fluid balance.",
    "Water improves brain function and concentration.",
    "Drinking water helps keep energy up and fatigue down.",
];

const EXERCISE_FACTS: [&str; 3] = [
    "Physical activity strengthens the cardiovascular system.",
    "Regular workouts improve mood and reduce stress.",
    "Exercise helps maintain a healthy weight.",
];

const SLEEP_FACTS: [&str; 3] = [
    "Quality sleep improves memory and concentration.",
    "Sleep helps the body recover and supports the immune system.",
    "Getting enough sleep lowers the risk of chronic disease.",
];

const READ_FACTS: [&str; 3] = [
    "Reading develops thinking and improves concentration.",
    "Regular reading grows vocabulary and writing skills.",
    "Reading helps reduce stress and can improve sleep.",
];

fn pool(category: Category) -> Option<&'static [&'static str]> {
    match category {
        Category::Water => Some(&WATER_FACTS),
        Category::Exercise => Some(&EXERCISE_FACTS),
        Category::Sleep => Some(&SLEEP_FACTS),
        Category::Read => Some(&READ_FACTS),
        Category::Custom => None,
    }
}

/// Uniform-random fact for the category, with a fallback line for
/// categories that have no pool
pub fn random_fact(category: Category) -> &'static str {
    pool(category)
        .and_then(|facts| facts.choose(&mut rand::rng()))
        .copied()
        .unwrap_or(FALLBACK_FACT)
}
