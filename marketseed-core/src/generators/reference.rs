//! Fixed reference data: job categories and the skills under them.

use tracing::warn;

use crate::models::{NewCategory, NewSkill};

pub const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "Web Development",
        "Sites, web apps and APIs",
        &["JavaScript", "TypeScript", "React", "Node.js", "PHP", "Django"],
    ),
    (
        "Mobile Development",
        "Native and cross-platform apps",
        &["Swift", "Kotlin", "Flutter", "React Native"],
    ),
    (
        "Data Science",
        "Analytics, machine learning and reporting",
        &["Python", "SQL", "Machine Learning", "Data Visualization", "R"],
    ),
    (
        "DevOps",
        "Infrastructure, CI/CD and operations",
        &["Docker", "Kubernetes", "AWS", "Terraform", "Linux"],
    ),
    (
        "Design",
        "UI, UX and brand work",
        &["Figma", "UI Design", "UX Research", "Illustration", "Logo Design"],
    ),
    (
        "Writing",
        "Content, copy and documentation",
        &["Copywriting", "Technical Writing", "SEO Writing", "Editing"],
    ),
    (
        "Marketing",
        "Growth, ads and social media",
        &["SEO", "Google Ads", "Social Media", "Email Marketing"],
    ),
    (
        "Systems Programming",
        "Low-level and performance-critical software",
        &["Rust", "C++", "Go", "Embedded C"],
    ),
];

pub fn categories() -> Vec<NewCategory> {
    CATEGORIES
        .iter()
        .map(|(name, description, _)| NewCategory {
            name: (*name).to_string(),
            slug: slugify(name),
            description: (*description).to_string(),
        })
        .collect()
}

/// Skills for each category, using the ids returned for `categories()` in
/// the same order.
pub fn skills(category_ids: &[i64]) -> Vec<NewSkill> {
    if category_ids.is_empty() {
        warn!("no categories found, skipping skills");
        return Vec::new();
    }

    CATEGORIES
        .iter()
        .zip(category_ids)
        .flat_map(|((_, _, skills), category_id)| {
            skills.iter().map(move |name| NewSkill {
                name: (*name).to_string(),
                category_id: *category_id,
            })
        })
        .collect()
}

fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
