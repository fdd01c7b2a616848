use chrono::{DateTime, NaiveTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::{instant_between, pick};
use crate::models::{NewReview, ProjectRef, ProjectStatus};

/// Relative weights for ratings 1 through 5.
const RATING_WEIGHTS: [u32; 5] = [1, 2, 5, 14, 22];

const POSITIVE: &[&str] = &[
    "Excellent work, delivered ahead of schedule.",
    "Great communication throughout the project.",
    "Would definitely hire again.",
    "Very professional and easy to work with.",
];

const MIXED: &[&str] = &[
    "Good result, but a few deadlines slipped.",
    "Solid work overall, communication could improve.",
    "Requirements were met after some back and forth.",
];

const NEGATIVE: &[&str] = &[
    "The project did not meet expectations.",
    "Communication was difficult and deliverables were late.",
];

/// `min(2 * completed projects, cap)`: one review per party per project.
pub fn review_target(completed_projects: usize, cap: usize) -> usize {
    completed_projects.saturating_mul(2).min(cap)
}

/// Reviews for completed projects, both directions, capped at `cap`.
pub fn reviews<R: Rng + ?Sized>(
    rng: &mut R,
    projects: &[ProjectRef],
    cap: usize,
    now: DateTime<Utc>,
) -> Vec<NewReview> {
    let completed: Vec<&ProjectRef> = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .collect();
    if completed.is_empty() {
        warn!("no completed projects, skipping reviews");
        return Vec::new();
    }

    let mut pairs: Vec<(&ProjectRef, i64, i64)> = completed
        .iter()
        .flat_map(|p| {
            [
                (*p, p.client_id, p.freelancer_id),
                (*p, p.freelancer_id, p.client_id),
            ]
        })
        .collect();
    pairs.shuffle(rng);
    pairs.truncate(review_target(completed.len(), cap));

    pairs
        .into_iter()
        .map(|(project, reviewer_id, reviewee_id)| {
            let rating = weighted_rating(rng);
            let comment = match rating {
                4..=5 => pick(rng, POSITIVE),
                3 => pick(rng, MIXED),
                _ => pick(rng, NEGATIVE),
            };
            let started = DateTime::<Utc>::from_naive_utc_and_offset(
                project.start_date.and_time(NaiveTime::MIN),
                Utc,
            );
            NewReview {
                project_id: project.id,
                reviewer_id,
                reviewee_id,
                rating,
                comment: comment.to_string(),
                created_at: instant_between(rng, started, now),
            }
        })
        .collect()
}

fn weighted_rating<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    let total: u32 = RATING_WEIGHTS.iter().sum();
    let mut roll = rng.gen_range(0..total);
    for (index, weight) in RATING_WEIGHTS.iter().enumerate() {
        if roll < *weight {
            return index as i32 + 1;
        }
        roll -= weight;
    }
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn completed(id: i64) -> ProjectRef {
        ProjectRef {
            id,
            client_id: 1000 + id,
            freelancer_id: 2000 + id,
            agreed_amount: 800.0,
            status: ProjectStatus::Completed,
            start_date: Utc::now().date_naive(),
        }
    }

    #[test]
    fn target_is_capped() {
        assert_eq!(review_target(10, 500), 20);
        assert_eq!(review_target(400, 500), 500);
        assert_eq!(review_target(0, 500), 0);
    }

    #[test]
    fn two_reviews_per_project_below_cap() {
        let mut rng = StdRng::seed_from_u64(41);
        let projects: Vec<_> = (1..=10).map(completed).collect();
        let rows = reviews(&mut rng, &projects, 500, Utc::now());

        assert_eq!(rows.len(), 20);
        let unique: HashSet<_> = rows.iter().map(|r| (r.project_id, r.reviewer_id)).collect();
        assert_eq!(unique.len(), 20);
        for r in &rows {
            assert!((1..=5).contains(&r.rating));
            assert_ne!(r.reviewer_id, r.reviewee_id);
        }
    }

    #[test]
    fn cap_limits_output() {
        let mut rng = StdRng::seed_from_u64(42);
        let projects: Vec<_> = (1..=300).map(completed).collect();
        assert_eq!(reviews(&mut rng, &projects, 500, Utc::now()).len(), 500);
    }

    #[test]
    fn active_projects_are_not_reviewed() {
        let mut rng = StdRng::seed_from_u64(43);
        let mut active = completed(1);
        active.status = ProjectStatus::Active;
        assert!(reviews(&mut rng, &[active], 500, Utc::now()).is_empty());
    }
}
