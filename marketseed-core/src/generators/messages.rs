use chrono::{DateTime, NaiveTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::{instant_between, past_instant, pick, HISTORY_DAYS};
use crate::models::{NewMessage, ProjectRef};

const PROJECT_TEMPLATES: &[&str] = &[
    "Hi! I've pushed the latest changes, could you take a look?",
    "Thanks for the update. Can we schedule a quick call tomorrow?",
    "The first milestone is ready for review.",
    "I have a question about the requirements for the next phase.",
    "Payment for the milestone has been released, thank you!",
    "Could you share access to the staging environment?",
    "I've attached the revised designs based on your feedback.",
    "Everything looks good on my end. Great work so far.",
    "I'll need two more days to finish testing, is that okay?",
    "Please confirm the final scope before I start on this part.",
];

const DIRECT_TEMPLATES: &[&str] = &[
    "Hello, I saw your profile and wanted to reach out.",
    "Are you available for a new project next month?",
    "Thanks for connecting! Let me know if you have any questions.",
    "Would you be interested in a long-term collaboration?",
    "I came across your job post and think I can help.",
];

/// Share of messages that belong to a project conversation when projects exist.
const PROJECT_SHARE: f64 = 0.8;

/// `count` messages: mostly client/freelancer threads on projects, the rest
/// direct messages between two distinct active users.
pub fn messages<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    projects: &[ProjectRef],
    user_ids: &[i64],
    now: DateTime<Utc>,
) -> Vec<NewMessage> {
    let can_direct = user_ids.len() >= 2;
    if projects.is_empty() && !can_direct {
        warn!("no projects and fewer than two active users, skipping messages");
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let on_project = !projects.is_empty() && (!can_direct || rng.gen_bool(PROJECT_SHARE));
            if on_project {
                project_message(rng, projects, now)
            } else {
                direct_message(rng, user_ids, now)
            }
        })
        .collect()
}

fn project_message<R: Rng + ?Sized>(
    rng: &mut R,
    projects: &[ProjectRef],
    now: DateTime<Utc>,
) -> NewMessage {
    let project = projects[rng.gen_range(0..projects.len())];
    let (sender_id, receiver_id) = if rng.gen_bool(0.5) {
        (project.client_id, project.freelancer_id)
    } else {
        (project.freelancer_id, project.client_id)
    };
    let started =
        DateTime::<Utc>::from_naive_utc_and_offset(project.start_date.and_time(NaiveTime::MIN), Utc);
    let created_at = instant_between(rng, started, now);
    NewMessage {
        sender_id,
        receiver_id,
        project_id: Some(project.id),
        content: pick(rng, PROJECT_TEMPLATES).to_string(),
        is_read: read_flag(rng, created_at, now),
        created_at,
    }
}

fn direct_message<R: Rng + ?Sized>(rng: &mut R, user_ids: &[i64], now: DateTime<Utc>) -> NewMessage {
    let pair: Vec<i64> = user_ids.choose_multiple(rng, 2).copied().collect();
    let created_at = past_instant(rng, now, HISTORY_DAYS);
    NewMessage {
        sender_id: pair[0],
        receiver_id: pair[1],
        project_id: None,
        content: pick(rng, DIRECT_TEMPLATES).to_string(),
        is_read: read_flag(rng, created_at, now),
        created_at,
    }
}

/// Anything older than a week has been read.
fn read_flag<R: Rng + ?Sized>(rng: &mut R, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - created_at).num_days() > 7 || rng.gen_bool(0.5)
}
