use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::warn;

use super::{past_instant, pick};
use crate::models::{NewNotification, ProjectRef, ProjectStatus};
use crate::payload::{NotificationPayload, Severity};

const SYSTEM_NOTICES: &[(&str, &str)] = &[
    (
        "Scheduled maintenance",
        "The platform will be briefly unavailable on Sunday at 02:00 UTC.",
    ),
    (
        "Complete your profile",
        "Profiles with a photo and portfolio get three times more invitations.",
    ),
    (
        "New payment methods",
        "You can now withdraw earnings to additional bank accounts.",
    ),
];

/// Notifications only look back a month.
const NOTIFICATION_DAYS: i64 = 30;

/// `count` notifications for active users.
///
/// Kinds that need a job or project are only drawn when those exist; a
/// project notification always goes to one of its participants.
pub fn notifications<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    user_ids: &[i64],
    open_job_ids: &[i64],
    projects: &[ProjectRef],
    now: DateTime<Utc>,
) -> Vec<NewNotification> {
    if user_ids.is_empty() {
        warn!("no active users found, skipping notifications");
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let (user_id, title, body, payload) = match rng.gen_range(0..6) {
                0 if !open_job_ids.is_empty() => {
                    let job_id = open_job_ids[rng.gen_range(0..open_job_ids.len())];
                    (
                        pick_user(rng, user_ids),
                        "New application received".to_string(),
                        format!("A freelancer applied to job #{job_id}."),
                        NotificationPayload::NewApplication { job_id },
                    )
                }
                1 if !open_job_ids.is_empty() => {
                    let job_id = open_job_ids[rng.gen_range(0..open_job_ids.len())];
                    let accepted = rng.gen_bool(0.3);
                    (
                        pick_user(rng, user_ids),
                        "Application update".to_string(),
                        if accepted {
                            format!("Your application for job #{job_id} was accepted.")
                        } else {
                            format!("Your application for job #{job_id} was not selected.")
                        },
                        NotificationPayload::ApplicationStatus { job_id, accepted },
                    )
                }
                2 if !projects.is_empty() => {
                    let project = pick_project(rng, projects);
                    let (recipient, sender_id) = participants(rng, project);
                    (
                        recipient,
                        "New message".to_string(),
                        "You have a new message on one of your projects.".to_string(),
                        NotificationPayload::MessageReceived {
                            sender_id,
                            project_id: Some(project.id),
                        },
                    )
                }
                3 if !projects.is_empty() => {
                    let project = pick_project(rng, projects);
                    let days_left = rng.gen_range(1..=7);
                    (
                        project.freelancer_id,
                        "Milestone due soon".to_string(),
                        format!("A milestone is due in {days_left} days."),
                        NotificationPayload::MilestoneDue {
                            project_id: project.id,
                            days_left,
                        },
                    )
                }
                4 if projects.iter().any(|p| p.status == ProjectStatus::Completed) => {
                    let completed: Vec<&ProjectRef> = projects
                        .iter()
                        .filter(|p| p.status == ProjectStatus::Completed)
                        .collect();
                    let project = completed[rng.gen_range(0..completed.len())];
                    let rating = rng.gen_range(3..=5);
                    (
                        project.freelancer_id,
                        "You received a review".to_string(),
                        format!("A client left you a {rating}-star review."),
                        NotificationPayload::ReviewReceived {
                            project_id: project.id,
                            rating,
                        },
                    )
                }
                _ => system_notice(rng, user_ids),
            };

            NewNotification {
                user_id,
                title,
                body,
                payload,
                is_read: rng.gen_bool(0.4),
                created_at: past_instant(rng, now, NOTIFICATION_DAYS),
            }
        })
        .collect()
}

fn pick_user<R: Rng + ?Sized>(rng: &mut R, user_ids: &[i64]) -> i64 {
    user_ids[rng.gen_range(0..user_ids.len())]
}

fn pick_project<'a, R: Rng + ?Sized>(rng: &mut R, projects: &'a [ProjectRef]) -> &'a ProjectRef {
    &projects[rng.gen_range(0..projects.len())]
}

/// (recipient, sender) drawn from the project's two parties.
fn participants<R: Rng + ?Sized>(rng: &mut R, project: &ProjectRef) -> (i64, i64) {
    if rng.gen_bool(0.5) {
        (project.client_id, project.freelancer_id)
    } else {
        (project.freelancer_id, project.client_id)
    }
}

fn system_notice<R: Rng + ?Sized>(
    rng: &mut R,
    user_ids: &[i64],
) -> (i64, String, String, NotificationPayload) {
    let index = rng.gen_range(0..SYSTEM_NOTICES.len());
    let (title, body) = SYSTEM_NOTICES[index];
    let severity = if index == 0 {
        Severity::Warning
    } else {
        Severity::Info
    };
    let link = rng
        .gen_bool(0.5)
        .then(|| pick(rng, &["/settings/profile", "/help/payments", "/status"]).to_string());
    (
        pick_user(rng, user_ids),
        title.to_string(),
        body.to_string(),
        NotificationPayload::System { severity, link },
    )
}
