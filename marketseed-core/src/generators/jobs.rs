//! Jobs and everything hanging off them: skills, applications, projects and
//! milestones. All of these are inserted in one transaction, each step using
//! ids returned by the step before.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::{instant_between, past_instant, pick, HISTORY_DAYS};
use crate::models::{
    ApplicationRef, ApplicationStatus, ExperienceLevel, JobRef, JobSkill, JobStatus, JobType,
    MilestoneStatus, NewApplication, NewJob, NewMilestone, NewProject, ProjectRef, ProjectStatus,
};
use crate::value::money;

const JOB_TITLES: &[&str] = &[
    "Build a responsive marketing website",
    "Develop a REST API for inventory management",
    "Create an iOS fitness tracking app",
    "Migrate legacy PHP application to Node.js",
    "Design a mobile app onboarding flow",
    "Set up CI/CD pipeline on AWS",
    "Write technical documentation for SDK",
    "Build a data dashboard for sales metrics",
    "Optimize PostgreSQL query performance",
    "Implement payment gateway integration",
    "Train a churn prediction model",
    "Containerize microservices with Docker",
    "Redesign company logo and brand kit",
    "Run a Google Ads campaign for product launch",
    "Port image processing library to Rust",
];

const MILESTONE_TITLES: &[&str] = &[
    "Requirements and wireframes",
    "Initial prototype",
    "Core feature implementation",
    "Testing and QA",
    "Deployment and handover",
    "Documentation",
    "Final revisions",
];

const COVER_LETTER_OPENERS: &[&str] = &[
    "I have delivered several similar projects and can start right away.",
    "This matches my experience closely and I would love to help.",
    "I read your brief carefully and have a few ideas on approach.",
    "I specialise in exactly this kind of work.",
];

pub fn jobs<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    client_ids: &[i64],
    category_ids: &[i64],
    now: DateTime<Utc>,
) -> Vec<NewJob> {
    if client_ids.is_empty() {
        warn!("no clients found, skipping job generation");
        return Vec::new();
    }
    if category_ids.is_empty() {
        warn!("no categories found, skipping job generation");
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let budget_min = money(rng.gen_range(100.0..5_000.0));
            let budget_max = money(budget_min * rng.gen_range(1.2..3.0));
            NewJob {
                client_id: *client_ids.choose(rng).unwrap_or(&client_ids[0]),
                category_id: *category_ids.choose(rng).unwrap_or(&category_ids[0]),
                title: pick(rng, JOB_TITLES).to_string(),
                description: Paragraph(3..6).fake_with_rng(rng),
                budget_min,
                budget_max,
                job_type: if rng.gen_bool(0.6) {
                    JobType::Fixed
                } else {
                    JobType::Hourly
                },
                experience_level: *ExperienceLevel::ALL
                    .choose(rng)
                    .unwrap_or(&ExperienceLevel::Intermediate),
                status: job_status(rng),
                created_at: past_instant(rng, now, HISTORY_DAYS),
            }
        })
        .collect()
}

fn job_status<R: Rng + ?Sized>(rng: &mut R) -> JobStatus {
    match rng.gen_range(0..100) {
        0..=39 => JobStatus::Open,
        40..=64 => JobStatus::InProgress,
        65..=91 => JobStatus::Completed,
        _ => JobStatus::Cancelled,
    }
}

/// Two to five distinct skills per job.
pub fn job_skills<R: Rng + ?Sized>(rng: &mut R, jobs: &[JobRef], skill_ids: &[i64]) -> Vec<JobSkill> {
    if skill_ids.is_empty() {
        warn!("no skills found, jobs will have no skill tags");
        return Vec::new();
    }

    let mut rows = Vec::new();
    for job in jobs {
        let wanted = rng.gen_range(2..=5).min(skill_ids.len());
        rows.extend(
            skill_ids
                .choose_multiple(rng, wanted)
                .map(|skill_id| JobSkill {
                    job_id: job.id,
                    skill_id: *skill_id,
                }),
        );
    }
    rows
}

/// Applications from distinct freelancers, `per_job` per job (capped by
/// the number of freelancers available).
///
/// Jobs that have hired get exactly one `accepted` application and the rest
/// `rejected`; open and cancelled jobs get pending or withdrawn ones.
pub fn applications<R: Rng + ?Sized>(
    rng: &mut R,
    jobs: &[JobRef],
    freelancer_ids: &[i64],
    per_job: RangeInclusive<u32>,
    now: DateTime<Utc>,
) -> Vec<NewApplication> {
    if freelancer_ids.is_empty() {
        warn!("no freelancers found, skipping applications");
        return Vec::new();
    }

    let mut rows = Vec::new();
    for job in jobs {
        let wanted = (rng.gen_range(per_job.clone()) as usize).min(freelancer_ids.len());
        let accepted_index = (job.status.has_hire() && wanted > 0).then(|| rng.gen_range(0..wanted));
        let applicants: Vec<i64> = freelancer_ids
            .choose_multiple(rng, wanted)
            .copied()
            .collect();

        for (index, freelancer_id) in applicants.into_iter().enumerate() {
            let status = match accepted_index {
                Some(accepted) if accepted == index => ApplicationStatus::Accepted,
                Some(_) => ApplicationStatus::Rejected,
                None if rng.gen_bool(0.1) => ApplicationStatus::Withdrawn,
                None => ApplicationStatus::Pending,
            };
            let opener = pick(rng, COVER_LETTER_OPENERS);
            let body: String = Paragraph(1..3).fake_with_rng(rng);
            rows.push(NewApplication {
                job_id: job.id,
                freelancer_id,
                cover_letter: format!("{opener} {body}"),
                proposed_rate: money(job.budget_max * rng.gen_range(0.6..1.05)),
                estimated_days: rng.gen_range(3..=90),
                status,
                created_at: instant_between(rng, job.created_at, now),
            });
        }
    }
    rows
}

/// One project per accepted application.
pub fn projects<R: Rng + ?Sized>(
    rng: &mut R,
    jobs: &[JobRef],
    applications: &[ApplicationRef],
    now: DateTime<Utc>,
) -> Vec<NewProject> {
    let jobs_by_id: HashMap<i64, &JobRef> = jobs.iter().map(|job| (job.id, job)).collect();

    applications
        .iter()
        .filter(|app| app.status == ApplicationStatus::Accepted)
        .filter_map(|app| {
            let job = jobs_by_id.get(&app.job_id)?;
            let status = job.status.project_status()?;
            let start = instant_between(rng, app.created_at, now);
            let start_date = start.date_naive();
            let end_date = match status {
                ProjectStatus::Completed => {
                    let planned = start + Duration::days(i64::from(app.estimated_days));
                    Some(planned.min(now).date_naive())
                }
                _ => None,
            };
            Some(NewProject {
                job_id: job.id,
                application_id: app.id,
                client_id: job.client_id,
                freelancer_id: app.freelancer_id,
                title: job.title.clone(),
                agreed_amount: app.proposed_rate,
                status,
                start_date,
                end_date,
            })
        })
        .collect()
}

/// Milestones splitting each project's agreed amount.
pub fn milestones<R: Rng + ?Sized>(
    rng: &mut R,
    projects: &[ProjectRef],
    per_project: RangeInclusive<u32>,
) -> Vec<NewMilestone> {
    let mut rows = Vec::new();
    for project in projects {
        let count = rng.gen_range(per_project.clone()) as usize;
        if count == 0 {
            continue;
        }
        let share = money(project.agreed_amount / count as f64);
        for step in 0..count {
            let status = match project.status {
                ProjectStatus::Completed => MilestoneStatus::Approved,
                _ if step == 0 => MilestoneStatus::Approved,
                _ if step == 1 => MilestoneStatus::InProgress,
                _ => MilestoneStatus::Pending,
            };
            rows.push(NewMilestone {
                project_id: project.id,
                title: format!("{}. {}", step + 1, pick(rng, MILESTONE_TITLES)),
                description: Sentence(6..14).fake_with_rng(rng),
                amount: share,
                due_date: project.start_date + Duration::days(14 * (step as i64 + 1)),
                status,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn job(id: i64, status: JobStatus) -> JobRef {
        JobRef {
            id,
            client_id: 500 + id,
            title: "Optimize PostgreSQL query performance".into(),
            budget_max: 2_000.0,
            status,
            created_at: Utc::now() - Duration::days(60),
        }
    }

    #[test]
    fn no_clients_aborts_job_generation() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(jobs(&mut rng, 100, &[], &[1, 2], Utc::now()).is_empty());
    }

    #[test]
    fn jobs_reference_known_parents() {
        let mut rng = StdRng::seed_from_u64(6);
        let jobs = jobs(&mut rng, 100, &[10, 11, 12], &[1, 2], Utc::now());

        assert_eq!(jobs.len(), 100);
        for job in &jobs {
            assert!([10, 11, 12].contains(&job.client_id));
            assert!([1, 2].contains(&job.category_id));
            assert!(job.budget_max >= job.budget_min);
        }
    }

    #[test]
    fn hired_jobs_accept_exactly_one_application() {
        let mut rng = StdRng::seed_from_u64(7);
        let jobs = vec![job(1, JobStatus::Completed), job(2, JobStatus::Open)];
        let freelancers: Vec<i64> = (100..160).collect();

        let apps = applications(&mut rng, &jobs, &freelancers, 10..=50, Utc::now());

        let accepted_for = |job_id| {
            apps.iter()
                .filter(|a| a.job_id == job_id && a.status == ApplicationStatus::Accepted)
                .count()
        };
        assert_eq!(accepted_for(1), 1);
        assert_eq!(accepted_for(2), 0);
    }

    #[test]
    fn applicants_are_distinct_per_job() {
        let mut rng = StdRng::seed_from_u64(8);
        let jobs = vec![job(1, JobStatus::Open)];
        let apps = applications(&mut rng, &jobs, &[1, 2, 3], 10..=50, Utc::now());

        assert_eq!(apps.len(), 3);
        let mut ids: Vec<_> = apps.iter().map(|a| a.freelancer_id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn projects_come_from_accepted_applications() {
        let mut rng = StdRng::seed_from_u64(9);
        let jobs = vec![job(1, JobStatus::InProgress)];
        let now = Utc::now();
        let accepted = ApplicationRef {
            id: 77,
            job_id: 1,
            freelancer_id: 300,
            proposed_rate: 1_500.0,
            estimated_days: 20,
            status: ApplicationStatus::Accepted,
            created_at: now - Duration::days(30),
        };
        let rejected = ApplicationRef {
            id: 78,
            status: ApplicationStatus::Rejected,
            ..accepted
        };

        let projects = projects(&mut rng, &jobs, &[accepted, rejected], now);

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].application_id, 77);
        assert_eq!(projects[0].client_id, 501);
        assert_eq!(projects[0].status, ProjectStatus::Active);
        assert!(projects[0].end_date.is_none());
    }

    #[test]
    fn milestones_split_agreed_amount() {
        let mut rng = StdRng::seed_from_u64(10);
        let project = ProjectRef {
            id: 4,
            client_id: 1,
            freelancer_id: 2,
            agreed_amount: 900.0,
            status: ProjectStatus::Completed,
            start_date: Utc::now().date_naive(),
        };

        let rows = milestones(&mut rng, &[project], 3..=3);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|m| m.amount == 300.0 && m.project_id == 4));
        assert!(rows.iter().all(|m| m.status == MilestoneStatus::Approved));
    }
}
