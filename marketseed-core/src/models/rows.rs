//! Generated row records, one per target table.
//!
//! Rows are built by a generator, turned into bind values once, and dropped.

use chrono::{DateTime, NaiveDate, Utc};

use super::status::*;
use super::Insertable;
use crate::payload::NotificationPayload;
use crate::table::Table;
use crate::error::Result;
use crate::value::SqlValue;

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl Insertable for NewCategory {
    const TABLE: Table = Table::Categories;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.name.as_str().into(),
            self.slug.as_str().into(),
            self.description.as_str().into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSkill {
    pub name: String,
    pub category_id: i64,
}

impl Insertable for NewSkill {
    const TABLE: Table = Table::Skills;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![self.name.as_str().into(), self.category_id.into()])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl Insertable for NewUser {
    const TABLE: Table = Table::Users;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.email.as_str().into(),
            self.password_hash.as_str().into(),
            self.first_name.as_str().into(),
            self.last_name.as_str().into(),
            self.role.as_str().into(),
            self.status.as_str().into(),
            self.created_at.into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFreelancerProfile {
    pub user_id: i64,
    pub headline: String,
    pub bio: String,
    pub hourly_rate: f64,
    pub country: String,
    pub years_experience: i32,
    pub availability: Availability,
}

impl Insertable for NewFreelancerProfile {
    const TABLE: Table = Table::FreelancerProfiles;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.user_id.into(),
            self.headline.as_str().into(),
            self.bio.as_str().into(),
            self.hourly_rate.into(),
            self.country.as_str().into(),
            self.years_experience.into(),
            self.availability.as_str().into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClientProfile {
    pub user_id: i64,
    pub company_name: String,
    pub industry: String,
    pub country: String,
    pub website: Option<String>,
}

impl Insertable for NewClientProfile {
    const TABLE: Table = Table::ClientProfiles;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.user_id.into(),
            self.company_name.as_str().into(),
            self.industry.as_str().into(),
            self.country.as_str().into(),
            self.website.clone().into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub client_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub budget_min: f64,
    pub budget_max: f64,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl Insertable for NewJob {
    const TABLE: Table = Table::Jobs;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.client_id.into(),
            self.category_id.into(),
            self.title.as_str().into(),
            self.description.as_str().into(),
            self.budget_min.into(),
            self.budget_max.into(),
            self.job_type.as_str().into(),
            self.experience_level.as_str().into(),
            self.status.as_str().into(),
            self.created_at.into(),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobSkill {
    pub job_id: i64,
    pub skill_id: i64,
}

impl Insertable for JobSkill {
    const TABLE: Table = Table::JobSkills;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![self.job_id.into(), self.skill_id.into()])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub job_id: i64,
    pub freelancer_id: i64,
    pub cover_letter: String,
    pub proposed_rate: f64,
    pub estimated_days: i32,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl Insertable for NewApplication {
    const TABLE: Table = Table::Applications;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.job_id.into(),
            self.freelancer_id.into(),
            self.cover_letter.as_str().into(),
            self.proposed_rate.into(),
            self.estimated_days.into(),
            self.status.as_str().into(),
            self.created_at.into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub job_id: i64,
    pub application_id: i64,
    pub client_id: i64,
    pub freelancer_id: i64,
    pub title: String,
    pub agreed_amount: f64,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Insertable for NewProject {
    const TABLE: Table = Table::Projects;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.job_id.into(),
            self.application_id.into(),
            self.client_id.into(),
            self.freelancer_id.into(),
            self.title.as_str().into(),
            self.agreed_amount.into(),
            self.status.as_str().into(),
            self.start_date.into(),
            self.end_date.into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMilestone {
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: MilestoneStatus,
}

impl Insertable for NewMilestone {
    const TABLE: Table = Table::Milestones;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.project_id.into(),
            self.title.as_str().into(),
            self.description.as_str().into(),
            self.amount.into(),
            self.due_date.into(),
            self.status.as_str().into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub project_id: Option<i64>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Insertable for NewMessage {
    const TABLE: Table = Table::Messages;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.sender_id.into(),
            self.receiver_id.into(),
            self.project_id.into(),
            self.content.as_str().into(),
            self.is_read.into(),
            self.created_at.into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Insertable for NewNotification {
    const TABLE: Table = Table::Notifications;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.user_id.into(),
            self.payload.kind().into(),
            self.title.as_str().into(),
            self.body.as_str().into(),
            self.payload.to_json()?.into(),
            self.is_read.into(),
            self.created_at.into(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub project_id: i64,
    pub reviewer_id: i64,
    pub reviewee_id: i64,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Insertable for NewReview {
    const TABLE: Table = Table::Reviews;

    fn values(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            self.project_id.into(),
            self.reviewer_id.into(),
            self.reviewee_id.into(),
            self.rating.into(),
            self.comment.as_str().into(),
            self.created_at.into(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_width_matches_table_columns() {
        let now = Utc::now();
        let review = NewReview {
            project_id: 1,
            reviewer_id: 2,
            reviewee_id: 3,
            rating: 5,
            comment: "Great".into(),
            created_at: now,
        };
        assert_eq!(review.values().unwrap().len(), Table::Reviews.insert_columns().len());

        let message = NewMessage {
            sender_id: 1,
            receiver_id: 2,
            project_id: None,
            content: "hi".into(),
            is_read: false,
            created_at: now,
        };
        let values = message.values().unwrap();
        assert_eq!(values.len(), Table::Messages.insert_columns().len());
        assert_eq!(values[2], SqlValue::OptBigInt(None));
    }
}
