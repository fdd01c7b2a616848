//! Closed set of tables the seeder writes to.
//!
//! Identifiers in generated SQL only ever come from here, never from
//! generated text.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    Categories,
    Skills,
    Users,
    FreelancerProfiles,
    ClientProfiles,
    Jobs,
    JobSkills,
    Applications,
    Projects,
    Milestones,
    Messages,
    Notifications,
    Reviews,
}

impl Table {
    /// All tables in foreign-key order (parents first).
    pub const ALL: [Table; 13] = [
        Table::Categories,
        Table::Skills,
        Table::Users,
        Table::FreelancerProfiles,
        Table::ClientProfiles,
        Table::Jobs,
        Table::JobSkills,
        Table::Applications,
        Table::Projects,
        Table::Milestones,
        Table::Messages,
        Table::Notifications,
        Table::Reviews,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::Skills => "skills",
            Table::Users => "users",
            Table::FreelancerProfiles => "freelancer_profiles",
            Table::ClientProfiles => "client_profiles",
            Table::Jobs => "jobs",
            Table::JobSkills => "job_skills",
            Table::Applications => "applications",
            Table::Projects => "projects",
            Table::Milestones => "milestones",
            Table::Messages => "messages",
            Table::Notifications => "notifications",
            Table::Reviews => "reviews",
        }
    }

    /// Columns written by the seeder, in bind order.
    pub fn insert_columns(self) -> &'static [&'static str] {
        match self {
            Table::Categories => &["name", "slug", "description"],
            Table::Skills => &["name", "category_id"],
            Table::Users => &[
                "email",
                "password_hash",
                "first_name",
                "last_name",
                "role",
                "status",
                "created_at",
            ],
            Table::FreelancerProfiles => &[
                "user_id",
                "headline",
                "bio",
                "hourly_rate",
                "country",
                "years_experience",
                "availability",
            ],
            Table::ClientProfiles => &["user_id", "company_name", "industry", "country", "website"],
            Table::Jobs => &[
                "client_id",
                "category_id",
                "title",
                "description",
                "budget_min",
                "budget_max",
                "job_type",
                "experience_level",
                "status",
                "created_at",
            ],
            Table::JobSkills => &["job_id", "skill_id"],
            Table::Applications => &[
                "job_id",
                "freelancer_id",
                "cover_letter",
                "proposed_rate",
                "estimated_days",
                "status",
                "created_at",
            ],
            Table::Projects => &[
                "job_id",
                "application_id",
                "client_id",
                "freelancer_id",
                "title",
                "agreed_amount",
                "status",
                "start_date",
                "end_date",
            ],
            Table::Milestones => &[
                "project_id",
                "title",
                "description",
                "amount",
                "due_date",
                "status",
            ],
            Table::Messages => &[
                "sender_id",
                "receiver_id",
                "project_id",
                "content",
                "is_read",
                "created_at",
            ],
            Table::Notifications => &[
                "user_id",
                "kind",
                "title",
                "body",
                "payload",
                "is_read",
                "created_at",
            ],
            Table::Reviews => &[
                "project_id",
                "reviewer_id",
                "reviewee_id",
                "rating",
                "comment",
                "created_at",
            ],
        }
    }

    /// Whether the table has a surrogate `id` column to return from inserts.
    pub fn has_id(self) -> bool {
        !matches!(
            self,
            Table::JobSkills | Table::FreelancerProfiles | Table::ClientProfiles
        )
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_table_once() {
        let mut seen = std::collections::HashSet::new();
        for table in Table::ALL {
            assert!(seen.insert(table.as_str()));
            assert!(!table.insert_columns().is_empty());
        }
        assert_eq!(seen.len(), 13);
    }

    #[test]
    fn link_tables_return_no_ids() {
        assert!(!Table::JobSkills.has_id());
        assert!(Table::Applications.has_id());
    }
}
