//! Enumerated string columns.
//!
//! Stored as text in the database; `as_str` is the exact stored value.

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(UserRole {
    Freelancer => "freelancer",
    Client => "client",
    Admin => "admin",
});

text_enum!(UserStatus {
    Active => "active",
    Pending => "pending",
    Suspended => "suspended",
});

text_enum!(JobStatus {
    Open => "open",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

text_enum!(JobType {
    Fixed => "fixed",
    Hourly => "hourly",
});

text_enum!(ExperienceLevel {
    Entry => "entry",
    Intermediate => "intermediate",
    Expert => "expert",
});

text_enum!(ApplicationStatus {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
    Withdrawn => "withdrawn",
});

text_enum!(ProjectStatus {
    Active => "active",
    Completed => "completed",
    Cancelled => "cancelled",
});

text_enum!(MilestoneStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Submitted => "submitted",
    Approved => "approved",
});

text_enum!(Availability {
    FullTime => "full_time",
    PartTime => "part_time",
    Unavailable => "unavailable",
});

impl JobStatus {
    /// Jobs in these states have hired exactly one freelancer.
    pub fn has_hire(self) -> bool {
        matches!(self, JobStatus::InProgress | JobStatus::Completed)
    }

    /// Project status implied by the job's status, if it has a hire.
    pub fn project_status(self) -> Option<ProjectStatus> {
        match self {
            JobStatus::InProgress => Some(ProjectStatus::Active),
            JobStatus::Completed => Some(ProjectStatus::Completed),
            JobStatus::Open | JobStatus::Cancelled => None,
        }
    }
}
