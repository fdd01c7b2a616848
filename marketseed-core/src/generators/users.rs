use chrono::{DateTime, Utc};
use fake::faker::address::en::CountryName;
use fake::faker::company::en::{CompanyName, Industry};
use fake::faker::lorem::en::Paragraph;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{past_instant, pick, DEMO_PASSWORD_HASH, HISTORY_DAYS};
use crate::config::RoleMix;
use crate::models::{
    Availability, NewClientProfile, NewFreelancerProfile, NewUser, UserRef, UserRole, UserStatus,
};

const HEADLINES: &[&str] = &[
    "Full-stack developer",
    "Senior backend engineer",
    "Mobile app specialist",
    "Data analyst and ML engineer",
    "Cloud infrastructure consultant",
    "Product designer",
    "Technical writer",
    "Growth marketer",
    "Systems programmer",
];

/// Role counts for `count` users; admins absorb rounding.
pub fn role_counts(count: usize, mix: &RoleMix) -> (usize, usize, usize) {
    let freelancers = ((count as f64) * mix.freelancer).round() as usize;
    let freelancers = freelancers.min(count);
    let clients = (((count as f64) * mix.client).round() as usize).min(count - freelancers);
    (freelancers, clients, count - freelancers - clients)
}

pub fn users<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    mix: &RoleMix,
    now: DateTime<Utc>,
) -> Vec<NewUser> {
    let (freelancers, clients, admins) = role_counts(count, mix);
    let mut roles: Vec<UserRole> = std::iter::repeat(UserRole::Freelancer)
        .take(freelancers)
        .chain(std::iter::repeat(UserRole::Client).take(clients))
        .chain(std::iter::repeat(UserRole::Admin).take(admins))
        .collect();
    roles.shuffle(rng);

    roles
        .into_iter()
        .enumerate()
        .map(|(index, role)| {
            let first_name: String = FirstName().fake_with_rng(rng);
            let last_name: String = LastName().fake_with_rng(rng);
            NewUser {
                email: email_for(&first_name, &last_name, index),
                password_hash: DEMO_PASSWORD_HASH.to_string(),
                first_name,
                last_name,
                role,
                status: user_status(rng, role),
                created_at: past_instant(rng, now, HISTORY_DAYS),
            }
        })
        .collect()
}

/// Index suffix keeps addresses unique within a run.
fn email_for(first: &str, last: &str, index: usize) -> String {
    let clean = |s: &str| {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase()
    };
    format!("{}.{}{}@example.com", clean(first), clean(last), index + 1)
}

fn user_status<R: Rng + ?Sized>(rng: &mut R, role: UserRole) -> UserStatus {
    if role == UserRole::Admin {
        return UserStatus::Active;
    }
    match rng.gen_range(0..100) {
        0..=89 => UserStatus::Active,
        90..=96 => UserStatus::Pending,
        _ => UserStatus::Suspended,
    }
}

pub fn freelancer_profiles<R: Rng + ?Sized>(
    rng: &mut R,
    users: &[UserRef],
) -> Vec<NewFreelancerProfile> {
    users
        .iter()
        .filter(|u| u.role == UserRole::Freelancer)
        .map(|u| {
            let years_experience = rng.gen_range(0..=20);
            let base_rate: f64 = rng.gen_range(15.0..45.0);
            NewFreelancerProfile {
                user_id: u.id,
                headline: pick(rng, HEADLINES).to_string(),
                bio: Paragraph(2..4).fake_with_rng(rng),
                hourly_rate: crate::value::money(base_rate + years_experience as f64 * 4.0),
                country: CountryName().fake_with_rng(rng),
                years_experience,
                availability: match rng.gen_range(0..10) {
                    0..=5 => Availability::FullTime,
                    6..=8 => Availability::PartTime,
                    _ => Availability::Unavailable,
                },
            }
        })
        .collect()
}

pub fn client_profiles<R: Rng + ?Sized>(rng: &mut R, users: &[UserRef]) -> Vec<NewClientProfile> {
    users
        .iter()
        .filter(|u| u.role == UserRole::Client)
        .map(|u| {
            let company_name: String = CompanyName().fake_with_rng(rng);
            let website = rng
                .gen_bool(0.7)
                .then(|| format!("https://{}.example.com", domain_label(&company_name)));
            NewClientProfile {
                user_id: u.id,
                company_name,
                industry: Industry().fake_with_rng(rng),
                country: CountryName().fake_with_rng(rng),
                website,
            }
        })
        .collect()
}

fn domain_label(company: &str) -> String {
    let label: String = company
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if label.is_empty() {
        "company".to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn generates_exact_count_with_unique_emails() {
        let mut rng = StdRng::seed_from_u64(11);
        let users = users(&mut rng, 250, &RoleMix::default(), Utc::now());

        assert_eq!(users.len(), 250);
        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), 250);
    }

    #[test]
    fn role_counts_follow_mix() {
        assert_eq!(role_counts(200, &RoleMix::default()), (120, 70, 10));
        assert_eq!(role_counts(0, &RoleMix::default()), (0, 0, 0));
        let all_freelance = RoleMix {
            freelancer: 1.0,
            client: 0.0,
        };
        assert_eq!(role_counts(3, &all_freelance), (3, 0, 0));
    }

    #[test]
    fn profiles_match_roles() {
        let refs = vec![
            UserRef {
                id: 1,
                role: UserRole::Freelancer,
                status: UserStatus::Active,
            },
            UserRef {
                id: 2,
                role: UserRole::Client,
                status: UserStatus::Active,
            },
            UserRef {
                id: 3,
                role: UserRole::Admin,
                status: UserStatus::Active,
            },
        ];
        let mut rng = StdRng::seed_from_u64(3);

        let freelancers = freelancer_profiles(&mut rng, &refs);
        let clients = client_profiles(&mut rng, &refs);

        assert_eq!(freelancers.len(), 1);
        assert_eq!(freelancers[0].user_id, 1);
        assert!(freelancers[0].hourly_rate >= 15.0);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].user_id, 2);
    }

    #[test]
    fn email_strips_punctuation() {
        assert_eq!(email_for("Mary-Jo", "O'Neil", 4), "maryjo.oneil5@example.com");
    }
}
