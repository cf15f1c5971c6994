use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::db::Database;
use crate::models::{
    Application, ApplicationStatus, Category, ExperienceEntry, Notification, NotificationKind,
    Opportunity, OpportunityType, User, UserProfile, UserRole,
};

const ADMIN_USER_ID: i64 = 900;
const COMPANY_USER_ID: i64 = 500;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s)
        .single()
        .expect("valid seed timestamp")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The fixed catalog the process starts from: 8 opportunities, 4 accounts,
/// 2 applications, and 2 inbox entries for the demo seeker.
pub fn seed_database() -> Database {
    let mut db = Database::new();

    // The store prepends on insert, so feed the list in reverse to keep the
    // catalog in its canonical 1..=8 listing order.
    for record in opportunities().into_iter().rev() {
        db.catalog.insert(record);
    }

    for user in users() {
        db.add_user(user);
    }

    db.add_profile(UserProfile {
        id: 101,
        user_id: 101,
        name: "Alex Rivera".to_string(),
        email: "alex@example.com".to_string(),
        bio: "Passionate learner looking for opportunities in technology and design. I love building things and solving problems.".to_string(),
        skills: strings(&["HTML", "CSS", "JavaScript", "Communication"]),
        resume_url: None,
        experience: vec![ExperienceEntry {
            role: "Volunteer".to_string(),
            company: "Local Library".to_string(),
            duration: "Summer 2023".to_string(),
        }],
    });

    db.add_application(Application {
        id: 1,
        opportunity_id: 1, // Future Coders
        user_id: 101,
        applicant_name: None,
        status: ApplicationStatus::Applied,
        applied_at: timestamp(2024, 5, 10, 10, 0, 0),
    });
    db.add_application(Application {
        id: 2,
        opportunity_id: 2, // Design Intern
        user_id: 102,
        applicant_name: None,
        status: ApplicationStatus::Reviewing,
        applied_at: timestamp(2024, 5, 12, 14, 30, 0),
    });

    db.add_notification(Notification {
        id: 1,
        user_id: 101,
        title: "Welcome to OpportunityBridge".to_string(),
        message: "We're glad to have you here! Complete your profile to get better recommendations."
            .to_string(),
        is_read: false,
        created_at: timestamp(2024, 5, 9, 9, 0, 0),
        kind: NotificationKind::Info,
    });
    db.add_notification(Notification {
        id: 2,
        user_id: 101,
        title: "Application Received".to_string(),
        message: "Your application for 'Future Coders Scholarship' has been received successfully."
            .to_string(),
        is_read: true,
        created_at: timestamp(2024, 5, 10, 10, 5, 0),
        kind: NotificationKind::Success,
    });

    db
}

fn users() -> Vec<User> {
    vec![
        User {
            id: 101,
            name: "Alex Rivera".to_string(),
            email: "alex@example.com".to_string(),
            role: UserRole::Seeker,
            has_seen_onboarding: false,
        },
        User {
            id: 102,
            name: "Sarah Chen".to_string(),
            email: "sarah@example.com".to_string(),
            role: UserRole::Seeker,
            has_seen_onboarding: true,
        },
        User {
            id: ADMIN_USER_ID,
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            role: UserRole::Admin,
            has_seen_onboarding: true,
        },
        User {
            id: COMPANY_USER_ID,
            name: "Creative Studio HR".to_string(),
            email: "company@example.com".to_string(),
            role: UserRole::Company,
            has_seen_onboarding: true,
        },
    ]
}

fn opportunities() -> Vec<Opportunity> {
    vec![
        Opportunity {
            id: 1,
            title: "Future Coders Scholarship".to_string(),
            organization: "TechForGood Foundation".to_string(),
            kind: OpportunityType::Scholarship,
            category: Category::Technology,
            location: "Remote".to_string(),
            is_remote: true,
            stipend_amount: 5000,
            deadline: date(2024, 12, 31),
            description: "A scholarship for underrepresented youth interested in software engineering. Includes mentorship.".to_string(),
            requirements: strings(&[
                "High school student or equivalent",
                "Interest in CS",
                "3.0 GPA or higher",
            ]),
            posted_at: Some(date(2024, 1, 15)),
            posted_by_user_id: Some(ADMIN_USER_ID),
        },
        Opportunity {
            id: 2,
            title: "Junior Graphic Design Intern".to_string(),
            organization: "Creative Studio X".to_string(),
            kind: OpportunityType::Internship,
            category: Category::ArtsDesign,
            location: "New York, NY".to_string(),
            is_remote: false,
            stipend_amount: 2500,
            deadline: date(2024, 6, 15),
            description: "Paid internship for aspiring designers to work on real client projects. Adobe Suite proficiency required.".to_string(),
            requirements: strings(&[
                "Portfolio required",
                "Adobe Illustrator & Photoshop",
                "Available for 3 months",
            ]),
            posted_at: Some(date(2024, 2, 1)),
            posted_by_user_id: Some(COMPANY_USER_ID),
        },
        Opportunity {
            id: 3,
            title: "Welding Apprenticeship".to_string(),
            organization: "IronWorks Union".to_string(),
            kind: OpportunityType::Apprenticeship,
            category: Category::SkilledTrades,
            location: "Chicago, IL".to_string(),
            is_remote: false,
            stipend_amount: 4000,
            deadline: date(2024, 8, 1),
            description: "Hands-on apprenticeship learning modern welding techniques. Path to full certification.".to_string(),
            requirements: strings(&[
                "High school diploma/GED",
                "Physical stamina",
                "Detail oriented",
            ]),
            posted_at: Some(date(2024, 3, 10)),
            posted_by_user_id: Some(ADMIN_USER_ID),
        },
        Opportunity {
            id: 4,
            title: "AI & Ethics Workshop".to_string(),
            organization: "OpenAI Learning".to_string(),
            kind: OpportunityType::Workshop,
            category: Category::Technology,
            location: "Remote".to_string(),
            is_remote: true,
            stipend_amount: 0,
            deadline: date(2024, 5, 20),
            description: "Weekend workshop exploring the ethical implications of artificial intelligence.".to_string(),
            requirements: strings(&[
                "No coding experience needed",
                "Interest in philosophy or tech",
            ]),
            posted_at: Some(date(2024, 4, 5)),
            posted_by_user_id: Some(COMPANY_USER_ID),
        },
        Opportunity {
            id: 5,
            title: "Community Garden Coordinator".to_string(),
            organization: "Green City".to_string(),
            kind: OpportunityType::EntryLevelJob,
            category: Category::CommunityService,
            location: "Portland, OR".to_string(),
            is_remote: false,
            stipend_amount: 3200,
            deadline: date(2024, 5, 1),
            description: "Entry level position managing volunteers and garden beds.".to_string(),
            requirements: strings(&[
                "Experience with gardening",
                "Leadership skills",
                "Weekend availability",
            ]),
            posted_at: Some(date(2024, 2, 20)),
            posted_by_user_id: Some(ADMIN_USER_ID),
        },
        Opportunity {
            id: 6,
            title: "STEM University Grant".to_string(),
            organization: "National Science Board".to_string(),
            kind: OpportunityType::Scholarship,
            category: Category::Academic,
            location: "Remote".to_string(),
            is_remote: true,
            stipend_amount: 10000,
            deadline: date(2024, 11, 15),
            description: "Grant for high school seniors pursuing STEM degrees.".to_string(),
            requirements: strings(&[
                "Accepted to 4-year university",
                "STEM Major",
                "Essay required",
            ]),
            posted_at: Some(date(2023, 12, 1)),
            posted_by_user_id: Some(ADMIN_USER_ID),
        },
        Opportunity {
            id: 7,
            title: "Frontend React Bootcamp".to_string(),
            organization: "Code Academy".to_string(),
            kind: OpportunityType::Workshop,
            category: Category::Technology,
            location: "San Francisco, CA".to_string(),
            is_remote: false,
            stipend_amount: 0,
            deadline: date(2024, 7, 10),
            description: "Intensive 2-week bootcamp for React and TypeScript. Scholarship available for tuition.".to_string(),
            requirements: strings(&["Basic HTML/CSS knowledge", "Laptop required"]),
            posted_at: Some(date(2024, 4, 1)),
            posted_by_user_id: Some(ADMIN_USER_ID),
        },
        Opportunity {
            id: 8,
            title: "Digital Music Production Mentorship".to_string(),
            organization: "SoundWave".to_string(),
            kind: OpportunityType::Mentorship,
            category: Category::ArtsDesign,
            location: "Remote".to_string(),
            is_remote: true,
            stipend_amount: 500,
            deadline: date(2024, 9, 1),
            description: "One-on-one mentorship with industry producers. Learn Logic Pro and mixing.".to_string(),
            requirements: strings(&["Submit 1 demo track", "Passion for music"]),
            posted_at: Some(date(2024, 3, 15)),
            posted_by_user_id: Some(ADMIN_USER_ID),
        },
    ]
}
