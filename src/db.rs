use anyhow::{Result, anyhow};
use chrono::Utc;

use crate::models::{
    Application, ApplicationStatus, Notification, NotificationKind, Opportunity, ProfilePatch,
    User, UserProfile, UserRole,
};
use crate::store::{CatalogStore, validate_record};

/// Process-lifetime application state: the opportunity catalog plus the
/// user, application, and notification lists that hang off it. Volatile by
/// design; rebuilt from the seed set at startup. Single-writer, so mutation
/// goes through `&mut self` and reads always see a consistent snapshot.
#[derive(Debug)]
pub struct Database {
    pub catalog: CatalogStore,
    users: Vec<User>,
    profiles: Vec<UserProfile>,
    applications: Vec<Application>,
    notifications: Vec<Notification>,
    next_user_id: i64,
    next_profile_id: i64,
    next_application_id: i64,
    next_notification_id: i64,
}

/// Counters for the admin dashboard.
#[derive(Debug, Clone, Copy)]
pub struct AdminStats {
    pub total_opportunities: usize,
    pub total_applications: usize,
    pub active_users: usize,
}

impl Database {
    pub fn new() -> Self {
        Self {
            catalog: CatalogStore::new(),
            users: Vec::new(),
            profiles: Vec::new(),
            applications: Vec::new(),
            notifications: Vec::new(),
            next_user_id: 1,
            next_profile_id: 1,
            next_application_id: 1,
            next_notification_id: 1,
        }
    }

    // --- User operations ---

    pub fn add_user(&mut self, mut user: User) -> i64 {
        if user.id <= 0 || self.get_user(user.id).is_some() {
            user.id = self.next_user_id;
        }
        self.next_user_id = self.next_user_id.max(user.id) + 1;
        let id = user.id;
        self.users.push(user);
        id
    }

    pub fn get_user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Email-lookup login. Unknown addresses that look like staff accounts
    /// are rejected; anything else auto-signs-up as a seeker and gets a
    /// welcome notification.
    pub fn login(&mut self, email: &str) -> Result<User> {
        if let Some(user) = self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Ok(user.clone());
        }

        if email.contains("admin") {
            return Err(anyhow!("Invalid admin credentials"));
        }
        if email.contains("company") {
            return Err(anyhow!(
                "Invalid company credentials. Try company@example.com"
            ));
        }

        let name = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            id: 0,
            name: name.clone(),
            email: email.to_string(),
            role: UserRole::Seeker,
            has_seen_onboarding: false,
        };
        let id = self.add_user(user);
        // Fresh accounts start with an empty profile to fill in later.
        self.add_profile(UserProfile {
            id: 0,
            user_id: id,
            name,
            email: email.to_string(),
            bio: String::new(),
            skills: vec![],
            resume_url: None,
            experience: vec![],
        });
        self.notify(
            id,
            "Welcome to OpportunityBridge!",
            "Explore thousands of opportunities tailored for you.",
            NotificationKind::Info,
        );
        self.get_user(id)
            .cloned()
            .ok_or_else(|| anyhow!("User vanished after signup"))
    }

    pub fn complete_onboarding(&mut self, user_id: i64) {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.has_seen_onboarding = true;
        }
    }

    // --- Profile operations ---

    pub fn add_profile(&mut self, mut profile: UserProfile) -> i64 {
        if profile.id <= 0 {
            profile.id = self.next_profile_id;
        }
        self.next_profile_id = self.next_profile_id.max(profile.id) + 1;
        let id = profile.id;
        self.profiles.push(profile);
        id
    }

    pub fn profile_for(&self, user_id: i64) -> Option<&UserProfile> {
        self.profiles.iter().find(|p| p.user_id == user_id)
    }

    /// Applies the set fields of the patch to the user's profile, creating
    /// one from the account record on first write. Unset fields keep their
    /// stored values.
    pub fn update_profile(&mut self, user_id: i64, patch: ProfilePatch) -> Result<UserProfile> {
        let user = self
            .get_user(user_id)
            .ok_or_else(|| anyhow!("User #{} not found", user_id))?
            .clone();

        if self.profile_for(user_id).is_none() {
            self.add_profile(UserProfile {
                id: 0,
                user_id,
                name: user.name,
                email: user.email,
                bio: String::new(),
                skills: vec![],
                resume_url: None,
                experience: vec![],
            });
        }

        let profile = self
            .profiles
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or_else(|| anyhow!("Profile for user #{} not found", user_id))?;

        if let Some(name) = patch.name {
            profile.name = name;
        }
        if let Some(email) = patch.email {
            profile.email = email;
        }
        if let Some(bio) = patch.bio {
            profile.bio = bio;
        }
        if let Some(skills) = patch.skills {
            profile.skills = skills;
        }
        if let Some(resume_url) = patch.resume_url {
            profile.resume_url = Some(resume_url);
        }
        if let Some(experience) = patch.experience {
            profile.experience = experience;
        }
        Ok(profile.clone())
    }

    // --- Catalog operations ---

    /// Validates and inserts a new posting, stamping today as the posting
    /// date. The store assigns the id.
    pub fn create_opportunity(&mut self, mut record: Opportunity) -> Result<i64> {
        validate_record(&record)?;
        record.id = 0;
        record.posted_at = Some(Utc::now().date_naive());
        Ok(self.catalog.insert(record))
    }

    pub fn delete_opportunity(&mut self, id: i64) {
        self.catalog.remove(id);
    }

    // --- Application operations ---

    /// Applying twice for the same posting returns the existing application
    /// instead of creating a duplicate.
    pub fn apply(&mut self, opportunity_id: i64, user_id: i64) -> Result<Application> {
        if let Some(existing) = self
            .applications
            .iter()
            .find(|a| a.opportunity_id == opportunity_id && a.user_id == user_id)
        {
            return Ok(existing.clone());
        }

        let opportunity = self
            .catalog
            .get(opportunity_id)
            .ok_or_else(|| anyhow!("Opportunity #{} not found", opportunity_id))?
            .clone();

        let application = Application {
            id: self.next_application_id,
            opportunity_id,
            user_id,
            applicant_name: None,
            status: ApplicationStatus::Applied,
            applied_at: Utc::now(),
        };
        self.next_application_id += 1;
        self.applications.insert(0, application.clone());

        self.notify(
            user_id,
            "Application Submitted",
            &format!(
                "You successfully applied for {} at {}.",
                opportunity.title, opportunity.organization
            ),
            NotificationKind::Success,
        );
        if let Some(poster_id) = opportunity.posted_by_user_id {
            self.notify(
                poster_id,
                "New Applicant",
                &format!("A user just applied for {}", opportunity.title),
                NotificationKind::Info,
            );
        }

        Ok(application)
    }

    pub fn applications_for(&self, user_id: i64) -> Vec<Application> {
        self.applications
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Every application, with the applicant's name filled in for display.
    pub fn all_applications(&self) -> Vec<Application> {
        self.applications
            .iter()
            .map(|a| self.enrich(a))
            .collect()
    }

    /// Applications against the given company's postings, enriched.
    pub fn company_applications(&self, company_user_id: i64) -> Vec<Application> {
        let my_opportunity_ids: Vec<i64> = self
            .catalog
            .find_by_poster(company_user_id)
            .iter()
            .map(|o| o.id)
            .collect();

        self.applications
            .iter()
            .filter(|a| my_opportunity_ids.contains(&a.opportunity_id))
            .map(|a| self.enrich(a))
            .collect()
    }

    fn enrich(&self, application: &Application) -> Application {
        let mut enriched = application.clone();
        enriched.applicant_name = Some(
            self.get_user(application.user_id)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "Unknown User".to_string()),
        );
        enriched
    }

    /// No-op on an unknown id. Status changes notify the applicant.
    pub fn update_application_status(&mut self, id: i64, status: ApplicationStatus) {
        let Some(application) = self.applications.iter_mut().find(|a| a.id == id) else {
            return;
        };
        application.status = status;
        let user_id = application.user_id;
        let opportunity_id = application.opportunity_id;

        let title = self
            .catalog
            .get(opportunity_id)
            .map(|o| o.title.clone())
            .unwrap_or_else(|| format!("opportunity #{opportunity_id}"));
        let kind = match status {
            ApplicationStatus::Rejected => NotificationKind::Error,
            ApplicationStatus::Offer => NotificationKind::Success,
            _ => NotificationKind::Info,
        };
        self.notify(
            user_id,
            "Application Status Update",
            &format!(
                "The status of your application for {} has been updated to: {}.",
                title, status
            ),
            kind,
        );
    }

    /// Relays a message from the posting organization to the applicant's
    /// inbox. No-op on an unknown application.
    pub fn send_message_to_applicant(&mut self, application_id: i64, message: &str) {
        let Some(application) = self.applications.iter().find(|a| a.id == application_id) else {
            return;
        };
        let user_id = application.user_id;
        let organization = self
            .catalog
            .get(application.opportunity_id)
            .map(|o| o.organization.clone())
            .unwrap_or_else(|| "the organization".to_string());
        self.notify(
            user_id,
            &format!("Message from {organization}"),
            message,
            NotificationKind::Info,
        );
    }

    // --- Notification operations ---

    /// Creates an unread notification at the front of the inbox. No
    /// delivery transport; the inbox is the whole feature.
    pub fn notify(
        &mut self,
        user_id: i64,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> i64 {
        let notification = Notification {
            id: self.next_notification_id,
            user_id,
            title: title.to_string(),
            message: message.to_string(),
            is_read: false,
            created_at: Utc::now(),
            kind,
        };
        self.next_notification_id += 1;
        let id = notification.id;
        self.notifications.insert(0, notification);
        id
    }

    pub fn add_notification(&mut self, mut notification: Notification) -> i64 {
        if notification.id <= 0 {
            notification.id = self.next_notification_id;
        }
        self.next_notification_id = self.next_notification_id.max(notification.id) + 1;
        let id = notification.id;
        self.notifications.insert(0, notification);
        id
    }

    pub fn notifications_for(&self, user_id: i64) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn mark_notification_read(&mut self, id: i64) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            notification.is_read = true;
        }
    }

    pub fn add_application(&mut self, mut application: Application) -> i64 {
        if application.id <= 0 {
            application.id = self.next_application_id;
        }
        self.next_application_id = self.next_application_id.max(application.id) + 1;
        let id = application.id;
        self.applications.push(application);
        id
    }

    pub fn stats(&self) -> AdminStats {
        AdminStats {
            total_opportunities: self.catalog.len(),
            total_applications: self.applications.len(),
            active_users: self.users.len(),
        }
    }
}
