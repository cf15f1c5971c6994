mod ai;
mod db;
mod models;
mod search;
mod seed;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use chrono::NaiveDate;

use db::Database;
use models::{
    ApplicationStatus, Category, FilterCriteria, Opportunity, OpportunityType, ProfilePatch,
    UserProfile,
};
use seed::seed_database;

#[derive(Parser)]
#[command(name = "oppbridge")]
#[command(about = "Opportunity catalog - search, browse, and apply to postings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog with free text and/or explicit filters
    Search {
        /// Free-text query, interpreted by the AI backend when configured
        query: Option<String>,

        /// Filter by type (Scholarship, Internship, Workshop, Mentorship,
        /// "Entry Level Job", Apprenticeship)
        #[arg(short = 't', long = "type")]
        filter_type: Option<String>,

        /// Filter by category (Technology, "Arts & Design", "Skilled Trades",
        /// Academic, "Community Service")
        #[arg(short, long)]
        category: Option<String>,

        /// Only show remote opportunities
        #[arg(short, long)]
        remote_only: bool,
    },

    /// List every opportunity in the catalog
    List,

    /// Show opportunity details
    Show {
        /// Opportunity ID
        id: i64,
    },

    /// Add an opportunity to the catalog
    Add {
        title: String,
        organization: String,

        #[arg(short = 't', long = "type")]
        filter_type: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long, default_value = "Remote")]
        location: String,

        #[arg(short, long)]
        remote: bool,

        /// Stipend in dollars, 0 if unpaid
        #[arg(short, long, default_value = "0")]
        stipend: u32,

        /// Application deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Poster account id (company or admin)
        #[arg(short, long)]
        poster: Option<i64>,
    },

    /// Remove an opportunity from the catalog
    Remove {
        /// Opportunity ID
        id: i64,
    },

    /// Log in (or auto-sign-up) by email
    Login {
        email: String,
    },

    /// Apply to an opportunity
    Apply {
        /// Opportunity ID
        opportunity_id: i64,

        /// Applicant user ID
        #[arg(short, long)]
        user: i64,
    },

    /// List applications
    Applications {
        /// Applications belonging to this user
        #[arg(short, long)]
        user: Option<i64>,

        /// Applications against this company's postings
        #[arg(short, long)]
        company: Option<i64>,
    },

    /// Update an application's status
    Status {
        /// Application ID
        id: i64,

        /// New status (Applied, "Under Review", Interview, Offer, "Not Selected")
        status: String,
    },

    /// Send a message to an applicant's inbox
    Message {
        /// Application ID
        id: i64,

        /// Message text
        text: String,
    },

    /// Mark a user's onboarding tour as completed
    Onboard {
        /// User ID
        user: i64,
    },

    /// View or update a user's profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show a user's notification inbox
    Inbox {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Mark this notification read
        #[arg(long)]
        mark_read: Option<i64>,
    },

    /// Show catalog totals
    Stats,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the profile for a user
    Show {
        /// User ID
        user: i64,
    },

    /// Update profile fields; omitted fields keep their stored value
    Update {
        /// User ID
        user: i64,

        #[arg(long)]
        bio: Option<String>,

        /// Repeat for each skill; replaces the stored list when given
        #[arg(long = "skill")]
        skills: Vec<String>,

        #[arg(long)]
        resume_url: Option<String>,
    },

    /// Extract profile fields from a resume text file via the AI backend
    Parse {
        /// User ID
        user: i64,

        /// Path to a plain-text resume
        file: PathBuf,
    },
}

fn parse_type(s: &str) -> Result<OpportunityType> {
    s.parse().map_err(|_| {
        anyhow!(
            "Unknown type '{}'. Available: Scholarship, Internship, Workshop, Mentorship, \
             'Entry Level Job', Apprenticeship",
            s
        )
    })
}

fn parse_category(s: &str) -> Result<Category> {
    s.parse().map_err(|_| {
        anyhow!(
            "Unknown category '{}'. Available: Technology, 'Arts & Design', 'Skilled Trades', \
             Academic, 'Community Service'",
            s
        )
    })
}

fn parse_status(s: &str) -> Result<ApplicationStatus> {
    match s {
        "Applied" => Ok(ApplicationStatus::Applied),
        "Under Review" => Ok(ApplicationStatus::Reviewing),
        "Interview" => Ok(ApplicationStatus::Interview),
        "Offer" => Ok(ApplicationStatus::Offer),
        "Not Selected" => Ok(ApplicationStatus::Rejected),
        _ => Err(anyhow!(
            "Unknown status '{}'. Available: Applied, 'Under Review', Interview, Offer, \
             'Not Selected'",
            s
        )),
    }
}

fn run_search(
    db: &Database,
    query: Option<String>,
    filter_type: Option<String>,
    category: Option<String>,
    remote_only: bool,
) -> Result<()> {
    let manual = FilterCriteria {
        kind: filter_type.as_deref().map(parse_type).transpose()?,
        category: category.as_deref().map(parse_category).transpose()?,
        is_remote: remote_only.then_some(true),
        ..FilterCriteria::default()
    };

    let free_text = query.unwrap_or_default();
    let interpretation = if free_text.trim().is_empty() {
        // Filters-only search; the interpreter stays out of the loop.
        models::InterpretedQuery {
            synthesized_query: "SELECT * FROM opportunities WHERE ...".to_string(),
            filters: FilterCriteria::default(),
            explanation: "Filtering opportunities based on your selection.".to_string(),
        }
    } else {
        let backend = ai::configured_backend();
        ai::interpret(backend.as_deref(), &free_text)
    };

    println!("{}", interpretation.explanation);

    let merged = search::merge(&interpretation.filters, &manual);
    let outcome = search::execute(&db.catalog, &merged, &interpretation.synthesized_query);

    println!("Query: {}", outcome.synthesized_query);
    println!(
        "{} result(s) in {} ms\n",
        outcome.results.len(),
        outcome.execution_time_ms
    );
    print_opportunities(&outcome.results);
    Ok(())
}

fn print_opportunities(records: &[Opportunity]) {
    if records.is_empty() {
        println!("No opportunities found.");
        return;
    }
    println!(
        "{:<6} {:<16} {:<32} {:<24} {:>9}",
        "ID", "TYPE", "TITLE", "ORGANIZATION", "STIPEND"
    );
    println!("{}", "-".repeat(91));
    for record in records {
        let stipend = if record.stipend_amount == 0 {
            "-".to_string()
        } else {
            format!("${}", record.stipend_amount)
        };
        println!(
            "{:<6} {:<16} {:<32} {:<24} {:>9}",
            record.id,
            truncate(&record.kind.to_string(), 14),
            truncate(&record.title, 30),
            truncate(&record.organization, 22),
            stipend
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Volatile catalog: every run starts from the fixed seed set.
    let mut db = seed_database();

    match cli.command {
        Commands::Search {
            query,
            filter_type,
            category,
            remote_only,
        } => {
            run_search(&db, query, filter_type, category, remote_only)?;
        }

        Commands::List => {
            print_opportunities(db.catalog.all());
        }

        Commands::Show { id } => match db.catalog.get(id) {
            Some(record) => {
                println!("Opportunity #{}", record.id);
                println!("Title: {}", record.title);
                println!("Organization: {}", record.organization);
                println!("Type: {}", record.kind);
                println!("Category: {}", record.category);
                println!(
                    "Location: {}{}",
                    record.location,
                    if record.is_remote { " (remote)" } else { "" }
                );
                if record.stipend_amount > 0 {
                    println!("Stipend: ${}", record.stipend_amount);
                } else {
                    println!("Stipend: unpaid");
                }
                println!("Deadline: {}", record.deadline);
                if let Some(posted) = record.posted_at {
                    println!("Posted: {}", posted);
                }
                if !record.requirements.is_empty() {
                    println!("Requirements:");
                    for requirement in &record.requirements {
                        println!("  - {}", requirement);
                    }
                }
                println!("\n{}", record.description);
            }
            None => {
                println!("Opportunity #{} not found.", id);
            }
        },

        Commands::Add {
            title,
            organization,
            filter_type,
            category,
            location,
            remote,
            stipend,
            deadline,
            description,
            poster,
        } => {
            let deadline = NaiveDate::parse_from_str(&deadline, "%Y-%m-%d")
                .map_err(|_| anyhow!("Invalid deadline '{}', expected YYYY-MM-DD", deadline))?;
            let record = Opportunity {
                id: 0,
                title,
                organization,
                kind: parse_type(&filter_type)?,
                category: parse_category(&category)?,
                location,
                is_remote: remote,
                stipend_amount: stipend,
                deadline,
                description,
                requirements: vec![],
                posted_at: None,
                posted_by_user_id: poster,
            };
            let id = db.create_opportunity(record)?;
            println!("Added opportunity #{}", id);
        }

        Commands::Remove { id } => {
            db.delete_opportunity(id);
            println!("Removed opportunity #{} (if it existed).", id);
        }

        Commands::Login { email } => {
            let user = db.login(&email)?;
            println!("Logged in as {} (#{}, {:?})", user.name, user.id, user.role);
            if !user.has_seen_onboarding {
                println!("Looks like your first visit - check your inbox for a welcome note.");
            }
        }

        Commands::Apply { opportunity_id, user } => {
            let application = db.apply(opportunity_id, user)?;
            println!(
                "Application #{} recorded ({})",
                application.id, application.status
            );
        }

        Commands::Applications { user, company } => {
            let applications = match (user, company) {
                (Some(user_id), _) => db.applications_for(user_id),
                (None, Some(company_id)) => db.company_applications(company_id),
                (None, None) => db.all_applications(),
            };
            if applications.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<6} {:<8} {:<14} {:<20} {:<20}",
                    "ID", "OPP", "STATUS", "APPLICANT", "APPLIED"
                );
                println!("{}", "-".repeat(70));
                for application in applications {
                    println!(
                        "{:<6} {:<8} {:<14} {:<20} {:<20}",
                        application.id,
                        application.opportunity_id,
                        application.status.to_string(),
                        truncate(application.applicant_name.as_deref().unwrap_or("-"), 18),
                        application.applied_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }

        Commands::Status { id, status } => {
            let status = parse_status(&status)?;
            db.update_application_status(id, status);
            println!("Application #{} set to {}.", id, status);
        }

        Commands::Message { id, text } => {
            db.send_message_to_applicant(id, &text);
            println!("Message queued for the applicant on application #{}.", id);
        }

        Commands::Onboard { user } => {
            db.complete_onboarding(user);
            println!("Onboarding completed for user #{}.", user);
        }

        Commands::Profile { command } => match command {
            ProfileCommands::Show { user } => match db.profile_for(user) {
                Some(profile) => print_profile(profile),
                None => println!("No profile for user #{}.", user),
            },

            ProfileCommands::Update {
                user,
                bio,
                skills,
                resume_url,
            } => {
                let patch = ProfilePatch {
                    bio,
                    skills: (!skills.is_empty()).then_some(skills),
                    resume_url,
                    ..ProfilePatch::default()
                };
                let profile = db.update_profile(user, patch)?;
                print_profile(&profile);
            }

            ProfileCommands::Parse { user, file } => {
                let resume_text = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read resume file {}", file.display()))?;
                // Resume extraction has no keyword fallback: without a
                // working backend the command fails.
                let backend = ai::GeminiInterpreter::new()?;
                let patch = backend.parse_resume(&resume_text)?;
                let profile = db.update_profile(user, patch)?;
                println!("Profile updated from resume.");
                print_profile(&profile);
            }
        },

        Commands::Inbox { user, mark_read } => {
            if let Some(id) = mark_read {
                db.mark_notification_read(id);
            }
            let inbox = db.notifications_for(user);
            if inbox.is_empty() {
                println!("Inbox is empty.");
            } else {
                for notification in inbox {
                    let marker = if notification.is_read { " " } else { "*" };
                    println!(
                        "{} #{:<4} [{:?}] {} - {}",
                        marker,
                        notification.id,
                        notification.kind,
                        notification.title,
                        notification.message
                    );
                }
            }
        }

        Commands::Stats => {
            let stats = db.stats();
            println!("Opportunities: {}", stats.total_opportunities);
            println!("Applications:  {}", stats.total_applications);
            println!("Users:         {}", stats.active_users);
        }
    }

    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("Profile for {} (user #{})", profile.name, profile.user_id);
    println!("Email: {}", profile.email);
    if !profile.bio.is_empty() {
        println!("Bio: {}", profile.bio);
    }
    if !profile.skills.is_empty() {
        println!("Skills: {}", profile.skills.join(", "));
    }
    if let Some(url) = &profile.resume_url {
        println!("Resume: {}", url);
    }
    if !profile.experience.is_empty() {
        println!("Experience:");
        for entry in &profile.experience {
            println!("  - {} at {} ({})", entry.role, entry.company, entry.duration);
        }
    }
}

// Cuts on character boundaries, so multibyte titles cannot split a char.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
