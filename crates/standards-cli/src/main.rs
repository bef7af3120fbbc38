//! Healthy City Standards - compliance tracking CLI
//!
//! The `standards` command lets operators inspect and update compliance
//! evidence for the healthy-city standards catalogue.
//!
//! ## Commands
//!
//! - `list`: Standards with derived status, filtered by term/agency/status
//! - `show`: One standard with its submissions
//! - `summary`: Status counters across the catalogue
//! - `agency`: An agency's own dashboard
//! - `assign`: Toggle an agency's assignment to a standard
//! - `submit`: Record new evidence
//! - `review`: Approve, reject, unapprove or toggle a submission
//! - `withdraw`: Delete a submission

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use standards_core::{
    AgencyFilter, Attachment, ComplianceQuery, ComplianceService, ContentType, NewSubmission,
    ReviewAction, StandardCatalog, StandardId, StandardView, StatusFilter, Submission,
    SubmissionId,
};
use standards_state::SurrealComplianceStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "standards")]
#[command(author = "Healthy City Portal Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Healthy City standards compliance tracking", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Standards catalogue file (JSON array); defaults to the bundled catalogue
    #[arg(long, global = true, env = "HEALTHY_CITY_CATALOG")]
    catalog: Option<PathBuf>,

    /// Use a throwaway in-memory database
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List standards with their derived compliance status
    List {
        /// Free-text search over standard text and requirements
        #[arg(short, long, default_value = "")]
        search: String,

        /// Agency name, or `all`
        #[arg(short, long, default_value = "all")]
        agency: String,

        /// didnt_submit, pending_approval, approved, rejected, or `all`
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },

    /// Show one standard with its submissions
    Show {
        /// Standard id
        id: StandardId,
    },

    /// Count standards per derived status
    Summary,

    /// Show the standards assigned to an agency
    Agency {
        /// Agency name
        name: String,
    },

    /// Toggle an agency's assignment to a standard
    Assign {
        /// Standard id
        standard: StandardId,

        /// Agency name
        agency: String,
    },

    /// Record a new submission (status starts as pending)
    Submit {
        /// Standard id
        #[arg(long)]
        standard: StandardId,

        /// Submitting agency
        #[arg(long)]
        agency: String,

        /// text, pdf, photo or video
        #[arg(long)]
        content_type: ContentType,

        /// Attachment metadata as `name:size:mime` (repeatable)
        #[arg(long = "file", value_parser = parse_attachment)]
        files: Vec<Attachment>,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// Apply a review action to a submission
    Review {
        /// Submission id
        submission: String,

        /// approve, reject, unapprove or toggle
        action: ReviewAction,
    },

    /// Delete a submission
    Withdraw {
        /// Submission id
        submission: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    standards_core::init_tracing(cli.json, level);

    let catalog = load_catalog(cli.catalog.as_deref())?;

    let store = if cli.memory {
        SurrealComplianceStore::in_memory().await
    } else {
        SurrealComplianceStore::from_env().await
    }
    .context("Failed to connect to standards database")?;
    let store = Arc::new(store);
    let service = ComplianceService::new(catalog, store.clone(), store);

    let output = match cli.command {
        Commands::List {
            search,
            agency,
            status,
        } => cmd_list(&service, &search, &agency, status).await?,
        Commands::Show { id } => cmd_show(&service, id).await?,
        Commands::Summary => to_json(&service.summary().await?)?,
        Commands::Agency { name } => to_json(&service.agency_dashboard(&name).await?)?,
        Commands::Assign { standard, agency } => cmd_assign(&service, standard, &agency).await?,
        Commands::Submit {
            standard,
            agency,
            content_type,
            files,
            description,
        } => {
            let submission = NewSubmission {
                standard_id: standard,
                agency_name: agency,
                content_type,
                files,
                description,
            };
            cmd_submit(&service, submission).await?
        }
        Commands::Review { submission, action } => {
            let outcome = service
                .review(&SubmissionId::from(submission.as_str()), action)
                .await
                .with_context(|| format!("Failed to review submission {submission}"))?;
            to_json(&outcome)?
        }
        Commands::Withdraw { submission } => {
            service
                .withdraw(&SubmissionId::from(submission.as_str()))
                .await
                .with_context(|| format!("Failed to withdraw submission {submission}"))?;
            to_json(&serde_json::json!({ "withdrawn": submission }))?
        }
    };

    println!("{output}");
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<StandardCatalog> {
    match path {
        Some(path) => StandardCatalog::from_path(path)
            .with_context(|| format!("Failed to load catalogue from {}", path.display())),
        None => StandardCatalog::bundled().context("Bundled catalogue is invalid"),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to render output")
}

/// Parse `name:size:mime`. The name may itself contain colons.
fn parse_attachment(raw: &str) -> std::result::Result<Attachment, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(mime_type), Some(size), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected name:size:mime, got `{raw}`"));
    };
    if name.is_empty() {
        return Err(format!("attachment name is empty in `{raw}`"));
    }
    let size = size
        .parse::<u64>()
        .map_err(|_| format!("invalid attachment size `{size}`"))?;
    Ok(Attachment {
        name: name.to_string(),
        size,
        mime_type: mime_type.to_string(),
    })
}

async fn cmd_list(
    service: &ComplianceService,
    search: &str,
    agency: &str,
    status: StatusFilter,
) -> Result<String> {
    let query = ComplianceQuery::new()
        .with_term(search)
        .with_agency(AgencyFilter::parse(agency))
        .with_status(status);
    let views = service.search(&query).await?;
    info!(matched = views.len(), "Listed standards");
    to_json(&views)
}

#[derive(Serialize)]
struct ShowOutput {
    #[serde(flatten)]
    view: StandardView,
    submissions: Vec<Submission>,
}

async fn cmd_show(service: &ComplianceService, id: StandardId) -> Result<String> {
    let view = service
        .standard_view(id)
        .await?
        .ok_or_else(|| anyhow!("Standard {id} is not in the catalogue"))?;
    let submissions = service.submissions_for(id).await?;
    to_json(&ShowOutput { view, submissions })
}

#[derive(Serialize)]
struct AssignOutput<'a> {
    standard_id: StandardId,
    agency: &'a str,
    assigned: bool,
}

async fn cmd_assign(
    service: &ComplianceService,
    standard: StandardId,
    agency: &str,
) -> Result<String> {
    if agency.trim().is_empty() {
        bail!("Agency name must not be empty");
    }
    let assigned = service.toggle_assignment(standard, agency).await?;
    to_json(&AssignOutput {
        standard_id: standard,
        agency,
        assigned,
    })
}

async fn cmd_submit(service: &ComplianceService, submission: NewSubmission) -> Result<String> {
    let standard_id = submission.standard_id;
    let id = service
        .submit(submission)
        .await
        .with_context(|| format!("Failed to submit evidence for standard {standard_id}"))?;
    info!(submission_id = %id, "Submission recorded");
    to_json(&serde_json::json!({
        "submission_id": id,
        "standard_id": standard_id,
        "status": "pending",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use standards_core::{ComplianceStatus, Standard};

    async fn memory_service() -> ComplianceService {
        let store = Arc::new(SurrealComplianceStore::in_memory().await.unwrap());
        let catalog = StandardCatalog::new(vec![
            Standard {
                id: 1,
                text: "Safe school routes".to_string(),
                requirements: vec!["Traffic calming near schools".to_string()],
            },
            Standard {
                id: 2,
                text: "Public green space per resident".to_string(),
                requirements: Vec::new(),
            },
        ])
        .unwrap();
        ComplianceService::new(catalog, store.clone(), store)
    }

    fn text_submission(standard_id: StandardId, agency: &str) -> NewSubmission {
        NewSubmission {
            standard_id,
            agency_name: agency.to_string(),
            content_type: ContentType::Text,
            files: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn test_parse_attachment() {
        let a = parse_attachment("minutes.pdf:1024:application/pdf").unwrap();
        assert_eq!(a.name, "minutes.pdf");
        assert_eq!(a.size, 1024);
        assert_eq!(a.mime_type, "application/pdf");
    }

    #[test]
    fn test_parse_attachment_name_with_colon() {
        let a = parse_attachment("C:report.pdf:10:application/pdf").unwrap();
        assert_eq!(a.name, "C:report.pdf");
    }

    #[test]
    fn test_parse_attachment_rejects_bad_input() {
        assert!(parse_attachment("report.pdf").is_err());
        assert!(parse_attachment("report.pdf:big:application/pdf").is_err());
        assert!(parse_attachment(":10:application/pdf").is_err());
    }

    #[test]
    fn test_cli_parses_submit() {
        let cli = Cli::try_parse_from([
            "standards",
            "--memory",
            "submit",
            "--standard",
            "5",
            "--agency",
            "Police",
            "--content-type",
            "photo",
            "--file",
            "a.jpg:10:image/jpeg",
            "--file",
            "b.jpg:20:image/jpeg",
        ])
        .unwrap();
        assert!(cli.memory);
        match cli.command {
            Commands::Submit {
                standard,
                content_type,
                files,
                ..
            } => {
                assert_eq!(standard, 5);
                assert_eq!(content_type, ContentType::Photo);
                assert_eq!(files.len(), 2);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_review_action() {
        assert!(Cli::try_parse_from(["standards", "review", "abc", "escalate"]).is_err());
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.len(), 80);
    }

    #[test]
    fn test_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"id": 9, "text": "Nine", "requirements": []}]"#).unwrap();
        let catalog = load_catalog(Some(&path)).unwrap();
        assert!(catalog.contains(9));
        assert!(load_catalog(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let service = memory_service().await;
        service.submit(text_submission(2, "Parks")).await.unwrap();

        let out = cmd_list(
            &service,
            "",
            "all",
            StatusFilter::Status(ComplianceStatus::PendingApproval),
        )
        .await
        .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], json!(2));
        assert_eq!(items[0]["derived_status"], json!("pending_approval"));
    }

    #[tokio::test]
    async fn test_show_includes_submissions() {
        let service = memory_service().await;
        service.submit(text_submission(1, "Traffic")).await.unwrap();

        let out = cmd_show(&service, 1).await.unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["text"], json!("Safe school routes"));
        assert_eq!(value["submissions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_show_unknown_standard_errors() {
        let service = memory_service().await;
        let err = cmd_show(&service, 99).await.unwrap_err();
        assert!(format!("{err:#}").contains("not in the catalogue"));
    }

    #[tokio::test]
    async fn test_assign_toggles() {
        let service = memory_service().await;
        let out = cmd_assign(&service, 1, "Traffic").await.unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["assigned"], json!(true));

        let out = cmd_assign(&service, 1, "Traffic").await.unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["assigned"], json!(false));

        assert!(cmd_assign(&service, 1, " ").await.is_err());
    }

    #[tokio::test]
    async fn test_submit_unknown_standard_has_context() {
        let service = memory_service().await;
        let err = cmd_submit(&service, text_submission(42, "Traffic"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("standard 42"));
    }
}
