use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use mkt_client::{Environment, HttpPlatform, HttpPortal, PortalApi};
use mkt_directory::Directory;
use mkt_model::{InputError, ResourceName, ValidationReport};
use mkt_seed::{
    BulkExecutor, Credentials, Downloader, LogProgress, MarketplaceTarget, ProgressReporter,
    SeedConfig, SeedError, SeedSummary, Seeder, build_directory, load_document, login,
    open_marketplace, write_document,
};
use mkt_validate::{Validator, write_validation_report_json};
use tracing::{Instrument, info, info_span};

use mkt_cli::cli::{CredentialArgs, DownloadArgs, SeedArgs, ValidateArgs};
use mkt_cli::progress::BarProgress;
use mkt_cli::summary::{document_counts, issue_table, resource_table};

pub struct DownloadResult {
    pub marketplace_id: String,
    pub output: PathBuf,
    pub counts: BTreeMap<ResourceName, usize>,
}

pub struct ValidateResult {
    pub source: String,
    pub report: ValidationReport,
    pub report_path: Option<PathBuf>,
}

/// Shared settings for commands that talk to the platform.
pub struct RunOptions {
    pub config: SeedConfig,
    pub show_progress: bool,
}

impl RunOptions {
    fn executor(&self, platform: HttpPlatform) -> BulkExecutor {
        let progress: Arc<dyn ProgressReporter> = if self.show_progress {
            Arc::new(BarProgress::new())
        } else {
            Arc::new(LogProgress)
        };
        BulkExecutor::new(Arc::new(platform), &self.config.executor).with_progress(progress)
    }

    fn portal(&self) -> Result<HttpPortal> {
        HttpPortal::new(self.config.portal_url()).context("create portal client")
    }
}

pub fn run_resources() -> Result<()> {
    println!("{}", resource_table(&Directory::builtin()));
    Ok(())
}

pub async fn run_validate(options: &RunOptions, args: &ValidateArgs) -> Result<ValidateResult> {
    let document = load_document(&args.input).await?;
    let directory = match &args.environment {
        Some(name) => {
            let environment = parse_environment(name)?;
            let platform = HttpPlatform::new(options.config.api_url(environment), "")?;
            build_directory(&platform, true)
                .await
                .context("load field schemas")?
        }
        None => Directory::builtin(),
    };

    let outcome = Validator::new(&directory).validate(&document);
    if let Some(path) = &args.report {
        write_validation_report_json(path, &args.input, &outcome.report)?;
    }
    Ok(ValidateResult {
        source: args.input.clone(),
        report: outcome.report,
        report_path: args.report.clone(),
    })
}

pub async fn run_download(options: &RunOptions, args: &DownloadArgs) -> Result<DownloadResult> {
    let environment = parse_environment(&args.environment)?;
    let credentials = credentials(&args.credentials)?;
    let org_id = required(args.org_id.as_deref(), "org-id")?;

    let portal = options.portal()?;
    let portal_token = login(&portal, &credentials).await?;
    let target = MarketplaceTarget::Existing { id: org_id };
    let organization = open_marketplace(&portal, &portal_token, &target).await?;
    let token = portal
        .organization_token(&portal_token, &organization.id)
        .await
        .context("get marketplace token")?;

    let platform = HttpPlatform::new(options.config.api_url(environment), token)?;
    let directory = Directory::builtin();
    let executor = options.executor(platform);
    let span = info_span!("download", marketplace = %organization.id, environment = %environment);
    let document = Downloader::new(&directory, &executor)
        .download(&organization.id)
        .instrument(span)
        .await?;

    write_document(&args.output, &document)?;
    Ok(DownloadResult {
        marketplace_id: organization.id,
        output: args.output.clone(),
        counts: document_counts(&document),
    })
}

pub async fn run_seed(options: &RunOptions, args: &SeedArgs) -> Result<SeedSummary> {
    let environment = parse_environment(&args.environment)?;
    let credentials = credentials(&args.credentials)?;
    let marketplace_id = required(args.marketplace_id.as_deref(), "marketplace-id")?;
    let document = load_document(&args.input).await?;

    let portal = options.portal()?;
    let portal_token = login(&portal, &credentials).await?;
    let target = match &args.marketplace_name {
        Some(name) => MarketplaceTarget::New {
            id: marketplace_id,
            name: name.clone(),
            environment,
        },
        None => MarketplaceTarget::Existing { id: marketplace_id },
    };

    let platform = HttpPlatform::new(options.config.api_url(environment), "")?;
    let directory = build_directory(&platform, true)
        .await
        .context("load field schemas")?;
    let outcome = Validator::new(&directory).validate(&document);
    if !outcome.is_valid() {
        println!("{}", issue_table(&outcome.report));
        return Err(SeedError::ValidationFailed {
            issue_count: outcome.report.error_count(),
        }
        .into());
    }

    let organization = open_marketplace(&portal, &portal_token, &target).await?;
    let token = portal
        .organization_token(&portal_token, &organization.id)
        .await
        .context("get marketplace token")?;
    info!(marketplace = %organization.id, environment = %environment, "seeding");

    let platform = HttpPlatform::new(options.config.api_url(environment), token)?;
    let executor = options.executor(platform);
    let span = info_span!("seed", marketplace = %organization.id);
    let summary = Seeder::new(&directory, &executor)
        .seed(&document, &organization.id)
        .instrument(span)
        .await?;
    Ok(summary)
}

fn parse_environment(name: &str) -> Result<Environment, InputError> {
    name.parse()
}

fn required(value: Option<&str>, name: &str) -> Result<String, InputError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(InputError::MissingArgument {
            name: name.to_string(),
        }),
    }
}

fn credentials(args: &CredentialArgs) -> Result<Credentials, InputError> {
    let username = required(args.username.as_deref(), "username")?;
    let password = args
        .password
        .clone()
        .filter(|password| !password.is_empty())
        .ok_or_else(|| InputError::MissingArgument {
            name: "password".to_string(),
        })?;
    Ok(Credentials::new(username, password))
}
