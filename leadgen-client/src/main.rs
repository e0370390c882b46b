use anyhow::Context;
use clap::{Parser, Subcommand};
use leadgen_client::config::ClientConfig;
use leadgen_client::helpers::session_store::SessionStore;
use leadgen_client::{
    ClientError, Controller, HttpGateway, LeadBackend, Notification, Severity, View, ViewState,
};
use shared_types::{AnalyticsSnapshot, Company, CompanyPatch, CrmContact, SearchForm};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend URL, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Logout,
    /// Search companies, then run row actions on the ranked results
    Search {
        #[arg(long, default_value = "")]
        company_name: String,
        #[arg(long, default_value = "")]
        industry: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        min_employees: String,
        #[arg(long, default_value = "")]
        max_employees: String,
        #[arg(long = "enrich", value_name = "NAME")]
        enrich: Vec<String>,
        #[arg(long = "crm", value_name = "NAME")]
        crm: Vec<String>,
        /// Open insights for one company after the other actions
        #[arg(long = "insights", value_name = "NAME")]
        insights: Option<String>,
    },
    Scrape {
        #[arg(long, default_value = "")]
        industry: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    Analytics,
    /// Push a single contact to the CRM
    CrmContact {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company_name: Option<String>,
    },
    #[command(subcommand)]
    Leads(LeadsCommand),
}

#[derive(Subcommand, Debug)]
enum LeadsCommand {
    List,
    Get {
        id: String,
    },
    /// Save a new lead
    Create {
        name: String,
        #[command(flatten)]
        fields: LeadFields,
    },
    /// Change the given fields of a saved lead
    Update {
        id: String,
        #[command(flatten)]
        fields: LeadFields,
    },
    Delete {
        id: String,
    },
    Search {
        query: String,
    },
}

#[derive(clap::Args, Debug)]
struct LeadFields {
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    employee_count: Option<u32>,
    #[arg(long)]
    revenue: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    probability_score: Option<f64>,
}

impl LeadFields {
    fn into_patch(self) -> CompanyPatch {
        CompanyPatch {
            industry: self.industry,
            location: self.location,
            employee_count: self.employee_count,
            revenue: self.revenue,
            website: self.website,
            description: self.description,
            probability_score: self.probability_score,
            ..Default::default()
        }
    }
}

fn init_tracing(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("leadgen.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path);

    let (config, config_path) = ClientConfig::load().context("Failed to load config")?;
    tracing::debug!("Loaded config from {:?}", config_path);

    let base_url = args
        .base_url
        .unwrap_or_else(|| config.backend.base_url.clone());
    let store = match config.session_path() {
        Some(path) => SessionStore::new(path),
        None => SessionStore::default(),
    };
    let session = store.load().context("Failed to load saved session")?;

    tracing::info!("Using backend at {}", base_url);
    let controller =
        Controller::new(HttpGateway::new(&base_url), session).with_session_store(store);

    let result = run(&controller, args.command).await;
    for notification in controller.drain_notifications().await {
        print_notification(&notification);
    }
    result
}

async fn run(controller: &Controller<HttpGateway>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            controller.login(&username, &password).await?;
            println!("Logged in as {}", username);
        }
        Command::Register {
            username,
            password,
            confirm_password,
        } => {
            controller
                .register(&username, &password, &confirm_password)
                .await?;
            println!("Registered and logged in as {}", username);
        }
        Command::Logout => {
            controller.logout().await?;
            println!("Logged out");
        }
        Command::Search {
            company_name,
            industry,
            location,
            min_employees,
            max_employees,
            enrich,
            crm,
            insights,
        } => {
            let form = SearchForm {
                company_name,
                industry,
                location,
                min_employees,
                max_employees,
            };
            controller.search(&form).await?;

            // Keep going on per-row failures, they are reported as notifications
            for name in &enrich {
                if let Err(e) = controller.enrich(name).await {
                    tracing::warn!("Enrichment of {} failed: {}", name, e);
                }
            }
            for name in &crm {
                if let Err(e) = controller.add_to_crm(name).await {
                    tracing::warn!("CRM submit of {} failed: {}", name, e);
                }
            }

            print_results(&*controller.state().await);

            if let Some(name) = insights {
                controller.insights(&name).await?;
                if let Some(company) = controller.state().await.selected_company() {
                    println!(
                        "\n{}\n{}",
                        company.name,
                        company.insights_summary.as_deref().unwrap_or_default()
                    );
                }
            }
        }
        Command::Scrape { industry, location } => {
            require_session(controller).await?;
            controller.navigate(View::Scrape).await?;
            controller.scrape(&industry, &location).await?;

            for lead in controller.state().await.scraped_leads() {
                println!(
                    "{} | {} | {} | {}",
                    lead.name, lead.industry, lead.location, lead.website
                );
            }
        }
        Command::Analytics => {
            require_session(controller).await?;
            controller.open_analytics().await?;
            if let Some(snapshot) = controller.state().await.analytics() {
                print_analytics(snapshot);
            }
        }
        Command::CrmContact {
            first_name,
            last_name,
            email,
            phone,
            company_name,
        } => {
            require_session(controller).await?;
            let contact = CrmContact {
                first_name,
                last_name,
                email,
                phone,
                company_name,
                title: None,
                linkedin_url: None,
            };
            let confirmation = controller.backend().add_contact_to_crm(&contact).await?;
            println!("{}", confirmation.message);
        }
        Command::Leads(command) => {
            require_session(controller).await?;
            let backend = controller.backend();
            match command {
                LeadsCommand::List => print_companies(&backend.list_leads().await?),
                LeadsCommand::Get { id } => print_companies(&[backend.get_lead(&id).await?]),
                LeadsCommand::Create { name, fields } => {
                    let mut lead = Company::new(name);
                    lead.apply_patch(&fields.into_patch());
                    print_companies(&[backend.create_lead(&lead).await?]);
                }
                LeadsCommand::Update { id, fields } => {
                    let patch = fields.into_patch();
                    print_companies(&[backend.update_lead(&id, &patch).await?]);
                }
                LeadsCommand::Delete { id } => {
                    let confirmation = backend.delete_lead(&id).await?;
                    if confirmation.message.is_empty() {
                        println!("Deleted lead {}", id);
                    } else {
                        println!("{}", confirmation.message);
                    }
                }
                LeadsCommand::Search { query } => {
                    print_companies(&backend.search_leads(&query).await?)
                }
            }
        }
    }

    Ok(())
}

async fn require_session(controller: &Controller<HttpGateway>) -> Result<(), ClientError> {
    if controller.state().await.is_authenticated() {
        Ok(())
    } else {
        Err(ClientError::NotAuthenticated)
    }
}

fn print_notification(notification: &Notification) {
    let label = match notification.severity {
        Severity::Success => "ok",
        Severity::Info => "info",
        Severity::Error => "error",
    };
    println!("[{}] {}", label, notification.message);
}

fn print_results(state: &ViewState) {
    print_companies(state.results());
}

fn print_companies(companies: &[Company]) {
    if companies.is_empty() {
        println!("No companies found");
        return;
    }

    for company in companies {
        let rank = company
            .rank
            .map(|r| format!("{:>3}.", r))
            .unwrap_or_else(|| "   -".to_string());
        println!(
            "{} {} | {} | {} | {} employees | score {:.1}",
            rank,
            company.name,
            company.industry,
            company.location,
            company.employee_count,
            company.effective_score()
        );
    }
}

fn print_analytics(snapshot: &AnalyticsSnapshot) {
    match snapshot {
        AnalyticsSnapshot::Summary(summary) => {
            println!("Lead distribution:");
            for (bucket, count) in &summary.lead_distribution {
                println!("  {}: {}", bucket, count);
            }
            println!("Top leads:");
            for lead in &summary.top_leads {
                println!("  {} ({:.1}, {:?} {})", lead.name, lead.score, lead.trend, lead.change);
            }
        }
        AnalyticsSnapshot::Detailed(detailed) => {
            println!("Total leads: {}", detailed.total_leads);
            println!("Top industries:");
            for (industry, count) in detailed.top_industries(5) {
                println!("  {}: {}", industry, count);
            }
        }
    }
}
