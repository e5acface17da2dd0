use std::sync::Arc;

use clap::{Parser, Subcommand};
use eyre::Result;
use tcm_ai::bedrock::BedrockProvider;
use tcm_core::i18n::Language;
use tcm_storage::s3::S3Store;
use tcm_storage::session::{StaticSession, UserId};
use tcm_storage::store::ReportStore;
use tcm_wizard::controller::Wizard;
use tcm_wizard::submission::Submitter;

use tcm_app::aws::{caller_identity, sdk_config};
use tcm_app::config::{
    self, AdvisorConfig, CredentialSource, config_info, config_path, load_config, save_config,
};
use tcm_app::console::{ConsoleDriver, ConsoleExit, Ending, stdin_lines};

#[derive(Parser)]
#[command(name = "tcm-advisor")]
#[command(about = "TCM health assessment in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an assessment (default)
    Run {
        /// Interface language (en, zh); overrides the config file
        #[arg(long)]
        lang: Option<String>,
        /// Ignore the configured user and run as a guest
        #[arg(long)]
        guest: bool,
    },
    /// List saved reports for the configured user
    Reports,
    /// Print one saved report as JSON
    Show {
        /// Report id
        id: uuid::Uuid,
    },
    /// Check the configured AWS credentials
    Whoami,
    /// Inspect or change the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config with secrets redacted
    Show,
    /// Write a config file
    Init {
        #[arg(long, default_value = "us-east-1")]
        region: String,
        /// AWS profile name; the default credential chain is used when absent
        #[arg(long)]
        profile: Option<String>,
        /// S3 bucket for saved reports
        #[arg(long)]
        bucket: Option<String>,
        /// User id for logged-in mode
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value = "en")]
        lang: String,
        /// Default Bedrock model id
        #[arg(long)]
        model: Option<String>,
    },
    /// Remove the config file
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run {
        lang: None,
        guest: false,
    }) {
        Commands::Run { lang, guest } => run(lang.as_deref(), guest).await,
        Commands::Reports => list_reports().await,
        Commands::Show { id } => show_report(id).await,
        Commands::Whoami => whoami().await,
        Commands::Config { action } => configure(action),
    }
}

fn parse_language(code: &str) -> Result<Language> {
    Language::parse(code).ok_or_else(|| eyre::eyre!("unsupported language: {code}"))
}

async fn run(lang: Option<&str>, guest: bool) -> Result<()> {
    let config = load_config()?;
    let language = match lang {
        Some(code) => parse_language(code)?,
        None => config.language,
    };
    let user = if guest {
        None
    } else {
        config.user_id.as_deref().and_then(UserId::new)
    };

    let sdk = sdk_config(&config).await;
    let provider = Arc::new(BedrockProvider::new(&sdk, &config.default_model));
    let submitter = config.bucket.as_ref().map(|bucket| {
        let store = Arc::new(S3Store::new(&sdk, bucket.as_str()));
        Submitter::new(
            Arc::new(StaticSession::new(user.clone())),
            store.clone(),
            store,
        )
    });

    tracing::info!(
        logged_in = user.is_some(),
        language = ?language,
        persistence = submitter.is_some(),
        "starting assessment"
    );

    let wizard = Wizard::new(user.is_some(), language, Arc::new(ConsoleExit));
    let mut driver = ConsoleDriver::new(stdin_lines(), std::io::stdout(), wizard, provider, submitter);
    match driver.run().await? {
        Ending::Exited(target) => tracing::info!(?target, "assessment closed"),
        Ending::Quit => tracing::info!("session ended"),
    }
    Ok(())
}

async fn report_store(config: &AdvisorConfig) -> Result<(S3Store, UserId)> {
    let bucket = config
        .bucket
        .as_deref()
        .ok_or_else(|| eyre::eyre!("no bucket configured; run `tcm-advisor config init --bucket ...`"))?;
    let user = config
        .user_id
        .as_deref()
        .and_then(UserId::new)
        .ok_or_else(|| eyre::eyre!("no user configured; reports are only kept for signed-in users"))?;
    let sdk = sdk_config(config).await;
    Ok((S3Store::new(&sdk, bucket), user))
}

async fn list_reports() -> Result<()> {
    let config = load_config()?;
    let (store, user) = report_store(&config).await?;
    let ids = store.list(&user).await?;
    if ids.is_empty() {
        println!("No reports found.");
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}

async fn show_report(id: uuid::Uuid) -> Result<()> {
    let config = load_config()?;
    let (store, user) = report_store(&config).await?;
    let record = store.load(&user, id).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn whoami() -> Result<()> {
    let config = load_config()?;
    let sdk = sdk_config(&config).await;
    let identity = caller_identity(&sdk).await?;
    println!("{}", serde_json::to_string_pretty(&identity)?);
    Ok(())
}

fn configure(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config()?;
            let info = config_info(&config, &config_path()?);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        ConfigAction::Init {
            region,
            profile,
            bucket,
            user,
            lang,
            model,
        } => {
            let mut config = AdvisorConfig {
                region,
                credentials: match profile {
                    Some(profile_name) => CredentialSource::Profile { profile_name },
                    None => CredentialSource::DefaultChain,
                },
                bucket,
                user_id: user,
                language: parse_language(&lang)?,
                ..AdvisorConfig::default()
            };
            if let Some(model) = model {
                config.default_model = model;
            }
            save_config(&config)?;
            println!("Config written to {}", config_path()?.display());
        }
        ConfigAction::Delete => config::delete_config()?,
    }
    Ok(())
}
