use clap::{Parser, Subcommand};
use gcpdoctor::auth::{ServiceAccountKey, TokenProvider, CLOUD_PLATFORM_SCOPE};
use gcpdoctor::config::{Config, LlmProvider};
use gcpdoctor::error::{DoctorError, Result};
use gcpdoctor::llm::{AnthropicClient, ChatMessage, ChatOptions, OpenRouterClient};
use gcpdoctor::probe::{
    ApiKeyTester, BucketSummary, ObjectSummary, ProbeClient, ProbeResult,
};
use gcpdoctor::report::{
    render_access_tests, render_api_key_tests, render_api_listing, render_enablement,
    render_full_scan, render_key_services, render_oauth_check, render_oauth_inspection,
    render_permissions, render_verify, Report,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error};

/// APIs the fixer tries to enable for OAuth troubleshooting
const APIS_TO_ENABLE: &[&str] = &[
    "iap.googleapis.com",
    "cloudresourcemanager.googleapis.com",
    "iam.googleapis.com",
    "servicemanagement.googleapis.com",
];

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = "Diagnostica e assistenza configurazione per un progetto Google Cloud")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify that the service account can authenticate and reach storage
    Verify,
    /// Scan every reachable resource in the project
    Scan,
    /// Check the service account's IAM roles and relevant APIs
    Permissions {
        /// Run the extended post-cleanup access tests instead
        #[arg(long)]
        access_tests: bool,
    },
    /// List every enabled API, grouped by category
    Apis,
    /// Check the OAuth consent screen and print the redirect-URI fix steps
    OauthCheck,
    /// Detailed OAuth inspection: brand, clients, relevant APIs
    OauthInspect,
    /// Enable the APIs needed for OAuth troubleshooting
    EnableApis,
    /// Test an API key (GCP_API_KEY) against public endpoints
    TestApiKey,
    /// Send one prompt to the configured LLM provider
    Prompt {
        /// Prompt text
        text: String,
        /// Model alias override (default: the configured model)
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("Impossibile inizializzare il logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("❌ Errore ({}): {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_ref())?;

    match cli.command {
        Command::Verify => verify(&config).await,
        Command::Scan => scan(&config).await,
        Command::Permissions { access_tests } => permissions(&config, access_tests).await,
        Command::Apis => apis(&config).await,
        Command::OauthCheck => oauth_check(&config).await,
        Command::OauthInspect => oauth_inspect(&config).await,
        Command::EnableApis => enable_apis(&config).await,
        Command::TestApiKey => test_api_key(&config).await,
        Command::Prompt { text, model } => prompt(&config, &text, model).await,
    }
}

/// Credential bootstrap shared by every authenticated subcommand.
///
/// Any failure here aborts the invocation; probe failures past this point are
/// reported and never abort.
async fn bootstrap(config: &Config) -> Result<(ProbeClient, ServiceAccountKey)> {
    let key = ServiceAccountKey::load(config.resolved_credentials_path())?;
    let project_id = config
        .project_id
        .clone()
        .unwrap_or_else(|| key.project_id.clone());
    if project_id.is_empty() {
        return Err(DoctorError::config(
            "Nessun project_id: impostalo nel file credenziali o via GCP_PROJECT_ID",
        ));
    }

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let provider = TokenProvider::new(key, timeout)?;
    let token = provider.fetch(CLOUD_PLATFORM_SCOPE).await?;
    debug!("token ottenuto, valido: {}", token.is_valid());

    let client = ProbeClient::new(
        config.endpoints.clone(),
        project_id,
        token.access_token,
        timeout,
    )?;
    let key = provider.key().clone();
    Ok((client, key))
}

/// Buckets paired with a peek at their first objects
async fn buckets_with_objects(
    client: &ProbeClient,
    max_objects: u32,
) -> ProbeResult<Vec<(BucketSummary, ProbeResult<Vec<ObjectSummary>>)>> {
    match client.buckets().await {
        ProbeResult::Found(buckets) => {
            let mut out = Vec::with_capacity(buckets.len());
            for bucket in buckets {
                let objects = client.bucket_objects(&bucket.name, max_objects).await;
                out.push((bucket, objects));
            }
            ProbeResult::Found(out)
        }
        ProbeResult::Missing => ProbeResult::Missing,
        ProbeResult::PermissionDenied => ProbeResult::PermissionDenied,
        ProbeResult::Warning { status, detail } => ProbeResult::Warning { status, detail },
    }
}

async fn verify(config: &Config) -> Result<()> {
    let (client, key) = bootstrap(config).await?;
    let buckets = buckets_with_objects(&client, 5).await;

    let mut report = Report::new();
    render_verify(&mut report, &client.project_id, &key.client_email, buckets);
    print!("{}", report.as_str());
    Ok(())
}

async fn scan(config: &Config) -> Result<()> {
    let (client, key) = bootstrap(config).await?;

    let buckets = buckets_with_objects(&client, 5).await;
    let services = client.enabled_services().await;
    let firebase = client.firebase_info().await;
    let functions = client.functions().await;
    let instances = client.compute_instances().await;
    let accounts = client.service_accounts().await;

    let mut report = Report::new();
    render_full_scan(
        &mut report,
        &client.project_id,
        &key.client_email,
        buckets,
        services,
        firebase,
        functions,
        instances,
        accounts,
    );
    print!("{}", report.as_str());
    Ok(())
}

async fn permissions(config: &Config, access_tests: bool) -> Result<()> {
    let (client, key) = bootstrap(config).await?;
    let roles = client.iam_roles(&key.member_id()).await;

    let mut report = Report::new();
    if access_tests {
        let project = client.project_info().await;
        let projects = client.list_projects().await;
        let brands = client.brands().await;
        render_access_tests(
            &mut report,
            &client.project_id,
            &key.client_email,
            roles,
            project,
            projects,
            brands,
        );
    } else {
        let services = client.enabled_services().await;
        render_permissions(
            &mut report,
            &client.project_id,
            &key.client_email,
            roles,
            services,
        );
    }
    print!("{}", report.as_str());
    Ok(())
}

async fn apis(config: &Config) -> Result<()> {
    let (client, _) = bootstrap(config).await?;
    let services = client.enabled_services().await;

    let mut report = Report::new();
    render_api_listing(&mut report, &client.project_id, services);
    print!("{}", report.as_str());
    Ok(())
}

async fn oauth_check(config: &Config) -> Result<()> {
    let (client, _) = bootstrap(config).await?;
    let brands = client.brands().await;
    let project = client.project_info().await;

    let mut report = Report::new();
    render_oauth_check(&mut report, &client.project_id, brands, project);
    print!("{}", report.as_str());
    Ok(())
}

async fn oauth_inspect(config: &Config) -> Result<()> {
    let (client, _) = bootstrap(config).await?;

    let brands = client.brands().await;
    // Client listing only makes sense when a brand exists to search under
    let iap_clients = match brands.as_found().and_then(|b| b.first()) {
        Some(brand) => Some(client.iap_clients(&brand.name).await),
        None => None,
    };
    let services = client.enabled_services().await;

    let mut report = Report::new();
    render_oauth_inspection(&mut report, &client.project_id, brands, iap_clients, services);
    print!("{}", report.as_str());
    Ok(())
}

async fn enable_apis(config: &Config) -> Result<()> {
    let (client, _) = bootstrap(config).await?;

    let mut results = Vec::with_capacity(APIS_TO_ENABLE.len());
    for api in APIS_TO_ENABLE {
        let result = client.enable_service(api).await;
        results.push((api.to_string(), result));
    }

    let mut report = Report::new();
    report.banner("🔧 ABILITAZIONE API PER TROUBLESHOOTING OAUTH");
    report.line(format!("Progetto: {}", client.project_id));
    report.blank();
    render_enablement(&mut report, &results);
    report.blank();

    if let Some(services) = report.handle_failure(client.enabled_services().await) {
        render_key_services(&mut report, &services);
    }
    report.blank();
    report.line("⏳ Le API appena abilitate impiegano qualche minuto a propagarsi.");
    print!("{}", report.as_str());
    Ok(())
}

async fn test_api_key(config: &Config) -> Result<()> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        DoctorError::config("Nessuna API key: imposta la variabile GCP_API_KEY")
    })?;
    let project_id = config.project_id.clone().unwrap_or_else(|| {
        ServiceAccountKey::load(config.resolved_credentials_path())
            .map(|key| key.project_id)
            .unwrap_or_default()
    });
    if project_id.is_empty() {
        return Err(DoctorError::config(
            "Nessun project_id: impostalo via GCP_PROJECT_ID o nel file credenziali",
        ));
    }

    let tester = ApiKeyTester::new(
        config.endpoints.clone(),
        project_id.clone(),
        api_key,
        Duration::from_secs(config.api_key_timeout_secs),
    )?;
    let results = tester.run_all().await;

    let mut report = Report::new();
    render_api_key_tests(&mut report, &tester.masked_key(), &project_id, &results);
    print!("{}", report.as_str());
    Ok(())
}

async fn prompt(config: &Config, text: &str, model: Option<String>) -> Result<()> {
    let llm = config.llm.as_ref().ok_or_else(|| {
        DoctorError::config(
            "Nessuna configurazione LLM: aggiungi il blocco 'llm' al file di configurazione",
        )
    })?;
    let model = model.unwrap_or_else(|| llm.model.clone());
    let opts = ChatOptions {
        temperature: Some(llm.temperature),
        max_tokens: Some(llm.max_tokens),
        system: None,
    };
    let messages = [ChatMessage::user(text)];

    let reply = match llm.provider {
        LlmProvider::Anthropic => {
            AnthropicClient::from_config(llm)?
                .chat(&messages, &model, &opts)
                .await?
        }
        LlmProvider::OpenRouter => {
            OpenRouterClient::from_config(llm)?
                .chat(&messages, &model, &opts)
                .await?
        }
    };
    println!("{}", reply);
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    Ok(())
}
