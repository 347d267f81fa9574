//! CLI commands
//!
//! Each subcommand maps to one client operation. Results are printed with
//! [`output`]; errors are turned into short hints by [`format_api_error`].

pub mod config;
pub mod output;

use anyhow::{Context, Result};
use clap::Subcommand;
use config::Config;
use output::{render_list, render_one, OutputFormat};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vmcloud::model::{AccessMode, AccessTokenCreateRequest};
use vmcloud::{Client, Error};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List cloud providers available for deployments
    Providers,
    /// List regions available for deployments
    Regions,
    /// List instance tiers
    Tiers,
    /// Manage deployments
    #[command(subcommand)]
    Deployments(DeploymentCommand),
    /// Manage deployment access tokens
    #[command(subcommand)]
    Tokens(TokenCommand),
    /// Manage alerting and recording rule files
    #[command(subcommand)]
    Rules(RuleCommand),
    /// Show or change saved settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum DeploymentCommand {
    /// List deployments
    List,
    /// Show deployment details
    Get { deployment_id: String },
    /// Create a deployment from a JSON request file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Update a deployment from a JSON request file
    Update {
        deployment_id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a deployment
    Delete { deployment_id: String },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// List access tokens of a deployment
    List { deployment_id: String },
    /// Create an access token
    Create {
        deployment_id: String,
        #[arg(long)]
        description: String,
        /// Access mode: r, w or rw
        #[arg(long, default_value = "r")]
        mode: AccessMode,
        /// <accountID> or <accountID>:<projectID>
        #[arg(long, default_value = "")]
        tenant: String,
    },
    /// Show a token with its full secret
    Reveal {
        deployment_id: String,
        token_id: String,
    },
    /// Delete an access token
    Delete {
        deployment_id: String,
        token_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RuleCommand {
    /// List rule file names of a deployment
    List { deployment_id: String },
    /// Print the content of a rule file
    Get { deployment_id: String, name: String },
    /// Upload a rule file
    Put {
        deployment_id: String,
        name: String,
        #[arg(long)]
        file: PathBuf,
        /// Report the upload as a new file instead of an update
        #[arg(long)]
        create: bool,
    },
    /// Delete a rule file
    Delete { deployment_id: String, name: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print saved settings
    Show,
    /// Save the API key
    SetKey { api_key: String },
    /// Save the API base URL
    SetUrl { base_url: String },
}

/// Settings needed to reach the API, resolved from flags, env and config
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientSettings {
    /// Build a client; only commands that talk to the API need one
    pub fn connect(&self) -> Result<Client> {
        let Some(api_key) = self.api_key.as_deref() else {
            anyhow::bail!(
                "No API key configured. Set VMCLOUD_API_KEY, use --api-key or run 'vmcloud config set-key'"
            );
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("vmcloud-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let client = Client::builder(api_key)
            .http_client(http)
            .base_url(self.base_url.as_str())
            .build()?;
        Ok(client)
    }
}

/// Run a command
pub async fn run(command: Command, settings: &ClientSettings, format: OutputFormat) -> Result<()> {
    if let Command::Config(cmd) = command {
        let mut config = Config::load();
        return run_config(cmd, &mut config);
    }

    let client = settings.connect()?;
    tracing::info!("Using API at {}", client.base_url());

    match command {
        Command::Providers => {
            let providers = client.list_cloud_providers().await?;
            println!("{}", render_list(&providers, format)?);
        }
        Command::Regions => {
            let regions = client.list_regions().await?;
            println!("{}", render_list(&regions, format)?);
        }
        Command::Tiers => {
            let tiers = client.list_tiers().await?;
            println!("{}", render_list(&tiers, format)?);
        }
        Command::Deployments(cmd) => run_deployments(&client, cmd, format).await?,
        Command::Tokens(cmd) => run_tokens(&client, cmd, format).await?,
        Command::Rules(cmd) => run_rules(&client, cmd, format).await?,
        // Handled before connecting
        Command::Config(_) => {}
    }
    Ok(())
}

async fn run_deployments(
    client: &Client,
    command: DeploymentCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        DeploymentCommand::List => {
            let deployments = client.list_deployments().await?;
            tracing::info!("Loaded {} deployments", deployments.len());
            println!("{}", render_list(&deployments, format)?);
        }
        DeploymentCommand::Get { deployment_id } => {
            let deployment = client.get_deployment_details(&deployment_id).await?;
            println!("{}", render_one(&deployment, format)?);
        }
        DeploymentCommand::Create { file } => {
            let request = read_json(&file).await?;
            let deployment = client.create_deployment(&request).await?;
            println!("{}", render_one(&deployment, format)?);
        }
        DeploymentCommand::Update {
            deployment_id,
            file,
        } => {
            let request = read_json(&file).await?;
            let deployment = client.update_deployment(&deployment_id, &request).await?;
            println!("{}", render_one(&deployment, format)?);
        }
        DeploymentCommand::Delete { deployment_id } => {
            client.delete_deployment(&deployment_id).await?;
            println!("Deleted deployment {}", deployment_id);
        }
    }
    Ok(())
}

async fn run_tokens(client: &Client, command: TokenCommand, format: OutputFormat) -> Result<()> {
    match command {
        TokenCommand::List { deployment_id } => {
            let tokens = client.list_deployment_access_tokens(&deployment_id).await?;
            println!("{}", render_list(&tokens, format)?);
        }
        TokenCommand::Create {
            deployment_id,
            description,
            mode,
            tenant,
        } => {
            let request = AccessTokenCreateRequest {
                mode,
                description,
                tenant_id: tenant,
            };
            let token = client
                .create_deployment_access_token(&deployment_id, &request)
                .await?;
            println!("{}", render_one(&token, format)?);
            eprintln!("Store this secret securely, it is shown in full only on reveal");
        }
        TokenCommand::Reveal {
            deployment_id,
            token_id,
        } => {
            let token = client
                .reveal_deployment_access_token(&deployment_id, &token_id)
                .await?;
            println!("{}", render_one(&token, format)?);
        }
        TokenCommand::Delete {
            deployment_id,
            token_id,
        } => {
            client
                .delete_deployment_access_token(&deployment_id, &token_id)
                .await?;
            println!("Deleted access token {}", token_id);
        }
    }
    Ok(())
}

async fn run_rules(client: &Client, command: RuleCommand, format: OutputFormat) -> Result<()> {
    match command {
        RuleCommand::List { deployment_id } => {
            let names = client.list_deployment_rule_file_names(&deployment_id).await?;
            println!("{}", render_list(&names, format)?);
        }
        RuleCommand::Get {
            deployment_id,
            name,
        } => {
            // Rule files are printed as stored, whatever the output format
            let content = client
                .get_deployment_rule_file_content(&deployment_id, &name)
                .await?;
            print!("{}", content);
        }
        RuleCommand::Put {
            deployment_id,
            name,
            file,
            create,
        } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {:?}", file))?;
            if create {
                client
                    .create_deployment_rule_file_content(&deployment_id, &name, &content)
                    .await?;
                println!("Created rule file {}", name);
            } else {
                client
                    .update_deployment_rule_file_content(&deployment_id, &name, &content)
                    .await?;
                println!("Updated rule file {}", name);
            }
        }
        RuleCommand::Delete {
            deployment_id,
            name,
        } => {
            client
                .delete_deployment_rule_file(&deployment_id, &name)
                .await?;
            println!("Deleted rule file {}", name);
        }
    }
    Ok(())
}

/// Config commands never touch the API
pub fn run_config(command: ConfigCommand, config: &mut Config) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("api_key:  {}", config.masked_api_key());
            println!("base_url: {}", config.effective_base_url(None));
        }
        ConfigCommand::SetKey { api_key } => {
            if api_key.is_empty() {
                anyhow::bail!("API key cannot be empty");
            }
            config.set_api_key(&api_key)?;
            println!("API key saved");
        }
        ConfigCommand::SetUrl { base_url } => {
            // Fail early on URLs the client would reject
            Client::builder("probe").base_url(base_url.as_str()).build()?;
            config.set_base_url(&base_url)?;
            println!("Base URL saved");
        }
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid request in {:?}", path))
}

/// Format an API error for display
pub fn format_api_error(error: &anyhow::Error) -> String {
    let Some(api_error) = error.downcast_ref::<Error>() else {
        return format!("{:#}", error);
    };

    let hint = match api_error.status() {
        Some(401) => Some("Authentication failed. Check your API key."),
        Some(403) => Some("Permission denied for this API key."),
        Some(404) => Some("Resource not found."),
        Some(429) => Some("Rate limit exceeded. Please try again later."),
        Some(409) => Some("Resource conflict. The resource may already exist or be in use."),
        Some(status) if status >= 500 => {
            Some("VictoriaMetrics Cloud temporarily unavailable. Please try again.")
        }
        _ => None,
    };

    match hint {
        Some(hint) => format!("{}\n{}", hint, api_error),
        None => api_error.to_string(),
    }
}
