//! `buidl` command-line client.
//!
//! Reads need nothing but a base URL. Writes either sign with the key in
//! `BUIDL_SIGNER_PRIVATE_KEY` (or the configured variable) or submit a
//! signature produced elsewhere via `--signature` and `--caller`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use buidl_client::api::{
    github_readme_url_from_branch_url, BuilderRole, ChallengeParams, ChallengeRequest, MessageId,
    MutationRequest, ReadClient, SignedMutation, SignedWriteClient, SocialLinks,
};
use buidl_client::config::{load_config, validation::validate_config, ClientConfig, ConfigError};
use buidl_client::observability::logging::init_logging;
use buidl_client::resilience::with_deadline;
use buidl_client::{ReqwestTransport, Wallet};

#[derive(Parser)]
#[command(name = "buidl")]
#[command(about = "Client for the build gallery API", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `api.base_url`.
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Abort the whole command after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Signature produced off-device. Without it the configured wallet signs.
#[derive(Args, Debug)]
struct OffDeviceSignature {
    /// Signature over the challenge message.
    #[arg(long, requires = "caller")]
    signature: Option<String>,

    /// Address the signature belongs to.
    #[arg(long, requires = "signature")]
    caller: Option<String>,
}

#[derive(Args, Debug)]
struct SocialArgs {
    #[arg(long)]
    twitter: Option<String>,
    #[arg(long)]
    github: Option<String>,
    #[arg(long)]
    discord: Option<String>,
    #[arg(long)]
    telegram: Option<String>,
    #[arg(long)]
    instagram: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    youtube: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl From<SocialArgs> for SocialLinks {
    fn from(args: SocialArgs) -> Self {
        SocialLinks {
            twitter: args.twitter,
            github: args.github,
            discord: args.discord,
            telegram: args.telegram,
            instagram: args.instagram,
            linkedin: args.linkedin,
            youtube: args.youtube,
            email: args.email,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List recent events
    Events {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List builds
    Builds {
        /// Only featured builds
        #[arg(long)]
        featured: bool,
    },
    /// List draft builds visible to an address
    Drafts { address: String },
    /// Print the raw README URL for a GitHub branch URL
    ReadmeUrl { branch_url: String },
    /// Fetch a challenge message without submitting anything
    Challenge {
        /// buildDelete, buildFeature, builderCreate or builderUpdateSocials
        message_id: MessageId,
        address: String,
        #[arg(long)]
        build_id: Option<String>,
        #[arg(long)]
        featured: Option<bool>,
        #[arg(long)]
        builder_address: Option<String>,
    },
    /// Delete a build
    DeleteBuild {
        build_id: String,
        #[command(flatten)]
        sig: OffDeviceSignature,
    },
    /// Feature or unfeature a build
    FeatureBuild {
        build_id: String,
        /// Address of the build's author
        user_address: String,
        #[arg(long)]
        unfeature: bool,
        #[command(flatten)]
        sig: OffDeviceSignature,
    },
    /// Create a builder account
    CreateBuilder {
        builder_address: String,
        #[arg(long, default_value = "builder")]
        role: BuilderRole,
        #[arg(long)]
        function: String,
        #[command(flatten)]
        sig: OffDeviceSignature,
    },
    /// Update the caller's social links
    UpdateSocials {
        #[command(flatten)]
        socials: SocialArgs,
        #[command(flatten)]
        sig: OffDeviceSignature,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability)?;

    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let transport = ReqwestTransport::from_config(&config.api)?;
    let run = run(cli.command, &config, transport);

    match cli.timeout_secs {
        Some(secs) => with_deadline(Duration::from_secs(secs), run).await??,
        None => run.await?,
    }

    Ok(())
}

async fn run(command: Commands, config: &ClientConfig, transport: ReqwestTransport) -> anyhow::Result<()> {
    let reads = ReadClient::new(transport.clone()).with_address_header(&config.api.address_header);
    let writes = SignedWriteClient::new(transport).with_address_header(&config.api.address_header);

    match command {
        Commands::Events { limit } => print_json(&reads.get_all_events(limit).await)?,
        Commands::Builds { featured } => {
            let builds = if featured {
                reads.get_featured_builds().await
            } else {
                reads.get_all_builds(None).await
            };
            print_json(&builds)?;
        }
        Commands::Drafts { address } => print_json(&reads.get_draft_builds(&address).await?)?,
        Commands::ReadmeUrl { branch_url } => {
            println!("{}", github_readme_url_from_branch_url(&branch_url));
        }
        Commands::Challenge {
            message_id,
            address,
            build_id,
            featured,
            builder_address,
        } => {
            let params = challenge_params(message_id, build_id, featured, builder_address)?;
            let challenge = writes
                .request_challenge(&ChallengeRequest::new(address, params))
                .await?;
            println!("{}", challenge.message());
        }
        Commands::DeleteBuild { build_id, sig } => {
            submit(&writes, config, sig, MutationRequest::DeleteBuild { build_id }).await?;
            println!("Build deleted");
        }
        Commands::FeatureBuild {
            build_id,
            user_address,
            unfeature,
            sig,
        } => {
            let request = MutationRequest::FeatureBuild {
                user_address,
                build_id,
                featured: !unfeature,
            };
            submit(&writes, config, sig, request).await?;
            println!("Build {}", if unfeature { "unfeatured" } else { "featured" });
        }
        Commands::CreateBuilder {
            builder_address,
            role,
            function,
            sig,
        } => {
            let request = MutationRequest::CreateBuilder {
                builder_address,
                builder_role: role,
                builder_function: function,
            };
            submit(&writes, config, sig, request).await?;
            println!("Builder created");
        }
        Commands::UpdateSocials { socials, sig } => {
            let social_links = SocialLinks::from(socials);
            if social_links.is_empty() {
                anyhow::bail!("at least one social link is required");
            }
            submit(&writes, config, sig, MutationRequest::UpdateSocials { social_links }).await?;
            println!("Socials updated");
        }
    }

    Ok(())
}

fn challenge_params(
    message_id: MessageId,
    build_id: Option<String>,
    featured: Option<bool>,
    builder_address: Option<String>,
) -> anyhow::Result<ChallengeParams> {
    let params = match message_id {
        MessageId::BuildDelete => ChallengeParams::BuildDelete {
            build_id: build_id.context("--build-id is required for buildDelete")?,
        },
        MessageId::BuildFeature => ChallengeParams::BuildFeature {
            build_id: build_id.context("--build-id is required for buildFeature")?,
            featured: featured.context("--featured is required for buildFeature")?,
        },
        MessageId::BuilderCreate => ChallengeParams::BuilderCreate {
            builder_address: builder_address
                .context("--builder-address is required for builderCreate")?,
        },
        MessageId::BuilderUpdateSocials => ChallengeParams::BuilderUpdateSocials,
    };
    Ok(params)
}

async fn submit(
    writes: &SignedWriteClient<ReqwestTransport>,
    config: &ClientConfig,
    sig: OffDeviceSignature,
    request: MutationRequest,
) -> anyhow::Result<()> {
    match (sig.signature, sig.caller) {
        (Some(signature), Some(caller)) => {
            writes
                .submit_signed_mutation(&SignedMutation::new(caller, signature, request))
                .await?
        }
        _ => {
            let wallet = Wallet::from_env_var(&config.signer.private_key_env)?;
            writes.sign_and_submit(&wallet, request).await?
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
