use anyhow::Result;
use clap::Parser;
use email_responder::cli::{self, Cli, Commands};
use email_responder::config::Config;
use email_responder::interactive::ChatSession;
use email_responder::loader::ModelBundle;
use email_responder::responder::Responder;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: email-responder --help");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with level based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("email_responder=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("email_responder=info,warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    match &cli.command {
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Config file {:?} already exists (use --force to overwrite)",
                    output
                );
            }
            Config::create_example(output).await?;
            println!("Wrote example configuration to {:?}", output);
            Ok(())
        }

        Commands::Interactive { model } => {
            let (config, models) = startup(&cli).await?;
            let mut session = ChatSession::new(models, Responder::new(&config), *model);
            session.run()?;
            Ok(())
        }

        Commands::Classify {
            subject,
            body,
            model,
            json,
        } => {
            let (config, models) = startup(&cli).await?;
            let family = model.unwrap_or(config.models.default_family);
            let responder = Responder::new(&config);

            let outcome = responder.respond(models.classifier(family), subject, body)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                cli::print_outcome(&outcome);
            }
            Ok(())
        }

        Commands::Models => {
            let (_, models) = startup(&cli).await?;
            cli::print_models(&models);
            Ok(())
        }
    }
}

/// Load configuration and every model; any failure aborts startup
async fn startup(cli: &Cli) -> Result<(Config, Arc<ModelBundle>)> {
    let config = Config::load(&cli.config).await?;
    let model_dir = cli
        .model_dir
        .clone()
        .unwrap_or_else(|| config.models.dir.clone());

    tracing::info!("Email responder starting (models: {:?})", model_dir);
    let models = cli::load_bundle(&model_dir).await?;
    Ok((config, models))
}
