//! Tryon - virtual try-on CLI over Gemini image models.

mod adapters;
mod cassette;
mod cli;
mod codec;
mod config;
mod context;
mod error;
mod gateway;
mod history;
mod model;
mod output;
mod params;
mod ports;
mod presets;
mod prompts;
mod session;
#[cfg(test)]
mod testing;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Edit};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::TryOnError;
use crate::gateway::Gateway;
use crate::history::OutfitLayer;
use crate::model::{resolve_model, validate_model, DEFAULT_MODEL};
use crate::output::{resolve_output_path, save_history, save_image};
use crate::params::OutputFormat;
use crate::session::Session;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tryon=debug" } else { "tryon=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), TryOnError> {
    if cli.list_presets {
        print!("{}", presets::listing());
        return Ok(());
    }

    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(TryOnError::Config)?;

    // Resolve model and output format
    let requested = cli
        .model
        .clone()
        .or_else(|| config.defaults.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let model = resolve_model(&requested);
    validate_model(&model).map_err(TryOnError::InvalidArgument)?;
    let format = cli.format.or(config.defaults.format).unwrap_or_default();
    tracing::debug!(%model, %requested, ?format, "resolved parameters");

    let (Some(person_source), Some(garment_source)) = (cli.person.as_deref(), cli.garment.as_deref())
    else {
        return Err(TryOnError::InvalidArgument(
            "Provide a person photo and a garment photo".into(),
        ));
    };

    // Create context based on mode (live / recording / replaying)
    let (ctx, recording) = ServiceContext::from_env(&config)?;
    let gateway = Gateway::new(ctx.generator, model);

    let mut session = Session::new();
    let result = run_session(&cli, &gateway, &mut session, person_source, garment_source).await;

    // The recorder can only be unwrapped once the gateway has let go of it.
    drop(gateway);
    if let Some(recording) = recording {
        match recording.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    if let Err(e) = result {
        // Keep the looks that succeeded before the failing edit.
        if session.current_image().is_some() {
            save_outputs(&cli, &session, format)?;
        }
        return Err(e);
    }
    if let Some(image) = session.current_image() {
        if cli.print_data_url {
            println!("{}", image.to_data_url());
        }
    }
    save_outputs(&cli, &session, format)?;
    session.reset();
    Ok(())
}

async fn run_session(
    cli: &Cli,
    gateway: &Gateway,
    session: &mut Session,
    person_source: &str,
    garment_source: &str,
) -> Result<(), TryOnError> {
    let person = codec::load_image(person_source).await?;
    let garment = codec::load_image(garment_source).await?;

    tracing::info!(model = gateway.model(), edits = cli.edits.len(), "starting session");
    if cli.restage {
        session.initial_generate_restaged(gateway, person, &garment).await?;
    } else {
        session.initial_generate(gateway, person, &garment).await?;
    }
    log_state(session);

    for edit in &cli.edits {
        apply_edit(session, gateway, edit).await?;
        log_state(session);
    }
    Ok(())
}

async fn apply_edit(
    session: &mut Session,
    gateway: &Gateway,
    edit: &Edit,
) -> Result<(), TryOnError> {
    match edit {
        Edit::Garment(path) => {
            let garment = codec::encode_file(path).await?;
            let label = path.file_name().map_or_else(
                || path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            session.try_on(gateway, &garment, &label).await
        }
        Edit::Pose(input) => {
            let (label, pose) = presets::resolve(presets::POSES, input);
            session.change_pose(gateway, pose, label).await
        }
        Edit::Remix(input) => {
            let (label, instruction) = presets::resolve(presets::REMIXES, input);
            session.remix(gateway, instruction, label).await
        }
        Edit::Undo => {
            if !session.undo() {
                tracing::warn!("nothing to undo");
            }
            Ok(())
        }
    }
}

fn save_outputs(cli: &Cli, session: &Session, format: OutputFormat) -> Result<(), TryOnError> {
    let image = session.current_image().ok_or(TryOnError::NoActiveLook)?;
    let label = session.history().last().map_or("try-on", OutfitLayer::description);

    let output_path = resolve_output_path(cli.output.as_deref(), label, format);
    save_image(image, format, &output_path)?;
    eprintln!("Saved: {}", output_path.display());

    if let Some(dir) = &cli.history_dir {
        let written = save_history(dir, session, format)?;
        eprintln!("Saved {} history image(s) to {}", written.len(), dir.display());
    }
    Ok(())
}

fn log_state(session: &Session) {
    tracing::debug!(
        phase = ?session.phase(),
        layers = session.history().len(),
        can_undo = session.can_undo(),
        loading = session.is_loading(),
        loading_message = session.loading_message(),
        error = session.error(),
        has_original = session.user_original_image().is_some(),
        "session state"
    );
}
