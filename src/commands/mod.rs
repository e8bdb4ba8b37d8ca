//! Command dispatch and handlers.
//!
//! Handlers return the text to print so they can be tested without
//! capturing stdout.

pub mod create;
pub mod generate;
pub mod kinds;
pub mod list;
pub mod retire;
pub mod validate;

use std::env;
use std::path::Path;

use tracing::debug;

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command, RequestArgs};
use crate::code::{EntityKind, GenerationRequest, Scope};
use crate::config::Config;
use crate::context::ServiceContext;

/// Directory that receives a cassette of every port call when set.
pub const RECORD_ENV: &str = "SCHOOLCODE_RECORD";

/// Dispatch a parsed command line to its handler.
///
/// `kinds` and `validate` never touch the registry. Other commands open
/// the configured SQLite registry, or replay `--replay`. When
/// `SCHOOLCODE_RECORD` names a directory, every port call of a live run is
/// written to a cassette there.
///
/// # Errors
///
/// Returns an error string if configuration, the registry, or the handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let output = if needs_registry(&cli.command) {
        dispatch_with_registry(cli)?
    } else {
        dispatch_offline(&cli.command)?
    };
    print!("{output}");
    Ok(())
}

const fn needs_registry(command: &Command) -> bool {
    !matches!(command, Command::Kinds | Command::Validate { .. })
}

fn dispatch_offline(command: &Command) -> Result<String, String> {
    match command {
        Command::Kinds => Ok(kinds::run()),
        Command::Validate { kind, code } => validate::run(*kind, code),
        _ => Err("command needs a registry".to_string()),
    }
}

fn dispatch_with_registry(cli: &Cli) -> Result<String, String> {
    let config = load_config(cli)?;

    let ctx = if let Some(cassette) = &cli.replay {
        debug!(cassette = %cassette.display(), "replaying session");
        ServiceContext::replaying(cassette)?
    } else {
        ServiceContext::live(&config.store).map_err(|e| e.to_string())?
    };

    let session = match env::var(RECORD_ENV) {
        Ok(dir) if !dir.is_empty() && cli.replay.is_none() => {
            Some(RecordingSession::new(Path::new(&dir), command_name(&cli.command))?)
        }
        _ => None,
    };
    let ctx = match &session {
        Some(session) => ctx.recording(&session.recorder()),
        None => ctx,
    };

    let result = dispatch_with_context(&cli.command, &ctx, &config);

    // Finish recording after the command completes, even on error.
    if let Some(session) = session {
        // Drop the context first to release the recorder handles.
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Runs `command` against `ctx`.
///
/// # Errors
///
/// Returns the handler's error message.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<String, String> {
    let max_attempts = config.generator.max_attempts;
    match command {
        Command::Kinds => Ok(kinds::run()),
        Command::Validate { kind, code } => validate::run(*kind, code),
        Command::Generate { kind, input, seed } => {
            generate::run(ctx, max_attempts, &build_request(*kind, input, *seed)?)
        }
        Command::Create { kind, input, label } => {
            create::run(ctx, max_attempts, &build_request(*kind, input, None)?, label.as_deref())
        }
        Command::List { kind, tenant } => list::run(ctx, *kind, tenant.as_deref()),
        Command::Retire { kind, code, tenant } => {
            retire::run(ctx, *kind, code, &scope_for(*kind, tenant.as_deref())?)
        }
    }
}

/// Loads layered configuration and applies `--db`.
fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(db) = &cli.db {
        config.store.path.clone_from(db);
    }
    Ok(config)
}

/// Uniqueness scope implied by `kind` and `--tenant`.
///
/// # Errors
///
/// Tenant-scoped kinds need a tenant. Globally unique kinds reject one.
pub fn scope_for(kind: EntityKind, tenant: Option<&str>) -> Result<Scope, String> {
    match (kind.is_tenant_scoped(), tenant.map(str::trim)) {
        (true, Some(tenant)) if !tenant.is_empty() => Ok(Scope::tenant(tenant)),
        (true, _) => Err(format!("{kind} codes are unique per school, pass --tenant")),
        (false, None) => Ok(Scope::Global),
        (false, Some(_)) => {
            Err(format!("{kind} codes are unique across all schools, --tenant does not apply"))
        }
    }
}

fn build_request(
    kind: EntityKind,
    input: &RequestArgs,
    seed: Option<u64>,
) -> Result<GenerationRequest, String> {
    let mut request = GenerationRequest::new(kind).scope(scope_for(kind, input.tenant.as_deref())?);
    for (name, value) in &input.attributes {
        request = request.attribute(name.as_str(), value.as_str());
    }
    if let Some(seed) = seed {
        request = request.seed(seed);
    }
    Ok(request)
}

const fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Kinds => "kinds",
        Command::Generate { .. } => "generate",
        Command::Create { .. } => "create",
        Command::Validate { .. } => "validate",
        Command::List { .. } => "list",
        Command::Retire { .. } => "retire",
    }
}

/// Finish a recording session and report the cassette path.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let path = session.finish()?;
    eprintln!("Recording saved to: {}", path.display());
    Ok(())
}
