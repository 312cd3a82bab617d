mod cli;
mod config;
mod error;
mod output;
mod transport;

use std::error::Error;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};
use users_core::{ApiError, Transport, UserStore, UsersClient};

use cli::{Cli, Command};
use config::Config;
use error::{CliError, Result};
use transport::UreqTransport;

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_tracing(verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let base_url = config.resolve_base_url(cli.base_url.as_deref());
    let timeout = config.resolve_timeout(cli.timeout);
    debug!(%base_url, ?timeout, "starting session");

    let transport = UreqTransport::new(timeout);
    let mut store = UserStore::new(UsersClient::new(&base_url));
    store.load(&transport)?;

    execute(&mut store, &transport, cli.command)
}

fn execute<T: Transport>(store: &mut UserStore, transport: &T, command: Command) -> Result<()> {
    match command {
        Command::List => output::print_users(store.users()),
        Command::Show { id, remote: false } => {
            let user = store.get(id).ok_or(CliError::UserNotFound(id))?;
            output::print_user(user);
        }
        Command::Show { id, remote: true } => {
            let client = store.client();
            let response = transport.execute(client.build_get_user(id))?;
            let user = client.parse_get_user(response).map_err(|e| match e {
                ApiError::NotFound => CliError::UserNotFound(id),
                other => CliError::Remote(other),
            })?;
            output::print_user(&user);
        }
        Command::Create(args) => {
            let user = store.create(transport, args.into())?;
            output::print_user(&user);
            print_session_size(store);
        }
        Command::Update(args) => {
            let patch = args.patch();
            if patch.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            let user = store.update(transport, args.id, &patch)?;
            output::print_user(&user);
            print_session_size(store);
        }
        Command::Delete { id } => {
            store.delete(transport, id)?;
            println!("Deleted user {id}.");
            print_session_size(store);
        }
    }
    Ok(())
}

fn print_session_size(store: &UserStore) {
    println!(
        "{} users in this session (the service does not keep changes).",
        store.len()
    );
}
