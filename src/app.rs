//! Run one parsed command to completion.

use tracing::info;

use crate::batch::{quick_render, run_batch};
use crate::catalog;
use crate::cli::{Command, ListArgs};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::Visibility;
use crate::prompt::Prompter;

/// Parse `args`, load the stored key and execute the command.
///
/// `-a` runs before the credentials file is read, so a file the parser
/// rejects can still be repaired from the command line.
pub async fn run<S: AsRef<str>>(
    config: &mut AppConfig,
    args: &[S],
    prompter: &dyn Prompter,
) -> Result<()> {
    let command = Command::parse(args)?;
    if !matches!(command, Command::StoreApiKey(_)) {
        config.load_api_key()?;
    }
    execute(command, config, prompter).await
}

/// Execute `command`. Errors are returned to the caller, which owns the exit code.
///
/// Storing the API key is the only command that works without a valid key.
pub async fn execute(command: Command, config: &AppConfig, prompter: &dyn Prompter) -> Result<()> {
    let client = || config.client();
    let limit = config.list_limit;

    match command {
        Command::StoreApiKey(key) => {
            config.credentials.store_api_key(&key)?;
        }
        Command::Batch => {
            run_batch(&client()?, config, prompter).await?;
        }
        Command::List(ListArgs::Limit(n)) => {
            catalog::list(&client()?, n.unwrap_or(limit), None).await?;
        }
        Command::List(ListArgs::Filtered(filter)) => {
            info!("filtering by \"{}\"", filter.as_str());
            catalog::list(&client()?, limit, Some(filter)).await?;
        }
        Command::Inspect(target) => {
            catalog::inspect(&client()?, limit, &target).await?;
        }
        Command::InspectRaw(target) => {
            let raw = catalog::inspect_raw(&client()?, limit, &target).await?;
            println!("{raw}");
        }
        Command::Rename { target, title } => {
            catalog::rename(&client()?, limit, &target, &title).await?;
        }
        Command::Delete(target) => {
            catalog::delete(&client()?, limit, &target, prompter).await?;
        }
        Command::Download(target) => {
            catalog::download(&client()?, limit, &target, &config.downloads_dir).await?;
        }
        Command::Publish(target) => {
            catalog::publish(&client()?, limit, &target).await?;
        }
        Command::MakePrivate(target) => {
            catalog::set_visibility(&client()?, limit, &target, Visibility::Private).await?;
        }
        Command::QuickRender { title, script } => {
            quick_render(&client()?, config, &title, script.as_deref()).await?;
        }
    }

    Ok(())
}
