//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction, KeysAction, SystemAction};
use crate::commands::{self, Context};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load(cli.credentials_file.clone(), cli.verbose)?;

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(&ctx, args).await,
        Commands::Keys { action } => route_keys(&ctx, action).await,
        Commands::System { action } => route_system(&ctx, action).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx),
        },
    }
}

async fn route_keys(ctx: &Context, action: KeysAction) -> anyhow::Result<()> {
    match action {
        KeysAction::List => commands::keys::list(ctx).await,
        KeysAction::Add {
            secret,
            owner,
            global,
            label,
        } => commands::keys::add(ctx, secret, owner, global, label).await,
        KeysAction::Revoke { id } => commands::keys::revoke(ctx, &id).await,
        KeysAction::Enable { id } => commands::keys::enable(ctx, &id).await,
    }
}

async fn route_system(ctx: &Context, action: SystemAction) -> anyhow::Result<()> {
    match action {
        SystemAction::SetKey { secret } => commands::system::set_key(ctx, secret).await,
        SystemAction::ClearKey => commands::system::clear_key(ctx).await,
        SystemAction::Show => commands::system::show(ctx).await,
    }
}
