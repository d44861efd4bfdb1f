use super::{Context, IdArgs};
use crate::api::cloud_accounts::CloudAccountService;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Cloud accounts
    #[command(subcommand)]
    CloudAccounts(CloudAccountsCommand),
}

#[derive(Subcommand, Debug)]
pub enum CloudAccountsCommand {
    /// List cloud accounts
    List,
    /// Show a cloud account
    Show(IdArgs),
}

pub async fn run(command: SettingsCommand, ctx: &Context) -> Result<()> {
    let SettingsCommand::CloudAccounts(command) = command;
    let service = CloudAccountService::new(ctx.concerto());
    match command {
        CloudAccountsCommand::List => ctx.print_list(&service.list_cloud_accounts().await?),
        CloudAccountsCommand::Show(args) => ctx.print_item(&service.get_cloud_account(&args.id).await?),
    }
}
