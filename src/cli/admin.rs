use super::{Context, IdArgs};
use crate::api::admin::ReportService;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Usage reports
    #[command(subcommand)]
    Reports(ReportsCommand),
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    /// List reports
    List,
    /// Show a report
    Show(IdArgs),
}

pub async fn run(command: AdminCommand, ctx: &Context) -> Result<()> {
    let AdminCommand::Reports(command) = command;
    let service = ReportService::new(ctx.concerto());
    match command {
        ReportsCommand::List => ctx.print_list(&service.list_reports().await?),
        ReportsCommand::Show(args) => ctx.print_item(&service.get_report(&args.id).await?),
    }
}
