use super::{Context, CreateArgs, IdArgs, ListArgs, UpdateArgs};
use crate::api::policies::{PolicyAssignmentService, PolicyDefinitionService};
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Policy definitions
    #[command(subcommand)]
    Definitions(DefinitionsCommand),
    /// Policy assignments
    #[command(subcommand)]
    Assignments(AssignmentsCommand),
}

#[derive(Subcommand, Debug)]
pub enum DefinitionsCommand {
    /// List policy definitions
    List(ListArgs),
    /// Show a policy definition
    Show(IdArgs),
    /// Create a policy definition
    Create(CreateArgs),
    /// Update a policy definition
    Update(UpdateArgs),
    /// Delete a policy definition
    Delete(IdArgs),
    /// List the assignments of a definition
    Assignments(IdArgs),
    /// Assign a definition to a cloud account (--set cloud_account_id=...)
    Assign(UpdateArgs),
}

#[derive(Subcommand, Debug)]
pub enum AssignmentsCommand {
    /// Show a policy assignment
    Show(IdArgs),
    /// Update a policy assignment
    Update(UpdateArgs),
    /// Delete a policy assignment
    Delete(IdArgs),
}

pub async fn run(command: PolicyCommand, ctx: &Context) -> Result<()> {
    match command {
        PolicyCommand::Definitions(command) => definitions(command, ctx).await,
        PolicyCommand::Assignments(command) => assignments(command, ctx).await,
    }
}

async fn definitions(command: DefinitionsCommand, ctx: &Context) -> Result<()> {
    let service = PolicyDefinitionService::new(ctx.concerto());
    match command {
        DefinitionsCommand::List(args) => {
            let definitions = service.list_definitions().await?;
            ctx.print_list(&ctx.filter_labels(definitions, &args).await?)
        }
        DefinitionsCommand::Show(args) => ctx.print_item(&service.get_definition(&args.id).await?),
        DefinitionsCommand::Create(args) => {
            let payload = args.payload.wrapped("definition")?;
            ctx.print_item(&service.create_definition(&payload).await?)
        }
        DefinitionsCommand::Update(args) => {
            let payload = args.payload.wrapped("definition")?;
            ctx.print_item(&service.update_definition(&args.id, &payload).await?)
        }
        DefinitionsCommand::Delete(args) => {
            service.delete_definition(&args.id).await?;
            ctx.print_done(&format!("Policy definition {} deleted", args.id));
            Ok(())
        }
        DefinitionsCommand::Assignments(args) => ctx.print_list(&service.list_assignments(&args.id).await?),
        DefinitionsCommand::Assign(args) => {
            let payload = args.payload.wrapped("assignment")?;
            ctx.print_item(&service.create_assignment(&args.id, &payload).await?)
        }
    }
}

async fn assignments(command: AssignmentsCommand, ctx: &Context) -> Result<()> {
    let service = PolicyAssignmentService::new(ctx.concerto());
    match command {
        AssignmentsCommand::Show(args) => ctx.print_item(&service.get_assignment(&args.id).await?),
        AssignmentsCommand::Update(args) => {
            let payload = args.payload.wrapped("assignment")?;
            ctx.print_item(&service.update_assignment(&args.id, &payload).await?)
        }
        AssignmentsCommand::Delete(args) => {
            let deleted = service.delete_assignment(&args.id).await?;
            ctx.print_deleted(deleted, &format!("Assignment {} deleted", args.id))
        }
    }
}
