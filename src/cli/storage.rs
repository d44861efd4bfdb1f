use super::{Context, CreateArgs, IdArgs, ListArgs, UpdateArgs};
use crate::api::volumes::VolumeService;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum StorageCommand {
    /// Volumes
    #[command(subcommand)]
    Volumes(VolumesCommand),
    /// Storage plans
    #[command(subcommand)]
    Plans(PlansCommand),
}

#[derive(Subcommand, Debug)]
pub enum VolumesCommand {
    /// List volumes
    List(ListArgs),
    /// Show a volume
    Show(IdArgs),
    /// Create a volume
    Create(CreateArgs),
    /// Update a volume
    Update(UpdateArgs),
    /// Attach a volume to a server (--set attached_server_id=...)
    Attach(UpdateArgs),
    /// Detach a volume from its server
    Detach(IdArgs),
    /// Delete a volume
    Delete(IdArgs),
    /// Delete a volume from Concerto only, leaving the cloud resource
    Discard(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum PlansCommand {
    /// Show a storage plan
    Show(IdArgs),
}

pub async fn run(command: StorageCommand, ctx: &Context) -> Result<()> {
    let service = VolumeService::new(ctx.concerto());
    match command {
        StorageCommand::Volumes(command) => match command {
            VolumesCommand::List(args) => {
                let volumes = service.list_volumes().await?;
                ctx.print_list(&ctx.filter_labels(volumes, &args).await?)
            }
            VolumesCommand::Show(args) => ctx.print_item(&service.get_volume(&args.id).await?),
            VolumesCommand::Create(args) => {
                let payload = args.payload.wrapped("volume")?;
                ctx.print_item(&service.create_volume(&payload).await?)
            }
            VolumesCommand::Update(args) => {
                let payload = args.payload.wrapped("volume")?;
                ctx.print_item(&service.update_volume(&args.id, &payload).await?)
            }
            VolumesCommand::Attach(args) => {
                let payload = args.payload.wrapped("volume")?;
                ctx.print_item(&service.attach_volume(&args.id, &payload).await?)
            }
            VolumesCommand::Detach(args) => {
                service.detach_volume(&args.id).await?;
                ctx.print_done(&format!("Volume {} detached", args.id));
                Ok(())
            }
            VolumesCommand::Delete(args) => {
                service.delete_volume(&args.id).await?;
                ctx.print_done(&format!("Volume {} deleted", args.id));
                Ok(())
            }
            VolumesCommand::Discard(args) => {
                service.discard_volume(&args.id).await?;
                ctx.print_done(&format!("Volume {} discarded", args.id));
                Ok(())
            }
        },
        StorageCommand::Plans(PlansCommand::Show(args)) => {
            ctx.print_item(&service.get_storage_plan(&args.id).await?)
        }
    }
}
