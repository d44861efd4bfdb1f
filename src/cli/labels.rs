use super::{Context, CreateArgs};
use crate::api::labels::LabelService;
use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum LabelsCommand {
    /// List labels
    List,
    /// Create a label
    Create(CreateArgs),
    /// Tag resources with a label
    Add(AddLabelArgs),
    /// Remove a label from a resource
    Remove(RemoveLabelArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddLabelArgs {
    /// Label id
    #[arg(long)]
    pub id: String,

    /// Type of the tagged resources (server, volume, ...)
    #[arg(long)]
    pub resource_type: String,

    /// Resources to tag
    #[arg(long = "resource-id", required = true, value_delimiter = ',')]
    pub resource_ids: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveLabelArgs {
    /// Label id
    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub resource_type: String,

    #[arg(long)]
    pub resource_id: String,
}

pub async fn run(command: LabelsCommand, ctx: &Context) -> Result<()> {
    let service = LabelService::new(ctx.concerto());
    match command {
        LabelsCommand::List => ctx.print_list(&service.list_labels().await?),
        LabelsCommand::Create(args) => {
            let payload = args.payload.wrapped("label")?;
            ctx.print_item(&service.create_label(&payload).await?)
        }
        LabelsCommand::Add(args) => {
            let resources: Vec<_> = args
                .resource_ids
                .iter()
                .map(|id| json!({"id": id, "resource_type": args.resource_type}))
                .collect();
            let tagged = service.add_label(&args.id, &json!({ "resources": resources })).await?;
            ctx.print_list(&tagged)
        }
        LabelsCommand::Remove(args) => {
            service
                .remove_label(&args.id, &args.resource_type, &args.resource_id)
                .await?;
            ctx.print_done(&format!(
                "Label {} removed from {} {}",
                args.id, args.resource_type, args.resource_id
            ));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{context, mock_json, parse, requests};
    use super::super::Command;
    use super::*;

    #[tokio::test]
    async fn test_add_label_to_several_resources() {
        let mock = mock_json(json!([{"id": "s1", "resource_type": "server"}]));
        let ctx = context(&mock);
        let cli = parse(&[
            "labels",
            "add",
            "--id",
            "l1",
            "--resource-type",
            "server",
            "--resource-id",
            "s1,s2",
        ]);
        match cli.command {
            Command::Labels(command) => run(command, &ctx).await.unwrap(),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(requests(&mock), vec![("POST", "/labels/l1/resources".to_string())]);
        assert_eq!(
            mock.last_call().payload,
            Some(json!({"resources": [
                {"id": "s1", "resource_type": "server"},
                {"id": "s2", "resource_type": "server"}
            ]}))
        );
    }

    #[tokio::test]
    async fn test_remove_label() {
        let mock = mock_json(json!({}));
        let ctx = context(&mock);
        let cli = parse(&[
            "labels",
            "remove",
            "--id",
            "l1",
            "--resource-type",
            "server",
            "--resource-id",
            "s1",
        ]);
        match cli.command {
            Command::Labels(command) => run(command, &ctx).await.unwrap(),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(
            requests(&mock),
            vec![("DELETE", "/labels/l1/resources/server/s1".to_string())]
        );
    }
}
