use super::{Context, CreateArgs, IdArgs, ListArgs};
use crate::api::cloud_applications::{
    CloudApplicationDeploymentService, CloudApplicationDeploymentTask, CloudApplicationTemplateService,
};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use std::time::Duration;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Subcommand, Debug)]
pub enum CloudApplicationsCommand {
    /// Cloud application templates
    #[command(subcommand)]
    Templates(TemplatesCommand),
    /// Cloud application deployments
    #[command(subcommand)]
    Deployments(DeploymentsCommand),
}

#[derive(Subcommand, Debug)]
pub enum TemplatesCommand {
    /// List templates
    List(ListArgs),
    /// Show a template
    Show(IdArgs),
    /// Register a template
    Create(CreateArgs),
    /// Delete a template
    Delete(IdArgs),
    /// Re-read the inputs declared by a template
    ParseMetadata(IdArgs),
}

/// Seconds to wait for the deployment task to finish
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    #[arg(long, value_name = "SECS")]
    pub wait: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    #[command(flatten)]
    pub create: CreateArgs,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteDeploymentArgs {
    /// Deployment id
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Subcommand, Debug)]
pub enum DeploymentsCommand {
    /// List deployments
    List(ListArgs),
    /// Show a deployment
    Show(IdArgs),
    /// Deploy a template (--set cat_id=... --set name=...)
    Deploy(DeployArgs),
    /// Delete a deployment
    Delete(DeleteDeploymentArgs),
    /// Show a deployment task
    Task(IdArgs),
}

pub async fn run(command: CloudApplicationsCommand, ctx: &Context) -> Result<()> {
    match command {
        CloudApplicationsCommand::Templates(command) => templates(command, ctx).await,
        CloudApplicationsCommand::Deployments(command) => deployments(command, ctx).await,
    }
}

async fn templates(command: TemplatesCommand, ctx: &Context) -> Result<()> {
    let service = CloudApplicationTemplateService::new(ctx.concerto());
    match command {
        TemplatesCommand::List(args) => {
            let templates = service.list_templates().await?;
            ctx.print_list(&ctx.filter_labels(templates, &args).await?)
        }
        TemplatesCommand::Show(args) => ctx.print_item(&service.get_template(&args.id).await?),
        TemplatesCommand::Create(args) => {
            let payload = args.payload.wrapped("cat")?;
            ctx.print_item(&service.create_template(&payload).await?)
        }
        TemplatesCommand::Delete(args) => {
            service.delete_template(&args.id).await?;
            ctx.print_done(&format!("Template {} deleted", args.id));
            Ok(())
        }
        TemplatesCommand::ParseMetadata(args) => ctx.print_item(&service.parse_metadata(&args.id).await?),
    }
}

async fn deployments(command: DeploymentsCommand, ctx: &Context) -> Result<()> {
    let service = CloudApplicationDeploymentService::new(ctx.concerto());
    match command {
        DeploymentsCommand::List(args) => {
            let deployments = service.list_deployments().await?;
            ctx.print_list(&ctx.filter_labels(deployments, &args).await?)
        }
        DeploymentsCommand::Show(args) => ctx.print_item(&service.get_deployment(&args.id).await?),
        DeploymentsCommand::Deploy(args) => {
            let payload = args.create.payload.wrapped("deployment_task")?;
            let task = service.deploy(&payload).await?;
            let task = maybe_wait(&service, task, &args.wait).await?;
            ctx.print_item(&task)
        }
        DeploymentsCommand::Delete(args) => match service.delete_deployment(&args.id).await? {
            Some(task) => ctx.print_item(&maybe_wait(&service, task, &args.wait).await?),
            None => {
                ctx.print_done(&format!("Deployment {} deleted", args.id));
                Ok(())
            }
        },
        DeploymentsCommand::Task(args) => ctx.print_item(&service.get_deployment_task(&args.id).await?),
    }
}

async fn maybe_wait(
    service: &CloudApplicationDeploymentService<'_>,
    task: CloudApplicationDeploymentTask,
    args: &WaitArgs,
) -> Result<CloudApplicationDeploymentTask> {
    match args.wait {
        Some(secs) => wait_for_task(service, task, Duration::from_secs(secs), POLL_INTERVAL).await,
        None => Ok(task),
    }
}

/// Poll a task until it leaves the pending/running states
async fn wait_for_task(
    service: &CloudApplicationDeploymentService<'_>,
    mut task: CloudApplicationDeploymentTask,
    timeout: Duration,
    interval: Duration,
) -> Result<CloudApplicationDeploymentTask> {
    let deadline = Instant::now() + timeout;

    while !task.is_finished() {
        let now = Instant::now();
        if now >= deadline {
            bail!(
                "timed out after {}s waiting for task {} (state: {})",
                timeout.as_secs(),
                task.id,
                task.state
            );
        }
        // Never sleep past the deadline
        tokio::time::sleep(interval.min(deadline - now)).await;
        task = service.get_deployment_task(&task.id).await?;
        tracing::debug!("task {} is {}", task.id, task.state);
    }

    if task.is_failed() {
        bail!("task {} failed: {}", task.id, task.error_message);
    }
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{context, mock_json, parse, requests};
    use super::super::Command;
    use super::*;
    use serde_json::json;

    fn task(state: &str) -> CloudApplicationDeploymentTask {
        CloudApplicationDeploymentTask {
            id: "t1".to_string(),
            state: state.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_deploy_without_wait_does_not_poll() {
        let mock = mock_json(json!({"id": "t1", "state": "pending"}));
        let ctx = context(&mock);
        let cli = parse(&[
            "cloud-applications",
            "deployments",
            "deploy",
            "--set",
            "cat_id=cat1",
            "--set",
            "name=blog",
        ]);
        match cli.command {
            Command::CloudApplications(command) => run(command, &ctx).await.unwrap(),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(
            requests(&mock),
            vec![("POST", "/plugins/tosca/deployment_tasks".to_string())]
        );
    }

    #[tokio::test]
    async fn test_wait_returns_finished_task_immediately() {
        let mock = mock_json(json!({}));
        let service = CloudApplicationDeploymentService::new(mock.as_ref());
        let done = wait_for_task(&service, task("finished"), Duration::from_secs(1), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(done.state, "finished");
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wait_polls_until_finished() {
        let mock = mock_json(json!({"id": "t1", "state": "finished"}));
        let service = CloudApplicationDeploymentService::new(mock.as_ref());
        let done = wait_for_task(&service, task("running"), Duration::from_secs(5), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(done.state, "finished");
        assert_eq!(
            requests(&mock),
            vec![("GET", "/plugins/tosca/deployment_tasks/t1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let mock = mock_json(json!({"id": "t1", "state": "running"}));
        let service = CloudApplicationDeploymentService::new(mock.as_ref());
        let err = wait_for_task(
            &service,
            task("running"),
            Duration::from_millis(20),
            Duration::from_millis(5),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(!mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wait_does_not_overrun_deadline() {
        let mock = mock_json(json!({"id": "t1", "state": "running"}));
        let service = CloudApplicationDeploymentService::new(mock.as_ref());
        let started = std::time::Instant::now();
        let err = wait_for_task(
            &service,
            task("running"),
            Duration::from_millis(50),
            Duration::from_secs(30),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_task_is_error() {
        let mock = mock_json(json!({"id": "t1", "state": "failed", "error_message": "quota exceeded"}));
        let service = CloudApplicationDeploymentService::new(mock.as_ref());
        let err = wait_for_task(&service, task("pending"), Duration::from_secs(5), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "task t1 failed: quota exceeded");
    }
}
