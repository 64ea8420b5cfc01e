//! Ask command - runs one workflow in-process and prints the answer

use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use super::logging_config;
use crate::Components;
use crate::config::AppConfig;
use crate::domain::approval::ApprovalGateway;
use crate::domain::work_item::InitialInput;
use crate::infrastructure::approval::{AutoApprovalGateway, ConsoleApprovalGateway};
use crate::infrastructure::logging::init_logging;

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Publish the first draft without prompting for review
    #[arg(long)]
    pub auto_approve: bool,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&logging_config(&config));

    let approval: Arc<dyn ApprovalGateway> = if args.auto_approve {
        Arc::new(AutoApprovalGateway)
    } else {
        Arc::new(ConsoleApprovalGateway::stdin())
    };

    let service = Components::from_config(&config)
        .await?
        .agent_service(approval, &config);

    let item = service
        .run_to_completion(InitialInput::from_question(args.question))
        .await?;

    println!(
        "{}",
        item.poll_result()
            .context("Workflow stopped before reaching a terminal state")?
    );
    Ok(())
}
