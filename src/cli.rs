use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::Config;
use crate::github::GitHubClient;
use crate::pipeline::{self, AnalysisOutcome, PushedReport};

#[derive(Parser)]
#[command(name = "failtrace")]
#[command(author, version, about = "GitHub Actions Failure Extractor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the most recent failing run of a workflow
    Analyze {
        #[arg(short, long, env = "GITHUB_TOKEN")]
        token: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(short = 'R', long)]
        repo: Option<String>,

        #[arg(short, long)]
        workflow: Option<String>,
    },

    /// Validate and acknowledge a relayed failure notification
    Ingest {
        /// JSON notification file; reads stdin when absent
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    async fn execute_analyze(
        &self,
        token: &Option<String>,
        url: &Option<String>,
        repo: &Option<String>,
        workflow: &Option<String>,
    ) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        let repo_path = repo
            .clone()
            .or(config.github.repo_path)
            .ok_or_else(|| anyhow::anyhow!("Repository is required (--repo or config file)"))?;
        let workflow = workflow
            .clone()
            .or(config.github.workflow)
            .ok_or_else(|| anyhow::anyhow!("Workflow is required (--workflow or config file)"))?;

        let parts: Vec<&str> = repo_path.split('/').collect();
        if parts.len() != 2 {
            anyhow::bail!("Repository must be in format 'owner/repo'");
        }
        let (owner, repo_name) = (parts[0], parts[1]);

        let token = token
            .clone()
            .or(config.github.token)
            .map(Token::from);
        let base_url = url.clone().unwrap_or(config.github.base_url);

        info!("Analyzing workflow '{workflow}' in repository: {repo_path}");

        let client = GitHubClient::new(
            &base_url,
            owner.to_string(),
            repo_name.to_string(),
            token,
        )?;

        match pipeline::analyze_workflow(&client, &workflow).await? {
            AnalysisOutcome::NoFailingRun => {
                info!("Workflow '{workflow}' has no failing runs");
                self.emit(&serde_json::json!({
                    "status": "no_failing_run",
                    "workflow": workflow,
                }))
            }
            AnalysisOutcome::Analyzed(result) => self.emit(&result),
        }
    }

    fn execute_ingest(&self, file: &Option<PathBuf>) -> Result<()> {
        let body = match file {
            Some(path) => std::fs::read_to_string(path)?,
            None => std::io::read_to_string(std::io::stdin())?,
        };

        let report: PushedReport = serde_json::from_str(&body)?;
        let ack = pipeline::receive_report(&report)?;

        self.emit(&ack)
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Result written to: {}", output_path.display());
        } else {
            println!("{}", json_output);
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Analyze {
                token,
                url,
                repo,
                workflow,
            } => self.execute_analyze(token, url, repo, workflow).await,
            Commands::Ingest { file } => self.execute_ingest(file),
        }
    }
}
