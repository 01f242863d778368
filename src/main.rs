use anyhow::{Context, Result};
use clap::Parser;
use seaplan::cli::{Cli, Commands};
use seaplan::config::ProjectConfig;
use seaplan::io::output::create_writer;
use seaplan::overlap::PrecomputedOverlap;
use seaplan::report::{build_display, ReportRunner};
use seaplan::sketch::Plan;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            plan,
            config,
            metrics,
            metric_group,
            format,
            output,
        } => {
            let config = ProjectConfig::from_file(&config)
                .with_context(|| format!("loading project config {}", config.display()))?;
            let raw = std::fs::read_to_string(&plan)
                .with_context(|| format!("loading plan {}", plan.display()))?;
            let plan: Plan = serde_json::from_str(&raw).context("parsing plan JSON")?;
            let engine = PrecomputedOverlap::from_file(&metrics)
                .with_context(|| format!("loading metrics {}", metrics.display()))?;

            let runner = ReportRunner::new(&engine, &config);
            let result = runner.run(&metric_group, &plan)?;
            let display = build_display(&result, &config, &metric_group)?;

            let mut writer = create_writer(format, output)?;
            writer.write_report(&result, &display, &config)?;
        }
        Commands::Validate { config } => {
            let path = config.display().to_string();
            ProjectConfig::from_file(&config)
                .with_context(|| format!("validating {path}"))?;
            println!("{path}: OK");
        }
    }

    Ok(())
}
