use nuget_meta::{MetaConfig, all_valid, check_projects};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = MetaConfig::env_path();
    let config = match MetaConfig::load_or_default(config_path.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("nuget-meta: {}", e);
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &config_path {
        tracing::debug!("Loaded configuration from {}", path.display());
    }

    let project_dirs: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if project_dirs.is_empty() {
        eprintln!("usage: nuget-meta <project-dir>...");
        return ExitCode::from(2);
    }

    let checks = check_projects(&config, &project_dirs).await;
    for check in &checks {
        println!("{}: {}", check.project_dir.display(), check.outcome);
    }

    let valid = checks.iter().filter(|c| c.outcome.is_valid()).count();
    tracing::info!("Checked {} projects, {} valid", checks.len(), valid);

    if all_valid(&checks) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
