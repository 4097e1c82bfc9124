use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{CommandFactory, FromArgMatches};
use log::{debug, warn};

use crate::core::cli::{Args, Commands, PrintArgs};
use crate::core::cmds;
use crate::core::logging::init_logging;
use crate::types::AppResult;
use crate::types::config::{CliOverrides, init_with_overrides, set_config_filename};

pub async fn run_main(namespace: &str, description: &str) -> AppResult<()> {
    // Namespace derives the config filename
    set_config_filename(&format!("{namespace}.toml"));

    // Override CLI help text with namespace and description
    // Leak strings to get 'static lifetime for clap
    let namespace_static: &'static str = Box::leak(namespace.to_string().into_boxed_str());
    let description_static: &'static str =
        Box::leak(format!("{} - {}", description, namespace).into_boxed_str());

    let mut cmd = Args::command();
    cmd = cmd.name(namespace_static).about(description_static);
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }

    // Initialize configuration (files, then CLI overrides)
    init_with_overrides(&CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
    });

    // Initialize logging after config so level/color are applied
    init_logging();
    debug!("Current working directory: {}", env::current_dir()?.display());

    // Ctrl-C stops the analysis between runs; a run in progress is finished
    let running = Arc::new(AtomicBool::new(true));
    let running_ctrlc = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || {
        warn!("Received Ctrl-C, stopping after the current run..");
        running_ctrlc.store(false, Ordering::SeqCst);
    }) {
        warn!("Could not install a Ctrl-C handler: {e}");
    }

    // Dispatch to appropriate command
    let exit_code = match args.command {
        Commands::Analyze(analyze_args) => {
            let summary = cmds::execute_analyze(analyze_args, Arc::clone(&running)).await?;
            if summary.interrupted {
                2
            } else if summary.failed > 0 {
                1
            } else {
                0
            }
        }
        Commands::Extract(extract_args) => {
            cmds::execute_extract(extract_args).await?;
            0
        }
        Commands::Print {
            command: print_args,
        } => {
            match print_args {
                PrintArgs::Config(args) => {
                    cmds::execute_print(cmds::print::PrintCommand::Config(args.format)).await?
                }
            }
            0
        }
        Commands::Init => {
            cmds::execute_init().await?;
            0
        }
    };

    // Exit with appropriate code
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
