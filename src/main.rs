use clap::Parser;
use scenario_guide::cli::commands::{cmd_check, cmd_list, cmd_play};
use scenario_guide::cli::config::{load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::List { defs } => {
            let defs_path = defs.as_deref().unwrap_or(&config.defs);
            cmd_list(defs_path, cli.verbose)?;
        }

        Commands::Check { defs } => {
            let defs_path = defs.as_deref().unwrap_or(&config.defs);
            let clean = cmd_check(defs_path)?;
            if !clean {
                std::process::exit(1);
            }
        }

        Commands::Play {
            scenario,
            defs,
            fixture,
            mode,
            trace,
            state,
            max_ms,
        } => {
            // Resolve settings: CLI > config > defaults
            let defs_path = defs.as_deref().unwrap_or(&config.defs);
            let mode = mode.as_deref().unwrap_or(&config.play.mode);
            let trace_path = trace.as_deref().or(config.trace.as_deref());
            let state_path = state.as_deref().unwrap_or(&config.state_file);
            let max_ms = max_ms.unwrap_or(config.play.max_ms);

            let completed = cmd_play(
                &scenario,
                defs_path,
                fixture.as_deref(),
                mode,
                trace_path,
                state_path,
                config.play.tick_ms,
                max_ms,
                cli.verbose,
            )?;
            if !completed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
