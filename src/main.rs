//! Illumigator headless runner
//!
//! Loads a level (or the tutorial), ticks it with no player input and
//! reports receiver charges.
//!
//! Usage: `illumigator [LEVEL.json] [--settings SETTINGS.json] [--ticks N]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::PathBuf;

    use illumigator::renderer::scene_lines;
    use illumigator::sim::{TickInput, tick};
    use illumigator::{LevelDefinition, Settings};

    /// Run a level headless and report receiver charges.
    #[derive(Debug, clap::Parser)]
    #[command(version, about)]
    pub struct Args {
        /// Level definition JSON; the tutorial level when omitted
        pub level: Option<PathBuf>,

        /// Settings JSON; missing fields keep their defaults
        #[arg(long)]
        pub settings: Option<PathBuf>,

        /// Number of ticks to simulate
        #[arg(long, default_value_t = 600)]
        pub ticks: u64,
    }

    pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
        let settings = match &args.settings {
            Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        let definition = match &args.level {
            Some(path) => LevelDefinition::from_json(&std::fs::read_to_string(path)?)?,
            None => LevelDefinition::tutorial(&settings),
        };
        let mut level = definition.build(&settings)?;

        let input = TickInput::default();
        let mut completed_at = None;
        for _ in 0..args.ticks {
            let report = tick(&mut level, &input, &settings);
            if report.complete && completed_at.is_none() {
                completed_at = Some(level.time_ticks);
                log::info!("Receiver lit at tick {}", level.time_ticks);
            }
        }

        for receiver in level.receivers() {
            log::info!(
                "Receiver {:?} at {:?}: charge {:.3}",
                receiver.id,
                receiver.position(),
                receiver.charge().unwrap_or_default()
            );
        }
        log::info!(
            "{} after {} ticks: max charge {:.3} of {} ({} line vertices)",
            if level.is_complete(&settings) {
                "Complete"
            } else {
                "Incomplete"
            },
            level.time_ticks,
            level.max_charge(),
            settings.receiver_threshold,
            scene_lines(&level, &settings).len()
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::{CommandFactory, Parser};

        #[test]
        fn test_args_definition_is_valid() {
            Args::command().debug_assert();
        }

        #[test]
        fn test_parse_args() {
            let args = Args::try_parse_from(["illumigator", "level.json", "--ticks", "30"]).unwrap();
            assert_eq!(args.level, Some(PathBuf::from("level.json")));
            assert_eq!(args.ticks, 30);
            assert!(args.settings.is_none());

            let args = Args::try_parse_from(["illumigator"]).unwrap();
            assert!(args.level.is_none());
            assert_eq!(args.ticks, 600);
        }

        #[test]
        fn test_parse_args_rejects_bad_input() {
            assert!(Args::try_parse_from(["illumigator", "--ticks"]).is_err());
            assert!(Args::try_parse_from(["illumigator", "--ticks", "many"]).is_err());
            assert!(Args::try_parse_from(["illumigator", "--fast"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser as _;

    let args = native::Args::parse();
    env_logger::init();
    log::info!("Illumigator starting...");
    if let Err(e) = native::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on wasm; embed the library instead
}
