use clap::Parser;

/// Serves a random media file out of each directory of the data folder
#[derive(Parser, Debug)]
#[command(name = "MediaDispenser")]
#[command(author, version)]
#[command(about = "Rotating media dispenser for stream overlays", long_about = None)]
struct Args {
    #[arg(long)]
    #[arg(help = "dump the configuration to file and exit")]
    #[arg(value_name = "OUT_FILE")]
    dump_configuration: Option<String>,

    #[arg(short)]
    #[arg(long)]
    #[arg(help = "path to the configuration file")]
    #[arg(value_name = "FILE")]
    configuration: Option<String>,

    #[arg(short)]
    #[arg(long)]
    #[arg(help = "port to listen on, overrides the configuration")]
    port: Option<u16>,

    #[arg(short)]
    #[arg(long)]
    #[arg(help = "never delete a requested file, whatever the directory name is")]
    debug_mode: bool,
}

fn get_configuration(
    path: &Option<String>,
) -> Result<md::configuration::DispenserServiceConfiguration, String> {
    match path {
        Some(path) => {
            let configuration = std::fs::read_to_string(path)
                .map_err(|e| format!("Could not read the configuration file: {}", e))?;
            serde_json::from_str(configuration.as_str())
                .map_err(|e| format!("Invalid configuration file: {}", e))
        }
        None => Ok(md::configuration::DispenserServiceConfiguration::default()),
    }
}

fn dump_configuration(
    path: &str,
    configuration: &md::configuration::DispenserServiceConfiguration,
) -> Result<(), String> {
    println!("Dumping configuration to {}", path);
    let configuration = serde_json::to_string_pretty(configuration)
        .map_err(|e| format!("Failed to serialize configuration: {}", e))?;
    std::fs::write(path, configuration).map_err(|e| format!("Failed to write configuration: {}", e))
}

fn setup_logging(configuration: &md::configuration::LoggingConfiguration) {
    let level = if configuration.enabled {
        configuration.level
    } else {
        log::LevelFilter::Off
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .init();
    log::info!("Logger initialized with level {:?}", level);
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut configuration = match get_configuration(&args.configuration) {
        Ok(configuration) => configuration,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(port) = args.port {
        configuration.server.port = port;
    }
    if args.debug_mode {
        configuration.dispenser.debug_mode = true;
    }

    setup_logging(&configuration.logging);

    if let Some(path) = args.dump_configuration.as_deref() {
        if let Err(e) = dump_configuration(path, &configuration) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = md::serve(&configuration, None).await {
        log::error!("Failed to start: {:?}", e);
        std::process::exit(1);
    }
}
