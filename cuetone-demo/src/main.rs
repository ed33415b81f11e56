mod cli;
mod gui;

fn main() -> Result<(), eframe::Error> {
    // `--cli` plays every cue headlessly, `--cli --offline` renders without a device
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--cli") {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();

        let offline = args.iter().any(|arg| arg == "--offline");
        let cues: Vec<&str> = args
            .iter()
            .skip(1)
            .filter(|arg| !arg.starts_with("--"))
            .map(String::as_str)
            .collect();

        if let Err(e) = cli::run(&cues, offline) {
            log::error!("CLI run failed: {:#}", e);
            std::process::exit(1);
        }
        Ok(())
    } else {
        gui::run()
    }
}
