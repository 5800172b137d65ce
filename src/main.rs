use hero_scene::prelude::*;
use simple_logger::SimpleLogger;

fn main() {
    // RUST_LOG overrides the default level
    if let Err(err) = SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("Logger unavailable: {}", err);
    }

    if let Err(err) = Hero::new().with_title("Hero").run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
