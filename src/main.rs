use log::*;
use swappuzzle::{config::Config, entry};

pub fn main() {
    env_logger::init();
    if let Err(error) = entry::run(Config::default()) {
        error!("{error}");
        if error.is_puzzle_setup() {
            eprintln!("Cannot start a puzzle: {error}");
        } else {
            eprintln!("Error: {error}");
        }
        std::process::exit(1);
    }
}
