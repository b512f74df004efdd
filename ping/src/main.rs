mod app;
mod icmp;
mod ip;
mod probe;
mod session;
mod stats;

use std::process;

use app::PingApp;
use crossterm::style::Stylize;
use log::debug;

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let app = match PingApp::from_args() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("ping: {}", err.to_string().red());
            process::exit(2);
        }
    };
    debug!("{:?}", app.config());

    if let Err(err) = app.run() {
        eprintln!("ping: {}", err.to_string().red());
        process::exit(1);
    }
}
