use log::info;

mod bootstrap;
mod config;
mod contact;
mod counter;
mod dom;
mod download;
mod navigation;
mod reveal;
mod scheduler;
mod throttle;
mod typing;
mod notification {
    pub mod manager;
    pub mod severity;
    pub mod toast_stack;
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting Khotwa site");
    bootstrap::start();
}
