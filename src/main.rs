use skyraid::app;

fn main() {
    env_logger::init();
    log::info!("skyraid headless demo starting");

    if let Err(e) = app::run_demo(120.0) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
