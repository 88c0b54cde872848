/// Init terminal logger for tests, ignoring repeated initialization
pub fn init_logger() {
    let _ = simplelog::TermLogger::init(
        ::log::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
}
