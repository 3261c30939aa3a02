fn main() {
    let args = std::env::args();
    // Initialize logging as early as possible; fallback to stderr on failure.
    let _ = syncvio::logging::init_logging(syncvio::logging::LogFormat::Human);

    if let Err(err) = syncvio::run(args) {
        eprintln!("syncvio error: {err}");
        std::process::exit(1);
    }
}
