fn main() {
    if let Err(e) = mergewatch::cli::run() {
        eprintln!("mw: {:#}", e);
        std::process::exit(1);
    }
}
