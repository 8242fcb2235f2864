fn main() {
    if let Err(e) = mergewatch::cli::run() {
        eprintln!("mergewatch: {:#}", e);
        std::process::exit(1);
    }
}
