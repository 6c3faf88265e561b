fn main() {
    if let Err(e) = fftbench_cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
