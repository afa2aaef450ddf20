fn main() {
    if let Err(err) = stock_lens::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
