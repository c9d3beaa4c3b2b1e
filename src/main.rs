fn main() {
    if let Err(e) = fangji::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
