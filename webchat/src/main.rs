fn main() {
    if let Err(e) = criemos_lib::run() {
        eprintln!("criemos-webchat: {}", e);
        std::process::exit(1);
    }
}
