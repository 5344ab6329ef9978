//! Static renderer entry point (native).
//!
//! Reads a JSON options object from the file named by the first argument,
//! or from stdin, and prints the widget markup.

#[cfg(feature = "native")]
fn main() {
    use std::io::Read;

    env_logger::init();

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    let options = match input {
        Ok(text) if text.trim().is_empty() => "{}".to_string(),
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed to read options: {}", e);
            std::process::exit(1);
        }
    };

    match sharekit_web::render_static(&options) {
        Ok(html) => println!("{html}"),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
