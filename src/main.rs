//! Binary entry point for `osgi-rename`.

use std::process;

fn main() {
    if let Err(e) = osgi_rename::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
