//! aab2apk - convert an Android App Bundle into a signed universal APK.
//!
//! Runs bundletool on the bundle, then extracts the universal APK from the
//! resulting APK set. Exit code 0 guarantees the APK exists at the reported
//! path.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match aab2apk::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
