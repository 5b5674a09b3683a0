//! Build script for PetPlate
//!
//! Embeds a build number and UTC build timestamp. The build number comes from
//! `PETPLATE_BUILD_NUMBER` when set (CI), otherwise from a local counter file.

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn next_local_build_number() -> u64 {
    let counter = Path::new(COUNTER_FILE);
    let previous: u64 = fs::read_to_string(counter)
        .ok()
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(0);
    let next = previous + 1;

    // A read-only checkout still builds, it just keeps reporting the same number
    if let Err(err) = fs::write(counter, next.to_string()) {
        println!("cargo:warning=could not update {}: {}", COUNTER_FILE, err);
    }
    next
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=PETPLATE_BUILD_NUMBER");

    let build_number = match std::env::var("PETPLATE_BUILD_NUMBER") {
        Ok(value) if !value.trim().is_empty() => match value.trim().parse::<u64>() {
            Ok(number) => number,
            Err(_) => {
                println!("cargo:warning=PETPLATE_BUILD_NUMBER '{}' is not a number, using the local counter", value);
                next_local_build_number()
            }
        },
        _ => next_local_build_number(),
    };
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=PETPLATE_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=PETPLATE_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=PETPLATE_BUILD_PROFILE={}", profile);
}
