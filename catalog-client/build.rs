// Embeds the catalog client version at compile time.
// CI may replace the patch segment through CATALOG_PATCH_VERSION.

use std::env;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");

    let mut segments = version.splitn(3, '.');
    let (Some(major), Some(minor), Some(patch)) =
        (segments.next(), segments.next(), segments.next())
    else {
        panic!("Invalid version format in Cargo.toml: {}", version);
    };

    let patch = env::var("CATALOG_PATCH_VERSION").unwrap_or_else(|_| patch.to_string());

    println!("cargo:rustc-env=CATALOG_VERSION={}.{}.{}", major, minor, patch);
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=CATALOG_PATCH_VERSION");
}
