//! Build script for lark-storage.
//!
//! Rebuild when database migrations change.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
