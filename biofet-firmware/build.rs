//! Build script for biofet-firmware
//!
//! embassy-stm32's `memory-x` feature provides the chip's memory.x; this
//! only adds the linker scripts.

fn main() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}
