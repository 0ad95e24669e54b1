fn main() {
    println!("cargo:rerun-if-env-changed=SHADER_SOURCE_DIR");
}
