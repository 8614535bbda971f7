use std::fs;
use std::io::Write;

const PROTO_DIR: &str = "src/pbf/proto";

static MOD_RS: &[u8] = b"
pub mod fileformat;
pub mod osmformat;
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_files = [
        format!("{}/fileformat.proto", PROTO_DIR),
        format!("{}/osmformat.proto", PROTO_DIR),
    ];

    for path in &proto_files {
        println!("cargo:rerun-if-changed={}", path);
    }

    protobuf_codegen_pure::Codegen::new()
        .out_dir(PROTO_DIR)
        .inputs(&proto_files)
        .include(PROTO_DIR)
        .run()?;

    fs::File::create(format!("{}/mod.rs", PROTO_DIR))?.write_all(MOD_RS)?;

    Ok(())
}
