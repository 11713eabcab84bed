use anyhow::Result;
use pose_tool::config::Config;

#[test]
fn config_files_test() -> Result<()> {
    for file in glob::glob(&format!("{}/cfg/*.json5", env!("CARGO_MANIFEST_DIR")))? {
        let _ = Config::open(file?)?;
    }

    Ok(())
}
