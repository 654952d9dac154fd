pub fn run() -> anyhow::Result<()> {
    println!("swingcoach {}", env!("CARGO_PKG_VERSION"));
    println!("Golf swing analysis from pose landmarks, with LLM coaching feedback");
    Ok(())
}
