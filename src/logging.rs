use log::LevelFilter;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

/// Colored stderr logging for one-shot subcommands
pub fn init_stderr(level: LevelFilter) {
    let mut builder = colog::default_builder();
    builder.filter_level(level).parse_default_env();
    let _ = builder.try_init();
}

/// File logging for the interactive screen, where stderr belongs to the terminal
pub fn init_file(path: &Path, level: LevelFilter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)));
    let _ = builder.try_init();
    Ok(())
}
