use env_logger::{Builder, WriteStyle};
use log::LevelFilter;
use std::io::Write;

pub(crate) fn try_init() -> Result<(), log::SetLoggerError> {
    Builder::new()
        .format(|buf, record| writeln!(buf, "[ASIM | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Always)
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init()
}
