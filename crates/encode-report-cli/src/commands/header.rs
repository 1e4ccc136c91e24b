//! Header command.

use anyhow::Result;
use encode_report::ReportConfig;
use encode_report::report::header_line;

pub fn run(config: ReportConfig) -> Result<()> {
    println!("{}", header_line(&config));
    Ok(())
}
