pub mod inquiry;
pub mod replay;

pub use inquiry::{compose_mailto, submit_inquiry};
pub use replay::{replay, run_replay, ReplayReport};

use crate::cli::args::{Args, Command};
use crate::config::Config;

/// 命令路由器，执行子命令并返回要打印的内容
pub async fn route_command(args: &Args, config: &Config) -> anyhow::Result<String> {
    match &args.command {
        Command::Replay { script, journal } => {
            let report = run_replay(script, *journal, config).await?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Command::Mailto {
            inquiry,
            number,
            open,
        } => compose_mailto(config, &inquiry.to_fields(), *number, *open),
        Command::Submit { inquiry } => {
            submit_inquiry(config, &inquiry.to_fields()).await?;
            Ok("✅ Inquiry sent".to_string())
        }
    }
}
