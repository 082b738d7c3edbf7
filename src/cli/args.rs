use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::inquiry::InquiryFields;

#[derive(Parser, Debug)]
#[command(
    name = "site-panels",
    version,
    about = "站点面板控制器 - 回放页面交互、生成询价邮件、提交询价表单",
    long_about = "site-panels 以无界面的方式运行站点的下拉菜单、覆盖页面和联系表单逻辑。可以对布局回放事件脚本并输出最终页面状态，也可以直接生成 mailto 链接或向表单接收端提交询价。"
)]
pub struct Args {
    /// 页面布局文件 (TOML)，不指定则使用内置布局
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// 询价提交方式 (endpoint, mailto, hidden_frame)
    #[arg(short = 's', long, global = true, default_value = "")] // 空字符串表示未指定
    pub strategy: String,

    /// 表单接收端地址
    #[arg(long = "endpoint-url", global = true, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// 日志格式 (pretty, compact, json)
    #[arg(long = "log-format", global = true, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// 日志写入文件而不是标准错误输出
    #[arg(long = "log-file", global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 对布局回放事件脚本并输出最终页面状态 (JSON)
    Replay {
        /// 事件脚本 (.json 或 .toml)
        script: PathBuf,

        /// 同时输出界面写入记录
        #[arg(long, default_value_t = false)]
        journal: bool,
    },

    /// 生成询价邮件的 mailto 链接
    Mailto {
        #[command(flatten)]
        inquiry: InquiryArgs,

        /// 固定询价编号 (1000-9999)，不指定则随机生成
        #[arg(long, value_name = "NUMBER")]
        number: Option<u16>,

        /// 用邮件客户端打开链接
        #[arg(long, default_value_t = false)]
        open: bool,
    },

    /// 向表单接收端提交一次询价
    Submit {
        #[command(flatten)]
        inquiry: InquiryArgs,
    },
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct InquiryArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// 服务类型 (mapping, inspection, consulting, legal)
    #[arg(long)]
    pub service: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

impl InquiryArgs {
    pub fn to_fields(&self) -> InquiryFields {
        InquiryFields {
            name: self.name.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            service: self.service.clone(),
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_args() {
        let args = Args::parse_from(["site-panels", "replay", "script.json", "--journal"]);
        assert!(args.strategy.is_empty());
        assert!(args.layout.is_none());
        match args.command {
            Command::Replay { script, journal } => {
                assert_eq!(script, PathBuf::from("script.json"));
                assert!(journal);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "site-panels",
            "mailto",
            "--name",
            "Jane",
            "--service",
            "mapping",
            "--number",
            "1234",
            "--strategy",
            "mailto",
            "--layout",
            "site.toml",
        ]);
        assert_eq!(args.strategy, "mailto");
        assert_eq!(args.layout, Some(PathBuf::from("site.toml")));
        match args.command {
            Command::Mailto {
                inquiry,
                number,
                open,
            } => {
                let fields = inquiry.to_fields();
                assert_eq!(fields.name(), Some("Jane"));
                assert_eq!(fields.service(), Some("mapping"));
                assert_eq!(fields.email(), None);
                assert_eq!(number, Some(1234));
                assert!(!open);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_submit_requires_subcommand() {
        assert!(Args::try_parse_from(["site-panels"]).is_err());
        let args = Args::try_parse_from([
            "site-panels",
            "submit",
            "--email",
            "jane@example.com",
            "--endpoint-url",
            "http://localhost:9000/submit",
        ])
        .unwrap();
        assert_eq!(
            args.endpoint_url.as_deref(),
            Some("http://localhost:9000/submit")
        );
    }

    #[test]
    fn test_strategy_help_text() {
        use clap::CommandFactory;

        let command = Args::command();
        let strategy = command
            .get_arguments()
            .find(|arg| arg.get_id() == "strategy")
            .unwrap();
        let help = strategy.get_help().unwrap().to_string();
        assert!(help.starts_with("询价提交方式"));
        assert!(help.contains("hidden_frame"));
    }

    #[test]
    fn test_log_flags() {
        let args = Args::parse_from([
            "site-panels",
            "replay",
            "script.toml",
            "--log-format",
            "json",
            "--log-file",
            "/tmp/site-panels.log",
        ]);
        assert_eq!(args.log_format.as_deref(), Some("json"));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/site-panels.log")));
    }
}
