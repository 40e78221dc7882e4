use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "support-relay")]
#[command(about = "Relays support-query submissions to the operator mailbox over OAuth2 SMTP")]
pub struct CliArgs {
    /// TOML 配置檔；未指定時從環境變數載入
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// 覆寫監聽埠
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
