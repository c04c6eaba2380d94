//! Vitals Check 主程序入口

use vitals_check::cli::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    let code = vitals_check::core::app::main(args).await;
    std::process::exit(code);
}
