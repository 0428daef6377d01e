use crate::widgets::Terminal;
use std::io::{IsTerminal, Write};
use std::sync::Arc;

#[macro_use]
mod macros;

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod helper;
pub mod logger;
pub mod market;
pub mod render;
pub mod scheduler;
pub mod selector;
pub mod ui;
pub mod widgets;

mod views;

#[macro_use]
extern crate rust_i18n;
i18n!("locales");

pub use cli::Args;

#[tokio::main]
async fn main() {
    let bin_name = std::env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err.message);
            std::process::exit(err.code);
        }
    };

    let args = match command {
        cli::Command::Help => {
            println!("{}", cli::help_text(&bin_name));
            return;
        }
        cli::Command::Version => {
            println!("{}", cli::version_text());
            return;
        }
        cli::Command::Run(args) => args,
    };

    dotenvy::dotenv().ok();

    if !std::io::stdout().is_terminal() {
        eprintln!("stockscreen 需要在交互式终端（TTY）中运行。");
        std::process::exit(1);
    }

    let locale = config::locale();
    rust_i18n::set_locale(&locale);

    let _guard = match logger::init() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        locale = %locale,
        log_dir = %logger::active_log_dir().display(),
        "应用启动"
    );

    let missing_env = config::missing_required_env();
    if !missing_env.is_empty() {
        config::print_config_guide();
        eprintln!("\n缺少必需环境变量：{}", missing_env.join(", "));
        std::process::exit(2);
    }

    let mut config = match config::Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("配置错误：{err:#}");
            tracing::error!(error = %format!("{err:#}"), "配置加载失败");
            std::process::exit(2);
        }
    };
    if let Some(interval) = args.interval {
        config.refresh_interval = interval;
    }
    tracing::info!(?config, "配置已加载");

    let market = match market::TwelveData::new(&config.base_url, &config.api_key) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            eprintln!("\n行情客户端初始化失败：{err}");
            tracing::error!(error = %err, "行情客户端初始化失败");
            std::process::exit(2);
        }
    };

    // Set up panic hook to restore terminal
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        Terminal::exit_full_screen();
        hook(info);
    }));

    let _ = std::io::stdout().write_all(b"\n");
    let _ = std::io::stdout().flush();

    if let Err(err) = Terminal::enter_full_screen() {
        Terminal::exit_full_screen();
        eprintln!("无法进入全屏模式：{err}");
        std::process::exit(1);
    }
    let restore = scopeguard::guard((), |()| Terminal::exit_full_screen());

    tokio::select! {
        result = app::run(args, config, market) => {
            if let Err(err) = result {
                tracing::error!(error = %format!("{err:#}"), "应用主循环异常退出");
            } else {
                tracing::info!("应用主循环已退出");
            }
        }
        _ = wait_for_shutdown_signal() => {
            tracing::warn!("收到退出信号，正在退出");
        }
    }
    drop(restore);
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use std::future::pending;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    async fn recv_or_pending(signal: Option<Signal>) {
        let mut signal = signal;
        if let Some(sig) = signal.as_mut() {
            let _ = sig.recv().await;
            return;
        }
        pending::<()>().await;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = recv_or_pending(signal(SignalKind::terminate()).ok()) => {}
        _ = recv_or_pending(signal(SignalKind::hangup()).ok()) => {}
        _ = recv_or_pending(signal(SignalKind::interrupt()).ok()) => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
