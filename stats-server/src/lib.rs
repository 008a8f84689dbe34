//! Retail Stats Server - 零售后台统计服务
//!
//! # 架构概述
//!
//! 本模块是统计服务的主入口，提供以下核心功能：
//!
//! - **统计引擎** (`stats`): 时间分桶的对比统计计算
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储与聚合查询
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! stats-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── stats/         # 统计引擎 (周期、分桶、对比、排名)
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod stats;
pub mod utils;

// Re-export 公共类型
pub use self::core::{Config, Server, ServerState};
pub use stats::{PeriodUnit, StatsService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   _____ __        __
  / ___// /_____ _/ /______
  \__ \/ __/ __ `/ __/ ___/
 ___/ / /_/ /_/ / /_(__  )
/____/\__/\__,_/\__/____/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
